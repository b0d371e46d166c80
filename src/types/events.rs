use holacore::types::events::{PresenceEvent, TypingEvent, UnreadCountEvent};
use std::sync::Arc;
use tokio::sync::broadcast;

// The size of the broadcast channel buffer.
const CHANNEL_CAPACITY: usize = 100;

/// Which cache a mutation just touched. Subscribers re-read the store they
/// render from instead of carrying state in the event itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    ChatMessages,
    ChatList,
    SwipeQueue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreChanged {
    pub store: StoreKind,
}

/// A send was rejected or failed in transit. Unless rollback is enabled
/// the optimistic entry is still sitting in the cache with status
/// `Sending`.
#[derive(Debug, Clone)]
pub struct SendFailed {
    pub chat_id: String,
    pub message_id: String,
    pub rolled_back: bool,
}

/// A mark-all-read submission failed and both caches were rolled back.
#[derive(Debug, Clone)]
pub struct ReadReceiptsReverted {
    pub chat_id: String,
    pub reverted: usize,
}

/// A swipe submission failed and the candidate returned to the deck.
#[derive(Debug, Clone)]
pub struct SwipeRestored {
    pub target_user_id: String,
}

// Macro to generate EventBus fields and constructor
macro_rules! define_event_bus {
    ($(($field:ident, $type:ty)),* $(,)?) => {
        /// Typed event bus that provides separate broadcast channels for each event type.
        /// This replaces a generic event handler system with type-safe, efficient channels.
        #[derive(Debug)]
        pub struct EventBus {
            $(
                pub $field: broadcast::Sender<$type>,
            )*
        }

        impl EventBus {
            pub fn new() -> Self {
                Self {
                    $(
                        $field: broadcast::channel(CHANNEL_CAPACITY).0,
                    )*
                }
            }
        }
    };
}

// Define the EventBus structure and implementation using the macro
define_event_bus! {
    // Cache change notifications
    (store_changed, Arc<StoreChanged>),

    // Failure surfacing
    (send_failed, Arc<SendFailed>),
    (read_receipts_reverted, Arc<ReadReceiptsReverted>),
    (swipe_restored, Arc<SwipeRestored>),

    // Realtime hints forwarded without any cache write
    (chat_typing, Arc<TypingEvent>),
    (presence, Arc<PresenceEvent>),
    (unread_hint, Arc<UnreadCountEvent>),
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
