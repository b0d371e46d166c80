use crate::api::{ChatApi, ProfileApi};
use crate::config::ClientConfig;
use crate::types::events::{EventBus, StoreChanged, StoreKind};
use dashmap::DashMap;
use futures_util::{Stream, StreamExt};
use holacore::store::{ChatListStore, ChatMessagesStore, SwipeQueue};
use holacore::types::UserProfile;
use holacore::types::events::RealtimeEvent;
use log::{debug, info, warn};
use rand::RngCore;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use thiserror::Error;
use tokio::sync::RwLock;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("no chat is currently open")]
    NoChatOpen,
    #[error("chat list sync already in progress")]
    AlreadySyncing,
    #[error("{0} request rejected by server")]
    Rejected(&'static str),
    #[error("own profile is not loaded")]
    ProfileNotLoaded,
    #[error(transparent)]
    Api(#[from] crate::api::ApiError),
}

/// The client application core for one signed-in account.
///
/// Owns the caches the UI renders from, the coordinators that mutate them
/// optimistically around network calls, and the router that folds realtime
/// pushes into the same caches. All state is behind async locks so the
/// structure can be shared freely across tasks.
pub struct Client {
    pub(crate) config: ClientConfig,
    pub(crate) user_id: String,

    pub(crate) chat_api: Arc<dyn ChatApi>,
    pub(crate) profile_api: Arc<dyn ProfileApi>,

    /// Messages of the currently open chat.
    pub chat_messages: Arc<RwLock<ChatMessagesStore>>,
    /// The account's chat list, alive across chat navigation.
    pub chat_list: Arc<RwLock<ChatListStore>>,
    /// Look-ahead buffer for the swipe deck.
    pub swipe_queue: Arc<RwLock<SwipeQueue>>,

    pub(crate) my_profile: Arc<RwLock<Option<UserProfile>>>,
    /// Profiles of other users, keyed by user id.
    pub(crate) profile_cache: Arc<DashMap<String, UserProfile>>,

    pub event_bus: EventBus,

    pub(crate) unique_id: String,
    pub(crate) id_counter: Arc<AtomicU64>,

    /// Bumped on every chat open/close. In-flight fetches remember the
    /// value they started under and discard their results if it moved.
    pub(crate) chat_generation: Arc<AtomicU64>,
    pub(crate) is_syncing_chats: Arc<AtomicBool>,

    /// Router for dispatching realtime events to their appropriate handlers
    pub(crate) event_router: crate::handlers::router::EventRouter,
}

impl Client {
    pub fn new(
        user_id: impl Into<String>,
        chat_api: Arc<dyn ChatApi>,
        profile_api: Arc<dyn ProfileApi>,
        config: ClientConfig,
    ) -> Arc<Self> {
        let mut unique_id_bytes = [0u8; 2];
        rand::rng().fill_bytes(&mut unique_id_bytes);

        Arc::new(Self {
            config,
            user_id: user_id.into(),
            chat_api,
            profile_api,
            chat_messages: Arc::new(RwLock::new(ChatMessagesStore::new())),
            chat_list: Arc::new(RwLock::new(ChatListStore::new())),
            swipe_queue: Arc::new(RwLock::new(SwipeQueue::new())),
            my_profile: Arc::new(RwLock::new(None)),
            profile_cache: Arc::new(DashMap::new()),
            event_bus: EventBus::new(),
            unique_id: format!("{}.{}", unique_id_bytes[0], unique_id_bytes[1]),
            id_counter: Arc::new(AtomicU64::new(0)),
            chat_generation: Arc::new(AtomicU64::new(0)),
            is_syncing_chats: Arc::new(AtomicBool::new(false)),
            event_router: Self::create_event_router(),
        })
    }

    fn create_event_router() -> crate::handlers::router::EventRouter {
        use crate::handlers::{
            chat::NewChatHandler,
            chatstate::{PresenceHandler, TypingHandler, UnreadCountHandler},
            message::NewMessageHandler,
            router::EventRouter,
        };

        let mut router = EventRouter::new();

        // Register all handlers
        router.register(Arc::new(NewMessageHandler::new()));
        router.register(Arc::new(NewChatHandler::new()));
        router.register(Arc::new(TypingHandler));
        router.register(Arc::new(PresenceHandler));
        router.register(Arc::new(UnreadCountHandler));

        router
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Generates a new unique request ID string.
    pub fn generate_request_id(&self) -> String {
        let count = self
            .id_counter
            .fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        format!("{}-{}", self.unique_id, count)
    }

    /// Client-assigned id for an optimistic message entry. Temporary ids
    /// never collide with server ids, which are plain UUIDs.
    pub fn generate_temp_message_id(&self) -> String {
        format!("temp-{}", self.generate_request_id())
    }

    /// Decodes one raw realtime frame and routes it. Malformed payloads
    /// and unknown kinds are logged and dropped, never propagated.
    pub async fn receive_event(self: &Arc<Self>, kind: &str, payload: serde_json::Value) -> bool {
        match RealtimeEvent::from_wire(kind, payload) {
            Ok(event) => self.handle_realtime_event(event).await,
            Err(e) => {
                debug!(target: "Client", "Discarding realtime frame: {e}");
                false
            }
        }
    }

    /// Routes a typed realtime event to its registered handler.
    pub async fn handle_realtime_event(self: &Arc<Self>, event: RealtimeEvent) -> bool {
        let handled = self.event_router.dispatch(self.clone(), &event).await;
        if !handled {
            warn!(target: "Client", "No handler for realtime event kind '{}'", event.kind());
        }
        handled
    }

    /// Consumes a stream of raw `(kind, payload)` frames until it ends,
    /// feeding each one through `receive_event`. The transport layer
    /// producing the stream lives outside this crate.
    pub async fn drive_events<S>(self: &Arc<Self>, mut frames: S)
    where
        S: Stream<Item = (String, serde_json::Value)> + Unpin,
    {
        while let Some((kind, payload)) = frames.next().await {
            self.receive_event(&kind, payload).await;
        }
        info!(target: "Client", "Realtime frame stream ended");
    }

    pub(crate) fn notify_store_changed(&self, store: StoreKind) {
        let _ = self
            .event_bus
            .store_changed
            .send(Arc::new(StoreChanged { store }));
    }

    pub(crate) fn current_chat_generation(&self) -> u64 {
        self.chat_generation.load(Ordering::SeqCst)
    }

    pub(crate) fn bump_chat_generation(&self) -> u64 {
        self.chat_generation.fetch_add(1, Ordering::SeqCst) + 1
    }
}
