use super::traits::RealtimeHandler;
use crate::client::Client;
use crate::types::events::StoreKind;
use async_trait::async_trait;
use holacore::types::events::RealtimeEvent;
use holacore::types::{ChatSummary, MessageStatus};
use log::debug;
use std::sync::Arc;

/// Handler for `newChat` events.
///
/// Inserts a zeroed chat-list entry so the chat shows up immediately; the
/// denormalized fields fill in once the first message or the next list
/// fetch arrives.
#[derive(Default)]
pub struct NewChatHandler;

impl NewChatHandler {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl RealtimeHandler for NewChatHandler {
    fn kind(&self) -> &'static str {
        "newChat"
    }

    async fn handle(&self, client: Arc<Client>, event: &RealtimeEvent) -> bool {
        let RealtimeEvent::NewChat(ev) = event else {
            return false;
        };

        debug!(target: "Client", "Adding chat {} from realtime event", ev.id);
        {
            let mut list = client.chat_list.write().await;
            list.add_chat(ChatSummary {
                chat_id: ev.id.clone(),
                name: ev.name.clone(),
                image: String::new(),
                description: String::new(),
                kind: ev.kind.clone(),
                last_message_id: String::new(),
                last_message_content: String::new(),
                last_message_status: MessageStatus::Sent,
                last_message_created_at: ev.created_at,
                last_message_updated_at: ev.created_at,
                unreaded_count: 0,
                participants: Vec::new(),
                is_active: true,
                created_at: ev.created_at,
                updated_at: ev.created_at,
            });
        }
        client.notify_store_changed(StoreKind::ChatList);

        true
    }
}
