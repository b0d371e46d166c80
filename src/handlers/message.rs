use super::traits::RealtimeHandler;
use crate::client::Client;
use crate::types::events::StoreKind;
use async_trait::async_trait;
use holacore::types::events::RealtimeEvent;
use holacore::types::{LastMessagePatch, Message, MessageStatus};
use log::debug;
use std::sync::Arc;

/// Handler for `newMessage` events.
///
/// Folds a message pushed by the backend into the open chat's message cache
/// (when the event belongs to that chat) and refreshes the chat-list
/// snapshot either way. Events echoing the account's own sends are
/// suppressed: the optimistic path already wrote them.
#[derive(Default)]
pub struct NewMessageHandler;

impl NewMessageHandler {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl RealtimeHandler for NewMessageHandler {
    fn kind(&self) -> &'static str {
        "newMessage"
    }

    async fn handle(&self, client: Arc<Client>, event: &RealtimeEvent) -> bool {
        let RealtimeEvent::NewMessage(ev) = event else {
            return false;
        };

        if ev.sender_id == client.user_id() {
            debug!(target: "Client", "Suppressing self-echo for message {}", ev.id);
            return true;
        }

        let mut inserted = false;
        {
            let mut messages = client.chat_messages.write().await;
            if messages.chat_id == ev.chat_id {
                messages.add_message(Message {
                    message_id: ev.id.clone(),
                    chat_id: ev.chat_id.clone(),
                    sender_id: ev.sender_id.clone(),
                    content: Some(ev.content.clone()),
                    kind: ev.kind.clone(),
                    status: MessageStatus::Received,
                    readed: true,
                    deleted: false,
                    created_at: ev.created_at,
                    updated_at: ev.created_at,
                });
                inserted = true;
            }
        }
        if inserted {
            client.notify_store_changed(StoreKind::ChatMessages);
        }

        client
            .apply_last_message_patch(
                &ev.chat_id,
                LastMessagePatch {
                    message_id: ev.id.clone(),
                    content: ev.content.clone(),
                    status: MessageStatus::Received,
                    is_by_me: false,
                    created_at: ev.created_at,
                },
            )
            .await;

        true
    }
}
