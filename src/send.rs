use crate::client::{Client, ClientError};
use crate::types::events::{SendFailed, StoreKind};
use chrono::Utc;
use holacore::types::{LastMessagePatch, Message, MessageKind, MessageStatus};
use log::{info, warn};
use std::sync::Arc;

impl Client {
    /// Sends a message with optimistic local echo.
    ///
    /// A draft with a temporary id and status `Sending` lands in the open
    /// chat's cache before the network is touched, and the chat list's
    /// snapshot flips to the draft at the same time. The server only
    /// acknowledges with an accepted flag, so the draft is never swapped
    /// for a canonical copy; the realtime router suppresses the echo that
    /// would otherwise duplicate it.
    ///
    /// On failure the draft stays in place with status `Sending` and a
    /// `send_failed` event fires. With `rollback_failed_sends` enabled the
    /// draft is removed again and the previous snapshot restored instead.
    ///
    /// Returns the temporary message id the draft was stored under.
    pub async fn send_message(
        self: &Arc<Self>,
        chat_id: &str,
        content: Option<String>,
        kind: MessageKind,
    ) -> Result<String, ClientError> {
        let message_id = self.generate_temp_message_id();
        let now = Utc::now();

        let inserted = {
            let mut messages = self.chat_messages.write().await;
            if messages.chat_id == chat_id {
                messages.add_message(Message {
                    message_id: message_id.clone(),
                    chat_id: chat_id.to_string(),
                    sender_id: self.user_id.clone(),
                    content: content.clone(),
                    kind: kind.clone(),
                    status: MessageStatus::Sending,
                    readed: false,
                    deleted: false,
                    created_at: now,
                    updated_at: now,
                });
                true
            } else {
                false
            }
        };
        if inserted {
            self.notify_store_changed(StoreKind::ChatMessages);
        }

        // Snapshot the previous last message under the same lock that
        // applies the optimistic patch, so a realtime patch cannot slip in
        // between the read and the write.
        let prior = {
            let mut list = self.chat_list.write().await;
            let prior = list.get(chat_id).map(|chat| LastMessagePatch {
                message_id: chat.last_message_id.clone(),
                content: chat.last_message_content.clone(),
                status: chat.last_message_status.clone(),
                is_by_me: false,
                created_at: chat.last_message_created_at,
            });
            list.update_last_message(
                chat_id,
                LastMessagePatch {
                    message_id: message_id.clone(),
                    content: content.clone().unwrap_or_default(),
                    status: MessageStatus::Sent,
                    is_by_me: true,
                    created_at: now,
                },
            );
            prior
        };
        self.notify_store_changed(StoreKind::ChatList);

        let accepted = match self.chat_api.send_message(chat_id, content, kind).await {
            Ok(accepted) => accepted,
            Err(e) => {
                self.handle_send_failure(chat_id, &message_id, inserted, prior)
                    .await;
                return Err(e.into());
            }
        };
        if !accepted {
            self.handle_send_failure(chat_id, &message_id, inserted, prior)
                .await;
            return Err(ClientError::Rejected("send"));
        }

        info!(target: "Client", "Message {message_id} accepted for chat {chat_id}");
        Ok(message_id)
    }

    async fn handle_send_failure(
        &self,
        chat_id: &str,
        message_id: &str,
        inserted: bool,
        prior: Option<LastMessagePatch>,
    ) {
        let rolled_back = self.config.rollback_failed_sends;
        warn!(
            target: "Client",
            "Send failed for message {message_id} in chat {chat_id} (rollback: {rolled_back})"
        );

        if rolled_back {
            if inserted {
                {
                    let mut messages = self.chat_messages.write().await;
                    if messages.chat_id == chat_id {
                        messages.remove_message(message_id);
                    }
                }
                self.notify_store_changed(StoreKind::ChatMessages);
            }
            if let Some(prior) = prior {
                {
                    let mut list = self.chat_list.write().await;
                    list.update_last_message(chat_id, prior);
                }
                self.notify_store_changed(StoreKind::ChatList);
            }
        }

        let _ = self.event_bus.send_failed.send(Arc::new(SendFailed {
            chat_id: chat_id.to_string(),
            message_id: message_id.to_string(),
            rolled_back,
        }));
    }
}
