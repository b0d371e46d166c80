use crate::client::{Client, ClientError};
use crate::types::events::{ReadReceiptsReverted, StoreKind};
use log::{debug, info, warn};
use std::sync::Arc;

impl Client {
    /// Marks every unread message of the open chat as read, optimistically
    /// across both caches, then submits the receipt.
    ///
    /// The message flips and the chat-list unread counter are applied under
    /// both write locks at once, so no reader can observe one cache updated
    /// without the other. A failed submission rolls both back the same way
    /// and emits `read_receipts_reverted`.
    pub async fn mark_all_messages_read(self: &Arc<Self>) -> Result<(), ClientError> {
        let chat_id = {
            let store = self.chat_messages.read().await;
            if store.chat_id.is_empty() {
                return Err(ClientError::NoChatOpen);
            }
            store.chat_id.clone()
        };

        let (pending, prev_unread_count) = {
            let mut messages = self.chat_messages.write().await;
            if messages.unread_ids().is_empty() {
                debug!(target: "Client", "No unread messages in chat {chat_id}");
                return Ok(());
            }
            let mut list = self.chat_list.write().await;
            let pending = messages.unread_ids().len();
            let prev = list.get(&chat_id).map(|c| c.unreaded_count).unwrap_or(0);
            messages.mark_all_read();
            list.set_unread_count(&chat_id, 0);
            (pending, prev)
        };
        self.notify_store_changed(StoreKind::ChatMessages);
        self.notify_store_changed(StoreKind::ChatList);

        let result = self.chat_api.mark_all_read(&chat_id).await;
        if matches!(result, Ok(true)) {
            info!(target: "Client", "Marked {pending} messages read in chat {chat_id}");
            return Ok(());
        }

        warn!(target: "Client", "Mark-read failed for chat {chat_id}, reverting {pending} flips");
        {
            let mut messages = self.chat_messages.write().await;
            let mut list = self.chat_list.write().await;
            if messages.chat_id == chat_id {
                messages.revert_mark_all_read();
            }
            list.set_unread_count(&chat_id, prev_unread_count);
        }
        self.notify_store_changed(StoreKind::ChatMessages);
        self.notify_store_changed(StoreKind::ChatList);
        let _ = self
            .event_bus
            .read_receipts_reverted
            .send(Arc::new(ReadReceiptsReverted {
                chat_id: chat_id.clone(),
                reverted: pending,
            }));

        match result {
            Ok(_) => Err(ClientError::Rejected("mark-read")),
            Err(e) => Err(e.into()),
        }
    }
}
