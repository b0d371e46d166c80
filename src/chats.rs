use crate::api::NewChatRequest;
use crate::client::{Client, ClientError};
use crate::types::events::StoreKind;
use holacore::store::ChatInit;
use holacore::types::{ChatSummary, LastMessagePatch};
use log::{debug, info};
use std::sync::Arc;
use std::sync::atomic::Ordering;

impl Client {
    /// Points the message cache at a chat and fetches its first page.
    ///
    /// The identity fields are written synchronously so the view can render
    /// its header before the network answers. A navigation that happens
    /// while the fetch is in flight bumps the chat generation, and the late
    /// result is discarded instead of applied to the wrong chat.
    pub async fn open_chat(
        self: &Arc<Self>,
        chat_id: impl Into<String>,
        name: impl Into<String>,
        image: impl Into<String>,
        is_active: bool,
    ) -> Result<(), ClientError> {
        let chat_id = chat_id.into();
        let generation = self.bump_chat_generation();
        {
            let mut messages = self.chat_messages.write().await;
            messages.set_chat(ChatInit {
                chat_id: chat_id.clone(),
                chat_name: name.into(),
                chat_image: image.into(),
                chat_is_active: is_active,
                loading: Some(true),
                ..Default::default()
            });
        }
        self.notify_store_changed(StoreKind::ChatMessages);

        let result = self
            .chat_api
            .fetch_chat_messages(&chat_id, 1, self.config.page_size)
            .await;

        // A navigation that raced this fetch bumps the generation before
        // its identity write, so checking under the write guard is what
        // keeps a stale page out of the store it no longer belongs to.
        let mut store = self.chat_messages.write().await;
        if self.current_chat_generation() != generation {
            debug!(target: "Client", "Discarding stale message fetch for chat {chat_id}");
            return Ok(());
        }
        store.set_loading(false);
        let page = match result {
            Ok(page) => page,
            Err(e) => {
                drop(store);
                self.notify_store_changed(StoreKind::ChatMessages);
                return Err(e.into());
            }
        };

        store.set_initial_messages(page.messages, page.cursor);
        if let Some(profile) = page.other_user_profile {
            self.profile_cache
                .insert(profile.user_id.clone(), profile.clone());
            store.other_profile = Some(profile);
        }
        drop(store);
        self.notify_store_changed(StoreKind::ChatMessages);
        Ok(())
    }

    /// Clears the per-visit message cache when navigating away.
    pub async fn close_chat(&self) {
        self.bump_chat_generation();
        {
            let mut messages = self.chat_messages.write().await;
            messages.clear();
        }
        self.notify_store_changed(StoreKind::ChatMessages);
    }

    /// Fetches the next older history page for the open chat and merges it
    /// in. Returns `false` when there was nothing to load or the result
    /// arrived for a chat no longer open.
    pub async fn load_older_messages(self: &Arc<Self>) -> Result<bool, ClientError> {
        // The generation is captured under the same read lock as the chat
        // id, so a navigation cannot slip between the two and hand this
        // task a snapshot of one chat with the generation of another.
        let (chat_id, cursor, generation) = {
            let store = self.chat_messages.read().await;
            if store.chat_id.is_empty() {
                return Err(ClientError::NoChatOpen);
            }
            (
                store.chat_id.clone(),
                store.cursor,
                self.current_chat_generation(),
            )
        };
        if !cursor.has_more {
            return Ok(false);
        }

        let page = self
            .chat_api
            .fetch_chat_messages(&chat_id, cursor.page + 1, cursor.per_page)
            .await?;

        {
            let mut store = self.chat_messages.write().await;
            if self.current_chat_generation() != generation || store.chat_id != chat_id {
                debug!(target: "Client", "Discarding stale history page for chat {chat_id}");
                return Ok(false);
            }
            store.append_messages(page.messages, None, None);
            store.set_pagination(page.cursor);
        }
        self.notify_store_changed(StoreKind::ChatMessages);
        Ok(true)
    }

    /// Replaces the chat list with a fresh page 1. Only one sync runs at a
    /// time; a second call while the first is in flight is rejected.
    pub async fn sync_chat_list(self: &Arc<Self>) -> Result<(), ClientError> {
        if self.is_syncing_chats.swap(true, Ordering::SeqCst) {
            return Err(ClientError::AlreadySyncing);
        }

        let _guard = scopeguard::guard((), |_| {
            self.is_syncing_chats.store(false, Ordering::Relaxed);
        });

        let page = self.chat_api.fetch_chat_list(1, self.config.page_size).await?;
        info!(
            target: "Client",
            "Synced chat list: {} chats of {} total",
            page.chats.len(),
            page.cursor.total
        );
        {
            let mut list = self.chat_list.write().await;
            list.set_chats(page.chats, page.cursor);
        }
        self.notify_store_changed(StoreKind::ChatList);
        Ok(())
    }

    /// Fetches the next chat-list page and merges it in. Returns `false`
    /// when the cursor says there is nothing further.
    pub async fn load_more_chats(self: &Arc<Self>) -> Result<bool, ClientError> {
        let cursor = self.chat_list.read().await.cursor;
        if !cursor.has_more {
            return Ok(false);
        }

        let page = self
            .chat_api
            .fetch_chat_list(cursor.page + 1, cursor.per_page)
            .await?;
        {
            let mut list = self.chat_list.write().await;
            list.append_chats(page.chats, page.cursor);
        }
        self.notify_store_changed(StoreKind::ChatList);
        Ok(true)
    }

    /// Creates a chat and inserts the server's summary into the list. The
    /// backend de-duplicates private chats, so creating one with an
    /// existing counterpart hands back the old entry and the keyed insert
    /// stays idempotent.
    pub async fn create_chat(
        self: &Arc<Self>,
        request: NewChatRequest,
    ) -> Result<ChatSummary, ClientError> {
        let chat = self.chat_api.create_chat(request).await?;
        info!(target: "Client", "Created chat {}", chat.chat_id);
        {
            let mut list = self.chat_list.write().await;
            list.add_chat(chat.clone());
        }
        self.notify_store_changed(StoreKind::ChatList);
        Ok(chat)
    }

    /// Applies a last-message patch to the chat list. With strict ordering
    /// enabled, a patch older than the stored snapshot is dropped; the
    /// stock behavior is last-write-wins by arrival order.
    pub(crate) async fn apply_last_message_patch(&self, chat_id: &str, patch: LastMessagePatch) {
        {
            let mut list = self.chat_list.write().await;
            if self.config.strict_last_message_ordering
                && let Some(chat) = list.get(chat_id)
                && patch.created_at < chat.last_message_created_at
            {
                debug!(target: "Client", "Dropping stale last-message patch for chat {chat_id}");
                return;
            }
            list.update_last_message(chat_id, patch);
        }
        self.notify_store_changed(StoreKind::ChatList);
    }
}
