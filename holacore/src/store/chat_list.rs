use crate::types::{ChatSummary, LastMessagePatch, PageCursor};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Account-scoped chat list cache, keyed by chat id.
///
/// Lives across chat navigation; the per-chat message cache comes and goes,
/// this one only changes through explicit list mutations and realtime
/// patches.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatListStore {
    chats: HashMap<String, ChatSummary>,
    pub cursor: PageCursor,
}

impl ChatListStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Full replace, used when (re)loading page 1 of the list.
    pub fn set_chats(&mut self, chats: Vec<ChatSummary>, cursor: PageCursor) {
        self.chats = chats
            .into_iter()
            .map(|chat| (chat.chat_id.clone(), chat))
            .collect();
        self.cursor = cursor;
    }

    /// Keyed merge of a further page. An id already present is replaced by
    /// the incoming entry.
    pub fn append_chats(&mut self, chats: Vec<ChatSummary>, cursor: PageCursor) {
        for chat in chats {
            self.chats.insert(chat.chat_id.clone(), chat);
        }
        self.cursor = cursor;
    }

    pub fn add_chat(&mut self, chat: ChatSummary) {
        self.chats.insert(chat.chat_id.clone(), chat);
    }

    pub fn remove_chat(&mut self, chat_id: &str) {
        self.chats.remove(chat_id);
    }

    /// Overwrites the last-message snapshot of one chat. Touches nothing
    /// else on the entry, `last_message_updated_at` and the unread count
    /// included. Unknown chat ids are ignored.
    pub fn update_last_message(&mut self, chat_id: &str, patch: LastMessagePatch) {
        let Some(chat) = self.chats.get_mut(chat_id) else {
            debug!(target: "Store", "Last-message patch for unknown chat {chat_id}, ignoring");
            return;
        };
        chat.last_message_id = patch.message_id;
        chat.last_message_content = patch.content;
        chat.last_message_status = patch.status;
        chat.last_message_created_at = patch.created_at;
    }

    pub fn set_unread_count(&mut self, chat_id: &str, count: u32) {
        if let Some(chat) = self.chats.get_mut(chat_id) {
            chat.unreaded_count = count;
        }
    }

    pub fn get(&self, chat_id: &str) -> Option<&ChatSummary> {
        self.chats.get(chat_id)
    }

    pub fn contains(&self, chat_id: &str) -> bool {
        self.chats.contains_key(chat_id)
    }

    /// Chats ordered by most recent last message first, recomputed on each
    /// call.
    pub fn sorted_chats(&self) -> Vec<&ChatSummary> {
        let mut chats: Vec<&ChatSummary> = self.chats.values().collect();
        chats.sort_by(|a, b| b.last_message_created_at.cmp(&a.last_message_created_at));
        chats
    }

    pub fn len(&self) -> usize {
        self.chats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chats.is_empty()
    }
}
