use crate::store::ordering;
use crate::types::{ChatKind, Message, MessagePatch, PageCursor, UserProfile};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Everything `set_chat` needs to (re)point the cache at a chat.
///
/// `other_profile` is only applied when `Some`, so a caller that does not
/// know the counterpart profile yet will not clobber one learned earlier.
/// `participants` and `kind` are applied unconditionally.
#[derive(Debug, Clone, Default)]
pub struct ChatInit {
    pub chat_id: String,
    pub chat_name: String,
    pub chat_image: String,
    pub chat_is_active: bool,
    pub other_profile: Option<UserProfile>,
    pub participants: Option<Vec<String>>,
    pub kind: Option<ChatKind>,
    pub messages: Option<Vec<Message>>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub total: Option<u32>,
    pub has_more: Option<bool>,
    pub loading: Option<bool>,
}

/// Message cache for the currently open chat.
///
/// Holds the message map keyed by id, the derived display order and the
/// unread id list. All mutations are synchronous and infallible; callers
/// deal with network failures before or after touching the cache.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatMessagesStore {
    pub chat_id: String,
    pub chat_name: String,
    pub chat_image: String,
    pub chat_is_active: bool,
    messages: HashMap<String, Message>,
    ordered_ids: Vec<String>,
    unread_ids: Vec<String>,
    marked_read_ids: Vec<String>,
    pub cursor: PageCursor,
    pub loading: bool,
    pub other_profile: Option<UserProfile>,
    pub participants: Option<Vec<String>>,
    pub kind: Option<ChatKind>,
}

impl ChatMessagesStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Full (re)initialization for a chat. Replaces the message set when
    /// `init.messages` is `Some`; otherwise the unread list keeps its
    /// previous contents even though the map is emptied.
    pub fn set_chat(&mut self, init: ChatInit) {
        self.chat_id = init.chat_id;
        self.chat_name = init.chat_name;
        self.chat_image = init.chat_image;
        self.chat_is_active = init.chat_is_active;
        if init.other_profile.is_some() {
            self.other_profile = init.other_profile;
        }
        self.participants = init.participants;
        self.kind = init.kind;
        self.messages.clear();
        self.ordered_ids.clear();
        if let Some(messages) = init.messages {
            self.insert_batch(messages);
            ordering::sort_ids_asc(&mut self.ordered_ids, &self.messages);
            self.unread_ids = self.ordered_ids.clone();
        }
        self.cursor.page = init.page.unwrap_or(1);
        self.cursor.per_page = init.per_page.unwrap_or(20);
        self.cursor.total = init.total.unwrap_or(0);
        self.cursor.has_more = init.has_more.unwrap_or(false);
        if let Some(loading) = init.loading {
            self.loading = loading;
        }
    }

    /// Resets the per-visit state when navigating away from a chat.
    /// `other_profile`, `participants` and `kind` survive until the next
    /// `set_chat`; so does the read-rollback buffer.
    pub fn clear(&mut self) {
        self.chat_id.clear();
        self.chat_name.clear();
        self.chat_image.clear();
        self.chat_is_active = false;
        self.messages.clear();
        self.ordered_ids.clear();
        self.unread_ids.clear();
        self.loading = false;
        self.cursor = PageCursor::default();
    }

    /// Replaces the message set for an already-initialized chat, e.g. when
    /// page 1 is refetched. Every loaded message starts out unread.
    pub fn set_initial_messages(&mut self, messages: Vec<Message>, cursor: PageCursor) {
        self.messages.clear();
        self.ordered_ids.clear();
        self.insert_batch(messages);
        ordering::sort_ids_asc(&mut self.ordered_ids, &self.messages);
        self.unread_ids = self.ordered_ids.clone();
        self.cursor = cursor;
    }

    /// Keyed merge of a further history page. An id already in the map is
    /// updated in place rather than duplicated. Merged ids are pushed onto
    /// the unread list whenever they are not on it yet, which re-flags
    /// messages that had already been marked read.
    pub fn append_messages(
        &mut self,
        messages: Vec<Message>,
        page: Option<u32>,
        per_page: Option<u32>,
    ) {
        for message in messages {
            let id = message.message_id.clone();
            if !self.unread_ids.contains(&id) {
                self.unread_ids.push(id.clone());
            }
            if self.messages.insert(id.clone(), message).is_none() {
                self.ordered_ids.push(id);
            }
        }
        ordering::sort_ids_asc(&mut self.ordered_ids, &self.messages);
        if let Some(page) = page {
            self.cursor.page = page;
        }
        if let Some(per_page) = per_page {
            self.cursor.per_page = per_page;
        }
    }

    /// Idempotent insert. A second call with an id already present leaves
    /// the cache untouched, which is what keeps an optimistic draft and a
    /// realtime echo of the same id from duplicating.
    pub fn add_message(&mut self, message: Message) {
        if self.messages.contains_key(&message.message_id) {
            return;
        }
        let id = message.message_id.clone();
        self.messages.insert(id.clone(), message);
        self.ordered_ids.push(id.clone());
        ordering::sort_ids_asc(&mut self.ordered_ids, &self.messages);
        if !self.unread_ids.contains(&id) {
            self.unread_ids.push(id);
        }
    }

    /// Merges the `Some` fields of `patch` into an existing message.
    /// Order is re-derived only when `created_at` actually changed.
    pub fn update_message(&mut self, message_id: &str, patch: MessagePatch) {
        let Some(message) = self.messages.get_mut(message_id) else {
            debug!(target: "Store", "Update for unknown message {message_id}, ignoring");
            return;
        };
        let reorder_needed = patch
            .created_at
            .is_some_and(|ts| ts != message.created_at);
        if let Some(content) = patch.content {
            message.content = Some(content);
        }
        if let Some(status) = patch.status {
            message.status = status;
        }
        if let Some(readed) = patch.readed {
            message.readed = readed;
        }
        if let Some(deleted) = patch.deleted {
            message.deleted = deleted;
        }
        if let Some(created_at) = patch.created_at {
            message.created_at = created_at;
        }
        if let Some(updated_at) = patch.updated_at {
            message.updated_at = updated_at;
        }
        if reorder_needed {
            ordering::sort_ids_asc(&mut self.ordered_ids, &self.messages);
        }
    }

    pub fn remove_message(&mut self, message_id: &str) {
        self.messages.remove(message_id);
        self.ordered_ids.retain(|id| id != message_id);
        self.unread_ids.retain(|id| id != message_id);
    }

    /// Flips every unread message to `readed` and snapshots the unread ids
    /// so a failed receipt submission can be undone. Pure local mutation;
    /// the network call is the caller's business.
    pub fn mark_all_read(&mut self) {
        debug!(target: "Store", "Marking {} messages as read", self.unread_ids.len());
        self.marked_read_ids = self.unread_ids.clone();
        for id in &self.unread_ids {
            if let Some(message) = self.messages.get_mut(id) {
                message.readed = true;
            }
        }
        self.unread_ids.clear();
    }

    /// Undoes the last `mark_all_read`. Safe to call when nothing was
    /// buffered.
    pub fn revert_mark_all_read(&mut self) {
        let buffered = std::mem::take(&mut self.marked_read_ids);
        for id in buffered {
            if let Some(message) = self.messages.get_mut(&id) {
                message.readed = false;
            }
            if !self.unread_ids.contains(&id) {
                self.unread_ids.push(id);
            }
        }
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub fn set_pagination(&mut self, cursor: PageCursor) {
        self.cursor = cursor;
    }

    pub fn get(&self, message_id: &str) -> Option<&Message> {
        self.messages.get(message_id)
    }

    pub fn contains(&self, message_id: &str) -> bool {
        self.messages.contains_key(message_id)
    }

    /// Messages in display order, ascending by `created_at`.
    pub fn ordered_messages(&self) -> Vec<&Message> {
        self.ordered_ids
            .iter()
            .filter_map(|id| self.messages.get(id))
            .collect()
    }

    pub fn ordered_ids(&self) -> &[String] {
        &self.ordered_ids
    }

    pub fn unread_ids(&self) -> &[String] {
        &self.unread_ids
    }

    pub fn marked_read_ids(&self) -> &[String] {
        &self.marked_read_ids
    }

    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    fn insert_batch(&mut self, messages: Vec<Message>) {
        for message in messages {
            let id = message.message_id.clone();
            if self.messages.insert(id.clone(), message).is_none() {
                self.ordered_ids.push(id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MessageKind, MessageStatus};
    use chrono::DateTime;

    fn msg(id: &str, secs: i64) -> Message {
        let ts = DateTime::from_timestamp(secs, 0).unwrap();
        Message {
            message_id: id.to_string(),
            chat_id: "chat-1".to_string(),
            sender_id: "user-1".to_string(),
            content: Some(format!("content-{id}")),
            kind: MessageKind::Text,
            status: MessageStatus::Sent,
            readed: false,
            deleted: false,
            created_at: ts,
            updated_at: ts,
        }
    }

    fn init_with(messages: Vec<Message>) -> ChatInit {
        ChatInit {
            chat_id: "chat-1".to_string(),
            chat_name: "Ana".to_string(),
            chat_image: "https://cdn.example/ana.png".to_string(),
            chat_is_active: true,
            messages: Some(messages),
            ..Default::default()
        }
    }

    #[test]
    fn test_add_message_is_idempotent() {
        let mut store = ChatMessagesStore::new();
        store.set_chat(init_with(vec![msg("a", 10)]));

        let mut duplicate = msg("a", 10);
        duplicate.content = Some("changed".to_string());
        store.add_message(duplicate);

        assert_eq!(store.message_count(), 1);
        assert_eq!(store.get("a").unwrap().content.as_deref(), Some("content-a"));
        assert_eq!(store.ordered_ids(), ["a".to_string()]);
    }

    #[test]
    fn test_ordered_messages_stay_sorted_across_mutations() {
        let mut store = ChatMessagesStore::new();
        store.set_chat(init_with(vec![msg("b", 20), msg("a", 10)]));
        store.add_message(msg("d", 40));
        store.append_messages(vec![msg("c", 30), msg("e", 50)], Some(2), None);
        store.update_message(
            "e",
            MessagePatch {
                created_at: Some(DateTime::from_timestamp(5, 0).unwrap()),
                ..Default::default()
            },
        );

        let ids: Vec<&str> = store
            .ordered_messages()
            .iter()
            .map(|m| m.message_id.as_str())
            .collect();
        assert_eq!(ids, ["e", "a", "b", "c", "d"]);
    }

    #[test]
    fn test_mark_all_read_round_trips() {
        let mut store = ChatMessagesStore::new();
        store.set_chat(init_with(vec![msg("a", 10), msg("b", 20), msg("c", 30)]));
        let unread_before = store.unread_ids().to_vec();

        store.mark_all_read();
        assert!(store.unread_ids().is_empty());
        assert!(store.ordered_messages().iter().all(|m| m.readed));

        store.revert_mark_all_read();
        assert_eq!(store.unread_ids(), unread_before.as_slice());
        assert!(store.ordered_messages().iter().all(|m| !m.readed));
        assert!(store.marked_read_ids().is_empty());
    }

    #[test]
    fn test_revert_without_pending_mark_is_a_no_op() {
        let mut store = ChatMessagesStore::new();
        store.set_chat(init_with(vec![msg("a", 10)]));
        let unread_before = store.unread_ids().to_vec();

        store.revert_mark_all_read();

        assert_eq!(store.unread_ids(), unread_before.as_slice());
        assert!(!store.get("a").unwrap().readed);
    }

    #[test]
    fn test_append_merges_by_id_instead_of_duplicating() {
        let mut store = ChatMessagesStore::new();
        store.set_chat(init_with(vec![msg("a", 10), msg("b", 20)]));

        let mut replacement = msg("b", 20);
        replacement.content = Some("edited".to_string());
        store.append_messages(vec![replacement, msg("c", 30)], Some(2), Some(20));

        assert_eq!(store.message_count(), 3);
        assert_eq!(store.get("b").unwrap().content.as_deref(), Some("edited"));
        assert_eq!(store.cursor.page, 2);
    }

    #[test]
    fn test_append_reflags_already_read_messages_as_unread() {
        let mut store = ChatMessagesStore::new();
        store.set_chat(init_with(vec![msg("a", 10)]));
        store.mark_all_read();
        assert!(store.unread_ids().is_empty());

        store.append_messages(vec![msg("a", 10)], None, None);
        assert_eq!(store.unread_ids(), ["a".to_string()]);
    }

    #[test]
    fn test_set_chat_keeps_known_counterpart_profile() {
        let mut store = ChatMessagesStore::new();
        let mut first = init_with(vec![]);
        first.other_profile = Some(crate::types::UserProfile {
            user_id: "user-2".to_string(),
            alias: "ana".to_string(),
            ..Default::default()
        });
        store.set_chat(first);

        store.set_chat(init_with(vec![msg("a", 10)]));
        assert_eq!(
            store.other_profile.as_ref().map(|p| p.user_id.as_str()),
            Some("user-2")
        );
    }

    #[test]
    fn test_set_chat_without_messages_leaves_unread_list_alone() {
        let mut store = ChatMessagesStore::new();
        store.set_chat(init_with(vec![msg("a", 10)]));
        assert_eq!(store.unread_ids(), ["a".to_string()]);

        let mut next = init_with(vec![]);
        next.messages = None;
        store.set_chat(next);

        assert_eq!(store.message_count(), 0);
        assert_eq!(store.unread_ids(), ["a".to_string()]);
    }

    #[test]
    fn test_clear_resets_messages_but_keeps_chat_metadata_extras() {
        let mut store = ChatMessagesStore::new();
        let mut init = init_with(vec![msg("a", 10)]);
        init.participants = Some(vec!["user-1".to_string(), "user-2".to_string()]);
        init.kind = Some(ChatKind::Private);
        store.set_chat(init);

        store.clear();

        assert!(store.chat_id.is_empty());
        assert_eq!(store.message_count(), 0);
        assert!(store.unread_ids().is_empty());
        assert_eq!(store.cursor, PageCursor::default());
        assert_eq!(store.participants.as_ref().map(Vec::len), Some(2));
        assert_eq!(store.kind, Some(ChatKind::Private));
    }

    #[test]
    fn test_remove_message_drops_it_everywhere() {
        let mut store = ChatMessagesStore::new();
        store.set_chat(init_with(vec![msg("a", 10), msg("b", 20)]));

        store.remove_message("a");

        assert!(store.get("a").is_none());
        assert_eq!(store.ordered_ids(), ["b".to_string()]);
        assert_eq!(store.unread_ids(), ["b".to_string()]);
    }

    #[test]
    fn test_update_for_unknown_id_is_ignored() {
        let mut store = ChatMessagesStore::new();
        store.set_chat(init_with(vec![msg("a", 10)]));

        store.update_message(
            "ghost",
            MessagePatch {
                readed: Some(true),
                ..Default::default()
            },
        );

        assert_eq!(store.message_count(), 1);
    }
}
