use crate::types::message::MessageStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ChatKind {
    Private,
    Group,
    Other(String),
}

impl From<String> for ChatKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            "private" => Self::Private,
            "group" => Self::Group,
            _ => Self::Other(s),
        }
    }
}

impl From<ChatKind> for String {
    fn from(kind: ChatKind) -> Self {
        match kind {
            ChatKind::Private => "private".to_string(),
            ChatKind::Group => "group".to_string(),
            ChatKind::Other(s) => s,
        }
    }
}

/// Pagination state for an incrementally fetched collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageCursor {
    pub page: u32,
    pub per_page: u32,
    pub total: u32,
    pub has_more: bool,
}

impl Default for PageCursor {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 20,
            total: 0,
            has_more: false,
        }
    }
}

/// A chat as it appears in the account's chat list, with the last-message
/// snapshot denormalized onto it so the list can render without loading
/// any message cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatSummary {
    pub chat_id: String,
    pub name: String,
    pub image: String,
    pub description: String,
    pub kind: ChatKind,
    pub last_message_id: String,
    pub last_message_content: String,
    pub last_message_status: MessageStatus,
    pub last_message_created_at: DateTime<Utc>,
    pub last_message_updated_at: DateTime<Utc>,
    pub unreaded_count: u32,
    pub participants: Vec<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Targeted patch for the denormalized last-message snapshot of one chat.
///
/// `is_by_me` is advisory for callers deciding ordering or notification
/// policy; the chat list itself keeps no per-author state.
#[derive(Debug, Clone)]
pub struct LastMessagePatch {
    pub message_id: String,
    pub content: String,
    pub status: MessageStatus,
    pub is_by_me: bool,
    pub created_at: DateTime<Utc>,
}
