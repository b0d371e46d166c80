use crate::types::chat::ChatKind;
use crate::types::message::MessageKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while decoding a realtime frame into a typed event.
#[derive(Debug, Error)]
pub enum EventParseError {
    #[error("unknown event kind: {0}")]
    UnknownKind(String),

    #[error("malformed {kind} payload: {source}")]
    Payload {
        kind: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// A message created in some chat of the account, pushed by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMessageEvent {
    pub id: String,
    pub chat_id: String,
    pub sender_id: String,
    pub content: String,
    #[serde(rename = "type")]
    pub kind: MessageKind,
    pub created_at: DateTime<Utc>,
}

/// A chat the account was just added to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewChatEvent {
    pub id: String,
    pub name: String,
    pub creator_id: String,
    #[serde(rename = "type")]
    pub kind: ChatKind,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypingEvent {
    pub chat_id: String,
    pub user_id: String,
    pub is_typing: bool,
    pub updated_at: DateTime<Utc>,
}

/// Another user went online or offline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresenceEvent {
    pub user_id: String,
    pub is_online: bool,
    #[serde(default)]
    pub last_online: Option<DateTime<Utc>>,
}

/// Server-side recount of unread messages for one chat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnreadCountEvent {
    pub chat_id: String,
    pub user_id: String,
    pub unread_count: u32,
    pub updated_at: DateTime<Utc>,
}

/// A typed realtime event, decoded from the transport's (kind, payload)
/// frames.
#[derive(Debug, Clone, PartialEq)]
pub enum RealtimeEvent {
    NewMessage(NewMessageEvent),
    NewChat(NewChatEvent),
    Typing(TypingEvent),
    Presence(PresenceEvent),
    UnreadCount(UnreadCountEvent),
}

impl RealtimeEvent {
    /// The wire name of this event kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NewMessage(_) => "newMessage",
            Self::NewChat(_) => "newChat",
            Self::Typing(_) => "typing",
            Self::Presence(_) => "presence",
            Self::UnreadCount(_) => "unreadCount",
        }
    }

    /// Decode a raw frame into a typed event. Unknown kinds and
    /// undecodable payloads are reported, not dropped silently; the
    /// caller decides whether to log or surface them.
    pub fn from_wire(kind: &str, payload: serde_json::Value) -> Result<Self, EventParseError> {
        fn decode<T: serde::de::DeserializeOwned>(
            kind: &'static str,
            payload: serde_json::Value,
        ) -> Result<T, EventParseError> {
            serde_json::from_value(payload).map_err(|source| EventParseError::Payload { kind, source })
        }

        match kind {
            "newMessage" => Ok(Self::NewMessage(decode("newMessage", payload)?)),
            "newChat" => Ok(Self::NewChat(decode("newChat", payload)?)),
            "typing" => Ok(Self::Typing(decode("typing", payload)?)),
            "presence" => Ok(Self::Presence(decode("presence", payload)?)),
            "unreadCount" => Ok(Self::UnreadCount(decode("unreadCount", payload)?)),
            other => Err(EventParseError::UnknownKind(other.to_string())),
        }
    }
}
