use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Delivery state of a message as tracked by the client.
///
/// Round-trips through the backend's lowercase wire strings; anything
/// unrecognized is preserved as `Unknown` instead of failing the payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MessageStatus {
    Sending,
    Sent,
    Delivered,
    Read,
    Received,
    Unknown(String),
}

impl From<String> for MessageStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "sending" => Self::Sending,
            "sent" => Self::Sent,
            "delivered" => Self::Delivered,
            "read" => Self::Read,
            "received" => Self::Received,
            _ => Self::Unknown(s),
        }
    }
}

impl From<MessageStatus> for String {
    fn from(status: MessageStatus) -> Self {
        match status {
            MessageStatus::Sending => "sending".to_string(),
            MessageStatus::Sent => "sent".to_string(),
            MessageStatus::Delivered => "delivered".to_string(),
            MessageStatus::Read => "read".to_string(),
            MessageStatus::Received => "received".to_string(),
            MessageStatus::Unknown(s) => s,
        }
    }
}

/// Content type of a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MessageKind {
    Text,
    Image,
    Other(String),
}

impl From<String> for MessageKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            "text" => Self::Text,
            "image" => Self::Image,
            _ => Self::Other(s),
        }
    }
}

impl From<MessageKind> for String {
    fn from(kind: MessageKind) -> Self {
        match kind {
            MessageKind::Text => "text".to_string(),
            MessageKind::Image => "image".to_string(),
            MessageKind::Other(s) => s,
        }
    }
}

/// A single chat message as held by the client caches.
///
/// `message_id` is either a server-assigned id or a client-local
/// `temp-...` id for an optimistic entry that has not been acknowledged.
/// For image messages, `content` carries the image URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub message_id: String,
    pub chat_id: String,
    pub sender_id: String,
    pub content: Option<String>,
    pub kind: MessageKind,
    pub status: MessageStatus,
    pub readed: bool,
    pub deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial update for a cached message. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct MessagePatch {
    pub content: Option<String>,
    pub status: Option<MessageStatus>,
    pub readed: Option<bool>,
    pub deleted: Option<bool>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip_known_values() {
        for raw in ["sending", "sent", "delivered", "read", "received"] {
            let status = MessageStatus::from(raw.to_string());
            assert!(!matches!(status, MessageStatus::Unknown(_)));
            assert_eq!(String::from(status), raw);
        }
    }

    #[test]
    fn test_status_unknown_preserved() {
        let status = MessageStatus::from("played".to_string());
        assert_eq!(status, MessageStatus::Unknown("played".to_string()));
        assert_eq!(String::from(status), "played");
    }

    #[test]
    fn test_kind_fallback() {
        assert_eq!(MessageKind::from("text".to_string()), MessageKind::Text);
        assert_eq!(
            MessageKind::from("voice".to_string()),
            MessageKind::Other("voice".to_string())
        );
    }
}
