//! Wire payload shapes for the backend's REST responses.
//!
//! The backend's JSON is loosely typed: optional fields come and go,
//! counters arrive sometimes as numbers and sometimes as decimal strings,
//! and legacy rows can miss their timestamps entirely. Everything is
//! validated here at the edge, so the caches only ever hold well-formed
//! domain values.

use crate::api::{ApiError, ChatListPage, MessagePage};
use chrono::{DateTime, Utc};
use holacore::types::{
    ChatKind, ChatSummary, Message, MessageKind, MessageStatus, PageCursor, SwipeCandidate,
    UserProfile,
};
use serde::Deserialize;

fn default_true() -> bool {
    true
}

/// A counter the backend serializes either as a number or as a decimal
/// string, depending on which service produced the row.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CountValue {
    Number(u32),
    Text(String),
}

impl CountValue {
    pub fn parse(&self) -> Result<u32, ApiError> {
        match self {
            CountValue::Number(n) => Ok(*n),
            CountValue::Text(s) if s.trim().is_empty() => Ok(0),
            CountValue::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| ApiError::Payload(format!("'{s}' is not a count"))),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageDto {
    pub id: String,
    // One endpoint still emits snake_case here.
    #[serde(alias = "chat_id")]
    pub chat_id: String,
    pub sender_id: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub readed: bool,
    #[serde(default)]
    pub deleted: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl TryFrom<MessageDto> for Message {
    type Error = ApiError;

    fn try_from(dto: MessageDto) -> Result<Self, ApiError> {
        if dto.id.is_empty() {
            return Err(ApiError::Payload("message id is empty".to_string()));
        }
        if dto.chat_id.is_empty() {
            return Err(ApiError::Payload(format!(
                "message {} has no chat id",
                dto.id
            )));
        }
        let created_at = dto.created_at.unwrap_or(DateTime::UNIX_EPOCH);
        Ok(Message {
            message_id: dto.id,
            chat_id: dto.chat_id,
            sender_id: dto.sender_id,
            content: dto.content,
            kind: dto.kind.map(MessageKind::from).unwrap_or(MessageKind::Text),
            status: dto
                .status
                .map(MessageStatus::from)
                .unwrap_or(MessageStatus::Sent),
            readed: dto.readed,
            deleted: dto.deleted,
            created_at,
            updated_at: dto.updated_at.unwrap_or(created_at),
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatDto {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub last_message_id: Option<String>,
    #[serde(default)]
    pub last_message_content: Option<String>,
    #[serde(default)]
    pub last_message_status: Option<String>,
    #[serde(default)]
    pub last_message_created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_message_updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub unreaded_count: Option<CountValue>,
    #[serde(default)]
    pub participants: Vec<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl TryFrom<ChatDto> for ChatSummary {
    type Error = ApiError;

    fn try_from(dto: ChatDto) -> Result<Self, ApiError> {
        if dto.id.is_empty() {
            return Err(ApiError::Payload("chat id is empty".to_string()));
        }
        let unreaded_count = match &dto.unreaded_count {
            Some(count) => count.parse()?,
            None => 0,
        };
        let last_message_created_at = dto.last_message_created_at.unwrap_or(DateTime::UNIX_EPOCH);
        let created_at = dto.created_at.unwrap_or(DateTime::UNIX_EPOCH);
        Ok(ChatSummary {
            chat_id: dto.id,
            name: dto.name.unwrap_or_default(),
            image: dto.image.unwrap_or_default(),
            description: dto.description.unwrap_or_default(),
            kind: dto.kind.map(ChatKind::from).unwrap_or(ChatKind::Private),
            last_message_id: dto.last_message_id.unwrap_or_default(),
            last_message_content: dto.last_message_content.unwrap_or_default(),
            last_message_status: dto
                .last_message_status
                .map(MessageStatus::from)
                .unwrap_or(MessageStatus::Sent),
            last_message_created_at,
            last_message_updated_at: dto
                .last_message_updated_at
                .unwrap_or(last_message_created_at),
            unreaded_count,
            participants: dto.participants,
            is_active: dto.is_active,
            created_at,
            updated_at: dto.updated_at.unwrap_or(created_at),
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileDto {
    pub id: String,
    #[serde(default)]
    pub alias: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub secondary_images: Vec<String>,
    #[serde(default)]
    pub biography: Option<String>,
    #[serde(default)]
    pub gender: Option<i32>,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub birth_date: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub is_online: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub last_online: Option<DateTime<Utc>>,
    /// Distance from the requesting user, only present on geospatial
    /// query results.
    #[serde(default)]
    pub distance: Option<f64>,
}

impl TryFrom<ProfileDto> for UserProfile {
    type Error = ApiError;

    fn try_from(dto: ProfileDto) -> Result<Self, ApiError> {
        if dto.id.is_empty() {
            return Err(ApiError::Payload("profile id is empty".to_string()));
        }
        Ok(UserProfile {
            user_id: dto.id,
            alias: dto.alias.unwrap_or_default(),
            name: dto.name.unwrap_or_default(),
            avatar: dto.avatar.unwrap_or_default(),
            secondary_images: dto.secondary_images,
            biography: dto.biography.unwrap_or_default(),
            gender: dto.gender.unwrap_or_default(),
            age: dto.age.unwrap_or_default(),
            birth_date: dto.birth_date.unwrap_or_default(),
            latitude: dto.latitude.unwrap_or_default(),
            longitude: dto.longitude.unwrap_or_default(),
            is_online: dto.is_online,
            is_active: dto.is_active,
            last_online: dto.last_online,
        })
    }
}

impl TryFrom<ProfileDto> for SwipeCandidate {
    type Error = ApiError;

    fn try_from(dto: ProfileDto) -> Result<Self, ApiError> {
        let distance_km = dto.distance.unwrap_or_default();
        Ok(SwipeCandidate {
            profile: UserProfile::try_from(dto)?,
            distance_km,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatListResponseDto {
    #[serde(default)]
    pub chats: Vec<ChatDto>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub per_page: Option<u32>,
    #[serde(default)]
    pub total: Option<u32>,
    #[serde(default)]
    pub has_more: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageListResponseDto {
    #[serde(default)]
    pub messages: Vec<MessageDto>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub per_page: Option<u32>,
    #[serde(default)]
    pub total: Option<u32>,
    #[serde(default)]
    pub has_more: Option<bool>,
    #[serde(default)]
    pub other_user_profile: Option<ProfileDto>,
}

fn cursor_from(
    page: Option<u32>,
    per_page: Option<u32>,
    total: Option<u32>,
    has_more: Option<bool>,
) -> PageCursor {
    let defaults = PageCursor::default();
    PageCursor {
        page: page.unwrap_or(defaults.page),
        per_page: per_page.unwrap_or(defaults.per_page),
        total: total.unwrap_or(defaults.total),
        has_more: has_more.unwrap_or(defaults.has_more),
    }
}

impl TryFrom<ChatListResponseDto> for ChatListPage {
    type Error = ApiError;

    fn try_from(dto: ChatListResponseDto) -> Result<Self, ApiError> {
        let cursor = cursor_from(dto.page, dto.per_page, dto.total, dto.has_more);
        let chats = dto
            .chats
            .into_iter()
            .map(ChatSummary::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ChatListPage { chats, cursor })
    }
}

impl TryFrom<MessageListResponseDto> for MessagePage {
    type Error = ApiError;

    fn try_from(dto: MessageListResponseDto) -> Result<Self, ApiError> {
        let cursor = cursor_from(dto.page, dto.per_page, dto.total, dto.has_more);
        let messages = dto
            .messages
            .into_iter()
            .map(Message::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        let other_user_profile = dto
            .other_user_profile
            .map(UserProfile::try_from)
            .transpose()?;
        Ok(MessagePage {
            messages,
            cursor,
            other_user_profile,
        })
    }
}
