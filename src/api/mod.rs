pub mod dto;

use async_trait::async_trait;
use holacore::types::{
    ChatKind, ChatSummary, Message, MessageKind, PageCursor, ProfilePatch, SwipeCandidate,
    UserProfile,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("transport error: {0}")]
    Transport(#[from] anyhow::Error),
    #[error("malformed payload: {0}")]
    Payload(String),
}

pub type Result<T> = std::result::Result<T, ApiError>;

/// One page of the account's chat list.
#[derive(Debug, Clone)]
pub struct ChatListPage {
    pub chats: Vec<ChatSummary>,
    pub cursor: PageCursor,
}

/// One page of a chat's message history. The backend resolves the
/// counterpart profile for private chats alongside page 1.
#[derive(Debug, Clone)]
pub struct MessagePage {
    pub messages: Vec<Message>,
    pub cursor: PageCursor,
    pub other_user_profile: Option<UserProfile>,
}

#[derive(Debug, Clone)]
pub struct NewChatRequest {
    pub kind: ChatKind,
    pub name: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub participants: Vec<String>,
}

/// Chat and message operations of the backend, abstracted away from any
/// concrete transport. Implementations parse wire payloads through the
/// [`dto`] types so the rest of the client only ever sees validated
/// domain values.
#[async_trait]
pub trait ChatApi: Send + Sync {
    async fn fetch_chat_list(&self, page: u32, per_page: u32) -> Result<ChatListPage>;

    async fn fetch_chat_messages(
        &self,
        chat_id: &str,
        page: u32,
        per_page: u32,
    ) -> Result<MessagePage>;

    /// Submits a message. The server replies with an accepted flag only;
    /// no canonical echo of the stored message comes back.
    async fn send_message(
        &self,
        chat_id: &str,
        content: Option<String>,
        kind: MessageKind,
    ) -> Result<bool>;

    async fn mark_all_read(&self, chat_id: &str) -> Result<bool>;

    /// Creates a chat. Creating a private chat with an existing
    /// counterpart returns the already existing chat.
    async fn create_chat(&self, request: NewChatRequest) -> Result<ChatSummary>;
}

/// Profile, matchmaking and presence operations of the backend.
#[async_trait]
pub trait ProfileApi: Send + Sync {
    async fn fetch_swipeable_profiles(
        &self,
        max_distance_km: f64,
        limit: u32,
    ) -> Result<Vec<SwipeCandidate>>;

    async fn submit_swipe(&self, target_user_id: &str, liked: bool) -> Result<bool>;

    async fn fetch_profile(&self, user_id: &str) -> Result<UserProfile>;

    async fn set_presence(&self, online: bool) -> Result<bool>;

    async fn update_profile(&self, patch: &ProfilePatch) -> Result<bool>;
}
