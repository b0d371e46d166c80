//! Scripted in-memory collaborators for tests and the demo binary.

use crate::api::{
    ApiError, ChatApi, ChatListPage, MessagePage, NewChatRequest, ProfileApi, Result,
};
use crate::client::Client;
use crate::config::ClientConfig;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use holacore::types::{
    ChatKind, ChatSummary, Message, MessageKind, MessageStatus, PageCursor, ProfilePatch,
    SwipeCandidate, UserProfile,
};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::{Mutex, Notify};

/// ChatApi double that serves pre-loaded pages and records every call.
/// Failure switches make the corresponding operation fail until cleared.
#[derive(Default)]
pub struct MockChatApi {
    pub chat_pages: Mutex<VecDeque<ChatListPage>>,
    pub message_pages: Mutex<VecDeque<MessagePage>>,
    pub created_chats: Mutex<VecDeque<ChatSummary>>,

    pub fail_sends: AtomicBool,
    pub reject_sends: AtomicBool,
    pub reject_mark_read: AtomicBool,

    pub sent: Mutex<Vec<(String, Option<String>)>>,
    pub marked_read: Mutex<Vec<String>>,

    message_gate: Mutex<Option<Arc<Notify>>>,
    chat_list_gate: Mutex<Option<Arc<Notify>>>,
}

impl MockChatApi {
    pub async fn queue_chat_page(&self, page: ChatListPage) {
        self.chat_pages.lock().await.push_back(page);
    }

    pub async fn queue_message_page(&self, page: MessagePage) {
        self.message_pages.lock().await.push_back(page);
    }

    pub async fn queue_created_chat(&self, chat: ChatSummary) {
        self.created_chats.lock().await.push_back(chat);
    }

    /// Makes every following message fetch block until the returned handle
    /// is notified, so a test can interleave other work mid-flight.
    pub async fn gate_message_fetches(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.message_gate.lock().await = Some(gate.clone());
        gate
    }

    /// Same as [`Self::gate_message_fetches`] but for chat-list fetches.
    pub async fn gate_chat_list_fetches(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.chat_list_gate.lock().await = Some(gate.clone());
        gate
    }
}

#[async_trait]
impl ChatApi for MockChatApi {
    async fn fetch_chat_list(&self, _page: u32, _per_page: u32) -> Result<ChatListPage> {
        let gate = self.chat_list_gate.lock().await.clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        self.chat_pages
            .lock()
            .await
            .pop_front()
            .ok_or_else(|| ApiError::Transport(anyhow::anyhow!("no scripted chat page")))
    }

    async fn fetch_chat_messages(
        &self,
        _chat_id: &str,
        _page: u32,
        _per_page: u32,
    ) -> Result<MessagePage> {
        let gate = self.message_gate.lock().await.clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        self.message_pages
            .lock()
            .await
            .pop_front()
            .ok_or_else(|| ApiError::Transport(anyhow::anyhow!("no scripted message page")))
    }

    async fn send_message(
        &self,
        chat_id: &str,
        content: Option<String>,
        _kind: MessageKind,
    ) -> Result<bool> {
        self.sent
            .lock()
            .await
            .push((chat_id.to_string(), content));
        if self.fail_sends.load(Ordering::SeqCst) {
            return Err(ApiError::Transport(anyhow::anyhow!(
                "scripted transport failure"
            )));
        }
        Ok(!self.reject_sends.load(Ordering::SeqCst))
    }

    async fn mark_all_read(&self, chat_id: &str) -> Result<bool> {
        self.marked_read.lock().await.push(chat_id.to_string());
        Ok(!self.reject_mark_read.load(Ordering::SeqCst))
    }

    async fn create_chat(&self, _request: NewChatRequest) -> Result<ChatSummary> {
        self.created_chats
            .lock()
            .await
            .pop_front()
            .ok_or_else(|| ApiError::Transport(anyhow::anyhow!("no scripted created chat")))
    }
}

/// ProfileApi double with the same scripting scheme.
#[derive(Default)]
pub struct MockProfileApi {
    pub candidate_batches: Mutex<VecDeque<Vec<SwipeCandidate>>>,
    pub profiles: Mutex<HashMap<String, UserProfile>>,

    pub reject_swipes: AtomicBool,
    pub reject_presence: AtomicBool,
    pub reject_profile_updates: AtomicBool,

    pub swipes: Mutex<Vec<(String, bool)>>,
    pub candidate_fetches: AtomicUsize,
}

impl MockProfileApi {
    pub async fn queue_candidates(&self, batch: Vec<SwipeCandidate>) {
        self.candidate_batches.lock().await.push_back(batch);
    }

    pub async fn put_profile(&self, profile: UserProfile) {
        self.profiles
            .lock()
            .await
            .insert(profile.user_id.clone(), profile);
    }
}

#[async_trait]
impl ProfileApi for MockProfileApi {
    async fn fetch_swipeable_profiles(
        &self,
        _max_distance_km: f64,
        _limit: u32,
    ) -> Result<Vec<SwipeCandidate>> {
        self.candidate_fetches.fetch_add(1, Ordering::SeqCst);
        // An unscripted fetch is a server that ran out of nearby profiles.
        Ok(self
            .candidate_batches
            .lock()
            .await
            .pop_front()
            .unwrap_or_default())
    }

    async fn submit_swipe(&self, target_user_id: &str, liked: bool) -> Result<bool> {
        self.swipes
            .lock()
            .await
            .push((target_user_id.to_string(), liked));
        Ok(!self.reject_swipes.load(Ordering::SeqCst))
    }

    async fn fetch_profile(&self, user_id: &str) -> Result<UserProfile> {
        self.profiles
            .lock()
            .await
            .get(user_id)
            .cloned()
            .ok_or_else(|| ApiError::Transport(anyhow::anyhow!("no scripted profile {user_id}")))
    }

    async fn set_presence(&self, _online: bool) -> Result<bool> {
        Ok(!self.reject_presence.load(Ordering::SeqCst))
    }

    async fn update_profile(&self, _patch: &ProfilePatch) -> Result<bool> {
        Ok(!self.reject_profile_updates.load(Ordering::SeqCst))
    }
}

pub fn test_client() -> Arc<Client> {
    test_client_with_mocks("user-1").0
}

pub fn test_client_with_mocks(user_id: &str) -> (Arc<Client>, Arc<MockChatApi>, Arc<MockProfileApi>) {
    test_client_with_config(user_id, ClientConfig::default())
}

pub fn test_client_with_config(
    user_id: &str,
    config: ClientConfig,
) -> (Arc<Client>, Arc<MockChatApi>, Arc<MockProfileApi>) {
    let chat_api = Arc::new(MockChatApi::default());
    let profile_api = Arc::new(MockProfileApi::default());
    let client = Client::new(user_id, chat_api.clone(), profile_api.clone(), config);
    (client, chat_api, profile_api)
}

pub fn ts(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).expect("timestamp should be valid")
}

pub fn message(id: &str, chat_id: &str, sender_id: &str, secs: i64) -> Message {
    Message {
        message_id: id.to_string(),
        chat_id: chat_id.to_string(),
        sender_id: sender_id.to_string(),
        content: Some(format!("content-{id}")),
        kind: MessageKind::Text,
        status: MessageStatus::Sent,
        readed: false,
        deleted: false,
        created_at: ts(secs),
        updated_at: ts(secs),
    }
}

pub fn chat_summary(chat_id: &str, last_secs: i64) -> ChatSummary {
    ChatSummary {
        chat_id: chat_id.to_string(),
        name: format!("chat-{chat_id}"),
        image: String::new(),
        description: String::new(),
        kind: ChatKind::Private,
        last_message_id: format!("m-{chat_id}"),
        last_message_content: "hola".to_string(),
        last_message_status: MessageStatus::Sent,
        last_message_created_at: ts(last_secs),
        last_message_updated_at: ts(last_secs),
        unreaded_count: 0,
        participants: vec!["user-1".to_string(), "user-2".to_string()],
        is_active: true,
        created_at: ts(1),
        updated_at: ts(last_secs),
    }
}

pub fn candidate(user_id: &str) -> SwipeCandidate {
    SwipeCandidate {
        profile: UserProfile {
            user_id: user_id.to_string(),
            alias: format!("alias-{user_id}"),
            name: format!("name-{user_id}"),
            age: 25,
            is_active: true,
            ..Default::default()
        },
        distance_km: 3.0,
    }
}

pub fn message_page(messages: Vec<Message>, cursor: PageCursor) -> MessagePage {
    MessagePage {
        messages,
        cursor,
        other_user_profile: None,
    }
}

pub fn chat_page(chats: Vec<ChatSummary>, cursor: PageCursor) -> ChatListPage {
    ChatListPage { chats, cursor }
}
