// Re-export core modules for compatibility
pub use holacore::store::{ChatInit, ChatListStore, ChatMessagesStore, SwipeQueue};

// Core types are re-exported, but events (with EventBus) remain here for platform-specific functionality
pub mod types {
    pub use holacore::types::*;
    pub mod events;
}

// Platform-specific modules remain here
pub mod api;
pub mod chats;
pub mod client;
pub mod config;
pub mod handlers;
pub mod presence;
pub mod profile;
pub mod receipt;
pub mod send;
pub mod store;
pub mod swipe;
pub mod test_utils;

pub use client::Client;
pub use config::ClientConfig;
