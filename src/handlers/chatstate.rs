use super::traits::RealtimeHandler;
use crate::client::Client;
use async_trait::async_trait;
use holacore::types::events::RealtimeEvent;
use log::debug;
use std::sync::Arc;

/// Handlers for the chat-state hint events (`typing`, `presence`,
/// `unreadCount`).
///
/// None of these touch a cache. They are logged at DEBUG level and
/// forwarded on the event bus for whoever renders indicators from them.

pub struct TypingHandler;

#[async_trait]
impl RealtimeHandler for TypingHandler {
    fn kind(&self) -> &'static str {
        "typing"
    }

    async fn handle(&self, client: Arc<Client>, event: &RealtimeEvent) -> bool {
        let RealtimeEvent::Typing(ev) = event else {
            return false;
        };
        debug!(
            target: "Client",
            "User {} {} typing in chat {}",
            ev.user_id,
            if ev.is_typing { "started" } else { "stopped" },
            ev.chat_id
        );
        let _ = client.event_bus.chat_typing.send(Arc::new(ev.clone()));
        true
    }
}

pub struct PresenceHandler;

#[async_trait]
impl RealtimeHandler for PresenceHandler {
    fn kind(&self) -> &'static str {
        "presence"
    }

    async fn handle(&self, client: Arc<Client>, event: &RealtimeEvent) -> bool {
        let RealtimeEvent::Presence(ev) = event else {
            return false;
        };
        debug!(
            target: "Client",
            "User {} is now {}",
            ev.user_id,
            if ev.is_online { "online" } else { "offline" }
        );
        let _ = client.event_bus.presence.send(Arc::new(ev.clone()));
        true
    }
}

pub struct UnreadCountHandler;

#[async_trait]
impl RealtimeHandler for UnreadCountHandler {
    fn kind(&self) -> &'static str {
        "unreadCount"
    }

    async fn handle(&self, client: Arc<Client>, event: &RealtimeEvent) -> bool {
        let RealtimeEvent::UnreadCount(ev) = event else {
            return false;
        };
        debug!(
            target: "Client",
            "Chat {} unread count recounted to {}",
            ev.chat_id, ev.unread_count
        );
        let _ = client.event_bus.unread_hint.send(Arc::new(ev.clone()));
        true
    }
}
