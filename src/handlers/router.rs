use super::traits::RealtimeHandler;
use crate::client::Client;
use holacore::types::events::RealtimeEvent;
use std::collections::HashMap;
use std::sync::Arc;

/// Central router for dispatching realtime events to their appropriate handlers.
///
/// The router maintains a registry of handlers keyed by event kind and efficiently
/// dispatches incoming events to the correct handler based on the event's kind tag.
pub struct EventRouter {
    /// Map of event kind -> handler for fast lookups
    handlers: HashMap<&'static str, Arc<dyn RealtimeHandler>>,
}

impl EventRouter {
    /// Create a new empty router.
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Register a handler for a specific event kind.
    ///
    /// # Arguments
    /// * `handler` - The handler implementation to register
    ///
    /// # Panics
    /// Panics if a handler is already registered for the same kind to prevent
    /// accidental overwrites during initialization.
    pub fn register(&mut self, handler: Arc<dyn RealtimeHandler>) {
        let kind = handler.kind();
        if self.handlers.insert(kind, handler).is_some() {
            panic!("Handler for kind '{}' already registered", kind);
        }
    }

    /// Dispatch an event to its appropriate handler.
    ///
    /// # Arguments
    /// * `client` - Arc reference to the client instance
    /// * `event` - The realtime event to dispatch
    ///
    /// # Returns
    /// Returns `true` if a handler was found and successfully processed the event,
    /// `false` if no handler was registered for the event's kind or the handler
    /// indicated it couldn't process the event.
    pub async fn dispatch(&self, client: Arc<Client>, event: &RealtimeEvent) -> bool {
        if let Some(handler) = self.handlers.get(event.kind()) {
            handler.handle(client, event).await
        } else {
            false
        }
    }

    /// Get the number of registered handlers (useful for testing).
    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }
}

impl Default for EventRouter {
    fn default() -> Self {
        Self::new()
    }
}
