use crate::client::Client;
use async_trait::async_trait;
use holacore::types::events::RealtimeEvent;
use std::sync::Arc;

/// Trait for handling one kind of realtime event pushed by the backend.
///
/// Each handler is responsible for a single event kind (e.g. "newMessage", "typing").
/// This pattern allows for better separation of concerns and makes it easier to add
/// new event kinds without modifying the core client dispatch logic.
#[async_trait]
pub trait RealtimeHandler: Send + Sync {
    /// Returns the event kind this handler is responsible for (e.g. "newMessage").
    fn kind(&self) -> &'static str;

    /// Asynchronously handle the incoming event.
    ///
    /// # Arguments
    /// * `client` - Arc reference to the client instance
    /// * `event` - The decoded realtime event to process
    ///
    /// # Returns
    /// Returns `true` if the event was successfully handled, `false` if it should be
    /// logged as unhandled.
    async fn handle(&self, client: Arc<Client>, event: &RealtimeEvent) -> bool;
}
