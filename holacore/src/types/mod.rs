pub mod chat;
pub mod events;
pub mod message;
pub mod presence;
pub mod profile;

pub use chat::{ChatKind, ChatSummary, LastMessagePatch, PageCursor};
pub use message::{Message, MessageKind, MessagePatch, MessageStatus};
pub use presence::Presence;
pub use profile::{ProfilePatch, SwipeCandidate, UserProfile};
