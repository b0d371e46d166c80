pub mod chat;
pub mod chatstate;
pub mod message;
pub mod router;
pub mod traits;
