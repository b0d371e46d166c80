pub mod chat_list;
pub mod error;
pub mod messages;
pub mod ordering;
pub mod swipe;

pub use chat_list::ChatListStore;
pub use error::{Result, StoreError};
pub use messages::{ChatInit, ChatMessagesStore};
pub use swipe::SwipeQueue;
