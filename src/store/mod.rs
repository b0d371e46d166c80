pub mod filestore;

pub use filestore::FileStore;

use crate::client::Client;
use crate::types::events::StoreKind;
use holacore::store::error::Result;
use log::info;

impl Client {
    /// Writes the account-scoped caches to disk.
    pub async fn save_snapshot(&self, store: &FileStore) -> Result<()> {
        {
            let list = self.chat_list.read().await;
            store.save_chat_list(&list).await?;
        }
        {
            let queue = self.swipe_queue.read().await;
            store.save_swipe_queue(&queue).await?;
        }
        info!(target: "Client", "Saved cache snapshot");
        Ok(())
    }

    /// Restores the account-scoped caches from disk. Missing snapshot
    /// files are not an error; returns whether anything was loaded.
    pub async fn restore_snapshot(&self, store: &FileStore) -> Result<bool> {
        let mut restored = false;
        if let Some(list) = store.load_chat_list().await? {
            info!(target: "Client", "Restored chat list snapshot with {} chats", list.len());
            *self.chat_list.write().await = list;
            self.notify_store_changed(StoreKind::ChatList);
            restored = true;
        }
        if let Some(queue) = store.load_swipe_queue().await? {
            *self.swipe_queue.write().await = queue;
            self.notify_store_changed(StoreKind::SwipeQueue);
            restored = true;
        }
        Ok(restored)
    }
}
