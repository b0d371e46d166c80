use holacore::store::error::{Result, StoreError};
use holacore::store::{ChatListStore, SwipeQueue};
use serde::{Serialize, de::DeserializeOwned};
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;

/// On-disk snapshots of the account-scoped caches.
///
/// One file per cache under a base directory. The chat list snapshot lets
/// a cold start render something before the first sync; the swipe queue
/// snapshot carries the swiped-id set across restarts so a consumed
/// candidate never comes back.
pub struct FileStore {
    base_path: PathBuf,
}

impl FileStore {
    pub async fn new(path: impl Into<PathBuf>) -> io::Result<Self> {
        let base_path = path.into();
        fs::create_dir_all(&base_path).await?;
        Ok(Self { base_path })
    }

    fn path_for(&self, sub: &str) -> PathBuf {
        self.base_path.join(sub)
    }

    async fn read_snapshot<T: DeserializeOwned>(&self, path: &Path) -> Result<Option<T>> {
        match fs::read(path).await {
            Ok(data) => bincode::serde::decode_from_slice(&data, bincode::config::standard())
                .map(|(value, _)| Some(value))
                .map_err(|e| StoreError::Serialization(e.to_string())),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    async fn write_snapshot<T: Serialize>(&self, path: &Path, value: &T) -> Result<()> {
        let data = bincode::serde::encode_to_vec(value, bincode::config::standard())
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        fs::write(path, data).await.map_err(StoreError::Io)
    }

    pub async fn save_chat_list(&self, store: &ChatListStore) -> Result<()> {
        self.write_snapshot(&self.path_for("chat_list.bin"), store)
            .await
    }

    pub async fn load_chat_list(&self) -> Result<Option<ChatListStore>> {
        self.read_snapshot(&self.path_for("chat_list.bin")).await
    }

    pub async fn save_swipe_queue(&self, queue: &SwipeQueue) -> Result<()> {
        self.write_snapshot(&self.path_for("swipe_queue.bin"), queue)
            .await
    }

    pub async fn load_swipe_queue(&self) -> Result<Option<SwipeQueue>> {
        self.read_snapshot(&self.path_for("swipe_queue.bin")).await
    }
}
