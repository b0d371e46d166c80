use crate::client::{Client, ClientError};
use holacore::types::{ProfilePatch, UserProfile};
use log::{info, warn};
use std::sync::Arc;

impl Client {
    /// Loads the signed-in user's own profile into the local cache.
    pub async fn load_my_profile(self: &Arc<Self>) -> Result<UserProfile, ClientError> {
        let profile = self.profile_api.fetch_profile(&self.user_id).await?;
        *self.my_profile.write().await = Some(profile.clone());
        info!(target: "Client", "Loaded own profile for {}", profile.user_id);
        Ok(profile)
    }

    pub async fn my_profile(&self) -> Option<UserProfile> {
        self.my_profile.read().await.clone()
    }

    /// Fetches another user's profile, serving repeat lookups from the
    /// in-memory cache.
    pub async fn user_profile(self: &Arc<Self>, user_id: &str) -> Result<UserProfile, ClientError> {
        if let Some(profile) = self.profile_cache.get(user_id) {
            return Ok(profile.clone());
        }
        let profile = self.profile_api.fetch_profile(user_id).await?;
        self.profile_cache
            .insert(user_id.to_string(), profile.clone());
        Ok(profile)
    }

    /// Submits a profile edit and applies it to the cached own profile
    /// once the server accepted it. Nothing is changed locally while the
    /// call is in flight, so there is no state to restore on failure.
    pub async fn update_my_profile(self: &Arc<Self>, patch: ProfilePatch) -> Result<(), ClientError> {
        if self.my_profile.read().await.is_none() {
            return Err(ClientError::ProfileNotLoaded);
        }

        let result = self.profile_api.update_profile(&patch).await;
        if matches!(result, Ok(true)) {
            let mut me = self.my_profile.write().await;
            if let Some(profile) = me.as_mut() {
                profile.apply(&patch);
            }
            info!(target: "Client", "Profile update applied");
            return Ok(());
        }

        warn!(target: "Client", "Profile update rejected, local copy unchanged");
        match result {
            Ok(_) => Err(ClientError::Rejected("profile update")),
            Err(e) => Err(e.into()),
        }
    }
}
