use crate::client::{Client, ClientError};
use holacore::types::Presence;
use log::{info, warn};
use std::sync::Arc;

impl Client {
    /// Publishes the account's presence.
    ///
    /// The `is_online` flag on the cached own profile follows the server's
    /// answer, not the request: it flips to the requested state after a
    /// successful call and to the opposite state on failure, so the UI
    /// shows that the change did not land.
    pub async fn set_presence(self: &Arc<Self>, presence: Presence) -> Result<(), ClientError> {
        let online = matches!(presence, Presence::Available);
        let result = self.profile_api.set_presence(online).await;
        let accepted = matches!(result, Ok(true));

        let flag = if accepted { online } else { !online };
        {
            let mut me = self.my_profile.write().await;
            if let Some(profile) = me.as_mut() {
                profile.is_online = flag;
            }
        }

        if accepted {
            info!(
                target: "Client",
                "Presence set to {}",
                if online { "available" } else { "unavailable" }
            );
            return Ok(());
        }

        warn!(target: "Client", "Presence update failed, profile flag left {flag}");
        match result {
            Ok(_) => Err(ClientError::Rejected("presence")),
            Err(e) => Err(e.into()),
        }
    }
}
