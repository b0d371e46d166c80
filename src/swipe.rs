use crate::client::{Client, ClientError};
use crate::types::events::{StoreKind, SwipeRestored};
use holacore::types::SwipeCandidate;
use log::{debug, info, warn};
use std::sync::Arc;

impl Client {
    /// Tops up the swipe deck from the geospatial query.
    ///
    /// An empty queue loads a full batch. A queue at or below the
    /// low-water mark appends one more batch so the deck never runs dry
    /// mid-session. Above the mark nothing is fetched. Returns how many
    /// candidates the backend handed over; fewer than a full batch means
    /// the server ran out of nearby profiles.
    pub async fn load_swipeable_profiles(
        self: &Arc<Self>,
        max_distance_km: f64,
    ) -> Result<usize, ClientError> {
        let len = self.swipe_queue.read().await.len();
        let batch = self.config.swipe_batch_size;

        if len == 0 {
            let candidates = self
                .profile_api
                .fetch_swipeable_profiles(max_distance_km, batch)
                .await?;
            let fetched = candidates.len();
            info!(target: "Client", "Loaded {fetched} swipe candidates");
            {
                let mut queue = self.swipe_queue.write().await;
                queue.load_initial(candidates);
            }
            self.notify_store_changed(StoreKind::SwipeQueue);
            Ok(fetched)
        } else if len <= self.config.swipe_low_water {
            let candidates = self
                .profile_api
                .fetch_swipeable_profiles(max_distance_km, batch)
                .await?;
            let fetched = candidates.len();
            debug!(target: "Client", "Replenished swipe deck with {fetched} candidates at length {len}");
            {
                let mut queue = self.swipe_queue.write().await;
                queue.append(candidates);
            }
            self.notify_store_changed(StoreKind::SwipeQueue);
            Ok(fetched)
        } else {
            debug!(target: "Client", "Swipe deck at length {len}, no replenishment needed");
            Ok(0)
        }
    }

    /// Submits a swipe decision and advances the deck once the server
    /// accepted it.
    ///
    /// The head is not removed speculatively: submission happens first,
    /// and only a success consumes the candidate (optionally splicing a
    /// provided replacement onto the back). On failure the deck is
    /// restored instead and a `swipe_restored` event fires for any
    /// candidate that returned to the head.
    pub async fn swipe(
        self: &Arc<Self>,
        target_user_id: &str,
        liked: bool,
        replacement: Option<SwipeCandidate>,
    ) -> Result<(), ClientError> {
        let result = self.profile_api.submit_swipe(target_user_id, liked).await;
        if matches!(result, Ok(true)) {
            let removed = {
                let mut queue = self.swipe_queue.write().await;
                queue.advance(replacement)
            };
            self.notify_store_changed(StoreKind::SwipeQueue);
            match removed {
                Some(candidate) => debug!(
                    target: "Client",
                    "Swiped {} on {}",
                    if liked { "right" } else { "left" },
                    candidate.profile.user_id
                ),
                None => debug!(target: "Client", "Swipe accepted with an empty deck"),
            }
            return Ok(());
        }

        warn!(target: "Client", "Swipe on {target_user_id} failed, restoring deck");
        let restored = {
            let mut queue = self.swipe_queue.write().await;
            queue.restore()
        };
        if restored {
            self.notify_store_changed(StoreKind::SwipeQueue);
            let _ = self.event_bus.swipe_restored.send(Arc::new(SwipeRestored {
                target_user_id: target_user_id.to_string(),
            }));
        }

        match result {
            Ok(_) => Err(ClientError::Rejected("swipe")),
            Err(e) => Err(e.into()),
        }
    }
}
