use crate::types::SwipeCandidate;
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};

/// Look-ahead buffer of swipeable candidates. The head is the profile the
/// deck is currently showing.
///
/// `swiped_ids` remembers every candidate consumed by a completed swipe so
/// that replenishment batches from the server can never re-queue one. The
/// single-slot `last_swiped` buffer makes the most recent `advance`
/// reversible via `restore`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SwipeQueue {
    queue: VecDeque<SwipeCandidate>,
    swiped_ids: HashSet<String>,
    last_swiped: Option<SwipeCandidate>,
}

impl SwipeQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the queue with a fresh batch. Already-swiped profiles and
    /// in-batch duplicates are dropped.
    pub fn load_initial(&mut self, candidates: Vec<SwipeCandidate>) {
        self.queue.clear();
        for candidate in candidates {
            self.push_if_new(candidate);
        }
    }

    /// Appends a replenishment batch to the back of the queue, dropping
    /// anything already queued or already swiped.
    pub fn append(&mut self, candidates: Vec<SwipeCandidate>) {
        for candidate in candidates {
            self.push_if_new(candidate);
        }
    }

    /// Consumes the head after a successful swipe submission. The removed
    /// candidate is recorded so it never re-enters the deck and buffered so
    /// `restore` can undo exactly one step. An optional replacement joins
    /// the back of the queue.
    pub fn advance(&mut self, replacement: Option<SwipeCandidate>) -> Option<SwipeCandidate> {
        let removed = self.queue.pop_front();
        if let Some(candidate) = &removed {
            self.swiped_ids.insert(candidate.profile.user_id.clone());
            self.last_swiped = Some(candidate.clone());
        }
        if let Some(candidate) = replacement {
            self.push_if_new(candidate);
        }
        removed
    }

    /// Undoes the most recent `advance`: the buffered candidate returns to
    /// the head and is forgotten from the swiped set. A no-op when nothing
    /// is buffered.
    pub fn restore(&mut self) -> bool {
        match self.last_swiped.take() {
            Some(candidate) => {
                self.swiped_ids.remove(&candidate.profile.user_id);
                self.queue.push_front(candidate);
                true
            }
            None => false,
        }
    }

    pub fn current(&self) -> Option<&SwipeCandidate> {
        self.queue.front()
    }

    pub fn candidates(&self) -> impl Iterator<Item = &SwipeCandidate> {
        self.queue.iter()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    fn push_if_new(&mut self, candidate: SwipeCandidate) {
        let id = &candidate.profile.user_id;
        if self.swiped_ids.contains(id) {
            return;
        }
        if self.queue.iter().any(|c| &c.profile.user_id == id) {
            return;
        }
        self.queue.push_back(candidate);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::UserProfile;

    fn candidate(user_id: &str) -> SwipeCandidate {
        SwipeCandidate {
            profile: UserProfile {
                user_id: user_id.to_string(),
                alias: format!("alias-{user_id}"),
                ..Default::default()
            },
            distance_km: 1.5,
        }
    }

    #[test]
    fn test_advance_consumes_head_and_restore_undoes_it() {
        let mut queue = SwipeQueue::new();
        queue.load_initial(vec![candidate("a"), candidate("b")]);

        let removed = queue.advance(None);
        assert_eq!(removed.map(|c| c.profile.user_id), Some("a".to_string()));
        assert_eq!(queue.current().map(|c| c.profile.user_id.as_str()), Some("b"));

        assert!(queue.restore());
        assert_eq!(queue.current().map(|c| c.profile.user_id.as_str()), Some("a"));
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn test_swiped_profiles_never_requeue() {
        let mut queue = SwipeQueue::new();
        queue.load_initial(vec![candidate("a"), candidate("b")]);
        queue.advance(None);

        queue.append(vec![candidate("a"), candidate("c")]);

        let ids: Vec<&str> = queue.candidates().map(|c| c.profile.user_id.as_str()).collect();
        assert_eq!(ids, ["b", "c"]);
    }

    #[test]
    fn test_replacement_joins_the_back() {
        let mut queue = SwipeQueue::new();
        queue.load_initial(vec![candidate("a"), candidate("b")]);

        queue.advance(Some(candidate("z")));

        let ids: Vec<&str> = queue.candidates().map(|c| c.profile.user_id.as_str()).collect();
        assert_eq!(ids, ["b", "z"]);
    }

    #[test]
    fn test_queued_duplicates_are_dropped() {
        let mut queue = SwipeQueue::new();
        queue.load_initial(vec![candidate("a"), candidate("a"), candidate("b")]);
        queue.append(vec![candidate("b")]);

        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn test_advance_on_empty_queue_is_safe() {
        let mut queue = SwipeQueue::new();
        assert!(queue.advance(None).is_none());
        assert!(!queue.restore());
    }

    #[test]
    fn test_restore_only_undoes_one_step() {
        let mut queue = SwipeQueue::new();
        queue.load_initial(vec![candidate("a"), candidate("b"), candidate("c")]);
        queue.advance(None);
        queue.advance(None);

        assert!(queue.restore());
        assert!(!queue.restore());

        let ids: Vec<&str> = queue.candidates().map(|c| c.profile.user_id.as_str()).collect();
        assert_eq!(ids, ["b", "c"]);
    }
}
