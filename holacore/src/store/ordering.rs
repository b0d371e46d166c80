use crate::types::Message;
use std::collections::HashMap;

/// Re-derives the ascending-by-`created_at` order for a set of message ids.
///
/// The sort is stable, so ids with equal timestamps keep the relative order
/// they already had in `ids`. Callers append newly inserted ids to the end of
/// the list before sorting, which makes arrival order the tie-breaker. Ids
/// without a backing entry in `messages` are dropped.
pub fn sort_ids_asc(ids: &mut Vec<String>, messages: &HashMap<String, Message>) {
    ids.retain(|id| messages.contains_key(id));
    ids.sort_by_key(|id| messages.get(id).map(|m| m.created_at));
}
