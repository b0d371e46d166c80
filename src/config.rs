/// Tunables for the client core. The defaults match what the production
/// backend pages and batches at.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Page size for chat-list and message fetches.
    pub page_size: u32,
    /// How many swipe candidates one replenishment fetch asks for.
    pub swipe_batch_size: u32,
    /// Queue length at or below which a background replenishment fetch is
    /// triggered. Zero-length queues always fetch a full batch.
    pub swipe_low_water: usize,
    /// When true, a failed send removes the optimistic message again and
    /// restores the previous last-message snapshot. Off by default: the
    /// stock behavior keeps the draft in place and only emits a
    /// `send_failed` event.
    pub rollback_failed_sends: bool,
    /// When true, a last-message patch older than the stored snapshot is
    /// dropped instead of applied. Off by default: the stock behavior is
    /// last-write-wins by arrival order.
    pub strict_last_message_ordering: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            page_size: 20,
            swipe_batch_size: 5,
            swipe_low_water: 2,
            rollback_failed_sends: false,
            strict_last_message_ordering: false,
        }
    }
}
