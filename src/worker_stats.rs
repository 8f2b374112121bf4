#[derive(Debug, Default)]
pub struct WorkerStats {
    /// Human readable name used to identify this worker when stats are
    /// reported.
    tag: &'static str,
    /// Number of `LoaderOp::Load` that were received by the worker.
    load_requests: u32,
    /// The total number of keys that were requested (not necessarily unique).
    keys_requested: u32,
    /// The number of keys that were resolved straight from the outcome cache.
    cache_hits: u32,
    /// Number of bulk fetches this worker dispatched.
    dispatches: u32,
    /// Number of dispatches that failed and poisoned the instance.
    failed_dispatches: u32,
    /// The average number of unique keys per dispatched batch.
    average_batch_size: f32,
    /// The max number of unique keys in a single dispatched batch.
    max_batch_size: u32,
    /// The min number of unique keys in a single dispatched batch.
    min_batch_size: u32,
}

impl WorkerStats {
    pub fn new(tag: &'static str) -> Self {
        Self { tag, min_batch_size: u32::MAX, ..Default::default() }
    }

    pub fn record_load_request(&mut self, keys_requested: u32) {
        self.load_requests += 1;
        self.keys_requested += keys_requested;
    }

    pub fn record_cache_hits(&mut self, hits: u32) {
        self.cache_hits += hits;
    }

    pub fn record_dispatch(&mut self, batch_size: u32) {
        let new_total = self.dispatches + 1;
        self.average_batch_size = (((self.average_batch_size as f64 * self.dispatches as f64)
            + batch_size as f64)
            / new_total as f64) as f32;
        self.dispatches = new_total;
        if batch_size > self.max_batch_size {
            self.max_batch_size = batch_size;
        }
        if batch_size < self.min_batch_size {
            self.min_batch_size = batch_size;
        }
    }

    pub fn record_dispatch_failed(&mut self) {
        self.failed_dispatches += 1;
    }
}

impl Drop for WorkerStats {
    fn drop(&mut self) {
        tracing::debug!(worker_stats = ?self);
    }
}
