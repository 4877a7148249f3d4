/// Observed lengths of a workload's two lists at one point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QueueDepth {
    pub pending: i64,
    pub in_flight: i64,
}

impl QueueDepth {
    pub fn new(pending: i64, in_flight: i64) -> Self {
        Self { pending, in_flight }
    }

    /// Total outstanding work.
    pub fn total(&self) -> i64 {
        self.pending.saturating_add(self.in_flight)
    }
}

/// Whether the workload has any outstanding work.
pub fn is_active(depth: QueueDepth) -> bool {
    depth.total() > 0
}

/// The scaling signal: outstanding work capped at `ceiling`.
///
/// The cap applies to the sum, never to the lists individually.
pub fn metric_value(depth: QueueDepth, ceiling: i64) -> i64 {
    depth.total().min(ceiling)
}
