//! Outward-facing seams of the fill engine. The DOM and overlay ports come
//! from `page-port`; these cover pacing, notifications, and counters.

use async_trait::async_trait;

use crate::model::{Outcome, Totals};
use crate::policy::PauseRange;

/// Which gap in the simulated interaction a pause belongs to.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PausePoint {
    Open,
    Deliberate,
    Settle,
}

/// Pacing between simulated interaction steps. Production uses randomized
/// sleeps; tests swap in a no-op so runs stay fast and deterministic.
#[async_trait]
pub trait TempoPort: Send + Sync {
    async fn pause(&self, point: PausePoint, range: PauseRange);
}

/// Progress notifications for hosts that surface fill activity live.
pub trait FillEventsPort: Send + Sync {
    fn on_fill_started(&self, fill_id: &str, hostname: &str);
    fn on_outcome(&self, fill_id: &str, outcome: &Outcome);
    fn on_fill_finished(&self, fill_id: &str, changed: usize, totals: &Totals);
}

/// Aggregate counters.
pub trait FillMetricsPort: Send + Sync {
    fn incr_filled(&self, tier: &'static str);
    fn incr_skipped(&self, reason: &'static str);
}
