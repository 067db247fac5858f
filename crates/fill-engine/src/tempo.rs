use std::time::Duration;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::policy::PauseRange;
use crate::ports::{PausePoint, TempoPort};

/// Randomized sleeps so simulated interactions land at human-plausible
/// intervals instead of a fixed machine cadence.
#[derive(Clone, Copy, Debug, Default)]
pub struct HumanTempo;

#[async_trait]
impl TempoPort for HumanTempo {
    async fn pause(&self, _point: PausePoint, range: PauseRange) {
        let ms = if range.max_ms > range.min_ms {
            StdRng::from_entropy().gen_range(range.min_ms..=range.max_ms)
        } else {
            range.min_ms
        };
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }
}

/// No pacing at all. Test default.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullTempo;

#[async_trait]
impl TempoPort for NullTempo {
    async fn pause(&self, _point: PausePoint, _range: PauseRange) {}
}
