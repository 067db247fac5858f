use crate::ports::FillMetricsPort;

#[derive(Clone, Copy, Debug, Default)]
pub struct NullFillMetrics;

impl FillMetricsPort for NullFillMetrics {
    fn incr_filled(&self, _tier: &'static str) {}
    fn incr_skipped(&self, _reason: &'static str) {}
}
