use crate::model::{Outcome, Totals};
use crate::ports::FillEventsPort;

/// Drops every notification. Default when the host wires no listener.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullFillEvents;

impl FillEventsPort for NullFillEvents {
    fn on_fill_started(&self, _fill_id: &str, _hostname: &str) {}
    fn on_outcome(&self, _fill_id: &str, _outcome: &Outcome) {}
    fn on_fill_finished(&self, _fill_id: &str, _changed: usize, _totals: &Totals) {}
}
