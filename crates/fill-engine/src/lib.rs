//! Fill orchestration.
//!
//! Given a value map, a per-hostname mapping table, and an ordered dynamic
//! rule list, decides per field whether and how to fill, in strict tier
//! order: explicit mappings, dynamic rules, heuristic text fallback,
//! heuristic select fallback. Produces one outcome record per attempted
//! field and a highlight batch over everything that changed.

pub mod api;
pub mod errors;
pub mod model;
pub mod policy;
pub mod ports;

mod events;
mod highlight;
mod metrics;
mod runner;
mod simulate;
mod target;
mod tempo;

pub use api::{FillEngine, FillEngineBuilder};
pub use errors::FillError;
pub use events::NullFillEvents;
pub use highlight::Highlighter;
pub use metrics::NullFillMetrics;
pub use model::{
    ExecCtx, FillParams, FillReport, FillSummary, Outcome, Reason, Subject, TargetLabel, Totals,
};
pub use policy::{FillPolicyView, PauseRange, TempoRanges};
pub use ports::{FillEventsPort, FillMetricsPort, PausePoint, TempoPort};
pub use tempo::{HumanTempo, NullTempo};
