//! DOM access ports for the formpilot engine.
//!
//! The engine never touches a real DOM directly; everything goes through
//! [`DomPort`] (queries, reads, mutations, event dispatch) and
//! [`OverlayPort`] (highlights, banner). Host adapters implement the ports
//! against a live page; tests run against the in-memory [`fake::FakePage`].

pub mod errors;
pub mod hints;
pub mod model;
pub mod ports;

#[cfg(any(test, feature = "fake"))]
pub mod fake;

pub use errors::DomError;
pub use hints::{field_hints, FieldDescriptor};
pub use model::{classify_target, DomEvent, NodeId, OptionItem, TargetKind};
pub use ports::{DomPort, OverlayPort};
