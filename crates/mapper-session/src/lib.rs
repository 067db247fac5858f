//! Interactive field capture.
//!
//! A mapper session turns the page into a picker: the host attaches capture
//! listeners, the operator clicks the field they want to associate with a
//! key, and the session answers with a snapshot of that field including a
//! replayable selector. All session state lives in one value owned by the
//! session; nothing is ambient.

pub mod errors;
pub mod model;
pub mod policy;
pub mod ports;
pub mod session;

pub use errors::MapperError;
pub use model::{ClickDisposition, FieldInfo, MapperState, StartOutcome, StopOutcome};
pub use policy::MapperPolicyView;
pub use ports::{ListenerPort, MapperEventsPort, NullListener, NullMapperEvents};
pub use session::{MapperSession, MapperSessionBuilder};
