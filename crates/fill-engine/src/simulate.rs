//! Simulated select interaction.
//!
//! Committing an option straight through the DOM is detectable and skips
//! the listeners many widget libraries hang off mouse activity, so the
//! commit is wrapped in a focus, a mouse event burst, and randomized
//! pauses.

use page_port::{DomEvent, DomPort, NodeId};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::errors::FillError;
use crate::policy::TempoRanges;
use crate::ports::{PausePoint, TempoPort};

const MOUSE_BURST: [DomEvent; 4] = [
    DomEvent::MouseOver,
    DomEvent::MouseDown,
    DomEvent::MouseUp,
    DomEvent::Click,
];

/// Select option `index` on `node` with a human-paced event sequence.
///
/// `Ok(false)` means the element went away mid-sequence; the caller reports
/// the field as not found rather than failing the whole pass.
pub(crate) async fn choose_option(
    dom: &dyn DomPort,
    tempo: &dyn TempoPort,
    ranges: &TempoRanges,
    cancel: &CancellationToken,
    node: NodeId,
    index: usize,
) -> Result<bool, FillError> {
    if cancel.is_cancelled() {
        return Err(FillError::Cancelled);
    }

    if dom.focus(node).await.is_err() {
        return Ok(false);
    }
    for event in MOUSE_BURST {
        if dom.dispatch(node, event).await.is_err() {
            return Ok(false);
        }
    }
    tempo.pause(PausePoint::Open, ranges.open).await;

    if cancel.is_cancelled() {
        return Err(FillError::Cancelled);
    }
    if dom.set_selected_index(node, index).await.is_err() {
        debug!(%node, index, "select commit failed");
        return Ok(false);
    }
    tempo.pause(PausePoint::Deliberate, ranges.deliberate).await;

    for event in [DomEvent::Input, DomEvent::Change] {
        if dom.dispatch(node, event).await.is_err() {
            return Ok(false);
        }
    }
    tempo.pause(PausePoint::Settle, ranges.settle).await;

    Ok(true)
}
