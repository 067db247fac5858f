//! Per-kind fill strategies. Every strategy is idempotent: a field that
//! already holds a real value is reported and left alone.

use formpilot_core_types::norm::normalize_key;
use option_matcher::best_match;
use page_port::{DomEvent, DomPort, NodeId, OptionItem};
use tokio_util::sync::CancellationToken;

use crate::errors::FillError;
use crate::model::Reason;
use crate::policy::TempoRanges;
use crate::ports::TempoPort;
use crate::simulate::choose_option;

const PLACEHOLDER_WORDS: [&str; 3] = ["select", "choose", "please"];

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct FillOutcome {
    pub changed: bool,
    pub why: Reason,
}

impl FillOutcome {
    pub(crate) const fn changed(why: Reason) -> Self {
        Self { changed: true, why }
    }

    pub(crate) const fn unchanged(why: Reason) -> Self {
        Self {
            changed: false,
            why,
        }
    }
}

/// Set a text control's value and notify reactive listeners.
pub(crate) async fn fill_text(dom: &dyn DomPort, node: NodeId, value: &str) -> FillOutcome {
    let current = match dom.value(node).await {
        Ok(current) => current,
        Err(_) => return FillOutcome::unchanged(Reason::NotFound),
    };
    if !current.trim().is_empty() {
        return FillOutcome::unchanged(Reason::AlreadyHasValue);
    }
    if dom.set_value(node, value).await.is_err() {
        return FillOutcome::unchanged(Reason::NotFound);
    }
    for event in [DomEvent::Input, DomEvent::Change] {
        if dom.dispatch(node, event).await.is_err() {
            return FillOutcome::unchanged(Reason::NotFound);
        }
    }
    FillOutcome::changed(Reason::Filled)
}

/// Set a contenteditable region's text content.
pub(crate) async fn fill_editable(dom: &dyn DomPort, node: NodeId, value: &str) -> FillOutcome {
    let current = match dom.text_content(node).await {
        Ok(current) => current,
        Err(_) => return FillOutcome::unchanged(Reason::NotFound),
    };
    if !current.trim().is_empty() {
        return FillOutcome::unchanged(Reason::AlreadyHasValue);
    }
    if dom.set_text_content(node, value).await.is_err() {
        return FillOutcome::unchanged(Reason::NotFound);
    }
    if dom.dispatch(node, DomEvent::Input).await.is_err() {
        return FillOutcome::unchanged(Reason::NotFound);
    }
    FillOutcome::changed(Reason::Filled)
}

/// Pick the closest option of a select, honoring an existing real
/// selection and the placeholder heuristic.
pub(crate) async fn fill_select(
    dom: &dyn DomPort,
    tempo: &dyn TempoPort,
    ranges: &TempoRanges,
    cancel: &CancellationToken,
    node: NodeId,
    desired: &str,
) -> Result<FillOutcome, FillError> {
    let options = match dom.options(node).await {
        Ok(options) => options,
        Err(_) => return Ok(FillOutcome::unchanged(Reason::NotFound)),
    };
    let selected = match dom.selected_index(node).await {
        Ok(selected) => selected,
        Err(_) => return Ok(FillOutcome::unchanged(Reason::NotFound)),
    };
    if !is_placeholder_selection(&options, selected) {
        return Ok(FillOutcome::unchanged(Reason::AlreadySelected));
    }

    let texts: Vec<&str> = options.iter().map(|o| o.text.as_str()).collect();
    let index = match best_match(desired, &texts) {
        Some(index) => index,
        None => return Ok(FillOutcome::unchanged(Reason::NoMatch)),
    };

    if choose_option(dom, tempo, ranges, cancel, node, index).await? {
        Ok(FillOutcome::changed(Reason::Selected))
    } else {
        Ok(FillOutcome::unchanged(Reason::NotFound))
    }
}

/// Click the radio of a group whose label best matches the desired answer.
pub(crate) async fn fill_radio_group(
    dom: &dyn DomPort,
    cancel: &CancellationToken,
    group: &[NodeId],
    desired: &str,
) -> Result<FillOutcome, FillError> {
    if cancel.is_cancelled() {
        return Err(FillError::Cancelled);
    }

    for &radio in group {
        if dom.is_checked(radio).await.unwrap_or(false) {
            return Ok(FillOutcome::unchanged(Reason::AlreadySelected));
        }
    }
    let mut labels = Vec::with_capacity(group.len());
    for &radio in group {
        let mut label = dom.label_text(radio).await.unwrap_or_default();
        if label.trim().is_empty() {
            label = dom
                .attr(radio, "value")
                .await
                .ok()
                .flatten()
                .unwrap_or_default();
        }
        labels.push(label);
    }

    let index = match best_match(desired, &labels) {
        Some(index) => index,
        None => return Ok(FillOutcome::unchanged(Reason::NoMatch)),
    };
    let winner = group[index];
    if dom.click(winner).await.is_err() {
        return Ok(FillOutcome::unchanged(Reason::NotFound));
    }
    if dom.dispatch(winner, DomEvent::Change).await.is_err() {
        return Ok(FillOutcome::unchanged(Reason::NotFound));
    }
    Ok(FillOutcome::changed(Reason::Clicked))
}

/// A select is considered unanswered when nothing is selected, the selected
/// option has an empty value, or its text reads like a prompt.
fn is_placeholder_selection(options: &[OptionItem], selected: Option<usize>) -> bool {
    let current = match selected.and_then(|i| options.get(i)) {
        Some(current) => current,
        None => return true,
    };
    if current.value.trim().is_empty() {
        return true;
    }
    let text = normalize_key(&current.text);
    PLACEHOLDER_WORDS.iter().any(|word| text.contains(word))
}
