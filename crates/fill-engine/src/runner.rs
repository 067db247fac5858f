//! The tiered fill pass.
//!
//! Tier order is the precedence contract: operator mappings first, dynamic
//! rules second, keyword heuristics for text controls third and selects
//! last. A field key with a stored mapping is never re-attempted by the
//! rule or heuristic tiers, even when the mapping itself failed to
//! resolve.

use std::collections::HashSet;
use std::sync::Arc;

use field_classifier::classify;
use formpilot_core_types::norm::normalize_key;
use formpilot_core_types::{hostname_of, FieldKey, MappingKind, RuleSource, ValueMap};
use page_port::{classify_target, field_hints, DomError, DomPort, NodeId, TargetKind};
use tracing::{debug, instrument};

use crate::errors::FillError;
use crate::highlight::Highlighter;
use crate::model::{
    hint_excerpt, ExecCtx, FillParams, FillReport, FillSummary, Outcome, Reason, Subject,
    TargetLabel, Totals,
};
use crate::policy::FillPolicyView;
use crate::ports::{FillEventsPort, FillMetricsPort, TempoPort};
use crate::target::{fill_editable, fill_radio_group, fill_select, fill_text, FillOutcome};

pub(crate) struct RuntimeDeps {
    pub dom: Arc<dyn DomPort>,
    pub tempo: Arc<dyn TempoPort>,
    pub events: Arc<dyn FillEventsPort>,
    pub metrics: Arc<dyn FillMetricsPort>,
    pub highlighter: Highlighter,
    pub policy: FillPolicyView,
}

struct PageScan {
    text_inputs: Vec<NodeId>,
    textareas: Vec<NodeId>,
    selects: Vec<NodeId>,
    radio_groups: Vec<(String, Vec<NodeId>)>,
}

impl PageScan {
    fn totals(&self) -> Totals {
        Totals {
            inputs: self.text_inputs.len(),
            textareas: self.textareas.len(),
            selects: self.selects.len(),
            radio_groups: self.radio_groups.len(),
        }
    }
}

fn page_err(err: DomError) -> FillError {
    FillError::PageUnavailable(err.to_string())
}

const NON_TEXT_INPUT_TYPES: [&str; 7] = [
    "checkbox", "submit", "button", "reset", "image", "file", "hidden",
];

async fn scan_page(dom: &dyn DomPort) -> Result<PageScan, FillError> {
    let mut text_inputs = Vec::new();
    let mut radio_groups: Vec<(String, Vec<NodeId>)> = Vec::new();
    for node in dom.fillable_inputs().await.map_err(page_err)? {
        let input_type = dom
            .attr(node, "type")
            .await
            .map_err(page_err)?
            .unwrap_or_default()
            .to_ascii_lowercase();
        if input_type == "radio" {
            let name = dom
                .attr(node, "name")
                .await
                .map_err(page_err)?
                .unwrap_or_default();
            if name.is_empty() {
                continue;
            }
            match radio_groups.iter_mut().find(|(n, _)| *n == name) {
                Some((_, group)) => group.push(node),
                None => radio_groups.push((name, vec![node])),
            }
        } else if !NON_TEXT_INPUT_TYPES.contains(&input_type.as_str()) {
            text_inputs.push(node);
        }
    }
    Ok(PageScan {
        text_inputs,
        textareas: dom.textareas().await.map_err(page_err)?,
        selects: dom.selects().await.map_err(page_err)?,
        radio_groups,
    })
}

struct Recorder<'a> {
    fill_id: String,
    events: &'a dyn FillEventsPort,
    metrics: &'a dyn FillMetricsPort,
}

impl Recorder<'_> {
    fn record(&self, tier: &'static str, into: &mut Vec<Outcome>, outcome: Outcome) {
        self.events.on_outcome(&self.fill_id, &outcome);
        if outcome.changed {
            self.metrics.incr_filled(tier);
        } else {
            self.metrics.incr_skipped(outcome.why.as_str());
        }
        into.push(outcome);
    }
}

fn label_of(kind: MappingKind) -> TargetLabel {
    match kind {
        MappingKind::Input | MappingKind::Textarea => TargetLabel::Text,
        MappingKind::Select => TargetLabel::Select,
        MappingKind::Editable => TargetLabel::Editable,
    }
}

fn check_cancel(ctx: &ExecCtx) -> Result<(), FillError> {
    if ctx.cancel.is_cancelled() {
        Err(FillError::Cancelled)
    } else {
        Ok(())
    }
}

#[instrument(skip_all, fields(fill_id = %ctx.fill_id))]
pub(crate) async fn execute(
    deps: &RuntimeDeps,
    ctx: &ExecCtx,
    params: &FillParams,
) -> Result<FillSummary, FillError> {
    let hostname = hostname_of(&deps.dom.document_url().await);
    let values = ValueMap::build(&params.profile, &params.prefs);
    let recorder = Recorder {
        fill_id: ctx.fill_id.to_string(),
        events: deps.events.as_ref(),
        metrics: deps.metrics.as_ref(),
    };
    deps.events.on_fill_started(&recorder.fill_id, &hostname);

    let scan = scan_page(deps.dom.as_ref()).await?;
    let mut report = FillReport {
        totals: scan.totals(),
        ..FillReport::default()
    };
    let mut changed_nodes: Vec<NodeId> = Vec::new();

    let mapped_keys: HashSet<FieldKey> = params
        .mappings
        .iter()
        .filter(|(_, m)| !m.selector.trim().is_empty())
        .map(|(key, _)| *key)
        .collect();

    run_mapped_tier(
        deps,
        ctx,
        params,
        &values,
        &recorder,
        &mut report.mapped,
        &mut changed_nodes,
    )
    .await?;
    run_rules_tier(
        deps,
        ctx,
        params,
        &values,
        &scan,
        &mapped_keys,
        &recorder,
        &mut report.rules,
        &mut changed_nodes,
    )
    .await?;
    run_heuristic_text_tier(
        deps,
        ctx,
        &values,
        &scan,
        &mapped_keys,
        &recorder,
        &mut report.heuristic_text,
        &mut changed_nodes,
    )
    .await?;
    run_heuristic_select_tier(
        deps,
        ctx,
        &values,
        &scan,
        &mapped_keys,
        &recorder,
        &mut report.heuristic_select,
        &mut changed_nodes,
    )
    .await?;

    debug!(
        hostname,
        changed = changed_nodes.len(),
        "fill pass complete"
    );
    deps.highlighter
        .flash(
            changed_nodes.clone(),
            &deps.policy.highlight_color,
            deps.policy.highlight_ms,
        )
        .await;
    deps.events
        .on_fill_finished(&recorder.fill_id, report.changed_count(), &report.totals);

    Ok(FillSummary {
        highlight_count: changed_nodes.len(),
        report,
    })
}

async fn run_mapped_tier(
    deps: &RuntimeDeps,
    ctx: &ExecCtx,
    params: &FillParams,
    values: &ValueMap,
    recorder: &Recorder<'_>,
    into: &mut Vec<Outcome>,
    changed_nodes: &mut Vec<NodeId>,
) -> Result<(), FillError> {
    for key in FieldKey::ALL {
        let mapping = match params.mappings.get(&key) {
            Some(mapping) if !mapping.selector.trim().is_empty() => mapping,
            _ => continue,
        };
        check_cancel(ctx)?;

        let subject = Subject::Key { key };
        let selector = Some(mapping.selector.clone());
        // Until the selector resolves, the stored capability is the best
        // description of the target we have.
        let stored_kind = label_of(mapping.kind);
        let make = |kind: TargetLabel, changed: bool, why: Reason, hints: String| Outcome {
            subject: subject.clone(),
            selector: selector.clone(),
            kind,
            changed,
            why,
            hints,
        };

        let value = values.get(key);
        if value.is_empty() {
            let outcome = make(stored_kind, false, Reason::NoValue, String::new());
            recorder.record("mapped", into, outcome);
            continue;
        }

        let node = match deps.dom.query(&mapping.selector).await {
            Ok(nodes) => nodes.into_iter().next(),
            Err(_) => None,
        };
        let node = match node {
            Some(node) => node,
            None => {
                let outcome = make(stored_kind, false, Reason::NotFound, String::new());
                recorder.record("mapped", into, outcome);
                continue;
            }
        };
        let hints = field_hints(deps.dom.as_ref(), node).await.unwrap_or_default();
        if !deps.dom.is_visible(node).await.unwrap_or(false) {
            let outcome = make(stored_kind, false, Reason::NotVisible, hint_excerpt(&hints));
            recorder.record("mapped", into, outcome);
            continue;
        }

        // Selectors are advisory, so the fill strategy follows what the
        // selector resolved to now, not the capability captured back then.
        let resolved = match classify_target(deps.dom.as_ref(), node).await {
            Ok(Some(resolved)) => resolved,
            Ok(None) => {
                let outcome = make(stored_kind, false, Reason::Skipped, hint_excerpt(&hints));
                recorder.record("mapped", into, outcome);
                continue;
            }
            Err(_) => {
                let outcome = make(stored_kind, false, Reason::NotFound, hint_excerpt(&hints));
                recorder.record("mapped", into, outcome);
                continue;
            }
        };
        let kind = match &resolved {
            TargetKind::Input { .. } | TargetKind::Textarea => TargetLabel::Text,
            TargetKind::Select => TargetLabel::Select,
            TargetKind::Editable => TargetLabel::Editable,
        };
        let result = match resolved {
            TargetKind::Input { input_type } => {
                if input_type == "radio" || input_type == "checkbox" {
                    FillOutcome::unchanged(Reason::NotTextLike)
                } else {
                    fill_text(deps.dom.as_ref(), node, value).await
                }
            }
            TargetKind::Textarea => fill_text(deps.dom.as_ref(), node, value).await,
            TargetKind::Editable => fill_editable(deps.dom.as_ref(), node, value).await,
            TargetKind::Select => {
                fill_select(
                    deps.dom.as_ref(),
                    deps.tempo.as_ref(),
                    &deps.policy.tempo,
                    &ctx.cancel,
                    node,
                    value,
                )
                .await?
            }
        };
        if result.changed {
            changed_nodes.push(node);
        }
        let outcome = make(kind, result.changed, result.why, hint_excerpt(&hints));
        recorder.record("mapped", into, outcome);
    }
    Ok(())
}

enum RuleTarget<'a> {
    Text(NodeId),
    Select(NodeId),
    RadioGroup { name: &'a str, group: &'a [NodeId] },
}

impl RuleTarget<'_> {
    fn label(&self) -> TargetLabel {
        match self {
            RuleTarget::Text(_) => TargetLabel::Text,
            RuleTarget::Select(_) => TargetLabel::Select,
            RuleTarget::RadioGroup { .. } => TargetLabel::Radio,
        }
    }

    /// Node representing the target for visibility checks.
    fn probe(&self) -> Option<NodeId> {
        match self {
            RuleTarget::Text(node) | RuleTarget::Select(node) => Some(*node),
            RuleTarget::RadioGroup { group, .. } => group.first().copied(),
        }
    }

    /// Matching surface: element hints for single controls, the group name
    /// plus every member's label for radio groups.
    async fn hints(&self, dom: &dyn DomPort) -> String {
        match self {
            RuleTarget::Text(node) | RuleTarget::Select(node) => {
                field_hints(dom, *node).await.unwrap_or_default()
            }
            RuleTarget::RadioGroup { name, group } => {
                let mut pieces = vec![normalize_key(name)];
                for &radio in *group {
                    let label = dom.label_text(radio).await.unwrap_or_default();
                    if !label.is_empty() {
                        pieces.push(normalize_key(&label));
                    }
                }
                normalize_key(&pieces.join(" "))
            }
        }
    }
}

async fn run_rules_tier(
    deps: &RuntimeDeps,
    ctx: &ExecCtx,
    params: &FillParams,
    values: &ValueMap,
    scan: &PageScan,
    mapped_keys: &HashSet<FieldKey>,
    recorder: &Recorder<'_>,
    into: &mut Vec<Outcome>,
    changed_nodes: &mut Vec<NodeId>,
) -> Result<(), FillError> {
    if params.rules.is_empty() {
        return Ok(());
    }

    let mut targets: Vec<RuleTarget<'_>> = Vec::new();
    targets.extend(scan.text_inputs.iter().map(|&n| RuleTarget::Text(n)));
    targets.extend(scan.textareas.iter().map(|&n| RuleTarget::Text(n)));
    targets.extend(scan.selects.iter().map(|&n| RuleTarget::Select(n)));
    targets.extend(scan.radio_groups.iter().map(|(name, group)| {
        RuleTarget::RadioGroup {
            name: name.as_str(),
            group,
        }
    }));

    for target in &targets {
        check_cancel(ctx)?;
        let probe = match target.probe() {
            Some(probe) => probe,
            None => continue,
        };
        let hints = target.hints(deps.dom.as_ref()).await;
        if hints.is_empty() {
            continue;
        }

        // First matching rule with an answer wins; matches without an
        // answer are reported and the scan moves to the next rule.
        for rule in &params.rules {
            let needle = normalize_key(&rule.match_text);
            if needle.is_empty() || !hints.contains(&needle) {
                continue;
            }
            // A key with a stored mapping belongs to the mapped tier alone.
            if let RuleSource::Pref { pref_key } = &rule.source {
                if mapped_keys.contains(pref_key) {
                    continue;
                }
            }
            let answer = match &rule.source {
                RuleSource::Pref { pref_key } => values.get(*pref_key).to_string(),
                RuleSource::Literal { value } => value.clone(),
            };
            let subject = Subject::Rule {
                rule_id: rule.id.clone(),
            };
            if answer.trim().is_empty() {
                let outcome = Outcome {
                    subject,
                    selector: None,
                    kind: target.label(),
                    changed: false,
                    why: Reason::NoAnswer,
                    hints: hint_excerpt(&hints),
                };
                recorder.record("rules", into, outcome);
                continue;
            }

            let visible = deps.dom.is_visible(probe).await.unwrap_or(false);
            let result = if !visible {
                FillOutcome::unchanged(Reason::NotVisible)
            } else {
                match target {
                    RuleTarget::Text(node) => fill_text(deps.dom.as_ref(), *node, &answer).await,
                    RuleTarget::Select(node) => {
                        fill_select(
                            deps.dom.as_ref(),
                            deps.tempo.as_ref(),
                            &deps.policy.tempo,
                            &ctx.cancel,
                            *node,
                            &answer,
                        )
                        .await?
                    }
                    RuleTarget::RadioGroup { group, .. } => {
                        fill_radio_group(deps.dom.as_ref(), &ctx.cancel, group, &answer).await?
                    }
                }
            };
            if result.changed {
                match target {
                    RuleTarget::Text(node) | RuleTarget::Select(node) => {
                        changed_nodes.push(*node);
                    }
                    RuleTarget::RadioGroup { group, .. } => {
                        for &radio in *group {
                            if deps.dom.is_checked(radio).await.unwrap_or(false) {
                                changed_nodes.push(radio);
                            }
                        }
                    }
                }
            }
            let outcome = Outcome {
                subject,
                selector: None,
                kind: target.label(),
                changed: result.changed,
                why: result.why,
                hints: hint_excerpt(&hints),
            };
            recorder.record("rules", into, outcome);
            break;
        }
    }
    Ok(())
}

async fn run_heuristic_text_tier(
    deps: &RuntimeDeps,
    ctx: &ExecCtx,
    values: &ValueMap,
    scan: &PageScan,
    mapped_keys: &HashSet<FieldKey>,
    recorder: &Recorder<'_>,
    into: &mut Vec<Outcome>,
    changed_nodes: &mut Vec<NodeId>,
) -> Result<(), FillError> {
    for &node in scan.text_inputs.iter().chain(scan.textareas.iter()) {
        check_cancel(ctx)?;
        let Some((key, hints)) = classify_node(deps.dom.as_ref(), node).await else {
            continue;
        };
        let subject = Subject::Key { key };
        let unchanged = |why: Reason| Outcome {
            subject: subject.clone(),
            selector: None,
            kind: TargetLabel::Text,
            changed: false,
            why,
            hints: hint_excerpt(&hints),
        };

        if mapped_keys.contains(&key) {
            let outcome = unchanged(Reason::Skipped);
            recorder.record("heuristic-text", into, outcome);
            continue;
        }
        let value = values.get(key);
        if value.is_empty() {
            let outcome = unchanged(Reason::NoValue);
            recorder.record("heuristic-text", into, outcome);
            continue;
        }
        if !deps.dom.is_visible(node).await.unwrap_or(false) {
            let outcome = unchanged(Reason::NotVisible);
            recorder.record("heuristic-text", into, outcome);
            continue;
        }

        let result = fill_text(deps.dom.as_ref(), node, value).await;
        if result.changed {
            changed_nodes.push(node);
        }
        let outcome = Outcome {
            subject,
            selector: None,
            kind: TargetLabel::Text,
            changed: result.changed,
            why: result.why,
            hints: hint_excerpt(&hints),
        };
        recorder.record("heuristic-text", into, outcome);
    }
    Ok(())
}

async fn run_heuristic_select_tier(
    deps: &RuntimeDeps,
    ctx: &ExecCtx,
    values: &ValueMap,
    scan: &PageScan,
    mapped_keys: &HashSet<FieldKey>,
    recorder: &Recorder<'_>,
    into: &mut Vec<Outcome>,
    changed_nodes: &mut Vec<NodeId>,
) -> Result<(), FillError> {
    for &node in &scan.selects {
        check_cancel(ctx)?;
        let Some((key, hints)) = classify_node(deps.dom.as_ref(), node).await else {
            continue;
        };
        let subject = Subject::Key { key };
        let unchanged = |why: Reason| Outcome {
            subject: subject.clone(),
            selector: None,
            kind: TargetLabel::Select,
            changed: false,
            why,
            hints: hint_excerpt(&hints),
        };

        if mapped_keys.contains(&key) {
            let outcome = unchanged(Reason::Skipped);
            recorder.record("heuristic-select", into, outcome);
            continue;
        }
        let value = values.get(key);
        if value.is_empty() {
            let outcome = unchanged(Reason::NoValue);
            recorder.record("heuristic-select", into, outcome);
            continue;
        }
        if !deps.dom.is_visible(node).await.unwrap_or(false) {
            let outcome = unchanged(Reason::NotVisible);
            recorder.record("heuristic-select", into, outcome);
            continue;
        }

        let result = fill_select(
            deps.dom.as_ref(),
            deps.tempo.as_ref(),
            &deps.policy.tempo,
            &ctx.cancel,
            node,
            value,
        )
        .await?;
        if result.changed {
            changed_nodes.push(node);
        }
        let outcome = Outcome {
            subject,
            selector: None,
            kind: TargetLabel::Select,
            changed: result.changed,
            why: result.why,
            hints: hint_excerpt(&hints),
        };
        recorder.record("heuristic-select", into, outcome);
    }
    Ok(())
}

async fn classify_node(dom: &dyn DomPort, node: NodeId) -> Option<(FieldKey, String)> {
    let hints = field_hints(dom, node).await.unwrap_or_default();
    let autocomplete = dom
        .attr(node, "autocomplete")
        .await
        .ok()
        .flatten()
        .unwrap_or_default();
    classify(&hints, &autocomplete).map(|key| (key, hints))
}
