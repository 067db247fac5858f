//! formpilot: a form field resolution and autofill engine.
//!
//! The engine never talks to a browser directly. Hosts implement the
//! [`page_port`] traits against a live page and hand them to [`Engine`],
//! which wires the fill pass and the interactive mapper session together.
//!
//! ```no_run
//! # use std::sync::Arc;
//! # use formpilot::{Engine, ExecCtx, FillParams};
//! # async fn demo(dom: Arc<dyn page_port::DomPort>, overlay: Arc<dyn page_port::OverlayPort>) {
//! let engine = Engine::builder()
//!     .with_dom(dom)
//!     .with_overlay(overlay)
//!     .build();
//! let summary = engine.fill(&ExecCtx::new(), &FillParams::default()).await.unwrap();
//! println!("changed {} fields", summary.report.changed_count());
//! # }
//! ```

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::instrument;

pub use field_classifier::classify;
pub use fill_engine::{
    ExecCtx, FillError, FillParams, FillPolicyView, FillReport, FillSummary, Outcome, Reason,
    Subject, TempoPort,
};
pub use formpilot_core_types::{
    hostname_of, DynamicRule, EngineError, FieldKey, FillId, Mapping, MappingKind, MappingMeta,
    Prefs, Profile, RuleSource, ValueMap,
};
pub use mapper_session::{
    ClickDisposition, FieldInfo, ListenerPort, MapperError, MapperPolicyView, StartOutcome,
    StopOutcome,
};
pub use option_matcher::{best_match, score};
pub use page_port::{DomError, DomPort, NodeId, OverlayPort};
pub use tokio_util::sync::CancellationToken;

use fill_engine::{FillEngine, FillEventsPort, FillMetricsPort};
use mapper_session::{MapperEventsPort, MapperSession};

/// One engine instance bound to one page.
pub struct Engine {
    dom: Arc<dyn DomPort>,
    fill: FillEngine,
    mapper: Mutex<MapperSession>,
}

impl Engine {
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// Run one tiered fill pass over the page.
    #[instrument(skip_all, fields(fill_id = %ctx.fill_id))]
    pub async fn fill(&self, ctx: &ExecCtx, params: &FillParams) -> Result<FillSummary, EngineError> {
        Ok(self.fill.fill(ctx, params).await?)
    }

    /// Classify one field by its hint string and `autocomplete` attribute.
    pub fn classify_field(&self, hints: &str, autocomplete: &str) -> Option<FieldKey> {
        classify(hints, autocomplete)
    }

    /// Index of the option best matching `desired`, if any scores at all.
    pub fn match_option<S: AsRef<str>>(&self, desired: &str, candidates: &[S]) -> Option<usize> {
        best_match(desired, candidates)
    }

    /// Derive a replay selector for an element on the current page.
    pub async fn synthesize_selector(&self, node: NodeId) -> Result<String, EngineError> {
        Ok(selector_synth::synthesize(self.dom.as_ref(), node).await?)
    }

    /// Clear any fill highlight batch still on screen.
    pub async fn clear_highlights(&self) {
        self.fill.clear_highlights().await;
    }

    /// Enter interactive capture mode.
    pub async fn start_mapper(&self) -> StartOutcome {
        self.mapper.lock().await.start().await
    }

    /// Leave capture mode and clean the page up.
    pub async fn stop_mapper(&self) -> StopOutcome {
        self.mapper.lock().await.stop().await
    }

    pub async fn mapper_active(&self) -> bool {
        self.mapper.lock().await.is_active()
    }

    /// Route a click the host intercepted while the mapper is active.
    pub async fn mapper_click(&self, node: NodeId) -> Result<ClickDisposition, EngineError> {
        Ok(self.mapper.lock().await.handle_click(node).await?)
    }

    /// Route an Escape keypress; cancels an active mapper session.
    pub async fn mapper_escape(&self) {
        self.mapper.lock().await.handle_escape().await;
    }
}

#[derive(Default)]
pub struct EngineBuilder {
    dom: Option<Arc<dyn DomPort>>,
    overlay: Option<Arc<dyn OverlayPort>>,
    listener: Option<Arc<dyn ListenerPort>>,
    tempo: Option<Arc<dyn TempoPort>>,
    fill_events: Option<Arc<dyn FillEventsPort>>,
    fill_metrics: Option<Arc<dyn FillMetricsPort>>,
    mapper_events: Option<Arc<dyn MapperEventsPort>>,
    fill_policy: Option<FillPolicyView>,
    mapper_policy: Option<MapperPolicyView>,
}

impl EngineBuilder {
    pub fn with_dom(mut self, dom: Arc<dyn DomPort>) -> Self {
        self.dom = Some(dom);
        self
    }

    pub fn with_overlay(mut self, overlay: Arc<dyn OverlayPort>) -> Self {
        self.overlay = Some(overlay);
        self
    }

    pub fn with_listener(mut self, listener: Arc<dyn ListenerPort>) -> Self {
        self.listener = Some(listener);
        self
    }

    pub fn with_tempo(mut self, tempo: Arc<dyn TempoPort>) -> Self {
        self.tempo = Some(tempo);
        self
    }

    pub fn with_fill_events(mut self, events: Arc<dyn FillEventsPort>) -> Self {
        self.fill_events = Some(events);
        self
    }

    pub fn with_fill_metrics(mut self, metrics: Arc<dyn FillMetricsPort>) -> Self {
        self.fill_metrics = Some(metrics);
        self
    }

    pub fn with_mapper_events(mut self, events: Arc<dyn MapperEventsPort>) -> Self {
        self.mapper_events = Some(events);
        self
    }

    pub fn with_fill_policy(mut self, policy: FillPolicyView) -> Self {
        self.fill_policy = Some(policy);
        self
    }

    pub fn with_mapper_policy(mut self, policy: MapperPolicyView) -> Self {
        self.mapper_policy = Some(policy);
        self
    }

    pub fn build(self) -> Engine {
        let dom = self.dom.expect("dom port is required");
        let overlay = self.overlay.expect("overlay port is required");

        let mut fill = FillEngine::builder()
            .with_dom(dom.clone())
            .with_overlay(overlay.clone());
        if let Some(tempo) = self.tempo {
            fill = fill.with_tempo(tempo);
        }
        if let Some(events) = self.fill_events {
            fill = fill.with_events(events);
        }
        if let Some(metrics) = self.fill_metrics {
            fill = fill.with_metrics(metrics);
        }
        if let Some(policy) = self.fill_policy {
            fill = fill.with_policy(policy);
        }

        let mut mapper = MapperSession::builder()
            .with_dom(dom.clone())
            .with_overlay(overlay);
        if let Some(listener) = self.listener {
            mapper = mapper.with_listener(listener);
        }
        if let Some(events) = self.mapper_events {
            mapper = mapper.with_events(events);
        }
        if let Some(policy) = self.mapper_policy {
            mapper = mapper.with_policy(policy);
        }

        Engine {
            dom,
            fill: fill.build(),
            mapper: Mutex::new(mapper.build()),
        }
    }
}
