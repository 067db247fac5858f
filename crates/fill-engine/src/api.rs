//! Engine construction and entry points.

use std::sync::Arc;

use page_port::{DomPort, OverlayPort};

use crate::errors::FillError;
use crate::events::NullFillEvents;
use crate::highlight::Highlighter;
use crate::metrics::NullFillMetrics;
use crate::model::{ExecCtx, FillParams, FillSummary};
use crate::policy::FillPolicyView;
use crate::ports::{FillEventsPort, FillMetricsPort, TempoPort};
use crate::runner::{self, RuntimeDeps};
use crate::tempo::HumanTempo;

/// One fill engine bound to a page; hosts hold it for the page's lifetime.
pub struct FillEngine {
    deps: RuntimeDeps,
}

impl FillEngine {
    pub fn builder() -> FillEngineBuilder {
        FillEngineBuilder::default()
    }

    /// Run one tiered fill pass over the current page.
    pub async fn fill(&self, ctx: &ExecCtx, params: &FillParams) -> Result<FillSummary, FillError> {
        if ctx.cancel.is_cancelled() {
            return Err(FillError::Cancelled);
        }
        runner::execute(&self.deps, ctx, params).await
    }

    /// Clear any highlight batch still on screen.
    pub async fn clear_highlights(&self) {
        self.deps.highlighter.clear_now().await;
    }
}

#[derive(Default)]
pub struct FillEngineBuilder {
    dom: Option<Arc<dyn DomPort>>,
    overlay: Option<Arc<dyn OverlayPort>>,
    tempo: Option<Arc<dyn TempoPort>>,
    events: Option<Arc<dyn FillEventsPort>>,
    metrics: Option<Arc<dyn FillMetricsPort>>,
    policy: Option<FillPolicyView>,
}

impl FillEngineBuilder {
    pub fn with_dom(mut self, dom: Arc<dyn DomPort>) -> Self {
        self.dom = Some(dom);
        self
    }

    pub fn with_overlay(mut self, overlay: Arc<dyn OverlayPort>) -> Self {
        self.overlay = Some(overlay);
        self
    }

    pub fn with_tempo(mut self, tempo: Arc<dyn TempoPort>) -> Self {
        self.tempo = Some(tempo);
        self
    }

    pub fn with_events(mut self, events: Arc<dyn FillEventsPort>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<dyn FillMetricsPort>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn with_policy(mut self, policy: FillPolicyView) -> Self {
        self.policy = Some(policy);
        self
    }

    pub fn build(self) -> FillEngine {
        let overlay = self.overlay.expect("overlay port is required");
        FillEngine {
            deps: RuntimeDeps {
                dom: self.dom.expect("dom port is required"),
                tempo: self.tempo.unwrap_or_else(|| Arc::new(HumanTempo)),
                events: self.events.unwrap_or_else(|| Arc::new(NullFillEvents)),
                metrics: self.metrics.unwrap_or_else(|| Arc::new(NullFillMetrics)),
                highlighter: Highlighter::new(overlay),
                policy: self.policy.unwrap_or_default(),
            },
        }
    }
}
