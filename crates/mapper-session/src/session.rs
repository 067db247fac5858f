use std::sync::Arc;

use formpilot_core_types::hostname_of;
use page_port::{classify_target, DomPort, FieldDescriptor, NodeId, OverlayPort, TargetKind};
use tracing::{debug, instrument};

use crate::errors::MapperError;
use crate::model::{ClickDisposition, FieldInfo, MapperState, StartOutcome, StopOutcome};
use crate::policy::MapperPolicyView;
use crate::ports::{ListenerPort, MapperEventsPort, NullListener, NullMapperEvents};

/// One capture session over the current page. At most one is meaningful per
/// page; the owner serializes access.
pub struct MapperSession {
    dom: Arc<dyn DomPort>,
    overlay: Arc<dyn OverlayPort>,
    listener: Arc<dyn ListenerPort>,
    events: Arc<dyn MapperEventsPort>,
    policy: MapperPolicyView,
    state: MapperState,
}

impl MapperSession {
    pub fn builder() -> MapperSessionBuilder {
        MapperSessionBuilder::default()
    }

    pub fn is_active(&self) -> bool {
        self.state.active
    }

    pub fn state(&self) -> MapperState {
        self.state
    }

    /// Enter capture mode: attach listeners and show the banner. Starting
    /// an already active session changes nothing.
    pub async fn start(&mut self) -> StartOutcome {
        if self.state.active {
            return StartOutcome::AlreadyActive;
        }
        self.clear_highlight().await;
        self.listener.attach().await;
        self.overlay.show_banner(&self.policy.banner_text).await;
        self.state.active = true;
        StartOutcome::Started
    }

    /// Leave capture mode and remove every trace of it from the page.
    /// Stopping an inactive session only clears a leftover highlight.
    pub async fn stop(&mut self) -> StopOutcome {
        let outcome = if self.state.active {
            self.listener.detach().await;
            self.overlay.remove_banner().await;
            self.state.active = false;
            StopOutcome::Stopped
        } else {
            StopOutcome::AlreadyInactive
        };
        self.clear_highlight().await;
        outcome
    }

    /// Route an intercepted click. Clicks on non-fillable elements pass
    /// through untouched; a click on a fillable field captures it and is
    /// consumed, except on a `<select>`, whose native popup is deliberately
    /// left to open. The session keeps listening after a capture, so the
    /// operator can map several fields before Escape or an explicit stop.
    #[instrument(skip_all, fields(%node))]
    pub async fn handle_click(&mut self, node: NodeId) -> Result<ClickDisposition, MapperError> {
        if !self.state.active {
            return Ok(ClickDisposition::pass());
        }
        let kind = match classify_target(self.dom.as_ref(), node).await {
            Ok(Some(kind)) => kind,
            Ok(None) | Err(_) => return Ok(ClickDisposition::pass()),
        };

        let selector = selector_synth::synthesize(self.dom.as_ref(), node).await?;
        let desc = FieldDescriptor::scan(self.dom.as_ref(), node).await?;
        let info = FieldInfo {
            hostname: hostname_of(&self.dom.document_url().await),
            selector,
            tag: desc.tag,
            input_type: desc.input_type,
            name: desc.name,
            id: desc.id,
            label: desc.label,
            hints: desc.hints,
        };
        debug!(selector = %info.selector, "field captured");

        self.clear_highlight().await;
        self.overlay
            .highlight(&[node], &self.policy.highlight_color)
            .await;
        self.state.highlighted = Some(node);

        self.events.on_field_selected(&info);

        Ok(if matches!(kind, TargetKind::Select) {
            ClickDisposition::pass()
        } else {
            ClickDisposition::consume()
        })
    }

    /// Escape cancels an active session without selecting anything.
    pub async fn handle_escape(&mut self) {
        if !self.state.active {
            return;
        }
        self.stop().await;
        self.events.on_cancelled();
    }

    async fn clear_highlight(&mut self) {
        if let Some(node) = self.state.highlighted.take() {
            self.overlay.clear_highlight(&[node]).await;
        }
    }
}

#[derive(Default)]
pub struct MapperSessionBuilder {
    dom: Option<Arc<dyn DomPort>>,
    overlay: Option<Arc<dyn OverlayPort>>,
    listener: Option<Arc<dyn ListenerPort>>,
    events: Option<Arc<dyn MapperEventsPort>>,
    policy: Option<MapperPolicyView>,
}

impl MapperSessionBuilder {
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

    pub fn with_events(mut self, events: Arc<dyn MapperEventsPort>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn with_policy(mut self, policy: MapperPolicyView) -> Self {
        self.policy = Some(policy);
        self
    }

    pub fn build(self) -> MapperSession {
        MapperSession {
            dom: self.dom.expect("dom port is required"),
            overlay: self.overlay.expect("overlay port is required"),
            listener: self.listener.unwrap_or_else(|| Arc::new(NullListener)),
            events: self.events.unwrap_or_else(|| Arc::new(NullMapperEvents)),
            policy: self.policy.unwrap_or_default(),
            state: MapperState::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use page_port::fake::{ElementSpec, FakePage};
    use parking_lot::Mutex;

    #[derive(Default)]
    struct RecordingEvents {
        selected: Mutex<Vec<FieldInfo>>,
        cancelled: Mutex<usize>,
    }

    impl MapperEventsPort for RecordingEvents {
        fn on_field_selected(&self, info: &FieldInfo) {
            self.selected.lock().push(info.clone());
        }

        fn on_cancelled(&self) {
            *self.cancelled.lock() += 1;
        }
    }

    fn session_for(
        page: &Arc<FakePage>,
        events: &Arc<RecordingEvents>,
    ) -> MapperSession {
        MapperSession::builder()
            .with_dom(page.clone())
            .with_overlay(page.clone())
            .with_events(events.clone())
            .build()
    }

    #[tokio::test]
    async fn click_on_input_captures_and_consumes() {
        let page = Arc::new(FakePage::new("https://jobs.example.com/apply"));
        let email = page.add(ElementSpec::input("email").id("email").label("Email"));
        let events = Arc::new(RecordingEvents::default());
        let mut session = session_for(&page, &events);

        assert_eq!(session.start().await, StartOutcome::Started);
        assert!(page.banner().is_some());

        let disposition = session.handle_click(email).await.unwrap();
        assert!(disposition.consume_default);
        assert!(session.is_active());
        assert!(page.banner().is_some());
        assert_eq!(page.highlight_color(email).as_deref(), Some("#60a5fa"));

        let selected = events.selected.lock();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].hostname, "jobs.example.com");
        assert_eq!(selected[0].selector, "#email");
        assert_eq!(selected[0].tag, "input");
        assert_eq!(selected[0].input_type, "email");
        assert_eq!(selected[0].label, "Email");
    }

    #[tokio::test]
    async fn click_on_select_does_not_consume_default() {
        let page = Arc::new(FakePage::new("https://jobs.example.com/apply"));
        let select = page.add(ElementSpec::select(&["Yes", "No"]).id("sponsor"));
        let events = Arc::new(RecordingEvents::default());
        let mut session = session_for(&page, &events);

        session.start().await;
        let disposition = session.handle_click(select).await.unwrap();
        assert!(!disposition.consume_default);
        assert_eq!(events.selected.lock().len(), 1);
    }

    #[tokio::test]
    async fn non_fillable_clicks_pass_through() {
        let page = Arc::new(FakePage::new("https://jobs.example.com/apply"));
        let div = page.add(ElementSpec::element("div"));
        let events = Arc::new(RecordingEvents::default());
        let mut session = session_for(&page, &events);

        session.start().await;
        let disposition = session.handle_click(div).await.unwrap();
        assert!(!disposition.consume_default);
        assert!(session.is_active());
        assert!(events.selected.lock().is_empty());
    }

    #[tokio::test]
    async fn escape_cancels_and_cleans_up() {
        let page = Arc::new(FakePage::new("https://jobs.example.com/apply"));
        let events = Arc::new(RecordingEvents::default());
        let mut session = session_for(&page, &events);

        session.start().await;
        session.handle_escape().await;
        assert!(!session.is_active());
        assert!(page.banner().is_none());
        assert_eq!(*events.cancelled.lock(), 1);
    }

    #[tokio::test]
    async fn session_keeps_listening_across_captures() {
        let page = Arc::new(FakePage::new("https://jobs.example.com/apply"));
        let email = page.add(ElementSpec::input("email").id("email"));
        let phone = page.add(ElementSpec::input("tel").id("phone"));
        let events = Arc::new(RecordingEvents::default());
        let mut session = session_for(&page, &events);

        assert_eq!(session.start().await, StartOutcome::Started);
        assert_eq!(session.start().await, StartOutcome::AlreadyActive);

        session.handle_click(email).await.unwrap();
        assert!(session.is_active());
        assert_eq!(page.highlighted(), vec![email]);

        // The second capture takes over the single highlight slot.
        session.handle_click(phone).await.unwrap();
        assert!(session.is_active());
        assert_eq!(page.highlighted(), vec![phone]);

        let selected = events.selected.lock();
        assert_eq!(selected.len(), 2);
        assert_eq!(selected[0].selector, "#email");
        assert_eq!(selected[1].selector, "#phone");
        drop(selected);

        assert_eq!(session.stop().await, StopOutcome::Stopped);
        assert!(page.highlighted().is_empty());
        assert!(page.banner().is_none());
    }

    #[tokio::test]
    async fn stop_is_idempotent_and_reported() {
        let page = Arc::new(FakePage::new("https://jobs.example.com/apply"));
        let events = Arc::new(RecordingEvents::default());
        let mut session = session_for(&page, &events);

        session.start().await;
        assert_eq!(session.stop().await, StopOutcome::Stopped);
        assert!(page.banner().is_none());
        assert_eq!(session.stop().await, StopOutcome::AlreadyInactive);
        // An explicit stop is not a cancellation.
        assert_eq!(*events.cancelled.lock(), 0);
    }

    #[tokio::test]
    async fn inactive_session_ignores_clicks() {
        let page = Arc::new(FakePage::new("https://jobs.example.com/apply"));
        let email = page.add(ElementSpec::input("email").id("email"));
        let events = Arc::new(RecordingEvents::default());
        let mut session = session_for(&page, &events);

        let disposition = session.handle_click(email).await.unwrap();
        assert!(!disposition.consume_default);
        assert!(events.selected.lock().is_empty());
    }
}
