use async_trait::async_trait;

use crate::model::FieldInfo;

/// Host hook for the capture-phase click and keydown listeners. The host
/// routes intercepted events back into the session.
#[async_trait]
pub trait ListenerPort: Send + Sync {
    async fn attach(&self);
    async fn detach(&self);
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NullListener;

#[async_trait]
impl ListenerPort for NullListener {
    async fn attach(&self) {}
    async fn detach(&self) {}
}

/// Session notifications toward the host UI.
pub trait MapperEventsPort: Send + Sync {
    fn on_field_selected(&self, info: &FieldInfo);
    fn on_cancelled(&self);
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NullMapperEvents;

impl MapperEventsPort for NullMapperEvents {
    fn on_field_selected(&self, _info: &FieldInfo) {}
    fn on_cancelled(&self) {}
}
