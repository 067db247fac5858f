//! Highlight batch bookkeeping. One batch is visible at a time; a new
//! flash clears the previous one, and each batch auto-clears after the
//! policy duration unless it was already superseded.

use std::sync::Arc;
use std::time::Duration;

use page_port::{NodeId, OverlayPort};
use parking_lot::Mutex;

#[derive(Default)]
struct Batch {
    generation: u64,
    nodes: Vec<NodeId>,
}

#[derive(Clone)]
pub struct Highlighter {
    overlay: Arc<dyn OverlayPort>,
    current: Arc<Mutex<Batch>>,
}

impl Highlighter {
    pub fn new(overlay: Arc<dyn OverlayPort>) -> Self {
        Self {
            overlay,
            current: Arc::new(Mutex::new(Batch::default())),
        }
    }

    /// Outline `nodes` in `color`, replacing any batch still on screen,
    /// and schedule the auto-clear.
    pub async fn flash(&self, nodes: Vec<NodeId>, color: &str, duration_ms: u64) {
        let (previous, generation) = {
            let mut batch = self.current.lock();
            batch.generation += 1;
            let previous = std::mem::replace(&mut batch.nodes, nodes.clone());
            (previous, batch.generation)
        };
        if !previous.is_empty() {
            self.overlay.clear_highlight(&previous).await;
        }
        if nodes.is_empty() {
            return;
        }
        self.overlay.highlight(&nodes, color).await;

        let overlay = Arc::clone(&self.overlay);
        let current = Arc::clone(&self.current);
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(duration_ms)).await;
            let expired = {
                let mut batch = current.lock();
                if batch.generation == generation {
                    std::mem::take(&mut batch.nodes)
                } else {
                    Vec::new()
                }
            };
            if !expired.is_empty() {
                overlay.clear_highlight(&expired).await;
            }
        });
    }

    /// Clear whatever batch is on screen right now.
    pub async fn clear_now(&self) {
        let nodes = {
            let mut batch = self.current.lock();
            batch.generation += 1;
            std::mem::take(&mut batch.nodes)
        };
        if !nodes.is_empty() {
            self.overlay.clear_highlight(&nodes).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use page_port::fake::{ElementSpec, FakePage};

    #[tokio::test]
    async fn new_batch_replaces_previous() {
        let page = Arc::new(FakePage::new("https://example.com"));
        let a = page.add(ElementSpec::input("text"));
        let b = page.add(ElementSpec::input("text"));
        let highlighter = Highlighter::new(page.clone());

        highlighter.flash(vec![a], "#22c55e", 60_000).await;
        assert_eq!(page.highlighted(), vec![a]);

        highlighter.flash(vec![b], "#22c55e", 60_000).await;
        assert_eq!(page.highlighted(), vec![b]);
    }

    #[tokio::test(start_paused = true)]
    async fn batch_auto_clears_after_duration() {
        let page = Arc::new(FakePage::new("https://example.com"));
        let a = page.add(ElementSpec::input("text"));
        let highlighter = Highlighter::new(page.clone());

        highlighter.flash(vec![a], "#22c55e", 4500).await;
        assert_eq!(page.highlight_color(a).as_deref(), Some("#22c55e"));

        tokio::time::sleep(Duration::from_millis(5000)).await;
        tokio::task::yield_now().await;
        assert!(page.highlighted().is_empty());
    }

    #[tokio::test]
    async fn clear_now_removes_batch() {
        let page = Arc::new(FakePage::new("https://example.com"));
        let a = page.add(ElementSpec::input("text"));
        let highlighter = Highlighter::new(page.clone());

        highlighter.flash(vec![a], "#60a5fa", 60_000).await;
        highlighter.clear_now().await;
        assert!(page.highlighted().is_empty());
    }
}
