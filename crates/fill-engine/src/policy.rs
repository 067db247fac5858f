//! Tunables for one engine instance. All values have working defaults;
//! hosts override them through the builder.

/// Inclusive millisecond range for a randomized pause.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PauseRange {
    pub min_ms: u64,
    pub max_ms: u64,
}

impl PauseRange {
    pub const fn new(min_ms: u64, max_ms: u64) -> Self {
        Self { min_ms, max_ms }
    }
}

/// Pause ranges for the interaction simulator, one per pause point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TempoRanges {
    /// After the mouse burst, while the dropdown would be opening.
    pub open: PauseRange,
    /// After committing the selection, as if reading the choice.
    pub deliberate: PauseRange,
    /// After the input/change notifications.
    pub settle: PauseRange,
}

impl Default for TempoRanges {
    fn default() -> Self {
        Self {
            open: PauseRange::new(300, 900),
            deliberate: PauseRange::new(200, 600),
            settle: PauseRange::new(200, 700),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FillPolicyView {
    /// Outline color for changed fields.
    pub highlight_color: String,
    /// How long a highlight batch stays on screen before auto-clearing.
    pub highlight_ms: u64,
    pub tempo: TempoRanges,
}

impl Default for FillPolicyView {
    fn default() -> Self {
        Self {
            highlight_color: "#22c55e".to_string(),
            highlight_ms: 4500,
            tempo: TempoRanges::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_stable() {
        let policy = FillPolicyView::default();
        assert_eq!(policy.highlight_color, "#22c55e");
        assert_eq!(policy.highlight_ms, 4500);
        assert_eq!(policy.tempo.open, PauseRange::new(300, 900));
        assert_eq!(policy.tempo.deliberate, PauseRange::new(200, 600));
        assert_eq!(policy.tempo.settle, PauseRange::new(200, 700));
    }
}
