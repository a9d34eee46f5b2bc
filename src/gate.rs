use crate::config::{CellMetrics, GateConfig};
use crate::host::{Capabilities, Environment};

/// Desktop-only switch: wide enough viewport and a fine pointer.
#[derive(Clone, Debug)]
pub(crate) struct ActivationGate {
    min_width_px: f32,
    metrics: CellMetrics,
}

impl ActivationGate {
    pub(crate) fn new(cfg: &GateConfig, metrics: CellMetrics) -> Self {
        Self {
            min_width_px: cfg.min_width_px,
            metrics,
        }
    }

    pub(crate) fn allows(&self, width_px: f32, caps: Capabilities) -> bool {
        width_px > self.min_width_px && !caps.is_touch_primary()
    }

    pub(crate) fn evaluate(&self, env: &impl Environment) -> bool {
        let width = env.viewport().width_px(self.metrics);
        self.allows(width, env.capabilities())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{StaticEnv, Viewport};

    fn gate() -> ActivationGate {
        ActivationGate::new(&GateConfig::default(), CellMetrics::default())
    }

    #[test]
    fn test_width_threshold_is_exclusive() {
        let g = gate();
        assert!(!g.allows(900.0, Capabilities::fine()));
        assert!(g.allows(901.0, Capabilities::fine()));
        assert!(!g.allows(320.0, Capabilities::fine()));
    }

    #[test]
    fn test_touch_closes_gate() {
        let g = gate();
        assert!(!g.allows(1920.0, Capabilities::coarse()));
    }

    #[test]
    fn test_evaluate_uses_cell_metrics() {
        let g = gate();
        // 100 cols * 9 px = 900 px, not above the threshold
        let mut env = StaticEnv {
            viewport: Viewport { cols: 100, rows: 40 },
            caps: Capabilities::fine(),
        };
        assert!(!g.evaluate(&env));
        env.viewport.cols = 101;
        assert!(g.evaluate(&env));
        env.caps = Capabilities::coarse();
        assert!(!g.evaluate(&env));
    }
}
