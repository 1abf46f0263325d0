//! Trace and warning helpers tagged with the size of the body being integrated.

use std::time::{Duration, Instant};

use log::{log_enabled, warn, Level};

use crate::core::graph::MassSpringGraph;

/// Traces how long one solver phase took on a body of a given size.
///
/// Only the node and spring counts are captured, so the timer can stay alive while the
/// graph it was created from is mutated.
pub struct PhaseTimer {
    phase: &'static str,
    nodes: usize,
    springs: usize,
    start: Instant,
}

impl PhaseTimer {
    pub fn new(phase: &'static str, graph: &MassSpringGraph) -> Self {
        Self {
            phase,
            nodes: graph.node_count(),
            springs: graph.spring_count(),
            start: Instant::now(),
        }
    }
}

impl Drop for PhaseTimer {
    fn drop(&mut self) {
        if log_enabled!(Level::Trace) {
            log::trace!(
                "{}: {} nodes, {} springs in {} µs",
                self.phase,
                self.nodes,
                self.springs,
                self.start.elapsed().as_micros()
            );
        }
    }
}

/// Real-time budget for one simulation tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickBudget {
    pub budget_ms: f32,
}

impl TickBudget {
    pub fn new(budget_ms: f32) -> Self {
        Self { budget_ms }
    }

    /// Warns and returns `true` when `elapsed` overran the budget.
    pub fn check(&self, tick: u64, nodes: usize, elapsed: Duration) -> bool {
        let elapsed_ms = elapsed.as_secs_f32() * 1000.0;
        if elapsed_ms <= self.budget_ms {
            return false;
        }
        warn!(
            "tick {tick} ({nodes} nodes) took {elapsed_ms:.2} ms, budget {:.2} ms",
            self.budget_ms
        );
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn budget_flags_only_overruns() {
        let budget = TickBudget::new(5.0);
        assert!(!budget.check(0, 12, Duration::from_millis(5)));
        assert!(budget.check(1, 12, Duration::from_millis(6)));
    }
}
