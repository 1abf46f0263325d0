use std::time::Duration;

/// Timing data accumulated by a [`FishSimulation`](crate::simulation::FishSimulation).
#[derive(Debug, Default, Clone, Copy)]
pub struct SolverProfiler {
    pub step_time: Duration,
    pub last_step_time: Duration,
    pub ticks: u64,
    pub failed_ticks: u64,
    pub over_budget_ticks: u64,

    pub node_count: usize,
    pub spring_count: usize,
}

impl SolverProfiler {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn record(&mut self, elapsed: Duration, succeeded: bool) {
        self.step_time += elapsed;
        self.last_step_time = elapsed;
        self.ticks += 1;
        if !succeeded {
            self.failed_ticks += 1;
        }
    }

    pub fn average_step_time(&self) -> Duration {
        if self.ticks == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(self.step_time.as_secs_f64() / self.ticks as f64)
    }

    pub fn report(&self) {
        if self.ticks == 0 {
            return;
        }

        log::info!(
            "Nodes: {}, Springs: {}, Ticks: {} ({} failed, {} over budget)",
            self.node_count,
            self.spring_count,
            self.ticks,
            self.failed_ticks,
            self.over_budget_ticks
        );
        log::info!(
            "  Total step:   {:.2} ms",
            self.step_time.as_secs_f32() * 1000.0
        );
        log::info!(
            "  Average step: {:.3} ms",
            self.average_step_time().as_secs_f32() * 1000.0
        );
    }
}
