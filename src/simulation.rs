use std::time::Instant;

use log::debug;

use crate::{
    body::FishBody,
    config::{SolverConfig, SolverKind},
    dynamics::solver::FishSolver,
    error::SimulationError,
    utils::{logging::TickBudget, profiling::SolverProfiler},
};

/// Owns one fish body and the solver that advances it.
pub struct FishSimulation {
    body: FishBody,
    solver: Box<dyn FishSolver>,
    config: SolverConfig,
    ticks: u64,
    profiler: SolverProfiler,
    tick_budget: Option<TickBudget>,
}

impl FishSimulation {
    pub fn new(body: FishBody, config: SolverConfig) -> Self {
        let solver = config.build();
        let mut profiler = SolverProfiler::default();
        profiler.node_count = body.graph().node_count();
        profiler.spring_count = body.graph().spring_count();
        debug!(
            "simulation: {} nodes, {} springs, {} solver",
            profiler.node_count,
            profiler.spring_count,
            solver.name()
        );
        Self {
            body,
            solver,
            config,
            ticks: 0,
            profiler,
            tick_budget: None,
        }
    }

    /// Swaps the integrator while keeping the body state.
    pub fn set_solver(&mut self, kind: SolverKind) {
        self.config.kind = kind;
        self.solver = self.config.build();
    }

    /// Ticks slower than `budget_ms` are warned about and counted by the profiler.
    pub fn set_tick_budget(&mut self, budget_ms: Option<f32>) {
        self.tick_budget = budget_ms.map(TickBudget::new);
    }

    pub fn solver(&self) -> &dyn FishSolver {
        self.solver.as_ref()
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn body(&self) -> &FishBody {
        &self.body
    }

    /// Mutable body access between ticks, e.g. for muscle actuation.
    pub fn body_mut(&mut self) -> &mut FishBody {
        &mut self.body
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn profiler(&self) -> &SolverProfiler {
        &self.profiler
    }

    /// Advances one tick of the configured length.
    pub fn tick(&mut self) -> Result<(), SimulationError> {
        self.step(self.config.time_step)
    }

    pub fn step(&mut self, dt: f32) -> Result<(), SimulationError> {
        let start = Instant::now();
        let result = self.solver.step(&mut self.body, dt);
        let elapsed = start.elapsed();

        self.profiler.record(elapsed, result.is_ok());
        if let Some(budget) = self.tick_budget {
            if budget.check(self.ticks, self.profiler.node_count, elapsed) {
                self.profiler.over_budget_ticks += 1;
            }
        }
        if let Err(err) = &result {
            log::error!("tick {} failed: {err}", self.ticks);
            return result;
        }

        self.ticks += 1;
        log::trace!(
            "tick {}: kinetic energy {:.4}",
            self.ticks,
            self.body.graph().kinetic_energy()
        );
        Ok(())
    }

    /// Runs `ticks` ticks, stopping at the first failure.
    pub fn run(&mut self, ticks: u32) -> Result<(), SimulationError> {
        for _ in 0..ticks {
            self.tick()?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for FishSimulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FishSimulation")
            .field("body", &self.body)
            .field("solver", &self.solver.name())
            .field("ticks", &self.ticks)
            .finish()
    }
}
