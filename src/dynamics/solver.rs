use crate::{body::FishBody, error::SimulationError, utils::logging::PhaseTimer};

/// Four-phase integration contract shared by the explicit and implicit integrators.
///
/// [`step`](Self::step) runs `pre_solve → apply_forces → integrate → post_solve` once
/// per substep. The phases are public so callers can drive or instrument them one at a
/// time.
pub trait FishSolver: Send + Sync {
    fn name(&self) -> &str;

    /// Phase sequences per tick.
    fn substeps(&self) -> u32;

    fn fluid_force_scale(&self) -> f32;

    /// Clears the transient force accumulators.
    fn pre_solve(&self, body: &mut FishBody) {
        body.graph_mut().reset_forces();
    }

    fn apply_forces(&self, body: &mut FishBody) -> Result<(), SimulationError>;

    fn integrate(&self, body: &mut FishBody, dt: f32) -> Result<(), SimulationError>;

    fn post_solve(&self, _body: &mut FishBody) {}

    fn step(&self, body: &mut FishBody, dt: f32) -> Result<(), SimulationError> {
        if !dt.is_finite() || dt <= 0.0 {
            return Err(SimulationError::InvalidTimeStep { dt });
        }
        let substeps = self.substeps().max(1);
        let h = dt / substeps as f32;

        for _ in 0..substeps {
            self.pre_solve(body);
            {
                let _timer = PhaseTimer::new("solver::apply_forces", body.graph());
                self.apply_forces(body)?;
            }
            {
                let _timer = PhaseTimer::new("solver::integrate", body.graph());
                self.integrate(body, h)?;
            }
            self.post_solve(body);
        }
        Ok(())
    }
}
