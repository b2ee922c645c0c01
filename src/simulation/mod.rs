use tracing::{info, warn};

use reaction_network::ReactionNetwork;

pub mod history;
pub mod reaction_network;

/// Past this many steps the sampling interval grows so the stored history
/// stays near this many samples regardless of step count.
const MAX_SAMPLES: usize = 100_000;

/// The runtime environment for a single simulate call. Drives forward-Euler
/// steps over a reaction network until the convergence threshold or the step
/// budget terminates the loop, sampling the pool into the history as it goes.
pub(crate) struct Integrator<'net> {
    network: &'net mut ReactionNetwork,
    dt: f64,
    convergence_threshold: f64,
    max_steps: usize,
    log_interval: usize,
}

impl<'net> Integrator<'net> {
    pub(crate) fn new(
        network: &'net mut ReactionNetwork,
        dt: f64,
        convergence_threshold: f64,
        max_steps: usize,
    ) -> Self {
        assert!(dt > 0.0, "dt must be positive");
        assert!(
            convergence_threshold >= 0.0,
            "convergence threshold must be nonnegative"
        );
        assert!(max_steps >= 1, "step budget must allow at least one step");

        let log_interval = if max_steps > MAX_SAMPLES {
            max_steps / MAX_SAMPLES
        } else {
            1
        };

        Self {
            network,
            dt,
            convergence_threshold,
            max_steps,
            log_interval,
        }
    }

    /// Runs the stepping loop to completion. Blocks the caller for the whole
    /// duration; the only exits are convergence and the step budget.
    pub(crate) fn run(mut self) {
        info!(
            dt = self.dt,
            convergence_threshold = self.convergence_threshold,
            max_steps = self.max_steps,
            "simulation started"
        );

        let base_time = self.network.get_elapsed();
        // seeded at the threshold so the loop always takes the first step
        let mut max_rate = self.convergence_threshold;
        let mut step: usize = 1;
        let mut samples: usize = 0;

        while max_rate >= self.convergence_threshold && step <= self.max_steps {
            max_rate = self.network.advance(self.dt);

            // sampled times are exact step multiples of dt, never an
            // accumulated floating sum; the final budgeted step is always
            // recorded even off-interval
            if step % self.log_interval == 0 || step == self.max_steps {
                self.network.record_sample(base_time + step as f64 * self.dt);
                samples += 1;
            }

            step += 1;
        }

        let steps_taken = step - 1;
        let end_time = base_time + steps_taken as f64 * self.dt;
        self.network.set_elapsed(end_time);

        // A call that stops between sampling points still records its end
        // state, so the history always gains at least one point per call.
        if samples == 0 {
            self.network.record_sample(end_time);
        }

        if max_rate >= self.convergence_threshold {
            warn!(
                steps = steps_taken,
                max_rate, "step budget exhausted before the network converged"
            );
        } else {
            info!(steps = steps_taken, "simulation finished");
        }
    }
}
