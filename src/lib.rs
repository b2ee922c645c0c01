//! # Description
//! This is the main simulation engine of DYMA. It takes a set of elementary
//! reactions as well as a set of initial species concentrations and uses
//! these to integrate the deterministic mass-action dynamics of the network
//! with explicit forward-Euler steps, producing a concentration trajectory
//! for every species.
//!
//! A network is assembled from [`Reaction`](simulation::reaction_network::reaction::Reaction)
//! values, either built directly from terms or parsed from equation strings
//! such as `2H2 + O2 === 2H2O` via the [`parse`] module. Starting
//! concentrations default to 1.0 for reactant-only species and 0.0 for
//! anything produced somewhere in the network; `initialize` overrides them
//! and `freeze` pins species that reactions read but never change.
//!
//! Simulating runs until the largest per-step rate magnitude drops below a
//! convergence threshold or a step budget runs out, whichever comes first.
//! The sampled history is bounded near 1e5 points regardless of step count
//! and can be summarised or exported through the [`report`] module.
//!
//! Accuracy is entirely a function of the step size: there is no error
//! estimate and no stiffness handling, and an aggressive `dt` will overshoot
//! without raising an error.

pub mod parse;
pub mod report;
pub mod simulation;

use thiserror::Error;
use tracing::debug;

use simulation::history::History;
use simulation::reaction_network::ReactionNetwork;

/// Raised while assembling a network from a reaction list. No partial
/// network is produced.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConstructionError {
    #[error("a network needs at least one reaction")]
    EmptyReactionList,
    #[error("reaction `{0}` has no reactants and no products")]
    EmptyReaction(String),
    #[error("reaction `{reaction}` has rate constant {rate_constant}, expected a finite nonnegative value")]
    InvalidRateConstant { reaction: String, rate_constant: f64 },
}

/// Raised when `initialize` or `freeze` names a species that no reaction
/// mentions. The failing call leaves the network unmodified.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown species `{0}`")]
pub struct InvalidSpeciesError(pub String);

/// This is a builder object containing defaults and methods for constructing
/// a Simulation object.
///
/// Defaults:
///
/// dt = 0.01
/// convergence threshold = 1e-5
/// step budget = 100_000
pub struct Builder {
    network: ReactionNetwork,
    dt: f64,
    convergence_threshold: f64,
    max_steps: usize,
}

impl Builder {
    pub fn new(network: ReactionNetwork) -> Self {
        Self {
            network,
            dt: 0.01,
            convergence_threshold: 1e-5,
            max_steps: 100_000,
        }
    }

    /// Sets the integration step size to a manual value
    pub fn dt(mut self, dt: f64) -> Self {
        self.dt = dt;
        self
    }

    /// Sets the rate magnitude below which the network counts as converged
    pub fn convergence_threshold(mut self, threshold: f64) -> Self {
        self.convergence_threshold = threshold;
        self
    }

    /// Sets the per-run step budget to a manual value
    pub fn max_steps(mut self, count: usize) -> Self {
        self.max_steps = count;
        self
    }

    /// Consumes the builder object and outputs a Simulation object
    pub fn build(self) -> Simulation {
        Simulation {
            network: self.network,
            dt: self.dt,
            convergence_threshold: self.convergence_threshold,
            max_steps: self.max_steps,
        }
    }
}

/// A reaction network bundled with integration settings. Each run call
/// continues from the state the previous one ended in.
pub struct Simulation {
    network: ReactionNetwork,
    dt: f64,
    convergence_threshold: f64,
    max_steps: usize,
}

impl Simulation {
    /// Integrates until the convergence threshold or the step budget is hit
    /// and returns the trajectory log
    pub fn run(&mut self) -> &History {
        self.network
            .simulate(self.dt, self.convergence_threshold, self.max_steps);
        debug!(pool = %self.network.get_pool(), "pool after run");

        self.network.get_history()
    }

    pub fn network(&self) -> &ReactionNetwork {
        &self.network
    }

    pub fn network_mut(&mut self) -> &mut ReactionNetwork {
        &mut self.network
    }

    /// Consumes the simulation and hands the network back
    pub fn into_network(self) -> ReactionNetwork {
        self.network
    }
}

#[cfg(test)]
mod tests {
    use crate::simulation::reaction_network::{
        pool::Name,
        reaction::{term::Term, Reaction},
        ReactionNetwork,
    };

    use super::*;

    fn decay_network() -> ReactionNetwork {
        ReactionNetwork::new(vec![Reaction::new(
            vec![Term::new(Name("A".to_string()), 1)],
            vec![Term::new(Name("B".to_string()), 1)],
            1.0,
        )])
        .unwrap()
    }

    #[test]
    fn builder_applies_defaults_and_overrides() {
        let simulation = Builder::new(decay_network()).build();
        assert_eq!(simulation.dt, 0.01);
        assert_eq!(simulation.convergence_threshold, 1e-5);
        assert_eq!(simulation.max_steps, 100_000);

        let simulation = Builder::new(decay_network())
            .dt(0.001)
            .convergence_threshold(1e-8)
            .max_steps(50)
            .build();
        assert_eq!(simulation.dt, 0.001);
        assert_eq!(simulation.convergence_threshold, 1e-8);
        assert_eq!(simulation.max_steps, 50);
    }

    #[test]
    fn repeated_runs_continue_the_same_trajectory() {
        let mut simulation = Builder::new(decay_network()).max_steps(10).build();

        let first_len = simulation.run().len();
        let second_len = simulation.run().len();

        assert_eq!(first_len, 11);
        assert_eq!(second_len, 21);

        let time = simulation.network().get_history().get_time().to_vec();
        assert!(time.windows(2).all(|pair| pair[1] > pair[0]));
    }

    #[test]
    fn errors_render_their_context() {
        let error = ConstructionError::EmptyReactionList;
        assert_eq!(error.to_string(), "a network needs at least one reaction");

        let error = InvalidSpeciesError("X".to_string());
        assert_eq!(error.to_string(), "unknown species `X`");
    }
}
