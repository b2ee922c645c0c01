use std::collections::{HashMap, HashSet};

use crate::{ConstructionError, InvalidSpeciesError};

use super::history::History;
use super::Integrator;
use pool::{Deltas, Name, Pool};
use reaction::Reaction;

pub mod pool;
pub mod reaction;

/// Data structure representing a mass-action reaction network.
/// - reactions
///     - the immutable list of elementary reactions driving the dynamics
/// - pool
///     - current concentration of every species the reactions mention
/// - history
///     - the sampled concentration trajectory, extended by each simulate call
/// - frozen
///     - species that rate evaluation reads but the integrator never mutates,
///       so they behave as reservoirs that keep driving other reactions
#[derive(Debug, Clone)]
pub struct ReactionNetwork {
    reactions: Vec<Reaction>,
    pool: Pool,
    history: History,
    frozen: HashSet<Name>,
    elapsed: f64,
}

impl ReactionNetwork {
    /// Builds a network from a reaction list and derives the default pool.
    ///
    /// The list must be non-empty and every reaction well formed: a finite
    /// nonnegative rate constant and at least one term on one side.
    pub fn new(reactions: Vec<Reaction>) -> Result<Self, ConstructionError> {
        if reactions.is_empty() {
            return Err(ConstructionError::EmptyReactionList);
        }
        for reaction in &reactions {
            let rate_constant = reaction.get_rate_constant();
            if !rate_constant.is_finite() || rate_constant < 0.0 {
                return Err(ConstructionError::InvalidRateConstant {
                    reaction: reaction.to_string(),
                    rate_constant,
                });
            }
            if reaction.get_reactants().is_empty() && reaction.get_products().is_empty() {
                return Err(ConstructionError::EmptyReaction(reaction.to_string()));
            }
        }

        let pool = Pool::from_reactions(&reactions);
        let history = History::new(&pool);

        Ok(Self {
            reactions,
            pool,
            history,
            frozen: HashSet::new(),
            elapsed: 0.0,
        })
    }

    /// Overrides starting concentrations before simulation begins.
    ///
    /// Every key is validated against the pool before anything is mutated;
    /// an unknown species leaves pool and history untouched. On success each
    /// named species takes the override value and its history series resets
    /// to that single element.
    pub fn initialize(&mut self, overrides: &HashMap<Name, f64>) -> Result<(), InvalidSpeciesError> {
        for species in overrides.keys() {
            if !self.pool.contains(species) {
                return Err(InvalidSpeciesError(species.0.clone()));
            }
        }

        for (species, concentration) in overrides {
            self.pool.set(species, *concentration);
            self.history.reset_series(species, *concentration);
        }

        Ok(())
    }

    /// Marks species as frozen. Duplicates collapse; an unknown name fails
    /// before the frozen set is touched.
    pub fn freeze(&mut self, species: &[Name]) -> Result<(), InvalidSpeciesError> {
        for name in species {
            if !self.pool.contains(name) {
                return Err(InvalidSpeciesError(name.0.clone()));
            }
        }

        self.frozen.extend(species.iter().cloned());

        Ok(())
    }

    /// Integrates the network forward with explicit Euler steps until the
    /// largest per-step rate magnitude drops below `convergence_threshold`
    /// or `max_steps` steps have run, then returns the trajectory log.
    ///
    /// Repeated calls continue from the current pool state and extend the
    /// history; the step budget is per call, elapsed time accumulates.
    ///
    /// Accuracy is entirely a function of `dt`. A large `dt` combined with
    /// fast rate constants can overshoot into negative or divergent
    /// concentrations; such values propagate silently into pool and history.
    ///
    /// # Panics
    /// On contract violations: `dt <= 0`, a negative threshold, or a zero
    /// step budget.
    pub fn simulate(&mut self, dt: f64, convergence_threshold: f64, max_steps: usize) -> &History {
        Integrator::new(self, dt, convergence_threshold, max_steps).run();
        &self.history
    }

    /// One forward-Euler step: evaluates every reaction against the
    /// unmodified pool, stages the deltas, then merges them in one shot.
    /// Returns the largest rate magnitude seen this step.
    pub(crate) fn advance(&mut self, dt: f64) -> f64 {
        let mut deltas = Deltas::new();
        let mut max_rate: f64 = 0.0;

        for reaction in &self.reactions {
            // rate is the per-step increment k * dt * Π(concentration), one
            // factor per reactant occurrence
            let mut rate = reaction.get_rate_constant() * dt;
            for term in reaction.get_reactants() {
                for _ in 0..term.get_coefficient() {
                    rate *= self.pool.concentration(term.get_species_name());
                }
            }
            max_rate = max_rate.max(rate.abs());

            for term in reaction.get_reactants() {
                if !self.frozen.contains(term.get_species_name()) {
                    for _ in 0..term.get_coefficient() {
                        deltas.consume(term.get_species_name(), rate);
                    }
                }
            }
            for term in reaction.get_products() {
                if !self.frozen.contains(term.get_species_name()) {
                    for _ in 0..term.get_coefficient() {
                        deltas.produce(term.get_species_name(), rate);
                    }
                }
            }
        }

        self.pool.apply(deltas);

        max_rate
    }

    pub(crate) fn record_sample(&mut self, time: f64) {
        self.history.record(&self.pool, time);
    }

    /// Total simulated time across every simulate call so far
    pub fn get_elapsed(&self) -> f64 {
        self.elapsed
    }

    pub(crate) fn set_elapsed(&mut self, elapsed: f64) {
        self.elapsed = elapsed;
    }

    /// Returns a reference to the current pool
    pub fn get_pool(&self) -> &Pool {
        &self.pool
    }

    /// Returns a reference to the trajectory log
    pub fn get_history(&self) -> &History {
        &self.history
    }

    pub fn get_reactions(&self) -> &[Reaction] {
        &self.reactions
    }

    pub fn get_frozen(&self) -> &HashSet<Name> {
        &self.frozen
    }
}
