use std::collections::HashMap;
use std::fmt::Display;

use super::reaction::Reaction;

/// Tuple struct wrapper around name data for a chemical species
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Debug)]
pub struct Name(pub String);

/// The live mapping of every species in a network to its current
/// concentration. The pool is the single source of truth for state: rate
/// evaluation reads it, and the staged deltas of a step are merged into it
/// in one shot via the .apply method.
///
/// Concentrations are plain f64 values whose sign is not constrained; an
/// unstable step size can drive them negative and the pool will carry that.
#[derive(Debug, Clone, PartialEq)]
pub struct Pool {
    concentrations: HashMap<Name, f64>,
}

impl Pool {
    /// Derives default concentrations from a reaction list.
    ///
    /// Two passes, independent of reaction order: every species occurring as
    /// a reactant starts at 1.0, then every species occurring as a product
    /// anywhere in the network is overwritten with 0.0. Product role wins
    /// when a species plays both roles. Terms with coefficient 0 register
    /// nothing.
    pub fn from_reactions(reactions: &[Reaction]) -> Self {
        let mut concentrations = HashMap::new();

        for reaction in reactions {
            for term in reaction.get_reactants() {
                if term.get_coefficient() > 0 {
                    concentrations.insert(term.get_species_name().clone(), 1.0);
                }
            }
        }
        for reaction in reactions {
            for term in reaction.get_products() {
                if term.get_coefficient() > 0 {
                    concentrations.insert(term.get_species_name().clone(), 0.0);
                }
            }
        }

        Self { concentrations }
    }

    /// Current concentration of a species. The caller must only name species
    /// the pool was built from; anything else is a defect in the engine.
    pub fn concentration(&self, species: &Name) -> f64 {
        *self
            .concentrations
            .get(species)
            .expect("species missing from pool")
    }

    pub fn contains(&self, species: &Name) -> bool {
        self.concentrations.contains_key(species)
    }

    pub(crate) fn set(&mut self, species: &Name, concentration: f64) {
        self.concentrations.insert(species.clone(), concentration);
    }

    /// Iterates over every species name in the pool
    pub fn species(&self) -> impl Iterator<Item = &Name> {
        self.concentrations.keys()
    }

    pub fn len(&self) -> usize {
        self.concentrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.concentrations.is_empty()
    }

    /// Merges a step's staged deltas into the pool. Every staged species must
    /// already exist in the pool.
    pub(crate) fn apply(&mut self, deltas: Deltas) {
        for (species, delta) in deltas.staged {
            let concentration = self
                .concentrations
                .get_mut(&species)
                .expect("staged delta for a species missing from the pool");
            *concentration += delta;
        }
    }
}

impl IntoIterator for Pool {
    type Item = (Name, f64);
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        let mut entries: Vec<(Name, f64)> = self.concentrations.into_iter().collect();
        entries.sort_by(|left, right| left.0.cmp(&right.0));
        entries.into_iter()
    }
}

impl Display for Pool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut formatted_string = String::new();
        for (name, concentration) in self.clone().into_iter() {
            formatted_string.push_str(&format!("{},{},", name.0, concentration));
        }

        write!(f, "{}", formatted_string)
    }
}

/// Per-step accumulator for concentration changes.
///
/// Rates are staged here while every reaction of the step still reads the
/// unmodified pool, then merged in one shot. No reaction's delta is visible
/// to another within the same step.
#[derive(Debug, Default)]
pub(crate) struct Deltas {
    staged: HashMap<Name, f64>,
}

impl Deltas {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Stages one reactant occurrence, subtracting the rate once
    pub(crate) fn consume(&mut self, species: &Name, rate: f64) {
        *self.staged.entry(species.clone()).or_insert(0.0) -= rate;
    }

    /// Stages one product occurrence, adding the rate once
    pub(crate) fn produce(&mut self, species: &Name, rate: f64) {
        *self.staged.entry(species.clone()).or_insert(0.0) += rate;
    }
}

#[cfg(test)]
mod tests {
    use super::super::reaction::{term::Term, Reaction};
    use super::*;

    fn name(text: &str) -> Name {
        Name(text.to_string())
    }

    fn reaction(reactants: &[(&str, u64)], products: &[(&str, u64)], rate_constant: f64) -> Reaction {
        let build = |terms: &[(&str, u64)]| {
            terms
                .iter()
                .map(|(species, coefficient)| Term::new(name(species), *coefficient))
                .collect()
        };
        Reaction::new(build(reactants), build(products), rate_constant)
    }

    #[test]
    fn reactant_only_species_default_to_one() {
        let pool = Pool::from_reactions(&[reaction(&[("A", 1)], &[("B", 1)], 1.0)]);

        assert_eq!(pool.concentration(&name("A")), 1.0);
        assert_eq!(pool.concentration(&name("B")), 0.0);
    }

    #[test]
    fn product_role_wins_across_the_network() {
        // A is a reactant in one reaction and a product in another; the
        // product-role default must win regardless of list order.
        let forward = reaction(&[("A", 1)], &[("B", 1)], 1.0);
        let backward = reaction(&[("C", 1)], &[("A", 1)], 1.0);

        let pool = Pool::from_reactions(&[forward.clone(), backward.clone()]);
        let reordered = Pool::from_reactions(&[backward, forward]);

        assert_eq!(pool.concentration(&name("A")), 0.0);
        assert_eq!(pool, reordered);
    }

    #[test]
    fn zero_coefficient_terms_register_nothing() {
        let pool = Pool::from_reactions(&[reaction(&[("A", 1), ("X", 0)], &[("B", 1)], 1.0)]);

        assert!(!pool.contains(&name("X")));
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn apply_merges_staged_deltas_in_one_shot() {
        let mut pool = Pool::from_reactions(&[reaction(&[("A", 1)], &[("B", 1)], 1.0)]);

        let mut deltas = Deltas::new();
        deltas.consume(&name("A"), 0.25);
        deltas.consume(&name("A"), 0.25);
        deltas.produce(&name("B"), 0.5);
        pool.apply(deltas);

        assert_eq!(pool.concentration(&name("A")), 0.5);
        assert_eq!(pool.concentration(&name("B")), 0.5);
    }

    #[test]
    fn display_orders_species_by_name() {
        let pool = Pool::from_reactions(&[reaction(&[("B", 1), ("A", 1)], &[], 1.0)]);

        assert_eq!(pool.to_string(), "A,1,B,1,");
    }
}
