pub mod term;

use std::fmt::Display;

use term::Term;

/// Represents a single elementary reaction, containing a list of reactant and
/// product terms as well as the rate constant scaling how fast the reaction
/// proceeds under mass-action kinetics.
///
/// Reactions are immutable once built. The optional label carries the source
/// notation a reaction was parsed from and is preferred by reports.
#[derive(Debug, Clone, PartialEq)]
pub struct Reaction {
    reactants: Vec<Term>,
    products: Vec<Term>,
    rate_constant: f64,
    label: Option<String>,
}

impl Reaction {
    pub fn new(reactants: Vec<Term>, products: Vec<Term>, rate_constant: f64) -> Self {
        Self {
            reactants,
            products,
            rate_constant,
            label: None,
        }
    }

    /// Attaches a human readable label to the reaction
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Returns a reference to the list of reactant terms for a reaction
    pub fn get_reactants(&self) -> &[Term] {
        &self.reactants
    }

    /// Returns a reference to the list of product terms for a reaction
    pub fn get_products(&self) -> &[Term] {
        &self.products
    }

    /// Returns the rate constant for a reaction
    pub fn get_rate_constant(&self) -> f64 {
        self.rate_constant
    }

    pub fn get_label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

impl Display for Reaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} → {}", format_side(&self.reactants), format_side(&self.products))
    }
}

fn format_side(terms: &[Term]) -> String {
    if terms.is_empty() {
        return "∅".to_string();
    }

    let formatted: Vec<String> = terms
        .iter()
        .map(|term| {
            if term.get_coefficient() == 1 {
                term.get_species_name().0.clone()
            } else {
                format!("{} {}", term.get_coefficient(), term.get_species_name().0)
            }
        })
        .collect();

    formatted.join(" + ")
}
