//! Equation-string front end for assembling reactions.
//!
//! Accepts the notation `2H2 + O2 === 2H2O`: compounds joined by `+`, an
//! optional integer coefficient prefix repeating a species, and a run of two
//! or more `=` separating reactants from products.

use thiserror::Error;

use crate::simulation::reaction_network::pool::Name;
use crate::simulation::reaction_network::reaction::{term::Term, Reaction};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("equation `{0}` needs exactly one `==` separator between reactants and products")]
    Separator(String),
    #[error("cannot read compound `{0}`")]
    MalformedCompound(String),
}

/// Splits an equation into reactant and product terms.
pub fn equation(input: &str) -> Result<(Vec<Term>, Vec<Term>), ParseError> {
    let (left, right) = split_sides(input)?;

    Ok((parse_side(left)?, parse_side(right)?))
}

/// Parses an equation and attaches a rate constant. The reaction is labelled
/// with the trimmed equation text so reports can show the source notation.
pub fn reaction(input: &str, rate_constant: f64) -> Result<Reaction, ParseError> {
    let (reactants, products) = equation(input)?;

    Ok(Reaction::new(reactants, products, rate_constant).with_label(input.trim()))
}

/// Finds the single run of two or more `=` acting as the separator
fn split_sides(input: &str) -> Result<(&str, &str), ParseError> {
    let bytes = input.as_bytes();
    let mut runs = Vec::new();

    let mut index = 0;
    while index < bytes.len() {
        if bytes[index] == b'=' {
            let start = index;
            while index < bytes.len() && bytes[index] == b'=' {
                index += 1;
            }
            if index - start >= 2 {
                runs.push((start, index - start));
            }
        } else {
            index += 1;
        }
    }

    match runs.as_slice() {
        [(start, length)] => Ok((&input[..*start], &input[start + length..])),
        _ => Err(ParseError::Separator(input.to_string())),
    }
}

fn parse_side(side: &str) -> Result<Vec<Term>, ParseError> {
    let mut terms = Vec::new();

    for compound in side.split('+') {
        let compound = compound.trim();

        let digits = compound
            .chars()
            .take_while(|character| character.is_ascii_digit())
            .count();
        let (coefficient_text, formula) = compound.split_at(digits);

        let formula_is_valid = !formula.is_empty()
            && formula
                .chars()
                .all(|character| character.is_ascii_alphanumeric() || character == '(' || character == ')');
        if !formula_is_valid {
            return Err(ParseError::MalformedCompound(compound.to_string()));
        }

        let coefficient: u64 = if coefficient_text.is_empty() {
            1
        } else {
            coefficient_text
                .parse()
                .map_err(|_| ParseError::MalformedCompound(compound.to_string()))?
        };

        if coefficient > 0 {
            terms.push(Term::new(Name(formula.to_string()), coefficient));
        }
    }

    Ok(terms)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn term(name: &str, coefficient: u64) -> Term {
        Term::new(Name(name.to_string()), coefficient)
    }

    #[test]
    fn parses_coefficients_as_occurrence_counts() {
        let (reactants, products) = equation("2H2 + O2 === 2H2O").unwrap();

        assert_eq!(reactants, vec![term("H2", 2), term("O2", 1)]);
        assert_eq!(products, vec![term("H2O", 2)]);
    }

    #[test]
    fn accepts_parenthesised_formulas_and_loose_whitespace() {
        let (reactants, products) = equation("  Na(NO3)2==NaNO3 +NO3  ").unwrap();

        assert_eq!(reactants, vec![term("Na(NO3)2", 1)]);
        assert_eq!(products, vec![term("NaNO3", 1), term("NO3", 1)]);
    }

    #[test]
    fn zero_coefficients_contribute_no_term() {
        let (reactants, _) = equation("0X + A === B").unwrap();

        assert_eq!(reactants, vec![term("A", 1)]);
    }

    #[test]
    fn a_single_equals_sign_is_not_a_separator() {
        assert_eq!(
            equation("A = B").unwrap_err(),
            ParseError::Separator("A = B".to_string())
        );
    }

    #[test]
    fn multiple_separators_are_rejected() {
        assert_eq!(
            equation("A === B === C").unwrap_err(),
            ParseError::Separator("A === B === C".to_string())
        );
    }

    #[test]
    fn bad_compound_text_is_rejected() {
        assert_eq!(
            equation("H2 & O2 === H2O").unwrap_err(),
            ParseError::MalformedCompound("H2 & O2".to_string())
        );
    }

    #[test]
    fn an_empty_side_is_rejected() {
        assert!(matches!(
            equation("=== B").unwrap_err(),
            ParseError::MalformedCompound(_)
        ));
    }

    #[test]
    fn reaction_carries_rate_constant_and_label() {
        let parsed = reaction("Br2 === 2Br", 0.01).unwrap();

        assert_eq!(parsed.get_rate_constant(), 0.01);
        assert_eq!(parsed.get_label(), Some("Br2 === 2Br"));
        assert_eq!(parsed.get_products(), &[term("Br", 2)][..]);
    }
}
