//! Reaction and species expressions.
//!
//! Each reaction becomes one of:
//! - `w[i]` when it has no reactants (an external input)
//! - `act(y[A],w[i],n[i],EC50[i])` / `inhib(...)` for a single reactant
//! - `AND(w[i],[act(...),inhib(...),...])` for two or more reactants
//!
//! Each species then combines the reactions that produce it:
//! `0`, a single reaction expression, or `OR(r1,OR(r2,r3))`.
//!
//! Expressions are trees, so grouping is balanced by construction.

use std::fmt;

use serde::Serialize;

use super::hill;
use crate::network::{NetworkMatrices, ParameterTable};

/// How a reactant gates its reaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Regulation {
    Activation,
    Inhibition,
}

/// One reactant's Hill term inside a reaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HillTerm {
    /// Species identifier
    pub species: String,
    /// Position of the species in the state vector
    pub state_index: usize,
    /// Reaction whose parameters shape the curve
    pub reaction: usize,
    pub regulation: Regulation,
}

impl HillTerm {
    fn eval(&self, y: &[f64], params: &ParameterTable) -> f64 {
        let r = self.reaction;
        let x = y[self.state_index];
        match self.regulation {
            Regulation::Activation => hill::act(x, params.weight[r], params.hill[r], params.ec50[r]),
            Regulation::Inhibition => {
                hill::inhib(x, params.weight[r], params.hill[r], params.ec50[r])
            }
        }
    }
}

impl fmt::Display for HillTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self.regulation {
            Regulation::Activation => "act",
            Regulation::Inhibition => "inhib",
        };
        let r = self.reaction;
        write!(f, "{}(y[{}],w[{}],n[{}],EC50[{}])", name, self.species, r, r, r)
    }
}

/// Expression tree for reaction and species logic
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Expr {
    /// Species with no producing reaction
    Zero,
    /// Reaction with no reactants, driven by its weight alone
    Input { reaction: usize },
    /// Reaction with exactly one reactant
    Hill(HillTerm),
    /// Reaction with two or more reactants
    And { reaction: usize, terms: Vec<HillTerm> },
    Or(Box<Expr>, Box<Expr>),
}

impl Expr {
    /// Evaluate against a state vector
    pub fn eval(&self, y: &[f64], params: &ParameterTable) -> f64 {
        match self {
            Expr::Zero => 0.0,
            Expr::Input { reaction } => params.weight[*reaction],
            Expr::Hill(term) => term.eval(y, params),
            Expr::And { reaction, terms } => {
                let values: Vec<f64> = terms.iter().map(|t| t.eval(y, params)).collect();
                hill::AND(params.weight[*reaction], &values)
            }
            Expr::Or(a, b) => hill::OR(a.eval(y, params), b.eval(y, params)),
        }
    }

    /// Number of OR nodes in the tree
    pub fn or_count(&self) -> usize {
        match self {
            Expr::Or(a, b) => 1 + a.or_count() + b.or_count(),
            _ => 0,
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Zero => write!(f, "0"),
            Expr::Input { reaction } => write!(f, "w[{}]", reaction),
            Expr::Hill(term) => write!(f, "{}", term),
            Expr::And { reaction, terms } => {
                write!(f, "AND(w[{}],[", reaction)?;
                for (k, term) in terms.iter().enumerate() {
                    if k > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", term)?;
                }
                write!(f, "])")
            }
            Expr::Or(a, b) => write!(f, "OR({},{})", a, b),
        }
    }
}

/// Build the expression for one reaction.
///
/// Reactants are listed in ascending species index, not rule order.
pub fn reaction_expression<S: AsRef<str>>(
    matrices: &NetworkMatrices,
    species_ids: &[S],
    reaction: usize,
) -> Expr {
    let mut terms: Vec<HillTerm> = matrices
        .reactants_of(reaction)
        .into_iter()
        .map(|s| HillTerm {
            species: species_ids[s].as_ref().to_string(),
            state_index: s,
            reaction,
            regulation: if matrices.is_negated(s, reaction) {
                Regulation::Inhibition
            } else {
                Regulation::Activation
            },
        })
        .collect();

    match terms.len() {
        0 => Expr::Input { reaction },
        1 => Expr::Hill(terms.remove(0)),
        _ => Expr::And { reaction, terms },
    }
}

/// Combine the reactions producing a species into one expression
pub fn species_expression(
    matrices: &NetworkMatrices,
    reactions: &[Expr],
    species: usize,
) -> Expr {
    let producers = matrices.producers_of(species);
    let mut rev = producers.iter().rev();
    let last = match rev.next() {
        Some(&r) => reactions[r].clone(),
        None => return Expr::Zero,
    };
    // OR(r1,OR(r2,...OR(rk-1,rk)))
    rev.fold(last, |acc, &r| {
        Expr::Or(Box::new(reactions[r].clone()), Box::new(acc))
    })
}

/// Expressions for every reaction and every species
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Synthesis {
    pub reactions: Vec<Expr>,
    pub species: Vec<Expr>,
}

pub fn synthesize<S: AsRef<str>>(matrices: &NetworkMatrices, species_ids: &[S]) -> Synthesis {
    let reactions: Vec<Expr> = (0..matrices.n_reactions())
        .map(|r| reaction_expression(matrices, species_ids, r))
        .collect();
    let species = (0..matrices.n_species())
        .map(|s| species_expression(matrices, &reactions, s))
        .collect();

    Synthesis { reactions, species }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::matrix;

    fn synth(species: &[&str], rules: &[&str]) -> Synthesis {
        let built = matrix::build(species, rules);
        synthesize(&built.matrices, species)
    }

    #[test]
    fn test_input_reaction() {
        let s = synth(&["A"], &["=> A"]);
        assert_eq!(s.reactions[0], Expr::Input { reaction: 0 });
        assert_eq!(s.reactions[0].to_string(), "w[0]");
        assert_eq!(s.species[0].to_string(), "w[0]");
    }

    #[test]
    fn test_single_activation() {
        let s = synth(&["A", "B"], &["A => B"]);
        assert_eq!(s.reactions[0].to_string(), "act(y[A],w[0],n[0],EC50[0])");
        assert_eq!(s.species[0], Expr::Zero);
        assert_eq!(s.species[0].to_string(), "0");
    }

    #[test]
    fn test_single_inhibition() {
        let s = synth(&["A", "B"], &["!A => B"]);
        assert_eq!(s.reactions[0].to_string(), "inhib(y[A],w[0],n[0],EC50[0])");
    }

    #[test]
    fn test_and_uses_species_order() {
        let s = synth(&["A", "B", "C"], &["!B & A => C"]);
        assert_eq!(
            s.reactions[0].to_string(),
            "AND(w[0],[act(y[A],w[0],n[0],EC50[0]),inhib(y[B],w[0],n[0],EC50[0])])"
        );
    }

    #[test]
    fn test_or_nesting() {
        let s = synth(&["A", "B", "C"], &["=> A", "A => C", "B => C", "=> C"]);
        assert_eq!(
            s.species[2].to_string(),
            "OR(act(y[A],w[1],n[1],EC50[1]),OR(act(y[B],w[2],n[2],EC50[2]),w[3]))"
        );
        assert_eq!(s.species[2].or_count(), 2);
    }

    #[test]
    fn test_eval_input_and_or() {
        let s = synth(&["A"], &["=> A", "=> A"]);
        let params = ParameterTable {
            weight: vec![0.5, 0.5],
            hill: vec![1.4, 1.4],
            ec50: vec![0.5, 0.5],
            tau: vec![1.0],
            y_max: vec![1.0],
            y_init: vec![0.0],
        };
        assert!((s.species[0].eval(&[0.0], &params) - 0.75).abs() < 1e-12);
    }
}
