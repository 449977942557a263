//! Interaction matrices for a reaction network.
//!
//! All matrices are species × reactions:
//! - interaction: -1 reactant, +1 product, 0 not involved
//! - reactant: -1 where the species is a reactant
//! - product: +1 where the species is a product
//! - negation: 0 where the species appears negated (`!A`), 1 otherwise
//!
//! `interaction == reactant + product` holds element-wise, and a species is
//! classified by its first appearance in the rule, so it is never both a
//! reactant and a product of the same reaction.

use std::collections::HashMap;

use serde::Serialize;

use super::rule::{parse_rule, RuleError};

/// Dense row-major matrix of small signed indicators
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndicatorMatrix {
    n_rows: usize,
    n_cols: usize,
    data: Vec<i8>,
}

impl IndicatorMatrix {
    pub fn filled(n_rows: usize, n_cols: usize, value: i8) -> Self {
        Self {
            n_rows,
            n_cols,
            data: vec![value; n_rows * n_cols],
        }
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> i8 {
        self.data[row * self.n_cols + col]
    }

    #[inline]
    fn set(&mut self, row: usize, col: usize, value: i8) {
        self.data[row * self.n_cols + col] = value;
    }

    pub fn row(&self, row: usize) -> &[i8] {
        &self.data[row * self.n_cols..(row + 1) * self.n_cols]
    }

    pub fn column(&self, col: usize) -> Vec<i8> {
        (0..self.n_rows).map(|row| self.get(row, col)).collect()
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_cols(&self) -> usize {
        self.n_cols
    }
}

/// The four aligned matrices describing a network
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetworkMatrices {
    pub interaction: IndicatorMatrix,
    pub reactant: IndicatorMatrix,
    pub product: IndicatorMatrix,
    pub negation: IndicatorMatrix,
}

impl NetworkMatrices {
    fn empty(n_species: usize, n_reactions: usize) -> Self {
        Self {
            interaction: IndicatorMatrix::filled(n_species, n_reactions, 0),
            reactant: IndicatorMatrix::filled(n_species, n_reactions, 0),
            product: IndicatorMatrix::filled(n_species, n_reactions, 0),
            negation: IndicatorMatrix::filled(n_species, n_reactions, 1),
        }
    }

    pub fn n_species(&self) -> usize {
        self.interaction.n_rows()
    }

    pub fn n_reactions(&self) -> usize {
        self.interaction.n_cols()
    }

    /// Species indices that are reactants of a reaction, ascending
    pub fn reactants_of(&self, reaction: usize) -> Vec<usize> {
        (0..self.n_species())
            .filter(|&s| self.reactant.get(s, reaction) == -1)
            .collect()
    }

    /// Reaction indices producing a species, ascending
    pub fn producers_of(&self, species: usize) -> Vec<usize> {
        self.product
            .row(species)
            .iter()
            .enumerate()
            .filter(|&(_, &p)| p == 1)
            .map(|(r, _)| r)
            .collect()
    }

    /// Whether the species enters the reaction as an inhibitor
    #[inline]
    pub fn is_negated(&self, species: usize, reaction: usize) -> bool {
        self.negation.get(species, reaction) == 0
    }

    fn mark_reactant(&mut self, species: usize, reaction: usize) {
        self.reactant.set(species, reaction, -1);
        self.interaction.set(species, reaction, -1);
    }

    fn mark_product(&mut self, species: usize, reaction: usize) {
        self.product.set(species, reaction, 1);
        self.interaction.set(species, reaction, 1);
    }
}

/// A rule token that names no known species
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleWarning {
    /// Reaction index
    pub reaction: usize,
    pub token: String,
}

/// Matrices plus everything that went wrong building them
#[derive(Debug, Clone, PartialEq)]
pub struct MatrixBuild {
    pub matrices: NetworkMatrices,
    /// Reactions whose rules could not be parsed; their columns are empty
    pub rule_errors: Vec<(usize, RuleError)>,
    pub unknown_species: Vec<RuleWarning>,
}

/// Build the interaction matrices from species identifiers and rule strings.
///
/// When an identifier repeats, rules resolve to its first row.
pub fn build<S: AsRef<str>, R: AsRef<str>>(species_ids: &[S], rules: &[R]) -> MatrixBuild {
    let n_species = species_ids.len();
    let mut matrices = NetworkMatrices::empty(n_species, rules.len());
    let mut rule_errors = Vec::new();
    let mut unknown_species = Vec::new();

    let mut index: HashMap<&str, usize> = HashMap::with_capacity(n_species);
    for (j, id) in species_ids.iter().enumerate() {
        index.entry(id.as_ref()).or_insert(j);
    }

    for (i, rule) in rules.iter().enumerate() {
        let parsed = match parse_rule(rule.as_ref()) {
            Ok(parsed) => parsed,
            Err(e) => {
                log::warn!("Reaction {} rule '{}' rejected: {}", i, rule.as_ref(), e);
                rule_errors.push((i, e));
                continue;
            }
        };

        let mut seen = vec![false; n_species];
        let n_reactants = parsed.reactants.len();
        for (pos, term) in parsed.terms().enumerate() {
            let j = match index.get(term.species.as_str()) {
                Some(&j) => j,
                None => {
                    if !unknown_species
                        .iter()
                        .any(|w: &RuleWarning| w.reaction == i && w.token == term.species)
                    {
                        unknown_species.push(RuleWarning {
                            reaction: i,
                            token: term.species.clone(),
                        });
                    }
                    continue;
                }
            };

            if !seen[j] {
                seen[j] = true;
                if pos < n_reactants {
                    matrices.mark_reactant(j, i);
                } else {
                    matrices.mark_product(j, i);
                }
            }
            if term.negated {
                matrices.negation.set(j, i, 0);
            }
        }
    }

    MatrixBuild {
        matrices,
        rule_errors,
        unknown_species,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_activation_columns() {
        let result = build(&["A", "B"], &["A => B"]);
        let m = &result.matrices;
        assert_eq!(m.interaction.column(0), vec![-1, 1]);
        assert_eq!(m.reactant.column(0), vec![-1, 0]);
        assert_eq!(m.product.column(0), vec![0, 1]);
        assert!(result.rule_errors.is_empty());
    }

    #[test]
    fn test_negation_polarity() {
        // 0 marks the negated reactant; plain and absent species carry 1
        let result = build(&["A", "B", "C", "D"], &["A & !B => C"]);
        assert_eq!(result.matrices.negation.column(0), vec![1, 0, 1, 1]);
        assert!(result.matrices.is_negated(1, 0));
        assert!(!result.matrices.is_negated(0, 0));
    }

    #[test]
    fn test_no_substring_collision() {
        let result = build(&["A", "AB", "B"], &["AB => B"]);
        assert_eq!(result.matrices.interaction.column(0), vec![0, -1, 1]);
    }

    #[test]
    fn test_first_occurrence_wins() {
        let result = build(&["A", "B"], &["A => A & B"]);
        assert_eq!(result.matrices.interaction.column(0), vec![-1, 1]);
        assert_eq!(result.matrices.product.column(0), vec![0, 1]);
    }

    #[test]
    fn test_malformed_rule_leaves_column_empty() {
        let result = build(&["A", "B"], &["A B", "A => B"]);
        assert_eq!(result.rule_errors, vec![(0, RuleError::MissingArrow)]);
        assert_eq!(result.matrices.interaction.column(0), vec![0, 0]);
        assert_eq!(result.matrices.negation.column(0), vec![1, 1]);
        assert_eq!(result.matrices.interaction.column(1), vec![-1, 1]);
    }

    #[test]
    fn test_unknown_species_reported_once() {
        let result = build(&["A"], &["X & !X => A"]);
        assert_eq!(
            result.unknown_species,
            vec![RuleWarning {
                reaction: 0,
                token: "X".into()
            }]
        );
        assert_eq!(result.matrices.product.column(0), vec![1]);
    }

    #[test]
    fn test_producers_and_reactants() {
        let result = build(&["A", "B", "C"], &["=> A", "B & A => C", "A => C"]);
        let m = &result.matrices;
        assert_eq!(m.reactants_of(0), Vec::<usize>::new());
        assert_eq!(m.reactants_of(1), vec![0, 1]);
        assert_eq!(m.producers_of(2), vec![1, 2]);
        assert_eq!(m.producers_of(1), Vec::<usize>::new());
    }
}
