//! Parameter resolution for reactions and species.
//!
//! Every reaction needs a weight, Hill coefficient and EC50; every species
//! needs an initial value, max value and time constant. A row missing any one
//! of its three values gets the full default triple, and the row is listed in
//! the diagnostics so the author can fix the sheet.

use std::collections::HashMap;

use serde::Serialize;

use super::{NetworkSheet, Reaction, ReactionRow, Species, SpeciesRow};
use crate::config::{ReactionDefaults, SpeciesDefaults};
use crate::error::CompileError;

/// Six aligned parameter sequences.
///
/// Reaction parameters are indexed by reaction position, species parameters
/// by state-vector index.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParameterTable {
    pub weight: Vec<f64>,
    pub hill: Vec<f64>,
    pub ec50: Vec<f64>,
    pub tau: Vec<f64>,
    pub y_max: Vec<f64>,
    pub y_init: Vec<f64>,
}

impl ParameterTable {
    pub fn from_network(species: &[Species], reactions: &[Reaction]) -> Self {
        Self {
            weight: reactions.iter().map(|r| r.weight).collect(),
            hill: reactions.iter().map(|r| r.hill).collect(),
            ec50: reactions.iter().map(|r| r.ec50).collect(),
            tau: species.iter().map(|s| s.tau).collect(),
            y_max: species.iter().map(|s| s.y_max).collect(),
            y_init: species.iter().map(|s| s.y_init).collect(),
        }
    }

    pub fn n_reactions(&self) -> usize {
        self.weight.len()
    }

    pub fn n_species(&self) -> usize {
        self.tau.len()
    }
}

/// Result of resolving both sheets
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedParameters {
    pub species: Vec<Species>,
    pub reactions: Vec<Reaction>,
    /// `"<reactionID>: <rule>"` for each defaulted reaction
    pub missing_reactions: Vec<String>,
    /// Identifier of each defaulted species
    pub missing_species: Vec<String>,
    /// Identifiers appearing on more than one surviving species row
    pub duplicate_species: Vec<String>,
}

impl ResolvedParameters {
    pub fn table(&self) -> ParameterTable {
        ParameterTable::from_network(&self.species, &self.reactions)
    }

    /// Human-readable report, in the order the blocks are checked
    pub fn diagnostics(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if !self.missing_reactions.is_empty() {
            lines.push("Missing parameter(s) for following reactions".to_string());
            lines.push("(default parameters assigned):".to_string());
            lines.extend(self.missing_reactions.iter().cloned());
            lines.push(String::new());
        }
        if !self.missing_species.is_empty() {
            lines.push("Missing parameter(s) for following species".to_string());
            lines.push("(default parameters assigned):".to_string());
            lines.extend(self.missing_species.iter().cloned());
            lines.push(String::new());
        }
        if !self.duplicate_species.is_empty() {
            lines.push("Warning: Duplicate species detected".to_string());
            for id in &self.duplicate_species {
                lines.push(format!("Duplicate species: {}", id));
            }
        }
        lines
    }

    /// The failure these parameters imply, if any.
    ///
    /// Duplicates are fatal and take priority over defaulted parameters.
    pub fn failure(&self) -> Option<CompileError> {
        if !self.duplicate_species.is_empty() {
            return Some(CompileError::DuplicateSpecies(self.duplicate_species.clone()));
        }
        if !self.missing_reactions.is_empty() || !self.missing_species.is_empty() {
            return Some(CompileError::MissingParameters {
                reactions: self.missing_reactions.clone(),
                species: self.missing_species.clone(),
            });
        }
        None
    }
}

/// Resolve both sheets against the given defaults
pub fn resolve(
    sheet: &NetworkSheet,
    reaction_defaults: &ReactionDefaults,
    species_defaults: &SpeciesDefaults,
) -> ResolvedParameters {
    let (reactions, missing_reactions) = resolve_reactions(&sheet.reactions, reaction_defaults);
    let (species, missing_species) = resolve_species(&sheet.species, species_defaults);
    let duplicate_species = find_duplicates(&species);

    if !missing_reactions.is_empty() {
        log::warn!("{} reactions missing parameters, defaults assigned", missing_reactions.len());
    }
    if !missing_species.is_empty() {
        log::warn!("{} species missing parameters, defaults assigned", missing_species.len());
    }

    ResolvedParameters {
        species,
        reactions,
        missing_reactions,
        missing_species,
        duplicate_species,
    }
}

/// Resolve reaction rows.
///
/// Rows with a blank rule are dropped before defaulting, so they never show up
/// in the missing-parameter list. A row with a rule but no identifier is named
/// after its 1-based data row (`R3`).
pub fn resolve_reactions(
    rows: &[ReactionRow],
    defaults: &ReactionDefaults,
) -> (Vec<Reaction>, Vec<String>) {
    let mut reactions = Vec::with_capacity(rows.len());
    let mut missing = Vec::new();

    for (row_idx, row) in rows.iter().enumerate() {
        let rule = match non_blank(row.rule.as_deref()) {
            Some(rule) => rule.to_string(),
            None => {
                log::debug!("Dropping reaction row {} with empty rule", row_idx + 1);
                continue;
            }
        };
        let id = non_blank(row.id.as_deref())
            .map(str::to_string)
            .unwrap_or_else(|| format!("R{}", row_idx + 1));

        let reaction = match (row.weight.as_number(), row.hill.as_number(), row.ec50.as_number()) {
            (Some(weight), Some(hill), Some(ec50)) => Reaction {
                id,
                rule,
                weight,
                hill,
                ec50,
                defaulted: false,
            },
            _ => {
                missing.push(format!("{}: {}", id, rule));
                Reaction {
                    id,
                    rule,
                    weight: defaults.weight,
                    hill: defaults.hill,
                    ec50: defaults.ec50,
                    defaulted: true,
                }
            }
        };
        reactions.push(reaction);
    }

    (reactions, missing)
}

/// Resolve species rows, dropping rows without an identifier
pub fn resolve_species(
    rows: &[SpeciesRow],
    defaults: &SpeciesDefaults,
) -> (Vec<Species>, Vec<String>) {
    let mut species = Vec::with_capacity(rows.len());
    let mut missing = Vec::new();

    for (row_idx, row) in rows.iter().enumerate() {
        let id = match non_blank(row.id.as_deref()) {
            Some(id) => id.to_string(),
            None => {
                log::debug!("Dropping species row {} with no ID", row_idx + 1);
                continue;
            }
        };
        let name = non_blank(row.name.as_deref()).unwrap_or(id.as_str()).to_string();

        let resolved = match (row.y_init.as_number(), row.y_max.as_number(), row.tau.as_number()) {
            (Some(y_init), Some(y_max), Some(tau)) => Species {
                id,
                name,
                y_init,
                y_max,
                tau,
                defaulted: false,
            },
            _ => {
                missing.push(id.clone());
                Species {
                    id,
                    name,
                    y_init: defaults.y_init,
                    y_max: defaults.y_max,
                    tau: defaults.tau,
                    defaulted: true,
                }
            }
        };
        species.push(resolved);
    }

    (species, missing)
}

/// Identifiers used by more than one species, in first-seen order
pub fn find_duplicates(species: &[Species]) -> Vec<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for s in species {
        *counts.entry(s.id.as_str()).or_insert(0) += 1;
    }

    let mut duplicates: Vec<String> = Vec::new();
    for s in species {
        if counts[s.id.as_str()] > 1 && !duplicates.iter().any(|d| d == &s.id) {
            duplicates.push(s.id.clone());
        }
    }
    duplicates
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
