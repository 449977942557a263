//! Reaction network model.
//!
//! A Netflux network is authored as two tables:
//! - `species`: one row per signaling species (ID, name, Yinit, Ymax, tau)
//! - `reactions`: one row per rule (ID, Rule, Weight, n, EC50)
//!
//! Raw rows are resolved into [`Species`] and [`Reaction`] records by
//! [`params`], then the rules are compiled into interaction matrices by
//! [`matrix`].

pub mod matrix;
pub mod params;
pub mod rule;

use serde::Serialize;

pub use matrix::{IndicatorMatrix, MatrixBuild, NetworkMatrices, RuleWarning};
pub use params::{ParameterTable, ResolvedParameters};
pub use rule::{ParsedRule, RuleError, RuleTerm, RuleToken};

/// A raw table cell as read from a sheet
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Number(f64),
    Text(String),
}

impl Cell {
    /// Classify a raw cell string.
    ///
    /// Blank strings and `NaN` are treated as empty, matching how the
    /// spreadsheet reader reports blank cells.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Cell::Empty;
        }
        match trimmed.parse::<f64>() {
            Ok(value) if value.is_nan() => Cell::Empty,
            Ok(value) => Cell::Number(value),
            Err(_) => Cell::Text(trimmed.to_string()),
        }
    }

    /// Numeric value, if the cell holds a finite number
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(value) if value.is_finite() => Some(*value),
            _ => None,
        }
    }
}

/// One data row of the `species` sheet
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpeciesRow {
    pub id: Option<String>,
    pub name: Option<String>,
    pub y_init: Cell,
    pub y_max: Cell,
    pub tau: Cell,
}

impl SpeciesRow {
    /// Row with all three parameters given
    pub fn new(id: &str, y_init: f64, y_max: f64, tau: f64) -> Self {
        Self {
            id: Some(id.to_string()),
            name: Some(id.to_string()),
            y_init: Cell::Number(y_init),
            y_max: Cell::Number(y_max),
            tau: Cell::Number(tau),
        }
    }
}

/// One data row of the `reactions` sheet
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReactionRow {
    pub id: Option<String>,
    pub rule: Option<String>,
    pub weight: Cell,
    pub hill: Cell,
    pub ec50: Cell,
}

impl ReactionRow {
    /// Row with all three parameters given
    pub fn new(id: &str, rule: &str, weight: f64, hill: f64, ec50: f64) -> Self {
        Self {
            id: Some(id.to_string()),
            rule: Some(rule.to_string()),
            weight: Cell::Number(weight),
            hill: Cell::Number(hill),
            ec50: Cell::Number(ec50),
        }
    }
}

/// Both sheets of a network workbook
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NetworkSheet {
    pub species: Vec<SpeciesRow>,
    pub reactions: Vec<ReactionRow>,
}

/// A resolved species
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Species {
    /// Identifier used as a variable name in generated code
    pub id: String,
    /// Display name (falls back to the identifier)
    pub name: String,
    pub y_init: f64,
    pub y_max: f64,
    pub tau: f64,
    /// Parameters were replaced by defaults
    pub defaulted: bool,
}

/// A resolved reaction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reaction {
    pub id: String,
    /// Rule text, e.g. `A & !B => C`
    pub rule: String,
    pub weight: f64,
    pub hill: f64,
    pub ec50: f64,
    /// Parameters were replaced by defaults
    pub defaulted: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_parse() {
        assert_eq!(Cell::parse(""), Cell::Empty);
        assert_eq!(Cell::parse("   "), Cell::Empty);
        assert_eq!(Cell::parse("NaN"), Cell::Empty);
        assert_eq!(Cell::parse(" 1.4 "), Cell::Number(1.4));
        assert_eq!(Cell::parse("abc"), Cell::Text("abc".to_string()));
    }

    #[test]
    fn test_cell_as_number() {
        assert_eq!(Cell::Number(2.0).as_number(), Some(2.0));
        assert_eq!(Cell::Number(f64::INFINITY).as_number(), None);
        assert_eq!(Cell::Text("x".into()).as_number(), None);
        assert_eq!(Cell::Empty.as_number(), None);
    }
}
