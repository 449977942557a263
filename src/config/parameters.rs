//! Compiler configuration: default kinetic parameters and sheet layout.
//!
//! Defaults match the values the Netflux spreadsheet tools substitute for
//! blank cells, so a network simulates the same whichever tool compiled it.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level compiler configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompilerConfig {
    /// Fallback values for reactions with missing parameters
    #[serde(default)]
    pub reaction_defaults: ReactionDefaults,
    /// Fallback values for species with missing parameters
    #[serde(default)]
    pub species_defaults: SpeciesDefaults,
    /// Where to find the tables inside each sheet
    #[serde(default)]
    pub layout: SheetLayout,
}

impl CompilerConfig {
    /// Load configuration from a JSON file, or use defaults if it can't be read
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match std::fs::read_to_string(path.as_ref()) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    log::info!("Loaded compiler configuration from {:?}", path.as_ref());
                    config
                }
                Err(e) => {
                    log::warn!("Failed to parse compiler configuration: {}, using defaults", e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Compiler configuration file not found, using defaults");
                Self::default()
            }
        }
    }
}

/// Per-reaction parameter defaults
///
/// A reaction missing any one of these gets all three.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReactionDefaults {
    /// Reaction weight (dimensionless, 0-1)
    pub weight: f64,
    /// Hill coefficient
    pub hill: f64,
    /// Half-maximal effective concentration (normalized units)
    pub ec50: f64,
}

impl Default for ReactionDefaults {
    fn default() -> Self {
        Self {
            weight: 1.0,
            hill: 1.4,
            ec50: 5.0,
        }
    }
}

/// Per-species parameter defaults
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeciesDefaults {
    /// Initial activity
    pub y_init: f64,
    /// Maximal activity
    pub y_max: f64,
    /// Time constant
    pub tau: f64,
}

impl Default for SpeciesDefaults {
    fn default() -> Self {
        Self {
            y_init: 0.0,
            y_max: 1.0,
            tau: 1.0,
        }
    }
}

/// Table layout shared by both sheets.
///
/// Authored Netflux workbooks put a title in the first row, column names in
/// the second, and a units/notes row before the data starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetLayout {
    /// Zero-based row holding the column names
    pub header_row: usize,
    /// Rows between the header and the first data row that are skipped
    pub skip_rows: usize,
    pub species_columns: SpeciesColumns,
    pub reaction_columns: ReactionColumns,
}

impl Default for SheetLayout {
    fn default() -> Self {
        Self {
            header_row: 1,
            skip_rows: 0,
            species_columns: SpeciesColumns::default(),
            reaction_columns: ReactionColumns::default(),
        }
    }
}

/// Column names in the `species` sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesColumns {
    pub id: String,
    pub name: String,
    pub y_init: String,
    pub y_max: String,
    pub tau: String,
}

impl Default for SpeciesColumns {
    fn default() -> Self {
        Self {
            id: "ID".to_string(),
            name: "name".to_string(),
            y_init: "Yinit".to_string(),
            y_max: "Ymax".to_string(),
            tau: "tau".to_string(),
        }
    }
}

/// Column names in the `reactions` sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReactionColumns {
    pub id: String,
    pub rule: String,
    pub weight: String,
    pub hill: String,
    pub ec50: String,
}

impl Default for ReactionColumns {
    fn default() -> Self {
        Self {
            id: "ID".to_string(),
            rule: "Rule".to_string(),
            weight: "Weight".to_string(),
            hill: "n".to_string(),
            ec50: "EC50".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_reaction_params() {
        let defaults = ReactionDefaults::default();
        assert!((defaults.weight - 1.0).abs() < 1e-12);
        assert!((defaults.hill - 1.4).abs() < 1e-12);
        assert!((defaults.ec50 - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_default_species_params() {
        let defaults = SpeciesDefaults::default();
        assert_eq!(defaults.y_init, 0.0);
        assert_eq!(defaults.y_max, 1.0);
        assert_eq!(defaults.tau, 1.0);
    }

    #[test]
    fn test_serialization() {
        let config = CompilerConfig::default();
        let json = serde_json::to_string_pretty(&config).unwrap();
        let parsed: CompilerConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.layout, config.layout);
        assert_eq!(parsed.reaction_defaults, config.reaction_defaults);
    }

    #[test]
    fn test_partial_json_keeps_other_defaults() {
        let json = r#"{ "reaction_defaults": { "weight": 0.5, "hill": 2.0, "ec50": 0.4 } }"#;
        let parsed: CompilerConfig = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.reaction_defaults.hill, 2.0);
        assert_eq!(parsed.species_defaults, SpeciesDefaults::default());
        assert_eq!(parsed.layout.header_row, 1);
    }

    #[test]
    fn test_missing_file_falls_back() {
        let config = CompilerConfig::load_or_default("does/not/exist.json");
        assert_eq!(config.layout, SheetLayout::default());
    }
}
