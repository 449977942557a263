//! Configuration module for the network compiler.
//!
//! Holds the fallback kinetic parameters and the spreadsheet layout.

mod parameters;

pub use parameters::{
    CompilerConfig, ReactionColumns, ReactionDefaults, SheetLayout, SpeciesColumns,
    SpeciesDefaults,
};
