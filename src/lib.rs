//! Netflux ODE - reaction network compiler
//!
//! Converts a Netflux signaling network (species and reaction rules, as
//! authored in a spreadsheet) into a normalized-Hill ODE system: a parameter
//! table, a generated derivative function, and the species index map.

pub mod compiler;
pub mod config;
pub mod error;
pub mod export;
pub mod network;
pub mod synthesis;
pub mod workbook;

pub use compiler::{CompileOutcome, CompiledNetwork, NetworkCompiler};
pub use config::CompilerConfig;
pub use error::CompileError;
pub use network::{
    Cell, NetworkMatrices, NetworkSheet, ParameterTable, Reaction, ReactionRow, Species,
    SpeciesRow,
};
pub use synthesis::{DerivativeFunction, Expr, OdeSystem};
