//! Export functionality for compiled networks.
//!
//! Provides the generated Python ODE module, CSV parameter tables, and a JSON
//! summary.

mod csv_export;
mod json_export;
mod ode_export;

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::compiler::CompiledNetwork;
use crate::error::CompileError;

pub use csv_export::{
    export_parameters_csv, reaction_records, species_records, write_records, ReactionParamRecord,
    SpeciesParamRecord,
};
pub use json_export::{export_summary_json, IndexEntry, SummaryExport};
pub use ode_export::{export_ode_module, render_ode_module, HELPER_MODULE};

/// Paths of every file written by [`export_all`]
#[derive(Debug, Clone)]
pub struct ExportPaths {
    pub ode_module: PathBuf,
    pub reaction_params: PathBuf,
    pub species_params: PathBuf,
    pub summary: PathBuf,
}

/// Write all exports for a model into `dir`
pub fn export_all(
    model: &CompiledNetwork,
    diagnostics: &[String],
    failure: Option<&CompileError>,
    dir: &Path,
) -> Result<ExportPaths> {
    let ode_module = export_ode_module(model, dir)?;
    let (reaction_params, species_params) = export_parameters_csv(model, dir)?;
    let summary = export_summary_json(model, diagnostics, failure, dir)?;

    Ok(ExportPaths {
        ode_module,
        reaction_params,
        species_params,
        summary,
    })
}
