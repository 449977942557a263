//! JSON summary of a compiled network.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use serde::Serialize;

use crate::compiler::CompiledNetwork;
use crate::error::CompileError;
use crate::network::ParameterTable;

/// Species identifier and its state-vector position
#[derive(Debug, Clone, Serialize)]
pub struct IndexEntry {
    pub species: String,
    pub index: usize,
}

/// Full summary export structure
#[derive(Debug, Clone, Serialize)]
pub struct SummaryExport<'a> {
    /// Export timestamp
    pub exported_at: String,
    /// Export version for compatibility
    pub version: &'static str,
    pub network: &'a str,
    pub species_index: Vec<IndexEntry>,
    pub parameters: &'a ParameterTable,
    pub reaction_expressions: Vec<String>,
    pub species_expressions: Vec<String>,
    pub diagnostics: &'a [String],
    /// Failure message, when compilation was reported as failed
    pub failure: Option<String>,
}

impl<'a> SummaryExport<'a> {
    pub fn new(
        model: &'a CompiledNetwork,
        diagnostics: &'a [String],
        failure: Option<&CompileError>,
    ) -> Self {
        Self {
            exported_at: Local::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION"),
            network: &model.name,
            species_index: model
                .system
                .index_map()
                .into_iter()
                .map(|(species, index)| IndexEntry {
                    species: species.to_string(),
                    index,
                })
                .collect(),
            parameters: model.parameters(),
            reaction_expressions: model.synthesis.reactions.iter().map(|e| e.to_string()).collect(),
            species_expressions: model.synthesis.species.iter().map(|e| e.to_string()).collect(),
            diagnostics,
            failure: failure.map(|f| f.to_string()),
        }
    }
}

/// Write the summary as `<name>_summary.json` in `dir`
///
/// Creates the directory if it doesn't exist. Returns the path written.
pub fn export_summary_json(
    model: &CompiledNetwork,
    diagnostics: &[String],
    failure: Option<&CompileError>,
    dir: &Path,
) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create export directory {}", dir.display()))?;
    let path = dir.join(format!("{}_summary.json", model.name));

    let export = SummaryExport::new(model, diagnostics, failure);
    let file = std::fs::File::create(&path)?;
    serde_json::to_writer_pretty(file, &export)?;

    log::info!("JSON summary exported: {}", path.display());
    Ok(path)
}
