//! CSV export of the resolved parameter table.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::compiler::CompiledNetwork;

/// One reaction row of the parameter table
#[derive(Debug, Clone, Serialize)]
pub struct ReactionParamRecord<'a> {
    pub index: usize,
    pub id: &'a str,
    pub rule: &'a str,
    pub weight: f64,
    pub n: f64,
    #[serde(rename = "EC50")]
    pub ec50: f64,
    pub defaulted: bool,
}

/// One species row of the parameter table
#[derive(Debug, Clone, Serialize)]
pub struct SpeciesParamRecord<'a> {
    pub index: usize,
    pub id: &'a str,
    pub name: &'a str,
    #[serde(rename = "Yinit")]
    pub y_init: f64,
    #[serde(rename = "Ymax")]
    pub y_max: f64,
    pub tau: f64,
    pub defaulted: bool,
}

pub fn reaction_records(model: &CompiledNetwork) -> Vec<ReactionParamRecord<'_>> {
    model
        .reactions
        .iter()
        .enumerate()
        .map(|(index, r)| ReactionParamRecord {
            index,
            id: &r.id,
            rule: &r.rule,
            weight: r.weight,
            n: r.hill,
            ec50: r.ec50,
            defaulted: r.defaulted,
        })
        .collect()
}

pub fn species_records(model: &CompiledNetwork) -> Vec<SpeciesParamRecord<'_>> {
    model
        .species
        .iter()
        .enumerate()
        .map(|(index, s)| SpeciesParamRecord {
            index,
            id: &s.id,
            name: &s.name,
            y_init: s.y_init,
            y_max: s.y_max,
            tau: s.tau,
            defaulted: s.defaulted,
        })
        .collect()
}

/// Serialize records with a header row
pub fn write_records<W: Write, T: Serialize>(writer: W, records: &[T]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write `<name>_reaction_params.csv` and `<name>_species_params.csv` in `dir`
pub fn export_parameters_csv(model: &CompiledNetwork, dir: &Path) -> Result<(PathBuf, PathBuf)> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create export directory {}", dir.display()))?;

    let reaction_path = dir.join(format!("{}_reaction_params.csv", model.name));
    let file = std::fs::File::create(&reaction_path)?;
    write_records(file, &reaction_records(model))?;

    let species_path = dir.join(format!("{}_species_params.csv", model.name));
    let file = std::fs::File::create(&species_path)?;
    write_records(file, &species_records(model))?;

    log::info!(
        "CSV parameters exported: {}, {}",
        reaction_path.display(),
        species_path.display()
    );
    Ok((reaction_path, species_path))
}
