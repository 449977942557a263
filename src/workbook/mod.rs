//! Reading network sheets from CSV.
//!
//! Each sheet of a Netflux workbook is exported to its own CSV file. The
//! layout follows the authored spreadsheets: a title row, then the column
//! names, then data. Columns are found by name, so
//! extra columns (type, location, module, references) are ignored.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{anyhow, Context, Result};

use crate::config::SheetLayout;
use crate::network::{Cell, NetworkSheet, ReactionRow, SpeciesRow};

/// A sheet as a grid of raw strings
struct Table {
    columns: HashMap<String, usize>,
    rows: Vec<Vec<String>>,
}

impl Table {
    fn read<R: Read>(reader: R, layout: &SheetLayout, sheet: &str) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut columns = HashMap::new();
        let mut rows = Vec::new();
        let data_start = layout.header_row + layout.skip_rows + 1;

        for (row_idx, record) in csv_reader.records().enumerate() {
            let record = record.with_context(|| format!("Failed to read {} sheet row {}", sheet, row_idx))?;
            if row_idx == layout.header_row {
                for (col, name) in record.iter().enumerate() {
                    let name = name.trim();
                    if !name.is_empty() {
                        columns.entry(name.to_string()).or_insert(col);
                    }
                }
            } else if row_idx >= data_start {
                rows.push(record.iter().map(str::to_string).collect());
            }
        }

        if columns.is_empty() {
            return Err(anyhow!(
                "{} sheet has no header row at row {}",
                sheet,
                layout.header_row
            ));
        }

        Ok(Self { columns, rows })
    }

    fn column(&self, name: &str, sheet: &str) -> Result<usize> {
        self.columns
            .get(name)
            .copied()
            .ok_or_else(|| anyhow!("{} sheet is missing required column '{}'", sheet, name))
    }
}

fn text(row: &[String], col: usize) -> Option<String> {
    row.get(col)
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn cell(row: &[String], col: usize) -> Cell {
    row.get(col).map_or(Cell::Empty, |s| Cell::parse(s))
}

/// Read the `species` sheet
pub fn read_species<R: Read>(reader: R, layout: &SheetLayout) -> Result<Vec<SpeciesRow>> {
    let table = Table::read(reader, layout, "species")?;
    let cols = &layout.species_columns;
    let id = table.column(&cols.id, "species")?;
    let name = table.column(&cols.name, "species")?;
    let y_init = table.column(&cols.y_init, "species")?;
    let y_max = table.column(&cols.y_max, "species")?;
    let tau = table.column(&cols.tau, "species")?;

    Ok(table
        .rows
        .iter()
        .map(|row| SpeciesRow {
            id: text(row, id),
            name: text(row, name),
            y_init: cell(row, y_init),
            y_max: cell(row, y_max),
            tau: cell(row, tau),
        })
        .collect())
}

/// Read the `reactions` sheet
pub fn read_reactions<R: Read>(reader: R, layout: &SheetLayout) -> Result<Vec<ReactionRow>> {
    let table = Table::read(reader, layout, "reactions")?;
    let cols = &layout.reaction_columns;
    let id = table.column(&cols.id, "reactions")?;
    let rule = table.column(&cols.rule, "reactions")?;
    let weight = table.column(&cols.weight, "reactions")?;
    let hill = table.column(&cols.hill, "reactions")?;
    let ec50 = table.column(&cols.ec50, "reactions")?;

    Ok(table
        .rows
        .iter()
        .map(|row| ReactionRow {
            id: text(row, id),
            rule: text(row, rule),
            weight: cell(row, weight),
            hill: cell(row, hill),
            ec50: cell(row, ec50),
        })
        .collect())
}

/// Load both sheets from their CSV files
pub fn load_network<P: AsRef<Path>, Q: AsRef<Path>>(
    species_path: P,
    reactions_path: Q,
    layout: &SheetLayout,
) -> Result<NetworkSheet> {
    let species_path = species_path.as_ref();
    let reactions_path = reactions_path.as_ref();

    let species_file = File::open(species_path)
        .with_context(|| format!("Failed to open species sheet {}", species_path.display()))?;
    let species = read_species(species_file, layout)
        .with_context(|| format!("Failed to load {}", species_path.display()))?;

    let reactions_file = File::open(reactions_path)
        .with_context(|| format!("Failed to open reactions sheet {}", reactions_path.display()))?;
    let reactions = read_reactions(reactions_file, layout)
        .with_context(|| format!("Failed to load {}", reactions_path.display()))?;

    log::info!(
        "Loaded {} species rows from {} and {} reaction rows from {}",
        species.len(),
        species_path.display(),
        reactions.len(),
        reactions_path.display()
    );

    Ok(NetworkSheet { species, reactions })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPECIES: &str = "\
species,,,,,
module,ID,name,Yinit,Ymax,tau
signal,A,Ligand A,0,1,1
signal,B,Receptor B,0.2,1,
,,,,,
";

    const REACTIONS: &str = "\
reactions,,,,,
module,ID,Rule,Weight,n,EC50
signal,r1,=> A,1,1.4,0.5
signal,r2,A & !C => B,0.8,1.4,0.5
,r3,,1,1.4,0.5
";

    #[test]
    fn test_read_species_skips_title_row() {
        let rows = read_species(SPECIES.as_bytes(), &SheetLayout::default()).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].id.as_deref(), Some("A"));
        assert_eq!(rows[0].name.as_deref(), Some("Ligand A"));
        assert_eq!(rows[1].y_init, Cell::Number(0.2));
        assert_eq!(rows[1].tau, Cell::Empty);
        assert_eq!(rows[2].id, None);
    }

    #[test]
    fn test_read_reactions() {
        let rows = read_reactions(REACTIONS.as_bytes(), &SheetLayout::default()).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1].rule.as_deref(), Some("A & !C => B"));
        assert_eq!(rows[1].weight, Cell::Number(0.8));
        assert_eq!(rows[2].rule, None);
    }

    #[test]
    fn test_first_data_row_follows_header() {
        let species = "species,,,,,\nmodule,ID,name,Yinit,Ymax,tau\nsig,A,A,0,1,1\nsig,B,B,0,1,1\n";
        let reactions = "reactions,,,,,\nmodule,ID,Rule,Weight,n,EC50\nsig,r1,=> A,1,1.4,0.5\nsig,r2,A => B,1,1.4,0.5\n";

        let species = read_species(species.as_bytes(), &SheetLayout::default()).unwrap();
        let ids: Vec<_> = species.iter().map(|r| r.id.as_deref()).collect();
        assert_eq!(ids, vec![Some("A"), Some("B")], "First species row was dropped");

        let reactions = read_reactions(reactions.as_bytes(), &SheetLayout::default()).unwrap();
        let ids: Vec<_> = reactions.iter().map(|r| r.id.as_deref()).collect();
        assert_eq!(ids, vec![Some("r1"), Some("r2")], "First reaction row was dropped");
    }

    #[test]
    fn test_skip_rows_after_header() {
        let csv = "species\nID,name,Yinit,Ymax,tau\n(text),(text),(0-1),(0-1),(hours)\nA,A,0,1,1\n";
        let layout = SheetLayout {
            skip_rows: 1,
            ..SheetLayout::default()
        };
        let rows = read_species(csv.as_bytes(), &layout).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id.as_deref(), Some("A"));
    }

    #[test]
    fn test_missing_column_is_an_error() {
        let csv = "title\nID,name,Yinit,Ymax\nA,A,0,1\n";
        let err = read_species(csv.as_bytes(), &SheetLayout::default()).unwrap_err();
        assert!(err.to_string().contains("'tau'"), "unexpected error: {}", err);
    }
}
