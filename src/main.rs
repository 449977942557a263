//! Netflux ODE - Entry point
//!
//! Compiles a Netflux network, exported as one CSV per sheet, into a
//! normalized-Hill ODE module.
//!
//! CLI Usage:
//!   netflux-ode species.csv reactions.csv
//!   netflux-ode species.csv reactions.csv --name myNet --out exports
//!   netflux-ode species.csv reactions.csv --allow-defaults

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{anyhow, Result};
use netflux_ode::{config::CompilerConfig, export, workbook, NetworkCompiler};

/// Parsed command line
struct CliArgs {
    species: PathBuf,
    reactions: PathBuf,
    name: String,
    config: Option<PathBuf>,
    out_dir: PathBuf,
    allow_defaults: bool,
}

fn print_help() {
    println!("Netflux ODE");
    println!();
    println!("Usage: netflux-ode <SPECIES_CSV> <REACTIONS_CSV> [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --name NAME        Network name used for output files (default: network)");
    println!("  --config FILE      JSON compiler configuration");
    println!("  --out DIR          Output directory (default: exports)");
    println!("  --allow-defaults   Succeed when only parameters were defaulted");
    println!("  --help, -h         Show this help");
}

/// Parse CLI arguments
fn parse_args() -> Result<CliArgs> {
    let args: Vec<String> = std::env::args().collect();
    let mut positional = Vec::new();
    let mut name = "network".to_string();
    let mut config = None;
    let mut out_dir = PathBuf::from("exports");
    let mut allow_defaults = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--name" => {
                i += 1;
                name = args
                    .get(i)
                    .cloned()
                    .ok_or_else(|| anyhow!("--name requires a value"))?;
            }
            "--config" => {
                i += 1;
                config = Some(PathBuf::from(
                    args.get(i).ok_or_else(|| anyhow!("--config requires a file"))?,
                ));
            }
            "--out" => {
                i += 1;
                out_dir = PathBuf::from(args.get(i).ok_or_else(|| anyhow!("--out requires a directory"))?);
            }
            "--allow-defaults" => allow_defaults = true,
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            other if other.starts_with('-') => return Err(anyhow!("Unknown option '{}'", other)),
            other => positional.push(PathBuf::from(other)),
        }
        i += 1;
    }

    if positional.len() != 2 {
        print_help();
        return Err(anyhow!("Expected a species CSV and a reactions CSV"));
    }
    let reactions = positional.pop().unwrap_or_default();
    let species = positional.pop().unwrap_or_default();

    Ok(CliArgs {
        species,
        reactions,
        name,
        config,
        out_dir,
        allow_defaults,
    })
}

fn run(args: CliArgs) -> Result<bool> {
    let config = match &args.config {
        Some(path) => CompilerConfig::load_or_default(path),
        None => CompilerConfig::default(),
    };

    let sheet = workbook::load_network(&args.species, &args.reactions, &config.layout)?;
    let compiler = NetworkCompiler::new(config);
    let outcome = compiler.compile(&args.name, &sheet);

    for line in outcome.diagnostics() {
        eprintln!("{}", line);
    }

    let model = match outcome.model() {
        Some(model) => model,
        None => {
            if let Some(failure) = outcome.failure() {
                eprintln!("Compilation aborted: {}", failure);
            }
            return Ok(false);
        }
    };

    let paths = export::export_all(model, outcome.diagnostics(), outcome.failure(), &args.out_dir)?;
    println!("ODE module:       {}", paths.ode_module.display());
    println!("Reaction params:  {}", paths.reaction_params.display());
    println!("Species params:   {}", paths.species_params.display());
    println!("Summary:          {}", paths.summary.display());

    match outcome.failure() {
        None => Ok(true),
        Some(failure) if args.allow_defaults && failure.is_recoverable() => {
            log::warn!("Continuing with default parameters: {}", failure);
            Ok(true)
        }
        Some(failure) => {
            eprintln!("Compilation failed: {}", failure);
            Ok(false)
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();

    let result = parse_args().and_then(run);
    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
