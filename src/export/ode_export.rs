//! Python module export of the derivative function.
//!
//! The emitted module defines `<name>_ode(t, y, w, n, EC50, tau, ymax)`
//! returning `dydt`, and imports the normalized-Hill helpers from the
//! `util` module shipped with the Netflux Python tools.

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;

use crate::compiler::CompiledNetwork;

/// Module providing `act`, `inhib`, `AND` and `OR` to generated code
pub const HELPER_MODULE: &str = "util";

/// Render the module text
pub fn render_ode_module(model: &CompiledNetwork, generated_at: &str) -> Result<String, fmt::Error> {
    let mut out = String::new();
    write_module(&mut out, model, generated_at)?;
    Ok(out)
}

fn write_module(out: &mut impl fmt::Write, model: &CompiledNetwork, generated_at: &str) -> fmt::Result {
    writeln!(out, "# {} normalized-Hill ODE system", model.name)?;
    writeln!(
        out,
        "# Generated by netflux-ode {} on {}",
        env!("CARGO_PKG_VERSION"),
        generated_at
    )?;
    writeln!(out, "import numpy as np")?;
    writeln!(out, "from {} import act, inhib, AND, OR", HELPER_MODULE)?;
    writeln!(out)?;
    writeln!(out, "def {}_ode(t, y, w, n, EC50, tau, ymax):", model.name)?;
    for line in model.function().lines() {
        writeln!(out, "{}", line)?;
    }
    Ok(())
}

/// Write `<name>_ode.py` in `dir`
pub fn export_ode_module(model: &CompiledNetwork, dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create export directory {}", dir.display()))?;
    let path = dir.join(format!("{}_ode.py", model.name));

    let text = render_ode_module(model, &Local::now().to_rfc3339())
        .with_context(|| format!("Failed to render ODE module for {}", model.name))?;
    std::fs::write(&path, text)
        .with_context(|| format!("Failed to write ODE module {}", path.display()))?;

    log::info!("ODE module exported: {}", path.display());
    Ok(path)
}
