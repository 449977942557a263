//! Network compilation pipeline.
//!
//! parameters → matrices → expressions → derivative function
//!
//! Compilation always runs every stage it can and collects every diagnostic
//! before deciding whether it failed. Missing parameters and malformed rules
//! still yield a model (with defaults, or with the bad reaction inert), so a
//! caller can inspect it; duplicate species do not.

use serde::Serialize;

use crate::config::CompilerConfig;
use crate::error::CompileError;
use crate::network::{
    matrix, params, NetworkMatrices, NetworkSheet, ParameterTable, Reaction, Species,
};
use crate::synthesis::{synthesize, DerivativeFunction, OdeSystem, Synthesis};

/// Everything produced for a network
#[derive(Debug, Clone, Serialize)]
pub struct CompiledNetwork {
    /// Network name, used for exported file names
    pub name: String,
    pub species: Vec<Species>,
    pub reactions: Vec<Reaction>,
    pub matrices: NetworkMatrices,
    pub synthesis: Synthesis,
    pub system: OdeSystem,
}

impl CompiledNetwork {
    pub fn parameters(&self) -> &ParameterTable {
        self.system.parameters()
    }

    pub fn function(&self) -> DerivativeFunction {
        self.system.function()
    }
}

#[derive(Debug, Clone)]
enum Status {
    Clean(CompiledNetwork),
    /// Model built, but the run is still reported as failed
    Degraded(CompiledNetwork, CompileError),
    Aborted(CompileError),
}

/// Best-effort model, diagnostics and the failure signal, kept separate so a
/// failed compilation can still be inspected
#[derive(Debug, Clone)]
pub struct CompileOutcome {
    status: Status,
    diagnostics: Vec<String>,
}

impl CompileOutcome {
    fn built(model: CompiledNetwork, diagnostics: Vec<String>, failure: Option<CompileError>) -> Self {
        let status = match failure {
            Some(failure) => Status::Degraded(model, failure),
            None => Status::Clean(model),
        };
        Self { status, diagnostics }
    }

    fn aborted(failure: CompileError, diagnostics: Vec<String>) -> Self {
        Self {
            status: Status::Aborted(failure),
            diagnostics,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.status, Status::Clean(_))
    }

    /// The model, absent only when compilation aborted
    pub fn model(&self) -> Option<&CompiledNetwork> {
        match &self.status {
            Status::Clean(model) | Status::Degraded(model, _) => Some(model),
            Status::Aborted(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&CompileError> {
        match &self.status {
            Status::Clean(_) => None,
            Status::Degraded(_, failure) | Status::Aborted(failure) => Some(failure),
        }
    }

    /// Ordered report lines
    pub fn diagnostics(&self) -> &[String] {
        &self.diagnostics
    }

    /// Take the model regardless of the failure signal
    pub fn into_model(self) -> Option<CompiledNetwork> {
        match self.status {
            Status::Clean(model) | Status::Degraded(model, _) => Some(model),
            Status::Aborted(_) => None,
        }
    }

    /// Strict view: any failure is an error
    pub fn into_result(self) -> Result<CompiledNetwork, CompileError> {
        match self.status {
            Status::Clean(model) => Ok(model),
            Status::Degraded(_, failure) | Status::Aborted(failure) => Err(failure),
        }
    }

    /// Accept a model built from defaulted parameters; other failures are
    /// still errors
    pub fn into_result_allowing_defaults(self) -> Result<CompiledNetwork, CompileError> {
        match self.status {
            Status::Degraded(model, failure) if failure.is_recoverable() => Ok(model),
            status => CompileOutcome {
                status,
                diagnostics: self.diagnostics,
            }
            .into_result(),
        }
    }
}

/// Compiles network sheets into ODE systems
#[derive(Debug, Clone, Default)]
pub struct NetworkCompiler {
    pub config: CompilerConfig,
}

impl NetworkCompiler {
    pub fn new(config: CompilerConfig) -> Self {
        Self { config }
    }

    pub fn compile(&self, name: &str, sheet: &NetworkSheet) -> CompileOutcome {
        let resolved = params::resolve(
            sheet,
            &self.config.reaction_defaults,
            &self.config.species_defaults,
        );
        let mut diagnostics = resolved.diagnostics();
        let mut failures: Vec<CompileError> = resolved.failure().into_iter().collect();

        let species_ids: Vec<&str> = resolved.species.iter().map(|s| s.id.as_str()).collect();
        let rules: Vec<&str> = resolved.reactions.iter().map(|r| r.rule.as_str()).collect();
        let built = matrix::build(&species_ids, &rules);

        for (i, reason) in &built.rule_errors {
            let reaction = &resolved.reactions[*i];
            diagnostics.push(format!(
                "Malformed rule for reaction {}: '{}' ({})",
                reaction.id, reaction.rule, reason
            ));
            failures.push(CompileError::MalformedRule {
                reaction: reaction.id.clone(),
                rule: reaction.rule.clone(),
                reason: reason.clone(),
            });
        }
        for warning in &built.unknown_species {
            diagnostics.push(format!(
                "Reaction {}: unknown species '{}'",
                resolved.reactions[warning.reaction].id, warning.token
            ));
        }

        let failure = failures.into_iter().min_by_key(|f| f.precedence());

        if let Some(fatal @ CompileError::DuplicateSpecies(ids)) = &failure {
            log::error!("Network '{}' has duplicate species: {}", name, ids.join(", "));
            return CompileOutcome::aborted(fatal.clone(), diagnostics);
        }

        let synthesis = synthesize(&built.matrices, &species_ids);
        let table = resolved.table();
        let system = OdeSystem::new(&resolved.species, synthesis.species.clone(), table);

        log::info!(
            "Compiled network '{}': {} species, {} reactions",
            name,
            resolved.species.len(),
            resolved.reactions.len()
        );
        if let Some(failure) = &failure {
            log::warn!("Network '{}' compiled with errors: {}", name, failure);
        }

        let model = CompiledNetwork {
            name: name.to_string(),
            species: resolved.species,
            reactions: resolved.reactions,
            matrices: built.matrices,
            synthesis,
            system,
        };
        CompileOutcome::built(model, diagnostics, failure)
    }
}
