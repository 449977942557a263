//! Derivative function generation.
//!
//! Every species k gets a normalized-Hill equation
//!
//! dy_k/dt = (f_k(y) * ymax_k - y_k) / tau_k
//!
//! where f_k is the species expression. The system is emitted two ways: as a
//! statement listing (index bindings, `dydt = np.zeros(N)`, one assignment
//! per species, `return dydt`) for external simulators, and as a pure
//! evaluator usable directly by an ODE integrator.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use super::expression::Expr;
use crate::network::{ParameterTable, Species};

/// Source of a species' maximal activity in generated code
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum MaxValue {
    /// `ymax[A]`, read from the parameter table
    Parameter,
    /// Inlined default, used when the species had no parameters
    Literal(f64),
}

/// One line of the generated derivative function
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Statement {
    /// `A = 0`
    BindIndex { species: String, index: usize },
    /// `dydt = np.zeros(N)`
    ZeroInit { len: usize },
    /// `dydt[A] = (expr*ymax[A] - y[A])/tau[A]`
    Assign {
        species: String,
        expr: Expr,
        max: MaxValue,
    },
    Return,
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::BindIndex { species, index } => write!(f, "{} = {}", species, index),
            Statement::ZeroInit { len } => write!(f, "dydt = np.zeros({})", len),
            Statement::Assign { species, expr, max } => {
                let max = match max {
                    MaxValue::Parameter => format!("ymax[{}]", species),
                    MaxValue::Literal(value) => value.to_string(),
                };
                write!(f, "dydt[{s}] = ({}*{} - y[{s}])/tau[{s}]", expr, max, s = species)
            }
            Statement::Return => write!(f, "return dydt"),
        }
    }
}

/// The generated derivative function as a statement sequence
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivativeFunction {
    pub statements: Vec<Statement>,
}

impl DerivativeFunction {
    /// Body lines, each indented one tab
    pub fn lines(&self) -> Vec<String> {
        self.statements.iter().map(|s| format!("\t{}", s)).collect()
    }
}

/// A compiled normalized-Hill ODE system
#[derive(Debug, Clone, Serialize)]
pub struct OdeSystem {
    species: Vec<String>,
    #[serde(skip)]
    index: HashMap<String, usize>,
    expressions: Vec<Expr>,
    max_values: Vec<MaxValue>,
    params: ParameterTable,
}

impl OdeSystem {
    /// Assemble the system from resolved species, their combined
    /// expressions and the parameter table.
    ///
    /// `expressions` and `params` must be aligned with `species`.
    pub fn new(species: &[Species], expressions: Vec<Expr>, params: ParameterTable) -> Self {
        debug_assert_eq!(species.len(), expressions.len());
        debug_assert_eq!(species.len(), params.n_species());

        let ids: Vec<String> = species.iter().map(|s| s.id.clone()).collect();
        let mut index = HashMap::with_capacity(ids.len());
        for (k, id) in ids.iter().enumerate() {
            index.entry(id.clone()).or_insert(k);
        }
        let max_values = species
            .iter()
            .map(|s| {
                if s.defaulted {
                    MaxValue::Literal(s.y_max)
                } else {
                    MaxValue::Parameter
                }
            })
            .collect();

        Self {
            species: ids,
            index,
            expressions,
            max_values,
            params,
        }
    }

    pub fn n_species(&self) -> usize {
        self.species.len()
    }

    /// State-vector position of a species
    pub fn index_of(&self, species: &str) -> Option<usize> {
        self.index.get(species).copied()
    }

    /// Species identifiers with their state-vector index, in order
    pub fn index_map(&self) -> Vec<(&str, usize)> {
        self.species
            .iter()
            .enumerate()
            .map(|(k, id)| (id.as_str(), k))
            .collect()
    }

    pub fn species(&self) -> &[String] {
        &self.species
    }

    pub fn expressions(&self) -> &[Expr] {
        &self.expressions
    }

    pub fn parameters(&self) -> &ParameterTable {
        &self.params
    }

    /// Initial state vector (Yinit column)
    pub fn initial_state(&self) -> Vec<f64> {
        self.params.y_init.clone()
    }

    /// Evaluate dy/dt at state `y`.
    ///
    /// Pure: reads only `self` and `y`, writes only `dydt`.
    pub fn derivatives(&self, y: &[f64], dydt: &mut [f64]) {
        for (k, expr) in self.expressions.iter().enumerate() {
            let y_max = match self.max_values[k] {
                MaxValue::Parameter => self.params.y_max[k],
                MaxValue::Literal(value) => value,
            };
            dydt[k] = (expr.eval(y, &self.params) * y_max - y[k]) / self.params.tau[k];
        }
    }

    /// Statement listing of the derivative function
    pub fn function(&self) -> DerivativeFunction {
        let n = self.species.len();
        let mut statements = Vec::with_capacity(2 * n + 2);

        for (k, id) in self.species.iter().enumerate() {
            statements.push(Statement::BindIndex {
                species: id.clone(),
                index: k,
            });
        }
        statements.push(Statement::ZeroInit { len: n });
        for (k, id) in self.species.iter().enumerate() {
            statements.push(Statement::Assign {
                species: id.clone(),
                expr: self.expressions[k].clone(),
                max: self.max_values[k],
            });
        }
        statements.push(Statement::Return);

        DerivativeFunction { statements }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::matrix;
    use crate::synthesis::expression::synthesize;

    fn species(id: &str, defaulted: bool) -> Species {
        Species {
            id: id.to_string(),
            name: id.to_string(),
            y_init: 0.0,
            y_max: 1.0,
            tau: 2.0,
            defaulted,
        }
    }

    fn params(n_reactions: usize, n_species: usize) -> ParameterTable {
        ParameterTable {
            weight: vec![1.0; n_reactions],
            hill: vec![1.4; n_reactions],
            ec50: vec![0.5; n_reactions],
            tau: vec![2.0; n_species],
            y_max: vec![1.0; n_species],
            y_init: vec![0.0; n_species],
        }
    }

    fn two_species_system(b_defaulted: bool) -> OdeSystem {
        let ids = ["A", "B"];
        let built = matrix::build(&ids, &["A => B"]);
        let synthesis = synthesize(&built.matrices, &ids);
        OdeSystem::new(
            &[species("A", false), species("B", b_defaulted)],
            synthesis.species,
            params(1, 2),
        )
    }

    #[test]
    fn test_generated_lines() {
        let system = two_species_system(false);
        assert_eq!(
            system.function().lines(),
            vec![
                "\tA = 0",
                "\tB = 1",
                "\tdydt = np.zeros(2)",
                "\tdydt[A] = (0*ymax[A] - y[A])/tau[A]",
                "\tdydt[B] = (act(y[A],w[0],n[0],EC50[0])*ymax[B] - y[B])/tau[B]",
                "\treturn dydt",
            ]
        );
    }

    #[test]
    fn test_defaulted_species_inlines_max() {
        let system = two_species_system(true);
        let lines = system.function().lines();
        assert_eq!(lines[4], "\tdydt[B] = (act(y[A],w[0],n[0],EC50[0])*1 - y[B])/tau[B]");
    }

    #[test]
    fn test_index_map() {
        let system = two_species_system(false);
        assert_eq!(system.index_map(), vec![("A", 0), ("B", 1)]);
        assert_eq!(system.index_of("B"), Some(1));
        assert_eq!(system.index_of("C"), None);
    }

    #[test]
    fn test_derivatives() {
        let system = two_species_system(false);
        let mut dydt = vec![0.0; 2];

        // A fully active drives B towards ymax
        system.derivatives(&[1.0, 0.0], &mut dydt);
        assert!((dydt[0] + 0.5).abs() < 1e-12, "A decays: {}", dydt[0]);
        assert!((dydt[1] - 0.5).abs() < 1e-9, "B rises: {}", dydt[1]);

        // Steady state: A = 0, B = 0
        system.derivatives(&[0.0, 0.0], &mut dydt);
        assert_eq!(dydt, vec![0.0, 0.0]);
    }
}
