//! Expression synthesis and code generation.
//!
//! Turns interaction matrices into per-reaction and per-species logic
//! expressions, then into a normalized-Hill ODE system.

pub mod codegen;
pub mod expression;
pub mod hill;

pub use codegen::{DerivativeFunction, MaxValue, OdeSystem, Statement};
pub use expression::{
    reaction_expression, species_expression, synthesize, Expr, HillTerm, Regulation, Synthesis,
};
pub use hill::{act, inhib};
