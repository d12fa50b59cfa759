//! The expression node family and its codecs.
//!
//! - [`node`] defines the closed variant set.
//! - [`tag`] is the static tag table (`@type` value per variant).
//! - [`serde_tagged`] maps nodes to/from tagged JSON objects.
//! - [`canonical`] maps key-capable nodes to/from canonical string tokens.

pub mod canonical;
pub mod node;
pub mod serde_tagged;
pub mod tag;

pub use node::{Call, Constant, Expr, Form, Lambda, SpecialForm, VariableReference};
pub use tag::ExprKind;
