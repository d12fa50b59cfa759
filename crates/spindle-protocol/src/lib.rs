//! Wire protocol for typed expressions exchanged between the Spindle
//! coordinator and native workers.
//!
//! Each expression serializes to a JSON object carrying a `@type`
//! discriminator; variable references additionally have a compact canonical
//! string form (`name<type>`) used wherever an expression acts as a map key.

pub mod error;
pub mod expr;

pub use error::{Error, Result};
pub use expr::{Call, Constant, Expr, ExprKind, Form, Lambda, SpecialForm, VariableReference};
