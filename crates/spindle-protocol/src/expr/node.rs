//! Expression nodes exchanged between the coordinator and native workers.
//!
//! The variant set is closed: every concrete node kind is listed in [`Expr`]
//! and registered in [`crate::expr::tag`]. Nodes are value objects — immutable
//! after construction, compared and hashed structurally, freely copyable
//! across thread boundaries.
//!
//! # Examples
//!
//! ```rust,ignore
//! let var = VariableReference::new("segment", "integer");
//! let expr = Expr::Variable(var);
//! ```

use std::borrow::Cow;
use std::fmt;

use crate::expr::tag::ExprKind;

/// Reference to a named variable in the surrounding plan fragment.
///
/// Wire form: `{ "@type": "variable", "name": "segment", "type": "integer" }`.
/// Canonical string form: `segment<integer>` (see [`crate::expr::canonical`]).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VariableReference {
    pub name: String,
    /// Semantic type name, e.g. `"integer"` or `"array<bigint>"`. Never empty.
    pub tpe: String,
}

impl VariableReference {
    pub fn new(name: impl Into<String>, tpe: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tpe: tpe.into(),
        }
    }
}

impl fmt::Display for VariableReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}<{}>", self.name, self.tpe)
    }
}

/// A constant value carried as an opaque encoded block.
///
/// The block payload is produced and consumed by the execution layer; the
/// protocol treats it as an uninterpreted string.
///
/// Wire form: `{ "@type": "constant", "valueBlock": "...", "type": "bigint" }`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Constant {
    pub value_block: String,
    pub tpe: String,
}

impl Constant {
    pub fn new(value_block: impl Into<String>, tpe: impl Into<String>) -> Self {
        Self {
            value_block: value_block.into(),
            tpe: tpe.into(),
        }
    }
}

/// A function call with already-resolved argument expressions.
///
/// Wire form:
/// `{ "@type": "call", "displayName": "eq", "returnType": "boolean", "arguments": [...] }`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Call {
    pub display_name: String,
    pub return_type: String,
    pub arguments: Vec<Expr>,
}

impl Call {
    pub fn new(
        display_name: impl Into<String>,
        return_type: impl Into<String>,
        arguments: Vec<Expr>,
    ) -> Self {
        Self {
            display_name: display_name.into(),
            return_type: return_type.into(),
            arguments,
        }
    }
}

/// Built-in special forms that are not ordinary function calls.
///
/// This set is closed; the wire representation is the upper-case form name,
/// e.g. `"IF"` or `"ROW_CONSTRUCTOR"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Form {
    If,
    NullIf,
    Switch,
    When,
    IsNull,
    Coalesce,
    In,
    And,
    Or,
    Dereference,
    RowConstructor,
    Bind,
}

impl Form {
    pub const ALL: [Form; 12] = [
        Form::If,
        Form::NullIf,
        Form::Switch,
        Form::When,
        Form::IsNull,
        Form::Coalesce,
        Form::In,
        Form::And,
        Form::Or,
        Form::Dereference,
        Form::RowConstructor,
        Form::Bind,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Form::If => "IF",
            Form::NullIf => "NULL_IF",
            Form::Switch => "SWITCH",
            Form::When => "WHEN",
            Form::IsNull => "IS_NULL",
            Form::Coalesce => "COALESCE",
            Form::In => "IN",
            Form::And => "AND",
            Form::Or => "OR",
            Form::Dereference => "DEREFERENCE",
            Form::RowConstructor => "ROW_CONSTRUCTOR",
            Form::Bind => "BIND",
        }
    }

    pub fn parse(s: &str) -> Option<Form> {
        Form::ALL.into_iter().find(|form| form.as_str() == s)
    }
}

impl fmt::Display for Form {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A special-form application, e.g. `IF(cond, a, b)` or `AND(a, b)`.
///
/// Wire form:
/// `{ "@type": "special", "form": "IF", "returnType": "bigint", "arguments": [...] }`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SpecialForm {
    pub form: Form,
    pub return_type: String,
    pub arguments: Vec<Expr>,
}

impl SpecialForm {
    pub fn new(form: Form, return_type: impl Into<String>, arguments: Vec<Expr>) -> Self {
        Self {
            form,
            return_type: return_type.into(),
            arguments,
        }
    }
}

/// A lambda definition: typed parameters and a body expression.
///
/// Wire form:
/// `{ "@type": "lambda", "argumentTypes": ["bigint"], "arguments": ["x"], "body": {...} }`.
/// The wire format carries no explicit `type` field; the semantic type is
/// derived from the argument types (see [`Expr::semantic_type`]).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Lambda {
    pub argument_types: Vec<String>,
    pub arguments: Vec<String>,
    pub body: Box<Expr>,
}

impl Lambda {
    pub fn new(argument_types: Vec<String>, arguments: Vec<String>, body: Expr) -> Self {
        Self {
            argument_types,
            arguments,
            body: Box::new(body),
        }
    }
}

/// An expression node, polymorphic over the closed variant set.
///
/// Serialization is handled in [`crate::expr::serde_tagged`]: every node maps
/// to a JSON object tagged with `@type`, and all polymorphic read/write
/// traffic dispatches through [`Expr::from_json_value`] / [`Expr::to_json_value`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expr {
    /// Variable reference: `segment`
    Variable(VariableReference),

    /// Constant with an opaque value block: `42`
    Constant(Constant),

    /// Function call: `eq(segment, 42)`
    Call(Call),

    /// Special form: `IF(cond, a, b)`
    SpecialForm(SpecialForm),

    /// Lambda definition: `x -> x + 1`
    Lambda(Lambda),
}

impl Expr {
    /// The variant kind of this node, as registered in the tag table.
    pub fn kind(&self) -> ExprKind {
        match self {
            Expr::Variable(_) => ExprKind::Variable,
            Expr::Constant(_) => ExprKind::Constant,
            Expr::Call(_) => ExprKind::Call,
            Expr::SpecialForm(_) => ExprKind::SpecialForm,
            Expr::Lambda(_) => ExprKind::Lambda,
        }
    }

    /// The semantic type name of this node.
    ///
    /// Variables and constants carry it directly, calls and special forms
    /// report their return type, and a lambda's type is rendered from its
    /// argument types since the wire format stores none.
    pub fn semantic_type(&self) -> Cow<'_, str> {
        match self {
            Expr::Variable(v) => Cow::Borrowed(v.tpe.as_str()),
            Expr::Constant(c) => Cow::Borrowed(c.tpe.as_str()),
            Expr::Call(c) => Cow::Borrowed(c.return_type.as_str()),
            Expr::SpecialForm(s) => Cow::Borrowed(s.return_type.as_str()),
            Expr::Lambda(l) => Cow::Owned(format!("function({})", l.argument_types.join(","))),
        }
    }
}

impl From<VariableReference> for Expr {
    fn from(v: VariableReference) -> Self {
        Expr::Variable(v)
    }
}

impl From<Constant> for Expr {
    fn from(c: Constant) -> Self {
        Expr::Constant(c)
    }
}

impl From<Call> for Expr {
    fn from(c: Call) -> Self {
        Expr::Call(c)
    }
}

impl From<SpecialForm> for Expr {
    fn from(s: SpecialForm) -> Self {
        Expr::SpecialForm(s)
    }
}

impl From<Lambda> for Expr {
    fn from(l: Lambda) -> Self {
        Expr::Lambda(l)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variable_display_matches_canonical_form() {
        let v = VariableReference::new("segment", "integer");
        assert_eq!(v.to_string(), "segment<integer>");
    }

    #[test]
    fn form_parse_round_trips_all_forms() {
        for form in Form::ALL {
            assert_eq!(Form::parse(form.as_str()), Some(form));
        }
        assert_eq!(Form::parse("NOT_A_FORM"), None);
    }

    #[test]
    fn lambda_semantic_type_is_derived() {
        let lambda = Lambda::new(
            vec!["bigint".into(), "varchar".into()],
            vec!["x".into(), "y".into()],
            Expr::Variable(VariableReference::new("x", "bigint")),
        );
        assert_eq!(
            Expr::Lambda(lambda).semantic_type(),
            "function(bigint,varchar)"
        );
    }
}
