//! Tagged-JSON codec for expression nodes.
//!
//! Serialization produces an object with a `@type` discriminator followed by
//! the variant's fields in schema order:
//! - `{ "@type": "variable", "name": "segment", "type": "integer" }`
//! - `{ "@type": "call", "displayName": "eq", "returnType": "boolean", "arguments": [...] }`
//!
//! All polymorphic traffic dispatches through [`Expr::to_json_value`] and
//! [`Expr::from_json_value`]; the `serde` trait impls delegate to the same
//! functions so `serde_json::to_string` / `from_str` agree with them. Decoding
//! reports the structured taxonomy in [`crate::error::Error`] — a failed
//! decode never yields a partially-built node.

use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use tracing::trace;

use crate::error::{Error, Result};
use crate::expr::node::{Call, Constant, Expr, Form, Lambda, SpecialForm, VariableReference};
use crate::expr::tag::ExprKind;

/// Reserved key naming which variant a generic object encodes.
pub const DISCRIMINATOR: &str = "@type";

// =============================================================================
// Field extraction helpers
// =============================================================================
//
// Shared by every variant decoder so the JSON path and any alternate
// constructor path validate fields by exactly one set of rules.

fn get_field<'a>(object: &'a Map<String, Value>, field: &'static str) -> Result<&'a Value> {
    object.get(field).ok_or(Error::MissingField(field))
}

fn get_str<'a>(object: &'a Map<String, Value>, field: &'static str) -> Result<&'a str> {
    get_field(object, field)?
        .as_str()
        .ok_or(Error::FieldTypeMismatch {
            field,
            expected: "a string",
        })
}

/// Semantic type names are required and never empty.
fn get_type_name(object: &Map<String, Value>, field: &'static str) -> Result<String> {
    let tpe = get_str(object, field)?;
    if tpe.is_empty() {
        return Err(Error::FieldTypeMismatch {
            field,
            expected: "a non-empty type name",
        });
    }
    Ok(tpe.to_string())
}

fn get_str_array(object: &Map<String, Value>, field: &'static str) -> Result<Vec<String>> {
    let items = get_field(object, field)?
        .as_array()
        .ok_or(Error::FieldTypeMismatch {
            field,
            expected: "an array of strings",
        })?;
    items
        .iter()
        .map(|item| {
            item.as_str()
                .map(str::to_string)
                .ok_or(Error::FieldTypeMismatch {
                    field,
                    expected: "an array of strings",
                })
        })
        .collect()
}

fn get_expr_array(object: &Map<String, Value>, field: &'static str) -> Result<Vec<Expr>> {
    let items = get_field(object, field)?
        .as_array()
        .ok_or(Error::FieldTypeMismatch {
            field,
            expected: "an array of expression objects",
        })?;
    items.iter().map(Expr::from_json_value).collect()
}

fn get_expr(object: &Map<String, Value>, field: &'static str) -> Result<Expr> {
    Expr::from_json_value(get_field(object, field)?)
}

/// Read a generic value as a tagged object, returning its fields and the
/// `@type` discriminator.
///
/// A non-object value carries no discriminator at all, so it reports
/// [`Error::MissingDiscriminator`] like an object without the key.
fn tagged_object(value: &Value) -> Result<(&Map<String, Value>, &str)> {
    let object = value.as_object().ok_or(Error::MissingDiscriminator)?;
    let tag = match object.get(DISCRIMINATOR) {
        None => return Err(Error::MissingDiscriminator),
        Some(tag) => tag.as_str().ok_or(Error::FieldTypeMismatch {
            field: DISCRIMINATOR,
            expected: "a string",
        })?,
    };
    Ok((object, tag))
}

/// Check the discriminator of `value` against one expected variant and hand
/// back the object's fields. Used when a variant decoder is invoked directly
/// rather than through the dispatcher.
fn fields_for<'a>(value: &'a Value, expected: ExprKind) -> Result<&'a Map<String, Value>> {
    let (object, tag) = tagged_object(value)?;
    let kind = ExprKind::from_tag(tag)?;
    if kind != expected {
        return Err(Error::UnknownVariantTag(tag.to_string()));
    }
    Ok(object)
}

// =============================================================================
// Per-variant decoders
// =============================================================================

fn decode_variable(object: &Map<String, Value>) -> Result<VariableReference> {
    let name = get_str(object, "name")?.to_string();
    let tpe = get_type_name(object, "type")?;
    Ok(VariableReference::new(name, tpe))
}

fn decode_constant(object: &Map<String, Value>) -> Result<Constant> {
    let value_block = get_str(object, "valueBlock")?.to_string();
    let tpe = get_type_name(object, "type")?;
    Ok(Constant::new(value_block, tpe))
}

fn decode_call(object: &Map<String, Value>) -> Result<Call> {
    let display_name = get_str(object, "displayName")?.to_string();
    let return_type = get_type_name(object, "returnType")?;
    let arguments = get_expr_array(object, "arguments")?;
    Ok(Call::new(display_name, return_type, arguments))
}

fn decode_special(object: &Map<String, Value>) -> Result<SpecialForm> {
    let form = get_str(object, "form")?;
    let form = Form::parse(form).ok_or(Error::FieldTypeMismatch {
        field: "form",
        expected: "a special form name",
    })?;
    let return_type = get_type_name(object, "returnType")?;
    let arguments = get_expr_array(object, "arguments")?;
    Ok(SpecialForm::new(form, return_type, arguments))
}

fn decode_lambda(object: &Map<String, Value>) -> Result<Lambda> {
    let argument_types = get_str_array(object, "argumentTypes")?;
    let arguments = get_str_array(object, "arguments")?;
    let body = get_expr(object, "body")?;
    Ok(Lambda::new(argument_types, arguments, body))
}

// =============================================================================
// Per-variant encoders
// =============================================================================
//
// Field order is the schema's insertion order; serde_json's `preserve_order`
// feature keeps it stable through the generic tree.

fn encode_variable(v: &VariableReference) -> Value {
    json!({
        DISCRIMINATOR: ExprKind::Variable.tag(),
        "name": v.name,
        "type": v.tpe,
    })
}

fn encode_constant(c: &Constant) -> Value {
    json!({
        DISCRIMINATOR: ExprKind::Constant.tag(),
        "valueBlock": c.value_block,
        "type": c.tpe,
    })
}

fn encode_call(c: &Call) -> Value {
    let arguments: Vec<Value> = c.arguments.iter().map(Expr::to_json_value).collect();
    json!({
        DISCRIMINATOR: ExprKind::Call.tag(),
        "displayName": c.display_name,
        "returnType": c.return_type,
        "arguments": arguments,
    })
}

fn encode_special(s: &SpecialForm) -> Value {
    let arguments: Vec<Value> = s.arguments.iter().map(Expr::to_json_value).collect();
    json!({
        DISCRIMINATOR: ExprKind::SpecialForm.tag(),
        "form": s.form.as_str(),
        "returnType": s.return_type,
        "arguments": arguments,
    })
}

fn encode_lambda(l: &Lambda) -> Value {
    json!({
        DISCRIMINATOR: ExprKind::Lambda.tag(),
        "argumentTypes": l.argument_types,
        "arguments": l.arguments,
        "body": l.body.to_json_value(),
    })
}

// =============================================================================
// Polymorphic dispatch
// =============================================================================

impl Expr {
    /// Encode this node as a tagged generic JSON object.
    ///
    /// Deterministic: the same node always yields structurally identical
    /// JSON, with fields in schema order.
    pub fn to_json_value(&self) -> Value {
        match self {
            Expr::Variable(v) => encode_variable(v),
            Expr::Constant(c) => encode_constant(c),
            Expr::Call(c) => encode_call(c),
            Expr::SpecialForm(s) => encode_special(s),
            Expr::Lambda(l) => encode_lambda(l),
        }
    }

    /// Decode a tagged generic JSON object into a concrete node.
    ///
    /// Resolves the variant through the `@type` discriminator and the tag
    /// table, then delegates to the variant's field decoder. Nested
    /// expressions recurse through this same entry point.
    pub fn from_json_value(value: &Value) -> Result<Expr> {
        let (object, tag) = tagged_object(value)?;
        let kind = ExprKind::from_tag(tag)?;
        trace!(tag, "decoding expression object");
        match kind {
            ExprKind::Variable => decode_variable(object).map(Expr::Variable),
            ExprKind::Constant => decode_constant(object).map(Expr::Constant),
            ExprKind::Call => decode_call(object).map(Expr::Call),
            ExprKind::SpecialForm => decode_special(object).map(Expr::SpecialForm),
            ExprKind::Lambda => decode_lambda(object).map(Expr::Lambda),
        }
    }
}

impl VariableReference {
    /// Encode as a tagged generic JSON object.
    pub fn to_json_value(&self) -> Value {
        encode_variable(self)
    }

    /// Decode a tagged generic JSON object known to hold a variable
    /// reference. The `@type` discriminator is still verified.
    pub fn from_json_value(value: &Value) -> Result<VariableReference> {
        decode_variable(fields_for(value, ExprKind::Variable)?)
    }
}

impl Constant {
    pub fn to_json_value(&self) -> Value {
        encode_constant(self)
    }

    pub fn from_json_value(value: &Value) -> Result<Constant> {
        decode_constant(fields_for(value, ExprKind::Constant)?)
    }
}

impl Call {
    pub fn to_json_value(&self) -> Value {
        encode_call(self)
    }

    pub fn from_json_value(value: &Value) -> Result<Call> {
        decode_call(fields_for(value, ExprKind::Call)?)
    }
}

impl SpecialForm {
    pub fn to_json_value(&self) -> Value {
        encode_special(self)
    }

    pub fn from_json_value(value: &Value) -> Result<SpecialForm> {
        decode_special(fields_for(value, ExprKind::SpecialForm)?)
    }
}

impl Lambda {
    pub fn to_json_value(&self) -> Value {
        encode_lambda(self)
    }

    pub fn from_json_value(value: &Value) -> Result<Lambda> {
        decode_lambda(fields_for(value, ExprKind::Lambda)?)
    }
}

// =============================================================================
// serde trait impls
// =============================================================================

impl Serialize for Expr {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_json_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Expr {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Expr::from_json_value(&value).map_err(de::Error::custom)
    }
}

impl Serialize for VariableReference {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_json_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for VariableReference {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        VariableReference::from_json_value(&value).map_err(de::Error::custom)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variable_encodes_with_discriminator_first() {
        let v = VariableReference::new("segment", "integer");
        let json = serde_json::to_string(&v.to_json_value()).unwrap();
        assert_eq!(
            json,
            r#"{"@type":"variable","name":"segment","type":"integer"}"#
        );
    }

    #[test]
    fn dispatcher_rejects_missing_discriminator() {
        let value = json!({ "name": "segment", "type": "integer" });
        assert_eq!(
            Expr::from_json_value(&value).unwrap_err(),
            Error::MissingDiscriminator
        );
    }

    #[test]
    fn dispatcher_rejects_non_object_values() {
        for value in [json!(42), json!("variable"), json!(["variable"]), json!(null)] {
            assert_eq!(
                Expr::from_json_value(&value).unwrap_err(),
                Error::MissingDiscriminator
            );
        }
    }

    #[test]
    fn direct_variant_decode_verifies_the_tag() {
        let constant = json!({ "@type": "constant", "valueBlock": "CgAAAA==", "type": "bigint" });
        let err = VariableReference::from_json_value(&constant).unwrap_err();
        assert_eq!(err, Error::UnknownVariantTag("constant".to_string()));
    }

    #[test]
    fn empty_type_name_is_rejected() {
        let value = json!({ "@type": "variable", "name": "segment", "type": "" });
        assert_eq!(
            Expr::from_json_value(&value).unwrap_err(),
            Error::FieldTypeMismatch {
                field: "type",
                expected: "a non-empty type name"
            }
        );
    }

    #[test]
    fn wrong_field_shape_names_the_field() {
        let value = json!({ "@type": "variable", "name": 7, "type": "integer" });
        assert_eq!(
            Expr::from_json_value(&value).unwrap_err(),
            Error::FieldTypeMismatch {
                field: "name",
                expected: "a string"
            }
        );
    }

    #[test]
    fn nested_decode_failure_propagates() {
        let value = json!({
            "@type": "call",
            "displayName": "eq",
            "returnType": "boolean",
            "arguments": [{ "@type": "rowfield" }],
        });
        assert_eq!(
            Expr::from_json_value(&value).unwrap_err(),
            Error::UnknownVariantTag("rowfield".to_string())
        );
    }

    #[test]
    fn unknown_special_form_is_a_field_mismatch() {
        let value = json!({
            "@type": "special",
            "form": "XOR",
            "returnType": "boolean",
            "arguments": [],
        });
        assert_eq!(
            Expr::from_json_value(&value).unwrap_err(),
            Error::FieldTypeMismatch {
                field: "form",
                expected: "a special form name"
            }
        );
    }
}
