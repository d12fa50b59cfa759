//! Canonical map-key codec tests.

use rstest::rstest;
use spindle_protocol::{Error, VariableReference};

#[rstest]
#[case("segment", "integer")]
#[case("col", "array<bigint>")]
#[case("m", "map<varchar,row<bigint,double>>")]
#[case("expr_12", "varchar(255)")]
fn key_round_trips(#[case] name: &str, #[case] tpe: &str) {
    let v = VariableReference::new(name, tpe);
    let key = v.map_key().unwrap();
    assert_eq!(VariableReference::from_map_key(&key).unwrap(), v);
}

#[rstest]
#[case("segmentinteger")] // no delimiters at all
#[case("segment<integer")] // missing closing delimiter
#[case("<integer>")] // empty name
#[case("segment<>")] // empty type
#[case("")]
fn malformed_tokens_are_rejected(#[case] token: &str) {
    assert_eq!(
        VariableReference::from_map_key(token).unwrap_err(),
        Error::MalformedCanonicalToken(token.to_string())
    );
}

#[rstest]
#[case("a<b")]
#[case("a>b")]
#[case("")]
fn unencodable_names_are_rejected(#[case] name: &str) {
    let v = VariableReference::new(name, "integer");
    assert_eq!(
        v.map_key().unwrap_err(),
        Error::UnencodableField {
            field: "name",
            value: name.to_string()
        }
    );
}

#[test]
fn key_decode_equals_json_decode() {
    let json = r#"{"@type":"variable","name":"segment","type":"integer"}"#;
    let via_json: VariableReference = serde_json::from_str(json).unwrap();
    let via_key = VariableReference::from_map_key("segment<integer>").unwrap();

    assert_eq!(via_json, via_key);
    assert_eq!(via_json.to_json_value(), via_key.to_json_value());
}

#[test]
fn nodes_behave_as_map_keys() {
    use std::collections::HashMap;

    let mut assignments: HashMap<VariableReference, u32> = HashMap::new();
    assignments.insert(VariableReference::new("segment", "integer"), 0);
    assignments.insert(VariableReference::new("segment", "bigint"), 1);

    // Same fields, independently constructed, hash to the same slot.
    let probe = VariableReference::from_map_key("segment<integer>").unwrap();
    assert_eq!(assignments.get(&probe), Some(&0));
    assert_eq!(assignments.len(), 2);
}
