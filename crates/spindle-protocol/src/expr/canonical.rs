//! Canonical string tokens for key-capable expression nodes.
//!
//! A variable reference has a compact, reversible string form `name<type>`
//! (e.g. `segment<integer>`) used wherever the node acts as a map key or a
//! short identifier in plan artifacts. Decoding a token is an alternate
//! constructor path: it funnels into the same [`VariableReference::new`]
//! constructor the JSON decoder uses.
//!
//! The type name may itself contain angle brackets (`array<bigint>` and
//! friends occur routinely), so the token is split at the *first* `<` and the
//! final character must be `>`. This stays injective because the name is not
//! allowed to contain either delimiter: encoding such a name fails rather
//! than escaping, keeping the token readable and byte-compatible with the
//! worker side.

use crate::error::{Error, Result};
use crate::expr::node::VariableReference;

impl VariableReference {
    /// Encode this node's identifying fields as a canonical `name<type>` token.
    ///
    /// Fails with [`Error::UnencodableField`] when the name contains a
    /// delimiter character or when either field is empty.
    pub fn map_key(&self) -> Result<String> {
        if self.name.is_empty() || self.name.contains(['<', '>']) {
            return Err(Error::UnencodableField {
                field: "name",
                value: self.name.clone(),
            });
        }
        if self.tpe.is_empty() {
            return Err(Error::UnencodableField {
                field: "type",
                value: self.tpe.clone(),
            });
        }
        Ok(format!("{}<{}>", self.name, self.tpe))
    }

    /// Parse a canonical `name<type>` token back into a variable reference.
    ///
    /// Functionally equivalent to decoding the tagged-JSON form of the same
    /// node: `decode(encode(x)) == x` for every encodable `x`.
    pub fn from_map_key(token: &str) -> Result<VariableReference> {
        let malformed = || Error::MalformedCanonicalToken(token.to_string());

        let open = token.find('<').ok_or_else(malformed)?;
        if !token.ends_with('>') {
            return Err(malformed());
        }
        let name = &token[..open];
        let tpe = &token[open + 1..token.len() - 1];
        if name.is_empty() || tpe.is_empty() {
            return Err(malformed());
        }
        Ok(VariableReference::new(name, tpe))
    }
}
