//! The variant tag table.
//!
//! Maps each expression variant to its `@type` discriminator string and back.
//! This is the single registration point for the closed variant set: adding a
//! variant means adding an [`ExprKind`] case, a tag here, and a codec arm in
//! [`crate::expr::serde_tagged`].

use crate::error::{Error, Result};

/// The kind of a concrete expression variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExprKind {
    Variable,
    Constant,
    Call,
    SpecialForm,
    Lambda,
}

impl ExprKind {
    /// Every registered variant, in tag-table order.
    pub const ALL: [ExprKind; 5] = [
        ExprKind::Variable,
        ExprKind::Constant,
        ExprKind::Call,
        ExprKind::SpecialForm,
        ExprKind::Lambda,
    ];

    /// The `@type` discriminator for this variant.
    pub const fn tag(self) -> &'static str {
        match self {
            ExprKind::Variable => "variable",
            ExprKind::Constant => "constant",
            ExprKind::Call => "call",
            ExprKind::SpecialForm => "special",
            ExprKind::Lambda => "lambda",
        }
    }

    /// Resolve a `@type` discriminator back to its variant kind.
    ///
    /// Fails with [`Error::UnknownVariantTag`] for anything outside the
    /// registered set; an unknown tag is never silently defaulted.
    pub fn from_tag(tag: &str) -> Result<ExprKind> {
        match tag {
            "variable" => Ok(ExprKind::Variable),
            "constant" => Ok(ExprKind::Constant),
            "call" => Ok(ExprKind::Call),
            "special" => Ok(ExprKind::SpecialForm),
            "lambda" => Ok(ExprKind::Lambda),
            _ => Err(Error::UnknownVariantTag(tag.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_are_unique_and_reversible() {
        for kind in ExprKind::ALL {
            assert_eq!(ExprKind::from_tag(kind.tag()).unwrap(), kind);
        }
        let mut tags: Vec<&str> = ExprKind::ALL.iter().map(|k| k.tag()).collect();
        tags.sort_unstable();
        tags.dedup();
        assert_eq!(tags.len(), ExprKind::ALL.len());
    }

    #[test]
    fn unknown_tag_is_rejected_with_the_offending_string() {
        let err = ExprKind::from_tag("rowfield").unwrap_err();
        assert_eq!(err, Error::UnknownVariantTag("rowfield".to_string()));
    }
}
