//! Error types for brep.
//!
//! Topology construction (`add_edge`, `add_face`) reports malformed input as
//! `None` rather than an error. `MeshError` covers the remaining failures:
//! builder validation, attribute lookup, and invalid options.

use thiserror::Error;

/// Result type alias using [`MeshError`].
pub type Result<T> = std::result::Result<T, MeshError>;

/// Errors that can occur during mesh operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MeshError {
    /// A face references an invalid vertex index.
    #[error("face {face} references invalid vertex index {vertex}")]
    InvalidVertexIndex {
        /// The face index.
        face: usize,
        /// The invalid vertex index.
        vertex: usize,
    },

    /// A face has fewer than three vertices or repeats a vertex on consecutive corners.
    #[error("face {face} is degenerate")]
    DegenerateFace {
        /// The face index.
        face: usize,
    },

    /// No attribute with the given name exists.
    #[error("attribute \"{name}\" not found")]
    AttributeNotFound {
        /// The attribute name.
        name: String,
    },

    /// An attribute exists but stores a different value type.
    #[error("attribute \"{name}\" does not store values of type {expected}")]
    AttributeType {
        /// The attribute name.
        name: String,
        /// The requested value type.
        expected: &'static str,
    },

    /// Invalid parameter value.
    #[error("invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// The invalid value (as string).
        value: String,
        /// Reason the value is invalid.
        reason: &'static str,
    },
}

impl MeshError {
    /// Create an invalid parameter error.
    pub fn invalid_param<T: std::fmt::Display>(
        name: &'static str,
        value: T,
        reason: &'static str,
    ) -> Self {
        MeshError::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }

    /// Create an attribute-not-found error.
    pub fn attribute_not_found(name: &str) -> Self {
        MeshError::AttributeNotFound {
            name: name.to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = MeshError::attribute_not_found("position");
        assert_eq!(err.to_string(), "attribute \"position\" not found");

        let err = MeshError::invalid_param("bins", 1, "must be at least 2");
        assert_eq!(
            err.to_string(),
            "invalid parameter: bins = 1 (must be at least 2)"
        );
    }
}
