//! Structured validation output.
use crate::paths::JSONPointer;
use std::fmt;

/// Severity of a [`Diagnostic`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The instance violates the schema.
    Error,
    /// Non-fatal, e.g. an unresolvable dialect falling back to a default.
    Warning,
}

/// A single validation finding, anchored to both the instance and the schema location
/// that produced it.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    pub instance_path: JSONPointer,
    pub schema_path: JSONPointer,
    pub message: String,
}

impl Diagnostic {
    pub(crate) fn error(
        instance_path: JSONPointer,
        schema_path: JSONPointer,
        message: impl Into<String>,
    ) -> Self {
        Diagnostic {
            severity: Severity::Error,
            instance_path,
            schema_path,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.message, self.instance_path)
    }
}

/// Failure to turn a raw schema document into a usable [`crate::schema::SchemaModel`].
///
/// Load-time errors are fatal for the schema they apply to: validation against such a
/// schema yields a single diagnostic and does not descend further (spec's error-handling
/// design separates these from per-keyword validation errors, which are never fatal).
///
/// Note: duplicate `$anchor`/`$dynamicAnchor`/`$recursiveAnchor` names within one resource
/// are not reported as a distinct error here. `referencing::Registry` indexes anchors with
/// a last-write-wins insert and does not expose the walk needed to detect the collision
/// from this crate (see DESIGN.md); a duplicate silently shadows the earlier declaration
/// instead of failing registration.
#[derive(Debug)]
pub enum LoadError {
    /// `$ref` (or a dynamic/recursive variant) could not be parsed as a URI reference.
    BadRefSyntax { reference: String },
    /// Resource loading/resolution failed (bad `$id`, unretrievable reference, ...).
    Resolution(referencing::Error),
    /// `resolve_schema`/`validate`/`apply_modification` named a URI that was never
    /// registered via `register_schema`.
    UnknownSchema { uri: String },
    /// `apply_modification`'s `path` did not address an object within the registered
    /// schema (missing pointer target, or the target is not a JSON object).
    InvalidPath { path: String },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::BadRefSyntax { reference } => {
                write!(f, "Invalid reference: {reference}")
            }
            LoadError::Resolution(error) => write!(f, "{error}"),
            LoadError::UnknownSchema { uri } => write!(f, "No schema registered under {uri}"),
            LoadError::InvalidPath { path } => write!(f, "Invalid modification path: {path}"),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Resolution(error) => Some(error),
            _ => None,
        }
    }
}

impl From<referencing::Error> for LoadError {
    fn from(error: referencing::Error) -> Self {
        LoadError::Resolution(error)
    }
}
