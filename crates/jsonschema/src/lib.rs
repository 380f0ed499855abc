//! A JSON Schema validation engine supporting drafts 4, 6, 7, 2019-09 and 2020-12.
//!
//! - Dialect auto-detection via `$schema`, with dynamic-scope resolution
//!   (`$anchor`, `$dynamicAnchor`/`$recursiveAnchor`, `$dynamicRef`/`$recursiveRef`).
//! - Annotation-driven keywords (`unevaluatedProperties`, `unevaluatedItems`, `contains`,
//!   `dependentSchemas`, `if`/`then`/`else`) implemented with a per-location ledger rather
//!   than ad hoc bookkeeping.
//! - A pluggable [`referencing::Retrieve`] boundary for out-of-document `$ref` targets;
//!   the default refuses to fetch anything.
//!
//! # One-off validation
//!
//! ```rust
//! use serde_json::json;
//!
//! let schema = json!({"type": "string"});
//! let instance = json!("Hello, world!");
//!
//! assert!(jsonschema::is_valid(&schema, &instance));
//! ```
//!
//! # Reusable validators
//!
//! ```rust
//! use serde_json::json;
//!
//! let schema = json!({"type": "string"});
//! let validator = jsonschema::options().build(&schema).expect("a valid schema");
//!
//! assert!(validator.is_valid(&json!("Hello, world!")));
//! assert!(!validator.is_valid(&json!(42)));
//! ```
//!
//! # Multiple schemas
//!
//! [`Engine`] keeps any number of registered schemas addressable by URI, and supports
//! in-place modification of a registered schema via JSON-pointer addressing:
//!
//! ```rust
//! use jsonschema::{Engine, ModificationAction, options};
//! use serde_json::json;
//!
//! let mut engine = Engine::new(options());
//! engine
//!     .register_schema("mem://person", json!({"properties": {}}))
//!     .expect("should register");
//! engine
//!     .apply_modification(
//!         "mem://person",
//!         ModificationAction::Add,
//!         "/properties",
//!         "name",
//!         Some(json!({"type": "string"})),
//!     )
//!     .expect("should apply");
//!
//! assert!(!engine
//!     .validate("mem://person", &json!({"name": 1}))
//!     .unwrap()
//!     .is_empty());
//! ```
mod annotations;
mod ecma;
pub mod diagnostics;
mod instance;
mod loader;
mod options;
pub mod paths;
pub mod primitive_type;
pub mod retriever;
mod schema;
mod scope;
mod store;
mod validator;

pub use diagnostics::{Diagnostic, LoadError, Severity};
pub use instance::{InstanceModel, InstanceRef};
pub use options::{options, ValidationOptions};
pub use referencing::{Draft, Resource, Retrieve};
pub use schema::SchemaModel;
pub use store::{Engine, ModificationAction};
pub use validator::Validator;

use serde_json::Value;

/// Validate `instance` against `schema` once, without keeping the compiled form around.
///
/// Prefer [`options`]`().build(schema)` when validating more than one instance against
/// the same schema.
#[must_use]
pub fn is_valid(schema: &Value, instance: &Value) -> bool {
    options().build(schema).is_ok_and(|validator| validator.is_valid(instance))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn one_off_helper() {
        assert!(is_valid(&json!({"type": "string"}), &json!("ok")));
        assert!(!is_valid(&json!({"type": "string"}), &json!(1)));
    }

    #[test]
    fn boolean_schemas() {
        assert!(is_valid(&json!(true), &json!(1)));
        assert!(!is_valid(&json!(false), &json!(1)));
    }

    #[test]
    fn unretrievable_external_ref_is_a_load_error() {
        // The default retriever refuses to fetch, and external `$ref` targets are
        // resolved eagerly at load time, so this never reaches validation.
        let schema = json!({"$ref": "https://example.com/missing-schema.json"});
        assert!(options().build(&schema).is_err());
    }
}
