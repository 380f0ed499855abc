//! A small multi-schema store layered on top of [`ValidationOptions`]/[`Validator`],
//! implementing the four operations an embedding caller needs: register, resolve,
//! validate, and in-place modification.
//!
//! `Registry` has no incremental-growth path once built (see `loader.rs`'s doc comment),
//! so [`Engine::apply_modification`] re-registers the whole schema under its URI rather
//! than patching the compiled [`Validator`] in place.
use ahash::AHashMap;
use serde_json::Value;

use crate::{
    diagnostics::{Diagnostic, LoadError},
    loader::SchemaLoader,
    options::ValidationOptions,
    validator::Validator,
};

/// Which edit `apply_modification` performs at `path/key`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModificationAction {
    /// Create or replace `key` under `path` with the given content.
    Add,
    /// Remove `key` from `path`, if present.
    Delete,
}

struct Entry {
    content: Value,
    validator: Validator,
}

/// Holds every schema registered under a URI, each compiled into its own [`Validator`].
pub struct Engine {
    options: ValidationOptions,
    schemas: AHashMap<String, Entry>,
}

impl Engine {
    #[must_use]
    pub fn new(options: ValidationOptions) -> Self {
        Engine {
            options,
            schemas: AHashMap::default(),
        }
    }

    /// Parse and index `content` under `uri`. Replaces any prior registration for the
    /// same URI.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] if the document cannot be parsed/indexed; a successful
    /// registration returns any non-fatal load diagnostics (currently always empty, kept
    /// for forward compatibility with e.g. a future dialect-fallback warning).
    pub fn register_schema(&mut self, uri: impl Into<String>, content: Value) -> Result<Vec<Diagnostic>, LoadError> {
        let uri = uri.into();
        let validator = SchemaLoader::new(self.options.clone()).load_at(&uri, &content)?;
        self.schemas.insert(uri, Entry { content, validator });
        Ok(Vec::new())
    }

    /// Fetch the raw document registered under `uri`, if any.
    #[must_use]
    pub fn resolve_schema(&self, uri: &str) -> Option<&Value> {
        self.schemas.get(uri).map(|entry| &entry.content)
    }

    /// Validate `instance` against the schema registered under `schema_uri`.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::UnknownSchema`] if `schema_uri` was never registered.
    pub fn validate(&self, schema_uri: &str, instance: &Value) -> Result<Vec<Diagnostic>, LoadError> {
        let entry = self.entry(schema_uri)?;
        Ok(entry.validator.validate(instance))
    }

    /// Add or delete `key` under the object at `path` within the schema registered under
    /// `schema_uri`, then re-index it.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::UnknownSchema`] if `schema_uri` was never registered,
    /// [`LoadError::InvalidPath`] if `path` does not address a JSON object, or a
    /// resolution/parsing error if the modified document no longer indexes cleanly.
    pub fn apply_modification(
        &mut self,
        schema_uri: &str,
        action: ModificationAction,
        path: &str,
        key: &str,
        content: Option<Value>,
    ) -> Result<(), LoadError> {
        let mut updated = self.entry(schema_uri)?.content.clone();
        {
            let target = if path.is_empty() {
                &mut updated
            } else {
                updated.pointer_mut(path).ok_or_else(|| LoadError::InvalidPath {
                    path: path.to_owned(),
                })?
            };
            let object = target.as_object_mut().ok_or_else(|| LoadError::InvalidPath {
                path: path.to_owned(),
            })?;
            match action {
                ModificationAction::Add => {
                    object.insert(key.to_owned(), content.unwrap_or(Value::Null));
                }
                ModificationAction::Delete => {
                    object.remove(key);
                }
            }
        }

        let validator = SchemaLoader::new(self.options.clone()).load_at(schema_uri, &updated)?;
        let entry = self
            .schemas
            .get_mut(schema_uri)
            .expect("presence already checked by self.entry above");
        entry.content = updated;
        entry.validator = validator;
        Ok(())
    }

    fn entry(&self, uri: &str) -> Result<&Entry, LoadError> {
        self.schemas.get(uri).ok_or_else(|| LoadError::UnknownSchema { uri: uri.to_owned() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::options;
    use serde_json::json;

    #[test]
    fn register_resolve_validate_roundtrip() {
        let mut engine = Engine::new(options());
        engine
            .register_schema("mem://schema", json!({"type": "string"}))
            .expect("should register");

        assert_eq!(
            engine.resolve_schema("mem://schema"),
            Some(&json!({"type": "string"}))
        );
        assert!(engine.validate("mem://schema", &json!("ok")).unwrap().is_empty());
        assert!(!engine.validate("mem://schema", &json!(1)).unwrap().is_empty());
    }

    #[test]
    fn unknown_uri_errors() {
        let engine = Engine::new(options());
        assert!(matches!(
            engine.validate("mem://missing", &json!(1)),
            Err(LoadError::UnknownSchema { .. })
        ));
    }

    #[test]
    fn apply_modification_add_and_delete() {
        let mut engine = Engine::new(options());
        engine
            .register_schema("mem://schema", json!({"properties": {}}))
            .unwrap();

        engine
            .apply_modification(
                "mem://schema",
                ModificationAction::Add,
                "/properties",
                "name",
                Some(json!({"type": "string"})),
            )
            .expect("add should succeed");
        assert!(!engine
            .validate("mem://schema", &json!({"name": 1}))
            .unwrap()
            .is_empty());

        engine
            .apply_modification("mem://schema", ModificationAction::Delete, "/properties", "name", None)
            .expect("delete should succeed");
        assert!(engine
            .validate("mem://schema", &json!({"name": 1}))
            .unwrap()
            .is_empty());
    }
}
