//! Validation configuration.
use std::sync::Arc;

use ahash::AHashMap;
use referencing::{Draft, Resource, Retrieve};
use serde_json::Value;

use crate::{
    diagnostics::LoadError, loader::SchemaLoader, retriever::DefaultRetriever, validator::Validator,
};

/// Configuration options for JSON Schema validation.
#[derive(Clone)]
pub struct ValidationOptions {
    pub(crate) draft: Option<Draft>,
    pub(crate) retriever: Arc<dyn Retrieve>,
    pub(crate) resources: AHashMap<String, Resource>,
    pub(crate) validate_formats: bool,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        ValidationOptions {
            draft: None,
            retriever: Arc::new(DefaultRetriever),
            resources: AHashMap::default(),
            validate_formats: false,
        }
    }
}

impl ValidationOptions {
    pub(crate) fn draft_for(&self, contents: &Value) -> Draft {
        if let Some(draft) = self.draft {
            draft
        } else {
            // Top-level entry point defaults to 2020-12 when `$schema` is absent, distinct
            // from `Draft::detect`'s own fallback-to-receiver behavior (see DESIGN.md).
            Draft::Draft202012.detect(contents).unwrap_or(Draft::Draft202012)
        }
    }

    /// Pin the dialect instead of relying on `$schema` auto-detection.
    #[must_use]
    pub fn with_draft(mut self, draft: Draft) -> Self {
        self.draft = Some(draft);
        self
    }

    /// Use a custom retriever for external (non-registered) schema references.
    #[must_use]
    pub fn with_retriever(mut self, retriever: impl Retrieve + 'static) -> Self {
        self.retriever = Arc::new(retriever);
        self
    }

    /// Pre-register an additional resource, addressable during resolution without a
    /// network/file round-trip.
    #[must_use]
    pub fn with_resource(mut self, uri: impl Into<String>, resource: Resource) -> Self {
        self.resources.insert(uri.into(), resource);
        self
    }

    /// Whether `format` is checked beyond its declared instance type. Defaults to `false`
    /// (format assertion is a Non-goal here; this flag exists only so callers who embed
    /// their own format checks have a documented place to flip it).
    #[must_use]
    pub fn should_validate_formats(mut self, validate_formats: bool) -> Self {
        self.validate_formats = validate_formats;
        self
    }

    /// Build a [`Validator`] from a root schema document using the current options.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] if the schema cannot be parsed or indexed.
    pub fn build(&self, schema: &Value) -> Result<Validator, LoadError> {
        SchemaLoader::new(self.clone()).load(schema)
    }
}

/// Start building a [`Validator`] with non-default options.
#[must_use]
pub fn options() -> ValidationOptions {
    ValidationOptions::default()
}
