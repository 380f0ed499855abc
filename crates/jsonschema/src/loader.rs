//! Turns a raw schema document plus [`ValidationOptions`] into a [`Validator`].
//!
//! Dialect detection, base-URI assignment and anchor indexing (spec's loader steps 1-3)
//! are delegated entirely to [`referencing::Registry`]; this module's own job is step 4
//! (keyword parsing, via [`crate::schema::SchemaModel::parse`]) plus wiring the options'
//! retriever and pre-registered resources into a fresh registry. Step 6 ("pre-resolution")
//! is not performed eagerly: `$ref`/`$dynamicRef`/`$recursiveRef` targets are re-parsed
//! into a [`crate::schema::SchemaModel`] lazily, the first time a validation run reaches
//! them (see `validator.rs`), since only the root document needs an eagerly built tree.
use std::sync::Arc;

use referencing::{Draft, Registry, Resource, Retrieve};
use serde_json::Value;
use url::Url;

use crate::{diagnostics::LoadError, options::ValidationOptions, schema::SchemaModel, validator::Validator};

/// Base URI assigned to a schema registered without one of its own, mirroring the
/// teacher's synthetic-URI behavior for schemas compiled without an explicit `$id`.
const DEFAULT_BASE_URI: &str = "json-schema:///";

pub(crate) struct SchemaLoader {
    options: ValidationOptions,
}

impl SchemaLoader {
    pub(crate) fn new(options: ValidationOptions) -> Self {
        SchemaLoader { options }
    }

    /// Build a [`Validator`] for `schema`, registered under a synthetic base URI.
    pub(crate) fn load(self, schema: &Value) -> Result<Validator, LoadError> {
        self.load_at(DEFAULT_BASE_URI, schema)
    }

    /// Build a [`Validator`] for `schema`, registered under `uri`.
    pub(crate) fn load_at(self, uri: &str, schema: &Value) -> Result<Validator, LoadError> {
        let dialect = self.options.draft_for(schema);
        let base_uri = Url::parse(uri).map_err(referencing::Error::from)?;
        let resource = dialect.create_resource(schema.clone());

        let mut pairs: Vec<(String, Resource)> = vec![(base_uri.to_string(), resource)];
        for (resource_uri, resource) in &self.options.resources {
            pairs.push((resource_uri.clone(), resource.clone()));
        }

        let retriever: Box<dyn Retrieve> = Box::new(RetrieverAdapter(Arc::clone(&self.options.retriever)));
        let registry = Registry::options()
            .retriever(retriever)
            .draft(dialect)
            .try_from_resources(pairs.into_iter())?;

        let root = SchemaModel::parse(schema, dialect);

        Ok(Validator::new(registry, base_uri, dialect, root))
    }
}

struct RetrieverAdapter(Arc<dyn Retrieve>);

impl Retrieve for RetrieverAdapter {
    fn retrieve(&self, uri: &Url) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        self.0.retrieve(uri)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::options;
    use serde_json::json;

    #[test]
    fn loads_a_plain_schema() {
        let schema = json!({"type": "string"});
        let validator = options().build(&schema).expect("should load");
        assert!(validator.is_valid(&json!("hello")));
        assert!(!validator.is_valid(&json!(1)));
    }

    #[test]
    fn loads_with_explicit_draft() {
        let schema = json!({"exclusiveMinimum": true, "minimum": 1});
        let validator = options()
            .with_draft(Draft::Draft4)
            .build(&schema)
            .expect("should load");
        assert!(!validator.is_valid(&json!(1)));
        assert!(validator.is_valid(&json!(2)));
    }
}
