//! Tagged-union schema representation.
//!
//! A [`SchemaModel`] is either a boolean schema or an object carrying every keyword this
//! engine recognizes, parsed once into a typed form (regexes compiled, `dependencies`
//! normalized into `dependentRequired`/`dependentSchemas`, positional `items`/
//! `additionalItems` normalized into `prefixItems`/`items`, draft-04 boolean
//! `exclusiveMinimum`/`exclusiveMaximum` folded into numeric bounds). Dialect detection,
//! base-URI assignment and anchor indexing are handled upstream by
//! [`referencing::Registry`]/[`referencing::Resolver`]; this module only owns keyword
//! parsing (spec step 4) and normalization (spec step, see §9 "Draft differences").
use std::sync::Arc;

use fancy_regex::Regex;
use referencing::Draft;
use serde_json::Value;

use crate::{ecma, primitive_type::PrimitiveType};

/// A parsed schema node: either a boolean schema or an object with typed keyword fields.
#[derive(Debug, Clone)]
pub enum SchemaModel {
    Bool(bool),
    Object(Arc<Keywords>),
}

impl SchemaModel {
    #[must_use]
    pub(crate) fn parse(value: &Value, dialect: Draft) -> SchemaModel {
        match value {
            Value::Bool(b) => SchemaModel::Bool(*b),
            _ => SchemaModel::Object(Arc::new(Keywords::parse(value, dialect))),
        }
    }

    pub(crate) fn as_object(&self) -> Option<&Keywords> {
        match self {
            SchemaModel::Object(keywords) => Some(keywords),
            SchemaModel::Bool(_) => None,
        }
    }
}

/// `items` after 04/06/07/2019-09 normalization: always "the schema applied past the
/// prefix", regardless of whether that prefix came from `prefixItems` (2020-12) or a
/// positional `items` array paired with `additionalItems` (older drafts).
#[derive(Debug, Clone)]
pub enum ItemsTail {
    Schema(SchemaModel),
    False,
}

/// All keywords this engine recognizes, parsed from a schema object. Fields absent from
/// the source document are `None`; unrecognized keywords are silently dropped (forward
/// compatible, per spec's error-handling design).
#[derive(Debug, Default)]
pub struct Keywords {
    // References
    pub ref_: Option<String>,
    pub dynamic_ref: Option<String>,
    pub recursive_ref: Option<String>,
    pub recursive_anchor: bool,

    // Generic
    pub type_: Option<Vec<PrimitiveType>>,
    pub enum_: Option<Vec<Value>>,
    pub const_: Option<Value>,

    // Numeric
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
    pub exclusive_minimum: Option<f64>,
    pub exclusive_maximum: Option<f64>,
    pub multiple_of: Option<f64>,

    // String
    pub min_length: Option<u64>,
    pub max_length: Option<u64>,
    pub pattern: Option<Regex>,

    // Object
    pub properties: Option<Vec<(String, SchemaModel)>>,
    pub pattern_properties: Option<Vec<(Regex, SchemaModel)>>,
    pub additional_properties: Option<SchemaModel>,
    pub required: Option<Vec<String>>,
    pub min_properties: Option<u64>,
    pub max_properties: Option<u64>,
    pub property_names: Option<SchemaModel>,
    pub dependent_required: Option<Vec<(String, Vec<String>)>>,
    pub dependent_schemas: Option<Vec<(String, SchemaModel)>>,
    pub unevaluated_properties: Option<SchemaModel>,

    // Array
    pub prefix_items: Option<Vec<SchemaModel>>,
    pub items: Option<ItemsTail>,
    pub contains: Option<SchemaModel>,
    pub min_contains: Option<u64>,
    pub max_contains: Option<u64>,
    pub unevaluated_items: Option<SchemaModel>,
    pub unique_items: bool,
    pub min_items: Option<u64>,
    pub max_items: Option<u64>,

    // Applicators
    pub all_of: Option<Vec<SchemaModel>>,
    pub any_of: Option<Vec<SchemaModel>>,
    pub one_of: Option<Vec<SchemaModel>>,
    pub not: Option<SchemaModel>,
    pub if_: Option<SchemaModel>,
    pub then: Option<SchemaModel>,
    pub else_: Option<SchemaModel>,
}

impl Keywords {
    fn parse(value: &Value, dialect: Draft) -> Keywords {
        let Some(object) = value.as_object() else {
            return Keywords::default();
        };
        let mut k = Keywords {
            ref_: object.get("$ref").and_then(Value::as_str).map(String::from),
            recursive_anchor: object
                .get("$recursiveAnchor")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            type_: object.get("type").map(parse_type),
            enum_: object
                .get("enum")
                .and_then(Value::as_array)
                .map(|items| items.clone()),
            const_: object.get("const").cloned(),
            minimum: object.get("minimum").and_then(Value::as_f64),
            maximum: object.get("maximum").and_then(Value::as_f64),
            multiple_of: object.get("multipleOf").and_then(Value::as_f64),
            min_length: object.get("minLength").and_then(Value::as_u64),
            max_length: object.get("maxLength").and_then(Value::as_u64),
            pattern: object
                .get("pattern")
                .and_then(Value::as_str)
                .and_then(compile_pattern),
            required: object.get("required").and_then(parse_string_list),
            min_properties: object.get("minProperties").and_then(Value::as_u64),
            max_properties: object.get("maxProperties").and_then(Value::as_u64),
            property_names: object
                .get("propertyNames")
                .map(|v| SchemaModel::parse(v, dialect)),
            properties: object.get("properties").and_then(Value::as_object).map(|m| {
                m.iter()
                    .map(|(k, v)| (k.clone(), SchemaModel::parse(v, dialect)))
                    .collect()
            }),
            pattern_properties: object
                .get("patternProperties")
                .and_then(Value::as_object)
                .map(|m| {
                    m.iter()
                        .filter_map(|(k, v)| {
                            compile_pattern(k).map(|re| (re, SchemaModel::parse(v, dialect)))
                        })
                        .collect()
                }),
            additional_properties: object
                .get("additionalProperties")
                .map(|v| SchemaModel::parse(v, dialect)),
            unevaluated_properties: object
                .get("unevaluatedProperties")
                .map(|v| SchemaModel::parse(v, dialect)),
            contains: object.get("contains").map(|v| SchemaModel::parse(v, dialect)),
            min_contains: object.get("minContains").and_then(Value::as_u64),
            max_contains: object.get("maxContains").and_then(Value::as_u64),
            unevaluated_items: object
                .get("unevaluatedItems")
                .map(|v| SchemaModel::parse(v, dialect)),
            unique_items: object
                .get("uniqueItems")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            min_items: object.get("minItems").and_then(Value::as_u64),
            max_items: object.get("maxItems").and_then(Value::as_u64),
            all_of: object
                .get("allOf")
                .and_then(Value::as_array)
                .map(|items| items.iter().map(|v| SchemaModel::parse(v, dialect)).collect()),
            any_of: object
                .get("anyOf")
                .and_then(Value::as_array)
                .map(|items| items.iter().map(|v| SchemaModel::parse(v, dialect)).collect()),
            one_of: object
                .get("oneOf")
                .and_then(Value::as_array)
                .map(|items| items.iter().map(|v| SchemaModel::parse(v, dialect)).collect()),
            not: object.get("not").map(|v| SchemaModel::parse(v, dialect)),
            if_: object.get("if").map(|v| SchemaModel::parse(v, dialect)),
            then: object.get("then").map(|v| SchemaModel::parse(v, dialect)),
            else_: object.get("else").map(|v| SchemaModel::parse(v, dialect)),
            ..Keywords::default()
        };

        // `$dynamicRef`/`$recursiveRef` are dialect-gated; 2020-12 never has `$recursiveRef`
        // and pre-2020-12 drafts never have `$dynamicRef`/`$dynamicAnchor`.
        if dialect == Draft::Draft202012 {
            k.dynamic_ref = object
                .get("$dynamicRef")
                .and_then(Value::as_str)
                .map(String::from);
            k.prefix_items = object
                .get("prefixItems")
                .and_then(Value::as_array)
                .map(|items| items.iter().map(|v| SchemaModel::parse(v, dialect)).collect());
            k.items = object.get("items").map(|v| parse_items_tail(v, dialect));
        } else {
            if dialect >= Draft::Draft201909 {
                k.recursive_ref = object
                    .get("$recursiveRef")
                    .and_then(Value::as_str)
                    .map(String::from);
            }
            // Positional `items` + `additionalItems` normalizes to `prefixItems` + `items`.
            match object.get("items") {
                Some(Value::Array(items)) => {
                    k.prefix_items =
                        Some(items.iter().map(|v| SchemaModel::parse(v, dialect)).collect());
                    k.items = object
                        .get("additionalItems")
                        .map(|v| parse_items_tail(v, dialect));
                }
                Some(v) => {
                    k.items = Some(parse_items_tail(v, dialect));
                }
                None => {}
            }
        }

        if dialect >= Draft::Draft201909 {
            k.dependent_required = object.get("dependentRequired").and_then(Value::as_object).map(
                |m| {
                    m.iter()
                        .filter_map(|(key, v)| parse_string_list(v).map(|names| (key.clone(), names)))
                        .collect()
                },
            );
            k.dependent_schemas = object.get("dependentSchemas").and_then(Value::as_object).map(
                |m| {
                    m.iter()
                        .map(|(key, v)| (key.clone(), SchemaModel::parse(v, dialect)))
                        .collect()
                },
            );
        }

        // draft-04/07 `dependencies` splits by value shape into the 2019-09+ keywords.
        if let Some(deps) = object.get("dependencies").and_then(Value::as_object) {
            let mut required = k.dependent_required.take().unwrap_or_default();
            let mut schemas = k.dependent_schemas.take().unwrap_or_default();
            for (key, v) in deps {
                if let Some(names) = parse_string_list(v) {
                    required.push((key.clone(), names));
                } else {
                    schemas.push((key.clone(), SchemaModel::parse(v, dialect)));
                }
            }
            k.dependent_required = (!required.is_empty()).then_some(required);
            k.dependent_schemas = (!schemas.is_empty()).then_some(schemas);
        }

        if dialect == Draft::Draft4 {
            // Booleans modifying the companion bound, rather than standalone numeric bounds.
            let exclusive_min = object.get("exclusiveMinimum").and_then(Value::as_bool);
            let exclusive_max = object.get("exclusiveMaximum").and_then(Value::as_bool);
            if exclusive_min == Some(true) {
                k.exclusive_minimum = k.minimum.take();
            }
            if exclusive_max == Some(true) {
                k.exclusive_maximum = k.maximum.take();
            }
        } else {
            k.exclusive_minimum = object.get("exclusiveMinimum").and_then(Value::as_f64);
            k.exclusive_maximum = object.get("exclusiveMaximum").and_then(Value::as_f64);
        }

        k
    }
}

fn parse_items_tail(value: &Value, dialect: Draft) -> ItemsTail {
    match value {
        Value::Bool(false) => ItemsTail::False,
        other => ItemsTail::Schema(SchemaModel::parse(other, dialect)),
    }
}

fn parse_type(value: &Value) -> Vec<PrimitiveType> {
    match value {
        Value::String(s) => PrimitiveType::try_from(s.as_str()).into_iter().collect(),
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .filter_map(|s| PrimitiveType::try_from(s).ok())
            .collect(),
        _ => Vec::new(),
    }
}

fn parse_string_list(value: &Value) -> Option<Vec<String>> {
    value.as_array().map(|items| {
        items
            .iter()
            .filter_map(Value::as_str)
            .map(String::from)
            .collect()
    })
}

/// Compiles `pattern` against the translated ECMA 262 source (see `ecma.rs`'s doc comment
/// on lookaround/backreference handling). Uses `fancy_regex` rather than `regex` because
/// `ecma::to_rust_regex` intentionally leaves lookaround/backreference constructs
/// untranslated when it can't rewrite them away — only a backtracking engine can still run
/// those.
fn compile_pattern(pattern: &str) -> Option<Regex> {
    let translated = ecma::to_rust_regex(pattern).ok()?;
    Regex::new(&translated).ok()
}
