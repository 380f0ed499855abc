//! The evaluation engine: a recursive procedure that checks an instance against a
//! [`SchemaModel`], producing diagnostics and an annotation-ledger delta at every step.
//!
//! Every keyword contributes independently (source-order in the schema document never
//! affects the outcome): the function below simply walks every recognized field of
//! [`Keywords`] unconditionally, in a fixed order, appending to the same `out` vector.
//! `$ref`/`$dynamicRef`/`$recursiveRef` are handled the same way as any other in-place
//! applicator, which is what gives "sibling keywords next to `$ref`" uniform support for
//! free, without a special case.
use std::collections::HashSet;

use referencing::{Draft, Registry};
use serde_json::Value;
use url::Url;

use crate::{
    annotations::AnnotationLedger,
    diagnostics::Diagnostic,
    instance::{InstanceModel, InstanceRef},
    schema::{ItemsTail, Keywords, SchemaModel},
    scope::{Scope, SeenSet},
};

/// A compiled schema, ready to validate any number of instances.
pub struct Validator {
    registry: Registry,
    base_uri: Url,
    dialect: Draft,
    root: SchemaModel,
}

impl Validator {
    pub(crate) fn new(registry: Registry, base_uri: Url, dialect: Draft, root: SchemaModel) -> Self {
        Validator {
            registry,
            base_uri,
            dialect,
            root,
        }
    }

    /// Validate `instance`, returning every diagnostic produced (empty iff valid).
    #[must_use]
    pub fn validate(&self, instance: &Value) -> Vec<Diagnostic> {
        let model = InstanceModel::from_value(instance);
        let resolver = self.registry.resolver(self.base_uri.clone());
        let scope = Scope::root(&self.registry, resolver, self.dialect);
        let mut seen = SeenSet::new();
        let mut out = Vec::new();
        validate_schema(&self.root, model.root(), &scope, &mut seen, &mut out);
        out
    }

    /// Shortcut for `self.validate(instance).is_empty()`.
    #[must_use]
    pub fn is_valid(&self, instance: &Value) -> bool {
        self.validate(instance).is_empty()
    }
}

/// Runs `schema` against `instance` in a scratch diagnostics buffer and reports whether it
/// succeeded (used by applicators that must know the outcome of a branch without reporting
/// its errors directly, or while deciding whether to merge its annotations).
fn eval_branch<'r>(
    schema: &SchemaModel,
    instance: InstanceRef,
    scope: &Scope<'r>,
    seen: &mut SeenSet,
    out: &mut Vec<Diagnostic>,
) -> (bool, AnnotationLedger) {
    let before = out.len();
    let ledger = validate_schema(schema, instance, scope, seen, out);
    (out.len() == before, ledger)
}

fn too_many_items(scope: &Scope, keyword: &'static str, limit: usize) -> Diagnostic {
    Diagnostic::error(
        scope.instance_path.clone(),
        scope.schema_path.clone_with(keyword),
        format!("Array has too many items according to schema. Expected {limit} or fewer."),
    )
}

fn is_multiple_of(value: f64, multiple: f64) -> bool {
    if multiple == 0.0 {
        return false;
    }
    let quotient = value / multiple;
    (quotient - quotient.round()).abs() < 1e-9
}

/// Structural equality treating numbers by mathematical value and objects/arrays without
/// regard to key order (key order is irrelevant for `serde_json::Map` equality already;
/// the only divergence from `PartialEq<Value>` is numeric cross-representation equality,
/// e.g. `1 == 1.0`).
fn deep_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(a, b)| deep_eq(a, b))
        }
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len() && x.iter().all(|(k, v)| y.get(k).is_some_and(|w| deep_eq(v, w)))
        }
        _ => a == b,
    }
}

/// Resolves and descends into a `$ref`/`$dynamicRef`/`$recursiveRef` target.
///
/// `$ref` and `$dynamicRef` both resolve via [`referencing::Resolver::lookup`]; the
/// dynamic-scope bookending for `$dynamicRef` lives entirely inside that call (see
/// `referencing::Anchor::resolve`), so there is no separate dynamic code path here. One
/// consequence inherited from that: a plain `$ref` whose fragment happens to name a
/// `$dynamicAnchor` also gets bookended, since `lookup` cannot see which keyword the
/// caller used. Documented as an accepted limitation in DESIGN.md.
fn resolve_ref<'r>(
    keyword: &'static str,
    reference: &str,
    lookup_result: Result<referencing::Resolved<'r>, referencing::Error>,
    instance: InstanceRef,
    scope: &Scope<'r>,
    seen: &mut SeenSet,
    out: &mut Vec<Diagnostic>,
) -> AnnotationLedger {
    let resolved = match lookup_result {
        Ok(resolved) => resolved,
        Err(_) => {
            out.push(Diagnostic::error(
                scope.instance_path.clone(),
                scope.schema_path.clone_with(keyword),
                format!("Problems loading reference {reference}"),
            ));
            return AnnotationLedger::new();
        }
    };

    let cycle_key = format!("{}#{reference}", scope.resolver.base_uri());
    if !seen.enter(&cycle_key, &scope.instance_path.to_string()) {
        return AnnotationLedger::new();
    }

    let (contents, resolver) = resolved.into_inner();
    let target_dialect = scope.dialect.detect(contents).unwrap_or(scope.dialect);
    let target = SchemaModel::parse(contents, target_dialect);
    let child_scope = Scope {
        resolver,
        dialect: target_dialect,
        instance_path: scope.instance_path.clone(),
        schema_path: scope.schema_path.clone_with(keyword),
    };
    validate_schema(&target, instance, &child_scope, seen, out)
}

/// Validates `instance` against `schema` at the given scope, writing every diagnostic
/// produced into `out` and returning the annotations this call contributed.
pub(crate) fn validate_schema<'r>(
    schema: &SchemaModel,
    instance: InstanceRef,
    scope: &Scope<'r>,
    seen: &mut SeenSet,
    out: &mut Vec<Diagnostic>,
) -> AnnotationLedger {
    let mut ledger = AnnotationLedger::new();

    let keywords: &Keywords = match schema {
        SchemaModel::Bool(true) => return ledger,
        SchemaModel::Bool(false) => {
            out.push(Diagnostic::error(
                scope.instance_path.clone(),
                scope.schema_path.clone(),
                "False schema always fails",
            ));
            return ledger;
        }
        SchemaModel::Object(keywords) => keywords,
    };

    // --- Generic -----------------------------------------------------------------
    if let Some(types) = &keywords.type_ {
        if !types.is_empty() && !types.iter().any(|t| instance.matches_type(*t)) {
            let joined = types
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" | ");
            out.push(Diagnostic::error(
                scope.instance_path.clone(),
                scope.schema_path.clone_with("type"),
                format!("Incorrect type. Expected {joined}"),
            ));
        }
    }
    if let Some(candidates) = &keywords.enum_ {
        let value = instance.to_value();
        if !candidates.iter().any(|c| deep_eq(c, &value)) {
            out.push(Diagnostic::error(
                scope.instance_path.clone(),
                scope.schema_path.clone_with("enum"),
                "Value does not match any allowed value",
            ));
        }
    }
    if let Some(expected) = &keywords.const_ {
        let value = instance.to_value();
        if !deep_eq(expected, &value) {
            out.push(Diagnostic::error(
                scope.instance_path.clone(),
                scope.schema_path.clone_with("const"),
                "Value does not match the expected constant",
            ));
        }
    }

    // --- Numeric -------------------------------------------------------------------
    if let Some(value) = instance.as_f64() {
        if let Some(min) = keywords.minimum {
            if value < min {
                out.push(Diagnostic::error(
                    scope.instance_path.clone(),
                    scope.schema_path.clone_with("minimum"),
                    format!("Value is less than the minimum of {min}"),
                ));
            }
        }
        if let Some(max) = keywords.maximum {
            if value > max {
                out.push(Diagnostic::error(
                    scope.instance_path.clone(),
                    scope.schema_path.clone_with("maximum"),
                    format!("Value is greater than the maximum of {max}"),
                ));
            }
        }
        if let Some(min) = keywords.exclusive_minimum {
            if value <= min {
                out.push(Diagnostic::error(
                    scope.instance_path.clone(),
                    scope.schema_path.clone_with("exclusiveMinimum"),
                    format!("Value is less than or equal to the exclusive minimum of {min}"),
                ));
            }
        }
        if let Some(max) = keywords.exclusive_maximum {
            if value >= max {
                out.push(Diagnostic::error(
                    scope.instance_path.clone(),
                    scope.schema_path.clone_with("exclusiveMaximum"),
                    format!("Value is greater than or equal to the exclusive maximum of {max}"),
                ));
            }
        }
        if let Some(multiple) = keywords.multiple_of {
            if !is_multiple_of(value, multiple) {
                out.push(Diagnostic::error(
                    scope.instance_path.clone(),
                    scope.schema_path.clone_with("multipleOf"),
                    format!("Value is not divisible by {multiple}."),
                ));
            }
        }
    }

    // --- String ----------------------------------------------------------------------
    if let Some(s) = instance.as_str() {
        let length = s.chars().count() as u64;
        if let Some(min) = keywords.min_length {
            if length < min {
                out.push(Diagnostic::error(
                    scope.instance_path.clone(),
                    scope.schema_path.clone_with("minLength"),
                    format!("String is shorter than {min} characters"),
                ));
            }
        }
        if let Some(max) = keywords.max_length {
            if length > max {
                out.push(Diagnostic::error(
                    scope.instance_path.clone(),
                    scope.schema_path.clone_with("maxLength"),
                    format!("String is longer than {max} characters"),
                ));
            }
        }
        if let Some(re) = &keywords.pattern {
            if !re.is_match(s).unwrap_or(false) {
                out.push(Diagnostic::error(
                    scope.instance_path.clone(),
                    scope.schema_path.clone_with("pattern"),
                    format!("String does not match pattern \"{}\"", re.as_str()),
                ));
            }
        }
    }

    // --- Object --------------------------------------------------------------------
    let mut matched_names: HashSet<String> = HashSet::new();

    if let Some(properties) = &keywords.properties {
        for (name, sub) in properties {
            if let Some(value) = instance.get_property(name) {
                matched_names.insert(name.clone());
                let child_scope = scope
                    .push_instance(name.clone())
                    .push_schema("properties")
                    .push_schema(name.clone());
                let (success, child_ledger) = eval_branch(sub, value, &child_scope, seen, out);
                if success {
                    ledger.mark_property(name);
                    ledger.merge(&child_ledger);
                }
            }
        }
    }
    if let Some(pattern_properties) = &keywords.pattern_properties {
        if let Some(props) = instance.object_properties() {
            for (name, value) in props {
                for (re, sub) in pattern_properties {
                    if re.is_match(name).unwrap_or(false) {
                        matched_names.insert(name.to_owned());
                        let child_scope = scope
                            .push_instance(name.to_owned())
                            .push_schema("patternProperties")
                            .push_schema(re.as_str().to_owned());
                        let (success, child_ledger) = eval_branch(sub, value, &child_scope, seen, out);
                        if success {
                            ledger.mark_property(name);
                            ledger.merge(&child_ledger);
                        }
                    }
                }
            }
        }
    }
    if let Some(additional) = &keywords.additional_properties {
        if let Some(props) = instance.object_properties() {
            for (name, value) in props {
                if matched_names.contains(name) {
                    continue;
                }
                match additional {
                    SchemaModel::Bool(false) => {
                        let prop_scope = scope.push_instance(name.to_owned());
                        out.push(Diagnostic::error(
                            prop_scope.instance_path.clone(),
                            scope.schema_path.clone_with("additionalProperties"),
                            format!("Property {name} is not allowed"),
                        ));
                    }
                    _ => {
                        let child_scope = scope
                            .push_instance(name.to_owned())
                            .push_schema("additionalProperties");
                        let (success, child_ledger) = eval_branch(additional, value, &child_scope, seen, out);
                        if success {
                            ledger.mark_property(name);
                            ledger.merge(&child_ledger);
                        }
                    }
                }
            }
        }
    }
    if let Some(required) = &keywords.required {
        for name in required {
            if instance.get_property(name).is_none() {
                out.push(Diagnostic::error(
                    scope.instance_path.clone(),
                    scope.schema_path.clone_with("required"),
                    format!("Missing property {name}"),
                ));
            }
        }
    }
    if let Some(min) = keywords.min_properties {
        if let Some(len) = instance.object_len() {
            if (len as u64) < min {
                out.push(Diagnostic::error(
                    scope.instance_path.clone(),
                    scope.schema_path.clone_with("minProperties"),
                    format!("Object has fewer than {min} properties"),
                ));
            }
        }
    }
    if let Some(max) = keywords.max_properties {
        if let Some(len) = instance.object_len() {
            if (len as u64) > max {
                out.push(Diagnostic::error(
                    scope.instance_path.clone(),
                    scope.schema_path.clone_with("maxProperties"),
                    format!("Object has more than {max} properties"),
                ));
            }
        }
    }
    if let Some(sub) = &keywords.property_names {
        if let Some(props) = instance.object_properties() {
            for (name, _) in props {
                let name_model = InstanceModel::from_value(&Value::String(name.to_owned()));
                let child_scope = scope.push_schema("propertyNames");
                // Does not mark the property evaluated: it is an independent concept
                // from whether the property's *value* was seen by some applicator.
                validate_schema(sub, name_model.root(), &child_scope, seen, out);
            }
        }
    }
    if let Some(dependent_required) = &keywords.dependent_required {
        for (trigger, names) in dependent_required {
            if instance.get_property(trigger).is_some() {
                for name in names {
                    if instance.get_property(name).is_none() {
                        out.push(Diagnostic::error(
                            scope.instance_path.clone(),
                            scope.schema_path.clone_with("dependentRequired"),
                            format!("Object is missing property {name} required by property {trigger}."),
                        ));
                    }
                }
            }
        }
    }
    if let Some(dependent_schemas) = &keywords.dependent_schemas {
        for (trigger, sub) in dependent_schemas {
            if instance.get_property(trigger).is_some() {
                let child_scope = scope.push_schema("dependentSchemas").push_schema(trigger.clone());
                let (success, child_ledger) = eval_branch(sub, instance, &child_scope, seen, out);
                if success {
                    ledger.merge(&child_ledger);
                }
            }
        }
    }

    // --- Array -----------------------------------------------------------------------
    if let Some(len) = instance.array_len() {
        if let Some(prefix_items) = &keywords.prefix_items {
            if let Some(mut items_iter) = instance.array_items() {
                for (idx, sub) in prefix_items.iter().enumerate() {
                    if idx >= len {
                        break;
                    }
                    if let Some(item) = items_iter.next() {
                        let child_scope = scope
                            .push_instance(idx)
                            .push_schema("prefixItems")
                            .push_schema(idx);
                        let (success, child_ledger) = eval_branch(sub, item, &child_scope, seen, out);
                        if success {
                            ledger.mark_index(idx);
                            ledger.merge(&child_ledger);
                        }
                    }
                }
                let tail_start = prefix_items.len().min(len);
                if let Some(tail) = &keywords.items {
                    match tail {
                        ItemsTail::False => {
                            if len > tail_start {
                                out.push(too_many_items(scope, "items", tail_start));
                            }
                        }
                        ItemsTail::Schema(sub) => {
                            for (offset, item) in items_iter.enumerate() {
                                let idx = tail_start + offset;
                                let child_scope = scope.push_instance(idx).push_schema("items");
                                let (success, child_ledger) = eval_branch(sub, item, &child_scope, seen, out);
                                if success {
                                    ledger.mark_index(idx);
                                    ledger.merge(&child_ledger);
                                }
                            }
                        }
                    }
                }
            }
        } else if let Some(tail) = &keywords.items {
            match tail {
                ItemsTail::False => {
                    if len > 0 {
                        out.push(too_many_items(scope, "items", 0));
                    }
                }
                ItemsTail::Schema(sub) => {
                    if let Some(items_iter) = instance.array_items() {
                        for (idx, item) in items_iter.enumerate() {
                            let child_scope = scope.push_instance(idx).push_schema("items");
                            let (success, child_ledger) = eval_branch(sub, item, &child_scope, seen, out);
                            if success {
                                ledger.mark_index(idx);
                                ledger.merge(&child_ledger);
                            }
                        }
                    }
                }
            }
        }

        if let Some(sub) = &keywords.contains {
            if let Some(items_iter) = instance.array_items() {
                let min_contains = keywords.min_contains.unwrap_or(1) as usize;
                let max_contains = keywords.max_contains.map(|v| v as usize).unwrap_or(usize::MAX);
                let mut matches = 0usize;
                for (idx, item) in items_iter.enumerate() {
                    let child_scope = scope.push_instance(idx).push_schema("contains");
                    let mut scratch = Vec::new();
                    validate_schema(sub, item, &child_scope, seen, &mut scratch);
                    if scratch.is_empty() {
                        matches += 1;
                        ledger.mark_index(idx);
                    }
                }
                if matches < min_contains {
                    out.push(Diagnostic::error(
                        scope.instance_path.clone(),
                        scope.schema_path.clone_with("contains"),
                        format!(
                            "Array has too few items matching \"contains\" schema. Expected {min_contains} or more."
                        ),
                    ));
                } else if matches > max_contains {
                    out.push(Diagnostic::error(
                        scope.instance_path.clone(),
                        scope.schema_path.clone_with("contains"),
                        format!(
                            "Array has too many items matching \"contains\" schema. Expected {max_contains} or fewer."
                        ),
                    ));
                }
            }
        }
        if keywords.unique_items {
            if let Some(items_iter) = instance.array_items() {
                let values: Vec<Value> = items_iter.map(|item| item.to_value()).collect();
                'outer: for i in 0..values.len() {
                    for j in (i + 1)..values.len() {
                        if deep_eq(&values[i], &values[j]) {
                            out.push(Diagnostic::error(
                                scope.instance_path.clone(),
                                scope.schema_path.clone_with("uniqueItems"),
                                format!("Array has non-unique items at positions {i} and {j}"),
                            ));
                            break 'outer;
                        }
                    }
                }
            }
        }
        if let Some(min) = keywords.min_items {
            if (len as u64) < min {
                out.push(Diagnostic::error(
                    scope.instance_path.clone(),
                    scope.schema_path.clone_with("minItems"),
                    format!("Array has fewer than {min} items"),
                ));
            }
        }
        if let Some(max) = keywords.max_items {
            if (len as u64) > max {
                out.push(Diagnostic::error(
                    scope.instance_path.clone(),
                    scope.schema_path.clone_with("maxItems"),
                    format!("Array has more than {max} items"),
                ));
            }
        }
    }

    // --- Applicators -----------------------------------------------------------------
    if let Some(all_of) = &keywords.all_of {
        for (idx, sub) in all_of.iter().enumerate() {
            let child_scope = scope.push_schema("allOf").push_schema(idx);
            let (success, child_ledger) = eval_branch(sub, instance, &child_scope, seen, out);
            if success {
                ledger.merge(&child_ledger);
            }
        }
    }
    if let Some(any_of) = &keywords.any_of {
        let mut any_success = false;
        for (idx, sub) in any_of.iter().enumerate() {
            let child_scope = scope.push_schema("anyOf").push_schema(idx);
            let mut scratch = Vec::new();
            let child_ledger = validate_schema(sub, instance, &child_scope, seen, &mut scratch);
            if scratch.is_empty() {
                any_success = true;
                ledger.merge(&child_ledger);
            }
        }
        if !any_success {
            out.push(Diagnostic::error(
                scope.instance_path.clone(),
                scope.schema_path.clone_with("anyOf"),
                "Value does not match any schema in anyOf",
            ));
        }
    }
    if let Some(one_of) = &keywords.one_of {
        let mut successes = Vec::new();
        for (idx, sub) in one_of.iter().enumerate() {
            let child_scope = scope.push_schema("oneOf").push_schema(idx);
            let mut scratch = Vec::new();
            let child_ledger = validate_schema(sub, instance, &child_scope, seen, &mut scratch);
            if scratch.is_empty() {
                successes.push(child_ledger);
            }
        }
        match successes.len() {
            0 => out.push(Diagnostic::error(
                scope.instance_path.clone(),
                scope.schema_path.clone_with("oneOf"),
                "Value is not valid under any schema in oneOf",
            )),
            1 => ledger.merge(&successes[0]),
            _ => out.push(Diagnostic::error(
                scope.instance_path.clone(),
                scope.schema_path.clone_with("oneOf"),
                "Value is valid under more than one schema in oneOf",
            )),
        }
    }
    if let Some(sub) = &keywords.not {
        let child_scope = scope.push_schema("not");
        let mut scratch = Vec::new();
        validate_schema(sub, instance, &child_scope, seen, &mut scratch);
        if scratch.is_empty() {
            out.push(Diagnostic::error(
                scope.instance_path.clone(),
                scope.schema_path.clone_with("not"),
                "Value must not be valid against the schema",
            ));
        }
    }
    if let Some(if_schema) = &keywords.if_ {
        let if_scope = scope.push_schema("if");
        let mut scratch = Vec::new();
        let if_ledger = validate_schema(if_schema, instance, &if_scope, seen, &mut scratch);
        if scratch.is_empty() {
            ledger.merge(&if_ledger);
            if let Some(then_schema) = &keywords.then {
                let then_scope = scope.push_schema("then");
                let (success, then_ledger) = eval_branch(then_schema, instance, &then_scope, seen, out);
                if success {
                    ledger.merge(&then_ledger);
                }
            }
        } else if let Some(else_schema) = &keywords.else_ {
            let else_scope = scope.push_schema("else");
            let (success, else_ledger) = eval_branch(else_schema, instance, &else_scope, seen, out);
            if success {
                ledger.merge(&else_ledger);
            }
        }
    }

    // --- References --------------------------------------------------------------------
    if let Some(reference) = &keywords.ref_ {
        let lookup_result = scope.resolver.lookup(reference);
        let child_ledger = resolve_ref("$ref", reference, lookup_result, instance, scope, seen, out);
        ledger.merge(&child_ledger);
    }
    if let Some(reference) = &keywords.dynamic_ref {
        let lookup_result = scope.resolver.lookup(reference);
        let child_ledger = resolve_ref("$dynamicRef", reference, lookup_result, instance, scope, seen, out);
        ledger.merge(&child_ledger);
    }
    if keywords.recursive_ref.is_some() {
        let lookup_result = scope.resolver.lookup_recursive_ref();
        let child_ledger = resolve_ref("$recursiveRef", "#", lookup_result, instance, scope, seen, out);
        ledger.merge(&child_ledger);
    }

    // --- Unevaluated, last -------------------------------------------------------------
    if let Some(sub) = &keywords.unevaluated_properties {
        if let Some(props) = instance.object_properties() {
            for (name, value) in props {
                if ledger.is_property_evaluated(name) {
                    continue;
                }
                match sub {
                    SchemaModel::Bool(false) => {
                        let prop_scope = scope.push_instance(name.to_owned());
                        out.push(Diagnostic::error(
                            prop_scope.instance_path.clone(),
                            scope.schema_path.clone_with("unevaluatedProperties"),
                            format!("Property {name} is not allowed"),
                        ));
                    }
                    _ => {
                        let child_scope = scope
                            .push_instance(name.to_owned())
                            .push_schema("unevaluatedProperties");
                        let (success, _) = eval_branch(sub, value, &child_scope, seen, out);
                        if success {
                            ledger.mark_property(name);
                        }
                    }
                }
            }
        }
    }
    if let Some(sub) = &keywords.unevaluated_items {
        if let Some(len) = instance.array_len() {
            if let Some(items_iter) = instance.array_items() {
                let start = ledger.first_unevaluated_index();
                match sub {
                    SchemaModel::Bool(false) => {
                        if len > start {
                            out.push(too_many_items(scope, "unevaluatedItems", start));
                        }
                    }
                    _ => {
                        for (idx, item) in items_iter.enumerate().skip(start) {
                            if ledger.is_index_evaluated(idx) {
                                continue;
                            }
                            let child_scope = scope.push_instance(idx).push_schema("unevaluatedItems");
                            let (success, _) = eval_branch(sub, item, &child_scope, seen, out);
                            if success {
                                ledger.mark_index(idx);
                            }
                        }
                    }
                }
            }
        }
    }

    ledger
}

#[cfg(test)]
mod tests {
    use crate::options::options;
    use serde_json::json;

    #[test]
    fn closed_tuple() {
        let schema = json!({"prefixItems": [{"type": "string"}, {"type": "number"}], "items": false});
        let validator = options().build(&schema).unwrap();
        let errors = validator.validate(&json!(["hello", 123, "extra"]));
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0].message,
            "Array has too many items according to schema. Expected 2 or fewer."
        );
        assert!(validator.is_valid(&json!(["hello", 123])));
    }

    #[test]
    fn unevaluated_properties_with_all_of() {
        let schema = json!({
            "allOf": [
                {"properties": {"a": {"type": "string"}}},
                {"properties": {"b": {"type": "number"}}}
            ],
            "unevaluatedProperties": false
        });
        let validator = options().build(&schema).unwrap();
        let errors = validator.validate(&json!({"a": "ok", "b": 1, "c": 2}));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "Property c is not allowed");
    }

    #[test]
    fn contains_bounds() {
        let schema = json!({"contains": {"const": 1}, "minContains": 2, "maxContains": 3});
        let validator = options().build(&schema).unwrap();
        let errors = validator.validate(&json!([1, 2, 1, 1, 1]));
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0].message,
            "Array has too many items matching \"contains\" schema. Expected 3 or fewer."
        );
        assert!(validator.is_valid(&json!([1, 1])));
    }

    #[test]
    fn unevaluated_items_with_non_contiguous_contains() {
        // `contains` only marks index 2 evaluated; indices 0 and 1 stay unevaluated even
        // though 2 comes after them, so `unevaluatedItems: false` must still reject.
        let schema = json!({"contains": {"const": "x"}, "unevaluatedItems": false});
        let validator = options().build(&schema).unwrap();
        let errors = validator.validate(&json!(["a", "b", "x"]));
        assert_eq!(errors.len(), 1, "errors: {errors:?}");

        assert!(validator.is_valid(&json!(["x"])));
    }

    #[test]
    fn dependent_required() {
        let schema = json!({"dependentRequired": {"billing_address": ["credit_card"]}});
        let validator = options().build(&schema).unwrap();
        let errors = validator.validate(&json!({"billing_address": "X"}));
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0].message,
            "Object is missing property credit_card required by property billing_address."
        );
    }

    #[test]
    fn ref_with_siblings() {
        let schema = json!({
            "$ref": "#/$defs/A",
            "type": "number",
            "$defs": {"A": {"type": "string"}}
        });
        let validator = options().build(&schema).unwrap();
        assert!(!validator.validate(&json!("hello")).is_empty());
        assert!(!validator.validate(&json!(1)).is_empty());
    }
}
