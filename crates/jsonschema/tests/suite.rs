use jsonschema::{options, Engine};
use referencing::Resource;
use serde_json::json;

/// `$dynamicRef` tree extension: `tree.json` declares `$dynamicAnchor: "node"` and recurses
/// into its children via `$dynamicRef: "#node"`; `strict.json` re-declares the same
/// `$dynamicAnchor` and tightens `tree.json` with `required: ["meta"]` and
/// `unevaluatedProperties: false`. Evaluating an instance rooted at `strict.json` must have
/// the recursive `$dynamicRef` inside `tree.json` redirect back to `strict.json`'s own
/// schema at every depth, not just the root.
#[test]
fn dynamic_ref_tree_extension() {
    let tree = json!({
        "$id": "https://example.com/tree.json",
        "$dynamicAnchor": "node",
        "required": ["value"],
        "properties": {
            "value": {},
            "children": {
                "type": "array",
                "items": {"$dynamicRef": "#node"}
            }
        }
    });
    let strict = json!({
        "$id": "https://example.com/strict.json",
        "$dynamicAnchor": "node",
        "allOf": [{"$ref": "tree.json"}],
        "required": ["meta"],
        "unevaluatedProperties": false
    });

    let validator = options()
        .with_resource(
            "https://example.com/tree.json",
            Resource::from_contents(tree).expect("valid resource"),
        )
        .build(&strict)
        .expect("should load");

    let instance = json!({"value": 1, "meta": "root", "children": [{"value": 2}]});
    let errors = validator.validate(&instance);
    assert_eq!(errors.len(), 1, "errors: {errors:?}");
    assert!(
        errors[0].message.contains("meta"),
        "expected a missing-`meta` diagnostic on the child, got: {}",
        errors[0].message
    );
}

/// Validation is deterministic: running the same validator against the same instance twice
/// yields the same diagnostics.
#[test]
fn validation_is_deterministic() {
    let schema = json!({
        "allOf": [{"properties": {"a": {"type": "string"}}}, {"properties": {"b": {"type": "number"}}}],
        "unevaluatedProperties": false
    });
    let validator = options().build(&schema).unwrap();
    let instance = json!({"a": 1, "b": "x", "c": true});

    let first: Vec<_> = validator.validate(&instance).into_iter().map(|d| d.message).collect();
    let second: Vec<_> = validator.validate(&instance).into_iter().map(|d| d.message).collect();
    assert_eq!(first, second);
}

/// `allOf` is the union of its branches' diagnostics: each branch's own failure is reported
/// independently of the others.
#[test]
fn all_of_unions_diagnostics() {
    let schema = json!({"allOf": [{"type": "string"}, {"maxLength": 2}]});
    let validator = options().build(&schema).unwrap();
    let errors = validator.validate(&json!(1));
    assert_eq!(errors.len(), 2, "errors: {errors:?}");
}

/// `allOf: [S]` succeeds exactly when `S` does, for both outcomes.
#[test]
fn all_of_single_branch_matches_inner_schema() {
    let inner = json!({"type": "string", "minLength": 2});
    let wrapped = json!({"allOf": [inner.clone()]});

    let inner_validator = options().build(&inner).unwrap();
    let wrapped_validator = options().build(&wrapped).unwrap();

    for instance in [json!("ok"), json!("a"), json!(1)] {
        assert_eq!(
            inner_validator.is_valid(&instance),
            wrapped_validator.is_valid(&instance),
            "mismatch for {instance:?}"
        );
    }
}

/// `anyOf` merges annotations from every succeeding branch, not just the first: here the
/// second branch's `properties` annotation must reach `unevaluatedProperties` even though the
/// first branch also succeeds.
#[test]
fn any_of_merges_annotations_from_all_succeeding_branches() {
    let schema = json!({
        "anyOf": [
            {"properties": {"a": {}}},
            {"properties": {"b": {}}}
        ],
        "unevaluatedProperties": false
    });
    let validator = options().build(&schema).unwrap();
    assert!(validator.is_valid(&json!({"a": 1, "b": 2})));
}

/// Re-registering the same schema under the same URI leaves subsequent validation outcomes
/// unchanged.
#[test]
fn reregistration_is_idempotent() {
    let schema = json!({"type": "string", "minLength": 2});
    let instance_ok = json!("ok");
    let instance_bad = json!("a");

    let mut engine = Engine::new(options());
    engine.register_schema("mem://schema", schema.clone()).unwrap();
    let before_ok = engine.validate("mem://schema", &instance_ok).unwrap();
    let before_bad = engine.validate("mem://schema", &instance_bad).unwrap();

    engine.register_schema("mem://schema", schema).unwrap();
    let after_ok = engine.validate("mem://schema", &instance_ok).unwrap();
    let after_bad = engine.validate("mem://schema", &instance_bad).unwrap();

    assert_eq!(before_ok.len(), after_ok.len());
    assert_eq!(
        before_bad.iter().map(|d| d.message.clone()).collect::<Vec<_>>(),
        after_bad.iter().map(|d| d.message.clone()).collect::<Vec<_>>()
    );
}

/// `contains`/`minContains`/`maxContains` succeed exactly when the count of matching items
/// falls in range, with no `contains`-family diagnostic otherwise.
#[test]
fn contains_bounds_accept_within_range() {
    let schema = json!({"contains": {"const": 1}, "minContains": 2, "maxContains": 3});
    let validator = options().build(&schema).unwrap();

    assert!(!validator.is_valid(&json!([1]))); // below minContains
    assert!(validator.is_valid(&json!([1, 1])));
    assert!(validator.is_valid(&json!([1, 1, 1])));
    assert!(!validator.is_valid(&json!([1, 1, 1, 1]))); // above maxContains
}
