//! # Value Normalization
//!
//! After a value passes validation, properties its shape does not declare
//! are removed, recursively through nested objects, `$ref`s, `allOf`
//! members and array items. Declared values are left untouched.
//!
//! An object schema keeps its undeclared properties when it sets
//! `additionalProperties` to anything other than `false`, or declares
//! `patternProperties`: those extras are part of the shape.

use serde_json::{Map, Value};

use crate::validate::SchemaValidator;

/// Bound on consecutive `$ref`/`allOf` resolutions that do not descend
/// into the instance. Reset whenever a property or array item is entered;
/// instance nesting itself is bounded by the input.
const MAX_REF_DEPTH: usize = 32;

/// Strip undeclared properties from `value` according to `schema`.
///
/// `root` is the document `schema` lives in, used for local `#/...` refs.
pub fn strip_unknown(shapes: &SchemaValidator, root: &Value, schema: &Value, value: Value) -> Value {
    match value {
        Value::Object(map) => strip_object(shapes, root, schema, map),
        Value::Array(items) => {
            let Some((items_root, items_schema)) = item_schema(shapes, root, schema, 0) else {
                return Value::Array(items);
            };
            Value::Array(
                items
                    .into_iter()
                    .map(|item| strip_unknown(shapes, items_root, items_schema, item))
                    .collect(),
            )
        }
        other => other,
    }
}

/// Properties declared by a schema, together with the document each
/// property schema lives in.
struct Declared<'a> {
    properties: Vec<(&'a str, &'a Value, &'a Value)>,
    open: bool,
}

fn collect_declared<'a>(
    shapes: &'a SchemaValidator,
    root: &'a Value,
    schema: &'a Value,
    depth: usize,
    out: &mut Declared<'a>,
) {
    if depth > MAX_REF_DEPTH {
        out.open = true;
        return;
    }

    if let Some(props) = schema.get("properties").and_then(Value::as_object) {
        for (name, prop_schema) in props {
            out.properties.push((name.as_str(), root, prop_schema));
        }
    }

    match schema.get("additionalProperties") {
        None | Some(Value::Bool(false)) => {}
        Some(_) => out.open = true,
    }
    if schema.get("patternProperties").is_some() {
        out.open = true;
    }

    if let Some(reference) = schema.get("$ref").and_then(Value::as_str) {
        match shapes.resolve_ref(root, reference) {
            Some((doc, target)) => collect_declared(shapes, doc, target, depth + 1, out),
            None => out.open = true,
        }
    }

    if let Some(members) = schema.get("allOf").and_then(Value::as_array) {
        for member in members {
            collect_declared(shapes, root, member, depth + 1, out);
        }
    }

    // Unions are not narrowed; a branch may legitimately own any key.
    if schema.get("anyOf").is_some() || schema.get("oneOf").is_some() {
        out.open = true;
    }
}

fn strip_object(
    shapes: &SchemaValidator,
    root: &Value,
    schema: &Value,
    map: Map<String, Value>,
) -> Value {
    let mut declared = Declared {
        properties: Vec::new(),
        open: false,
    };
    collect_declared(shapes, root, schema, 0, &mut declared);

    if declared.properties.is_empty() && !has_object_keywords(schema) {
        // Nothing known about this object beyond its type.
        declared.open = true;
    }

    let mut out = Map::new();
    for (name, value) in map {
        let matching = declared
            .properties
            .iter()
            .find(|(prop, _, _)| *prop == name.as_str());
        match matching {
            Some((_, prop_root, prop_schema)) => {
                let stripped = strip_unknown(shapes, prop_root, prop_schema, value);
                out.insert(name, stripped);
            }
            None if declared.open => {
                out.insert(name, value);
            }
            None => {}
        }
    }
    Value::Object(out)
}

fn has_object_keywords(schema: &Value) -> bool {
    ["properties", "$ref", "allOf", "additionalProperties"]
        .iter()
        .any(|k| schema.get(*k).is_some())
}

fn item_schema<'a>(
    shapes: &'a SchemaValidator,
    root: &'a Value,
    schema: &'a Value,
    depth: usize,
) -> Option<(&'a Value, &'a Value)> {
    if depth > MAX_REF_DEPTH {
        return None;
    }
    if let Some(items) = schema.get("items").filter(|i| i.is_object()) {
        return Some((root, items));
    }
    let reference = schema.get("$ref").and_then(Value::as_str)?;
    let (doc, target) = shapes.resolve_ref(root, reference)?;
    item_schema(shapes, doc, target, depth + 1)
}
