//! # Type-Declaration Codegen
//!
//! Derives TypeScript type aliases from endpoint shapes so that callers in
//! other languages get the same structure the runtime validator enforces.
//!
//! ## Output Format
//!
//! One alias per endpoint, named by the key's accessor form:
//!
//! ```text
//! /** 创建无弹窗POI */
//! type POI_Add = {
//!     /** 标识 */
//!     Tags: string[];
//!     ...
//! };
//! ```
//!
//! - `$ref`s are inlined; no named helper types are emitted.
//! - Properties appear in the shape's `required` order, followed by the
//!   optional ones in sorted order with `?:`.
//! - A `description` on a property becomes a `/** ... */` line above it.
//! - Aliases are joined by a blank line in endpoint declaration order.
//!
//! Output depends only on the registry contents, so regenerating from an
//! unchanged registry is byte-identical.

use std::path::Path;

use serde_json::Value;

use crate::registry::{Endpoint, ShapeRegistry};
use crate::validate::SchemaValidator;

const INDENT: &str = "    ";

/// Nesting bound for inlined types; a self-referencing shape renders as
/// `unknown` past this depth.
const MAX_INLINE_DEPTH: usize = 32;

/// Error writing or reading back the generated artifact.
#[derive(thiserror::Error, Debug)]
pub enum CodegenError {
    /// Creating the output directory failed.
    #[error("cannot create output directory '{path}': {source}")]
    CreateDir {
        /// Directory that could not be created.
        path: String,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Writing or reading the artifact failed.
    #[error("cannot access artifact '{path}': {source}")]
    Artifact {
        /// Artifact path.
        path: String,
        /// Underlying IO error.
        source: std::io::Error,
    },
}

/// Render the `type <Accessor> = { ... };` alias for one endpoint.
pub fn type_alias(registry: &ShapeRegistry, endpoint: &Endpoint) -> String {
    let name = endpoint.key().accessor_name();
    let mut out = String::new();

    let Some(root) = registry.shape(endpoint.shape_name()) else {
        out.push_str(&format!("type {name} = unknown;"));
        return out;
    };

    if let Some(description) = root.get("description").and_then(Value::as_str) {
        push_doc_comment(&mut out, description, 0);
    }
    let body = Emitter {
        shapes: registry.shapes(),
    }
    .ts_type(root, root, 0, 0);
    out.push_str(&format!("type {name} = {body};"));
    out
}

/// Render every endpoint's alias, joined by blank lines.
pub fn render_declarations(registry: &ShapeRegistry) -> String {
    registry
        .endpoints()
        .map(|endpoint| type_alias(registry, endpoint))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Write the declarations to `path`, creating its directory if missing,
/// then read the file back and return its contents.
///
/// # Errors
///
/// Returns [`CodegenError`] if the directory cannot be created or the file
/// cannot be written or read.
pub async fn write_declarations(
    registry: &ShapeRegistry,
    path: &Path,
) -> Result<String, CodegenError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if tokio::fs::metadata(parent).await.is_err() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| CodegenError::CreateDir {
                    path: parent.display().to_string(),
                    source,
                })?;
            tracing::debug!(dir = %parent.display(), "created output directory");
        }
    }

    let artifact_error = |source| CodegenError::Artifact {
        path: path.display().to_string(),
        source,
    };

    let rendered = render_declarations(registry);
    tokio::fs::write(path, rendered.as_bytes())
        .await
        .map_err(artifact_error)?;
    tracing::info!(
        path = %path.display(),
        aliases = registry.len(),
        bytes = rendered.len(),
        "wrote type declarations"
    );

    tokio::fs::read_to_string(path).await.map_err(artifact_error)
}

struct Emitter<'a> {
    shapes: &'a SchemaValidator,
}

impl<'a> Emitter<'a> {
    /// TypeScript type for `schema`, whose enclosing document is `root`.
    /// `level` is the indentation level of the line the type starts on.
    fn ts_type(&self, root: &'a Value, schema: &'a Value, level: usize, depth: usize) -> String {
        if depth > MAX_INLINE_DEPTH {
            return "unknown".to_string();
        }

        let schema = match schema {
            Value::Bool(true) => return "unknown".to_string(),
            Value::Bool(false) => return "never".to_string(),
            Value::Object(_) => schema,
            _ => return "unknown".to_string(),
        };

        if let Some(reference) = schema.get("$ref").and_then(Value::as_str) {
            return match self.shapes.resolve_ref(root, reference) {
                Some((doc, target)) => self.ts_type(doc, target, level, depth + 1),
                None => "unknown".to_string(),
            };
        }

        if let Some(constant) = schema.get("const") {
            return constant.to_string();
        }

        if let Some(variants) = schema.get("enum").and_then(Value::as_array) {
            return union(variants.iter().map(Value::to_string).collect());
        }

        for combinator in ["anyOf", "oneOf"] {
            if let Some(members) = schema.get(combinator).and_then(Value::as_array) {
                return union(
                    members
                        .iter()
                        .map(|m| self.ts_type(root, m, level, depth + 1))
                        .collect(),
                );
            }
        }

        if let Some(members) = schema.get("allOf").and_then(Value::as_array) {
            let parts: Vec<String> = members
                .iter()
                .map(|m| self.ts_type(root, m, level, depth + 1))
                .collect();
            return match parts.len() {
                0 => "unknown".to_string(),
                1 => parts.into_iter().next().unwrap_or_default(),
                _ => parts.join(" & "),
            };
        }

        match schema.get("type") {
            Some(Value::String(ty)) => self.ts_for_type_name(root, schema, ty, level, depth),
            Some(Value::Array(types)) => union(
                types
                    .iter()
                    .filter_map(Value::as_str)
                    .map(|ty| self.ts_for_type_name(root, schema, ty, level, depth))
                    .collect(),
            ),
            _ if schema.get("properties").is_some() => self.ts_object(root, schema, level, depth),
            _ => "unknown".to_string(),
        }
    }

    fn ts_for_type_name(
        &self,
        root: &'a Value,
        schema: &'a Value,
        ty: &str,
        level: usize,
        depth: usize,
    ) -> String {
        match ty {
            "string" => "string".to_string(),
            "number" | "integer" => "number".to_string(),
            "boolean" => "boolean".to_string(),
            "null" => "null".to_string(),
            "array" => {
                let item = match schema.get("items") {
                    Some(items) => self.ts_type(root, items, level, depth + 1),
                    None => "unknown".to_string(),
                };
                if item.contains(" | ") || item.contains(" & ") {
                    format!("({item})[]")
                } else {
                    format!("{item}[]")
                }
            }
            "object" => self.ts_object(root, schema, level, depth),
            _ => "unknown".to_string(),
        }
    }

    fn ts_object(&self, root: &'a Value, schema: &'a Value, level: usize, depth: usize) -> String {
        let props = schema.get("properties").and_then(Value::as_object);
        let Some(props) = props.filter(|p| !p.is_empty()) else {
            return match schema.get("additionalProperties") {
                Some(Value::Bool(false)) => "{}".to_string(),
                Some(extra @ Value::Object(_)) => {
                    let value = self.ts_type(root, extra, level, depth + 1);
                    format!("Record<string, {value}>")
                }
                _ => "Record<string, unknown>".to_string(),
            };
        };

        let required: Vec<&str> = schema
            .get("required")
            .and_then(Value::as_array)
            .map(|r| r.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default();

        let mut ordered: Vec<(&str, bool)> = required
            .iter()
            .filter(|name| props.contains_key(**name))
            .map(|name| (*name, true))
            .collect();
        let mut optional: Vec<&str> = props
            .keys()
            .map(String::as_str)
            .filter(|name| !required.contains(name))
            .collect();
        optional.sort_unstable();
        ordered.extend(optional.into_iter().map(|name| (name, false)));

        let mut out = String::from("{\n");
        for (name, is_required) in ordered {
            let Some(prop_schema) = props.get(name) else {
                continue;
            };
            if let Some(description) = self.description(root, prop_schema) {
                push_doc_comment(&mut out, description, level + 1);
            }
            let ty = self.ts_type(root, prop_schema, level + 1, depth + 1);
            let marker = if is_required { "" } else { "?" };
            out.push_str(&format!(
                "{}{}{marker}: {ty};\n",
                INDENT.repeat(level + 1),
                property_name(name)
            ));
        }
        out.push_str(&INDENT.repeat(level));
        out.push('}');
        out
    }

    /// A property's own description, or that of the shape it references.
    fn description(&self, root: &'a Value, schema: &'a Value) -> Option<&'a str> {
        if let Some(description) = schema.get("description").and_then(Value::as_str) {
            return Some(description);
        }
        let reference = schema.get("$ref").and_then(Value::as_str)?;
        let (_, target) = self.shapes.resolve_ref(root, reference)?;
        target.get("description").and_then(Value::as_str)
    }
}

fn union(mut parts: Vec<String>) -> String {
    parts.dedup();
    match parts.len() {
        0 => "never".to_string(),
        _ => parts.join(" | "),
    }
}

fn push_doc_comment(out: &mut String, text: &str, level: usize) {
    let indent = INDENT.repeat(level);
    let text = text.replace("*/", "*\\/");
    let lines: Vec<&str> = text.lines().collect();
    if lines.len() <= 1 {
        out.push_str(&format!("{indent}/** {} */\n", text.trim()));
        return;
    }
    out.push_str(&format!("{indent}/**\n"));
    for line in lines {
        out.push_str(&format!("{indent} * {}\n", line.trim_end()));
    }
    out.push_str(&format!("{indent} */\n"));
}

/// Quote a property name unless it is a plain identifier.
fn property_name(name: &str) -> String {
    let mut chars = name.chars();
    let is_identifier = match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' || first == '$' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
        }
        _ => false,
    };
    if is_identifier {
        name.to_string()
    } else {
        Value::String(name.to_string()).to_string()
    }
}
