//! # Schema Validation
//!
//! Runtime validation of JSON values against shape documents
//! (JSON Schema Draft 2020-12).
//!
//! ## Schema Resolution
//!
//! Shapes use `$id` URIs of the form
//! `https://schemas.uecall.dev/shapes/<filename>` and reference each other
//! by relative filename (`"$ref": "vector.schema.json"`). A local retriever
//! maps those URIs back to the loaded documents so compilation never
//! touches the network.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use jsonschema::{Retrieve, Uri, ValidationOptions, Validator};
use serde_json::Value;
use thiserror::Error;

/// URI prefix of every shape `$id`.
pub const SHAPE_URI_PREFIX: &str = "https://schemas.uecall.dev/shapes/";

/// Metaschema host; references here are served by the validator itself.
const METASCHEMA_HOST: &str = "https://json-schema.org/";

/// Resolves `$ref` URIs to shapes held in memory.
struct LocalShapeRetriever {
    shapes_by_uri: HashMap<String, Value>,
}

impl Retrieve for LocalShapeRetriever {
    fn retrieve(
        &self,
        uri: &Uri<&str>,
    ) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        let uri_str = uri.as_str();

        if let Some(value) = self.shapes_by_uri.get(uri_str) {
            return Ok(value.clone());
        }

        let filename = uri_str.rsplit('/').next().unwrap_or(uri_str);
        if let Some(value) = self.shapes_by_uri.get(filename) {
            return Ok(value.clone());
        }

        if uri_str.starts_with(METASCHEMA_HOST) {
            return Ok(serde_json::json!({}));
        }

        Err(format!("unresolved shape reference '{uri_str}'").into())
    }
}

/// Error during shape loading or validation.
#[derive(Error, Debug)]
pub enum SchemaValidationError {
    /// The value did not conform to the shape.
    #[error("validation failed against shape '{schema_name}':\n{violations}")]
    ValidationFailed {
        /// Name of the shape that was validated against.
        schema_name: String,
        /// Structured list of individual violations.
        violations: ValidationViolations,
    },

    /// A shape document could not be loaded or found.
    #[error("schema load error for '{schema_name}': {reason}")]
    SchemaLoadError {
        /// Shape filename or identifier.
        schema_name: String,
        /// Reason the shape could not be loaded.
        reason: String,
    },

    /// A payload document could not be loaded or parsed.
    #[error("document load error for '{path}': {reason}")]
    DocumentLoadError {
        /// Path to the document that failed to load.
        path: String,
        /// Reason the document could not be loaded.
        reason: String,
    },

    /// The compiled validator could not be built (e.g., invalid schema).
    #[error("validator build error for schema '{schema_name}': {reason}")]
    ValidatorBuildError {
        /// Shape filename or identifier.
        schema_name: String,
        /// Reason the validator could not be built.
        reason: String,
    },

    /// The process-wide registry failed to initialize.
    #[error("shape registry unavailable: {reason}")]
    RegistryInit {
        /// Rendered error from the first initialization attempt.
        reason: String,
    },

    /// IO error reading a shape directory.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// A single validation violation with structured context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// JSON Pointer path to the violating field in the instance.
    pub instance_path: String,
    /// JSON Pointer path within the schema that triggered the error.
    pub schema_path: String,
    /// Human-readable description of the violation.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.instance_path.is_empty() {
            write!(f, "  (root): {}", self.message)
        } else {
            write!(f, "  {}: {}", self.instance_path, self.message)
        }
    }
}

/// Collection of validation violations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationViolations {
    violations: Vec<Violation>,
}

impl ValidationViolations {
    pub(crate) fn new(violations: Vec<Violation>) -> Self {
        Self { violations }
    }

    /// Returns the number of violations.
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Returns true if there are no violations.
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Returns a slice of all violations.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Returns true if any violation message or path mentions `field`.
    pub fn mentions(&self, field: &str) -> bool {
        self.violations
            .iter()
            .any(|v| v.message.contains(field) || v.instance_path.contains(field))
    }
}

impl fmt::Display for ValidationViolations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

/// Collect every violation of `instance` against a compiled validator.
pub(crate) fn collect_violations(validator: &Validator, instance: &Value) -> Vec<Violation> {
    validator
        .iter_errors(instance)
        .map(|e| Violation {
            instance_path: e.instance_path.to_string(),
            schema_path: e.schema_path.to_string(),
            message: e.to_string(),
        })
        .collect()
}

/// A set of parsed shape documents, indexed by filename.
///
/// Compiles validators with every other loaded shape available for
/// `$ref` resolution.
#[derive(Debug, Clone, Default)]
pub struct SchemaValidator {
    schemas: HashMap<String, Value>,
}

impl SchemaValidator {
    /// Load every `*.schema.json` file in `schema_dir`.
    ///
    /// # Errors
    ///
    /// Returns `SchemaValidationError::SchemaLoadError` if the directory or
    /// any shape file cannot be read or parsed as JSON.
    pub fn new(schema_dir: impl AsRef<Path>) -> Result<Self, SchemaValidationError> {
        let schema_dir = schema_dir.as_ref();
        let entries = std::fs::read_dir(schema_dir).map_err(|e| {
            SchemaValidationError::SchemaLoadError {
                schema_name: schema_dir.display().to_string(),
                reason: format!("cannot read schema directory: {e}"),
            }
        })?;

        let mut schemas = HashMap::new();
        for entry in entries {
            let path = entry?.path();
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                if name.ends_with(".schema.json") {
                    let content = std::fs::read_to_string(&path)?;
                    schemas.insert(name.to_string(), parse_shape(name, &content)?);
                }
            }
        }

        Ok(Self { schemas })
    }

    /// Parse shapes from `(filename, document)` pairs held in memory.
    ///
    /// # Errors
    ///
    /// Returns `SchemaValidationError::SchemaLoadError` if a document is
    /// not valid JSON or a filename appears twice.
    pub fn from_sources<'a>(
        sources: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Result<Self, SchemaValidationError> {
        let mut schemas = HashMap::new();
        for (name, content) in sources {
            let value = parse_shape(name, content)?;
            if schemas.insert(name.to_string(), value).is_some() {
                return Err(SchemaValidationError::SchemaLoadError {
                    schema_name: name.to_string(),
                    reason: "duplicate shape name".to_string(),
                });
            }
        }
        Ok(Self { schemas })
    }

    /// Returns the names of all loaded shapes, sorted alphabetically.
    pub fn schema_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.schemas.keys().map(|s| s.as_str()).collect();
        names.sort();
        names
    }

    /// Look up a loaded shape by filename.
    pub fn get_schema(&self, name: &str) -> Option<&Value> {
        self.schemas.get(name)
    }

    /// Resolve a `$ref` found inside `root`.
    ///
    /// Returns `(document, target)`: the document the target lives in (the
    /// new root for nested local refs) and the referenced sub-schema.
    /// Supports `file.schema.json`, `file.schema.json#/pointer`, full
    /// `$id` URIs, and local `#/pointer` refs.
    pub fn resolve_ref<'a>(&'a self, root: &'a Value, reference: &str) -> Option<(&'a Value, &'a Value)> {
        let (location, fragment) = match reference.split_once('#') {
            Some((location, fragment)) => (location, fragment),
            None => (reference, ""),
        };

        let document = if location.is_empty() {
            root
        } else {
            let filename = location.rsplit('/').next().unwrap_or(location);
            self.schemas.get(filename)?
        };

        let target = if fragment.is_empty() {
            document
        } else {
            document.pointer(fragment)?
        };
        Some((document, target))
    }

    fn build_options(&self) -> ValidationOptions {
        let mut opts = jsonschema::options();
        opts.with_draft(jsonschema::Draft::Draft202012);

        let mut shapes_by_uri: HashMap<String, Value> = HashMap::new();
        for (filename, value) in &self.schemas {
            shapes_by_uri.insert(format!("{SHAPE_URI_PREFIX}{filename}"), value.clone());
            if let Some(id_str) = value.get("$id").and_then(|v| v.as_str()) {
                shapes_by_uri.insert(id_str.to_string(), value.clone());
            }
            shapes_by_uri.insert(filename.clone(), value.clone());
        }

        opts.with_retriever(LocalShapeRetriever { shapes_by_uri });
        opts
    }

    /// Build a compiled `Validator` for a shape by filename.
    ///
    /// # Errors
    ///
    /// Returns `SchemaValidationError::SchemaLoadError` if the shape is not
    /// loaded, or `SchemaValidationError::ValidatorBuildError` if it does
    /// not compile (including unresolved `$ref`s).
    pub fn build_validator(&self, schema_name: &str) -> Result<Validator, SchemaValidationError> {
        let schema_value = self.schemas.get(schema_name).ok_or_else(|| {
            SchemaValidationError::SchemaLoadError {
                schema_name: schema_name.to_string(),
                reason: "shape not loaded".to_string(),
            }
        })?;

        self.build_options().build(schema_value).map_err(|e| {
            SchemaValidationError::ValidatorBuildError {
                schema_name: schema_name.to_string(),
                reason: e.to_string(),
            }
        })
    }
}

fn parse_shape(name: &str, content: &str) -> Result<Value, SchemaValidationError> {
    serde_json::from_str(content).map_err(|e| SchemaValidationError::SchemaLoadError {
        schema_name: name.to_string(),
        reason: format!("invalid JSON: {e}"),
    })
}

/// Load a payload document from disk.
///
/// `.yaml`/`.yml` files are parsed as YAML, everything else as JSON.
///
/// # Errors
///
/// Returns `SchemaValidationError::DocumentLoadError` if the file cannot be
/// read or parsed.
pub fn load_document(path: &Path) -> Result<Value, SchemaValidationError> {
    let load_error = |reason: String| SchemaValidationError::DocumentLoadError {
        path: path.display().to_string(),
        reason,
    };

    let content =
        std::fs::read_to_string(path).map_err(|e| load_error(format!("cannot read file: {e}")))?;

    match path.extension().and_then(|e| e.to_str()).unwrap_or("") {
        "yaml" | "yml" => serde_yaml::from_str(&content)
            .map_err(|e| load_error(format!("invalid YAML: {e}"))),
        _ => serde_json::from_str(&content).map_err(|e| load_error(format!("invalid JSON: {e}"))),
    }
}
