//! # Shape Registry
//!
//! Static mapping from dispatch keys to compiled validators. The built-in
//! registry is created on first use and lives for the rest of the process;
//! it is never mutated afterwards.

use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

use jsonschema::Validator;
use serde_json::Value;
use uecall_core::DispatchKey;

use crate::normalize::strip_unknown;
use crate::shapes::{EndpointSpec, ShapeSource, BUILTIN_ENDPOINTS, BUILTIN_SHAPES};
use crate::validate::{collect_violations, SchemaValidationError, SchemaValidator, ValidationViolations};

static BUILTIN: OnceLock<Result<ShapeRegistry, String>> = OnceLock::new();

/// A dispatch key bound to the compiled validator of its shape.
pub struct Endpoint {
    key: DispatchKey,
    shape_name: String,
    validator: Validator,
}

impl Endpoint {
    /// The dotted dispatch key.
    pub fn key(&self) -> &DispatchKey {
        &self.key
    }

    /// Filename of the top-level shape.
    pub fn shape_name(&self) -> &str {
        &self.shape_name
    }

    /// Check `instance` without normalizing it.
    pub fn check(&self, instance: &Value) -> Result<(), ValidationViolations> {
        let violations = collect_violations(&self.validator, instance);
        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationViolations::new(violations))
        }
    }
}

impl fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Endpoint")
            .field("key", &self.key)
            .field("shape_name", &self.shape_name)
            .finish_non_exhaustive()
    }
}

/// The set of shapes plus the endpoint table built from them.
#[derive(Debug)]
pub struct ShapeRegistry {
    shapes: SchemaValidator,
    endpoints: Vec<Endpoint>,
    index: HashMap<DispatchKey, usize>,
}

impl ShapeRegistry {
    /// The process-wide registry built from the embedded shapes.
    ///
    /// Built once; later calls return the same instance, or the same
    /// failure if the first build failed.
    ///
    /// # Errors
    ///
    /// Returns `SchemaValidationError::RegistryInit` if the embedded shapes
    /// do not load or compile.
    pub fn builtin() -> Result<&'static ShapeRegistry, SchemaValidationError> {
        BUILTIN
            .get_or_init(|| {
                let built = Self::from_sources(BUILTIN_SHAPES, BUILTIN_ENDPOINTS);
                if let Err(e) = &built {
                    tracing::error!(error = %e, "built-in shape registry failed to build");
                }
                built.map_err(|e| e.to_string())
            })
            .as_ref()
            .map_err(|reason| SchemaValidationError::RegistryInit {
                reason: reason.clone(),
            })
    }

    /// Build a registry from explicit shape sources and endpoint rows.
    ///
    /// # Errors
    ///
    /// Fails if a shape is not valid JSON, an endpoint key is malformed or
    /// repeated, an endpoint names an unknown shape, or a validator does
    /// not compile.
    pub fn from_sources(
        shapes: &[ShapeSource],
        endpoints: &[EndpointSpec],
    ) -> Result<Self, SchemaValidationError> {
        let shapes = SchemaValidator::from_sources(shapes.iter().map(|s| (s.name, s.document)))?;

        let mut compiled = Vec::with_capacity(endpoints.len());
        let mut index = HashMap::with_capacity(endpoints.len());
        for spec in endpoints {
            let key = DispatchKey::new(spec.key).map_err(|e| {
                SchemaValidationError::SchemaLoadError {
                    schema_name: spec.shape.to_string(),
                    reason: format!("invalid dispatch key '{}': {e}", spec.key),
                }
            })?;
            if index.contains_key(&key) {
                return Err(SchemaValidationError::SchemaLoadError {
                    schema_name: spec.shape.to_string(),
                    reason: format!("dispatch key '{key}' registered twice"),
                });
            }

            let validator = shapes.build_validator(spec.shape)?;
            tracing::debug!(key = %key, shape = spec.shape, "compiled endpoint validator");

            index.insert(key.clone(), compiled.len());
            compiled.push(Endpoint {
                key,
                shape_name: spec.shape.to_string(),
                validator,
            });
        }

        Ok(Self {
            shapes,
            endpoints: compiled,
            index,
        })
    }

    /// Look up the endpoint for a dotted key.
    pub fn lookup(&self, key: &DispatchKey) -> Option<&Endpoint> {
        self.index.get(key).map(|&i| &self.endpoints[i])
    }

    /// Endpoints in declaration order.
    pub fn endpoints(&self) -> impl Iterator<Item = &Endpoint> {
        self.endpoints.iter()
    }

    /// Number of registered endpoints.
    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    /// True if no endpoints are registered.
    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    /// The underlying shape documents.
    pub fn shapes(&self) -> &SchemaValidator {
        &self.shapes
    }

    /// Raw shape document by filename.
    pub fn shape(&self, name: &str) -> Option<&Value> {
        self.shapes.get_schema(name)
    }

    /// Validate `instance` against the endpoint's shape and return the
    /// normalized value.
    ///
    /// # Errors
    ///
    /// Returns `SchemaValidationError::ValidationFailed` listing every
    /// violated constraint.
    pub fn validate(&self, endpoint: &Endpoint, instance: Value) -> Result<Value, SchemaValidationError> {
        if let Err(violations) = endpoint.check(&instance) {
            return Err(SchemaValidationError::ValidationFailed {
                schema_name: endpoint.shape_name.clone(),
                violations,
            });
        }
        Ok(self.normalize(endpoint, instance))
    }

    /// Strip properties the endpoint's shape does not declare.
    pub fn normalize(&self, endpoint: &Endpoint, instance: Value) -> Value {
        match self.shapes.get_schema(&endpoint.shape_name) {
            Some(root) => strip_unknown(&self.shapes, root, root, instance),
            None => instance,
        }
    }
}
