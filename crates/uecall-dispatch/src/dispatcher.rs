//! # Dispatcher
//!
//! Explicit map from dispatch keys to routes. A route pairs the validator
//! of a registry endpoint with a [`Handler`]; every registry endpoint gets
//! exactly one route, so the set of callable keys is fixed by the
//! registry.
//!
//! A call runs in order: key lookup, shape validation, normalization,
//! handler. Failure at any step is returned to the caller as is.

use std::collections::HashMap;

use serde_json::Value;
use uecall_core::DispatchKey;
use uecall_schema::{Endpoint, PoiAdd, SchemaValidationError, ShapeRegistry, POI_ADD};

use crate::error::DispatchError;
use crate::handler::{Handler, HandlerResult};

/// A validator paired with the handler that runs after it.
#[derive(Debug, Clone)]
pub struct Route<'r> {
    endpoint: &'r Endpoint,
    handler: Handler,
}

impl<'r> Route<'r> {
    /// The registry endpoint holding this route's validator.
    pub fn endpoint(&self) -> &'r Endpoint {
        self.endpoint
    }

    /// The handler run after validation.
    pub fn handler(&self) -> &Handler {
        &self.handler
    }
}

/// Routes every registered key to a validated handler call.
#[derive(Debug)]
pub struct Dispatcher<'r> {
    registry: &'r ShapeRegistry,
    routes: HashMap<DispatchKey, Route<'r>>,
}

impl Dispatcher<'static> {
    /// Dispatcher over the process-wide built-in registry.
    ///
    /// # Errors
    ///
    /// Returns `DispatchError::Schema` if the built-in shapes fail to load.
    pub fn builtin() -> Result<Self, DispatchError> {
        Ok(Self::new(ShapeRegistry::builtin()?))
    }
}

impl<'r> Dispatcher<'r> {
    /// Create a route for every endpoint in `registry`, each with the
    /// [`Handler::Passthrough`] handler.
    pub fn new(registry: &'r ShapeRegistry) -> Self {
        let routes = registry
            .endpoints()
            .map(|endpoint| {
                (
                    endpoint.key().clone(),
                    Route {
                        endpoint,
                        handler: Handler::Passthrough,
                    },
                )
            })
            .collect();
        Self { registry, routes }
    }

    /// Replace the handler of an existing route.
    ///
    /// # Errors
    ///
    /// Returns `DispatchError::NotDefined` if no route exists for `key`, or
    /// `DispatchError::HandlerMismatch` if the handler variant cannot serve
    /// it.
    pub fn with_handler(mut self, key: &str, handler: Handler) -> Result<Self, DispatchError> {
        let not_defined = || DispatchError::NotDefined {
            key: key.to_string(),
        };
        let parsed = DispatchKey::new(key).map_err(|_| not_defined())?;
        let route = self.routes.get_mut(&parsed).ok_or_else(not_defined)?;
        if !handler.accepts(&parsed) {
            return Err(DispatchError::HandlerMismatch {
                key: parsed,
                handler: handler.name(),
            });
        }
        tracing::debug!(key = %parsed, handler = handler.name(), "bound handler");
        route.handler = handler;
        Ok(self)
    }

    /// The registry this dispatcher validates against.
    pub fn registry(&self) -> &'r ShapeRegistry {
        self.registry
    }

    /// Registered keys in registry declaration order.
    pub fn keys(&self) -> impl Iterator<Item = &'r DispatchKey> {
        self.registry.endpoints().map(Endpoint::key)
    }

    /// The route for `key`, if registered.
    pub fn route(&self, key: &DispatchKey) -> Option<&Route<'r>> {
        self.routes.get(key)
    }

    /// Dispatch by dotted key (`"POI.Add"`).
    ///
    /// # Errors
    ///
    /// `NotDefined` if the key is malformed or unregistered, `Validation`
    /// if the payload does not conform to the shape, or whatever the
    /// handler returns.
    pub async fn dispatch(&self, key: &str, payload: Value) -> HandlerResult {
        match DispatchKey::new(key) {
            Ok(parsed) => self.dispatch_key(&parsed, payload).await,
            Err(_) => Err(DispatchError::NotDefined {
                key: key.to_string(),
            }),
        }
    }

    /// Dispatch by accessor name (`"POI_Add"`).
    ///
    /// # Errors
    ///
    /// Same as [`Dispatcher::dispatch`].
    pub async fn call(&self, accessor: &str, payload: Value) -> HandlerResult {
        match DispatchKey::from_accessor(accessor) {
            Ok(parsed) => self.dispatch_key(&parsed, payload).await,
            Err(_) => Err(DispatchError::NotDefined {
                key: accessor.to_string(),
            }),
        }
    }

    /// Dispatch by parsed key.
    ///
    /// # Errors
    ///
    /// Same as [`Dispatcher::dispatch`].
    pub async fn dispatch_key(&self, key: &DispatchKey, payload: Value) -> HandlerResult {
        let Some(route) = self.routes.get(key) else {
            tracing::debug!(key = %key, "no route for key");
            return Err(DispatchError::NotDefined {
                key: key.to_string(),
            });
        };

        let normalized = self
            .registry
            .validate(route.endpoint, payload)
            .map_err(|e| match e {
                SchemaValidationError::ValidationFailed { violations, .. } => {
                    tracing::debug!(key = %key, violations = violations.len(), "payload rejected");
                    DispatchError::Validation {
                        key: key.clone(),
                        violations,
                    }
                }
                other => DispatchError::Schema(other),
            })?;

        tracing::debug!(key = %key, handler = route.handler.name(), "dispatching");
        route.handler.invoke(key, normalized).await
    }

    /// Typed `POI.Add` call site.
    ///
    /// # Errors
    ///
    /// Same as [`Dispatcher::dispatch`].
    pub async fn poi_add(&self, request: &PoiAdd) -> HandlerResult {
        let payload = serde_json::to_value(request).map_err(|e| DispatchError::Handler {
            key: POI_ADD.to_string(),
            reason: format!("cannot serialize request: {e}"),
        })?;
        self.dispatch(POI_ADD, payload).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::FutureExt;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use uecall_schema::{EndpointSpec, BUILTIN_SHAPES};

    fn valid_payload() -> Value {
        json!({
            "Display": true,
            "Focus": {
                "ArmLength": 100,
                "CanFocus": true,
                "Focus": { "x": 0, "y": 0, "z": 0 },
                "Rotator": { "Pinch": 0, "Roll": 0, "Yaw": 0 }
            },
            "Location": { "x": 0, "y": 0, "z": 0 },
            "Tags": ["test"],
            "Switch": {
                "CheckImg": "test",
                "CheckText": "test",
                "FontSize": 12,
                "MinSize": { "x": 0, "y": 0 },
                "UnCheckImg": "test",
                "UnCheckText": "test"
            }
        })
    }

    #[tokio::test]
    async fn valid_payload_resolves_to_itself() {
        let dispatcher = Dispatcher::builtin().unwrap();
        let out = dispatcher.dispatch("POI.Add", valid_payload()).await.unwrap();
        assert_eq!(out, valid_payload());
    }

    #[tokio::test]
    async fn accessor_form_reaches_same_route() {
        let dispatcher = Dispatcher::builtin().unwrap();
        let out = dispatcher.call("POI_Add", valid_payload()).await.unwrap();
        assert_eq!(out, valid_payload());
    }

    #[tokio::test]
    async fn empty_object_rejected_with_missing_fields() {
        let dispatcher = Dispatcher::builtin().unwrap();
        let err = dispatcher.call("POI_Add", json!({})).await.unwrap_err();
        let violations = err.violations().expect("validation error");
        for field in ["Tags", "Location", "Focus"] {
            assert!(violations.mentions(field), "{field} not cited: {violations}");
        }
    }

    #[tokio::test]
    async fn unknown_keys_are_not_defined() {
        let dispatcher = Dispatcher::builtin().unwrap();
        for key in ["POI.Remove", "POI", "", "POI..Add", "POI_Add"] {
            let err = dispatcher.dispatch(key, valid_payload()).await.unwrap_err();
            assert!(err.is_not_defined(), "{key:?} gave {err}");
        }
        let err = dispatcher.call("POI.Add", valid_payload()).await.unwrap_err();
        assert!(err.is_not_defined());
        assert!(err.to_string().contains("not defined"));
    }

    #[tokio::test]
    async fn nested_violation_carries_its_path() {
        let dispatcher = Dispatcher::builtin().unwrap();
        let mut payload = valid_payload();
        payload["Location"]["z"] = json!("0");
        let err = dispatcher.dispatch("POI.Add", payload).await.unwrap_err();
        let violations = err.violations().expect("validation error");
        assert_eq!(violations.len(), 1, "{violations}");
        assert_eq!(violations.violations()[0].instance_path, "/Location/z");
    }

    #[tokio::test]
    async fn extra_properties_are_stripped() {
        let dispatcher = Dispatcher::builtin().unwrap();
        let mut payload = valid_payload();
        payload["Debug"] = json!(true);
        payload["Location"]["w"] = json!(1);
        let out = dispatcher.dispatch("POI.Add", payload).await.unwrap();
        assert_eq!(out, valid_payload());
    }

    #[tokio::test]
    async fn typed_handler_runs_after_validation() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        let dispatcher = Dispatcher::builtin()
            .unwrap()
            .with_handler(
                "POI.Add",
                Handler::poi_add(move |req| {
                    seen.fetch_add(1, Ordering::SeqCst);
                    async move { Ok(json!({ "created": req.tags })) }.boxed()
                }),
            )
            .unwrap();

        let out = dispatcher.dispatch("POI.Add", valid_payload()).await.unwrap();
        assert_eq!(out, json!({ "created": ["test"] }));

        let _ = dispatcher.dispatch("POI.Add", json!({})).await.unwrap_err();
        assert_eq!(calls.load(Ordering::SeqCst), 1, "handler must not run on invalid input");
    }

    #[tokio::test]
    async fn typed_call_site() {
        let dispatcher = Dispatcher::builtin().unwrap();
        let request: PoiAdd = serde_json::from_value(valid_payload()).unwrap();
        let out = dispatcher.poi_add(&request).await.unwrap();
        assert_eq!(out["Tags"], json!(["test"]));
        assert_eq!(out["Display"], json!(true));
    }

    #[test]
    fn with_handler_rejects_unknown_key() {
        let err = Dispatcher::builtin()
            .unwrap()
            .with_handler("POI.Remove", Handler::Passthrough)
            .unwrap_err();
        assert!(err.is_not_defined());
    }

    #[test]
    fn with_handler_rejects_mismatched_variant() {
        let registry = ShapeRegistry::from_sources(
            BUILTIN_SHAPES,
            &[EndpointSpec {
                key: "Vec.Set",
                shape: "vector.schema.json",
            }],
        )
        .unwrap();
        let err = Dispatcher::new(&registry)
            .with_handler(
                "Vec.Set",
                Handler::poi_add(|_| async { Ok(Value::Null) }.boxed()),
            )
            .unwrap_err();
        assert!(matches!(err, DispatchError::HandlerMismatch { .. }), "got {err}");
    }

    #[test]
    fn keys_follow_registry_order() {
        let dispatcher = Dispatcher::builtin().unwrap();
        let keys: Vec<_> = dispatcher.keys().map(DispatchKey::as_str).collect();
        assert_eq!(keys, ["POI.Add"]);
        let route = dispatcher.route(&DispatchKey::new(POI_ADD).unwrap()).unwrap();
        assert_eq!(route.endpoint().shape_name(), "poi.add.schema.json");
        assert_eq!(route.handler().name(), "passthrough");
    }
}
