//! # Handlers
//!
//! A handler is what runs once a payload has been validated and
//! normalized. Handlers form a closed tagged union: each typed variant is
//! bound to exactly one dispatch key and receives the payload already
//! deserialized into that key's Rust type.

use std::fmt;
use std::sync::Arc;

use futures::future::BoxFuture;
use serde_json::Value;
use uecall_core::DispatchKey;
use uecall_schema::{PoiAdd, POI_ADD};

use crate::error::DispatchError;

/// Result of running a handler.
pub type HandlerResult = Result<Value, DispatchError>;

/// Typed handler for `POI.Add`.
pub type PoiAddFn = Arc<dyn Fn(PoiAdd) -> BoxFuture<'static, HandlerResult> + Send + Sync>;

/// The handler half of a route.
#[derive(Clone)]
pub enum Handler {
    /// Resolve with the normalized payload unchanged. Default for every
    /// route.
    Passthrough,
    /// Run a typed `POI.Add` handler.
    PoiAdd(PoiAddFn),
}

impl Handler {
    /// Wrap an async function or closure as a `POI.Add` handler.
    pub fn poi_add<F>(f: F) -> Self
    where
        F: Fn(PoiAdd) -> BoxFuture<'static, HandlerResult> + Send + Sync + 'static,
    {
        Self::PoiAdd(Arc::new(f))
    }

    /// Variant name, for logs and errors.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Passthrough => "passthrough",
            Self::PoiAdd(_) => "poi_add",
        }
    }

    /// Whether this variant can serve `key`.
    pub fn accepts(&self, key: &DispatchKey) -> bool {
        match self {
            Self::Passthrough => true,
            Self::PoiAdd(_) => key.as_str() == POI_ADD,
        }
    }

    /// Run the handler on an already validated, normalized payload.
    pub(crate) async fn invoke(&self, key: &DispatchKey, payload: Value) -> HandlerResult {
        match self {
            Self::Passthrough => Ok(payload),
            Self::PoiAdd(f) => {
                let request: PoiAdd =
                    serde_json::from_value(payload).map_err(|e| DispatchError::Handler {
                        key: key.to_string(),
                        reason: format!("payload does not match the typed request: {e}"),
                    })?;
                f(request).await
            }
        }
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handler::{}", self.name())
    }
}
