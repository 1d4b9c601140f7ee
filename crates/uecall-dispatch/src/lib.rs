//! # uecall-dispatch — Validated Key Dispatch
//!
//! Maps dotted dispatch keys such as `POI.Add` to routes. Each route pairs
//! the shape validator from [`uecall_schema::ShapeRegistry`] with a
//! [`Handler`]. Calls are made by dotted key ([`Dispatcher::dispatch`]),
//! by accessor name ([`Dispatcher::call`], `POI_Add`), or through typed
//! call sites such as [`Dispatcher::poi_add`].
//!
//! ```no_run
//! # async fn demo() -> Result<(), uecall_dispatch::DispatchError> {
//! use uecall_dispatch::Dispatcher;
//!
//! let dispatcher = Dispatcher::builtin()?;
//! let err = dispatcher.call("POI_Add", serde_json::json!({})).await.unwrap_err();
//! assert!(err.violations().is_some());
//! # Ok(())
//! # }
//! ```
//!
//! ## Crate Policy
//!
//! - The set of routes is fixed by the registry; handlers can be replaced
//!   but keys cannot be added.
//! - Handlers only ever see payloads that passed validation and were
//!   normalized.

pub mod dispatcher;
pub mod error;
pub mod handler;

pub use dispatcher::{Dispatcher, Route};
pub use error::DispatchError;
pub use handler::{Handler, HandlerResult, PoiAddFn};
