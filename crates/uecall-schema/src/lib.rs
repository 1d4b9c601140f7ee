//! # uecall-schema — Shape Validation & Type Generation
//!
//! Shapes are JSON Schema documents describing call payloads. This crate
//! validates values against them at runtime and derives TypeScript type
//! declarations from the same documents, so the two can never diverge.
//!
//! ## Runtime Validation (`validate`, `registry`)
//!
//! [`ShapeRegistry::builtin`] compiles the embedded shapes once per
//! process and maps each dispatch key to its validator.
//! [`ShapeRegistry::validate`] returns either the normalized value or every
//! violated constraint.
//!
//! ## Normalization (`normalize`)
//!
//! Properties a shape does not declare are stripped from validated values.
//!
//! ## Codegen (`codegen`)
//!
//! [`codegen::render_declarations`] emits one `type` alias per endpoint;
//! [`codegen::write_declarations`] persists it and reads it back.
//!
//! ## Crate Policy
//!
//! - Depends only on `uecall-core` internally.
//! - Shape `$id` URIs and filenames must stay in sync; `$ref`s resolve by
//!   filename.

pub mod codegen;
pub mod normalize;
pub mod registry;
pub mod shapes;
pub mod types;
pub mod validate;

pub use codegen::{render_declarations, type_alias, write_declarations, CodegenError};
pub use registry::{Endpoint, ShapeRegistry};
pub use shapes::{EndpointSpec, ShapeSource, BUILTIN_ENDPOINTS, BUILTIN_SHAPES, POI_ADD};
pub use types::{Focus, PoiAdd, Rotator, Switch, Vector, Vector2D};
pub use validate::{load_document, SchemaValidationError, SchemaValidator, ValidationViolations, Violation};
