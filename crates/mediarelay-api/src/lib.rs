//! Mediarelay API Library
//!
//! HTTP surface of the relay: upload routes, the legacy passthrough route,
//! health and OpenAPI endpoints, and application setup.

// Module declarations
mod api_doc;
pub mod constants;
mod handlers;
pub mod services;
pub mod setup;
mod utils;

// Public modules
pub mod error;
pub mod state;

// Re-exports
pub use error::{ErrorResponse, HttpAppError};
pub use services::relay::{RelayOrchestrator, RelayOutcome, RelayStage, StageTracker, UploadRequest};
pub use state::AppState;
