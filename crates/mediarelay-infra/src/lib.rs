//! Mediarelay Infrastructure Library
//!
//! Shared infrastructure for the relay service:
//! - Middleware (request ID)
//! - Telemetry initialization
//! - Workflow-trigger notification delivery

#[cfg(feature = "middleware")]
pub mod middleware;

#[cfg(feature = "observability-basic")]
pub mod telemetry;

#[cfg(feature = "webhook")]
pub mod webhook;

// Re-export commonly used types
#[cfg(feature = "middleware")]
pub use middleware::{get_request_id, request_id_middleware, RequestId, RequestSpan};

#[cfg(feature = "observability-basic")]
pub use telemetry::init_telemetry;

#[cfg(feature = "webhook")]
pub use webhook::{
    NotificationDispatcher, NotificationDispatcherConfig, NotificationError,
};
