//! Shared HTTP middleware

pub mod request_id;
pub mod request_span;

pub use request_id::{get_request_id, request_id_middleware, RequestId};
pub use request_span::RequestSpan;
