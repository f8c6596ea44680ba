//! Observability module - per-request tracing context.

mod request_id;

pub use request_id::{REQUEST_ID_HEADER, RequestIdMiddleware};
