//! HTTP API for the classifier.

pub mod routes;

pub use routes::{AppState, MAX_UPLOAD_BYTES, classify_routes};
