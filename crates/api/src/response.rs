//! Shared response envelope for API handlers.
//!
//! Every successful response body is wrapped as `{ "data": ... }`. Handlers
//! return [`DataResponse`] rather than building the envelope with
//! `serde_json::json!` so the payload type stays visible at the call site.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
