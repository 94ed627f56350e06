//! Request identity.
//!
//! Every request carries an `x-request-id`. A caller-supplied id is kept so
//! a `/chain` hop shares the id of the request that issued it; otherwise a
//! UUID v4 is generated. The id is echoed on the response.

use axum::http::{HeaderName, HeaderValue, Request};
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use uuid::Uuid;

pub const X_REQUEST_ID: &str = "x-request-id";

/// Generates UUID v4 request ids.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuidV4;

impl MakeRequestId for MakeRequestUuidV4 {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let value = HeaderValue::from_str(&Uuid::new_v4().to_string()).ok()?;
        Some(RequestId::new(value))
    }
}

/// Layer pair that sets the id on the request and copies it onto the response.
pub fn request_id_layers() -> (SetRequestIdLayer<MakeRequestUuidV4>, PropagateRequestIdLayer) {
    let header = HeaderName::from_static(X_REQUEST_ID);
    (
        SetRequestIdLayer::new(header.clone(), MakeRequestUuidV4),
        PropagateRequestIdLayer::new(header),
    )
}
