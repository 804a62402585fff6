use crate::tracing::{RequestId, REQUEST_ID_HEADER};
use axum::{
    extract::Request,
    http::{header::HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};

/// Longest client-supplied id that is accepted as-is.
const MAX_INBOUND_ID_LEN: usize = 128;

fn inbound_request_id(request: &Request) -> Option<RequestId> {
    request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty() && v.len() <= MAX_INBOUND_ID_LEN)
        .map(RequestId::new)
}

/// Assigns every request an id, exposes it to handlers and echoes it on the response.
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id = inbound_request_id(&request).unwrap_or_default();

    // a client id that is not a valid header value is replaced by a fresh one
    let (request_id, header_value) = match HeaderValue::from_str(request_id.as_str()) {
        Ok(value) => (request_id, value),
        Err(_) => {
            let fresh = RequestId::default();
            let value = HeaderValue::from_str(fresh.as_str())
                .unwrap_or_else(|_| HeaderValue::from_static("invalid-request-id"));
            (fresh, value)
        }
    };

    let header_name = HeaderName::from_static(REQUEST_ID_HEADER);
    request
        .headers_mut()
        .insert(header_name.clone(), header_value.clone());
    request.extensions_mut().insert(request_id.clone());

    let mut response =
        crate::tracing::scope_request_id(request_id, async move { next.run(request).await })
            .await;

    response.headers_mut().insert(header_name, header_value);
    response
}
