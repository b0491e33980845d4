//! Request logging middleware.
//!
//! Logs `-> METHOD uri` on the way in, with the request body for `POST`,
//! `PATCH` and `PUT`, and `<- METHOD uri in Nms` with the status and response
//! body on the way out. Headers are not logged. Spans come from the
//! `TraceLayer` wrapped around this.

use std::{borrow::Cow, time::Instant};

use axum::{
  body::{Body, Bytes},
  extract::Request,
  http::{HeaderName, HeaderValue, Method, StatusCode},
  middleware::Next,
  response::{IntoResponse, Response},
};
use uuid::Uuid;

pub static REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Largest request or response body buffered for logging.
pub const BODY_LIMIT: usize = 1024 * 1024;

pub async fn log_requests(request: Request, next: Next) -> Response {
  let start = Instant::now();
  let method = request.method().clone();
  let uri = request.uri().clone();
  let request_id = request_id(&request);

  let request = if carries_body(&method) {
    let (parts, body) = request.into_parts();
    let Ok(bytes) = axum::body::to_bytes(body, BODY_LIMIT).await else {
      tracing::warn!(%request_id, "-> {method} {uri} body too large");
      return (StatusCode::PAYLOAD_TOO_LARGE, "request body too large")
        .into_response();
    };
    tracing::info!(%request_id, "-> {method} {uri} with body : {}", text(&bytes));
    Request::from_parts(parts, Body::from(bytes))
  } else {
    tracing::info!(%request_id, "-> {method} {uri}");
    request
  };

  let (mut parts, body) = next.run(request).await.into_parts();
  let bytes = match axum::body::to_bytes(body, BODY_LIMIT).await {
    Ok(bytes) => bytes,
    Err(e) => {
      tracing::error!(%request_id, error = %e, "<- {method} {uri} unreadable response body");
      return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
  };

  let elapsed_ms = start.elapsed().as_millis() as u64;
  let status = parts.status.as_u16();
  if bytes.is_empty() {
    tracing::info!(%request_id, status, "<- {method} {uri} in {elapsed_ms}ms");
  } else {
    tracing::info!(
      %request_id,
      status,
      "<- {method} {uri} in {elapsed_ms}ms with body : {}",
      text(&bytes)
    );
  }

  if let Ok(value) = HeaderValue::from_str(&request_id) {
    parts.headers.insert(REQUEST_ID.clone(), value);
  }
  Response::from_parts(parts, Body::from(bytes))
}

fn carries_body(method: &Method) -> bool {
  *method == Method::POST || *method == Method::PATCH || *method == Method::PUT
}

fn text(bytes: &Bytes) -> Cow<'_, str> { String::from_utf8_lossy(bytes) }

/// The caller's `x-request-id`, or a fresh v4 UUID.
fn request_id(request: &Request) -> String {
  request
    .headers()
    .get(&REQUEST_ID)
    .and_then(|v| v.to_str().ok())
    .filter(|v| !v.is_empty())
    .map(str::to_owned)
    .unwrap_or_else(|| Uuid::new_v4().to_string())
}
