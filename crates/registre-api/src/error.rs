//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Every error renders as
//! `{"timestamp": "...", "status": 404, "messages": ["User not found"], "path": "/user/bob"}`.
//! The `path` is filled in by [`stamp_path`] once the request URI is known.

use axum::{
  Json,
  extract::{OriginalUri, Request},
  http::{StatusCode, header},
  middleware::Next,
  response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  /// The request itself was malformed; one message per violated rule.
  #[error("bad request: {}", .0.join("; "))]
  BadRequest(Vec<String>),

  #[error(transparent)]
  Domain(#[from] registre_core::Error),
}

impl ApiError {
  pub fn bad_request(message: impl Into<String>) -> Self {
    Self::BadRequest(vec![message.into()])
  }

  pub fn status(&self) -> StatusCode {
    match self {
      Self::BadRequest(_) => StatusCode::BAD_REQUEST,
      Self::Domain(e) if e.is_not_found() => StatusCode::NOT_FOUND,
      Self::Domain(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }
}

/// JSON error body. Also attached to the response as an extension so
/// [`stamp_path`] can re-render it with the request path.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
  pub timestamp: DateTime<Utc>,
  pub status:    u16,
  pub messages:  Vec<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub path:      Option<String>,
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    let messages = match self {
      Self::BadRequest(messages) => {
        tracing::warn!(?messages, "rejected request");
        messages
      }
      Self::Domain(e @ registre_core::Error::Store(_)) => {
        tracing::error!(error = %e, source = ?std::error::Error::source(&e), "store failure");
        vec![e.to_string()]
      }
      Self::Domain(e) => {
        tracing::warn!(error = %e, source = ?std::error::Error::source(&e), "user operation failed");
        vec![e.to_string()]
      }
    };

    let body = ErrorBody {
      timestamp: Utc::now(),
      status: status.as_u16(),
      messages,
      path: None,
    };
    let mut res = (status, Json(body.clone())).into_response();
    res.extensions_mut().insert(body);
    res
  }
}

/// Middleware adding the request path to [`ApiError`] bodies.
pub async fn stamp_path(request: Request, next: Next) -> Response {
  let path = match request.extensions().get::<OriginalUri>() {
    Some(OriginalUri(uri)) => uri.path().to_owned(),
    None => request.uri().path().to_owned(),
  };

  let response = next.run(request).await;
  let Some(body) = response.extensions().get::<ErrorBody>().cloned() else {
    return response;
  };

  let (mut parts, _) = response.into_parts();
  parts.headers.remove(header::CONTENT_LENGTH);
  let body = ErrorBody { path: Some(path), ..body };
  (parts, Json(body)).into_response()
}
