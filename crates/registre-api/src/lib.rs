//! JSON REST API for Registre.
//!
//! Exposes an axum [`Router`] over a [`UserService`]. Auth, TLS, and request
//! logging are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let app = registre_api::api_router(Arc::new(UserService::new(store, clock)));
//! ```

pub mod body;
pub mod error;
pub mod users;

use std::sync::Arc;

use axum::{Router, middleware, routing::get};
use registre_core::{UserService, store::PersonStore};

pub use body::PersonBody;
pub use error::ApiError;

/// Build a fully-materialised API router for `service`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(service: Arc<UserService<S>>) -> Router<()>
where
  S: PersonStore + 'static,
{
  Router::new()
    .route(
      "/user",
      get(users::list::<S>)
        .post(users::create::<S>)
        .patch(users::update::<S>),
    )
    .route(
      "/user/{username}",
      get(users::get_one::<S>)
        .put(users::replace::<S>)
        .delete(users::delete::<S>),
    )
    .layer(middleware::from_fn(error::stamp_path))
    .with_state(service)
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
  use mockable::Clock;
  use registre_store_sqlite::SqliteStore;
  use serde_json::{Value, json};
  use tower::ServiceExt as _;

  /// Reads the same wall-clock time in every zone.
  struct FixedClock(NaiveDateTime);

  impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
      Local.from_local_datetime(&self.0).earliest().unwrap()
    }

    fn utc(&self) -> DateTime<Utc> { Utc.from_utc_datetime(&self.0) }
  }

  /// Router over an empty in-memory store, clock fixed at 2020-01-08.
  async fn app() -> Router {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let noon = NaiveDate::from_ymd_opt(2020, 1, 8).unwrap().and_hms_opt(12, 0, 0);
    let clock = FixedClock(noon.unwrap());
    api_router(Arc::new(UserService::new(Arc::new(store), Arc::new(clock))))
  }

  fn user(username: &str, birthdate: &str) -> Value {
    json!({
      "username":  username,
      "birthdate": birthdate,
      "country":   "France",
      "phone":     "0611111111",
      "gender":    "man",
      "email":     "roi@kaamelott.com",
    })
  }

  async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
  ) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
      Some(v) => {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
        Body::from(v.to_string())
      }
      None => Body::empty(),
    };
    let resp = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
      Value::Null
    } else {
      serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
  }

  async fn seeded() -> Router {
    let app = app().await;
    for name in ["arthur", "guenievre", "merlin"] {
      let (status, _) =
        send(&app, "POST", "/user", Some(user(name, "1980-04-12"))).await;
      assert_eq!(status, StatusCode::CREATED);
    }
    app
  }

  // ── Create ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn create_returns_201_with_lowercased_username() {
    let app = app().await;
    let (status, body) =
      send(&app, "POST", "/user", Some(user("Arthur", "2002-01-08"))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["username"], "arthur");
    assert_eq!(body["birthdate"], "2002-01-08");
    assert!(body.get("id").is_none());
  }

  #[tokio::test]
  async fn create_duplicate_returns_500() {
    let app = seeded().await;
    let (status, body) =
      send(&app, "POST", "/user", Some(user("ARTHUR", "1980-04-12"))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["status"], 500);
    assert_eq!(
      body["messages"],
      json!(["User cannot be created, user already exists"])
    );
    assert!(body["timestamp"].is_string());
  }

  #[tokio::test]
  async fn create_minor_returns_500() {
    let app = app().await;
    let (status, body) =
      send(&app, "POST", "/user", Some(user("young", "2002-01-09"))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["messages"], json!(["User must be adult French"]));
  }

  #[tokio::test]
  async fn create_invalid_body_returns_400_with_every_message() {
    let app = app().await;
    let body = json!({ "username": "", "phone": "0123456789012345", "email": "nope" });
    let (status, body) = send(&app, "POST", "/user", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);
    assert_eq!(body["path"], "/user");
    assert_eq!(
      body["messages"],
      json!([
        "username is mandatory",
        "birthdate is mandatory",
        "country is mandatory",
        "phone must be at most 15 characters",
        "email must be a valid email address",
      ])
    );
  }

  #[tokio::test]
  async fn malformed_json_returns_400() {
    let app = app().await;
    let req = Request::builder()
      .method("POST")
      .uri("/user")
      .header(header::CONTENT_TYPE, "application/json")
      .body(Body::from(r#"{"username": "arthur", "birthdate": "12/04/1980"}"#))
      .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }

  // ── Read ────────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn get_is_case_insensitive_and_missing_is_404() {
    let app = seeded().await;
    let (status, body) = send(&app, "GET", "/user/MERLIN", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "merlin");

    let (status, body) = send(&app, "GET", "/user/perceval", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["messages"], json!(["User not found"]));
    assert_eq!(body["path"], "/user/perceval");
  }

  #[tokio::test]
  async fn get_with_over_long_username_returns_400() {
    let app = app().await;
    let uri = format!("/user/{}", "a".repeat(101));
    let (status, body) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["path"], uri);
  }

  #[tokio::test]
  async fn username_growing_past_limit_when_lowercased_is_rejected() {
    let app = app().await;
    let (status, body) =
      send(&app, "POST", "/user", Some(user(&"İ".repeat(100), "1980-04-12"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
      body["messages"],
      json!(["username must be at most 100 characters"])
    );
    let (_, all) = send(&app, "GET", "/user", None).await;
    assert!(all.as_array().unwrap().is_empty());
  }

  #[tokio::test]
  async fn list_paginates() {
    let app = seeded().await;

    let (_, all) = send(&app, "GET", "/user", None).await;
    assert_eq!(all.as_array().unwrap().len(), 3);

    let (_, first) = send(&app, "GET", "/user?page=0&size=2", None).await;
    assert_eq!(first.as_array().unwrap().len(), 2);

    let (_, second) = send(&app, "GET", "/user?page=1&size=2", None).await;
    assert_eq!(second.as_array().unwrap().len(), 1);
    assert_eq!(second[0]["username"], "merlin");

    let (_, sized) = send(&app, "GET", "/user?size=2", None).await;
    assert_eq!(sized, first);

    let (_, paged_only) = send(&app, "GET", "/user?page=4", None).await;
    assert_eq!(paged_only.as_array().unwrap().len(), 3);
  }

  #[tokio::test]
  async fn list_rejects_bad_params() {
    let app = seeded().await;
    let (status, _) = send(&app, "GET", "/user?size=0", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = send(&app, "GET", "/user?page=-1&size=2", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
  }

  // ── Update ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn patch_updates_existing_and_returns_201() {
    let app = seeded().await;
    let mut change = user("Arthur", "1980-04-12");
    change["email"] = json!("leplusgrandroi@kaamelott.com");

    let (status, body) = send(&app, "PATCH", "/user", Some(change)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["email"], "leplusgrandroi@kaamelott.com");

    let (_, all) = send(&app, "GET", "/user", None).await;
    assert_eq!(all.as_array().unwrap().len(), 3);
  }

  #[tokio::test]
  async fn patch_missing_returns_404() {
    let app = seeded().await;
    let (status, body) =
      send(&app, "PATCH", "/user", Some(user("perceval", "1980-04-12"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
      body["messages"],
      json!(["User cannot be updated, user not exists"])
    );
  }

  // ── Replace ─────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn put_replaces_and_returns_201() {
    let app = seeded().await;
    let (status, body) =
      send(&app, "PUT", "/user/arthur", Some(user("Perceval", "1985-02-02"))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["username"], "perceval");

    let (status, _) = send(&app, "GET", "/user/arthur", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn put_missing_returns_500_with_wrapped_message() {
    let app = seeded().await;
    let (status, body) =
      send(&app, "PUT", "/user/perceval", Some(user("perceval", "1985-02-02"))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
      body["messages"],
      json!(["User cannot be replaced, User cannot be deleted, user does not exist"])
    );
  }

  // ── Delete ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn delete_returns_204_then_404() {
    let app = seeded().await;
    let (status, body) = send(&app, "DELETE", "/user/Guenievre", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, body) = send(&app, "DELETE", "/user/guenievre", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
      body["messages"],
      json!(["User cannot be deleted, user does not exist"])
    );
  }
}
