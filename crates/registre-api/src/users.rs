//! Handlers for `/user` endpoints.
//!
//! | Method   | Path               | Notes |
//! |----------|--------------------|-------|
//! | `GET`    | `/user`            | Optional `?page` (default 0) and `?size`; no `size` returns everything |
//! | `GET`    | `/user/{username}` | Case-insensitive; 404 if absent |
//! | `POST`   | `/user`            | Body: [`PersonBody`]; returns 201 |
//! | `PATCH`  | `/user`            | Body: [`PersonBody`]; updates the record with that username; returns 201 |
//! | `PUT`    | `/user/{username}` | Body: [`PersonBody`]; deletes then recreates; returns 201 |
//! | `DELETE` | `/user/{username}` | Returns 204 |

use std::sync::Arc;

use axum::{
  Json,
  extract::{
    Path, Query, State,
    rejection::{JsonRejection, QueryRejection},
  },
  http::StatusCode,
  response::IntoResponse,
};
use registre_core::{UserService, store::PersonStore};
use serde::Deserialize;

use crate::{
  body::{PersonBody, check_username_path},
  error::ApiError,
};

type Service<S> = State<Arc<UserService<S>>>;

/// Unwrap a JSON body, turning extractor rejections into a 400 message.
fn json_body(
  body: Result<Json<PersonBody>, JsonRejection>,
) -> Result<PersonBody, ApiError> {
  body
    .map(|Json(b)| b)
    .map_err(|rejection| ApiError::bad_request(rejection.body_text()))
}

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub page: Option<u32>,
  pub size: Option<u32>,
}

/// `GET /user[?page=<n>][&size=<n>]`
pub async fn list<S>(
  State(service): Service<S>,
  params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Vec<PersonBody>>, ApiError>
where
  S: PersonStore,
{
  let Query(params) =
    params.map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
  if params.size == Some(0) {
    return Err(ApiError::bad_request("size must be at least 1"));
  }

  let people = service.list(params.page, params.size).await?;
  Ok(Json(people.into_iter().map(PersonBody::from).collect()))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /user/{username}`
pub async fn get_one<S>(
  State(service): Service<S>,
  Path(username): Path<String>,
) -> Result<Json<PersonBody>, ApiError>
where
  S: PersonStore,
{
  check_username_path(&username)?;
  let person = service.get(&username).await?;
  Ok(Json(PersonBody::from(person)))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /user` — returns 201 + the stored person.
pub async fn create<S>(
  State(service): Service<S>,
  body: Result<Json<PersonBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: PersonStore,
{
  let candidate = json_body(body)?.into_candidate()?;
  let person = service.create(candidate).await?;
  tracing::info!(username = %person.username, "created user");
  Ok((StatusCode::CREATED, Json(PersonBody::from(person))))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PATCH /user` — the body's username selects the record; returns 201.
pub async fn update<S>(
  State(service): Service<S>,
  body: Result<Json<PersonBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: PersonStore,
{
  let candidate = json_body(body)?.into_candidate()?;
  let person = service.update(candidate).await?;
  tracing::info!(username = %person.username, "updated user");
  Ok((StatusCode::CREATED, Json(PersonBody::from(person))))
}

// ─── Replace ──────────────────────────────────────────────────────────────────

/// `PUT /user/{username}` — returns 201 + the recreated person.
pub async fn replace<S>(
  State(service): Service<S>,
  Path(username): Path<String>,
  body: Result<Json<PersonBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: PersonStore,
{
  check_username_path(&username)?;
  let candidate = json_body(body)?.into_candidate()?;
  let person = service.replace(&username, candidate).await?;
  tracing::info!(replaced = %username, username = %person.username, "replaced user");
  Ok((StatusCode::CREATED, Json(PersonBody::from(person))))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /user/{username}` — returns 204.
pub async fn delete<S>(
  State(service): Service<S>,
  Path(username): Path<String>,
) -> Result<StatusCode, ApiError>
where
  S: PersonStore,
{
  check_username_path(&username)?;
  service.delete(&username).await?;
  tracing::info!(%username, "deleted user");
  Ok(StatusCode::NO_CONTENT)
}
