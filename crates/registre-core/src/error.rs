//! Error types for `registre-core`.

use thiserror::Error;

use crate::eligibility::Ineligibility;

/// A boxed backend error, kept as the `source` of store-level failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Which operation failed to find its target. Each has its own message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
  Get,
  Update,
  Delete,
}

impl Lookup {
  pub fn not_found_message(self) -> &'static str {
    match self {
      Self::Get => "User not found",
      Self::Update => "User cannot be updated, user not exists",
      Self::Delete => "User cannot be deleted, user does not exist",
    }
  }
}

#[derive(Debug, Error)]
pub enum Error {
  #[error("{}", .0.not_found_message())]
  NotFound(Lookup),

  #[error("User cannot be created, user already exists")]
  Conflict,

  #[error("User must be adult French")]
  Ineligible(#[source] Ineligibility),

  #[error("User cannot be created")]
  CreateFailed(#[source] BoxError),

  #[error("User cannot be updated")]
  UpdateFailed(#[source] BoxError),

  #[error("User cannot be deleted")]
  DeleteFailed(#[source] BoxError),

  /// Either half of the delete-then-create pair failed. The cause is part of
  /// the message rather than the source chain.
  #[error("User cannot be replaced, {0}")]
  ReplaceFailed(Box<Error>),

  /// The store failed while reading (lookup or listing).
  #[error("store error")]
  Store(#[source] BoxError),
}

impl Error {
  pub fn is_not_found(&self) -> bool { matches!(self, Self::NotFound(_)) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
