//! The person record managed by the store.
//!
//! A person is created transiently by a caller with no `id`, gets one from the
//! store on first save, and keeps it until it is physically deleted.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ─── Identity ────────────────────────────────────────────────────────────────

/// Store-assigned primary key. Never reused once a record is deleted.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PersonId(pub i64);

impl fmt::Display for PersonId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

// ─── Person ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
  /// `None` until the record has been saved once.
  pub id:        Option<PersonId>,
  /// Unique key, compared case-insensitively and stored lower-cased.
  pub username:  String,
  pub birthdate: NaiveDate,
  pub country:   String,
  pub phone:     Option<String>,
  pub gender:    Option<String>,
  pub email:     Option<String>,
}

impl Person {
  /// A transient record with all optional fields unset.
  pub fn new(
    username: impl Into<String>,
    birthdate: NaiveDate,
    country: impl Into<String>,
  ) -> Self {
    Self {
      id: None,
      username: username.into(),
      birthdate,
      country: country.into(),
      phone: None,
      gender: None,
      email: None,
    }
  }

  pub fn is_persisted(&self) -> bool { self.id.is_some() }
}

/// Canonical form of a username, used for every lookup and for storage.
pub fn normalize_username(username: &str) -> String { username.to_lowercase() }
