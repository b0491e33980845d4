//! The `PersonStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g. `registre-store-sqlite`).
//! [`UserService`](crate::UserService) depends on this abstraction, not on any
//! concrete backend.

use std::future::Future;

use crate::person::Person;

// ─── Paging ──────────────────────────────────────────────────────────────────

/// A 0-indexed page request: `size` records starting at `index * size`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
  pub index: u32,
  pub size:  u32,
}

impl Page {
  pub fn new(index: u32, size: u32) -> Self { Self { index, size } }

  /// Number of records that precede this page.
  pub fn offset(&self) -> u64 { u64::from(self.index) * u64::from(self.size) }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a person store backend.
///
/// Uniqueness of `username` and the isolation of concurrent writes are the
/// backend's responsibility. Callers always pass already-normalized usernames.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait PersonStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Look up a record by its normalized username. Returns `None` if absent.
  fn find_by_username<'a>(
    &'a self,
    username: &'a str,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + 'a;

  /// Every record, in the store's natural order.
  fn find_all(
    &self,
  ) -> impl Future<Output = Result<Vec<Person>, Self::Error>> + Send + '_;

  /// One page of records in the same order as [`PersonStore::find_all`]. The
  /// last page may be short or empty.
  fn find_page(
    &self,
    page: Page,
  ) -> impl Future<Output = Result<Vec<Person>, Self::Error>> + Send + '_;

  /// Insert when `person.id` is `None` (the store assigns one), otherwise
  /// overwrite the row with that id. Returns the stored record.
  fn save(
    &self,
    person: Person,
  ) -> impl Future<Output = Result<Person, Self::Error>> + Send + '_;

  /// Physically remove a persisted record.
  fn delete(
    &self,
    person: Person,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
