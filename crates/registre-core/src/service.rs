//! [`UserService`] — the user lifecycle operations.
//!
//! Every write runs the eligibility rule first, then consults the store by
//! normalized username. The service keeps no state of its own and never
//! retries: each store failure is mapped to a typed [`Error`] and returned.

use std::sync::Arc;

use mockable::Clock;

use crate::{
  Error, Lookup, Result,
  eligibility,
  person::{Person, normalize_username},
  store::{Page, PersonStore},
};

pub struct UserService<S> {
  store: Arc<S>,
  clock: Arc<dyn Clock + Send + Sync>,
}

impl<S: PersonStore> UserService<S> {
  pub fn new(store: Arc<S>, clock: Arc<dyn Clock + Send + Sync>) -> Self {
    Self { store, clock }
  }

  pub fn store(&self) -> &Arc<S> { &self.store }

  /// One page when `size` is given (`page` defaults to 0), otherwise every
  /// record regardless of `page`.
  pub async fn list(
    &self,
    page: Option<u32>,
    size: Option<u32>,
  ) -> Result<Vec<Person>> {
    let result = match size {
      Some(size) => {
        self.store.find_page(Page::new(page.unwrap_or(0), size)).await
      }
      None => self.store.find_all().await,
    };
    result.map_err(|e| Error::Store(Box::new(e)))
  }

  pub async fn get(&self, username: &str) -> Result<Person> {
    self.find(username).await?.ok_or(Error::NotFound(Lookup::Get))
  }

  /// Persist a new record. Any `id` on the candidate is discarded so the
  /// store always inserts.
  pub async fn create(&self, candidate: Person) -> Result<Person> {
    let mut candidate = self.check_eligibility(candidate)?;

    if self.find(&candidate.username).await?.is_some() {
      return Err(Error::Conflict);
    }

    candidate.id = None;
    self
      .store
      .save(candidate)
      .await
      .map_err(|e| Error::CreateFailed(Box::new(e)))
  }

  /// Overwrite the record sharing the candidate's username, keeping its `id`.
  pub async fn update(&self, candidate: Person) -> Result<Person> {
    let mut candidate = self.check_eligibility(candidate)?;

    let existing = self
      .find(&candidate.username)
      .await?
      .ok_or(Error::NotFound(Lookup::Update))?;

    candidate.id = existing.id;
    self
      .store
      .save(candidate)
      .await
      .map_err(|e| Error::UpdateFailed(Box::new(e)))
  }

  /// Delete `username`, then create `candidate` afresh with a new `id`.
  ///
  /// The two steps are not atomic: when the create fails after the delete
  /// succeeded, the original record is gone.
  pub async fn replace(&self, username: &str, candidate: Person) -> Result<Person> {
    let replaced = async {
      self.delete(username).await?;
      self.create(candidate).await
    };
    replaced.await.map_err(|e| Error::ReplaceFailed(Box::new(e)))
  }

  pub async fn delete(&self, username: &str) -> Result<()> {
    let existing = self
      .find(username)
      .await?
      .ok_or(Error::NotFound(Lookup::Delete))?;

    self
      .store
      .delete(existing)
      .await
      .map_err(|e| Error::DeleteFailed(Box::new(e)))
  }

  async fn find(&self, username: &str) -> Result<Option<Person>> {
    let key = normalize_username(username);
    self
      .store
      .find_by_username(&key)
      .await
      .map_err(|e| Error::Store(Box::new(e)))
  }

  /// Age is counted against the server's local calendar date.
  fn check_eligibility(&self, candidate: Person) -> Result<Person> {
    let today = self.clock.local().date_naive();
    eligibility::check(candidate, today).map_err(Error::Ineligible)
  }
}
