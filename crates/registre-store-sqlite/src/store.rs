//! [`SqliteStore`] — the SQLite implementation of [`PersonStore`].

use std::path::Path;

use registre_core::{
  person::{Person, PersonId},
  store::{Page, PersonStore},
};
use rusqlite::OptionalExtension as _;

use crate::{
  Error, Result,
  encode::{COLUMNS, RawPerson, encode_date},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A person store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn insert(&self, person: Person) -> Result<Person> {
    let username  = person.username.clone();
    let birthdate = encode_date(person.birthdate);
    let country   = person.country.clone();
    let phone     = person.phone.clone();
    let gender    = person.gender.clone();
    let email     = person.email.clone();

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO users (username, birthdate, country, phone, gender, email)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![username, birthdate, country, phone, gender, email],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    tracing::debug!(id, username = %person.username, "inserted person");
    Ok(Person { id: Some(PersonId(id)), ..person })
  }

  async fn overwrite(&self, id: PersonId, person: Person) -> Result<Person> {
    let username  = person.username.clone();
    let birthdate = encode_date(person.birthdate);
    let country   = person.country.clone();
    let phone     = person.phone.clone();
    let gender    = person.gender.clone();
    let email     = person.email.clone();

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE users
             SET username = ?2, birthdate = ?3, country = ?4,
                 phone = ?5, gender = ?6, email = ?7
           WHERE id = ?1",
          rusqlite::params![id.0, username, birthdate, country, phone, gender, email],
        )?)
      })
      .await?;

    if changed == 0 {
      return Err(Error::PersonNotFound(id));
    }

    tracing::debug!(%id, username = %person.username, "updated person");
    Ok(person)
  }
}

// ─── PersonStore impl ────────────────────────────────────────────────────────

impl PersonStore for SqliteStore {
  type Error = Error;

  async fn find_by_username(&self, username: &str) -> Result<Option<Person>> {
    let username = username.to_owned();

    let raw: Option<RawPerson> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {COLUMNS} FROM users WHERE username = ?1"),
              rusqlite::params![username],
              RawPerson::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawPerson::into_person).transpose()
  }

  async fn find_all(&self) -> Result<Vec<Person>> {
    let raws: Vec<RawPerson> = self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare(&format!("SELECT {COLUMNS} FROM users ORDER BY id"))?;
        let rows = stmt
          .query_map([], RawPerson::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPerson::into_person).collect()
  }

  async fn find_page(&self, page: Page) -> Result<Vec<Person>> {
    let limit  = i64::from(page.size);
    let offset = i64::try_from(page.offset()).unwrap_or(i64::MAX);

    let raws: Vec<RawPerson> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {COLUMNS} FROM users ORDER BY id LIMIT ?1 OFFSET ?2"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![limit, offset], RawPerson::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPerson::into_person).collect()
  }

  async fn save(&self, person: Person) -> Result<Person> {
    match person.id {
      None => self.insert(person).await,
      Some(id) => self.overwrite(id, person).await,
    }
  }

  async fn delete(&self, person: Person) -> Result<()> {
    let id = person.id.ok_or(Error::Unsaved)?;

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute("DELETE FROM users WHERE id = ?1", rusqlite::params![id.0])?)
      })
      .await?;

    if changed == 0 {
      return Err(Error::PersonNotFound(id));
    }

    tracing::debug!(%id, username = %person.username, "deleted person");
    Ok(())
  }
}
