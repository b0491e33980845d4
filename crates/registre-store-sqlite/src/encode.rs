//! Encoding and decoding helpers between [`Person`] and its SQLite row.
//!
//! Birthdates are stored as `YYYY-MM-DD` strings; ids are plain integers.

use chrono::NaiveDate;
use registre_core::person::{Person, PersonId};

use crate::{Error, Result};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Column list shared by every `SELECT`, in [`RawPerson::from_row`] order.
pub const COLUMNS: &str = "id, username, birthdate, country, phone, gender, email";

// ─── NaiveDate ───────────────────────────────────────────────────────────────

pub fn encode_date(date: NaiveDate) -> String { date.format(DATE_FORMAT).to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, DATE_FORMAT)
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Row type ────────────────────────────────────────────────────────────────

/// Raw values read directly from a `users` row.
pub struct RawPerson {
  pub id:        i64,
  pub username:  String,
  pub birthdate: String,
  pub country:   String,
  pub phone:     Option<String>,
  pub gender:    Option<String>,
  pub email:     Option<String>,
}

impl RawPerson {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:        row.get(0)?,
      username:  row.get(1)?,
      birthdate: row.get(2)?,
      country:   row.get(3)?,
      phone:     row.get(4)?,
      gender:    row.get(5)?,
      email:     row.get(6)?,
    })
  }

  pub fn into_person(self) -> Result<Person> {
    Ok(Person {
      id:        Some(PersonId(self.id)),
      username:  self.username,
      birthdate: decode_date(&self.birthdate)?,
      country:   self.country,
      phone:     self.phone,
      gender:    self.gender,
      email:     self.email,
    })
  }
}
