//! The JSON shape of a person on the wire, and its field rules.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use registre_core::person::{Person, normalize_username};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

pub const USERNAME_MAX: usize = 100;
pub const COUNTRY_MAX: usize = 100;
pub const PHONE_MAX: usize = 15;
pub const GENDER_MAX: usize = 100;
pub const EMAIL_MAX: usize = 100;

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
  Regex::new(
    r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)*$",
  )
  .expect("email pattern compiles")
});

/// JSON body accepted by `POST /user`, `PATCH /user` and `PUT /user/{username}`,
/// and returned by every endpoint. The store-assigned id is never exposed.
///
/// Required fields are optional here so a missing one yields a field message
/// rather than a deserialisation failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonBody {
  pub username:  Option<String>,
  /// `YYYY-MM-DD`.
  pub birthdate: Option<NaiveDate>,
  pub country:   Option<String>,
  pub phone:     Option<String>,
  pub gender:    Option<String>,
  pub email:     Option<String>,
}

impl PersonBody {
  /// Every rule this body breaks, in field order. Empty when valid.
  pub fn violations(&self) -> Vec<String> {
    let mut messages = Vec::new();

    match self.username.as_deref() {
      Some(u) if !u.trim().is_empty() => check_len(
        &mut messages,
        "username",
        &normalize_username(u),
        USERNAME_MAX,
      ),
      _ => messages.push("username is mandatory".to_owned()),
    }

    if self.birthdate.is_none() {
      messages.push("birthdate is mandatory".to_owned());
    }

    match self.country.as_deref() {
      Some(c) if !c.trim().is_empty() => {
        check_len(&mut messages, "country", c, COUNTRY_MAX)
      }
      _ => messages.push("country is mandatory".to_owned()),
    }

    if let Some(phone) = &self.phone {
      check_len(&mut messages, "phone", phone, PHONE_MAX);
    }
    if let Some(gender) = &self.gender {
      check_len(&mut messages, "gender", gender, GENDER_MAX);
    }
    if let Some(email) = &self.email {
      if !email.is_empty() && !EMAIL_PATTERN.is_match(email) {
        messages.push("email must be a valid email address".to_owned());
      }
      check_len(&mut messages, "email", email, EMAIL_MAX);
    }

    messages
  }

  /// Validate and convert into a transient [`Person`].
  pub fn into_candidate(self) -> Result<Person, ApiError> {
    let messages = self.violations();
    let (Some(username), Some(birthdate), Some(country)) =
      (self.username, self.birthdate, self.country)
    else {
      return Err(ApiError::BadRequest(messages));
    };
    if !messages.is_empty() {
      return Err(ApiError::BadRequest(messages));
    }

    Ok(Person {
      id: None,
      username,
      birthdate,
      country,
      phone: self.phone,
      gender: self.gender,
      email: self.email,
    })
  }
}

impl From<Person> for PersonBody {
  fn from(p: Person) -> Self {
    Self {
      username:  Some(p.username),
      birthdate: Some(p.birthdate),
      country:   Some(p.country),
      phone:     p.phone,
      gender:    p.gender,
      email:     p.email,
    }
  }
}

/// Reject a `{username}` path segment longer than the column allows.
pub fn check_username_path(username: &str) -> Result<(), ApiError> {
  let mut messages = Vec::new();
  check_len(&mut messages, "username", &normalize_username(username), USERNAME_MAX);
  if messages.is_empty() {
    Ok(())
  } else {
    Err(ApiError::BadRequest(messages))
  }
}

fn check_len(messages: &mut Vec<String>, field: &str, value: &str, max: usize) {
  if value.chars().count() > max {
    messages.push(format!("{field} must be at most {max} characters"));
  }
}
