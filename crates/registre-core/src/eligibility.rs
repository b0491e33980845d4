//! The eligibility rule: a record's subject must be a French adult.

use chrono::NaiveDate;
use thiserror::Error;

use crate::person::{Person, normalize_username};

pub const ADULT_AGE: u32 = 18;
pub const ELIGIBLE_COUNTRY: &str = "France";

/// Why a candidate was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Ineligibility {
  #[error("subject is {age} years old, at least 18 required")]
  Underage { age: u32 },

  #[error("country {0:?} is not France")]
  Country(String),
}

/// Whole years elapsed between `birthdate` and `today`, truncated. A birthday
/// falling on `today` counts as reached; a birthdate in the future is age 0.
pub fn age_on(birthdate: NaiveDate, today: NaiveDate) -> u32 {
  today.years_since(birthdate).unwrap_or(0)
}

/// Check `candidate` against the rule as of the calendar date `today`.
///
/// On success the candidate comes back with its username normalized; no other
/// field is touched.
pub fn check(
  mut candidate: Person,
  today: NaiveDate,
) -> Result<Person, Ineligibility> {
  let age = age_on(candidate.birthdate, today);
  if age < ADULT_AGE {
    return Err(Ineligibility::Underage { age });
  }
  if !candidate.country.eq_ignore_ascii_case(ELIGIBLE_COUNTRY) {
    return Err(Ineligibility::Country(candidate.country));
  }

  candidate.username = normalize_username(&candidate.username);
  Ok(candidate)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
  }

  fn today() -> NaiveDate { date(2020, 1, 8) }

  #[test]
  fn birthday_on_today_counts_as_reached() {
    assert_eq!(age_on(date(2002, 1, 8), date(2020, 1, 8)), 18);
    assert_eq!(age_on(date(2002, 1, 9), date(2020, 1, 8)), 17);
  }

  #[test]
  fn future_birthdate_is_age_zero() {
    assert_eq!(age_on(date(2030, 1, 1), date(2020, 1, 8)), 0);
  }

  #[test]
  fn leap_day_birthdate_truncates() {
    assert_eq!(age_on(date(2000, 2, 29), date(2018, 2, 28)), 17);
    assert_eq!(age_on(date(2000, 2, 29), date(2018, 3, 1)), 18);
  }

  #[test]
  fn adult_french_passes_and_username_is_lowercased() {
    let candidate = Person::new("Arthur", date(2002, 1, 8), "fRaNcE");
    let checked = check(candidate, today()).unwrap();
    assert_eq!(checked.username, "arthur");
    assert_eq!(checked.country, "fRaNcE");
  }

  #[test]
  fn one_day_short_of_eighteen_is_rejected() {
    let candidate = Person::new("young", date(2002, 1, 9), "France");
    assert_eq!(
      check(candidate, today()),
      Err(Ineligibility::Underage { age: 17 })
    );
  }

  #[test]
  fn other_country_is_rejected() {
    let candidate = Person::new("pedro", date(1990, 1, 1), "Spain");
    assert_eq!(
      check(candidate, today()),
      Err(Ineligibility::Country("Spain".into()))
    );
  }

  #[test]
  fn eighteenth_birthday_is_decided_by_the_given_date() {
    let candidate = Person::new("almost", date(2002, 1, 8), "France");
    assert!(check(candidate.clone(), date(2020, 1, 7)).is_err());
    assert!(check(candidate, date(2020, 1, 8)).is_ok());
  }
}
