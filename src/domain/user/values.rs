//! Value objects describing a member: personal details, contact details and
//! the membership number printed on their card.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::domain::foundation::{optional_text, required_text, ValidationError};

/// Maximum length for first/last names.
pub const MAX_NAME_LENGTH: usize = 100;

/// Youngest age accepted at registration.
pub const MINIMUM_AGE_YEARS: u32 = 13;

/// Gender as declared by the member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    Unspecified,
}

impl Default for Gender {
    fn default() -> Self {
        Gender::Unspecified
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Male => write!(f, "male"),
            Self::Female => write!(f, "female"),
            Self::Unspecified => write!(f, "unspecified"),
        }
    }
}

impl std::str::FromStr for Gender {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "male" => Ok(Self::Male),
            "female" => Ok(Self::Female),
            "unspecified" => Ok(Self::Unspecified),
            other => Err(ValidationError::invalid_format(
                "gender",
                format!("unknown gender '{}'", other),
            )),
        }
    }
}

/// Name, date of birth and gender.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalInfo {
    first_name: String,
    last_name: String,
    date_of_birth: NaiveDate,
    gender: Gender,
}

impl PersonalInfo {
    /// Creates personal info, validating names and that the birth date is
    /// not after `today`.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        date_of_birth: NaiveDate,
        gender: Gender,
        today: NaiveDate,
    ) -> Result<Self, ValidationError> {
        let first_name = Self::validate_name("first_name", first_name)?;
        let last_name = Self::validate_name("last_name", last_name)?;

        if date_of_birth > today {
            return Err(ValidationError::invalid_format(
                "date_of_birth",
                "cannot be in the future",
            ));
        }

        Ok(Self {
            first_name,
            last_name,
            date_of_birth,
            gender,
        })
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn date_of_birth(&self) -> NaiveDate {
        self.date_of_birth
    }

    pub fn gender(&self) -> Gender {
        self.gender
    }

    /// Age in whole years on the given date.
    pub fn age_on(&self, date: NaiveDate) -> u32 {
        let mut age = date.year() - self.date_of_birth.year();
        if (date.month(), date.day()) < (self.date_of_birth.month(), self.date_of_birth.day()) {
            age -= 1;
        }
        age.max(0) as u32
    }

    fn validate_name(field: &str, value: impl Into<String>) -> Result<String, ValidationError> {
        let name = required_text(field, value)?;
        let len = name.chars().count();
        if len > MAX_NAME_LENGTH {
            return Err(ValidationError::out_of_range(
                field,
                1,
                MAX_NAME_LENGTH as i64,
                len as i64,
            ));
        }
        Ok(name)
    }
}

/// E-mail address and optional phone number.
///
/// E-mail is stored lower-cased so uniqueness checks are case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    email: String,
    phone: Option<String>,
}

impl ContactInfo {
    pub fn new(email: impl Into<String>, phone: Option<String>) -> Result<Self, ValidationError> {
        let email = normalize_email(&email.into())?;
        let phone = match optional_text(phone) {
            Some(phone) => Some(validate_phone(&phone)?),
            None => None,
        };
        Ok(Self { email, phone })
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }
}

/// Lower-cases and checks the basic shape of an e-mail address.
pub fn normalize_email(raw: &str) -> Result<String, ValidationError> {
    let email = raw.trim().to_lowercase();
    if email.is_empty() {
        return Err(ValidationError::empty_field("email"));
    }

    let invalid = |reason: &str| ValidationError::invalid_format("email", reason);
    let (local, domain) = email.split_once('@').ok_or_else(|| invalid("missing @ symbol"))?;
    if local.is_empty() || domain.contains('@') {
        return Err(invalid("malformed address"));
    }
    if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return Err(invalid("malformed domain"));
    }
    if email.chars().any(char::is_whitespace) {
        return Err(invalid("contains whitespace"));
    }
    Ok(email)
}

fn validate_phone(phone: &str) -> Result<String, ValidationError> {
    let digits = phone.chars().filter(|c| c.is_ascii_digit()).count();
    let allowed = phone
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | ' ' | '(' | ')'));
    if !allowed || !(7..=15).contains(&digits) {
        return Err(ValidationError::invalid_format(
            "phone",
            "expected 7-15 digits",
        ));
    }
    Ok(phone.to_string())
}

/// Card number assigned at registration (`GYM-` + 8 hex characters).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MembershipNumber(String);

impl MembershipNumber {
    pub const PREFIX: &'static str = "GYM-";

    /// Generates a fresh membership number.
    pub fn generate() -> Self {
        let suffix: String = Uuid::new_v4()
            .simple()
            .to_string()
            .chars()
            .take(8)
            .collect();
        Self(format!("{}{}", Self::PREFIX, suffix.to_uppercase()))
    }

    /// Wraps a stored membership number.
    pub fn from_stored(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MembershipNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Validates a preferred-language tag such as `en` or `ar`.
pub fn normalize_language(raw: Option<String>) -> Result<String, ValidationError> {
    match optional_text(raw) {
        None => Ok(DEFAULT_LANGUAGE.to_string()),
        Some(lang) => {
            let lang = lang.to_lowercase();
            if lang.len() == 2 && lang.chars().all(|c| c.is_ascii_lowercase()) {
                Ok(lang)
            } else {
                Err(ValidationError::invalid_format(
                    "preferred_language",
                    "expected a two-letter language code",
                ))
            }
        }
    }
}

/// Language used when the member does not pick one.
pub const DEFAULT_LANGUAGE: &str = "en";

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn personal_info_trims_names() {
        let info = PersonalInfo::new(" Sara ", "Ali", date(1990, 5, 1), Gender::Female, date(2024, 1, 1))
            .unwrap();
        assert_eq!(info.first_name(), "Sara");
        assert_eq!(info.full_name(), "Sara Ali");
    }

    #[test]
    fn personal_info_rejects_future_birth_date() {
        let err = PersonalInfo::new("A", "B", date(2030, 1, 1), Gender::Male, date(2024, 1, 1))
            .unwrap_err();
        assert_eq!(err.field(), "date_of_birth");
    }

    #[test]
    fn personal_info_rejects_blank_names() {
        assert!(PersonalInfo::new("", "B", date(1990, 1, 1), Gender::Male, date(2024, 1, 1)).is_err());
        assert!(PersonalInfo::new("A", "  ", date(1990, 1, 1), Gender::Male, date(2024, 1, 1)).is_err());
    }

    #[test]
    fn age_counts_only_completed_years() {
        let info = PersonalInfo::new("A", "B", date(2010, 6, 15), Gender::Male, date(2024, 1, 1))
            .unwrap();
        assert_eq!(info.age_on(date(2023, 6, 14)), 12);
        assert_eq!(info.age_on(date(2023, 6, 15)), 13);
    }

    #[test]
    fn contact_info_lowercases_email() {
        let contact = ContactInfo::new("Sara@Example.COM", None).unwrap();
        assert_eq!(contact.email(), "sara@example.com");
    }

    #[test]
    fn contact_info_rejects_bad_email() {
        assert!(ContactInfo::new("no-at-sign", None).is_err());
        assert!(ContactInfo::new("a@b", None).is_err());
        assert!(ContactInfo::new("a@@b.com", None).is_err());
        assert!(ContactInfo::new("", None).is_err());
    }

    #[test]
    fn contact_info_validates_phone() {
        assert!(ContactInfo::new("a@b.com", Some("+966 50 123 4567".to_string())).is_ok());
        assert!(ContactInfo::new("a@b.com", Some("call me".to_string())).is_err());
        assert_eq!(
            ContactInfo::new("a@b.com", Some("   ".to_string())).unwrap().phone(),
            None
        );
    }

    #[test]
    fn membership_number_has_prefix() {
        let number = MembershipNumber::generate();
        assert!(number.as_str().starts_with("GYM-"));
        assert_eq!(number.as_str().len(), 12);
    }

    #[test]
    fn language_defaults_and_validates() {
        assert_eq!(normalize_language(None).unwrap(), "en");
        assert_eq!(normalize_language(Some("AR".to_string())).unwrap(), "ar");
        assert!(normalize_language(Some("english".to_string())).is_err());
    }

    #[test]
    fn gender_parses_case_insensitively() {
        assert_eq!("Female".parse::<Gender>().unwrap(), Gender::Female);
        assert!("x".parse::<Gender>().is_err());
    }
}
