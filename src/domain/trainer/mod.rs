//! Trainer aggregate.
//!
//! Trainers are referenced by workout sessions. Their display name is
//! resolved into read models when sessions are listed.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{optional_text, required_text, DomainError, Timestamp, TrainerId};
use crate::domain::user::normalize_email;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trainer {
    id: TrainerId,
    first_name: String,
    last_name: String,
    email: String,
    specialization: Option<String>,
    is_active: bool,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl Trainer {
    pub fn create_new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: &str,
        specialization: Option<String>,
    ) -> Result<Self, DomainError> {
        let now = Timestamp::now();
        Ok(Self {
            id: TrainerId::new(),
            first_name: required_text("first_name", first_name)?,
            last_name: required_text("last_name", last_name)?,
            email: normalize_email(email)?,
            specialization: optional_text(specialization),
            is_active: true,
            created_at: now,
            updated_at: now,
        })
    }

    /// Reconstitute a trainer from persistence (no validation).
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: TrainerId,
        first_name: String,
        last_name: String,
        email: String,
        specialization: Option<String>,
        is_active: bool,
        created_at: Timestamp,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            id,
            first_name,
            last_name,
            email,
            specialization,
            is_active,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> &TrainerId {
        &self.id
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn specialization(&self) -> Option<&str> {
        self.specialization.as_deref()
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ErrorCode;

    #[test]
    fn create_new_normalizes_fields() {
        let trainer =
            Trainer::create_new(" Omar ", "Haddad", "Omar@Gym.com", Some("  ".to_string())).unwrap();

        assert_eq!(trainer.display_name(), "Omar Haddad");
        assert_eq!(trainer.email(), "omar@gym.com");
        assert_eq!(trainer.specialization(), None);
        assert!(trainer.is_active());
    }

    #[test]
    fn create_new_rejects_missing_name() {
        let err = Trainer::create_new("", "Haddad", "omar@gym.com", None).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }
}
