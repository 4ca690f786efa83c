//! User repository port.
//!
//! Persists the User aggregate together with its subscriptions. Every method
//! runs inside the transaction of the scope the repository came from, if one
//! is open.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, PageRequest, PaginatedResult, UserId};
use crate::domain::user::{User, UserStatus};

/// Filters for listing users.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFilter {
    pub status: Option<UserStatus>,
    /// Case-insensitive match against name, e-mail and membership number.
    pub search: Option<String>,
}

impl UserFilter {
    /// In-process evaluation of the filter, shared by adapters that cannot
    /// push it down to storage.
    pub fn matches(&self, user: &User) -> bool {
        if let Some(status) = self.status {
            if user.status() != status {
                return false;
            }
        }
        match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(term) => {
                let term = term.to_lowercase();
                user.personal_info().full_name().to_lowercase().contains(&term)
                    || user.email().contains(&term)
                    || user.membership_number().as_str().to_lowercase().contains(&term)
            }
        }
    }
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Returns `None` if not found.
    async fn get_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError>;

    async fn exists(&self, id: &UserId) -> Result<bool, DomainError>;

    /// Insert a new user and its subscriptions.
    ///
    /// # Errors
    ///
    /// - `DuplicateConstraint` if the e-mail is already registered
    async fn add(&self, user: &User) -> Result<(), DomainError>;

    /// Persist changes to an existing user, including added or cancelled
    /// subscriptions.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the user does not exist
    /// - `DuplicateConstraint` if the new e-mail belongs to someone else
    async fn update(&self, user: &User) -> Result<(), DomainError>;

    /// Lookup by (already normalized) e-mail.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// True when no user other than `excluding` holds `email`.
    async fn is_email_unique(
        &self,
        email: &str,
        excluding: Option<&UserId>,
    ) -> Result<bool, DomainError>;

    /// Page of users ordered by creation time, newest first.
    async fn get_paginated(
        &self,
        filter: &UserFilter,
        page: PageRequest,
    ) -> Result<PaginatedResult<User>, DomainError>;
}
