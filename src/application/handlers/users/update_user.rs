//! UpdateUserHandler - Replaces a member's personal and contact details.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::application::dispatcher::{Request, RequestHandler};
use crate::application::transaction::in_transaction;
use crate::application::validation::{Rules, Validate};
use crate::domain::foundation::{DomainError, FieldError, Timestamp, UserId};
use crate::domain::user::{normalize_language, ContactInfo, Gender, PersonalInfo, MAX_NAME_LENGTH};
use crate::ports::{UnitOfWork, UserRepository};

#[derive(Debug, Clone)]
pub struct UpdateUserCommand {
    pub user_id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
    /// `None` keeps the current language.
    pub preferred_language: Option<String>,
}

impl Validate for UpdateUserCommand {
    fn validate(&self) -> Vec<FieldError> {
        Rules::new()
            .required("first_name", &self.first_name)
            .max_length("first_name", &self.first_name, MAX_NAME_LENGTH)
            .required("last_name", &self.last_name)
            .max_length("last_name", &self.last_name, MAX_NAME_LENGTH)
            .email("email", &self.email)
            .parsed(normalize_language(self.preferred_language.clone()))
            .finish()
    }
}

impl Request for UpdateUserCommand {
    type Output = ();
    const NAME: &'static str = "UpdateUser";
}

/// Re-checks e-mail uniqueness excluding the member's own id, then swaps
/// both value objects in one transition.
pub struct UpdateUserHandler {
    uow: Arc<dyn UnitOfWork>,
    users: Arc<dyn UserRepository>,
}

impl UpdateUserHandler {
    pub fn new(uow: Arc<dyn UnitOfWork>, users: Arc<dyn UserRepository>) -> Self {
        Self { uow, users }
    }
}

#[async_trait]
impl RequestHandler<UpdateUserCommand> for UpdateUserHandler {
    async fn handle(&self, cmd: UpdateUserCommand) -> Result<(), DomainError> {
        let personal = PersonalInfo::new(
            cmd.first_name,
            cmd.last_name,
            cmd.date_of_birth,
            cmd.gender,
            Timestamp::now().date(),
        )?;
        let contact = ContactInfo::new(cmd.email, cmd.phone)?;
        let user_id = cmd.user_id;
        let language = cmd.preferred_language;

        in_transaction(self.uow.as_ref(), async move {
            let mut user = self
                .users
                .get_by_id(&user_id)
                .await?
                .ok_or_else(|| DomainError::not_found("User", user_id))?;

            if !self
                .users
                .is_email_unique(contact.email(), Some(&user_id))
                .await?
            {
                return Err(DomainError::duplicate("email", contact.email()));
            }

            user.update_info(personal, contact, language)?;
            self.users.update(&user).await
        })
        .await?;

        tracing::info!(user_id = %user_id, "User details updated");
        Ok(())
    }
}
