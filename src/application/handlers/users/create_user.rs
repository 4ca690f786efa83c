//! CreateUserHandler - Registers a new member.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::application::dispatcher::{Request, RequestHandler};
use crate::application::transaction::in_transaction;
use crate::application::validation::{Rules, Validate};
use crate::domain::foundation::{DomainError, FieldError, Timestamp, UserId};
use crate::domain::user::{
    normalize_language, ContactInfo, Gender, PersonalInfo, User, MAX_NAME_LENGTH,
};
use crate::ports::{NotificationSender, UnitOfWork, UserRepository};

/// Command to register a member.
#[derive(Debug, Clone)]
pub struct CreateUserCommand {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
    pub preferred_language: Option<String>,
}

impl Validate for CreateUserCommand {
    fn validate(&self) -> Vec<FieldError> {
        Rules::new()
            .required("first_name", &self.first_name)
            .max_length("first_name", &self.first_name, MAX_NAME_LENGTH)
            .required("last_name", &self.last_name)
            .max_length("last_name", &self.last_name, MAX_NAME_LENGTH)
            .email("email", &self.email)
            .check(
                "date_of_birth",
                self.date_of_birth <= Timestamp::now().date(),
                "cannot be in the future",
            )
            .parsed(normalize_language(self.preferred_language.clone()))
            .finish()
    }
}

impl Request for CreateUserCommand {
    type Output = UserId;
    const NAME: &'static str = "CreateUser";
}

/// Handler for member registration.
///
/// E-mail uniqueness is checked inside the transaction; the storage
/// constraint catches a concurrent registration that slips past it. The
/// welcome message goes out only after commit and its failure does not
/// undo the registration.
pub struct CreateUserHandler {
    uow: Arc<dyn UnitOfWork>,
    users: Arc<dyn UserRepository>,
    notifier: Arc<dyn NotificationSender>,
}

impl CreateUserHandler {
    pub fn new(
        uow: Arc<dyn UnitOfWork>,
        users: Arc<dyn UserRepository>,
        notifier: Arc<dyn NotificationSender>,
    ) -> Self {
        Self {
            uow,
            users,
            notifier,
        }
    }
}

#[async_trait]
impl RequestHandler<CreateUserCommand> for CreateUserHandler {
    async fn handle(&self, cmd: CreateUserCommand) -> Result<UserId, DomainError> {
        let personal = PersonalInfo::new(
            cmd.first_name,
            cmd.last_name,
            cmd.date_of_birth,
            cmd.gender,
            Timestamp::now().date(),
        )?;
        let contact = ContactInfo::new(cmd.email, cmd.phone)?;
        let language = cmd.preferred_language;

        let user = in_transaction(self.uow.as_ref(), async move {
            if !self.users.is_email_unique(contact.email(), None).await? {
                return Err(DomainError::duplicate("email", contact.email()));
            }

            let user = User::create_new(personal, contact, language)?;
            self.users.add(&user).await?;
            Ok(user)
        })
        .await?;

        tracing::info!(
            user_id = %user.id(),
            membership_number = %user.membership_number(),
            "User registered"
        );

        if let Err(err) = self
            .notifier
            .send_welcome(user.email(), user.first_name())
            .await
        {
            tracing::warn!(user_id = %user.id(), error = %err, "Welcome notification failed");
        }

        Ok(*user.id())
    }
}
