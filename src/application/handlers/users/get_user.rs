//! GetUserByIdHandler - Query handler for a single member.

use std::sync::Arc;

use async_trait::async_trait;

use crate::application::dispatcher::{Request, RequestHandler};
use crate::application::validation::Validate;
use crate::application::views::UserView;
use crate::domain::foundation::{DomainError, FieldError, UserId};
use crate::ports::UserRepository;

#[derive(Debug, Clone)]
pub struct GetUserByIdQuery {
    pub user_id: UserId,
}

impl Validate for GetUserByIdQuery {
    fn validate(&self) -> Vec<FieldError> {
        Vec::new()
    }
}

impl Request for GetUserByIdQuery {
    type Output = UserView;
    const NAME: &'static str = "GetUserById";
}

pub struct GetUserByIdHandler {
    users: Arc<dyn UserRepository>,
}

impl GetUserByIdHandler {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl RequestHandler<GetUserByIdQuery> for GetUserByIdHandler {
    async fn handle(&self, query: GetUserByIdQuery) -> Result<UserView, DomainError> {
        let user = self
            .users
            .get_by_id(&query.user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", query.user_id))?;
        Ok(UserView::from(&user))
    }
}
