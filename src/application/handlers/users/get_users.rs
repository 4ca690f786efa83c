//! GetUsersHandler - Paged member listing.

use std::sync::Arc;

use async_trait::async_trait;

use crate::application::dispatcher::{Request, RequestHandler};
use crate::application::validation::{Rules, Validate};
use crate::application::views::UserView;
use crate::domain::foundation::{DomainError, FieldError, PageRequest, PaginatedResult};
use crate::domain::user::UserStatus;
use crate::ports::{UserFilter, UserRepository};

#[derive(Debug, Clone, Default)]
pub struct GetUsersQuery {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub status: Option<UserStatus>,
    pub search: Option<String>,
}

impl Validate for GetUsersQuery {
    fn validate(&self) -> Vec<FieldError> {
        Rules::new()
            .parsed(PageRequest::from_params(self.page, self.page_size))
            .finish()
    }
}

impl Request for GetUsersQuery {
    type Output = PaginatedResult<UserView>;
    const NAME: &'static str = "GetUsers";
}

pub struct GetUsersHandler {
    users: Arc<dyn UserRepository>,
}

impl GetUsersHandler {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl RequestHandler<GetUsersQuery> for GetUsersHandler {
    async fn handle(&self, query: GetUsersQuery) -> Result<PaginatedResult<UserView>, DomainError> {
        let page = PageRequest::from_params(query.page, query.page_size)?;
        let filter = UserFilter {
            status: query.status,
            search: query.search,
        };

        let users = self.users.get_paginated(&filter, page).await?;
        Ok(users.map(|user| UserView::from(&user)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::TestContext;
    use crate::domain::foundation::ErrorCode;

    #[tokio::test]
    async fn search_narrows_page_and_total() {
        let ctx = TestContext::new();
        ctx.seed_user("alpha@example.com").await;
        ctx.seed_user("beta@example.com").await;
        ctx.seed_user("alpine@example.com").await;

        let page = ctx
            .dispatcher
            .send(GetUsersQuery {
                search: Some("ALP".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(page.total_count, 2);
        assert!(page.items.iter().all(|u| u.email.starts_with("alp")));
        assert!(!page.has_next_page);
    }

    #[tokio::test]
    async fn oversized_page_fails_the_gate() {
        let ctx = TestContext::new();

        let err = ctx
            .dispatcher
            .send(GetUsersQuery {
                page_size: Some(PageRequest::MAX_PAGE_SIZE + 1),
                ..Default::default()
            })
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }
}
