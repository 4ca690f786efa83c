//! GetUserWorkoutsHandler - Paged sessions for one member.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::application::dispatcher::{Request, RequestHandler};
use crate::application::validation::{Rules, Validate};
use crate::application::views::WorkoutView;
use crate::domain::foundation::{
    DomainError, FieldError, PageRequest, PaginatedResult, TrainerId, UserId,
};
use crate::domain::workout::WorkoutStatus;
use crate::ports::{TrainerRepository, UserRepository, WorkoutRepository};

#[derive(Debug, Clone)]
pub struct GetUserWorkoutsQuery {
    pub user_id: UserId,
    pub status: Option<WorkoutStatus>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl Validate for GetUserWorkoutsQuery {
    fn validate(&self) -> Vec<FieldError> {
        Rules::new()
            .parsed(PageRequest::from_params(self.page, self.page_size))
            .finish()
    }
}

impl Request for GetUserWorkoutsQuery {
    type Output = PaginatedResult<WorkoutView>;
    const NAME: &'static str = "GetUserWorkouts";
}

/// Trainer names for the whole page are resolved with one batch lookup.
pub struct GetUserWorkoutsHandler {
    users: Arc<dyn UserRepository>,
    workouts: Arc<dyn WorkoutRepository>,
    trainers: Arc<dyn TrainerRepository>,
}

impl GetUserWorkoutsHandler {
    pub fn new(
        users: Arc<dyn UserRepository>,
        workouts: Arc<dyn WorkoutRepository>,
        trainers: Arc<dyn TrainerRepository>,
    ) -> Self {
        Self {
            users,
            workouts,
            trainers,
        }
    }
}

#[async_trait]
impl RequestHandler<GetUserWorkoutsQuery> for GetUserWorkoutsHandler {
    async fn handle(
        &self,
        query: GetUserWorkoutsQuery,
    ) -> Result<PaginatedResult<WorkoutView>, DomainError> {
        let page = PageRequest::from_params(query.page, query.page_size)?;
        if !self.users.exists(&query.user_id).await? {
            return Err(DomainError::not_found("User", query.user_id));
        }

        let sessions = self
            .workouts
            .get_paginated_for_user(&query.user_id, query.status, page)
            .await?;

        let mut trainer_ids: Vec<TrainerId> = sessions
            .items
            .iter()
            .filter_map(|s| s.trainer_id().copied())
            .collect();
        trainer_ids.sort();
        trainer_ids.dedup();

        let names: HashMap<TrainerId, String> = if trainer_ids.is_empty() {
            HashMap::new()
        } else {
            self.trainers
                .get_many(&trainer_ids)
                .await?
                .into_iter()
                .map(|t| (*t.id(), t.display_name()))
                .collect()
        };

        Ok(sessions.map(|session| {
            let name = session.trainer_id().and_then(|id| names.get(id).cloned());
            WorkoutView::new(&session, name)
        }))
    }
}
