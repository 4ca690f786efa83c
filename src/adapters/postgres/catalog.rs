//! PostgreSQL implementations of PlanRepository and TrainerRepository.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::session::{corrupt_row, driver_error, PgSession};
use crate::domain::foundation::{
    Currency, DomainError, Money, PageRequest, PaginatedResult, PlanId, Timestamp, TrainerId,
};
use crate::domain::subscription::SubscriptionPlan;
use crate::domain::trainer::Trainer;
use crate::ports::{PlanFilter, PlanRepository, TrainerRepository};

// ════════════════════════════════════════════════════════════════════════════
// Plans
// ════════════════════════════════════════════════════════════════════════════

const PLAN_COLUMNS: &str = "id, name, description, price_cents, currency, duration_days, \
     features, is_active, created_at, updated_at";

pub struct PostgresPlanRepository {
    session: Arc<PgSession>,
}

impl PostgresPlanRepository {
    pub fn new(session: Arc<PgSession>) -> Self {
        Self { session }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct PlanRow {
    id: Uuid,
    name: String,
    description: Option<String>,
    price_cents: i64,
    currency: String,
    duration_days: i32,
    features: Vec<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<PlanRow> for SubscriptionPlan {
    type Error = DomainError;

    fn try_from(row: PlanRow) -> Result<Self, Self::Error> {
        let price = Currency::new(row.currency.trim())
            .and_then(|currency| Money::new(row.price_cents, currency))
            .map_err(|e| corrupt_row("SubscriptionPlan", "price", e))?;
        let duration_days = u32::try_from(row.duration_days)
            .map_err(|e| corrupt_row("SubscriptionPlan", "duration_days", e))?;

        Ok(SubscriptionPlan::reconstitute(
            PlanId::from_uuid(row.id),
            row.name,
            row.description,
            price,
            duration_days,
            row.features,
            row.is_active,
            Timestamp::from_datetime(row.created_at),
            Timestamp::from_datetime(row.updated_at),
        ))
    }
}

#[async_trait]
impl PlanRepository for PostgresPlanRepository {
    async fn get_by_id(&self, id: &PlanId) -> Result<Option<SubscriptionPlan>, DomainError> {
        let sql = format!(
            "SELECT {} FROM subscription_plans WHERE id = $1{}",
            PLAN_COLUMNS,
            self.session.lock_clause()
        );
        self.session
            .fetch_optional(sqlx::query_as::<_, PlanRow>(&sql).bind(id.as_uuid()))
            .await
            .map_err(|e| driver_error("load plan", e))?
            .map(SubscriptionPlan::try_from)
            .transpose()
    }

    async fn exists(&self, id: &PlanId) -> Result<bool, DomainError> {
        let count = self
            .session
            .count(
                sqlx::query_as("SELECT COUNT(*) FROM subscription_plans WHERE id = $1")
                    .bind(id.as_uuid()),
            )
            .await
            .map_err(|e| driver_error("check plan", e))?;
        Ok(count > 0)
    }

    async fn add(&self, plan: &SubscriptionPlan) -> Result<(), DomainError> {
        self.session
            .execute(
                sqlx::query(
                    r#"
                    INSERT INTO subscription_plans (
                        id, name, description, price_cents, currency, duration_days,
                        features, is_active, created_at, updated_at
                    ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                    "#,
                )
                .bind(plan.id().as_uuid())
                .bind(plan.name())
                .bind(plan.description())
                .bind(plan.price().amount_cents())
                .bind(plan.price().currency().as_str())
                .bind(plan.duration_days() as i32)
                .bind(plan.features())
                .bind(plan.is_active())
                .bind(plan.created_at().as_datetime())
                .bind(plan.updated_at().as_datetime()),
            )
            .await
            .map_err(|e| driver_error("insert plan", e))?;
        Ok(())
    }

    async fn update(&self, plan: &SubscriptionPlan) -> Result<(), DomainError> {
        let result = self
            .session
            .execute(
                sqlx::query(
                    r#"
                    UPDATE subscription_plans SET
                        name = $2,
                        description = $3,
                        price_cents = $4,
                        currency = $5,
                        duration_days = $6,
                        features = $7,
                        is_active = $8,
                        updated_at = $9
                    WHERE id = $1
                    "#,
                )
                .bind(plan.id().as_uuid())
                .bind(plan.name())
                .bind(plan.description())
                .bind(plan.price().amount_cents())
                .bind(plan.price().currency().as_str())
                .bind(plan.duration_days() as i32)
                .bind(plan.features())
                .bind(plan.is_active())
                .bind(plan.updated_at().as_datetime()),
            )
            .await
            .map_err(|e| driver_error("update plan", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found("SubscriptionPlan", plan.id()));
        }
        Ok(())
    }

    async fn get_paginated(
        &self,
        filter: PlanFilter,
        page: PageRequest,
    ) -> Result<PaginatedResult<SubscriptionPlan>, DomainError> {
        let total = self
            .session
            .count(
                sqlx::query_as(
                    "SELECT COUNT(*) FROM subscription_plans WHERE (NOT $1 OR is_active)",
                )
                .bind(filter.active_only),
            )
            .await
            .map_err(|e| driver_error("count plans", e))?;

        let sql = format!(
            "SELECT {} FROM subscription_plans WHERE (NOT $1 OR is_active) \
             ORDER BY price_cents, name LIMIT $2 OFFSET $3",
            PLAN_COLUMNS
        );
        let plans = self
            .session
            .fetch_all(
                sqlx::query_as::<_, PlanRow>(&sql)
                    .bind(filter.active_only)
                    .bind(page.limit() as i64)
                    .bind(page.offset() as i64),
            )
            .await
            .map_err(|e| driver_error("list plans", e))?
            .into_iter()
            .map(SubscriptionPlan::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(PaginatedResult::new(plans, total, page))
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Trainers
// ════════════════════════════════════════════════════════════════════════════

const TRAINER_COLUMNS: &str =
    "id, first_name, last_name, email, specialization, is_active, created_at, updated_at";

pub struct PostgresTrainerRepository {
    session: Arc<PgSession>,
}

impl PostgresTrainerRepository {
    pub fn new(session: Arc<PgSession>) -> Self {
        Self { session }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct TrainerRow {
    id: Uuid,
    first_name: String,
    last_name: String,
    email: String,
    specialization: Option<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<TrainerRow> for Trainer {
    fn from(row: TrainerRow) -> Self {
        Trainer::reconstitute(
            TrainerId::from_uuid(row.id),
            row.first_name,
            row.last_name,
            row.email,
            row.specialization,
            row.is_active,
            Timestamp::from_datetime(row.created_at),
            Timestamp::from_datetime(row.updated_at),
        )
    }
}

#[async_trait]
impl TrainerRepository for PostgresTrainerRepository {
    async fn get_by_id(&self, id: &TrainerId) -> Result<Option<Trainer>, DomainError> {
        let sql = format!("SELECT {} FROM trainers WHERE id = $1", TRAINER_COLUMNS);
        let row = self
            .session
            .fetch_optional(sqlx::query_as::<_, TrainerRow>(&sql).bind(id.as_uuid()))
            .await
            .map_err(|e| driver_error("load trainer", e))?;
        Ok(row.map(Trainer::from))
    }

    async fn exists(&self, id: &TrainerId) -> Result<bool, DomainError> {
        let count = self
            .session
            .count(sqlx::query_as("SELECT COUNT(*) FROM trainers WHERE id = $1").bind(id.as_uuid()))
            .await
            .map_err(|e| driver_error("check trainer", e))?;
        Ok(count > 0)
    }

    async fn add(&self, trainer: &Trainer) -> Result<(), DomainError> {
        self.session
            .execute(
                sqlx::query(
                    r#"
                    INSERT INTO trainers (
                        id, first_name, last_name, email, specialization, is_active,
                        created_at, updated_at
                    ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                    "#,
                )
                .bind(trainer.id().as_uuid())
                .bind(trainer.first_name())
                .bind(trainer.last_name())
                .bind(trainer.email())
                .bind(trainer.specialization())
                .bind(trainer.is_active())
                .bind(trainer.created_at().as_datetime())
                .bind(trainer.updated_at().as_datetime()),
            )
            .await
            .map_err(|e| driver_error("insert trainer", e))?;
        Ok(())
    }

    async fn update(&self, trainer: &Trainer) -> Result<(), DomainError> {
        let result = self
            .session
            .execute(
                sqlx::query(
                    r#"
                    UPDATE trainers SET
                        first_name = $2,
                        last_name = $3,
                        email = $4,
                        specialization = $5,
                        is_active = $6,
                        updated_at = $7
                    WHERE id = $1
                    "#,
                )
                .bind(trainer.id().as_uuid())
                .bind(trainer.first_name())
                .bind(trainer.last_name())
                .bind(trainer.email())
                .bind(trainer.specialization())
                .bind(trainer.is_active())
                .bind(trainer.updated_at().as_datetime()),
            )
            .await
            .map_err(|e| driver_error("update trainer", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found("Trainer", trainer.id()));
        }
        Ok(())
    }

    async fn get_many(&self, ids: &[TrainerId]) -> Result<Vec<Trainer>, DomainError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let uuids: Vec<Uuid> = ids.iter().map(|id| *id.as_uuid()).collect();
        let sql = format!("SELECT {} FROM trainers WHERE id = ANY($1)", TRAINER_COLUMNS);
        let rows = self
            .session
            .fetch_all(sqlx::query_as::<_, TrainerRow>(&sql).bind(&uuids))
            .await
            .map_err(|e| driver_error("load trainers", e))?;
        Ok(rows.into_iter().map(Trainer::from).collect())
    }
}
