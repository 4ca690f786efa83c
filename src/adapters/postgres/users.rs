//! PostgreSQL implementation of UserRepository.
//!
//! The user row and its `user_subscriptions` rows are one aggregate: loads
//! read both, writes upsert the subscriptions alongside the user row.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use super::session::{
    contains_pattern, corrupt_row, driver_error, violated_unique_constraint, PgSession,
};
use crate::domain::foundation::{
    Currency, DomainError, Money, PageRequest, PaginatedResult, PlanId, SubscriptionId, Timestamp,
    UserId,
};
use crate::domain::user::{
    ContactInfo, Gender, MembershipNumber, PersonalInfo, SubscriptionStatus, User, UserStatus,
    UserSubscription,
};
use crate::ports::{UserFilter, UserRepository};

const USER_COLUMNS: &str = "id, membership_number, first_name, last_name, email, phone, \
     date_of_birth, gender, status, preferred_language, created_at, updated_at";

const SUBSCRIPTION_COLUMNS: &str = "id, user_id, plan_id, plan_name, price_cents, currency, \
     start_date, end_date, status, cancelled_at, created_at, updated_at";

/// Filter clause shared by the page and count queries. `$1` is the status,
/// `$2` the search pattern.
const USER_FILTER: &str = "($1::text IS NULL OR status = $1) \
     AND ($2::text IS NULL \
          OR lower(first_name || ' ' || last_name) LIKE $2 \
          OR email LIKE $2 \
          OR lower(membership_number) LIKE $2)";

pub struct PostgresUserRepository {
    session: Arc<PgSession>,
}

impl PostgresUserRepository {
    pub fn new(session: Arc<PgSession>) -> Self {
        Self { session }
    }

    async fn subscriptions_for(
        &self,
        user_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<UserSubscription>>, DomainError> {
        let sql = format!(
            "SELECT {} FROM user_subscriptions WHERE user_id = ANY($1) ORDER BY start_date",
            SUBSCRIPTION_COLUMNS
        );
        let rows = self
            .session
            .fetch_all(sqlx::query_as::<_, SubscriptionRow>(&sql).bind(user_ids))
            .await
            .map_err(|e| driver_error("load subscriptions", e))?;

        let mut by_user: HashMap<Uuid, Vec<UserSubscription>> = HashMap::new();
        for row in rows {
            let user_id = row.user_id;
            by_user.entry(user_id).or_default().push(row.try_into()?);
        }
        Ok(by_user)
    }

    async fn assemble(&self, rows: Vec<UserRow>) -> Result<Vec<User>, DomainError> {
        let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
        let mut subscriptions = self.subscriptions_for(&ids).await?;
        rows.into_iter()
            .map(|row| {
                let owned = subscriptions.remove(&row.id).unwrap_or_default();
                row.into_user(owned)
            })
            .collect()
    }

    async fn save_subscriptions(&self, user: &User) -> Result<(), DomainError> {
        for subscription in user.subscriptions() {
            self.session
                .execute(
                    sqlx::query(
                        r#"
                        INSERT INTO user_subscriptions (
                            id, user_id, plan_id, plan_name, price_cents, currency,
                            start_date, end_date, status, cancelled_at, created_at, updated_at
                        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
                        ON CONFLICT (id) DO UPDATE SET
                            status = EXCLUDED.status,
                            cancelled_at = EXCLUDED.cancelled_at,
                            updated_at = EXCLUDED.updated_at
                        "#,
                    )
                    .bind(subscription.id().as_uuid())
                    .bind(subscription.user_id().as_uuid())
                    .bind(subscription.plan_id().as_uuid())
                    .bind(subscription.plan_name())
                    .bind(subscription.price().amount_cents())
                    .bind(subscription.price().currency().as_str())
                    .bind(subscription.start_date().as_datetime())
                    .bind(subscription.end_date().as_datetime())
                    .bind(subscription.stored_status().as_str())
                    .bind(subscription.cancelled_at().map(|t| *t.as_datetime()))
                    .bind(subscription.created_at().as_datetime())
                    .bind(subscription.updated_at().as_datetime()),
                )
                .await
                .map_err(|e| driver_error("save subscription", e))?;
        }
        Ok(())
    }
}

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    membership_number: String,
    first_name: String,
    last_name: String,
    email: String,
    phone: Option<String>,
    date_of_birth: NaiveDate,
    gender: String,
    status: String,
    preferred_language: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self, subscriptions: Vec<UserSubscription>) -> Result<User, DomainError> {
        let gender: Gender = self
            .gender
            .parse()
            .map_err(|e| corrupt_row("User", "gender", e))?;
        let status = UserStatus::parse(&self.status)
            .ok_or_else(|| corrupt_row("User", "status", &self.status))?;
        let personal = PersonalInfo::new(
            self.first_name,
            self.last_name,
            self.date_of_birth,
            gender,
            Timestamp::now().date(),
        )
        .map_err(|e| corrupt_row("User", "personal_info", e))?;
        let contact = ContactInfo::new(self.email, self.phone)
            .map_err(|e| corrupt_row("User", "contact_info", e))?;

        Ok(User::reconstitute(
            UserId::from_uuid(self.id),
            personal,
            contact,
            MembershipNumber::from_stored(self.membership_number),
            status,
            self.preferred_language,
            subscriptions,
            Timestamp::from_datetime(self.created_at),
            Timestamp::from_datetime(self.updated_at),
        ))
    }
}

#[derive(Debug, sqlx::FromRow)]
struct SubscriptionRow {
    id: Uuid,
    user_id: Uuid,
    plan_id: Uuid,
    plan_name: String,
    price_cents: i64,
    currency: String,
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
    status: String,
    cancelled_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<SubscriptionRow> for UserSubscription {
    type Error = DomainError;

    fn try_from(row: SubscriptionRow) -> Result<Self, Self::Error> {
        let status = SubscriptionStatus::parse(&row.status)
            .ok_or_else(|| corrupt_row("UserSubscription", "status", &row.status))?;
        let price = Currency::new(row.currency.trim())
            .and_then(|currency| Money::new(row.price_cents, currency))
            .map_err(|e| corrupt_row("UserSubscription", "price", e))?;

        Ok(UserSubscription::reconstitute(
            SubscriptionId::from_uuid(row.id),
            UserId::from_uuid(row.user_id),
            PlanId::from_uuid(row.plan_id),
            row.plan_name,
            price,
            Timestamp::from_datetime(row.start_date),
            Timestamp::from_datetime(row.end_date),
            status,
            row.cancelled_at.map(Timestamp::from_datetime),
            Timestamp::from_datetime(row.created_at),
            Timestamp::from_datetime(row.updated_at),
        ))
    }
}

fn user_write_error(context: &str, user: &User, err: sqlx::Error) -> DomainError {
    match violated_unique_constraint(&err).as_deref() {
        Some("users_email_key") => DomainError::duplicate("email", user.email()),
        Some("users_membership_number_key") => {
            DomainError::duplicate("membership_number", user.membership_number())
        }
        _ => driver_error(context, err),
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn get_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        let sql = format!(
            "SELECT {} FROM users WHERE id = $1{}",
            USER_COLUMNS,
            self.session.lock_clause()
        );
        let row = self
            .session
            .fetch_optional(sqlx::query_as::<_, UserRow>(&sql).bind(id.as_uuid()))
            .await
            .map_err(|e| driver_error("load user", e))?;

        match row {
            Some(row) => Ok(self.assemble(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn exists(&self, id: &UserId) -> Result<bool, DomainError> {
        let count = self
            .session
            .count(sqlx::query_as("SELECT COUNT(*) FROM users WHERE id = $1").bind(id.as_uuid()))
            .await
            .map_err(|e| driver_error("check user", e))?;
        Ok(count > 0)
    }

    async fn add(&self, user: &User) -> Result<(), DomainError> {
        let personal = user.personal_info();
        self.session
            .execute(
                sqlx::query(
                    r#"
                    INSERT INTO users (
                        id, membership_number, first_name, last_name, email, phone,
                        date_of_birth, gender, status, preferred_language, created_at, updated_at
                    ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
                    "#,
                )
                .bind(user.id().as_uuid())
                .bind(user.membership_number().as_str())
                .bind(personal.first_name())
                .bind(personal.last_name())
                .bind(user.email())
                .bind(user.contact_info().phone())
                .bind(personal.date_of_birth())
                .bind(personal.gender().to_string())
                .bind(user.status().as_str())
                .bind(user.preferred_language())
                .bind(user.created_at().as_datetime())
                .bind(user.updated_at().as_datetime()),
            )
            .await
            .map_err(|e| user_write_error("insert user", user, e))?;

        self.save_subscriptions(user).await
    }

    async fn update(&self, user: &User) -> Result<(), DomainError> {
        let personal = user.personal_info();
        let result = self
            .session
            .execute(
                sqlx::query(
                    r#"
                    UPDATE users SET
                        first_name = $2,
                        last_name = $3,
                        email = $4,
                        phone = $5,
                        date_of_birth = $6,
                        gender = $7,
                        status = $8,
                        preferred_language = $9,
                        updated_at = $10
                    WHERE id = $1
                    "#,
                )
                .bind(user.id().as_uuid())
                .bind(personal.first_name())
                .bind(personal.last_name())
                .bind(user.email())
                .bind(user.contact_info().phone())
                .bind(personal.date_of_birth())
                .bind(personal.gender().to_string())
                .bind(user.status().as_str())
                .bind(user.preferred_language())
                .bind(user.updated_at().as_datetime()),
            )
            .await
            .map_err(|e| user_write_error("update user", user, e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found("User", user.id()));
        }
        self.save_subscriptions(user).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let sql = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);
        let row = self
            .session
            .fetch_optional(sqlx::query_as::<_, UserRow>(&sql).bind(email.to_lowercase()))
            .await
            .map_err(|e| driver_error("find user by email", e))?;

        match row {
            Some(row) => Ok(self.assemble(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn is_email_unique(
        &self,
        email: &str,
        excluding: Option<&UserId>,
    ) -> Result<bool, DomainError> {
        let count = self
            .session
            .count(
                sqlx::query_as(
                    "SELECT COUNT(*) FROM users WHERE email = $1 AND ($2::uuid IS NULL OR id <> $2)",
                )
                .bind(email.to_lowercase())
                .bind(excluding.map(|id| *id.as_uuid())),
            )
            .await
            .map_err(|e| driver_error("check e-mail", e))?;
        Ok(count == 0)
    }

    async fn get_paginated(
        &self,
        filter: &UserFilter,
        page: PageRequest,
    ) -> Result<PaginatedResult<User>, DomainError> {
        let status = filter.status.map(|s| s.as_str());
        let pattern = filter
            .search
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
            .map(contains_pattern);

        let count_sql = format!("SELECT COUNT(*) FROM users WHERE {}", USER_FILTER);
        let total = self
            .session
            .count(
                sqlx::query_as(&count_sql)
                    .bind(status)
                    .bind(pattern.as_deref()),
            )
            .await
            .map_err(|e| driver_error("count users", e))?;

        let page_sql = format!(
            "SELECT {} FROM users WHERE {} ORDER BY created_at DESC, id LIMIT $3 OFFSET $4",
            USER_COLUMNS, USER_FILTER
        );
        let rows = self
            .session
            .fetch_all(
                sqlx::query_as::<_, UserRow>(&page_sql)
                    .bind(status)
                    .bind(pattern.as_deref())
                    .bind(page.limit() as i64)
                    .bind(page.offset() as i64),
            )
            .await
            .map_err(|e| driver_error("list users", e))?;

        let users = self.assemble(rows).await?;
        Ok(PaginatedResult::new(users, total, page))
    }
}
