//! Request-scoped connection state shared by one scope's repositories.

use std::sync::atomic::{AtomicBool, Ordering};

use sqlx::postgres::{PgArguments, PgQueryResult, PgRow};
use sqlx::query::{Query, QueryAs};
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use tokio::sync::Mutex;

use crate::domain::foundation::DomainError;

/// SQLSTATE for `unique_violation`.
const UNIQUE_VIOLATION: &str = "23505";
/// SQLSTATE for `serialization_failure`.
const SERIALIZATION_FAILURE: &str = "40001";

/// One request's connection state.
///
/// Outside a transaction every statement runs on the pool. Between `begin`
/// and `commit`/`rollback` statements run on the held transaction. Dropping
/// the session with a transaction still held rolls it back.
pub struct PgSession {
    pool: PgPool,
    tx: Mutex<Option<Transaction<'static, Postgres>>>,
    active: AtomicBool,
}

impl PgSession {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            tx: Mutex::new(None),
            active: AtomicBool::new(false),
        }
    }

    pub fn in_transaction(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Row lock suffix for loads that may be followed by a write.
    pub fn lock_clause(&self) -> &'static str {
        if self.in_transaction() {
            " FOR UPDATE"
        } else {
            ""
        }
    }

    pub async fn begin(&self) -> Result<(), DomainError> {
        let mut slot = self.tx.lock().await;
        if slot.is_some() {
            return Err(DomainError::internal("A transaction is already active"));
        }
        let tx = self
            .pool
            .begin()
            .await
            .map_err(|e| driver_error("begin transaction", e))?;
        *slot = Some(tx);
        self.active.store(true, Ordering::Release);
        Ok(())
    }

    pub async fn commit(&self) -> Result<(), DomainError> {
        let tx = self.take_transaction("commit").await?;
        tx.commit().await.map_err(|e| match sql_state(&e).as_deref() {
            Some(SERIALIZATION_FAILURE) => {
                DomainError::concurrency_conflict("Transaction", "commit")
            }
            _ => driver_error("commit transaction", e),
        })
    }

    pub async fn rollback(&self) -> Result<(), DomainError> {
        let tx = self.take_transaction("roll back").await?;
        tx.rollback()
            .await
            .map_err(|e| driver_error("roll back transaction", e))
    }

    async fn take_transaction(
        &self,
        action: &str,
    ) -> Result<Transaction<'static, Postgres>, DomainError> {
        let tx = self.tx.lock().await.take();
        self.active.store(false, Ordering::Release);
        tx.ok_or_else(|| {
            DomainError::internal(format!("Cannot {} without an active transaction", action))
        })
    }

    pub async fn fetch_optional<'q, O>(
        &self,
        query: QueryAs<'q, Postgres, O, PgArguments>,
    ) -> Result<Option<O>, sqlx::Error>
    where
        O: Send + Unpin + for<'r> FromRow<'r, PgRow>,
    {
        let mut slot = self.tx.lock().await;
        match slot.as_mut() {
            Some(tx) => query.fetch_optional(&mut **tx).await,
            None => query.fetch_optional(&self.pool).await,
        }
    }

    pub async fn fetch_all<'q, O>(
        &self,
        query: QueryAs<'q, Postgres, O, PgArguments>,
    ) -> Result<Vec<O>, sqlx::Error>
    where
        O: Send + Unpin + for<'r> FromRow<'r, PgRow>,
    {
        let mut slot = self.tx.lock().await;
        match slot.as_mut() {
            Some(tx) => query.fetch_all(&mut **tx).await,
            None => query.fetch_all(&self.pool).await,
        }
    }

    /// Runs a `SELECT COUNT(*)` style query.
    pub async fn count<'q>(
        &self,
        query: QueryAs<'q, Postgres, (i64,), PgArguments>,
    ) -> Result<u64, sqlx::Error> {
        let mut slot = self.tx.lock().await;
        let (count,) = match slot.as_mut() {
            Some(tx) => query.fetch_one(&mut **tx).await?,
            None => query.fetch_one(&self.pool).await?,
        };
        Ok(count.max(0) as u64)
    }

    pub async fn execute<'q>(
        &self,
        query: Query<'q, Postgres, PgArguments>,
    ) -> Result<PgQueryResult, sqlx::Error> {
        let mut slot = self.tx.lock().await;
        match slot.as_mut() {
            Some(tx) => query.execute(&mut **tx).await,
            None => query.execute(&self.pool).await,
        }
    }
}

/// Logs a driver failure and wraps it as `DatabaseError`.
pub fn driver_error(context: &str, err: sqlx::Error) -> DomainError {
    tracing::error!(error = %err, context, "Database operation failed");
    DomainError::database(format!("Failed to {}: {}", context, err))
}

/// Name of the unique constraint `err` violated, if that is what happened.
pub fn violated_unique_constraint(err: &sqlx::Error) -> Option<String> {
    match err {
        sqlx::Error::Database(db_err) if sql_state(err).as_deref() == Some(UNIQUE_VIOLATION) => {
            db_err.constraint().map(str::to_string)
        }
        _ => None,
    }
}

fn sql_state(err: &sqlx::Error) -> Option<String> {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().map(|code| code.into_owned()),
        _ => None,
    }
}

/// Error for a stored value the domain no longer accepts.
pub fn corrupt_row(entity: &str, column: &str, detail: impl std::fmt::Display) -> DomainError {
    tracing::error!(entity, column, detail = %detail, "Stored row failed to load");
    DomainError::database(format!("Invalid {} value in {}: {}", column, entity, detail))
}

/// `%term%` pattern for `LIKE`, with wildcards in `term` escaped.
pub fn contains_pattern(term: &str) -> String {
    let escaped = term
        .to_lowercase()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("Sara"), "%sara%");
        assert_eq!(contains_pattern("50%_off"), "%50\\%\\_off%");
    }

    #[test]
    fn non_database_errors_are_not_unique_violations() {
        assert_eq!(violated_unique_constraint(&sqlx::Error::RowNotFound), None);
    }
}
