//! Scoped transaction runner.
//!
//! Commits only on the single success path. Every other exit rolls back and
//! returns the original error unchanged. If the caller abandons the future,
//! the scope's transaction is discarded when the scope is dropped.

use std::future::Future;

use crate::domain::foundation::DomainError;
use crate::ports::UnitOfWork;

/// Runs `work` between `begin` and `commit` on `uow`.
pub async fn in_transaction<T, F>(uow: &dyn UnitOfWork, work: F) -> Result<T, DomainError>
where
    F: Future<Output = Result<T, DomainError>>,
{
    uow.begin().await?;
    tracing::debug!("Transaction started");

    let value = match work.await {
        Ok(value) => value,
        Err(err) => {
            rollback_after(uow, &err).await;
            return Err(err);
        }
    };

    if let Err(err) = uow.commit().await {
        tracing::warn!(error = %err, "Commit failed");
        if uow.is_active() {
            rollback_after(uow, &err).await;
        }
        return Err(err);
    }

    tracing::debug!("Transaction committed");
    Ok(value)
}

async fn rollback_after(uow: &dyn UnitOfWork, cause: &DomainError) {
    match uow.rollback().await {
        Ok(()) => tracing::debug!(cause = %cause, "Transaction rolled back"),
        Err(rollback_err) => tracing::error!(
            cause = %cause,
            error = %rollback_err,
            "Rollback failed"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ErrorCode;
    use async_trait::async_trait;
    use std::sync::Mutex;

    // ════════════════════════════════════════════════════════════════════════════
    // Mock Implementations
    // ════════════════════════════════════════════════════════════════════════════

    #[derive(Default)]
    struct RecordingUow {
        calls: Mutex<Vec<&'static str>>,
        active: Mutex<bool>,
        fail_commit: bool,
        fail_rollback: bool,
        commit_keeps_active: bool,
    }

    impl RecordingUow {
        fn calls(&self) -> Vec<&'static str> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl UnitOfWork for RecordingUow {
        async fn begin(&self) -> Result<(), DomainError> {
            self.calls.lock().unwrap().push("begin");
            *self.active.lock().unwrap() = true;
            Ok(())
        }

        async fn commit(&self) -> Result<(), DomainError> {
            self.calls.lock().unwrap().push("commit");
            if self.fail_commit {
                *self.active.lock().unwrap() = self.commit_keeps_active;
                return Err(DomainError::concurrency_conflict("Payment", "p-1"));
            }
            *self.active.lock().unwrap() = false;
            Ok(())
        }

        async fn rollback(&self) -> Result<(), DomainError> {
            self.calls.lock().unwrap().push("rollback");
            *self.active.lock().unwrap() = false;
            if self.fail_rollback {
                return Err(DomainError::database("connection lost"));
            }
            Ok(())
        }

        fn is_active(&self) -> bool {
            *self.active.lock().unwrap()
        }
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn commits_on_success() {
        let uow = RecordingUow::default();

        let value = in_transaction(&uow, async { Ok(42) }).await.unwrap();

        assert_eq!(value, 42);
        assert_eq!(uow.calls(), vec!["begin", "commit"]);
    }

    #[tokio::test]
    async fn rolls_back_and_returns_original_error() {
        let uow = RecordingUow::default();

        let err = in_transaction::<(), _>(&uow, async {
            Err(DomainError::not_found("User", "u-1"))
        })
        .await
        .unwrap_err();

        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(uow.calls(), vec!["begin", "rollback"]);
    }

    #[tokio::test]
    async fn rollback_failure_does_not_replace_original_error() {
        let uow = RecordingUow {
            fail_rollback: true,
            ..Default::default()
        };

        let err = in_transaction::<(), _>(&uow, async {
            Err(DomainError::conflicting_state("Payment", "Refunded", "process"))
        })
        .await
        .unwrap_err();

        assert_eq!(err.code, ErrorCode::ConflictingState);
    }

    #[tokio::test]
    async fn failed_commit_rolls_back_when_still_active() {
        let uow = RecordingUow {
            fail_commit: true,
            commit_keeps_active: true,
            ..Default::default()
        };

        let err = in_transaction(&uow, async { Ok(()) }).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::ConcurrencyConflict);
        assert_eq!(uow.calls(), vec!["begin", "commit", "rollback"]);
    }

    #[tokio::test]
    async fn failed_commit_skips_rollback_when_already_closed() {
        let uow = RecordingUow {
            fail_commit: true,
            ..Default::default()
        };

        let err = in_transaction(&uow, async { Ok(()) }).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::ConcurrencyConflict);
        assert_eq!(uow.calls(), vec!["begin", "commit"]);
    }

    #[tokio::test]
    async fn begin_failure_skips_work() {
        struct BrokenUow;

        #[async_trait]
        impl UnitOfWork for BrokenUow {
            async fn begin(&self) -> Result<(), DomainError> {
                Err(DomainError::database("pool exhausted"))
            }
            async fn commit(&self) -> Result<(), DomainError> {
                unreachable!()
            }
            async fn rollback(&self) -> Result<(), DomainError> {
                unreachable!()
            }
            fn is_active(&self) -> bool {
                false
            }
        }

        let ran = Mutex::new(false);
        let err = in_transaction(&BrokenUow, async {
            *ran.lock().unwrap() = true;
            Ok(())
        })
        .await
        .unwrap_err();

        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert!(!*ran.lock().unwrap());
    }
}
