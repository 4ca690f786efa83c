//! In-memory storage engine with request-scoped transactions.
//!
//! Committed rows live in one shared table guarded by a `tokio` `RwLock`,
//! each with a version number. A [`MemorySession`] is one request's view:
//! inside a transaction it stages writes in an overlay, reads through the
//! overlay, and remembers the version of every row it touched. Commit
//! re-checks those versions and the uniqueness rules under the write lock,
//! so the losing writer of a race observes `ConcurrencyConflict` instead of
//! silently overwriting.
//!
//! Outside a transaction, writes are applied immediately (autocommit).

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::RwLock;

use crate::domain::attendance::AttendanceRecord;
use crate::domain::foundation::{
    AttendanceId, DomainError, InvoiceId, PaymentId, PlanId, TrainerId, UserId, WorkoutSessionId,
};
use crate::domain::invoice::Invoice;
use crate::domain::payment::Payment;
use crate::domain::subscription::SubscriptionPlan;
use crate::domain::trainer::Trainer;
use crate::domain::user::User;
use crate::domain::workout::WorkoutSession;

// ════════════════════════════════════════════════════════════════════════════
// Rows
// ════════════════════════════════════════════════════════════════════════════

#[doc(hidden)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowKey {
    User(UserId),
    Plan(PlanId),
    Trainer(TrainerId),
    Workout(WorkoutSessionId),
    Attendance(AttendanceId),
    Payment(PaymentId),
    Invoice(InvoiceId),
}

impl RowKey {
    fn entity(&self) -> &'static str {
        match self {
            RowKey::User(_) => User::ENTITY,
            RowKey::Plan(_) => SubscriptionPlan::ENTITY,
            RowKey::Trainer(_) => Trainer::ENTITY,
            RowKey::Workout(_) => WorkoutSession::ENTITY,
            RowKey::Attendance(_) => AttendanceRecord::ENTITY,
            RowKey::Payment(_) => Payment::ENTITY,
            RowKey::Invoice(_) => Invoice::ENTITY,
        }
    }

    fn id_string(&self) -> String {
        match self {
            RowKey::User(id) => id.to_string(),
            RowKey::Plan(id) => id.to_string(),
            RowKey::Trainer(id) => id.to_string(),
            RowKey::Workout(id) => id.to_string(),
            RowKey::Attendance(id) => id.to_string(),
            RowKey::Payment(id) => id.to_string(),
            RowKey::Invoice(id) => id.to_string(),
        }
    }
}

#[doc(hidden)]
#[derive(Debug, Clone)]
pub enum Row {
    User(User),
    Plan(SubscriptionPlan),
    Trainer(Trainer),
    Workout(WorkoutSession),
    Attendance(AttendanceRecord),
    Payment(Payment),
    Invoice(Invoice),
}

/// An aggregate type the store knows how to hold.
pub trait Stored: Clone + Send + Sync + 'static {
    /// Entity name used in errors and fault injection.
    const ENTITY: &'static str;

    #[doc(hidden)]
    fn row_key(&self) -> RowKey;
    #[doc(hidden)]
    fn into_row(self) -> Row;
    #[doc(hidden)]
    fn from_row(row: &Row) -> Option<&Self>;
}

macro_rules! stored {
    ($ty:ty, $variant:ident, $entity:literal) => {
        impl Stored for $ty {
            const ENTITY: &'static str = $entity;

            fn row_key(&self) -> RowKey {
                RowKey::$variant(*self.id())
            }

            fn into_row(self) -> Row {
                Row::$variant(self)
            }

            fn from_row(row: &Row) -> Option<&Self> {
                match row {
                    Row::$variant(value) => Some(value),
                    _ => None,
                }
            }
        }
    };
}

stored!(User, User, "User");
stored!(SubscriptionPlan, Plan, "SubscriptionPlan");
stored!(Trainer, Trainer, "Trainer");
stored!(WorkoutSession, Workout, "WorkoutSession");
stored!(AttendanceRecord, Attendance, "AttendanceRecord");
stored!(Payment, Payment, "Payment");
stored!(Invoice, Invoice, "Invoice");

#[derive(Debug, Clone)]
struct Versioned {
    version: u64,
    row: Row,
}

/// Version reported for rows that do not exist.
const ABSENT: u64 = 0;

// ════════════════════════════════════════════════════════════════════════════
// Store
// ════════════════════════════════════════════════════════════════════════════

#[derive(Default)]
struct Faults {
    commit: Option<DomainError>,
    rollback: Option<DomainError>,
    write: Option<(&'static str, DomainError)>,
}

pub(crate) struct StoreInner {
    rows: RwLock<HashMap<RowKey, Versioned>>,
    faults: Mutex<Faults>,
}

impl StoreInner {
    pub(crate) fn new() -> Self {
        Self {
            rows: RwLock::new(HashMap::new()),
            faults: Mutex::new(Faults::default()),
        }
    }

    fn faults(&self) -> MutexGuard<'_, Faults> {
        self.faults.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn inject_commit_failure(&self, error: DomainError) {
        self.faults().commit = Some(error);
    }

    pub(crate) fn inject_rollback_failure(&self, error: DomainError) {
        self.faults().rollback = Some(error);
    }

    pub(crate) fn inject_write_failure(&self, entity: &'static str, error: DomainError) {
        self.faults().write = Some((entity, error));
    }

    pub(crate) async fn committed<T: Stored>(&self, key: RowKey) -> Option<T> {
        let rows = self.rows.read().await;
        rows.get(&key).and_then(|v| T::from_row(&v.row)).cloned()
    }

    pub(crate) async fn committed_count<T: Stored>(&self) -> usize {
        let rows = self.rows.read().await;
        rows.values().filter(|v| T::from_row(&v.row).is_some()).count()
    }

    /// Applies `writes` atomically after checking read versions and
    /// uniqueness rules.
    async fn apply(
        &self,
        reads: &HashMap<RowKey, u64>,
        writes: HashMap<RowKey, Row>,
    ) -> Result<(), DomainError> {
        let mut rows = self.rows.write().await;

        for (key, seen) in reads {
            let current = rows.get(key).map(|v| v.version).unwrap_or(ABSENT);
            if current != *seen {
                tracing::warn!(
                    entity = key.entity(),
                    id = %key.id_string(),
                    seen_version = seen,
                    current_version = current,
                    "Optimistic concurrency check failed"
                );
                return Err(DomainError::concurrency_conflict(key.entity(), key.id_string()));
            }
        }

        check_constraints(&rows, &writes)?;

        for (key, row) in writes {
            let version = rows.get(&key).map(|v| v.version).unwrap_or(ABSENT) + 1;
            rows.insert(key, Versioned { version, row });
        }
        Ok(())
    }
}

/// Uniqueness rules enforced at commit, mirroring the database constraints.
fn check_constraints(
    committed: &HashMap<RowKey, Versioned>,
    writes: &HashMap<RowKey, Row>,
) -> Result<(), DomainError> {
    let merged: Vec<(&RowKey, &Row)> = committed
        .iter()
        .filter(|(key, _)| !writes.contains_key(key))
        .map(|(key, v)| (key, &v.row))
        .chain(writes.iter())
        .collect();

    for (key, row) in writes {
        let others = merged.iter().filter(|(other, _)| *other != key).map(|(_, r)| *r);
        match row {
            Row::User(user) => {
                let taken = others
                    .filter_map(|r| User::from_row(r))
                    .any(|u| u.email() == user.email());
                if taken {
                    return Err(DomainError::duplicate("email", user.email()));
                }
            }
            Row::Invoice(invoice) => {
                let taken = others
                    .filter_map(|r| Invoice::from_row(r))
                    .any(|i| i.invoice_number() == invoice.invoice_number());
                if taken {
                    return Err(DomainError::duplicate("invoice_number", invoice.invoice_number()));
                }
            }
            Row::Attendance(record) if record.is_open() => {
                let open_elsewhere = others
                    .filter_map(|r| AttendanceRecord::from_row(r))
                    .any(|a| a.is_open() && a.user_id() == record.user_id());
                if open_elsewhere {
                    return Err(DomainError::concurrency_conflict(
                        AttendanceRecord::ENTITY,
                        record.user_id(),
                    ));
                }
            }
            _ => {}
        }
    }
    Ok(())
}

// ════════════════════════════════════════════════════════════════════════════
// Session
// ════════════════════════════════════════════════════════════════════════════

#[derive(Default)]
struct TxState {
    reads: HashMap<RowKey, u64>,
    writes: HashMap<RowKey, Row>,
}

/// One request's connection to the store.
pub struct MemorySession {
    store: Arc<StoreInner>,
    tx: Mutex<Option<TxState>>,
}

impl MemorySession {
    pub(crate) fn new(store: Arc<StoreInner>) -> Self {
        Self {
            store,
            tx: Mutex::new(None),
        }
    }

    fn tx(&self) -> MutexGuard<'_, Option<TxState>> {
        self.tx.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn in_transaction(&self) -> bool {
        self.tx().is_some()
    }

    pub(crate) fn begin(&self) -> Result<(), DomainError> {
        let mut tx = self.tx();
        if tx.is_some() {
            return Err(DomainError::internal("Transaction already in progress"));
        }
        *tx = Some(TxState::default());
        Ok(())
    }

    pub(crate) async fn commit(&self) -> Result<(), DomainError> {
        let state = self
            .tx()
            .take()
            .ok_or_else(|| DomainError::internal("No active transaction to commit"))?;

        let fault = self.store.faults().commit.take();
        if let Some(err) = fault {
            return Err(err);
        }
        self.store.apply(&state.reads, state.writes).await
    }

    pub(crate) fn rollback(&self) -> Result<(), DomainError> {
        let state = self
            .tx()
            .take()
            .ok_or_else(|| DomainError::internal("No active transaction to roll back"))?;
        drop(state);

        match self.store.faults().rollback.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Reads through the staged overlay, recording the committed version.
    pub(crate) async fn get<T: Stored>(&self, key: RowKey) -> Option<T> {
        let staged = {
            let tx = self.tx();
            tx.as_ref()
                .and_then(|state| state.writes.get(&key))
                .map(|row| T::from_row(row).cloned())
        };
        if let Some(value) = staged {
            return value;
        }

        let (version, value) = {
            let rows = self.store.rows.read().await;
            match rows.get(&key) {
                Some(v) => (v.version, T::from_row(&v.row).cloned()),
                None => (ABSENT, None),
            }
        };
        self.record_read(key, version);
        value
    }

    /// Every row of type `T` matching `filter`, overlay included.
    pub(crate) async fn scan<T: Stored>(&self, filter: impl Fn(&T) -> bool) -> Vec<T> {
        let staged: HashMap<RowKey, Row> = self
            .tx()
            .as_ref()
            .map(|state| state.writes.clone())
            .unwrap_or_default();

        let mut seen = Vec::new();
        let mut found: Vec<T> = {
            let rows = self.store.rows.read().await;
            rows.iter()
                .filter(|(key, _)| !staged.contains_key(key))
                .filter_map(|(key, v)| {
                    T::from_row(&v.row)
                        .filter(|value| filter(value))
                        .map(|value| {
                            seen.push((*key, v.version));
                            value.clone()
                        })
                })
                .collect()
        };
        found.extend(
            staged
                .values()
                .filter_map(|row| T::from_row(row))
                .filter(|value| filter(value))
                .cloned(),
        );

        for (key, version) in seen {
            self.record_read(key, version);
        }
        found
    }

    /// Writes a new row.
    pub(crate) async fn insert<T: Stored>(&self, value: &T) -> Result<(), DomainError> {
        self.take_write_fault(T::ENTITY)?;
        let key = value.row_key();
        if self.get::<T>(key).await.is_some() {
            return Err(DomainError::internal(format!(
                "{} '{}' already exists",
                T::ENTITY,
                key.id_string()
            )));
        }
        self.write(key, value.clone().into_row()).await
    }

    /// Overwrites an existing row.
    pub(crate) async fn replace<T: Stored>(&self, value: &T) -> Result<(), DomainError> {
        self.take_write_fault(T::ENTITY)?;
        let key = value.row_key();
        if self.get::<T>(key).await.is_none() {
            return Err(DomainError::not_found(T::ENTITY, key.id_string()));
        }
        self.write(key, value.clone().into_row()).await
    }

    async fn write(&self, key: RowKey, row: Row) -> Result<(), DomainError> {
        {
            let mut tx = self.tx();
            if let Some(state) = tx.as_mut() {
                state.writes.insert(key, row);
                return Ok(());
            }
        }

        // Autocommit: validate against the current version, then apply.
        let version = {
            let rows = self.store.rows.read().await;
            rows.get(&key).map(|v| v.version).unwrap_or(ABSENT)
        };
        let reads = HashMap::from([(key, version)]);
        self.store.apply(&reads, HashMap::from([(key, row)])).await
    }

    fn record_read(&self, key: RowKey, version: u64) {
        if let Some(state) = self.tx().as_mut() {
            state.reads.entry(key).or_insert(version);
        }
    }

    fn take_write_fault(&self, entity: &'static str) -> Result<(), DomainError> {
        let mut faults = self.store.faults();
        match faults.write.take() {
            Some((target, err)) if target == entity => Err(err),
            other => {
                faults.write = other;
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::attendance::ActivityType;
    use crate::domain::foundation::{Currency, ErrorCode, Money, Timestamp};
    use crate::domain::payment::PaymentMethod;

    fn payment() -> Payment {
        Payment::create_new(
            UserId::new(),
            Money::new(5_000, Currency::default_currency()).unwrap(),
            PaymentMethod::Cash,
            None,
            None,
        )
        .unwrap()
    }

    fn session(store: &Arc<StoreInner>) -> MemorySession {
        MemorySession::new(store.clone())
    }

    #[tokio::test]
    async fn staged_writes_are_invisible_until_commit() {
        let store = Arc::new(StoreInner::new());
        let writer = session(&store);
        let reader = session(&store);
        let payment = payment();
        let key = payment.row_key();

        writer.begin().unwrap();
        writer.insert(&payment).await.unwrap();

        assert!(writer.get::<Payment>(key).await.is_some());
        assert!(reader.get::<Payment>(key).await.is_none());

        writer.commit().await.unwrap();
        assert!(reader.get::<Payment>(key).await.is_some());
    }

    #[tokio::test]
    async fn rollback_discards_staged_writes() {
        let store = Arc::new(StoreInner::new());
        let s = session(&store);
        let payment = payment();

        s.begin().unwrap();
        s.insert(&payment).await.unwrap();
        s.rollback().unwrap();

        assert!(store.committed::<Payment>(payment.row_key()).await.is_none());
        assert!(!s.in_transaction());
    }

    #[tokio::test]
    async fn dropping_session_discards_staged_writes() {
        let store = Arc::new(StoreInner::new());
        let payment = payment();
        {
            let s = session(&store);
            s.begin().unwrap();
            s.insert(&payment).await.unwrap();
        }
        assert_eq!(store.committed_count::<Payment>().await, 0);
    }

    #[tokio::test]
    async fn begin_twice_and_commit_without_begin_are_errors() {
        let store = Arc::new(StoreInner::new());
        let s = session(&store);

        assert_eq!(s.commit().await.unwrap_err().code, ErrorCode::InternalError);
        assert_eq!(s.rollback().unwrap_err().code, ErrorCode::InternalError);

        s.begin().unwrap();
        assert_eq!(s.begin().unwrap_err().code, ErrorCode::InternalError);
    }

    #[tokio::test]
    async fn losing_writer_gets_concurrency_conflict() {
        let store = Arc::new(StoreInner::new());
        let mut payment = payment();
        session(&store).insert(&payment).await.unwrap();
        let key = payment.row_key();

        let first = session(&store);
        let second = session(&store);
        first.begin().unwrap();
        second.begin().unwrap();

        let mut a: Payment = first.get(key).await.unwrap();
        let mut b: Payment = second.get(key).await.unwrap();
        a.process("TXN-A").unwrap();
        b.process("TXN-B").unwrap();
        first.replace(&a).await.unwrap();
        second.replace(&b).await.unwrap();

        first.commit().await.unwrap();
        let err = second.commit().await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ConcurrencyConflict);

        payment = store.committed(key).await.unwrap();
        assert_eq!(payment.transaction_id(), Some("TXN-A"));
    }

    #[tokio::test]
    async fn second_open_check_in_for_user_is_rejected_at_commit() {
        let store = Arc::new(StoreInner::new());
        let user = UserId::new();
        let first = session(&store);
        let second = session(&store);
        first.begin().unwrap();
        second.begin().unwrap();

        first
            .insert(&AttendanceRecord::check_in(user, ActivityType::Gym, Timestamp::now()))
            .await
            .unwrap();
        second
            .insert(&AttendanceRecord::check_in(user, ActivityType::Yoga, Timestamp::now()))
            .await
            .unwrap();

        first.commit().await.unwrap();
        assert_eq!(
            second.commit().await.unwrap_err().code,
            ErrorCode::ConcurrencyConflict
        );
        assert_eq!(store.committed_count::<AttendanceRecord>().await, 1);
    }

    #[tokio::test]
    async fn write_fault_targets_one_entity_once() {
        let store = Arc::new(StoreInner::new());
        store.inject_write_failure("Payment", DomainError::database("disk full"));
        let s = session(&store);

        let err = s.insert(&payment()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::DatabaseError);
        s.insert(&payment()).await.unwrap();
    }

    #[tokio::test]
    async fn commit_fault_leaves_store_unchanged() {
        let store = Arc::new(StoreInner::new());
        store.inject_commit_failure(DomainError::database("connection reset"));
        let s = session(&store);

        s.begin().unwrap();
        s.insert(&payment()).await.unwrap();
        assert!(s.commit().await.is_err());
        assert_eq!(store.committed_count::<Payment>().await, 0);
    }
}
