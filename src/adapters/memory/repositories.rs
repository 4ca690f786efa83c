//! Repository ports over a [`MemorySession`].

use std::cmp::Reverse;
use std::sync::Arc;

use async_trait::async_trait;

use super::store::{MemorySession, RowKey};
use crate::domain::attendance::AttendanceRecord;
use crate::domain::foundation::{
    AttendanceId, DomainError, InvoiceId, PageRequest, PaginatedResult, PaymentId, PlanId,
    TrainerId, UserId, WorkoutSessionId,
};
use crate::domain::invoice::{Invoice, InvoiceNumber, InvoiceStatus};
use crate::domain::payment::{Payment, PaymentStatus};
use crate::domain::subscription::SubscriptionPlan;
use crate::domain::trainer::Trainer;
use crate::domain::user::User;
use crate::domain::workout::{WorkoutSession, WorkoutStatus};
use crate::ports::{
    AttendanceRepository, InvoiceRepository, PaymentRepository, PlanFilter, PlanRepository,
    TrainerRepository, UnitOfWork, UserFilter, UserRepository, WorkoutRepository,
};

/// Unit of work backed by the session's staged overlay.
pub struct MemoryUnitOfWork {
    session: Arc<MemorySession>,
}

impl MemoryUnitOfWork {
    pub fn new(session: Arc<MemorySession>) -> Self {
        Self { session }
    }
}

#[async_trait]
impl UnitOfWork for MemoryUnitOfWork {
    async fn begin(&self) -> Result<(), DomainError> {
        self.session.begin()
    }

    async fn commit(&self) -> Result<(), DomainError> {
        self.session.commit().await
    }

    async fn rollback(&self) -> Result<(), DomainError> {
        self.session.rollback()
    }

    fn is_active(&self) -> bool {
        self.session.in_transaction()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Users
// ════════════════════════════════════════════════════════════════════════════

pub struct MemoryUserRepository {
    session: Arc<MemorySession>,
}

impl MemoryUserRepository {
    pub fn new(session: Arc<MemorySession>) -> Self {
        Self { session }
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn get_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        Ok(self.session.get(RowKey::User(*id)).await)
    }

    async fn exists(&self, id: &UserId) -> Result<bool, DomainError> {
        Ok(self.get_by_id(id).await?.is_some())
    }

    async fn add(&self, user: &User) -> Result<(), DomainError> {
        if !self.is_email_unique(user.email(), None).await? {
            return Err(DomainError::duplicate("email", user.email()));
        }
        self.session.insert(user).await
    }

    async fn update(&self, user: &User) -> Result<(), DomainError> {
        if !self.is_email_unique(user.email(), Some(user.id())).await? {
            return Err(DomainError::duplicate("email", user.email()));
        }
        self.session.replace(user).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let email = email.trim().to_lowercase();
        Ok(self
            .session
            .scan::<User>(|u| u.email() == email)
            .await
            .into_iter()
            .next())
    }

    async fn is_email_unique(
        &self,
        email: &str,
        excluding: Option<&UserId>,
    ) -> Result<bool, DomainError> {
        let email = email.trim().to_lowercase();
        let holders = self
            .session
            .scan::<User>(|u| u.email() == email && Some(u.id()) != excluding)
            .await;
        Ok(holders.is_empty())
    }

    async fn get_paginated(
        &self,
        filter: &UserFilter,
        page: PageRequest,
    ) -> Result<PaginatedResult<User>, DomainError> {
        let mut users = self.session.scan::<User>(|u| filter.matches(u)).await;
        users.sort_by_key(|u| Reverse(*u.created_at()));
        Ok(PaginatedResult::from_vec(users, page))
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Plans
// ════════════════════════════════════════════════════════════════════════════

pub struct MemoryPlanRepository {
    session: Arc<MemorySession>,
}

impl MemoryPlanRepository {
    pub fn new(session: Arc<MemorySession>) -> Self {
        Self { session }
    }
}

#[async_trait]
impl PlanRepository for MemoryPlanRepository {
    async fn get_by_id(&self, id: &PlanId) -> Result<Option<SubscriptionPlan>, DomainError> {
        Ok(self.session.get(RowKey::Plan(*id)).await)
    }

    async fn exists(&self, id: &PlanId) -> Result<bool, DomainError> {
        Ok(self.get_by_id(id).await?.is_some())
    }

    async fn add(&self, plan: &SubscriptionPlan) -> Result<(), DomainError> {
        self.session.insert(plan).await
    }

    async fn update(&self, plan: &SubscriptionPlan) -> Result<(), DomainError> {
        self.session.replace(plan).await
    }

    async fn get_paginated(
        &self,
        filter: PlanFilter,
        page: PageRequest,
    ) -> Result<PaginatedResult<SubscriptionPlan>, DomainError> {
        let mut plans = self
            .session
            .scan::<SubscriptionPlan>(|p| !filter.active_only || p.is_active())
            .await;
        plans.sort_by(|a, b| {
            a.price()
                .amount_cents()
                .cmp(&b.price().amount_cents())
                .then_with(|| a.name().cmp(b.name()))
        });
        Ok(PaginatedResult::from_vec(plans, page))
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Trainers
// ════════════════════════════════════════════════════════════════════════════

pub struct MemoryTrainerRepository {
    session: Arc<MemorySession>,
}

impl MemoryTrainerRepository {
    pub fn new(session: Arc<MemorySession>) -> Self {
        Self { session }
    }
}

#[async_trait]
impl TrainerRepository for MemoryTrainerRepository {
    async fn get_by_id(&self, id: &TrainerId) -> Result<Option<Trainer>, DomainError> {
        Ok(self.session.get(RowKey::Trainer(*id)).await)
    }

    async fn exists(&self, id: &TrainerId) -> Result<bool, DomainError> {
        Ok(self.get_by_id(id).await?.is_some())
    }

    async fn add(&self, trainer: &Trainer) -> Result<(), DomainError> {
        self.session.insert(trainer).await
    }

    async fn update(&self, trainer: &Trainer) -> Result<(), DomainError> {
        self.session.replace(trainer).await
    }

    async fn get_many(&self, ids: &[TrainerId]) -> Result<Vec<Trainer>, DomainError> {
        Ok(self.session.scan::<Trainer>(|t| ids.contains(t.id())).await)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Workouts
// ════════════════════════════════════════════════════════════════════════════

pub struct MemoryWorkoutRepository {
    session: Arc<MemorySession>,
}

impl MemoryWorkoutRepository {
    pub fn new(session: Arc<MemorySession>) -> Self {
        Self { session }
    }
}

#[async_trait]
impl WorkoutRepository for MemoryWorkoutRepository {
    async fn get_by_id(&self, id: &WorkoutSessionId) -> Result<Option<WorkoutSession>, DomainError> {
        Ok(self.session.get(RowKey::Workout(*id)).await)
    }

    async fn exists(&self, id: &WorkoutSessionId) -> Result<bool, DomainError> {
        Ok(self.get_by_id(id).await?.is_some())
    }

    async fn add(&self, session: &WorkoutSession) -> Result<(), DomainError> {
        self.session.insert(session).await
    }

    async fn update(&self, session: &WorkoutSession) -> Result<(), DomainError> {
        self.session.replace(session).await
    }

    async fn get_paginated_for_user(
        &self,
        user_id: &UserId,
        status: Option<WorkoutStatus>,
        page: PageRequest,
    ) -> Result<PaginatedResult<WorkoutSession>, DomainError> {
        let mut sessions = self
            .session
            .scan::<WorkoutSession>(|w| {
                w.user_id() == user_id && status.map_or(true, |s| w.status() == s)
            })
            .await;
        sessions.sort_by_key(|w| Reverse(*w.start_time()));
        Ok(PaginatedResult::from_vec(sessions, page))
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Attendance
// ════════════════════════════════════════════════════════════════════════════

pub struct MemoryAttendanceRepository {
    session: Arc<MemorySession>,
}

impl MemoryAttendanceRepository {
    pub fn new(session: Arc<MemorySession>) -> Self {
        Self { session }
    }
}

#[async_trait]
impl AttendanceRepository for MemoryAttendanceRepository {
    async fn get_by_id(&self, id: &AttendanceId) -> Result<Option<AttendanceRecord>, DomainError> {
        Ok(self.session.get(RowKey::Attendance(*id)).await)
    }

    async fn exists(&self, id: &AttendanceId) -> Result<bool, DomainError> {
        Ok(self.get_by_id(id).await?.is_some())
    }

    async fn add(&self, record: &AttendanceRecord) -> Result<(), DomainError> {
        self.session.insert(record).await
    }

    async fn update(&self, record: &AttendanceRecord) -> Result<(), DomainError> {
        self.session.replace(record).await
    }

    async fn get_current_open_check_in(
        &self,
        user_id: &UserId,
    ) -> Result<Option<AttendanceRecord>, DomainError> {
        Ok(self
            .session
            .scan::<AttendanceRecord>(|a| a.user_id() == user_id && a.is_open())
            .await
            .into_iter()
            .next())
    }

    async fn get_paginated_for_user(
        &self,
        user_id: &UserId,
        page: PageRequest,
    ) -> Result<PaginatedResult<AttendanceRecord>, DomainError> {
        let mut records = self
            .session
            .scan::<AttendanceRecord>(|a| a.user_id() == user_id)
            .await;
        records.sort_by_key(|a| Reverse(*a.check_in_time()));
        Ok(PaginatedResult::from_vec(records, page))
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Payments
// ════════════════════════════════════════════════════════════════════════════

pub struct MemoryPaymentRepository {
    session: Arc<MemorySession>,
}

impl MemoryPaymentRepository {
    pub fn new(session: Arc<MemorySession>) -> Self {
        Self { session }
    }
}

#[async_trait]
impl PaymentRepository for MemoryPaymentRepository {
    async fn get_by_id(&self, id: &PaymentId) -> Result<Option<Payment>, DomainError> {
        Ok(self.session.get(RowKey::Payment(*id)).await)
    }

    async fn exists(&self, id: &PaymentId) -> Result<bool, DomainError> {
        Ok(self.get_by_id(id).await?.is_some())
    }

    async fn add(&self, payment: &Payment) -> Result<(), DomainError> {
        self.session.insert(payment).await
    }

    async fn update(&self, payment: &Payment) -> Result<(), DomainError> {
        self.session.replace(payment).await
    }

    async fn get_paginated_for_user(
        &self,
        user_id: &UserId,
        status: Option<PaymentStatus>,
        page: PageRequest,
    ) -> Result<PaginatedResult<Payment>, DomainError> {
        let mut payments = self
            .session
            .scan::<Payment>(|p| p.user_id() == user_id && status.map_or(true, |s| p.status() == s))
            .await;
        payments.sort_by_key(|p| Reverse(*p.payment_date()));
        Ok(PaginatedResult::from_vec(payments, page))
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Invoices
// ════════════════════════════════════════════════════════════════════════════

pub struct MemoryInvoiceRepository {
    session: Arc<MemorySession>,
}

impl MemoryInvoiceRepository {
    pub fn new(session: Arc<MemorySession>) -> Self {
        Self { session }
    }
}

#[async_trait]
impl InvoiceRepository for MemoryInvoiceRepository {
    async fn get_by_id(&self, id: &InvoiceId) -> Result<Option<Invoice>, DomainError> {
        Ok(self.session.get(RowKey::Invoice(*id)).await)
    }

    async fn exists(&self, id: &InvoiceId) -> Result<bool, DomainError> {
        Ok(self.get_by_id(id).await?.is_some())
    }

    async fn add(&self, invoice: &Invoice) -> Result<(), DomainError> {
        if self.find_by_number(invoice.invoice_number()).await?.is_some() {
            return Err(DomainError::duplicate("invoice_number", invoice.invoice_number()));
        }
        self.session.insert(invoice).await
    }

    async fn update(&self, invoice: &Invoice) -> Result<(), DomainError> {
        self.session.replace(invoice).await
    }

    async fn find_by_number(&self, number: &InvoiceNumber) -> Result<Option<Invoice>, DomainError> {
        Ok(self
            .session
            .scan::<Invoice>(|i| i.invoice_number() == number)
            .await
            .into_iter()
            .next())
    }

    async fn get_paginated_for_user(
        &self,
        user_id: &UserId,
        status: Option<InvoiceStatus>,
        page: PageRequest,
    ) -> Result<PaginatedResult<Invoice>, DomainError> {
        let mut invoices = self
            .session
            .scan::<Invoice>(|i| i.user_id() == user_id && status.map_or(true, |s| i.status() == s))
            .await;
        invoices.sort_by_key(|i| Reverse(*i.issue_date()));
        Ok(PaginatedResult::from_vec(invoices, page))
    }
}
