//! Read models returned by handlers.
//!
//! Flat, serializable snapshots of aggregates. Building a view never
//! mutates the aggregate it came from.

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::attendance::{ActivityType, AttendanceRecord};
use crate::domain::foundation::{
    AttendanceId, InvoiceId, Money, PaymentId, PlanId, SubscriptionId, Timestamp, TrainerId,
    UserId, WorkoutSessionId,
};
use crate::domain::invoice::{Invoice, InvoiceStatus};
use crate::domain::payment::{Payment, PaymentMethod, PaymentStatus};
use crate::domain::subscription::SubscriptionPlan;
use crate::domain::trainer::Trainer;
use crate::domain::user::{Gender, SubscriptionStatus, User, UserStatus, UserSubscription};
use crate::domain::workout::{WorkoutSession, WorkoutStatus};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoneyView {
    /// Decimal rendering, e.g. `"100.50"`.
    pub amount: String,
    pub amount_cents: i64,
    pub currency: String,
}

impl From<&Money> for MoneyView {
    fn from(money: &Money) -> Self {
        Self {
            amount: money.to_decimal_string(),
            amount_cents: money.amount_cents(),
            currency: money.currency().as_str().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserView {
    pub id: UserId,
    pub membership_number: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
    pub status: UserStatus,
    pub preferred_language: String,
    pub has_active_subscription: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        let personal = user.personal_info();
        Self {
            id: *user.id(),
            membership_number: user.membership_number().to_string(),
            first_name: personal.first_name().to_string(),
            last_name: personal.last_name().to_string(),
            email: user.email().to_string(),
            phone: user.contact_info().phone().map(str::to_string),
            date_of_birth: personal.date_of_birth(),
            gender: personal.gender(),
            status: user.status(),
            preferred_language: user.preferred_language().to_string(),
            has_active_subscription: user.has_active_subscription(),
            created_at: *user.created_at(),
            updated_at: *user.updated_at(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubscriptionView {
    pub id: SubscriptionId,
    pub user_id: UserId,
    pub plan_id: PlanId,
    pub plan_name: String,
    pub price: MoneyView,
    pub start_date: Timestamp,
    pub end_date: Timestamp,
    /// Effective status at the time the view was built.
    pub status: SubscriptionStatus,
    pub cancelled_at: Option<Timestamp>,
}

impl SubscriptionView {
    pub fn at(subscription: &UserSubscription, now: &Timestamp) -> Self {
        Self {
            id: *subscription.id(),
            user_id: *subscription.user_id(),
            plan_id: *subscription.plan_id(),
            plan_name: subscription.plan_name().to_string(),
            price: subscription.price().into(),
            start_date: *subscription.start_date(),
            end_date: *subscription.end_date(),
            status: subscription.effective_status(now),
            cancelled_at: subscription.cancelled_at().copied(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanView {
    pub id: PlanId,
    pub name: String,
    pub description: Option<String>,
    pub price: MoneyView,
    pub duration_days: u32,
    pub features: Vec<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
}

impl From<&SubscriptionPlan> for PlanView {
    fn from(plan: &SubscriptionPlan) -> Self {
        Self {
            id: *plan.id(),
            name: plan.name().to_string(),
            description: plan.description().map(str::to_string),
            price: plan.price().into(),
            duration_days: plan.duration_days(),
            features: plan.features().to_vec(),
            is_active: plan.is_active(),
            created_at: *plan.created_at(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrainerView {
    pub id: TrainerId,
    pub first_name: String,
    pub last_name: String,
    pub display_name: String,
    pub email: String,
    pub specialization: Option<String>,
    pub is_active: bool,
}

impl From<&Trainer> for TrainerView {
    fn from(trainer: &Trainer) -> Self {
        Self {
            id: *trainer.id(),
            first_name: trainer.first_name().to_string(),
            last_name: trainer.last_name().to_string(),
            display_name: trainer.display_name(),
            email: trainer.email().to_string(),
            specialization: trainer.specialization().map(str::to_string),
            is_active: trainer.is_active(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkoutView {
    pub id: WorkoutSessionId,
    pub user_id: UserId,
    pub trainer_id: Option<TrainerId>,
    pub trainer_name: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub start_time: Timestamp,
    pub started_at: Option<Timestamp>,
    pub end_time: Option<Timestamp>,
    pub duration_minutes: Option<i64>,
    pub status: WorkoutStatus,
    pub notes: Option<String>,
}

impl WorkoutView {
    /// `trainer_name` is resolved by the caller.
    pub fn new(session: &WorkoutSession, trainer_name: Option<String>) -> Self {
        Self {
            id: *session.id(),
            user_id: *session.user_id(),
            trainer_id: session.trainer_id().copied(),
            trainer_name,
            title: session.title().to_string(),
            description: session.description().map(str::to_string),
            start_time: *session.start_time(),
            started_at: session.started_at().copied(),
            end_time: session.end_time().copied(),
            duration_minutes: session.duration().map(|d| d.num_minutes()),
            status: session.status(),
            notes: session.notes().map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttendanceView {
    pub id: AttendanceId,
    pub user_id: UserId,
    pub activity_type: ActivityType,
    pub check_in_time: Timestamp,
    pub check_out_time: Option<Timestamp>,
    pub duration_minutes: Option<i64>,
    pub is_open: bool,
}

impl From<&AttendanceRecord> for AttendanceView {
    fn from(record: &AttendanceRecord) -> Self {
        Self {
            id: *record.id(),
            user_id: *record.user_id(),
            activity_type: record.activity_type(),
            check_in_time: *record.check_in_time(),
            check_out_time: record.check_out_time().copied(),
            duration_minutes: record.duration().map(|d| d.num_minutes()),
            is_open: record.is_open(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentView {
    pub id: PaymentId,
    pub user_id: UserId,
    pub subscription_id: Option<SubscriptionId>,
    pub amount: MoneyView,
    pub method: PaymentMethod,
    pub status: PaymentStatus,
    pub payment_date: Timestamp,
    pub transaction_id: Option<String>,
    pub description: Option<String>,
    pub processed_at: Option<Timestamp>,
    pub refund_reason: Option<String>,
    pub refunded_at: Option<Timestamp>,
}

impl From<&Payment> for PaymentView {
    fn from(payment: &Payment) -> Self {
        Self {
            id: *payment.id(),
            user_id: *payment.user_id(),
            subscription_id: payment.subscription_id().copied(),
            amount: payment.amount().into(),
            method: payment.method(),
            status: payment.status(),
            payment_date: *payment.payment_date(),
            transaction_id: payment.transaction_id().map(str::to_string),
            description: payment.description().map(str::to_string),
            processed_at: payment.processed_at().copied(),
            refund_reason: payment.refund_reason().map(str::to_string),
            refunded_at: payment.refunded_at().copied(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvoiceView {
    pub id: InvoiceId,
    pub user_id: UserId,
    pub payment_id: Option<PaymentId>,
    pub invoice_number: String,
    pub base_amount: MoneyView,
    pub tax_amount: MoneyView,
    pub total_amount: MoneyView,
    pub status: InvoiceStatus,
    pub issue_date: Timestamp,
    pub due_date: Option<NaiveDate>,
    pub paid_at: Option<Timestamp>,
    pub notes: Option<String>,
}

impl From<&Invoice> for InvoiceView {
    fn from(invoice: &Invoice) -> Self {
        Self {
            id: *invoice.id(),
            user_id: *invoice.user_id(),
            payment_id: invoice.payment_id().copied(),
            invoice_number: invoice.invoice_number().to_string(),
            base_amount: invoice.base_amount().into(),
            tax_amount: invoice.tax_amount().into(),
            total_amount: invoice.total_amount().into(),
            status: invoice.status(),
            issue_date: *invoice.issue_date(),
            due_date: invoice.due_date(),
            paid_at: invoice.paid_at().copied(),
            notes: invoice.notes().map(str::to_string),
        }
    }
}
