//! Application handlers.
//!
//! One command or query handler per use case, grouped by area. Handlers
//! receive their repositories from the request's [`RepositoryScope`] and
//! never see a connection or transaction directly.
//!
//! [`register_all`] fills a [`Dispatcher`] with every handler; it is called
//! once at startup.

pub mod attendance;
pub mod invoices;
pub mod payments;
pub mod plans;
pub mod trainers;
pub mod users;
pub mod workouts;

#[cfg(test)]
mod test_support;

use std::sync::Arc;

use super::dispatcher::Dispatcher;
use super::policy::BillingPolicy;
use crate::domain::foundation::DomainError;
use crate::ports::{NotificationSender, RepositoryScope};

use attendance::*;
use invoices::*;
use payments::*;
use plans::*;
use trainers::*;
use users::*;
use workouts::*;

/// Registers every handler with `dispatcher`.
///
/// # Errors
///
/// - `InternalError` if any request type is registered twice
pub fn register_all(
    dispatcher: &mut Dispatcher,
    notifier: Arc<dyn NotificationSender>,
    billing: BillingPolicy,
) -> Result<(), DomainError> {
    register_members(dispatcher, notifier.clone())?;
    register_plans(dispatcher, billing.clone())?;
    register_training(dispatcher, notifier.clone())?;
    register_billing(dispatcher, notifier, billing)?;

    tracing::debug!(handlers = dispatcher.len(), "Handlers registered");
    Ok(())
}

fn register_members(
    dispatcher: &mut Dispatcher,
    notifier: Arc<dyn NotificationSender>,
) -> Result<(), DomainError> {
    dispatcher.register::<CreateUserCommand, _, _>(move |scope: &RepositoryScope| {
        CreateUserHandler::new(scope.uow.clone(), scope.users.clone(), notifier.clone())
    })?;
    dispatcher.register::<UpdateUserCommand, _, _>(|scope: &RepositoryScope| {
        UpdateUserHandler::new(scope.uow.clone(), scope.users.clone())
    })?;
    dispatcher.register::<DeactivateUserCommand, _, _>(|scope: &RepositoryScope| {
        ChangeUserStatusHandler::new(scope.uow.clone(), scope.users.clone())
    })?;
    dispatcher.register::<SuspendUserCommand, _, _>(|scope: &RepositoryScope| {
        ChangeUserStatusHandler::new(scope.uow.clone(), scope.users.clone())
    })?;
    dispatcher.register::<ReactivateUserCommand, _, _>(|scope: &RepositoryScope| {
        ChangeUserStatusHandler::new(scope.uow.clone(), scope.users.clone())
    })?;
    dispatcher.register::<SubscribeToPlanCommand, _, _>(|scope: &RepositoryScope| {
        SubscribeToPlanHandler::new(scope.uow.clone(), scope.users.clone(), scope.plans.clone())
    })?;
    dispatcher.register::<CancelSubscriptionCommand, _, _>(|scope: &RepositoryScope| {
        CancelSubscriptionHandler::new(scope.uow.clone(), scope.users.clone())
    })?;
    dispatcher.register::<GetUserByIdQuery, _, _>(|scope: &RepositoryScope| {
        GetUserByIdHandler::new(scope.users.clone())
    })?;
    dispatcher.register::<GetUsersQuery, _, _>(|scope: &RepositoryScope| {
        GetUsersHandler::new(scope.users.clone())
    })?;
    dispatcher.register::<GetUserSubscriptionsQuery, _, _>(|scope: &RepositoryScope| {
        GetUserSubscriptionsHandler::new(scope.users.clone())
    })?;
    Ok(())
}

fn register_plans(dispatcher: &mut Dispatcher, billing: BillingPolicy) -> Result<(), DomainError> {
    dispatcher.register::<CreatePlanCommand, _, _>(move |scope: &RepositoryScope| {
        CreatePlanHandler::new(scope.uow.clone(), scope.plans.clone(), billing.clone())
    })?;
    dispatcher.register::<ActivatePlanCommand, _, _>(|scope: &RepositoryScope| {
        ChangePlanAvailabilityHandler::new(scope.uow.clone(), scope.plans.clone())
    })?;
    dispatcher.register::<DeactivatePlanCommand, _, _>(|scope: &RepositoryScope| {
        ChangePlanAvailabilityHandler::new(scope.uow.clone(), scope.plans.clone())
    })?;
    dispatcher.register::<GetPlanByIdQuery, _, _>(|scope: &RepositoryScope| {
        GetPlanByIdHandler::new(scope.plans.clone())
    })?;
    dispatcher.register::<GetPlansQuery, _, _>(|scope: &RepositoryScope| {
        GetPlansHandler::new(scope.plans.clone())
    })?;
    Ok(())
}

fn register_training(
    dispatcher: &mut Dispatcher,
    notifier: Arc<dyn NotificationSender>,
) -> Result<(), DomainError> {
    dispatcher.register::<CreateTrainerCommand, _, _>(|scope: &RepositoryScope| {
        CreateTrainerHandler::new(scope.uow.clone(), scope.trainers.clone())
    })?;
    dispatcher.register::<GetTrainerByIdQuery, _, _>(|scope: &RepositoryScope| {
        GetTrainerByIdHandler::new(scope.trainers.clone())
    })?;

    dispatcher.register::<ScheduleWorkoutCommand, _, _>(|scope: &RepositoryScope| {
        ScheduleWorkoutHandler::new(
            scope.uow.clone(),
            scope.users.clone(),
            scope.trainers.clone(),
            scope.workouts.clone(),
        )
    })?;
    dispatcher.register::<StartWorkoutCommand, _, _>(|scope: &RepositoryScope| {
        StartWorkoutHandler::new(scope.uow.clone(), scope.workouts.clone())
    })?;
    dispatcher.register::<CompleteWorkoutCommand, _, _>(|scope: &RepositoryScope| {
        CompleteWorkoutHandler::new(scope.uow.clone(), scope.workouts.clone())
    })?;
    dispatcher.register::<SendWorkoutReminderCommand, _, _>(move |scope: &RepositoryScope| {
        SendWorkoutReminderHandler::new(
            scope.users.clone(),
            scope.workouts.clone(),
            notifier.clone(),
        )
    })?;
    dispatcher.register::<GetWorkoutByIdQuery, _, _>(|scope: &RepositoryScope| {
        GetWorkoutByIdHandler::new(scope.workouts.clone(), scope.trainers.clone())
    })?;
    dispatcher.register::<GetUserWorkoutsQuery, _, _>(|scope: &RepositoryScope| {
        GetUserWorkoutsHandler::new(
            scope.users.clone(),
            scope.workouts.clone(),
            scope.trainers.clone(),
        )
    })?;

    dispatcher.register::<CheckInCommand, _, _>(|scope: &RepositoryScope| {
        CheckInHandler::new(scope.uow.clone(), scope.users.clone(), scope.attendance.clone())
    })?;
    dispatcher.register::<CheckOutCommand, _, _>(|scope: &RepositoryScope| {
        CheckOutHandler::new(scope.uow.clone(), scope.attendance.clone())
    })?;
    dispatcher.register::<GetAttendanceByIdQuery, _, _>(|scope: &RepositoryScope| {
        GetAttendanceByIdHandler::new(scope.attendance.clone())
    })?;
    dispatcher.register::<GetUserAttendanceQuery, _, _>(|scope: &RepositoryScope| {
        GetUserAttendanceHandler::new(scope.users.clone(), scope.attendance.clone())
    })?;
    Ok(())
}

fn register_billing(
    dispatcher: &mut Dispatcher,
    notifier: Arc<dyn NotificationSender>,
    billing: BillingPolicy,
) -> Result<(), DomainError> {
    let payment_billing = billing.clone();
    dispatcher.register::<CreatePaymentCommand, _, _>(move |scope: &RepositoryScope| {
        CreatePaymentHandler::new(
            scope.uow.clone(),
            scope.users.clone(),
            scope.payments.clone(),
            payment_billing.clone(),
        )
    })?;
    dispatcher.register::<ProcessPaymentCommand, _, _>(move |scope: &RepositoryScope| {
        ProcessPaymentHandler::new(
            scope.uow.clone(),
            scope.users.clone(),
            scope.payments.clone(),
            notifier.clone(),
        )
    })?;
    dispatcher.register::<RefundPaymentCommand, _, _>(|scope: &RepositoryScope| {
        RefundPaymentHandler::new(scope.uow.clone(), scope.payments.clone())
    })?;
    dispatcher.register::<GetPaymentByIdQuery, _, _>(|scope: &RepositoryScope| {
        GetPaymentByIdHandler::new(scope.payments.clone())
    })?;
    dispatcher.register::<GetUserPaymentsQuery, _, _>(|scope: &RepositoryScope| {
        GetUserPaymentsHandler::new(scope.users.clone(), scope.payments.clone())
    })?;

    dispatcher.register::<CreateInvoiceCommand, _, _>(move |scope: &RepositoryScope| {
        CreateInvoiceHandler::new(
            scope.uow.clone(),
            scope.users.clone(),
            scope.payments.clone(),
            scope.invoices.clone(),
            billing.clone(),
        )
    })?;
    dispatcher.register::<MarkInvoicePaidCommand, _, _>(|scope: &RepositoryScope| {
        MarkInvoicePaidHandler::new(scope.uow.clone(), scope.invoices.clone())
    })?;
    dispatcher.register::<GetInvoiceByIdQuery, _, _>(|scope: &RepositoryScope| {
        GetInvoiceByIdHandler::new(scope.invoices.clone())
    })?;
    dispatcher.register::<GetUserInvoicesQuery, _, _>(|scope: &RepositoryScope| {
        GetUserInvoicesHandler::new(scope.users.clone(), scope.invoices.clone())
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::test_support::TestContext;
    use super::*;
    use crate::adapters::memory::MemoryStore;
    use crate::adapters::notification::LoggingNotificationSender;
    use crate::domain::foundation::ErrorCode;

    #[test]
    fn every_request_type_gets_one_handler() {
        let ctx = TestContext::new();

        assert_eq!(ctx.dispatcher.len(), 36);
        assert!(ctx.dispatcher.is_registered::<CreateUserCommand>());
        assert!(ctx.dispatcher.is_registered::<GetUserInvoicesQuery>());
        assert!(ctx.dispatcher.is_registered::<SendWorkoutReminderCommand>());
    }

    #[test]
    fn registering_twice_is_rejected() {
        let mut dispatcher = Dispatcher::new(Arc::new(MemoryStore::new()));
        let notifier: Arc<dyn NotificationSender> = Arc::new(LoggingNotificationSender::new());
        register_all(&mut dispatcher, notifier.clone(), BillingPolicy::default()).unwrap();

        let err = register_all(&mut dispatcher, notifier, BillingPolicy::default()).unwrap_err();

        assert_eq!(err.code, ErrorCode::InternalError);
    }
}
