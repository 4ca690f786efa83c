//! User aggregate.
//!
//! A registered club member together with the subscriptions they hold.

use serde::{Deserialize, Serialize};

use super::status::{SubscriptionStatus, UserStatus};
use super::subscription::UserSubscription;
use super::values::{normalize_language, ContactInfo, MembershipNumber, PersonalInfo, MINIMUM_AGE_YEARS};
use crate::domain::foundation::{
    DomainError, ErrorCode, StateMachine, SubscriptionId, Timestamp, UserId,
};
use crate::domain::subscription::SubscriptionPlan;

/// User aggregate.
///
/// # Invariants
///
/// - Age is at least [`MINIMUM_AGE_YEARS`] at registration
/// - At most one subscription is active at any point in time
/// - Subscriptions are only mutated through this aggregate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    personal_info: PersonalInfo,
    contact_info: ContactInfo,
    membership_number: MembershipNumber,
    status: UserStatus,
    preferred_language: String,
    subscriptions: Vec<UserSubscription>,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl User {
    /// Registers a new, active member.
    ///
    /// Email uniqueness is a cross-aggregate rule checked by the caller.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if the member is younger than the minimum age or
    ///   the language code is malformed
    pub fn create_new(
        personal_info: PersonalInfo,
        contact_info: ContactInfo,
        preferred_language: Option<String>,
    ) -> Result<Self, DomainError> {
        let now = Timestamp::now();
        let age = personal_info.age_on(now.date());
        if age < MINIMUM_AGE_YEARS {
            return Err(DomainError::validation(
                "date_of_birth",
                format!("Member must be at least {} years old", MINIMUM_AGE_YEARS),
            ));
        }
        let preferred_language = normalize_language(preferred_language)?;

        Ok(Self {
            id: UserId::new(),
            personal_info,
            contact_info,
            membership_number: MembershipNumber::generate(),
            status: UserStatus::Active,
            preferred_language,
            subscriptions: Vec::new(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Reconstitute a user from persistence (no validation).
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: UserId,
        personal_info: PersonalInfo,
        contact_info: ContactInfo,
        membership_number: MembershipNumber,
        status: UserStatus,
        preferred_language: String,
        subscriptions: Vec<UserSubscription>,
        created_at: Timestamp,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            id,
            personal_info,
            contact_info,
            membership_number,
            status,
            preferred_language,
            subscriptions,
            created_at,
            updated_at,
        }
    }

    // ════════════════════════════════════════════════════════════════════════
    // Accessors
    // ════════════════════════════════════════════════════════════════════════

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn personal_info(&self) -> &PersonalInfo {
        &self.personal_info
    }

    pub fn contact_info(&self) -> &ContactInfo {
        &self.contact_info
    }

    pub fn email(&self) -> &str {
        self.contact_info.email()
    }

    pub fn first_name(&self) -> &str {
        self.personal_info.first_name()
    }

    pub fn membership_number(&self) -> &MembershipNumber {
        &self.membership_number
    }

    pub fn status(&self) -> UserStatus {
        self.status
    }

    pub fn is_active(&self) -> bool {
        self.status == UserStatus::Active
    }

    pub fn preferred_language(&self) -> &str {
        &self.preferred_language
    }

    pub fn subscriptions(&self) -> &[UserSubscription] {
        &self.subscriptions
    }

    pub fn subscription(&self, id: &SubscriptionId) -> Option<&UserSubscription> {
        self.subscriptions.iter().find(|s| s.id() == id)
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    /// The subscription active as of `now`, if any.
    pub fn active_subscription_at(&self, now: &Timestamp) -> Option<&UserSubscription> {
        self.subscriptions.iter().find(|s| s.is_active_at(now))
    }

    /// Derived at read time; expired subscriptions do not count.
    pub fn has_active_subscription(&self) -> bool {
        self.active_subscription_at(&Timestamp::now()).is_some()
    }

    // ════════════════════════════════════════════════════════════════════════
    // Behaviors
    // ════════════════════════════════════════════════════════════════════════

    /// Replaces personal and contact details together. A `language` of
    /// `None` keeps the current preferred language.
    ///
    /// # Errors
    ///
    /// - `ConflictingState` if the account is inactive
    /// - `ValidationFailed` if the language is not a two-letter code
    pub fn update_info(
        &mut self,
        personal_info: PersonalInfo,
        contact_info: ContactInfo,
        language: Option<String>,
    ) -> Result<(), DomainError> {
        if self.status == UserStatus::Inactive {
            return Err(DomainError::conflicting_state(
                UserStatus::AGGREGATE,
                self.status,
                "update",
            ));
        }
        let preferred_language = match language {
            Some(raw) => normalize_language(Some(raw))?,
            None => self.preferred_language.clone(),
        };
        self.personal_info = personal_info;
        self.contact_info = contact_info;
        self.preferred_language = preferred_language;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// Soft-deletes the account (Active|Suspended → Inactive).
    pub fn deactivate(&mut self) -> Result<(), DomainError> {
        self.transition(UserStatus::Inactive, "deactivate")
    }

    /// Bars the member temporarily (Active → Suspended).
    pub fn suspend(&mut self) -> Result<(), DomainError> {
        self.transition(UserStatus::Suspended, "suspend")
    }

    /// Restores access (Inactive|Suspended → Active).
    pub fn reactivate(&mut self) -> Result<(), DomainError> {
        self.transition(UserStatus::Active, "reactivate")
    }

    /// Subscribes the member to `plan` starting at `start_date`.
    ///
    /// # Errors
    ///
    /// - `ConflictingState` if the member is not active, the plan is not
    ///   available, or an active subscription overlaps the new window
    pub fn subscribe(
        &mut self,
        plan: &SubscriptionPlan,
        start_date: Timestamp,
    ) -> Result<SubscriptionId, DomainError> {
        if self.status != UserStatus::Active {
            return Err(DomainError::conflicting_state(
                UserStatus::AGGREGATE,
                self.status,
                "subscribe",
            ));
        }
        plan.ensure_available()?;

        let now = Timestamp::now();
        let overlapping = self.subscriptions.iter().find(|s| {
            s.effective_status(&now) == SubscriptionStatus::Active
                && s.end_date().is_after(&start_date)
        });
        if let Some(existing) = overlapping {
            return Err(DomainError::new(
                ErrorCode::ConflictingState,
                "User already holds an active subscription for this period",
            )
            .with_detail("aggregate", UserStatus::AGGREGATE)
            .with_detail("current_status", "HasActiveSubscription")
            .with_detail("attempted_action", "subscribe")
            .with_detail("subscription_id", existing.id().to_string()));
        }

        let subscription = UserSubscription::start(
            self.id,
            *plan.id(),
            plan.name().to_string(),
            plan.price().clone(),
            start_date,
            plan.duration_days(),
        );
        let id = *subscription.id();
        self.subscriptions.push(subscription);
        self.updated_at = now;
        Ok(id)
    }

    /// Cancels one of the member's subscriptions.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the subscription does not belong to this user
    /// - `ConflictingState` if it is already cancelled or expired
    pub fn cancel_subscription(&mut self, id: &SubscriptionId) -> Result<(), DomainError> {
        let now = Timestamp::now();
        let subscription = self
            .subscriptions
            .iter_mut()
            .find(|s| s.id() == id)
            .ok_or_else(|| DomainError::not_found("UserSubscription", id))?;
        subscription.cancel(now)?;
        self.updated_at = now;
        Ok(())
    }

    fn transition(&mut self, target: UserStatus, action: &str) -> Result<(), DomainError> {
        self.status = self.status.transition_to(target, action)?;
        self.updated_at = Timestamp::now();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{Currency, Money};
    use crate::domain::user::Gender;
    use chrono::{Datelike, NaiveDate};

    fn personal(years_old: i32) -> PersonalInfo {
        let today = Timestamp::now().date();
        let dob = NaiveDate::from_ymd_opt(today.year() - years_old, 1, 1).unwrap();
        PersonalInfo::new("Sara", "Ali", dob.min(today), Gender::Female, today).unwrap()
    }

    fn contact() -> ContactInfo {
        ContactInfo::new("sara@example.com", None).unwrap()
    }

    fn member() -> User {
        User::create_new(personal(30), contact(), None).unwrap()
    }

    fn plan() -> SubscriptionPlan {
        SubscriptionPlan::create_new(
            "Monthly",
            None,
            Money::new(29_900, Currency::default_currency()).unwrap(),
            30,
            vec![],
        )
        .unwrap()
    }

    #[test]
    fn create_new_starts_active_without_subscription() {
        let user = member();

        assert_eq!(user.status(), UserStatus::Active);
        assert!(!user.has_active_subscription());
        assert_eq!(user.preferred_language(), "en");
        assert!(user.membership_number().as_str().starts_with("GYM-"));
    }

    #[test]
    fn create_new_rejects_members_under_minimum_age() {
        let err = User::create_new(personal(10), contact(), None).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert!(err.details.contains_key("date_of_birth"));
    }

    #[test]
    fn suspend_requires_active() {
        let mut user = member();
        user.deactivate().unwrap();

        let err = user.suspend().unwrap_err();
        assert_eq!(err.code, ErrorCode::ConflictingState);
        assert_eq!(err.detail("current_status"), Some("Inactive"));
        assert_eq!(user.status(), UserStatus::Inactive);
    }

    #[test]
    fn reactivate_from_suspended() {
        let mut user = member();
        user.suspend().unwrap();
        user.reactivate().unwrap();
        assert!(user.is_active());
    }

    #[test]
    fn reactivate_active_user_conflicts() {
        let mut user = member();
        assert!(user.reactivate().unwrap_err().is_conflicting_state());
    }

    #[test]
    fn update_info_replaces_both_value_objects() {
        let mut user = member();
        let new_contact = ContactInfo::new("new@example.com", Some("0501234567".to_string())).unwrap();

        user.update_info(personal(31), new_contact, None).unwrap();

        assert_eq!(user.email(), "new@example.com");
        assert_eq!(user.contact_info().phone(), Some("0501234567"));
        assert_eq!(user.preferred_language(), "en");
    }

    #[test]
    fn update_info_changes_language_with_details() {
        let mut user = member();

        user.update_info(personal(31), contact(), Some("AR".to_string()))
            .unwrap();

        assert_eq!(user.preferred_language(), "ar");
    }

    #[test]
    fn update_info_with_bad_language_changes_nothing() {
        let mut user = member();
        let before = user.clone();
        let new_contact = ContactInfo::new("new@example.com", None).unwrap();

        let err = user
            .update_info(personal(31), new_contact, Some("english".to_string()))
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert_eq!(user, before);
    }

    #[test]
    fn update_info_rejected_for_inactive_user() {
        let mut user = member();
        user.deactivate().unwrap();
        let err = user.update_info(personal(30), contact(), None).unwrap_err();
        assert_eq!(err.code, ErrorCode::ConflictingState);
        assert_eq!(user.email(), "sara@example.com");
    }

    #[test]
    fn subscribe_creates_active_subscription() {
        let mut user = member();
        let plan = plan();

        let id = user.subscribe(&plan, Timestamp::now()).unwrap();

        assert!(user.has_active_subscription());
        let sub = user.subscription(&id).unwrap();
        assert_eq!(sub.plan_id(), plan.id());
        assert_eq!(sub.plan_name(), "Monthly");
    }

    #[test]
    fn subscribe_twice_conflicts() {
        let mut user = member();
        let plan = plan();
        user.subscribe(&plan, Timestamp::now()).unwrap();

        let err = user.subscribe(&plan, Timestamp::now()).unwrap_err();
        assert_eq!(err.code, ErrorCode::ConflictingState);
        assert_eq!(user.subscriptions().len(), 1);
    }

    #[test]
    fn subscribe_after_previous_window_ends_is_allowed() {
        let mut user = member();
        let plan = plan();
        user.subscribe(&plan, Timestamp::now()).unwrap();

        user.subscribe(&plan, Timestamp::now().add_days(31)).unwrap();
        assert_eq!(user.subscriptions().len(), 2);
    }

    #[test]
    fn subscribe_rejects_inactive_plan() {
        let mut user = member();
        let mut plan = plan();
        plan.deactivate().unwrap();

        let err = user.subscribe(&plan, Timestamp::now()).unwrap_err();
        assert_eq!(err.detail("aggregate"), Some("SubscriptionPlan"));
    }

    #[test]
    fn subscribe_rejects_suspended_user() {
        let mut user = member();
        user.suspend().unwrap();
        let err = user.subscribe(&plan(), Timestamp::now()).unwrap_err();
        assert_eq!(err.detail("current_status"), Some("Suspended"));
    }

    #[test]
    fn cancel_subscription_allows_resubscribe() {
        let mut user = member();
        let plan = plan();
        let id = user.subscribe(&plan, Timestamp::now()).unwrap();

        user.cancel_subscription(&id).unwrap();
        assert!(!user.has_active_subscription());

        let err = user.cancel_subscription(&id).unwrap_err();
        assert_eq!(err.code, ErrorCode::ConflictingState);

        user.subscribe(&plan, Timestamp::now()).unwrap();
        assert!(user.has_active_subscription());
    }

    #[test]
    fn cancel_unknown_subscription_is_not_found() {
        let mut user = member();
        let err = user.cancel_subscription(&SubscriptionId::new()).unwrap_err();
        assert!(err.is_not_found());
    }
}
