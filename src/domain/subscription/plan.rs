//! SubscriptionPlan aggregate.
//!
//! A priced, named offering members subscribe to. Plans are immutable once
//! created except for toggling availability.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    optional_text, required_text, DomainError, Money, PlanId, Timestamp, ValidationError,
};

/// Longest plan duration accepted (ten years).
pub const MAX_DURATION_DAYS: u32 = 3650;

/// Maximum length for plan names.
pub const MAX_NAME_LENGTH: usize = 100;

/// SubscriptionPlan aggregate.
///
/// # Invariants
///
/// - `price` is strictly positive
/// - `duration_days` is in `1..=MAX_DURATION_DAYS`
/// - `name` is non-empty
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionPlan {
    id: PlanId,
    name: String,
    description: Option<String>,
    price: Money,
    duration_days: u32,
    features: Vec<String>,
    is_active: bool,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl SubscriptionPlan {
    /// Creates a new, active plan.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` for an empty name, a non-positive price or a
    ///   duration outside the accepted range
    pub fn create_new(
        name: impl Into<String>,
        description: Option<String>,
        price: Money,
        duration_days: u32,
        features: Vec<String>,
    ) -> Result<Self, DomainError> {
        let name = required_text("name", name)?;
        if name.chars().count() > MAX_NAME_LENGTH {
            return Err(ValidationError::out_of_range(
                "name",
                1,
                MAX_NAME_LENGTH as i64,
                name.chars().count() as i64,
            )
            .into());
        }
        if !price.is_positive() {
            return Err(DomainError::validation("price", "Price must be greater than zero"));
        }
        if duration_days == 0 || duration_days > MAX_DURATION_DAYS {
            return Err(ValidationError::out_of_range(
                "duration_days",
                1,
                MAX_DURATION_DAYS as i64,
                duration_days as i64,
            )
            .into());
        }

        let features = features
            .into_iter()
            .map(|f| f.trim().to_string())
            .filter(|f| !f.is_empty())
            .collect();

        let now = Timestamp::now();
        Ok(Self {
            id: PlanId::new(),
            name,
            description: optional_text(description),
            price,
            duration_days,
            features,
            is_active: true,
            created_at: now,
            updated_at: now,
        })
    }

    /// Reconstitute a plan from persistence (no validation).
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: PlanId,
        name: String,
        description: Option<String>,
        price: Money,
        duration_days: u32,
        features: Vec<String>,
        is_active: bool,
        created_at: Timestamp,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            id,
            name,
            description,
            price,
            duration_days,
            features,
            is_active,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> &PlanId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn price(&self) -> &Money {
        &self.price
    }

    pub fn duration_days(&self) -> u32 {
        self.duration_days
    }

    pub fn features(&self) -> &[String] {
        &self.features
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    /// Make the plan available for new subscriptions.
    ///
    /// # Errors
    ///
    /// - `ConflictingState` if the plan is already active
    pub fn activate(&mut self) -> Result<(), DomainError> {
        if self.is_active {
            return Err(DomainError::conflicting_state(
                "SubscriptionPlan",
                PlanAvailability::Active,
                "activate",
            ));
        }
        self.is_active = true;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// Withdraw the plan from sale. Existing subscriptions are unaffected.
    ///
    /// # Errors
    ///
    /// - `ConflictingState` if the plan is already inactive
    pub fn deactivate(&mut self) -> Result<(), DomainError> {
        if !self.is_active {
            return Err(DomainError::conflicting_state(
                "SubscriptionPlan",
                PlanAvailability::Inactive,
                "deactivate",
            ));
        }
        self.is_active = false;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// Checks that members can currently subscribe to this plan.
    pub fn ensure_available(&self) -> Result<(), DomainError> {
        if self.is_active {
            Ok(())
        } else {
            Err(DomainError::conflicting_state(
                "SubscriptionPlan",
                PlanAvailability::Inactive,
                "subscribe to",
            ))
        }
    }
}

/// Availability reported in plan conflict errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PlanAvailability {
    Active,
    Inactive,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{Currency, ErrorCode};

    fn price(cents: i64) -> Money {
        Money::new(cents, Currency::default_currency()).unwrap()
    }

    fn monthly() -> SubscriptionPlan {
        SubscriptionPlan::create_new(
            "Monthly",
            Some("  Full gym access  ".to_string()),
            price(29_900),
            30,
            vec!["Gym floor".to_string(), " ".to_string(), "Sauna".to_string()],
        )
        .unwrap()
    }

    #[test]
    fn create_new_starts_active_and_cleans_inputs() {
        let plan = monthly();

        assert!(plan.is_active());
        assert_eq!(plan.description(), Some("Full gym access"));
        assert_eq!(plan.features(), &["Gym floor".to_string(), "Sauna".to_string()]);
    }

    #[test]
    fn create_new_rejects_zero_price() {
        let err = SubscriptionPlan::create_new("Free", None, price(0), 30, vec![]).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[test]
    fn create_new_rejects_zero_duration() {
        let err = SubscriptionPlan::create_new("Broken", None, price(100), 0, vec![]).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[test]
    fn create_new_rejects_blank_name() {
        assert!(SubscriptionPlan::create_new("  ", None, price(100), 30, vec![]).is_err());
    }

    #[test]
    fn deactivate_then_activate_round_trips() {
        let mut plan = monthly();

        plan.deactivate().unwrap();
        assert!(!plan.is_active());
        assert!(plan.ensure_available().is_err());

        plan.activate().unwrap();
        assert!(plan.is_active());
    }

    #[test]
    fn toggling_to_current_state_conflicts() {
        let mut plan = monthly();
        let err = plan.activate().unwrap_err();
        assert_eq!(err.code, ErrorCode::ConflictingState);

        plan.deactivate().unwrap();
        let err = plan.deactivate().unwrap_err();
        assert_eq!(err.code, ErrorCode::ConflictingState);
        assert_eq!(err.detail("current_status"), Some("Inactive"));
    }
}
