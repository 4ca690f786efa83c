//! Shared fixtures for handler tests.

use std::sync::Arc;

use chrono::NaiveDate;

use super::register_all;
use crate::adapters::memory::MemoryStore;
use crate::adapters::notification::RecordingNotificationSender;
use crate::application::{BillingPolicy, Dispatcher};
use crate::domain::foundation::{Currency, Money, Timestamp};
use crate::domain::subscription::SubscriptionPlan;
use crate::domain::trainer::Trainer;
use crate::domain::user::{ContactInfo, Gender, PersonalInfo, User};
use crate::ports::{RepositoryScope, RepositoryScopeFactory};

pub(crate) struct TestContext {
    pub store: MemoryStore,
    pub notifier: Arc<RecordingNotificationSender>,
    pub dispatcher: Dispatcher,
}

impl TestContext {
    pub fn new() -> Self {
        let store = MemoryStore::new();
        let notifier = Arc::new(RecordingNotificationSender::new());
        let mut dispatcher = Dispatcher::new(Arc::new(store.clone()));
        register_all(&mut dispatcher, notifier.clone(), BillingPolicy::default())
            .expect("handlers register once");
        Self {
            store,
            notifier,
            dispatcher,
        }
    }

    pub fn scope(&self) -> RepositoryScope {
        self.store.open_scope()
    }

    pub async fn seed_user(&self, email: &str) -> User {
        let user = member(email);
        self.scope().users.add(&user).await.unwrap();
        user
    }

    pub async fn seed_plan(&self, name: &str, cents: i64, days: u32) -> SubscriptionPlan {
        let plan = SubscriptionPlan::create_new(name, None, sar(cents), days, vec![]).unwrap();
        self.scope().plans.add(&plan).await.unwrap();
        plan
    }

    pub async fn seed_trainer(&self, first: &str, last: &str) -> Trainer {
        let email = format!("{}@gym.example", first.to_lowercase());
        let trainer = Trainer::create_new(first, last, &email, None).unwrap();
        self.scope().trainers.add(&trainer).await.unwrap();
        trainer
    }
}

pub(crate) fn member(email: &str) -> User {
    let dob = NaiveDate::from_ymd_opt(1992, 3, 14).unwrap();
    User::create_new(
        PersonalInfo::new("Sara", "Khalid", dob, Gender::Female, Timestamp::now().date()).unwrap(),
        ContactInfo::new(email, None).unwrap(),
        None,
    )
    .unwrap()
}

pub(crate) fn sar(cents: i64) -> Money {
    Money::new(cents, Currency::default_currency()).unwrap()
}
