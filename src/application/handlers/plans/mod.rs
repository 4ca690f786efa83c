//! Subscription plan handlers.

mod change_availability;
mod create_plan;
mod get_plan;
mod get_plans;

pub use change_availability::{
    ActivatePlanCommand, ChangePlanAvailabilityHandler, DeactivatePlanCommand,
};
pub use create_plan::{CreatePlanCommand, CreatePlanHandler};
pub use get_plan::{GetPlanByIdHandler, GetPlanByIdQuery};
pub use get_plans::{GetPlansHandler, GetPlansQuery};
