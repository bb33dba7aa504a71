//! Caller input types, plan expansion, and the fund price loader

mod data;
mod plan;
pub mod loader;

pub use data::{Currency, PaymentFrequency, PlanOverrides, RawInput};
pub use plan::{build_plan, PaymentPlan};
