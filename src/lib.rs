//! Unit-Linked System - Day-granularity projection engine for unit-linked savings and insurance policies
//!
//! This library provides:
//! - Daily simulation of a single policy across three unit ledgers
//! - A product configuration layer with per-product fee, bonus, and tax-credit rules
//! - Payment plan building with indexation and per-year overrides
//! - Flat-rate and fund-price-based yield sources
//! - Year and month summary rows with surrender values and projection totals

pub mod calendar;
pub mod input;
pub mod products;
pub mod projection;
pub mod yields;

// Re-export commonly used types
pub use input::{Currency, PaymentFrequency, RawInput};
pub use products::{calculate, ProductConfig, ProductError, ProductId};
pub use projection::{simulate, EngineInput, ProjectionResult, YearRecord};
pub use yields::YieldSource;
