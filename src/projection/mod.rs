//! Daily projection engine for a single unit-linked policy

mod engine;
mod ledger;
mod state;
mod summary;

pub use engine::{simulate, EngineInput, Simulation};
pub use ledger::{safe_div, Account, Ledger, LedgerKind};
pub use state::{PeriodAccum, SimulationState};
pub use summary::{MonthRecord, ProjectionResult, Totals, YearRecord};
