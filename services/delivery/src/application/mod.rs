//! Application layer

mod engine;
mod outcome;
mod sales;

pub use engine::ReconciliationEngine;
pub use outcome::{Progress, ReconciliationReport, ScanOutcome};
pub use sales::PendingSalesHandler;
