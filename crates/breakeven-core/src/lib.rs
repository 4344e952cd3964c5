pub mod engine;
pub mod error;
pub mod mix;
pub mod types;
pub mod worksheet;

#[cfg(feature = "projects")]
pub mod project;

#[cfg(feature = "narrative")]
pub mod narrative;

pub use engine::{evaluate, CalculationResults, FinancialInputs, TargetProfitMode};
pub use error::BreakevenError;
pub use types::*;

/// Standard result type for all breakeven operations
pub type BreakevenResult<T> = Result<T, BreakevenError>;
