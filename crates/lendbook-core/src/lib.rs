pub mod dates;
pub mod error;
pub mod ledger;
pub mod types;

#[cfg(feature = "schedule")]
pub mod schedule;

#[cfg(feature = "analytics")]
pub mod analytics;

pub use error::LendingError;
pub use types::*;

/// Standard result type for all lendbook operations
pub type LendingResult<T> = Result<T, LendingError>;
