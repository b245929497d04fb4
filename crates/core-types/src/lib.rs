pub mod enums;
pub mod error;
pub mod filters;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::{Column, UrgencyBand, CRITICAL_THRESHOLD_YEARS};
pub use error::CoreError;
pub use filters::{FilterSet, YearRange};
pub use structs::SkillRecord;
