pub mod errors;
pub mod scales;
pub mod types;

pub use errors::{EntityKind, Error, ErrorCode, Result, ResultExt};
pub use scales::{Detectability, Probability, Severity};
pub use types::{ControlType, HazardCategory, ImplementationStatus, RiskLevel};
