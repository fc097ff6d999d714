//! Investment constraints and their generators.
//!
//! This module provides:
//! - `Constraint`: the standardized `capacity · x + production · y ~ b` record
//! - `Registry` / `ConstraintFactory`: named generators and configured constraint lists
//! - the built-in generators `max_capacity_expansion`, `demand` and `max_production`

pub mod constraint;
pub mod generators;
pub mod registry;

pub use constraint::{Constraint, ConstraintKind, RawConstraint};
pub use generators::{demand, max_capacity_expansion, max_production};
pub use registry::{ConstraintFactory, ConstraintGenerator, Registry};
