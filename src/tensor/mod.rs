//! Named-axis tensors.
//!
//! This module provides:
//! - `Label` and `Axis`: coordinate systems keyed by axis name
//! - `NamedArray`: a dense labelled array with alignment, reduction and broadcasting
//! - `classify_axes`: the diagonal / reduced / expanded axis algebra

pub mod axis;
pub mod named;
pub mod roles;

pub use axis::{constraint_name, decision_name, Axis, Label};
pub use named::{union_axes, Interpolation, NamedArray};
pub use roles::{classify_axes, AxisRoles};
