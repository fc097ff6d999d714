//! Solver interface.
//!
//! Solves a flattened [`LpProblem`](crate::adapter::LpProblem) with Clarabel.

pub mod clarabel;

pub use self::clarabel::{solve, Settings, Solution, SolveStatus};
