//! # investlp
//!
//! Compiles investment constraints over named dimensions into the flat matrix
//! form of a linear program.
//!
//! Constraints on installable capacity, production and demand are expressed as
//! tensors over named axes (technology, region, time-slice, commodity, asset).
//! The compiler decides per axis whether it is reduced, broadcast or diagonal,
//! assembles one 2-D block per constraint and decision kind, and stacks the
//! blocks into `minimize c·x` subject to `A_ub·x <= b_ub`, `A_eq·x == b_eq`,
//! `x >= 0`.
//!
//! ## Quick Start
//!
//! ```ignore
//! use investlp::prelude::*;
//!
//! let registry = Registry::with_defaults();
//! let factory = registry.factory(ConstraintSpec::from_json(
//!     r#"[{"name": "max_capacity_expansion"}, {"name": "demand"}, {"name": "max_production"}]"#,
//! )?)?;
//! let constraints = factory.build(
//!     &assets, &search_space, &market, &technologies, year, &ConstraintParams::default(),
//! )?;
//!
//! let technologies = technologies.at_year(year, Interpolation::Linear)?;
//! let lp = lp_problem(&technologies, &costs, &market.timeslices, &constraints)?;
//! let solution = solve(&lp, &Settings::default())?;
//! let (capacity, production) = lp.unpack(&solution.x.unwrap())?;
//! ```
//!
//! ## Pipeline
//!
//! - **Registry** maps names to constraint generators, **ConstraintFactory** runs
//!   a configured list of them
//! - **lp_costs** derives the decision variables from capacity costs
//! - **merge_lp** unifies coordinates across costs and constraints
//! - **lp_constraint_matrix** compiles one coefficient tensor into a matrix block
//! - **lp_problem** flattens everything into sparse matrices
//! - **solver** solves the flat problem with Clarabel

pub mod adapter;
pub mod config;
pub mod constraints;
pub mod costs;
pub mod error;
pub mod inputs;
pub mod matrix;
pub mod merge;
pub mod solver;
pub mod sparse;
pub mod tensor;
pub mod timeslice;

/// Prelude module for convenient imports.
///
/// ```ignore
/// use investlp::prelude::*;
/// ```
pub mod prelude {
    // Tensors
    pub use crate::tensor::{Axis, Interpolation, Label, NamedArray};

    // Inputs
    pub use crate::inputs::{Assets, Commodity, CommodityUsage, Market, SearchSpace, Technologies};
    pub use crate::timeslice::Timeslices;

    // Constraints
    pub use crate::config::{ConstraintEntry, ConstraintParams, ConstraintSpec};
    pub use crate::constraints::{
        Constraint, ConstraintFactory, ConstraintKind, RawConstraint, Registry,
    };

    // Compilation
    pub use crate::adapter::{lp_problem, Bounds, LpProblem};
    pub use crate::costs::{lp_costs, LpCosts};
    pub use crate::matrix::{lp_constraint, lp_constraint_matrix, LpConstraint};
    pub use crate::merge::merge_lp;

    // Solver
    pub use crate::solver::{solve, Settings, Solution, SolveStatus};

    // Errors
    pub use crate::error::{LpError, Result};
}

// Re-export main types at crate root
pub use adapter::{lp_problem, LpProblem};
pub use error::{LpError, Result};
pub use solver::{Solution, SolveStatus};
