//! Flattening into a solver-agnostic LP.
//!
//! The problem is `minimize c·x` subject to `A_ub·x <= b_ub`, `A_eq·x == b_eq`
//! and `lower <= x <= upper`. Columns hold the capacity variables followed by the
//! production variables, each stacked over their axes sorted by name. Rows of a
//! constraint are stacked over its row axes sorted by name.

use nalgebra_sparse::CscMatrix;
use tracing::debug;

use crate::constraints::{Constraint, ConstraintKind};
use crate::costs::lp_costs;
use crate::error::{LpError, Result};
use crate::inputs::Technologies;
use crate::matrix::lp_constraint;
use crate::merge::merge_lp;
use crate::sparse::Triplets;
use crate::tensor::{decision_name, Axis, NamedArray};
use crate::timeslice::Timeslices;

/// Variable bounds applied to every decision variable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub lower: f64,
    /// `None` is unbounded.
    pub upper: Option<f64>,
}

impl Default for Bounds {
    fn default() -> Self {
        Bounds {
            lower: 0.0,
            upper: None,
        }
    }
}

/// Flat linear program.
#[derive(Debug, Clone)]
pub struct LpProblem {
    /// Cost vector.
    pub c: Vec<f64>,
    /// Inequality matrix, `None` without `<=`/`>=` constraints.
    pub a_ub: Option<CscMatrix<f64>>,
    pub b_ub: Option<Vec<f64>>,
    /// Equality matrix, `None` without `==` constraints.
    pub a_eq: Option<CscMatrix<f64>>,
    pub b_eq: Option<Vec<f64>>,
    pub bounds: Bounds,
    /// Axes of the capacity variables, in column order.
    pub capacity_axes: Vec<Axis>,
    /// Axes of the production variables, in column order.
    pub production_axes: Vec<Axis>,
}

impl LpProblem {
    pub fn num_capacity(&self) -> usize {
        stacked_len(&self.capacity_axes)
    }

    pub fn num_production(&self) -> usize {
        stacked_len(&self.production_axes)
    }

    pub fn num_vars(&self) -> usize {
        self.c.len()
    }

    pub fn num_ub(&self) -> usize {
        self.b_ub.as_ref().map_or(0, Vec::len)
    }

    pub fn num_eq(&self) -> usize {
        self.b_eq.as_ref().map_or(0, Vec::len)
    }

    /// Split a flat solution back into capacity and production tensors.
    pub fn unpack(&self, x: &[f64]) -> Result<(NamedArray, NamedArray)> {
        if x.len() != self.num_vars() {
            return Err(LpError::ShapeMismatch {
                expected: format!("{} values", self.num_vars()),
                got: format!("{} values", x.len()),
            });
        }
        let (capacity, production) = x.split_at(self.num_capacity());
        Ok((
            NamedArray::from_vec(self.capacity_axes.clone(), capacity.to_vec())?,
            NamedArray::from_vec(self.production_axes.clone(), production.to_vec())?,
        ))
    }
}

/// Compile technologies, capacity costs and constraints into a flat LP.
///
/// `technologies` must already be reduced to a single year. `>=` constraints
/// are negated into `<=` form; constraint order is preserved within the
/// inequality and equality groups.
pub fn lp_problem(
    technologies: &Technologies,
    costs: &NamedArray,
    timeslices: &Timeslices,
    constraints: &[Constraint],
) -> Result<LpProblem> {
    technologies.ensure_single_year()?;
    let lp_costs = lp_costs(technologies, costs, timeslices)?;
    let (lp_costs, constraints) = merge_lp(&lp_costs, constraints)?;

    let capacity_axes = sorted_axes(lp_costs.capacity.axes());
    let production_axes = sorted_axes(lp_costs.production.axes());
    let capacity_cols = decision_axes(&capacity_axes);
    let production_cols = decision_axes(&production_axes);
    let num_capacity = lp_costs.capacity_size();
    let ncols = num_capacity + lp_costs.production_size();
    if ncols == 0 {
        return Err(LpError::Inconsistent("no decision variables".into()));
    }

    let mut c = lp_costs.capacity.flatten(&capacity_axes)?;
    c.extend(lp_costs.production.flatten(&production_axes)?);

    let mut ub = Rows::new(ncols);
    let mut eq = Rows::new(ncols);
    for constraint in &constraints {
        let mut compiled = lp_constraint(constraint, &lp_costs)?;
        if compiled.kind == ConstraintKind::LowerBound {
            compiled = compiled.negated();
        }
        let rows = sorted_axes(compiled.b.axes());
        let target = match compiled.kind {
            ConstraintKind::Equality => &mut eq,
            ConstraintKind::UpperBound | ConstraintKind::LowerBound => &mut ub,
        };
        target.matrix.push_block(
            &compiled.capacity.to_matrix(&rows, &capacity_cols)?,
            0,
        );
        target.matrix.push_block(
            &compiled.production.to_matrix(&rows, &production_cols)?,
            num_capacity,
        );
        let b = compiled.b.flatten(&rows)?;
        target.matrix.advance(b.len());
        target.b.extend(b);
    }

    let (a_ub, b_ub) = ub.finish();
    let (a_eq, b_eq) = eq.finish();
    debug!(
        columns = ncols,
        capacity = num_capacity,
        ub_rows = b_ub.as_ref().map_or(0, Vec::len),
        eq_rows = b_eq.as_ref().map_or(0, Vec::len),
        "built linear program"
    );

    Ok(LpProblem {
        c,
        a_ub,
        b_ub,
        a_eq,
        b_eq,
        bounds: Bounds::default(),
        capacity_axes,
        production_axes,
    })
}

/// Rows of one constraint group.
struct Rows {
    matrix: Triplets,
    b: Vec<f64>,
}

impl Rows {
    fn new(ncols: usize) -> Self {
        Rows {
            matrix: Triplets::new(ncols),
            b: Vec::new(),
        }
    }

    fn finish(self) -> (Option<CscMatrix<f64>>, Option<Vec<f64>>) {
        if self.b.is_empty() {
            (None, None)
        } else {
            (Some(self.matrix.into_csc()), Some(self.b))
        }
    }
}

fn sorted_axes(axes: &[Axis]) -> Vec<Axis> {
    let mut sorted = axes.to_vec();
    sorted.sort_by(|a, b| a.name().cmp(b.name()));
    sorted
}

fn decision_axes(axes: &[Axis]) -> Vec<Axis> {
    axes.iter().map(|a| a.renamed(decision_name(a.name()))).collect()
}

fn stacked_len(axes: &[Axis]) -> usize {
    axes.iter().map(Axis::len).product()
}
