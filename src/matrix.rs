//! Constraint matrix compilation.
//!
//! Turns one coefficient tensor of a constraint into a block of the LP matrix:
//! a tensor whose axes are the constraint-row axes `c(..)` (those of `b`) and the
//! decision-column axes `d(..)` (those of the decision costs). Stacking the two
//! groups of axes yields the 2-D block.

use tracing::{debug, trace, warn};

use crate::constraints::{Constraint, ConstraintKind};
use crate::costs::LpCosts;
use crate::error::{LpError, Result};
use crate::tensor::{classify_axes, constraint_name, decision_name, Axis, NamedArray};

/// Transform one constraint block into an LP matrix block.
///
/// 1. Axes of `coefficient` in neither `b` nor `decision` are summed out.
/// 2. Remaining axes shared with `decision` become `d(..)` axes, those shared
///    with `b` only become `c(..)` axes.
/// 3. The block is broadcast along `decision` axes absent from `coefficient`
///    and `b`, and along `b` axes absent from `coefficient` and `decision`.
/// 4. Axes shared by `b` and `decision` are diagonal: the block is multiplied by
///    the identity between `c(axis)` and `d(axis)`.
///
/// The result spans exactly the `c(..)` versions of `b`'s axes and the `d(..)`
/// versions of `decision`'s axes. A diagonal axis whose labels differ between
/// `b` and `decision` is an [`LpError::AxisMismatch`].
pub fn lp_constraint_matrix(
    b: &NamedArray,
    coefficient: &NamedArray,
    decision: &NamedArray,
) -> Result<NamedArray> {
    let roles = classify_axes(coefficient, b, decision);
    trace!(?roles, "axis roles");

    let mut result = coefficient.sum_over(&roles.reduced)?;

    let diagonal_in = roles.diagonal_in(coefficient);
    for name in roles.decision.iter().chain(&diagonal_in) {
        axis_of(decision, name)?.ensure_aligned(axis_of(&result, name)?)?;
        result = result.rename(name, &decision_name(name))?;
    }
    for name in &roles.constraint {
        axis_of(b, name)?.ensure_aligned(axis_of(&result, name)?)?;
        result = result.rename(name, &constraint_name(name))?;
    }

    for name in &roles.expand_decision {
        let axis = axis_of(decision, name)?;
        result = result.expand(axis.renamed(decision_name(name)))?;
    }
    for name in &roles.expand_constraint {
        let axis = axis_of(b, name)?;
        if axis.len() > 1 && coefficient.any_nonzero() {
            warn!(
                axis = %name,
                labels = axis.len(),
                "coefficient is constant along a multi-valued constraint axis; rows will repeat"
            );
        }
        result = result.expand(axis.renamed(constraint_name(name)))?;
    }

    for name in &roles.diagonal {
        let row = axis_of(b, name)?;
        let col = axis_of(decision, name)?;
        row.ensure_aligned(col)?;
        let eye = NamedArray::identity(
            row.renamed(constraint_name(name)),
            col.renamed(decision_name(name)),
        )?;
        result = result.try_mul(&eye)?;
    }

    Ok(result)
}

fn axis_of<'a>(tensor: &'a NamedArray, name: &str) -> Result<&'a Axis> {
    tensor
        .axis(name)
        .ok_or_else(|| LpError::MissingAxis(name.to_string()))
}

/// A constraint compiled against the decision variables.
#[derive(Debug, Clone, PartialEq)]
pub struct LpConstraint {
    /// Right-hand side over `c(..)` axes.
    pub b: NamedArray,
    /// Block over `c(..)` × capacity `d(..)` axes.
    pub capacity: NamedArray,
    /// Block over `c(..)` × production `d(..)` axes.
    pub production: NamedArray,
    pub kind: ConstraintKind,
}

impl LpConstraint {
    /// Number of rows contributed to the LP.
    pub fn rows(&self) -> usize {
        self.b.size()
    }

    /// Flip a `>=` constraint into `<=` form by negating every term.
    pub fn negated(&self) -> LpConstraint {
        LpConstraint {
            b: -&self.b,
            capacity: -&self.capacity,
            production: -&self.production,
            kind: self.kind,
        }
    }
}

/// Compile both blocks of a constraint.
pub fn lp_constraint(constraint: &Constraint, costs: &LpCosts) -> Result<LpConstraint> {
    let mut b = constraint.b.clone();
    for axis in constraint.b.axes() {
        b = b.rename(axis.name(), &constraint_name(axis.name()))?;
    }
    let capacity = lp_constraint_matrix(&constraint.b, &constraint.capacity, &costs.capacity)?;
    let production =
        lp_constraint_matrix(&constraint.b, &constraint.production, &costs.production)?;
    debug!(
        kind = %constraint.kind,
        rows = b.size(),
        capacity_block = ?capacity.dims(),
        production_block = ?production.dims(),
        "compiled constraint"
    );
    Ok(LpConstraint {
        b,
        capacity,
        production,
        kind: constraint.kind,
    })
}
