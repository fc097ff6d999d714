//! Coordinate unification of costs and constraints.
//!
//! All tensors taking part in one LP are joined on axis name into a single
//! coordinate system, then split back into their original records. Afterwards any
//! axis shared between two tensors carries the same labels in the same order, and
//! shared axes appear in the same relative memory order everywhere.

use tracing::trace;

use crate::constraints::Constraint;
use crate::costs::LpCosts;
use crate::error::{LpError, Result};
use crate::tensor::{Axis, NamedArray};

/// Unify the coordinate systems of `costs` and `constraints`.
///
/// The canonical labels of each axis are those of its first occurrence, scanning
/// the costs and then the constraints in order. Later occurrences must hold the
/// same set of labels; a differing set is an [`LpError::AxisMismatch`].
pub fn merge_lp(costs: &LpCosts, constraints: &[Constraint]) -> Result<(LpCosts, Vec<Constraint>)> {
    let tensors = [&costs.capacity, &costs.production].into_iter().chain(
        constraints
            .iter()
            .flat_map(|c| [&c.capacity, &c.production, &c.b]),
    );
    let canonical = canonical_axes(tensors)?;
    trace!(axes = ?canonical.iter().map(Axis::name).collect::<Vec<_>>(), "merged coordinates");

    let merged_costs = LpCosts {
        capacity: costs.capacity.conform(&canonical)?,
        production: costs.production.conform(&canonical)?,
    };
    let merged_constraints = constraints
        .iter()
        .map(|c| {
            Ok(Constraint {
                capacity: c.capacity.conform(&canonical)?,
                production: c.production.conform(&canonical)?,
                b: c.b.conform(&canonical)?,
                kind: c.kind,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok((merged_costs, merged_constraints))
}

/// First occurrence of every axis, in order of appearance.
fn canonical_axes<'a>(tensors: impl Iterator<Item = &'a NamedArray>) -> Result<Vec<Axis>> {
    let mut canonical: Vec<Axis> = Vec::new();
    for tensor in tensors {
        for axis in tensor.axes() {
            match canonical.iter().find(|c| c.name() == axis.name()) {
                Some(existing) if !existing.same_labels_unordered(axis) => {
                    return Err(LpError::AxisMismatch {
                        axis: axis.name().to_string(),
                        expected: format!("{:?}", existing.labels()),
                        got: format!("{:?}", axis.labels()),
                    });
                }
                Some(_) => {}
                None => canonical.push(axis.clone()),
            }
        }
    }
    Ok(canonical)
}
