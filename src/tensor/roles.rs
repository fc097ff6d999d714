//! Classification of axes into diagonal, reduced and expanded roles.
//!
//! Given a coefficient tensor, the right-hand side `b` of its constraint and the
//! decision-variable cost tensor, every axis plays exactly one role:
//!
//! - reduced: on the coefficient only, summed out;
//! - decision: on the coefficient and the decision costs, but not `b`;
//! - constraint: on the coefficient and `b`, but not the decision costs;
//! - diagonal: on both `b` and the decision costs (identity between row and column);
//! - expanded on the decision side: on the decision costs only;
//! - expanded on the constraint side: on `b` only.

use super::named::NamedArray;

/// Role of each axis relative to one coefficient tensor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AxisRoles {
    /// Summed out of the coefficient.
    pub reduced: Vec<String>,
    /// Kept from the coefficient as decision-variable axes.
    pub decision: Vec<String>,
    /// Kept from the coefficient as constraint-row axes.
    pub constraint: Vec<String>,
    /// Shared by `b` and the decision costs, in decision-cost order.
    pub diagonal: Vec<String>,
    /// Decision-cost axes the coefficient is broadcast along.
    pub expand_decision: Vec<String>,
    /// `b` axes the coefficient is broadcast along.
    pub expand_constraint: Vec<String>,
}

impl AxisRoles {
    /// Diagonal axes that the coefficient itself carries.
    pub fn diagonal_in(&self, coefficient: &NamedArray) -> Vec<String> {
        self.diagonal
            .iter()
            .filter(|d| coefficient.has_axis(d))
            .cloned()
            .collect()
    }
}

/// Classify every axis of `coefficient`, `b` and `decision`.
pub fn classify_axes(coefficient: &NamedArray, b: &NamedArray, decision: &NamedArray) -> AxisRoles {
    let mut roles = AxisRoles::default();

    for name in coefficient.dims() {
        match (decision.has_axis(name), b.has_axis(name)) {
            (false, false) => roles.reduced.push(name.to_string()),
            (true, false) => roles.decision.push(name.to_string()),
            (false, true) => roles.constraint.push(name.to_string()),
            (true, true) => {}
        }
    }

    for name in decision.dims() {
        if b.has_axis(name) {
            roles.diagonal.push(name.to_string());
        } else if !coefficient.has_axis(name) {
            roles.expand_decision.push(name.to_string());
        }
    }

    for name in b.dims() {
        if !coefficient.has_axis(name) && !decision.has_axis(name) {
            roles.expand_constraint.push(name.to_string());
        }
    }

    roles
}
