//! Investment constraints.
//!
//! A constraint reads `capacity · x_capacity + production · x_production ~ b`,
//! where `~` is one of `=`, `<=`, `>=` and every term is a named-axis tensor.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{LpError, Result};
use crate::tensor::NamedArray;

/// Relation between the left- and right-hand side of a constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintKind {
    /// `lhs == b`.
    Equality,
    /// `lhs <= b`.
    #[default]
    UpperBound,
    /// `lhs >= b`.
    LowerBound,
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstraintKind::Equality => write!(f, "=="),
            ConstraintKind::UpperBound => write!(f, "<="),
            ConstraintKind::LowerBound => write!(f, ">="),
        }
    }
}

/// Generator output before standardization. Any field may be missing.
#[derive(Debug, Clone, Default)]
pub struct RawConstraint {
    pub capacity: Option<NamedArray>,
    pub production: Option<NamedArray>,
    pub b: Option<NamedArray>,
    pub kind: Option<ConstraintKind>,
}

impl RawConstraint {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn capacity(mut self, capacity: impl Into<NamedArray>) -> Self {
        self.capacity = Some(capacity.into());
        self
    }

    pub fn production(mut self, production: impl Into<NamedArray>) -> Self {
        self.production = Some(production.into());
        self
    }

    pub fn b(mut self, b: impl Into<NamedArray>) -> Self {
        self.b = Some(b.into());
        self
    }

    pub fn kind(mut self, kind: ConstraintKind) -> Self {
        self.kind = Some(kind);
        self
    }
}

/// A standardized constraint: every term present, kind decided.
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    /// Operator applied to the capacity decision variables.
    pub capacity: NamedArray,
    /// Operator applied to the production decision variables.
    pub production: NamedArray,
    /// Right-hand side.
    pub b: NamedArray,
    pub kind: ConstraintKind,
}

impl Constraint {
    /// Standardize generator output.
    ///
    /// Missing `capacity`, `production` and `b` default to the scalar 0 and a
    /// missing kind to an upper bound. A constraint with neither `capacity` nor
    /// `production` is rejected.
    pub fn standardize(raw: RawConstraint) -> Result<Self> {
        if raw.capacity.is_none() && raw.production.is_none() {
            return Err(LpError::MalformedConstraint(
                "neither capacity nor production terms defined".into(),
            ));
        }
        Ok(Constraint {
            capacity: raw.capacity.unwrap_or_else(|| NamedArray::scalar(0.0)),
            production: raw.production.unwrap_or_else(|| NamedArray::scalar(0.0)),
            b: raw.b.unwrap_or_else(|| NamedArray::scalar(0.0)),
            kind: raw.kind.unwrap_or_default(),
        })
    }

    /// Same constraint with a different kind.
    pub fn with_kind(mut self, kind: ConstraintKind) -> Self {
        self.kind = kind;
        self
    }
}

impl TryFrom<RawConstraint> for Constraint {
    type Error = LpError;

    fn try_from(raw: RawConstraint) -> Result<Self> {
        Constraint::standardize(raw)
    }
}
