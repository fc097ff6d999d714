//! Axis labels and coordinates.
//!
//! An axis pairs a name (`"asset"`, `"replacement"`, `"timeslice"`, ...) with an
//! ordered list of labels. Integer labels are used for years, string labels for
//! everything else.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{LpError, Result};

/// A single coordinate value along an axis.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Label {
    /// Integer label, e.g. a year.
    Int(i64),
    /// String label, e.g. a technology name.
    Str(String),
}

impl Label {
    /// Integer value of the label, if it is one.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Label::Int(v) => Some(*v),
            Label::Str(_) => None,
        }
    }
}

impl fmt::Debug for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Int(v) => write!(f, "{}", v),
            Label::Str(s) => write!(f, "{:?}", s),
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Int(v) => write!(f, "{}", v),
            Label::Str(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for Label {
    fn from(v: i64) -> Self {
        Label::Int(v)
    }
}

impl From<i32> for Label {
    fn from(v: i32) -> Self {
        Label::Int(v as i64)
    }
}

impl From<&str> for Label {
    fn from(s: &str) -> Self {
        Label::Str(s.to_string())
    }
}

impl From<String> for Label {
    fn from(s: String) -> Self {
        Label::Str(s)
    }
}

/// A named axis with ordered, unique labels.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Axis {
    name: String,
    labels: Vec<Label>,
}

impl Axis {
    /// Create an axis, rejecting duplicate labels.
    pub fn new(name: impl Into<String>, labels: Vec<Label>) -> Result<Self> {
        let name = name.into();
        for (i, label) in labels.iter().enumerate() {
            if labels[..i].contains(label) {
                return Err(LpError::Inconsistent(format!(
                    "duplicate label {} on axis '{}'",
                    label, name
                )));
            }
        }
        Ok(Axis { name, labels })
    }

    /// Create an axis from anything convertible into labels.
    pub fn from_labels<L: Into<Label>>(
        name: impl Into<String>,
        labels: impl IntoIterator<Item = L>,
    ) -> Result<Self> {
        Axis::new(name, labels.into_iter().map(Into::into).collect())
    }

    /// Axis name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Labels in axis order.
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Number of labels.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// True if the axis carries no labels.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Position of a label along the axis.
    pub fn position(&self, label: &Label) -> Option<usize> {
        self.labels.iter().position(|l| l == label)
    }

    /// Same labels under a different name.
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Axis {
            name: name.into(),
            labels: self.labels.clone(),
        }
    }

    /// True if both axes hold the same set of labels, in any order.
    pub fn same_labels_unordered(&self, other: &Axis) -> bool {
        self.len() == other.len() && self.labels.iter().all(|l| other.position(l).is_some())
    }

    /// Fail unless `other` carries exactly the same labels in the same order.
    pub fn ensure_aligned(&self, other: &Axis) -> Result<()> {
        if self.labels != other.labels {
            return Err(LpError::AxisMismatch {
                axis: self.name.clone(),
                expected: format!("{:?}", self.labels),
                got: format!("{:?}", other.labels),
            });
        }
        Ok(())
    }
}

impl fmt::Debug for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Axis({}: {:?})", self.name, self.labels)
    }
}

/// Name under which an axis appears on the decision-variable side of a block.
pub fn decision_name(axis: &str) -> String {
    format!("d({})", axis)
}

/// Name under which an axis appears on the constraint-row side of a block.
pub fn constraint_name(axis: &str) -> String {
    format!("c({})", axis)
}
