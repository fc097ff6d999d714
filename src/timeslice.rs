//! Time-slices: named sub-periods of a year.

use crate::error::{LpError, Result};
use crate::tensor::{Axis, NamedArray};

/// Name of the time-slice axis.
pub const TIMESLICE: &str = "timeslice";

/// Duration of each time-slice, over a single `timeslice` axis.
#[derive(Debug, Clone, PartialEq)]
pub struct Timeslices {
    durations: NamedArray,
}

impl Timeslices {
    /// Create from per-slice durations (e.g. hours).
    pub fn new(axis: Axis, durations: Vec<f64>) -> Result<Self> {
        if axis.name() != TIMESLICE {
            return Err(LpError::Precondition(format!(
                "time-slice axis must be named '{}', got '{}'",
                TIMESLICE,
                axis.name()
            )));
        }
        if axis.is_empty() {
            return Err(LpError::Precondition("no time-slices defined".into()));
        }
        if durations.iter().any(|d| *d < 0.0) {
            return Err(LpError::Precondition("negative time-slice duration".into()));
        }
        Ok(Timeslices {
            durations: NamedArray::from_vec(vec![axis], durations)?,
        })
    }

    /// Slices of equal duration.
    pub fn uniform(axis: Axis) -> Result<Self> {
        let n = axis.len();
        Self::new(axis, vec![1.0; n])
    }

    pub fn axis(&self) -> &Axis {
        &self.durations.axes()[0]
    }

    /// Fraction of the year covered by each slice.
    pub fn shares(&self) -> NamedArray {
        let total: f64 = self.durations.values().iter().sum();
        if total > 0.0 {
            self.durations.scale(1.0 / total)
        } else {
            self.durations.zeros_like()
        }
    }

    /// Split an annual, extensive quantity across slices in proportion to duration.
    ///
    /// The `timeslice` axis leads the result.
    pub fn convert_extensive(&self, annual: &NamedArray) -> Result<NamedArray> {
        if annual.has_axis(TIMESLICE) {
            return Err(LpError::Precondition(
                "quantity is already resolved per time-slice".into(),
            ));
        }
        self.shares().try_mul(annual)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_extensive_splits_by_duration() {
        let ts = Timeslices::new(
            Axis::from_labels(TIMESLICE, ["night", "day"]).unwrap(),
            vec![1.0, 3.0],
        )
        .unwrap();
        let annual =
            NamedArray::from_vec(vec![Axis::from_labels("replacement", ["a"]).unwrap()], vec![8.0])
                .unwrap();
        let split = ts.convert_extensive(&annual).unwrap();
        assert_eq!(split.dims(), vec![TIMESLICE, "replacement"]);
        assert_eq!(split.flatten(split.axes()).unwrap(), vec![2.0, 6.0]);
    }

    #[test]
    fn test_wrong_axis_name() {
        let axis = Axis::from_labels("hour", ["a"]).unwrap();
        assert!(Timeslices::uniform(axis).is_err());
    }
}
