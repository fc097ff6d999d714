//! Labelled multi-dimensional arrays.
//!
//! `NamedArray` stores its values in an `ndarray::ArrayD<f64>` and carries one
//! [`Axis`] per dimension. All binary operations align operands by axis name:
//! the result spans the union of both operands' axes, and an axis present on both
//! sides must carry identical labels in identical order.

use std::ops::Neg;

use nalgebra::DMatrix;
use ndarray::{ArrayD, Axis as NdAxis, Dimension, IxDyn, Zip};
use serde::{Deserialize, Serialize};

use super::axis::{Axis, Label};
use crate::error::{LpError, Result};

/// Interpolation method along an integer-labelled axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interpolation {
    /// Piecewise-linear between the two bracketing labels.
    #[default]
    Linear,
    /// Value at the closest label (lower label on ties).
    Nearest,
}

/// A numeric array whose dimensions are identified by name.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedArray {
    axes: Vec<Axis>,
    data: ArrayD<f64>,
}

impl NamedArray {
    /// A 0-axis array holding one value.
    pub fn scalar(value: f64) -> Self {
        NamedArray {
            axes: Vec::new(),
            data: ArrayD::from_elem(IxDyn(&[]), value),
        }
    }

    /// Build from row-major values.
    pub fn from_vec(axes: Vec<Axis>, values: Vec<f64>) -> Result<Self> {
        check_unique_names(&axes)?;
        let shape = shape_of(&axes);
        let expected = shape.iter().product::<usize>();
        if values.len() != expected {
            return Err(LpError::ShapeMismatch {
                expected: format!("{} values for {:?}", expected, shape),
                got: format!("{} values", values.len()),
            });
        }
        let data = ArrayD::from_shape_vec(IxDyn(&shape), values).map_err(|e| {
            LpError::ShapeMismatch {
                expected: format!("{:?}", shape),
                got: e.to_string(),
            }
        })?;
        Ok(NamedArray { axes, data })
    }

    /// Build by evaluating `f` at every multi-index.
    pub fn from_fn(axes: Vec<Axis>, mut f: impl FnMut(&[usize]) -> f64) -> Result<Self> {
        check_unique_names(&axes)?;
        let shape = shape_of(&axes);
        let data = ArrayD::from_shape_fn(IxDyn(&shape), |ix| f(ix.slice()));
        Ok(NamedArray { axes, data })
    }

    /// Array of the given axes filled with `value`.
    pub fn full(axes: Vec<Axis>, value: f64) -> Result<Self> {
        check_unique_names(&axes)?;
        let shape = shape_of(&axes);
        Ok(NamedArray {
            axes,
            data: ArrayD::from_elem(IxDyn(&shape), value),
        })
    }

    /// Array of zeros over the given axes.
    pub fn zeros(axes: Vec<Axis>) -> Result<Self> {
        Self::full(axes, 0.0)
    }

    /// Zeros with the same axes as `self`.
    pub fn zeros_like(&self) -> Self {
        self.map(|_| 0.0)
    }

    /// Ones with the same axes as `self`.
    pub fn ones_like(&self) -> Self {
        self.map(|_| 1.0)
    }

    /// Identity matrix with `row` and `col` as its two axes.
    pub fn identity(row: Axis, col: Axis) -> Result<Self> {
        if row.len() != col.len() {
            return Err(LpError::ShapeMismatch {
                expected: format!("square identity over '{}'", row.name()),
                got: format!("{} x {}", row.len(), col.len()),
            });
        }
        Self::from_fn(vec![row, col], |ix| if ix[0] == ix[1] { 1.0 } else { 0.0 })
    }

    pub fn axes(&self) -> &[Axis] {
        &self.axes
    }

    pub fn axis(&self, name: &str) -> Option<&Axis> {
        self.axes.iter().find(|a| a.name() == name)
    }

    pub fn has_axis(&self, name: &str) -> bool {
        self.axis(name).is_some()
    }

    /// Axis names in memory order.
    pub fn dims(&self) -> Vec<&str> {
        self.axes.iter().map(Axis::name).collect()
    }

    pub fn ndim(&self) -> usize {
        self.axes.len()
    }

    pub fn shape(&self) -> Vec<usize> {
        shape_of(&self.axes)
    }

    /// Total number of elements.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn is_scalar(&self) -> bool {
        self.axes.is_empty()
    }

    /// Underlying values.
    pub fn values(&self) -> &ArrayD<f64> {
        &self.data
    }

    /// The single value of a 0-axis array.
    pub fn item(&self) -> Option<f64> {
        if self.is_scalar() {
            self.data.iter().next().copied()
        } else {
            None
        }
    }

    /// True if any element differs from zero.
    pub fn any_nonzero(&self) -> bool {
        self.data.iter().any(|v| *v != 0.0)
    }

    /// Value at fully specified coordinates, given in any axis order.
    pub fn get(&self, coords: &[(&str, Label)]) -> Result<f64> {
        if coords.len() != self.axes.len() {
            return Err(LpError::ShapeMismatch {
                expected: format!("{} coordinates", self.axes.len()),
                got: format!("{} coordinates", coords.len()),
            });
        }
        let mut index = vec![0; self.axes.len()];
        for (name, label) in coords {
            let i = self.axis_index(name)?;
            index[i] = self.axes[i].position(label).ok_or_else(|| LpError::MissingLabel {
                axis: name.to_string(),
                label: label.to_string(),
            })?;
        }
        Ok(self.data[IxDyn(&index)])
    }

    /// Apply `f` element-wise.
    pub fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        NamedArray {
            axes: self.axes.clone(),
            data: self.data.mapv(f),
        }
    }

    /// Multiply every element by `factor`.
    pub fn scale(&self, factor: f64) -> Self {
        self.map(|v| v * factor)
    }

    /// Rename one axis.
    pub fn rename(&self, from: &str, to: &str) -> Result<Self> {
        let i = self.axis_index(from)?;
        if from != to && self.has_axis(to) {
            return Err(LpError::Inconsistent(format!(
                "cannot rename '{}' to existing axis '{}'",
                from, to
            )));
        }
        let mut axes = self.axes.clone();
        axes[i] = axes[i].renamed(to);
        Ok(NamedArray {
            axes,
            data: self.data.clone(),
        })
    }

    /// Select one label and drop the axis.
    pub fn sel(&self, name: &str, label: &Label) -> Result<Self> {
        let i = self.axis_index(name)?;
        let pos = self.label_position(i, label)?;
        let mut axes = self.axes.clone();
        axes.remove(i);
        Ok(NamedArray {
            axes,
            data: self.data.index_axis(NdAxis(i), pos).to_owned(),
        })
    }

    /// Keep the given labels along an axis, in the requested order.
    pub fn select(&self, name: &str, labels: &[Label]) -> Result<Self> {
        let i = self.axis_index(name)?;
        let positions = labels
            .iter()
            .map(|l| self.label_position(i, l))
            .collect::<Result<Vec<_>>>()?;
        let mut axes = self.axes.clone();
        axes[i] = Axis::new(name, labels.to_vec())?;
        Ok(NamedArray {
            axes,
            data: self.data.select(NdAxis(i), &positions),
        })
    }

    /// Conform an axis to new labels, filling absent ones with `fill`.
    pub fn reindex(&self, target: &Axis, fill: f64) -> Result<Self> {
        let i = self.axis_index(target.name())?;
        let mut axes = self.axes.clone();
        axes[i] = target.clone();
        let mut data = ArrayD::from_elem(IxDyn(&shape_of(&axes)), fill);
        for (j, label) in target.labels().iter().enumerate() {
            if let Some(old) = self.axes[i].position(label) {
                data.index_axis_mut(NdAxis(i), j)
                    .assign(&self.data.index_axis(NdAxis(i), old));
            }
        }
        Ok(NamedArray { axes, data })
    }

    /// Sum over the named axes.
    pub fn sum_over<S: AsRef<str>>(&self, names: &[S]) -> Result<Self> {
        let mut axes = self.axes.clone();
        let mut data = self.data.clone();
        for name in names {
            let name = name.as_ref();
            let i = axes
                .iter()
                .position(|a| a.name() == name)
                .ok_or_else(|| LpError::MissingAxis(name.to_string()))?;
            data = data.sum_axis(NdAxis(i));
            axes.remove(i);
        }
        Ok(NamedArray { axes, data })
    }

    /// Replicate along a new leading axis.
    pub fn expand(&self, axis: Axis) -> Result<Self> {
        if self.has_axis(axis.name()) {
            return Err(LpError::Inconsistent(format!(
                "axis '{}' already present",
                axis.name()
            )));
        }
        let mut axes = Vec::with_capacity(self.axes.len() + 1);
        axes.push(axis);
        axes.extend(self.axes.iter().cloned());
        self.broadcast_to(&axes)
    }

    /// Broadcast onto exactly `axes`, in that order.
    ///
    /// Every axis of `self` must appear in `axes` with identical labels.
    pub fn broadcast_to(&self, axes: &[Axis]) -> Result<Self> {
        check_unique_names(axes)?;
        Ok(NamedArray {
            axes: axes.to_vec(),
            data: self.aligned(axes)?,
        })
    }

    /// Reorder axes in memory.
    pub fn transpose_to<S: AsRef<str>>(&self, names: &[S]) -> Result<Self> {
        if names.len() != self.axes.len() {
            return Err(LpError::ShapeMismatch {
                expected: format!("{:?}", self.dims()),
                got: format!("{} axes", names.len()),
            });
        }
        let axes = names
            .iter()
            .map(|n| {
                self.axis(n.as_ref())
                    .cloned()
                    .ok_or_else(|| LpError::MissingAxis(n.as_ref().to_string()))
            })
            .collect::<Result<Vec<_>>>()?;
        self.broadcast_to(&axes)
    }

    /// Evaluate along an integer-labelled axis (years) and drop it.
    pub fn interp(&self, name: &str, at: i64, method: Interpolation) -> Result<Self> {
        let i = self.axis_index(name)?;
        let xs = self.axes[i]
            .labels()
            .iter()
            .map(|l| {
                l.as_int().ok_or_else(|| {
                    LpError::Interpolation(format!("axis '{}' has non-integer label {}", name, l))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        if xs.windows(2).any(|w| w[0] >= w[1]) {
            return Err(LpError::Interpolation(format!(
                "labels of axis '{}' are not strictly increasing",
                name
            )));
        }
        if let Some(pos) = xs.iter().position(|x| *x == at) {
            return self.sel(name, &self.axes[i].labels()[pos]);
        }
        let upper = match xs.iter().position(|x| *x > at) {
            Some(upper) if upper > 0 => upper,
            _ => {
                return Err(LpError::Interpolation(format!(
                    "{} lies outside the labels of axis '{}'",
                    at, name
                )))
            }
        };
        let lower = upper - 1;
        let (x0, x1) = (xs[lower], xs[upper]);
        let lo = self.data.index_axis(NdAxis(i), lower);
        let hi = self.data.index_axis(NdAxis(i), upper);
        let data = match method {
            Interpolation::Linear => {
                let w = (at - x0) as f64 / (x1 - x0) as f64;
                Zip::from(&lo)
                    .and(&hi)
                    .map_collect(|a, b| a * (1.0 - w) + b * w)
            }
            Interpolation::Nearest => {
                if at - x0 <= x1 - at {
                    lo.to_owned()
                } else {
                    hi.to_owned()
                }
            }
        };
        let mut axes = self.axes.clone();
        axes.remove(i);
        Ok(NamedArray { axes, data })
    }

    /// Element-wise combination over the union of both operands' axes.
    pub fn zip_with(&self, other: &NamedArray, f: impl Fn(f64, f64) -> f64) -> Result<Self> {
        let axes = union_axes(&self.axes, &other.axes)?;
        let a = self.aligned(&axes)?;
        let b = other.aligned(&axes)?;
        let data = Zip::from(&a).and(&b).map_collect(|x, y| f(*x, *y));
        Ok(NamedArray { axes, data })
    }

    /// Three-way element-wise combination over the union of all axes.
    pub fn zip3_with(
        &self,
        second: &NamedArray,
        third: &NamedArray,
        f: impl Fn(f64, f64, f64) -> f64,
    ) -> Result<Self> {
        let axes = union_axes(&union_axes(&self.axes, &second.axes)?, &third.axes)?;
        let a = self.aligned(&axes)?;
        let b = second.aligned(&axes)?;
        let c = third.aligned(&axes)?;
        let data = Zip::from(&a)
            .and(&b)
            .and(&c)
            .map_collect(|x, y, z| f(*x, *y, *z));
        Ok(NamedArray { axes, data })
    }

    pub fn try_add(&self, other: &NamedArray) -> Result<Self> {
        self.zip_with(other, |a, b| a + b)
    }

    pub fn try_sub(&self, other: &NamedArray) -> Result<Self> {
        self.zip_with(other, |a, b| a - b)
    }

    pub fn try_mul(&self, other: &NamedArray) -> Result<Self> {
        self.zip_with(other, |a, b| a * b)
    }

    /// Values in row-major order over `axes`.
    pub fn flatten(&self, axes: &[Axis]) -> Result<Vec<f64>> {
        Ok(self.aligned(axes)?.iter().copied().collect())
    }

    /// Stack `rows` into the row index and `cols` into the column index.
    ///
    /// Both stacks are row-major: the first axis of each list varies slowest.
    pub fn to_matrix(&self, rows: &[Axis], cols: &[Axis]) -> Result<DMatrix<f64>> {
        let target: Vec<Axis> = rows.iter().chain(cols).cloned().collect();
        check_unique_names(&target)?;
        let data = self.aligned(&target)?;
        let nrows = rows.iter().map(Axis::len).product::<usize>();
        let ncols = cols.iter().map(Axis::len).product::<usize>();
        Ok(DMatrix::from_row_iterator(nrows, ncols, data.iter().copied()))
    }

    /// Re-express onto shared coordinates: labels reordered to match `canonical`
    /// and axes ordered by their position in `canonical`.
    pub fn conform(&self, canonical: &[Axis]) -> Result<Self> {
        let mut result = self.clone();
        let mut positions = Vec::with_capacity(self.axes.len());
        for axis in &self.axes {
            let pos = canonical
                .iter()
                .position(|c| c.name() == axis.name())
                .ok_or_else(|| LpError::MissingAxis(axis.name().to_string()))?;
            let target = &canonical[pos];
            if !target.same_labels_unordered(axis) {
                return Err(LpError::AxisMismatch {
                    axis: axis.name().to_string(),
                    expected: format!("{:?}", target.labels()),
                    got: format!("{:?}", axis.labels()),
                });
            }
            if target != axis {
                result = result.select(axis.name(), target.labels())?;
            }
            positions.push((pos, axis.name().to_string()));
        }
        positions.sort();
        let names: Vec<String> = positions.into_iter().map(|(_, n)| n).collect();
        result.transpose_to(&names)
    }

    /// Coordinate-aware equality: same axes and labels up to ordering, same values.
    pub fn equals(&self, other: &NamedArray) -> bool {
        if self.ndim() != other.ndim() {
            return false;
        }
        match other.conform(&self.axes) {
            Ok(conformed) => conformed.axes == self.axes && conformed.data == self.data,
            Err(_) => false,
        }
    }

    fn axis_index(&self, name: &str) -> Result<usize> {
        self.axes
            .iter()
            .position(|a| a.name() == name)
            .ok_or_else(|| LpError::MissingAxis(name.to_string()))
    }

    fn label_position(&self, axis: usize, label: &Label) -> Result<usize> {
        self.axes[axis]
            .position(label)
            .ok_or_else(|| LpError::MissingLabel {
                axis: self.axes[axis].name().to_string(),
                label: label.to_string(),
            })
    }

    /// Values permuted and broadcast so that dimension `j` is `target[j]`.
    fn aligned(&self, target: &[Axis]) -> Result<ArrayD<f64>> {
        let mut positions = Vec::with_capacity(self.axes.len());
        for axis in &self.axes {
            let pos = target
                .iter()
                .position(|t| t.name() == axis.name())
                .ok_or_else(|| LpError::MissingAxis(axis.name().to_string()))?;
            target[pos].ensure_aligned(axis)?;
            positions.push(pos);
        }
        let mut order: Vec<usize> = (0..self.axes.len()).collect();
        order.sort_by_key(|&i| positions[i]);

        let mut view = self.data.view().permuted_axes(IxDyn(&order));
        for j in 0..target.len() {
            if !positions.contains(&j) {
                view = view.insert_axis(NdAxis(j));
            }
        }
        let shape = shape_of(target);
        let broadcast = view
            .broadcast(IxDyn(&shape))
            .ok_or_else(|| LpError::ShapeMismatch {
                expected: format!("{:?}", shape),
                got: format!("{:?}", self.shape()),
            })?;
        Ok(broadcast.to_owned())
    }
}

impl Neg for &NamedArray {
    type Output = NamedArray;

    fn neg(self) -> NamedArray {
        self.map(|v| -v)
    }
}

impl Neg for NamedArray {
    type Output = NamedArray;

    fn neg(self) -> NamedArray {
        -&self
    }
}

impl From<f64> for NamedArray {
    fn from(value: f64) -> Self {
        NamedArray::scalar(value)
    }
}

/// Axes of `a` followed by the axes of `b` not already in `a`.
pub fn union_axes(a: &[Axis], b: &[Axis]) -> Result<Vec<Axis>> {
    let mut axes = a.to_vec();
    for axis in b {
        match axes.iter().find(|x| x.name() == axis.name()) {
            Some(existing) => existing.ensure_aligned(axis)?,
            None => axes.push(axis.clone()),
        }
    }
    Ok(axes)
}

fn shape_of(axes: &[Axis]) -> Vec<usize> {
    axes.iter().map(Axis::len).collect()
}

fn check_unique_names(axes: &[Axis]) -> Result<()> {
    for (i, axis) in axes.iter().enumerate() {
        if axes[..i].iter().any(|a| a.name() == axis.name()) {
            return Err(LpError::Inconsistent(format!(
                "axis '{}' appears twice",
                axis.name()
            )));
        }
    }
    Ok(())
}
