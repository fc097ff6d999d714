//! Clarabel solver integration.
//!
//! The LP is posed in Clarabel's conic form `A x + s = b, s ∈ K`:
//! equalities go to the zero cone, while inequalities and variable bounds go to
//! the non-negative cone.

use clarabel::algebra::CscMatrix as ClarabelCsc;
use clarabel::solver::{
    DefaultSettingsBuilder, DefaultSolver, IPSolver, SolverStatus, SupportedConeT,
};
use nalgebra_sparse::CscMatrix;
use tracing::debug;

use crate::adapter::LpProblem;
use crate::error::{LpError, Result};
use crate::sparse::{csc_from_triplets, csc_neg_identity, csc_vstack};

/// Solution status from the solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    /// Optimal solution found.
    Optimal,
    /// Problem is infeasible.
    Infeasible,
    /// Problem is unbounded.
    Unbounded,
    /// Maximum iterations or time reached.
    MaxIterations,
    /// Unknown status.
    Unknown,
}

impl From<SolverStatus> for SolveStatus {
    fn from(status: SolverStatus) -> Self {
        match status {
            SolverStatus::Solved => SolveStatus::Optimal,
            SolverStatus::PrimalInfeasible => SolveStatus::Infeasible,
            SolverStatus::DualInfeasible => SolveStatus::Unbounded,
            SolverStatus::MaxIterations => SolveStatus::MaxIterations,
            SolverStatus::MaxTime => SolveStatus::MaxIterations,
            _ => SolveStatus::Unknown,
        }
    }
}

/// Solver settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Print solver output.
    pub verbose: bool,
    /// Maximum iterations.
    pub max_iter: u32,
    /// Time limit in seconds.
    pub time_limit: f64,
    /// Absolute tolerance.
    pub tol_gap_abs: f64,
    /// Relative tolerance.
    pub tol_gap_rel: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            verbose: false,
            max_iter: 100,
            time_limit: f64::INFINITY,
            tol_gap_abs: 1e-8,
            tol_gap_rel: 1e-8,
        }
    }
}

/// Solution from the solver.
#[derive(Debug, Clone)]
pub struct Solution {
    /// Solution status.
    pub status: SolveStatus,
    /// Optimal objective `c·x` (if solved).
    pub value: Option<f64>,
    /// Decision variables in column order (if solved).
    pub x: Option<Vec<f64>>,
    /// Solve time in seconds.
    pub solve_time: f64,
    /// Number of iterations.
    pub iterations: u32,
}

impl Solution {
    pub fn is_optimal(&self) -> bool {
        self.status == SolveStatus::Optimal
    }
}

/// Stacked conic form of an [`LpProblem`].
struct ConicForm {
    a: CscMatrix<f64>,
    b: Vec<f64>,
    zero: usize,
    nonneg: usize,
}

impl ConicForm {
    fn new(problem: &LpProblem) -> Self {
        let n = problem.num_vars();
        let mut a = CscMatrix::zeros(0, n);
        let mut b = Vec::new();

        if let (Some(a_eq), Some(b_eq)) = (&problem.a_eq, &problem.b_eq) {
            a = csc_vstack(&a, a_eq);
            b.extend_from_slice(b_eq);
        }
        let zero = b.len();

        if let (Some(a_ub), Some(b_ub)) = (&problem.a_ub, &problem.b_ub) {
            a = csc_vstack(&a, a_ub);
            b.extend_from_slice(b_ub);
        }

        // -x + s = -lower
        a = csc_vstack(&a, &csc_neg_identity(n));
        b.extend(std::iter::repeat(-problem.bounds.lower).take(n));

        // x + s = upper
        if let Some(upper) = problem.bounds.upper {
            let idx: Vec<usize> = (0..n).collect();
            a = csc_vstack(&a, &csc_from_triplets(n, n, idx.clone(), idx, vec![1.0; n]));
            b.extend(std::iter::repeat(upper).take(n));
        }

        let nonneg = b.len() - zero;
        ConicForm { a, b, zero, nonneg }
    }

    fn cones(&self) -> Vec<SupportedConeT<f64>> {
        let mut cones = Vec::new();
        if self.zero > 0 {
            cones.push(SupportedConeT::ZeroConeT(self.zero));
        }
        if self.nonneg > 0 {
            cones.push(SupportedConeT::NonnegativeConeT(self.nonneg));
        }
        cones
    }
}

/// Solve the LP using Clarabel.
pub fn solve(problem: &LpProblem, settings: &Settings) -> Result<Solution> {
    let n = problem.num_vars();
    let conic = ConicForm::new(problem);
    let p = ClarabelCsc::zeros((n, n));
    let a = to_clarabel_csc(&conic.a);
    let cones = conic.cones();

    let clarabel_settings = DefaultSettingsBuilder::default()
        .verbose(settings.verbose)
        .max_iter(settings.max_iter)
        .time_limit(settings.time_limit)
        .tol_gap_abs(settings.tol_gap_abs)
        .tol_gap_rel(settings.tol_gap_rel)
        .build()
        .map_err(|e| LpError::SolverError(e.to_string()))?;

    let mut solver = DefaultSolver::new(&p, &problem.c, &a, &conic.b, &cones, clarabel_settings);
    solver.solve();

    let status: SolveStatus = solver.solution.status.into();
    let solve_time = solver.solution.solve_time;
    let iterations = solver.info.iterations;
    debug!(?status, iterations, solve_time, "clarabel finished");

    if status == SolveStatus::Optimal {
        let x = solver.solution.x.clone();
        let value = problem.c.iter().zip(&x).map(|(ci, xi)| ci * xi).sum();
        Ok(Solution {
            status,
            value: Some(value),
            x: Some(x),
            solve_time,
            iterations,
        })
    } else {
        Ok(Solution {
            status,
            value: None,
            x: None,
            solve_time,
            iterations,
        })
    }
}

/// Convert nalgebra CSC to Clarabel CSC.
fn to_clarabel_csc(m: &CscMatrix<f64>) -> ClarabelCsc<f64> {
    ClarabelCsc::new(
        m.nrows(),
        m.ncols(),
        m.col_offsets().to_vec(),
        m.row_indices().to_vec(),
        m.values().to_vec(),
    )
}
