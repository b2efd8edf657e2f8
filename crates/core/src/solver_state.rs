use ndarray::Array1;

use crate::errors::{BenchError, Result};
use crate::problem::{Bounds, Problem};

/// Bound problem and best point of a solver, shared by all solver variants
///
/// Enforces the solver lifecycle: no run before a problem is bound, and no
/// result before a run.
#[derive(Clone, Debug, Default)]
pub struct SolverState {
    problem: Option<Problem>,
    xopt: Option<Array1<f64>>,
}

impl SolverState {
    /// Bind `problem`, checking bounds availability when `requires_bounds`.
    /// Any previous result is discarded.
    pub fn bind(&mut self, solver: &str, problem: &Problem, requires_bounds: bool) -> Result<()> {
        if requires_bounds && problem.bounds().is_none() {
            return Err(BenchError::MissingBounds(solver.to_string()));
        }
        self.problem = Some(problem.clone());
        self.xopt = None;
        Ok(())
    }

    pub fn problem(&self) -> Result<&Problem> {
        self.problem
            .as_ref()
            .ok_or_else(|| BenchError::NotConfigured("solver objective is not set".to_string()))
    }

    /// Bounds of the bound problem, [`BenchError::MissingBounds`] if absent
    pub fn bounds(&self, solver: &str) -> Result<Bounds> {
        self.problem()?
            .bounds()
            .ok_or_else(|| BenchError::MissingBounds(solver.to_string()))
    }

    pub fn dimension(&self) -> Result<usize> {
        Ok(self.problem()?.dimension())
    }

    /// Record the best point of the last run
    pub fn set_xopt(&mut self, xopt: Array1<f64>) -> Result<()> {
        let dim = self.dimension()?;
        if xopt.len() != dim {
            return Err(BenchError::DimensionMismatch {
                expected: dim,
                found: xopt.len(),
            });
        }
        self.xopt = Some(xopt);
        Ok(())
    }

    pub fn xopt(&self) -> Result<Array1<f64>> {
        self.xopt.clone().ok_or(BenchError::NoResultYet)
    }
}
