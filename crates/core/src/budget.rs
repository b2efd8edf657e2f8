use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{BenchError, Result};

/// Effort granted to a solver for one run
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Budget {
    /// Number of iterations (or function evaluations, depending on the solver)
    Iterations(usize),
    /// Convergence tolerance, the smaller the more effort
    Tolerance(f64),
}

impl Budget {
    /// True when no effort at all is granted: solvers then return their starting point
    pub fn is_zero(&self) -> bool {
        match *self {
            Budget::Iterations(n) => n == 0,
            Budget::Tolerance(tol) => tol.is_infinite() && tol > 0.,
        }
    }

    /// The numeric value recorded as `stop_val` in result samples
    pub fn stop_val(&self) -> f64 {
        match *self {
            Budget::Iterations(n) => n as f64,
            Budget::Tolerance(tol) => tol,
        }
    }

    /// Number of iterations, or [`BenchError::BudgetMismatch`] for a tolerance budget
    pub fn iterations(&self, solver: &str) -> Result<usize> {
        match *self {
            Budget::Iterations(n) => Ok(n),
            Budget::Tolerance(_) => Err(self.mismatch(solver)),
        }
    }

    /// Tolerance value, or [`BenchError::BudgetMismatch`] for an iteration budget
    pub fn tolerance(&self, solver: &str) -> Result<f64> {
        match *self {
            Budget::Tolerance(tol) if tol > 0. => Ok(tol),
            _ => Err(self.mismatch(solver)),
        }
    }

    fn mismatch(&self, solver: &str) -> BenchError {
        BenchError::BudgetMismatch {
            solver: solver.to_string(),
            budget: self.to_string(),
        }
    }
}

impl fmt::Display for Budget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Budget::Iterations(n) => write!(f, "{n} iterations"),
            Budget::Tolerance(tol) => write!(f, "tolerance {tol:e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_budget() {
        assert!(Budget::Iterations(0).is_zero());
        assert!(!Budget::Iterations(1).is_zero());
        assert!(Budget::Tolerance(f64::INFINITY).is_zero());
        assert!(!Budget::Tolerance(1e-3).is_zero());
    }

    #[test]
    fn test_budget_kind() {
        assert_eq!(Budget::Iterations(12).iterations("s").unwrap(), 12);
        assert!(matches!(
            Budget::Tolerance(0.1).iterations("s"),
            Err(BenchError::BudgetMismatch { .. })
        ));
        assert_eq!(Budget::Tolerance(0.1).tolerance("s").unwrap(), 0.1);
        assert!(Budget::Tolerance(0.).tolerance("s").is_err());
        assert!(Budget::Iterations(3).tolerance("s").is_err());
    }
}
