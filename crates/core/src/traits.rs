use ndarray::{Array1, ArrayView1};

use crate::budget::Budget;
use crate::criterion::SufficientProgressCriterion;
use crate::errors::Result;
use crate::problem::Problem;

/// A source of problem instances
pub trait Dataset: Send + Sync {
    /// Label of the dataset including its parameters
    fn name(&self) -> String;

    /// Produce the problem instance: function, dimension and optional bounds
    fn get_data(&self) -> Result<Problem>;
}

/// Evaluation contract between a dataset and the solvers
pub trait Objective: Send {
    fn name(&self) -> String;

    /// Bind the problem to evaluate. No computation happens here.
    fn set_data(&mut self, problem: Problem);

    /// Objective value at `x`
    fn compute(&self, x: &ArrayView1<f64>) -> Result<f64>;

    /// A valid point of the problem, used to check the evaluation chain
    fn get_one_solution(&self) -> Result<Array1<f64>>;

    /// What solvers receive: the bound problem, forwarded unchanged
    fn get_objective(&self) -> Result<Problem>;
}

/// An optimization algorithm driven by the benchmark
///
/// The driver calls [`Solver::set_objective`] once, then [`Solver::run`] with
/// increasing budgets, reading [`Solver::get_result`] after each run.
pub trait Solver: Send {
    /// Label of the solver including its parameters
    fn name(&self) -> String;

    /// When true, [`Solver::set_objective`] rejects problems without bounds
    fn requires_bounds(&self) -> bool {
        false
    }

    /// When true, a larger budget never gives a worse result than a smaller one
    fn resumable(&self) -> bool;

    /// Budget schedule and stopping policy used by the driver for this solver
    fn stopping_criterion(&self) -> SufficientProgressCriterion {
        SufficientProgressCriterion::default()
    }

    /// `Some(reason)` when the solver cannot handle the given problem
    fn skip(&self, _problem: &Problem) -> Option<String> {
        None
    }

    /// Bind the problem to optimize
    fn set_objective(&mut self, problem: &Problem) -> Result<()>;

    /// Optimize with the given effort, updating the current best point
    fn run(&mut self, budget: Budget) -> Result<()>;

    /// Current best point, of length the problem dimension
    fn get_result(&self) -> Result<Array1<f64>>;
}
