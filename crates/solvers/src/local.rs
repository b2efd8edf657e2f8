use std::fmt;
use std::str::FromStr;

use argmin::core::{Executor, State};
use argmin::solver::linesearch::MoreThuenteLineSearch;
use argmin::solver::neldermead::NelderMead;
use argmin::solver::quasinewton::LBFGS;
use cobyla::RhoBeg;
use log::debug;
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use zobench_core::{
    BenchError, Budget, Problem, Result, Solver, SolverState, Strategy, SufficientProgressCriterion,
};

use crate::cost::VecCost;
use crate::optimizers::initial_simplex;

/// Iteration cap of argmin local solvers under a tolerance budget
pub const LOCAL_MAX_ITERS: u64 = 10_000;
/// Evaluation cap of COBYLA under a tolerance budget
pub const COBYLA_MAX_EVALS: usize = 10_000;
/// Half width of the box COBYLA searches when the problem is unbounded
pub const COBYLA_RADIUS: f64 = 1e3;
/// Relative step tolerance ending COBYLA once its trust region has collapsed
const COBYLA_XTOL_REL: f64 = 1e-14;
/// L-BFGS memory
const LBFGS_MEMORY: usize = 7;

/// Local optimization methods
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LocalMethod {
    /// Downhill simplex
    #[serde(rename = "Nelder-Mead")]
    NelderMead,
    /// Limited memory BFGS with finite difference gradient and More-Thuente line search
    #[serde(rename = "L-BFGS")]
    Lbfgs,
    /// Linear approximations trust region method
    #[serde(rename = "COBYLA")]
    Cobyla,
}

impl LocalMethod {
    pub const ALL: [LocalMethod; 3] = [LocalMethod::NelderMead, LocalMethod::Lbfgs, LocalMethod::Cobyla];
}

impl fmt::Display for LocalMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LocalMethod::NelderMead => "Nelder-Mead",
            LocalMethod::Lbfgs => "L-BFGS",
            LocalMethod::Cobyla => "COBYLA",
        };
        write!(f, "{name}")
    }
}

impl FromStr for LocalMethod {
    type Err = BenchError;

    fn from_str(s: &str) -> Result<Self> {
        LocalMethod::ALL
            .into_iter()
            .find(|m| m.to_string().eq_ignore_ascii_case(s))
            .ok_or_else(|| BenchError::UnsupportedSolverVariant(s.to_string()))
    }
}

/// Local optimizers started from `x0 = (0.5, ..., 0.5)`.
///
/// Under an iteration budget `n` the method runs `n` iterations
/// (`n` function evaluations for COBYLA); under a tolerance budget it runs
/// until convergence at that tolerance.
#[derive(Clone, Debug)]
pub struct LocalSolver {
    method: LocalMethod,
    strategy: Strategy,
    state: SolverState,
}

impl LocalSolver {
    pub const NAME: &'static str = "local";

    pub fn new(method: LocalMethod) -> Self {
        LocalSolver {
            method,
            strategy: Strategy::Iteration,
            state: SolverState::default(),
        }
    }

    /// Sets the budget kind requested to the driver
    pub fn strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn start_point(dim: usize) -> Array1<f64> {
        Array1::from_elem(dim, 0.5)
    }

    fn nelder_mead(&self, problem: &Problem, x0: &[f64], budget: Budget) -> Result<Vec<f64>> {
        let solver = NelderMead::new(initial_simplex(x0));
        let (solver, max_iters) = match budget {
            Budget::Iterations(n) => (solver, n as u64),
            Budget::Tolerance(tol) => (solver.with_sd_tolerance(tol)?, LOCAL_MAX_ITERS),
        };
        let res = Executor::new(VecCost::new(problem.function()), solver)
            .configure(|state| state.max_iters(max_iters))
            .run()?;
        Ok(res
            .state()
            .get_best_param()
            .cloned()
            .unwrap_or_else(|| x0.to_vec()))
    }

    fn lbfgs(&self, problem: &Problem, x0: &[f64], budget: Budget) -> Result<Vec<f64>> {
        let solver = LBFGS::new(MoreThuenteLineSearch::new(), LBFGS_MEMORY);
        let (solver, max_iters) = match budget {
            Budget::Iterations(n) => (solver, n as u64),
            Budget::Tolerance(tol) => (
                solver.with_tolerance_grad(tol)?.with_tolerance_cost(tol)?,
                LOCAL_MAX_ITERS,
            ),
        };
        let res = Executor::new(VecCost::new(problem.function()), solver)
            .configure(|state| state.param(x0.to_vec()).max_iters(max_iters))
            .run()?;
        Ok(res
            .state()
            .get_best_param()
            .cloned()
            .unwrap_or_else(|| x0.to_vec()))
    }

    fn cobyla(&self, problem: &Problem, x0: &[f64], budget: Budget) -> Vec<f64> {
        let (max_eval, ftol_rel) = match budget {
            Budget::Iterations(n) => (n, 0.),
            Budget::Tolerance(tol) => (COBYLA_MAX_EVALS, tol),
        };
        // cobyla does not terminate with infinite bounds
        let bounds: Vec<(f64, f64)> = match problem.bounds() {
            Some(b) => vec![(b.lower, b.upper); x0.len()],
            None => x0
                .iter()
                .map(|x| (x - COBYLA_RADIUS, x + COBYLA_RADIUS))
                .collect(),
        };
        let cstrs: Vec<fn(&[f64], &mut ()) -> f64> = vec![];
        let fun = problem.function();
        let res = cobyla::minimize(
            |x: &[f64], _u: &mut ()| fun.eval_slice(x),
            x0,
            &bounds,
            &cstrs,
            (),
            max_eval,
            RhoBeg::All(0.5),
            Some(cobyla::StopTols {
                ftol_rel,
                xtol_rel: COBYLA_XTOL_REL,
                ..cobyla::StopTols::default()
            }),
        );
        match res {
            Ok((_, x_opt, _)) => x_opt,
            Err((status, x_opt, _)) => {
                debug!("COBYLA stopped with {status:?}");
                x_opt
            }
        }
    }
}

impl Solver for LocalSolver {
    fn name(&self) -> String {
        match self.strategy {
            Strategy::Iteration => format!("{}[method={}]", Self::NAME, self.method),
            Strategy::Tolerance => format!(
                "{}[method={},strategy=tolerance]",
                Self::NAME,
                self.method
            ),
        }
    }

    fn resumable(&self) -> bool {
        !matches!(self.method, LocalMethod::Cobyla)
    }

    fn stopping_criterion(&self) -> SufficientProgressCriterion {
        SufficientProgressCriterion::default().strategy(self.strategy)
    }

    fn set_objective(&mut self, problem: &Problem) -> Result<()> {
        self.state.bind(&self.name(), problem, false)
    }

    fn run(&mut self, budget: Budget) -> Result<()> {
        let problem = self.state.problem()?;
        let x0 = Self::start_point(problem.dimension());
        let xopt = if budget.is_zero() {
            x0
        } else {
            let x0 = x0.to_vec();
            let xopt = match self.method {
                LocalMethod::NelderMead => self.nelder_mead(problem, &x0, budget)?,
                LocalMethod::Lbfgs => self.lbfgs(problem, &x0, budget)?,
                LocalMethod::Cobyla => self.cobyla(problem, &x0, budget),
            };
            Array1::from(xopt)
        };
        debug!("{} with {budget}: xopt = {xopt}", self.name());
        self.state.set_xopt(xopt)
    }

    fn get_result(&self) -> Result<Array1<f64>> {
        self.state.xopt()
    }
}
