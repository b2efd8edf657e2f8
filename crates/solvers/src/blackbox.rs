use std::fmt;
use std::str::FromStr;

use log::debug;
use ndarray::Array1;
use ndarray_rand::rand::SeedableRng;
use rand_xoshiro::Xoshiro256Plus;
use serde::{Deserialize, Serialize};
use zobench_core::{BenchError, Bounds, Budget, Problem, Result, Solver, SolverState};

use crate::optimizers::{
    minimize, AskTell, HammersleySearch, Pso, RandomSearch, SepCmaEs, TwoPointsDE,
};

/// Default seed of the stochastic solvers
pub const SEED_DEFAULT: u64 = 42;

/// Black-box optimization methods working within bounds
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlackBoxMethod {
    /// Picks one of the other methods given the dimension and the budget
    NGOpt,
    RandomSearch,
    /// Scrambled Hammersley design sized to the budget
    ScrHammersleySearch,
    /// Differential evolution with two-points crossover
    TwoPointsDE,
    /// Separable CMA-ES started at the center of the bounds
    #[serde(rename = "CMA")]
    Cma,
    /// Particle swarm optimization
    #[serde(rename = "PSO")]
    Pso,
}

impl BlackBoxMethod {
    pub const ALL: [BlackBoxMethod; 6] = [
        BlackBoxMethod::NGOpt,
        BlackBoxMethod::RandomSearch,
        BlackBoxMethod::ScrHammersleySearch,
        BlackBoxMethod::TwoPointsDE,
        BlackBoxMethod::Cma,
        BlackBoxMethod::Pso,
    ];

    /// Method actually run by `NGOpt` for the given dimension and number of evaluations
    pub fn select(dim: usize, budget: usize) -> BlackBoxMethod {
        if budget < 10 * dim {
            BlackBoxMethod::ScrHammersleySearch
        } else if dim < 30 {
            BlackBoxMethod::Cma
        } else {
            BlackBoxMethod::TwoPointsDE
        }
    }

    /// Whether a larger budget replays the evaluations of a smaller one
    pub fn resumable(&self) -> bool {
        !matches!(
            self,
            BlackBoxMethod::NGOpt | BlackBoxMethod::ScrHammersleySearch
        )
    }

    fn optimizer(
        &self,
        bounds: Bounds,
        dim: usize,
        budget: usize,
        rng: Xoshiro256Plus,
    ) -> Box<dyn AskTell> {
        match self {
            BlackBoxMethod::NGOpt => Self::select(dim, budget).optimizer(bounds, dim, budget, rng),
            BlackBoxMethod::RandomSearch => Box::new(RandomSearch::new(bounds, dim, rng)),
            BlackBoxMethod::ScrHammersleySearch => {
                Box::new(HammersleySearch::new(bounds, dim, budget, rng))
            }
            BlackBoxMethod::TwoPointsDE => Box::new(TwoPointsDE::new(bounds, dim, rng)),
            BlackBoxMethod::Cma => {
                let mean = Array1::from_elem(dim, bounds.center());
                Box::new(SepCmaEs::new(bounds, mean, 0.3 * bounds.width(), rng))
            }
            BlackBoxMethod::Pso => Box::new(Pso::new(bounds, dim, rng)),
        }
    }
}

impl fmt::Display for BlackBoxMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BlackBoxMethod::NGOpt => "NGOpt",
            BlackBoxMethod::RandomSearch => "RandomSearch",
            BlackBoxMethod::ScrHammersleySearch => "ScrHammersleySearch",
            BlackBoxMethod::TwoPointsDE => "TwoPointsDE",
            BlackBoxMethod::Cma => "CMA",
            BlackBoxMethod::Pso => "PSO",
        };
        write!(f, "{name}")
    }
}

impl FromStr for BlackBoxMethod {
    type Err = BenchError;

    fn from_str(s: &str) -> Result<Self> {
        BlackBoxMethod::ALL
            .into_iter()
            .find(|m| m.to_string() == s)
            .ok_or_else(|| BenchError::UnsupportedSolverVariant(s.to_string()))
    }
}

/// Bounded black-box optimizers where the budget is a number of function evaluations
#[derive(Clone, Debug)]
pub struct BlackBoxSolver {
    method: BlackBoxMethod,
    seed: u64,
    state: SolverState,
}

impl BlackBoxSolver {
    pub const NAME: &'static str = "blackbox";

    pub fn new(method: BlackBoxMethod) -> Self {
        BlackBoxSolver {
            method,
            seed: SEED_DEFAULT,
            state: SolverState::default(),
        }
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

impl Solver for BlackBoxSolver {
    fn name(&self) -> String {
        format!("{}[method={},seed={}]", Self::NAME, self.method, self.seed)
    }

    fn requires_bounds(&self) -> bool {
        true
    }

    fn resumable(&self) -> bool {
        self.method.resumable()
    }

    fn set_objective(&mut self, problem: &Problem) -> Result<()> {
        self.state.bind(&self.name(), problem, self.requires_bounds())
    }

    fn run(&mut self, budget: Budget) -> Result<()> {
        let n_evals = budget.iterations(&self.name())?;
        let bounds = self.state.bounds(&self.name())?;
        let problem = self.state.problem()?;
        let dim = problem.dimension();
        let rng = Xoshiro256Plus::seed_from_u64(self.seed);
        let mut optimizer = self.method.optimizer(bounds, dim, n_evals, rng);
        let xopt = if n_evals == 0 {
            optimizer.ask()
        } else {
            minimize(problem.function(), "blackbox", optimizer, n_evals)?
        };
        debug!("{} with {budget}: xopt = {xopt}", self.name());
        self.state.set_xopt(xopt)
    }

    fn get_result(&self) -> Result<Array1<f64>> {
        self.state.xopt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zobench_core::Dataset;
    use zobench_datasets::{FcnDataset, SquareDataset};

    #[test]
    fn test_blackbox_method_from_str() {
        for method in BlackBoxMethod::ALL {
            assert_eq!(method.to_string().parse::<BlackBoxMethod>().unwrap(), method);
        }
        assert!(matches!(
            "OnePlusOne".parse::<BlackBoxMethod>(),
            Err(BenchError::UnsupportedSolverVariant(_))
        ));
    }

    #[test]
    fn test_ngopt_selection() {
        assert_eq!(BlackBoxMethod::select(10, 50), BlackBoxMethod::ScrHammersleySearch);
        assert_eq!(BlackBoxMethod::select(2, 50), BlackBoxMethod::Cma);
        assert_eq!(BlackBoxMethod::select(40, 1000), BlackBoxMethod::TwoPointsDE);
    }

    #[test]
    fn test_blackbox_requires_bounds() {
        let problem = SquareDataset::new(2).get_data().unwrap();
        let mut solver = BlackBoxSolver::new(BlackBoxMethod::RandomSearch);
        assert!(matches!(
            solver.set_objective(&problem),
            Err(BenchError::MissingBounds(_))
        ));
    }

    #[test]
    fn test_blackbox_rejects_tolerance() {
        let problem = FcnDataset::new("ackley", 2).unwrap().get_data().unwrap();
        let mut solver = BlackBoxSolver::new(BlackBoxMethod::Cma);
        solver.set_objective(&problem).unwrap();
        assert!(matches!(
            solver.run(Budget::Tolerance(1e-3)),
            Err(BenchError::BudgetMismatch { .. })
        ));
    }

    #[test]
    fn test_blackbox_on_rastrigin() {
        let problem = FcnDataset::new("rastrigin", 2).unwrap().get_data().unwrap();
        for method in BlackBoxMethod::ALL {
            let mut solver = BlackBoxSolver::new(method);
            solver.set_objective(&problem).unwrap();
            solver.run(Budget::Iterations(0)).unwrap();
            let x0 = solver.get_result().unwrap();
            solver.run(Budget::Iterations(300)).unwrap();
            let x = solver.get_result().unwrap();
            assert!(problem.bounds().unwrap().contains(&x.view()));
            if method.resumable() {
                assert!(
                    problem.eval(&x.view()).unwrap() <= problem.eval(&x0.view()).unwrap(),
                    "{method} got worse"
                );
            }
        }
    }
}
