use std::fmt;
use std::str::FromStr;

use log::debug;
use ndarray::Array1;
use ndarray_rand::rand::SeedableRng;
use rand_xoshiro::Xoshiro256Plus;
use serde::{Deserialize, Serialize};
use zobench_core::{
    BenchError, Bounds, Budget, Problem, Result, Solver, SolverState, SufficientProgressCriterion,
};

use crate::blackbox::SEED_DEFAULT;
use crate::optimizers::{minimize, AskTell, RandomSearch, SepCmaEs, Tpe};

/// Patience of the sampler family stopping criterion
pub const SAMPLER_PATIENCE: usize = 3;

/// Sampling strategies of a sequential hyperparameter-search study
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SamplerMethod {
    /// CMA-ES started at the center of the bounds with a sixth of their width as step size
    #[serde(rename = "cmaes")]
    CmaEs,
    /// Tree-structured Parzen estimator
    #[serde(rename = "TPE")]
    Tpe,
    RandomSearch,
}

impl SamplerMethod {
    pub const ALL: [SamplerMethod; 3] = [
        SamplerMethod::CmaEs,
        SamplerMethod::Tpe,
        SamplerMethod::RandomSearch,
    ];

    fn optimizer(&self, bounds: Bounds, dim: usize, rng: Xoshiro256Plus) -> Box<dyn AskTell> {
        match self {
            SamplerMethod::CmaEs => {
                let mean = Array1::from_elem(dim, bounds.center());
                Box::new(SepCmaEs::new(bounds, mean, bounds.width() / 6., rng))
            }
            SamplerMethod::Tpe => Box::new(Tpe::new(bounds, dim, rng)),
            SamplerMethod::RandomSearch => Box::new(RandomSearch::new(bounds, dim, rng)),
        }
    }
}

impl fmt::Display for SamplerMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SamplerMethod::CmaEs => "cmaes",
            SamplerMethod::Tpe => "TPE",
            SamplerMethod::RandomSearch => "RandomSearch",
        };
        write!(f, "{name}")
    }
}

impl FromStr for SamplerMethod {
    type Err = BenchError;

    fn from_str(s: &str) -> Result<Self> {
        SamplerMethod::ALL
            .into_iter()
            .find(|m| m.to_string() == s)
            .ok_or_else(|| BenchError::UnsupportedSolverVariant(s.to_string()))
    }
}

/// Sequential study of `n + 1` trials for an iteration budget `n`
#[derive(Clone, Debug)]
pub struct SamplerSolver {
    method: SamplerMethod,
    seed: u64,
    state: SolverState,
}

impl SamplerSolver {
    pub const NAME: &'static str = "sampler";

    pub fn new(method: SamplerMethod) -> Self {
        SamplerSolver {
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

impl Solver for SamplerSolver {
    fn name(&self) -> String {
        format!("{}[method={},seed={}]", Self::NAME, self.method, self.seed)
    }

    fn requires_bounds(&self) -> bool {
        true
    }

    fn resumable(&self) -> bool {
        true
    }

    fn stopping_criterion(&self) -> SufficientProgressCriterion {
        SufficientProgressCriterion::default().patience(SAMPLER_PATIENCE)
    }

    fn set_objective(&mut self, problem: &Problem) -> Result<()> {
        self.state.bind(&self.name(), problem, self.requires_bounds())
    }

    fn run(&mut self, budget: Budget) -> Result<()> {
        let n_iter = budget.iterations(&self.name())?;
        let bounds = self.state.bounds(&self.name())?;
        let problem = self.state.problem()?;
        let rng = Xoshiro256Plus::seed_from_u64(self.seed);
        let mut optimizer = self.method.optimizer(bounds, problem.dimension(), rng);
        let xopt = if n_iter == 0 {
            optimizer.ask()
        } else {
            minimize(problem.function(), "sampler", optimizer, n_iter + 1)?
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
    use zobench_datasets::FcnDataset;

    #[test]
    fn test_sampler_method_from_str() {
        assert_eq!("TPE".parse::<SamplerMethod>().unwrap(), SamplerMethod::Tpe);
        assert_eq!("cmaes".parse::<SamplerMethod>().unwrap(), SamplerMethod::CmaEs);
        assert!(matches!(
            "GridSampler".parse::<SamplerMethod>(),
            Err(BenchError::UnsupportedSolverVariant(_))
        ));
    }

    #[test]
    fn test_sampler_patience() {
        let solver = SamplerSolver::new(SamplerMethod::Tpe);
        assert_eq!(solver.stopping_criterion().patience, 3);
    }

    #[test]
    fn test_tpe_on_ackley() {
        let problem = FcnDataset::new("ackley", 2).unwrap().get_data().unwrap();
        let mut solver = SamplerSolver::new(SamplerMethod::Tpe);
        solver.set_objective(&problem).unwrap();
        solver.run(Budget::Iterations(9)).unwrap();
        let startup = problem.eval(&solver.get_result().unwrap().view()).unwrap();
        solver.run(Budget::Iterations(60)).unwrap();
        let x = solver.get_result().unwrap();
        assert!(problem.eval(&x.view()).unwrap() <= startup);
    }
}
