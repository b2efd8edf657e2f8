use argmin::core::Executor;
use log::debug;
use ndarray::Array1;
use ndarray_rand::rand::SeedableRng;
use rand_xoshiro::Xoshiro256Plus;
use zobench_core::sampling::{Random, SamplingMethod};
use zobench_core::{Budget, Problem, Result, Solver, SolverState};

use crate::blackbox::SEED_DEFAULT;
use crate::cost::ArrayCost;
use crate::optimizers::{best_point, child_rng, BasinHopping, BH_STEPSIZE};

/// Basin hopping started from a random point within the bounds.
///
/// An iteration budget `n` runs an initial local minimization followed by `n - 1` hops.
#[derive(Clone, Debug)]
pub struct BasinHoppingSolver {
    temperature: f64,
    stepsize: f64,
    seed: u64,
    state: SolverState,
}

impl BasinHoppingSolver {
    pub const NAME: &'static str = "basinhopping";

    pub fn new(temperature: f64) -> Self {
        BasinHoppingSolver {
            temperature,
            stepsize: BH_STEPSIZE,
            seed: SEED_DEFAULT,
            state: SolverState::default(),
        }
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn stepsize(mut self, stepsize: f64) -> Self {
        self.stepsize = stepsize;
        self
    }
}

impl Solver for BasinHoppingSolver {
    fn name(&self) -> String {
        format!(
            "{}[seed={},temperature={}]",
            Self::NAME,
            self.seed,
            self.temperature
        )
    }

    fn requires_bounds(&self) -> bool {
        true
    }

    fn resumable(&self) -> bool {
        true
    }

    fn set_objective(&mut self, problem: &Problem) -> Result<()> {
        self.state.bind(&self.name(), problem, self.requires_bounds())
    }

    fn run(&mut self, budget: Budget) -> Result<()> {
        let n_iter = budget.iterations(&self.name())?;
        let bounds = self.state.bounds(&self.name())?;
        let problem = self.state.problem()?;

        let mut rng = Xoshiro256Plus::seed_from_u64(self.seed);
        let x0 = Random::new(&bounds.xlimits(problem.dimension()), child_rng(&mut rng))
            .sample(1)
            .row(0)
            .to_owned();
        let xopt = if n_iter == 0 {
            x0
        } else {
            let fun = problem.function();
            let solver = BasinHopping::new(fun, x0, self.temperature, rng).stepsize(self.stepsize);
            let res = Executor::new(ArrayCost::new(fun), solver)
                .configure(|state| state.max_iters(n_iter as u64 - 1))
                .run()?;
            best_point(res.state())?
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
    fn test_basinhopping_start_point_in_bounds() {
        let problem = FcnDataset::new("rosenbrock", 2).unwrap().get_data().unwrap();
        let mut solver = BasinHoppingSolver::new(1.);
        solver.set_objective(&problem).unwrap();
        solver.run(Budget::Iterations(0)).unwrap();
        let x0 = solver.get_result().unwrap();
        assert!(problem.bounds().unwrap().contains(&x0.view()));

        solver.run(Budget::Iterations(3)).unwrap();
        let x = solver.get_result().unwrap();
        assert!(problem.eval(&x.view()).unwrap() < problem.eval(&x0.view()).unwrap());
    }
}
