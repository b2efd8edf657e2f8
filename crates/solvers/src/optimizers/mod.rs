//! Internal derivative-free optimizers.
//!
//! Population based methods are written in ask-and-tell form ([`AskTell`]): each
//! `ask` proposes one point to evaluate and each `tell` feeds back its value.
//! [`AskTellSolver`] drives them as argmin solvers, one function evaluation per
//! iteration, so that an iteration budget is a number of evaluations.
mod basin_hopping;
mod cmaes;
mod differential_evolution;
mod hammersley_search;
mod pso;
mod random_search;
mod tpe;

pub(crate) use basin_hopping::*;
pub(crate) use cmaes::*;
pub(crate) use differential_evolution::*;
pub(crate) use hammersley_search::*;
pub(crate) use pso::*;
pub(crate) use random_search::*;
pub(crate) use tpe::*;

use argmin::core::{CostFunction, Executor, IterState, Problem, Solver, State, KV};
use log::debug;
use ndarray::Array1;
use ndarray_rand::rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256Plus;
use zobench_core::{BenchError, ObjFunc, Result};

use crate::cost::ArrayCost;

/// argmin state used by the internal optimizers
pub(crate) type OptimState = IterState<Array1<f64>, (), (), (), (), f64>;

/// Sequential optimizer in ask-and-tell form
pub(crate) trait AskTell: Send {
    /// Next point to evaluate
    fn ask(&mut self) -> Array1<f64>;

    /// Value of the point returned by the last `ask`
    fn tell(&mut self, x: &Array1<f64>, y: f64);
}

/// Independent generator derived from `rng`
pub(crate) fn child_rng(rng: &mut Xoshiro256Plus) -> Xoshiro256Plus {
    Xoshiro256Plus::seed_from_u64(rng.gen())
}

/// argmin adapter of an [`AskTell`] optimizer
pub(crate) struct AskTellSolver {
    optimizer: Box<dyn AskTell>,
}

impl AskTellSolver {
    pub fn new(optimizer: Box<dyn AskTell>) -> Self {
        AskTellSolver { optimizer }
    }
}

impl<O> Solver<O, OptimState> for AskTellSolver
where
    O: CostFunction<Param = Array1<f64>, Output = f64>,
{
    const NAME: &'static str = "AskTell";

    fn next_iter(
        &mut self,
        problem: &mut Problem<O>,
        state: OptimState,
    ) -> std::result::Result<(OptimState, Option<KV>), argmin::core::Error> {
        let x = self.optimizer.ask();
        let y = problem.cost(&x)?;
        self.optimizer.tell(&x, y);
        Ok((state.param(x).cost(y), None))
    }
}

/// Best point of a finished argmin run
pub(crate) fn best_point(state: &OptimState) -> Result<Array1<f64>> {
    state
        .get_best_param()
        .or(state.get_param())
        .cloned()
        .ok_or_else(|| BenchError::InvalidValue("optimizer returned no point".to_string()))
}

/// Minimize `fun` with the given ask-and-tell optimizer using `n_evals` function evaluations
pub(crate) fn minimize(
    fun: &ObjFunc,
    name: &'static str,
    optimizer: Box<dyn AskTell>,
    n_evals: usize,
) -> Result<Array1<f64>> {
    let res = Executor::new(ArrayCost::new(fun), AskTellSolver::new(optimizer))
        .configure(|state| state.max_iters(n_evals as u64))
        .run()?;
    debug!(
        "{} on {}: best cost {} after {} evaluations",
        name,
        fun.name(),
        res.state().get_best_cost(),
        res.state().get_iter()
    );
    best_point(res.state())
}
