use argmin::core::{CostFunction, Executor, Problem, Solver, State, KV};
use argmin::solver::neldermead::NelderMead;
use log::debug;
use ndarray::{Array, Array1};
use ndarray_rand::rand::Rng;
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use rand_xoshiro::Xoshiro256Plus;
use zobench_core::ObjFunc;

use super::OptimState;
use crate::cost::VecCost;

/// Default half width of the random displacement
pub(crate) const BH_STEPSIZE: f64 = 0.5;
/// Number of hops between two step size adjustments
pub(crate) const BH_INTERVAL: usize = 50;
/// Target acceptance rate of the step size adjustment
const BH_TARGET_ACCEPT_RATE: f64 = 0.5;
const BH_STEPWISE_FACTOR: f64 = 0.9;
/// Maximum iterations of each local Nelder-Mead minimization
pub(crate) const BH_LOCAL_MAX_ITERS: u64 = 200;

/// Nelder-Mead initial simplex: `x` and `x` moved by 5% along each axis
/// (or by 0.00025 for null components)
pub(crate) fn initial_simplex(x: &[f64]) -> Vec<Vec<f64>> {
    let mut simplex = vec![x.to_vec()];
    for i in 0..x.len() {
        let mut xi = x.to_vec();
        xi[i] = if xi[i] != 0. { 1.05 * xi[i] } else { 0.00025 };
        simplex.push(xi);
    }
    simplex
}

/// Basin hopping: a random walk between local minima.
///
/// Each iteration displaces the current minimum at random, runs a local
/// Nelder-Mead minimization from there and accepts the new minimum with
/// the Metropolis criterion at the given temperature.
pub(crate) struct BasinHopping {
    fun: ObjFunc,
    x0: Array1<f64>,
    temperature: f64,
    stepsize: f64,
    local_max_iters: u64,
    current: Option<(Array1<f64>, f64)>,
    n_accepted: usize,
    n_hops: usize,
    rng: Xoshiro256Plus,
}

impl BasinHopping {
    pub fn new(fun: &ObjFunc, x0: Array1<f64>, temperature: f64, rng: Xoshiro256Plus) -> Self {
        BasinHopping {
            fun: fun.clone(),
            x0,
            temperature,
            stepsize: BH_STEPSIZE,
            local_max_iters: BH_LOCAL_MAX_ITERS,
            current: None,
            n_accepted: 0,
            n_hops: 0,
            rng,
        }
    }

    pub fn stepsize(mut self, stepsize: f64) -> Self {
        self.stepsize = stepsize;
        self
    }

    fn local_minimize(
        &self,
        x: &Array1<f64>,
    ) -> std::result::Result<(Array1<f64>, f64), argmin::core::Error> {
        let solver = NelderMead::new(initial_simplex(&x.to_vec())).with_sd_tolerance(1e-8)?;
        let res = Executor::new(VecCost::new(&self.fun), solver)
            .configure(|state| state.max_iters(self.local_max_iters))
            .run()?;
        let xmin = res
            .state()
            .get_best_param()
            .cloned()
            .unwrap_or_else(|| x.to_vec());
        let fmin = self.fun.eval_slice(&xmin);
        Ok((Array1::from(xmin), fmin))
    }

    fn accept(&mut self, f_new: f64, f_old: f64) -> bool {
        if f_new < f_old {
            return true;
        }
        let w = (-(f_new - f_old) / self.temperature).exp();
        w >= self.rng.gen::<f64>()
    }

    fn adjust_stepsize(&mut self) {
        let rate = self.n_accepted as f64 / self.n_hops as f64;
        if rate > BH_TARGET_ACCEPT_RATE {
            self.stepsize /= BH_STEPWISE_FACTOR;
        } else {
            self.stepsize *= BH_STEPWISE_FACTOR;
        }
        debug!("Basin hopping acceptance rate {rate:.2}, step size {}", self.stepsize);
    }
}

impl<O> Solver<O, OptimState> for BasinHopping
where
    O: CostFunction<Param = Array1<f64>, Output = f64>,
{
    const NAME: &'static str = "BasinHopping";

    fn init(
        &mut self,
        _problem: &mut Problem<O>,
        state: OptimState,
    ) -> std::result::Result<(OptimState, Option<KV>), argmin::core::Error> {
        let (x, f) = self.local_minimize(&self.x0)?;
        self.current = Some((x.clone(), f));
        Ok((state.param(x).cost(f), None))
    }

    fn next_iter(
        &mut self,
        _problem: &mut Problem<O>,
        state: OptimState,
    ) -> std::result::Result<(OptimState, Option<KV>), argmin::core::Error> {
        let (x_old, f_old) = match self.current.take() {
            Some(current) => current,
            None => {
                let f = self.fun.eval(&self.x0.view());
                (self.x0.clone(), f)
            }
        };
        let step = self.stepsize;
        let displacement = Array::random_using(x_old.len(), Uniform::new(-step, step), &mut self.rng);
        let (x_new, f_new) = self.local_minimize(&(&x_old + &displacement))?;

        self.n_hops += 1;
        let current = if self.accept(f_new, f_old) {
            self.n_accepted += 1;
            (x_new, f_new)
        } else {
            (x_old, f_old)
        };
        if self.n_hops % BH_INTERVAL == 0 {
            self.adjust_stepsize();
        }

        let (x, f) = current.clone();
        self.current = Some(current);
        Ok((state.param(x).cost(f), None))
    }
}
