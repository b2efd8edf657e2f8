/*!
Solvers of the zero-order optimization benchmark.

Every solver implements the [`Solver`](zobench_core::Solver) contract: it is bound
to a [`Problem`](zobench_core::Problem) then run with increasing budgets by the
benchmark driver.

* [`Bisector`]: bisection on the sign of a one dimensional function,
* [`LocalSolver`]: Nelder-Mead, L-BFGS or COBYLA started from `(0.5, ..., 0.5)`,
* [`BasinHoppingSolver`]: global stepping with Metropolis acceptance and local minimizations,
* [`BlackBoxSolver`]: population based black-box methods within bounds,
* [`SamplerSolver`]: sequential samplers of a hyperparameter-search study.

The population based methods are written as ask/tell optimizers driven by
[argmin](https://docs.rs/argmin) executors, one function evaluation per iteration.

```
use zobench_core::{Budget, Dataset, Solver};
use zobench_datasets::SquareDataset;
use zobench_solvers::{LocalMethod, LocalSolver};

let problem = SquareDataset::new(2).get_data().unwrap();
let mut solver = LocalSolver::new(LocalMethod::NelderMead);
solver.set_objective(&problem).unwrap();
solver.run(Budget::Iterations(100)).unwrap();
let xopt = solver.get_result().unwrap();
assert!(problem.eval(&xopt.view()).unwrap() < 1e-2);
```
*/
mod basinhopping;
mod bisector;
mod blackbox;
mod cost;
mod kind;
mod local;
mod optimizers;
mod sampler;

pub use basinhopping::*;
pub use bisector::*;
pub use blackbox::*;
pub use kind::*;
pub use local::*;
pub use sampler::*;
