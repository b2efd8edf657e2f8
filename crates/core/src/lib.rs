/*!
Core contracts of the `zobench` benchmarking harness for zero-order optimization.

A benchmark combines three kinds of components:
* a [`Dataset`] produces a [`Problem`]: a function, its dimension and optional [`Bounds`],
* an [`Objective`] binds the problem and evaluates points,
* a [`Solver`] minimizes the problem under a given [`Budget`].

The benchmark driver runs each solver with budgets of increasing effort, as scheduled
by a [`SufficientProgressCriterion`], and records the objective value reached.

```
use ndarray::{array, ArrayView1};
use zobench_core::{Bounds, ObjFunc, Objective, Problem, ZeroOrderObjective};

let sphere = ObjFunc::new("sphere", |x: &ArrayView1<f64>| x.dot(x));
let problem = Problem::new(sphere, 2, Some(Bounds::new(-1., 1.).unwrap())).unwrap();

let mut objective = ZeroOrderObjective::new();
objective.set_data(problem);
assert_eq!(objective.compute(&array![1., 2.].view()).unwrap(), 5.);
```
*/
#![warn(rustdoc::broken_intra_doc_links)]
mod budget;
mod criterion;
mod errors;
mod objective;
mod problem;
pub mod sampling;
mod solver_state;
mod traits;

pub use budget::*;
pub use criterion::*;
pub use errors::*;
pub use objective::*;
pub use problem::*;
pub use solver_state::*;
pub use traits::*;

use env_logger::{Builder, Env};

/// Environment variable used to set the log level (default `info`)
pub const ZOBENCH_LOG: &str = "ZOBENCH_LOG";

/// Initialize logging to stdout, filtered by the [`ZOBENCH_LOG`] environment variable.
/// Only the first call has an effect.
pub fn init_logger() {
    let env = Env::new().filter_or(ZOBENCH_LOG, "info");
    let mut builder = Builder::from_env(env);
    let builder = builder.target(env_logger::Target::Stdout);
    builder.try_init().ok();
}
