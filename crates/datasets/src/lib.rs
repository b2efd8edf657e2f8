/*!
Datasets of the zero-order optimization benchmark.

Each dataset produces a [`Problem`](zobench_core::Problem) built on one of the
[`TestFunction`]s:
* `FCN`: Ackley, Rastrigin, Rosenbrock and Schwefel 2.20 functions within their usual bounds,
* `simulated`: the unbounded squared norm, optionally centered on a random point,
* `square`: the unbounded euclidean norm.

```
use zobench_core::Dataset;
use zobench_datasets::FcnDataset;

let problem = FcnDataset::new("rastrigin", 2).unwrap().get_data().unwrap();
assert_eq!(problem.bounds().unwrap().upper, 5.12);
```
*/
mod fcn;
mod functions;
mod kind;
mod simulated;
mod square;

pub use fcn::*;
pub use functions::*;
pub use kind::*;
pub use simulated::*;
pub use square::*;
