/*!
`zobench` benchmarks zero-order optimization algorithms on classic test functions.

Every (dataset, solver) combination of a [`BenchConfig`] is run with increasing
budgets until the objective value stops improving, and the reached values are
collected as [`ResultSample`]s.

```no_run
use zobench::{save_results, BenchConfig, Benchmark};

let config = BenchConfig::default().n_jobs(4).solver_filter("blackbox");
let results = Benchmark::new(config.check().unwrap()).run().unwrap();
save_results("results.json", &results).unwrap();
```

The building blocks live in the workspace crates, re-exported here:
* [`zobench_core`]: problem, traits, budget and stopping criterion,
* [`zobench_datasets`]: test functions and datasets,
* [`zobench_solvers`]: solver variants.
*/
mod config;
mod results;
mod runner;

pub use config::*;
pub use results::*;
pub use runner::*;

pub use zobench_core;
pub use zobench_datasets;
pub use zobench_solvers;
