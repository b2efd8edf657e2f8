//! Benchmark configuration.
//!
//! A [`BenchConfig`] holds parameter grids: each grid entry expands into the
//! cross product of its parameter lists. [`BenchConfig::check`] resolves the
//! names of functions and methods and gives a [`ValidBenchConfig`] used by the
//! [`Benchmark`](crate::Benchmark) driver.
use std::cmp::Ordering;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use zobench_core::{BenchError, Result, Strategy};
use zobench_datasets::{DatasetKind, FcnDataset, TestFunction};
use zobench_solvers::{BlackBoxMethod, LocalMethod, SamplerMethod, SolverKind, SEED_DEFAULT};

/// Default timeout of a budget escalation, in seconds
pub const TIMEOUT_DEFAULT: f64 = 100.;

fn default_min0() -> Vec<f64> {
    vec![-10.]
}

fn default_max0() -> Vec<f64> {
    vec![10.]
}

fn default_strategy() -> Vec<Strategy> {
    vec![Strategy::Iteration]
}

fn default_seed() -> Vec<u64> {
    vec![SEED_DEFAULT]
}

fn default_stepsize() -> Vec<f64> {
    vec![0.5]
}

/// Grid of datasets, one entry per dataset family
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name")]
pub enum DatasetGrid {
    #[serde(rename = "FCN")]
    Fcn {
        function: Vec<String>,
        dimension: Vec<usize>,
    },
    /// An empty `seed` list gives the dataset centered on zero
    #[serde(rename = "simulated")]
    Simulated {
        dimension: Vec<usize>,
        #[serde(default)]
        seed: Vec<u64>,
    },
    #[serde(rename = "square")]
    Square { dimension: Vec<usize> },
}

impl DatasetGrid {
    /// Resolve the grid into the datasets of its cross product
    pub fn expand(&self) -> Result<Vec<DatasetKind>> {
        let kinds = match self {
            DatasetGrid::Fcn {
                function,
                dimension,
            } => {
                let mut kinds = vec![];
                for name in function {
                    let function: TestFunction = name.parse()?;
                    // rejects functions out of the FCN family
                    FcnDataset::from_function(function, 1)?;
                    kinds.extend(dimension.iter().map(|&dimension| DatasetKind::Fcn {
                        function,
                        dimension,
                    }));
                }
                kinds
            }
            DatasetGrid::Simulated { dimension, seed } => {
                let seeds: Vec<Option<u64>> = if seed.is_empty() {
                    vec![None]
                } else {
                    seed.iter().copied().map(Some).collect()
                };
                dimension
                    .iter()
                    .flat_map(|&dimension| {
                        seeds
                            .iter()
                            .map(move |&seed| DatasetKind::Simulated { dimension, seed })
                    })
                    .collect()
            }
            DatasetGrid::Square { dimension } => dimension
                .iter()
                .map(|&dimension| DatasetKind::Square { dimension })
                .collect(),
        };
        if let Some(kind) = kinds.iter().find(|k| k.dimension() == 0) {
            return Err(BenchError::InvalidValue(format!(
                "dataset dimension should be positive in {kind:?}"
            )));
        }
        Ok(kinds)
    }
}

/// Grid of solvers, one entry per solver family
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name")]
pub enum SolverGrid {
    Bisector {
        #[serde(default = "default_min0")]
        min0: Vec<f64>,
        #[serde(default = "default_max0")]
        max0: Vec<f64>,
    },
    #[serde(rename = "local")]
    Local {
        method: Vec<String>,
        #[serde(default = "default_strategy")]
        strategy: Vec<Strategy>,
    },
    #[serde(rename = "basinhopping")]
    BasinHopping {
        temperature: Vec<f64>,
        #[serde(default = "default_seed")]
        seed: Vec<u64>,
        #[serde(default = "default_stepsize")]
        stepsize: Vec<f64>,
    },
    #[serde(rename = "blackbox")]
    BlackBox {
        method: Vec<String>,
        #[serde(default = "default_seed")]
        seed: Vec<u64>,
    },
    #[serde(rename = "sampler")]
    Sampler {
        method: Vec<String>,
        #[serde(default = "default_seed")]
        seed: Vec<u64>,
    },
}

fn check_positive(what: &str, values: &[f64]) -> Result<()> {
    match values.iter().find(|v| !(v.is_finite() && **v > 0.)) {
        Some(v) => Err(BenchError::InvalidValue(format!(
            "{what} should be positive, got {v}"
        ))),
        None => Ok(()),
    }
}

impl SolverGrid {
    /// Resolve the grid into the solvers of its cross product
    pub fn expand(&self) -> Result<Vec<SolverKind>> {
        let mut kinds = vec![];
        match self {
            SolverGrid::Bisector { min0, max0 } => {
                for &min0 in min0 {
                    for &max0 in max0 {
                        if min0.partial_cmp(&max0) != Some(Ordering::Less) {
                            return Err(BenchError::InvalidValue(format!(
                                "Bisector interval [{min0}, {max0}] is empty"
                            )));
                        }
                        kinds.push(SolverKind::Bisector { min0, max0 });
                    }
                }
            }
            SolverGrid::Local { method, strategy } => {
                for name in method {
                    let method: LocalMethod = name.parse()?;
                    kinds.extend(
                        strategy
                            .iter()
                            .map(|&strategy| SolverKind::Local { method, strategy }),
                    );
                }
            }
            SolverGrid::BasinHopping {
                temperature,
                seed,
                stepsize,
            } => {
                check_positive("basinhopping temperature", temperature)?;
                check_positive("basinhopping stepsize", stepsize)?;
                for &temperature in temperature {
                    for &seed in seed {
                        kinds.extend(stepsize.iter().map(|&stepsize| {
                            SolverKind::BasinHopping {
                                temperature,
                                seed,
                                stepsize,
                            }
                        }));
                    }
                }
            }
            SolverGrid::BlackBox { method, seed } => {
                for name in method {
                    let method: BlackBoxMethod = name.parse()?;
                    kinds.extend(seed.iter().map(|&seed| SolverKind::BlackBox { method, seed }));
                }
            }
            SolverGrid::Sampler { method, seed } => {
                for name in method {
                    let method: SamplerMethod = name.parse()?;
                    kinds.extend(seed.iter().map(|&seed| SolverKind::Sampler { method, seed }));
                }
            }
        }
        Ok(kinds)
    }
}

/// Benchmark configuration, usually read from a JSON file
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchConfig {
    /// Dataset grids
    pub datasets: Vec<DatasetGrid>,
    /// Solver grids
    pub solvers: Vec<SolverGrid>,
    /// Number of times each combination is run
    pub n_repetitions: usize,
    /// Number of combinations run in parallel
    pub n_jobs: usize,
    /// Overrides the maximum number of budgets of the solvers stopping criteria
    pub max_runs: Option<usize>,
    /// Overrides the patience of the solvers stopping criteria
    pub patience: Option<usize>,
    /// Timeout of a budget escalation in seconds
    pub timeout: Option<f64>,
    /// Only run datasets whose name contains this pattern
    pub dataset_filter: Option<String>,
    /// Only run solvers whose name contains this pattern
    pub solver_filter: Option<String>,
}

impl Default for BenchConfig {
    fn default() -> Self {
        let names = |names: &[&str]| names.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        BenchConfig {
            datasets: vec![
                DatasetGrid::Fcn {
                    function: names(&["ackley", "rosenbrock", "rastrigin", "schwefel"]),
                    dimension: vec![2, 10],
                },
                DatasetGrid::Simulated {
                    dimension: vec![2, 10],
                    seed: vec![],
                },
                DatasetGrid::Square {
                    dimension: vec![1, 2, 3],
                },
            ],
            solvers: vec![
                SolverGrid::Bisector {
                    min0: default_min0(),
                    max0: default_max0(),
                },
                SolverGrid::Local {
                    method: names(&["Nelder-Mead", "COBYLA", "L-BFGS"]),
                    strategy: default_strategy(),
                },
                SolverGrid::BasinHopping {
                    temperature: vec![1., 10.],
                    seed: default_seed(),
                    stepsize: default_stepsize(),
                },
                SolverGrid::BlackBox {
                    method: names(&[
                        "NGOpt",
                        "RandomSearch",
                        "ScrHammersleySearch",
                        "TwoPointsDE",
                        "CMA",
                        "PSO",
                    ]),
                    seed: default_seed(),
                },
                SolverGrid::Sampler {
                    method: names(&["cmaes", "TPE", "RandomSearch"]),
                    seed: default_seed(),
                },
            ],
            n_repetitions: 1,
            n_jobs: 1,
            max_runs: None,
            patience: None,
            timeout: Some(TIMEOUT_DEFAULT),
            dataset_filter: None,
            solver_filter: None,
        }
    }
}

impl BenchConfig {
    /// Read a configuration from a JSON file, missing fields take their default values
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn datasets(mut self, datasets: Vec<DatasetGrid>) -> Self {
        self.datasets = datasets;
        self
    }

    pub fn solvers(mut self, solvers: Vec<SolverGrid>) -> Self {
        self.solvers = solvers;
        self
    }

    pub fn n_repetitions(mut self, n_repetitions: usize) -> Self {
        self.n_repetitions = n_repetitions;
        self
    }

    pub fn n_jobs(mut self, n_jobs: usize) -> Self {
        self.n_jobs = n_jobs;
        self
    }

    pub fn max_runs(mut self, max_runs: usize) -> Self {
        self.max_runs = Some(max_runs);
        self
    }

    pub fn patience(mut self, patience: usize) -> Self {
        self.patience = Some(patience);
        self
    }

    /// Sets the timeout in seconds, `None` disables it
    pub fn timeout(mut self, timeout: Option<f64>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn dataset_filter(mut self, pattern: &str) -> Self {
        self.dataset_filter = Some(pattern.to_string());
        self
    }

    pub fn solver_filter(mut self, pattern: &str) -> Self {
        self.solver_filter = Some(pattern.to_string());
        self
    }

    /// Validate the configuration and resolve its grids.
    ///
    /// Any unknown function or method name, or invalid parameter, rejects the
    /// whole configuration before a single combination is run. Errors raised
    /// while running a combination are instead recorded as a
    /// [`Failure`](crate::Failure) and the sweep goes on.
    pub fn check(&self) -> Result<ValidBenchConfig> {
        if self.n_repetitions == 0 {
            return Err(BenchError::InvalidValue(
                "`n_repetitions` should be positive".to_string(),
            ));
        }
        if self.n_jobs == 0 {
            return Err(BenchError::InvalidValue(
                "`n_jobs` should be positive".to_string(),
            ));
        }
        if self.max_runs == Some(0) {
            return Err(BenchError::InvalidValue(
                "`max_runs` should be positive".to_string(),
            ));
        }
        if self.patience == Some(0) {
            return Err(BenchError::InvalidValue(
                "`patience` should be positive".to_string(),
            ));
        }
        let timeout = self
            .timeout
            .map(|secs| {
                Duration::try_from_secs_f64(secs)
                    .map_err(|e| BenchError::InvalidValue(format!("timeout {secs}: {e}")))
            })
            .transpose()?;

        let mut datasets = vec![];
        for grid in &self.datasets {
            datasets.extend(grid.expand()?);
        }
        let mut solvers = vec![];
        for grid in &self.solvers {
            solvers.extend(grid.expand()?);
        }
        Ok(ValidBenchConfig {
            datasets,
            solvers,
            n_repetitions: self.n_repetitions,
            n_jobs: self.n_jobs,
            max_runs: self.max_runs,
            patience: self.patience,
            timeout,
            dataset_filter: self.dataset_filter.clone(),
            solver_filter: self.solver_filter.clone(),
        })
    }
}

/// Checked benchmark configuration with resolved datasets and solvers
#[derive(Clone, Debug, PartialEq)]
pub struct ValidBenchConfig {
    pub(crate) datasets: Vec<DatasetKind>,
    pub(crate) solvers: Vec<SolverKind>,
    pub(crate) n_repetitions: usize,
    pub(crate) n_jobs: usize,
    pub(crate) max_runs: Option<usize>,
    pub(crate) patience: Option<usize>,
    pub(crate) timeout: Option<Duration>,
    pub(crate) dataset_filter: Option<String>,
    pub(crate) solver_filter: Option<String>,
}

impl ValidBenchConfig {
    pub fn datasets(&self) -> &[DatasetKind] {
        &self.datasets
    }

    pub fn solvers(&self) -> &[SolverKind] {
        &self.solvers
    }

    pub fn n_repetitions(&self) -> usize {
        self.n_repetitions
    }

    pub fn n_jobs(&self) -> usize {
        self.n_jobs
    }
}
