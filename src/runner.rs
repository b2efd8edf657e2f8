//! Benchmark driver.
//!
//! Each (dataset, solver, repetition) combination owns a fresh objective and
//! solver. The solver is run with increasing budgets, one [`ResultSample`] being
//! recorded per budget, until its stopping criterion halts the escalation.
use std::time::Instant;

use log::{debug, info, warn};
use rayon::prelude::*;
use zobench_core::{
    BenchError, Dataset, Objective, Result, Solver, SufficientProgressCriterion,
    ZeroOrderObjective,
};
use zobench_solvers::SolverKind;

use crate::config::ValidBenchConfig;
use crate::results::{BenchResults, Failure, ResultSample, Skipped};

/// One run of a solver on a dataset
struct Combination<'a> {
    dataset: &'a dyn Dataset,
    data_name: String,
    solver: &'a SolverKind,
    solver_name: String,
    repetition: usize,
}

/// Selected datasets and solvers with their names
pub type Selection<'a> = (Vec<(Box<dyn Dataset>, String)>, Vec<(&'a SolverKind, String)>);

/// Runs every combination of a checked configuration
pub struct Benchmark {
    config: ValidBenchConfig,
}

impl Benchmark {
    pub fn new(config: ValidBenchConfig) -> Self {
        Benchmark { config }
    }

    pub fn config(&self) -> &ValidBenchConfig {
        &self.config
    }

    /// Stopping criterion of `solver` with the configured overrides
    fn criterion(&self, solver: &dyn Solver) -> SufficientProgressCriterion {
        let mut criterion = solver.stopping_criterion();
        if let Some(max_runs) = self.config.max_runs {
            criterion = criterion.max_runs(max_runs);
        }
        if let Some(patience) = self.config.patience {
            criterion = criterion.patience(patience);
        }
        if self.config.timeout.is_some() {
            criterion = criterion.timeout(self.config.timeout);
        }
        criterion
    }

    /// Datasets and solvers names selected by the filters
    pub fn selection(&self) -> Result<Selection<'_>> {
        let matches = |filter: &Option<String>, name: &str| {
            filter.as_ref().map_or(true, |pattern| name.contains(pattern.as_str()))
        };
        let mut datasets = vec![];
        for kind in &self.config.datasets {
            let dataset = kind.build()?;
            let name = dataset.name();
            if matches(&self.config.dataset_filter, &name) {
                datasets.push((dataset, name));
            }
        }
        let solvers = self
            .config
            .solvers
            .iter()
            .map(|kind| (kind, kind.build().name()))
            .filter(|(_, name)| matches(&self.config.solver_filter, name))
            .collect();
        Ok((datasets, solvers))
    }

    /// Run all selected combinations, in parallel with `n_jobs` threads
    pub fn run(&self) -> Result<BenchResults> {
        let (datasets, solvers) = self.selection()?;
        let mut combinations = vec![];
        for (dataset, data_name) in &datasets {
            for (solver, solver_name) in &solvers {
                for repetition in 0..self.config.n_repetitions {
                    combinations.push(Combination {
                        dataset: dataset.as_ref(),
                        data_name: data_name.clone(),
                        solver,
                        solver_name: solver_name.clone(),
                        repetition,
                    });
                }
            }
        }
        info!(
            "Benchmark {} datasets x {} solvers x {} repetitions with {} jobs",
            datasets.len(),
            solvers.len(),
            self.config.n_repetitions,
            self.config.n_jobs
        );

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.n_jobs)
            .build()
            .map_err(|e| BenchError::InvalidValue(format!("thread pool: {e}")))?;
        let reports: Vec<BenchResults> = pool.install(|| {
            combinations
                .par_iter()
                .map(|combination| self.run_combination(combination))
                .collect()
        });

        let mut results = BenchResults::default();
        for report in reports {
            results.merge(report);
        }
        info!(
            "Benchmark done: {} samples, {} failures, {} skipped",
            results.samples.len(),
            results.failures.len(),
            results.skipped.len()
        );
        Ok(results)
    }

    fn run_combination(&self, combination: &Combination) -> BenchResults {
        let mut report = BenchResults::default();
        let objective_name = ZeroOrderObjective::NAME.to_string();
        match self.escalate(combination, &mut report.samples) {
            Ok(None) => (),
            Ok(Some(_)) if combination.repetition > 0 => {
                debug!(
                    "Skip {} on {} (repetition {})",
                    combination.solver_name, combination.data_name, combination.repetition
                );
            }
            Ok(Some(reason)) => {
                info!(
                    "Skip {} on {}: {reason}",
                    combination.solver_name, combination.data_name
                );
                report.skipped.push(Skipped {
                    solver_name: combination.solver_name.clone(),
                    data_name: combination.data_name.clone(),
                    reason,
                });
            }
            Err(err) => {
                warn!(
                    "{} failed on {} (repetition {}): {err}",
                    combination.solver_name, combination.data_name, combination.repetition
                );
                report.failures.push(Failure {
                    solver_name: combination.solver_name.clone(),
                    data_name: combination.data_name.clone(),
                    objective_name,
                    repetition: combination.repetition,
                    error: err.to_string(),
                });
            }
        }
        report
    }

    /// Budget escalation of one combination. Returns the skip reason if the
    /// solver declines the problem.
    fn escalate(
        &self,
        combination: &Combination,
        samples: &mut Vec<ResultSample>,
    ) -> Result<Option<String>> {
        let mut objective = ZeroOrderObjective::new();
        objective.set_data(combination.dataset.get_data()?);
        let x0 = objective.get_one_solution()?;
        let y0 = objective.compute(&x0.view())?;
        debug!("{}: f(x0) = {y0}", combination.data_name);

        let problem = objective.get_objective()?;
        let mut solver = combination.solver.build();
        if let Some(reason) = solver.skip(&problem) {
            return Ok(Some(reason));
        }
        solver.set_objective(&problem)?;

        info!(
            "Run {} on {} (repetition {})",
            combination.solver_name, combination.data_name, combination.repetition
        );
        let criterion = self.criterion(solver.as_ref());
        let mut monitor = criterion.start();
        let mut budget = criterion.initial_budget();
        loop {
            let start = Instant::now();
            solver.run(budget)?;
            let time = start.elapsed().as_secs_f64();
            let xopt = solver.get_result()?;
            let objective_value = objective.compute(&xopt.view())?;
            samples.push(ResultSample {
                solver_name: combination.solver_name.clone(),
                data_name: combination.data_name.clone(),
                objective_name: objective.name(),
                stop_val: budget.stop_val(),
                time,
                objective_value,
                repetition: combination.repetition,
            });
            if let Some(reason) = monitor.check(objective_value) {
                info!(
                    "{} on {}: {reason} after {} runs, best objective {}",
                    combination.solver_name,
                    combination.data_name,
                    monitor.runs(),
                    monitor.best()
                );
                return Ok(None);
            }
            budget = criterion.next_budget(&budget);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BenchConfig, DatasetGrid, SolverGrid};
    use approx::assert_abs_diff_eq;
    use zobench_core::Strategy;

    fn bisector_on_square() -> BenchConfig {
        BenchConfig::default()
            .datasets(vec![DatasetGrid::Square {
                dimension: vec![1, 2],
            }])
            .solvers(vec![SolverGrid::Bisector {
                min0: vec![-10.],
                max0: vec![10.],
            }])
            .max_runs(20)
    }

    #[test]
    fn test_skip_recorded_once() {
        let config = bisector_on_square()
            .n_repetitions(3)
            .n_jobs(2)
            .check()
            .unwrap();
        let results = Benchmark::new(config).run().unwrap();
        assert_eq!(results.skipped.len(), 1);
        assert_eq!(results.skipped[0].data_name, "square[dimension=2]");
        for rep in 0..3 {
            assert!(results.samples.iter().any(|s| s.repetition == rep));
        }
    }

    #[test]
    fn test_tolerance_escalation() {
        let config = BenchConfig::default()
            .datasets(vec![DatasetGrid::Square {
                dimension: vec![2],
            }])
            .solvers(vec![SolverGrid::Local {
                method: vec!["Nelder-Mead".to_string()],
                strategy: vec![Strategy::Tolerance],
            }])
            .patience(5)
            .max_runs(6)
            .check()
            .unwrap();
        let results = Benchmark::new(config).run().unwrap();
        assert!(results.failures.is_empty());
        assert_eq!(results.samples.len(), 6);
        assert_eq!(
            results.samples[0].solver_name,
            "local[method=Nelder-Mead,strategy=tolerance]"
        );

        let stop_vals: Vec<f64> = results.samples.iter().map(|s| s.stop_val).collect();
        assert!(stop_vals[0].is_infinite());
        assert_eq!(&stop_vals[1..4], &[1., 1. / 1.5, 1. / 1.5 / 1.5]);
        // infinite tolerance keeps x0 = (0.5, 0.5)
        assert_abs_diff_eq!(results.samples[0].objective_value, 0.5_f64.sqrt());

        let json = serde_json::to_value(&results.samples[0]).unwrap();
        assert_eq!(json["stop_val"], serde_json::Value::Null);
        let json = serde_json::to_value(&results.samples[1]).unwrap();
        assert_eq!(json["stop_val"], serde_json::json!(1.0));
    }

    #[test]
    fn test_bisector_on_square() {
        let config = bisector_on_square().check().unwrap();
        let results = Benchmark::new(config).run().unwrap();

        assert!(results.failures.is_empty());
        assert_eq!(results.skipped.len(), 1);
        assert_eq!(results.skipped[0].data_name, "square[dimension=2]");
        assert_eq!(results.skipped[0].solver_name, "Bisector[min0=-10,max0=10]");

        let stop_vals: Vec<f64> = results.samples.iter().map(|s| s.stop_val).collect();
        assert_eq!(&stop_vals[..4], &[0., 1., 2., 3.]);
        assert!(results
            .samples
            .iter()
            .all(|s| s.data_name == "square[dimension=1]"));
        let best = results.best_per_combination();
        assert_eq!(best.len(), 1);
        assert_abs_diff_eq!(best[0].objective_value, 0., epsilon = 1e-4);
    }

    #[test]
    fn test_failures_are_recorded() {
        let config = BenchConfig::default()
            .datasets(vec![DatasetGrid::Simulated {
                dimension: vec![2],
                seed: vec![],
            }])
            .solvers(vec![SolverGrid::BlackBox {
                method: vec!["CMA".to_string()],
                seed: vec![42],
            }])
            .check()
            .unwrap();
        let results = Benchmark::new(config).run().unwrap();
        assert!(results.samples.is_empty());
        assert_eq!(results.failures.len(), 1);
        assert_eq!(results.failures[0].solver_name, "blackbox[method=CMA,seed=42]");
    }

    #[test]
    fn test_parallel_repetitions_are_reproducible() {
        let config = BenchConfig::default()
            .datasets(vec![DatasetGrid::Fcn {
                function: vec!["rastrigin".to_string()],
                dimension: vec![2],
            }])
            .solvers(vec![SolverGrid::Sampler {
                method: vec!["RandomSearch".to_string()],
                seed: vec![1],
            }])
            .n_repetitions(3)
            .n_jobs(3)
            .max_runs(8)
            .check()
            .unwrap();
        let results = Benchmark::new(config).run().unwrap();
        assert!(results.failures.is_empty());
        assert!(!results.samples.is_empty());
        let values = |rep: usize| -> Vec<f64> {
            results
                .samples
                .iter()
                .filter(|s| s.repetition == rep)
                .map(|s| s.objective_value)
                .collect()
        };
        assert_eq!(values(0), values(1));
        assert_eq!(values(0), values(2));
    }

    #[test]
    fn test_filters() {
        let config = BenchConfig::default()
            .dataset_filter("FCN[function=ackley")
            .solver_filter("local")
            .check()
            .unwrap();
        let benchmark = Benchmark::new(config);
        let (datasets, solvers) = benchmark.selection().unwrap();
        assert_eq!(datasets.len(), 2);
        assert_eq!(solvers.len(), 3);
    }
}
