use serde::{Deserialize, Serialize};
use zobench_core::{Solver, Strategy};

use crate::blackbox::SEED_DEFAULT;
use crate::optimizers::BH_STEPSIZE;
use crate::{
    BasinHoppingSolver, Bisector, BlackBoxMethod, BlackBoxSolver, LocalMethod, LocalSolver,
    SamplerMethod, SamplerSolver,
};

fn default_seed() -> u64 {
    SEED_DEFAULT
}

fn default_stepsize() -> f64 {
    BH_STEPSIZE
}

fn default_strategy() -> Strategy {
    Strategy::Iteration
}

/// Resolved solver setup, from which a fresh solver is built for each benchmark run
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name")]
pub enum SolverKind {
    Bisector {
        min0: f64,
        max0: f64,
    },
    #[serde(rename = "local")]
    Local {
        method: LocalMethod,
        #[serde(default = "default_strategy")]
        strategy: Strategy,
    },
    #[serde(rename = "basinhopping")]
    BasinHopping {
        temperature: f64,
        #[serde(default = "default_seed")]
        seed: u64,
        #[serde(default = "default_stepsize")]
        stepsize: f64,
    },
    #[serde(rename = "blackbox")]
    BlackBox {
        method: BlackBoxMethod,
        #[serde(default = "default_seed")]
        seed: u64,
    },
    #[serde(rename = "sampler")]
    Sampler {
        method: SamplerMethod,
        #[serde(default = "default_seed")]
        seed: u64,
    },
}

impl SolverKind {
    pub fn build(&self) -> Box<dyn Solver> {
        match *self {
            SolverKind::Bisector { min0, max0 } => Box::new(Bisector::new(min0, max0)),
            SolverKind::Local { method, strategy } => {
                Box::new(LocalSolver::new(method).strategy(strategy))
            }
            SolverKind::BasinHopping {
                temperature,
                seed,
                stepsize,
            } => Box::new(
                BasinHoppingSolver::new(temperature)
                    .seed(seed)
                    .stepsize(stepsize),
            ),
            SolverKind::BlackBox { method, seed } => {
                Box::new(BlackBoxSolver::new(method).seed(seed))
            }
            SolverKind::Sampler { method, seed } => {
                Box::new(SamplerSolver::new(method).seed(seed))
            }
        }
    }

    /// Every solver variant with its default parameters
    pub fn variants() -> Vec<SolverKind> {
        let mut kinds = vec![SolverKind::Bisector {
            min0: -10.,
            max0: 10.,
        }];
        kinds.extend(LocalMethod::ALL.into_iter().map(|method| SolverKind::Local {
            method,
            strategy: Strategy::Iteration,
        }));
        kinds.extend([1., 10.].into_iter().map(|temperature| SolverKind::BasinHopping {
            temperature,
            seed: SEED_DEFAULT,
            stepsize: BH_STEPSIZE,
        }));
        kinds.extend(BlackBoxMethod::ALL.into_iter().map(|method| SolverKind::BlackBox {
            method,
            seed: SEED_DEFAULT,
        }));
        kinds.extend(SamplerMethod::ALL.into_iter().map(|method| SolverKind::Sampler {
            method,
            seed: SEED_DEFAULT,
        }));
        kinds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use approx::assert_abs_diff_eq;
    use ndarray::ArrayView1;
    use zobench_core::{Budget, Dataset, ObjFunc, Problem};
    use zobench_datasets::{FcnDataset, SquareDataset, TestFunction};

    /// Problem on `function` counting the function evaluations
    fn counting_problem(function: TestFunction, dim: usize) -> (Problem, Arc<AtomicUsize>) {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = count.clone();
        let fun = ObjFunc::new(function.name(), move |x: &ArrayView1<f64>| {
            counter.fetch_add(1, Ordering::SeqCst);
            function.eval(x)
        });
        (Problem::new(fun, dim, function.bounds()).unwrap(), count)
    }

    fn fcn_problem(function: TestFunction, dim: usize) -> Problem {
        FcnDataset::from_function(function, dim)
            .unwrap()
            .get_data()
            .unwrap()
    }

    #[test]
    fn test_solver_kind_json() {
        let kind: SolverKind =
            serde_json::from_str(r#"{"name": "blackbox", "method": "TwoPointsDE"}"#).unwrap();
        assert_eq!(
            kind,
            SolverKind::BlackBox {
                method: BlackBoxMethod::TwoPointsDE,
                seed: 42
            }
        );
        let kind: SolverKind =
            serde_json::from_str(r#"{"name": "local", "method": "Nelder-Mead"}"#).unwrap();
        assert_eq!(kind.build().name(), "local[method=Nelder-Mead]");
        assert!(serde_json::from_str::<SolverKind>(r#"{"name": "local", "method": "Powell"}"#)
            .is_err());
    }

    #[test]
    fn test_zero_budget_does_not_evaluate() {
        for kind in SolverKind::variants() {
            let mut solver = kind.build();
            let dim = if matches!(kind, SolverKind::Bisector { .. }) { 1 } else { 3 };
            let (problem, count) = counting_problem(TestFunction::Rastrigin, dim);
            solver.set_objective(&problem).unwrap();
            let budget = solver.stopping_criterion().initial_budget();
            solver.run(budget).unwrap();
            let x = solver.get_result().unwrap();
            assert_eq!(x.len(), dim, "{}", solver.name());
            assert_eq!(count.load(Ordering::SeqCst), 0, "{}", solver.name());
        }
    }

    #[test]
    fn test_same_seed_same_result() {
        for kind in SolverKind::variants() {
            let dim = if matches!(kind, SolverKind::Bisector { .. }) { 1 } else { 2 };
            let results: Vec<_> = (0..2)
                .map(|_| {
                    let mut solver = kind.build();
                    let problem = fcn_problem(TestFunction::Ackley, dim);
                    solver.set_objective(&problem).unwrap();
                    solver.run(Budget::Iterations(13)).unwrap();
                    solver.get_result().unwrap()
                })
                .collect();
            assert_eq!(results[0], results[1], "{:?}", kind);
        }
    }

    #[test]
    fn test_resumable_solvers_are_monotonic() {
        for kind in SolverKind::variants() {
            let mut solver = kind.build();
            if !solver.resumable() {
                continue;
            }
            let problem = fcn_problem(TestFunction::Rosenbrock, 2);
            solver.set_objective(&problem).unwrap();
            let criterion = solver.stopping_criterion();
            let mut budget = criterion.initial_budget();
            let mut prev = f64::INFINITY;
            for _ in 0..8 {
                solver.run(budget).unwrap();
                let y = problem.eval(&solver.get_result().unwrap().view()).unwrap();
                assert!(y <= prev + 1e-12, "{} got worse with {budget}", solver.name());
                prev = y;
                budget = criterion.next_budget(&budget);
            }
        }
    }

    #[test]
    fn test_bisector_end_to_end() {
        let kind = SolverKind::Bisector {
            min0: -10.,
            max0: 10.,
        };
        let mut solver = kind.build();
        let problem = SquareDataset::new(1).get_data().unwrap();
        assert!(solver.skip(&problem).is_none());
        solver.set_objective(&problem).unwrap();
        solver.run(Budget::Iterations(20)).unwrap();
        assert_abs_diff_eq!(solver.get_result().unwrap()[0], 0., epsilon = 1e-4);

        let problem = SquareDataset::new(2).get_data().unwrap();
        assert!(solver.skip(&problem).is_some());
    }
}
