use log::debug;
use ndarray::{array, Array1};
use zobench_core::{BenchError, Budget, ObjFunc, Problem, Result, Solver, SolverState};

/// Maximum number of halvings under a tolerance budget
const BISECTOR_MAX_ITERS: usize = 1000;

/// Bisection on the sign of a one dimensional function.
///
/// The interval `[min0, max0]` is halved at each iteration, keeping the half whose
/// bounds give function values of opposite signs (or a zero). For a non negative
/// function vanishing at its minimum, the first midpoint where `f` is zero is kept
/// as upper bound of the interval.
#[derive(Clone, Debug)]
pub struct Bisector {
    min0: f64,
    max0: f64,
    state: SolverState,
}

impl Default for Bisector {
    fn default() -> Self {
        Bisector::new(-10., 10.)
    }
}

impl Bisector {
    pub const NAME: &'static str = "Bisector";

    pub fn new(min0: f64, max0: f64) -> Self {
        Bisector {
            min0,
            max0,
            state: SolverState::default(),
        }
    }

    fn bisect(&self, f: &ObjFunc, stop: impl Fn(usize, f64) -> bool) -> f64 {
        let eval = |x: f64| f.eval(&array![x].view());
        let mut xdown = self.min0.min(self.max0);
        let mut xup = self.min0.max(self.max0);
        let mut xbar = 0.5 * (xup + xdown);
        let mut iter = 0;
        while !stop(iter, xup - xdown) {
            xbar = 0.5 * (xup + xdown);
            if eval(xdown) * eval(xbar) <= 0. {
                xup = xbar;
            } else {
                xdown = xbar;
            }
            iter += 1;
        }
        debug!("Bisection: {iter} iterations, interval [{xdown}, {xup}]");
        xbar
    }
}

impl Solver for Bisector {
    fn name(&self) -> String {
        format!("{}[min0={},max0={}]", Self::NAME, self.min0, self.max0)
    }

    fn resumable(&self) -> bool {
        false
    }

    fn skip(&self, problem: &Problem) -> Option<String> {
        if problem.dimension() > 1 {
            Some("Bisection only runs for 1D problems".to_string())
        } else {
            None
        }
    }

    fn set_objective(&mut self, problem: &Problem) -> Result<()> {
        self.state.bind(&self.name(), problem, false)
    }

    fn run(&mut self, budget: Budget) -> Result<()> {
        let problem = self.state.problem()?;
        if problem.dimension() != 1 {
            return Err(BenchError::InvalidValue(
                "Bisection only runs for 1D problems".to_string(),
            ));
        }
        let fun = problem.function().clone();
        let xopt = match budget {
            Budget::Iterations(n) => self.bisect(&fun, |iter, _| iter >= n),
            Budget::Tolerance(_) if budget.is_zero() => self.bisect(&fun, |_, _| true),
            Budget::Tolerance(tol) => self.bisect(&fun, |iter, width| {
                0.5 * width <= tol || iter >= BISECTOR_MAX_ITERS
            }),
        };
        self.state.set_xopt(Array1::from_elem(1, xopt))
    }

    fn get_result(&self) -> Result<Array1<f64>> {
        self.state.xopt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::ArrayView1;
    use zobench_core::{Bounds, Dataset, Objective, ZeroOrderObjective};
    use zobench_datasets::SquareDataset;

    #[test]
    fn test_bisector_square_1d() {
        let problem = SquareDataset::new(1).get_data().unwrap();
        let mut objective = ZeroOrderObjective::new();
        objective.set_data(problem);

        let mut solver = Bisector::new(-10., 10.);
        assert!(solver.skip(&objective.get_objective().unwrap()).is_none());
        solver.set_objective(&objective.get_objective().unwrap()).unwrap();
        solver.run(Budget::Iterations(20)).unwrap();
        let x = solver.get_result().unwrap();
        assert_eq!(x.len(), 1);
        assert_abs_diff_eq!(x[0], 0., epsilon = 1e-4);
        assert!(objective.compute(&x.view()).unwrap() < 1e-4);
    }

    #[test]
    fn test_bisector_skips_2d() {
        let problem = SquareDataset::new(2).get_data().unwrap();
        let solver = Bisector::default();
        let reason = solver.skip(&problem).unwrap();
        assert!(!reason.is_empty());
    }

    #[test]
    fn test_bisector_root() {
        let fun = ObjFunc::new("shifted", |x: &ArrayView1<f64>| x[0] - 3.);
        let problem = Problem::new(fun, 1, Some(Bounds::new(-10., 10.).unwrap())).unwrap();
        let mut solver = Bisector::default();
        assert!(matches!(solver.get_result(), Err(BenchError::NoResultYet)));
        solver.set_objective(&problem).unwrap();

        solver.run(Budget::Iterations(0)).unwrap();
        assert_eq!(solver.get_result().unwrap(), array![0.]);

        solver.run(Budget::Tolerance(1e-6)).unwrap();
        assert_abs_diff_eq!(solver.get_result().unwrap()[0], 3., epsilon = 1e-5);
    }
}
