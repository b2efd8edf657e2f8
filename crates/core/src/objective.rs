use ndarray::{Array1, ArrayView1};

use crate::errors::{BenchError, Result};
use crate::problem::Problem;
use crate::traits::Objective;

/// Objective of the zero-order benchmark: the value of the dataset test function
#[derive(Clone, Debug, Default)]
pub struct ZeroOrderObjective {
    problem: Option<Problem>,
}

impl ZeroOrderObjective {
    pub const NAME: &'static str = "Zero-order test functions";

    pub fn new() -> Self {
        ZeroOrderObjective::default()
    }

    fn problem(&self) -> Result<&Problem> {
        self.problem
            .as_ref()
            .ok_or_else(|| BenchError::NotConfigured("objective has no data".to_string()))
    }
}

impl Objective for ZeroOrderObjective {
    fn name(&self) -> String {
        Self::NAME.to_string()
    }

    fn set_data(&mut self, problem: Problem) {
        self.problem = Some(problem);
    }

    fn compute(&self, x: &ArrayView1<f64>) -> Result<f64> {
        self.problem()?.eval(x)
    }

    fn get_one_solution(&self) -> Result<Array1<f64>> {
        Ok(Array1::zeros(self.problem()?.dimension()))
    }

    fn get_objective(&self) -> Result<Problem> {
        self.problem().cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::{Bounds, ObjFunc};
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    fn sphere(dim: usize) -> Problem {
        let fun = ObjFunc::new("sphere", |x: &ArrayView1<f64>| x.dot(x));
        Problem::new(fun, dim, Some(Bounds::new(-1., 1.).unwrap())).unwrap()
    }

    #[test]
    fn test_objective_contract() {
        let mut objective = ZeroOrderObjective::new();
        assert!(matches!(
            objective.compute(&array![0.].view()),
            Err(BenchError::NotConfigured(_))
        ));
        objective.set_data(sphere(3));

        let x0 = objective.get_one_solution().unwrap();
        assert_eq!(x0, Array1::<f64>::zeros(3));
        assert_abs_diff_eq!(objective.compute(&x0.view()).unwrap(), 0.);
        assert_abs_diff_eq!(objective.compute(&array![1., 2., 0.].view()).unwrap(), 5.);

        let problem = objective.get_objective().unwrap();
        assert_eq!(problem.dimension(), 3);
        assert_eq!(problem.bounds(), Some(Bounds::new(-1., 1.).unwrap()));
    }

    #[test]
    fn test_dimension_mismatch() {
        let mut objective = ZeroOrderObjective::new();
        objective.set_data(sphere(2));
        assert!(matches!(
            objective.compute(&array![1., 2., 3.].view()),
            Err(BenchError::DimensionMismatch {
                expected: 2,
                found: 3
            })
        ));
    }
}
