use log::debug;
use zobench_core::{BenchError, Dataset, Problem, Result};

use crate::functions::TestFunction;

/// Classic bounded test functions of the optimization literature
#[derive(Clone, Debug, PartialEq)]
pub struct FcnDataset {
    function: TestFunction,
    dimension: usize,
}

impl FcnDataset {
    pub const NAME: &'static str = "FCN";

    /// Dataset for the named `function` in the given `dimension`.
    /// Fails with [`BenchError::UnsupportedFunction`] when the name is not one of the `FCN` functions.
    pub fn new(function: &str, dimension: usize) -> Result<Self> {
        Self::from_function(function.parse()?, dimension)
    }

    /// Dataset for the given `function`, which should be one of the `FCN` functions
    pub fn from_function(function: TestFunction, dimension: usize) -> Result<Self> {
        if !TestFunction::FCN.contains(&function) {
            return Err(BenchError::UnsupportedFunction(function.to_string()));
        }
        Ok(FcnDataset {
            function,
            dimension,
        })
    }

    pub fn function(&self) -> TestFunction {
        self.function
    }
}

impl Dataset for FcnDataset {
    fn name(&self) -> String {
        format!(
            "{}[function={},dimension={}]",
            Self::NAME,
            self.function,
            self.dimension
        )
    }

    fn get_data(&self) -> Result<Problem> {
        debug!("Build {} problem", self.name());
        Problem::new(
            self.function.obj_func(),
            self.dimension,
            self.function.bounds(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array1;

    #[test]
    fn test_fcn_dataset() {
        for name in ["ackley", "rosenbrock", "rastrigin", "schwefel"] {
            for dim in [2, 10] {
                let dataset = FcnDataset::new(name, dim).unwrap();
                let problem = dataset.get_data().unwrap();
                assert_eq!(problem.dimension(), dim);
                assert!(problem.bounds().is_some());
                let y = problem.eval(&Array1::zeros(dim).view()).unwrap();
                assert!(y.is_finite());
            }
        }
        let dataset = FcnDataset::new("ackley", 2).unwrap();
        assert_eq!(dataset.name(), "FCN[function=ackley,dimension=2]");
    }

    #[test]
    fn test_unsupported_function() {
        assert!(matches!(
            FcnDataset::new("griewank", 2),
            Err(BenchError::UnsupportedFunction(_))
        ));
        assert!(matches!(
            FcnDataset::new("l2_norm", 2),
            Err(BenchError::UnsupportedFunction(_))
        ));
        assert!(FcnDataset::new("ackley", 0).unwrap().get_data().is_err());
    }
}
