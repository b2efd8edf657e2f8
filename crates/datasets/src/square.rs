use zobench_core::{Dataset, Problem, Result};

use crate::functions::TestFunction;

/// Unbounded euclidean norm `||x||`
#[derive(Clone, Debug, PartialEq)]
pub struct SquareDataset {
    dimension: usize,
}

impl SquareDataset {
    pub const NAME: &'static str = "square";

    pub fn new(dimension: usize) -> Self {
        SquareDataset { dimension }
    }
}

impl Dataset for SquareDataset {
    fn name(&self) -> String {
        format!("{}[dimension={}]", Self::NAME, self.dimension)
    }

    fn get_data(&self) -> Result<Problem> {
        Problem::new(TestFunction::L2Norm.obj_func(), self.dimension, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn test_square() {
        let problem = SquareDataset::new(2).get_data().unwrap();
        assert!(problem.bounds().is_none());
        assert_abs_diff_eq!(problem.eval(&array![3., -4.].view()).unwrap(), 5.);
    }
}
