use std::fmt;
use std::sync::Arc;

use ndarray::{Array1, Array2, ArrayView1};
use serde::{Deserialize, Serialize};

use crate::errors::{BenchError, Result};

/// A thread-safe objective function `f: R^n -> R`
pub type ObjFn = dyn Fn(&ArrayView1<f64>) -> f64 + Send + Sync;

/// A named objective function, cheap to clone and shareable between threads
#[derive(Clone)]
pub struct ObjFunc {
    name: String,
    fun: Arc<ObjFn>,
}

impl ObjFunc {
    /// Wrap `fun` under the given `name`
    pub fn new<F>(name: &str, fun: F) -> Self
    where
        F: Fn(&ArrayView1<f64>) -> f64 + Send + Sync + 'static,
    {
        ObjFunc {
            name: name.to_string(),
            fun: Arc::new(fun),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Evaluate the function at `x`
    pub fn eval(&self, x: &ArrayView1<f64>) -> f64 {
        (self.fun)(x)
    }

    /// Evaluate the function at a point given as a slice
    pub fn eval_slice(&self, x: &[f64]) -> f64 {
        (self.fun)(&ArrayView1::from(x))
    }
}

impl fmt::Debug for ObjFunc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjFunc").field("name", &self.name).finish()
    }
}

/// Scalar box `[lower, upper]^n` applied to every component of `x`
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub lower: f64,
    pub upper: f64,
}

impl Bounds {
    /// Bounds constructor, fails if `lower >= upper` or if a bound is not finite
    pub fn new(lower: f64, upper: f64) -> Result<Self> {
        if !lower.is_finite() || !upper.is_finite() || lower >= upper {
            return Err(BenchError::InvalidValue(format!(
                "Bad bounds [{lower}, {upper}]"
            )));
        }
        Ok(Bounds { lower, upper })
    }

    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }

    pub fn center(&self) -> f64 {
        0.5 * (self.lower + self.upper)
    }

    /// Design space as a (dim, 2) matrix, the ith row is [lower, upper] of the ith component
    pub fn xlimits(&self, dim: usize) -> Array2<f64> {
        let mut xlimits = Array2::zeros((dim, 2));
        xlimits.column_mut(0).fill(self.lower);
        xlimits.column_mut(1).fill(self.upper);
        xlimits
    }

    /// Project `x` into the box
    pub fn clip(&self, x: &mut Array1<f64>) {
        x.mapv_inplace(|v| v.clamp(self.lower, self.upper));
    }

    pub fn contains(&self, x: &ArrayView1<f64>) -> bool {
        x.iter().all(|&v| v >= self.lower && v <= self.upper)
    }
}

/// A problem instance: the function to minimize, its input dimension and optional bounds
#[derive(Clone, Debug)]
pub struct Problem {
    function: ObjFunc,
    dimension: usize,
    bounds: Option<Bounds>,
}

impl Problem {
    /// Problem constructor, fails when `dimension` is zero
    pub fn new(function: ObjFunc, dimension: usize, bounds: Option<Bounds>) -> Result<Self> {
        if dimension == 0 {
            return Err(BenchError::InvalidValue(
                "Problem dimension should be > 0".to_string(),
            ));
        }
        Ok(Problem {
            function,
            dimension,
            bounds,
        })
    }

    pub fn function(&self) -> &ObjFunc {
        &self.function
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn bounds(&self) -> Option<Bounds> {
        self.bounds
    }

    /// Evaluate the function at `x`, checking its length against the problem dimension
    pub fn eval(&self, x: &ArrayView1<f64>) -> Result<f64> {
        if x.len() != self.dimension {
            return Err(BenchError::DimensionMismatch {
                expected: self.dimension,
                found: x.len(),
            });
        }
        Ok(self.function.eval(x))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_bounds() {
        let bounds = Bounds::new(-5.12, 5.12).unwrap();
        assert_eq!(bounds.xlimits(3), array![[-5.12, 5.12], [-5.12, 5.12], [-5.12, 5.12]]);
        assert_eq!(bounds.center(), 0.);
        let mut x = array![-10., 1., 6.];
        bounds.clip(&mut x);
        assert_eq!(x, array![-5.12, 1., 5.12]);
        assert!(bounds.contains(&x.view()));
        assert!(Bounds::new(1., 1.).is_err());
        assert!(Bounds::new(f64::NEG_INFINITY, 1.).is_err());
    }

    #[test]
    fn test_problem_eval() {
        let fun = ObjFunc::new("sum", |x: &ArrayView1<f64>| x.sum());
        let problem = Problem::new(fun, 2, None).unwrap();
        assert_eq!(problem.eval(&array![1., 2.].view()).unwrap(), 3.);
        assert!(matches!(
            problem.eval(&array![1., 2., 3.].view()),
            Err(BenchError::DimensionMismatch {
                expected: 2,
                found: 3
            })
        ));
        assert!(Problem::new(problem.function().clone(), 0, None).is_err());
    }
}
