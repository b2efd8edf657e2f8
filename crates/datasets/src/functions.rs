//! Closed set of test functions.
//!
//! All functions have their global minimum `f(x*) = 0`, at `x* = 0` except
//! for Rosenbrock whose minimum is at `x* = 1`.
use std::f64::consts::{E, PI};
use std::fmt;
use std::str::FromStr;

use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};
use zobench_core::{BenchError, Bounds, ObjFunc};

/// Ackley function: `-20 exp(-0.2 sqrt(mean(x^2))) - exp(mean(cos(2 pi x))) + 20 + e`
pub fn ackley(x: &ArrayView1<f64>) -> f64 {
    let n = x.len() as f64;
    let sum_sq = x.fold(0., |acc, &xi| acc + xi * xi);
    let sum_cos = x.fold(0., |acc, &xi| acc + (2. * PI * xi).cos());
    -20. * (-0.2 * (sum_sq / n).sqrt()).exp() - (sum_cos / n).exp() + 20. + E
}

/// Rastrigin function: `10 n + sum(x^2 - 10 cos(2 pi x))`
pub fn rastrigin(x: &ArrayView1<f64>) -> f64 {
    10. * x.len() as f64
        + x.fold(0., |acc, &xi| acc + xi * xi - 10. * (2. * PI * xi).cos())
}

/// Rosenbrock function: `sum(100 (x_{i+1} - x_i^2)^2 + (1 - x_i)^2)`, minimum at `x = 1`
pub fn rosenbrock(x: &ArrayView1<f64>) -> f64 {
    x.windows(2).into_iter().fold(0., |acc, w| {
        acc + 100. * (w[1] - w[0] * w[0]).powi(2) + (1. - w[0]).powi(2)
    })
}

/// Schwefel 2.20 function: `sum(|x|)`
pub fn schwefel(x: &ArrayView1<f64>) -> f64 {
    x.fold(0., |acc, &xi| acc + xi.abs())
}

/// Squared euclidean norm `||x||^2`
pub fn norm_squared(x: &ArrayView1<f64>) -> f64 {
    x.dot(x)
}

/// Euclidean norm `||x||`
pub fn l2_norm(x: &ArrayView1<f64>) -> f64 {
    norm_squared(x).sqrt()
}

/// Named test functions
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TestFunction {
    #[serde(rename = "ackley")]
    Ackley,
    #[serde(rename = "rastrigin")]
    Rastrigin,
    #[serde(rename = "rosenbrock")]
    Rosenbrock,
    #[serde(rename = "schwefel", alias = "schwefel220")]
    Schwefel,
    #[serde(rename = "norm_squared")]
    NormSquared,
    #[serde(rename = "l2_norm")]
    L2Norm,
}

impl TestFunction {
    /// Functions of the `FCN` dataset
    pub const FCN: [TestFunction; 4] = [
        TestFunction::Ackley,
        TestFunction::Rosenbrock,
        TestFunction::Rastrigin,
        TestFunction::Schwefel,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            TestFunction::Ackley => "ackley",
            TestFunction::Rastrigin => "rastrigin",
            TestFunction::Rosenbrock => "rosenbrock",
            TestFunction::Schwefel => "schwefel",
            TestFunction::NormSquared => "norm_squared",
            TestFunction::L2Norm => "l2_norm",
        }
    }

    /// Usual search domain, `None` for the unbounded synthetic functions
    pub fn bounds(&self) -> Option<Bounds> {
        let (lower, upper) = match self {
            TestFunction::Ackley => (-32., 32.),
            TestFunction::Rastrigin => (-5.12, 5.12),
            TestFunction::Rosenbrock => (-30., 30.),
            TestFunction::Schwefel => (-100., 100.),
            TestFunction::NormSquared | TestFunction::L2Norm => return None,
        };
        Some(Bounds { lower, upper })
    }

    pub fn eval(&self, x: &ArrayView1<f64>) -> f64 {
        match self {
            TestFunction::Ackley => ackley(x),
            TestFunction::Rastrigin => rastrigin(x),
            TestFunction::Rosenbrock => rosenbrock(x),
            TestFunction::Schwefel => schwefel(x),
            TestFunction::NormSquared => norm_squared(x),
            TestFunction::L2Norm => l2_norm(x),
        }
    }

    pub fn obj_func(&self) -> ObjFunc {
        let fun = *self;
        ObjFunc::new(self.name(), move |x: &ArrayView1<f64>| fun.eval(x))
    }
}

impl fmt::Display for TestFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for TestFunction {
    type Err = BenchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ackley" => Ok(TestFunction::Ackley),
            "rastrigin" => Ok(TestFunction::Rastrigin),
            "rosenbrock" => Ok(TestFunction::Rosenbrock),
            "schwefel" | "schwefel220" => Ok(TestFunction::Schwefel),
            "norm_squared" => Ok(TestFunction::NormSquared),
            "l2_norm" => Ok(TestFunction::L2Norm),
            _ => Err(BenchError::UnsupportedFunction(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::{array, Array1};

    #[test]
    fn test_minimum_at_origin() {
        for fun in [
            TestFunction::Ackley,
            TestFunction::Rastrigin,
            TestFunction::Schwefel,
            TestFunction::NormSquared,
            TestFunction::L2Norm,
        ] {
            for dim in [1, 2, 10] {
                assert_abs_diff_eq!(fun.eval(&Array1::zeros(dim).view()), 0., epsilon = 1e-12);
            }
        }
        assert_abs_diff_eq!(rosenbrock(&Array1::ones(10).view()), 0.);
        assert_abs_diff_eq!(rosenbrock(&Array1::zeros(2).view()), 1.);
    }

    #[test]
    fn test_against_argmin_testfunctions() {
        let x = array![0.3, -1.2, 2.5];
        assert_abs_diff_eq!(
            ackley(&x.view()),
            argmin_testfunctions::ackley(&x.to_vec()),
            epsilon = 1e-12
        );
        assert_abs_diff_eq!(
            rastrigin(&x.view()),
            argmin_testfunctions::rastrigin(&x.to_vec()),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_values() {
        assert_abs_diff_eq!(schwefel(&array![-1., 2., -3.].view()), 6.);
        assert_abs_diff_eq!(l2_norm(&array![3., 4.].view()), 5.);
        assert_abs_diff_eq!(rosenbrock(&array![1., 2.].view()), 100.);
    }

    #[test]
    fn test_from_str() {
        assert_eq!("ackley".parse::<TestFunction>().unwrap(), TestFunction::Ackley);
        assert_eq!("Rastrigin".parse::<TestFunction>().unwrap(), TestFunction::Rastrigin);
        assert_eq!("schwefel220".parse::<TestFunction>().unwrap(), TestFunction::Schwefel);
        assert!(matches!(
            "griewank".parse::<TestFunction>(),
            Err(BenchError::UnsupportedFunction(name)) if name == "griewank"
        ));
    }

    #[test]
    fn test_serde_names() {
        for fun in [
            TestFunction::Ackley,
            TestFunction::Rastrigin,
            TestFunction::Rosenbrock,
            TestFunction::Schwefel,
            TestFunction::NormSquared,
            TestFunction::L2Norm,
        ] {
            let json = serde_json::to_string(&fun).unwrap();
            assert_eq!(json, format!("\"{}\"", fun.name()));
            assert_eq!(serde_json::from_str::<TestFunction>(&json).unwrap(), fun);
        }
        assert_eq!(
            serde_json::from_str::<TestFunction>("\"schwefel220\"").unwrap(),
            TestFunction::Schwefel
        );
    }

    #[test]
    fn test_bounds() {
        assert_eq!(TestFunction::Ackley.bounds().unwrap().upper, 32.);
        assert_eq!(TestFunction::Rastrigin.bounds().unwrap().lower, -5.12);
        assert!(TestFunction::L2Norm.bounds().is_none());
    }
}
