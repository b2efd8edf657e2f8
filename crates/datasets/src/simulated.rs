use ndarray::{Array, Array1, ArrayView1};
use ndarray_rand::{rand::SeedableRng, rand_distr::Uniform, RandomExt};
use rand_xoshiro::Xoshiro256Plus;
use zobench_core::{Dataset, ObjFunc, Problem, Result};

/// Unbounded squared norm `||x - c||^2`.
///
/// The center `c` is the origin, or is drawn uniformly in `[-1, 1]^n` when a seed is given.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulatedDataset {
    dimension: usize,
    seed: Option<u64>,
}

impl SimulatedDataset {
    pub const NAME: &'static str = "simulated";

    pub fn new(dimension: usize) -> Self {
        SimulatedDataset {
            dimension,
            seed: None,
        }
    }

    pub fn seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Location of the minimum
    pub fn center(&self) -> Array1<f64> {
        match self.seed {
            Some(seed) => {
                let mut rng = Xoshiro256Plus::seed_from_u64(seed);
                Array::random_using(self.dimension, Uniform::new(-1., 1.), &mut rng)
            }
            None => Array1::zeros(self.dimension),
        }
    }
}

impl Dataset for SimulatedDataset {
    fn name(&self) -> String {
        match self.seed {
            Some(seed) => format!("{}[dimension={},seed={seed}]", Self::NAME, self.dimension),
            None => format!("{}[dimension={}]", Self::NAME, self.dimension),
        }
    }

    fn get_data(&self) -> Result<Problem> {
        let center = self.center();
        let fun = ObjFunc::new("norm_squared", move |x: &ArrayView1<f64>| {
            let d = x - &center;
            d.dot(&d)
        });
        Problem::new(fun, self.dimension, None)
    }
}
