use ndarray::Array1;
use rand_xoshiro::Xoshiro256Plus;
use zobench_core::sampling::{Random, SamplingMethod};
use zobench_core::Bounds;

use super::AskTell;

/// Uniform random sampling of the design space
pub(crate) struct RandomSearch {
    doe: Random<Xoshiro256Plus>,
}

impl RandomSearch {
    pub fn new(bounds: Bounds, dim: usize, rng: Xoshiro256Plus) -> Self {
        RandomSearch {
            doe: Random::new(&bounds.xlimits(dim), rng),
        }
    }
}

impl AskTell for RandomSearch {
    fn ask(&mut self) -> Array1<f64> {
        self.doe.sample(1).row(0).to_owned()
    }

    fn tell(&mut self, _x: &Array1<f64>, _y: f64) {}
}
