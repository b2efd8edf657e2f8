use ndarray::{Array1, Array2};
use rand_xoshiro::Xoshiro256Plus;
use zobench_core::sampling::{Hammersley, SamplingMethod};
use zobench_core::Bounds;

use super::AskTell;

/// Evaluate the points of a scrambled Hammersley design sized to the whole budget
pub(crate) struct HammersleySearch {
    doe: Array2<f64>,
    next: usize,
}

impl HammersleySearch {
    pub fn new(bounds: Bounds, dim: usize, budget: usize, mut rng: Xoshiro256Plus) -> Self {
        let doe = Hammersley::new(&bounds.xlimits(dim), true, &mut rng).sample(budget.max(1));
        HammersleySearch { doe, next: 0 }
    }
}

impl AskTell for HammersleySearch {
    fn ask(&mut self) -> Array1<f64> {
        // wrap around if asked more than the planned budget
        let x = self.doe.row(self.next % self.doe.nrows()).to_owned();
        self.next += 1;
        x
    }

    fn tell(&mut self, _x: &Array1<f64>, _y: f64) {}
}
