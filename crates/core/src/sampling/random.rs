use std::sync::{Arc, RwLock};

use ndarray::{Array, Array2, ArrayBase, Data, Ix2};
use ndarray_rand::{rand::Rng, rand_distr::Uniform, RandomExt};

use super::SamplingMethod;

/// The Random design consists in drawing samples uniformly in the sample space.
#[derive(Clone, Debug)]
pub struct Random<R: Rng> {
    /// Sampling space definition as a (nx, 2) matrix
    xlimits: Array2<f64>,
    /// Random generator used for reproducibility
    rng: Arc<RwLock<R>>,
}

impl<R: Rng> Random<R> {
    /// Constructor given a design space as a (nx, 2) matrix \[\[lower bound, upper bound\], ...\]
    /// and a random generator for reproducibility
    ///
    /// **Panics** if xlimits number of columns is different from 2.
    pub fn new(xlimits: &ArrayBase<impl Data<Elem = f64>, Ix2>, rng: R) -> Self {
        if xlimits.ncols() != 2 {
            panic!("xlimits must have 2 columns (lower, upper)");
        }
        Random {
            xlimits: xlimits.to_owned(),
            rng: Arc::new(RwLock::new(rng)),
        }
    }
}

impl<R: Rng> SamplingMethod for Random<R> {
    fn sampling_space(&self) -> &Array2<f64> {
        &self.xlimits
    }

    fn normalized_sample(&self, ns: usize) -> Array2<f64> {
        let mut rng = self.rng.write().unwrap_or_else(|e| e.into_inner());
        let nx = self.xlimits.nrows();
        Array::random_using((ns, nx), Uniform::new(0., 1.), &mut *rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr2;
    use ndarray_rand::rand::SeedableRng;
    use rand_xoshiro::Xoshiro256Plus;

    #[test]
    fn test_random_reproducible() {
        let xlimits = arr2(&[[5., 10.], [0., 1.]]);
        let a = Random::new(&xlimits, Xoshiro256Plus::seed_from_u64(42)).sample(9);
        let b = Random::new(&xlimits, Xoshiro256Plus::seed_from_u64(42)).sample(9);
        assert_eq!(a, b);
        assert!(a.column(0).iter().all(|&v| (5. ..=10.).contains(&v)));
        assert!(a.column(1).iter().all(|&v| (0. ..=1.).contains(&v)));
    }
}
