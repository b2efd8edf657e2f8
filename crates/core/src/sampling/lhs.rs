use std::sync::{Arc, RwLock};

use ndarray::{s, Array, Array2, ArrayBase, Data, Ix2, ShapeBuilder};
use ndarray_rand::{
    rand::{seq::SliceRandom, Rng},
    rand_distr::Uniform,
    RandomExt,
};

use super::SamplingMethod;

/// The LHS design is built as follows: each dimension space is divided into ns sections
/// where ns is the number of sampling points, and one point is drawn uniformly in each section.
#[derive(Clone, Debug)]
pub struct Lhs<R: Rng> {
    /// Sampling space definition as a (nx, 2) matrix
    xlimits: Array2<f64>,
    /// Random generator used for reproducibility
    rng: Arc<RwLock<R>>,
}

impl<R: Rng> Lhs<R> {
    /// Constructor with given design space and random generator.
    ///
    /// **Panics** if xlimits number of columns is different from 2.
    pub fn new(xlimits: &ArrayBase<impl Data<Elem = f64>, Ix2>, rng: R) -> Self {
        if xlimits.ncols() != 2 {
            panic!("xlimits must have 2 columns (lower, upper)");
        }
        Lhs {
            xlimits: xlimits.to_owned(),
            rng: Arc::new(RwLock::new(rng)),
        }
    }

    fn classic_lhs(&self, ns: usize) -> Array2<f64> {
        let nx = self.xlimits.nrows();
        let cut = Array::linspace(0., 1., ns + 1);

        let mut rng = self.rng.write().unwrap_or_else(|e| e.into_inner());
        let rnd = Array::random_using((ns, nx).f(), Uniform::new(0., 1.), &mut *rng);
        let a = cut.slice(s![..ns]).to_owned();
        let c = &cut.slice(s![1..(ns + 1)]) - &a;
        let mut lhs = Array::zeros((ns, nx).f());
        for j in 0..nx {
            let mut col = rnd.column(j).to_owned() * &c + &a;
            if let Some(values) = col.as_slice_mut() {
                values.shuffle(&mut *rng);
            }
            lhs.column_mut(j).assign(&col);
        }
        lhs
    }
}

impl<R: Rng> SamplingMethod for Lhs<R> {
    fn sampling_space(&self) -> &Array2<f64> {
        &self.xlimits
    }

    fn normalized_sample(&self, ns: usize) -> Array2<f64> {
        self.classic_lhs(ns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr2;
    use ndarray_rand::rand::SeedableRng;
    use rand_xoshiro::Xoshiro256Plus;

    #[test]
    fn test_lhs_one_point_per_section() {
        let xlimits = arr2(&[[5., 10.], [0., 1.]]);
        let ns = 10;
        let doe = Lhs::new(&xlimits, Xoshiro256Plus::seed_from_u64(42)).normalized_sample(ns);
        for col in doe.columns() {
            let mut sections: Vec<usize> =
                col.iter().map(|v| (v * ns as f64).floor() as usize).collect();
            sections.sort();
            assert_eq!(sections, (0..ns).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_lhs_in_bounds() {
        let xlimits = arr2(&[[5., 10.], [0., 1.]]);
        let doe = Lhs::new(&xlimits, Xoshiro256Plus::seed_from_u64(0)).sample(4);
        assert_eq!(doe.shape(), &[4, 2]);
        assert!(doe.column(0).iter().all(|v| (5. ..=10.).contains(v)));
        assert!(doe.column(1).iter().all(|v| (0. ..=1.).contains(v)));
    }
}
