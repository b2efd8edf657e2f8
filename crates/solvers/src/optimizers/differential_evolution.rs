use ndarray::{Array1, Array2, Zip};
use ndarray_rand::rand::Rng;
use ndarray_stats::QuantileExt;
use rand_xoshiro::Xoshiro256Plus;
use zobench_core::sampling::{Lhs, SamplingMethod};
use zobench_core::Bounds;

use super::{child_rng, AskTell};

pub(crate) const DE_POP_SIZE: usize = 30;

/// Steady-state differential evolution with two-points crossover.
///
/// The population is first filled with a latin hypercube design. Then each
/// individual in turn is challenged by a trial point built from the
/// current-to-best mutation `x_i + F1 (x_best - x_i) + F2 (x_r1 - x_r2)`
/// and a two-points crossover with `x_i`.
pub(crate) struct TwoPointsDE {
    bounds: Bounds,
    population: Array2<f64>,
    fitness: Array1<f64>,
    f1: f64,
    f2: f64,
    count: usize,
    rng: Xoshiro256Plus,
}

impl TwoPointsDE {
    pub fn new(bounds: Bounds, dim: usize, mut rng: Xoshiro256Plus) -> Self {
        let pop_size = DE_POP_SIZE;
        let population = Lhs::new(&bounds.xlimits(dim), child_rng(&mut rng)).sample(pop_size);
        TwoPointsDE {
            bounds,
            population,
            fitness: Array1::from_elem(pop_size, f64::INFINITY),
            f1: 0.8,
            f2: 0.8,
            count: 0,
            rng,
        }
    }

    fn pop_size(&self) -> usize {
        self.population.nrows()
    }

    /// Two distinct indices different from `i`
    fn pick_two(&mut self, i: usize) -> (usize, usize) {
        let n = self.pop_size();
        let mut r1 = self.rng.gen_range(0..n);
        while r1 == i {
            r1 = self.rng.gen_range(0..n);
        }
        let mut r2 = self.rng.gen_range(0..n);
        while r2 == i || r2 == r1 {
            r2 = self.rng.gen_range(0..n);
        }
        (r1, r2)
    }

    fn trial(&mut self, i: usize) -> Array1<f64> {
        let best = self.fitness.argmin_skipnan().unwrap_or(0);
        let (r1, r2) = self.pick_two(i);
        let xi = self.population.row(i);
        let mut donor = Array1::zeros(xi.len());
        Zip::from(&mut donor)
            .and(&xi)
            .and(&self.population.row(best))
            .and(&self.population.row(r1))
            .and(&self.population.row(r2))
            .for_each(|d, &x, &b, &a1, &a2| *d = x + self.f1 * (b - x) + self.f2 * (a1 - a2));

        // donor components within [start, end] replace those of x_i
        let dim = xi.len();
        let mut start = self.rng.gen_range(0..dim);
        let mut end = self.rng.gen_range(0..dim);
        if start > end {
            std::mem::swap(&mut start, &mut end);
        }
        let mut trial = xi.to_owned();
        for k in start..=end {
            trial[k] = donor[k];
        }
        self.bounds.clip(&mut trial);
        trial
    }
}

impl AskTell for TwoPointsDE {
    fn ask(&mut self) -> Array1<f64> {
        let i = self.count % self.pop_size();
        if self.count < self.pop_size() {
            self.population.row(i).to_owned()
        } else {
            self.trial(i)
        }
    }

    fn tell(&mut self, x: &Array1<f64>, y: f64) {
        let i = self.count % self.pop_size();
        if y <= self.fitness[i] || self.count < self.pop_size() {
            self.population.row_mut(i).assign(x);
            self.fitness[i] = y;
        }
        self.count += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::super::minimize;
    use super::*;
    use ndarray::ArrayView1;
    use ndarray_rand::rand::SeedableRng;
    use zobench_core::ObjFunc;

    #[test]
    fn test_de_sphere() {
        let fun = ObjFunc::new("sphere", |x: &ArrayView1<f64>| x.dot(x));
        let bounds = Bounds::new(-5., 5.).unwrap();
        let de = TwoPointsDE::new(bounds, 2, Xoshiro256Plus::seed_from_u64(42));
        let x = minimize(&fun, "TwoPointsDE", Box::new(de), 1500).unwrap();
        assert!(fun.eval(&x.view()) < 1e-2);
    }
}
