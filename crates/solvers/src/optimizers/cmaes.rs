use ndarray::{Array, Array1, Zip};
use ndarray_rand::rand_distr::StandardNormal;
use ndarray_rand::RandomExt;
use rand_xoshiro::Xoshiro256Plus;
use zobench_core::Bounds;

use super::AskTell;

/// Separable CMA-ES: covariance matrix adaptation evolution strategy
/// restricted to a diagonal covariance matrix.
///
/// Candidates are repaired (clipped) into the bounds and the repaired
/// steps are used for the distribution update.
pub(crate) struct SepCmaEs {
    bounds: Bounds,
    dim: usize,
    lambda: usize,
    weights: Array1<f64>,
    mu_eff: f64,
    c_sigma: f64,
    d_sigma: f64,
    c_c: f64,
    c_1: f64,
    c_mu: f64,
    chi_n: f64,
    mean: Array1<f64>,
    sigma: f64,
    diag_c: Array1<f64>,
    p_sigma: Array1<f64>,
    p_c: Array1<f64>,
    generation: usize,
    /// Candidates of the current generation not asked yet
    pending: Vec<Array1<f64>>,
    /// Evaluated candidates of the current generation
    evaluated: Vec<(Array1<f64>, f64)>,
    rng: Xoshiro256Plus,
}

impl SepCmaEs {
    pub fn new(bounds: Bounds, mean: Array1<f64>, sigma: f64, rng: Xoshiro256Plus) -> Self {
        let dim = mean.len();
        let n = dim as f64;
        let lambda = 4 + (3. * n.ln()).floor() as usize;
        let mu = lambda / 2;
        let raw = Array::from_iter(
            (0..mu).map(|i| ((lambda as f64 + 1.) / 2.).ln() - ((i + 1) as f64).ln()),
        );
        let weights = &raw / raw.sum();
        let mu_eff = 1. / weights.dot(&weights);

        let c_sigma = (mu_eff + 2.) / (n + mu_eff + 5.);
        let d_sigma = 1. + 2. * (((mu_eff - 1.) / (n + 1.)).sqrt() - 1.).max(0.) + c_sigma;
        let c_c = (4. + mu_eff / n) / (n + 4. + 2. * mu_eff / n);
        let c_1 = 2. / ((n + 1.3).powi(2) + mu_eff);
        let c_mu = (2. * (mu_eff - 2. + 1. / mu_eff) / ((n + 2.).powi(2) + mu_eff)).min(1. - c_1);
        // diagonal model learns faster
        let sep_factor = (n + 2.) / 3.;
        let c_1 = (c_1 * sep_factor).min(1.);
        let c_mu = (c_mu * sep_factor).min(1. - c_1);
        let chi_n = n.sqrt() * (1. - 1. / (4. * n) + 1. / (21. * n * n));

        SepCmaEs {
            bounds,
            dim,
            lambda,
            weights,
            mu_eff,
            c_sigma,
            d_sigma,
            c_c,
            c_1,
            c_mu,
            chi_n,
            mean,
            sigma,
            diag_c: Array1::ones(dim),
            p_sigma: Array1::zeros(dim),
            p_c: Array1::zeros(dim),
            generation: 0,
            pending: vec![],
            evaluated: vec![],
            rng,
        }
    }

    fn sample_generation(&mut self) {
        let std = self.diag_c.mapv(f64::sqrt);
        self.pending = (0..self.lambda)
            .map(|_| {
                let z: Array1<f64> = Array::random_using(self.dim, StandardNormal, &mut self.rng);
                let mut x = &self.mean + &(self.sigma * &std * &z);
                self.bounds.clip(&mut x);
                x
            })
            .collect();
        // candidates are asked in sampling order
        self.pending.reverse();
    }

    fn update(&mut self) {
        let mut evaluated = std::mem::take(&mut self.evaluated);
        evaluated.sort_by(|a, b| a.1.total_cmp(&b.1));

        let steps: Vec<Array1<f64>> = evaluated
            .iter()
            .map(|(x, _)| (x - &self.mean) / self.sigma)
            .collect();
        let mut y_w = Array1::<f64>::zeros(self.dim);
        for (w, y) in self.weights.iter().zip(&steps) {
            y_w.scaled_add(*w, y);
        }
        self.mean.scaled_add(self.sigma, &y_w);

        let inv_std = self.diag_c.mapv(|c| 1. / c.sqrt());
        let cs = (self.c_sigma * (2. - self.c_sigma) * self.mu_eff).sqrt();
        self.p_sigma = (1. - self.c_sigma) * &self.p_sigma + cs * &(&inv_std * &y_w);
        let ps_norm = self.p_sigma.dot(&self.p_sigma).sqrt();

        let g = (self.generation + 1) as i32;
        let h_sigma = ps_norm / (1. - (1. - self.c_sigma).powi(2 * g)).sqrt()
            < (1.4 + 2. / (self.dim as f64 + 1.)) * self.chi_n;
        let h_sigma = if h_sigma { 1. } else { 0. };

        let cc = (self.c_c * (2. - self.c_c) * self.mu_eff).sqrt();
        self.p_c = (1. - self.c_c) * &self.p_c + h_sigma * cc * &y_w;

        let mut rank_mu = Array1::<f64>::zeros(self.dim);
        for (w, y) in self.weights.iter().zip(&steps) {
            rank_mu.scaled_add(*w, &y.mapv(|v| v * v));
        }
        let c_1 = self.c_1;
        let c_mu = self.c_mu;
        let correction = (1. - h_sigma) * self.c_c * (2. - self.c_c);
        Zip::from(&mut self.diag_c)
            .and(&self.p_c)
            .and(&rank_mu)
            .for_each(|c, &pc, &rmu| {
                *c = (1. - c_1 - c_mu) * *c + c_1 * (pc * pc + correction * *c) + c_mu * rmu;
                *c = c.max(1e-20);
            });

        self.sigma *= ((self.c_sigma / self.d_sigma) * (ps_norm / self.chi_n - 1.)).exp();
        self.sigma = self.sigma.clamp(1e-20, 1e10 * self.bounds.width());
        self.generation += 1;
    }
}

impl AskTell for SepCmaEs {
    fn ask(&mut self) -> Array1<f64> {
        if self.pending.is_empty() {
            self.sample_generation();
        }
        self.pending.pop().unwrap_or_else(|| self.mean.clone())
    }

    fn tell(&mut self, x: &Array1<f64>, y: f64) {
        self.evaluated.push((x.clone(), y));
        if self.evaluated.len() == self.lambda {
            self.update();
        }
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
    fn test_cma_weights() {
        let cma = SepCmaEs::new(
            Bounds::new(-1., 1.).unwrap(),
            Array1::zeros(3),
            0.3,
            Xoshiro256Plus::seed_from_u64(0),
        );
        assert_eq!(cma.lambda, 7);
        assert!((cma.weights.sum() - 1.).abs() < 1e-12);
        assert!(cma.weights[0] > cma.weights[cma.weights.len() - 1]);
    }

    #[test]
    fn test_cma_ellipsoid() {
        let fun = ObjFunc::new("ellipsoid", |x: &ArrayView1<f64>| {
            x.iter()
                .enumerate()
                .map(|(i, v)| 10f64.powi(i as i32) * (v - 1.).powi(2))
                .sum()
        });
        let bounds = Bounds::new(-5., 5.).unwrap();
        let cma = SepCmaEs::new(bounds, Array1::zeros(3), 1.5, Xoshiro256Plus::seed_from_u64(42));
        let x = minimize(&fun, "CMA", Box::new(cma), 2000).unwrap();
        assert!(fun.eval(&x.view()) < 1e-6);
    }
}
