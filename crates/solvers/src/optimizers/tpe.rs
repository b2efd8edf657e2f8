use std::f64::consts::{PI, SQRT_2};

use ndarray::Array1;
use ndarray_rand::rand::Rng;
use ndarray_rand::rand_distr::StandardNormal;
use rand_xoshiro::Xoshiro256Plus;
use zobench_core::Bounds;

use super::AskTell;

/// Number of random trials before using the Parzen estimators
pub(crate) const TPE_N_STARTUP_TRIALS: usize = 10;
/// Number of candidates drawn from the "good" estimator at each trial
pub(crate) const TPE_N_EI_CANDIDATES: usize = 24;

fn norm_cdf(x: f64) -> f64 {
    0.5 * libm::erfc(-x / SQRT_2)
}

fn log_sum_exp(values: &[f64]) -> f64 {
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    if max.is_infinite() {
        return max;
    }
    max + values.iter().map(|v| (v - max).exp()).sum::<f64>().ln()
}

/// One dimensional mixture of truncated gaussians centered on observations plus a
/// wide prior component centered in the search interval
#[derive(Debug)]
struct ParzenEstimator {
    low: f64,
    high: f64,
    mus: Vec<f64>,
    sigmas: Vec<f64>,
}

impl ParzenEstimator {
    fn new(observations: &[f64], low: f64, high: f64) -> Self {
        let prior_mu = 0.5 * (low + high);
        let range = high - low;
        let mut points: Vec<(f64, bool)> = observations.iter().map(|&x| (x, false)).collect();
        points.push((prior_mu, true));
        points.sort_by(|a, b| a.0.total_cmp(&b.0));
        let mus: Vec<f64> = points.iter().map(|p| p.0).collect();

        let min_sigma = range / (1. + mus.len() as f64).min(100.);
        let sigmas = points
            .iter()
            .enumerate()
            .map(|(i, &(mu, is_prior))| {
                if is_prior {
                    return range;
                }
                let left = if i == 0 { mu - low } else { mu - mus[i - 1] };
                let right = if i + 1 == mus.len() {
                    high - mu
                } else {
                    mus[i + 1] - mu
                };
                left.max(right).clamp(min_sigma, range)
            })
            .collect();
        ParzenEstimator {
            low,
            high,
            mus,
            sigmas,
        }
    }

    fn sample(&self, rng: &mut Xoshiro256Plus) -> f64 {
        let k = rng.gen_range(0..self.mus.len());
        for _ in 0..100 {
            let z: f64 = rng.sample(StandardNormal);
            let x = self.mus[k] + self.sigmas[k] * z;
            if (self.low..=self.high).contains(&x) {
                return x;
            }
        }
        self.mus[k].clamp(self.low, self.high)
    }

    fn log_pdf(&self, x: f64) -> f64 {
        let log_weight = -(self.mus.len() as f64).ln();
        let terms: Vec<f64> = self
            .mus
            .iter()
            .zip(&self.sigmas)
            .map(|(&mu, &sigma)| {
                let z = (x - mu) / sigma;
                let mass = norm_cdf((self.high - mu) / sigma) - norm_cdf((self.low - mu) / sigma);
                log_weight - 0.5 * z * z - (sigma * (2. * PI).sqrt()).ln()
                    - mass.max(f64::MIN_POSITIVE).ln()
            })
            .collect();
        log_sum_exp(&terms)
    }
}

/// Tree-structured Parzen estimator with independent components.
///
/// After a few random trials, observations are split into the best `gamma(n)`
/// ones and the others. Candidates drawn from the estimator of the best ones
/// are ranked by the ratio of the two estimator densities.
pub(crate) struct Tpe {
    bounds: Bounds,
    dim: usize,
    observations: Vec<(Array1<f64>, f64)>,
    rng: Xoshiro256Plus,
}

impl Tpe {
    pub fn new(bounds: Bounds, dim: usize, rng: Xoshiro256Plus) -> Self {
        Tpe {
            bounds,
            dim,
            observations: vec![],
            rng,
        }
    }

    fn gamma(n: usize) -> usize {
        ((0.1 * n as f64).ceil() as usize).clamp(1, 25)
    }

    fn random_point(&mut self) -> Array1<f64> {
        let (low, high) = (self.bounds.lower, self.bounds.upper);
        Array1::from_shape_fn(self.dim, |_| self.rng.gen_range(low..high))
    }

    fn suggest(&mut self) -> Array1<f64> {
        let mut sorted: Vec<&(Array1<f64>, f64)> = self.observations.iter().collect();
        sorted.sort_by(|a, b| a.1.total_cmp(&b.1));
        let n_below = Self::gamma(sorted.len());
        let (below, above) = sorted.split_at(n_below);

        let (low, high) = (self.bounds.lower, self.bounds.upper);
        let estimators: Vec<(ParzenEstimator, ParzenEstimator)> = (0..self.dim)
            .map(|d| {
                let good: Vec<f64> = below.iter().map(|(x, _)| x[d]).collect();
                let bad: Vec<f64> = above.iter().map(|(x, _)| x[d]).collect();
                (
                    ParzenEstimator::new(&good, low, high),
                    ParzenEstimator::new(&bad, low, high),
                )
            })
            .collect();

        let mut best = Array1::zeros(self.dim);
        let mut best_score = f64::NEG_INFINITY;
        for _ in 0..TPE_N_EI_CANDIDATES {
            let candidate =
                Array1::from_iter(estimators.iter().map(|(l, _)| l.sample(&mut self.rng)));
            let score: f64 = estimators
                .iter()
                .zip(candidate.iter())
                .map(|((l, g), &x)| l.log_pdf(x) - g.log_pdf(x))
                .sum();
            if score > best_score {
                best_score = score;
                best = candidate;
            }
        }
        best
    }
}

impl AskTell for Tpe {
    fn ask(&mut self) -> Array1<f64> {
        if self.observations.len() < TPE_N_STARTUP_TRIALS {
            self.random_point()
        } else {
            self.suggest()
        }
    }

    fn tell(&mut self, x: &Array1<f64>, y: f64) {
        self.observations.push((x.clone(), y));
    }
}

#[cfg(test)]
mod tests {
    use super::super::minimize;
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::ArrayView1;
    use ndarray_rand::rand::SeedableRng;
    use zobench_core::ObjFunc;

    #[test]
    fn test_parzen_density() {
        let pe = ParzenEstimator::new(&[0.2, 0.5], 0., 1.);
        assert_eq!(pe.mus.len(), 3);
        // the density integrates to one over [low, high]
        let n = 10_000;
        let integral: f64 = (0..n)
            .map(|i| pe.log_pdf((i as f64 + 0.5) / n as f64).exp() / n as f64)
            .sum();
        assert_abs_diff_eq!(integral, 1., epsilon = 1e-3);
    }

    #[test]
    fn test_gamma() {
        assert_eq!(Tpe::gamma(10), 1);
        assert_eq!(Tpe::gamma(11), 2);
        assert_eq!(Tpe::gamma(1000), 25);
    }

    #[test]
    fn test_tpe_improves_on_startup() {
        let fun = ObjFunc::new("sphere", |x: &ArrayView1<f64>| x.dot(x));
        let bounds = Bounds::new(-5., 5.).unwrap();
        let startup = minimize(
            &fun,
            "TPE",
            Box::new(Tpe::new(bounds, 2, Xoshiro256Plus::seed_from_u64(42))),
            TPE_N_STARTUP_TRIALS,
        )
        .unwrap();
        let x = minimize(
            &fun,
            "TPE",
            Box::new(Tpe::new(bounds, 2, Xoshiro256Plus::seed_from_u64(42))),
            100,
        )
        .unwrap();
        assert!(fun.eval(&x.view()) <= fun.eval(&startup.view()));
        assert!(fun.eval(&x.view()) < 1.);
    }
}
