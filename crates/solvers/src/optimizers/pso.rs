use ndarray::{Array1, Array2, Zip};
use ndarray_rand::rand::Rng;
use ndarray_stats::QuantileExt;
use rand_xoshiro::Xoshiro256Plus;
use zobench_core::sampling::{Lhs, SamplingMethod};
use zobench_core::Bounds;

use super::{child_rng, AskTell};

pub(crate) const PSO_SWARM_SIZE: usize = 40;

/// Particle swarm optimization, particles being moved one at a time
pub(crate) struct Pso {
    bounds: Bounds,
    positions: Array2<f64>,
    velocities: Array2<f64>,
    pbest: Array2<f64>,
    pbest_val: Array1<f64>,
    inertia: f64,
    cognitive: f64,
    social: f64,
    count: usize,
    rng: Xoshiro256Plus,
}

impl Pso {
    pub fn new(bounds: Bounds, dim: usize, mut rng: Xoshiro256Plus) -> Self {
        let xlimits = bounds.xlimits(dim);
        let positions = Lhs::new(&xlimits, child_rng(&mut rng)).sample(PSO_SWARM_SIZE);
        let vmax = 0.1 * bounds.width();
        let velocities = Lhs::new(&xlimits, child_rng(&mut rng))
            .normalized_sample(PSO_SWARM_SIZE)
            .mapv(|v| vmax * (2. * v - 1.));
        Pso {
            bounds,
            pbest: positions.clone(),
            positions,
            velocities,
            pbest_val: Array1::from_elem(PSO_SWARM_SIZE, f64::INFINITY),
            inertia: 0.7298,
            cognitive: 1.49618,
            social: 1.49618,
            count: 0,
            rng,
        }
    }

    fn swarm_size(&self) -> usize {
        self.positions.nrows()
    }

    fn move_particle(&mut self, i: usize) {
        let gbest = self.pbest_val.argmin_skipnan().unwrap_or(0);
        let vmax = self.bounds.width();
        let r1: f64 = self.rng.gen();
        let r2: f64 = self.rng.gen();
        let (w, c1, c2) = (self.inertia, self.cognitive, self.social);
        Zip::from(self.velocities.row_mut(i))
            .and(self.positions.row_mut(i))
            .and(self.pbest.row(i))
            .and(self.pbest.row(gbest))
            .for_each(|v, x, &p, &g| {
                *v = (w * *v + c1 * r1 * (p - *x) + c2 * r2 * (g - *x)).clamp(-vmax, vmax);
                *x += *v;
            });
        let mut x = self.positions.row(i).to_owned();
        self.bounds.clip(&mut x);
        self.positions.row_mut(i).assign(&x);
    }
}

impl AskTell for Pso {
    fn ask(&mut self) -> Array1<f64> {
        let i = self.count % self.swarm_size();
        if self.count >= self.swarm_size() {
            self.move_particle(i);
        }
        self.positions.row(i).to_owned()
    }

    fn tell(&mut self, x: &Array1<f64>, y: f64) {
        let i = self.count % self.swarm_size();
        if y < self.pbest_val[i] {
            self.pbest.row_mut(i).assign(x);
            self.pbest_val[i] = y;
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
    fn test_pso_sphere() {
        let fun = ObjFunc::new("sphere", |x: &ArrayView1<f64>| x.dot(x));
        let bounds = Bounds::new(-5., 5.).unwrap();
        let pso = Pso::new(bounds, 2, Xoshiro256Plus::seed_from_u64(42));
        let x = minimize(&fun, "PSO", Box::new(pso), 2000).unwrap();
        assert!(fun.eval(&x.view()) < 1e-2);
    }
}
