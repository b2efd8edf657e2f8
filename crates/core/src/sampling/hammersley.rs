use ndarray::{Array2, ArrayBase, Data, Ix2};
use ndarray_rand::rand::{seq::SliceRandom, Rng};

use super::SamplingMethod;

/// First `n` prime numbers, used as radical inverse bases
fn primes(n: usize) -> Vec<u64> {
    let mut primes = Vec::with_capacity(n);
    let mut candidate = 2u64;
    while primes.len() < n {
        if primes.iter().all(|p| candidate % p != 0) {
            primes.push(candidate);
        }
        candidate += 1;
    }
    primes
}

/// Radical inverse of `i` in `base` with digits permuted by `perm`
fn radical_inverse(mut i: u64, base: u64, perm: &[u64]) -> f64 {
    let inv_base = 1. / base as f64;
    let mut factor = inv_base;
    let mut value = 0.;
    while i > 0 {
        let digit = perm[(i % base) as usize];
        value += digit as f64 * factor;
        i /= base;
        factor *= inv_base;
    }
    value
}

/// Scrambled Hammersley design: the first component is the regular grid `(i + 1/2) / ns`,
/// the others are radical inverses in successive prime bases with randomly permuted digits.
///
/// The whole design depends on `ns`: the first `k` points of a design of size `ns`
/// are not the design of size `k`.
#[derive(Clone, Debug)]
pub struct Hammersley {
    xlimits: Array2<f64>,
    /// Digit permutation per component (zero is kept fixed)
    permutations: Vec<Vec<u64>>,
}

impl Hammersley {
    /// Constructor with a design space, digit permutations are drawn from `rng`.
    /// Without scrambling (`scrambled = false`) permutations are the identity.
    ///
    /// **Panics** if xlimits number of columns is different from 2.
    pub fn new<R: Rng>(
        xlimits: &ArrayBase<impl Data<Elem = f64>, Ix2>,
        scrambled: bool,
        rng: &mut R,
    ) -> Self {
        if xlimits.ncols() != 2 {
            panic!("xlimits must have 2 columns (lower, upper)");
        }
        let nx = xlimits.nrows();
        let permutations = primes(nx.saturating_sub(1))
            .into_iter()
            .map(|base| {
                let mut perm: Vec<u64> = (0..base).collect();
                if scrambled {
                    perm[1..].shuffle(rng);
                }
                perm
            })
            .collect();
        Hammersley {
            xlimits: xlimits.to_owned(),
            permutations,
        }
    }
}

impl SamplingMethod for Hammersley {
    fn sampling_space(&self) -> &Array2<f64> {
        &self.xlimits
    }

    fn normalized_sample(&self, ns: usize) -> Array2<f64> {
        let nx = self.xlimits.nrows();
        let mut doe = Array2::zeros((ns, nx));
        for (i, mut row) in doe.rows_mut().into_iter().enumerate() {
            if nx > 0 {
                row[0] = (i as f64 + 0.5) / ns as f64;
            }
            for (j, perm) in self.permutations.iter().enumerate() {
                row[j + 1] = radical_inverse(i as u64 + 1, perm.len() as u64, perm);
            }
        }
        doe
    }
}
