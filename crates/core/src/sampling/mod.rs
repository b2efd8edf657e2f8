//! Sampling methods generating sets of points (DoE) within a box design space.
//!
//! The design space is given as a `(nx, 2)` matrix `xlimits`, the ith row being
//! the `[lower, upper]` interval of the ith component. All methods draw their
//! randomness from an explicit generator, so that a seed fully determines the DoE.
mod hammersley;
mod lhs;
mod random;

pub use hammersley::*;
pub use lhs::*;
pub use random::*;

use ndarray::Array2;

/// Sampling method allowing to generate a DoE in a given sample space
pub trait SamplingMethod {
    /// Returns the (nx, 2) bounds of the sample space
    fn sampling_space(&self) -> &Array2<f64>;

    /// Generates a (ns, nx)-shaped array of samples belonging to `[0., 1.]^nx`
    fn normalized_sample(&self, ns: usize) -> Array2<f64>;

    /// Generates a (ns, nx)-shaped array of samples belonging to the sample space
    fn sample(&self, ns: usize) -> Array2<f64> {
        let xlimits = self.sampling_space();
        let lower = xlimits.column(0);
        let scaler = &xlimits.column(1) - &lower;
        self.normalized_sample(ns) * scaler + lower
    }
}
