//! Value types shared by the generator, the posterior model and the sampler.

/// Start of the observation window (hours).
pub const DAY_START: f64 = 0.;
/// End of the observation window (hours). Also the upper bound of the τ prior.
pub const DAY_END: f64 = 24.;

/// A point in parameter space: change time and the two regime means.
///
/// Sampling never mutates a `Params` in place, every accepted step produces
/// a fresh value.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Params {
    pub tau: f64,
    pub mu1: f64,
    pub mu2: f64,
}

impl Params {
    pub fn new(tau: f64, mu1: f64, mu2: f64) -> Self {
        Params { tau, mu1, mu2 }
    }

    /// The regime mean that applies at `time`.
    ///
    /// The boundary is half-open: an observation exactly at `tau` belongs to
    /// the second regime.
    #[inline]
    pub fn mean_at(&self, time: f64) -> f64 {
        if time < self.tau {
            self.mu1
        } else {
            self.mu2
        }
    }

    pub fn is_finite(&self) -> bool {
        self.tau.is_finite() && self.mu1.is_finite() && self.mu2.is_finite()
    }
}

/// A pair of hyperparameters, one per regime mean.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MuPair {
    pub mu1: f64,
    pub mu2: f64,
}

impl MuPair {
    pub fn new(mu1: f64, mu2: f64) -> Self {
        MuPair { mu1, mu2 }
    }
}

/// Means of the independent Gaussian priors on μ1 and μ2.
pub type PriorMuMeans = MuPair;
/// Standard deviations of the independent Gaussian priors on μ1 and μ2.
pub type PriorMuStds = MuPair;

/// One noisy observation.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DataPoint {
    pub time: f64,
    pub value: f64,
}
