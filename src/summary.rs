//! Mean and range summaries of retained draws.

use itertools::{Itertools, MinMaxResult};

use crate::{chain::Sample, params::Params};

/// Mean and range of one parameter over a set of samples.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamSummary {
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}

impl ParamSummary {
    fn from_values(values: impl Iterator<Item = f64> + Clone) -> Option<Self> {
        let (min, max) = match values.clone().minmax_by(f64::total_cmp) {
            MinMaxResult::NoElements => return None,
            MinMaxResult::OneElement(value) => (value, value),
            MinMaxResult::MinMax(min, max) => (min, max),
        };
        let (sum, count) = values.fold((0f64, 0usize), |(sum, count), value| {
            (sum + value, count + 1)
        });
        Some(ParamSummary {
            mean: sum / count as f64,
            min,
            max,
        })
    }
}

/// Per-parameter summary of the retained draws.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PosteriorSummary {
    pub num_samples: usize,
    pub tau: ParamSummary,
    pub mu1: ParamSummary,
    pub mu2: ParamSummary,
}

impl PosteriorSummary {
    /// `None` if there are no samples.
    pub fn from_samples(samples: &[Sample]) -> Option<Self> {
        let column = |get: fn(&Params) -> f64| samples.iter().map(move |s| get(&s.params));
        Some(PosteriorSummary {
            num_samples: samples.len(),
            tau: ParamSummary::from_values(column(|p| p.tau))?,
            mu1: ParamSummary::from_values(column(|p| p.mu1))?,
            mu2: ParamSummary::from_values(column(|p| p.mu2))?,
        })
    }

    /// Posterior mean as a parameter triple.
    pub fn mean(&self) -> Params {
        Params::new(self.tau.mean, self.mu1.mean, self.mu2.mean)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use pretty_assertions::assert_eq;

    fn sample(draw: u64, tau: f64, mu1: f64, mu2: f64) -> Sample {
        Sample {
            draw,
            params: Params::new(tau, mu1, mu2),
        }
    }

    #[test]
    fn empty_has_no_summary() {
        assert_eq!(PosteriorSummary::from_samples(&[]), None);
    }

    #[test]
    fn single_sample() {
        let summary = PosteriorSummary::from_samples(&[sample(3, 10., 1., 2.)])
            .expect("one sample");
        assert_eq!(summary.num_samples, 1);
        assert_eq!(
            summary.tau,
            ParamSummary {
                mean: 10.,
                min: 10.,
                max: 10.
            }
        );
        assert_eq!(summary.mean(), Params::new(10., 1., 2.));
    }

    #[test]
    fn means_and_ranges() {
        let samples = [
            sample(0, 10., 1., 5.),
            sample(1, 12., 3., 4.),
            sample(2, 14., 2., 6.),
        ];
        let summary = PosteriorSummary::from_samples(&samples).expect("three samples");
        assert_abs_diff_eq!(summary.tau.mean, 12., epsilon = 1e-12);
        assert_abs_diff_eq!(summary.mu1.mean, 2., epsilon = 1e-12);
        assert_abs_diff_eq!(summary.mu2.mean, 5., epsilon = 1e-12);
        assert_eq!((summary.tau.min, summary.tau.max), (10., 14.));
        assert_eq!((summary.mu1.min, summary.mu1.max), (1., 3.));
        assert_eq!((summary.mu2.min, summary.mu2.max), (4., 6.));
    }
}
