//! Sampler configuration and the repair step that keeps it numerically sane.
//!
//! A driver (an input form, a JSON file, a test) supplies a [`ConfigInput`],
//! which may be partial and may contain `NaN`, infinities, fractional counts
//! or non-positive scales. [`sanitize`] turns it into an [`AlgorithmConfig`]
//! that the generator, the model and the stepper can consume without
//! producing undefined numbers.

use crate::params::{MuPair, Params, PriorMuMeans, PriorMuStds, DAY_END, DAY_START};

pub const MIN_KNOWN_SIGMA: f64 = 0.01;
pub const MIN_PRIOR_STD: f64 = 0.01;
pub const MIN_PROPOSAL_WIDTH: f64 = 0.01;

/// Fully validated sampler configuration.
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlgorithmConfig {
    /// Number of Metropolis steps in a run, burn-in included.
    pub total_samples: u64,
    /// Number of leading steps treated as burn-in.
    pub burn_in_samples: u64,
    /// Size of the synthetic dataset.
    pub observation_count: u64,
    /// Measurement noise, assumed known.
    pub known_sigma: f64,
    /// Parameters the synthetic data is generated from.
    pub true_params: Params,
    pub prior_mu_means: PriorMuMeans,
    pub prior_mu_stds: PriorMuStds,
    /// Starting point of the chain.
    pub initial_params: Params,
    /// Standard deviations of the Gaussian random-walk proposal.
    pub proposal_widths: Params,
}

impl Default for AlgorithmConfig {
    fn default() -> Self {
        AlgorithmConfig {
            total_samples: 2000,
            burn_in_samples: 200,
            observation_count: 300,
            known_sigma: 0.9,
            true_params: Params::new(14.5, 12.3, 13.2),
            prior_mu_means: MuPair::new(15., 15.),
            prior_mu_stds: MuPair::new(5., 5.),
            initial_params: Params::new(12., 12., 13.),
            proposal_widths: Params::new(0.1, 0.2, 0.2),
        }
    }
}

impl AlgorithmConfig {
    /// Run the sanitizer again on an already typed configuration.
    ///
    /// For any output of [`sanitize`] this returns the value unchanged.
    pub fn sanitized(&self, defaults: &AlgorithmConfig) -> AlgorithmConfig {
        sanitize(&ConfigInput::from(self), defaults)
    }
}

/// Raw, possibly partial parameter triple.
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ParamsInput {
    pub tau: Option<f64>,
    pub mu1: Option<f64>,
    pub mu2: Option<f64>,
}

/// Raw, possibly partial pair of regime hyperparameters.
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MuPairInput {
    pub mu1: Option<f64>,
    pub mu2: Option<f64>,
}

/// Unvalidated configuration as supplied by a driver.
///
/// Counts are floats here so that fractional and non-finite input can be
/// represented and repaired.
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase", default)
)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ConfigInput {
    pub total_samples: Option<f64>,
    pub burn_in_samples: Option<f64>,
    pub observation_count: Option<f64>,
    pub known_sigma: Option<f64>,
    pub true_params: Option<ParamsInput>,
    pub prior_mu_means: Option<MuPairInput>,
    pub prior_mu_stds: Option<MuPairInput>,
    pub initial_params: Option<ParamsInput>,
    pub proposal_widths: Option<ParamsInput>,
}

impl From<&Params> for ParamsInput {
    fn from(params: &Params) -> Self {
        ParamsInput {
            tau: Some(params.tau),
            mu1: Some(params.mu1),
            mu2: Some(params.mu2),
        }
    }
}

impl From<&MuPair> for MuPairInput {
    fn from(pair: &MuPair) -> Self {
        MuPairInput {
            mu1: Some(pair.mu1),
            mu2: Some(pair.mu2),
        }
    }
}

impl From<&AlgorithmConfig> for ConfigInput {
    fn from(config: &AlgorithmConfig) -> Self {
        ConfigInput {
            total_samples: Some(config.total_samples as f64),
            burn_in_samples: Some(config.burn_in_samples as f64),
            observation_count: Some(config.observation_count as f64),
            known_sigma: Some(config.known_sigma),
            true_params: Some((&config.true_params).into()),
            prior_mu_means: Some((&config.prior_mu_means).into()),
            prior_mu_stds: Some((&config.prior_mu_stds).into()),
            initial_params: Some((&config.initial_params).into()),
            proposal_widths: Some((&config.proposal_widths).into()),
        }
    }
}

fn finite_or(value: Option<f64>, fallback: f64) -> f64 {
    value.filter(|v| v.is_finite()).unwrap_or(fallback)
}

/// Round half up, then clamp below. Values beyond `u64::MAX` saturate.
fn bounded_count(value: Option<f64>, fallback: u64, min: u64) -> u64 {
    let value = finite_or(value, fallback as f64);
    let rounded = (value + 0.5).floor();
    rounded.max(min as f64) as u64
}

fn scale(value: Option<f64>, fallback: f64, floor: f64) -> f64 {
    finite_or(value, fallback).max(floor)
}

fn sanitize_params(params: Option<&ParamsInput>, fallback: &Params) -> Params {
    let params = params.copied().unwrap_or_default();
    Params {
        tau: finite_or(params.tau, fallback.tau).clamp(DAY_START, DAY_END),
        mu1: finite_or(params.mu1, fallback.mu1),
        mu2: finite_or(params.mu2, fallback.mu2),
    }
}

fn sanitize_means(means: Option<&MuPairInput>, fallback: &PriorMuMeans) -> PriorMuMeans {
    let means = means.copied().unwrap_or_default();
    MuPair {
        mu1: finite_or(means.mu1, fallback.mu1),
        mu2: finite_or(means.mu2, fallback.mu2),
    }
}

fn sanitize_stds(stds: Option<&MuPairInput>, fallback: &PriorMuStds) -> PriorMuStds {
    let stds = stds.copied().unwrap_or_default();
    MuPair {
        mu1: scale(stds.mu1, fallback.mu1, MIN_PRIOR_STD),
        mu2: scale(stds.mu2, fallback.mu2, MIN_PRIOR_STD),
    }
}

fn sanitize_widths(widths: Option<&ParamsInput>, fallback: &Params) -> Params {
    let widths = widths.copied().unwrap_or_default();
    Params {
        tau: scale(widths.tau, fallback.tau, MIN_PROPOSAL_WIDTH),
        mu1: scale(widths.mu1, fallback.mu1, MIN_PROPOSAL_WIDTH),
        mu2: scale(widths.mu2, fallback.mu2, MIN_PROPOSAL_WIDTH),
    }
}

/// Repair a configuration so that downstream code never sees non-finite
/// values, non-positive scales, fractional counts or τ outside `[0, 24]`.
///
/// Missing and non-finite fields are taken from `defaults` before bounds are
/// applied. The function is total and does not modify its input.
pub fn sanitize(config: &ConfigInput, defaults: &AlgorithmConfig) -> AlgorithmConfig {
    AlgorithmConfig {
        total_samples: bounded_count(config.total_samples, defaults.total_samples, 1),
        burn_in_samples: bounded_count(config.burn_in_samples, defaults.burn_in_samples, 0),
        observation_count: bounded_count(
            config.observation_count,
            defaults.observation_count,
            1,
        ),
        known_sigma: scale(config.known_sigma, defaults.known_sigma, MIN_KNOWN_SIGMA),
        true_params: sanitize_params(config.true_params.as_ref(), &defaults.true_params),
        prior_mu_means: sanitize_means(config.prior_mu_means.as_ref(), &defaults.prior_mu_means),
        prior_mu_stds: sanitize_stds(config.prior_mu_stds.as_ref(), &defaults.prior_mu_stds),
        initial_params: sanitize_params(config.initial_params.as_ref(), &defaults.initial_params),
        proposal_widths: sanitize_widths(
            config.proposal_widths.as_ref(),
            &defaults.proposal_widths,
        ),
    }
}
