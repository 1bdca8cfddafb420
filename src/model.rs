//! Log-likelihood, log-prior and log-posterior of the change-point model.
//!
//! Zero densities are returned in-band as `f64::NEG_INFINITY`. They are a
//! normal outcome of a random-walk search, not an error.

use crate::{
    config::AlgorithmConfig,
    math::{log_normal_pdf, log_uniform_pdf},
    params::{DataPoint, Params, PriorMuMeans, PriorMuStds, DAY_END, DAY_START},
};

/// Gaussian log-likelihood of `data` given the regime split in `params`.
///
/// A non-positive (or NaN) `known_sigma` makes every dataset impossible.
pub fn log_likelihood(params: &Params, data: &[DataPoint], known_sigma: f64) -> f64 {
    if !(known_sigma > 0.) {
        return f64::NEG_INFINITY;
    }
    let logp: f64 = data
        .iter()
        .map(|point| log_normal_pdf(point.value, params.mean_at(point.time), known_sigma))
        .sum();
    not_nan(logp)
}

/// Uniform prior on τ over `[0, 24]` and independent Gaussian priors on the means.
pub fn log_prior(params: &Params, means: &PriorMuMeans, stds: &PriorMuStds) -> f64 {
    // `contains` is false for NaN, which puts a NaN τ outside the support.
    if !(DAY_START..=DAY_END).contains(&params.tau) {
        return f64::NEG_INFINITY;
    }
    if !(stds.mu1 > 0.) || !(stds.mu2 > 0.) {
        return f64::NEG_INFINITY;
    }
    if params.mu1.is_nan() || params.mu2.is_nan() {
        return f64::NEG_INFINITY;
    }
    if !means.mu1.is_finite() || !means.mu2.is_finite() {
        return f64::NEG_INFINITY;
    }

    let logp = log_uniform_pdf(DAY_START, DAY_END)
        + log_normal_pdf(params.mu1, means.mu1, stds.mu1)
        + log_normal_pdf(params.mu2, means.mu2, stds.mu2);
    not_nan(logp)
}

/// `-inf` for a NaN log density, which only arises from infinite inputs.
#[inline]
fn not_nan(logp: f64) -> f64 {
    if logp.is_nan() {
        f64::NEG_INFINITY
    } else {
        logp
    }
}

/// Unnormalized log-posterior.
///
/// The likelihood is not evaluated when the prior already rules `params` out.
pub fn log_posterior(
    params: &Params,
    data: &[DataPoint],
    known_sigma: f64,
    means: &PriorMuMeans,
    stds: &PriorMuStds,
) -> f64 {
    let prior = log_prior(params, means, stds);
    if prior == f64::NEG_INFINITY {
        return f64::NEG_INFINITY;
    }
    not_nan(log_likelihood(params, data, known_sigma) + prior)
}

/// A dataset together with the fixed quantities of the model.
#[derive(Debug, Clone, Copy)]
pub struct ChangePointModel<'a> {
    data: &'a [DataPoint],
    known_sigma: f64,
    prior_mu_means: PriorMuMeans,
    prior_mu_stds: PriorMuStds,
}

impl<'a> ChangePointModel<'a> {
    pub fn new(
        data: &'a [DataPoint],
        known_sigma: f64,
        prior_mu_means: PriorMuMeans,
        prior_mu_stds: PriorMuStds,
    ) -> Self {
        ChangePointModel {
            data,
            known_sigma,
            prior_mu_means,
            prior_mu_stds,
        }
    }

    /// The model described by the fixed quantities of `config`.
    pub fn from_config(data: &'a [DataPoint], config: &AlgorithmConfig) -> Self {
        ChangePointModel::new(
            data,
            config.known_sigma,
            config.prior_mu_means,
            config.prior_mu_stds,
        )
    }

    pub fn data(&self) -> &'a [DataPoint] {
        self.data
    }

    pub fn log_likelihood(&self, params: &Params) -> f64 {
        log_likelihood(params, self.data, self.known_sigma)
    }

    pub fn log_prior(&self, params: &Params) -> f64 {
        log_prior(params, &self.prior_mu_means, &self.prior_mu_stds)
    }

    pub fn log_posterior(&self, params: &Params) -> f64 {
        log_posterior(
            params,
            self.data,
            self.known_sigma,
            &self.prior_mu_means,
            &self.prior_mu_stds,
        )
    }
}
