//! Random-walk Metropolis transition for the change-point posterior.
//!
//! The proposal kernel is an independent Gaussian perturbation of every
//! coordinate, which is symmetric, so the acceptance ratio is the plain
//! posterior ratio. All quantities stay in log space and every degenerate
//! combination of infinite log-posteriors maps to a defined number.

use rand::Rng;
use rand_distr::{Distribution, StandardNormal};

use crate::{
    model::ChangePointModel,
    params::{DataPoint, Params, PriorMuMeans, PriorMuStds},
};

/// Everything that happened during one Metropolis transition.
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepResult {
    pub proposed: Params,
    pub log_posterior_current: f64,
    pub log_posterior_proposed: f64,
    pub log_ratio: f64,
    pub acceptance_probability: f64,
    pub accepted: bool,
    /// The uniform draw compared against `acceptance_probability`.
    pub random_draw: f64,
    /// `proposed` if the step was accepted, the previous state otherwise.
    pub new_params: Params,
}

// An infinite value moved by an infinite width stays where it is.
#[inline]
fn perturb<R: Rng + ?Sized>(value: f64, width: f64, rng: &mut R) -> f64 {
    let noise: f64 = StandardNormal.sample(rng);
    let proposed = value + width * noise;
    if proposed.is_nan() {
        value
    } else {
        proposed
    }
}

/// Gaussian random-walk proposal with per-coordinate standard deviations.
///
/// A zero width keeps the coordinate exactly where it is.
pub fn propose<R: Rng + ?Sized>(current: &Params, widths: &Params, rng: &mut R) -> Params {
    Params {
        tau: perturb(current.tau, widths.tau, rng),
        mu1: perturb(current.mu1, widths.mu1, rng),
        mu2: perturb(current.mu2, widths.mu2, rng),
    }
}

/// Log of the Metropolis ratio, `proposed - current`.
///
/// The subtraction is only replaced when it is NaN: two impossible states
/// give `-inf`, equal values give `0`, otherwise the sign of the comparison
/// decides between `+inf` and `-inf`.
pub fn log_acceptance_ratio(log_posterior_current: f64, log_posterior_proposed: f64) -> f64 {
    let log_ratio = log_posterior_proposed - log_posterior_current;
    if !log_ratio.is_nan() {
        return log_ratio;
    }

    if log_posterior_current == f64::NEG_INFINITY && log_posterior_proposed == f64::NEG_INFINITY {
        return f64::NEG_INFINITY;
    }
    if log_posterior_current == log_posterior_proposed {
        return 0.;
    }
    if log_posterior_proposed > log_posterior_current {
        f64::INFINITY
    } else {
        f64::NEG_INFINITY
    }
}

/// `min(1, exp(log_ratio))`, with `0` for an impossible proposal.
pub fn acceptance_probability(log_posterior_current: f64, log_posterior_proposed: f64) -> f64 {
    let log_ratio = log_acceptance_ratio(log_posterior_current, log_posterior_proposed);
    if log_ratio >= 0. {
        return 1.;
    }
    if log_ratio == f64::NEG_INFINITY {
        return 0.;
    }
    let alpha = log_ratio.exp();
    if alpha.is_finite() {
        alpha.min(1.)
    } else {
        0.
    }
}

/// Propose from `current`, then accept or reject against `model`.
pub fn step_model<R: Rng + ?Sized>(
    current: &Params,
    model: &ChangePointModel<'_>,
    widths: &Params,
    rng: &mut R,
) -> StepResult {
    let proposed = propose(current, widths, rng);
    let log_posterior_current = model.log_posterior(current);
    let log_posterior_proposed = model.log_posterior(&proposed);

    let log_ratio = log_acceptance_ratio(log_posterior_current, log_posterior_proposed);
    let acceptance_probability =
        acceptance_probability(log_posterior_current, log_posterior_proposed);
    let random_draw: f64 = rng.random();
    let accepted = random_draw < acceptance_probability;

    StepResult {
        proposed,
        log_posterior_current,
        log_posterior_proposed,
        log_ratio,
        acceptance_probability,
        accepted,
        random_draw,
        new_params: if accepted { proposed } else { *current },
    }
}

/// One complete Metropolis step.
///
/// Never fails: an impossible proposal is a rejection, not an error.
#[allow(clippy::too_many_arguments)]
pub fn step<R: Rng + ?Sized>(
    current: &Params,
    data: &[DataPoint],
    widths: &Params,
    known_sigma: f64,
    prior_mu_means: &PriorMuMeans,
    prior_mu_stds: &PriorMuStds,
    rng: &mut R,
) -> StepResult {
    let model = ChangePointModel::new(data, known_sigma, *prior_mu_means, *prior_mu_stds);
    step_model(current, &model, widths, rng)
}
