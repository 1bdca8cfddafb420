//! Driver that runs one Metropolis chain and keeps its samples.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use thiserror::Error;
use tracing::{debug, info, trace, warn};

use crate::{
    config::AlgorithmConfig,
    data::try_generate_data,
    metropolis::{step_model, StepResult},
    model::ChangePointModel,
    params::{DataPoint, Params},
    summary::PosteriorSummary,
};

#[derive(Error, Debug)]
pub enum ChainError {
    #[error("chain has already produced all {0} draws")]
    Exhausted(u64),
    #[error("cannot allocate a dataset of {0} observations")]
    TooManyObservations(u64),
    #[error("could not build trace arrays")]
    Arrow(#[from] arrow::error::ArrowError),
}

pub type Result<T> = std::result::Result<T, ChainError>;

/// Position of a draw within the run.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct Progress {
    pub draw: u64,
    /// Whether the draw belongs to the burn-in phase.
    pub tuning: bool,
    pub accepted: bool,
}

/// Parameters recorded after a draw.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub draw: u64,
    pub params: Params,
}

/// A single Metropolis chain over a fixed dataset.
///
/// The chain owns the current state and commits `new_params` after every
/// draw. Burn-in draws record their resulting state, later draws record the
/// proposal only when it was accepted.
pub struct Chain<R: Rng> {
    config: AlgorithmConfig,
    data: Vec<DataPoint>,
    current: Params,
    rng: R,
    draw_count: u64,
    accept_count: u64,
    burn_in_samples: Vec<Sample>,
    accepted_samples: Vec<Sample>,
    last_step: Option<StepResult>,
}

impl Chain<ChaCha8Rng> {
    /// Chain with a reproducible random source.
    pub fn seeded(config: AlgorithmConfig, seed: u64) -> Result<Self> {
        Chain::new(config, ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> Chain<R> {
    /// Generate the dataset from the true parameters and start at
    /// `config.initial_params`.
    ///
    /// `config` is expected to come out of [`crate::sanitize`], which puts
    /// no upper bound on the observation count. A dataset that does not fit
    /// in memory is reported as [`ChainError::TooManyObservations`].
    pub fn new(config: AlgorithmConfig, mut rng: R) -> Result<Self> {
        let observations = config.observation_count;
        let count = usize::try_from(observations)
            .map_err(|_| ChainError::TooManyObservations(observations))?;
        let data = try_generate_data(&config.true_params, config.known_sigma, count, &mut rng)
            .map_err(|_| ChainError::TooManyObservations(observations))?;
        Ok(Chain::with_data(config, data, rng))
    }

    /// Start a chain on a dataset supplied by the caller.
    pub fn with_data(config: AlgorithmConfig, data: Vec<DataPoint>, rng: R) -> Self {
        debug!(
            observations = data.len(),
            total_samples = config.total_samples,
            burn_in_samples = config.burn_in_samples,
            "creating metropolis chain"
        );
        let chain = Chain {
            current: config.initial_params,
            config,
            data,
            rng,
            draw_count: 0,
            accept_count: 0,
            burn_in_samples: Vec::new(),
            accepted_samples: Vec::new(),
            last_step: None,
        };
        let initial_logp =
            ChangePointModel::from_config(&chain.data, &chain.config).log_posterior(&chain.current);
        if initial_logp == f64::NEG_INFINITY {
            warn!(
                tau = chain.current.tau,
                mu1 = chain.current.mu1,
                mu2 = chain.current.mu2,
                "initial parameters have zero posterior density"
            );
        }
        chain
    }

    /// Perform one Metropolis step and commit its outcome.
    pub fn draw(&mut self) -> Result<(StepResult, Progress)> {
        if self.is_finished() {
            return Err(ChainError::Exhausted(self.config.total_samples));
        }

        let model = ChangePointModel::from_config(&self.data, &self.config);
        let result = step_model(
            &self.current,
            &model,
            &self.config.proposal_widths,
            &mut self.rng,
        );

        let draw = self.draw_count;
        let tuning = draw < self.config.burn_in_samples;
        trace!(
            draw,
            tuning,
            logp_current = result.log_posterior_current,
            logp_proposed = result.log_posterior_proposed,
            acceptance_probability = result.acceptance_probability,
            accepted = result.accepted,
            "metropolis step"
        );

        let sample = Sample {
            draw,
            params: result.new_params,
        };
        if tuning {
            self.burn_in_samples.push(sample);
        } else if result.accepted {
            self.accepted_samples.push(sample);
        }
        if result.accepted {
            self.accept_count += 1;
        }

        self.current = result.new_params;
        self.last_step = Some(result);
        self.draw_count += 1;

        if self.draw_count == self.config.burn_in_samples {
            debug!(draws = self.draw_count, "burn-in finished");
        }
        if self.is_finished() {
            info!(
                draws = self.draw_count,
                accepted = self.accepted_samples.len(),
                acceptance_rate = self.acceptance_rate(),
                "chain finished"
            );
        }

        let progress = Progress {
            draw,
            tuning,
            accepted: result.accepted,
        };
        Ok((result, progress))
    }

    /// Run all remaining draws, discarding the per-step diagnostics.
    pub fn run(&mut self) -> Result<()> {
        while !self.is_finished() {
            self.draw()?;
        }
        Ok(())
    }

    pub fn is_finished(&self) -> bool {
        self.draw_count >= self.config.total_samples
    }

    /// Fraction of accepted steps over all draws so far, `0` before the first draw.
    pub fn acceptance_rate(&self) -> f64 {
        if self.draw_count == 0 {
            return 0.;
        }
        self.accept_count as f64 / self.draw_count as f64
    }

    pub fn config(&self) -> &AlgorithmConfig {
        &self.config
    }

    pub fn data(&self) -> &[DataPoint] {
        &self.data
    }

    pub fn current(&self) -> &Params {
        &self.current
    }

    pub fn draw_count(&self) -> u64 {
        self.draw_count
    }

    pub fn last_step(&self) -> Option<&StepResult> {
        self.last_step.as_ref()
    }

    pub fn burn_in_samples(&self) -> &[Sample] {
        &self.burn_in_samples
    }

    pub fn accepted_samples(&self) -> &[Sample] {
        &self.accepted_samples
    }

    /// Summary of the accepted post burn-in samples.
    pub fn summary(&self) -> Option<PosteriorSummary> {
        PosteriorSummary::from_samples(&self.accepted_samples)
    }
}

/// Iterate over the remaining draws of a freshly created chain.
pub fn sample_sequentially<R: Rng>(
    config: AlgorithmConfig,
    rng: R,
) -> Result<impl Iterator<Item = Result<(StepResult, Progress)>>> {
    let mut chain = Chain::new(config, rng)?;
    let draws = config.total_samples;
    Ok((0..draws).map(move |_| chain.draw()))
}
