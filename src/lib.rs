//! Bayesian inference of a single change-point with a Metropolis sampler.
//!
//! Observations `(t, y)` are modelled as `y ~ N(μ1, σ)` for `t < τ` and
//! `y ~ N(μ2, σ)` otherwise, with known `σ`, a uniform prior on `τ ∈ [0, 24]`
//! and independent Gaussian priors on `μ1` and `μ2`. The crate provides the
//! numerical core (configuration repair, synthetic data, posterior, one
//! Metropolis transition) plus a chain driver and trace storage.
//!
//! ```
//! use changepoint_mcmc::{sanitize, AlgorithmConfig, Chain, ConfigInput};
//!
//! let config = sanitize(
//!     &ConfigInput {
//!         total_samples: Some(500.),
//!         burn_in_samples: Some(100.),
//!         ..Default::default()
//!     },
//!     &AlgorithmConfig::default(),
//! );
//! let mut chain = Chain::seeded(config, 42).unwrap();
//! chain.run().unwrap();
//! assert_eq!(chain.draw_count(), 500);
//! ```

pub(crate) mod chain;
pub(crate) mod config;
pub(crate) mod data;
pub(crate) mod math;
pub(crate) mod metropolis;
pub(crate) mod model;
pub(crate) mod params;
pub(crate) mod storage;
pub(crate) mod summary;

pub use chain::{sample_sequentially, Chain, ChainError, Progress, Sample};
pub use config::{
    sanitize, AlgorithmConfig, ConfigInput, MuPairInput, ParamsInput, MIN_KNOWN_SIGMA,
    MIN_PRIOR_STD, MIN_PROPOSAL_WIDTH,
};
pub use data::generate_data;
pub use math::{log_normal_pdf, LOG_2PI};
pub use metropolis::{
    acceptance_probability, log_acceptance_ratio, propose, step, step_model, StepResult,
};
pub use model::{log_likelihood, log_posterior, log_prior, ChangePointModel};
pub use params::{DataPoint, MuPair, Params, PriorMuMeans, PriorMuStds, DAY_END, DAY_START};
pub use storage::{CsvTraceWriter, StepTraceBuilder};
pub use summary::{ParamSummary, PosteriorSummary};
