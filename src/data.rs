//! Synthetic observations drawn from a fully specified change-point model.

use std::collections::TryReserveError;

use rand::Rng;
use rand_distr::{Distribution, StandardNormal};

use crate::params::{DataPoint, Params, DAY_END, DAY_START};

/// Draw `count` observations at uniform times in `[0, 24)`, sorted by time.
///
/// Each value is Gaussian around the regime mean of `true_params` at its
/// time, with standard deviation `known_sigma`.
pub fn generate_data<R: Rng + ?Sized>(
    true_params: &Params,
    known_sigma: f64,
    count: usize,
    rng: &mut R,
) -> Vec<DataPoint> {
    let mut times = Vec::with_capacity(count);
    let mut data = Vec::with_capacity(count);
    fill_data(true_params, known_sigma, count, rng, &mut times, &mut data);
    data
}

/// Like [`generate_data`], but reports a dataset that cannot be allocated
/// instead of aborting.
pub(crate) fn try_generate_data<R: Rng + ?Sized>(
    true_params: &Params,
    known_sigma: f64,
    count: usize,
    rng: &mut R,
) -> Result<Vec<DataPoint>, TryReserveError> {
    let mut times = Vec::new();
    times.try_reserve_exact(count)?;
    let mut data = Vec::new();
    data.try_reserve_exact(count)?;
    fill_data(true_params, known_sigma, count, rng, &mut times, &mut data);
    Ok(data)
}

fn fill_data<R: Rng + ?Sized>(
    true_params: &Params,
    known_sigma: f64,
    count: usize,
    rng: &mut R,
    times: &mut Vec<f64>,
    data: &mut Vec<DataPoint>,
) {
    times.extend((0..count).map(|_| rng.random_range(DAY_START..DAY_END)));
    times.sort_by(f64::total_cmp);

    data.extend(times.iter().map(|&time| {
        let noise: f64 = StandardNormal.sample(rng);
        DataPoint {
            time,
            value: true_params.mean_at(time) + known_sigma * noise,
        }
    }));
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn regimes_follow_true_params() {
        let truth = Params::new(12., -100., 100.);
        let mut rng = StdRng::seed_from_u64(42);
        let data = generate_data(&truth, 0.5, 500, &mut rng);

        assert_eq!(data.len(), 500);
        for point in &data {
            if point.time < truth.tau {
                assert!((point.value + 100.).abs() < 5.);
            } else {
                assert!((point.value - 100.).abs() < 5.);
            }
        }
    }

    #[test]
    fn empty_dataset() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(generate_data(&Params::new(1., 2., 3.), 1., 0, &mut rng).is_empty());
    }

    #[test]
    fn unallocatable_dataset_is_an_error() {
        let mut rng = StdRng::seed_from_u64(0);
        let result = try_generate_data(&Params::new(1., 2., 3.), 1., usize::MAX, &mut rng);
        assert!(result.is_err());
    }

    #[test]
    fn fallible_generation_matches_generate_data() {
        let truth = Params::new(14.5, 12.3, 13.2);
        let a = generate_data(&truth, 0.9, 50, &mut StdRng::seed_from_u64(7));
        let b = try_generate_data(&truth, 0.9, 50, &mut StdRng::seed_from_u64(7))
            .expect("small dataset");
        assert_eq!(a, b);
    }

    #[test]
    fn same_seed_same_data() {
        let truth = Params::new(14.5, 12.3, 13.2);
        let a = generate_data(&truth, 0.9, 50, &mut StdRng::seed_from_u64(7));
        let b = generate_data(&truth, 0.9, 50, &mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
    }

    proptest! {
        #[test]
        fn generated_points_are_valid(
            seed in any::<u64>(),
            count in 0usize..400,
            tau in 0f64..=24f64,
            sigma in 0.01f64..10f64,
        ) {
            let mut rng = StdRng::seed_from_u64(seed);
            let data = generate_data(&Params::new(tau, 3., -3.), sigma, count, &mut rng);

            prop_assert_eq!(data.len(), count);
            for point in &data {
                prop_assert!(point.time.is_finite());
                prop_assert!((DAY_START..DAY_END).contains(&point.time));
                prop_assert!(point.value.is_finite());
            }
            prop_assert!(data.iter().tuple_windows().all(|(a, b)| a.time <= b.time));
        }
    }
}
