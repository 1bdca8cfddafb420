use changepoint_mcmc::{generate_data, step, AlgorithmConfig, Chain};
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use rand::{rngs::StdRng, SeedableRng};

fn criterion_benchmark(c: &mut Criterion) {
    let config = AlgorithmConfig::default();

    for count in [300usize, 10_000] {
        let mut rng = StdRng::seed_from_u64(42);
        let data = generate_data(&config.true_params, config.known_sigma, count, &mut rng);

        c.bench_function(&format!("step {count} observations"), |b| {
            b.iter(|| {
                step(
                    black_box(&config.initial_params),
                    black_box(&data),
                    &config.proposal_widths,
                    config.known_sigma,
                    &config.prior_mu_means,
                    &config.prior_mu_stds,
                    &mut rng,
                )
            })
        });
    }

    c.bench_function("generate 300 observations", |b| {
        let mut rng = StdRng::seed_from_u64(42);
        b.iter(|| {
            generate_data(
                black_box(&config.true_params),
                config.known_sigma,
                300,
                &mut rng,
            )
        })
    });

    c.bench_function("chain 2000 draws", |b| {
        b.iter_batched(
            || Chain::seeded(config, 42).unwrap(),
            |mut chain| {
                chain.run().unwrap();
                chain.acceptance_rate()
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
