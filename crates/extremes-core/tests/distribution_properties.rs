//! Property tests for the frozen distributions and the return-level mapper

use extremes_core::{return_levels, ExtremeValue, ExtremeValueDistribution, Gev, Gumbel};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

proptest! {
    #[test]
    fn gev_quantile_inverts_cdf(
        shape in -0.45f64..0.45,
        location in -10.0f64..10.0,
        scale in 0.01f64..5.0,
        q in 0.001f64..0.999,
    ) {
        let gev = Gev::new(shape, location, scale).unwrap();
        let x = gev.ppf(q);
        prop_assert!((gev.cdf(x) - q).abs() < 1e-9);
        prop_assert!((gev.isf(1.0 - q) - x).abs() < 1e-6 * (1.0 + x.abs()));
    }

    #[test]
    fn return_levels_increase_with_period(
        shape in -0.3f64..0.3,
        scale in 0.1f64..3.0,
    ) {
        let model = ExtremeValue::from(Gev::new(shape, 0.0, scale).unwrap());
        let table = return_levels(&model, &[2.0, 5.0, 10.0, 50.0, 100.0], 1.0).unwrap();
        for pair in table.levels.windows(2) {
            prop_assert!(pair[1] > pair[0]);
        }
    }

    #[test]
    fn gumbel_density_is_non_negative(x in -50.0f64..50.0, scale in 0.1f64..10.0) {
        let g = Gumbel::new(0.0, scale).unwrap();
        prop_assert!(g.pdf(x) >= 0.0);
        prop_assert!((0.0..=1.0).contains(&g.cdf(x)));
    }
}

#[test]
fn sample_mean_tracks_distribution_mean() {
    let model = Gumbel::new(10.0, 2.0).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let sample = model.sample(&mut rng, 50_000);
    let mean = sample.iter().sum::<f64>() / sample.len() as f64;
    assert!((mean - model.mean()).abs() < 0.05);
}
