//! Properties of the estimators on simulated maxima

use extremes_classic::mle::gev_nnlf;
use extremes_classic::{
    fit_parameters, lmoments, CiMethod, Family, FitConfig, FitMethod, FittedModel,
};
use extremes_confidence::InstabilitySeverity;
use extremes_core::{ExtremeValueDistribution, Gev};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn simulate_n(shape: f64, scale: f64, n: usize, seed: u64) -> Vec<f64> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    Gev::new(shape, 10.0, scale).unwrap().sample(&mut rng, n)
}

fn simulate(shape: f64, scale: f64, seed: u64) -> Vec<f64> {
    simulate_n(shape, scale, 80, seed)
}

#[test]
fn test_mle_bootstrap_on_bounded_tail() {
    for seed in 0..5 {
        let data = simulate_n(0.3, 2.0, 30, seed);
        let config = FitConfig::new(FitMethod::Mle)
            .with_ci(0.05, CiMethod::Bootstrap)
            .with_bootstrap_samples(100)
            .with_return_periods(vec![50.0])
            .with_seed(seed);
        let model = FittedModel::fit(&data, Family::Gev, &config)
            .unwrap_or_else(|e| panic!("seed {seed}: {e}"));
        let ci = model.confidence().unwrap();
        assert!(ci.shape.lower <= ci.shape.upper);
        assert!(ci.requested.lower[0] <= ci.requested.upper[0]);
        for warning in &ci.diagnostics {
            if warning.severity == InstabilitySeverity::DroppedReplicates {
                assert!(warning.dropped < 100);
            }
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_lmoment_fits_are_valid_models(
        shape in -0.2f64..0.3,
        scale in 0.5f64..5.0,
        seed in any::<u64>(),
    ) {
        let data = simulate(shape, scale, seed);
        let params = fit_parameters(Family::Gev, FitMethod::LMoments, &data)
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert!(params.scale > 0.0);
        let model = params.distribution(Family::Gev)
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        // return levels grow with the return period
        let levels: Vec<f64> = [2.0, 10.0, 100.0].iter().map(|t| model.isf(1.0 / t)).collect();
        prop_assert!(levels[0] < levels[1] && levels[1] < levels[2]);
    }

    #[test]
    fn prop_gev_mle_fits_bounded_and_heavy_tails(
        shape in -0.3f64..0.5,
        scale in 0.5f64..5.0,
        seed in any::<u64>(),
    ) {
        let data = simulate_n(shape, scale, 50, seed);
        let model = FittedModel::fit(&data, Family::Gev, &FitConfig::new(FitMethod::Mle))
            .map_err(|e| TestCaseError::fail(format!("c = {shape}: {e}")))?;
        let mle = model.params().to_vec();
        prop_assert!(mle[2] > 0.0);
        // the fit ends inside the support and is no worse than its start
        let nnlf = gev_nnlf(&data, &mle);
        prop_assert!(nnlf.is_finite());
        let start = lmoments::gev(&data).map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert!(nnlf <= gev_nnlf(&data, &start.to_vec()) + 1e-9);
    }

    #[test]
    fn prop_gumbel_estimators_are_equivariant(
        shift in -50.0f64..50.0,
        factor in 0.1f64..10.0,
        seed in any::<u64>(),
    ) {
        let data = simulate(0.0, 1.0, seed);
        let moved: Vec<f64> = data.iter().map(|x| shift + factor * x).collect();
        for method in [FitMethod::Mle, FitMethod::LMoments, FitMethod::Moments] {
            let a = fit_parameters(Family::Gumbel, method, &data)
                .map_err(|e| TestCaseError::fail(e.to_string()))?;
            let b = fit_parameters(Family::Gumbel, method, &moved)
                .map_err(|e| TestCaseError::fail(e.to_string()))?;
            prop_assert!((b.scale - factor * a.scale).abs() < 1e-6 * factor * a.scale.max(1.0));
            prop_assert!((b.location - (shift + factor * a.location)).abs() < 1e-5 * (1.0 + b.location.abs()));
        }
    }
}
