//! Fit the Port Pirie sea levels with every estimator and print return levels
//!
//! Run with `RUST_LOG=extremes_classic=debug` to follow the fits.

use anyhow::Result;
use extremes_classic::{CiMethod, Family, FitConfig, FitMethod, FittedModel};
use extremes_core::test_data::port_pirie;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let data = port_pirie();
    let periods = vec![2.0, 10.0, 50.0, 100.0];
    println!("=== Port Pirie annual maximum sea levels ({} years) ===\n", data.len());

    for family in [Family::Gev, Family::Gumbel] {
        for method in [FitMethod::Mle, FitMethod::LMoments, FitMethod::Moments] {
            let ci_method = match method {
                FitMethod::Mle => CiMethod::Delta,
                _ => CiMethod::Bootstrap,
            };
            let config = FitConfig::new(method)
                .with_ci(0.05, ci_method)
                .with_return_periods(periods.clone())
                .with_seed(42);
            let model = FittedModel::fit(&data, family, &config)?;

            println!("{family} / {method}: {}", model.params());
            if let Some(ci) = model.confidence() {
                for (name, interval) in ci.parameters() {
                    println!("  {name:>8}: {interval}");
                }
                for i in 0..ci.requested.len() {
                    println!(
                        "  T = {:>5.0}: {:.3}  [{:.3}, {:.3}]",
                        ci.requested.periods[i],
                        ci.requested.levels[i],
                        ci.requested.lower[i],
                        ci.requested.upper[i]
                    );
                }
                for warning in &ci.diagnostics {
                    println!("  warning: {warning}");
                }
            }
            println!();
        }
    }
    Ok(())
}
