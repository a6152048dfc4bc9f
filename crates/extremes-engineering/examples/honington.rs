//! Compare the engineering estimators on the Honington wind speeds
//!
//! Run with `RUST_LOG=extremes_engineering=debug` to follow the fits.

use anyhow::Result;
use extremes_core::test_data::harris_1996;
use extremes_engineering::{
    ExtremeWind, Harris1996, Lieblein, PlottingPosition, PlottingPositionEstimator,
    Preconditioning,
};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let data = harris_1996();
    let pressures = Preconditioning::new(2.0)?;
    println!("=== Honington annual maximum wind speeds ({} years) ===\n", data.len());

    let mut estimators: Vec<Box<dyn PlottingPositionEstimator>> =
        vec![Box::new(Lieblein), Box::new(Harris1996)];
    estimators.extend(
        PlottingPosition::ALL
            .into_iter()
            .map(|p| Box::new(p) as Box<dyn PlottingPositionEstimator>),
    );

    println!("{:<20} {:>10} {:>10} {:>10}", "method", "offset", "slope", "V50");
    for estimator in &estimators {
        let fit = estimator.estimate(&data, pressures)?;
        let v50 = fit.return_levels.level_for(50.0).unwrap_or(f64::NAN);
        println!(
            "{:<20} {:>10.2} {:>10.2} {:>10.2}",
            fit.method, fit.offset, fit.slope, v50
        );
    }

    println!("\n=== 50-year wind from the parent Weibull ===\n");
    for (vave, k) in [(8.588, 2.156), (9.924, 2.051)] {
        let site = ExtremeWind::new(vave, k)?;
        println!(
            "vave = {vave:.3}, k = {k:.3}: exact {:.2}, Gumbel {:.2}, Davenport {:.2}",
            site.exact()?,
            site.gumbel()?,
            site.davenport()?
        );
    }
    Ok(())
}
