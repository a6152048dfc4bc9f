//! Frozen extreme value distributions
//!
//! The GEV shape follows the `c` sign convention: `F(x) = exp(−(1 − c·z)^{1/c})`
//! with `z = (x − μ)/σ`. Positive `c` gives a bounded upper tail (Weibull
//! type), negative `c` a heavy upper tail (Fréchet type). The classical `ξ`
//! of Coles is `−c`.
//!
//! # Examples
//!
//! ```rust
//! use extremes_core::{ExtremeValueDistribution, Gumbel};
//!
//! let gumbel = Gumbel::new(3.87, 0.195).unwrap();
//! let level = gumbel.isf(1.0 / 100.0);
//! assert!((gumbel.sf(level) - 0.01).abs() < 1e-12);
//! ```

use crate::math::{gamma, EULER_GAMMA, GUMBEL_SKEWNESS};
use crate::{Error, Result};
use rand::distributions::Open01;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;

/// Shapes closer to zero than this use the Gumbel limit formulas
const SHAPE_EPS: f64 = 1e-12;

/// Common interface of the frozen GEV and Gumbel distributions
pub trait ExtremeValueDistribution {
    /// Shape parameter in the `c` convention (zero for Gumbel)
    fn shape(&self) -> f64;
    fn location(&self) -> f64;
    fn scale(&self) -> f64;

    /// Natural log of the density; `−∞` outside the support
    fn logpdf(&self, x: f64) -> f64;

    fn pdf(&self, x: f64) -> f64 {
        self.logpdf(x).exp()
    }

    fn cdf(&self, x: f64) -> f64;

    /// Survival function `1 − F(x)`
    fn sf(&self, x: f64) -> f64 {
        1.0 - self.cdf(x)
    }

    /// Quantile function; NaN for `q` outside `[0, 1]`
    fn ppf(&self, q: f64) -> f64;

    /// Inverse survival function, the level exceeded with probability `q`
    fn isf(&self, q: f64) -> f64;

    fn mean(&self) -> f64;
    fn variance(&self) -> f64;
    fn skewness(&self) -> f64;
    fn excess_kurtosis(&self) -> f64;

    /// Negative log-likelihood of a sample; `+∞` when a point lies outside
    /// the support
    fn nnlf(&self, data: &[f64]) -> f64 {
        -data.iter().map(|&x| self.logpdf(x)).sum::<f64>()
    }

    /// Draw `n` variates by inverting the CDF at open-interval uniforms
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R, n: usize) -> Vec<f64>
    where
        Self: Sized,
    {
        (0..n).map(|_| self.ppf(rng.sample::<f64, _>(Open01))).collect()
    }
}

fn validate_location_scale(location: f64, scale: f64) -> Result<()> {
    if !location.is_finite() {
        return Err(Error::InvalidInput(format!("location {location} is not finite")));
    }
    if !(scale.is_finite() && scale > 0.0) {
        return Err(Error::InvalidInput(format!(
            "scale {scale} must be finite and positive"
        )));
    }
    Ok(())
}

/// Gumbel (type I extreme value) distribution
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Gumbel {
    location: f64,
    scale: f64,
}

impl Gumbel {
    pub fn new(location: f64, scale: f64) -> Result<Self> {
        validate_location_scale(location, scale)?;
        Ok(Self { location, scale })
    }

    /// Level for a given `y = −ln F`
    fn level(&self, y: f64) -> f64 {
        self.location - self.scale * y.ln()
    }
}

impl ExtremeValueDistribution for Gumbel {
    fn shape(&self) -> f64 {
        0.0
    }

    fn location(&self) -> f64 {
        self.location
    }

    fn scale(&self) -> f64 {
        self.scale
    }

    fn logpdf(&self, x: f64) -> f64 {
        let z = (x - self.location) / self.scale;
        -self.scale.ln() - z - (-z).exp()
    }

    fn cdf(&self, x: f64) -> f64 {
        let z = (x - self.location) / self.scale;
        (-(-z).exp()).exp()
    }

    fn sf(&self, x: f64) -> f64 {
        let z = (x - self.location) / self.scale;
        -(-(-z).exp()).exp_m1()
    }

    fn ppf(&self, q: f64) -> f64 {
        if !(0.0..=1.0).contains(&q) {
            return f64::NAN;
        }
        self.level(-q.ln())
    }

    fn isf(&self, q: f64) -> f64 {
        if !(0.0..=1.0).contains(&q) {
            return f64::NAN;
        }
        self.level(-(-q).ln_1p())
    }

    fn mean(&self) -> f64 {
        self.location + EULER_GAMMA * self.scale
    }

    fn variance(&self) -> f64 {
        PI * PI / 6.0 * self.scale * self.scale
    }

    fn skewness(&self) -> f64 {
        GUMBEL_SKEWNESS
    }

    fn excess_kurtosis(&self) -> f64 {
        2.4
    }
}

/// Generalized extreme value distribution
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Gev {
    shape: f64,
    location: f64,
    scale: f64,
}

impl Gev {
    pub fn new(shape: f64, location: f64, scale: f64) -> Result<Self> {
        if !shape.is_finite() {
            return Err(Error::InvalidInput(format!("shape {shape} is not finite")));
        }
        validate_location_scale(location, scale)?;
        Ok(Self {
            shape,
            location,
            scale,
        })
    }

    fn is_gumbel(&self) -> bool {
        self.shape.abs() < SHAPE_EPS
    }

    /// `ln(1 − c·z)`, NaN outside the support
    fn log_base(&self, z: f64) -> f64 {
        let arg = -self.shape * z;
        if arg <= -1.0 {
            f64::NAN
        } else {
            arg.ln_1p()
        }
    }

    /// Level for a given `y = −ln F`
    fn level(&self, y: f64) -> f64 {
        if self.is_gumbel() {
            return self.location - self.scale * y.ln();
        }
        self.location - self.scale * (self.shape * y.ln()).exp_m1() / self.shape
    }

    /// `Γ(1 + k·c)` for `k = 1..=4`
    fn gammas(&self) -> [f64; 4] {
        [1.0, 2.0, 3.0, 4.0].map(|k| gamma(1.0 + k * self.shape))
    }
}

/// Theoretical GEV skewness as a function of the shape `c`
///
/// `+∞` where it is undefined (`c ≤ −1/3`).
pub fn gev_skewness(c: f64) -> f64 {
    if c.abs() < 1e-6 {
        return GUMBEL_SKEWNESS;
    }
    if c <= -1.0 / 3.0 {
        return f64::INFINITY;
    }
    let g1 = gamma(1.0 + c);
    let g2 = gamma(1.0 + 2.0 * c);
    let g3 = gamma(1.0 + 3.0 * c);
    let spread = g2 - g1 * g1;
    c.signum() * (-g3 + 3.0 * g1 * g2 - 2.0 * g1.powi(3)) / spread.powf(1.5)
}

impl ExtremeValueDistribution for Gev {
    fn shape(&self) -> f64 {
        self.shape
    }

    fn location(&self) -> f64 {
        self.location
    }

    fn scale(&self) -> f64 {
        self.scale
    }

    fn logpdf(&self, x: f64) -> f64 {
        let z = (x - self.location) / self.scale;
        if self.is_gumbel() {
            return -self.scale.ln() - z - (-z).exp();
        }
        let lb = self.log_base(z);
        if lb.is_nan() {
            return f64::NEG_INFINITY;
        }
        -self.scale.ln() + (1.0 / self.shape - 1.0) * lb - (lb / self.shape).exp()
    }

    fn cdf(&self, x: f64) -> f64 {
        let z = (x - self.location) / self.scale;
        if self.is_gumbel() {
            return (-(-z).exp()).exp();
        }
        let lb = self.log_base(z);
        if lb.is_nan() {
            // beyond the upper endpoint (c > 0) or below the lower one (c < 0)
            return if self.shape > 0.0 { 1.0 } else { 0.0 };
        }
        (-(lb / self.shape).exp()).exp()
    }

    fn sf(&self, x: f64) -> f64 {
        let z = (x - self.location) / self.scale;
        if self.is_gumbel() {
            return -(-(-z).exp()).exp_m1();
        }
        let lb = self.log_base(z);
        if lb.is_nan() {
            return if self.shape > 0.0 { 0.0 } else { 1.0 };
        }
        -(-(lb / self.shape).exp()).exp_m1()
    }

    fn ppf(&self, q: f64) -> f64 {
        if !(0.0..=1.0).contains(&q) {
            return f64::NAN;
        }
        self.level(-q.ln())
    }

    fn isf(&self, q: f64) -> f64 {
        if !(0.0..=1.0).contains(&q) {
            return f64::NAN;
        }
        self.level(-(-q).ln_1p())
    }

    fn mean(&self) -> f64 {
        if self.is_gumbel() {
            return self.location + EULER_GAMMA * self.scale;
        }
        if self.shape <= -1.0 {
            return f64::INFINITY;
        }
        let [g1, ..] = self.gammas();
        self.location + self.scale * (1.0 - g1) / self.shape
    }

    fn variance(&self) -> f64 {
        if self.is_gumbel() {
            return PI * PI / 6.0 * self.scale * self.scale;
        }
        if self.shape <= -0.5 {
            return f64::INFINITY;
        }
        let [g1, g2, ..] = self.gammas();
        self.scale * self.scale * (g2 - g1 * g1) / (self.shape * self.shape)
    }

    fn skewness(&self) -> f64 {
        if self.is_gumbel() {
            return GUMBEL_SKEWNESS;
        }
        gev_skewness(self.shape)
    }

    fn excess_kurtosis(&self) -> f64 {
        if self.shape.abs() < 1e-6 {
            return 2.4;
        }
        if self.shape <= -0.25 {
            return f64::INFINITY;
        }
        let [g1, g2, g3, g4] = self.gammas();
        let spread = g2 - g1 * g1;
        (g4 - 4.0 * g3 * g1 + 6.0 * g2 * g1 * g1 - 3.0 * g1.powi(4)) / (spread * spread) - 3.0
    }
}

/// A frozen GEV or Gumbel model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ExtremeValue {
    Gev(Gev),
    Gumbel(Gumbel),
}

macro_rules! delegate {
    ($self:ident, $d:ident => $body:expr) => {
        match $self {
            ExtremeValue::Gev($d) => $body,
            ExtremeValue::Gumbel($d) => $body,
        }
    };
}

impl ExtremeValueDistribution for ExtremeValue {
    fn shape(&self) -> f64 {
        delegate!(self, d => d.shape())
    }

    fn location(&self) -> f64 {
        delegate!(self, d => d.location())
    }

    fn scale(&self) -> f64 {
        delegate!(self, d => d.scale())
    }

    fn logpdf(&self, x: f64) -> f64 {
        delegate!(self, d => d.logpdf(x))
    }

    fn cdf(&self, x: f64) -> f64 {
        delegate!(self, d => d.cdf(x))
    }

    fn sf(&self, x: f64) -> f64 {
        delegate!(self, d => d.sf(x))
    }

    fn ppf(&self, q: f64) -> f64 {
        delegate!(self, d => d.ppf(q))
    }

    fn isf(&self, q: f64) -> f64 {
        delegate!(self, d => d.isf(q))
    }

    fn mean(&self) -> f64 {
        delegate!(self, d => d.mean())
    }

    fn variance(&self) -> f64 {
        delegate!(self, d => d.variance())
    }

    fn skewness(&self) -> f64 {
        delegate!(self, d => d.skewness())
    }

    fn excess_kurtosis(&self) -> f64 {
        delegate!(self, d => d.excess_kurtosis())
    }
}

impl From<Gev> for ExtremeValue {
    fn from(d: Gev) -> Self {
        Self::Gev(d)
    }
}

impl From<Gumbel> for ExtremeValue {
    fn from(d: Gumbel) -> Self {
        Self::Gumbel(d)
    }
}

impl fmt::Display for ExtremeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gev(d) => write!(
                f,
                "GEV(shape={:.4}, location={:.4}, scale={:.4})",
                d.shape, d.location, d.scale
            ),
            Self::Gumbel(d) => write!(
                f,
                "Gumbel(location={:.4}, scale={:.4})",
                d.location, d.scale
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::simpson;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_constructor_validation() {
        assert!(Gev::new(0.1, 0.0, 0.0).is_err());
        assert!(Gev::new(f64::NAN, 0.0, 1.0).is_err());
        assert!(Gumbel::new(f64::INFINITY, 1.0).is_err());
        assert!(Gumbel::new(0.0, -1.0).unwrap_err().is_configuration());
    }

    #[test]
    fn test_gumbel_quantiles() {
        let g = Gumbel::new(2.0, 0.5).unwrap();
        let q: f64 = 0.9;
        assert_relative_eq!(g.ppf(q), 2.0 - 0.5 * (-q.ln()).ln(), epsilon = 1e-12);
        assert_relative_eq!(g.cdf(g.ppf(q)), q, epsilon = 1e-12);
        assert_relative_eq!(g.isf(0.002), g.ppf(0.998), epsilon = 1e-9);
        assert!(g.ppf(1.5).is_nan());
        assert!(g.isf(-0.1).is_nan());
    }

    #[test]
    fn test_gev_reduces_to_gumbel() {
        let gev = Gev::new(0.0, 3.87, 0.2).unwrap();
        let gumbel = Gumbel::new(3.87, 0.2).unwrap();
        for x in [3.5, 3.9, 4.4, 5.0] {
            assert_relative_eq!(gev.cdf(x), gumbel.cdf(x), epsilon = 1e-14);
            assert_relative_eq!(gev.logpdf(x), gumbel.logpdf(x), epsilon = 1e-14);
        }
        let tiny = Gev::new(1e-9, 3.87, 0.2).unwrap();
        assert_relative_eq!(tiny.isf(0.01), gumbel.isf(0.01), epsilon = 1e-6);
    }

    #[test]
    fn test_gev_support() {
        // c > 0: upper endpoint at loc + scale / c
        let gev = Gev::new(0.5, 0.0, 1.0).unwrap();
        assert_eq!(gev.cdf(2.5), 1.0);
        assert_eq!(gev.sf(2.5), 0.0);
        assert_eq!(gev.logpdf(2.5), f64::NEG_INFINITY);
        assert_relative_eq!(gev.ppf(1.0), 2.0, epsilon = 1e-12);

        // c < 0: lower endpoint at loc + scale / c
        let gev = Gev::new(-0.5, 0.0, 1.0).unwrap();
        assert_eq!(gev.cdf(-2.5), 0.0);
        assert!(gev.nnlf(&[-2.5, 0.0]).is_infinite());
    }

    #[test]
    fn test_gev_roundtrip_and_density() {
        let gev = Gev::new(-0.2, 10.0, 2.0).unwrap();
        for q in [0.01, 0.3, 0.5, 0.9, 0.999] {
            assert_relative_eq!(gev.cdf(gev.ppf(q)), q, epsilon = 1e-12);
            assert_relative_eq!(gev.sf(gev.isf(q)), q, epsilon = 1e-12);
        }
        let mass = simpson(|x| gev.pdf(x), gev.ppf(1e-12), gev.ppf(0.999), 20_000);
        assert_relative_eq!(mass, 0.999, epsilon = 1e-5);
    }

    #[test]
    fn test_gev_moments_match_integration() {
        let gev = Gev::new(0.1, 1.0, 0.5).unwrap();
        let lo = gev.ppf(1e-14);
        let hi = gev.ppf(1.0);
        let mean = simpson(|x| x * gev.pdf(x), lo, hi - 1e-9, 200_000);
        assert_relative_eq!(gev.mean(), mean, epsilon = 1e-5);
        let var = simpson(|x| (x - mean).powi(2) * gev.pdf(x), lo, hi - 1e-9, 200_000);
        assert_relative_eq!(gev.variance(), var, epsilon = 1e-5);
    }

    #[test]
    fn test_gev_skewness_limits() {
        assert_relative_eq!(gev_skewness(0.0), GUMBEL_SKEWNESS);
        assert_relative_eq!(gev_skewness(1e-4), GUMBEL_SKEWNESS, epsilon = 1e-3);
        assert_relative_eq!(gev_skewness(-1e-4), GUMBEL_SKEWNESS, epsilon = 1e-3);
        assert!(gev_skewness(-0.4).is_infinite());
        // bounded tail gives smaller skewness than Gumbel, heavy tail larger
        assert!(gev_skewness(0.2) < GUMBEL_SKEWNESS);
        assert!(gev_skewness(-0.1) > GUMBEL_SKEWNESS);
        let gumbel = Gev::new(0.0, 0.0, 1.0).unwrap();
        assert_relative_eq!(gumbel.excess_kurtosis(), 2.4);
    }

    #[test]
    fn test_sampling_is_reproducible() {
        let model = ExtremeValue::from(Gev::new(0.05, 3.87, 0.2).unwrap());
        let mut rng = StdRng::seed_from_u64(42);
        let a = model.sample(&mut rng, 100);
        let mut rng = StdRng::seed_from_u64(42);
        let b = model.sample(&mut rng, 100);
        assert_eq!(a, b);
        assert!(a.iter().all(|x| x.is_finite()));
        // c > 0 bounds the sample above
        assert!(a.iter().all(|&x| x <= 3.87 + 0.2 / 0.05));
    }

    #[test]
    fn test_display() {
        let model = ExtremeValue::from(Gumbel::new(1.0, 2.0).unwrap());
        assert_eq!(model.to_string(), "Gumbel(location=1.0000, scale=2.0000)");
    }
}
