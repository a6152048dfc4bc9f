//! Stability diagnostics returned alongside bootstrap intervals

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of replicates on each side of the ensemble treated as its tail
pub const NEAR_EXTREMAL_WINDOW: usize = 10;

/// How far into the tail of the replicate ensemble a percentile index falls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InstabilitySeverity {
    /// An index is the smallest or largest replicate
    Extremal,
    /// An index is among the most extreme replicates on either side
    NearExtremal,
    /// Some replicates failed and were left out of the ensemble
    DroppedReplicates,
}

/// Non-fatal warning that a percentile interval rests on too few replicates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstabilityWarning {
    pub severity: InstabilitySeverity,
    pub lower_index: usize,
    pub upper_index: usize,
    pub n_resamples: usize,
    /// Replicates left out of the ensemble; zero for index warnings
    pub dropped: usize,
}

impl InstabilityWarning {
    /// Inspect a pair of percentile indices into an ensemble of `n` replicates
    ///
    /// Extremal takes precedence: an index at `0` or `n − 1` never also
    /// produces the milder warning.
    pub fn check(lower_index: usize, upper_index: usize, n_resamples: usize) -> Option<Self> {
        let last = n_resamples.saturating_sub(1);
        let severity = if lower_index == 0 || upper_index == last {
            InstabilitySeverity::Extremal
        } else if lower_index < NEAR_EXTREMAL_WINDOW
            || upper_index >= n_resamples.saturating_sub(NEAR_EXTREMAL_WINDOW)
        {
            InstabilitySeverity::NearExtremal
        } else {
            return None;
        };
        Some(Self {
            severity,
            lower_index,
            upper_index,
            n_resamples,
            dropped: 0,
        })
    }

    /// Warning for `dropped` of `n_resamples` replicates whose statistic failed
    pub fn dropped(dropped: usize, n_resamples: usize) -> Self {
        Self {
            severity: InstabilitySeverity::DroppedReplicates,
            lower_index: 0,
            upper_index: 0,
            n_resamples,
            dropped,
        }
    }
}

impl fmt::Display for InstabilityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.severity {
            InstabilitySeverity::Extremal => write!(
                f,
                "percentile interval uses the extremal replicate (indices {} and {} of {}); \
                 results are unstable, increase the number of resamples",
                self.lower_index, self.upper_index, self.n_resamples
            ),
            InstabilitySeverity::NearExtremal => write!(
                f,
                "percentile interval uses one of the {} most extreme replicates \
                 (indices {} and {} of {}); results may be unstable",
                NEAR_EXTREMAL_WINDOW, self.lower_index, self.upper_index, self.n_resamples
            ),
            InstabilitySeverity::DroppedReplicates => write!(
                f,
                "{} of {} bootstrap replicates failed and were dropped; \
                 the interval rests on the remaining {}",
                self.dropped,
                self.n_resamples,
                self.n_resamples - self.dropped
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extremal_indices() {
        let w = InstabilityWarning::check(0, 5, 10).unwrap();
        assert_eq!(w.severity, InstabilitySeverity::Extremal);
        let w = InstabilityWarning::check(3, 99, 100).unwrap();
        assert_eq!(w.severity, InstabilitySeverity::Extremal);
    }

    #[test]
    fn test_near_extremal_indices() {
        let w = InstabilityWarning::check(9, 50, 100).unwrap();
        assert_eq!(w.severity, InstabilitySeverity::NearExtremal);
        let w = InstabilityWarning::check(20, 90, 100).unwrap();
        assert_eq!(w.severity, InstabilitySeverity::NearExtremal);
    }

    #[test]
    fn test_stable_indices() {
        // 500 replicates at alpha = 0.05
        assert!(InstabilityWarning::check(12, 487, 500).is_none());
        assert!(InstabilityWarning::check(10, 89, 100).is_none());
    }

    #[test]
    fn test_dropped_replicates() {
        let w = InstabilityWarning::dropped(3, 500);
        assert_eq!(w.severity, InstabilitySeverity::DroppedReplicates);
        assert_eq!(
            w.to_string(),
            "3 of 500 bootstrap replicates failed and were dropped; the interval rests on the remaining 497"
        );
        assert_eq!(InstabilityWarning::check(12, 487, 500), None);
    }

    #[test]
    fn test_display_mentions_indices() {
        let w = InstabilityWarning::check(0, 19, 20).unwrap();
        let text = w.to_string();
        assert!(text.contains("extremal"));
        assert!(text.contains("19"));
    }
}
