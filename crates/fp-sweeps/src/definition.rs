//! Sweep range generation.

use crate::error::{SweepError, SweepResult};
use fp_core::{Real, linspace};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Type of sweep progression.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SweepType {
    /// Uniformly spaced points
    #[default]
    Linear,
    /// Logarithmically spaced points
    Logarithmic,
}

/// Definition of a single parameter sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepDefinition {
    pub start: Real,
    pub end: Real,
    /// Number of points to generate
    pub num_points: usize,
    /// Spacing type
    #[serde(default)]
    pub sweep_type: SweepType,
}

impl SweepDefinition {
    /// Create a validated sweep.
    pub fn new(start: Real, end: Real, num_points: usize, sweep_type: SweepType) -> SweepResult<Self> {
        let sweep = SweepDefinition {
            start,
            end,
            num_points,
            sweep_type,
        };
        sweep.validate()?;
        Ok(sweep)
    }

    pub fn linear(start: Real, end: Real, num_points: usize) -> SweepResult<Self> {
        Self::new(start, end, num_points, SweepType::Linear)
    }

    pub fn logarithmic(start: Real, end: Real, num_points: usize) -> SweepResult<Self> {
        Self::new(start, end, num_points, SweepType::Logarithmic)
    }

    /// Check bounds and point count; needed after deserializing.
    pub fn validate(&self) -> SweepResult<()> {
        if !(self.start.is_finite() && self.end.is_finite()) {
            return Err(SweepError::InvalidConfiguration(
                "Sweep bounds must be finite".to_string(),
            ));
        }
        if self.num_points < 2 {
            return Err(SweepError::InvalidConfiguration(
                "Sweep must have at least 2 points".to_string(),
            ));
        }
        if (self.start - self.end).abs() < 1e-12 {
            return Err(SweepError::InvalidConfiguration(
                "Start and end values must be different".to_string(),
            ));
        }
        if self.sweep_type == SweepType::Logarithmic && (self.start <= 0.0 || self.end <= 0.0) {
            return Err(SweepError::InvalidConfiguration(
                "Logarithmic sweep bounds must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Generate all points in the sweep.
    pub fn generate_points(&self) -> Vec<Real> {
        match self.sweep_type {
            SweepType::Linear => linspace(self.start, self.end, self.num_points),
            SweepType::Logarithmic => self.generate_logarithmic(),
        }
    }

    fn generate_logarithmic(&self) -> Vec<Real> {
        let mut points: Vec<Real> = linspace(self.start.ln(), self.end.ln(), self.num_points)
            .into_iter()
            .map(Real::exp)
            .collect();

        // Ensure exact endpoints
        if let Some(first) = points.first_mut() {
            *first = self.start;
        }
        if let Some(last) = points.last_mut() {
            *last = self.end;
        }
        points
    }
}

impl fmt::Display for SweepType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linear => write!(f, "Linear"),
            Self::Logarithmic => write!(f, "Logarithmic"),
        }
    }
}

impl fmt::Display for SweepDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Sweep from {} to {} ({} points, {})",
            self.start, self.end, self.num_points, self.sweep_type
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_sweep_generation() {
        let sweep = SweepDefinition::linear(0.5, 20.0, 200).unwrap();
        let points = sweep.generate_points();
        assert_eq!(points.len(), 200);
        assert_eq!(points[0], 0.5);
        assert_eq!(points[199], 20.0);
        assert!(points.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn logarithmic_sweep_generation() {
        let sweep = SweepDefinition::logarithmic(1e-3, 1e1, 3).unwrap();
        let points = sweep.generate_points();
        assert_eq!(points.len(), 3);
        assert_eq!(points[0], 1e-3);
        assert_eq!(points[2], 1e1);
        let expected_mid = (1e-3_f64 * 1e1_f64).sqrt();
        assert!((points[1] - expected_mid).abs() / expected_mid < 1e-9);
    }

    #[test]
    fn reject_invalid_point_count() {
        assert!(SweepDefinition::linear(0.5, 20.0, 1).is_err());
    }

    #[test]
    fn reject_identical_bounds() {
        assert!(SweepDefinition::linear(4.5, 4.5, 5).is_err());
    }

    #[test]
    fn reject_non_positive_log_bounds() {
        let err = SweepDefinition::logarithmic(0.0, 10.0, 5).unwrap_err();
        assert!(err.to_string().contains("positive"));
    }

    #[test]
    fn display_mentions_spacing() {
        let sweep = SweepDefinition::logarithmic(0.1, 10.0, 5).unwrap();
        assert!(sweep.to_string().contains("Logarithmic"));
    }
}
