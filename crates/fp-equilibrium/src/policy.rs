//! Ribosomal allocation policies.

use fp_core::Real;
use fp_model::{ModelResult, RateConstants};
use serde::{Deserialize, Serialize};

/// How the ribosomal allocation `phi_rb` behaves during equilibration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AllocationPolicy {
    /// Held constant at `phi_rb`.
    Fixed { phi_rb: Real },
    /// Starts at `initial_phi_rb` and relaxes toward the allocation signalled
    /// by the charging balance with time constant `tau`.
    Dynamic { initial_phi_rb: Real },
}

impl AllocationPolicy {
    pub fn fixed(phi_rb: Real) -> Self {
        AllocationPolicy::Fixed { phi_rb }
    }

    pub fn dynamic(initial_phi_rb: Real) -> Self {
        AllocationPolicy::Dynamic { initial_phi_rb }
    }

    /// Allocation in force at t = 0.
    pub fn initial_phi_rb(&self) -> Real {
        match *self {
            AllocationPolicy::Fixed { phi_rb } => phi_rb,
            AllocationPolicy::Dynamic { initial_phi_rb } => initial_phi_rb,
        }
    }

    pub fn is_dynamic(&self) -> bool {
        matches!(self, AllocationPolicy::Dynamic { .. })
    }

    /// Same policy with its allocation clamped to `[0, upper]`.
    pub fn clamped(self, upper: Real) -> Self {
        match self {
            AllocationPolicy::Fixed { phi_rb } => AllocationPolicy::fixed(phi_rb.clamp(0.0, upper)),
            AllocationPolicy::Dynamic { initial_phi_rb } => {
                AllocationPolicy::dynamic(initial_phi_rb.clamp(0.0, upper))
            }
        }
    }

    /// Check the allocation lies in `[0, 1 - phi_o]`.
    pub fn validate(&self, constants: &RateConstants) -> ModelResult<()> {
        constants.validate_allocation(self.initial_phi_rb())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_tagged_form() {
        let p: AllocationPolicy =
            serde_json::from_str(r#"{"kind": "fixed", "phi_rb": 0.2}"#).unwrap();
        assert_eq!(p, AllocationPolicy::fixed(0.2));

        let p: AllocationPolicy =
            serde_json::from_str(r#"{"kind": "dynamic", "initial_phi_rb": 0.1}"#).unwrap();
        assert!(p.is_dynamic());
        assert_eq!(p.initial_phi_rb(), 0.1);
    }

    #[test]
    fn validation_uses_phi_o() {
        let c = RateConstants::default();
        assert!(AllocationPolicy::fixed(0.45).validate(&c).is_ok());
        assert!(AllocationPolicy::fixed(0.5).validate(&c).is_err());
        assert!(AllocationPolicy::dynamic(-0.1).validate(&c).is_err());
    }

    #[test]
    fn clamp_pulls_rounded_bound_inside() {
        let c = RateConstants::default();
        let p = AllocationPolicy::fixed(0.45).clamped(c.max_allocation());
        assert_eq!(p.initial_phi_rb(), c.max_allocation());
        let p = AllocationPolicy::dynamic(0.2).clamped(c.max_allocation());
        assert_eq!(p, AllocationPolicy::dynamic(0.2));
    }
}
