//! `(tau, kappa_max)` heat-map grids.

use crate::allocation::FLUX_PARITY_START;
use crate::error::{SweepError, SweepResult};
use fp_core::{Real, Tolerances, nearly_equal};
use fp_equilibrium::{AllocationPolicy, EquilibrationOptions, EquilibriumConfig, equilibrate_fpm};
use fp_model::RateConstants;
use nalgebra::DMatrix;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One row of a parameter sweep table.
///
/// `tau` is the column name of the reference table. It holds the charging
/// balance at which the allocation sensor is half-maximal
/// ([`RateConstants::charging_threshold`]), the quantity that moves the
/// regulated equilibrium.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParameterSweepRow {
    pub tau: Real,
    pub kappa_max: Real,
    pub nu_max: Real,
    #[serde(alias = "phiRb")]
    pub phi_rb: Real,
}

/// Equilibrium allocation on a dense `tau` × `kappa_max` grid.
///
/// Rows follow ascending `tau`, columns ascending `kappa_max`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterGrid {
    pub nu_max: Real,
    pub taus: Vec<Real>,
    pub kappas: Vec<Real>,
    pub values: DMatrix<Real>,
}

fn sorted_unique(mut v: Vec<Real>, tol: Tolerances) -> Vec<Real> {
    v.sort_by(|a, b| a.total_cmp(b));
    v.dedup_by(|a, b| nearly_equal(*a, *b, tol));
    v
}

fn position(axis: &[Real], v: Real, tol: Tolerances) -> Option<usize> {
    axis.iter().position(|&a| nearly_equal(a, v, tol))
}

impl ParameterGrid {
    /// Build the grid from the rows matching `nu_max`.
    ///
    /// Every `(tau, kappa_max)` combination present in the filtered rows must
    /// appear exactly once.
    pub fn from_rows(rows: &[ParameterSweepRow], nu_max: Real) -> SweepResult<Self> {
        let tol = Tolerances::default();
        let selected: Vec<&ParameterSweepRow> = rows
            .iter()
            .filter(|r| nearly_equal(r.nu_max, nu_max, tol))
            .collect();
        if selected.is_empty() {
            return Err(SweepError::NoRows { nu_max });
        }

        let taus = sorted_unique(selected.iter().map(|r| r.tau).collect(), tol);
        let kappas = sorted_unique(selected.iter().map(|r| r.kappa_max).collect(), tol);

        let mut cells: DMatrix<Option<Real>> = DMatrix::from_element(taus.len(), kappas.len(), None);
        for r in &selected {
            // Both lookups succeed: the axes were built from these rows
            let (Some(i), Some(j)) = (position(&taus, r.tau, tol), position(&kappas, r.kappa_max, tol))
            else {
                continue;
            };
            if cells[(i, j)].replace(r.phi_rb).is_some() {
                return Err(SweepError::DuplicateCell {
                    tau: r.tau,
                    kappa_max: r.kappa_max,
                });
            }
        }

        let mut values = DMatrix::zeros(taus.len(), kappas.len());
        for i in 0..taus.len() {
            for j in 0..kappas.len() {
                values[(i, j)] = cells[(i, j)].ok_or(SweepError::MissingCell {
                    tau: taus[i],
                    kappa_max: kappas[j],
                })?;
            }
        }

        Ok(Self {
            nu_max,
            taus,
            kappas,
            values,
        })
    }

    /// Grid of differences from a reference allocation.
    pub fn relative_to(&self, reference: Real) -> Self {
        Self {
            values: self.values.map(|v| v - reference),
            ..self.clone()
        }
    }

    /// `(tau count, kappa_max count)`.
    pub fn shape(&self) -> (usize, usize) {
        self.values.shape()
    }

    pub fn get(&self, tau_index: usize, kappa_index: usize) -> Option<Real> {
        self.values.get((tau_index, kappa_index)).copied()
    }
}

/// Rows produced by [`sweep_tau_kappa`].
#[derive(Debug, Clone, PartialEq)]
pub struct TauKappaSweep {
    pub rows: Vec<ParameterSweepRow>,
    /// Combinations whose equilibration failed (absent from `rows`)
    pub num_failed: usize,
}

/// Regulated equilibrium allocation for every `(tau, kappa_max)` pair at
/// the constants' `nu_max`.
///
/// Each `tau` sets the sensor's `charging_threshold`; the allocation response
/// time `constants.tau` is left as given.
pub fn sweep_tau_kappa(
    constants: &RateConstants,
    taus: &[Real],
    kappas: &[Real],
    options: &EquilibrationOptions,
) -> TauKappaSweep {
    let pairs: Vec<(Real, Real)> = taus
        .iter()
        .flat_map(|&tau| kappas.iter().map(move |&kappa| (tau, kappa)))
        .collect();

    let results: Vec<Option<ParameterSweepRow>> = pairs
        .par_iter()
        .map(|&(tau, kappa_max)| {
            let c = constants
                .with_charging_threshold(tau)
                .with_kappa_max(kappa_max);
            let cfg = EquilibriumConfig::new(c, AllocationPolicy::dynamic(FLUX_PARITY_START));
            match equilibrate_fpm(&cfg, options) {
                Ok(state) => Some(ParameterSweepRow {
                    tau,
                    kappa_max,
                    nu_max: c.nu_max,
                    phi_rb: state.ribosomal_fraction(),
                }),
                Err(e) => {
                    debug!(tau, kappa_max, error = %e, "grid point failed");
                    None
                }
            }
        })
        .collect();

    let num_failed = results.iter().filter(|r| r.is_none()).count();
    TauKappaSweep {
        rows: results.into_iter().flatten().collect(),
        num_failed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(tau: Real, kappa_max: Real, nu_max: Real, phi_rb: Real) -> ParameterSweepRow {
        ParameterSweepRow {
            tau,
            kappa_max,
            nu_max,
            phi_rb,
        }
    }

    fn table() -> Vec<ParameterSweepRow> {
        let mut rows = Vec::new();
        for (i, tau) in [0.1, 1.0].iter().enumerate() {
            for (j, kappa) in [1e-4, 1e-3, 1e-2].iter().enumerate() {
                rows.push(row(*tau, *kappa, 4.5, 0.1 * i as Real + 0.01 * j as Real));
                rows.push(row(*tau, *kappa, 2.0, 0.5));
            }
        }
        rows
    }

    #[test]
    fn grid_groups_by_tau_and_kappa() {
        let grid = ParameterGrid::from_rows(&table(), 4.5).unwrap();
        assert_eq!(grid.shape(), (2, 3));
        assert_eq!(grid.taus, vec![0.1, 1.0]);
        assert!((grid.get(1, 2).unwrap() - 0.12).abs() < 1e-12);
        assert!((grid.get(0, 0).unwrap()).abs() < 1e-12);
        assert!(grid.get(2, 0).is_none());
    }

    #[test]
    fn grid_is_order_independent() {
        let mut rows = table();
        rows.reverse();
        assert_eq!(
            ParameterGrid::from_rows(&rows, 4.5).unwrap(),
            ParameterGrid::from_rows(&table(), 4.5).unwrap()
        );
    }

    #[test]
    fn relative_grid_subtracts_reference() {
        let grid = ParameterGrid::from_rows(&table(), 4.5).unwrap();
        let rel = grid.relative_to(0.1);
        assert!((rel.get(1, 0).unwrap()).abs() < 1e-12);
        assert!((rel.get(0, 0).unwrap() + 0.1).abs() < 1e-12);
    }

    #[test]
    fn missing_cell_is_an_error() {
        let mut rows = table();
        rows.retain(|r| !(r.tau == 1.0 && r.kappa_max == 1e-3 && r.nu_max == 4.5));
        let err = ParameterGrid::from_rows(&rows, 4.5).unwrap_err();
        assert!(matches!(err, SweepError::MissingCell { .. }));
    }

    #[test]
    fn duplicate_cell_is_an_error() {
        let mut rows = table();
        rows.push(row(0.1, 1e-4, 4.5, 0.3));
        let err = ParameterGrid::from_rows(&rows, 4.5).unwrap_err();
        assert!(matches!(err, SweepError::DuplicateCell { .. }));
    }

    #[test]
    fn unknown_nu_max_is_an_error() {
        let err = ParameterGrid::from_rows(&table(), 9.0).unwrap_err();
        assert_eq!(err, SweepError::NoRows { nu_max: 9.0 });
    }

    #[test]
    fn rows_accept_reference_column_name() {
        let r: ParameterSweepRow =
            serde_json::from_str(r#"{"tau": 1.0, "kappa_max": 0.001, "nu_max": 4.5, "phiRb": 0.15}"#)
                .unwrap();
        assert_eq!(r.phi_rb, 0.15);
    }
}
