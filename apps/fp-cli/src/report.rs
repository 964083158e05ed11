//! CSV and text rendering of model results.

use crate::error::{AppError, AppResult};
use fp_core::Real;
use fp_equilibrium::EquilibriumState;
use fp_model::{
    RateConstants, SteadyStateProfile, optimal_allocation_over_nu, steady_state_gamma,
    steady_state_growth_rate,
};
use fp_sweeps::{AllocationSweep, NuMaxSweep};

fn cell(v: Option<Real>) -> String {
    v.map(|x| x.to_string()).unwrap_or_default()
}

/// Render a header and rows as CSV text.
fn render(header: &[&str], rows: impl IntoIterator<Item = Vec<String>>) -> AppResult<String> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.write_record(header)?;
    for row in rows {
        writer.write_record(&row)?;
    }
    let data = writer
        .into_inner()
        .map_err(|e| AppError::Render(format!("Failed to get CSV data: {}", e)))?;
    String::from_utf8(data).map_err(|e| AppError::Render(format!("Invalid UTF-8 in CSV: {}", e)))
}

pub fn steady_state_csv(profile: &SteadyStateProfile) -> AppResult<String> {
    let rows = (0..profile.len()).map(|i| {
        vec![
            profile.phi_rb[i].to_string(),
            profile.growth_rate[i].to_string(),
            profile.relative_growth[i].to_string(),
            profile.relative_precursors[i].to_string(),
            profile.relative_gamma[i].to_string(),
        ]
    });
    render(
        &[
            "phi_rb",
            "growth_rate",
            "relative_growth",
            "relative_precursors",
            "relative_gamma",
        ],
        rows,
    )
}

pub fn optimal_csv(c: &RateConstants, nu_values: &[Real]) -> AppResult<String> {
    let optimal = optimal_allocation_over_nu(c, nu_values);
    let rows = nu_values.iter().zip(&optimal).map(|(&nu, &phi)| {
        let lam = steady_state_growth_rate(c.gamma_max, phi, nu, c.kd_cpc, c.phi_o);
        let gamma = steady_state_gamma(c.gamma_max, phi, nu, c.kd_cpc, c.phi_o);
        vec![nu.to_string(), phi.to_string(), lam.to_string(), gamma.to_string()]
    });
    render(&["nu_max", "phi_rb", "growth_rate", "gamma"], rows)
}

pub fn nu_sweep_csv(sweep: &NuMaxSweep) -> AppResult<String> {
    let phi = sweep.phi_rb();
    let diff = sweep.difference();
    let rows = sweep.nu_max().iter().enumerate().map(|(i, nu)| {
        vec![
            nu.to_string(),
            cell(phi[i]),
            sweep.optimal_phi_rb[i].to_string(),
            cell(diff[i]),
        ]
    });
    render(&["nu_max", "phi_rb", "phi_rb_optimal", "difference"], rows)
}

pub fn allocation_sweep_csv(sweep: &AllocationSweep) -> AppResult<String> {
    let rel_met = sweep.relative_metabolic_flux();
    let rel_tr = sweep.relative_translational_flux();
    let rows = sweep.phi_rb().iter().enumerate().map(|(i, phi)| {
        let point = sweep.outcome.states[i].as_ref();
        vec![
            phi.to_string(),
            cell(point.map(|p| p.metabolic_flux)),
            cell(point.map(|p| p.translational_flux)),
            cell(rel_met[i]),
            cell(rel_tr[i]),
            cell(point.map(|p| p.uncharged_taa)),
            cell(point.map(|p| p.charged_taa)),
            cell(point.map(|p| p.balance)),
        ]
    });
    render(
        &[
            "phi_rb",
            "metabolic_flux",
            "translational_flux",
            "relative_metabolic_flux",
            "relative_translational_flux",
            "uncharged_taa",
            "charged_taa",
            "balance",
        ],
        rows,
    )
}

pub fn equilibrium_summary(state: &EquilibriumState, c: &RateConstants) -> String {
    let fluxes = state.fluxes(c);
    let mut out = format!(
        "Equilibrium after {} rounds (residual {:.3e})\n",
        state.iterations, state.residual
    );
    out.push_str("\nState:\n");
    out.push_str(&format!("  M       {:.6e}\n", state.total_biomass));
    out.push_str(&format!("  M_Rb    {:.6e}\n", state.ribosomal_biomass));
    out.push_str(&format!("  M_Mb    {:.6e}\n", state.metabolic_biomass));
    out.push_str(&format!("  T_AA    {:.6e}\n", state.uncharged_taa));
    out.push_str(&format!("  T_AA*   {:.6e}\n", state.charged_taa));
    out.push_str(&format!("  phi_rb  {:.6}\n", state.phi_rb));
    out.push_str("\nDerived:\n");
    out.push_str(&format!("  ribosomal fraction  {:.6}\n", state.ribosomal_fraction()));
    out.push_str(&format!("  growth rate         {:.6} hr^-1\n", state.growth_rate(c)));
    out.push_str(&format!(
        "  gamma / gamma_max   {:.6}\n",
        state.translation_rate(c) / c.gamma_max
    ));
    out.push_str(&format!(
        "  nu / nu_max         {:.6}\n",
        state.metabolic_rate(c) / c.nu_max
    ));
    out.push_str(&format!("  charging balance    {:.6e}\n", state.charging_balance()));
    out.push_str(&format!("  metabolic flux      {:.6}\n", fluxes.metabolic));
    out.push_str(&format!("  translational flux  {:.6}\n", fluxes.translational));
    out
}
