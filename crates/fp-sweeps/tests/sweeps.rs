use fp_core::linspace;
use fp_equilibrium::{AllocationPolicy, EquilibrationOptions, EquilibrationStrategy};
use fp_model::{RateConstants, allocation_range};
use fp_sweeps::*;

fn regulated_constants() -> RateConstants {
    RateConstants::default().with_tau(0.1)
}

#[test]
fn nu_sweep_is_continuous_and_bounded() {
    let c = regulated_constants();
    let nus = SweepDefinition::linear(0.5, 20.0, 40).unwrap().generate_points();
    let sweep = sweep_nu_max(
        &c,
        AllocationPolicy::dynamic(0.1),
        &nus,
        &EquilibrationOptions::default(),
    );

    assert_eq!(sweep.outcome.num_failed, 0);
    assert_eq!(sweep.nu_max(), nus.as_slice());

    let phis: Vec<f64> = sweep.phi_rb().into_iter().flatten().collect();
    assert_eq!(phis.len(), nus.len());
    assert!(phis.iter().all(|&p| p > 0.0 && p < c.max_allocation()));
    for w in phis.windows(2) {
        assert!((w[1] - w[0]).abs() < 0.03, "jump {} -> {}", w[0], w[1]);
    }
    for d in sweep.difference().into_iter().flatten() {
        assert!(d.abs() < 0.02, "difference from optimum {}", d);
    }
}

#[test]
fn tent_sweep_peaks_near_optimum() {
    let c = RateConstants::default();
    let phis = linspace(0.05, 0.4, 8);
    let sweep = sweep_allocation(&c, &phis, &EquilibrationOptions::default());

    assert_eq!(sweep.outcome.num_successful, 8);
    let points: Vec<TentPoint> = sweep.outcome.states.iter().flatten().copied().collect();

    // Charging balance falls as ribosomes take a larger share
    for w in points.windows(2) {
        assert!(w[1].balance < w[0].balance);
    }
    // Charged molecules are made before they are consumed
    for p in &points {
        assert!(p.metabolic_flux >= p.translational_flux);
    }

    let peak = sweep
        .relative_translational_flux()
        .iter()
        .zip(sweep.phi_rb())
        .filter_map(|(f, phi)| f.map(|f| (f, *phi)))
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, phi)| phi)
        .unwrap();
    assert!((peak - sweep.optimal_phi_rb).abs() <= 0.05);

    let fp = sweep.flux_parity_phi_rb.expect("regulated point should converge");
    assert!((fp - sweep.optimal_phi_rb).abs() < 0.02);
    assert!(sweep.optimal_growth_rate > 0.0);
}

#[test]
fn newton_tent_covers_whole_range() {
    let c = RateConstants::default();
    let phis = allocation_range(c.phi_o, 30);
    let opts = EquilibrationOptions::default().with_strategy(EquilibrationStrategy::Newton);
    let sweep = sweep_allocation(&c, &phis, &opts);
    assert_eq!(sweep.outcome.num_failed, 0);
    assert_eq!(sweep.outcome.len(), 30);
}

#[test]
fn relaxation_tent_reports_slow_extremes_as_failures() {
    let c = RateConstants::default();
    let sweep = sweep_allocation(&c, &[0.001, 0.2, 0.449], &EquilibrationOptions::default());
    assert!(sweep.outcome.states[1].is_some());
    assert_eq!(sweep.outcome.num_failed, 2);
    assert_eq!(sweep.outcome.successful_values(), vec![0.2]);
}

#[test]
fn tau_kappa_grid_from_sweep() {
    let c = RateConstants::default();
    let taus = [0.1, 1.0, 10.0];
    let kappas = SweepDefinition::logarithmic(1e-4, 1e-2, 3).unwrap().generate_points();
    let opts = EquilibrationOptions::default().with_strategy(EquilibrationStrategy::Newton);

    let sweep = sweep_tau_kappa(&c, &taus, &kappas, &opts);
    assert_eq!(sweep.num_failed, 0);
    assert_eq!(sweep.rows.len(), 9);

    let grid = ParameterGrid::from_rows(&sweep.rows, c.nu_max).unwrap();
    assert_eq!(grid.shape(), (3, 3));

    for j in 0..3 {
        // A higher sensor threshold holds the regulated allocation lower
        let column: Vec<f64> = (0..3).map(|i| grid.get(i, j).unwrap()).collect();
        assert!(
            column[0] > column[1] && column[1] > column[2],
            "kappa index {}: {:?}",
            j,
            column
        );
    }
    // Row spread across tau at low kappa_max
    assert!(grid.get(0, 0).unwrap() - grid.get(2, 0).unwrap() > 0.1);

    for i in 0..2 {
        // More transfer-molecule synthesis lowers the regulated allocation
        assert!(grid.get(i, 0).unwrap() > grid.get(i, 2).unwrap());
    }

    // The unit-threshold row is the default regulated equilibrium
    let opt = fp_model::phi_rb_optimal_allocation(c.gamma_max, c.nu_max, c.kd_cpc, c.phi_o);
    assert!((grid.get(1, 1).unwrap() - opt).abs() < 0.02);

    let rel = grid.relative_to(0.15);
    assert!((rel.get(0, 1).unwrap() - (grid.get(0, 1).unwrap() - 0.15)).abs() < 1e-15);
}

#[test]
fn grid_leaves_response_time_alone() {
    let c = RateConstants::default();
    let opts = EquilibrationOptions::default().with_strategy(EquilibrationStrategy::Newton);
    let sweep = sweep_tau_kappa(&c.with_tau(0.1), &[1.0], &[c.kappa_max], &opts);
    let reference = sweep_tau_kappa(&c, &[1.0], &[c.kappa_max], &opts);
    assert_eq!(sweep.rows.len(), 1);
    assert!((sweep.rows[0].phi_rb - reference.rows[0].phi_rb).abs() < 1e-4);
}
