use fp_solver::*;
use nalgebra::{DMatrix, DVector};

/// Saturating production balanced by first-order decay:
/// a * y / (y + k) - d * x = 0,  x - y^2 = 0
fn residual(x: &DVector<f64>) -> SolverResult<DVector<f64>> {
    let (a, k, d) = (2.0, 0.5, 1.0);
    Ok(DVector::from_vec(vec![
        a * x[1] / (x[1] + k) - d * x[0],
        x[0] - x[1] * x[1],
    ]))
}

#[test]
fn fd_newton_solves_coupled_system() {
    let jac = |x: &DVector<f64>| finite_difference_jacobian(x, residual, 1e-7);
    let config = NewtonConfig {
        abs_tol: 1e-12,
        rel_tol: 0.0,
        positivity: Positivity::All,
        ..Default::default()
    };
    let result = newton_solve(DVector::from_vec(vec![1.0, 1.0]), residual, jac, &config).unwrap();

    assert!(result.converged);
    let r = residual(&result.x).unwrap();
    assert!(r.norm() < 1e-10, "residual = {}", r.norm());
    assert!(result.x.iter().all(|&v| v > 0.0));
}

#[test]
fn central_and_forward_jacobians_agree() {
    let x = DVector::from_vec(vec![0.7, 0.9]);
    let fwd = finite_difference_jacobian(&x, residual, 1e-7).unwrap();
    let ctr = central_difference_jacobian(&x, residual, 1e-6).unwrap();
    let diff: DMatrix<f64> = fwd - ctr;
    assert!(diff.amax() < 1e-5);
}

#[test]
fn non_finite_start_is_rejected() {
    let bad = |_: &DVector<f64>| -> SolverResult<DVector<f64>> {
        Ok(DVector::from_element(1, f64::NAN))
    };
    let jac = |x: &DVector<f64>| finite_difference_jacobian(x, bad, 1e-7);
    let err = newton_solve(DVector::from_element(1, 1.0), bad, jac, &NewtonConfig::default())
        .unwrap_err();
    assert!(matches!(err, SolverError::InvalidState { .. }));
}
