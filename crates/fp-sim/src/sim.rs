//! Simulation runner and result recording.

use crate::error::{SimError, SimResult};
use crate::integrator::{BackwardEuler, ForwardEuler, Integrator, RK4};
use crate::model::{TransientModel, VectorState};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Integrator selection for simulation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegratorType {
    /// 4th-order Runge-Kutta (default, most accurate explicit, 4 rhs calls per step).
    #[default]
    #[serde(rename = "rk4")]
    RK4,
    /// Forward Euler (1st-order, faster, 1 rhs call per step).
    ForwardEuler,
    /// Backward Euler (1st-order implicit, for stiff models).
    BackwardEuler,
}

/// Options for simulation runs.
#[derive(Clone, Debug)]
pub struct SimOptions {
    /// Nominal time step
    pub dt: f64,
    /// Final simulation time
    pub t_end: f64,
    /// Maximum number of accepted steps (safety limit)
    pub max_steps: usize,
    /// Record every N-th step (decimation)
    pub record_every: usize,
    /// Integrator type (default: RK4)
    pub integrator: IntegratorType,
    /// Smallest step a cutback may reach
    pub min_dt: f64,
    /// Consecutive cutbacks allowed for one step
    pub max_retries: usize,
    /// Step multiplier applied on a retryable failure, in (0, 1)
    pub cutback_factor: f64,
    /// Step multiplier applied after a success, at least 1, capped at `dt`
    pub grow_factor: f64,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            dt: 1e-3,
            t_end: 1.0,
            max_steps: 100_000,
            record_every: 10,
            integrator: IntegratorType::default(),
            min_dt: 1e-9,
            max_retries: 8,
            cutback_factor: 0.5,
            grow_factor: 2.0,
        }
    }
}

impl SimOptions {
    fn validate(&self) -> SimResult<()> {
        if !(self.dt > 0.0) {
            return Err(SimError::InvalidArg {
                what: "dt must be positive",
            });
        }
        if !(self.t_end >= 0.0) {
            return Err(SimError::InvalidArg {
                what: "t_end must be non-negative",
            });
        }
        if self.max_steps == 0 {
            return Err(SimError::InvalidArg {
                what: "max_steps must be positive",
            });
        }
        if self.record_every == 0 {
            return Err(SimError::InvalidArg {
                what: "record_every must be positive",
            });
        }
        if !(self.cutback_factor > 0.0 && self.cutback_factor < 1.0) {
            return Err(SimError::InvalidArg {
                what: "cutback_factor must lie in (0, 1)",
            });
        }
        if !(self.grow_factor >= 1.0) {
            return Err(SimError::InvalidArg {
                what: "grow_factor must be at least 1",
            });
        }
        Ok(())
    }
}

/// Record of simulation results.
#[derive(Clone, Debug)]
pub struct SimRecord<S> {
    /// Time points
    pub t: Vec<f64>,
    /// State snapshots
    pub x: Vec<S>,
}

impl<S> SimRecord<S> {
    /// Final recorded state.
    pub fn last(&self) -> Option<&S> {
        self.x.last()
    }
}

fn step_with<M: TransientModel>(
    kind: IntegratorType,
    model: &mut M,
    t: f64,
    x: &M::State,
    dt: f64,
) -> SimResult<M::State> {
    match kind {
        IntegratorType::RK4 => RK4.step(model, t, x, dt),
        IntegratorType::ForwardEuler => ForwardEuler.step(model, t, x, dt),
        IntegratorType::BackwardEuler => BackwardEuler::default().step(model, t, x, dt),
    }
}

/// Run a transient simulation from `model.initial_state()` to `t_end`.
///
/// The last step is shortened to land exactly on `t_end`. A retryable step
/// failure shrinks the step by `cutback_factor` and tries again; after a
/// success the step grows back by `grow_factor` up to `dt`. A step that still
/// fails after `max_retries` cutbacks, or would fall below `min_dt`, ends the
/// run with [`SimError::CutbackExhausted`]. Non-finite states are rejected
/// as [`SimError::NonPhysical`].
pub fn run_sim<M: TransientModel>(
    model: &mut M,
    opts: &SimOptions,
) -> SimResult<SimRecord<M::State>> {
    opts.validate()?;

    let mut t = 0.0;
    let mut x = model.initial_state();

    let mut t_record = vec![t];
    let mut x_record = vec![x.clone()];

    let mut h = opts.dt;
    let mut step = 0;
    // Guards against a final sliver from floating-point accumulation
    let t_eps = 1e-12 * opts.t_end.max(1.0);
    while opts.t_end - t > t_eps && step < opts.max_steps {
        let mut trial = h.min(opts.t_end - t);
        let mut retries = 0;
        let x_new = loop {
            match step_with(opts.integrator, model, t, &x, trial) {
                Ok(x_new) => break x_new,
                Err(e) if e.is_retryable() => {
                    let next = trial * opts.cutback_factor;
                    if retries >= opts.max_retries || next < opts.min_dt {
                        return Err(SimError::CutbackExhausted {
                            t,
                            dt: trial,
                            cause: e.to_string(),
                        });
                    }
                    debug!(t, dt = trial, next, error = %e, "step cutback");
                    trial = next;
                    retries += 1;
                }
                Err(e) => return Err(e),
            }
        };

        if x_new.to_vector().iter().any(|v| !v.is_finite()) {
            return Err(SimError::NonPhysical {
                what: format!("non-finite state at t = {}", t + trial),
            });
        }

        x = x_new;
        t += trial;
        step += 1;
        trace!(t, dt = trial, "step accepted");

        h = (trial * opts.grow_factor).min(opts.dt);

        // Record if decimation matches
        if step % opts.record_every == 0 {
            t_record.push(t);
            x_record.push(x.clone());
        }
    }

    // Always record final state
    if step % opts.record_every != 0 {
        t_record.push(t);
        x_record.push(x);
    }

    Ok(SimRecord {
        t: t_record,
        x: x_record,
    })
}
