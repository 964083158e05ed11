mod error;
mod report;

use clap::{Args, Parser, Subcommand};
use error::{AppError, AppResult};
use fp_core::Real;
use fp_equilibrium::{
    AllocationPolicy, EquilibrationOptions, EquilibrationStrategy, EquilibriumConfig,
    equilibrate_fpm,
};
use fp_model::{RateConstants, SteadyStateProfile, allocation_range};
use fp_project::{ConstantsFile, RunConfig, SweepsConfig, load_constants, load_run_config};
use fp_sweeps::{SweepDefinition, SweepType, sweep_allocation, sweep_nu_max, sweep_tau_kappa};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "fp-cli")]
#[command(about = "Flux-parity growth model - steady states, equilibria and sweeps", long_about = None)]
struct Cli {
    /// Run configuration (YAML or JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Constants file (YAML or JSON); replaces the configuration's constants
    #[arg(long, global = true)]
    constants: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the resolved rate constants
    Constants,
    /// Steady-state profile over the admissible allocation range
    SteadyState {
        /// Override nu_max [hr^-1]
        #[arg(long)]
        nu_max: Option<f64>,
        /// Number of allocation samples
        #[arg(long, default_value_t = 300)]
        points: usize,
        /// Output CSV file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Growth-optimal allocation across nu_max
    Optimal {
        #[arg(long, default_value_t = 0.1)]
        nu_start: f64,
        #[arg(long, default_value_t = 20.0)]
        nu_end: f64,
        #[arg(long, default_value_t = 200)]
        points: usize,
        /// Output CSV file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Equilibrate the flux-parity model once
    Equilibrate {
        /// Hold the ribosomal allocation fixed
        #[arg(long, conflicts_with = "dynamic")]
        phi_rb: Option<f64>,
        /// Regulate the allocation, starting from this value
        #[arg(long)]
        dynamic: Option<f64>,
        /// Override nu_max [hr^-1]
        #[arg(long)]
        nu_max: Option<f64>,
        #[command(flatten)]
        solve: SolveArgs,
    },
    /// Equilibrium allocation across nu_max
    SweepNu {
        #[arg(long)]
        nu_start: Option<f64>,
        #[arg(long)]
        nu_end: Option<f64>,
        #[arg(long)]
        points: Option<usize>,
        #[command(flatten)]
        solve: SolveArgs,
        /// Output CSV file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Fluxes and charging balance at fixed allocations
    SweepAllocation {
        #[arg(long)]
        points: Option<usize>,
        #[command(flatten)]
        solve: SolveArgs,
        /// Output CSV file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Equilibrium allocation on a tau x kappa_max grid
    ///
    /// `tau` sets the sensor's charging threshold, as in the reference table.
    SweepGrid {
        #[arg(long)]
        tau_start: Option<f64>,
        #[arg(long)]
        tau_end: Option<f64>,
        #[arg(long)]
        tau_points: Option<usize>,
        #[arg(long)]
        kappa_start: Option<f64>,
        #[arg(long)]
        kappa_end: Option<f64>,
        #[arg(long)]
        kappa_points: Option<usize>,
        #[command(flatten)]
        solve: SolveArgs,
        /// Output CSV file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Args)]
struct SolveArgs {
    /// Maximum equilibration rounds
    #[arg(long)]
    max_iter: Option<usize>,
    /// Polish each round with Newton's method
    #[arg(long)]
    newton: bool,
}

/// Inputs resolved from the configuration files and flags.
struct Context {
    constants: RateConstants,
    policy: AllocationPolicy,
    options: EquilibrationOptions,
    sweeps: SweepsConfig,
}

impl Context {
    fn load(config: Option<&Path>, constants: Option<&Path>) -> AppResult<Self> {
        let run = match config {
            Some(path) => load_run_config(path)?,
            None => RunConfig::default(),
        };
        let constants = match constants {
            Some(path) => load_constants(path)?,
            None => run.constants.resolve()?,
        };
        Ok(Context {
            constants,
            policy: run.policy,
            options: run.options,
            sweeps: run.sweeps.unwrap_or_default(),
        })
    }

    fn options(&self, solve: &SolveArgs) -> EquilibrationOptions {
        let mut options = self.options.clone();
        if let Some(max_iter) = solve.max_iter {
            options.max_iter = max_iter;
        }
        if solve.newton {
            options.strategy = EquilibrationStrategy::Newton;
        }
        options
    }
}

fn main() -> AppResult<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "fp_cli=info,warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();
    let ctx = Context::load(cli.config.as_deref(), cli.constants.as_deref())?;

    match cli.command {
        Commands::Constants => cmd_constants(&ctx),
        Commands::SteadyState {
            nu_max,
            points,
            output,
        } => cmd_steady_state(&ctx, nu_max, points, output.as_deref()),
        Commands::Optimal {
            nu_start,
            nu_end,
            points,
            output,
        } => cmd_optimal(&ctx, nu_start, nu_end, points, output.as_deref()),
        Commands::Equilibrate {
            phi_rb,
            dynamic,
            nu_max,
            solve,
        } => cmd_equilibrate(&ctx, phi_rb, dynamic, nu_max, &solve),
        Commands::SweepNu {
            nu_start,
            nu_end,
            points,
            solve,
            output,
        } => {
            let range = RangeArgs::new(nu_start, nu_end, points);
            cmd_sweep_nu(&ctx, range, &solve, output.as_deref())
        }
        Commands::SweepAllocation {
            points,
            solve,
            output,
        } => cmd_sweep_allocation(&ctx, points, &solve, output.as_deref()),
        Commands::SweepGrid {
            tau_start,
            tau_end,
            tau_points,
            kappa_start,
            kappa_end,
            kappa_points,
            solve,
            output,
        } => {
            let taus = RangeArgs::new(tau_start, tau_end, tau_points);
            let kappas = RangeArgs::new(kappa_start, kappa_end, kappa_points);
            cmd_sweep_grid(&ctx, taus, kappas, &solve, output.as_deref())
        }
    }
}

/// Range flags; unset ones fall back to the configured sweep, then to a default.
struct RangeArgs {
    start: Option<f64>,
    end: Option<f64>,
    points: Option<usize>,
}

impl RangeArgs {
    fn new(start: Option<f64>, end: Option<f64>, points: Option<usize>) -> Self {
        RangeArgs { start, end, points }
    }

    fn resolve(
        &self,
        configured: Option<&SweepDefinition>,
        default: SweepDefinition,
    ) -> AppResult<Vec<Real>> {
        let base = configured.cloned().unwrap_or(default);
        let def = SweepDefinition::new(
            self.start.unwrap_or(base.start),
            self.end.unwrap_or(base.end),
            self.points.unwrap_or(base.num_points),
            base.sweep_type,
        )?;
        Ok(def.generate_points())
    }
}

fn default_sweep(start: Real, end: Real, num_points: usize, sweep_type: SweepType) -> SweepDefinition {
    SweepDefinition {
        start,
        end,
        num_points,
        sweep_type,
    }
}

fn write_output(output: Option<&Path>, text: &str, rows: usize) -> AppResult<()> {
    if let Some(path) = output {
        std::fs::write(path, text).map_err(|source| AppError::OutputWrite {
            path: path.to_path_buf(),
            source,
        })?;
        println!("✓ Exported {} rows to {}", rows, path.display());
    } else {
        print!("{}", text);
    }
    Ok(())
}

fn cmd_constants(ctx: &Context) -> AppResult<()> {
    let file = ConstantsFile::from_constants(&ctx.constants);
    print!("{}", serde_yaml::to_string(&file)?);
    Ok(())
}

fn cmd_steady_state(
    ctx: &Context,
    nu_max: Option<f64>,
    points: usize,
    output: Option<&Path>,
) -> AppResult<()> {
    let c = nu_max.map_or(ctx.constants, |nu| ctx.constants.with_nu_max(nu));
    c.validate()?;
    if points < 2 {
        return Err(AppError::InvalidArgument("points must be at least 2".to_string()));
    }
    let profile = SteadyStateProfile::over_range(&c, points);
    if let Some(best) = profile.best_sample() {
        info!(nu_max = c.nu_max, best_phi_rb = best, "steady-state profile");
    }
    write_output(output, &report::steady_state_csv(&profile)?, profile.len())
}

fn cmd_optimal(
    ctx: &Context,
    nu_start: f64,
    nu_end: f64,
    points: usize,
    output: Option<&Path>,
) -> AppResult<()> {
    ctx.constants.validate()?;
    let nus = SweepDefinition::linear(nu_start, nu_end, points)?.generate_points();
    if nus.iter().any(|&nu| nu <= 0.0) {
        return Err(AppError::InvalidArgument("nu_max must be positive".to_string()));
    }
    write_output(output, &report::optimal_csv(&ctx.constants, &nus)?, nus.len())
}

fn cmd_equilibrate(
    ctx: &Context,
    phi_rb: Option<f64>,
    dynamic: Option<f64>,
    nu_max: Option<f64>,
    solve: &SolveArgs,
) -> AppResult<()> {
    let constants = nu_max.map_or(ctx.constants, |nu| ctx.constants.with_nu_max(nu));
    let policy = match (phi_rb, dynamic) {
        (Some(phi), _) => AllocationPolicy::fixed(phi),
        (None, Some(init)) => AllocationPolicy::dynamic(init),
        (None, None) => ctx.policy,
    };
    let options = ctx.options(solve);
    info!(?policy, strategy = ?options.strategy, max_iter = options.max_iter, "equilibrating");

    let state = equilibrate_fpm(&EquilibriumConfig::new(constants, policy), &options)?;
    print!("{}", report::equilibrium_summary(&state, &constants));
    Ok(())
}

fn cmd_sweep_nu(
    ctx: &Context,
    range: RangeArgs,
    solve: &SolveArgs,
    output: Option<&Path>,
) -> AppResult<()> {
    let nus = range.resolve(
        ctx.sweeps.nu_max.as_ref(),
        default_sweep(0.5, 20.0, 40, SweepType::Linear),
    )?;
    let sweep = sweep_nu_max(&ctx.constants, ctx.policy, &nus, &ctx.options(solve));
    if sweep.outcome.num_failed > 0 {
        warn!(failed = sweep.outcome.num_failed, "nu_max sweep points did not converge");
    }
    write_output(output, &report::nu_sweep_csv(&sweep)?, sweep.outcome.len())
}

fn cmd_sweep_allocation(
    ctx: &Context,
    points: Option<usize>,
    solve: &SolveArgs,
    output: Option<&Path>,
) -> AppResult<()> {
    ctx.constants.validate()?;
    let phis = match &ctx.sweeps.allocation {
        Some(def) => RangeArgs::new(None, None, points).resolve(Some(def), def.clone())?,
        None => allocation_range(ctx.constants.phi_o, points.unwrap_or(30).max(2)),
    };
    let sweep = sweep_allocation(&ctx.constants, &phis, &ctx.options(solve));
    match sweep.flux_parity_phi_rb {
        Some(phi) => info!(
            flux_parity_phi_rb = phi,
            optimal_phi_rb = sweep.optimal_phi_rb,
            "allocation sweep"
        ),
        None => warn!("regulated equilibrium did not converge"),
    }
    if sweep.outcome.num_failed > 0 {
        warn!(failed = sweep.outcome.num_failed, "allocation sweep points did not converge");
    }
    write_output(output, &report::allocation_sweep_csv(&sweep)?, sweep.outcome.len())
}

fn cmd_sweep_grid(
    ctx: &Context,
    taus: RangeArgs,
    kappas: RangeArgs,
    solve: &SolveArgs,
    output: Option<&Path>,
) -> AppResult<()> {
    let taus = taus.resolve(
        ctx.sweeps.tau.as_ref(),
        default_sweep(0.1, 10.0, 5, SweepType::Logarithmic),
    )?;
    let kappas = kappas.resolve(
        ctx.sweeps.kappa_max.as_ref(),
        default_sweep(1e-4, 1e-2, 5, SweepType::Logarithmic),
    )?;
    let sweep = sweep_tau_kappa(&ctx.constants, &taus, &kappas, &ctx.options(solve));
    if sweep.num_failed > 0 {
        warn!(failed = sweep.num_failed, "grid cells did not converge");
    }

    if let Some(path) = output {
        fp_project::save_sweep_table(path, &sweep.rows)?;
        println!("✓ Exported {} rows to {}", sweep.rows.len(), path.display());
    } else {
        fp_project::write_sweep_table(io::stdout().lock(), &sweep.rows)?;
    }
    Ok(())
}
