use anyhow::{Context as _, Result};
use clap::{Parser, ValueEnum};
use log::{info, warn};
use symex::solver::constants::DEFAULT_MAX_PIVOTS;
#[cfg(feature = "smt")]
use symex::SmtSolver;
use symex::{
    Binding, Constant, Context, Expression, LinearSolver, SolveResult, Solver, SolverConfig,
    Symbol,
};

/// Log level for the application
#[derive(Debug, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_log_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Solver answering the query
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Backend {
    /// Built-in exact simplex over linear real arithmetic
    Linear,
    /// External z3 process
    #[cfg(feature = "smt")]
    Z3,
}

/// Symex - evaluate and solve the expression `x - y * 2`
#[derive(Parser, Debug)]
#[command(name = "symex")]
#[command(about = "Evaluate x - y * 2 for concrete values and solve x - y * 2 = target")]
#[command(version)]
pub struct CliArgs {
    /// Value bound to x (integer, fraction like -5/2, or decimal)
    #[arg(long, default_value = "3", allow_hyphen_values = true)]
    pub x: String,

    /// Value bound to y
    #[arg(long, default_value = "4", allow_hyphen_values = true)]
    pub y: String,

    /// Right-hand side of the solver query
    #[arg(short, long, default_value = "10", allow_hyphen_values = true)]
    pub target: String,

    /// Solver backend
    #[arg(short, long, value_enum, default_value = "linear")]
    pub backend: Backend,

    /// Pivot budget for the simplex solver
    #[arg(long, default_value_t = DEFAULT_MAX_PIVOTS)]
    pub max_pivots: usize,

    /// Log level (default: warn)
    #[arg(short, long, value_enum, default_value = "warn")]
    pub log_level: LogLevel,
}

/// Configuration for the CLI application
pub struct CliConfig {
    pub x: Constant,
    pub y: Constant,
    pub target: Constant,
    pub backend: Backend,
    pub solver: SolverConfig,
    pub log_level: LogLevel,
}

fn parse_value(name: &str, text: &str) -> Result<Constant> {
    text.parse::<Constant>()
        .with_context(|| format!("Invalid value for {}", name))
}

/// Validate parsed arguments into a configuration
pub fn build_config(args: CliArgs) -> Result<CliConfig> {
    Ok(CliConfig {
        x: parse_value("x", &args.x)?,
        y: parse_value("y", &args.y)?,
        target: parse_value("target", &args.target)?,
        backend: args.backend,
        solver: SolverConfig {
            max_pivots: args.max_pivots,
        },
        log_level: args.log_level,
    })
}

/// Parse command line arguments and return configuration
pub fn parse_args() -> Result<CliConfig> {
    build_config(CliArgs::parse())
}

/// Initialize logging based on the provided log level
pub fn init_logging(log_level: &LogLevel) -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log_level.to_log_level_filter())
        .try_init()
        .context("Failed to initialize logging")
}

/// Assert `expr = target` on `solver` and decide it
pub fn solve_with<S: Solver>(
    solver: &mut S,
    expr: &Expression,
    target: &Expression,
) -> Result<SolveResult> {
    info!("Solving {} = {} with {}", expr, target, solver.name());
    let constraint = Context::new(&*solver)
        .eq(expr, target)
        .context("Failed to translate constraint")?;
    solver
        .add_constraint(constraint)
        .context("Failed to add constraint")?;
    solver.solve().context("Solver failed")
}

/// Run the main application logic
pub fn run() -> Result<()> {
    let config = parse_args()?;

    // Initialize logging
    init_logging(&config.log_level)?;

    let x = Symbol::new("x");
    let y = Symbol::new("y");
    let expr = &x - &y * 2;
    println!("Expression: {}", expr);

    let binding = Binding::new()
        .with(&x, config.x.clone())
        .with(&y, config.y.clone());
    let value = expr
        .evaluate(&binding)
        .context("Failed to evaluate expression")?;
    println!("Result with concrete values: {}", value);

    let target = Expression::from(config.target.clone());
    let result = match config.backend {
        Backend::Linear => {
            let mut solver = LinearSolver::with_config(config.solver);
            solve_with(&mut solver, &expr, &target)?
        }
        #[cfg(feature = "smt")]
        Backend::Z3 => {
            let mut solver = SmtSolver::z3().context("Failed to start z3")?;
            solve_with(&mut solver, &expr, &target)?
        }
    };

    match result {
        SolveResult::Sat(model) => {
            println!("SMT Solver Result: {}", model);
            Ok(())
        }
        SolveResult::Unsat => {
            warn!("Constraint is unsatisfiable");
            println!("No solution found.");
            Ok(())
        }
    }
}
