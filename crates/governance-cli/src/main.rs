use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use governance_engine::{EvaluationStrategy, Mode};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;

mod commands;
mod io;

const VERBOSE_DIRECTIVES: [&str; 2] = ["governance_engine=debug", "governor=debug"];

#[derive(Parser)]
#[command(name = "governor", version, about = "Per-mode reliability governance for a day")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log engine decisions to stderr
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate every mode for one day (JSON day input → JSON day report)
    Evaluate {
        /// Input file (defaults to stdin)
        #[arg(long, short)]
        input: Option<PathBuf>,

        /// IANA timezone the day and local busy blocks are interpreted in
        #[arg(long, default_value = "UTC")]
        timezone: String,

        /// How conflicted windows are judged
        #[arg(long, value_enum, default_value_t = StrategyArg::Subtraction)]
        strategy: StrategyArg,

        /// Pin computedAt to this RFC 3339 instant instead of the current time
        #[arg(long)]
        now: Option<String>,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// Classify the breaks inside one wall-clock window
    Assess {
        /// Input file (defaults to stdin)
        #[arg(long, short)]
        input: Option<PathBuf>,

        /// Override the mode named in the input
        #[arg(long)]
        mode: Option<Mode>,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// List modes with their thresholds and legal window states
    Modes {
        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum StrategyArg {
    /// Every overlapping busy block cuts the window
    Subtraction,
    /// Classify breaks first; restorative breaks do not cut the window
    BreakAware,
}

impl From<StrategyArg> for EvaluationStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Subtraction => EvaluationStrategy::SubtractionOnly,
            StrategyArg::BreakAware => EvaluationStrategy::BreakAware,
        }
    }
}

/// Filter from `RUST_LOG` (default `warn`). `--verbose` adds debug directives
/// for the engine and CLI on top of it.
fn init_tracing(verbose: bool) {
    let mut filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    if verbose {
        for directive in VERBOSE_DIRECTIVES {
            match directive.parse::<Directive>() {
                Ok(directive) => filter = filter.add_directive(directive),
                Err(e) => eprintln!("warning: ignoring log directive '{directive}': {e}"),
            }
        }
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Evaluate {
            input,
            timezone,
            strategy,
            now,
            pretty,
        } => commands::evaluate(commands::EvaluateArgs {
            input,
            timezone,
            strategy: strategy.into(),
            now,
            pretty,
        }),
        Commands::Assess {
            input,
            mode,
            pretty,
        } => commands::assess(input, mode, pretty),
        Commands::Modes { pretty } => commands::modes(pretty),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
