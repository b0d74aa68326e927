use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "lapwatch", version, about = "Stopwatch, countdown timer and calculator")]
struct Cli {
    /// Log transitions to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive session driven by commands on stdin
    Run(commands::run::RunArgs),
    /// Replay a timed command script deterministically
    Replay(commands::replay::ReplayArgs),
    /// Format milliseconds as MM:SS.mmm
    Format(commands::format::FormatArgs),
    /// Calculator: keypad arithmetic, date shifts, time differences
    Calc {
        #[command(subcommand)]
        action: commands::calc::CalcAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("LAPWATCH_LOG")
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Run(args) => commands::run::run(args),
        Commands::Replay(args) => commands::replay::run(args),
        Commands::Format(args) => commands::format::run(args),
        Commands::Calc { action } => commands::calc::run(action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
