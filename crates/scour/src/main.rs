use clap::{Parser, Subcommand};
use colored::Colorize;
use env_logger::Env;

mod clean;
mod config;
mod diagnostics;
mod file_walker;
mod list;
mod profiling;

#[derive(Parser)]
#[command(name = "scour")]
#[command(about = "Rule-based cleanup of Java sources", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(short = 'd', long = "debug", global = true, hide = true)]
    debug: bool,

    /// Write a performance profile to the specified path (Chrome tracing JSON format).
    /// View with chrome://tracing or https://ui.perfetto.dev/
    #[arg(long = "profile", global = true, value_name = "PATH", hide = true)]
    profile: Option<std::path::PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply rewrite rules to .java files
    #[command(alias = "c")]
    Clean(clean::CleanArgs),

    /// Show the available mutators and composites
    #[command(alias = "ls")]
    List(list::ListArgs),
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {e}", "Error:".red());
        for cause in e.chain().skip(1) {
            eprintln!("  {cause}");
        }
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // RUST_LOG still wins over --debug
    let env = if cli.debug {
        Env::default().default_filter_or("debug")
    } else {
        Env::default().default_filter_or("error")
    };
    env_logger::Builder::from_env(env).init();

    let _trace = profiling::start(cli.profile);

    match cli.command {
        Commands::Clean(args) => clean::execute(args),
        Commands::List(args) => list::execute(args),
    }
}
