#![forbid(unsafe_code)]

mod cmd;
mod output;

use clap::{CommandFactory, Parser, Subcommand};
use netcentra_core::timing;
use std::env;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "netcentra: structural statistics and centrality analysis for edge lists",
    long_about = None,
    args_conflicts_with_subcommands = true,
    after_help = "EXAMPLES:\n    # Analyze an undirected edge list into ./results\n    netcentra data/bio-CE-GN.edges\n\n    # Directed graph with sampled betweenness\n    netcentra analyze net.edges --directed --approx-betweenness\n\n    # Print basic stats only\n    netcentra stats net.edges --json"
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit per-stage timing report to stderr.
    #[arg(long, global = true)]
    timing: bool,

    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Suppress progress messages.
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(flatten)]
    analyze: cmd::analyze::AnalyzeArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        about = "Run the full analysis",
        long_about = "Load, clean and analyze an edge list, then write stats, centralities, \
                      correlations, top-N rankings and histograms to the results directory.",
        after_help = "EXAMPLES:\n    # Default input and results directory\n    netcentra analyze\n\n    # Custom output location and ranking size\n    netcentra analyze net.edges --results-dir out --top-n 50"
    )]
    Analyze(cmd::analyze::AnalyzeArgs),

    #[command(
        about = "Print basic graph statistics",
        long_about = "Load and clean an edge list and print node/edge counts, average degree, \
                      density and component count. Writes no files.",
        after_help = "EXAMPLES:\n    # Human-readable\n    netcentra stats net.edges\n\n    # Machine-readable\n    netcentra stats net.edges --json"
    )]
    Stats(cmd::stats::StatsArgs),

    #[command(
        about = "Generate shell completion scripts",
        long_about = "Generate shell completion scripts for supported shells.",
        after_help = "EXAMPLES:\n    # Generate bash completions\n    netcentra completions bash\n\n    # Generate zsh completions\n    netcentra completions zsh"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("NETCENTRA_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "netcentra=debug,info"
        } else {
            "netcentra=info,warn"
        })
    });

    let format = env::var("NETCENTRA_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let timing_enabled = cli.timing || timing::timing_enabled_from_env();
    let output = output::resolve_output_mode(cli.json);
    let cwd = env::current_dir()?;

    match cli.command {
        None => cmd::analyze::run_analyze(&cli.analyze, output, cli.quiet, timing_enabled, &cwd),
        Some(Commands::Analyze(ref args)) => {
            cmd::analyze::run_analyze(args, output, cli.quiet, timing_enabled, &cwd)
        }
        Some(Commands::Stats(ref args)) => cmd::stats::run_stats(args, output, cli.quiet, &cwd),
        Some(Commands::Completions(args)) => {
            let mut command = Cli::command();
            cmd::completions::run_completions(args.shell, &mut command)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn bare_invocation_runs_analysis_with_defaults() {
        let cli = Cli::parse_from(["netcentra"]);
        assert!(cli.command.is_none());
        assert!(cli.analyze.input.is_none());
        assert!(!cli.analyze.directed);
    }

    #[test]
    fn bare_invocation_accepts_analysis_flags() {
        let cli = Cli::parse_from([
            "netcentra",
            "net.edges",
            "--directed",
            "--approx-betweenness",
            "--top-n",
            "5",
        ]);
        assert!(cli.command.is_none());
        assert_eq!(cli.analyze.input, Some(PathBuf::from("net.edges")));
        assert!(cli.analyze.directed);
        assert!(cli.analyze.approx_betweenness);
        assert_eq!(cli.analyze.top_n, Some(5));
    }

    #[test]
    fn analyze_subcommand_parses() {
        let cli = Cli::parse_from(["netcentra", "analyze", "net.edges", "--results-dir", "out"]);
        match cli.command {
            Some(Commands::Analyze(args)) => {
                assert_eq!(args.input, Some(PathBuf::from("net.edges")));
                assert_eq!(args.results_dir, Some(PathBuf::from("out")));
            }
            other => panic!("expected analyze, got {other:?}"),
        }
    }

    #[test]
    fn stats_subcommand_parses() {
        let cli = Cli::parse_from(["netcentra", "stats", "net.edges", "--directed"]);
        assert!(matches!(
            cli.command,
            Some(Commands::Stats(cmd::stats::StatsArgs { directed: true, .. }))
        ));
    }

    #[test]
    fn completions_subcommand_parses() {
        let cli = Cli::parse_from(["netcentra", "completions", "bash"]);
        assert!(matches!(
            cli.command,
            Some(Commands::Completions(cmd::completions::CompletionsArgs {
                shell: clap_complete::Shell::Bash,
            }))
        ));
    }

    #[test]
    fn on_and_off_flags_conflict() {
        assert!(
            Cli::try_parse_from(["netcentra", "net.edges", "--directed", "--undirected"]).is_err()
        );
        assert!(
            Cli::try_parse_from([
                "netcentra",
                "analyze",
                "--approx-betweenness",
                "--exact-betweenness",
            ])
            .is_err()
        );
        assert!(
            Cli::try_parse_from(["netcentra", "stats", "--directed", "--undirected"]).is_err()
        );
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from(["netcentra", "stats", "x.edges", "--json", "-q", "--timing"]);
        assert!(cli.json);
        assert!(cli.quiet);
        assert!(cli.timing);
    }
}
