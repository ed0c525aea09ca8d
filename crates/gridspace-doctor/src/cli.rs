use clap::{Parser, Subcommand};

use crate::analyze::{AnalyzeArgs, SuggestArgs, run_analyze, run_suggest};
use crate::error::Result;
use crate::separate::{FixArgs, SeparateArgs, run_fix, run_separate};
use crate::util::init_logging;

#[derive(Debug, Parser)]
#[command(
    name = "gridspace-doctor",
    about = "Detect and fix overlapping or touching widgets in dashboard layouts",
    version
)]
pub struct Cli {
    /// Emit logs and errors on stderr as JSON lines.
    #[arg(long = "log-json", global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Report overlapping and touching widget pairs.
    Analyze(AnalyzeArgs),

    /// Add breathing room between two named widgets.
    Separate(SeparateArgs),

    /// Separate every touching pair, one move per pair.
    Fix(FixArgs),

    /// Print separation options suited to the layout's density.
    #[command(name = "suggest-options")]
    SuggestOptions(SuggestArgs),
}

/// Parse the process arguments, install logging and run the command.
///
/// Returns whether `--log-json` was given alongside the outcome so the
/// caller can format errors the same way.
pub fn run_from_env() -> (bool, Result<()>) {
    let cli = Cli::parse();
    let log_json = cli.log_json;
    init_logging(log_json);
    (log_json, run(cli))
}

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Analyze(args) => run_analyze(args),
        Commands::Separate(args) => run_separate(args),
        Commands::Fix(args) => run_fix(args),
        Commands::SuggestOptions(args) => run_suggest(args),
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use clap::Parser;
    use gridspace_core::BoundaryHandling;

    use crate::analyze::AnalyzeArgs;
    use crate::error::DoctorError;
    use crate::layout::{LayoutArgs, TuningArgs};

    use super::{Cli, Commands, run};

    #[test]
    fn analyze_command_dispatches_missing_layout_error() {
        let result = run(Cli {
            log_json: false,
            command: Commands::Analyze(AnalyzeArgs {
                layout: LayoutArgs {
                    layout: PathBuf::from("/tmp/gridspace-doctor/does-not-exist.json"),
                    tuning: TuningArgs::default(),
                },
                check: false,
            }),
        });

        match result.expect_err("missing layout should fail") {
            DoctorError::MissingLayout { path } => {
                assert!(path.ends_with("does-not-exist.json"));
            }
            other => panic!("expected MissingLayout, got {other}"),
        }
    }

    #[test]
    fn separate_flags_parse() {
        let cli = Cli::try_parse_from([
            "gridspace-doctor",
            "separate",
            "layout.json",
            "--first",
            "a",
            "--second",
            "b",
            "--boundary",
            "strict",
            "--aggressive",
            "--log-json",
        ])
        .expect("parse");
        assert!(cli.log_json);
        match cli.command {
            Commands::Separate(args) => {
                assert_eq!(args.first, "a");
                assert_eq!(args.second, "b");
                assert_eq!(args.layout.tuning.boundary, Some(BoundaryHandling::Strict));
                assert!(args.layout.tuning.aggressive);
            }
            other => panic!("expected separate, got {other:?}"),
        }
    }

    #[test]
    fn unknown_boundary_is_a_parse_error() {
        let parsed = Cli::try_parse_from([
            "gridspace-doctor",
            "fix",
            "layout.json",
            "--boundary",
            "sideways",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn suggest_options_uses_kebab_name() {
        let cli = Cli::try_parse_from(["gridspace-doctor", "suggest-options", "layout.json"])
            .expect("parse");
        assert!(matches!(cli.command, Commands::SuggestOptions(_)));
    }
}
