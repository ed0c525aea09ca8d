use clap::Args;
use gridspace_layout::{
    OverlapAnalysis, SeparationOptions, analyze_layout, get_optimal_separation_options,
};
use serde::Serialize;

use crate::error::{DoctorError, Result};
use crate::layout::{LayoutArgs, load_layout};
use crate::util::print_json;

/// Exit code for `analyze --check` when the layout has issues.
pub const ISSUES_FOUND_EXIT_CODE: i32 = 3;

#[derive(Debug, Clone, Args)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub layout: LayoutArgs,

    /// Exit non-zero when any overlap or touching pair is found.
    #[arg(long)]
    pub check: bool,
}

#[derive(Debug, Clone, Args)]
pub struct SuggestArgs {
    #[command(flatten)]
    pub layout: LayoutArgs,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestReport {
    pub widget_count: usize,
    pub options: SeparationOptions,
}

pub fn analyze(args: &AnalyzeArgs) -> Result<OverlapAnalysis> {
    let config = args.layout.tuning.resolve()?;
    let document = load_layout(&args.layout.layout)?;
    Ok(analyze_layout(&document.widgets, &config.detector))
}

pub fn run_analyze(args: AnalyzeArgs) -> Result<()> {
    let analysis = analyze(&args)?;
    print_json(&analysis)?;
    if args.check && !analysis.is_clean() {
        return Err(DoctorError::exit(
            ISSUES_FOUND_EXIT_CODE,
            format!("{} layout issue(s) found", analysis.total_issues),
        ));
    }
    Ok(())
}

pub fn suggest(args: &SuggestArgs) -> Result<SuggestReport> {
    let document = load_layout(&args.layout.layout)?;
    Ok(SuggestReport {
        widget_count: document.widgets.len(),
        options: get_optimal_separation_options(&document.widgets),
    })
}

pub fn run_suggest(args: SuggestArgs) -> Result<()> {
    print_json(&suggest(&args)?)
}
