use std::path::PathBuf;

use clap::Args;
use gridspace_core::Widget;
use gridspace_layout::{
    SeparationResult, detect_overlapping_widgets, separate_all_touching_widgets, separate_widgets,
};

use crate::error::{DoctorError, Result};
use crate::layout::{LayoutArgs, find_by_id, load_layout, save_layout};
use crate::util::print_json;

#[derive(Debug, Clone, Args)]
pub struct SeparateArgs {
    #[command(flatten)]
    pub layout: LayoutArgs,

    /// Id of the first widget of the pair.
    #[arg(long)]
    pub first: String,

    /// Id of the second widget of the pair.
    #[arg(long)]
    pub second: String,

    /// Write the updated layout here when the separation succeeds.
    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
pub struct FixArgs {
    #[command(flatten)]
    pub layout: LayoutArgs,

    /// Write the updated layout here when at least one pair was resolved.
    #[arg(long)]
    pub output: Option<PathBuf>,
}

pub fn separate(args: &SeparateArgs) -> Result<SeparationResult> {
    let config = args.layout.tuning.resolve()?;
    let document = load_layout(&args.layout.layout)?;
    let first = find_by_id(&document, &args.first)?;
    let second = find_by_id(&document, &args.second)?;
    if first.id == second.id {
        return Err(DoctorError::invalid("--first and --second must name different widgets"));
    }

    let result = separate_widgets(first, second, &document.widgets, &config.separation);
    reject_new_overlaps(&document.widgets, &result)?;
    if let Some(output) = args.output.as_ref().filter(|_| result.success) {
        save_layout(output, &document.with_widgets(result.updated_widgets.clone()))?;
    }
    Ok(result)
}

pub fn fix(args: &FixArgs) -> Result<SeparationResult> {
    let config = args.layout.tuning.resolve()?;
    let document = load_layout(&args.layout.layout)?;
    let result = separate_all_touching_widgets(&document.widgets, &config.separation);
    reject_new_overlaps(&document.widgets, &result)?;
    if let Some(output) = args.output.as_ref().filter(|_| result.success) {
        save_layout(output, &document.with_widgets(result.updated_widgets.clone()))?;
    }
    Ok(result)
}

/// Refuse a successful result that overlaps more than its input did.
fn reject_new_overlaps(before: &[Widget], result: &SeparationResult) -> Result<()> {
    if !result.success {
        return Ok(());
    }
    let before = detect_overlapping_widgets(before).len();
    let after = detect_overlapping_widgets(&result.updated_widgets).len();
    if after <= before {
        return Ok(());
    }
    tracing::warn!(
        target: "gridspace.doctor",
        before,
        after,
        reason = %result.message,
        "separation introduced overlaps"
    );
    Err(DoctorError::separation_failed(format!(
        "{}, but overlapping pairs grew from {before} to {after}; layout not written",
        result.message
    )))
}

fn finish(result: &SeparationResult) -> Result<()> {
    print_json(result)?;
    if result.success {
        Ok(())
    } else {
        Err(DoctorError::separation_failed(result.message.clone()))
    }
}

pub fn run_separate(args: SeparateArgs) -> Result<()> {
    finish(&separate(&args)?)
}

pub fn run_fix(args: FixArgs) -> Result<()> {
    finish(&fix(&args)?)
}
