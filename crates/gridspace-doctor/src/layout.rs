use std::path::{Path, PathBuf};

use clap::Args;
use gridspace_core::{BoundaryHandling, LayoutDocument, Widget};
use gridspace_layout::{ConfigError, GridspaceConfig};
use serde::Deserialize;

use crate::error::{DoctorError, Result};
use crate::util::{ensure_exists, to_pretty_json, write_string};

/// Flags that tune the detector and the engine on top of an optional config file.
#[derive(Debug, Clone, Default, Args)]
pub struct TuningArgs {
    /// TOML or JSON config file (`.json` is read as JSON).
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long = "min-spacing")]
    pub min_spacing: Option<f64>,

    /// Treat corner-to-corner contact as touching.
    #[arg(long = "detect-diagonal")]
    pub detect_diagonal: bool,

    #[arg(long)]
    pub gap: Option<u32>,

    /// strict, expand or compress.
    #[arg(long)]
    pub boundary: Option<BoundaryHandling>,

    #[arg(long = "max-cascade-depth")]
    pub max_cascade_depth: Option<u32>,

    #[arg(long = "prevent-cascading")]
    pub prevent_cascading: bool,

    /// Disable conservative mode: move, push neighbours, then validate.
    #[arg(long)]
    pub aggressive: bool,
}

impl TuningArgs {
    /// Config file values with command-line overrides applied, validated.
    pub fn resolve(&self) -> Result<GridspaceConfig> {
        let mut config = match &self.config {
            Some(path) => GridspaceConfig::from_path(path)?,
            None => GridspaceConfig::default(),
        };

        if let Some(threshold) = self.min_spacing {
            config.detector.min_spacing_threshold = threshold;
        }
        if self.detect_diagonal {
            config.detector.ignore_diagonal_touching = false;
        }
        if let Some(gap) = self.gap {
            config.separation.gap_size = gap;
        }
        if let Some(boundary) = self.boundary {
            config.separation.boundary_handling = boundary;
        }
        if let Some(depth) = self.max_cascade_depth {
            config.separation.max_cascade_depth = depth;
        }
        if self.prevent_cascading {
            config.separation.prevent_cascading = true;
        }
        if self.aggressive {
            config.separation.conservative_mode = false;
        }

        let problems = config.validate();
        if problems.is_empty() {
            Ok(config)
        } else {
            Err(ConfigError::Validation(problems).into())
        }
    }
}

/// A layout file plus the tuning flags every command shares.
#[derive(Debug, Clone, Args)]
pub struct LayoutArgs {
    /// Layout JSON: either a document with `widgets` or a bare widget array.
    pub layout: PathBuf,

    #[command(flatten)]
    pub tuning: TuningArgs,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LayoutFile {
    Document(LayoutDocument),
    Bare(Vec<Widget>),
}

pub fn parse_layout(content: &str) -> Result<LayoutDocument> {
    let document = match serde_json::from_str::<LayoutFile>(content)? {
        LayoutFile::Document(document) => document,
        LayoutFile::Bare(widgets) => LayoutDocument::new(widgets),
    };
    document.validate()?;
    Ok(document)
}

pub fn load_layout(path: &Path) -> Result<LayoutDocument> {
    ensure_exists(path)?;
    let content = std::fs::read_to_string(path)?;
    let document = parse_layout(&content)?;
    tracing::info!(
        target: "gridspace.doctor",
        path = %path.display(),
        widgets = document.widgets.len(),
        "layout loaded"
    );
    Ok(document)
}

pub fn save_layout(path: &Path, document: &LayoutDocument) -> Result<()> {
    write_string(path, &to_pretty_json(document)?)?;
    tracing::info!(target: "gridspace.doctor", path = %path.display(), "layout written");
    Ok(())
}

pub fn find_by_id<'a>(document: &'a LayoutDocument, id: &str) -> Result<&'a Widget> {
    document
        .widgets
        .iter()
        .find(|widget| widget.id.as_str() == id)
        .ok_or_else(|| DoctorError::WidgetNotFound { id: id.to_string() })
}
