//! Tuning knobs for collision detection and separation.
//!
//! Both option structs deserialize from partial documents: any missing field
//! takes its default, so `{}` is a valid configuration.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::{GAP_SIZE, VISUAL_MARGIN};

/// Sensitivity of the touching test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DetectorOptions {
    /// Gap, in grid units, still considered "touching".
    pub min_spacing_threshold: f64,
    /// Suppress corner-only adjacency.
    pub ignore_diagonal_touching: bool,
    /// Subtract [`VISUAL_MARGIN`] from the threshold.
    pub consider_visual_spacing: bool,
}

impl Default for DetectorOptions {
    fn default() -> Self {
        Self {
            min_spacing_threshold: 0.0,
            ignore_diagonal_touching: true,
            consider_visual_spacing: true,
        }
    }
}

impl DetectorOptions {
    /// Tolerance actually applied to edge distances (never negative).
    #[must_use]
    pub fn effective_min_spacing(&self) -> f64 {
        let threshold = if self.consider_visual_spacing {
            self.min_spacing_threshold - VISUAL_MARGIN
        } else {
            self.min_spacing_threshold
        };
        threshold.max(0.0)
    }

    #[must_use]
    pub fn min_spacing_threshold(mut self, threshold: f64) -> Self {
        self.min_spacing_threshold = threshold;
        self
    }

    #[must_use]
    pub fn ignore_diagonal_touching(mut self, ignore: bool) -> Self {
        self.ignore_diagonal_touching = ignore;
        self
    }

    #[must_use]
    pub fn consider_visual_spacing(mut self, consider: bool) -> Self {
        self.consider_visual_spacing = consider;
        self
    }
}

/// What to do when a move pushes a widget past the last grid column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundaryHandling {
    /// Reject the move.
    Strict,
    /// Allow the widget to overflow the grid.
    #[default]
    Expand,
    /// Shrink the widget (down to `minW`) so it fits.
    Compress,
}

impl BoundaryHandling {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Strict => "strict",
            Self::Expand => "expand",
            Self::Compress => "compress",
        }
    }
}

impl fmt::Display for BoundaryHandling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for BoundaryHandling {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "expand" => Ok(Self::Expand),
            "compress" => Ok(Self::Compress),
            other => Err(format!(
                "unknown boundary handling '{other}' (expected strict, expand or compress)"
            )),
        }
    }
}

/// Default recursion bound for cascading pushes.
pub const DEFAULT_MAX_CASCADE_DEPTH: u32 = 2;

/// Policy for the separation engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SeparationOptions {
    /// Grid units of space to introduce between the pair.
    pub gap_size: u32,
    /// Disable recursive push-apart of newly overlapped widgets.
    pub prevent_cascading: bool,
    /// Recursion bound for cascading pushes.
    pub max_cascade_depth: u32,
    pub boundary_handling: BoundaryHandling,
    /// Move exactly one widget per pair, never cascade, never resize.
    pub conservative_mode: bool,
}

impl Default for SeparationOptions {
    fn default() -> Self {
        Self {
            gap_size: GAP_SIZE,
            prevent_cascading: false,
            max_cascade_depth: DEFAULT_MAX_CASCADE_DEPTH,
            boundary_handling: BoundaryHandling::Expand,
            conservative_mode: true,
        }
    }
}

impl SeparationOptions {
    /// Options for opt-in aggressive separation (cascades and boundary policy).
    #[must_use]
    pub fn aggressive() -> Self {
        Self {
            conservative_mode: false,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn gap_size(mut self, gap: u32) -> Self {
        self.gap_size = gap;
        self
    }

    #[must_use]
    pub fn prevent_cascading(mut self, prevent: bool) -> Self {
        self.prevent_cascading = prevent;
        self
    }

    #[must_use]
    pub fn max_cascade_depth(mut self, depth: u32) -> Self {
        self.max_cascade_depth = depth;
        self
    }

    #[must_use]
    pub fn boundary_handling(mut self, handling: BoundaryHandling) -> Self {
        self.boundary_handling = handling;
        self
    }

    #[must_use]
    pub fn conservative_mode(mut self, conservative: bool) -> Self {
        self.conservative_mode = conservative;
        self
    }
}
