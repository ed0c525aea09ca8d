#![forbid(unsafe_code)]

//! Overlap and touching detection for widget layouts.
//!
//! Every function here is a pure query over a borrowed widget slice. Pairs
//! are enumerated as `(i, j)` with `i < j` over input order; an empty or
//! single-widget slice simply produces no pairs.
//!
//! # Touching vs. overlapping
//!
//! Overlap is strict: shared edges and corners never count. Touching is a
//! tolerance test: two widgets that share a row band (or column band) and
//! whose facing edges are within [`DetectorOptions::effective_min_spacing`]
//! are flagged, so "uncomfortably close" layouts show up too.

use serde::Serialize;

use gridspace_core::geometry::{
    GAP_SIZE, GRID_COLUMNS, GridPoint, VERTICAL_SPACE_CAP, edge_distance,
};
use gridspace_core::{DetectorOptions, Widget};

/// Axis along which a pair should be pulled apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SeparationDirection {
    Horizontal,
    Vertical,
}

/// Which member of a pair a suggestion moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveTarget {
    First,
    Second,
    Both,
}

/// How pressing a touching pair is, from the larger widget's area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Low,
    Medium,
    High,
}

impl Urgency {
    /// `> 12` cells is high, `> 6` medium, anything else low.
    #[must_use]
    pub const fn from_area(area: u64) -> Self {
        if area > 12 {
            Self::High
        } else if area > 6 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

/// How much of the smaller widget an overlap covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlapSeverity {
    Minor,
    Moderate,
    Severe,
}

impl OverlapSeverity {
    /// `> 50%` of the smaller area is severe, `> 20%` moderate.
    #[must_use]
    pub fn classify(overlap_area: u64, smaller_area: u64) -> Self {
        if smaller_area == 0 {
            return Self::Minor;
        }
        let ratio = overlap_area as f64 / smaller_area as f64;
        if ratio > 0.5 {
            Self::Severe
        } else if ratio > 0.2 {
            Self::Moderate
        } else {
            Self::Minor
        }
    }
}

/// Proposed positions for a pair after separation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeparationSuggestion {
    pub direction: SeparationDirection,
    pub move_target: MoveTarget,
    /// Grid units the moving widget travels.
    pub distance: u32,
    pub first_position: GridPoint,
    pub second_position: GridPoint,
}

/// Two widgets whose facing edges are too close.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TouchingPair {
    pub first: Widget,
    pub second: Widget,
    pub separation_suggestion: SeparationSuggestion,
    pub separation_type: SeparationDirection,
    pub urgency: Urgency,
}

/// Two widgets whose interiors intersect.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlappingPair {
    pub first: Widget,
    pub second: Widget,
    pub overlap_area: u64,
    pub severity: OverlapSeverity,
}

/// Full report produced by [`analyze_layout`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlapAnalysis {
    pub overlapping: Vec<OverlappingPair>,
    /// Sorted by urgency, most urgent first.
    pub touching: Vec<TouchingPair>,
    pub total_issues: usize,
    pub recommendation: String,
}

impl OverlapAnalysis {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.total_issues == 0
    }
}

/// Run overlap and touching detection and summarize the result.
pub fn analyze_layout(widgets: &[Widget], options: &DetectorOptions) -> OverlapAnalysis {
    let overlapping = detect_overlapping_widgets(widgets);
    let touching = detect_touching_widgets(widgets, options);
    let total_issues = overlapping.len() + touching.len();
    let recommendation = recommendation(overlapping.len(), touching.len()).to_string();

    tracing::debug!(
        target: "gridspace.collision",
        widgets = widgets.len(),
        overlapping = overlapping.len(),
        touching = touching.len(),
        "layout analyzed"
    );

    OverlapAnalysis {
        overlapping,
        touching,
        total_issues,
        recommendation,
    }
}

fn recommendation(overlapping: usize, touching: usize) -> &'static str {
    if overlapping > 0 {
        "Layout needs attention: some widgets overlap each other."
    } else if touching > 3 {
        "Add breathing room: several widgets are touching each other."
    } else if touching > 0 {
        "Layout could benefit from spacing between touching widgets."
    } else {
        "Layout looks good."
    }
}

/// Every pair whose interiors intersect, with the overlap area and severity.
pub fn detect_overlapping_widgets(widgets: &[Widget]) -> Vec<OverlappingPair> {
    let mut pairs = Vec::new();
    for (i, first) in widgets.iter().enumerate() {
        for second in &widgets[i + 1..] {
            let overlap_area = first.grid_layout.overlap_area(&second.grid_layout);
            if overlap_area == 0 {
                continue;
            }
            let smaller = first.grid_layout.area().min(second.grid_layout.area());
            pairs.push(OverlappingPair {
                first: first.clone(),
                second: second.clone(),
                overlap_area,
                severity: OverlapSeverity::classify(overlap_area, smaller),
            });
        }
    }
    pairs
}

/// Every touching pair with a suggested fix, most urgent first.
///
/// The sort is stable: pairs of equal urgency keep enumeration order.
pub fn detect_touching_widgets(
    widgets: &[Widget],
    options: &DetectorOptions,
) -> Vec<TouchingPair> {
    let mut pairs = Vec::new();
    for (i, first) in widgets.iter().enumerate() {
        for second in &widgets[i + 1..] {
            if !are_widgets_touching(first, second, options) {
                continue;
            }
            let direction = get_best_separation_direction(first, second, widgets);
            let suggestion = calculate_separation(first, second, direction, widgets);
            let larger_area = first.grid_layout.area().max(second.grid_layout.area());
            pairs.push(TouchingPair {
                first: first.clone(),
                second: second.clone(),
                separation_suggestion: suggestion,
                separation_type: direction,
                urgency: Urgency::from_area(larger_area),
            });
        }
    }
    pairs.sort_by(|a, b| b.urgency.cmp(&a.urgency));
    pairs
}

/// Tolerance-based adjacency test.
pub fn are_widgets_touching(first: &Widget, second: &Widget, options: &DetectorOptions) -> bool {
    let a = first.layout();
    let b = second.layout();
    let spacing = options.effective_min_spacing();
    let near = |p: u32, q: u32| edge_distance(p, q) <= spacing;

    let touching_horizontally =
        a.rows_overlap(b) && (near(a.right(), b.x) || near(b.right(), a.x));
    let touching_vertically =
        a.columns_overlap(b) && (near(a.bottom(), b.y) || near(b.bottom(), a.y));

    let touching_diagonally = !options.ignore_diagonal_touching
        && ((near(a.right(), b.x) && near(a.bottom(), b.y))
            || (near(a.right(), b.x) && near(a.y, b.bottom()))
            || (near(a.x, b.right()) && near(a.bottom(), b.y))
            || (near(a.x, b.right()) && near(a.y, b.bottom())));

    touching_horizontally || touching_vertically || touching_diagonally
}

/// Free columns to the right of the pair before the grid edge or another
/// widget sharing the pair's rows.
pub fn available_horizontal_space(first: &Widget, second: &Widget, all: &[Widget]) -> u32 {
    let a = first.layout();
    let b = second.layout();
    let rightmost = a.right().max(b.right());
    let top = a.y.min(b.y);
    let bottom = a.bottom().max(b.bottom());

    let mut space = GRID_COLUMNS.saturating_sub(rightmost);
    for other in others(first, second, all) {
        let o = other.layout();
        let shares_rows = !(bottom <= o.y || o.bottom() <= top);
        if shares_rows && o.x >= rightmost {
            space = space.min(o.x - rightmost);
        }
    }
    space
}

/// Free rows below the pair, capped at [`VERTICAL_SPACE_CAP`] and cut short
/// by another widget sharing the pair's columns.
pub fn available_vertical_space(first: &Widget, second: &Widget, all: &[Widget]) -> u32 {
    let a = first.layout();
    let b = second.layout();
    let bottommost = a.bottom().max(b.bottom());
    let left = a.x.min(b.x);
    let right = a.right().max(b.right());

    let mut space = VERTICAL_SPACE_CAP;
    for other in others(first, second, all) {
        let o = other.layout();
        let shares_columns = !(right <= o.x || o.right() <= left);
        if shares_columns && o.y >= bottommost {
            space = space.min(o.y - bottommost);
        }
    }
    space
}

fn others<'a>(
    first: &'a Widget,
    second: &'a Widget,
    all: &'a [Widget],
) -> impl Iterator<Item = &'a Widget> + 'a {
    all.iter().filter(move |w| w.id != first.id && w.id != second.id)
}

/// Greedy single-step choice between pushing right and pushing down.
pub fn get_best_separation_direction(
    first: &Widget,
    second: &Widget,
    all: &[Widget],
) -> SeparationDirection {
    let horizontal = available_horizontal_space(first, second, all);
    let vertical = available_vertical_space(first, second, all);
    if horizontal >= 1 && (horizontal >= vertical || vertical < 1) {
        SeparationDirection::Horizontal
    } else {
        SeparationDirection::Vertical
    }
}

/// Move the trailing widget of the pair [`GAP_SIZE`] past the leading one.
///
/// Horizontal separation moves whichever widget starts further right (the
/// second one on a tie); vertical separation moves the lower one.
pub fn calculate_separation(
    first: &Widget,
    second: &Widget,
    direction: SeparationDirection,
    _all: &[Widget],
) -> SeparationSuggestion {
    let a = first.layout();
    let b = second.layout();
    let first_is_leading = match direction {
        SeparationDirection::Horizontal => a.x <= b.x,
        SeparationDirection::Vertical => a.y <= b.y,
    };
    let (leading, trailing) = if first_is_leading { (a, b) } else { (b, a) };

    let target = match direction {
        SeparationDirection::Horizontal => {
            GridPoint::new(leading.right().saturating_add(GAP_SIZE), trailing.y)
        }
        SeparationDirection::Vertical => {
            GridPoint::new(trailing.x, leading.bottom().saturating_add(GAP_SIZE))
        }
    };
    let distance = match direction {
        SeparationDirection::Horizontal => target.x.abs_diff(trailing.x),
        SeparationDirection::Vertical => target.y.abs_diff(trailing.y),
    };

    if first_is_leading {
        SeparationSuggestion {
            direction,
            move_target: MoveTarget::Second,
            distance,
            first_position: a.origin(),
            second_position: target,
        }
    } else {
        SeparationSuggestion {
            direction,
            move_target: MoveTarget::First,
            distance,
            first_position: target,
            second_position: b.origin(),
        }
    }
}
