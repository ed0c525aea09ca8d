#![forbid(unsafe_code)]

//! Non-destructive separation of touching widgets.
//!
//! The engine turns detector findings into a new widget list. Inputs are only
//! borrowed; every successful call returns a fresh `Vec<Widget>` in which only
//! the moved entries differ from the input.
//!
//! # Modes
//!
//! - **Conservative** (default, forced for batch runs): one widget per pair
//!   moves by exactly `gap_size` past its anchor. No cascades, no resizing.
//!   `Strict` boundary handling rejects moves past the last grid column.
//! - **Aggressive** (`conservative_mode: false`): after the move, the boundary
//!   policy may shrink the widget, newly overlapped neighbours are pushed
//!   outward for up to `max_cascade_depth` levels, and the whole result is
//!   discarded if any overlap remains.
//!
//! Failures never escape the public entry points: they are reported through
//! [`SeparationResult::success`] and [`SeparationResult::message`].

use std::fmt;

use rustc_hash::FxHashSet;
use serde::Serialize;

use gridspace_core::geometry::{GRID_COLUMNS, GridLayout, GridPoint};
use gridspace_core::{BoundaryHandling, DetectorOptions, SeparationOptions, Widget, WidgetId};

use crate::collision::{
    MoveTarget, SeparationDirection, SeparationSuggestion, TouchingPair, analyze_layout,
    are_widgets_touching, detect_overlapping_widgets,
};

/// Outcome of a separation request.
///
/// Callers must check [`success`](Self::success) before applying
/// [`updated_widgets`](Self::updated_widgets).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeparationResult {
    pub success: bool,
    pub updated_widgets: Vec<Widget>,
    /// Ids of moved widgets, without duplicates, in move order.
    pub affected_widgets: Vec<WidgetId>,
    pub cascade_count: u32,
    pub message: String,
    #[serde(skip)]
    pub error: Option<SeparationError>,
}

impl SeparationResult {
    fn failed(error: SeparationError, updated_widgets: Vec<Widget>) -> Self {
        Self {
            success: false,
            updated_widgets,
            affected_widgets: Vec::new(),
            cascade_count: 0,
            message: error.to_string(),
            error: Some(error),
        }
    }
}

/// Reasons a separation could not be applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeparationError {
    /// The widget nominated to move is not in the working set.
    WidgetNotFound { id: WidgetId },
    /// A move would push a widget past the grid's right edge.
    BoundaryViolation { id: WidgetId, right: u32, columns: u32 },
    /// Overlaps remained after all moves; nothing was applied.
    ResidualOverlaps { count: usize },
}

impl fmt::Display for SeparationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WidgetNotFound { id } => write!(f, "Widget to move not found: {id}"),
            Self::BoundaryViolation { id, right, columns } => write!(
                f,
                "Boundary constraint violation: widget {id} would exceed grid boundaries \
                 (right edge {right} > {columns})"
            ),
            Self::ResidualOverlaps { count } => write!(
                f,
                "Separation rolled back: {count} overlapping widget pair(s) would remain"
            ),
        }
    }
}

impl std::error::Error for SeparationError {}

/// A separation that has been applied to a copy of the widget list.
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedSeparation {
    pub widgets: Vec<Widget>,
    pub affected: Vec<WidgetId>,
    pub cascade_count: u32,
}

/// Separate one pair using the conservative suggestion.
///
/// Not-found and boundary failures return an empty `updated_widgets`; a
/// rollback after residual overlaps returns the original widgets.
pub fn separate_widgets(
    first: &Widget,
    second: &Widget,
    all: &[Widget],
    options: &SeparationOptions,
) -> SeparationResult {
    let _span = tracing::debug_span!(
        "gridspace.separate",
        first = %first.id,
        second = %second.id,
        conservative = options.conservative_mode,
    )
    .entered();

    let suggestion = calculate_conservative_separation(first, second, all, options);
    match apply_separation(&suggestion, first, second, all, options) {
        Ok(applied) => {
            let mut message = format!(
                "Separated {} and {} {}",
                first.id,
                second.id,
                match suggestion.direction {
                    SeparationDirection::Horizontal => "horizontally",
                    SeparationDirection::Vertical => "vertically",
                }
            );
            if applied.cascade_count > 0 {
                message.push_str(&format!(
                    " ({} cascading move(s))",
                    applied.cascade_count
                ));
            }
            tracing::debug!(
                target: "gridspace.separation",
                affected = applied.affected.len(),
                cascade_count = applied.cascade_count,
                "pair separated"
            );
            SeparationResult {
                success: true,
                updated_widgets: applied.widgets,
                affected_widgets: applied.affected,
                cascade_count: applied.cascade_count,
                message,
                error: None,
            }
        }
        Err(error) => {
            tracing::warn!(
                target: "gridspace.separation",
                first = %first.id,
                second = %second.id,
                error = %error,
                "separation failed"
            );
            let updated = match error {
                SeparationError::ResidualOverlaps { .. } => all.to_vec(),
                _ => Vec::new(),
            };
            SeparationResult::failed(error, updated)
        }
    }
}

/// Suggest a minimal move based on exact edge equality.
///
/// A shared vertical edge separates horizontally, otherwise a shared
/// horizontal edge separates vertically. The trailing widget (rightmost or
/// lowest) moves to `gap_size` beyond its anchor's far edge. Pairs with no
/// shared edge fall back to a horizontal move with a gap of 1.
pub fn calculate_conservative_separation(
    first: &Widget,
    second: &Widget,
    _all: &[Widget],
    options: &SeparationOptions,
) -> SeparationSuggestion {
    let a = first.layout();
    let b = second.layout();
    let gap = options.gap_size;

    if a.right() == b.x {
        trailing_move(a, b, MoveTarget::Second, SeparationDirection::Horizontal, gap)
    } else if b.right() == a.x {
        trailing_move(b, a, MoveTarget::First, SeparationDirection::Horizontal, gap)
    } else if a.bottom() == b.y {
        trailing_move(a, b, MoveTarget::Second, SeparationDirection::Vertical, gap)
    } else if b.bottom() == a.y {
        trailing_move(b, a, MoveTarget::First, SeparationDirection::Vertical, gap)
    } else if a.x <= b.x {
        trailing_move(a, b, MoveTarget::Second, SeparationDirection::Horizontal, 1)
    } else {
        trailing_move(b, a, MoveTarget::First, SeparationDirection::Horizontal, 1)
    }
}

fn trailing_move(
    anchor: &GridLayout,
    mover: &GridLayout,
    target: MoveTarget,
    direction: SeparationDirection,
    gap: u32,
) -> SeparationSuggestion {
    let destination = match direction {
        SeparationDirection::Horizontal => {
            GridPoint::new(anchor.right().saturating_add(gap), mover.y)
        }
        SeparationDirection::Vertical => {
            GridPoint::new(mover.x, anchor.bottom().saturating_add(gap))
        }
    };
    let distance = destination.x.abs_diff(mover.x) + destination.y.abs_diff(mover.y);
    let (first_position, second_position) = match target {
        MoveTarget::Second => (anchor.origin(), destination),
        _ => (destination, anchor.origin()),
    };
    SeparationSuggestion {
        direction,
        move_target: target,
        distance,
        first_position,
        second_position,
    }
}

fn movers(
    suggestion: &SeparationSuggestion,
    first: &Widget,
    second: &Widget,
) -> Vec<(WidgetId, GridPoint)> {
    match suggestion.move_target {
        MoveTarget::First => vec![(first.id.clone(), suggestion.first_position)],
        MoveTarget::Second => vec![(second.id.clone(), suggestion.second_position)],
        MoveTarget::Both => vec![
            (first.id.clone(), suggestion.first_position),
            (second.id.clone(), suggestion.second_position),
        ],
    }
}

fn index_of(widgets: &[Widget], id: &WidgetId) -> Result<usize, SeparationError> {
    widgets
        .iter()
        .position(|w| &w.id == id)
        .ok_or_else(|| SeparationError::WidgetNotFound { id: id.clone() })
}

/// Apply a suggestion to a copy of `all` according to the options' mode.
pub fn apply_separation(
    suggestion: &SeparationSuggestion,
    first: &Widget,
    second: &Widget,
    all: &[Widget],
    options: &SeparationOptions,
) -> Result<AppliedSeparation, SeparationError> {
    if options.conservative_mode {
        return apply_single_separation(suggestion, first, second, all, options);
    }

    let mut widgets = all.to_vec();
    let mut cascade = CascadeState::default();
    cascade.settled.insert(first.id.clone());
    cascade.settled.insert(second.id.clone());

    let mut moved = Vec::new();
    for (id, destination) in movers(suggestion, first, second) {
        let idx = index_of(&widgets, &id)?;
        let layout = widgets[idx].grid_layout.moved_to(destination);
        widgets[idx].grid_layout =
            handle_boundary_constraints(&id, layout, options.boundary_handling)?;
        cascade.record(&id);
        moved.push(id);
    }

    let mut cascade_count = 0;
    if !options.prevent_cascading {
        cascade_count =
            handle_cascading_overlaps(&mut widgets, &moved, 0, options, &mut cascade)?;
    }

    validate_no_overlaps(&widgets)?;

    Ok(AppliedSeparation {
        widgets,
        affected: cascade.affected,
        cascade_count,
    })
}

/// Move the suggested widget(s) without cascading or resizing.
///
/// Under `Strict` boundary handling a destination past the last column is
/// rejected; other policies let the widget overflow.
pub fn apply_single_separation(
    suggestion: &SeparationSuggestion,
    first: &Widget,
    second: &Widget,
    all: &[Widget],
    options: &SeparationOptions,
) -> Result<AppliedSeparation, SeparationError> {
    let mut widgets = all.to_vec();
    let mut affected = Vec::new();
    for (id, destination) in movers(suggestion, first, second) {
        let idx = index_of(&widgets, &id)?;
        let layout = widgets[idx].grid_layout.moved_to(destination);
        if options.boundary_handling == BoundaryHandling::Strict && layout.right() > GRID_COLUMNS {
            return Err(SeparationError::BoundaryViolation {
                id,
                right: layout.right(),
                columns: GRID_COLUMNS,
            });
        }
        widgets[idx].grid_layout = layout;
        affected.push(id);
    }
    Ok(AppliedSeparation {
        widgets,
        affected,
        cascade_count: 0,
    })
}

/// Apply the boundary policy to a layout that may extend past the grid.
pub fn handle_boundary_constraints(
    id: &WidgetId,
    layout: GridLayout,
    handling: BoundaryHandling,
) -> Result<GridLayout, SeparationError> {
    if layout.right() <= GRID_COLUMNS {
        return Ok(layout);
    }
    let violation = || SeparationError::BoundaryViolation {
        id: id.clone(),
        right: layout.right(),
        columns: GRID_COLUMNS,
    };
    match handling {
        BoundaryHandling::Expand => Ok(layout),
        BoundaryHandling::Strict => Err(violation()),
        BoundaryHandling::Compress => {
            let min_w = layout.min_w.unwrap_or(1).max(1);
            let w = GRID_COLUMNS.saturating_sub(layout.x).max(min_w);
            if layout.x.saturating_add(w) > GRID_COLUMNS {
                return Err(violation());
            }
            Ok(GridLayout { w, ..layout })
        }
    }
}

#[derive(Debug, Default)]
struct CascadeState {
    /// Widgets that must not be pushed again.
    settled: FxHashSet<WidgetId>,
    affected: Vec<WidgetId>,
}

impl CascadeState {
    fn record(&mut self, id: &WidgetId) {
        self.settled.insert(id.clone());
        if !self.affected.contains(id) {
            self.affected.push(id.clone());
        }
    }
}

/// Push widgets overlapped by `pushers` away, recursing on the pushed ones
/// until `max_cascade_depth` levels have run. Returns the number of pushes.
fn handle_cascading_overlaps(
    widgets: &mut [Widget],
    pushers: &[WidgetId],
    depth: u32,
    options: &SeparationOptions,
    cascade: &mut CascadeState,
) -> Result<u32, SeparationError> {
    if depth >= options.max_cascade_depth || pushers.is_empty() {
        return Ok(0);
    }

    let mut pushed = Vec::new();
    for pusher_id in pushers {
        let pusher_idx = index_of(widgets, pusher_id)?;
        let pusher = widgets[pusher_idx].grid_layout;
        for idx in 0..widgets.len() {
            let victim = &widgets[idx];
            if cascade.settled.contains(&victim.id) || !victim.grid_layout.overlaps(&pusher) {
                continue;
            }
            let id = victim.id.clone();
            let layout = push_away(&pusher, &victim.grid_layout, options.gap_size);
            let layout = handle_boundary_constraints(&id, layout, options.boundary_handling)?;
            tracing::debug!(
                target: "gridspace.separation",
                pusher = %pusher_id,
                pushed = %id,
                depth,
                "cascade push"
            );
            widgets[idx].grid_layout = layout;
            cascade.record(&id);
            pushed.push(id);
        }
    }

    let count = pushed.len() as u32;
    let deeper = handle_cascading_overlaps(widgets, &pushed, depth + 1, options, cascade)?;
    Ok(count + deeper)
}

/// Move `victim` clear of `pusher` along the axis of larger centre offset.
fn push_away(pusher: &GridLayout, victim: &GridLayout, gap: u32) -> GridLayout {
    let dx = victim.center_x() - pusher.center_x();
    let dy = victim.center_y() - pusher.center_y();
    let destination = if dx.abs() >= dy.abs() {
        let x = if dx >= 0.0 {
            pusher.right().saturating_add(gap)
        } else {
            pusher.x.saturating_sub(victim.w.saturating_add(gap))
        };
        GridPoint::new(x, victim.y)
    } else {
        let y = if dy >= 0.0 {
            pusher.bottom().saturating_add(gap)
        } else {
            pusher.y.saturating_sub(victim.h.saturating_add(gap))
        };
        GridPoint::new(victim.x, y)
    };
    victim.moved_to(destination)
}

/// Reject a widget set that still contains overlapping pairs.
pub fn validate_no_overlaps(widgets: &[Widget]) -> Result<(), SeparationError> {
    let count = detect_overlapping_widgets(widgets).len();
    if count == 0 {
        Ok(())
    } else {
        Err(SeparationError::ResidualOverlaps { count })
    }
}

/// Bucket pairs so that no widget appears twice within a bucket.
///
/// Pairs are taken most urgent first and placed in the first bucket that
/// contains neither of their widgets.
pub fn group_touching_pairs(pairs: &[TouchingPair]) -> Vec<Vec<TouchingPair>> {
    let mut ordered: Vec<&TouchingPair> = pairs.iter().collect();
    ordered.sort_by(|a, b| b.urgency.cmp(&a.urgency));

    let mut groups: Vec<(FxHashSet<WidgetId>, Vec<TouchingPair>)> = Vec::new();
    for pair in ordered {
        let slot = groups.iter().position(|(members, _)| {
            !members.contains(&pair.first.id) && !members.contains(&pair.second.id)
        });
        let (members, group) = match slot {
            Some(idx) => &mut groups[idx],
            None => {
                groups.push((FxHashSet::default(), Vec::new()));
                let last = groups.len() - 1;
                &mut groups[last]
            }
        };
        members.insert(pair.first.id.clone());
        members.insert(pair.second.id.clone());
        group.push(pair.clone());
    }
    groups.into_iter().map(|(_, group)| group).collect()
}

/// Conservatively separate every touching pair in the layout.
///
/// Pairs are processed group by group against the live working copy, so a
/// pair already resolved by an earlier move is skipped. Succeeds when at
/// least one pair was resolved; otherwise the original layout comes back
/// with `success: false`.
///
/// Conservative moves are not validated, so a move inside a packed row can
/// land on the next widget. Callers that persist the result should compare
/// [`detect_overlapping_widgets`] before and after.
pub fn separate_all_touching_widgets(
    widgets: &[Widget],
    options: &SeparationOptions,
) -> SeparationResult {
    let options = SeparationOptions {
        conservative_mode: true,
        prevent_cascading: true,
        gap_size: options.gap_size.max(1),
        ..*options
    };
    let _span = tracing::debug_span!(
        "gridspace.separate_all",
        widgets = widgets.len(),
        gap = options.gap_size,
    )
    .entered();

    let analysis = analyze_layout(widgets, &DetectorOptions::default());
    if analysis.touching.is_empty() {
        return SeparationResult {
            success: true,
            updated_widgets: widgets.to_vec(),
            affected_widgets: Vec::new(),
            cascade_count: 0,
            message: "No touching widgets found.".to_string(),
            error: None,
        };
    }

    let total = analysis.touching.len();
    let recheck = DetectorOptions::default().min_spacing_threshold(0.0);
    let mut updated = widgets.to_vec();
    let mut affected = Vec::new();
    let mut seen = FxHashSet::default();
    let mut cascade_count = 0;
    let mut resolved = 0usize;
    let mut last_error = None;

    for group in group_touching_pairs(&analysis.touching) {
        for pair in group {
            let current = (
                gridspace_core::find_widget(&updated, &pair.first.id),
                gridspace_core::find_widget(&updated, &pair.second.id),
            );
            let (Some(first), Some(second)) = current else {
                continue;
            };
            if !are_widgets_touching(first, second, &recheck) {
                continue;
            }
            let result = separate_widgets(first, second, &updated, &options);
            if !result.success {
                tracing::warn!(
                    target: "gridspace.separation",
                    first = %pair.first.id,
                    second = %pair.second.id,
                    reason = %result.message,
                    "pair left touching"
                );
                last_error = result.error;
                continue;
            }
            for id in result.affected_widgets {
                if seen.insert(id.clone()) {
                    affected.push(id);
                }
            }
            cascade_count += result.cascade_count;
            resolved += 1;
            updated = result.updated_widgets;
        }
    }

    tracing::debug!(
        target: "gridspace.separation",
        resolved,
        total,
        affected = affected.len(),
        "batch separation finished"
    );

    if resolved == 0 {
        return SeparationResult {
            success: false,
            updated_widgets: widgets.to_vec(),
            affected_widgets: Vec::new(),
            cascade_count: 0,
            message: format!("Could not add breathing room to any of {total} widget pairs"),
            error: last_error,
        };
    }

    SeparationResult {
        success: true,
        updated_widgets: updated,
        affected_widgets: affected,
        cascade_count,
        message: format!("Added breathing room to {resolved}/{total} widget pairs"),
        error: None,
    }
}

/// Heuristic options for a layout.
///
/// Density is widget count over [`GRID_COLUMNS`], not occupied area; layouts
/// above 0.7 compress at the boundary instead of overflowing.
pub fn get_optimal_separation_options(widgets: &[Widget]) -> SeparationOptions {
    let density = widgets.len() as f64 / f64::from(GRID_COLUMNS);
    SeparationOptions {
        gap_size: 1,
        prevent_cascading: true,
        max_cascade_depth: 1,
        boundary_handling: if density > 0.7 {
            BoundaryHandling::Compress
        } else {
            BoundaryHandling::Expand
        },
        conservative_mode: true,
    }
}
