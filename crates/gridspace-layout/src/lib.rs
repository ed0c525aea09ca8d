#![forbid(unsafe_code)]

//! Widget collision detection and separation.
//!
//! # Role in gridspace
//! The [`collision`] module reports overlapping and touching widget pairs;
//! the [`separation`] module turns those findings into a new layout that
//! adds breathing room with minimal displacement. Both are pure functions
//! over a borrowed widget slice.
//!
//! ```
//! use gridspace_layout::{DetectorOptions, SeparationOptions, Widget};
//! use gridspace_layout::{analyze_layout, separate_all_touching_widgets};
//!
//! let widgets = vec![Widget::at("a", 0, 0, 6, 4), Widget::at("b", 6, 0, 6, 4)];
//! let analysis = analyze_layout(&widgets, &DetectorOptions::default());
//! assert_eq!(analysis.touching.len(), 1);
//!
//! let result = separate_all_touching_widgets(&widgets, &SeparationOptions::default());
//! assert!(result.success);
//! assert_eq!(result.updated_widgets[1].grid_layout.x, 7);
//! ```

pub mod collision;
#[cfg(feature = "config")]
pub mod config;
pub mod separation;

pub use gridspace_core::geometry::{GRID_COLUMNS, GridLayout, GridPoint};
pub use gridspace_core::{
    BoundaryHandling, DetectorOptions, LayoutDocument, SeparationOptions, Widget, WidgetId,
};

pub use collision::{
    MoveTarget, OverlapAnalysis, OverlapSeverity, OverlappingPair, SeparationDirection,
    SeparationSuggestion, TouchingPair, Urgency, analyze_layout, are_widgets_touching,
    calculate_separation, detect_overlapping_widgets, detect_touching_widgets,
    get_best_separation_direction,
};
#[cfg(feature = "config")]
pub use config::{ConfigError, GridspaceConfig};
pub use separation::{
    AppliedSeparation, SeparationError, SeparationResult, apply_separation,
    apply_single_separation, calculate_conservative_separation, get_optimal_separation_options,
    group_touching_pairs, separate_all_touching_widgets, separate_widgets,
};
