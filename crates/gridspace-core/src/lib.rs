#![forbid(unsafe_code)]

//! Core data model for dashboard widget layouts.
//!
//! # Role in gridspace
//! `gridspace-core` owns the vocabulary shared by the detector, the
//! separation engine, and the doctor CLI: grid rectangles, widget records,
//! the persisted layout document, and the option structs that tune
//! detection and separation.
//!
//! It has no behavior beyond geometry and validation; the algorithms live in
//! `gridspace-layout`.

pub mod geometry;
pub mod options;
pub mod widget;

pub use geometry::{GAP_SIZE, GRID_COLUMNS, GridLayout, GridPoint, VERTICAL_SPACE_CAP};
pub use options::{BoundaryHandling, DetectorOptions, SeparationOptions};
pub use widget::{
    LAYOUT_SCHEMA_VERSION, LayoutDocument, LayoutValidationError, Widget, WidgetId, find_widget,
    validate_widgets,
};
