#![no_main]

use arbitrary::Arbitrary;
use gridspace_core::{BoundaryHandling, SeparationOptions, Widget};
use gridspace_layout::{
    DetectorOptions, detect_overlapping_widgets, detect_touching_widgets,
    separate_all_touching_widgets, separate_widgets,
};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input {
    boxes: Vec<(u8, u8, u8, u8)>,
    boundary: u8,
    gap: u8,
    depth: u8,
    aggressive: bool,
    prevent_cascading: bool,
}

fuzz_target!(|input: Input| {
    // Keep the grid small so pairs actually meet.
    let widgets: Vec<Widget> = input
        .boxes
        .iter()
        .take(32)
        .enumerate()
        .map(|(i, &(x, y, w, h))| {
            Widget::at(
                format!("w{i}"),
                u32::from(x % 30),
                u32::from(y % 30),
                u32::from(w % 8) + 1,
                u32::from(h % 8) + 1,
            )
        })
        .collect();

    let options = SeparationOptions::default()
        .gap_size(u32::from(input.gap % 4))
        .max_cascade_depth(u32::from(input.depth % 5))
        .prevent_cascading(input.prevent_cascading)
        .conservative_mode(!input.aggressive)
        .boundary_handling(match input.boundary % 3 {
            0 => BoundaryHandling::Strict,
            1 => BoundaryHandling::Expand,
            _ => BoundaryHandling::Compress,
        });

    let batch = separate_all_touching_widgets(&widgets, &options);
    assert_eq!(batch.updated_widgets.len(), widgets.len(), "batch lost widgets");
    assert_eq!(batch.cascade_count, 0, "batch run cascaded");
    for (before, after) in widgets.iter().zip(&batch.updated_widgets) {
        assert_eq!(before.id, after.id, "batch reordered widgets");
        assert_eq!(before.grid_layout.w, after.grid_layout.w, "batch resized a widget");
        assert_eq!(before.grid_layout.h, after.grid_layout.h, "batch resized a widget");
    }

    let pairs = detect_touching_widgets(&widgets, &DetectorOptions::default());
    if let Some(pair) = pairs.first() {
        let result = separate_widgets(&pair.first, &pair.second, &widgets, &options);
        if result.success {
            assert_eq!(result.updated_widgets.len(), widgets.len());
            if input.aggressive {
                assert!(
                    detect_overlapping_widgets(&result.updated_widgets).is_empty(),
                    "aggressive success left overlaps"
                );
            }
            if options.boundary_handling == BoundaryHandling::Strict {
                for (before, after) in widgets.iter().zip(&result.updated_widgets) {
                    if before.grid_layout != after.grid_layout {
                        assert!(after.grid_layout.right() <= 24, "strict move overflowed");
                    }
                }
            }
        } else {
            assert!(
                result.updated_widgets.is_empty() || result.updated_widgets == widgets,
                "failed separation returned a partial layout"
            );
        }
    }
});
