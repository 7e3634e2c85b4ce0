use egui::Vec2;

/// Options for the drag controller and the dock manager.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DockOptions {
    /// Pointer travel (in points) from the press position before a press becomes a drag.
    ///
    /// Movement strictly below this keeps the gesture in the pressed state without any effect.
    pub min_drag_distance: f32,

    /// How far (in points) the pointer must leave the source surface, or overshoot a tab strip,
    /// before the drop resolves to a floating window.
    pub float_distance: f32,

    /// Proportion given to the dragged side of a new split.
    pub default_split_ratio: f64,

    /// Thickness of splitters created by the dock manager.
    pub splitter_thickness: f32,

    /// Minimum size (in points) a proportional child keeps during splitter drags.
    ///
    /// Overridden per dockable by [`crate::model::Dockable::min_size`].
    pub default_min_size: f64,

    /// Edge drop band as a fraction of the hovered dock's smaller dimension.
    ///
    /// The band is clamped to `16..=80` points.
    pub edge_band_fraction: f32,

    /// If true, the corners of the hovered dock resolve to corner operations.
    pub corner_zones: bool,

    /// Window size used when floating a dockable whose visible bounds are unknown.
    pub float_window_default_size: Vec2,

    /// Smallest size of a newly floated window.
    pub float_window_min_size: Vec2,

    /// Fraction of the root size the pinned preview takes along its edge.
    pub pinned_preview_fraction: f32,

    /// If true, record drag/drop decisions in a small ring buffer ([`crate::DebugEventLog`]).
    pub debug_event_log: bool,

    /// Max lines kept by the debug event log.
    pub debug_event_log_capacity: usize,

    /// If true, run the tree integrity checker after every committed drop.
    pub debug_integrity: bool,

    /// If true (and `debug_integrity` is on), panic on integrity failures in debug builds.
    pub debug_integrity_panic: bool,
}

impl Default for DockOptions {
    fn default() -> Self {
        Self {
            min_drag_distance: 4.0,
            float_distance: 32.0,
            default_split_ratio: 0.5,
            splitter_thickness: 4.0,
            default_min_size: 50.0,
            edge_band_fraction: 0.25,
            corner_zones: true,
            float_window_default_size: Vec2::new(480.0, 360.0),
            float_window_min_size: Vec2::new(200.0, 120.0),
            pinned_preview_fraction: 0.25,
            debug_event_log: false,
            debug_event_log_capacity: 200,
            debug_integrity: false,
            debug_integrity_panic: false,
        }
    }
}

impl DockOptions {
    /// Width of the edge drop band for a dock of the given size.
    pub fn edge_band(&self, size: Vec2) -> f32 {
        (size.min_elem() * self.edge_band_fraction).clamp(16.0, 80.0)
    }
}

/// Options for [`crate::mdi::ClassicMdiLayout`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MdiOptions {
    /// Edges closer than this (inclusive) snap flush during drag and resize.
    pub snap_threshold: f32,
    pub min_width: f32,
    pub min_height: f32,
    /// Part of a normal window that must stay inside the container.
    pub min_visible: f32,
    /// Size of a minimized document icon.
    pub icon_size: Vec2,
    /// Gap between minimized icons and around the icon row.
    pub icon_margin: f32,
    /// Step between windows when cascading.
    pub cascade_offset: f32,
    /// Cascaded window size relative to the container.
    pub cascade_size_fraction: f32,
}

impl Default for MdiOptions {
    fn default() -> Self {
        Self {
            snap_threshold: 10.0,
            min_width: 120.0,
            min_height: 60.0,
            min_visible: 32.0,
            icon_size: Vec2::new(160.0, 28.0),
            icon_margin: 4.0,
            cascade_offset: 24.0,
            cascade_size_fraction: 0.6,
        }
    }
}
