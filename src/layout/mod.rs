//! Geometry: the proportional split algorithm and whole-tree arrangement.

mod arrange;
mod proportional;

pub use arrange::{arrange, arrange_windows, assign_proportions, drag_splitter, pinned_preview_rect};
pub use proportional::{
    LayoutItem, PROPORTION_EPSILON, apply_splitter_delta, layout_rects, layout_sizes,
    normalize_proportions,
};
