//! MDI (multi-document interface) arrangement: overlapping document windows inside one
//! document dock.
//!
//! Everything here is a pure function of its inputs. Coordinates are local to the MDI
//! container, with the container spanning `(0, 0)..container_size`.

use egui::{Rect, Vec2};

use crate::model::DockableId;

mod classic;

pub use classic::ClassicMdiLayout;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum MdiState {
    #[default]
    Normal,
    Minimized,
    Maximized,
}

/// Per-document MDI state stored on the dockable.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct MdiProperties {
    /// Restore bounds. An empty rect means "not placed yet".
    pub bounds: Rect,
    pub state: MdiState,
    pub z_index: i32,
}

impl Default for MdiProperties {
    fn default() -> Self {
        Self {
            bounds: Rect::ZERO,
            state: MdiState::Normal,
            z_index: 0,
        }
    }
}

/// Snapshot of one document handed to an [`MdiLayoutManager`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MdiWindow {
    pub id: DockableId,
    pub bounds: Rect,
    pub state: MdiState,
    pub z_index: i32,
}

impl MdiWindow {
    pub fn new(id: DockableId, properties: MdiProperties) -> Self {
        Self {
            id,
            bounds: properties.bounds,
            state: properties.state,
            z_index: properties.z_index,
        }
    }

    pub(crate) fn is_placed(&self) -> bool {
        is_valid_rect(self.bounds) && self.bounds.width() > 0.0 && self.bounds.height() > 0.0
    }
}

/// Result of [`MdiLayoutManager::arrange`] for one document.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MdiArrangement {
    pub id: DockableId,
    pub bounds: Rect,
    /// False for documents covered by a maximized one.
    pub hit_testable: bool,
}

/// Edge or corner grabbed in an interactive resize.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResizeDirection {
    Left,
    Right,
    Top,
    Bottom,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl ResizeDirection {
    pub fn moves_left(self) -> bool {
        matches!(self, Self::Left | Self::TopLeft | Self::BottomLeft)
    }

    pub fn moves_right(self) -> bool {
        matches!(self, Self::Right | Self::TopRight | Self::BottomRight)
    }

    pub fn moves_top(self) -> bool {
        matches!(self, Self::Top | Self::TopLeft | Self::TopRight)
    }

    pub fn moves_bottom(self) -> bool {
        matches!(self, Self::Bottom | Self::BottomLeft | Self::BottomRight)
    }
}

/// Arrangement requested by the user through the window menu.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TileMode {
    /// Rows and columns, as square as possible.
    #[default]
    Grid,
    /// Side by side, left to right.
    Horizontal,
    /// Stacked, top to bottom.
    Vertical,
}

/// Pluggable MDI arrangement policy.
pub trait MdiLayoutManager {
    /// Bounds for every document, in input order.
    ///
    /// Returns `None` when the container size is not finite or empty.
    fn arrange(&self, windows: &[MdiWindow], container: Vec2) -> Option<Vec<MdiArrangement>>;

    /// Dense z-indices `0..n` in input order, with `active` on top.
    fn update_z_order(&self, windows: &[MdiWindow], active: Option<DockableId>) -> Vec<i32>;

    /// Bounds of `id` while being dragged by `delta` from `start`.
    fn drag_bounds(
        &self,
        id: DockableId,
        start: Rect,
        delta: Vec2,
        container: Vec2,
        windows: &[MdiWindow],
    ) -> Rect;

    /// Bounds of `id` while its `direction` edge(s) are dragged by `delta` from `start`.
    fn resize_bounds(
        &self,
        id: DockableId,
        start: Rect,
        delta: Vec2,
        direction: ResizeDirection,
        container: Vec2,
        windows: &[MdiWindow],
    ) -> Rect;

    /// Restore bounds for cascading every non-minimized document, in input order.
    fn cascade(&self, windows: &[MdiWindow], container: Vec2) -> Vec<(DockableId, Rect)>;

    /// Restore bounds for tiling every non-minimized document, in input order.
    fn tile(&self, windows: &[MdiWindow], container: Vec2, mode: TileMode)
    -> Vec<(DockableId, Rect)>;
}

pub(crate) fn is_valid_size(size: Vec2) -> bool {
    size.x.is_finite() && size.y.is_finite() && size.x > 0.0 && size.y > 0.0
}

pub(crate) fn is_valid_rect(rect: Rect) -> bool {
    rect.min.x.is_finite() && rect.min.y.is_finite() && rect.max.x.is_finite() && rect.max.y.is_finite()
}
