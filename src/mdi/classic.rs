use egui::{Pos2, Rect, Vec2, pos2, vec2};
use itertools::Itertools as _;

use crate::model::DockableId;
use crate::options::MdiOptions;

use super::{
    MdiArrangement, MdiLayoutManager, MdiState, MdiWindow, ResizeDirection, TileMode,
    is_valid_rect, is_valid_size,
};

/// Overlapping windows with edge snapping, bottom icon row and a single maximized window.
#[derive(Clone, Debug, Default)]
pub struct ClassicMdiLayout {
    pub options: MdiOptions,
}

impl ClassicMdiLayout {
    pub fn new(options: MdiOptions) -> Self {
        Self { options }
    }

    fn min_size(&self) -> Vec2 {
        vec2(self.options.min_width, self.options.min_height)
    }

    /// Restore bounds of the `slot`-th window of a cascade.
    fn cascade_slot(&self, slot: usize, container: Vec2) -> Rect {
        let size = (container * self.options.cascade_size_fraction).max(self.min_size());
        let offset = self.options.cascade_offset.max(1.0);
        let free = (container - size).max(Vec2::ZERO);
        let steps = ((free.x / offset).floor() as usize + 1)
            .min((free.y / offset).floor() as usize + 1)
            .max(1);
        let step = (slot % steps) as f32 * offset;
        Rect::from_min_size(pos2(step, step), size)
    }

    /// Keeps at least `min_visible` of the window inside the container, and its top edge
    /// (where the caption is) below the container's top.
    fn clamp_normal(&self, rect: Rect, container: Vec2) -> Rect {
        let size = rect.size().max(self.min_size());
        let keep = self.options.min_visible;
        let x = clamp_soft(rect.min.x, keep - size.x, container.x - keep);
        let y = clamp_soft(rect.min.y, 0.0, container.y - keep);
        Rect::from_min_size(pos2(x, y), size)
    }

    /// First-fit icon slots along the bottom edge, left to right, wrapping upwards.
    fn place_icons(&self, count: usize, container: Vec2) -> Vec<Rect> {
        let icon = self.options.icon_size;
        let margin = self.options.icon_margin;
        let mut rows: Vec<Vec<(f32, f32)>> = Vec::new();
        let mut icons = Vec::with_capacity(count);

        for _ in 0..count {
            let mut placed = None;
            for (row_index, row) in rows.iter_mut().enumerate() {
                if let Some(x) = first_gap(row, icon.x, margin, container.x) {
                    row.push((x, x + icon.x));
                    row.sort_by(|a, b| a.0.total_cmp(&b.0));
                    placed = Some((row_index, x));
                    break;
                }
            }
            let (row_index, x) = placed.unwrap_or_else(|| {
                rows.push(vec![(margin, margin + icon.x)]);
                (rows.len() - 1, margin)
            });
            let y = container.y - (row_index + 1) as f32 * (icon.y + margin);
            icons.push(Rect::from_min_size(pos2(x, y), icon));
        }
        icons
    }

    /// Snap candidates: container edges plus the edges of other normal windows.
    fn snap_edges(&self, id: DockableId, container: Vec2, windows: &[MdiWindow]) -> (Vec<f32>, Vec<f32>) {
        let mut xs = vec![0.0, container.x];
        let mut ys = vec![0.0, container.y];
        for other in windows
            .iter()
            .filter(|w| w.id != id && w.state == MdiState::Normal && w.is_placed())
        {
            xs.extend([other.bounds.min.x, other.bounds.max.x]);
            ys.extend([other.bounds.min.y, other.bounds.max.y]);
        }
        (xs, ys)
    }

    /// Area left for normal windows once the icon row is reserved.
    fn tile_area(&self, windows: &[MdiWindow], container: Vec2) -> Rect {
        let mut height = container.y;
        if windows.iter().any(|w| w.state == MdiState::Minimized) {
            let reserved = self.options.icon_size.y + 2.0 * self.options.icon_margin;
            height = (height - reserved).max(self.options.min_height.min(container.y));
        }
        Rect::from_min_size(Pos2::ZERO, vec2(container.x, height))
    }
}

impl MdiLayoutManager for ClassicMdiLayout {
    fn arrange(&self, windows: &[MdiWindow], container: Vec2) -> Option<Vec<MdiArrangement>> {
        if !is_valid_size(container) {
            return None;
        }

        let full = Rect::from_min_size(Pos2::ZERO, container);
        let maximized = windows
            .iter()
            .enumerate()
            .filter(|(_, w)| w.state == MdiState::Maximized)
            .max_by_key(|&(index, w)| (w.z_index, index))
            .map(|(_, w)| w.id);

        let minimized_count = windows
            .iter()
            .filter(|w| w.state == MdiState::Minimized)
            .count();
        let mut icons = self.place_icons(minimized_count, container).into_iter();
        let mut unplaced = 0;

        let mut out = Vec::with_capacity(windows.len());
        for window in windows {
            let bounds = match window.state {
                MdiState::Minimized => icons.next().unwrap_or(Rect::ZERO),
                MdiState::Maximized if maximized == Some(window.id) => full,
                MdiState::Normal | MdiState::Maximized => {
                    if window.is_placed() {
                        self.clamp_normal(window.bounds, container)
                    } else {
                        unplaced += 1;
                        self.clamp_normal(self.cascade_slot(unplaced - 1, container), container)
                    }
                }
            };
            out.push(MdiArrangement {
                id: window.id,
                bounds,
                hit_testable: maximized.is_none_or(|m| m == window.id),
            });
        }
        Some(out)
    }

    fn update_z_order(&self, windows: &[MdiWindow], active: Option<DockableId>) -> Vec<i32> {
        let mut order = (0..windows.len())
            .sorted_by_key(|&index| windows[index].z_index)
            .collect_vec();
        if let Some(active) = active
            && let Some(pos) = order.iter().position(|&index| windows[index].id == active)
        {
            let index = order.remove(pos);
            order.push(index);
        }

        let mut z = vec![0; windows.len()];
        for (rank, index) in order.into_iter().enumerate() {
            z[index] = i32::try_from(rank).unwrap_or(i32::MAX);
        }
        z
    }

    fn drag_bounds(
        &self,
        id: DockableId,
        start: Rect,
        delta: Vec2,
        container: Vec2,
        windows: &[MdiWindow],
    ) -> Rect {
        let moved = start.translate(delta);
        if !is_valid_rect(moved) {
            return start;
        }
        let (xs, ys) = self.snap_edges(id, container, windows);
        let threshold = self.options.snap_threshold;
        let dx = snap_offset(moved.min.x, moved.max.x, &xs, threshold);
        let dy = snap_offset(moved.min.y, moved.max.y, &ys, threshold);
        moved.translate(vec2(dx, dy))
    }

    fn resize_bounds(
        &self,
        id: DockableId,
        start: Rect,
        delta: Vec2,
        direction: ResizeDirection,
        container: Vec2,
        windows: &[MdiWindow],
    ) -> Rect {
        if !is_valid_rect(start.translate(delta)) {
            return start;
        }
        let min = self.min_size();
        let threshold = self.options.snap_threshold;
        let (xs, ys) = self.snap_edges(id, container, windows);

        let mut rect = start;
        if direction.moves_left() {
            let left = snap_value(start.min.x + delta.x, &xs, threshold);
            rect.min.x = left.min(start.max.x - min.x);
        }
        if direction.moves_right() {
            let right = snap_value(start.max.x + delta.x, &xs, threshold);
            rect.max.x = right.max(start.min.x + min.x);
        }
        if direction.moves_top() {
            let top = snap_value(start.min.y + delta.y, &ys, threshold);
            rect.min.y = top.min(start.max.y - min.y);
        }
        if direction.moves_bottom() {
            let bottom = snap_value(start.max.y + delta.y, &ys, threshold);
            rect.max.y = bottom.max(start.min.y + min.y);
        }
        rect
    }

    fn cascade(&self, windows: &[MdiWindow], container: Vec2) -> Vec<(DockableId, Rect)> {
        if !is_valid_size(container) {
            return Vec::new();
        }
        windows
            .iter()
            .enumerate()
            .filter(|(_, w)| w.state != MdiState::Minimized)
            .sorted_by_key(|&(index, w)| (w.z_index, index))
            .enumerate()
            .map(|(slot, (index, w))| (index, w.id, self.cascade_slot(slot, container)))
            .sorted_by_key(|&(index, _, _)| index)
            .map(|(_, id, rect)| (id, rect))
            .collect()
    }

    fn tile(
        &self,
        windows: &[MdiWindow],
        container: Vec2,
        mode: TileMode,
    ) -> Vec<(DockableId, Rect)> {
        if !is_valid_size(container) {
            return Vec::new();
        }
        let area = self.tile_area(windows, container);
        let ids = windows
            .iter()
            .filter(|w| w.state != MdiState::Minimized)
            .map(|w| w.id)
            .collect_vec();
        let n = ids.len();
        if n == 0 {
            return Vec::new();
        }

        let (cols, rows) = match mode {
            TileMode::Horizontal => (n, 1),
            TileMode::Vertical => (1, n),
            TileMode::Grid => {
                let cols = (n as f32).sqrt().ceil() as usize;
                (cols, n.div_ceil(cols))
            }
        };
        let cell_h = area.height() / rows as f32;

        ids.into_iter()
            .enumerate()
            .map(|(k, id)| {
                let row = k / cols;
                let col = k % cols;
                let in_row = if row + 1 == rows { n - cols * (rows - 1) } else { cols };
                let cell_w = area.width() / in_row as f32;
                let min = pos2(area.min.x + col as f32 * cell_w, area.min.y + row as f32 * cell_h);
                (id, Rect::from_min_size(min, vec2(cell_w, cell_h)))
            })
            .collect()
    }
}

/// `value.clamp(lo, hi)` that never panics: `lo` wins when the range is empty.
fn clamp_soft(value: f32, lo: f32, hi: f32) -> f32 {
    value.min(hi).max(lo)
}

/// Leftmost x in a row where an icon of `width` fits with `margin` on both sides.
fn first_gap(occupied: &[(f32, f32)], width: f32, margin: f32, row_width: f32) -> Option<f32> {
    let mut cursor = margin;
    for &(start, end) in occupied {
        if cursor + width + margin <= start {
            return Some(cursor);
        }
        cursor = cursor.max(end + margin);
    }
    (cursor + width + margin <= row_width).then_some(cursor)
}

/// Shift that makes the nearest of `lo`/`hi` flush with an edge within `threshold`.
fn snap_offset(lo: f32, hi: f32, edges: &[f32], threshold: f32) -> f32 {
    edges
        .iter()
        .flat_map(|&edge| [edge - lo, edge - hi])
        .filter(|d| d.abs() <= threshold)
        .min_by(|a, b| a.abs().total_cmp(&b.abs()))
        .unwrap_or(0.0)
}

fn snap_value(value: f32, edges: &[f32], threshold: f32) -> f32 {
    value + snap_offset(value, value, edges, threshold)
}
