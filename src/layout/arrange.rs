use egui::{Rect, Vec2, pos2, vec2};

use crate::error::DockError;
use crate::mdi::{MdiLayoutManager, MdiWindow};
use crate::model::{DockKind, DockTree, DockableId, DocumentLayout, Orientation, PinnedAlignment};
use crate::options::DockOptions;

use super::proportional::{LayoutItem, apply_splitter_delta, layout_rects, normalize_proportions};

/// How a container places its visible children.
#[derive(Clone, Copy, Debug)]
enum Placement {
    Proportional(Orientation),
    Pixel(Orientation),
    /// Only the active child is shown.
    Active,
    Mdi,
    Grid,
    Wrap(Orientation),
}

fn placement(kind: &DockKind) -> Placement {
    match kind {
        DockKind::Proportional { orientation } => Placement::Proportional(*orientation),
        DockKind::Pixel { orientation } => Placement::Pixel(*orientation),
        DockKind::Document {
            layout: DocumentLayout::Mdi,
        } => Placement::Mdi,
        DockKind::Tool { .. }
        | DockKind::Document {
            layout: DocumentLayout::Tabbed,
        }
        | DockKind::Root(_) => Placement::Active,
        DockKind::Grid => Placement::Grid,
        DockKind::Wrap { orientation } => Placement::Wrap(*orientation),
    }
}

fn is_valid_bounds(rect: Rect) -> bool {
    rect.is_finite() && rect.width() > 0.0 && rect.height() > 0.0
}

/// Fills unassigned and rescales the proportions of `dock`'s content children so they sum to one.
///
/// # Errors
/// `dock` must be a container.
pub fn assign_proportions<C>(tree: &mut DockTree<C>, dock: DockableId) -> Result<(), DockError> {
    if tree.container(dock).is_none() {
        return Err(DockError::NotAContainer(dock));
    }
    let content = tree.content_children(dock);
    let mut proportions: Vec<f64> = content
        .iter()
        .map(|&id| tree.get(id).map_or(f64::NAN, |d| d.proportion))
        .collect();
    normalize_proportions(&mut proportions);
    for (id, proportion) in content.into_iter().zip(proportions) {
        if let Some(dockable) = tree.get_mut(id) {
            dockable.proportion = proportion;
        }
    }
    Ok(())
}

/// Lays out `root` and everything visible below it inside `bounds`, storing each dockable's
/// `bounds.visible` (`None` for children hidden behind another tab).
///
/// Proportions of proportional docks are normalized as a side effect. Calling this twice with
/// the same inputs yields the same bounds.
///
/// # Errors
/// [`DockError::InvalidGeometry`] for non-finite or empty bounds; nothing is written then.
pub fn arrange<C>(
    tree: &mut DockTree<C>,
    root: DockableId,
    bounds: Rect,
    options: &DockOptions,
    mdi: &dyn MdiLayoutManager,
) -> Result<(), DockError> {
    if !tree.contains(root) {
        return Err(DockError::MissingDockable(root));
    }
    if !is_valid_bounds(bounds) {
        log::debug!("arrange {root}: skipped, cannot lay out in {bounds:?}");
        return Err(DockError::InvalidGeometry);
    }
    arrange_node(tree, root, bounds, options, mdi);
    Ok(())
}

/// Arranges the layout root of every floating window inside that window's rectangle.
///
/// Windows with unusable geometry are skipped.
pub fn arrange_windows<C>(tree: &mut DockTree<C>, options: &DockOptions, mdi: &dyn MdiLayoutManager) {
    let windows: Vec<(DockableId, Rect)> = tree
        .windows()
        .iter()
        .map(|window| (window.layout, window.rect()))
        .collect();
    for (layout, rect) in windows {
        if let Err(err) = arrange(tree, layout, rect, options, mdi) {
            log::debug!("arrange window layout {layout}: {err}");
        }
    }
}

fn set_visible<C>(tree: &mut DockTree<C>, id: DockableId, rect: Option<Rect>) {
    if let Some(dockable) = tree.get_mut(id) {
        dockable.bounds.visible = rect;
    }
}

/// Clears the visible bounds of `id` and everything below it.
fn clear_visible<C>(tree: &mut DockTree<C>, id: DockableId) {
    let mut stack = vec![id];
    while let Some(id) = stack.pop() {
        set_visible(tree, id, None);
        stack.extend_from_slice(tree.children(id));
    }
}

fn arrange_node<C>(
    tree: &mut DockTree<C>,
    id: DockableId,
    rect: Rect,
    options: &DockOptions,
    mdi: &dyn MdiLayoutManager,
) {
    set_visible(tree, id, Some(rect));
    let Some(container) = tree.container(id) else {
        return;
    };
    let placement = placement(&container.kind);
    let is_root = container.kind.is_root();
    let children = container.visible.clone();
    let active = container.active;

    let placed: Vec<(DockableId, Option<Rect>)> = match placement {
        Placement::Proportional(orientation) => {
            if assign_proportions(tree, id).is_err() {
                return;
            }
            let items: Vec<LayoutItem> = children
                .iter()
                .map(|&child| layout_item(tree, child))
                .collect();
            let Some(rects) = layout_rects(&items, orientation, rect) else {
                return;
            };
            children.iter().copied().zip(rects.into_iter().map(Some)).collect()
        }
        Placement::Pixel(orientation) => pixel_rects(tree, &children, orientation, rect),
        Placement::Active => {
            let shown = active.or_else(|| tree.content_children(id).first().copied());
            children
                .iter()
                .map(|&child| (child, (Some(child) == shown).then_some(rect)))
                .collect()
        }
        Placement::Mdi => mdi_rects(tree, &children, rect, mdi),
        Placement::Grid => grid_rects(tree, &children, rect),
        Placement::Wrap(orientation) => wrap_rects(tree, &children, orientation, rect, options),
    };

    for (child, child_rect) in placed {
        match child_rect {
            Some(child_rect) => arrange_node(tree, child, child_rect, options, mdi),
            None => clear_visible(tree, child),
        }
    }

    if is_root {
        update_pinned_bounds(tree, id, options);
    }
}

fn layout_item<C>(tree: &DockTree<C>, id: DockableId) -> LayoutItem {
    match tree.get(id) {
        Some(dockable) => match dockable.splitter() {
            Some(splitter) => LayoutItem::Splitter {
                thickness: f64::from(splitter.thickness),
            },
            None => LayoutItem::Content {
                proportion: dockable.proportion,
                min_size: dockable.min_size.unwrap_or(0.0),
            },
        },
        None => LayoutItem::Splitter { thickness: 0.0 },
    }
}

/// Preferred pixel sizes along the axis; children without one share the rest, else the last
/// content child fills.
fn pixel_rects<C>(
    tree: &DockTree<C>,
    children: &[DockableId],
    orientation: Orientation,
    rect: Rect,
) -> Vec<(DockableId, Option<Rect>)> {
    let extent = orientation.main(rect.size());
    let fixed_size = |id: DockableId| -> Option<f32> {
        let dockable = tree.get(id)?;
        match dockable.splitter() {
            Some(splitter) => Some(splitter.thickness.max(0.0)),
            None => dockable.preferred_size.filter(|s| s.is_finite()).map(|s| s.max(0.0)),
        }
    };

    let fixed: f32 = children.iter().filter_map(|&id| fixed_size(id)).sum();
    let flexible = children.iter().filter(|&&id| fixed_size(id).is_none()).count();
    let free = (extent - fixed).max(0.0);
    let last_content = children
        .iter()
        .rposition(|&id| tree.get(id).is_some_and(|d| !d.is_splitter()));

    let mut cursor = 0.0;
    children
        .iter()
        .enumerate()
        .map(|(index, &id)| {
            let mut size = match fixed_size(id) {
                Some(size) => size,
                None => free / flexible.max(1) as f32,
            };
            if flexible == 0 && Some(index) == last_content {
                size += free;
            }
            let size = size.min((extent - cursor).max(0.0));
            let child = along(rect, orientation, cursor, size);
            cursor += size;
            (id, Some(child))
        })
        .collect()
}

/// Sub-rectangle of `rect` starting `offset` along the axis, `size` long, full cross extent.
fn along(rect: Rect, orientation: Orientation, offset: f32, size: f32) -> Rect {
    match orientation {
        Orientation::Horizontal => {
            Rect::from_min_size(pos2(rect.min.x + offset, rect.min.y), vec2(size, rect.height()))
        }
        Orientation::Vertical => {
            Rect::from_min_size(pos2(rect.min.x, rect.min.y + offset), vec2(rect.width(), size))
        }
    }
}

fn mdi_rects<C>(
    tree: &DockTree<C>,
    children: &[DockableId],
    rect: Rect,
    mdi: &dyn MdiLayoutManager,
) -> Vec<(DockableId, Option<Rect>)> {
    let windows: Vec<MdiWindow> = children
        .iter()
        .filter_map(|&id| tree.get(id).map(|d| MdiWindow::new(id, d.mdi)))
        .collect();
    let Some(arranged) = mdi.arrange(&windows, rect.size()) else {
        return Vec::new();
    };
    let origin = rect.min.to_vec2();
    arranged
        .into_iter()
        .map(|a| (a.id, a.hit_testable.then(|| a.bounds.translate(origin))))
        .collect()
}

fn grid_rects<C>(
    tree: &DockTree<C>,
    children: &[DockableId],
    rect: Rect,
) -> Vec<(DockableId, Option<Rect>)> {
    let content: Vec<DockableId> = children
        .iter()
        .copied()
        .filter(|&id| tree.get(id).is_some_and(|d| !d.is_splitter()))
        .collect();
    let n = content.len();
    if n == 0 {
        return Vec::new();
    }
    let cols = (n as f32).sqrt().ceil() as usize;
    let rows = n.div_ceil(cols);
    let cell = vec2(rect.width() / cols as f32, rect.height() / rows as f32);
    content
        .into_iter()
        .enumerate()
        .map(|(k, id)| {
            let min = rect.min + vec2((k % cols) as f32 * cell.x, (k / cols) as f32 * cell.y);
            (id, Some(Rect::from_min_size(min, cell)))
        })
        .collect()
}

/// Square items of their preferred size, flowing along the axis and wrapping into new lines.
fn wrap_rects<C>(
    tree: &DockTree<C>,
    children: &[DockableId],
    orientation: Orientation,
    rect: Rect,
    options: &DockOptions,
) -> Vec<(DockableId, Option<Rect>)> {
    let extent = orientation.main(rect.size());
    let mut main = 0.0f32;
    let mut cross = 0.0f32;
    let mut line = 0.0f32;

    children
        .iter()
        .filter_map(|&id| {
            let dockable = tree.get(id)?;
            if dockable.is_splitter() {
                return Some((id, None));
            }
            let size = dockable
                .preferred_size
                .filter(|s| s.is_finite() && *s > 0.0)
                .unwrap_or(options.default_min_size as f32);
            if main > 0.0 && main + size > extent {
                main = 0.0;
                cross += line;
                line = 0.0;
            }
            let offset = match orientation {
                Orientation::Horizontal => vec2(main, cross),
                Orientation::Vertical => vec2(cross, main),
            };
            main += size;
            line = line.max(size);
            Some((id, Some(Rect::from_min_size(rect.min + offset, Vec2::splat(size)))))
        })
        .collect()
}

/// Bounds of the pinned dockable currently previewed on `root`, along its pinned edge.
pub fn pinned_preview_rect<C>(
    tree: &DockTree<C>,
    root: DockableId,
    options: &DockOptions,
) -> Option<(DockableId, Rect)> {
    let state = tree.root_state(root)?;
    let preview = state.pinned_preview?;
    let alignment = state.pinned.alignment_of(preview)?;
    let rect = tree.get(root)?.bounds.visible?;
    let fraction = options.pinned_preview_fraction.clamp(0.0, 1.0);
    let width = rect.width() * fraction;
    let height = rect.height() * fraction;
    let preview_rect = match alignment {
        PinnedAlignment::Left => Rect::from_min_size(rect.min, vec2(width, rect.height())),
        PinnedAlignment::Right => Rect::from_min_max(pos2(rect.max.x - width, rect.min.y), rect.max),
        PinnedAlignment::Top => Rect::from_min_size(rect.min, vec2(rect.width(), height)),
        PinnedAlignment::Bottom => {
            Rect::from_min_max(pos2(rect.min.x, rect.max.y - height), rect.max)
        }
    };
    Some((preview, preview_rect))
}

fn update_pinned_bounds<C>(tree: &mut DockTree<C>, root: DockableId, options: &DockOptions) {
    let preview = pinned_preview_rect(tree, root, options);
    let pinned: Vec<DockableId> = tree
        .root_state(root)
        .map(|state| state.pinned.iter().collect())
        .unwrap_or_default();
    for id in pinned {
        let bounds = preview.filter(|(p, _)| *p == id).map(|(_, rect)| rect);
        if let Some(dockable) = tree.get_mut(id) {
            dockable.bounds.pinned = bounds;
        }
    }
}

/// Moves the splitter `splitter` by `delta` points along its dock's axis, trading space between
/// the content siblings on either side.
///
/// The owner must have been arranged (its visible bounds are the reference extent). Returns the
/// new `(before, after)` proportions.
///
/// # Errors
/// Fails for non-splitters, locked splitters, splitters without a content sibling on both sides,
/// and owners without valid bounds.
pub fn drag_splitter<C>(
    tree: &mut DockTree<C>,
    splitter: DockableId,
    delta: f32,
    options: &DockOptions,
) -> Result<(f64, f64), DockError> {
    let dockable = tree.get(splitter).ok_or(DockError::MissingDockable(splitter))?;
    let resizable = dockable.splitter().is_some_and(|s| s.can_resize);
    if !resizable {
        return Err(DockError::CapabilityDenied {
            dockable: splitter,
            capability: "resize",
        });
    }
    let owner = dockable.owner.ok_or(DockError::MissingDockable(splitter))?;
    let container = tree.container(owner).ok_or(DockError::NotAContainer(owner))?;
    let orientation = container
        .kind
        .proportional_orientation()
        .ok_or(DockError::NotAContainer(owner))?;
    let index = container.index_of(splitter).ok_or(DockError::NotOwned {
        dockable: splitter,
        owner,
    })?;
    let len = container.visible.len();
    let neighbours = index
        .checked_sub(1)
        .map(|i| container.visible[i])
        .zip(container.visible.get(index + 1).copied());
    let Some((before, after)) = neighbours else {
        return Err(DockError::InvalidIndex { index, len });
    };
    let is_content = |id: DockableId| tree.get(id).is_some_and(|d| !d.is_splitter());
    if !is_content(before) || !is_content(after) {
        return Err(DockError::InvalidIndex { index, len });
    }
    let rect = tree
        .get(owner)
        .and_then(|d| d.bounds.visible)
        .filter(|r| is_valid_bounds(*r))
        .ok_or(DockError::InvalidGeometry)?;
    if !delta.is_finite() {
        return Err(DockError::InvalidGeometry);
    }

    let splitters: f64 = tree
        .children(owner)
        .iter()
        .filter_map(|&id| tree.get(id)?.splitter())
        .map(|s| f64::from(s.thickness.max(0.0)))
        .sum();
    let extent = f64::from(orientation.main(rect.size())) - splitters;
    let min_of = |id: DockableId| {
        tree.get(id)
            .and_then(|d| d.min_size)
            .unwrap_or(options.default_min_size)
    };
    let (min_before, min_after) = (min_of(before), min_of(after));

    assign_proportions(tree, owner)?;
    let proportion = |id: DockableId| tree.get(id).map_or(0.0, |d| d.proportion);
    let (p_before, p_after) = apply_splitter_delta(
        proportion(before),
        proportion(after),
        f64::from(delta),
        extent,
        min_before,
        min_after,
    );
    for (id, p) in [(before, p_before), (after, p_after)] {
        if let Some(d) = tree.get_mut(id) {
            d.proportion = p;
        }
    }
    log::trace!("splitter {splitter} moved by {delta}: {before}={p_before:.4} {after}={p_after:.4}");
    Ok((p_before, p_after))
}
