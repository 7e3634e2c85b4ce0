//! Edge splits and tab fills.
//!
//! Everything here runs after validation; the `check_*` functions are the only fallible part.

use crate::error::DockError;
use crate::layout::assign_proportions;
use crate::mdi::{MdiProperties, MdiState};
use crate::model::{
    DockKind, DockOperation, DockTree, DockableId, DockableKind, DocumentLayout, Location,
    Orientation, PinnedAlignment,
};
use crate::options::DockOptions;

/// What an edge drop on some target actually splits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum SplitTarget {
    Dockable(DockableId),
    /// A root without content: the source simply becomes its content.
    EmptyRoot(DockableId),
}

/// A leaf inside a tab group splits the whole group. A root splits its active content.
pub(super) fn split_target<C>(tree: &DockTree<C>, target: DockableId) -> Result<SplitTarget, DockError> {
    let dockable = tree.get(target).ok_or(DockError::MissingDockable(target))?;
    if dockable.is_splitter() {
        return Err(DockError::OperationNotAllowed {
            operation: DockOperation::None,
            target: Some(target),
        });
    }
    if dockable.is_leaf() {
        return Ok(SplitTarget::Dockable(
            tree.tabbed_owner(target).unwrap_or(target),
        ));
    }
    if let Some(container) = dockable.container()
        && container.kind.is_root()
    {
        let content = tree.content_children(target);
        let active = container.active.filter(|a| content.contains(a));
        return Ok(match active.or_else(|| content.first().copied()) {
            Some(child) => SplitTarget::Dockable(child),
            None => SplitTarget::EmptyRoot(target),
        });
    }
    Ok(SplitTarget::Dockable(target))
}

/// Structural checks for placing `source` beside `target`. Returns `target`'s owner.
pub(super) fn check_split<C>(
    tree: &DockTree<C>,
    source: DockableId,
    target: DockableId,
    operation: DockOperation,
    moving: bool,
) -> Result<DockableId, DockError> {
    let Location::Visible { owner, .. } = tree.location(target) else {
        return Err(DockError::OperationNotAllowed {
            operation,
            target: Some(target),
        });
    };
    if moving {
        if source == target {
            return Err(DockError::SelfTarget(source));
        }
        if tree.is_in_subtree(source, target) {
            return Err(DockError::TargetInsideSource { source, target });
        }
        // Would leave `target` empty and then collapse it.
        if tree.owner(source) == Some(target) && tree.content_children(target) == [source] {
            return Err(DockError::OperationNotAllowed {
                operation,
                target: Some(target),
            });
        }
    }
    Ok(owner)
}

/// Structural checks for tabbing `source` into `target`.
pub(super) fn check_fill<C>(
    tree: &DockTree<C>,
    source: DockableId,
    target: DockableId,
    moving: bool,
) -> Result<(), DockError> {
    let dockable = tree.get(target).ok_or(DockError::MissingDockable(target))?;
    if moving {
        if source == target {
            return Err(DockError::SelfTarget(source));
        }
        if tree.is_in_subtree(source, target) {
            return Err(DockError::TargetInsideSource { source, target });
        }
    }
    let attached = matches!(tree.location(target), Location::Visible { .. });
    if dockable.is_splitter() || (dockable.is_leaf() && !attached) {
        return Err(DockError::OperationNotAllowed {
            operation: DockOperation::Fill,
            target: Some(target),
        });
    }
    Ok(())
}

/// The neighbour a corner drop bands `target` with: the content sibling on the `horizontal`
/// side inside a horizontally split `owner`. A moving `source` is skipped, since it leaves first.
pub(super) fn corner_partner<C>(
    tree: &DockTree<C>,
    source: DockableId,
    target: DockableId,
    owner: DockableId,
    horizontal: DockOperation,
    moving: bool,
) -> Option<DockableId> {
    let orientation = tree.container(owner)?.kind.proportional_orientation()?;
    if orientation != Orientation::Horizontal {
        return None;
    }
    let content: Vec<DockableId> = tree
        .content_children(owner)
        .into_iter()
        .filter(|&id| !(moving && id == source))
        .collect();
    let index = content.iter().position(|&id| id == target)?;
    let partner = if horizontal.source_first() {
        content.get(index.checked_sub(1)?)
    } else {
        content.get(index + 1)
    };
    let partner = *partner?;
    // The partner would empty out and collapse once the source leaves it.
    if moving && tree.content_children(partner) == [source] {
        return None;
    }
    Some(partner)
}

/// Puts `target` and its neighbour `partner` into one band that a corner drop then splits.
///
/// When the two are all their owner holds, the owner is the band. Otherwise they move into a
/// new proportional dock of the owner's orientation at their slot, keeping order and shares.
pub(super) fn band_with<C>(
    tree: &mut DockTree<C>,
    target: DockableId,
    partner: DockableId,
) -> DockableId {
    let Some(owner) = tree.owner(target) else {
        debug_assert!(false, "corner target {target} is not attached");
        return target;
    };
    if tree.content_children(owner).len() <= 2 {
        return owner;
    }
    let Some(orientation) = tree
        .container(owner)
        .and_then(|c| c.kind.proportional_orientation())
    else {
        debug_assert!(false, "corner target {target} is not in a split");
        return target;
    };
    if let Err(err) = assign_proportions(tree, owner) {
        log::warn!("failed to rescale {owner} before banding {target}: {err}");
    }

    let children = tree.children(owner);
    let (Some(t), Some(p)) = (
        children.iter().position(|&id| id == target),
        children.iter().position(|&id| id == partner),
    ) else {
        debug_assert!(false, "corner partner {partner} is not beside {target}");
        return target;
    };
    let (first, last) = (t.min(p), t.max(p));
    let span = children[first..=last].to_vec();
    let share: f64 = [target, partner]
        .iter()
        .filter_map(|&id| tree.get(id))
        .map(|d| d.proportion)
        .sum();
    let was_active = tree.active(owner).is_some_and(|a| span.contains(&a));

    for &id in &span {
        if tree.detach(id).is_err() {
            debug_assert!(false, "failed to detach {id} for banding");
            return target;
        }
    }
    let band = tree.create_dock(DockKind::Proportional { orientation });
    tree.attach_unchecked(band, owner, Some(first));
    set_proportion(tree, band, share);
    for &id in &span {
        tree.attach_unchecked(id, band, None);
    }
    if let Err(err) = assign_proportions(tree, band) {
        log::warn!("failed to rescale band {band}: {err}");
    }
    if was_active && tree.active(owner) != Some(band) {
        let _ = tree.set_active(owner, Some(band));
    }
    log::debug!("banded {target} with {partner} in {orientation:?} dock {band}");
    band
}

fn edge_alignment(edge: DockOperation) -> PinnedAlignment {
    match edge {
        DockOperation::Right => PinnedAlignment::Right,
        DockOperation::Top => PinnedAlignment::Top,
        DockOperation::Bottom => PinnedAlignment::Bottom,
        _ => PinnedAlignment::Left,
    }
}

/// Tab group kind a lone leaf gets wrapped in.
pub(super) fn tab_group_for<C>(tree: &DockTree<C>, leaf: DockableId, alignment: PinnedAlignment) -> DockKind {
    match tree.get(leaf).map(|d| &d.kind) {
        Some(DockableKind::Document) => DockKind::Document {
            layout: DocumentLayout::Tabbed,
        },
        _ => DockKind::Tool { alignment },
    }
}

fn set_proportion<C>(tree: &mut DockTree<C>, id: DockableId, proportion: f64) {
    if let Some(d) = tree.get_mut(id) {
        d.proportion = proportion;
    }
}

/// Places the detached `placed` on the `edge` side of the attached `target`.
///
/// Flattens into `target`'s owner when it already splits along the same axis, otherwise wraps
/// `target` in a new proportional dock at its slot. A leaf placed beside a tab group gets its
/// own tab group. Returns the dockable that now sits beside `target`.
pub(super) fn insert_beside<C>(
    tree: &mut DockTree<C>,
    options: &DockOptions,
    placed: DockableId,
    target: DockableId,
    edge: DockOperation,
) -> DockableId {
    let Some(orientation) = edge.split_orientation() else {
        debug_assert!(false, "{edge:?} is not an edge");
        return placed;
    };
    let Location::Visible { owner, index } = tree.location(target) else {
        debug_assert!(false, "split target {target} is not attached");
        return placed;
    };

    let wrap = tree.get(placed).is_some_and(|d| d.is_leaf())
        && tree.container(target).is_some_and(|c| c.kind.is_tabbed());
    let item = if wrap {
        let kind = tab_group_for(tree, placed, edge_alignment(edge));
        let group = tree.create_dock(kind);
        tree.attach_unchecked(placed, group, None);
        group
    } else {
        placed
    };

    let ratio = options.default_split_ratio.clamp(0.0, 1.0);
    let thickness = options.splitter_thickness;
    let same_axis = tree
        .container(owner)
        .and_then(|c| c.kind.proportional_orientation())
        == Some(orientation);

    if same_axis {
        if let Err(err) = assign_proportions(tree, owner) {
            log::warn!("failed to rescale {owner} before splitting {target}: {err}");
        }
        let share = tree.get(target).map_or(0.0, |d| d.proportion);
        set_proportion(tree, target, share * (1.0 - ratio));
        set_proportion(tree, item, share * ratio);
        let splitter = tree.create_splitter(thickness);
        if edge.source_first() {
            tree.attach_unchecked(item, owner, Some(index));
            tree.attach_unchecked(splitter, owner, Some(index + 1));
        } else {
            tree.attach_unchecked(splitter, owner, Some(index + 1));
            tree.attach_unchecked(item, owner, Some(index + 2));
        }
        log::debug!("split {target} {edge:?}: {item} joins {orientation:?} dock {owner}");
    } else {
        wrap_pair(tree, thickness, ratio, item, target, owner, index, orientation, edge.source_first());
        log::debug!("split {target} {edge:?}: new {orientation:?} dock around {target} and {item}");
    }
    item
}

#[allow(clippy::too_many_arguments)]
fn wrap_pair<C>(
    tree: &mut DockTree<C>,
    thickness: f32,
    ratio: f64,
    item: DockableId,
    target: DockableId,
    owner: DockableId,
    index: usize,
    orientation: Orientation,
    item_first: bool,
) {
    let was_active = tree.active(owner) == Some(target);
    let share = tree.get(target).map_or(f64::NAN, |d| d.proportion);
    let wrapper = tree.create_dock(DockKind::Proportional { orientation });

    if tree.detach(target).is_err() {
        debug_assert!(false, "failed to detach split target {target}");
        return;
    }
    tree.attach_unchecked(wrapper, owner, Some(index));
    set_proportion(tree, wrapper, share);
    if was_active && tree.active(owner) != Some(wrapper) {
        let _ = tree.set_active(owner, Some(wrapper));
    }

    set_proportion(tree, target, 1.0 - ratio);
    set_proportion(tree, item, ratio);
    let splitter = tree.create_splitter(thickness);
    let (first, second) = if item_first {
        (item, target)
    } else {
        (target, item)
    };
    for child in [first, splitter, second] {
        tree.attach_unchecked(child, wrapper, None);
    }
}

/// Where a fill puts the new tab(s).
enum FillPlan {
    /// Insert into a tab group at `index`.
    Tabs { dock: DockableId, index: usize },
    /// The target leaf sits in a non-tabbed dock: give it a tab group first.
    WrapLeaf { leaf: DockableId },
    /// Append to a non-tabbed dock.
    Append { dock: DockableId },
}

fn fill_plan<C>(tree: &DockTree<C>, target: DockableId) -> Option<FillPlan> {
    let dockable = tree.get(target)?;
    if let Some(container) = dockable.container() {
        if container.kind.is_tabbed() {
            let index = container
                .active
                .and_then(|a| container.index_of(a))
                .map_or(container.visible.len(), |i| i + 1);
            return Some(FillPlan::Tabs {
                dock: target,
                index,
            });
        }
        return Some(FillPlan::Append { dock: target });
    }
    let owner = dockable.owner?;
    let container = tree.container(owner)?;
    if container.kind.is_tabbed() {
        let index = container.index_of(target)? + 1;
        return Some(FillPlan::Tabs { dock: owner, index });
    }
    Some(FillPlan::WrapLeaf { leaf: target })
}

/// Tabs the detached `placed` into `target`. Returns the dockable to focus.
///
/// A dock dropped into a tab group contributes its leaves, not itself.
pub(super) fn fill<C>(
    tree: &mut DockTree<C>,
    options: &DockOptions,
    placed: DockableId,
    target: DockableId,
) -> DockableId {
    let Some(plan) = fill_plan(tree, target) else {
        debug_assert!(false, "fill target {target} vanished");
        return placed;
    };
    let (dock, index) = match plan {
        FillPlan::Tabs { dock, index } => (dock, index),
        FillPlan::WrapLeaf { leaf } => {
            let Location::Visible { owner, index } = tree.location(leaf) else {
                return placed;
            };
            let was_active = tree.active(owner) == Some(leaf);
            let share = tree.get(leaf).map_or(f64::NAN, |d| d.proportion);
            let kind = tab_group_for(tree, leaf, PinnedAlignment::Left);
            let group = tree.create_dock(kind);
            if tree.detach(leaf).is_err() {
                return placed;
            }
            tree.attach_unchecked(group, owner, Some(index));
            set_proportion(tree, group, share);
            if was_active {
                let _ = tree.set_active(owner, Some(group));
            }
            tree.attach_unchecked(leaf, group, None);
            (group, 1)
        }
        FillPlan::Append { dock } => {
            append(tree, options, placed, dock);
            return placed;
        }
    };

    let is_mdi = tree.container(dock).is_some_and(|c| {
        matches!(
            c.kind,
            DockKind::Document {
                layout: DocumentLayout::Mdi
            }
        )
    });
    let leaves = if tree.get(placed).is_some_and(|d| d.is_leaf()) {
        vec![placed]
    } else {
        visible_leaves(tree, placed)
    };

    let mut index = index;
    for &leaf in &leaves {
        if tree.owner(leaf).is_some() && tree.detach(leaf).is_err() {
            continue;
        }
        if is_mdi {
            let z_index = next_z_index(tree, dock);
            if let Some(d) = tree.get_mut(leaf) {
                d.mdi = MdiProperties {
                    state: MdiState::Normal,
                    z_index,
                    ..MdiProperties::default()
                };
            }
        }
        tree.attach_unchecked(leaf, dock, Some(index));
        index += 1;
    }

    if !leaves.contains(&placed) {
        // The emptied source dock.
        let _ = tree.remove_subtree(placed);
    }
    log::debug!("fill {dock}: {} new tab(s)", leaves.len());
    leaves.first().copied().unwrap_or(dock)
}

/// Appends to a non-tabbed dock, keeping the splitter pattern of proportional docks.
pub(super) fn append<C>(tree: &mut DockTree<C>, options: &DockOptions, placed: DockableId, dock: DockableId) {
    let proportional = tree
        .container(dock)
        .is_some_and(|c| c.kind.proportional_orientation().is_some());
    if proportional && !tree.content_children(dock).is_empty() {
        let splitter = tree.create_splitter(options.splitter_thickness);
        tree.attach_unchecked(splitter, dock, None);
    }
    set_proportion(tree, placed, f64::NAN);
    tree.attach_unchecked(placed, dock, None);
    if proportional && let Err(err) = assign_proportions(tree, dock) {
        log::warn!("failed to rescale {dock} after appending {placed}: {err}");
    }
}

/// Leaves below `dock` in visual order.
fn visible_leaves<C>(tree: &DockTree<C>, dock: DockableId) -> Vec<DockableId> {
    let mut out = Vec::new();
    let mut stack: Vec<DockableId> = tree.children(dock).iter().rev().copied().collect();
    while let Some(id) = stack.pop() {
        match tree.get(id) {
            Some(d) if d.is_leaf() => out.push(id),
            Some(d) if d.container().is_some() => {
                stack.extend(tree.children(id).iter().rev().copied());
            }
            _ => {}
        }
    }
    out
}

fn next_z_index<C>(tree: &DockTree<C>, dock: DockableId) -> i32 {
    tree.children(dock)
        .iter()
        .filter_map(|&id| tree.get(id))
        .map(|d| d.mdi.z_index.saturating_add(1))
        .max()
        .unwrap_or(0)
}
