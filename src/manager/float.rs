use egui::{Pos2, Vec2};

use crate::error::DockError;
use crate::model::{
    DockEvent, DockKind, DockTree, DockWindow, DockableId, PinnedAlignment, RootState, WindowId,
};
use crate::options::DockOptions;

use super::split::tab_group_for;

/// Offset of the window origin from the grab point, so the title bar sits under the pointer.
const GRAB_OFFSET: Vec2 = Vec2::new(20.0, 10.0);

/// Title of the first leaf found under `id`, following active children first.
pub(super) fn title_for_subtree<C>(tree: &DockTree<C>, id: DockableId) -> String {
    let mut stack = vec![id];
    while let Some(current) = stack.pop() {
        let Some(dockable) = tree.get(current) else {
            continue;
        };
        if dockable.is_leaf() {
            return dockable.title.clone();
        }
        if let Some(container) = dockable.container() {
            stack.extend(container.visible.iter().rev().copied());
            if let Some(active) = container.active {
                stack.push(active);
            }
        }
    }
    format!("Window {id}")
}

/// Size for a window showing `id`: its last visible size, else the default, never below the
/// minimum.
fn window_size<C>(tree: &DockTree<C>, options: &DockOptions, id: DockableId) -> Vec2 {
    let last = tree
        .get(id)
        .and_then(|d| d.bounds.visible)
        .filter(|r| r.is_finite() && r.width() > 0.0 && r.height() > 0.0)
        .map_or(options.float_window_default_size, |r| r.size());
    last.max(options.float_window_min_size)
}

/// Wraps the detached `placed` in a new window root and registers the window with the main
/// root. Returns the dockable to focus.
pub(super) fn open_window<C>(
    tree: &mut DockTree<C>,
    options: &DockOptions,
    placed: DockableId,
    grab: Pos2,
) -> DockableId {
    let Some(main_root) = tree.root() else {
        debug_assert!(false, "floating without a main root");
        return placed;
    };
    let size = window_size(tree, options, placed);
    let title = title_for_subtree(tree, placed);
    let window = tree.alloc_window_id();

    let layout = tree.create_dock(DockKind::Root(Box::new(RootState {
        window: Some(window),
        ..RootState::default()
    })));
    let content = if tree.get(placed).is_some_and(|d| d.is_leaf()) {
        let kind = tab_group_for(tree, placed, PinnedAlignment::Left);
        let group = tree.create_dock(kind);
        tree.attach_unchecked(placed, group, None);
        group
    } else {
        placed
    };
    tree.attach_unchecked(content, layout, None);

    if let Some(state) = tree.root_state_mut(main_root) {
        state.windows.push(DockWindow {
            id: window,
            title,
            position: grab - GRAB_OFFSET,
            size,
            topmost: false,
            layout,
            host: None,
        });
    }
    tree.emit(DockEvent::WindowOpened { window });
    log::debug!("floated {placed} into {window} at {:?}", grab - GRAB_OFFSET);
    placed
}

pub(super) fn move_window<C>(tree: &mut DockTree<C>, window: WindowId, grab: Pos2) {
    if let Some(w) = tree.window_mut(window) {
        w.position = grab - GRAB_OFFSET;
    }
}

/// Where [`super::DockManager::float_dockable`] opens a window when no pointer is involved:
/// over the dockable's last visible position.
pub(super) fn default_grab<C>(tree: &DockTree<C>, id: DockableId) -> Pos2 {
    tree.get(id)
        .and_then(|d| d.bounds.visible)
        .filter(|r| r.is_finite())
        .map_or(Pos2::new(32.0, 32.0), |r| r.min)
        + GRAB_OFFSET
}

/// The single content child of a window's layout root, if it has exactly one.
pub(super) fn sole_content<C>(tree: &DockTree<C>, window: WindowId) -> Result<DockableId, DockError> {
    let layout = tree
        .window(window)
        .map(|w| w.layout)
        .ok_or(DockError::MissingWindow(window))?;
    match tree.content_children(layout).as_slice() {
        &[only] => Ok(only),
        _ => Err(DockError::OperationNotAllowed {
            operation: crate::model::DockOperation::None,
            target: Some(layout),
        }),
    }
}

/// Removes a window and everything in it, provided every leaf may close.
pub(super) fn close_window<C>(tree: &mut DockTree<C>, window: WindowId) -> Result<(), DockError> {
    let layout = tree
        .window(window)
        .map(|w| w.layout)
        .ok_or(DockError::MissingWindow(window))?;
    let leaves: Vec<DockableId> = tree
        .descendants(layout)
        .into_iter()
        .filter(|&id| tree.get(id).is_some_and(|d| d.is_leaf()))
        .collect();
    if let Some(&stuck) = leaves
        .iter()
        .find(|&&id| tree.get(id).is_some_and(|d| !d.capabilities.can_close))
    {
        return Err(DockError::CapabilityDenied {
            dockable: stuck,
            capability: "close",
        });
    }

    tree.remove_subtree(layout)?;
    for dockable in leaves {
        tree.emit(DockEvent::Closed { dockable });
    }
    log::debug!("closed {window}");
    Ok(())
}
