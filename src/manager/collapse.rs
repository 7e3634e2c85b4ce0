use crate::layout::assign_proportions;
use crate::model::{DockEvent, DockTree, DockableId, Location};

/// Removes leading, trailing and doubled splitters of a proportional dock.
pub(super) fn normalize_splitters<C>(tree: &mut DockTree<C>, dock: DockableId) {
    let is_proportional = tree
        .container(dock)
        .is_some_and(|c| c.kind.proportional_orientation().is_some());
    if !is_proportional {
        return;
    }

    let children = tree.children(dock).to_vec();
    let is_splitter = |id: DockableId| tree.get(id).is_some_and(|d| d.is_splitter());
    let last_content = children.iter().rposition(|&id| !is_splitter(id));

    let mut doomed = Vec::new();
    let mut previous_is_splitter = true; // leading splitters are doomed
    for (index, &id) in children.iter().enumerate() {
        let splitter = is_splitter(id);
        let trailing = last_content.is_none_or(|last| index > last);
        if splitter && (previous_is_splitter || trailing) {
            doomed.push(id);
        }
        previous_is_splitter = splitter;
    }

    for id in doomed {
        if let Err(err) = tree.remove_subtree(id) {
            log::warn!("failed to drop stray splitter {id}: {err}");
        }
    }
}

/// Dockables parked in a pinned or hidden list that will return to `dock`.
fn is_remembered_owner<C>(tree: &DockTree<C>, dock: DockableId) -> bool {
    tree.iter().any(|d| {
        d.original_owner == Some(dock)
            && matches!(
                tree.location(d.id),
                Location::Pinned { .. } | Location::Hidden { .. }
            )
    })
}

fn is_empty_dock<C>(tree: &DockTree<C>, dock: DockableId) -> bool {
    let no_content = tree.content_children(dock).is_empty();
    let parked = tree
        .root_state(dock)
        .is_some_and(|state| state.pinned.iter().next().is_some() || !state.hidden.is_empty());
    no_content && !parked
}

/// Prunes `dock` and then each owner above it while they are empty and collapsable.
///
/// A floating window whose layout root ends up empty is closed. The first surviving dock gets
/// its splitters tidied and its proportions rescaled.
pub(super) fn collapse_upward<C>(tree: &mut DockTree<C>, dock: DockableId) {
    let mut current = dock;
    loop {
        if !tree.contains(current) {
            return;
        }
        normalize_splitters(tree, current);
        if !is_empty_dock(tree, current) {
            if tree
                .container(current)
                .is_some_and(|c| c.kind.proportional_orientation().is_some())
                && let Err(err) = assign_proportions(tree, current)
            {
                log::warn!("failed to rescale {current} after collapsing: {err}");
            }
            return;
        }

        match tree.location(current) {
            Location::WindowLayout { window } => {
                log::debug!("closing empty {window}");
                if let Err(err) = tree.remove_subtree(current) {
                    log::warn!("failed to close empty {window}: {err}");
                }
                return;
            }
            Location::Visible { owner, .. } => {
                let collapsable = tree.container(current).is_some_and(|c| c.is_collapsable);
                if !collapsable || is_remembered_owner(tree, current) {
                    return;
                }
                log::debug!("collapsing empty dock {current}");
                if let Err(err) = tree.remove_subtree(current) {
                    log::warn!("failed to collapse {current}: {err}");
                    return;
                }
                tree.emit(DockEvent::Collapsed { dock: current });
                current = owner;
            }
            _ => return,
        }
    }
}
