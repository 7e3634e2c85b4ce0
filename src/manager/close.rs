use crate::error::DockError;
use crate::model::{DockEvent, DockTree, DockableId, Location, WindowId};

use super::DockManager;
use super::collapse::collapse_upward;
use super::float;

/// Which siblings a bulk close touches, relative to the reference dockable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Siblings {
    Others,
    All,
    Left,
    Right,
}

impl<B, M> DockManager<B, M> {
    /// Closes (removes) a dockable and everything below it.
    ///
    /// # Errors
    /// Rejected when the dockable or anything below it cannot close, when it is the last child
    /// of a dock with `can_close_last_dockable == false`, or for the main root and splitters.
    pub fn close_dockable<C>(&self, tree: &mut DockTree<C>, id: DockableId) -> Result<(), DockError> {
        let dockable = tree.get(id).ok_or(DockError::MissingDockable(id))?;
        if dockable.is_splitter() {
            return Err(DockError::OperationNotAllowed {
                operation: crate::model::DockOperation::None,
                target: Some(id),
            });
        }
        let original_owner = dockable.original_owner;
        check_closable(tree, id)?;

        let collapse_from = match tree.location(id) {
            Location::MainRoot => {
                return Err(DockError::OperationNotAllowed {
                    operation: crate::model::DockOperation::None,
                    target: Some(id),
                });
            }
            Location::WindowLayout { window } => return float::close_window(tree, window),
            Location::Visible { owner, .. } => {
                check_last(tree, owner, 1)?;
                Some(owner)
            }
            Location::Pinned { .. } | Location::Hidden { .. } => original_owner,
            Location::Detached => None,
        };

        tree.remove_subtree(id)?;
        tree.emit(DockEvent::Closed { dockable: id });
        log::debug!("closed {id}");
        if let Some(owner) = collapse_from {
            collapse_upward(tree, owner);
        }
        Ok(())
    }

    /// Closes a floating window and everything in it.
    ///
    /// # Errors
    /// The window must exist and every leaf in it must allow closing.
    pub fn close_window<C>(&self, tree: &mut DockTree<C>, window: WindowId) -> Result<(), DockError> {
        float::close_window(tree, window)
    }

    /// Closes every sibling of `id` that allows it. Returns what was closed.
    ///
    /// # Errors
    /// `id` must be a visible child of some dock.
    pub fn close_other_dockables<C>(
        &self,
        tree: &mut DockTree<C>,
        id: DockableId,
    ) -> Result<Vec<DockableId>, DockError> {
        self.close_siblings(tree, id, Siblings::Others)
    }

    /// Closes every child of `id`'s owner that allows it, `id` included.
    ///
    /// A dock that may not lose its last child keeps the last one standing.
    ///
    /// # Errors
    /// `id` must be a visible child of some dock.
    pub fn close_all_dockables<C>(
        &self,
        tree: &mut DockTree<C>,
        id: DockableId,
    ) -> Result<Vec<DockableId>, DockError> {
        self.close_siblings(tree, id, Siblings::All)
    }

    /// Closes the siblings before `id`.
    ///
    /// # Errors
    /// `id` must be a visible child of some dock.
    pub fn close_left_dockables<C>(
        &self,
        tree: &mut DockTree<C>,
        id: DockableId,
    ) -> Result<Vec<DockableId>, DockError> {
        self.close_siblings(tree, id, Siblings::Left)
    }

    /// Closes the siblings after `id`.
    ///
    /// # Errors
    /// `id` must be a visible child of some dock.
    pub fn close_right_dockables<C>(
        &self,
        tree: &mut DockTree<C>,
        id: DockableId,
    ) -> Result<Vec<DockableId>, DockError> {
        self.close_siblings(tree, id, Siblings::Right)
    }

    fn close_siblings<C>(
        &self,
        tree: &mut DockTree<C>,
        id: DockableId,
        which: Siblings,
    ) -> Result<Vec<DockableId>, DockError> {
        let Location::Visible { owner, .. } = tree.location(id) else {
            return Err(DockError::NotOwned {
                dockable: id,
                owner: tree.owner(id).unwrap_or(id),
            });
        };
        let content = tree.content_children(owner);
        let position = content.iter().position(|&x| x == id).unwrap_or_default();
        let candidates: Vec<DockableId> = content
            .iter()
            .enumerate()
            .filter(|&(index, _)| match which {
                Siblings::Others => index != position,
                Siblings::All => true,
                Siblings::Left => index < position,
                Siblings::Right => index > position,
            })
            .map(|(_, &x)| x)
            .collect();

        let mut closed = Vec::new();
        for candidate in candidates {
            if !tree.contains(candidate) || tree.owner(candidate) != Some(owner) {
                continue;
            }
            if check_closable(tree, candidate).is_err() {
                log::debug!("bulk close skips {candidate}: not closable");
                continue;
            }
            if check_last(tree, owner, 1).is_err() {
                log::debug!("bulk close keeps {candidate}: last dockable of {owner}");
                break;
            }
            if tree.remove_subtree(candidate).is_ok() {
                tree.emit(DockEvent::Closed {
                    dockable: candidate,
                });
                closed.push(candidate);
            }
        }
        if !closed.is_empty() {
            collapse_upward(tree, owner);
        }
        Ok(closed)
    }

    /// Exchanges the positions (owner, index and proportion) of two visible dockables.
    ///
    /// # Errors
    /// Both must be visible, non-splitter and unrelated by containment.
    pub fn swap_dockables<C>(
        &self,
        tree: &mut DockTree<C>,
        a: DockableId,
        b: DockableId,
    ) -> Result<(), DockError> {
        if a == b {
            return Err(DockError::SelfTarget(a));
        }
        for (source, target) in [(a, b), (b, a)] {
            if tree.is_in_subtree(source, target) {
                return Err(DockError::TargetInsideSource { source, target });
            }
        }
        let slot = |id: DockableId| match tree.location(id) {
            Location::Visible { owner, index } if tree.get(id).is_some_and(|d| !d.is_splitter()) => {
                Ok((owner, index))
            }
            _ if !tree.contains(id) => Err(DockError::MissingDockable(id)),
            _ => Err(DockError::OperationNotAllowed {
                operation: crate::model::DockOperation::None,
                target: Some(id),
            }),
        };
        let (owner_a, index_a) = slot(a)?;
        let (owner_b, index_b) = slot(b)?;

        for (owner, index, incoming) in [(owner_a, index_a, b), (owner_b, index_b, a)] {
            if let Some(container) = tree.container_mut(owner) {
                container.visible[index] = incoming;
            }
        }
        if owner_a != owner_b {
            for (owner, outgoing, incoming) in [(owner_a, a, b), (owner_b, b, a)] {
                if let Some(container) = tree.container_mut(owner) {
                    container.history.forget(outgoing);
                    if container.active == Some(outgoing) {
                        container.active = Some(incoming);
                    }
                    if container.focused == Some(outgoing) {
                        container.focused = None;
                    }
                }
            }
        }

        let proportion_a = tree.get(a).map_or(f64::NAN, |d| d.proportion);
        let proportion_b = tree.get(b).map_or(f64::NAN, |d| d.proportion);
        for (id, owner, proportion) in [(a, owner_b, proportion_b), (b, owner_a, proportion_a)] {
            if let Some(d) = tree.get_mut(id) {
                d.owner = Some(owner);
                d.proportion = proportion;
            }
        }
        tree.emit(DockEvent::Moved {
            dockable: a,
            old_owner: Some(owner_a),
            new_owner: owner_b,
        });
        tree.emit(DockEvent::Moved {
            dockable: b,
            old_owner: Some(owner_b),
            new_owner: owner_a,
        });
        log::debug!("swapped {a} and {b}");
        Ok(())
    }

    /// Reorders a child of a tabbed (or other non-proportional) dock.
    ///
    /// # Errors
    /// Proportional docks are reordered through splits instead.
    pub fn move_dockable_within<C>(
        &self,
        tree: &mut DockTree<C>,
        dock: DockableId,
        from: usize,
        to: usize,
    ) -> Result<(), DockError> {
        let container = tree.container(dock).ok_or(DockError::NotAContainer(dock))?;
        if container.kind.proportional_orientation().is_some() {
            return Err(DockError::OperationNotAllowed {
                operation: crate::model::DockOperation::None,
                target: Some(dock),
            });
        }
        tree.move_within(dock, from, to)
    }
}

/// `id` and every leaf below it allow closing.
fn check_closable<C>(tree: &DockTree<C>, id: DockableId) -> Result<(), DockError> {
    let mut ids = tree.descendants(id);
    ids.push(id);
    for x in ids {
        let Some(d) = tree.get(x) else { continue };
        if !d.is_splitter() && !d.capabilities.can_close {
            return Err(DockError::CapabilityDenied {
                dockable: x,
                capability: "close",
            });
        }
    }
    Ok(())
}

/// Removing `count` content children from `dock` must not empty it when it keeps its last one.
fn check_last<C>(tree: &DockTree<C>, dock: DockableId, count: usize) -> Result<(), DockError> {
    let keeps_last = tree
        .container(dock)
        .is_some_and(|c| !c.can_close_last_dockable);
    if keeps_last && tree.content_children(dock).len() <= count {
        return Err(DockError::LastDockable { dock });
    }
    Ok(())
}
