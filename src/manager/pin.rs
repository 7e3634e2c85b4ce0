use crate::error::DockError;
use crate::model::{DockEvent, DockKind, DockOperation, DockTree, DockableId, Location};

use super::DockManager;
use super::collapse::collapse_upward;
use super::float;

impl<B, M> DockManager<B, M> {
    /// Moves a tool out of its tool dock into its root's pinned strip on the tool dock's edge.
    ///
    /// The tool dock stays in place while it is remembered as the tool's original owner.
    ///
    /// # Errors
    /// The dockable must allow pinning and be a visible leaf of a tool dock.
    pub fn pin_dockable<C>(&self, tree: &mut DockTree<C>, id: DockableId) -> Result<(), DockError> {
        let dockable = tree.get(id).ok_or(DockError::MissingDockable(id))?;
        if !dockable.capabilities.can_pin {
            return Err(DockError::CapabilityDenied {
                dockable: id,
                capability: "pin",
            });
        }
        let not_allowed = DockError::OperationNotAllowed {
            operation: DockOperation::None,
            target: Some(id),
        };
        let Location::Visible { owner, .. } = tree.location(id) else {
            return Err(not_allowed);
        };
        let alignment = match tree.container(owner).map(|c| &c.kind) {
            Some(DockKind::Tool { alignment }) if dockable.is_leaf() => *alignment,
            _ => return Err(not_allowed),
        };
        let root = tree.top_root_of(id).ok_or(DockError::NoRoot)?;

        tree.detach(id)?;
        if let Some(state) = tree.root_state_mut(root) {
            state.pinned.side_mut(alignment).push(id);
        }
        if let Some(d) = tree.get_mut(id) {
            d.owner = Some(root);
            d.original_owner = Some(owner);
        }
        tree.emit(DockEvent::Pinned {
            dockable: id,
            alignment,
        });
        log::debug!("pinned {id} to {alignment:?} of {root}");
        collapse_upward(tree, owner);
        Ok(())
    }

    /// Returns a pinned dockable to its tool dock, or floats it when that dock is gone.
    ///
    /// # Errors
    /// [`DockError::NotPinned`] unless the dockable sits in a pinned strip.
    pub fn unpin_dockable<C>(&self, tree: &mut DockTree<C>, id: DockableId) -> Result<(), DockError> {
        if !tree.contains(id) {
            return Err(DockError::MissingDockable(id));
        }
        if !matches!(tree.location(id), Location::Pinned { .. }) {
            return Err(DockError::NotPinned(id));
        }
        self.return_to_original_owner(tree, id)?;
        tree.emit(DockEvent::Unpinned { dockable: id });
        log::debug!("unpinned {id}");
        Ok(())
    }

    /// Shows a pinned dockable on demand over its root's content.
    ///
    /// # Errors
    /// [`DockError::NotPinned`] unless the dockable sits in a pinned strip.
    pub fn show_pinned_preview<C>(&self, tree: &mut DockTree<C>, id: DockableId) -> Result<(), DockError> {
        let Location::Pinned { root, .. } = tree.location(id) else {
            return Err(if tree.contains(id) {
                DockError::NotPinned(id)
            } else {
                DockError::MissingDockable(id)
            });
        };
        let state = tree.root_state_mut(root).ok_or(DockError::NotAContainer(root))?;
        if state.pinned_preview != Some(id) {
            state.pinned_preview = Some(id);
            tree.emit(DockEvent::PinnedPreviewChanged {
                root,
                dockable: Some(id),
            });
        }
        Ok(())
    }

    /// # Errors
    /// `root` must be a root dock.
    pub fn hide_pinned_preview<C>(&self, tree: &mut DockTree<C>, root: DockableId) -> Result<(), DockError> {
        let state = tree.root_state_mut(root).ok_or(DockError::NotAContainer(root))?;
        if state.pinned_preview.take().is_some() {
            tree.emit(DockEvent::PinnedPreviewChanged {
                root,
                dockable: None,
            });
        }
        Ok(())
    }

    /// Moves a visible dockable into its root's hidden list.
    ///
    /// # Errors
    /// The dockable must be a visible, non-splitter child below some root.
    pub fn hide_dockable<C>(&self, tree: &mut DockTree<C>, id: DockableId) -> Result<(), DockError> {
        let dockable = tree.get(id).ok_or(DockError::MissingDockable(id))?;
        let Location::Visible { owner, .. } = tree.location(id) else {
            return Err(DockError::OperationNotAllowed {
                operation: DockOperation::None,
                target: Some(id),
            });
        };
        if dockable.is_splitter() {
            return Err(DockError::OperationNotAllowed {
                operation: DockOperation::None,
                target: Some(id),
            });
        }
        let root = tree.top_root_of(id).ok_or(DockError::NoRoot)?;

        tree.detach(id)?;
        if let Some(state) = tree.root_state_mut(root) {
            state.hidden.push(id);
        }
        if let Some(d) = tree.get_mut(id) {
            d.owner = Some(root);
            d.original_owner = Some(owner);
        }
        tree.emit(DockEvent::Hidden { dockable: id });
        log::debug!("hid {id}");
        collapse_upward(tree, owner);
        Ok(())
    }

    /// Returns a hidden dockable to where it was, or floats it when that dock is gone.
    ///
    /// # Errors
    /// [`DockError::NotHidden`] unless the dockable is in a hidden list.
    pub fn restore_dockable<C>(&self, tree: &mut DockTree<C>, id: DockableId) -> Result<(), DockError> {
        if !tree.contains(id) {
            return Err(DockError::MissingDockable(id));
        }
        if !matches!(tree.location(id), Location::Hidden { .. }) {
            return Err(DockError::NotHidden(id));
        }
        self.return_to_original_owner(tree, id)?;
        tree.emit(DockEvent::Restored { dockable: id });
        log::debug!("restored {id}");
        Ok(())
    }

    fn return_to_original_owner<C>(&self, tree: &mut DockTree<C>, id: DockableId) -> Result<(), DockError> {
        let home = tree
            .get(id)
            .and_then(|d| d.original_owner)
            .filter(|&owner| {
                tree.container(owner).is_some()
                    && tree.location(owner) != Location::Detached
                    && !tree.is_in_subtree(id, owner)
            });
        if home.is_none() && tree.root().is_none() {
            return Err(DockError::NoRoot);
        }
        let grab = float::default_grab(tree, id);

        tree.detach(id)?;
        if let Some(d) = tree.get_mut(id) {
            d.original_owner = None;
        }
        match home {
            Some(owner) => {
                let proportional = tree
                    .container(owner)
                    .is_some_and(|c| c.kind.proportional_orientation().is_some());
                if proportional {
                    super::split::append(tree, &self.options, id, owner);
                } else {
                    tree.attach_unchecked(id, owner, None);
                }
                tree.focus(id)?;
            }
            None => {
                let focus = float::open_window(tree, &self.options, id, grab);
                tree.focus(focus)?;
            }
        }
        Ok(())
    }
}
