use egui::{Rect, Vec2};

use crate::error::DockError;
use crate::mdi::{MdiLayoutManager, MdiState, MdiWindow, ResizeDirection, TileMode};
use crate::model::{DockKind, DockOperation, DockTree, DockableId, DocumentLayout};

use super::DockManager;

fn is_mdi_dock<C>(tree: &DockTree<C>, dock: DockableId) -> bool {
    tree.container(dock).is_some_and(|c| {
        matches!(
            c.kind,
            DockKind::Document {
                layout: DocumentLayout::Mdi
            }
        )
    })
}

/// The MDI document dock holding `document`.
fn mdi_owner<C>(tree: &DockTree<C>, document: DockableId) -> Result<DockableId, DockError> {
    if !tree.contains(document) {
        return Err(DockError::MissingDockable(document));
    }
    tree.owner(document)
        .filter(|&owner| is_mdi_dock(tree, owner))
        .filter(|&owner| tree.container(owner).is_some_and(|c| c.index_of(document).is_some()))
        .ok_or(DockError::OperationNotAllowed {
            operation: DockOperation::None,
            target: Some(document),
        })
}

fn mdi_windows<C>(tree: &DockTree<C>, dock: DockableId) -> Vec<MdiWindow> {
    tree.content_children(dock)
        .into_iter()
        .filter_map(|id| tree.get(id).map(|d| MdiWindow::new(id, d.mdi)))
        .collect()
}

/// Local size of an MDI dock, from its last arranged bounds.
fn container_size<C>(tree: &DockTree<C>, dock: DockableId) -> Result<Vec2, DockError> {
    tree.get(dock)
        .and_then(|d| d.bounds.visible)
        .map(|r| r.size())
        .filter(|s| crate::mdi::is_valid_size(*s))
        .ok_or(DockError::InvalidGeometry)
}

fn set_state<C>(tree: &mut DockTree<C>, document: DockableId, state: MdiState) {
    if let Some(d) = tree.get_mut(document) {
        d.mdi.state = state;
    }
}

impl<B, M: MdiLayoutManager> DockManager<B, M> {
    /// Makes `document` the active MDI document and puts it on top of the z-order.
    ///
    /// # Errors
    /// `document` must be a child of an MDI document dock.
    pub fn activate_mdi_document<C>(&self, tree: &mut DockTree<C>, document: DockableId) -> Result<(), DockError> {
        let dock = mdi_owner(tree, document)?;
        tree.focus(document)?;
        self.raise(tree, dock, document);
        Ok(())
    }

    /// Rewrites dense z-indices of `dock` with `document` on top.
    pub(super) fn raise<C>(&self, tree: &mut DockTree<C>, dock: DockableId, document: DockableId) {
        let windows = mdi_windows(tree, dock);
        let z = self.mdi.update_z_order(&windows, Some(document));
        for (window, z_index) in windows.iter().zip(z) {
            if let Some(d) = tree.get_mut(window.id) {
                d.mdi.z_index = z_index;
            }
        }
    }

    /// Raises `document` when it was just placed into an MDI dock.
    pub(super) fn raise_if_mdi<C>(&self, tree: &mut DockTree<C>, document: DockableId) {
        if let Some(dock) = tree.owner(document)
            && is_mdi_dock(tree, dock)
        {
            self.raise(tree, dock, document);
        }
    }

    /// # Errors
    /// `document` must be a child of an MDI document dock.
    pub fn minimize_mdi_document<C>(&self, tree: &mut DockTree<C>, document: DockableId) -> Result<(), DockError> {
        mdi_owner(tree, document)?;
        set_state(tree, document, MdiState::Minimized);
        log::debug!("minimized {document}");
        Ok(())
    }

    /// Maximizes `document`; any other maximized document of the dock goes back to normal.
    ///
    /// # Errors
    /// `document` must be a child of an MDI document dock.
    pub fn maximize_mdi_document<C>(&self, tree: &mut DockTree<C>, document: DockableId) -> Result<(), DockError> {
        let dock = mdi_owner(tree, document)?;
        for other in tree.content_children(dock) {
            if other != document && tree.get(other).is_some_and(|d| d.mdi.state == MdiState::Maximized) {
                set_state(tree, other, MdiState::Normal);
            }
        }
        set_state(tree, document, MdiState::Maximized);
        self.activate_mdi_document(tree, document)?;
        log::debug!("maximized {document}");
        Ok(())
    }

    /// # Errors
    /// `document` must be a child of an MDI document dock.
    pub fn restore_mdi_document<C>(&self, tree: &mut DockTree<C>, document: DockableId) -> Result<(), DockError> {
        mdi_owner(tree, document)?;
        set_state(tree, document, MdiState::Normal);
        self.activate_mdi_document(tree, document)?;
        log::debug!("restored {document} to normal");
        Ok(())
    }

    /// Cascades every non-minimized document of an MDI dock.
    ///
    /// # Errors
    /// `dock` must be an MDI document dock that has been arranged at a valid size.
    pub fn cascade_mdi_documents<C>(&self, tree: &mut DockTree<C>, dock: DockableId) -> Result<(), DockError> {
        self.rearrange(tree, dock, |mdi, windows, size| mdi.cascade(windows, size))
    }

    /// Tiles every non-minimized document of an MDI dock.
    ///
    /// # Errors
    /// `dock` must be an MDI document dock that has been arranged at a valid size.
    pub fn tile_mdi_documents<C>(
        &self,
        tree: &mut DockTree<C>,
        dock: DockableId,
        mode: TileMode,
    ) -> Result<(), DockError> {
        self.rearrange(tree, dock, |mdi, windows, size| mdi.tile(windows, size, mode))
    }

    fn rearrange<C>(
        &self,
        tree: &mut DockTree<C>,
        dock: DockableId,
        layout: impl FnOnce(&M, &[MdiWindow], Vec2) -> Vec<(DockableId, Rect)>,
    ) -> Result<(), DockError> {
        if !is_mdi_dock(tree, dock) {
            return Err(DockError::NotAContainer(dock));
        }
        let size = container_size(tree, dock)?;
        let windows = mdi_windows(tree, dock);
        for (id, bounds) in layout(&self.mdi, &windows, size) {
            if let Some(d) = tree.get_mut(id) {
                d.mdi.bounds = bounds;
                d.mdi.state = MdiState::Normal;
            }
        }
        Ok(())
    }

    /// Moves a document to where an interactive drag from `start` by `delta` lands, snapped.
    ///
    /// # Errors
    /// `document` must be a child of an MDI document dock that has been arranged.
    pub fn drag_mdi_document<C>(
        &self,
        tree: &mut DockTree<C>,
        document: DockableId,
        start: Rect,
        delta: Vec2,
    ) -> Result<Rect, DockError> {
        let dock = mdi_owner(tree, document)?;
        let size = container_size(tree, dock)?;
        let windows = mdi_windows(tree, dock);
        let bounds = self.mdi.drag_bounds(document, start, delta, size, &windows);
        if let Some(d) = tree.get_mut(document) {
            d.mdi.bounds = bounds;
        }
        Ok(bounds)
    }

    /// Resizes a document the way an interactive resize from `start` by `delta` ends up.
    ///
    /// # Errors
    /// `document` must be a child of an MDI document dock that has been arranged.
    pub fn resize_mdi_document<C>(
        &self,
        tree: &mut DockTree<C>,
        document: DockableId,
        start: Rect,
        delta: Vec2,
        direction: ResizeDirection,
    ) -> Result<Rect, DockError> {
        let dock = mdi_owner(tree, document)?;
        let size = container_size(tree, dock)?;
        let windows = mdi_windows(tree, dock);
        let bounds = self
            .mdi
            .resize_bounds(document, start, delta, direction, size, &windows);
        if let Some(d) = tree.get_mut(document) {
            d.mdi.bounds = bounds;
        }
        Ok(bounds)
    }
}
