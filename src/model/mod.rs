//! The dock tree: an arena of [`Dockable`]s keyed by [`DockableId`].
//!
//! The tree owns dockables by containment in a container's `visible` list (or a root's
//! pinned/hidden lists, or a window's layout). `owner` and `original_owner` are lookup-only
//! back references.

use std::collections::BTreeMap;

mod builder;
mod dockable;
mod events;
pub mod integrity;
mod tree;
mod types;

#[cfg(test)]
mod model_tests;

pub use builder::{DockBuilder, DockNodeId, SplitDirection};
pub use dockable::{
    DockCapabilities, DockContainer, DockKind, DockWindow, Dockable, DockableBounds, DockableKind,
    NavigationHistory, PinnedDockables, RootState, Splitter,
};
pub use events::DockEvent;
pub use tree::Location;
pub use types::{
    DockOperation, DockOperationMask, DockableId, DocumentLayout, DragAction, Orientation,
    PinnedAlignment, WindowId,
};

/// All dockables of one application layout: the main root, its floating windows' roots,
/// and everything below them.
#[derive(Clone, Debug)]
pub struct DockTree<C> {
    dockables: BTreeMap<DockableId, Dockable<C>>,
    root: Option<DockableId>,
    next_id: u64,
    next_window_id: u64,
    events: Vec<DockEvent>,
}

impl<C> Default for DockTree<C> {
    fn default() -> Self {
        Self {
            dockables: BTreeMap::new(),
            root: None,
            next_id: 1,
            next_window_id: 1,
            events: Vec::new(),
        }
    }
}

impl<C> DockTree<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// The main root dock.
    pub fn root(&self) -> Option<DockableId> {
        self.root
    }

    pub fn get(&self, id: DockableId) -> Option<&Dockable<C>> {
        self.dockables.get(&id)
    }

    pub fn get_mut(&mut self, id: DockableId) -> Option<&mut Dockable<C>> {
        self.dockables.get_mut(&id)
    }

    pub fn contains(&self, id: DockableId) -> bool {
        self.dockables.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.dockables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dockables.is_empty()
    }

    /// All ids in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = DockableId> + '_ {
        self.dockables.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Dockable<C>> + '_ {
        self.dockables.values()
    }

    pub fn container(&self, id: DockableId) -> Option<&DockContainer> {
        self.get(id)?.container()
    }

    pub fn container_mut(&mut self, id: DockableId) -> Option<&mut DockContainer> {
        self.get_mut(id)?.container_mut()
    }

    /// The `visible` list of a container, or an empty slice.
    pub fn children(&self, id: DockableId) -> &[DockableId] {
        self.container(id).map_or(&[], |c| c.visible.as_slice())
    }

    /// Children that are not splitters.
    pub fn content_children(&self, id: DockableId) -> Vec<DockableId> {
        self.children(id)
            .iter()
            .copied()
            .filter(|&c| self.get(c).is_some_and(|d| !d.is_splitter()))
            .collect()
    }

    pub fn owner(&self, id: DockableId) -> Option<DockableId> {
        self.get(id)?.owner
    }

    pub fn active(&self, dock: DockableId) -> Option<DockableId> {
        self.container(dock)?.active
    }

    /// Queued change notifications, oldest first.
    pub fn events(&self) -> &[DockEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<DockEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn emit(&mut self, event: DockEvent) {
        self.events.push(event);
    }

    pub(crate) fn dockables_mut(&mut self) -> &mut BTreeMap<DockableId, Dockable<C>> {
        &mut self.dockables
    }
}
