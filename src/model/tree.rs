use crate::error::DockError;

use super::dockable::{DockContainer, DockKind, DockWindow, Dockable, DockableKind, RootState, Splitter};
use super::events::DockEvent;
use super::types::{DockableId, PinnedAlignment, WindowId};
use super::DockTree;

/// Where a dockable is currently held.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Location {
    Visible { owner: DockableId, index: usize },
    Pinned {
        root: DockableId,
        alignment: PinnedAlignment,
        index: usize,
    },
    Hidden { root: DockableId, index: usize },
    /// The main root.
    MainRoot,
    /// The layout root of a floating window.
    WindowLayout { window: WindowId },
    /// Created but not attached anywhere.
    Detached,
}

// ----------------------------------------------------------------------------
// Creation

impl<C> DockTree<C> {
    fn insert_dockable(&mut self, kind: DockableKind, title: String, context: Option<C>) -> DockableId {
        let id = DockableId::from_u64(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        self.dockables_mut()
            .insert(id, Dockable::new(id, kind, title, context));
        id
    }

    /// Creates a root dock. The first root created becomes the main root.
    pub fn create_root(&mut self) -> DockableId {
        let id = self.create_dock(DockKind::Root(Box::default()));
        if self.root.is_none() {
            self.root = Some(id);
        }
        id
    }

    /// Creates a detached, empty container.
    pub fn create_dock(&mut self, kind: DockKind) -> DockableId {
        self.insert_dockable(DockableKind::Dock(DockContainer::new(kind)), String::new(), None)
    }

    pub fn create_tool(&mut self, title: impl Into<String>, context: C) -> DockableId {
        self.insert_dockable(DockableKind::Tool, title.into(), Some(context))
    }

    pub fn create_document(&mut self, title: impl Into<String>, context: C) -> DockableId {
        self.insert_dockable(DockableKind::Document, title.into(), Some(context))
    }

    pub fn create_splitter(&mut self, thickness: f32) -> DockableId {
        self.insert_dockable(
            DockableKind::Splitter(Splitter {
                thickness,
                can_resize: true,
            }),
            String::new(),
            None,
        )
    }

    /// Creates a leaf of the same kind and title as `template`, with a new context.
    pub(crate) fn create_leaf_like(&mut self, template: DockableId, context: C) -> Option<DockableId> {
        let source = self.get(template)?;
        if !source.is_leaf() {
            return None;
        }
        let kind = source.kind.clone();
        let title = source.title.clone();
        let capabilities = source.capabilities;
        let dock_group = source.dock_group.clone();
        let id = self.insert_dockable(kind, title, Some(context));
        if let Some(clone) = self.get_mut(id) {
            clone.capabilities = capabilities;
            clone.dock_group = dock_group;
        }
        Some(id)
    }

    pub(crate) fn alloc_window_id(&mut self) -> WindowId {
        let id = WindowId::from_u64(self.next_window_id);
        self.next_window_id = self.next_window_id.saturating_add(1);
        id
    }

    /// Makes a detached root dock the main root.
    ///
    /// # Errors
    /// The dockable must exist, be a root dock and not be attached anywhere.
    pub fn set_root(&mut self, id: DockableId) -> Result<(), DockError> {
        let dockable = self.get(id).ok_or(DockError::MissingDockable(id))?;
        if !dockable.container().is_some_and(|c| c.kind.is_root()) {
            return Err(DockError::NotAContainer(id));
        }
        if !matches!(self.location(id), Location::Detached | Location::MainRoot) {
            return Err(DockError::OperationNotAllowed {
                operation: super::DockOperation::None,
                target: Some(id),
            });
        }
        self.root = Some(id);
        Ok(())
    }
}

// ----------------------------------------------------------------------------
// Queries

impl<C> DockTree<C> {
    pub fn root_state(&self, root: DockableId) -> Option<&RootState> {
        self.container(root)?.root_state()
    }

    pub fn root_state_mut(&mut self, root: DockableId) -> Option<&mut RootState> {
        self.container_mut(root)?.root_state_mut()
    }

    /// Floating windows, owned by the main root.
    pub fn windows(&self) -> &[DockWindow] {
        self.root
            .and_then(|root| self.root_state(root))
            .map_or(&[], |state| state.windows.as_slice())
    }

    pub fn window(&self, id: WindowId) -> Option<&DockWindow> {
        self.windows().iter().find(|w| w.id == id)
    }

    pub fn window_mut(&mut self, id: WindowId) -> Option<&mut DockWindow> {
        let root = self.root?;
        self.root_state_mut(root)?
            .windows
            .iter_mut()
            .find(|w| w.id == id)
    }

    pub fn location(&self, id: DockableId) -> Location {
        if self.root == Some(id) {
            return Location::MainRoot;
        }
        if let Some(window) = self.windows().iter().find(|w| w.layout == id) {
            return Location::WindowLayout { window: window.id };
        }
        let Some(owner) = self.owner(id) else {
            return Location::Detached;
        };
        let Some(container) = self.container(owner) else {
            return Location::Detached;
        };
        if let Some(index) = container.index_of(id) {
            return Location::Visible { owner, index };
        }
        if let Some(state) = container.root_state() {
            if let Some(alignment) = state.pinned.alignment_of(id) {
                let index = state
                    .pinned
                    .side(alignment)
                    .iter()
                    .position(|&x| x == id)
                    .unwrap_or_default();
                return Location::Pinned {
                    root: owner,
                    alignment,
                    index,
                };
            }
            if let Some(index) = state.hidden.iter().position(|&x| x == id) {
                return Location::Hidden { root: owner, index };
            }
        }
        Location::Detached
    }

    /// `true` if `id` is `ancestor` or lies below it.
    pub fn is_in_subtree(&self, ancestor: DockableId, id: DockableId) -> bool {
        let mut current = Some(id);
        let mut guard = self.len() + 1;
        while let Some(c) = current {
            if c == ancestor {
                return true;
            }
            guard = guard.saturating_sub(1);
            if guard == 0 {
                debug_assert!(false, "owner chain of {id} contains a cycle");
                return false;
            }
            current = self.owner(c);
        }
        false
    }

    /// The root dock (main or floating) above `id`.
    pub fn top_root_of(&self, id: DockableId) -> Option<DockableId> {
        let mut current = id;
        let mut guard = self.len() + 1;
        while let Some(owner) = self.owner(current) {
            current = owner;
            guard = guard.saturating_sub(1);
            if guard == 0 {
                return None;
            }
        }
        self.container(current)
            .is_some_and(|c| c.kind.is_root())
            .then_some(current)
    }

    /// Dock group inherited through the owner chain.
    pub fn effective_dock_group(&self, id: DockableId) -> Option<&str> {
        let mut current = Some(id);
        while let Some(c) = current {
            let dockable = self.get(c)?;
            if let Some(group) = dockable.dock_group.as_deref() {
                return Some(group);
            }
            current = dockable.owner;
        }
        None
    }

    /// The tabbed dock (tool/document) directly holding `id`, if any.
    pub fn tabbed_owner(&self, id: DockableId) -> Option<DockableId> {
        let owner = self.owner(id)?;
        self.container(owner)
            .is_some_and(|c| c.kind.is_tabbed())
            .then_some(owner)
    }

    /// All dockables below `id` (excluding `id`), including pinned, hidden and window layouts
    /// of a root.
    pub fn descendants(&self, id: DockableId) -> Vec<DockableId> {
        let mut out = Vec::new();
        let mut stack = self.direct_members(id);
        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(self.direct_members(current));
        }
        out
    }

    fn direct_members(&self, id: DockableId) -> Vec<DockableId> {
        let Some(container) = self.container(id) else {
            return Vec::new();
        };
        let mut members = container.visible.clone();
        if let Some(state) = container.root_state() {
            members.extend(state.pinned.iter());
            members.extend(state.hidden.iter().copied());
            members.extend(state.windows.iter().map(|w| w.layout));
        }
        members
    }
}

// ----------------------------------------------------------------------------
// Primitive mutations

impl<C> DockTree<C> {
    /// Inserts a detached `child` into `owner`'s visible list at `index` (end if `None`).
    ///
    /// Returns the index actually used.
    ///
    /// # Errors
    /// Fails if either id is missing, `owner` is not a container, `child` is attached somewhere,
    /// or `owner` lies inside `child`'s subtree.
    pub fn attach(
        &mut self,
        child: DockableId,
        owner: DockableId,
        index: Option<usize>,
    ) -> Result<usize, DockError> {
        self.validate_attach(child, owner)?;
        Ok(self.attach_unchecked(child, owner, index))
    }

    pub(crate) fn validate_attach(&self, child: DockableId, owner: DockableId) -> Result<(), DockError> {
        if !self.contains(child) {
            return Err(DockError::MissingDockable(child));
        }
        if !self.contains(owner) {
            return Err(DockError::MissingDockable(owner));
        }
        if self.container(owner).is_none() {
            return Err(DockError::NotAContainer(owner));
        }
        if child == owner {
            return Err(DockError::SelfTarget(child));
        }
        if self.is_in_subtree(child, owner) {
            return Err(DockError::TargetInsideSource {
                source: child,
                target: owner,
            });
        }
        if self.location(child) != Location::Detached {
            return Err(DockError::OperationNotAllowed {
                operation: super::DockOperation::None,
                target: Some(child),
            });
        }
        Ok(())
    }

    pub(crate) fn attach_unchecked(
        &mut self,
        child: DockableId,
        owner: DockableId,
        index: Option<usize>,
    ) -> usize {
        let is_splitter = self.get(child).is_some_and(|d| d.is_splitter());
        let Some(container) = self.container_mut(owner) else {
            debug_assert!(false, "attach target {owner} is not a container");
            return 0;
        };
        let index = index.unwrap_or(container.visible.len()).min(container.visible.len());
        container.visible.insert(index, child);
        let became_active = !is_splitter && container.active.is_none();
        if became_active {
            container.active = Some(child);
        }
        if let Some(dockable) = self.get_mut(child) {
            dockable.owner = Some(owner);
        }
        self.emit(DockEvent::Added {
            dockable: child,
            owner,
        });
        if became_active {
            self.emit(DockEvent::ActiveChanged {
                dock: owner,
                old: None,
                new: Some(child),
            });
        }
        index
    }

    /// Removes `child` from whatever list holds it and clears its owner.
    ///
    /// # Errors
    /// Fails for missing dockables and for roots (main or window layouts).
    pub fn detach(&mut self, child: DockableId) -> Result<Location, DockError> {
        if !self.contains(child) {
            return Err(DockError::MissingDockable(child));
        }
        let location = self.location(child);
        match location {
            Location::Visible { owner, index } => {
                self.detach_visible(child, owner, index);
            }
            Location::Pinned {
                root,
                alignment,
                index,
            } => {
                let mut preview_cleared = false;
                if let Some(state) = self.root_state_mut(root) {
                    state.pinned.side_mut(alignment).remove(index);
                    if state.pinned_preview == Some(child) {
                        state.pinned_preview = None;
                        preview_cleared = true;
                    }
                }
                if preview_cleared {
                    self.emit(DockEvent::PinnedPreviewChanged {
                        root,
                        dockable: None,
                    });
                }
                self.clear_owner(child);
                self.emit(DockEvent::Removed {
                    dockable: child,
                    owner: root,
                });
            }
            Location::Hidden { root, index } => {
                if let Some(state) = self.root_state_mut(root) {
                    state.hidden.remove(index);
                }
                self.clear_owner(child);
                self.emit(DockEvent::Removed {
                    dockable: child,
                    owner: root,
                });
            }
            Location::Detached => {}
            Location::MainRoot | Location::WindowLayout { .. } => {
                return Err(DockError::OperationNotAllowed {
                    operation: super::DockOperation::None,
                    target: Some(child),
                });
            }
        }
        Ok(location)
    }

    fn clear_owner(&mut self, child: DockableId) {
        if let Some(dockable) = self.get_mut(child) {
            dockable.owner = None;
        }
    }

    fn detach_visible(&mut self, child: DockableId, owner: DockableId, index: usize) {
        let mut active_change = None;
        let candidates: Vec<DockableId>;
        {
            let Some(container) = self.container(owner) else {
                return;
            };
            candidates = container.visible.clone();
        }
        let fallback = self.fallback_active(owner, child, index, &candidates);

        let Some(container) = self.container_mut(owner) else {
            return;
        };
        container.visible.remove(index);
        container.history.forget(child);
        if container.focused == Some(child) {
            container.focused = None;
        }
        if container.active == Some(child) {
            container.active = fallback;
            active_change = Some(fallback);
        }

        self.clear_owner(child);
        self.emit(DockEvent::Removed {
            dockable: child,
            owner,
        });
        if let Some(new) = active_change {
            self.emit(DockEvent::ActiveChanged {
                dock: owner,
                old: Some(child),
                new,
            });
            if let Some(new) = new {
                self.emit(DockEvent::Selected { dockable: new });
            }
        }
    }

    /// Next active child when `removed` (at `index`) leaves: the most recent history entry
    /// still present, else the following sibling, else the preceding one.
    fn fallback_active(
        &self,
        owner: DockableId,
        removed: DockableId,
        index: usize,
        siblings: &[DockableId],
    ) -> Option<DockableId> {
        let is_candidate =
            |id: DockableId| id != removed && self.get(id).is_some_and(|d| !d.is_splitter());
        if let Some(container) = self.container(owner) {
            if let Some(&previous) = container
                .history
                .back
                .iter()
                .rev()
                .find(|&&id| is_candidate(id) && siblings.contains(&id))
            {
                return Some(previous);
            }
        }
        siblings
            .iter()
            .skip(index + 1)
            .copied()
            .find(|&id| is_candidate(id))
            .or_else(|| siblings[..index].iter().rev().copied().find(|&id| is_candidate(id)))
    }

    /// Moves an attached dockable into `new_owner` at `index` (end if `None`).
    ///
    /// When `new_owner` is the current owner, `index` is interpreted after removal.
    ///
    /// # Errors
    /// Rejected without any change when the move would break the tree.
    pub fn move_to(
        &mut self,
        child: DockableId,
        new_owner: DockableId,
        index: Option<usize>,
    ) -> Result<usize, DockError> {
        if !self.contains(child) {
            return Err(DockError::MissingDockable(child));
        }
        if !self.contains(new_owner) {
            return Err(DockError::MissingDockable(new_owner));
        }
        if self.container(new_owner).is_none() {
            return Err(DockError::NotAContainer(new_owner));
        }
        if self.is_in_subtree(child, new_owner) {
            return Err(if child == new_owner {
                DockError::SelfTarget(child)
            } else {
                DockError::TargetInsideSource {
                    source: child,
                    target: new_owner,
                }
            });
        }
        let old_owner = self.owner(child);
        self.detach(child)?;
        let index = self.attach_unchecked(child, new_owner, index);
        self.emit(DockEvent::Moved {
            dockable: child,
            old_owner,
            new_owner,
        });
        Ok(index)
    }

    /// Reorders one child inside its container (tab reorder).
    ///
    /// # Errors
    /// Indices must address existing children.
    pub fn move_within(&mut self, owner: DockableId, from: usize, to: usize) -> Result<(), DockError> {
        let container = self
            .container_mut(owner)
            .ok_or(DockError::NotAContainer(owner))?;
        let len = container.visible.len();
        if from >= len {
            return Err(DockError::InvalidIndex { index: from, len });
        }
        if to >= len {
            return Err(DockError::InvalidIndex { index: to, len });
        }
        if from == to {
            return Ok(());
        }
        let child = container.visible.remove(from);
        container.visible.insert(to, child);
        self.emit(DockEvent::Moved {
            dockable: child,
            old_owner: Some(owner),
            new_owner: owner,
        });
        Ok(())
    }

    /// Deletes `id` and everything below it from the arena, detaching it first.
    ///
    /// # Errors
    /// Fails for a missing id or the main root.
    pub fn remove_subtree(&mut self, id: DockableId) -> Result<Vec<Dockable<C>>, DockError> {
        if !self.contains(id) {
            return Err(DockError::MissingDockable(id));
        }
        match self.location(id) {
            Location::MainRoot => {
                return Err(DockError::OperationNotAllowed {
                    operation: super::DockOperation::None,
                    target: Some(id),
                });
            }
            Location::WindowLayout { window } => {
                if let Some(root) = self.root {
                    if let Some(state) = self.root_state_mut(root) {
                        state.windows.retain(|w| w.id != window);
                    }
                }
                self.emit(DockEvent::WindowClosed { window });
            }
            _ => {
                self.detach(id)?;
            }
        }
        let mut ids = self.descendants(id);
        ids.push(id);
        let removed = ids
            .into_iter()
            .filter_map(|x| self.dockables_mut().remove(&x))
            .collect();
        Ok(removed)
    }
}

// ----------------------------------------------------------------------------
// Selection, focus and navigation

impl<C> DockTree<C> {
    /// Sets the active child of `dock`, recording the previous one in the back stack.
    ///
    /// # Errors
    /// `child` must be a non-splitter member of `dock`'s visible list.
    pub fn set_active(&mut self, dock: DockableId, child: Option<DockableId>) -> Result<(), DockError> {
        self.validate_active(dock, child)?;
        let Some(container) = self.container_mut(dock) else {
            return Err(DockError::NotAContainer(dock));
        };
        let old = container.active;
        if old == child {
            return Ok(());
        }
        if let Some(old) = old {
            container.history.back.retain(|&x| x != old);
            container.history.back.push(old);
        }
        container.history.forward.clear();
        container.active = child;
        self.emit_active_change(dock, old, child);
        Ok(())
    }

    fn validate_active(&self, dock: DockableId, child: Option<DockableId>) -> Result<(), DockError> {
        let container = self.container(dock).ok_or(DockError::NotAContainer(dock))?;
        if let Some(child) = child {
            let is_member = container.index_of(child).is_some();
            let is_splitter = self.get(child).is_some_and(|d| d.is_splitter());
            if !is_member || is_splitter {
                return Err(DockError::NotOwned {
                    dockable: child,
                    owner: dock,
                });
            }
        }
        Ok(())
    }

    fn emit_active_change(&mut self, dock: DockableId, old: Option<DockableId>, new: Option<DockableId>) {
        self.emit(DockEvent::ActiveChanged { dock, old, new });
        if let Some(new) = new {
            self.emit(DockEvent::Selected { dockable: new });
        }
    }

    pub fn can_go_back(&self, dock: DockableId) -> bool {
        self.container(dock).is_some_and(|c| {
            c.history
                .back
                .iter()
                .any(|&id| c.index_of(id).is_some() && Some(id) != c.active)
        })
    }

    pub fn can_go_forward(&self, dock: DockableId) -> bool {
        self.container(dock).is_some_and(|c| {
            c.history
                .forward
                .iter()
                .any(|&id| c.index_of(id).is_some() && Some(id) != c.active)
        })
    }

    /// Re-activates the most recent previously active child still present.
    ///
    /// # Errors
    /// `dock` must be a container.
    pub fn go_back(&mut self, dock: DockableId) -> Result<Option<DockableId>, DockError> {
        self.navigate(dock, true)
    }

    /// Undoes a [`Self::go_back`].
    ///
    /// # Errors
    /// `dock` must be a container.
    pub fn go_forward(&mut self, dock: DockableId) -> Result<Option<DockableId>, DockError> {
        self.navigate(dock, false)
    }

    fn navigate(&mut self, dock: DockableId, back: bool) -> Result<Option<DockableId>, DockError> {
        let container = self
            .container_mut(dock)
            .ok_or(DockError::NotAContainer(dock))?;
        let current = container.active;
        let target = loop {
            let stack = if back {
                &mut container.history.back
            } else {
                &mut container.history.forward
            };
            let Some(candidate) = stack.pop() else {
                break None;
            };
            if container.visible.contains(&candidate) && Some(candidate) != current {
                break Some(candidate);
            }
        };
        let Some(target) = target else {
            return Ok(None);
        };
        if let Some(current) = current {
            let other = if back {
                &mut container.history.forward
            } else {
                &mut container.history.back
            };
            other.push(current);
        }
        container.active = Some(target);
        self.emit_active_change(dock, current, Some(target));
        Ok(Some(target))
    }

    /// Makes `id` active in every container on its owner chain and records it as the
    /// focused dockable of its owner and its root.
    ///
    /// # Errors
    /// `id` must exist.
    pub fn focus(&mut self, id: DockableId) -> Result<(), DockError> {
        if !self.contains(id) {
            return Err(DockError::MissingDockable(id));
        }
        let mut child = id;
        while let Some(owner) = self.owner(child) {
            let is_member = self
                .container(owner)
                .is_some_and(|c| c.index_of(child).is_some());
            if is_member && self.active(owner) != Some(child) {
                self.set_active(owner, Some(child))?;
            }
            child = owner;
        }
        if let Some(owner) = self.owner(id) {
            if let Some(container) = self.container_mut(owner) {
                container.focused = Some(id);
            }
        }
        if let Some(root) = self.top_root_of(id) {
            if let Some(container) = self.container_mut(root) {
                let old = container.focused;
                if old != Some(id) {
                    container.focused = Some(id);
                    self.emit(DockEvent::FocusedChanged {
                        root,
                        old,
                        new: Some(id),
                    });
                }
            }
        }
        Ok(())
    }
}
