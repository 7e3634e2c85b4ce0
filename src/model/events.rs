use super::types::{DockableId, PinnedAlignment, WindowId};

/// Change notification queued by every tree mutation.
///
/// Drained by the presentation layer with [`super::DockTree::drain_events`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DockEvent {
    Added {
        dockable: DockableId,
        owner: DockableId,
    },
    Removed {
        dockable: DockableId,
        owner: DockableId,
    },
    Moved {
        dockable: DockableId,
        old_owner: Option<DockableId>,
        new_owner: DockableId,
    },
    ActiveChanged {
        dock: DockableId,
        old: Option<DockableId>,
        new: Option<DockableId>,
    },
    FocusedChanged {
        root: DockableId,
        old: Option<DockableId>,
        new: Option<DockableId>,
    },
    /// `OnSelected` for the new active child.
    Selected {
        dockable: DockableId,
    },
    Closed {
        dockable: DockableId,
    },
    Collapsed {
        dock: DockableId,
    },
    WindowOpened {
        window: WindowId,
    },
    WindowClosed {
        window: WindowId,
    },
    Pinned {
        dockable: DockableId,
        alignment: PinnedAlignment,
    },
    Unpinned {
        dockable: DockableId,
    },
    PinnedPreviewChanged {
        root: DockableId,
        dockable: Option<DockableId>,
    },
    Hidden {
        dockable: DockableId,
    },
    Restored {
        dockable: DockableId,
    },
}
