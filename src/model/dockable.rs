use egui::{Pos2, Rect, Vec2};

use crate::mdi::MdiProperties;

use super::types::{
    DockOperation, DockOperationMask, DockableId, DocumentLayout, Orientation, PinnedAlignment,
    WindowId,
};

/// Capability flags consulted by validation before any drag or mutation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct DockCapabilities {
    pub can_close: bool,
    pub can_pin: bool,
    pub can_float: bool,
    pub can_drag: bool,
    pub can_drop: bool,
    /// A tool may be tabbed into a document dock.
    pub can_dock_as_document: bool,
}

impl Default for DockCapabilities {
    fn default() -> Self {
        Self {
            can_close: true,
            can_pin: true,
            can_float: true,
            can_drag: true,
            can_drop: true,
            can_dock_as_document: true,
        }
    }
}

/// Last-known bounds in the three coordinate spaces the presentation layer reports.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct DockableBounds {
    pub visible: Option<Rect>,
    pub pinned: Option<Rect>,
    pub tab: Option<Rect>,
}

/// Back/forward stacks over previously active children of a container.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct NavigationHistory {
    pub back: Vec<DockableId>,
    pub forward: Vec<DockableId>,
}

impl NavigationHistory {
    pub(crate) fn forget(&mut self, id: DockableId) {
        self.back.retain(|&x| x != id);
        self.forward.retain(|&x| x != id);
    }
}

/// Dockables pinned to the four edges of a root.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct PinnedDockables {
    pub left: Vec<DockableId>,
    pub right: Vec<DockableId>,
    pub top: Vec<DockableId>,
    pub bottom: Vec<DockableId>,
}

impl PinnedDockables {
    pub fn side(&self, alignment: PinnedAlignment) -> &Vec<DockableId> {
        match alignment {
            PinnedAlignment::Left => &self.left,
            PinnedAlignment::Right => &self.right,
            PinnedAlignment::Top => &self.top,
            PinnedAlignment::Bottom => &self.bottom,
        }
    }

    pub fn side_mut(&mut self, alignment: PinnedAlignment) -> &mut Vec<DockableId> {
        match alignment {
            PinnedAlignment::Left => &mut self.left,
            PinnedAlignment::Right => &mut self.right,
            PinnedAlignment::Top => &mut self.top,
            PinnedAlignment::Bottom => &mut self.bottom,
        }
    }

    /// Which edge `id` is pinned to, if any.
    pub fn alignment_of(&self, id: DockableId) -> Option<PinnedAlignment> {
        [
            PinnedAlignment::Left,
            PinnedAlignment::Right,
            PinnedAlignment::Top,
            PinnedAlignment::Bottom,
        ]
        .into_iter()
        .find(|&a| self.side(a).contains(&id))
    }

    pub fn iter(&self) -> impl Iterator<Item = DockableId> + '_ {
        self.left
            .iter()
            .chain(&self.right)
            .chain(&self.top)
            .chain(&self.bottom)
            .copied()
    }
}

/// One floating top-level surface.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct DockWindow {
    pub id: WindowId,
    pub title: String,
    pub position: Pos2,
    pub size: Vec2,
    pub topmost: bool,
    /// The root dock laid out inside this window.
    pub layout: DockableId,
    /// Opaque handle of the presentation surface hosting this window.
    pub host: Option<u64>,
}

impl DockWindow {
    pub fn rect(&self) -> Rect {
        Rect::from_min_size(self.position, self.size)
    }
}

/// State only a root dock carries.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct RootState {
    /// Floating windows owned by this root. Only the main root owns windows.
    pub windows: Vec<DockWindow>,
    pub pinned: PinnedDockables,
    /// Pinned dockable currently shown on demand.
    pub pinned_preview: Option<DockableId>,
    pub hidden: Vec<DockableId>,
    /// Set when this root is the layout of a floating window.
    pub window: Option<WindowId>,
}

/// Container variants.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum DockKind {
    /// Splits space by proportion; children alternate with splitters.
    Proportional { orientation: Orientation },
    /// Children take their preferred pixel size along the axis; the last one fills.
    Pixel { orientation: Orientation },
    /// Tabbed group of tools.
    Tool { alignment: PinnedAlignment },
    /// Tabbed (or MDI) group of documents.
    Document { layout: DocumentLayout },
    /// Top-level container of a window.
    Root(Box<RootState>),
    Grid,
    Wrap { orientation: Orientation },
}

impl DockKind {
    pub fn is_tabbed(&self) -> bool {
        matches!(self, Self::Tool { .. } | Self::Document { .. })
    }

    pub fn is_root(&self) -> bool {
        matches!(self, Self::Root(_))
    }

    pub fn proportional_orientation(&self) -> Option<Orientation> {
        match self {
            Self::Proportional { orientation } => Some(*orientation),
            _ => None,
        }
    }

    /// Operations a container of this kind accepts unless configured otherwise.
    pub fn default_allowed_operations(&self) -> DockOperationMask {
        match self {
            Self::Document {
                layout: DocumentLayout::Mdi,
            } => DockOperationMask::only(&[DockOperation::Fill, DockOperation::Window]),
            Self::Root(_) => DockOperationMask::ALL.without(DockOperation::Fill),
            _ => DockOperationMask::ALL,
        }
    }
}

/// A dockable that owns other dockables.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct DockContainer {
    pub kind: DockKind,
    /// Ordered, duplicate-free. Order is the visual/tab order.
    pub visible: Vec<DockableId>,
    pub active: Option<DockableId>,
    pub focused: Option<DockableId>,
    pub history: NavigationHistory,
    pub can_close_last_dockable: bool,
    /// Pruned from its owner when it becomes empty.
    pub is_collapsable: bool,
    pub allowed_operations: DockOperationMask,
}

impl DockContainer {
    pub fn new(kind: DockKind) -> Self {
        let allowed_operations = kind.default_allowed_operations();
        let is_collapsable = !kind.is_root();
        Self {
            kind,
            visible: Vec::new(),
            active: None,
            focused: None,
            history: NavigationHistory::default(),
            can_close_last_dockable: true,
            is_collapsable,
            allowed_operations,
        }
    }

    pub fn index_of(&self, id: DockableId) -> Option<usize> {
        self.visible.iter().position(|&x| x == id)
    }

    pub fn root_state(&self) -> Option<&RootState> {
        match &self.kind {
            DockKind::Root(state) => Some(state),
            _ => None,
        }
    }

    pub fn root_state_mut(&mut self) -> Option<&mut RootState> {
        match &mut self.kind {
            DockKind::Root(state) => Some(state),
            _ => None,
        }
    }
}

/// A splitter pseudo-child between two proportional siblings.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Splitter {
    pub thickness: f32,
    pub can_resize: bool,
}

/// What a dockable is.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum DockableKind {
    Tool,
    Document,
    Splitter(Splitter),
    Dock(DockContainer),
}

/// Anything placed in the layout.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Dockable<C> {
    pub id: DockableId,
    pub title: String,
    /// Opaque user data. Engine-created containers carry `None`.
    pub context: Option<C>,
    /// Container currently listing this dockable. Lookup only.
    pub owner: Option<DockableId>,
    /// Where to go back to after float/pin/hide.
    pub original_owner: Option<DockableId>,
    pub capabilities: DockCapabilities,
    pub dock_group: Option<String>,
    /// Share along the owner's axis in `[0, 1]`, or NaN when unassigned.
    pub proportion: f64,
    /// Overrides [`crate::DockOptions::default_min_size`] for splitter drags.
    pub min_size: Option<f64>,
    /// Size along the axis inside a pixel dock.
    pub preferred_size: Option<f32>,
    pub bounds: DockableBounds,
    pub mdi: MdiProperties,
    pub kind: DockableKind,
}

impl<C> Dockable<C> {
    pub(crate) fn new(id: DockableId, kind: DockableKind, title: String, context: Option<C>) -> Self {
        Self {
            id,
            title,
            context,
            owner: None,
            original_owner: None,
            capabilities: DockCapabilities::default(),
            dock_group: None,
            proportion: f64::NAN,
            min_size: None,
            preferred_size: None,
            bounds: DockableBounds::default(),
            mdi: MdiProperties::default(),
            kind,
        }
    }

    pub fn is_splitter(&self) -> bool {
        matches!(self.kind, DockableKind::Splitter(_))
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, DockableKind::Tool | DockableKind::Document)
    }

    pub fn is_document(&self) -> bool {
        matches!(self.kind, DockableKind::Document)
    }

    pub fn container(&self) -> Option<&DockContainer> {
        match &self.kind {
            DockableKind::Dock(dock) => Some(dock),
            _ => None,
        }
    }

    pub fn container_mut(&mut self) -> Option<&mut DockContainer> {
        match &mut self.kind {
            DockableKind::Dock(dock) => Some(dock),
            _ => None,
        }
    }

    pub fn splitter(&self) -> Option<Splitter> {
        match self.kind {
            DockableKind::Splitter(splitter) => Some(splitter),
            _ => None,
        }
    }

    pub fn has_proportion(&self) -> bool {
        self.proportion.is_finite()
    }
}
