use crate::model::{DockOperation, DockableId, WindowId};

/// Why a mutation request was rejected.
///
/// Every variant leaves the tree exactly as it was before the call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DockError {
    MissingDockable(DockableId),
    MissingWindow(WindowId),
    NotAContainer(DockableId),
    /// `dockable` is not listed by `owner`.
    NotOwned {
        dockable: DockableId,
        owner: DockableId,
    },
    /// Source and target are the same dockable.
    SelfTarget(DockableId),
    /// The target lives inside the subtree being moved.
    TargetInsideSource {
        source: DockableId,
        target: DockableId,
    },
    CapabilityDenied {
        dockable: DockableId,
        capability: &'static str,
    },
    /// Closing would empty a dock with `can_close_last_dockable == false`.
    LastDockable {
        dock: DockableId,
    },
    OperationNotAllowed {
        operation: DockOperation,
        target: Option<DockableId>,
    },
    /// Copy/link drop, but the behavior produced no clone.
    NothingToClone(DockableId),
    InvalidIndex {
        index: usize,
        len: usize,
    },
    NotPinned(DockableId),
    NotHidden(DockableId),
    NoRoot,
    /// NaN, infinite or empty geometry.
    InvalidGeometry,
}

impl std::fmt::Display for DockError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingDockable(id) => write!(f, "dockable {id} does not exist"),
            Self::MissingWindow(id) => write!(f, "{id} does not exist"),
            Self::NotAContainer(id) => write!(f, "dockable {id} is not a dock"),
            Self::NotOwned { dockable, owner } => {
                write!(f, "dockable {dockable} is not a child of {owner}")
            }
            Self::SelfTarget(id) => write!(f, "cannot dock {id} onto itself"),
            Self::TargetInsideSource { source, target } => {
                write!(f, "target {target} is inside the dragged subtree {source}")
            }
            Self::CapabilityDenied {
                dockable,
                capability,
            } => write!(f, "dockable {dockable} does not allow {capability}"),
            Self::LastDockable { dock } => {
                write!(f, "dock {dock} cannot close its last dockable")
            }
            Self::OperationNotAllowed { operation, target } => match target {
                Some(target) => write!(f, "operation {operation:?} is not allowed on {target}"),
                None => write!(f, "operation {operation:?} is not allowed"),
            },
            Self::NothingToClone(id) => write!(f, "no clone available for {id}"),
            Self::InvalidIndex { index, len } => {
                write!(f, "index {index} out of range for {len} children")
            }
            Self::NotPinned(id) => write!(f, "dockable {id} is not pinned"),
            Self::NotHidden(id) => write!(f, "dockable {id} is not hidden"),
            Self::NoRoot => write!(f, "the tree has no root dock"),
            Self::InvalidGeometry => write!(f, "geometry is not finite or empty"),
        }
    }
}

impl std::error::Error for DockError {}
