//! Pointer-driven docking.
//!
//! Hosts translate their input into [`PointerEvent`]s and feed them to a [`DockController`],
//! which hit-tests the registered [`DockSurface`]s, resolves the hovered drop zone into a
//! [`crate::model::DockOperation`] and commits it through the [`crate::DockManager`] on release.
//! [`TabReorder`] handles the narrower case of dragging a tab along its own strip.

mod controller;
mod registry;
mod session;
mod tab_reorder;
mod zones;


pub use controller::{CancelReason, DockController, DragOutcome, PointerEvent, PointerEventKind};
pub use registry::{DockSurface, SurfaceId, SurfaceRegistry};
pub use session::{DragPhase, DragSession};
pub use tab_reorder::{TabReorder, TabReorderOutcome, TabStrip};
pub use zones::{DropZone, drop_zones, get_dock_operation, overshoot};
