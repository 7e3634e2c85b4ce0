//! Interactive docking layout engine.
//!
//! A [`DockTree`] holds every dockable of an application layout: proportional splits, tab
//! groups, MDI document areas, pinned and hidden tools, and floating windows. The
//! [`DockManager`] applies docking operations to it atomically, [`layout::arrange`] turns it
//! into rectangles, and the [`DockController`] drives drag-and-drop docking from pointer input.
//!
//! Rendering is left to the host; `egui` is used for its geometry types.

#![forbid(unsafe_code)]

pub mod behavior;
pub mod debug;
pub mod drag;
pub mod error;
pub mod layout;
pub mod manager;
pub mod mdi;
pub mod model;
pub mod options;

pub use behavior::{CloningBehavior, DefaultBehavior, DockBehavior};
pub use debug::DebugEventLog;
pub use drag::{DockController, DragOutcome, PointerEvent, PointerEventKind, SurfaceRegistry};
pub use error::DockError;
pub use manager::DockManager;
pub use mdi::{ClassicMdiLayout, MdiLayoutManager};
pub use model::{DockBuilder, DockOperation, DockTree, DockableId, DragAction};
pub use options::{DockOptions, MdiOptions};
