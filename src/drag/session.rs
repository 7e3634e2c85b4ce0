use egui::Pos2;

use crate::model::{DockOperation, DockableId, DragAction};

use super::registry::SurfaceId;

/// One press→release gesture.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragSession {
    pub id: u64,
    pub origin: Pos2,
    pub source: DockableId,
    pub source_surface: SurfaceId,
    pub action: DragAction,

    /// Last pointer position seen by the session.
    pub pointer: Pos2,

    /// Operation the drop would perform right now; [`DockOperation::None`] while nothing legal
    /// is hovered.
    pub operation: DockOperation,

    /// Candidate the current operation is relative to; `None` for floating.
    pub target: Option<DockableId>,
}

impl DragSession {
    pub(super) fn new(
        id: u64,
        origin: Pos2,
        source: DockableId,
        source_surface: SurfaceId,
        action: DragAction,
    ) -> Self {
        Self {
            id,
            origin,
            source,
            source_surface,
            action,
            pointer: origin,
            operation: DockOperation::None,
            target: None,
        }
    }

    pub fn travelled(&self) -> f32 {
        (self.pointer - self.origin).length()
    }

    pub(super) fn clear_hover(&mut self) {
        self.operation = DockOperation::None;
        self.target = None;
    }
}

/// State of a [`super::DockController`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum DragPhase {
    #[default]
    Idle,

    /// Pointer is down on a draggable dockable but has not travelled far enough yet.
    Pressed(DragSession),

    Dragging(DragSession),
}

impl DragPhase {
    pub fn session(&self) -> Option<&DragSession> {
        match self {
            Self::Idle => None,
            Self::Pressed(session) | Self::Dragging(session) => Some(session),
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_pressed(&self) -> bool {
        matches!(self, Self::Pressed(_))
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self, Self::Dragging(_))
    }
}

#[cfg(test)]
mod tests {
    use egui::pos2;

    use super::*;

    #[test]
    fn fresh_session_hovers_nothing() {
        let mut session = DragSession::new(
            1,
            pos2(10.0, 10.0),
            DockableId::from_u64(3),
            SurfaceId::from_u64(1),
            DragAction::Move,
        );
        assert_eq!(session.operation, DockOperation::None);
        assert_eq!(session.travelled(), 0.0);

        session.pointer = pos2(13.0, 14.0);
        assert!((session.travelled() - 5.0).abs() < 1e-6);

        session.operation = DockOperation::Fill;
        session.target = Some(DockableId::from_u64(4));
        session.clear_hover();
        assert_eq!(session.target, None);

        let phase = DragPhase::Pressed(session);
        assert!(phase.is_pressed());
        assert_eq!(phase.session().map(|s| s.id), Some(1));
        assert!(DragPhase::default().is_idle());
    }
}
