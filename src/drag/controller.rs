use egui::{Modifiers, Pos2, Rect, Vec2};

use crate::behavior::{DefaultBehavior, DockBehavior};
use crate::debug::DebugEventLog;
use crate::error::DockError;
use crate::manager::DockManager;
use crate::mdi::{ClassicMdiLayout, MdiLayoutManager};
use crate::model::{DockKind, DockOperation, DockTree, DockableId, DocumentLayout, DragAction};

use super::registry::{SurfaceId, SurfaceRegistry};
use super::session::{DragPhase, DragSession};
use super::zones::{get_dock_operation, overshoot};

/// What happened to the pointer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointerEventKind {
    Pressed,
    Released,
    Moved,
    Enter,
    Leave,
    CaptureLost,
    WheelChanged,
}

/// Input from the host, already translated into the surfaces' coordinate space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerEventKind,
    pub position: Pos2,
    pub delta: Vec2,
    pub modifiers: Modifiers,
}

impl PointerEvent {
    pub fn new(kind: PointerEventKind, position: Pos2) -> Self {
        Self {
            kind,
            position,
            delta: Vec2::ZERO,
            modifiers: Modifiers::NONE,
        }
    }

    #[inline]
    pub fn pressed(position: Pos2) -> Self {
        Self::new(PointerEventKind::Pressed, position)
    }

    #[inline]
    pub fn moved(position: Pos2) -> Self {
        Self::new(PointerEventKind::Moved, position)
    }

    #[inline]
    pub fn released(position: Pos2) -> Self {
        Self::new(PointerEventKind::Released, position)
    }

    #[inline]
    pub fn capture_lost() -> Self {
        Self::new(PointerEventKind::CaptureLost, Pos2::ZERO)
    }

    #[must_use]
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

/// Why a gesture ended without a drop.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CancelReason {
    /// Released while nothing legal was hovered.
    NoOperation,

    /// The dock manager refused the drop at commit time.
    Rejected(DockError),

    CaptureLost,
}

/// Result of feeding one [`PointerEvent`] to a [`DockController`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DragOutcome {
    /// Nothing changed.
    None,

    Pressed {
        source: DockableId,
    },

    /// Pressed and released without travelling far enough to drag.
    Clicked {
        source: DockableId,
    },

    Started {
        source: DockableId,
    },

    /// Hover resolution changed; hosts repaint their drop indicators from this.
    Hovered {
        operation: DockOperation,
        target: Option<DockableId>,
    },

    Dropped {
        source: DockableId,
        operation: DockOperation,
        target: Option<DockableId>,

        /// The dockable that ended up active at the destination.
        focus: DockableId,
    },

    Cancelled {
        source: DockableId,
        reason: CancelReason,
    },
}

/// The drag state machine: `Idle → Pressed → Dragging → (dropped | cancelled) → Idle`.
///
/// Only one gesture exists at a time; a press while a gesture is in progress is ignored.
#[derive(Clone, Debug, Default)]
pub struct DockController<B = DefaultBehavior, M = ClassicMdiLayout> {
    pub manager: DockManager<B, M>,
    phase: DragPhase,
    next_session_id: u64,
    debug_log: DebugEventLog,
}

impl<B, M> DockController<B, M> {
    pub fn new(manager: DockManager<B, M>) -> Self {
        Self {
            manager,
            phase: DragPhase::Idle,
            next_session_id: 1,
            debug_log: DebugEventLog::default(),
        }
    }

    pub fn phase(&self) -> &DragPhase {
        &self.phase
    }

    /// The in-flight gesture, if any.
    pub fn session(&self) -> Option<&DragSession> {
        self.phase.session()
    }

    pub fn debug_log(&self) -> &DebugEventLog {
        &self.debug_log
    }

    pub fn clear_debug_log(&mut self) {
        self.debug_log.clear();
    }

    /// Drops any gesture in progress without touching the tree.
    pub fn cancel(&mut self) -> DragOutcome {
        match std::mem::take(&mut self.phase) {
            DragPhase::Idle => DragOutcome::None,
            DragPhase::Pressed(session) | DragPhase::Dragging(session) => {
                log::debug!("session CANCEL id={} source={}", session.id, session.source);
                self.debug_event(format!("session CANCEL id={}", session.id));
                DragOutcome::Cancelled {
                    source: session.source,
                    reason: CancelReason::CaptureLost,
                }
            }
        }
    }

    fn debug_event(&mut self, message: impl Into<String>) {
        if !self.manager.options.debug_event_log {
            return;
        }
        let capacity = self.manager.options.debug_event_log_capacity;
        self.debug_log.push(capacity, message);
    }
}

impl<B, M: MdiLayoutManager> DockController<B, M> {
    /// Feeds one pointer event, committing a drop on release.
    ///
    /// `source_surface` is the surface that delivered the event; `surfaces` lists every surface
    /// a drop could land on.
    pub fn process<C>(
        &mut self,
        tree: &mut DockTree<C>,
        event: PointerEvent,
        source_surface: SurfaceId,
        surfaces: &SurfaceRegistry,
    ) -> DragOutcome
    where
        B: DockBehavior<C>,
    {
        match event.kind {
            PointerEventKind::Pressed => {
                let Some(source) = surfaces
                    .get(source_surface)
                    .filter(|s| s.rect.contains(event.position))
                    .and_then(|s| draggable_at(tree, s.root, event.position))
                else {
                    return DragOutcome::None;
                };
                self.press_dockable(tree, source, source_surface, event)
            }
            PointerEventKind::Moved | PointerEventKind::Enter | PointerEventKind::Leave => {
                self.on_move(tree, event, surfaces)
            }
            PointerEventKind::Released => self.on_release(tree, event, surfaces),
            PointerEventKind::CaptureLost => self.cancel(),
            PointerEventKind::WheelChanged => DragOutcome::None,
        }
    }

    /// Starts a gesture on a dockable the host already knows was pressed (e.g. a window's
    /// title bar, whose source is the window's layout root).
    pub fn press_dockable<C>(
        &mut self,
        tree: &DockTree<C>,
        source: DockableId,
        source_surface: SurfaceId,
        event: PointerEvent,
    ) -> DragOutcome {
        if let Some(active) = self.phase.session() {
            log::debug!("session PRESS ignored: session {} in progress", active.id);
            let message = format!("session PRESS ignored id={}", active.id);
            self.debug_event(message);
            return DragOutcome::None;
        }
        let draggable = tree
            .get(source)
            .is_some_and(|d| !d.is_splitter() && d.capabilities.can_drag);
        if !draggable {
            return DragOutcome::None;
        }

        let id = self.next_session_id.max(1);
        self.next_session_id = id.saturating_add(1);
        let action = DragAction::from_modifiers(event.modifiers);
        let session = DragSession::new(id, event.position, source, source_surface, action);
        self.phase = DragPhase::Pressed(session);
        log::debug!("session PRESS id={id} source={source} action={action:?}");
        self.debug_event(format!("session PRESS id={id} source={source} action={action:?}"));
        DragOutcome::Pressed { source }
    }

    fn on_move<C>(&mut self, tree: &DockTree<C>, event: PointerEvent, surfaces: &SurfaceRegistry) -> DragOutcome
    where
        B: DockBehavior<C>,
    {
        match self.phase {
            DragPhase::Idle => DragOutcome::None,
            DragPhase::Pressed(mut session) => {
                session.pointer = event.position;
                if event.kind != PointerEventKind::Moved
                    || session.travelled() < self.manager.options.min_drag_distance
                {
                    self.phase = DragPhase::Pressed(session);
                    return DragOutcome::None;
                }
                self.resolve(tree, surfaces, &mut session);
                self.phase = DragPhase::Dragging(session);
                log::debug!(
                    "session START id={} source={} travelled={:.1}",
                    session.id,
                    session.source,
                    session.travelled()
                );
                self.debug_event(format!("session START id={} source={}", session.id, session.source));
                DragOutcome::Started {
                    source: session.source,
                }
            }
            DragPhase::Dragging(mut session) => {
                let before = (session.operation, session.target);
                session.pointer = event.position;
                self.resolve(tree, surfaces, &mut session);
                self.phase = DragPhase::Dragging(session);
                if (session.operation, session.target) == before {
                    return DragOutcome::None;
                }
                log::trace!(
                    "session HOVER id={} operation={:?} target={:?}",
                    session.id,
                    session.operation,
                    session.target
                );
                DragOutcome::Hovered {
                    operation: session.operation,
                    target: session.target,
                }
            }
        }
    }

    fn on_release<C>(&mut self, tree: &mut DockTree<C>, event: PointerEvent, surfaces: &SurfaceRegistry) -> DragOutcome
    where
        B: DockBehavior<C>,
    {
        match std::mem::take(&mut self.phase) {
            DragPhase::Idle => DragOutcome::None,
            DragPhase::Pressed(session) => {
                log::debug!("session CLICK id={} source={}", session.id, session.source);
                DragOutcome::Clicked {
                    source: session.source,
                }
            }
            DragPhase::Dragging(mut session) => {
                if session.pointer != event.position {
                    session.pointer = event.position;
                    self.resolve(tree, surfaces, &mut session);
                }
                self.commit(tree, &session)
            }
        }
    }

    fn commit<C>(&mut self, tree: &mut DockTree<C>, session: &DragSession) -> DragOutcome
    where
        B: DockBehavior<C>,
    {
        let DragSession {
            id,
            source,
            operation,
            target,
            action,
            pointer,
            ..
        } = *session;
        if operation.is_none() {
            log::debug!("session RELEASE id={id}: nothing to drop on");
            self.debug_event(format!("session RELEASE id={id} cancelled"));
            return DragOutcome::Cancelled {
                source,
                reason: CancelReason::NoOperation,
            };
        }

        let result = self
            .manager
            .dock(tree, source, target, operation, action, pointer);
        let outcome = match result {
            Ok(focus) => {
                self.debug_event(format!(
                    "session DROP id={id} source={source} operation={operation:?} target={target:?}"
                ));
                DragOutcome::Dropped {
                    source,
                    operation,
                    target,
                    focus,
                }
            }
            Err(err) => {
                log::debug!("session RELEASE id={id}: drop rejected: {err}");
                self.debug_event(format!("session RELEASE id={id} rejected: {err}"));
                DragOutcome::Cancelled {
                    source,
                    reason: CancelReason::Rejected(err),
                }
            }
        };
        self.check_integrity(tree);
        outcome
    }

    fn check_integrity<C>(&mut self, tree: &DockTree<C>) {
        let options = &self.manager.options;
        if !options.debug_integrity {
            return;
        }
        let panic_on_failure = options.debug_integrity_panic;
        let issues = self
            .debug_log
            .check_integrity(options.debug_event_log_capacity, tree);
        if !issues.is_empty() && panic_on_failure && cfg!(debug_assertions) {
            panic!(
                "dock tree integrity failure after drop:\n{}",
                issues.join("\n")
            );
        }
    }

    /// Re-runs hit-testing for the session's pointer position.
    fn resolve<C>(&self, tree: &DockTree<C>, surfaces: &SurfaceRegistry, session: &mut DragSession)
    where
        B: DockBehavior<C>,
    {
        session.clear_hover();
        let options = &self.manager.options;
        let point = session.pointer;
        let source = session.source;
        let action = session.action;
        let check = |target: Option<DockableId>, operation: DockOperation| {
            self.manager
                .check_dock(tree, source, target, operation, action)
                .is_ok()
        };

        // A dragged window cannot drop onto itself.
        let hovered = surfaces.surface_at(point, |_, s| tree.is_in_subtree(source, s.root));
        if let Some((_, surface)) = hovered
            && let Some((target, rect)) = drop_target_at(tree, surface.root, surface.rect, point, source)
        {
            let operation = get_dock_operation(
                point,
                rect,
                options,
                action,
                |operation, _| operation != DockOperation::Window && check(Some(target), operation),
                |operation| self.manager.behavior.zone_visible(target, operation),
            );
            if !operation.is_none() {
                session.operation = operation;
                session.target = Some(target);
                return;
            }
        }

        let far_from_source = surfaces
            .get(session.source_surface)
            .is_none_or(|s| overshoot(s.rect, point) > options.float_distance);
        if (hovered.is_none() || far_from_source) && check(None, DockOperation::Window) {
            session.operation = DockOperation::Window;
        }
    }
}

fn is_mdi<C>(tree: &DockTree<C>, id: DockableId) -> bool {
    tree.container(id).is_some_and(|c| {
        matches!(
            c.kind,
            DockKind::Document {
                layout: DocumentLayout::Mdi
            }
        )
    })
}

/// Visible children of `id` that may contain `point`. MDI docks only offer their topmost hit.
fn children_under<C>(tree: &DockTree<C>, id: DockableId, point: Pos2) -> Vec<DockableId> {
    let hit = |child: &DockableId| {
        tree.get(*child).is_some_and(|d| {
            !d.is_splitter() && d.bounds.visible.is_some_and(|r| r.contains(point))
        })
    };
    let children = tree.children(id).iter().copied().filter(hit);
    if is_mdi(tree, id) {
        children
            .max_by_key(|&child| tree.get(child).map_or(i32::MIN, |d| d.mdi.z_index))
            .into_iter()
            .collect()
    } else {
        children.collect()
    }
}

/// The smallest visible dockable under `point` below `root`, skipping `source`'s subtree.
///
/// Falls back to `root` (with the surface rectangle when it has no bounds yet).
fn drop_target_at<C>(
    tree: &DockTree<C>,
    root: DockableId,
    surface_rect: Rect,
    point: Pos2,
    source: DockableId,
) -> Option<(DockableId, Rect)> {
    let root_rect = tree.get(root)?.bounds.visible.unwrap_or(surface_rect);
    let mut best = (root, root_rect);
    let mut stack = children_under(tree, root, point);
    while let Some(id) = stack.pop() {
        if id == source {
            continue;
        }
        let Some(rect) = tree.get(id).and_then(|d| d.bounds.visible) else {
            continue;
        };
        // Ties go to the deeper dockable: a tab group and its active tab share a rectangle.
        if rect.area() <= best.1.area() {
            best = (id, rect);
        }
        stack.extend(children_under(tree, id, point));
    }
    Some(best)
}

/// What a press at `point` picks up: a tab header first, else the smallest leaf under it.
///
/// The body search descends like [`drop_target_at`], so inside an MDI dock only the topmost
/// document under the pointer is considered.
fn draggable_at<C>(tree: &DockTree<C>, root: DockableId, point: Pos2) -> Option<DockableId> {
    let mut members = Vec::new();
    let mut stack = vec![root];
    while let Some(id) = stack.pop() {
        members.push(id);
        // Inactive tabs still show their headers, but nothing below them is on screen.
        if tree.get(id).is_some_and(|d| d.bounds.visible.is_some()) {
            stack.extend(tree.children(id).iter().copied());
        }
    }

    let tab_hit = members.iter().copied().find(|&id| {
        tree.get(id)
            .and_then(|d| d.bounds.tab)
            .is_some_and(|r| r.contains(point))
    });
    tab_hit.or_else(|| {
        let mut best: Option<(DockableId, Rect)> = None;
        let mut stack = children_under(tree, root, point);
        while let Some(id) = stack.pop() {
            if let Some(d) = tree.get(id)
                && d.is_leaf()
                && let Some(rect) = d.bounds.visible
                && best.is_none_or(|(_, b)| rect.area() < b.area())
            {
                best = Some((id, rect));
            }
            stack.extend(children_under(tree, id, point));
        }
        best.map(|(id, _)| id)
    })
}
