//! Reordering inside one tab strip.
//!
//! Narrower than [`super::DockController`]: the dragged tab only slides along its strip, and
//! leaving the strip by more than [`DockOptions::float_distance`] turns the gesture into a
//! float-out.

use egui::{Pos2, Rect, Vec2};

use crate::behavior::DockBehavior;
use crate::error::DockError;
use crate::manager::DockManager;
use crate::mdi::MdiLayoutManager;
use crate::model::{DockTree, DockableId, Orientation};
use crate::options::DockOptions;

use super::controller::{PointerEvent, PointerEventKind};
use super::zones::overshoot;

/// Tab headers as the host laid them out, in tab order.
#[derive(Clone, Debug, PartialEq)]
pub struct TabStrip {
    pub rect: Rect,
    pub orientation: Orientation,
    pub tabs: Vec<Rect>,
}

impl TabStrip {
    fn tab_at(&self, point: Pos2) -> Option<usize> {
        self.tabs.iter().position(|r| r.contains(point))
    }

    /// Where the tab at `index` would land if shifted by `offset` along the strip.
    ///
    /// A neighbour is passed once the dragged tab's leading (or trailing) edge crosses that
    /// neighbour's midpoint.
    pub fn provisional_index(&self, index: usize, offset: f32) -> usize {
        let Some(dragged) = self.tabs.get(index) else {
            return index;
        };
        let axis = self.orientation;
        let leading = axis.main(dragged.min.to_vec2()) + offset;
        let trailing = axis.main(dragged.max.to_vec2()) + offset;
        let mid = |r: &Rect| axis.main(r.center().to_vec2());

        let mut target = index;
        if offset > 0.0 {
            for (i, tab) in self.tabs.iter().enumerate().skip(index + 1) {
                if trailing <= mid(tab) {
                    break;
                }
                target = i;
            }
        } else if offset < 0.0 {
            for (i, tab) in self.tabs.iter().enumerate().take(index).rev() {
                if leading >= mid(tab) {
                    break;
                }
                target = i;
            }
        }
        target
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
enum TabPhase {
    #[default]
    Idle,
    Pressed {
        index: usize,
        origin: Pos2,
    },
    Dragging {
        index: usize,
        origin: Pos2,
        offset: f32,
        target: usize,
    },
}

/// Result of one event fed to a [`TabReorder`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TabReorderOutcome {
    None,
    Started { index: usize },

    /// The provisional drop index changed.
    Preview { index: usize, target: usize },

    /// Released at a new position: remove at `from`, insert at `to`.
    Reordered { from: usize, to: usize },

    /// Released where it started, or cancelled.
    Unchanged,

    /// The tab left the strip; float it instead.
    FloatOut { index: usize },
}

impl TabReorderOutcome {
    /// Carries out a reorder or float-out for the tabs of `dock`.
    ///
    /// Returns the dockable that was floated, if any.
    ///
    /// # Errors
    /// Whatever the dock manager rejects; indices must address children of `dock`.
    pub fn apply<C, B, M>(
        self,
        tree: &mut DockTree<C>,
        manager: &DockManager<B, M>,
        dock: DockableId,
    ) -> Result<Option<DockableId>, DockError>
    where
        B: DockBehavior<C>,
        M: MdiLayoutManager,
    {
        match self {
            Self::Reordered { from, to } => {
                manager.move_dockable_within(tree, dock, from, to)?;
                Ok(None)
            }
            Self::FloatOut { index } => {
                let children = tree.children(dock);
                let id = *children.get(index).ok_or(DockError::InvalidIndex {
                    index,
                    len: children.len(),
                })?;
                manager.float_dockable(tree, id)?;
                Ok(Some(id))
            }
            Self::None | Self::Started { .. } | Self::Preview { .. } | Self::Unchanged => Ok(None),
        }
    }
}

/// Tab drag state for one strip.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TabReorder {
    phase: TabPhase,
}

impl TabReorder {
    pub fn is_idle(&self) -> bool {
        self.phase == TabPhase::Idle
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, TabPhase::Dragging { .. })
    }

    /// Visual translation of the dragged tab while dragging.
    pub fn drag_offset(&self, orientation: Orientation) -> Vec2 {
        match (self.phase, orientation) {
            (TabPhase::Dragging { offset, .. }, Orientation::Horizontal) => Vec2::new(offset, 0.0),
            (TabPhase::Dragging { offset, .. }, Orientation::Vertical) => Vec2::new(0.0, offset),
            _ => Vec2::ZERO,
        }
    }

    /// `(dragged index, provisional target)` while dragging.
    pub fn preview(&self) -> Option<(usize, usize)> {
        match self.phase {
            TabPhase::Dragging { index, target, .. } => Some((index, target)),
            _ => None,
        }
    }

    pub fn process(&mut self, event: &PointerEvent, strip: &TabStrip, options: &DockOptions) -> TabReorderOutcome {
        match (event.kind, self.phase) {
            (PointerEventKind::Pressed, TabPhase::Idle) => {
                let Some(index) = strip.tab_at(event.position) else {
                    return TabReorderOutcome::None;
                };
                self.phase = TabPhase::Pressed {
                    index,
                    origin: event.position,
                };
                TabReorderOutcome::None
            }
            (PointerEventKind::Moved, TabPhase::Pressed { index, origin }) => {
                if (event.position - origin).length() < options.min_drag_distance {
                    return TabReorderOutcome::None;
                }
                self.phase = TabPhase::Dragging {
                    index,
                    origin,
                    offset: 0.0,
                    target: index,
                };
                log::debug!("tab drag START index={index}");
                match self.drag_to(event.position, strip, options) {
                    TabReorderOutcome::FloatOut { index } => TabReorderOutcome::FloatOut { index },
                    _ => TabReorderOutcome::Started { index },
                }
            }
            (PointerEventKind::Moved, TabPhase::Dragging { .. }) => self.drag_to(event.position, strip, options),
            (PointerEventKind::Released, TabPhase::Dragging { index, target, .. }) => {
                self.phase = TabPhase::Idle;
                if target == index {
                    TabReorderOutcome::Unchanged
                } else {
                    log::debug!("tab reorder {index} -> {target}");
                    TabReorderOutcome::Reordered {
                        from: index,
                        to: target,
                    }
                }
            }
            (PointerEventKind::Released | PointerEventKind::CaptureLost, TabPhase::Pressed { .. }) => {
                self.phase = TabPhase::Idle;
                TabReorderOutcome::None
            }
            (PointerEventKind::CaptureLost, TabPhase::Dragging { .. }) => {
                self.phase = TabPhase::Idle;
                TabReorderOutcome::Unchanged
            }
            _ => TabReorderOutcome::None,
        }
    }

    fn drag_to(&mut self, pointer: Pos2, strip: &TabStrip, options: &DockOptions) -> TabReorderOutcome {
        let TabPhase::Dragging {
            index,
            origin,
            target: previous,
            ..
        } = self.phase
        else {
            return TabReorderOutcome::None;
        };
        if overshoot(strip.rect, pointer) > options.float_distance {
            self.phase = TabPhase::Idle;
            log::debug!("tab drag index={index} left the strip: float out");
            return TabReorderOutcome::FloatOut { index };
        }

        let offset = strip.orientation.main(pointer - origin);
        let target = strip.provisional_index(index, offset);
        self.phase = TabPhase::Dragging {
            index,
            origin,
            offset,
            target,
        };
        if target == previous {
            TabReorderOutcome::None
        } else {
            TabReorderOutcome::Preview { index, target }
        }
    }
}

#[cfg(test)]
mod tests {
    use egui::{pos2, vec2};

    use super::*;

    /// Three 100pt tabs side by side.
    fn strip() -> TabStrip {
        TabStrip {
            rect: Rect::from_min_size(Pos2::ZERO, vec2(300.0, 24.0)),
            orientation: Orientation::Horizontal,
            tabs: (0..3)
                .map(|i| Rect::from_min_size(pos2(i as f32 * 100.0, 0.0), vec2(100.0, 24.0)))
                .collect(),
        }
    }

    fn run(reorder: &mut TabReorder, events: &[PointerEvent]) -> Vec<TabReorderOutcome> {
        let options = DockOptions::default();
        let strip = strip();
        events
            .iter()
            .map(|e| reorder.process(e, &strip, &options))
            .collect()
    }

    #[test]
    fn midpoint_decides_the_target() {
        let strip = strip();
        assert_eq!(strip.provisional_index(0, 49.0), 0);
        assert_eq!(strip.provisional_index(0, 51.0), 1);
        assert_eq!(strip.provisional_index(0, 151.0), 2);
        assert_eq!(strip.provisional_index(2, -51.0), 1);
        assert_eq!(strip.provisional_index(2, -49.0), 2);
        assert_eq!(strip.provisional_index(1, 0.0), 1);
    }

    #[test]
    fn drag_past_neighbour_reorders() {
        let mut reorder = TabReorder::default();
        let outcomes = run(
            &mut reorder,
            &[
                PointerEvent::pressed(pos2(50.0, 12.0)),
                PointerEvent::moved(pos2(52.0, 12.0)),
                PointerEvent::moved(pos2(60.0, 12.0)),
                PointerEvent::moved(pos2(115.0, 12.0)),
                PointerEvent::released(pos2(115.0, 12.0)),
            ],
        );
        assert_eq!(
            outcomes,
            vec![
                TabReorderOutcome::None,
                TabReorderOutcome::None,
                TabReorderOutcome::Started { index: 0 },
                TabReorderOutcome::Preview { index: 0, target: 1 },
                TabReorderOutcome::Reordered { from: 0, to: 1 },
            ]
        );
        assert!(reorder.is_idle());
    }

    #[test]
    fn release_in_place_changes_nothing() {
        let mut reorder = TabReorder::default();
        let outcomes = run(
            &mut reorder,
            &[
                PointerEvent::pressed(pos2(150.0, 12.0)),
                PointerEvent::moved(pos2(170.0, 12.0)),
                PointerEvent::released(pos2(170.0, 12.0)),
            ],
        );
        assert_eq!(outcomes[2], TabReorderOutcome::Unchanged);
    }

    #[test]
    fn leaving_the_strip_floats_out() {
        let mut reorder = TabReorder::default();
        let outcomes = run(
            &mut reorder,
            &[
                PointerEvent::pressed(pos2(150.0, 12.0)),
                PointerEvent::moved(pos2(160.0, 40.0)),
                PointerEvent::moved(pos2(160.0, 80.0)),
                PointerEvent::released(pos2(160.0, 80.0)),
            ],
        );
        // 16pt below the strip is within the float distance, 56pt is not.
        assert_eq!(outcomes[1], TabReorderOutcome::Started { index: 1 });
        assert_eq!(outcomes[2], TabReorderOutcome::FloatOut { index: 1 });
        assert_eq!(outcomes[3], TabReorderOutcome::None);
        assert_eq!(reorder.drag_offset(Orientation::Horizontal), Vec2::ZERO);
    }

    #[test]
    fn outcome_applies_to_the_tree() {
        let mut tree: DockTree<u32> = DockTree::new();
        let root = tree.create_root();
        let dock = tree.create_dock(crate::model::DockKind::Document {
            layout: crate::model::DocumentLayout::Tabbed,
        });
        tree.attach(dock, root, None).unwrap();
        let docs = [1, 2, 3].map(|n| tree.create_document(format!("doc {n}"), n));
        for id in docs {
            tree.attach(id, dock, None).unwrap();
        }
        let manager: DockManager = DockManager::default();

        let moved = TabReorderOutcome::Reordered { from: 0, to: 2 }
            .apply(&mut tree, &manager, dock)
            .unwrap();
        assert_eq!(moved, None);
        assert_eq!(tree.children(dock), &[docs[1], docs[2], docs[0]]);

        let floated = TabReorderOutcome::FloatOut { index: 0 }
            .apply(&mut tree, &manager, dock)
            .unwrap();
        assert_eq!(floated, Some(docs[1]));
        assert_eq!(tree.windows().len(), 1);

        assert_eq!(
            TabReorderOutcome::FloatOut { index: 9 }.apply(&mut tree, &manager, dock),
            Err(DockError::InvalidIndex { index: 9, len: 2 })
        );
    }
}
