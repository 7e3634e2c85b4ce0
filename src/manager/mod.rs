//! The mutation executor: turns a resolved `(operation, source, target, action)` into tree
//! edits, plus the other structural operations (close, pin, hide, swap, MDI state).
//!
//! Every public method validates first and writes second, so an `Err` always means the tree
//! was not touched.

use egui::Pos2;

use crate::behavior::{DefaultBehavior, DockBehavior};
use crate::error::DockError;
use crate::layout::assign_proportions;
use crate::mdi::ClassicMdiLayout;
use crate::model::{
    DockEvent, DockOperation, DockTree, DockableId, DragAction, Location, PinnedAlignment, WindowId,
};
use crate::options::DockOptions;

mod close;
mod collapse;
mod float;
mod mdi;
mod pin;
mod split;

#[cfg(test)]
mod manager_tests;

use split::SplitTarget;

/// Applies docking operations to a [`DockTree`].
///
/// `B` supplies validation and cloning hooks, `M` the MDI arrangement policy.
#[derive(Clone, Debug, Default)]
pub struct DockManager<B = DefaultBehavior, M = ClassicMdiLayout> {
    pub options: DockOptions,
    pub behavior: B,
    pub mdi: M,
}

impl DockManager {
    pub fn new(options: DockOptions) -> Self {
        Self {
            options,
            behavior: DefaultBehavior,
            mdi: ClassicMdiLayout::default(),
        }
    }
}

impl<B, M> DockManager<B, M> {
    pub fn with_behavior<B2>(self, behavior: B2) -> DockManager<B2, M> {
        DockManager {
            options: self.options,
            behavior,
            mdi: self.mdi,
        }
    }

    pub fn with_mdi<M2>(self, mdi: M2) -> DockManager<B, M2> {
        DockManager {
            options: self.options,
            behavior: self.behavior,
            mdi,
        }
    }
}

/// A validated drop, ready to apply.
#[derive(Clone, Copy, Debug, PartialEq)]
enum Placement {
    Split {
        target: DockableId,
        edge: DockOperation,
    },
    /// `target` and its neighbour `partner` on the corner's horizontal side are banded
    /// together, then split along the corner's vertical edge.
    Corner {
        target: DockableId,
        partner: DockableId,
        vertical: DockOperation,
    },
    Fill {
        target: DockableId,
    },
    IntoEmptyRoot {
        root: DockableId,
    },
    Window {
        grab: Pos2,
    },
    MoveWindow {
        window: WindowId,
        grab: Pos2,
    },
}

impl<B, M: crate::mdi::MdiLayoutManager> DockManager<B, M> {
    /// Executes a drop of `source` relative to `target`.
    ///
    /// `grab` is the pointer position for [`DockOperation::Window`]; other operations ignore it.
    /// Copy and link actions place a clone made by [`DockBehavior::clone_context`] and leave the
    /// source alone.
    ///
    /// Returns the dockable that ended up active at the destination.
    ///
    /// # Errors
    /// Whatever [`DockBehavior::validate`] rejects, plus structural impossibilities. On error
    /// the tree is unchanged.
    pub fn dock<C>(
        &self,
        tree: &mut DockTree<C>,
        source: DockableId,
        target: Option<DockableId>,
        operation: DockOperation,
        action: DragAction,
        grab: Pos2,
    ) -> Result<DockableId, DockError>
    where
        B: DockBehavior<C>,
    {
        let source = window_content_source(tree, source, operation);
        self.behavior
            .validate(tree, source, target, operation, action)?;
        let placement = plan(tree, source, target, operation, action)
            .map(|p| p.with_grab(grab))
            .inspect_err(|err| log::debug!("drop {source} {operation:?} {target:?} rejected: {err}"))?;
        let clone_context = match action {
            DragAction::Move => None,
            DragAction::Copy | DragAction::Link => Some(self.clone_context_of(tree, source, action)?),
        };

        if let Placement::MoveWindow { window, grab } = placement {
            float::move_window(tree, window, grab);
            return Ok(source);
        }

        // ---- no errors past this point ----

        let old_owner = if clone_context.is_none() {
            tree.owner(source)
        } else {
            None
        };
        let placed = match clone_context {
            None => {
                if tree.detach(source).is_err() {
                    debug_assert!(false, "validated source {source} failed to detach");
                    return Ok(source);
                }
                if let Some(owner) = old_owner {
                    collapse::normalize_splitters(tree, owner);
                }
                source
            }
            Some(context) => match tree.create_leaf_like(source, context) {
                Some(clone) => clone,
                None => return Err(DockError::NothingToClone(source)),
            },
        };

        let focus = match placement {
            Placement::Split { target, edge } => {
                split::insert_beside(tree, &self.options, placed, target, edge);
                placed
            }
            Placement::Corner {
                target,
                partner,
                vertical,
            } => {
                let band = split::band_with(tree, target, partner);
                split::insert_beside(tree, &self.options, placed, band, vertical);
                placed
            }
            Placement::Fill { target } => split::fill(tree, &self.options, placed, target),
            Placement::IntoEmptyRoot { root } => {
                let content = if tree.get(placed).is_some_and(|d| d.is_leaf()) {
                    let kind = split::tab_group_for(tree, placed, PinnedAlignment::Left);
                    let group = tree.create_dock(kind);
                    tree.attach_unchecked(placed, group, None);
                    group
                } else {
                    placed
                };
                tree.attach_unchecked(content, root, None);
                placed
            }
            Placement::Window { grab } => float::open_window(tree, &self.options, placed, grab),
            Placement::MoveWindow { .. } => placed,
        };

        if let Some(d) = tree.get_mut(placed) {
            d.original_owner = match placement {
                Placement::Window { .. } => old_owner,
                _ => None,
            };
        }
        if action == DragAction::Move
            && let Some(new_owner) = tree.owner(placed)
        {
            tree.emit(DockEvent::Moved {
                dockable: placed,
                old_owner,
                new_owner,
            });
        }
        if let Some(owner) = old_owner {
            collapse::collapse_upward(tree, owner);
        }
        if tree.contains(focus) {
            tree.focus(focus)?;
            self.raise_if_mdi(tree, focus);
        }
        log::debug!("drop {source} {operation:?} {target:?} ({action:?}) -> {focus}");
        Ok(focus)
    }

    /// Runs every check [`Self::dock`] would run, without touching the tree.
    ///
    /// # Errors
    /// The error [`Self::dock`] would return.
    pub fn check_dock<C>(
        &self,
        tree: &DockTree<C>,
        source: DockableId,
        target: Option<DockableId>,
        operation: DockOperation,
        action: DragAction,
    ) -> Result<(), DockError>
    where
        B: DockBehavior<C>,
    {
        let source = window_content_source(tree, source, operation);
        self.behavior
            .validate(tree, source, target, operation, action)?;
        plan(tree, source, target, operation, action)?;
        if action != DragAction::Move {
            self.clone_context_of(tree, source, action)?;
        }
        Ok(())
    }

    fn clone_context_of<C>(
        &self,
        tree: &DockTree<C>,
        source: DockableId,
        action: DragAction,
    ) -> Result<C, DockError>
    where
        B: DockBehavior<C>,
    {
        tree.get(source)
            .filter(|d| d.is_leaf())
            .and_then(|d| d.context.as_ref())
            .and_then(|context| self.behavior.clone_context(context, action))
            .ok_or(DockError::NothingToClone(source))
    }

    /// Splits `target` and places `source` on the side named by an edge or corner `operation`.
    ///
    /// # Errors
    /// See [`Self::dock`]; non-edge, non-corner operations are rejected.
    pub fn split_dockable<C>(
        &self,
        tree: &mut DockTree<C>,
        source: DockableId,
        target: DockableId,
        operation: DockOperation,
    ) -> Result<DockableId, DockError>
    where
        B: DockBehavior<C>,
    {
        if !(operation.is_edge() || operation.is_corner()) {
            return Err(DockError::OperationNotAllowed {
                operation,
                target: Some(target),
            });
        }
        self.dock(tree, source, Some(target), operation, DragAction::Move, Pos2::ZERO)
    }

    /// Moves `source` into `dock` at content position `index` (end if `None`).
    ///
    /// Proportional docks get a splitter next to the newcomer; its proportion is assigned fresh.
    ///
    /// # Errors
    /// Rejected for missing ids, non-container targets, and moves into the source's own subtree.
    pub fn move_dockable<C>(
        &self,
        tree: &mut DockTree<C>,
        source: DockableId,
        dock: DockableId,
        index: Option<usize>,
    ) -> Result<(), DockError> {
        if !tree.contains(source) {
            return Err(DockError::MissingDockable(source));
        }
        let container = tree.container(dock).ok_or(DockError::NotAContainer(dock))?;
        if tree.is_in_subtree(source, dock) {
            return Err(if source == dock {
                DockError::SelfTarget(source)
            } else {
                DockError::TargetInsideSource {
                    source,
                    target: dock,
                }
            });
        }
        if matches!(tree.location(source), Location::MainRoot | Location::WindowLayout { .. })
            || tree.get(source).is_some_and(|d| d.is_splitter())
        {
            return Err(DockError::OperationNotAllowed {
                operation: DockOperation::None,
                target: Some(source),
            });
        }
        let proportional = container.kind.proportional_orientation().is_some();

        let old_owner = tree.owner(source);
        tree.detach(source)?;
        if let Some(owner) = old_owner {
            collapse::normalize_splitters(tree, owner);
        }

        if proportional {
            let content = tree.content_children(dock);
            let k = index.unwrap_or(content.len()).min(content.len());
            match content.get(k).and_then(|&c| tree.container(dock)?.index_of(c)) {
                Some(position) => {
                    tree.attach_unchecked(source, dock, Some(position));
                    let splitter = tree.create_splitter(self.options.splitter_thickness);
                    tree.attach_unchecked(splitter, dock, Some(position + 1));
                    if let Some(d) = tree.get_mut(source) {
                        d.proportion = f64::NAN;
                    }
                    if let Err(err) = assign_proportions(tree, dock) {
                        log::warn!("failed to rescale {dock} after inserting {source}: {err}");
                    }
                }
                None => split::append(tree, &self.options, source, dock),
            }
        } else {
            let position = match index {
                Some(k) => tree
                    .content_children(dock)
                    .get(k)
                    .and_then(|&c| tree.container(dock)?.index_of(c)),
                None => None,
            };
            tree.attach_unchecked(source, dock, position);
        }
        if let Some(d) = tree.get_mut(source) {
            d.original_owner = None;
        }
        tree.emit(DockEvent::Moved {
            dockable: source,
            old_owner,
            new_owner: dock,
        });
        if let Some(owner) = old_owner {
            collapse::collapse_upward(tree, owner);
        }
        tree.focus(source)?;
        log::debug!("moved {source} into {dock}");
        Ok(())
    }

    /// Floats a dockable into a new window over its last visible position.
    ///
    /// # Errors
    /// See [`Self::dock`].
    pub fn float_dockable<C>(&self, tree: &mut DockTree<C>, id: DockableId) -> Result<DockableId, DockError>
    where
        B: DockBehavior<C>,
    {
        let grab = float::default_grab(tree, id);
        self.dock(tree, id, None, DockOperation::Window, DragAction::Move, grab)
    }

    /// Floats the whole tab group holding `id` (or `id` itself when it is a dock).
    ///
    /// # Errors
    /// See [`Self::dock`].
    pub fn float_dock<C>(&self, tree: &mut DockTree<C>, id: DockableId) -> Result<DockableId, DockError>
    where
        B: DockBehavior<C>,
    {
        let dock = if tree.container(id).is_some() {
            id
        } else {
            tree.tabbed_owner(id).ok_or(DockError::NotAContainer(id))?
        };
        let grab = float::default_grab(tree, dock);
        self.dock(tree, dock, None, DockOperation::Window, DragAction::Move, grab)
    }

    /// Docks the content of a floating window back into the tree; the emptied window closes.
    ///
    /// # Errors
    /// The window must hold exactly one content dock; see also [`Self::dock`].
    pub fn dock_window_into<C>(
        &self,
        tree: &mut DockTree<C>,
        window: WindowId,
        target: DockableId,
        operation: DockOperation,
    ) -> Result<DockableId, DockError>
    where
        B: DockBehavior<C>,
    {
        let content = float::sole_content(tree, window)?;
        self.dock(tree, content, Some(target), operation, DragAction::Move, Pos2::ZERO)
    }
}

impl Placement {
    fn with_grab(self, grab: Pos2) -> Self {
        match self {
            Self::Window { .. } => Self::Window { grab },
            Self::MoveWindow { window, .. } => Self::MoveWindow { window, grab },
            other => other,
        }
    }
}

/// Dragging a window's layout root onto a dock means dragging its content.
fn window_content_source<C>(tree: &DockTree<C>, source: DockableId, operation: DockOperation) -> DockableId {
    if operation == DockOperation::Window {
        return source;
    }
    match tree.location(source) {
        Location::WindowLayout { .. } => match tree.content_children(source).as_slice() {
            &[only] => only,
            _ => source,
        },
        _ => source,
    }
}

/// Structural validation of a drop. Pure: reads the tree only.
fn plan<C>(
    tree: &DockTree<C>,
    source: DockableId,
    target: Option<DockableId>,
    operation: DockOperation,
    action: DragAction,
) -> Result<Placement, DockError> {
    let moving = action == DragAction::Move;
    let not_allowed = DockError::OperationNotAllowed { operation, target };
    if !tree.contains(source) {
        return Err(DockError::MissingDockable(source));
    }

    match tree.location(source) {
        Location::MainRoot if moving => return Err(not_allowed),
        Location::WindowLayout { window } if moving => {
            return if operation == DockOperation::Window {
                Ok(Placement::MoveWindow {
                    window,
                    grab: Pos2::ZERO,
                })
            } else {
                Err(not_allowed)
            };
        }
        _ => {}
    }

    if operation == DockOperation::Window {
        tree.root().ok_or(DockError::NoRoot)?;
        return Ok(Placement::Window { grab: Pos2::ZERO });
    }
    let target = target.ok_or(not_allowed.clone())?;

    if operation == DockOperation::Fill {
        split::check_fill(tree, source, target, moving)?;
        return Ok(Placement::Fill { target });
    }

    let edge = if operation.is_edge() {
        operation
    } else if let Some((vertical, _)) = operation.corner_parts() {
        vertical
    } else {
        return Err(not_allowed);
    };

    let resolved = match split::split_target(tree, target)? {
        SplitTarget::EmptyRoot(root) => return Ok(Placement::IntoEmptyRoot { root }),
        SplitTarget::Dockable(resolved) => resolved,
    };
    let owner = split::check_split(tree, source, resolved, edge, moving)?;

    let Some((vertical, horizontal)) = operation.corner_parts() else {
        return Ok(Placement::Split {
            target: resolved,
            edge,
        });
    };

    let not_allowed = DockError::OperationNotAllowed {
        operation,
        target: Some(resolved),
    };
    let partner = split::corner_partner(tree, source, resolved, owner, horizontal, moving)
        .ok_or(not_allowed.clone())?;
    // With nothing else beside the pair, the owner itself is the band and gets split in its slot.
    let band_is_owner = tree
        .content_children(owner)
        .iter()
        .filter(|&&id| !(moving && id == source))
        .count()
        <= 2;
    if band_is_owner && !matches!(tree.location(owner), Location::Visible { .. }) {
        return Err(not_allowed);
    }
    Ok(Placement::Corner {
        target: resolved,
        partner,
        vertical,
    })
}
