use crate::error::DockError;
use crate::model::{DockOperation, DockTree, DockableId, DragAction};

/// Application hooks consulted by the dock manager and the drag controller.
///
/// Implementations must not mutate the tree from inside these callbacks.
pub trait DockBehavior<C> {
    /// Decides whether `source` may be dropped with `operation` relative to `target`.
    ///
    /// `target` is `None` for drops onto empty space (floating).
    ///
    /// # Errors
    /// The reason the drop is unavailable.
    fn validate(
        &self,
        tree: &DockTree<C>,
        source: DockableId,
        target: Option<DockableId>,
        operation: DockOperation,
        action: DragAction,
    ) -> Result<(), DockError> {
        default_validate(tree, source, target, operation, action)
    }

    /// Produces the context for a copied or linked dockable.
    ///
    /// `None` makes copy/link drops fail with [`DockError::NothingToClone`].
    fn clone_context(&self, _context: &C, _action: DragAction) -> Option<C> {
        None
    }

    /// Whether a drop zone should be offered at all (e.g. hidden indicators).
    fn zone_visible(&self, _target: DockableId, _operation: DockOperation) -> bool {
        true
    }
}

/// Behavior with every hook at its default.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultBehavior;

impl<C> DockBehavior<C> for DefaultBehavior {}

/// Behavior cloning contexts with [`Clone`] for copy and link drops.
#[derive(Clone, Copy, Debug, Default)]
pub struct CloningBehavior;

impl<C: Clone> DockBehavior<C> for CloningBehavior {
    fn clone_context(&self, context: &C, _action: DragAction) -> Option<C> {
        Some(context.clone())
    }
}

/// The dock whose `allowed_operations` govern a drop on `target`: `target` itself when it is a
/// dock, else its owner.
pub fn drop_dock<C>(tree: &DockTree<C>, target: DockableId) -> Option<DockableId> {
    if tree.container(target).is_some() {
        Some(target)
    } else {
        tree.owner(target)
    }
}

/// Capability, operation mask, dock group and cycle checks.
///
/// # Errors
/// The first rule the drop violates.
pub fn default_validate<C>(
    tree: &DockTree<C>,
    source: DockableId,
    target: Option<DockableId>,
    operation: DockOperation,
    action: DragAction,
) -> Result<(), DockError> {
    let source_dockable = tree.get(source).ok_or(DockError::MissingDockable(source))?;
    if operation.is_none() {
        return Err(DockError::OperationNotAllowed { operation, target });
    }
    if source_dockable.is_splitter() || !source_dockable.capabilities.can_drag {
        return Err(DockError::CapabilityDenied {
            dockable: source,
            capability: "drag",
        });
    }
    if operation == DockOperation::Window
        && action == DragAction::Move
        && !source_dockable.capabilities.can_float
    {
        return Err(DockError::CapabilityDenied {
            dockable: source,
            capability: "float",
        });
    }

    let Some(target) = target else {
        return if operation == DockOperation::Window {
            Ok(())
        } else {
            Err(DockError::OperationNotAllowed {
                operation,
                target: None,
            })
        };
    };

    let target_dockable = tree.get(target).ok_or(DockError::MissingDockable(target))?;
    if source == target {
        return Err(DockError::SelfTarget(source));
    }
    if action == DragAction::Move && tree.is_in_subtree(source, target) {
        return Err(DockError::TargetInsideSource { source, target });
    }
    if !target_dockable.capabilities.can_drop {
        return Err(DockError::CapabilityDenied {
            dockable: target,
            capability: "drop",
        });
    }

    let dock = drop_dock(tree, target).ok_or(DockError::NotOwned {
        dockable: target,
        owner: target,
    })?;
    let allowed = tree
        .container(dock)
        .is_some_and(|c| c.allowed_operations.contains(operation));
    if !allowed && operation != DockOperation::Window {
        return Err(DockError::OperationNotAllowed {
            operation,
            target: Some(target),
        });
    }

    if operation == DockOperation::Fill && !source_dockable.is_document() {
        let into_documents = tree
            .container(dock)
            .is_some_and(|c| matches!(c.kind, crate::model::DockKind::Document { .. }));
        if into_documents && !source_dockable.capabilities.can_dock_as_document {
            return Err(DockError::CapabilityDenied {
                dockable: source,
                capability: "dock as document",
            });
        }
    }

    if tree.effective_dock_group(source) != tree.effective_dock_group(target) {
        return Err(DockError::OperationNotAllowed {
            operation,
            target: Some(target),
        });
    }

    Ok(())
}
