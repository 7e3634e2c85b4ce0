//! Drop zones of a hovered dock and the hit-test that picks one.

use egui::{Pos2, Rect, Vec2};

use crate::model::{DockOperation, DragAction};
use crate::options::DockOptions;

/// A hit region and the operation it stands for.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DropZone {
    pub operation: DockOperation,
    pub rect: Rect,
}

/// Zones of a drop target in priority order: corners, then edges, then fill.
///
/// Edge bands span the full side (corners overlap them and come first); fill covers the whole
/// target. Corners are only produced with [`DockOptions::corner_zones`].
pub fn drop_zones(target: Rect, options: &DockOptions) -> Vec<DropZone> {
    if !is_usable(target) {
        return Vec::new();
    }
    let band = options.edge_band(target.size());
    let mut zones = Vec::with_capacity(9);

    if options.corner_zones {
        let corner = Vec2::splat(band);
        let corners = [
            (DockOperation::TopLeft, target.left_top()),
            (DockOperation::TopRight, target.right_top() - Vec2::new(band, 0.0)),
            (DockOperation::BottomLeft, target.left_bottom() - Vec2::new(0.0, band)),
            (DockOperation::BottomRight, target.right_bottom() - corner),
        ];
        zones.extend(corners.into_iter().map(|(operation, min)| DropZone {
            operation,
            rect: Rect::from_min_size(min, corner),
        }));
    }

    zones.extend([
        DropZone {
            operation: DockOperation::Left,
            rect: Rect::from_min_max(target.min, Pos2::new(target.left() + band, target.bottom())),
        },
        DropZone {
            operation: DockOperation::Right,
            rect: Rect::from_min_max(Pos2::new(target.right() - band, target.top()), target.max),
        },
        DropZone {
            operation: DockOperation::Top,
            rect: Rect::from_min_max(target.min, Pos2::new(target.right(), target.top() + band)),
        },
        DropZone {
            operation: DockOperation::Bottom,
            rect: Rect::from_min_max(Pos2::new(target.left(), target.bottom() - band), target.max),
        },
        DropZone {
            operation: DockOperation::Fill,
            rect: target,
        },
    ]);
    zones
}

/// The operation a drop at `point` onto `target` would perform.
///
/// Walks [`drop_zones`] in priority order and returns the first zone containing `point` that is
/// both `visible` and accepted by `validate`. [`DockOperation::None`] if none qualifies.
pub fn get_dock_operation(
    point: Pos2,
    target: Rect,
    options: &DockOptions,
    action: DragAction,
    mut validate: impl FnMut(DockOperation, DragAction) -> bool,
    mut visible: impl FnMut(DockOperation) -> bool,
) -> DockOperation {
    if !point.is_finite() {
        return DockOperation::None;
    }
    drop_zones(target, options)
        .into_iter()
        .filter(|zone| zone.rect.contains(point))
        .find(|zone| visible(zone.operation) && validate(zone.operation, action))
        .map_or(DockOperation::None, |zone| zone.operation)
}

/// How far `point` lies outside `rect` (zero inside).
pub fn overshoot(rect: Rect, point: Pos2) -> f32 {
    let dx = (rect.left() - point.x).max(point.x - rect.right()).max(0.0);
    let dy = (rect.top() - point.y).max(point.y - rect.bottom()).max(0.0);
    dx.max(dy)
}

fn is_usable(rect: Rect) -> bool {
    rect.is_finite() && rect.width() > 0.0 && rect.height() > 0.0
}
