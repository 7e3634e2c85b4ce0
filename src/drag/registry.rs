use ahash::HashMap;
use egui::{Pos2, Rect};

use crate::model::DockableId;

/// Identifies a registered [`DockSurface`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SurfaceId(u64);

impl SurfaceId {
    pub const fn from_u64(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#s{}", self.0)
    }
}

/// An interactive area showing one root of the dock tree: the main window or a floating one.
///
/// `rect` is in the same coordinate space as the pointer events and as the bounds the tree was
/// arranged with.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DockSurface {
    pub root: DockableId,
    pub rect: Rect,
}

/// Every surface a drag can drop onto, in stacking order.
///
/// Hosts register a surface when it is shown and unregister it when it goes away.
#[derive(Clone, Debug, Default)]
pub struct SurfaceRegistry {
    surfaces: HashMap<SurfaceId, DockSurface>,

    /// Back to front.
    order: Vec<SurfaceId>,
    next_id: u64,
}

impl SurfaceRegistry {
    /// Adds a surface on top of all others.
    pub fn register(&mut self, surface: DockSurface) -> SurfaceId {
        let id = SurfaceId(self.next_id.max(1));
        self.next_id = id.0.saturating_add(1);
        self.surfaces.insert(id, surface);
        self.order.push(id);
        log::debug!("surface {id} registered for root {}", surface.root);
        id
    }

    pub fn unregister(&mut self, id: SurfaceId) -> Option<DockSurface> {
        let removed = self.surfaces.remove(&id)?;
        self.order.retain(|&x| x != id);
        log::debug!("surface {id} unregistered");
        Some(removed)
    }

    pub fn get(&self, id: SurfaceId) -> Option<&DockSurface> {
        self.surfaces.get(&id)
    }

    /// Updates the rectangle after the host moved or resized the surface.
    pub fn set_rect(&mut self, id: SurfaceId, rect: Rect) {
        if let Some(surface) = self.surfaces.get_mut(&id) {
            surface.rect = rect;
        }
    }

    /// Moves a surface to the top of the stacking order.
    pub fn bring_to_front(&mut self, id: SurfaceId) {
        if let Some(pos) = self.order.iter().position(|&x| x == id) {
            let id = self.order.remove(pos);
            self.order.push(id);
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Front to back.
    pub fn iter(&self) -> impl Iterator<Item = (SurfaceId, &DockSurface)> + '_ {
        self.order
            .iter()
            .rev()
            .filter_map(|&id| Some((id, self.surfaces.get(&id)?)))
    }

    /// Topmost surface containing `point`, skipping those `exclude` rejects.
    pub fn surface_at(
        &self,
        point: Pos2,
        mut exclude: impl FnMut(SurfaceId, &DockSurface) -> bool,
    ) -> Option<(SurfaceId, DockSurface)> {
        self.iter()
            .find(|&(id, surface)| surface.rect.contains(point) && !exclude(id, surface))
            .map(|(id, surface)| (id, *surface))
    }
}
