use egui::{Modifiers, Vec2};

/// Stable identifier of a [`super::Dockable`] inside one [`super::DockTree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct DockableId(u64);

impl DockableId {
    pub const fn from_u64(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for DockableId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identifier of a floating [`super::DockWindow`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct WindowId(u64);

impl WindowId {
    pub const fn from_u64(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for WindowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "window#{}", self.0)
    }
}

/// Layout axis of a proportional, pixel or wrap dock.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum Orientation {
    /// Children are placed left to right.
    Horizontal,
    /// Children are placed top to bottom.
    Vertical,
}

impl Orientation {
    /// Extent of `size` along this axis.
    pub fn main(self, size: Vec2) -> f32 {
        match self {
            Self::Horizontal => size.x,
            Self::Vertical => size.y,
        }
    }

    /// Extent of `size` across this axis.
    pub fn cross(self, size: Vec2) -> f32 {
        match self {
            Self::Horizontal => size.y,
            Self::Vertical => size.x,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Self::Horizontal => Self::Vertical,
            Self::Vertical => Self::Horizontal,
        }
    }
}

/// The resolved placement intent of a pending drop.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum DockOperation {
    #[default]
    None,
    Left,
    Right,
    Top,
    Bottom,
    Fill,
    Window,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl DockOperation {
    pub const ALL: [Self; 10] = [
        Self::Left,
        Self::Right,
        Self::Top,
        Self::Bottom,
        Self::Fill,
        Self::Window,
        Self::TopLeft,
        Self::TopRight,
        Self::BottomLeft,
        Self::BottomRight,
    ];

    pub fn is_none(self) -> bool {
        self == Self::None
    }

    pub fn is_edge(self) -> bool {
        matches!(self, Self::Left | Self::Right | Self::Top | Self::Bottom)
    }

    pub fn is_corner(self) -> bool {
        matches!(
            self,
            Self::TopLeft | Self::TopRight | Self::BottomLeft | Self::BottomRight
        )
    }

    /// Split axis for edge operations.
    pub fn split_orientation(self) -> Option<Orientation> {
        match self {
            Self::Left | Self::Right => Some(Orientation::Horizontal),
            Self::Top | Self::Bottom => Some(Orientation::Vertical),
            _ => None,
        }
    }

    /// Whether the source goes before the target along the split axis.
    pub fn source_first(self) -> bool {
        matches!(self, Self::Left | Self::Top)
    }

    /// `(vertical, horizontal)` edge pair a corner is composed of.
    pub fn corner_parts(self) -> Option<(Self, Self)> {
        match self {
            Self::TopLeft => Some((Self::Top, Self::Left)),
            Self::TopRight => Some((Self::Top, Self::Right)),
            Self::BottomLeft => Some((Self::Bottom, Self::Left)),
            Self::BottomRight => Some((Self::Bottom, Self::Right)),
            _ => None,
        }
    }

    fn bit(self) -> u16 {
        match self {
            Self::None => 0,
            Self::Left => 1 << 0,
            Self::Right => 1 << 1,
            Self::Top => 1 << 2,
            Self::Bottom => 1 << 3,
            Self::Fill => 1 << 4,
            Self::Window => 1 << 5,
            Self::TopLeft => 1 << 6,
            Self::TopRight => 1 << 7,
            Self::BottomLeft => 1 << 8,
            Self::BottomRight => 1 << 9,
        }
    }
}

/// Set of [`DockOperation`]s a container accepts (`AllowedDockOperations`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct DockOperationMask(u16);

impl DockOperationMask {
    pub const NONE: Self = Self(0);
    pub const ALL: Self = Self(0b11_1111_1111);

    pub fn only(operations: &[DockOperation]) -> Self {
        operations.iter().fold(Self::NONE, |mask, &op| mask.with(op))
    }

    #[must_use]
    pub fn with(self, operation: DockOperation) -> Self {
        Self(self.0 | operation.bit())
    }

    #[must_use]
    pub fn without(self, operation: DockOperation) -> Self {
        Self(self.0 & !operation.bit())
    }

    /// `None` is never contained.
    pub fn contains(self, operation: DockOperation) -> bool {
        let bit = operation.bit();
        bit != 0 && self.0 & bit == bit
    }
}

impl Default for DockOperationMask {
    fn default() -> Self {
        Self::ALL
    }
}

/// What a drop does with the dragged dockable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum DragAction {
    #[default]
    Move,
    Copy,
    Link,
}

impl DragAction {
    /// Alt links, Ctrl copies, Shift (or nothing) moves.
    pub fn from_modifiers(modifiers: Modifiers) -> Self {
        if modifiers.alt {
            Self::Link
        } else if modifiers.ctrl || modifiers.command {
            Self::Copy
        } else {
            Self::Move
        }
    }
}

/// Edge a tool dock sits against; decides where its tools go when pinned.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum PinnedAlignment {
    #[default]
    Left,
    Right,
    Top,
    Bottom,
}

/// How a document dock presents its documents.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum DocumentLayout {
    #[default]
    Tabbed,
    /// Overlapping document windows arranged by an [`crate::mdi::MdiLayoutManager`].
    Mdi,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drag_action_follows_modifiers() {
        assert_eq!(DragAction::from_modifiers(Modifiers::NONE), DragAction::Move);
        assert_eq!(DragAction::from_modifiers(Modifiers::SHIFT), DragAction::Move);
        assert_eq!(DragAction::from_modifiers(Modifiers::CTRL), DragAction::Copy);
        assert_eq!(DragAction::from_modifiers(Modifiers::ALT), DragAction::Link);
        assert_eq!(
            DragAction::from_modifiers(Modifiers::ALT | Modifiers::CTRL),
            DragAction::Link
        );
    }

    #[test]
    fn mask_never_contains_none() {
        assert!(!DockOperationMask::ALL.contains(DockOperation::None));
        let mask = DockOperationMask::only(&[DockOperation::Fill, DockOperation::Left]);
        assert!(mask.contains(DockOperation::Fill));
        assert!(mask.contains(DockOperation::Left));
        assert!(!mask.contains(DockOperation::Window));
        assert!(!mask.without(DockOperation::Fill).contains(DockOperation::Fill));
    }

    #[test]
    fn corners_decompose_vertical_first() {
        assert_eq!(
            DockOperation::BottomRight.corner_parts(),
            Some((DockOperation::Bottom, DockOperation::Right))
        );
        assert_eq!(DockOperation::Fill.corner_parts(), None);
    }
}
