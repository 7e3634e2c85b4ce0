//! Splitting one axis among siblings by proportion.

use egui::{Rect, pos2, vec2};

use crate::model::Orientation;

/// Tolerance below which a proportion sum counts as exactly one.
pub const PROPORTION_EPSILON: f64 = 1e-12;

/// One sibling along the layout axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LayoutItem {
    /// `proportion` is NaN when unassigned. `min_size` is in points.
    Content { proportion: f64, min_size: f64 },
    Splitter { thickness: f64 },
}

impl LayoutItem {
    pub fn content(proportion: f64) -> Self {
        Self::Content {
            proportion,
            min_size: 0.0,
        }
    }

    pub fn is_splitter(&self) -> bool {
        matches!(self, Self::Splitter { .. })
    }
}

/// Fills unassigned proportions and rescales so they sum to one.
///
/// Unassigned (non-finite) entries share what the assigned ones leave. When nothing is left they
/// each get `1 / n` before the rescale. Negative entries count as zero.
pub fn normalize_proportions(proportions: &mut [f64]) {
    let n = proportions.len();
    if n == 0 {
        return;
    }

    let mut assigned_sum = 0.0;
    let mut unassigned = 0usize;
    for p in proportions.iter_mut() {
        if p.is_finite() {
            *p = p.max(0.0);
            assigned_sum += *p;
        } else {
            unassigned += 1;
        }
    }

    if unassigned > 0 {
        let remaining = 1.0 - assigned_sum;
        let share = if remaining > PROPORTION_EPSILON {
            remaining / unassigned as f64
        } else {
            1.0 / n as f64
        };
        for p in proportions.iter_mut().filter(|p| !p.is_finite()) {
            *p = share;
        }
    }

    let sum: f64 = proportions.iter().sum();
    if sum <= PROPORTION_EPSILON {
        proportions.fill(1.0 / n as f64);
    } else if (sum - 1.0).abs() > PROPORTION_EPSILON {
        for p in proportions.iter_mut() {
            *p /= sum;
        }
    }
}

/// Sizes along the layout axis, one per item.
///
/// Content proportions are normalized first; splitters keep their thickness. Content below its
/// minimum size borrows from siblings with slack, when the extent allows every minimum.
///
/// Returns `None` for a non-finite or negative extent.
pub fn layout_sizes(items: &[LayoutItem], extent: f64) -> Option<Vec<f64>> {
    if !extent.is_finite() || extent < 0.0 {
        return None;
    }
    if items.is_empty() {
        return Some(Vec::new());
    }

    let mut proportions: Vec<f64> = items
        .iter()
        .filter_map(|item| match item {
            LayoutItem::Content { proportion, .. } => Some(*proportion),
            LayoutItem::Splitter { .. } => None,
        })
        .collect();
    normalize_proportions(&mut proportions);

    let splitters: f64 = items
        .iter()
        .map(|item| match item {
            LayoutItem::Splitter { thickness } if thickness.is_finite() => thickness.max(0.0),
            _ => 0.0,
        })
        .sum();
    let remaining = (extent - splitters).max(0.0);

    let mut content_sizes: Vec<f64> = proportions.iter().map(|p| p * remaining).collect();
    let mins: Vec<f64> = items
        .iter()
        .filter_map(|item| match item {
            LayoutItem::Content { min_size, .. } if min_size.is_finite() => Some(min_size.max(0.0)),
            LayoutItem::Content { .. } => Some(0.0),
            LayoutItem::Splitter { .. } => None,
        })
        .collect();
    enforce_minimums(&mut content_sizes, &mins, remaining);

    let mut content = content_sizes.into_iter();
    Some(
        items
            .iter()
            .map(|item| match item {
                LayoutItem::Content { .. } => content.next().unwrap_or(0.0),
                LayoutItem::Splitter { thickness } => {
                    if thickness.is_finite() {
                        thickness.max(0.0).min(extent)
                    } else {
                        0.0
                    }
                }
            })
            .collect(),
    )
}

/// Raises sizes below their minimum, taking the deficit from siblings in proportion to their
/// slack. Does nothing when the minimums cannot all fit.
fn enforce_minimums(sizes: &mut [f64], mins: &[f64], remaining: f64) {
    let total_min: f64 = mins.iter().sum();
    if total_min > remaining || total_min <= 0.0 {
        return;
    }

    let deficit: f64 = sizes
        .iter()
        .zip(mins)
        .map(|(size, min)| (min - size).max(0.0))
        .sum();
    if deficit <= 0.0 {
        return;
    }

    let slack: f64 = sizes
        .iter()
        .zip(mins)
        .map(|(size, min)| (size - min).max(0.0))
        .sum();
    if slack <= 0.0 {
        return;
    }

    for (size, min) in sizes.iter_mut().zip(mins) {
        if *size < *min {
            *size = *min;
        } else {
            *size -= deficit * (*size - min) / slack;
        }
    }
}

/// Rectangles for `items` inside `bounds`, placed along `orientation`.
///
/// Returns `None` when `bounds` is not finite or has a negative size.
pub fn layout_rects(items: &[LayoutItem], orientation: Orientation, bounds: Rect) -> Option<Vec<Rect>> {
    if !bounds.is_finite() || bounds.width() < 0.0 || bounds.height() < 0.0 {
        return None;
    }
    let extent = f64::from(orientation.main(bounds.size()));
    let sizes = layout_sizes(items, extent)?;

    let mut cursor = 0.0f64;
    Some(
        sizes
            .into_iter()
            .map(|size| {
                let start = cursor;
                cursor += size;
                match orientation {
                    Orientation::Horizontal => Rect::from_min_size(
                        pos2(bounds.min.x + start as f32, bounds.min.y),
                        vec2(size as f32, bounds.height()),
                    ),
                    Orientation::Vertical => Rect::from_min_size(
                        pos2(bounds.min.x, bounds.min.y + start as f32),
                        vec2(bounds.width(), size as f32),
                    ),
                }
            })
            .collect(),
    )
}

/// Moves `delta` points of space from the sibling after a splitter to the sibling before it
/// (negative `delta` moves the other way).
///
/// `extent` is the content extent the proportions apply to (splitters excluded). The move is
/// clamped so neither side shrinks below its minimum. A side that is already smaller than its
/// minimum keeps its size as the floor instead of jumping to the minimum.
///
/// Returns the new `(before, after)` proportions.
pub fn apply_splitter_delta(
    before: f64,
    after: f64,
    delta: f64,
    extent: f64,
    min_before: f64,
    min_after: f64,
) -> (f64, f64) {
    if !(extent.is_finite() && extent > 0.0 && delta.is_finite()) {
        return (before, after);
    }
    let d = delta / extent;
    let lowest = (min_before / extent).min(before) - before;
    let highest = after - (min_after / extent).min(after);
    let d = d.max(lowest).min(highest);
    if d == 0.0 {
        return (before, after);
    }
    (before + d, after - d)
}
