use egui::{Pos2, Rect, pos2, vec2};

use super::*;
use crate::behavior::CloningBehavior;
use crate::mdi::{MdiState, TileMode};
use crate::model::integrity::tree_integrity_issues;
use crate::model::{DockKind, DocumentLayout, Orientation};

fn assert_tree_ok<C>(tree: &DockTree<C>, context: &str) {
    let issues = tree_integrity_issues(tree);
    assert!(issues.is_empty(), "{context}: {issues:#?}");
}

fn snapshot<C: std::fmt::Debug>(tree: &DockTree<C>) -> String {
    format!("{tree:?}")
}

fn proportion<C>(tree: &DockTree<C>, id: DockableId) -> f64 {
    tree.get(id).unwrap().proportion
}

fn close_to(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

/// ```text
/// root
/// └ h: Horizontal
///   ├ v: Vertical [a, s, b]
///   ├ s
///   └ t: Tool(Right) [c, d]
/// ```
struct Fixture {
    tree: DockTree<&'static str>,
    root: DockableId,
    h: DockableId,
    v: DockableId,
    t: DockableId,
    a: DockableId,
    b: DockableId,
    c: DockableId,
    d: DockableId,
}

fn fixture() -> Fixture {
    let mut tree = DockTree::new();
    let root = tree.create_root();
    let h = tree.create_dock(DockKind::Proportional {
        orientation: Orientation::Horizontal,
    });
    let v = tree.create_dock(DockKind::Proportional {
        orientation: Orientation::Vertical,
    });
    let t = tree.create_dock(DockKind::Tool {
        alignment: PinnedAlignment::Right,
    });
    let a = tree.create_tool("a", "a");
    let b = tree.create_tool("b", "b");
    let c = tree.create_tool("c", "c");
    let d = tree.create_tool("d", "d");

    tree.attach(h, root, None).unwrap();
    let s0 = tree.create_splitter(4.0);
    for id in [v, s0, t] {
        tree.attach(id, h, None).unwrap();
    }
    let s1 = tree.create_splitter(4.0);
    for id in [a, s1, b] {
        tree.attach(id, v, None).unwrap();
    }
    for id in [c, d] {
        tree.attach(id, t, None).unwrap();
    }
    for id in [v, t, a, b] {
        tree.get_mut(id).unwrap().proportion = 0.5;
    }
    tree.drain_events();
    Fixture {
        tree,
        root,
        h,
        v,
        t,
        a,
        b,
        c,
        d,
    }
}

fn manager() -> DockManager {
    DockManager::default()
}

#[test]
fn right_of_target_in_vertical_dock_wraps_it_horizontally() {
    let Fixture {
        mut tree, v, t, a, c, d, ..
    } = fixture();

    let placed = manager()
        .dock(&mut tree, c, Some(a), DockOperation::Right, DragAction::Move, Pos2::ZERO)
        .unwrap();
    assert_eq!(placed, c);
    assert_tree_ok(&tree, "after split");

    let wrapper = tree.owner(a).unwrap();
    assert_ne!(wrapper, v);
    assert_eq!(
        tree.container(wrapper).unwrap().kind,
        DockKind::Proportional {
            orientation: Orientation::Horizontal
        }
    );
    let children = tree.children(wrapper).to_vec();
    assert_eq!(children.len(), 3);
    assert_eq!((children[0], children[2]), (a, c));
    assert!(tree.get(children[1]).unwrap().is_splitter());
    assert!(close_to(proportion(&tree, a), 0.5));
    assert!(close_to(proportion(&tree, c), 0.5));

    // The wrapper took the target's slot and share in its old owner.
    assert!(!tree.children(v).contains(&a));
    assert_eq!(tree.children(v)[0], wrapper);
    assert!(close_to(proportion(&tree, wrapper), 0.5));

    // The old owner keeps its other tab active.
    assert_eq!(tree.children(t), &[d]);
    assert_eq!(tree.active(t), Some(d));
    assert_eq!(tree.active(wrapper), Some(c));
    assert!(tree.events().contains(&DockEvent::Moved {
        dockable: c,
        old_owner: Some(t),
        new_owner: wrapper,
    }));
}

#[test]
fn same_axis_split_flattens_into_the_owner() {
    let Fixture {
        mut tree, v, a, b, c, ..
    } = fixture();
    let docks_before = tree.iter().filter(|d| d.container().is_some()).count();

    manager()
        .dock(&mut tree, c, Some(a), DockOperation::Bottom, DragAction::Move, Pos2::ZERO)
        .unwrap();
    assert_tree_ok(&tree, "after flatten");

    let children = tree.children(v).to_vec();
    assert_eq!(children.len(), 5);
    assert_eq!((children[0], children[2], children[4]), (a, c, b));
    assert!(close_to(proportion(&tree, a), 0.25));
    assert!(close_to(proportion(&tree, c), 0.25));
    assert!(close_to(proportion(&tree, b), 0.5));
    assert_eq!(
        tree.iter().filter(|d| d.container().is_some()).count(),
        docks_before
    );
}

#[test]
fn leaf_beside_a_tab_group_gets_its_own_group() {
    let Fixture {
        mut tree, h, v, t, a, b, d, ..
    } = fixture();

    manager()
        .dock(&mut tree, a, Some(d), DockOperation::Right, DragAction::Move, Pos2::ZERO)
        .unwrap();
    assert_tree_ok(&tree, "after split next to tabs");

    let group = tree.owner(a).unwrap();
    assert_eq!(
        tree.container(group).unwrap().kind,
        DockKind::Tool {
            alignment: PinnedAlignment::Right
        }
    );
    assert_eq!(tree.owner(group), Some(h));
    let content = tree.content_children(h);
    assert_eq!(content, vec![v, t, group]);
    assert!(close_to(proportion(&tree, t), 0.25));
    assert!(close_to(proportion(&tree, group), 0.25));

    // v lost a and its splitter.
    assert_eq!(tree.children(v), &[b]);
    assert!(close_to(proportion(&tree, b), 1.0));
}

#[test]
fn fill_joins_the_tab_group_after_the_active_tab() {
    let Fixture {
        mut tree, v, t, a, b, c, d, ..
    } = fixture();

    manager()
        .dock(&mut tree, a, Some(d), DockOperation::Fill, DragAction::Move, Pos2::ZERO)
        .unwrap();
    assert_tree_ok(&tree, "after fill");
    assert_eq!(tree.children(t), &[c, a, d]);
    assert_eq!(tree.active(t), Some(a));
    assert_eq!(tree.children(v), &[b]);
}

#[test]
fn fill_onto_a_bare_leaf_creates_a_tab_group() {
    let Fixture {
        mut tree, v, a, c, ..
    } = fixture();

    manager()
        .dock(&mut tree, c, Some(a), DockOperation::Fill, DragAction::Move, Pos2::ZERO)
        .unwrap();
    assert_tree_ok(&tree, "after fill onto leaf");
    let group = tree.owner(a).unwrap();
    assert_eq!(tree.owner(group), Some(v));
    assert_eq!(tree.children(group), &[a, c]);
    assert_eq!(tree.active(group), Some(c));
    assert!(close_to(proportion(&tree, group), 0.5));
}

#[test]
fn emptied_docks_collapse_and_take_their_splitter() {
    let Fixture {
        mut tree, h, v, t, a, c, d, ..
    } = fixture();
    let m = manager();

    m.dock(&mut tree, d, Some(a), DockOperation::Fill, DragAction::Move, Pos2::ZERO)
        .unwrap();
    m.dock(&mut tree, c, Some(a), DockOperation::Fill, DragAction::Move, Pos2::ZERO)
        .unwrap();
    assert_tree_ok(&tree, "after emptying t");

    assert!(!tree.contains(t));
    assert_eq!(tree.children(h), &[v]);
    assert!(close_to(proportion(&tree, v), 1.0));
    assert!(tree.events().contains(&DockEvent::Collapsed { dock: t }));
}

/// Nesting of `id` as text: leaves by context, proportional docks as `H(..)`/`V(..)`, other
/// docks as a bare `(..)`.
fn shape(tree: &DockTree<&'static str>, id: DockableId) -> String {
    let dockable = tree.get(id).unwrap();
    if dockable.is_leaf() {
        return dockable.context.unwrap_or("?").to_owned();
    }
    let tag = match tree.container(id).unwrap().kind.proportional_orientation() {
        Some(Orientation::Horizontal) => "H",
        Some(Orientation::Vertical) => "V",
        None => "",
    };
    let inner = tree
        .content_children(id)
        .into_iter()
        .map(|child| shape(tree, child))
        .collect::<Vec<_>>()
        .join(",");
    format!("{tag}({inner})")
}

fn single_child_splits(tree: &DockTree<&'static str>) -> Vec<DockableId> {
    tree.iter()
        .filter(|d| {
            d.container()
                .is_some_and(|c| c.kind.proportional_orientation().is_some())
        })
        .filter(|d| tree.content_children(d.id).len() < 2)
        .map(|d| d.id)
        .collect()
}

/// ```text
/// root
/// └ outer: Vertical
///   ├ row: Horizontal [x (xa), t (ta), y (ya)]
///   └ src: Tool(Bottom) [n, m]
/// ```
struct Row {
    tree: DockTree<&'static str>,
    row: DockableId,
    t: DockableId,
    ta: DockableId,
    n: DockableId,
}

fn row() -> Row {
    let mut tree = DockTree::new();
    let root = tree.create_root();
    let outer = tree.create_dock(DockKind::Proportional {
        orientation: Orientation::Vertical,
    });
    let row = tree.create_dock(DockKind::Proportional {
        orientation: Orientation::Horizontal,
    });
    let src = tree.create_dock(DockKind::Tool {
        alignment: PinnedAlignment::Bottom,
    });
    tree.attach(outer, root, None).unwrap();
    let s = tree.create_splitter(4.0);
    for id in [row, s, src] {
        tree.attach(id, outer, None).unwrap();
    }

    let mut docks = Vec::new();
    for (i, name) in ["xa", "ta", "ya"].into_iter().enumerate() {
        if i > 0 {
            let s = tree.create_splitter(4.0);
            tree.attach(s, row, None).unwrap();
        }
        let dock = tree.create_dock(DockKind::Tool {
            alignment: PinnedAlignment::Left,
        });
        let leaf = tree.create_tool(name, name);
        tree.attach(dock, row, None).unwrap();
        tree.attach(leaf, dock, None).unwrap();
        tree.get_mut(dock).unwrap().proportion = 1.0 / 3.0;
        docks.push((dock, leaf));
    }
    let n = tree.create_tool("n", "n");
    let m = tree.create_tool("m", "m");
    tree.attach(n, src, None).unwrap();
    tree.attach(m, src, None).unwrap();
    tree.drain_events();
    Row {
        tree,
        row,
        t: docks[1].0,
        ta: docks[1].1,
        n,
    }
}

#[test]
fn corners_band_the_target_with_its_neighbour_then_split_vertically() {
    let cases = [
        (DockOperation::TopLeft, "H(V(n,H((xa),(ta))),(ya))"),
        (DockOperation::TopRight, "H((xa),V(n,H((ta),(ya))))"),
        (DockOperation::BottomLeft, "H(V(H((xa),(ta)),n),(ya))"),
        (DockOperation::BottomRight, "H((xa),V(H((ta),(ya)),n))"),
    ];
    for (operation, expected) in cases {
        let Row {
            mut tree, row, ta, n, ..
        } = row();

        let placed = manager()
            .dock(&mut tree, n, Some(ta), operation, DragAction::Move, Pos2::ZERO)
            .unwrap();
        assert_eq!(placed, n);
        assert_tree_ok(&tree, &format!("after {operation:?}"));
        assert_eq!(shape(&tree, row), expected, "{operation:?}");
        assert!(
            single_child_splits(&tree).is_empty(),
            "{operation:?} left {:?}",
            single_child_splits(&tree)
        );
    }
}

#[test]
fn corner_band_takes_the_pair_share_and_halves_it_with_the_source() {
    let Row {
        mut tree, row, t, ta, n, ..
    } = row();

    manager()
        .dock(&mut tree, n, Some(ta), DockOperation::TopLeft, DragAction::Move, Pos2::ZERO)
        .unwrap();

    let column = tree.content_children(row)[0];
    assert!(close_to(proportion(&tree, column), 2.0 / 3.0));
    assert!(close_to(proportion(&tree, n), 0.5));
    let band = tree.owner(t).unwrap();
    assert_eq!(tree.owner(band), Some(column));
    assert!(close_to(proportion(&tree, band), 0.5));
    assert!(close_to(proportion(&tree, t), 0.5));
}

#[test]
fn corner_on_a_pair_splits_their_owner_in_its_slot() {
    let Fixture {
        mut tree, root, h, v, t, c, ..
    } = fixture();

    manager()
        .dock(&mut tree, c, Some(v), DockOperation::BottomRight, DragAction::Move, Pos2::ZERO)
        .unwrap();
    assert_tree_ok(&tree, "after corner");

    let column = tree.content_children(root)[0];
    assert_eq!(tree.content_children(column), vec![h, c]);
    assert_eq!(tree.content_children(h), vec![v, t]);
    assert_eq!(
        tree.container(column).unwrap().kind,
        DockKind::Proportional {
            orientation: Orientation::Vertical
        }
    );
}

#[test]
fn corner_without_a_neighbour_on_its_side_is_rejected_whole() {
    let Fixture {
        mut tree, t, b, d, ..
    } = fixture();
    let m = manager();
    let before = snapshot(&tree);

    let err = m
        .dock(&mut tree, b, Some(d), DockOperation::TopRight, DragAction::Move, Pos2::ZERO)
        .unwrap_err();
    assert_eq!(
        err,
        DockError::OperationNotAllowed {
            operation: DockOperation::TopRight,
            target: Some(t),
        }
    );
    assert_eq!(snapshot(&tree), before);
    assert_eq!(
        m.check_dock(&tree, b, Some(d), DockOperation::TopRight, DragAction::Move),
        Err(err)
    );
}

#[test]
fn rejected_drops_leave_the_tree_untouched() {
    let Fixture {
        mut tree, h, v, a, c, ..
    } = fixture();
    let m = manager();
    tree.container_mut(v).unwrap().allowed_operations =
        crate::model::DockOperationMask::ALL.without(DockOperation::TopLeft);
    let before = snapshot(&tree);

    assert!(matches!(
        m.dock(&mut tree, c, Some(a), DockOperation::TopLeft, DragAction::Move, Pos2::ZERO),
        Err(DockError::OperationNotAllowed { .. })
    ));
    assert_eq!(
        m.dock(&mut tree, h, Some(a), DockOperation::BottomRight, DragAction::Move, Pos2::ZERO),
        Err(DockError::TargetInsideSource { source: h, target: a })
    );
    assert_eq!(
        m.dock(&mut tree, a, Some(a), DockOperation::Fill, DragAction::Move, Pos2::ZERO),
        Err(DockError::SelfTarget(a))
    );
    assert!(matches!(
        m.dock(&mut tree, c, Some(a), DockOperation::None, DragAction::Move, Pos2::ZERO),
        Err(DockError::OperationNotAllowed { .. })
    ));
    assert_eq!(snapshot(&tree), before);
}

#[test]
fn window_drop_floats_and_remembers_the_owner() {
    let Fixture {
        mut tree, root, t, c, ..
    } = fixture();

    let placed = manager()
        .dock(&mut tree, c, None, DockOperation::Window, DragAction::Move, pos2(300.0, 200.0))
        .unwrap();
    assert_eq!(placed, c);
    assert_tree_ok(&tree, "after float");

    let window = tree.windows()[0].clone();
    assert_eq!(tree.windows().len(), 1);
    assert_eq!(window.position, pos2(280.0, 190.0));
    assert_eq!(window.size, vec2(480.0, 360.0));
    assert_eq!(window.title, "c");
    assert_eq!(tree.top_root_of(c), Some(window.layout));
    assert_ne!(window.layout, root);
    assert_eq!(tree.get(c).unwrap().original_owner, Some(t));
    assert!(tree.events().contains(&DockEvent::WindowOpened { window: window.id }));

    // Dragging the window itself only moves it.
    manager()
        .dock(
            &mut tree,
            window.layout,
            None,
            DockOperation::Window,
            DragAction::Move,
            pos2(520.0, 410.0),
        )
        .unwrap();
    assert_eq!(tree.window(window.id).unwrap().position, pos2(500.0, 400.0));
}

#[test]
fn docking_a_window_back_closes_it() {
    let Fixture {
        mut tree, t, c, d, ..
    } = fixture();
    let m = manager();
    m.float_dockable(&mut tree, c).unwrap();
    let window = tree.windows()[0].clone();

    m.dock_window_into(&mut tree, window.id, d, DockOperation::Fill)
        .unwrap();
    assert_tree_ok(&tree, "after re-dock");
    assert!(tree.windows().is_empty());
    assert!(!tree.contains(window.layout));
    assert_eq!(tree.children(t), &[d, c]);
    assert_eq!(tree.active(t), Some(c));
    assert!(tree.events().contains(&DockEvent::WindowClosed { window: window.id }));
}

#[test]
fn float_dock_takes_the_whole_tab_group() {
    let Fixture {
        mut tree, h, v, t, c, ..
    } = fixture();
    manager().float_dock(&mut tree, c).unwrap();
    assert_tree_ok(&tree, "after float dock");

    let layout = tree.windows()[0].layout;
    assert_eq!(tree.children(layout), &[t]);
    assert_eq!(tree.children(h), &[v]);
}

#[test]
fn copy_places_a_clone_and_keeps_the_source() {
    let Fixture {
        mut tree, t, b, c, ..
    } = fixture();
    let before = snapshot(&tree);
    assert_eq!(
        manager().dock(&mut tree, c, Some(b), DockOperation::Fill, DragAction::Copy, Pos2::ZERO),
        Err(DockError::NothingToClone(c))
    );
    assert_eq!(snapshot(&tree), before);

    let m = DockManager::new(DockOptions::default()).with_behavior(CloningBehavior);
    let clone = m
        .dock(&mut tree, c, Some(b), DockOperation::Fill, DragAction::Copy, Pos2::ZERO)
        .unwrap();
    assert_tree_ok(&tree, "after copy");
    assert_ne!(clone, c);
    assert_eq!(tree.owner(c), Some(t));
    let copied = tree.get(clone).unwrap();
    assert_eq!(copied.title, "c");
    assert_eq!(copied.context, Some("c"));
    assert_eq!(tree.owner(clone), tree.owner(b));
}

#[test]
fn closing_the_last_dockable_can_be_refused() {
    let Fixture {
        mut tree, t, c, d, ..
    } = fixture();
    let m = manager();
    tree.container_mut(t).unwrap().can_close_last_dockable = false;

    m.close_dockable(&mut tree, d).unwrap();
    assert_eq!(m.close_dockable(&mut tree, c), Err(DockError::LastDockable { dock: t }));
    assert_eq!(tree.children(t), &[c]);
    assert!(tree.contains(c));
    assert_tree_ok(&tree, "after refused close");
}

#[test]
fn closing_honours_can_close() {
    let Fixture {
        mut tree, v, a, b, ..
    } = fixture();
    let m = manager();
    tree.get_mut(a).unwrap().capabilities.can_close = false;
    assert_eq!(
        m.close_dockable(&mut tree, a),
        Err(DockError::CapabilityDenied {
            dockable: a,
            capability: "close"
        })
    );
    // A dock holding an unclosable leaf cannot close either.
    assert!(m.close_dockable(&mut tree, v).is_err());

    m.close_dockable(&mut tree, b).unwrap();
    assert_eq!(tree.children(v), &[a]);
    assert!(tree.events().contains(&DockEvent::Closed { dockable: b }));
    assert_tree_ok(&tree, "after close");
}

#[test]
fn bulk_close_variants() {
    let Fixture {
        mut tree, t, c, d, ..
    } = fixture();
    let m = manager();
    let e = tree.create_tool("e", "e");
    tree.attach(e, t, None).unwrap();

    let mut left = tree.clone();
    assert_eq!(m.close_left_dockables(&mut left, e), Ok(vec![c, d]));
    assert_eq!(left.children(t), &[e]);

    let mut right = tree.clone();
    assert_eq!(m.close_right_dockables(&mut right, c), Ok(vec![d, e]));
    assert_eq!(right.children(t), &[c]);

    let mut others = tree.clone();
    others.get_mut(e).unwrap().capabilities.can_close = false;
    assert_eq!(m.close_other_dockables(&mut others, d), Ok(vec![c]));
    assert_eq!(others.children(t), &[d, e]);

    tree.container_mut(t).unwrap().can_close_last_dockable = false;
    assert_eq!(m.close_all_dockables(&mut tree, d), Ok(vec![c, d]));
    assert_eq!(tree.children(t), &[e]);
    assert_tree_ok(&tree, "after close all");
}

#[test]
fn pin_unpin_and_preview() {
    let Fixture {
        mut tree, root, t, a, c, d, ..
    } = fixture();
    let m = manager();

    m.pin_dockable(&mut tree, c).unwrap();
    assert_tree_ok(&tree, "after pin");
    let state = tree.root_state(root).unwrap();
    assert_eq!(state.pinned.right, vec![c]);
    assert_eq!(tree.owner(c), Some(root));
    assert_eq!(tree.get(c).unwrap().original_owner, Some(t));
    assert_eq!(tree.children(t), &[d]);

    // Pinning the last tool keeps the remembered tool dock around.
    m.pin_dockable(&mut tree, d).unwrap();
    assert!(tree.contains(t));
    assert!(tree.children(t).is_empty());

    m.show_pinned_preview(&mut tree, c).unwrap();
    assert_eq!(tree.root_state(root).unwrap().pinned_preview, Some(c));

    m.unpin_dockable(&mut tree, c).unwrap();
    assert_tree_ok(&tree, "after unpin");
    assert_eq!(tree.children(t), &[c]);
    assert_eq!(tree.active(t), Some(c));
    assert_eq!(tree.root_state(root).unwrap().pinned_preview, None);
    assert_eq!(tree.get(c).unwrap().original_owner, None);

    assert_eq!(m.unpin_dockable(&mut tree, c), Err(DockError::NotPinned(c)));
    assert!(matches!(
        m.pin_dockable(&mut tree, a),
        Err(DockError::OperationNotAllowed { .. })
    ));
    m.hide_pinned_preview(&mut tree, root).unwrap();
}

#[test]
fn hide_and_restore() {
    let Fixture {
        mut tree, root, t, c, d, ..
    } = fixture();
    let m = manager();

    m.hide_dockable(&mut tree, c).unwrap();
    assert_eq!(tree.root_state(root).unwrap().hidden, vec![c]);
    assert!(tree.events().contains(&DockEvent::Hidden { dockable: c }));
    m.restore_dockable(&mut tree, c).unwrap();
    assert_eq!(tree.children(t), &[d, c]);
    assert_eq!(m.restore_dockable(&mut tree, c), Err(DockError::NotHidden(c)));

    // With the original owner gone the dockable floats.
    m.hide_dockable(&mut tree, c).unwrap();
    m.close_dockable(&mut tree, t).unwrap();
    m.restore_dockable(&mut tree, c).unwrap();
    assert_tree_ok(&tree, "after restore into a window");
    assert_eq!(tree.windows().len(), 1);
    assert_eq!(tree.top_root_of(c), Some(tree.windows()[0].layout));
}

#[test]
fn swap_exchanges_slots() {
    let Fixture {
        mut tree, v, t, a, c, d, ..
    } = fixture();
    manager().swap_dockables(&mut tree, a, d).unwrap();
    assert_tree_ok(&tree, "after swap");
    assert_eq!(tree.children(t), &[c, a]);
    assert_eq!(tree.children(v)[0], d);
    assert_eq!(tree.owner(d), Some(v));
    assert!(close_to(proportion(&tree, d), 0.5));
    assert_eq!(tree.active(t), Some(c));
}

#[test]
fn move_into_proportional_dock_adds_a_splitter() {
    let Fixture {
        mut tree, v, t, a, b, c, d, ..
    } = fixture();
    let m = manager();
    m.move_dockable(&mut tree, c, v, Some(1)).unwrap();
    assert_tree_ok(&tree, "after move");
    assert_eq!(tree.content_children(v), vec![a, c, b]);
    let sum: f64 = [a, b, c].iter().map(|&id| proportion(&tree, id)).sum();
    assert!(close_to(sum, 1.0));
    assert_eq!(tree.children(t), &[d]);

    assert!(matches!(
        m.move_dockable_within(&mut tree, v, 0, 2),
        Err(DockError::OperationNotAllowed { .. })
    ));
}

// ----------------------------------------------------------------------------
// MDI

fn mdi_tree() -> (DockTree<&'static str>, DockableId, [DockableId; 3]) {
    let mut tree = DockTree::new();
    let root = tree.create_root();
    let dock = tree.create_dock(DockKind::Document {
        layout: DocumentLayout::Mdi,
    });
    tree.attach(dock, root, None).unwrap();
    let docs = ["x", "y", "z"].map(|name| tree.create_document(name, name));
    for id in docs {
        tree.attach(id, dock, None).unwrap();
    }
    tree.get_mut(dock).unwrap().bounds.visible =
        Some(Rect::from_min_size(pos2(0.0, 0.0), vec2(800.0, 600.0)));
    (tree, dock, docs)
}

#[test]
fn one_maximized_document_at_a_time() {
    let (mut tree, dock, [x, y, z]) = mdi_tree();
    let m = manager();
    m.maximize_mdi_document(&mut tree, x).unwrap();
    m.maximize_mdi_document(&mut tree, y).unwrap();
    assert_eq!(tree.get(x).unwrap().mdi.state, MdiState::Normal);
    assert_eq!(tree.get(y).unwrap().mdi.state, MdiState::Maximized);
    assert_eq!(tree.active(dock), Some(y));

    m.activate_mdi_document(&mut tree, z).unwrap();
    let mut z_indices: Vec<i32> = [x, y, z].iter().map(|&id| tree.get(id).unwrap().mdi.z_index).collect();
    assert_eq!(z_indices[2], 2);
    z_indices.sort_unstable();
    assert_eq!(z_indices, vec![0, 1, 2]);

    m.minimize_mdi_document(&mut tree, x).unwrap();
    m.restore_mdi_document(&mut tree, y).unwrap();
    assert_eq!(tree.get(x).unwrap().mdi.state, MdiState::Minimized);
    assert_eq!(tree.get(y).unwrap().mdi.state, MdiState::Normal);
}

#[test]
fn cascade_and_tile_need_arranged_bounds() {
    let (mut tree, dock, docs) = mdi_tree();
    let m = manager();
    m.cascade_mdi_documents(&mut tree, dock).unwrap();
    for id in docs {
        let bounds = tree.get(id).unwrap().mdi.bounds;
        assert!(bounds.width() > 0.0 && bounds.height() > 0.0);
    }
    m.tile_mdi_documents(&mut tree, dock, TileMode::Horizontal).unwrap();
    let first = tree.get(docs[0]).unwrap().mdi.bounds;
    assert_eq!(first.min, pos2(0.0, 0.0));

    tree.get_mut(dock).unwrap().bounds.visible = None;
    assert_eq!(m.cascade_mdi_documents(&mut tree, dock), Err(DockError::InvalidGeometry));
}

#[test]
fn mdi_drag_snaps_to_the_container_edge() {
    let (mut tree, _, [x, ..]) = mdi_tree();
    let start = Rect::from_min_size(pos2(100.0, 100.0), vec2(300.0, 200.0));
    let bounds = manager()
        .drag_mdi_document(&mut tree, x, start, vec2(-95.0, 0.0))
        .unwrap();
    assert_eq!(bounds.min.x, 0.0);
    assert_eq!(tree.get(x).unwrap().mdi.bounds, bounds);
}

#[test]
fn filling_an_mdi_dock_puts_the_document_on_top() {
    let (mut tree, dock, [x, ..]) = mdi_tree();
    let root = tree.root().unwrap();
    let loose = tree.create_document("w", "w");
    let tabs = tree.create_dock(DockKind::Document {
        layout: DocumentLayout::Tabbed,
    });
    tree.attach(tabs, root, None).unwrap();
    tree.attach(loose, tabs, None).unwrap();

    manager()
        .dock(&mut tree, loose, Some(x), DockOperation::Fill, DragAction::Move, Pos2::ZERO)
        .unwrap();
    assert_tree_ok(&tree, "after mdi fill");
    assert_eq!(tree.owner(loose), Some(dock));
    let w = tree.get(loose).unwrap();
    assert_eq!(w.mdi.z_index, 3);
    assert_eq!(w.mdi.bounds, Rect::ZERO);
    assert!(!tree.contains(tabs));
}

// ----------------------------------------------------------------------------
// Randomised

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed ^ 0xD0C3_D0C3_D0C3_D0C3)
    }

    fn next_u64(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005u64)
            .wrapping_add(1442695040888963407u64);
        self.0
    }

    fn next_usize(&mut self, upper: usize) -> usize {
        if upper == 0 {
            return 0;
        }
        (self.next_u64() as usize) % upper
    }

    fn pick(&mut self, ids: &[DockableId]) -> Option<DockableId> {
        (!ids.is_empty()).then(|| ids[self.next_usize(ids.len())])
    }
}

#[test]
fn random_operations_keep_the_tree_consistent() {
    env_logger::builder().is_test(true).try_init().ok();
    for seed in [1, 7, 42, 1234] {
        let Fixture { mut tree, .. } = fixture();
        for name in ["e", "f", "g"] {
            let id = tree.create_document(name, name);
            let root = tree.root().unwrap();
            attach_document(&mut tree, root, id);
        }
        let m = manager();
        let mut rng = Rng::new(seed);

        for step in 0..300 {
            let ids: Vec<DockableId> = tree
                .iter()
                .filter(|d| !d.is_splitter())
                .map(|d| d.id)
                .collect();
            let leaves: Vec<DockableId> = tree.iter().filter(|d| d.is_leaf()).map(|d| d.id).collect();
            let (Some(source), Some(target)) = (rng.pick(&ids), rng.pick(&ids)) else {
                break;
            };
            let leaf = rng.pick(&leaves);
            let before = snapshot(&tree);

            let op = rng.next_usize(10);
            let result = match op {
                0..=5 => {
                    let operation = DockOperation::ALL[rng.next_usize(DockOperation::ALL.len())];
                    let grab = pos2(rng.next_usize(800) as f32, rng.next_usize(600) as f32);
                    m.dock(&mut tree, source, Some(target), operation, DragAction::Move, grab)
                        .map(|_| ())
                }
                6 => leaf.map_or(Ok(()), |l| m.pin_dockable(&mut tree, l)),
                7 => leaf.map_or(Ok(()), |l| m.unpin_dockable(&mut tree, l)),
                8 => match rng.next_usize(2) {
                    0 => m.hide_dockable(&mut tree, source),
                    _ => m.restore_dockable(&mut tree, source),
                },
                _ => {
                    if leaves.len() > 3 {
                        leaf.map_or(Ok(()), |l| m.close_dockable(&mut tree, l))
                    } else {
                        Ok(())
                    }
                }
            };

            let context = format!("seed={seed} step={step} op={op} result={result:?}");
            assert_tree_ok(&tree, &context);
            if result.is_err() {
                assert_eq!(snapshot(&tree), before, "{context}: rejected op changed the tree");
            }
        }
    }
}

/// Puts a document into the main root's document dock, creating it on first use.
fn attach_document(tree: &mut DockTree<&'static str>, root: DockableId, id: DockableId) {
    let existing = tree.content_children(root).into_iter().find(|&c| {
        matches!(
            tree.container(c).map(|c| &c.kind),
            Some(DockKind::Document { .. })
        )
    });
    let documents = match existing {
        Some(documents) => documents,
        None => {
            let documents = tree.create_dock(DockKind::Document {
                layout: DocumentLayout::Tabbed,
            });
            tree.attach(documents, root, None).unwrap();
            documents
        }
    };
    tree.attach(id, documents, None).unwrap();
}
