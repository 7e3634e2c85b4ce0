use super::integrity::tree_integrity_issues;
use super::*;
use crate::error::DockError;

fn assert_tree_ok<C>(tree: &DockTree<C>, context: &str) {
    let issues = tree_integrity_issues(tree);
    assert!(issues.is_empty(), "{context}: {issues:#?}");
}

/// Main root holding one document dock with three documents.
fn tabbed_tree() -> (DockTree<&'static str>, DockableId, [DockableId; 3]) {
    let mut tree = DockTree::new();
    let root = tree.create_root();
    let docs = tree.create_dock(DockKind::Document {
        layout: DocumentLayout::Tabbed,
    });
    tree.attach(docs, root, None).unwrap();
    let a = tree.create_document("a", "a");
    let b = tree.create_document("b", "b");
    let c = tree.create_document("c", "c");
    for id in [a, b, c] {
        tree.attach(id, docs, None).unwrap();
    }
    tree.drain_events();
    (tree, docs, [a, b, c])
}

#[test]
fn first_attached_child_becomes_active() {
    let (tree, docs, [a, ..]) = tabbed_tree();
    assert_tree_ok(&tree, "built");
    assert_eq!(tree.active(docs), Some(a));
    assert_eq!(tree.owner(a), Some(docs));
    assert_eq!(tree.location(a), Location::Visible { owner: docs, index: 0 });
    assert_eq!(tree.location(tree.root().unwrap()), Location::MainRoot);
}

#[test]
fn attach_rejects_cycles_and_double_ownership() {
    let (mut tree, docs, [a, ..]) = tabbed_tree();
    let root = tree.root().unwrap();

    assert_eq!(
        tree.attach(root, docs, None),
        Err(DockError::TargetInsideSource {
            source: root,
            target: docs
        })
    );
    assert!(matches!(
        tree.attach(a, docs, None),
        Err(DockError::OperationNotAllowed { .. })
    ));
    assert_eq!(tree.attach(docs, docs, None), Err(DockError::SelfTarget(docs)));
    assert_eq!(tree.attach(a, a, None), Err(DockError::NotAContainer(a)));
    assert!(tree.events().is_empty());
    assert_tree_ok(&tree, "after rejected attaches");
}

#[test]
fn set_active_rejects_non_members() {
    let (mut tree, docs, [a, b, _]) = tabbed_tree();
    let stranger = tree.create_document("x", "x");
    assert_eq!(
        tree.set_active(docs, Some(stranger)),
        Err(DockError::NotOwned {
            dockable: stranger,
            owner: docs
        })
    );
    assert_eq!(tree.active(docs), Some(a));

    tree.set_active(docs, Some(b)).unwrap();
    assert_eq!(
        tree.drain_events(),
        vec![
            DockEvent::ActiveChanged {
                dock: docs,
                old: Some(a),
                new: Some(b)
            },
            DockEvent::Selected { dockable: b },
        ]
    );
}

#[test]
fn navigation_history_walks_back_and_forward() {
    let (mut tree, docs, [a, b, c]) = tabbed_tree();
    assert!(!tree.can_go_back(docs));

    tree.set_active(docs, Some(b)).unwrap();
    tree.set_active(docs, Some(c)).unwrap();
    assert!(tree.can_go_back(docs));

    assert_eq!(tree.go_back(docs), Ok(Some(b)));
    assert_eq!(tree.go_back(docs), Ok(Some(a)));
    assert_eq!(tree.go_back(docs), Ok(None));
    assert_eq!(tree.active(docs), Some(a));

    assert!(tree.can_go_forward(docs));
    assert_eq!(tree.go_forward(docs), Ok(Some(b)));

    // A fresh selection drops the forward stack.
    tree.set_active(docs, Some(a)).unwrap();
    assert!(!tree.can_go_forward(docs));
}

#[test]
fn navigation_skips_detached_entries() {
    let (mut tree, docs, [a, b, c]) = tabbed_tree();
    tree.set_active(docs, Some(b)).unwrap();
    tree.set_active(docs, Some(c)).unwrap();
    tree.detach(b).unwrap();
    assert_eq!(tree.go_back(docs), Ok(Some(a)));
    assert_tree_ok(&tree, "after navigation");
}

#[test]
fn detaching_active_prefers_history_then_neighbours() {
    let (mut tree, docs, [a, b, c]) = tabbed_tree();
    tree.set_active(docs, Some(c)).unwrap();
    tree.set_active(docs, Some(b)).unwrap();

    // History says c was active before b.
    tree.detach(b).unwrap();
    assert_eq!(tree.active(docs), Some(c));

    // History still remembers a.
    tree.detach(c).unwrap();
    assert_eq!(tree.active(docs), Some(a));

    tree.detach(a).unwrap();
    assert_eq!(tree.active(docs), None);
    assert!(tree.children(docs).is_empty());
    assert_eq!(tree.location(a), Location::Detached);
}

#[test]
fn detaching_inactive_child_keeps_active() {
    let (mut tree, docs, [a, b, _]) = tabbed_tree();
    tree.detach(b).unwrap();
    assert_eq!(tree.active(docs), Some(a));
    let events = tree.drain_events();
    assert_eq!(
        events,
        vec![DockEvent::Removed {
            dockable: b,
            owner: docs
        }]
    );
}

#[test]
fn move_to_reorders_and_reparents() {
    let (mut tree, docs, [a, b, c]) = tabbed_tree();
    let root = tree.root().unwrap();
    let other = tree.create_dock(DockKind::Tool {
        alignment: PinnedAlignment::Left,
    });
    tree.attach(other, root, None).unwrap();

    tree.move_to(c, docs, Some(0)).unwrap();
    assert_eq!(tree.children(docs), &[c, a, b]);

    tree.move_to(a, other, None).unwrap();
    assert_eq!(tree.children(other), &[a]);
    assert_eq!(tree.active(other), Some(a));
    assert_eq!(tree.owner(a), Some(other));
    assert_tree_ok(&tree, "after moves");

    assert!(matches!(
        tree.move_to(root, other, None),
        Err(DockError::TargetInsideSource { .. })
    ));
}

#[test]
fn move_within_validates_indices() {
    let (mut tree, docs, [a, b, c]) = tabbed_tree();
    tree.move_within(docs, 0, 2).unwrap();
    assert_eq!(tree.children(docs), &[b, c, a]);
    assert_eq!(
        tree.move_within(docs, 3, 0),
        Err(DockError::InvalidIndex { index: 3, len: 3 })
    );
}

#[test]
fn focus_activates_the_owner_chain() {
    let mut tree: DockTree<u32> = DockTree::new();
    let root = tree.create_root();
    let split = tree.create_dock(DockKind::Proportional {
        orientation: Orientation::Horizontal,
    });
    tree.attach(split, root, None).unwrap();
    let left = tree.create_dock(DockKind::Tool {
        alignment: PinnedAlignment::Left,
    });
    let splitter = tree.create_splitter(4.0);
    let right = tree.create_dock(DockKind::Document {
        layout: DocumentLayout::Tabbed,
    });
    for id in [left, splitter, right] {
        tree.attach(id, split, None).unwrap();
    }
    let tool = tree.create_tool("tool", 1);
    let doc_a = tree.create_document("a", 2);
    let doc_b = tree.create_document("b", 3);
    tree.attach(tool, left, None).unwrap();
    tree.attach(doc_a, right, None).unwrap();
    tree.attach(doc_b, right, None).unwrap();
    assert_eq!(tree.active(split), Some(left));

    tree.focus(doc_b).unwrap();
    assert_eq!(tree.active(right), Some(doc_b));
    assert_eq!(tree.active(split), Some(right));
    assert_eq!(tree.container(root).unwrap().focused, Some(doc_b));
    assert_eq!(tree.container(right).unwrap().focused, Some(doc_b));
    assert_eq!(tree.top_root_of(doc_b), Some(root));
    assert_tree_ok(&tree, "after focus");
}

#[test]
fn remove_subtree_drops_descendants() {
    let (mut tree, docs, [a, b, c]) = tabbed_tree();
    let removed = tree.remove_subtree(docs).unwrap();
    assert_eq!(removed.len(), 4);
    for id in [docs, a, b, c] {
        assert!(!tree.contains(id));
    }
    assert_tree_ok(&tree, "after removal");
    assert!(tree.remove_subtree(tree.root().unwrap()).is_err());
}

#[test]
fn effective_dock_group_is_inherited() {
    let (mut tree, docs, [a, ..]) = tabbed_tree();
    assert_eq!(tree.effective_dock_group(a), None);
    tree.get_mut(docs).unwrap().dock_group = Some("editors".to_owned());
    assert_eq!(tree.effective_dock_group(a), Some("editors"));
    tree.get_mut(a).unwrap().dock_group = Some("own".to_owned());
    assert_eq!(tree.effective_dock_group(a), Some("own"));
}

#[test]
fn integrity_reports_broken_owner() {
    let (mut tree, docs, [a, ..]) = tabbed_tree();
    tree.get_mut(a).unwrap().owner = None;
    let issues = tree_integrity_issues(&tree);
    assert!(
        issues.iter().any(|line| line.contains("owner=None")),
        "{issues:#?}"
    );

    tree.get_mut(a).unwrap().owner = Some(docs);
    let stray = tree.create_tool("stray", "stray");
    let issues = tree_integrity_issues(&tree);
    assert_eq!(issues.len(), 1, "{issues:#?}");
    assert!(issues[0].contains(&stray.to_string()));
}

#[test]
fn integrity_reports_misplaced_splitters() {
    let mut tree: DockTree<()> = DockTree::new();
    let root = tree.create_root();
    let split = tree.create_dock(DockKind::Proportional {
        orientation: Orientation::Vertical,
    });
    tree.attach(split, root, None).unwrap();
    let s1 = tree.create_splitter(4.0);
    tree.attach(s1, split, None).unwrap();
    let issues = tree_integrity_issues(&tree);
    assert!(issues.iter().any(|l| l.contains("misplaced splitter")), "{issues:#?}");
    assert!(issues.iter().any(|l| l.contains("ends with a splitter")), "{issues:#?}");
    assert_eq!(tree.active(split), None);
}
