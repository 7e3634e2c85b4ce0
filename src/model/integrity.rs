//! Structural self-checks over a [`DockTree`].

use std::hash::{Hash as _, Hasher as _};

use ahash::{HashMap, HashSet};
use itertools::Itertools as _;

use super::{DockTree, DockableId};

/// Returns a human-readable line per broken invariant. Empty means consistent.
///
/// Checked: the main root exists, every listed child exists and is listed exactly once,
/// `owner` matches the listing container, `active` is a non-splitter member, splitters only
/// separate two content children of a proportional dock, and every dockable is reachable from
/// the main root (through visible lists, pinned/hidden lists, or floating windows).
pub fn tree_integrity_issues<C>(tree: &DockTree<C>) -> Vec<String> {
    let mut issues: Vec<String> = Vec::new();

    let Some(root) = tree.root() else {
        if !tree.is_empty() {
            issues.push("integrity: root=None but dockables non-empty".to_owned());
        }
        return issues;
    };

    if tree.get(root).is_none() {
        issues.push(format!("integrity: root {root} missing"));
        return issues;
    }
    if tree.owner(root).is_some() {
        issues.push(format!("integrity: main root {root} has an owner"));
    }

    let mut visited: HashSet<DockableId> = HashSet::default();
    let mut listed_by: HashMap<DockableId, DockableId> = HashMap::default();
    let mut stack: Vec<DockableId> = vec![root];
    for window in tree.windows() {
        stack.push(window.layout);
        if tree.owner(window.layout).is_some() {
            issues.push(format!(
                "integrity: window {} layout {} has an owner",
                window.id, window.layout
            ));
        }
    }

    while let Some(id) = stack.pop() {
        if !visited.insert(id) {
            continue;
        }

        let Some(dockable) = tree.get(id) else {
            issues.push(format!("integrity: missing dockable {id} (reachable)"));
            continue;
        };
        let Some(container) = dockable.container() else {
            continue;
        };

        if let Some(active) = container.active {
            if !container.visible.contains(&active) {
                issues.push(format!(
                    "integrity: dock {id} active {active} not in visible={:?}",
                    container.visible
                ));
            }
            if tree.get(active).is_some_and(|d| d.is_splitter()) {
                issues.push(format!("integrity: dock {id} active {active} is a splitter"));
            }
        }

        check_splitters(tree, id, &container.visible, &mut issues);

        let mut members = container.visible.clone();
        if let Some(state) = container.root_state() {
            members.extend(state.pinned.iter());
            members.extend(state.hidden.iter().copied());
            if let Some(preview) = state.pinned_preview {
                if state.pinned.alignment_of(preview).is_none() {
                    issues.push(format!(
                        "integrity: root {id} previews {preview} which is not pinned"
                    ));
                }
            }
        }

        let mut local: HashSet<DockableId> = HashSet::default();
        for &child in &members {
            if !local.insert(child) {
                issues.push(format!("integrity: dock {id} lists {child} twice"));
                continue;
            }
            let Some(child_dockable) = tree.get(child) else {
                issues.push(format!("integrity: dock {id} references missing child {child}"));
                continue;
            };
            if child_dockable.owner != Some(id) {
                issues.push(format!(
                    "integrity: child {child} listed by {id} but owner={:?}",
                    child_dockable.owner
                ));
            }
            if let Some(previous) = listed_by.insert(child, id) {
                issues.push(format!(
                    "integrity: child {child} listed by both {previous} and {id}"
                ));
            }
            stack.push(child);
        }
    }

    if visited.len() != tree.len() {
        let unreachable: Vec<DockableId> = tree.ids().filter(|id| !visited.contains(id)).collect();
        issues.push(format!(
            "integrity: unreachable dockables {} of {}: {}",
            unreachable.len(),
            tree.len(),
            unreachable.iter().join(", ")
        ));
    }

    issues
}

fn check_splitters<C>(
    tree: &DockTree<C>,
    dock: DockableId,
    visible: &[DockableId],
    issues: &mut Vec<String>,
) {
    let is_splitter =
        |id: &DockableId| tree.get(*id).is_some_and(|d| d.is_splitter());
    let proportional = tree
        .container(dock)
        .is_some_and(|c| c.kind.proportional_orientation().is_some());

    if !proportional {
        if let Some(splitter) = visible.iter().find(|id| is_splitter(id)) {
            issues.push(format!(
                "integrity: non-proportional dock {dock} holds splitter {splitter}"
            ));
        }
        return;
    }

    let mut previous_was_splitter = true;
    for id in visible {
        let splitter = is_splitter(id);
        if splitter && previous_was_splitter {
            issues.push(format!("integrity: dock {dock} has a misplaced splitter {id}"));
        }
        previous_was_splitter = splitter;
    }
    if previous_was_splitter && !visible.is_empty() {
        issues.push(format!("integrity: dock {dock} ends with a splitter"));
    }
}

/// Stable fingerprint of an issue list, used to avoid repeating identical warnings.
pub fn hash_issues(lines: &[String]) -> u64 {
    let mut hasher = ahash::AHasher::default();
    for line in lines {
        line.hash(&mut hasher);
    }
    hasher.finish()
}
