use std::collections::VecDeque;

use crate::model::integrity;
use crate::model::{DockTree, DockableId};

/// Small ring buffer of drag/drop decisions, for copy-paste debugging.
#[derive(Clone, Debug, Default)]
pub struct DebugEventLog {
    lines: VecDeque<String>,
    counter: u64,
    last_integrity_hash: Option<u64>,
}

impl DebugEventLog {
    /// Appends one line, dropping the oldest beyond `capacity` (clamped to `1..=10_000`).
    pub fn push(&mut self, capacity: usize, message: impl Into<String>) {
        let cap = capacity.clamp(1, 10_000);
        while self.lines.len() >= cap {
            self.lines.pop_front();
        }
        self.counter = self.counter.saturating_add(1);
        self.lines
            .push_back(format!("[event {}] {}", self.counter, message.into()));
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> + '_ {
        self.lines.iter().map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn text(&self) -> String {
        self.lines.iter().map(String::as_str).collect::<Vec<_>>().join("\n")
    }

    /// Runs the integrity checker and logs changes in its outcome.
    ///
    /// Returns the issues found. Identical consecutive results are only logged once.
    pub(crate) fn check_integrity<C>(&mut self, capacity: usize, tree: &DockTree<C>) -> Vec<String> {
        let issues = integrity::tree_integrity_issues(tree);
        let hash = integrity::hash_issues(&issues);
        let prev = self.last_integrity_hash.replace(hash);
        if prev == Some(hash) {
            return issues;
        }

        if issues.is_empty() {
            if prev.is_some() {
                self.push(capacity, "integrity OK");
            }
            return issues;
        }

        log::warn!("dock tree integrity failure: {} issue(s)", issues.len());
        self.push(capacity, format!("integrity FAIL issues={}", issues.len()));
        for issue in &issues {
            log::warn!("{issue}");
            self.push(capacity, issue.clone());
        }
        self.push(
            capacity,
            format!("integrity tree_summary:\n{}", tree_summary(tree, 48)),
        );
        issues
    }
}

/// One line per reachable dockable, depth first from the main root.
pub fn tree_summary<C>(tree: &DockTree<C>, max_nodes: usize) -> String {
    let Some(root) = tree.root() else {
        return "root=None".to_owned();
    };

    let mut seen: Vec<DockableId> = Vec::new();
    let mut stack: Vec<(DockableId, usize)> = vec![(root, 0)];
    stack.extend(tree.windows().iter().rev().map(|w| (w.layout, 0)));
    let mut lines: Vec<String> = Vec::new();

    while let Some((id, depth)) = stack.pop() {
        if seen.contains(&id) {
            continue;
        }
        seen.push(id);
        let indent = "  ".repeat(depth);

        let Some(dockable) = tree.get(id) else {
            lines.push(format!("{indent}{id} MISSING"));
            continue;
        };

        match dockable.container() {
            None => lines.push(format!(
                "{indent}{id} {:?} {:?} p={:.3}",
                dockable.kind, dockable.title, dockable.proportion
            )),
            Some(container) => {
                let kind = match &container.kind {
                    crate::model::DockKind::Root(_) => "Root".to_owned(),
                    other => format!("{other:?}"),
                };
                lines.push(format!(
                    "{indent}{id} {kind} active={:?} p={:.3}",
                    container.active.map(|a| a.to_string()),
                    dockable.proportion
                ));
                stack.extend(container.visible.iter().rev().map(|&c| (c, depth + 1)));
            }
        }

        if lines.len() >= max_nodes {
            break;
        }
    }

    format!(
        "root={root} reachable={} total={}\n{}",
        seen.len(),
        tree.len(),
        lines.join("\n")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ring_buffer_drops_oldest() {
        let mut log = DebugEventLog::default();
        for i in 0..5 {
            log.push(3, format!("line {i}"));
        }
        assert_eq!(log.len(), 3);
        assert_eq!(log.text(), "[event 3] line 2\n[event 4] line 3\n[event 5] line 4");

        log.push(0, "capacity clamps to one");
        assert_eq!(log.len(), 1);

        log.clear();
        assert!(log.is_empty());
    }

    #[test]
    fn integrity_result_is_logged_once() {
        let mut tree: DockTree<()> = DockTree::new();
        let root = tree.create_root();
        let stray = tree.create_tool("stray", ());
        let mut log = DebugEventLog::default();

        let issues = log.check_integrity(100, &tree);
        assert_eq!(issues.len(), 1);
        let logged = log.len();
        assert!(logged >= 3);

        log.check_integrity(100, &tree);
        assert_eq!(log.len(), logged);

        tree.attach(stray, root, None).unwrap();
        assert!(log.check_integrity(100, &tree).is_empty());
        assert!(log.text().ends_with("integrity OK"));
    }
}
