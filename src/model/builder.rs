use std::collections::BTreeMap;

use super::{DockKind, DockTree, DockableId, DocumentLayout, Orientation, PinnedAlignment};

/// Split direction with Dear ImGui `DockBuilder::SplitNode`-like semantics.
///
/// The direction indicates where the *side* node is placed relative to the *main* node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SplitDirection {
    Left,
    Right,
    Up,
    Down,
}

impl SplitDirection {
    fn orientation(self) -> Orientation {
        match self {
            Self::Left | Self::Right => Orientation::Horizontal,
            Self::Up | Self::Down => Orientation::Vertical,
        }
    }

    /// Edge a tool dock created on this side pins to.
    fn alignment(self) -> PinnedAlignment {
        match self {
            Self::Left => PinnedAlignment::Left,
            Self::Right => PinnedAlignment::Right,
            Self::Up => PinnedAlignment::Top,
            Self::Down => PinnedAlignment::Bottom,
        }
    }
}

/// A logical node id used by [`DockBuilder`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DockNodeId(u64);

#[derive(Clone, Debug)]
enum Leaf<C> {
    Tool(String, C),
    Document(String, C),
}

#[derive(Clone, Debug)]
enum Node<C> {
    Tools {
        alignment: PinnedAlignment,
        items: Vec<Leaf<C>>,
    },
    Documents {
        layout: DocumentLayout,
        items: Vec<Leaf<C>>,
    },
    Split {
        dir: SplitDirection,
        side_fraction: f64,
        main: DockNodeId,
        side: DockNodeId,
    },
}

/// Scripted layout construction: create tabbed nodes, split them, put tools and documents
/// into leaf nodes, then [`Self::finish`] into a [`DockTree`].
///
/// Leaf nodes may stay empty. They become empty tool/document docks, useful as reserved areas.
pub struct DockBuilder<C> {
    next_node_id: u64,
    nodes: BTreeMap<DockNodeId, Node<C>>,
    splitter_thickness: f32,
}

impl<C> Default for DockBuilder<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> DockBuilder<C> {
    pub fn new() -> Self {
        Self {
            next_node_id: 1,
            nodes: BTreeMap::new(),
            splitter_thickness: crate::DockOptions::default().splitter_thickness,
        }
    }

    #[must_use]
    pub fn with_splitter_thickness(mut self, thickness: f32) -> Self {
        self.splitter_thickness = thickness;
        self
    }

    fn alloc_node_id(&mut self) -> DockNodeId {
        let id = DockNodeId(self.next_node_id);
        self.next_node_id = self.next_node_id.saturating_add(1);
        id
    }

    /// Create an empty tool dock node.
    #[must_use]
    pub fn add_tool_dock(&mut self, alignment: PinnedAlignment) -> DockNodeId {
        let id = self.alloc_node_id();
        self.nodes.insert(
            id,
            Node::Tools {
                alignment,
                items: Vec::new(),
            },
        );
        id
    }

    /// Create an empty document dock node.
    #[must_use]
    pub fn add_document_dock(&mut self, layout: DocumentLayout) -> DockNodeId {
        let id = self.alloc_node_id();
        self.nodes.insert(
            id,
            Node::Documents {
                layout,
                items: Vec::new(),
            },
        );
        id
    }

    /// Split an existing node and return `(side, main)` (Dear ImGui semantics).
    ///
    /// `node` itself becomes the split, its previous content moves into `main`, and `side` is a
    /// new empty tool dock aligned to `dir`.
    #[must_use]
    pub fn split(
        &mut self,
        node: DockNodeId,
        dir: SplitDirection,
        side_fraction: f64,
    ) -> (DockNodeId, DockNodeId) {
        debug_assert!(
            (0.0..=1.0).contains(&side_fraction),
            "side_fraction must be in 0.0..=1.0"
        );

        let old = self.nodes.remove(&node).unwrap_or(Node::Documents {
            layout: DocumentLayout::Tabbed,
            items: Vec::new(),
        });
        let main = self.alloc_node_id();
        self.nodes.insert(main, old);

        let side = self.add_tool_dock(dir.alignment());

        self.nodes.insert(
            node,
            Node::Split {
                dir,
                side_fraction,
                main,
                side,
            },
        );

        (side, main)
    }

    /// Add a tool tab to a leaf node.
    ///
    /// # Panics
    /// If `node` is missing or was split.
    pub fn tool(&mut self, node: DockNodeId, title: impl Into<String>, context: C) {
        self.push_leaf(node, Leaf::Tool(title.into(), context));
    }

    /// Add a document tab to a leaf node.
    ///
    /// # Panics
    /// If `node` is missing or was split.
    pub fn document(&mut self, node: DockNodeId, title: impl Into<String>, context: C) {
        self.push_leaf(node, Leaf::Document(title.into(), context));
    }

    fn push_leaf(&mut self, node: DockNodeId, leaf: Leaf<C>) {
        match self.nodes.get_mut(&node) {
            Some(Node::Tools { items, .. } | Node::Documents { items, .. }) => items.push(leaf),
            Some(Node::Split { .. }) => {
                panic!("DockBuilder: node {node:?} is not a leaf node");
            }
            None => {
                panic!("DockBuilder: node {node:?} does not exist");
            }
        }
    }

    /// Finish building: a fresh tree whose main root holds `root`.
    pub fn finish(self, root: DockNodeId) -> DockTree<C> {
        self.finish_map(root, Some)
    }

    /// Like [`Self::finish`], mapping contexts along the way.
    ///
    /// Returning `None` drops that tool or document from the output tree.
    pub fn finish_map<Out>(
        self,
        root: DockNodeId,
        mut map: impl FnMut(C) -> Option<Out>,
    ) -> DockTree<Out> {
        let mut nodes = self.nodes;
        let mut tree = DockTree::new();
        let main_root = tree.create_root();
        let content = build_node(
            root,
            &mut nodes,
            &mut tree,
            &mut map,
            self.splitter_thickness,
        );
        tree.attach_unchecked(content, main_root, None);
        tree.drain_events();
        tree
    }
}

fn build_node<C, Out>(
    node_id: DockNodeId,
    nodes: &mut BTreeMap<DockNodeId, Node<C>>,
    tree: &mut DockTree<Out>,
    map: &mut impl FnMut(C) -> Option<Out>,
    splitter_thickness: f32,
) -> DockableId {
    let (kind, items) = match nodes.remove(&node_id) {
        Some(Node::Tools { alignment, items }) => (DockKind::Tool { alignment }, items),
        Some(Node::Documents { layout, items }) => (DockKind::Document { layout }, items),
        Some(Node::Split {
            dir,
            side_fraction,
            main,
            side,
        }) => {
            let main_dock = build_node(main, nodes, tree, map, splitter_thickness);
            let side_dock = build_node(side, nodes, tree, map, splitter_thickness);

            let (first, second, first_fraction) = match dir {
                SplitDirection::Left | SplitDirection::Up => (side_dock, main_dock, side_fraction),
                SplitDirection::Right | SplitDirection::Down => {
                    (main_dock, side_dock, 1.0 - side_fraction)
                }
            };

            let split = tree.create_dock(DockKind::Proportional {
                orientation: dir.orientation(),
            });
            let splitter = tree.create_splitter(splitter_thickness);
            for child in [first, splitter, second] {
                tree.attach_unchecked(child, split, None);
            }
            set_proportion(tree, first, first_fraction);
            set_proportion(tree, second, 1.0 - first_fraction);
            return split;
        }
        None => (
            DockKind::Document {
                layout: DocumentLayout::Tabbed,
            },
            Vec::new(),
        ),
    };

    let dock = tree.create_dock(kind);
    for item in items {
        let leaf = match item {
            Leaf::Tool(title, context) => map(context).map(|c| tree.create_tool(title, c)),
            Leaf::Document(title, context) => map(context).map(|c| tree.create_document(title, c)),
        };
        if let Some(leaf) = leaf {
            tree.attach_unchecked(leaf, dock, None);
        }
    }
    dock
}

fn set_proportion<C>(tree: &mut DockTree<C>, id: DockableId, proportion: f64) {
    if let Some(dockable) = tree.get_mut(id) {
        dockable.proportion = proportion;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::integrity::tree_integrity_issues;

    #[test]
    fn split_node_semantics_match_imgui() {
        let mut b = DockBuilder::new();
        let dockspace = b.add_document_dock(DocumentLayout::Tabbed);

        let (right, main) = b.split(dockspace, SplitDirection::Right, 0.25);
        b.document(main, "main.rs", 1u8);
        b.tool(right, "Outline", 2u8);

        let tree = b.finish(dockspace);
        assert!(tree_integrity_issues(&tree).is_empty());

        let root = tree.root().unwrap();
        let split = tree.children(root)[0];
        assert_eq!(
            tree.container(split).unwrap().kind,
            DockKind::Proportional {
                orientation: Orientation::Horizontal
            }
        );

        // Right split: main is first (left), side is second (right).
        let children = tree.children(split);
        assert_eq!(children.len(), 3);
        assert!(tree.get(children[1]).unwrap().is_splitter());
        assert_eq!(
            tree.container(children[0]).unwrap().kind,
            DockKind::Document {
                layout: DocumentLayout::Tabbed
            }
        );
        assert_eq!(
            tree.container(children[2]).unwrap().kind,
            DockKind::Tool {
                alignment: PinnedAlignment::Right
            }
        );
        assert!((tree.get(children[0]).unwrap().proportion - 0.75).abs() < 1e-12);
        assert!((tree.get(children[2]).unwrap().proportion - 0.25).abs() < 1e-12);
        assert!(tree.events().is_empty());
    }

    #[test]
    fn finish_map_drops_filtered_items() {
        let mut b = DockBuilder::new();
        let tools = b.add_tool_dock(PinnedAlignment::Left);
        b.tool(tools, "kept", 1u32);
        b.tool(tools, "dropped", 2u32);

        let tree = b.finish_map(tools, |c| (c != 2).then(|| format!("ctx{c}")));
        let root = tree.root().unwrap();
        let dock = tree.children(root)[0];
        assert_eq!(tree.children(dock).len(), 1);
        let kept = tree.get(tree.children(dock)[0]).unwrap();
        assert_eq!(kept.context.as_deref(), Some("ctx1"));
        assert_eq!(tree.active(dock), Some(kept.id));
    }

    #[test]
    #[should_panic = "is not a leaf node"]
    fn docking_into_a_split_node_panics() {
        let mut b = DockBuilder::new();
        let dockspace = b.add_document_dock(DocumentLayout::Tabbed);
        let (_side, _main) = b.split(dockspace, SplitDirection::Left, 0.5);
        b.tool(dockspace, "x", 1u8);
    }
}
