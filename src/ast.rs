use serde::{Deserialize, Serialize};

/// Marker emitted by [`Tree::decompile`] for a composite node that ended up
/// with no children.
pub const MALFORMED_MARKER: &str = "<malformed>";

/// Index of a node inside its [`Tree`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    /// Ordered group; children expand in sequence.
    Section,
    /// Branching group; children are visited round-robin across expansions.
    Alternation,
    /// Leaf token carrying the whole token text as its information.
    Atomic,
}

/// One node of the parsed notation tree.
///
/// For `Atomic` nodes `information` is the entire token text; for composite
/// nodes it is only the trailing annotation after the closing bracket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub kind: NodeKind,
    pub information: String,
    pub children: Vec<NodeId>,
    pub parent: Option<NodeId>,
}

/// Arena-backed notation tree.
///
/// Children own their subtrees through child indices; the parent index is a
/// lookup link only, used for ancestor-chain traversal. The tree is built by
/// the section parser and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Tree {
    pub fn new() -> Self {
        Tree {
            nodes: Vec::new(),
            root: NodeId(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub(crate) fn set_root(&mut self, id: NodeId) {
        self.root = id;
    }

    /// Allocate a detached node with empty information.
    pub fn add_node(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            information: String::new(),
            children: Vec::new(),
            parent: None,
        });
        id
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    /// Append `child` to `parent`'s children and point it back at `parent`.
    pub fn attach(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    /// Reconstruct notation text for the subtree under `id`, as the tree was
    /// interpreted rather than as originally written: implicit groupings come
    /// back out as explicit parenthesized sections.
    pub fn decompile(&self, id: NodeId) -> String {
        let node = self.node(id);
        match node.kind {
            NodeKind::Atomic => node.information.clone(),
            NodeKind::Section | NodeKind::Alternation => {
                if node.children.is_empty() {
                    return MALFORMED_MARKER.to_string();
                }
                let separator = match node.kind {
                    NodeKind::Section => " ",
                    _ => " / ",
                };
                let inner: Vec<String> =
                    node.children.iter().map(|c| self.decompile(*c)).collect();
                format!("({}){}", inner.join(separator), node.information)
            }
        }
    }

    /// Node ids from `id` up to the root, self first, root last. The root's
    /// own chain has length 1.
    pub fn ancestor_chain(&self, id: NodeId) -> Vec<NodeId> {
        let mut chain = vec![id];
        let mut current = id;
        while let Some(parent) = self.node(current).parent {
            chain.push(parent);
            current = parent;
        }
        chain
    }

    /// Information strings along the ancestor chain, self first, root last.
    pub fn information_chain(&self, id: NodeId) -> Vec<String> {
        self.ancestor_chain(id)
            .iter()
            .map(|n| self.node(*n).information.clone())
            .collect()
    }
}

impl Default for Tree {
    fn default() -> Self {
        Tree::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attach_sets_parent() {
        let mut tree = Tree::new();
        let root = tree.add_node(NodeKind::Section);
        let child = tree.add_node(NodeKind::Atomic);
        tree.attach(root, child);

        assert_eq!(tree.node(child).parent, Some(root));
        assert_eq!(tree.node(root).children, vec![child]);
    }

    #[test]
    fn test_decompile_section_and_alternation() {
        let mut tree = Tree::new();
        let root = tree.add_node(NodeKind::Section);
        let a = tree.add_node(NodeKind::Atomic);
        tree.node_mut(a).information = "a4".into();
        let alt = tree.add_node(NodeKind::Alternation);
        tree.node_mut(alt).information = "*2".into();
        let b = tree.add_node(NodeKind::Atomic);
        tree.node_mut(b).information = "b".into();
        let c = tree.add_node(NodeKind::Atomic);
        tree.node_mut(c).information = "c".into();
        tree.attach(root, a);
        tree.attach(root, alt);
        tree.attach(alt, b);
        tree.attach(alt, c);

        assert_eq!(tree.decompile(root), "(a4 (b / c)*2)");
    }

    #[test]
    fn test_decompile_empty_composite_is_marked() {
        let mut tree = Tree::new();
        let root = tree.add_node(NodeKind::Section);
        assert_eq!(tree.decompile(root), MALFORMED_MARKER);
    }

    #[test]
    fn test_ancestor_chain_root_last() {
        let mut tree = Tree::new();
        let root = tree.add_node(NodeKind::Section);
        let mid = tree.add_node(NodeKind::Section);
        tree.node_mut(mid).information = "b".into();
        let leaf = tree.add_node(NodeKind::Atomic);
        tree.node_mut(leaf).information = "0a".into();
        tree.attach(root, mid);
        tree.attach(mid, leaf);

        assert_eq!(tree.ancestor_chain(leaf), vec![leaf, mid, root]);
        assert_eq!(tree.information_chain(leaf), vec!["0a", "b", ""]);
        assert_eq!(tree.ancestor_chain(root).len(), 1);
    }
}
