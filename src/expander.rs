use std::collections::HashMap;

use crate::ast::{NodeId, NodeKind, Tree};
use crate::error::Result;
use crate::information::divide_information;

/// Flattens a notation tree into the ordered sequence of atomic nodes it
/// denotes, cycling alternation branches and applying repetition counts.
///
/// Visit counts ("ticks") are kept in a side table keyed by node id, owned
/// by this expander. One expander serves one tree for one expansion;
/// independent trees with independent expanders share nothing.
pub struct TreeExpander<'a> {
    tree: &'a Tree,
    ticks: HashMap<NodeId, usize>,
}

impl<'a> TreeExpander<'a> {
    pub fn new(tree: &'a Tree) -> Self {
        TreeExpander {
            tree,
            ticks: HashMap::new(),
        }
    }

    /// Expand the whole tree. Every reachable alternation branch is visited
    /// at least once; nesting multiplies the number of passes required.
    pub fn expand(&mut self) -> Result<Vec<NodeId>> {
        let root = self.tree.root();
        match self.tree.node(root).kind {
            NodeKind::Alternation => {
                // A bare alternation root gets the same pass loop an
                // enclosing section with repeat factor 1 would drive it
                // through, so every branch cycle is reached.
                let mut sequence = Vec::new();
                loop {
                    let repeat = self.repeat_of(root)?;
                    sequence.extend(self.expand_once(root, repeat)?);
                    if self.fully_satisfied(root) {
                        break;
                    }
                }
                Ok(sequence)
            }
            _ => self.expand_once(root, 1),
        }
    }

    /// Repetition count from the node's own annotation.
    fn repeat_of(&self, id: NodeId) -> Result<usize> {
        let node = self.tree.node(id);
        Ok(divide_information(node.kind, &node.information)?.repetition)
    }

    fn tick(&mut self, id: NodeId) {
        *self.ticks.entry(id).or_insert(0) += 1;
    }

    fn ticks(&self, id: NodeId) -> usize {
        self.ticks.get(&id).copied().unwrap_or(0)
    }

    /// How many visits a node needs before its branches are exhausted: an
    /// alternation must be entered once per branch, times the deepest
    /// requirement among its branches; everything else needs one.
    fn required_ticks(&self, id: NodeId) -> usize {
        let node = self.tree.node(id);
        match node.kind {
            NodeKind::Alternation => {
                let deepest = node
                    .children
                    .iter()
                    .map(|c| self.required_ticks(*c))
                    .max()
                    .unwrap_or(0);
                node.children.len() * deepest.max(1)
            }
            _ => 1,
        }
    }

    fn fully_satisfied(&self, id: NodeId) -> bool {
        self.ticks(id) >= self.required_ticks(id)
            && self
                .tree
                .node(id)
                .children
                .iter()
                .all(|c| self.fully_satisfied(*c))
    }

    fn expand_once(&mut self, id: NodeId, repeat: usize) -> Result<Vec<NodeId>> {
        let node = self.tree.node(id);
        match node.kind {
            NodeKind::Atomic => {
                self.tick(id);
                Ok(vec![id; repeat])
            }
            NodeKind::Section => {
                // Pass over the children until every nested alternation has
                // cycled through all its branches; only then is the repeat
                // factor applied, to the fully resolved sequence as a whole.
                let mut passes = Vec::new();
                loop {
                    self.tick(id);
                    for child in &node.children {
                        let child_repeat = self.repeat_of(*child)?;
                        passes.extend(self.expand_once(*child, child_repeat)?);
                    }
                    if self.fully_satisfied(id) {
                        break;
                    }
                }

                let mut sequence = Vec::with_capacity(passes.len() * repeat);
                for _ in 0..repeat {
                    sequence.extend_from_slice(&passes);
                }
                Ok(sequence)
            }
            NodeKind::Alternation => {
                // Branches rotate on the cumulative tick count, so repeated
                // invocations continue the cycle instead of restarting it.
                let mut sequence = Vec::new();
                for _ in 0..repeat {
                    let branch = node.children[self.ticks(id) % node.children.len()];
                    self.tick(id);
                    let branch_repeat = self.repeat_of(branch)?;
                    sequence.extend(self.expand_once(branch, branch_repeat)?);
                }
                Ok(sequence)
            }
        }
    }
}
