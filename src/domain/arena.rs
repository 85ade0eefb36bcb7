//! Arena-backed CoRIx tree.

use std::collections::HashMap;
use std::fmt;

use generational_arena::{Arena, Index};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::domain::aggregation::LEAF_LEVEL;
use crate::domain::snapshot::{NodeRecord, TreeSnapshot};
use crate::domain::table::ScoreRecord;

/// Leaf-level assessment record reachable from a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContributingItem {
    pub item_id: String,
    pub description: String,
    pub score: f64,
}

impl ContributingItem {
    pub fn for_construct(construct: &str, score: f64) -> Self {
        Self {
            item_id: construct.to_string(),
            description: format!("Assessment for {}", construct),
            score,
        }
    }
}

/// Data payload for tree nodes representing one construct.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeData {
    /// Construct name, also the node identity
    pub construct: String,
    /// Display label
    pub name: String,
    pub level: u32,
    /// Raw input score until aggregation settles it
    pub score: f64,
}

impl From<ScoreRecord> for NodeData {
    fn from(record: ScoreRecord) -> Self {
        Self {
            name: record.construct.clone(),
            construct: record.construct,
            level: record.level,
            score: record.score,
        }
    }
}

impl NodeData {
    pub fn is_leaf_level(&self) -> bool {
        self.level == LEAF_LEVEL
    }
}

impl fmt::Display for NodeData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.construct)
    }
}

/// Tree node in the arena-based hierarchy structure.
#[derive(Debug)]
pub struct TreeNode {
    pub data: NodeData,
    /// Index of parent node in the arena, None for root candidates
    pub parent: Option<Index>,
    /// Indices of child nodes, sorted by construct once linking is done
    pub children: Vec<Index>,
    /// Deduplicated, item-id sorted leaf records reachable from this node
    pub contributing_items: Vec<ContributingItem>,
}

impl TreeNode {
    pub fn id(&self) -> &str {
        &self.data.construct
    }
}

/// Arena-based tree holding every construct of one application/scenario query.
///
/// Nodes are looked up by construct name in O(1). A tree without a root is the
/// explicit empty result.
#[derive(Debug, Default)]
pub struct CorixTree {
    arena: Arena<TreeNode>,
    root: Option<Index>,
    by_construct: HashMap<String, Index>,
}

impl CorixTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an unlinked node. Returns `None` if the construct already exists.
    #[instrument(level = "trace", skip(self))]
    pub fn insert_node(&mut self, data: NodeData) -> Option<Index> {
        if self.by_construct.contains_key(&data.construct) {
            return None;
        }
        let construct = data.construct.clone();
        let idx = self.arena.insert(TreeNode {
            data,
            parent: None,
            children: Vec::new(),
            contributing_items: Vec::new(),
        });
        self.by_construct.insert(construct, idx);
        Some(idx)
    }

    /// Attach `child` under `parent`.
    #[instrument(level = "trace", skip(self))]
    pub fn link(&mut self, child: Index, parent: Index) {
        if let Some(node) = self.arena.get_mut(child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.arena.get_mut(parent) {
            node.children.push(child);
        }
    }

    pub fn set_root(&mut self, idx: Index) {
        self.root = Some(idx);
    }

    /// Order every node's children by construct name.
    pub fn sort_children(&mut self) {
        let indices: Vec<Index> = self.arena.iter().map(|(idx, _)| idx).collect();
        for idx in indices {
            let mut children = match self.arena.get_mut(idx) {
                Some(node) => std::mem::take(&mut node.children),
                None => continue,
            };
            children.sort_by(|a, b| {
                let a = self.arena.get(*a).map(TreeNode::id);
                let b = self.arena.get(*b).map(TreeNode::id);
                a.cmp(&b)
            });
            if let Some(node) = self.arena.get_mut(idx) {
                node.children = children;
            }
        }
    }

    pub fn get_node(&self, idx: Index) -> Option<&TreeNode> {
        self.arena.get(idx)
    }

    pub fn get_node_mut(&mut self, idx: Index) -> Option<&mut TreeNode> {
        self.arena.get_mut(idx)
    }

    pub fn find(&self, construct: &str) -> Option<Index> {
        self.by_construct.get(construct).copied()
    }

    /// Node for `construct`, if present.
    pub fn node(&self, construct: &str) -> Option<&TreeNode> {
        self.find(construct).and_then(|idx| self.get_node(idx))
    }

    /// Score of `construct`, if present.
    pub fn score(&self, construct: &str) -> Option<f64> {
        self.node(construct).map(|n| n.data.score)
    }

    pub fn root(&self) -> Option<Index> {
        self.root
    }

    pub fn root_node(&self) -> Option<&TreeNode> {
        self.root.and_then(|idx| self.get_node(idx))
    }

    pub fn children_of(&self, idx: Index) -> impl Iterator<Item = &TreeNode> {
        self.arena
            .get(idx)
            .into_iter()
            .flat_map(|node| node.children.iter())
            .filter_map(|child| self.arena.get(*child))
    }

    /// All nodes in arena order, reachable or not.
    pub fn nodes(&self) -> impl Iterator<Item = (Index, &TreeNode)> {
        self.arena.iter()
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    /// True when no root was found; this is the explicit "nothing to display" result.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn iter(&self) -> TreeIterator<'_> {
        TreeIterator::new(self)
    }

    pub fn iter_postorder(&self) -> PostOrderIterator<'_> {
        PostOrderIterator::new(self)
    }

    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        if let Some(root) = self.root {
            self.calculate_depth(root)
        } else {
            0
        }
    }

    fn calculate_depth(&self, node_idx: Index) -> usize {
        if let Some(node) = self.get_node(node_idx) {
            1 + node
                .children
                .iter()
                .map(|&child| self.calculate_depth(child))
                .max()
                .unwrap_or(0)
        } else {
            0
        }
    }

    /// Constructs of all reachable nodes without children.
    pub fn leaf_nodes(&self) -> Vec<String> {
        self.iter()
            .filter(|(_, node)| node.children.is_empty())
            .map(|(_, node)| node.data.construct.clone())
            .collect()
    }

    /// Flat id-keyed view handed to read-only consumers.
    ///
    /// Only nodes reachable from the root are included; orphans left in the
    /// arena were never scored.
    pub fn snapshot(&self) -> TreeSnapshot {
        let root = self.root_node().map(|n| n.data.construct.clone());
        if root.is_none() {
            return TreeSnapshot::default();
        }
        let nodes = self
            .iter()
            .map(|(_, node)| {
                let record = NodeRecord {
                    id: Some(node.data.construct.clone()),
                    name: Some(node.data.name.clone()),
                    construct: Some(node.data.construct.clone()),
                    level: Some(node.data.level),
                    score: (!node.data.score.is_nan()).then_some(node.data.score),
                    parent: node
                        .parent
                        .and_then(|p| self.get_node(p))
                        .map(|p| p.data.construct.clone()),
                    children: self
                        .children_of_node(node)
                        .map(|c| c.data.construct.clone())
                        .collect(),
                    contributing_items: node.contributing_items.clone(),
                };
                (node.data.construct.clone(), record)
            })
            .collect();
        TreeSnapshot { root, nodes }
    }

    fn children_of_node<'a>(&'a self, node: &'a TreeNode) -> impl Iterator<Item = &'a TreeNode> {
        node.children.iter().filter_map(|c| self.arena.get(*c))
    }
}

/// Pre-order traversal from the root, children left to right.
pub struct TreeIterator<'a> {
    tree: &'a CorixTree,
    stack: Vec<Index>,
}

impl<'a> TreeIterator<'a> {
    fn new(tree: &'a CorixTree) -> Self {
        let mut stack = Vec::new();
        if let Some(root) = tree.root() {
            stack.push(root);
        }
        Self { tree, stack }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.tree.get_node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some((current_idx, node));
            }
        }
        None
    }
}

/// Post-order traversal: every node is yielded after all of its descendants.
pub struct PostOrderIterator<'a> {
    tree: &'a CorixTree,
    stack: Vec<(Index, bool)>,
}

impl<'a> PostOrderIterator<'a> {
    fn new(tree: &'a CorixTree) -> Self {
        let mut stack = Vec::new();
        if let Some(root) = tree.root() {
            stack.push((root, false));
        }
        Self { tree, stack }
    }
}

impl<'a> Iterator for PostOrderIterator<'a> {
    type Item = (Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current_idx, visited)) = self.stack.pop() {
            if let Some(node) = self.tree.get_node(current_idx) {
                if !visited {
                    self.stack.push((current_idx, true));
                    for &child in node.children.iter().rev() {
                        self.stack.push((child, false));
                    }
                } else {
                    return Some((current_idx, node));
                }
            }
        }
        None
    }
}
