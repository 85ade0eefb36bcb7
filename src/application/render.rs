//! Text rendering of a CoRIx tree.

use generational_arena::Index;
use termtree::Tree;

use crate::domain::{CorixTree, TreeNode};

/// Placeholder shown for scores that are not a number.
pub const SCORE_PLACEHOLDER: &str = "n/a";

/// Format a score with two decimals, NaN as a placeholder.
pub fn format_score(score: f64) -> String {
    if score.is_nan() {
        SCORE_PLACEHOLDER.to_string()
    } else {
        format!("{:.2}", score)
    }
}

pub trait TreeRender {
    /// Render from the root down to nodes at `max_level` inclusive.
    fn to_tree_string(&self, max_level: u32) -> Tree<String>;
}

fn label(node: &TreeNode) -> String {
    format!(
        "{} [L{}] {}",
        node.data.name,
        node.data.level,
        format_score(node.data.score)
    )
}

impl TreeRender for CorixTree {
    fn to_tree_string(&self, max_level: u32) -> Tree<String> {
        fn build_tree(tree: &CorixTree, node_idx: Index, max_level: u32, parent_tree: &mut Tree<String>) {
            if let Some(node) = tree.get_node(node_idx) {
                for &child_idx in &node.children {
                    if let Some(child) = tree.get_node(child_idx) {
                        if child.data.level > max_level {
                            continue;
                        }
                        let mut child_tree = Tree::new(label(child));
                        build_tree(tree, child_idx, max_level, &mut child_tree);
                        parent_tree.push(child_tree);
                    }
                }
            }
        }

        match self.root().and_then(|idx| self.get_node(idx).map(|n| (idx, n))) {
            Some((root_idx, root)) => {
                let mut tree = Tree::new(label(root));
                build_tree(self, root_idx, max_level, &mut tree);
                tree
            }
            None => Tree::new("Empty tree".to_string()),
        }
    }
}
