//! Tree builder: flat score table → linked, fully scored CoRIx tree.

use std::collections::HashSet;
use std::sync::Arc;

use generational_arena::Index;
use itertools::Itertools;
use tracing::{debug, instrument, trace, warn};

use crate::domain::aggregation::aggregate;
use crate::domain::arena::{ContributingItem, CorixTree, NodeData};
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::table::{ScoreTable, Selection, CONSTRUCT_COLUMN, LEVEL_COLUMN};
use crate::domain::taxonomy::Taxonomy;

/// Result type for tree operations.
pub type TreeResult<T> = Result<T, DomainError>;

/// Constructs CoRIx trees from score tables using an injected taxonomy.
///
/// The builder holds no per-query state, so one instance can serve
/// concurrent builds.
#[derive(Debug, Clone)]
pub struct TreeBuilder {
    taxonomy: Arc<Taxonomy>,
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new(Arc::new(Taxonomy::corix()))
    }
}

impl TreeBuilder {
    pub fn new(taxonomy: Arc<Taxonomy>) -> Self {
        Self { taxonomy }
    }

    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    /// Build the tree for the `"{application} - {scenario}"` score column.
    pub fn build(&self, table: &ScoreTable, application: &str, scenario: &str) -> TreeResult<CorixTree> {
        self.build_selection(table, &Selection::new(application, scenario))
    }

    #[instrument(level = "debug", skip_all, fields(rows = table.len(), selection = %selection))]
    pub fn build_selection(&self, table: &ScoreTable, selection: &Selection) -> TreeResult<CorixTree> {
        let level_col = require_column(table, LEVEL_COLUMN)?;
        let construct_col = require_column(table, CONSTRUCT_COLUMN)?;
        let score_col = require_column(table, &selection.column())?;

        if table.is_empty() {
            debug!("empty table, nothing to build");
            return Ok(CorixTree::new());
        }

        let records = table
            .project(level_col, construct_col, score_col)?
            .into_iter()
            .sorted_by(|a, b| (a.level, &a.construct).cmp(&(b.level, &b.construct)))
            .collect_vec();
        debug!("projected {} records", records.len());

        let mut tree = CorixTree::new();
        for record in records {
            let construct = record.construct.clone();
            if tree.insert_node(NodeData::from(record)).is_none() {
                return Err(DomainError::DuplicateConstruct(construct));
            }
        }

        let candidates = self.link_nodes(&mut tree);
        check_acyclic(&tree)?;
        tree.sort_children();
        attach_leaf_items(&mut tree);

        let root = candidates.iter().copied().find(|idx| {
            tree.get_node(*idx)
                .is_some_and(|n| self.taxonomy.is_root(&n.data.construct))
        });
        let Some(root) = root else {
            warn!(
                "canonical root '{}' not among {} root candidates",
                self.taxonomy.root,
                candidates.len()
            );
            return Ok(CorixTree::new());
        };
        for orphan in candidates.iter().filter(|idx| **idx != root) {
            if let Some(node) = tree.get_node(*orphan) {
                warn!("construct '{}' has no parent in this table, left out of the tree", node.id());
            }
        }

        tree.set_root(root);
        propagate_scores(&mut tree)?;
        Ok(tree)
    }

    /// Link every node to its mapped parent. Returns the root candidates.
    fn link_nodes(&self, tree: &mut CorixTree) -> Vec<Index> {
        let constructs: Vec<(Index, String)> = tree
            .nodes()
            .map(|(idx, node)| (idx, node.data.construct.clone()))
            .collect();

        let mut candidates = Vec::new();
        for (idx, construct) in constructs {
            let parent = self
                .taxonomy
                .parent_of(&construct)
                .and_then(|p| tree.find(p).map(|parent_idx| (p, parent_idx)));
            match parent {
                Some((parent_name, parent_idx)) => {
                    trace!("link {} -> {}", construct, parent_name);
                    tree.link(idx, parent_idx);
                }
                None => candidates.push(idx),
            }
        }
        debug!("{} root candidates", candidates.len());
        candidates
    }
}

fn require_column(table: &ScoreTable, name: &str) -> DomainResult<usize> {
    table
        .column_index(name)
        .ok_or_else(|| DomainError::MissingColumn(name.to_string()))
}

/// Fail if any parent chain loops back on itself.
fn check_acyclic(tree: &CorixTree) -> DomainResult<()> {
    let mut settled: HashSet<Index> = HashSet::new();
    for (start, _) in tree.nodes() {
        let mut path = HashSet::new();
        let mut current = Some(start);
        while let Some(idx) = current {
            if settled.contains(&idx) {
                break;
            }
            if !path.insert(idx) {
                let name = tree.get_node(idx).map(|n| n.id().to_string()).unwrap_or_default();
                return Err(DomainError::CyclicStructure(name));
            }
            current = tree.get_node(idx).and_then(|n| n.parent);
        }
        settled.extend(path);
    }
    Ok(())
}

/// Give every leaf-level node with a defined score its own item record.
fn attach_leaf_items(tree: &mut CorixTree) {
    let leaves: Vec<Index> = tree
        .nodes()
        .filter(|(_, n)| n.data.is_leaf_level() && !n.data.score.is_nan())
        .map(|(idx, _)| idx)
        .collect();
    for idx in leaves {
        if let Some(node) = tree.get_node_mut(idx) {
            node.contributing_items = vec![ContributingItem::for_construct(&node.data.construct, node.data.score)];
        }
    }
}

/// Settle every reachable node's score bottom-up.
///
/// Nodes are visited strictly in post-order, so a node's score is only read
/// after its whole subtree is final.
fn propagate_scores(tree: &mut CorixTree) -> DomainResult<()> {
    let order: Vec<Index> = tree.iter_postorder().map(|(idx, _)| idx).collect();
    let mut settled: HashSet<Index> = HashSet::with_capacity(order.len());

    for idx in order {
        let (construct, level, raw, is_leaf_level, children) = match tree.get_node(idx) {
            Some(n) => (
                n.data.construct.clone(),
                n.data.level,
                n.data.score,
                n.data.is_leaf_level(),
                n.children.clone(),
            ),
            None => continue,
        };
        if settled.contains(&idx) {
            return Err(DomainError::CyclicStructure(construct));
        }

        let score = if children.is_empty() {
            // a structurally childless internal node contributes no risk
            if is_leaf_level {
                raw
            } else {
                0.0
            }
        } else {
            debug_assert!(children.iter().all(|c| settled.contains(c)));
            let scores: Vec<f64> = children
                .iter()
                .filter_map(|c| tree.get_node(*c))
                .map(|c| c.data.score)
                .collect();
            aggregate(&scores, level)?
        };

        let items = if is_leaf_level {
            None
        } else {
            Some(merge_items(tree, idx, &children))
        };

        if let Some(node) = tree.get_node_mut(idx) {
            trace!("{} (level {}) settled at {}", construct, level, score);
            node.data.score = score;
            if let Some(items) = items {
                node.contributing_items = items;
            }
        }
        settled.insert(idx);
    }
    Ok(())
}

/// Union of the node's own and its children's items, deduplicated by id.
fn merge_items(tree: &CorixTree, idx: Index, children: &[Index]) -> Vec<ContributingItem> {
    let own = tree
        .get_node(idx)
        .map(|n| n.contributing_items.as_slice())
        .unwrap_or_default();
    let from_children = children
        .iter()
        .filter_map(|c| tree.get_node(*c))
        .flat_map(|c| c.contributing_items.iter());

    own.iter()
        .chain(from_children)
        .sorted_by(|a, b| a.item_id.cmp(&b.item_id))
        .dedup_by(|a, b| a.item_id == b.item_id)
        .cloned()
        .collect()
}
