//! Node details for drill-down inspection.

use std::fmt;

use crate::application::render::format_score;
use crate::domain::{ContributingItem, DomainError, DomainResult, NodeRecord, TreeSnapshot, LEAF_LEVEL};

/// Direct child as shown in a details report.
#[derive(Debug, Clone, PartialEq)]
pub struct ChildSummary {
    pub id: String,
    pub name: String,
    pub score: Option<f64>,
}

/// What a details report lists below the header.
#[derive(Debug, Clone, PartialEq)]
pub enum DetailBody {
    /// Direct children, for nodes above the leaf level
    Children(Vec<ChildSummary>),
    /// Contributing assessment items, for leaf-level nodes
    Items(Vec<ContributingItem>),
    /// Neither children nor items
    Empty,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NodeDetails {
    pub id: String,
    pub name: String,
    pub level: u32,
    pub construct: String,
    pub score: Option<f64>,
    pub body: DetailBody,
}

impl NodeDetails {
    /// Score formatted as `x.xx/10`, or a placeholder when undefined.
    pub fn formatted_score(&self) -> String {
        format_out_of_ten(self.score)
    }
}

fn format_out_of_ten(score: Option<f64>) -> String {
    match score {
        Some(s) if !s.is_nan() => format!("{}/10", format_score(s)),
        _ => format_score(f64::NAN),
    }
}

impl fmt::Display for NodeDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Node Details for: {} (ID: {}) ---", self.name, self.id)?;
        writeln!(f, "Level: {}, Construct: {}", self.level, self.construct)?;
        writeln!(f, "Aggregated Score: {}", self.formatted_score())?;
        match &self.body {
            DetailBody::Children(children) => {
                writeln!(f, "\nDirect Children and their Scores:")?;
                for child in children {
                    writeln!(
                        f,
                        "  - {} (ID: {}): {}",
                        child.name,
                        child.id,
                        format_out_of_ten(child.score)
                    )?;
                }
            }
            DetailBody::Items(items) => {
                writeln!(f, "\nContributing Assessment Items:")?;
                for item in items {
                    writeln!(f, "  - Item ID: {}, Question: '{}'", item.item_id, item.description)?;
                    writeln!(f, "    Score: {}", format_out_of_ten(Some(item.score)))?;
                }
            }
            DetailBody::Empty => {
                writeln!(f, "\nNo direct children or raw assessment items to display for this node.")?;
            }
        }
        Ok(())
    }
}

fn required<'a, T>(id: &str, field: &str, value: &'a Option<T>) -> DomainResult<&'a T> {
    value.as_ref().ok_or_else(|| DomainError::MalformedNode {
        id: id.to_string(),
        field: field.to_string(),
    })
}

/// Report the details of `node_id` from a tree snapshot.
///
/// Nodes above the leaf level list their direct children, leaf-level nodes
/// list their contributing items.
pub fn inspect(snapshot: &TreeSnapshot, node_id: &str) -> DomainResult<NodeDetails> {
    let record = snapshot
        .get(node_id)
        .ok_or_else(|| DomainError::NotFound(node_id.to_string()))?;

    let name = required(node_id, "name", &record.name)?.clone();
    let level = *required(node_id, "level", &record.level)?;
    let construct = required(node_id, "construct", &record.construct)?.clone();

    let body = if level < LEAF_LEVEL && !record.children.is_empty() {
        DetailBody::Children(child_summaries(snapshot, node_id, record)?)
    } else if level == LEAF_LEVEL && !record.contributing_items.is_empty() {
        DetailBody::Items(record.contributing_items.clone())
    } else {
        DetailBody::Empty
    };

    Ok(NodeDetails {
        id: node_id.to_string(),
        name,
        level,
        construct,
        score: record.score.filter(|s| !s.is_nan()),
        body,
    })
}

fn child_summaries(
    snapshot: &TreeSnapshot,
    node_id: &str,
    record: &NodeRecord,
) -> DomainResult<Vec<ChildSummary>> {
    record
        .children
        .iter()
        .map(|child_id| {
            let child = snapshot.get(child_id).ok_or_else(|| DomainError::MalformedNode {
                id: node_id.to_string(),
                field: format!("children[{}]", child_id),
            })?;
            Ok(ChildSummary {
                id: child_id.clone(),
                name: required(child_id, "name", &child.name)?.clone(),
                score: child.score,
            })
        })
        .collect()
}
