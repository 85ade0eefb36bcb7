//! Serializable, id-keyed view of a built tree.
//!
//! Records keep every field optional so a snapshot read back from JSON can be
//! checked field by field by its consumers.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::arena::ContributingItem;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeRecord {
    pub id: Option<String>,
    pub name: Option<String>,
    pub construct: Option<String>,
    pub level: Option<u32>,
    /// `None` when the score is not a number
    pub score: Option<f64>,
    pub parent: Option<String>,
    pub children: Vec<String>,
    pub contributing_items: Vec<ContributingItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeSnapshot {
    pub root: Option<String>,
    pub nodes: BTreeMap<String, NodeRecord>,
}

impl TreeSnapshot {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&NodeRecord> {
        self.nodes.get(id)
    }
}
