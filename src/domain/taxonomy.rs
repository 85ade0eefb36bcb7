//! Construct taxonomy: the static child → parent catalogue.
//!
//! The taxonomy is domain knowledge external to any score table. It is passed
//! to the builder explicitly so different catalogues can be used side by side.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::domain::error::{DomainError, DomainResult};

/// Canonical root of the built-in CoRIx catalogue.
pub const CORIX_ROOT: &str = "Validity/Reliability (V/R)";

const MT: &str = "Model Testing (MT)";
const RT: &str = "Red Teaming (RT)";
const FT: &str = "Field Testing (FT)";
const MT_AL: &str = "MT Annotator Label";
const RT_AL: &str = "RT Annotator Label";
const RT_UP: &str = "RT User Perception";
const FT_AL: &str = "FT Annotator Label";
const FT_UP: &str = "FT User Perception";

const CORIX_PARENTS: &[(&str, &str)] = &[
    // testing layers
    (MT, CORIX_ROOT),
    (RT, CORIX_ROOT),
    (FT, CORIX_ROOT),
    // annotation and perception
    (MT_AL, MT),
    (RT_AL, RT),
    (RT_UP, RT),
    (FT_AL, FT),
    (FT_UP, FT),
    // assessment items
    ("MT RA 1", MT_AL),
    ("MT RA 2", MT_AL),
    ("MT DD 3", MT_AL),
    ("MT CC 4", MT_AL),
    ("MT CC 5", MT_AL),
    ("MT QQ 1.1", MT_AL),
    ("MT QQ 2.1", MT_AL),
    ("MT Annotator Label (Overall)", MT_AL),
    ("RT RA 1", RT_AL),
    ("RT RA 2.1", RT_AL),
    ("RT DD 3", RT_AL),
    ("RT DD 4", RT_AL),
    ("RT CC 5", RT_AL),
    ("RT QQ 1.1", RT_AL),
    ("RT QQ 2.1", RT_AL),
    ("RT Annotator Label (Overall)", RT_AL),
    ("RT UR 1", RT_UP),
    ("RT UR 2", RT_UP),
    ("RT UR 3", RT_UP),
    ("RT UR 4", RT_UP),
    ("RT UR 5", RT_UP),
    ("RT User Perception (Overall)", RT_UP),
    ("FT RA 1", FT_AL),
    ("FT RA 2", FT_AL),
    ("FT DD 3", FT_AL),
    ("FT CC 4", FT_AL),
    ("FT CC 5", FT_AL),
    ("FT QQ 1.1", FT_AL),
    ("FT QQ 2.1", FT_AL),
    ("FT Annotator Label (Overall)", FT_AL),
    ("FT UR 1", FT_UP),
    ("FT UR 2", FT_UP),
    ("FT UR 3", FT_UP),
    ("FT UR 4", FT_UP),
    ("FT UR 5", FT_UP),
    ("FT User Perception (Overall)", FT_UP),
];

/// Child → parent mapping plus the name of the canonical root construct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Taxonomy {
    /// Construct that roots a well-formed tree
    pub root: String,
    /// Parent construct for every known non-root construct
    #[serde(default)]
    pub parents: BTreeMap<String, String>,
}

impl Default for Taxonomy {
    fn default() -> Self {
        Self::corix()
    }
}

impl Taxonomy {
    pub fn new(root: impl Into<String>, parents: BTreeMap<String, String>) -> Self {
        Self {
            root: root.into(),
            parents,
        }
    }

    /// Build a taxonomy from `(child, parent)` pairs.
    pub fn from_pairs<'a>(root: &str, pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let parents = pairs
            .into_iter()
            .map(|(child, parent)| (child.to_string(), parent.to_string()))
            .collect();
        Self::new(root, parents)
    }

    /// The built-in CoRIx catalogue.
    ///
    /// Construct names carry their abbreviation suffix: the root is
    /// `"Validity/Reliability (V/R)"` and the testing layers are
    /// `"Model Testing (MT)"`, `"Red Teaming (RT)"` and `"Field Testing (FT)"`.
    /// A table using the short names (`"Validity/Reliability"`,
    /// `"Model Testing"`) matches no root under this catalogue and builds an
    /// empty tree; pass a [`Taxonomy::from_pairs`] catalogue for such tables.
    pub fn corix() -> Self {
        Self::from_pairs(CORIX_ROOT, CORIX_PARENTS.iter().copied())
    }

    pub fn parent_of(&self, construct: &str) -> Option<&str> {
        self.parents.get(construct).map(String::as_str)
    }

    pub fn is_root(&self, construct: &str) -> bool {
        self.root == construct
    }

    /// Number of constructs known to the catalogue, root included.
    pub fn len(&self) -> usize {
        let mut names: HashSet<&str> = self.parents.keys().map(String::as_str).collect();
        names.insert(self.root.as_str());
        names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty() && self.parents.is_empty()
    }

    /// Check that the catalogue can describe a single-rooted tree.
    pub fn validate(&self) -> DomainResult<()> {
        if self.root.trim().is_empty() {
            return Err(DomainError::InvalidTaxonomy("root name is empty".to_string()));
        }
        if let Some(parent) = self.parent_of(&self.root) {
            return Err(DomainError::InvalidTaxonomy(format!(
                "root '{}' must not have a parent (found '{}')",
                self.root, parent
            )));
        }
        for child in self.parents.keys() {
            let mut seen = HashSet::new();
            let mut current = Some(child.as_str());
            while let Some(name) = current {
                if !seen.insert(name) {
                    return Err(DomainError::CyclicStructure(name.to_string()));
                }
                current = self.parent_of(name);
            }
        }
        Ok(())
    }
}
