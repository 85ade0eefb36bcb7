//! Domain layer: entities and business logic
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod aggregation;
pub mod arena;
pub mod builder;
pub mod error;
pub mod snapshot;
pub mod table;
pub mod taxonomy;

pub use aggregation::{aggregate, AggregationRule, LEAF_LEVEL};
pub use arena::{ContributingItem, CorixTree, NodeData, TreeNode};
pub use builder::{TreeBuilder, TreeResult};
pub use error::{DomainError, DomainResult};
pub use snapshot::{NodeRecord, TreeSnapshot};
pub use table::{ScoreRecord, ScoreTable, Selection, CONSTRUCT_COLUMN, LEVEL_COLUMN};
pub use taxonomy::{Taxonomy, CORIX_ROOT};
