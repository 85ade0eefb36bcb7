//! CoRIx risk trees.
//!
//! Builds a hierarchy of assessment constructs from a flat score table and
//! aggregates leaf scores bottom-up: `max` at level 2, `mean` at levels 3-5.
//!
//! ```ignore
//! use corix::domain::{ScoreTable, TreeBuilder};
//!
//! let table = ScoreTable::from_csv(&csv_text)?;
//! let tree = TreeBuilder::default().build(&table, "Application A", "Pathfinder")?;
//! println!("{:?}", tree.score("Validity/Reliability (V/R)"));
//! ```

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
