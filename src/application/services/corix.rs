//! Score tree service
//!
//! Loads score tables through the filesystem boundary and builds CoRIx trees.

use std::path::Path;
use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, info, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{CorixTree, DomainError, ScoreTable, Selection, Taxonomy, TreeBuilder};
use crate::infrastructure::traits::FileSystem;

/// Bundled sample dataset.
pub const SAMPLE_DATA: &str = include_str!("../../../resources/corix_scores.csv");

/// Headline numbers of one built selection.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionSummary {
    pub selection: Selection,
    /// `None` for an empty tree or an undefined root score
    pub root_score: Option<f64>,
    /// Nodes reachable from the root
    pub nodes: usize,
    pub depth: usize,
}

impl SelectionSummary {
    pub fn from_tree(selection: Selection, tree: &CorixTree) -> Self {
        let root_score = tree
            .root_node()
            .map(|n| n.data.score)
            .filter(|s| !s.is_nan());
        Self {
            selection,
            root_score,
            nodes: tree.iter().count(),
            depth: tree.depth(),
        }
    }
}

/// Service for loading score tables and building trees from them.
pub struct CorixService {
    fs: Arc<dyn FileSystem>,
    builder: TreeBuilder,
}

impl CorixService {
    /// Create a new service over the given taxonomy.
    pub fn new(fs: Arc<dyn FileSystem>, taxonomy: Arc<Taxonomy>) -> Self {
        Self {
            fs,
            builder: TreeBuilder::new(taxonomy),
        }
    }

    pub fn builder(&self) -> &TreeBuilder {
        &self.builder
    }

    /// Read and parse a CSV score table.
    #[instrument(level = "debug", skip(self))]
    pub fn load_table(&self, path: &Path) -> ApplicationResult<ScoreTable> {
        if !self.fs.is_file(path) {
            return Err(ApplicationError::DataFileNotFound(path.to_path_buf()));
        }
        let content = self
            .fs
            .read_to_string(path)
            .with_path_context("read score table", path)?;
        let table = ScoreTable::from_csv(&content)?;
        debug!(
            "loaded {} rows, {} columns from {}",
            table.len(),
            table.columns().len(),
            path.display()
        );
        Ok(table)
    }

    /// Pick `requested`, or the table's first score column when none is given.
    pub fn resolve_selection(
        &self,
        table: &ScoreTable,
        requested: Option<Selection>,
    ) -> ApplicationResult<Selection> {
        match requested {
            Some(selection) => Ok(selection),
            None => table.selections().into_iter().next().ok_or_else(|| {
                DomainError::InvalidSelection("table has no \"Application - Scenario\" column".into())
                    .into()
            }),
        }
    }

    /// Build the tree for one selection.
    pub fn build(&self, table: &ScoreTable, selection: &Selection) -> ApplicationResult<CorixTree> {
        Ok(self.builder.build_selection(table, selection)?)
    }

    /// Build the tree of every selection in the table concurrently.
    ///
    /// Results keep the table's column order. The first failing build aborts.
    #[instrument(level = "debug", skip_all, fields(rows = table.len()))]
    pub fn build_all(&self, table: &ScoreTable) -> ApplicationResult<Vec<(Selection, CorixTree)>> {
        let selections = table.selections();
        info!("building {} selections", selections.len());
        selections
            .into_par_iter()
            .map(|selection| -> ApplicationResult<(Selection, CorixTree)> {
                let tree = self.builder.build_selection(table, &selection)?;
                Ok((selection, tree))
            })
            .collect()
    }

    /// Summaries of every selection in the table.
    pub fn summarize(&self, table: &ScoreTable) -> ApplicationResult<Vec<SelectionSummary>> {
        Ok(self
            .build_all(table)?
            .into_iter()
            .map(|(selection, tree)| SelectionSummary::from_tree(selection, &tree))
            .collect())
    }

    /// Write the bundled sample dataset. Refuses to overwrite unless `force`.
    pub fn write_sample(&self, path: &Path, force: bool) -> ApplicationResult<()> {
        if self.fs.exists(path) && !force {
            return Err(ApplicationError::OperationFailed {
                context: format!("{} already exists (use --force to overwrite)", path.display()),
                source: Box::new(std::io::Error::from(std::io::ErrorKind::AlreadyExists)),
            });
        }
        self.fs
            .ensure_parent(path)
            .with_path_context("create parent directory", path)?;
        self.fs
            .write(path, SAMPLE_DATA)
            .with_path_context("write sample data", path)?;
        info!("sample data written to {}", path.display());
        Ok(())
    }
}
