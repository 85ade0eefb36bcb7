//! Flat score table: one row per construct, one score column per
//! application/scenario combination.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::domain::error::{DomainError, DomainResult};

pub const LEVEL_COLUMN: &str = "Level";
pub const CONSTRUCT_COLUMN: &str = "Construct";

/// Separator between application and scenario in a score column name.
pub const SELECTION_SEPARATOR: &str = " - ";

/// An application/scenario pair naming one score column.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Selection {
    pub application: String,
    pub scenario: String,
}

impl Selection {
    pub fn new(application: impl Into<String>, scenario: impl Into<String>) -> Self {
        Self {
            application: application.into(),
            scenario: scenario.into(),
        }
    }

    /// Score column holding this selection's values.
    pub fn column(&self) -> String {
        format!("{}{}{}", self.application, SELECTION_SEPARATOR, self.scenario)
    }

    /// Split `"{application} - {scenario}"` on the first separator.
    pub fn parse(text: &str) -> DomainResult<Self> {
        match text.split_once(SELECTION_SEPARATOR) {
            Some((application, scenario))
                if !application.trim().is_empty() && !scenario.trim().is_empty() =>
            {
                Ok(Self::new(application, scenario))
            }
            _ => Err(DomainError::InvalidSelection(text.to_string())),
        }
    }
}

impl FromStr for Selection {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.column())
    }
}

/// One projected input row.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreRecord {
    pub level: u32,
    pub construct: String,
    /// Raw score, NaN when the cell is missing
    pub score: f64,
}

/// Rectangular table of raw cells with named columns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreTable {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl ScoreTable {
    /// Create a table, rejecting duplicate headers and ragged rows.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> DomainResult<Self> {
        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(column.as_str()) {
                return Err(DomainError::InvalidTable(format!(
                    "duplicate column header '{}'",
                    column
                )));
            }
        }
        if let Some((i, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != columns.len())
        {
            return Err(DomainError::InvalidTable(format!(
                "row {} has {} cells, expected {}",
                i,
                row.len(),
                columns.len()
            )));
        }
        Ok(Self { columns, rows })
    }

    /// Parse CSV text with a header row.
    ///
    /// A header without data rows yields an empty table.
    pub fn from_csv(content: &str) -> DomainResult<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(content.as_bytes());

        let columns: Vec<String> = reader
            .headers()
            .map_err(|e| DomainError::InvalidTable(e.to_string()))?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();
        if columns.is_empty() {
            return Err(DomainError::InvalidTable("missing header row".to_string()));
        }

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| DomainError::InvalidTable(e.to_string()))?;
            rows.push(record.iter().map(String::from).collect());
        }
        Self::new(columns, rows)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Score columns that name an application/scenario pair, in table order.
    pub fn selections(&self) -> Vec<Selection> {
        self.columns
            .iter()
            .filter(|c| c.as_str() != LEVEL_COLUMN && c.as_str() != CONSTRUCT_COLUMN)
            .filter_map(|c| Selection::parse(c).ok())
            .collect()
    }

    /// Project every row to `(level, construct, score)` from the given columns.
    pub fn project(
        &self,
        level_col: usize,
        construct_col: usize,
        score_col: usize,
    ) -> DomainResult<Vec<ScoreRecord>> {
        let score_name = self.columns.get(score_col).map(String::as_str).unwrap_or("score");
        self.rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let cell = |col: usize| row.get(col).map(String::as_str).unwrap_or("");
                Ok(ScoreRecord {
                    level: parse_level(cell(level_col), i)?,
                    construct: cell(construct_col).trim().to_string(),
                    score: parse_score(cell(score_col), score_name, i)?,
                })
            })
            .collect()
    }
}

fn parse_level(raw: &str, row: usize) -> DomainResult<u32> {
    let text = raw.trim();
    let invalid = || DomainError::InvalidValue {
        column: LEVEL_COLUMN.to_string(),
        row,
        value: raw.to_string(),
    };
    if let Ok(level) = text.parse::<u32>() {
        return Ok(level);
    }
    // integer columns sometimes arrive as "2.0"
    match text.parse::<f64>() {
        Ok(v) if v.fract() == 0.0 && v >= 0.0 && v <= u32::MAX as f64 => Ok(v as u32),
        _ => Err(invalid()),
    }
}

fn parse_score(raw: &str, column: &str, row: usize) -> DomainResult<f64> {
    let text = raw.trim();
    if text.is_empty()
        || ["nan", "na", "null"]
            .iter()
            .any(|m| text.eq_ignore_ascii_case(m))
    {
        return Ok(f64::NAN);
    }
    text.parse::<f64>().map_err(|_| DomainError::InvalidValue {
        column: column.to_string(),
        row,
        value: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_parse_splits_on_first_separator() {
        let selection = Selection::parse("Application A - Pathfinder - v2").unwrap();
        assert_eq!(selection.application, "Application A");
        assert_eq!(selection.scenario, "Pathfinder - v2");
        assert_eq!(selection.column(), "Application A - Pathfinder - v2");
    }

    #[test]
    fn test_selection_parse_rejects_missing_separator() {
        assert_eq!(
            Selection::parse("Application A"),
            Err(DomainError::InvalidSelection("Application A".to_string()))
        );
        assert!(Selection::parse(" - Pathfinder").is_err());
    }

    #[test]
    fn test_new_rejects_ragged_rows() {
        let result = ScoreTable::new(
            vec!["Level".into(), "Construct".into()],
            vec![vec!["2".into()]],
        );
        assert!(matches!(result, Err(DomainError::InvalidTable(_))));
    }

    #[test]
    fn test_parse_score_missing_markers_become_nan() {
        for raw in ["", "  ", "NaN", "nan", "NA", "null"] {
            assert!(parse_score(raw, "s", 0).unwrap().is_nan(), "{raw:?}");
        }
        assert_eq!(parse_score(" 4.5 ", "s", 0).unwrap(), 4.5);
        assert!(parse_score("high", "s", 0).is_err());
    }

    #[test]
    fn test_parse_level_accepts_integral_floats() {
        assert_eq!(parse_level("3", 0).unwrap(), 3);
        assert_eq!(parse_level("4.0", 0).unwrap(), 4);
        assert!(parse_level("4.5", 0).is_err());
        assert!(parse_level("-1", 0).is_err());
    }
}
