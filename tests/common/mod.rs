//! Shared fixtures for integration tests.
#![allow(dead_code)]

use corix::domain::{ScoreTable, Taxonomy};

pub const ROOT: &str = "Validity/Reliability";
pub const APP: &str = "App";
pub const SCENARIO: &str = "S";
pub const COLUMN: &str = "App - S";

/// Small two-branch catalogue: root → {Model Testing, Red Teaming, Field Testing}.
pub fn small_taxonomy() -> Taxonomy {
    Taxonomy::from_pairs(
        ROOT,
        [
            ("Model Testing", ROOT),
            ("Red Teaming", ROOT),
            ("Field Testing", ROOT),
            ("MT Annotator Label", "Model Testing"),
            ("RT Annotator Label", "Red Teaming"),
            ("MT RA 1", "MT Annotator Label"),
            ("MT RA 2", "MT Annotator Label"),
            ("RT DD 4", "RT Annotator Label"),
        ],
    )
}

/// Build a table from `(level, construct, score)` rows under the `App - S` column.
pub fn table(rows: &[(&str, &str, &str)]) -> ScoreTable {
    ScoreTable::new(
        vec!["Level".into(), "Construct".into(), COLUMN.into()],
        rows.iter()
            .map(|(l, c, s)| vec![l.to_string(), c.to_string(), s.to_string()])
            .collect(),
    )
    .expect("well-formed table")
}

/// Root, two testing layers, two annotator labels, three items scored 1, 3, 5.
pub fn small_table() -> ScoreTable {
    table(&[
        ("2", ROOT, ""),
        ("3", "Model Testing", ""),
        ("3", "Red Teaming", ""),
        ("4", "MT Annotator Label", ""),
        ("4", "RT Annotator Label", ""),
        ("5", "MT RA 1", "1"),
        ("5", "MT RA 2", "3"),
        ("5", "RT DD 4", "5"),
    ])
}
