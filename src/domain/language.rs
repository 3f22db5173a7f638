//! ISO 639-3 reference languages.
//!
//! Parses the tab-delimited code table published by SIL
//! (`Id  Part2B  Part2T  Part1  Scope  Language_Type  Ref_Name  Comment`).

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Column count of the SIL code table
const ISO_639_3_COLUMNS: usize = 8;

/// Complete ISO 639-3 code table bundled with the binary (7910 active codes).
///
/// `LANGUAGE_DATA_PATH` points at a newer SIL `iso-639-3.tab` release instead.
pub const BUNDLED_ISO_639_3: &str = include_str!("../../data/iso-639-3.tab");

/// Row count of the bundled release
pub const BUNDLED_ISO_639_3_ROWS: usize = 7910;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LanguageDataError {
    #[error("line {line}: expected {expected} tab-separated columns, found {found}")]
    ColumnCount {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("line {line}: invalid ISO 639-3 identifier {id:?}")]
    InvalidId { line: usize, id: String },

    #[error("line {line}: duplicate identifier {id:?}")]
    Duplicate { line: usize, id: String },
}

/// One row of the ISO 639-3 code table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    pub id: String,
    pub part2b: String,
    pub part2t: String,
    pub part1: String,
    pub scope: String,
    pub language_type: String,
    pub ref_name: String,
    pub comment: String,
}

/// Parse the SIL tab-delimited table.
///
/// The header line (starting with `Id\t`) and blank lines are skipped. Rows
/// must carry exactly eight columns; a missing trailing comment column is
/// tolerated.
pub fn parse_iso_639_3(source: &str) -> Result<Vec<Language>, LanguageDataError> {
    let mut languages = Vec::new();
    let mut seen = std::collections::HashSet::new();

    for (index, raw) in source.lines().enumerate() {
        let line = index + 1;
        let raw = raw.trim_end_matches('\r');
        if raw.trim().is_empty() || raw.starts_with("Id\t") {
            continue;
        }

        let mut columns: Vec<&str> = raw.split('\t').collect();
        if columns.len() == ISO_639_3_COLUMNS - 1 {
            columns.push("");
        }
        if columns.len() != ISO_639_3_COLUMNS {
            return Err(LanguageDataError::ColumnCount {
                line,
                expected: ISO_639_3_COLUMNS,
                found: columns.len(),
            });
        }

        let id = columns[0].trim();
        if id.len() != 3 || !id.bytes().all(|b| b.is_ascii_lowercase()) {
            return Err(LanguageDataError::InvalidId {
                line,
                id: id.to_string(),
            });
        }
        if !seen.insert(id.to_string()) {
            return Err(LanguageDataError::Duplicate {
                line,
                id: id.to_string(),
            });
        }

        languages.push(Language {
            id: id.to_string(),
            part2b: columns[1].trim().to_string(),
            part2t: columns[2].trim().to_string(),
            part1: columns[3].trim().to_string(),
            scope: columns[4].trim().to_string(),
            language_type: columns[5].trim().to_string(),
            ref_name: columns[6].trim().to_string(),
            comment: columns[7].trim().to_string(),
        });
    }

    Ok(languages)
}
