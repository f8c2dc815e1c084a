use crate::engine::catalog::{Catalog, Column, Table};
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}:\n{input}")]
pub struct CatalogParseError {
    message: &'static str,
    input: String,
}

impl Catalog {
    /// Reads `CREATE TABLE` statements, separated by ";".
    ///
    /// Table and column ids are the names found in the statements. Lines starting with "--" are
    /// comments.
    pub fn from_ddl_str(input: &str) -> Result<Self, crate::Error> {
        let without_comments: String = input
            .lines()
            .filter(|line| !line.trim_start().starts_with("--"))
            .collect::<Vec<_>>()
            .join("\n");

        let tables = without_comments
            .split(';')
            .map(str::trim)
            .filter(|statement| !statement.is_empty())
            .map(Table::from_sql_string)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Catalog::new(tables))
    }
}

impl Table {
    pub fn from_sql_string(input: &str) -> Result<Self, CatalogParseError> {
        static CREATE_TABLE_REGEX: Lazy<Regex> = Lazy::new(|| {
            Regex::new(r"(?i)^\s*CREATE\s+TABLE\s+(?:IF\s+NOT\s+EXISTS\s+)?[`\x22]?(?<name>\w+)[`\x22]?\s*\(")
                .expect("static regex")
        });

        let captures = CREATE_TABLE_REGEX
            .captures(input)
            .ok_or_else(|| CatalogParseError::new("Not a CREATE TABLE statement", input))?;
        let name = &captures["name"];

        let body_start = captures.get(0).expect("whole match is always present").end();
        let body_end = input
            .rfind(')')
            .filter(|end| *end >= body_start)
            .ok_or_else(|| CatalogParseError::new("Column list is not closed", input))?;

        let columns = split_definitions(&input[body_start..body_end])
            .into_iter()
            .filter_map(Column::from_sql_string)
            .collect();

        Ok(Table::new(name, name, columns))
    }
}

impl Column {
    /// Returns None for the lines that are not column definitions: keys, indexes, constraints.
    fn from_sql_string(input: &str) -> Option<Self> {
        static COLUMN_REGEX: Lazy<Regex> = Lazy::new(|| {
            Regex::new(r"(?i)^(?<quote>[`\x22])?(?<name>\w+)[`\x22]?\s+(?<type>\w+(?:\s*\([^)]*\))?(?:\s+unsigned)?)(?<rest>.*)$")
                .expect("static regex")
        });
        static NOT_NULL_REGEX: Lazy<Regex> =
            Lazy::new(|| Regex::new(r"(?i)\bNOT\s+NULL\b|\bPRIMARY\s+KEY\b").expect("static regex"));

        let captures = COLUMN_REGEX.captures(input.trim())?;
        let name = &captures["name"];

        // Quoted names are always columns, `KEY` or `PRIMARY` unquoted start an index.
        let is_quoted = captures.name("quote").is_some();
        if !is_quoted && is_reserved_word(name) {
            return None;
        }

        Some(Column::named(
            name,
            &captures["type"],
            !NOT_NULL_REGEX.is_match(&captures["rest"]),
        ))
    }
}

impl CatalogParseError {
    fn new(message: &'static str, input: &str) -> Self {
        CatalogParseError {
            message,
            input: input.to_string(),
        }
    }
}

fn is_reserved_word(name: &str) -> bool {
    const RESERVED: [&str; 8] = [
        "PRIMARY",
        "KEY",
        "UNIQUE",
        "INDEX",
        "CONSTRAINT",
        "FOREIGN",
        "CHECK",
        "FULLTEXT",
    ];

    RESERVED
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(name))
}

/// Splits a column list on the commas that are not inside parentheses, so
/// "decimal(10, 2)" stays in one piece.
fn split_definitions(body: &str) -> Vec<&str> {
    let mut definitions = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (index, character) in body.char_indices() {
        match character {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                definitions.push(&body[start..index]);
                start = index + 1;
            }
            _ => {}
        }
    }
    definitions.push(&body[start..]);

    definitions
        .into_iter()
        .map(str::trim)
        .filter(|definition| !definition.is_empty())
        .collect()
}
