//! Structures used to represent the tables a user can pick from.
//!
//! The catalog is read-only to the rest of the engine. It can be built in code, read from a JSON
//! file, or parsed from `CREATE TABLE` statements.
use log::info;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::fs;
use std::path::Path;

pub use parsing::CatalogParseError;

/// Parses CREATE TABLE queries into tables.
mod parsing;

/// An ordered list of tables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    tables: Vec<Table>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub id: TableId,
    pub name: String,
    pub columns: Vec<Column>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub id: ColumnId,
    pub name: String,
    /// Free-form type label, like "varchar(255)".
    #[serde(rename = "type")]
    pub data_type: String,
    #[serde(default)]
    pub nullable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Ord, PartialOrd, Hash)]
#[serde(transparent)]
pub struct TableId(String);

/// Unique within its table only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Ord, PartialOrd, Hash)]
#[serde(transparent)]
pub struct ColumnId(String);

impl Catalog {
    pub fn new(tables: Vec<Table>) -> Self {
        Catalog { tables }
    }

    /// Reads a catalog file. Files ending in `.json` hold serialized tables, anything else is
    /// expected to contain `CREATE TABLE` statements.
    pub fn load(path: &Path) -> Result<Self, crate::Error> {
        info!("Reading catalog from {}", path.display());

        let contents = fs::read_to_string(path)?;

        let catalog = match path.extension().and_then(|extension| extension.to_str()) {
            Some("json") => Self::from_json_str(&contents)?,
            _ => Self::from_ddl_str(&contents)?,
        };

        info!("Found {} tables", catalog.tables.len());

        Ok(catalog)
    }

    pub fn from_json_str(input: &str) -> Result<Self, crate::Error> {
        Ok(serde_json::from_str(input)?)
    }

    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    /// If two tables share an id, the first one wins.
    pub fn table(&self, id: &TableId) -> Option<&Table> {
        self.tables.iter().find(|table| &table.id == id)
    }

    pub fn column(&self, table: &TableId, column: &ColumnId) -> Option<(&Table, &Column)> {
        let table = self.table(table)?;
        let column = table.column(column)?;

        Some((table, column))
    }

    pub fn contains_table(&self, id: &TableId) -> bool {
        self.table(id).is_some()
    }

    pub fn contains_column(&self, table: &TableId, column: &ColumnId) -> bool {
        self.column(table, column).is_some()
    }
}

impl Table {
    pub fn new(id: impl Into<TableId>, name: impl Into<String>, columns: Vec<Column>) -> Self {
        Table {
            id: id.into(),
            name: name.into(),
            columns,
        }
    }

    pub fn column(&self, id: &ColumnId) -> Option<&Column> {
        self.columns.iter().find(|column| &column.id == id)
    }
}

impl Column {
    /// A column whose id is also its name.
    pub fn named(name: &str, data_type: &str, nullable: bool) -> Self {
        Column {
            id: name.into(),
            name: name.to_string(),
            data_type: data_type.to_string(),
            nullable,
        }
    }
}

impl TableId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ColumnId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<T: Into<String>> From<T> for TableId {
    fn from(id: T) -> TableId {
        TableId(id.into())
    }
}

impl<T: Into<String>> From<T> for ColumnId {
    fn from(id: T) -> ColumnId {
        ColumnId(id.into())
    }
}

impl PartialEq<&str> for TableId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl PartialEq<&str> for ColumnId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl AsRef<str> for ColumnId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for TableId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Display for ColumnId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
pub(crate) fn sample_catalog() -> Catalog {
    Catalog::new(vec![
        Table::new(
            "users",
            "users",
            vec![
                Column::named("id", "int", false),
                Column::named("email", "varchar(255)", false),
                Column::named("status", "varchar(32)", true),
            ],
        ),
        Table::new(
            "orders",
            "orders",
            vec![
                Column::named("id", "int", false),
                Column::named("user_id", "int", false),
                Column::named("total", "decimal(10,2)", false),
            ],
        ),
        Table::new(
            "products",
            "products",
            vec![
                Column::named("id", "int", false),
                Column::named("name", "varchar(255)", false),
            ],
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_ids() {
        let catalog = sample_catalog();

        let (table, column) = catalog.column(&"orders".into(), &"total".into()).unwrap();

        assert_eq!(table.name, "orders");
        assert_eq!(column.data_type, "decimal(10,2)");
        assert!(!catalog.contains_column(&"orders".into(), &"email".into()));
        assert!(!catalog.contains_table(&"invoices".into()));
    }

    #[test]
    fn test_from_json() {
        let input = r#"[
            {
                "id": "t_users",
                "name": "users",
                "columns": [
                    {"id": "c1", "name": "id", "type": "int"},
                    {"id": "c2", "name": "nickname", "type": "text", "nullable": true}
                ]
            }
        ]"#;

        let catalog = Catalog::from_json_str(input).unwrap();
        let table = catalog.table(&"t_users".into()).unwrap();

        assert_eq!(table.name, "users");
        assert_eq!(table.columns.len(), 2);
        assert!(!table.columns[0].nullable);
        assert!(table.column(&"c2".into()).unwrap().nullable);
    }

    #[test]
    fn test_first_table_wins_on_duplicate_ids() {
        let catalog = Catalog::new(vec![
            Table::new("a", "first", vec![]),
            Table::new("a", "second", vec![]),
        ]);

        assert_eq!(catalog.table(&"a".into()).unwrap().name, "first");
    }
}
