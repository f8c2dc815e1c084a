//! The query-construction state of a single session.
//!
//! A [QueryState] can only be changed through [QueryState::apply], which makes sure these hold:
//! - a table is selected at most once;
//! - every selected column belongs to a selected table;
//! - join and predicate ids are never handed out twice.
//!
//! Joins can point to tables that are not selected. They stay in the state and are left out of
//! the rendered query until both of their tables are selected.
use crate::engine::catalog::{ColumnId, TableId};
use crate::engine::{JoinType, Logic, Operator, OrderDirection};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::num::NonZeroU64;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryState {
    pub(crate) tables: Vec<TableId>,
    pub(crate) columns: Vec<SelectedColumn>,
    pub(crate) joins: Vec<Join>,
    pub(crate) predicates: Vec<Predicate>,
    pub(crate) group_by: Vec<String>,
    pub(crate) sort_keys: Vec<SortKey>,
    pub(crate) limit: Option<NonZeroU64>,
    /// Joins and predicates draw their ids from the same counter.
    pub(crate) last_id: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedColumn {
    pub table: TableId,
    pub column: ColumnId,
    pub alias: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Join {
    pub id: JoinId,
    pub left_table: Option<TableId>,
    pub right_table: Option<TableId>,
    pub left_column: String,
    pub right_column: String,
    pub join_type: JoinType,
}

/// A WHERE condition. The column and value are free text and are never checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Predicate {
    pub id: PredicateId,
    pub column: String,
    pub operator: Operator,
    pub value: String,
    /// Joins this predicate to the one before it. Ignored for the first predicate.
    pub logic: Logic,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortKey {
    pub column: String,
    pub direction: OrderDirection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JoinId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PredicateId(u64);

/// Fields left as None are not changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JoinPatch {
    pub left_table: Option<TableId>,
    pub right_table: Option<TableId>,
    pub left_column: Option<String>,
    pub right_column: Option<String>,
    pub join_type: Option<JoinType>,
}

/// Fields left as None are not changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PredicatePatch {
    pub column: Option<String>,
    pub operator: Option<Operator>,
    pub value: Option<String>,
    pub logic: Option<Logic>,
}

/// Fields left as None are not changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortKeyPatch {
    pub column: Option<String>,
    pub direction: Option<OrderDirection>,
}

impl QueryState {
    /// Selected tables, in selection order.
    pub fn tables(&self) -> &[TableId] {
        &self.tables
    }

    pub fn columns(&self) -> &[SelectedColumn] {
        &self.columns
    }

    /// Joins, in creation order.
    pub fn joins(&self) -> &[Join] {
        &self.joins
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn group_by(&self) -> &[String] {
        &self.group_by
    }

    pub fn sort_keys(&self) -> &[SortKey] {
        &self.sort_keys
    }

    pub fn limit(&self) -> Option<NonZeroU64> {
        self.limit
    }

    pub fn is_selected(&self, table: &TableId) -> bool {
        self.tables.contains(table)
    }

    pub fn is_empty(&self) -> bool {
        *self == QueryState::default()
    }

    pub fn join(&self, id: JoinId) -> Option<&Join> {
        self.joins.iter().find(|join| join.id == id)
    }

    pub fn predicate(&self, id: PredicateId) -> Option<&Predicate> {
        self.predicates.iter().find(|predicate| predicate.id == id)
    }

    /// The id the next join or predicate will get.
    pub(crate) fn upcoming_id(&self) -> u64 {
        self.last_id + 1
    }

    /// Restores the rules [QueryState::apply] keeps: tables are selected once, columns belong
    /// to selected tables and the id counter is past every id in use.
    ///
    /// States built through [QueryState::apply] never need this, deserialized ones might.
    pub(crate) fn without_dangling_references(self) -> Self {
        let mut tables: Vec<TableId> = Vec::with_capacity(self.tables.len());
        for table in self.tables {
            if !tables.contains(&table) {
                tables.push(table);
            }
        }

        let columns = self
            .columns
            .into_iter()
            .filter(|column| tables.contains(&column.table))
            .collect();

        let highest_id = self
            .joins
            .iter()
            .map(|join| join.id.0)
            .chain(self.predicates.iter().map(|predicate| predicate.id.0))
            .max()
            .unwrap_or(0);

        QueryState {
            tables,
            columns,
            last_id: self.last_id.max(highest_id),
            ..self
        }
    }
}

impl Join {
    pub fn references(&self, table: &TableId) -> bool {
        self.left_table.as_ref() == Some(table) || self.right_table.as_ref() == Some(table)
    }
}

impl SelectedColumn {
    pub fn is(&self, table: &TableId, column: &ColumnId) -> bool {
        &self.table == table && &self.column == column
    }
}

impl JoinId {
    pub fn new(id: u64) -> Self {
        JoinId(id)
    }
}

impl PredicateId {
    pub fn new(id: u64) -> Self {
        PredicateId(id)
    }
}

impl Display for JoinId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl Display for PredicateId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_columns_of_unselected_tables_are_dropped() {
        let state = QueryState {
            tables: vec!["users".into()],
            columns: vec![
                SelectedColumn {
                    table: "users".into(),
                    column: "id".into(),
                    alias: None,
                },
                SelectedColumn {
                    table: "orders".into(),
                    column: "total".into(),
                    alias: None,
                },
            ],
            joins: vec![
                Join {
                    id: JoinId(1),
                    left_table: Some("users".into()),
                    right_table: Some("orders".into()),
                    left_column: "id".to_string(),
                    right_column: "user_id".to_string(),
                    join_type: JoinType::Inner,
                },
                Join {
                    id: JoinId(2),
                    left_table: None,
                    right_table: None,
                    left_column: String::new(),
                    right_column: String::new(),
                    join_type: JoinType::Left,
                },
            ],
            last_id: 2,
            ..QueryState::default()
        };

        let state = state.without_dangling_references();

        assert_eq!(state.columns().len(), 1);
        // joins wait for their tables to be selected
        assert_eq!(state.joins().len(), 2);
    }

    #[test]
    fn test_duplicate_tables_and_stale_counters_are_repaired() {
        let state = QueryState {
            tables: vec!["users".into(), "orders".into(), "users".into()],
            predicates: vec![Predicate {
                id: PredicateId(7),
                column: "status".to_string(),
                operator: Operator::Equals,
                value: "active".to_string(),
                logic: Logic::And,
            }],
            joins: vec![Join {
                id: JoinId(4),
                left_table: None,
                right_table: None,
                left_column: String::new(),
                right_column: String::new(),
                join_type: JoinType::Inner,
            }],
            last_id: 2,
            ..QueryState::default()
        };

        let state = state.without_dangling_references();

        let expected: Vec<TableId> = vec!["users".into(), "orders".into()];
        assert_eq!(state.tables(), expected.as_slice());
        assert_eq!(state.upcoming_id(), 8);
    }
}
