//! Every change to a [QueryState] goes through [QueryState::apply].
//!
//! Mutations never fail. Anything that does not make sense for the current state, like unknown
//! ids or out of range indexes, leaves the state as it was.
use crate::engine::catalog::{Catalog, ColumnId, TableId};
use crate::engine::state::{
    Join, JoinId, JoinPatch, Predicate, PredicateId, PredicatePatch, QueryState, SelectedColumn,
    SortKey, SortKeyPatch,
};
use log::debug;
use std::num::NonZeroU64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    AddTable(TableId),
    /// Also removes the columns and joins referencing the table.
    RemoveTable(TableId),
    AddColumn {
        table: TableId,
        column: ColumnId,
    },
    RemoveColumn {
        table: TableId,
        column: ColumnId,
    },
    /// An empty alias removes the alias.
    SetAlias {
        table: TableId,
        column: ColumnId,
        alias: String,
    },
    /// Joins the first two selected tables with an INNER JOIN.
    AddJoin,
    UpdateJoin {
        id: JoinId,
        patch: JoinPatch,
    },
    RemoveJoin(JoinId),
    /// Appends `"" = ''`, linked with AND.
    AddPredicate,
    /// Same as [Mutation::AddPredicate], but at a position. The index can be at most the number
    /// of predicates.
    InsertPredicate(usize),
    UpdatePredicate {
        id: PredicateId,
        patch: PredicatePatch,
    },
    RemovePredicate(PredicateId),
    /// Appends an empty ascending sort key.
    AddSortKey,
    UpdateSortKey {
        index: usize,
        patch: SortKeyPatch,
    },
    RemoveSortKey(usize),
    AddGroupBy(String),
    RemoveGroupBy(usize),
    /// None removes the limit. Zero is not a valid limit and is ignored.
    SetLimit(Option<u64>),
    Reset,
}

impl QueryState {
    /// Returns the state after the mutation.
    ///
    /// The catalog is only used to check that tables and columns being added exist.
    pub fn apply(self, catalog: &Catalog, mutation: Mutation) -> QueryState {
        debug!("Applying {:?}", mutation);

        match mutation {
            Mutation::AddTable(table) => self.add_table(catalog, table),
            Mutation::RemoveTable(table) => self.remove_table(&table),
            Mutation::AddColumn { table, column } => self.add_column(catalog, table, column),
            Mutation::RemoveColumn { table, column } => self.remove_column(&table, &column),
            Mutation::SetAlias {
                table,
                column,
                alias,
            } => self.set_alias(&table, &column, alias),
            Mutation::AddJoin => self.add_join(),
            Mutation::UpdateJoin { id, patch } => self.update_join(id, patch),
            Mutation::RemoveJoin(id) => self.remove_join(id),
            Mutation::AddPredicate => {
                let index = self.predicates.len();
                self.insert_predicate(index)
            }
            Mutation::InsertPredicate(index) => self.insert_predicate(index),
            Mutation::UpdatePredicate { id, patch } => self.update_predicate(id, patch),
            Mutation::RemovePredicate(id) => self.remove_predicate(id),
            Mutation::AddSortKey => self.add_sort_key(),
            Mutation::UpdateSortKey { index, patch } => self.update_sort_key(index, patch),
            Mutation::RemoveSortKey(index) => self.remove_sort_key(index),
            Mutation::AddGroupBy(column) => self.add_group_by(column),
            Mutation::RemoveGroupBy(index) => self.remove_group_by(index),
            Mutation::SetLimit(limit) => self.set_limit(limit),
            Mutation::Reset => QueryState::default(),
        }
    }

    fn add_table(mut self, catalog: &Catalog, table: TableId) -> Self {
        if catalog.contains_table(&table) && !self.is_selected(&table) {
            self.tables.push(table);
        }

        self
    }

    /// The table, its columns and its joins go away in a single pass.
    fn remove_table(self, table: &TableId) -> Self {
        if !self.is_selected(table) {
            return self;
        }

        let state = QueryState {
            tables: self.tables.into_iter().filter(|t| t != table).collect(),
            columns: self
                .columns
                .into_iter()
                .filter(|column| &column.table != table)
                .collect(),
            joins: self
                .joins
                .into_iter()
                .filter(|join| !join.references(table))
                .collect(),
            ..self
        };

        debug!(
            "Removed table {table}, {} columns and {} joins remain",
            state.columns.len(),
            state.joins.len()
        );

        state
    }

    fn add_column(mut self, catalog: &Catalog, table: TableId, column: ColumnId) -> Self {
        let already_selected = self.columns.iter().any(|c| c.is(&table, &column));

        if self.is_selected(&table)
            && catalog.contains_column(&table, &column)
            && !already_selected
        {
            self.columns.push(SelectedColumn {
                table,
                column,
                alias: None,
            });
        }

        self
    }

    fn remove_column(mut self, table: &TableId, column: &ColumnId) -> Self {
        self.columns.retain(|c| !c.is(table, column));

        self
    }

    fn set_alias(mut self, table: &TableId, column: &ColumnId, alias: String) -> Self {
        if let Some(selected) = self.columns.iter_mut().find(|c| c.is(table, column)) {
            selected.alias = Some(alias).filter(|alias| !alias.is_empty());
        }

        self
    }

    fn add_join(mut self) -> Self {
        // Either both sides get a default, or neither does.
        let (left_table, right_table) = match self.tables.as_slice() {
            [first, second, ..] => (Some(first.clone()), Some(second.clone())),
            _ => (None, None),
        };

        let id = JoinId::new(self.next_id());
        self.joins.push(Join {
            id,
            left_table,
            right_table,
            left_column: String::new(),
            right_column: String::new(),
            join_type: Default::default(),
        });

        self
    }

    fn update_join(mut self, id: JoinId, patch: JoinPatch) -> Self {
        if let Some(join) = self.joins.iter_mut().find(|join| join.id == id) {
            let JoinPatch {
                left_table,
                right_table,
                left_column,
                right_column,
                join_type,
            } = patch;

            if let Some(left_table) = left_table {
                join.left_table = Some(left_table);
            }
            if let Some(right_table) = right_table {
                join.right_table = Some(right_table);
            }
            if let Some(left_column) = left_column {
                join.left_column = left_column;
            }
            if let Some(right_column) = right_column {
                join.right_column = right_column;
            }
            if let Some(join_type) = join_type {
                join.join_type = join_type;
            }
        }

        self
    }

    fn remove_join(mut self, id: JoinId) -> Self {
        self.joins.retain(|join| join.id != id);

        self
    }

    fn insert_predicate(mut self, index: usize) -> Self {
        if index > self.predicates.len() {
            return self;
        }

        let id = PredicateId::new(self.next_id());
        self.predicates.insert(
            index,
            Predicate {
                id,
                column: String::new(),
                operator: Default::default(),
                value: String::new(),
                logic: Default::default(),
            },
        );

        self
    }

    fn update_predicate(mut self, id: PredicateId, patch: PredicatePatch) -> Self {
        if let Some(predicate) = self.predicates.iter_mut().find(|p| p.id == id) {
            let PredicatePatch {
                column,
                operator,
                value,
                logic,
            } = patch;

            if let Some(column) = column {
                predicate.column = column;
            }
            if let Some(operator) = operator {
                predicate.operator = operator;
            }
            if let Some(value) = value {
                predicate.value = value;
            }
            if let Some(logic) = logic {
                predicate.logic = logic;
            }
        }

        self
    }

    fn remove_predicate(mut self, id: PredicateId) -> Self {
        self.predicates.retain(|predicate| predicate.id != id);

        self
    }

    fn add_sort_key(mut self) -> Self {
        self.sort_keys.push(SortKey::default());

        self
    }

    fn update_sort_key(mut self, index: usize, patch: SortKeyPatch) -> Self {
        if let Some(sort_key) = self.sort_keys.get_mut(index) {
            if let Some(column) = patch.column {
                sort_key.column = column;
            }
            if let Some(direction) = patch.direction {
                sort_key.direction = direction;
            }
        }

        self
    }

    fn remove_sort_key(mut self, index: usize) -> Self {
        if index < self.sort_keys.len() {
            self.sort_keys.remove(index);
        }

        self
    }

    fn add_group_by(mut self, column: String) -> Self {
        self.group_by.push(column);

        self
    }

    fn remove_group_by(mut self, index: usize) -> Self {
        if index < self.group_by.len() {
            self.group_by.remove(index);
        }

        self
    }

    fn set_limit(mut self, limit: Option<u64>) -> Self {
        match limit {
            None => self.limit = None,
            Some(limit) => {
                if let Some(limit) = NonZeroU64::new(limit) {
                    self.limit = Some(limit);
                }
            }
        }

        self
    }

    fn next_id(&mut self) -> u64 {
        self.last_id += 1;

        self.last_id
    }
}
