use crate::engine::catalog::{Catalog, ColumnId, TableId};
use crate::engine::mutation::Mutation;
use crate::engine::state::{
    JoinId, JoinPatch, PredicateId, PredicatePatch, QueryState, SortKeyPatch,
};
use crate::engine::statistics::Statistics;
use crate::engine::{render, Dialect};
use log::{debug, info};
use serde::Serialize;

/// Owns the query state of a session, and keeps the rendered output in sync with it.
///
/// The output is recomputed right after each change, so the SQL and the statistics always
/// describe the same state.
#[derive(Debug, Clone)]
pub struct Session {
    catalog: Catalog,
    dialect: Dialect,
    state: QueryState,
    output: Output,
}

/// What gets shown to the user after each change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Output {
    /// Bumped on every change.
    pub version: u64,
    pub sql: String,
    pub statistics: Statistics,
}

impl Session {
    pub fn new(catalog: Catalog, dialect: Dialect) -> Self {
        Self::restore(catalog, dialect, QueryState::default())
    }

    /// Continues from a state that was saved earlier.
    ///
    /// Columns of tables that are not selected are dropped. Joins are kept and rendered once
    /// both of their tables are selected, same as in a live session.
    pub fn restore(catalog: Catalog, dialect: Dialect, state: QueryState) -> Self {
        let state = state.without_dangling_references();
        let output = Output::of(&state, &catalog, dialect, 0);

        Session {
            catalog,
            dialect,
            state,
            output,
        }
    }

    pub fn apply(&mut self, mutation: Mutation) -> &Output {
        let state = std::mem::take(&mut self.state);
        self.state = state.apply(&self.catalog, mutation);

        self.refresh()
    }

    pub fn output(&self) -> &Output {
        &self.output
    }

    pub fn state(&self) -> &QueryState {
        &self.state
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn into_state(self) -> QueryState {
        self.state
    }

    pub fn set_dialect(&mut self, dialect: Dialect) -> &Output {
        self.dialect = dialect;

        self.refresh()
    }

    /// Swaps the catalog. The selection is kept as it is, even if it points to tables or
    /// columns that are gone; see [Session::prune_to_catalog].
    pub fn replace_catalog(&mut self, catalog: Catalog) -> &Output {
        info!("Replacing catalog, {} tables", catalog.tables().len());
        self.catalog = catalog;

        self.refresh()
    }

    /// Removes the selected tables and columns the catalog doesn't know about. Removing a table
    /// removes its columns and joins as well.
    pub fn prune_to_catalog(&mut self) -> &Output {
        let missing_tables: Vec<TableId> = self
            .state
            .tables()
            .iter()
            .filter(|table| !self.catalog.contains_table(table))
            .cloned()
            .collect();
        let missing_columns: Vec<(TableId, ColumnId)> = self
            .state
            .columns()
            .iter()
            .filter(|c| !self.catalog.contains_column(&c.table, &c.column))
            .map(|c| (c.table.clone(), c.column.clone()))
            .collect();

        debug!(
            "Pruning {} tables and {} columns",
            missing_tables.len(),
            missing_columns.len()
        );

        let removals = missing_tables
            .into_iter()
            .map(Mutation::RemoveTable)
            .chain(
                missing_columns
                    .into_iter()
                    .map(|(table, column)| Mutation::RemoveColumn { table, column }),
            );

        let mut state = std::mem::take(&mut self.state);
        for removal in removals {
            state = state.apply(&self.catalog, removal);
        }
        self.state = state;

        self.refresh()
    }

    pub fn add_table(&mut self, table: impl Into<TableId>) -> &Output {
        self.apply(Mutation::AddTable(table.into()))
    }

    pub fn remove_table(&mut self, table: impl Into<TableId>) -> &Output {
        self.apply(Mutation::RemoveTable(table.into()))
    }

    pub fn add_column(
        &mut self,
        table: impl Into<TableId>,
        column: impl Into<ColumnId>,
    ) -> &Output {
        self.apply(Mutation::AddColumn {
            table: table.into(),
            column: column.into(),
        })
    }

    pub fn remove_column(
        &mut self,
        table: impl Into<TableId>,
        column: impl Into<ColumnId>,
    ) -> &Output {
        self.apply(Mutation::RemoveColumn {
            table: table.into(),
            column: column.into(),
        })
    }

    pub fn set_alias(
        &mut self,
        table: impl Into<TableId>,
        column: impl Into<ColumnId>,
        alias: impl Into<String>,
    ) -> &Output {
        self.apply(Mutation::SetAlias {
            table: table.into(),
            column: column.into(),
            alias: alias.into(),
        })
    }

    /// Returns the id of the new join.
    pub fn add_join(&mut self) -> JoinId {
        let id = JoinId::new(self.state.upcoming_id());
        self.apply(Mutation::AddJoin);

        id
    }

    pub fn update_join(&mut self, id: JoinId, patch: JoinPatch) -> &Output {
        self.apply(Mutation::UpdateJoin { id, patch })
    }

    pub fn remove_join(&mut self, id: JoinId) -> &Output {
        self.apply(Mutation::RemoveJoin(id))
    }

    /// Returns the id of the new predicate.
    pub fn add_predicate(&mut self) -> PredicateId {
        let id = PredicateId::new(self.state.upcoming_id());
        self.apply(Mutation::AddPredicate);

        id
    }

    /// Returns None when the index is past the end of the predicates.
    pub fn insert_predicate(&mut self, index: usize) -> Option<PredicateId> {
        if index > self.state.predicates().len() {
            return None;
        }

        let id = PredicateId::new(self.state.upcoming_id());
        self.apply(Mutation::InsertPredicate(index));

        Some(id)
    }

    pub fn update_predicate(&mut self, id: PredicateId, patch: PredicatePatch) -> &Output {
        self.apply(Mutation::UpdatePredicate { id, patch })
    }

    pub fn remove_predicate(&mut self, id: PredicateId) -> &Output {
        self.apply(Mutation::RemovePredicate(id))
    }

    /// Returns the index of the new sort key.
    pub fn add_sort_key(&mut self) -> usize {
        self.apply(Mutation::AddSortKey);

        self.state.sort_keys().len() - 1
    }

    pub fn update_sort_key(&mut self, index: usize, patch: SortKeyPatch) -> &Output {
        self.apply(Mutation::UpdateSortKey { index, patch })
    }

    pub fn remove_sort_key(&mut self, index: usize) -> &Output {
        self.apply(Mutation::RemoveSortKey(index))
    }

    pub fn add_group_by(&mut self, column: impl Into<String>) -> &Output {
        self.apply(Mutation::AddGroupBy(column.into()))
    }

    pub fn remove_group_by(&mut self, index: usize) -> &Output {
        self.apply(Mutation::RemoveGroupBy(index))
    }

    pub fn set_limit(&mut self, limit: Option<u64>) -> &Output {
        self.apply(Mutation::SetLimit(limit))
    }

    pub fn reset(&mut self) -> &Output {
        self.apply(Mutation::Reset)
    }

    fn refresh(&mut self) -> &Output {
        let version = self.output.version + 1;
        self.output = Output::of(&self.state, &self.catalog, self.dialect, version);

        &self.output
    }
}

impl Output {
    fn of(state: &QueryState, catalog: &Catalog, dialect: Dialect, version: u64) -> Self {
        Output {
            version,
            sql: render(state, catalog, dialect),
            statistics: Statistics::of(state),
        }
    }
}
