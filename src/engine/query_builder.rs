//! Resolves a [QueryState] against the catalog into a [Query] that only needs to be displayed.
//!
//! Everything that can't be resolved is left out here, so rendering itself can't fail.
use crate::engine::catalog::{Catalog, Table, TableId};
use crate::engine::state::{Join, Predicate, QueryState, SortKey};
use crate::engine::{Dialect, JoinType, Logic};
use std::num::NonZeroU64;

pub fn build_query<'a>(
    state: &'a QueryState,
    catalog: &'a Catalog,
    dialect: Dialect,
) -> Query<'a> {
    QueryBuilder {
        state,
        catalog,
        dialect,
    }
    .build()
}

#[derive(Debug)]
pub struct Query<'a> {
    /// Empty means the "SELECT *" placeholder.
    pub select: Vec<Projection<'a>>,
    pub from: Vec<Identifier<'a>>,
    pub joins: Vec<ExplicitJoin<'a>>,
    pub filters: Vec<Filter<'a>>,
    pub group_by: &'a [String],
    pub orders: &'a [SortKey],
    pub limit: Option<NonZeroU64>,
}

/// A name that will be quoted according to the dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identifier<'a> {
    pub name: &'a str,
    pub dialect: Dialect,
}

#[derive(Debug)]
pub struct Projection<'a> {
    /// Only present when more than one table is selected.
    pub table: Option<Identifier<'a>>,
    pub column: Identifier<'a>,
    pub alias: Option<Identifier<'a>>,
}

#[derive(Debug)]
pub struct ExplicitJoin<'a> {
    pub join_type: JoinType,
    pub left_table: Identifier<'a>,
    pub left_column: Identifier<'a>,
    /// The table to join to.
    pub right_table: Identifier<'a>,
    pub right_column: Identifier<'a>,
}

#[derive(Debug)]
pub struct Filter<'a> {
    /// None for the first filter.
    pub logic: Option<Logic>,
    pub predicate: &'a Predicate,
}

struct QueryBuilder<'a> {
    state: &'a QueryState,
    catalog: &'a Catalog,
    dialect: Dialect,
}

impl<'a> QueryBuilder<'a> {
    fn build(self) -> Query<'a> {
        Query {
            select: self.process_selects(),
            from: self.process_from(),
            joins: self.process_joins(),
            filters: self.process_filters(),
            group_by: self.state.group_by(),
            orders: self.state.sort_keys(),
            limit: self.state.limit(),
        }
    }

    /// Columns are qualified with their table name only if more than one table is selected.
    fn process_selects(&self) -> Vec<Projection<'a>> {
        let qualify = self.state.tables().len() > 1;

        self.state
            .columns()
            .iter()
            .filter_map(|selected| {
                let (table, column) = self.catalog.column(&selected.table, &selected.column)?;

                Some(Projection {
                    table: qualify.then(|| self.identifier(&table.name)),
                    column: self.identifier(&column.name),
                    alias: selected.alias.as_deref().map(|alias| self.identifier(alias)),
                })
            })
            .collect()
    }

    /// The FROM clause lists every selected table, even the ones that are also joined.
    fn process_from(&self) -> Vec<Identifier<'a>> {
        self.state
            .tables()
            .iter()
            .filter_map(|table| self.catalog.table(table))
            .map(|table| self.identifier(&table.name))
            .collect()
    }

    fn process_joins(&self) -> Vec<ExplicitJoin<'a>> {
        self.state
            .joins()
            .iter()
            .filter_map(|join| self.process_join(join))
            .collect()
    }

    /// Joins with an endpoint that is not a selected table are skipped.
    fn process_join(&self, join: &'a Join) -> Option<ExplicitJoin<'a>> {
        let resolve = |table: &'a Option<TableId>| -> Option<&'a Table> {
            table
                .as_ref()
                .filter(|table| self.state.is_selected(table))
                .and_then(|table| self.catalog.table(table))
        };

        let left_table = resolve(&join.left_table)?;
        let right_table = resolve(&join.right_table)?;

        Some(ExplicitJoin {
            join_type: join.join_type,
            left_table: self.identifier(&left_table.name),
            left_column: self.identifier(&join.left_column),
            right_table: self.identifier(&right_table.name),
            right_column: self.identifier(&join.right_column),
        })
    }

    fn process_filters(&self) -> Vec<Filter<'a>> {
        self.state
            .predicates()
            .iter()
            .enumerate()
            .map(|(index, predicate)| Filter {
                logic: (index > 0).then_some(predicate.logic),
                predicate,
            })
            .collect()
    }

    fn identifier(&self, name: &'a str) -> Identifier<'a> {
        Identifier {
            name,
            dialect: self.dialect,
        }
    }
}
