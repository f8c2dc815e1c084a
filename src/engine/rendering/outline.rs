use crate::engine::catalog::{Catalog, TableId};
use crate::engine::state::{Join, QueryState};

/// Lists the catalog and the parts of the query that are addressed by id or index.
///
/// Joins and conditions can only be changed through their id, and sort keys and group by
/// columns through their position. None of these show up in the rendered SQL.
pub fn render_outline(state: &QueryState, catalog: &Catalog) -> String {
    let mut rendering = "/*\nTables:\n".to_string();

    for table in catalog.tables() {
        let marker = if state.is_selected(&table.id) { "*" } else { " " };
        let columns: Vec<_> = table.columns.iter().map(|c| c.id.as_str()).collect();

        rendering.push_str(&format!(
            " {marker} {} ({})\n",
            table.id,
            columns.join(", ")
        ));
    }

    if !state.joins().is_empty() {
        rendering.push_str("Joins:\n");

        for join in state.joins() {
            rendering.push_str(&format!("  {} {}\n", join.id, describe_join(join)));
        }
    }

    if !state.predicates().is_empty() {
        rendering.push_str("Conditions:\n");

        for predicate in state.predicates() {
            rendering.push_str(&format!(
                "  {} {} {} {} '{}'\n",
                predicate.id, predicate.logic, predicate.column, predicate.operator, predicate.value
            ));
        }
    }

    if !state.sort_keys().is_empty() {
        rendering.push_str("Order:\n");

        for (index, sort_key) in state.sort_keys().iter().enumerate() {
            rendering.push_str(&format!("  {index}: {sort_key}\n"));
        }
    }

    if !state.group_by().is_empty() {
        rendering.push_str("Group by:\n");

        for (index, column) in state.group_by().iter().enumerate() {
            rendering.push_str(&format!("  {index}: {column}\n"));
        }
    }

    rendering.push_str("*/--");

    rendering
}

fn describe_join(join: &Join) -> String {
    let side = |table: &Option<TableId>, column: &str| match table {
        Some(table) => format!("{table}.{column}"),
        None => format!("?.{column}"),
    };

    format!(
        "{} {} -> {}",
        join.join_type,
        side(&join.left_table, &join.left_column),
        side(&join.right_table, &join.right_column)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::catalog::sample_catalog;
    use crate::engine::mutation::Mutation;

    #[test]
    fn test_outline() {
        let catalog = sample_catalog();
        let state = [
            Mutation::AddTable("users".into()),
            Mutation::AddJoin,
            Mutation::AddPredicate,
            Mutation::AddSortKey,
        ]
        .into_iter()
        .fold(QueryState::default(), |state, mutation| {
            state.apply(&catalog, mutation)
        });

        assert_eq!(
            render_outline(&state, &catalog),
            "/*\nTables:\n \
             * users (id, email, status)\n   \
             orders (id, user_id, total)\n   \
             products (id, name)\n\
             Joins:\n  #1 INNER ?. -> ?.\n\
             Conditions:\n  #2 AND  = ''\n\
             Order:\n  0:  ASC\n\
             */--"
        );
    }
}
