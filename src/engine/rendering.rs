pub use outline::render_outline;
pub use query_rendering::render_query;

use crate::engine::catalog::Catalog;
use crate::engine::query_builder::build_query;
use crate::engine::state::QueryState;
use crate::engine::Dialect;
use std::fmt::{Display, Formatter};

mod outline;
mod query_rendering;

/// Renders the SQL for a query state.
///
/// The same state, catalog and dialect always render to the same string.
pub fn render(state: &QueryState, catalog: &Catalog, dialect: Dialect) -> String {
    render_query(build_query(state, catalog, dialect))
}

struct OptionalClause<'a, T> {
    intro: &'a str,
    ligature: &'a str,
    items: &'a [T],
}

impl<'a, T> OptionalClause<'a, T> {
    fn tables(items: &'a [T]) -> Self {
        OptionalClause {
            intro: "FROM",
            ligature: ", ",
            items,
        }
    }

    fn filter(items: &'a [T]) -> Self {
        OptionalClause {
            intro: "WHERE",
            ligature: "\n  ",
            items,
        }
    }

    fn group_by(items: &'a [T]) -> Self {
        OptionalClause {
            intro: "GROUP BY",
            ligature: ", ",
            items,
        }
    }

    fn order_by(items: &'a [T]) -> Self {
        OptionalClause {
            intro: "ORDER BY",
            ligature: ", ",
            items,
        }
    }
}

/// Displays things like "FROM\n  a, b", "WHERE\n  x\n  AND y" and "ORDER BY\n  1, 2, 3".
/// These are all optional clauses that start on a new line and have a ligature between each
/// element. Nothing is displayed for empty clauses.
impl<'a, T> Display for OptionalClause<'a, T>
where
    T: Display,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let Self {
            intro,
            ligature,
            items,
        } = self;

        if let Some((first, rest)) = items.split_first() {
            write!(f, "\n{intro}\n  {first}")?;

            for item in rest {
                write!(f, "{ligature}{item}")?;
            }
        }

        Ok(())
    }
}
