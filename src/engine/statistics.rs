use crate::engine::state::QueryState;
use serde::Serialize;
use std::fmt::{Display, Formatter};

/// Summary counts shown next to the rendered query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Statistics {
    pub table_count: usize,
    pub column_count: usize,
    pub join_count: usize,
    pub predicate_count: usize,
}

impl Statistics {
    pub fn of(state: &QueryState) -> Self {
        Statistics {
            table_count: state.tables().len(),
            column_count: state.columns().len(),
            join_count: state.joins().len(),
            predicate_count: state.predicates().len(),
        }
    }
}

impl Display for Statistics {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} tables, {} columns, {} joins, {} conditions",
            self.table_count, self.column_count, self.join_count, self.predicate_count
        )
    }
}
