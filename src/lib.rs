// I don't really care, and it's not important for this project
#![allow(clippy::result_large_err)]

pub mod cache;
pub mod context;
mod engine;
mod error;

pub use engine::catalog::{Catalog, CatalogParseError, Column, ColumnId, Table, TableId};
pub use engine::mutation::Mutation;
pub use engine::session::{Output, Session};
pub use engine::state::{
    Join, JoinId, JoinPatch, Predicate, PredicateId, PredicatePatch, QueryState, SelectedColumn,
    SortKey, SortKeyPatch,
};
pub use engine::statistics::Statistics;
pub use engine::syntax::{parse_script, run_script, ColumnRef, Command};
pub use engine::{
    render, render_outline, Dialect, JoinType, Logic, Operator, OrderDirection, UnknownKeyword,
};

pub use error::{Error, ErrorKind, InternalError};
