//! Builder scripts, a text form of the mutation API.
//!
//! Scripts are parsed in two stages: Pest builds the syntax tree, which is then translated into
//! [Command]s. Commands are applied to a [Session] through its regular methods, so a script is
//! exactly equivalent to calling those methods by hand.
use crate::engine::catalog::{ColumnId, TableId};
use crate::engine::session::Session;
use crate::engine::state::{JoinId, JoinPatch, PredicateId, PredicatePatch, SortKey, SortKeyPatch};
use crate::engine::{JoinType, Logic, Operator};
use log::debug;
use std::fmt::{Display, Formatter};

pub use stage1::Rule;

mod stage1;
mod translation;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    AddTables(Vec<TableId>),
    DropTables(Vec<TableId>),
    Select(Vec<ColumnRef>),
    Unselect(Vec<ColumnRef>),
    Alias {
        column: ColumnRef,
        alias: String,
    },
    Join {
        join_type: JoinType,
        left: ColumnRef,
        right: ColumnRef,
    },
    Unjoin(JoinId),
    Filter {
        logic: Logic,
        column: String,
        operator: Operator,
        value: String,
    },
    Unfilter(PredicateId),
    Order(Vec<SortKey>),
    Unorder(usize),
    Group(Vec<String>),
    Ungroup(usize),
    Limit(Option<u64>),
    Reset,
}

/// A `table.column` pair, as written in scripts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRef {
    pub table: TableId,
    pub column: ColumnId,
}

pub fn parse_script(input: &str) -> Result<Vec<Command>, crate::Error> {
    let stage1 = stage1::parse_stage1(input)?;

    translation::translate(stage1)
}

/// Parses the whole script before applying anything, a script with a syntax error never leaves
/// the session half changed.
pub fn run_script(session: &mut Session, input: &str) -> Result<(), crate::Error> {
    let commands = parse_script(input)?;
    debug!("running {} commands", commands.len());

    for command in commands {
        command.apply_to(session);
    }

    Ok(())
}

impl Command {
    pub fn apply_to(self, session: &mut Session) {
        match self {
            Command::AddTables(tables) => {
                for table in tables {
                    session.add_table(table);
                }
            }
            Command::DropTables(tables) => {
                for table in tables {
                    session.remove_table(table);
                }
            }
            Command::Select(columns) => {
                for ColumnRef { table, column } in columns {
                    session.add_column(table, column);
                }
            }
            Command::Unselect(columns) => {
                for ColumnRef { table, column } in columns {
                    session.remove_column(table, column);
                }
            }
            Command::Alias { column, alias } => {
                session.set_alias(column.table, column.column, alias);
            }
            Command::Join {
                join_type,
                left,
                right,
            } => {
                let id = session.add_join();
                session.update_join(
                    id,
                    JoinPatch {
                        left_table: Some(left.table),
                        right_table: Some(right.table),
                        left_column: Some(left.column.to_string()),
                        right_column: Some(right.column.to_string()),
                        join_type: Some(join_type),
                    },
                );
            }
            Command::Unjoin(id) => {
                session.remove_join(id);
            }
            Command::Filter {
                logic,
                column,
                operator,
                value,
            } => {
                let id = session.add_predicate();
                session.update_predicate(
                    id,
                    PredicatePatch {
                        column: Some(column),
                        operator: Some(operator),
                        value: Some(value),
                        logic: Some(logic),
                    },
                );
            }
            Command::Unfilter(id) => {
                session.remove_predicate(id);
            }
            Command::Order(sort_keys) => {
                for SortKey { column, direction } in sort_keys {
                    let index = session.add_sort_key();
                    session.update_sort_key(
                        index,
                        SortKeyPatch {
                            column: Some(column),
                            direction: Some(direction),
                        },
                    );
                }
            }
            Command::Unorder(index) => {
                session.remove_sort_key(index);
            }
            Command::Group(columns) => {
                for column in columns {
                    session.add_group_by(column);
                }
            }
            Command::Ungroup(index) => {
                session.remove_group_by(index);
            }
            Command::Limit(limit) => {
                session.set_limit(limit);
            }
            Command::Reset => {
                session.reset();
            }
        }
    }
}

impl Display for ColumnRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.table, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::catalog::sample_catalog;
    use crate::engine::Dialect;

    #[test]
    fn test_run_script() {
        let mut session = Session::new(sample_catalog(), Dialect::Generic);

        run_script(
            &mut session,
            "from: users orders | s: users.id orders.total | j: users.id = orders.user_id",
        )
        .unwrap();

        assert_eq!(
            session.output().sql,
            "SELECT\n  users.id,\n  orders.total\nFROM\n  users, orders\n\
             INNER JOIN orders ON users.id = orders.user_id;"
        );
        assert_eq!(session.output().statistics.join_count, 1);
    }

    #[test]
    fn test_syntax_errors_change_nothing() {
        let mut session = Session::new(sample_catalog(), Dialect::Generic);
        session.add_table("users");
        let before = session.state().clone();

        let result = run_script(&mut session, "drop: users | s users.id");

        assert!(result.is_err());
        assert_eq!(session.state(), &before);
    }

    #[test]
    fn test_ids_from_scripts_can_be_used_later() {
        let mut session = Session::new(sample_catalog(), Dialect::Generic);

        run_script(&mut session, "from: users | w: status = active | or: id = 3").unwrap();
        run_script(&mut session, "unwhere: 1").unwrap();

        assert_eq!(session.state().predicates().len(), 1);
        assert_eq!(session.state().predicates()[0].column, "id");
    }

    #[test]
    fn test_reset_in_a_script() {
        let mut session = Session::new(sample_catalog(), Dialect::Generic);

        run_script(&mut session, "from: users | s: users.id | l: 5 | reset").unwrap();

        assert!(session.state().is_empty());
        assert_eq!(session.output().sql, "SELECT * FROM table_name;");
    }
}
