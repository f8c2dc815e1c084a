//! Turns the Pest syntax tree into [Command]s.
//!
//! The grammar already guarantees the shape of every node, the only thing that can still fail
//! here is reading numbers that do not fit.
use super::stage1::{Rule, Stage1Rep};
use super::{ColumnRef, Command};
use crate::engine::state::{JoinId, PredicateId, SortKey};
use crate::engine::{JoinType, Logic, Operator, OrderDirection};
use crate::error::InternalError;
use pest::iterators::{Pair, Pairs};
use std::num::ParseIntError;
use std::str::FromStr;

pub fn translate(stage1: Stage1Rep) -> Result<Vec<Command>, crate::Error> {
    let mut pairs = stage1.pest;
    let root = next(&mut pairs);
    assert_eq!(Rule::root, root.as_rule());

    root.into_inner()
        .filter(|pair| pair.as_rule() != Rule::EOI)
        .map(translate_command)
        .collect()
}

fn translate_command(pair: Pair<Rule>) -> Result<Command, crate::Error> {
    let rule = pair.as_rule();
    let mut inner = pair.into_inner();

    let command = match rule {
        Rule::from_command => Command::AddTables(inner.map(|pair| pair.as_str().into()).collect()),
        Rule::drop_command => Command::DropTables(inner.map(|pair| pair.as_str().into()).collect()),
        Rule::select_command => Command::Select(inner.map(translate_column_ref).collect()),
        Rule::unselect_command => Command::Unselect(inner.map(translate_column_ref).collect()),
        Rule::alias_command => Command::Alias {
            column: translate_column_ref(next(&mut inner)),
            alias: next(&mut inner).as_str().to_string(),
        },
        Rule::join_command => Command::Join {
            join_type: translate_join_kind(next(&mut inner)),
            left: translate_column_ref(next(&mut inner)),
            right: translate_column_ref(next(&mut inner)),
        },
        Rule::unjoin_command => Command::Unjoin(JoinId::new(translate_number(next(&mut inner))?)),
        Rule::where_command => translate_condition(Logic::And, next(&mut inner))?,
        Rule::or_command => translate_condition(Logic::Or, next(&mut inner))?,
        Rule::unwhere_command => {
            Command::Unfilter(PredicateId::new(translate_number(next(&mut inner))?))
        }
        Rule::order_command => {
            let sort_keys = inner
                .map(translate_order_item)
                .collect::<Result<Vec<_>, crate::Error>>()?;

            Command::Order(sort_keys)
        }
        Rule::unorder_command => Command::Unorder(translate_number(next(&mut inner))?),
        Rule::group_command => {
            Command::Group(inner.map(|pair| pair.as_str().to_string()).collect())
        }
        Rule::ungroup_command => Command::Ungroup(translate_number(next(&mut inner))?),
        Rule::limit_command => {
            let limit = next(&mut inner);

            match limit.as_rule() {
                Rule::no_limit => Command::Limit(None),
                _ => Command::Limit(Some(translate_number(limit)?)),
            }
        }
        Rule::reset_command => Command::Reset,
        _ => unreachable!("Unknown command {:?}", rule),
    };

    Ok(command)
}

fn translate_column_ref(pair: Pair<Rule>) -> ColumnRef {
    assert_eq!(Rule::column_ref, pair.as_rule());
    let mut inner = pair.into_inner();

    ColumnRef {
        table: next(&mut inner).as_str().into(),
        column: next(&mut inner).as_str().into(),
    }
}

fn translate_join_kind(pair: Pair<Rule>) -> JoinType {
    let kind = pair.into_inner().next().map(|pair| pair.as_rule());

    match kind {
        Some(Rule::left_join) => JoinType::Left,
        Some(Rule::right_join) => JoinType::Right,
        Some(Rule::full_join) => JoinType::FullOuter,
        _ => JoinType::Inner,
    }
}

fn translate_condition(logic: Logic, pair: Pair<Rule>) -> Result<Command, crate::Error> {
    let mut inner = pair.into_inner();
    let column = next(&mut inner).as_str().to_string();
    let operator = next(&mut inner)
        .as_str()
        .parse::<Operator>()
        .map_err(|error| InternalError(error.to_string()))?;
    let value = inner
        .next()
        .map(|value| value.as_str().trim().to_string())
        .unwrap_or_default();

    Ok(Command::Filter {
        logic,
        column,
        operator,
        value,
    })
}

fn translate_order_item(pair: Pair<Rule>) -> Result<SortKey, crate::Error> {
    let mut inner = pair.into_inner();
    let column = next(&mut inner).as_str().to_string();
    let direction = match inner.next() {
        Some(direction) => direction
            .as_str()
            .parse::<OrderDirection>()
            .map_err(|error| InternalError(error.to_string()))?,
        None => OrderDirection::default(),
    };

    Ok(SortKey { column, direction })
}

fn translate_number<T>(pair: Pair<Rule>) -> Result<T, crate::Error>
where
    T: FromStr<Err = ParseIntError>,
{
    assert_eq!(Rule::number, pair.as_rule());

    Ok(pair.as_str().parse::<T>()?)
}

fn next<'a>(pairs: &mut Pairs<'a, Rule>) -> Pair<'a, Rule> {
    pairs.next().expect("Impossible due to pest parsing")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::syntax::parse_script;

    #[test]
    fn test_tables_and_columns() {
        let commands =
            parse_script("from: users orders | s: users.id orders.total | u: orders.total")
                .unwrap();

        assert_eq!(
            commands,
            vec![
                Command::AddTables(vec!["users".into(), "orders".into()]),
                Command::Select(vec![
                    ColumnRef {
                        table: "users".into(),
                        column: "id".into()
                    },
                    ColumnRef {
                        table: "orders".into(),
                        column: "total".into()
                    },
                ]),
                Command::Unselect(vec![ColumnRef {
                    table: "orders".into(),
                    column: "total".into()
                }]),
            ]
        );
    }

    #[test]
    fn test_alias() {
        let commands = parse_script("as: users.email contact").unwrap();

        assert_eq!(
            commands,
            vec![Command::Alias {
                column: ColumnRef {
                    table: "users".into(),
                    column: "email".into()
                },
                alias: "contact".to_string(),
            }]
        );
    }

    #[test]
    fn test_join_kinds() {
        let join_types: Vec<_> = parse_script(
            "j: a.id = b.a_id | lj: a.id = b.a_id | rj: a.id = b.a_id | fj: a.id = b.a_id",
        )
        .unwrap()
        .into_iter()
        .map(|command| match command {
            Command::Join { join_type, .. } => join_type,
            other => panic!("not a join: {:?}", other),
        })
        .collect();

        assert_eq!(
            join_types,
            vec![
                JoinType::Inner,
                JoinType::Left,
                JoinType::Right,
                JoinType::FullOuter
            ]
        );
    }

    #[test]
    fn test_conditions() {
        let commands =
            parse_script("w: status = active | or: users.id is not null | w: name LIKE 'bo%' ")
                .unwrap();

        assert_eq!(
            commands,
            vec![
                Command::Filter {
                    logic: Logic::And,
                    column: "status".to_string(),
                    operator: Operator::Equals,
                    value: "active".to_string(),
                },
                Command::Filter {
                    logic: Logic::Or,
                    column: "users.id".to_string(),
                    operator: Operator::IsNotNull,
                    value: String::new(),
                },
                Command::Filter {
                    logic: Logic::And,
                    column: "name".to_string(),
                    operator: Operator::Like,
                    value: "'bo%'".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_order_group_and_limit() {
        let commands = parse_script("o: total desc, id | g: status, count(*) | l: 10").unwrap();

        assert_eq!(
            commands,
            vec![
                Command::Order(vec![
                    SortKey {
                        column: "total".to_string(),
                        direction: OrderDirection::Descending,
                    },
                    SortKey {
                        column: "id".to_string(),
                        direction: OrderDirection::Ascending,
                    },
                ]),
                Command::Group(vec!["status".to_string(), "count(*)".to_string()]),
                Command::Limit(Some(10)),
            ]
        );
    }

    #[test]
    fn test_removals() {
        let commands =
            parse_script("unjoin: 1 | unwhere: 2 | unorder: 0 | ungroup: 3 | l: none | drop: users")
                .unwrap();

        assert_eq!(
            commands,
            vec![
                Command::Unjoin(JoinId::new(1)),
                Command::Unfilter(PredicateId::new(2)),
                Command::Unorder(0),
                Command::Ungroup(3),
                Command::Limit(None),
                Command::DropTables(vec!["users".into()]),
            ]
        );
    }

    #[test]
    fn test_numbers_that_do_not_fit() {
        assert!(parse_script("l: 99999999999999999999999").is_err());
    }
}
