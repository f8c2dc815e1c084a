/// The known tables and columns.
pub mod catalog;
/// The operations that change a [state::QueryState].
pub mod mutation;
mod query_builder;
mod rendering;
/// The selection store: a query state, its catalog and the output derived from them.
pub mod session;
pub mod state;
pub mod statistics;
/// Builder scripts: a compact text form of mutation sequences.
pub mod syntax;


pub use rendering::{render, render_outline};

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// The kind of JOIN clause, rendered verbatim as `{type} JOIN`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JoinType {
    #[default]
    #[serde(rename = "INNER")]
    Inner,
    #[serde(rename = "LEFT")]
    Left,
    #[serde(rename = "RIGHT")]
    Right,
    #[serde(rename = "FULL OUTER")]
    FullOuter,
}

/// Comparison used by a WHERE predicate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    #[default]
    #[serde(rename = "=")]
    Equals,
    #[serde(rename = "!=")]
    NotEquals,
    #[serde(rename = "<")]
    LesserThan,
    #[serde(rename = ">")]
    GreaterThan,
    #[serde(rename = "<=")]
    LesserOrEqual,
    #[serde(rename = ">=")]
    GreaterOrEqual,
    #[serde(rename = "LIKE")]
    Like,
    #[serde(rename = "IN")]
    In,
    #[serde(rename = "IS NULL")]
    IsNull,
    #[serde(rename = "IS NOT NULL")]
    IsNotNull,
}

/// How a predicate attaches to the one before it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Logic {
    #[default]
    #[serde(rename = "AND")]
    And,
    #[serde(rename = "OR")]
    Or,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderDirection {
    #[default]
    #[serde(rename = "ASC")]
    Ascending,
    #[serde(rename = "DESC")]
    Descending,
}

/// Controls how identifiers resolved from the catalog are quoted.
///
/// Free-text columns typed by the user (predicates, sort keys, group by) are never quoted, they
/// might be expressions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dialect {
    /// Identifiers are rendered as they are.
    #[default]
    Generic,
    /// `backtick` quoting.
    MariaDB,
    /// "double quote" quoting.
    PostgreSQL,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownKeyword(pub String);

impl Display for JoinType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let keyword = match self {
            JoinType::Inner => "INNER",
            JoinType::Left => "LEFT",
            JoinType::Right => "RIGHT",
            JoinType::FullOuter => "FULL OUTER",
        };

        write!(f, "{keyword}")
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let symbol = match self {
            Operator::Equals => "=",
            Operator::NotEquals => "!=",
            Operator::LesserThan => "<",
            Operator::GreaterThan => ">",
            Operator::LesserOrEqual => "<=",
            Operator::GreaterOrEqual => ">=",
            Operator::Like => "LIKE",
            Operator::In => "IN",
            Operator::IsNull => "IS NULL",
            Operator::IsNotNull => "IS NOT NULL",
        };

        write!(f, "{symbol}")
    }
}

impl Display for Logic {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Logic::And => write!(f, "AND"),
            Logic::Or => write!(f, "OR"),
        }
    }
}

impl Display for OrderDirection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderDirection::Ascending => write!(f, "ASC"),
            OrderDirection::Descending => write!(f, "DESC"),
        }
    }
}

impl Display for Dialect {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Dialect::Generic => write!(f, "generic"),
            Dialect::MariaDB => write!(f, "mariadb"),
            Dialect::PostgreSQL => write!(f, "postgres"),
        }
    }
}

/// Operators are matched case-insensitively, and the spacing inside "IS NOT NULL" does not
/// matter.
impl FromStr for Operator {
    type Err = UnknownKeyword;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let normalized = input
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_uppercase();

        let operator = match normalized.as_str() {
            "=" => Operator::Equals,
            "!=" => Operator::NotEquals,
            "<" => Operator::LesserThan,
            ">" => Operator::GreaterThan,
            "<=" => Operator::LesserOrEqual,
            ">=" => Operator::GreaterOrEqual,
            "LIKE" => Operator::Like,
            "IN" => Operator::In,
            "IS NULL" => Operator::IsNull,
            "IS NOT NULL" => Operator::IsNotNull,
            _ => return Err(UnknownKeyword(input.to_string())),
        };

        Ok(operator)
    }
}

impl FromStr for OrderDirection {
    type Err = UnknownKeyword;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.to_uppercase().as_str() {
            "ASC" => Ok(OrderDirection::Ascending),
            "DESC" => Ok(OrderDirection::Descending),
            _ => Err(UnknownKeyword(input.to_string())),
        }
    }
}

impl Display for UnknownKeyword {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Unknown keyword \"{}\"", self.0)
    }
}

impl std::error::Error for UnknownKeyword {}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_operator_keywords_ignore_case_and_spacing() {
        assert_eq!(Operator::IsNotNull, "is  not\tnull".parse().unwrap());
        assert_eq!(Operator::Like, "like".parse().unwrap());
        assert_eq!(Operator::LesserOrEqual, "<=".parse().unwrap());
        assert!("=>".parse::<Operator>().is_err());
    }

    #[test]
    fn test_join_types_render_verbatim() {
        assert_eq!("FULL OUTER", JoinType::FullOuter.to_string());
        assert_eq!("INNER", JoinType::default().to_string());
    }
}
