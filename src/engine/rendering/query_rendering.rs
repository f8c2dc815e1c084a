use crate::engine::query_builder::{ExplicitJoin, Filter, Identifier, Projection, Query};
use crate::engine::rendering::OptionalClause;
use crate::engine::state::SortKey;
use crate::engine::Dialect;
use std::fmt::{Display, Formatter};

pub fn render_query(query: Query) -> String {
    format!("{};", query.to_string().trim())
}

impl Display for Query<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", RenderableSelect(self.select.as_slice()))?;
        write!(f, "{}", OptionalClause::tables(self.from.as_slice()))?;

        for join in &self.joins {
            write!(f, "\n{join}")?;
        }

        write!(f, "{}", OptionalClause::filter(self.filters.as_slice()))?;
        write!(f, "{}", OptionalClause::group_by(self.group_by))?;
        write!(f, "{}", OptionalClause::order_by(self.orders))?;

        if let Some(limit) = self.limit {
            write!(f, "\nLIMIT {limit}")?;
        }

        Ok(())
    }
}

struct RenderableSelect<'a>(&'a [Projection<'a>]);

impl Display for RenderableSelect<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if let Some((first, rest)) = self.0.split_first() {
            write!(f, "SELECT\n  {first}")?;

            for select in rest {
                write!(f, ",\n  {select}")?;
            }
        } else {
            // Nothing selected yet, this is a placeholder and not a real table.
            write!(f, "SELECT * FROM table_name")?;
        }

        Ok(())
    }
}

impl Display for Projection<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if let Some(table) = &self.table {
            write!(f, "{table}.")?;
        }

        write!(f, "{}", self.column)?;

        if let Some(alias) = &self.alias {
            write!(f, " AS {alias}")?;
        }

        Ok(())
    }
}

impl Display for ExplicitJoin<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let Self {
            join_type,
            left_table,
            left_column,
            right_table,
            right_column,
        } = self;

        write!(
            f,
            "{join_type} JOIN {right_table} ON {left_table}.{left_column} = {right_table}.{right_column}"
        )
    }
}

/// The value is always wrapped in quotes, without any escaping. This includes the IS NULL and
/// IS NOT NULL operators.
impl Display for Filter<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if let Some(logic) = self.logic {
            write!(f, "{logic} ")?;
        }

        let predicate = self.predicate;
        write!(
            f,
            "{} {} '{}'",
            predicate.column, predicate.operator, predicate.value
        )
    }
}

impl Display for SortKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.column, self.direction)
    }
}

impl Display for Identifier<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.dialect {
            Dialect::Generic => write!(f, "{}", self.name),
            Dialect::MariaDB => write!(f, "`{}`", self.name.replace('`', "``")),
            Dialect::PostgreSQL => write!(f, "\"{}\"", self.name.replace('"', "\"\"")),
        }
    }
}
