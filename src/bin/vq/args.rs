use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use visual_query::context::Context;
use visual_query::Dialect;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Creates a context.
    ///
    /// Contexts allow the vq command to switch between different catalogs. Each context keeps
    /// its own query.
    CreateContext(ContextParams),
    /// Selects an existing context.
    UseContext { name: String },
    /// List available contexts.
    ListContexts,
    /// Runs a builder script against the query of the current context.
    ///
    /// Example: vq apply "from: users orders | s: users.id orders.total | j: users.id = orders.user_id"
    Apply { script: String },
    /// Prints the query of the current context.
    Show {
        /// Also list the catalog, and the ids of joins and conditions
        #[arg(long)]
        outline: bool,
        /// Print the SQL and statistics as JSON
        #[arg(long, conflicts_with = "outline")]
        json: bool,
    },
    /// Clears the query of the current context.
    Reset,
    /// Renders a builder script on its own, without reading or changing any context.
    Translate {
        script: String,
        /// Catalog file: JSON, or CREATE TABLE statements
        #[arg(long)]
        catalog: PathBuf,
        #[arg(long, value_enum, default_value_t = DialectArg::Generic)]
        dialect: DialectArg,
    },
}

#[derive(clap::Args, Debug)]
pub struct ContextParams {
    /// You can reuse your context by referencing this name
    name: String,
    /// Catalog file: JSON, or CREATE TABLE statements
    #[arg(short, long)]
    catalog: PathBuf,
    /// How identifiers are quoted in the rendered SQL
    #[arg(short, long, value_enum, default_value_t = DialectArg::Generic)]
    dialect: DialectArg,
    /// Use the new context
    #[arg(long = "use")]
    pub use_it: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum DialectArg {
    Generic,
    Mariadb,
    Postgres,
}

impl From<DialectArg> for Dialect {
    fn from(value: DialectArg) -> Self {
        match value {
            DialectArg::Generic => Dialect::Generic,
            DialectArg::Mariadb => Dialect::MariaDB,
            DialectArg::Postgres => Dialect::PostgreSQL,
        }
    }
}

impl From<ContextParams> for Context {
    fn from(value: ContextParams) -> Self {
        Context {
            name: value.name.into(),
            catalog: value.catalog,
            dialect: value.dialect.into(),
        }
    }
}
