use crate::cache;
use crate::cache::Cacheable;
use crate::engine::catalog::Catalog;
use crate::engine::session::Session;
use crate::engine::state::QueryState;
use crate::engine::Dialect;
use crate::error::InternalError;
use log::info;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

/// A named pairing of a catalog file and the dialect queries are rendered in.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Context {
    pub name: ContextName,
    pub catalog: PathBuf,
    pub dialect: Dialect,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ContextName(String);

/// The query state of a context, kept between runs.
#[derive(Debug, Serialize, Deserialize)]
pub struct SavedQuery {
    pub context: ContextName,
    pub state: QueryState,
}

impl ContextName {
    pub fn current() -> Result<ContextName, crate::Error> {
        // All context names use the same cache key, because that's how we save the current
        // context. Reading a context named "any" will just get us the current context.
        cache::read(&ContextName("any".to_string()).cache_key())
    }

    /// Context names end up in cache file names, so they can't point outside the cache folder.
    pub fn validate(&self) -> Result<(), crate::Error> {
        let name = self.0.as_str();

        if name.trim().is_empty() {
            return Err(InternalError("context names can't be empty".to_string()).into());
        }

        if name.contains(['/', '\\']) || name.contains("..") {
            return Err(InternalError(format!(
                "context name '{name}' can't contain path separators or '..'"
            ))
            .into());
        }

        Ok(())
    }
}

impl Context {
    pub fn current() -> Result<Context, crate::Error> {
        cache::read(&ContextName::current()?)
    }

    pub fn load_catalog(&self) -> Result<Catalog, crate::Error> {
        Catalog::load(&self.catalog)
    }

    /// Picks up where the last run left off, or starts from an empty query.
    ///
    /// The catalog is read again every time, so selections that no longer exist in it are
    /// left out of the rendered query.
    pub fn open_session(&self) -> Result<Session, crate::Error> {
        let catalog = self.load_catalog()?;
        let saved: Option<SavedQuery> = cache::read_optional(&self.name)?;

        let session = match saved {
            Some(saved) => {
                info!("Restoring the query of context {}", self.name);
                Session::restore(catalog, self.dialect, saved.state)
            }
            None => Session::new(catalog, self.dialect),
        };

        Ok(session)
    }

    pub fn save_session(&self, session: &Session) -> Result<(), crate::Error> {
        cache::write(&SavedQuery {
            context: self.name.clone(),
            state: session.state().clone(),
        })
    }
}

impl From<String> for ContextName {
    fn from(value: String) -> Self {
        ContextName(value)
    }
}

impl From<&str> for ContextName {
    fn from(value: &str) -> Self {
        ContextName(value.to_string())
    }
}

impl From<ContextName> for String {
    fn from(value: ContextName) -> Self {
        value.0
    }
}

impl Display for ContextName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
