//! Contexts and saved query states are kept between runs of the CLI as JSON files.
//!
//! To use the cache system, implement the Cacheable and CacheKey traits, then you can
//! use the read() and write() functions.
use crate::context::{Context, ContextName, SavedQuery};
use log::debug;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io::ErrorKind as IoErrorKind;
use std::path::PathBuf;

/// Overrides the cache root, which is `$HOME/.cache/visual-query/cache/v1` otherwise.
pub const CACHE_DIR_VARIABLE: &str = "VISUAL_QUERY_CACHE_DIR";

/// You need a cache key in order to read something from cache.
pub trait CacheKey {
    fn as_path(&self) -> String;
}

/// Anything that can be cached needs to implement this trait.
///
/// The associated CacheKey type pairs a cacheable struct with its key, so reading a struct with
/// the key of another one does not compile:
/// ```
/// use visual_query::cache::read;
/// use visual_query::context::{Context, ContextName};
///
/// # fn main() -> Result<(), visual_query::Error> {
/// # std::env::set_var("VISUAL_QUERY_CACHE_DIR", std::env::temp_dir().join("vq-doc-test"));
/// let context: Option<Context> = read(&ContextName::from("local")).ok();
/// //           ^^^^^^^^^^^^^^^ -- Context::CacheKey == ContextName
/// # Ok(())
/// # }
/// ```
pub trait Cacheable {
    type CacheKey;

    fn cache_key(&self) -> Self::CacheKey;

    /// All structs of the same type are saved in the same folder, named after the type id.
    fn type_id() -> &'static str;
}

pub fn read<D, K>(cache_key: &K) -> Result<D, crate::Error>
where
    D: Cacheable<CacheKey = K> + DeserializeOwned,
    K: CacheKey,
{
    let file_location = get_cache_path(D::type_id(), cache_key.as_path().as_str())?;
    debug!("reading {}", file_location.display());

    let data = serde_json::from_reader(fs::File::open(file_location)?)?;

    Ok(data)
}

/// Same as [read], but a missing file is not an error.
pub fn read_optional<D, K>(cache_key: &K) -> Result<Option<D>, crate::Error>
where
    D: Cacheable<CacheKey = K> + DeserializeOwned,
    K: CacheKey,
{
    let file_location = get_cache_path(D::type_id(), cache_key.as_path().as_str())?;

    match fs::File::open(&file_location) {
        Ok(file) => Ok(Some(serde_json::from_reader(file)?)),
        Err(error) if error.kind() == IoErrorKind::NotFound => {
            debug!("nothing cached at {}", file_location.display());

            Ok(None)
        }
        Err(error) => Err(error.into()),
    }
}

/// Reads everything cached for a type, sorted by file name.
pub fn read_all<D>() -> Result<Vec<D>, crate::Error>
where
    D: Cacheable + DeserializeOwned,
{
    let folder = require_cache_folder(D::type_id())?;

    let mut paths = fs::read_dir(folder)?
        .map(|entry| Ok(entry?.path()))
        .collect::<Result<Vec<_>, crate::Error>>()?;
    paths.sort();

    paths
        .into_iter()
        .filter(|path| path.extension().is_some_and(|extension| extension == "json"))
        .map(|path| -> Result<D, crate::Error> {
            Ok(serde_json::from_reader(fs::File::open(path)?)?)
        })
        .collect()
}

pub fn write<D, K>(data: &D) -> Result<(), crate::Error>
where
    D: Cacheable<CacheKey = K> + Serialize,
    K: CacheKey,
{
    let file_location = get_cache_path(D::type_id(), data.cache_key().as_path().as_str())?;
    debug!("writing {}", file_location.display());

    let data = serde_json::to_string(&data)?;

    fs::write(file_location, data)?;

    Ok(())
}

fn get_cache_path(type_id: &'static str, cache_key: &str) -> Result<PathBuf, crate::Error> {
    let mut location = require_cache_folder(type_id)?;

    location.push(cache_key);

    Ok(location)
}

fn require_cache_folder(type_id: &'static str) -> Result<PathBuf, crate::Error> {
    let mut path = cache_root()?;
    path.push(type_id);

    fs::create_dir_all(&path)?;

    Ok(path)
}

fn cache_root() -> Result<PathBuf, crate::Error> {
    if let Ok(root) = std::env::var(CACHE_DIR_VARIABLE) {
        return Ok(PathBuf::from(root));
    }

    let home = std::env::var("HOME")?;

    let mut path = PathBuf::from(home);
    path.push(".cache");
    path.push("visual-query");
    path.push("cache");
    path.push("v1");

    Ok(path)
}

// Please dump all impls here, so we keep the rest of the code base clean.

impl Cacheable for Context {
    type CacheKey = ContextName;

    fn cache_key(&self) -> Self::CacheKey {
        self.name.clone()
    }

    fn type_id() -> &'static str {
        "context"
    }
}

impl CacheKey for ContextName {
    fn as_path(&self) -> String {
        format!("context_{}.json", self)
    }
}

impl Cacheable for ContextName {
    type CacheKey = SharedCacheKey;

    fn cache_key(&self) -> Self::CacheKey {
        SharedCacheKey(Self::type_id().to_owned())
    }

    fn type_id() -> &'static str {
        "current_context"
    }
}

impl Cacheable for SavedQuery {
    type CacheKey = ContextName;

    fn cache_key(&self) -> Self::CacheKey {
        self.context.clone()
    }

    fn type_id() -> &'static str {
        "query_state"
    }
}

pub struct SharedCacheKey(String);

impl CacheKey for SharedCacheKey {
    fn as_path(&self) -> String {
        self.0.clone()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::engine::Dialect;
    use std::sync::Mutex;

    /// Tests that touch the cache root environment variable have to take turns.
    pub(crate) static CACHE_DIR_LOCK: Mutex<()> = Mutex::new(());

    pub(crate) fn use_temporary_cache(name: &str) -> PathBuf {
        let folder = format!("visual-query-{name}-{}", std::process::id());
        let root = std::env::temp_dir().join(folder);
        let _ = fs::remove_dir_all(&root);
        std::env::set_var(CACHE_DIR_VARIABLE, &root);

        root
    }

    #[test]
    fn test_write_then_read() {
        let _lock = CACHE_DIR_LOCK.lock().unwrap_or_else(|poison| poison.into_inner());
        use_temporary_cache("write-read");

        let context = Context {
            name: "local".into(),
            catalog: PathBuf::from("catalog.sql"),
            dialect: Dialect::MariaDB,
        };
        write(&context).unwrap();

        let read_back: Context = read(&ContextName::from("local")).unwrap();
        assert_eq!(read_back, context);

        let missing: Option<Context> = read_optional(&ContextName::from("remote")).unwrap();
        assert!(missing.is_none());
    }

    #[test]
    fn test_read_all() {
        let _lock = CACHE_DIR_LOCK.lock().unwrap_or_else(|poison| poison.into_inner());
        use_temporary_cache("read-all");

        for name in ["b", "a"] {
            write(&Context {
                name: name.into(),
                catalog: PathBuf::from(format!("{name}.json")),
                dialect: Dialect::Generic,
            })
            .unwrap();
        }

        let contexts: Vec<Context> = read_all().unwrap();
        let names: Vec<_> = contexts.iter().map(|c| c.name.to_string()).collect();

        assert_eq!(names, vec!["a", "b"]);
    }
}
