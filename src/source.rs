/// Row acquisition for the table engine.
///
/// The engine itself only ever sees a materialized `Vec` of rows. This module
/// is the boundary that produces it: a `RowSource` capability, a TTL cache
/// capability with an in-memory implementation, and the development-mode
/// fallback to built-in rows when the primary source fails.

use log::{debug, error};
use lru::LruCache;
use serde::de::DeserializeOwned;
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::num::NonZeroUsize;
use std::path::{Component, Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Cache lifetimes by data freshness.
pub mod ttl {
    use std::time::Duration;

    /// Live game data
    pub const LIVE: Duration = Duration::from_secs(30);
    /// Recent stats
    pub const RECENT: Duration = Duration::from_secs(5 * 60);
    /// General data
    pub const STANDARD: Duration = Duration::from_secs(60 * 60);
    /// Historical or static data
    pub const HISTORICAL: Duration = Duration::from_secs(24 * 60 * 60);
}

/// Errors that can occur while acquiring rows.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FetchError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("rate limited by {resource}, retry after {retry_after_secs}s")]
    RateLimited { resource: String, retry_after_secs: u64 },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("decode error: {0}")]
    Decode(String),
}

impl FetchError {
    /// Short machine-readable name, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::NotFound(_) => "NotFound",
            FetchError::RateLimited { .. } => "RateLimited",
            FetchError::Transport(_) => "Transport",
            FetchError::Decode(_) => "Decode",
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Decode(err.to_string())
    }
}

/// Produces the full row set of one kind for a season.
pub trait RowSource<R> {
    fn fetch_rows(&self, season: &str) -> Result<Vec<R>, FetchError>;
}

/// A fixed row set, returned for every season.
#[derive(Debug, Clone, Default)]
pub struct StaticSource<R> {
    rows: Vec<R>,
}

impl<R> StaticSource<R> {
    pub fn new(rows: Vec<R>) -> Self {
        StaticSource { rows }
    }
}

impl<R: Clone> RowSource<R> for StaticSource<R> {
    fn fetch_rows(&self, _season: &str) -> Result<Vec<R>, FetchError> {
        Ok(self.rows.clone())
    }
}

/// Rows stored as a JSON array, one file per season.
///
/// Files live at `<dir>/<season>/<file_name>`, falling back to
/// `<dir>/<file_name>` when no season directory exists.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    dir: PathBuf,
    file_name: String,
}

impl JsonFileSource {
    pub fn new(dir: impl Into<PathBuf>, file_name: impl Into<String>) -> Self {
        JsonFileSource {
            dir: dir.into(),
            file_name: file_name.into(),
        }
    }

    /// Seasons must be a single plain path segment so reads stay inside `dir`.
    fn path_for(&self, season: &str) -> Result<PathBuf, FetchError> {
        let mut components = Path::new(season).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => {}
            _ => return Err(FetchError::NotFound(format!("season '{}'", season))),
        }
        let seasonal = self.dir.join(season).join(&self.file_name);
        if seasonal.is_file() {
            Ok(seasonal)
        } else {
            Ok(self.dir.join(&self.file_name))
        }
    }

    fn read(path: &Path) -> Result<String, FetchError> {
        fs::read_to_string(path).map_err(|err| match err.kind() {
            ErrorKind::NotFound => FetchError::NotFound(path.display().to_string()),
            _ => FetchError::Transport(format!("{}: {}", path.display(), err)),
        })
    }
}

impl<R: DeserializeOwned> RowSource<R> for JsonFileSource {
    fn fetch_rows(&self, season: &str) -> Result<Vec<R>, FetchError> {
        let path = self.path_for(season)?;
        debug!("reading rows from {}", path.display());
        let text = Self::read(&path)?;
        Ok(serde_json::from_str(&text)?)
    }
}

/// Key/value cache whose entries expire.
pub trait TtlCache<V> {
    fn get(&self, key: &str) -> Option<V>;
    fn set(&self, key: &str, value: V, ttl: Duration);
}

struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

/// Entries a `MemoryCache` holds unless told otherwise.
pub const DEFAULT_CACHE_CAPACITY: usize = 64;

/// In-process cache bounded by entry count.
///
/// The least recently used entry is evicted once the cache is full. Expired
/// entries are evicted when read.
pub struct MemoryCache<V> {
    entries: Mutex<LruCache<String, CacheEntry<V>>>,
}

impl<V> MemoryCache<V> {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }

    /// A cache holding at most `capacity` entries (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        MemoryCache {
            entries: Mutex::new(LruCache::new(cap)),
        }
    }

    pub fn capacity(&self) -> usize {
        self.entries.lock().map(|e| e.cap().get()).unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<V> Default for MemoryCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> fmt::Debug for MemoryCache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryCache")
            .field("entries", &self.len())
            .field("capacity", &self.capacity())
            .finish()
    }
}

impl<V: Clone> TtlCache<V> for MemoryCache<V> {
    fn get(&self, key: &str) -> Option<V> {
        let mut entries = self.entries.lock().ok()?;
        match entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => return Some(entry.value.clone()),
            Some(_) => {}
            None => return None,
        }
        entries.pop(key);
        None
    }

    fn set(&self, key: &str, value: V, ttl: Duration) {
        if let Ok(mut entries) = self.entries.lock() {
            let entry = CacheEntry {
                value,
                expires_at: Instant::now() + ttl,
            };
            if let Some((evicted, _)) = entries.push(key.to_string(), entry) {
                if evicted != key {
                    debug!("cache full; evicted {}", evicted);
                }
            }
        }
    }
}

/// Serve `key` from the cache, or fetch and store it for `ttl`.
///
/// Failed fetches are not cached.
pub fn cached_fetch<V, C, F>(cache: &C, key: &str, ttl: Duration, fetcher: F) -> Result<V, FetchError>
where
    V: Clone,
    C: TtlCache<V> + ?Sized,
    F: FnOnce() -> Result<V, FetchError>,
{
    if let Some(hit) = cache.get(key) {
        debug!("cache hit: {}", key);
        return Ok(hit);
    }
    let value = fetcher()?;
    cache.set(key, value.clone(), ttl);
    Ok(value)
}

/// Deployment environment; decides whether failures fall back to mock rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    /// `"production"` (any case) is production; everything else is development.
    pub fn from_name(name: &str) -> Self {
        if name.trim().eq_ignore_ascii_case("production") {
            Environment::Production
        } else {
            Environment::Development
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Run `primary`; on failure log it, then use `fallback` in development or
/// return the error in production.
pub fn with_fallback<T, F, G>(
    query_name: &str,
    environment: Environment,
    primary: F,
    fallback: G,
) -> Result<T, FetchError>
where
    F: FnOnce() -> Result<T, FetchError>,
    G: FnOnce() -> T,
{
    match primary() {
        Ok(value) => Ok(value),
        Err(err) => {
            let fallback_used = environment == Environment::Development;
            error!(
                "query_failed query={} environment={} fallback_used={} error_kind={} error={}",
                query_name,
                environment,
                fallback_used,
                err.kind(),
                err
            );
            if fallback_used {
                Ok(fallback())
            } else {
                Err(err)
            }
        }
    }
}
