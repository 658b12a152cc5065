//! Feed fetching, parsing and caching.
//!
//! Loads are tagged with a generation number. Switching variants while a
//! load is still in flight starts a newer generation, and the sheet drops any
//! outcome that does not belong to the latest one.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use log::{debug, info};
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};

use crate::error::FeedError;
use crate::model::RawRecord;

/// Where feed documents come from.
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Fetches the document text for a feed name.
    async fn fetch(&self, name: &str) -> Result<String, FeedError>;
}

/// Reads feeds from files under a root directory.
#[derive(Debug, Clone)]
pub struct FileSource {
    root: PathBuf,
}

impl FileSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl FeedSource for FileSource {
    async fn fetch(&self, name: &str) -> Result<String, FeedError> {
        let path = self.root.join(name);
        debug!("Reading feed from {}", path.display());
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| FeedError::io(path, e))
    }
}

/// Serialization format, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedFormat {
    Yaml,
    Json,
}

impl FeedFormat {
    pub fn from_name(name: &str) -> Option<Self> {
        let extension = Path::new(name).extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "yaml" | "yml" => Some(Self::Yaml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FeedDocument {
    #[serde(default, deserialize_with = "entries")]
    dinos: Vec<RawRecord>,
}

/// Reads the record list. A non-list reads as empty; an entry that is not a
/// mapping becomes an empty record so positions stay intact.
fn entries<'de, D>(deserializer: D) -> Result<Vec<RawRecord>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Entry {
        Record(RawRecord),
        Other(IgnoredAny),
    }

    let entries: Vec<Entry> = crate::model::lenient(deserializer)?;
    Ok(entries
        .into_iter()
        .map(|entry| match entry {
            Entry::Record(record) => record,
            Entry::Other(_) => RawRecord::default(),
        })
        .collect())
}

/// Parses a feed document. An empty or null document yields no records.
pub fn parse_feed(name: &str, text: &str) -> Result<Vec<RawRecord>, FeedError> {
    let document: Option<FeedDocument> = match FeedFormat::from_name(name) {
        Some(FeedFormat::Yaml) => serde_yaml::from_str(text).map_err(|source| FeedError::Yaml {
            name: name.to_string(),
            source,
        })?,
        Some(FeedFormat::Json) => serde_json::from_str(text).map_err(|source| FeedError::Json {
            name: name.to_string(),
            source,
        })?,
        None => return Err(FeedError::UnsupportedFormat(name.to_string())),
    };
    Ok(document.unwrap_or_default().dinos)
}

/// Identifies one load request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    pub generation: u64,
    pub name: String,
}

/// Result of a load, tagged with the ticket that started it.
#[derive(Debug)]
pub struct LoadOutcome {
    pub ticket: LoadTicket,
    pub result: Result<Arc<Vec<RawRecord>>, FeedError>,
}

/// Fetches and caches parsed feeds by name.
pub struct FeedLoader {
    source: Arc<dyn FeedSource>,
    cache: DashMap<String, Arc<Vec<RawRecord>>>,
    generation: AtomicU64,
}

impl FeedLoader {
    pub fn new(source: impl FeedSource + 'static) -> Self {
        Self {
            source: Arc::new(source),
            cache: DashMap::new(),
            generation: AtomicU64::new(0),
        }
    }

    /// Starts a new load generation for `name`.
    pub fn begin(&self, name: impl Into<String>) -> LoadTicket {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        LoadTicket {
            generation,
            name: name.into(),
        }
    }

    /// Loads the feed named by the ticket, from cache when possible.
    ///
    /// Only successful parses are cached, so a failed load is retried next
    /// time.
    pub async fn load(&self, ticket: LoadTicket) -> LoadOutcome {
        if let Some(cached) = self.cache.get(&ticket.name) {
            debug!("Feed cache hit: {}", ticket.name);
            let result = Ok(Arc::clone(cached.value()));
            return LoadOutcome { ticket, result };
        }

        let result = match self.source.fetch(&ticket.name).await {
            Ok(text) => parse_feed(&ticket.name, &text).map(Arc::new),
            Err(e) => Err(e),
        };

        if let Ok(records) = &result {
            info!("Loaded {} records from {}", records.len(), ticket.name);
            self.cache.insert(ticket.name.clone(), Arc::clone(records));
        }
        LoadOutcome { ticket, result }
    }

    /// Drops a cached feed so the next load fetches it again.
    pub fn invalidate(&self, name: &str) {
        self.cache.remove(name);
    }

    pub fn is_cached(&self, name: &str) -> bool {
        self.cache.contains_key(name)
    }
}

impl std::fmt::Debug for FeedLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedLoader")
            .field("cached", &self.cache.len())
            .field("generation", &self.generation.load(Ordering::SeqCst))
            .finish()
    }
}
