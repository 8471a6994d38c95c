use async_trait::async_trait;
use dashmap::mapref::entry::Entry as MapEntry;
use dashmap::DashMap;
use jiff::Timestamp;
use snip_core::repository::{ReadRepository, Repository, Result, UrlRecord};
use snip_core::{ShortCode, StorageError};

/// In-memory storage entry for a URL mapping.
#[derive(Debug, Clone)]
struct Entry {
    long_url: String,
    created_at: Timestamp,
    hits: u64,
}

impl Entry {
    fn into_record(self, code: &ShortCode) -> UrlRecord {
        UrlRecord {
            code: code.clone(),
            long_url: self.long_url,
            created_at: self.created_at,
            hits: self.hits,
        }
    }
}

/// In-memory implementation of the Repository trait using DashMap.
///
/// DashMap provides better concurrency than RwLock<HashMap> because it
/// uses sharded locks, allowing concurrent reads and writes to different
/// buckets without blocking.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    storage: DashMap<String, Entry>,
}

impl InMemoryRepository {
    /// Creates a new in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new in-memory repository with the specified capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            storage: DashMap::with_capacity(capacity),
        }
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }
}

#[async_trait]
impl ReadRepository for InMemoryRepository {
    async fn get_long_url(&self, code: &ShortCode) -> Result<Option<String>> {
        Ok(self
            .storage
            .get(code.as_str())
            .map(|entry| entry.long_url.clone()))
    }

    async fn get(&self, code: &ShortCode) -> Result<Option<UrlRecord>> {
        Ok(self
            .storage
            .get(code.as_str())
            .map(|entry| entry.clone().into_record(code)))
    }

    async fn exists(&self, code: &ShortCode) -> Result<bool> {
        Ok(self.storage.contains_key(code.as_str()))
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn insert(&self, code: &ShortCode, long_url: &str) -> Result<()> {
        // The entry API holds the shard lock across check and insert, which
        // makes this the in-memory equivalent of a unique index.
        match self.storage.entry(code.as_str().to_owned()) {
            MapEntry::Occupied(_) => Err(StorageError::Conflict(code.to_string())),
            MapEntry::Vacant(slot) => {
                slot.insert(Entry {
                    long_url: long_url.to_owned(),
                    created_at: Timestamp::now(),
                    hits: 0,
                });
                Ok(())
            }
        }
    }

    async fn increment_hits(&self, code: &ShortCode) -> Result<bool> {
        match self.storage.get_mut(code.as_str()) {
            Some(mut entry) => {
                entry.hits += 1;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
