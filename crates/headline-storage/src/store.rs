//! The delivered-state contract and its backends.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use rusqlite::OptionalExtension;
use tracing::debug;

use headline_core::config::{StorageBackend, StorageConfig};
use headline_core::error::{HeadlineError, Result};
use headline_core::DeliveredRecord;

use crate::db::Database;

/// Key of the single delivered record.
const DEFAULT_RECORD_ID: &str = "delivered_news";

/// Single-record persistence for links already delivered.
///
/// `load` returns `None` when nothing was ever saved. Staleness is decided by
/// the caller from the record's timestamp.
pub trait DeliveredStore: Send + Sync {
    fn load(&self) -> Result<Option<DeliveredRecord>>;
    fn save(&self, record: &DeliveredRecord) -> Result<()>;
}

impl<S: DeliveredStore + ?Sized> DeliveredStore for Arc<S> {
    fn load(&self) -> Result<Option<DeliveredRecord>> {
        (**self).load()
    }

    fn save(&self, record: &DeliveredRecord) -> Result<()> {
        (**self).save(record)
    }
}

impl<S: DeliveredStore + ?Sized> DeliveredStore for Box<S> {
    fn load(&self) -> Result<Option<DeliveredRecord>> {
        (**self).load()
    }

    fn save(&self, record: &DeliveredRecord) -> Result<()> {
        (**self).save(record)
    }
}

/// Open the configured backend under `data_dir`.
pub fn open_store(config: &StorageConfig, data_dir: &Path) -> Result<Box<dyn DeliveredStore>> {
    let path = data_dir.join(&config.file_name);
    let store: Box<dyn DeliveredStore> = match config.backend {
        StorageBackend::Sqlite => Box::new(SqliteDeliveredStore::new(Arc::new(Database::new(
            &path,
        )?))),
        StorageBackend::File => Box::new(JsonFileDeliveredStore::new(path)),
        StorageBackend::Memory => Box::new(MemoryDeliveredStore::new()),
    };
    debug!(backend = ?config.backend, "Delivered store opened");
    Ok(store)
}

// =============================================================================
// SQLite
// =============================================================================

pub struct SqliteDeliveredStore {
    db: Arc<Database>,
    record_id: String,
}

impl SqliteDeliveredStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self::with_record_id(db, DEFAULT_RECORD_ID)
    }

    pub fn with_record_id(db: Arc<Database>, record_id: impl Into<String>) -> Self {
        Self {
            db,
            record_id: record_id.into(),
        }
    }
}

impl DeliveredStore for SqliteDeliveredStore {
    fn load(&self) -> Result<Option<DeliveredRecord>> {
        let row: Option<(String, i64)> = self.db.with_conn(|conn| {
            conn.query_row(
                "SELECT urls, timestamp FROM delivered_state WHERE record_id = ?1",
                rusqlite::params![self.record_id],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()
            .map_err(|e| HeadlineError::Storage(format!("Failed to load delivered state: {}", e)))
        })?;

        match row {
            Some((urls, timestamp)) => Ok(Some(DeliveredRecord {
                urls: serde_json::from_str(&urls)?,
                timestamp,
            })),
            None => Ok(None),
        }
    }

    fn save(&self, record: &DeliveredRecord) -> Result<()> {
        let urls = serde_json::to_string(&record.urls)?;
        self.db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO delivered_state (record_id, urls, timestamp)
                 VALUES (?1, ?2, ?3)
                 ON CONFLICT(record_id) DO UPDATE SET
                    urls = excluded.urls,
                    timestamp = excluded.timestamp,
                    updated_at = strftime('%s', 'now')",
                rusqlite::params![self.record_id, urls, record.timestamp],
            )
            .map_err(|e| HeadlineError::Storage(format!("Failed to save delivered state: {}", e)))?;
            Ok(())
        })
    }
}

// =============================================================================
// JSON file
// =============================================================================

/// Flat-file backend. Writes go to a sibling temp file that is then renamed
/// over the target, so readers never see a half-written record.
pub struct JsonFileDeliveredStore {
    path: PathBuf,
}

impl JsonFileDeliveredStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl DeliveredStore for JsonFileDeliveredStore {
    fn load(&self) -> Result<Option<DeliveredRecord>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_str(&content)?))
    }

    fn save(&self, record: &DeliveredRecord) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let tmp = self.temp_path();
        std::fs::write(&tmp, serde_json::to_string_pretty(record)?)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

// =============================================================================
// Memory
// =============================================================================

/// Ephemeral backend; state lives as long as the value.
#[derive(Debug, Default)]
pub struct MemoryDeliveredStore {
    record: Mutex<Option<DeliveredRecord>>,
}

impl MemoryDeliveredStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(record: DeliveredRecord) -> Self {
        Self {
            record: Mutex::new(Some(record)),
        }
    }
}

impl DeliveredStore for MemoryDeliveredStore {
    fn load(&self) -> Result<Option<DeliveredRecord>> {
        let guard = self
            .record
            .lock()
            .map_err(|e| HeadlineError::Storage(format!("Delivered state lock poisoned: {}", e)))?;
        Ok(guard.clone())
    }

    fn save(&self, record: &DeliveredRecord) -> Result<()> {
        let mut guard = self
            .record
            .lock()
            .map_err(|e| HeadlineError::Storage(format!("Delivered state lock poisoned: {}", e)))?;
        *guard = Some(record.clone());
        Ok(())
    }
}
