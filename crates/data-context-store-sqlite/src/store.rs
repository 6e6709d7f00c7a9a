// crates/data-context-store-sqlite/src/store.rs
// ============================================================================
// Module: SQLite Tuple Store Backend
// Description: Durable TupleStoreBackend backed by SQLite WAL.
// Purpose: Persist canonical JSON documents under fixed-length tuple keys.
// Dependencies: data-context-core, rusqlite, serde, serde_json, thiserror, tracing
// ============================================================================

//! ## Overview
//! This module implements a durable [`TupleStoreBackend`] using `SQLite`.
//! Every document row records the tuple key, the raw bytes, and a hash of
//! those bytes. Loads verify the hash and fail closed on corruption. Rows are
//! partitioned by key length so suite and validation stores may share one
//! database file.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use data_context_core::StoreError;
use data_context_core::StoreKey;
use data_context_core::TupleStoreBackend;
use data_context_core::hashing::DEFAULT_HASH_ALGORITHM;
use data_context_core::hashing::HashAlgorithm;
use data_context_core::hashing::hash_bytes;
use data_context_core::interfaces::check_key_length;
use rusqlite::Connection;
use rusqlite::OpenFlags;
use rusqlite::OptionalExtension;
use rusqlite::params;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// `SQLite` schema version for the store.
const SCHEMA_VERSION: i64 = 1;
/// Default busy timeout (ms).
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;
/// Maximum length of a single path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum document size accepted by the store.
pub const MAX_DOCUMENT_BYTES: usize = 16 * 1024 * 1024;

// ============================================================================
// SECTION: Config
// ============================================================================

/// `SQLite` journal mode configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteStoreMode {
    /// WAL journal mode (recommended).
    #[default]
    Wal,
    /// Delete journal mode (legacy).
    Delete,
}

impl SqliteStoreMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Wal => "wal",
            Self::Delete => "delete",
        }
    }
}

/// `SQLite` sync mode configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteSyncMode {
    /// Full synchronous mode (safest).
    #[default]
    Full,
    /// Normal synchronous mode (balanced).
    Normal,
}

impl SqliteSyncMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Normal => "normal",
        }
    }
}

/// Configuration for the `SQLite` tuple store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SqliteStoreConfig {
    /// Path to the `SQLite` database file.
    pub path: PathBuf,
    /// Busy timeout in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// `SQLite` journal mode.
    #[serde(default)]
    pub journal_mode: SqliteStoreMode,
    /// `SQLite` sync mode.
    #[serde(default)]
    pub sync_mode: SqliteSyncMode,
}

impl SqliteStoreConfig {
    /// Creates a configuration with default pragmas for the given path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            journal_mode: SqliteStoreMode::default(),
            sync_mode: SqliteSyncMode::default(),
        }
    }
}

/// Returns the default busy timeout for `SQLite` connections.
const fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// `SQLite` store errors.
#[derive(Debug, Error)]
pub enum SqliteStoreError {
    /// Store I/O error.
    #[error("sqlite store io error: {0}")]
    Io(String),
    /// `SQLite` engine error.
    #[error("sqlite store db error: {0}")]
    Db(String),
    /// Store corruption or hash mismatch.
    #[error("sqlite store corruption: {0}")]
    Corrupt(String),
    /// Store schema version mismatch.
    #[error("sqlite store version mismatch: {0}")]
    VersionMismatch(String),
    /// Invalid store data.
    #[error("sqlite store invalid data: {0}")]
    Invalid(String),
    /// Document exceeded the size limit.
    #[error("sqlite store payload too large: {actual_bytes} bytes (max {max_bytes})")]
    TooLarge {
        /// Maximum allowed bytes.
        max_bytes: usize,
        /// Actual payload size in bytes.
        actual_bytes: usize,
    },
}

impl From<SqliteStoreError> for StoreError {
    fn from(error: SqliteStoreError) -> Self {
        match error {
            SqliteStoreError::Io(message) => Self::Io(message),
            SqliteStoreError::Db(message) => Self::Store(message),
            SqliteStoreError::Corrupt(message) => Self::Corrupt(message),
            SqliteStoreError::VersionMismatch(message) => Self::VersionMismatch(message),
            SqliteStoreError::Invalid(message) => Self::Invalid(message),
            SqliteStoreError::TooLarge {
                max_bytes,
                actual_bytes,
            } => Self::Invalid(format!(
                "document exceeds size limit: {actual_bytes} bytes (max {max_bytes})"
            )),
        }
    }
}

/// Maps an engine error into a store error.
fn db_error(err: &rusqlite::Error) -> SqliteStoreError {
    SqliteStoreError::Db(err.to_string())
}

// ============================================================================
// SECTION: Store
// ============================================================================

/// `SQLite`-backed tuple store with WAL support.
#[derive(Clone)]
pub struct SqliteTupleStoreBackend {
    /// Number of components every key must have.
    key_length: usize,
    /// Shared `SQLite` connection guarded by a mutex.
    connection: Arc<Mutex<Connection>>,
}

impl SqliteTupleStoreBackend {
    /// Opens an `SQLite`-backed tuple store for keys of `key_length` components.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the database cannot be opened or
    /// initialized.
    pub fn new(config: &SqliteStoreConfig, key_length: usize) -> Result<Self, SqliteStoreError> {
        if key_length == 0 {
            return Err(SqliteStoreError::Invalid("key length must be positive".to_string()));
        }
        validate_store_path(&config.path)?;
        ensure_parent_dir(&config.path)?;
        let mut connection = open_connection(config)?;
        initialize_schema(&mut connection)?;
        debug!(path = %config.path.display(), key_length, "opened sqlite tuple store");
        Ok(Self {
            key_length,
            connection: Arc::new(Mutex::new(connection)),
        })
    }

    /// Returns the key length as a database integer.
    fn key_length_column(&self) -> Result<i64, SqliteStoreError> {
        i64::try_from(self.key_length)
            .map_err(|_| SqliteStoreError::Invalid("key length too large".to_string()))
    }

    /// Returns true when a row exists for the key.
    fn has_document(&self, key: &StoreKey) -> Result<bool, SqliteStoreError> {
        let encoded = encode_key(key)?;
        let key_length = self.key_length_column()?;
        let guard =
            self.connection.lock().map_err(|_| SqliteStoreError::Db("mutex poisoned".to_string()))?;
        let found: Option<i64> = guard
            .query_row(
                "SELECT 1 FROM documents WHERE key_length = ?1 AND store_key = ?2",
                params![key_length, encoded],
                |row| row.get(0),
            )
            .optional()
            .map_err(|err| db_error(&err))?;
        drop(guard);
        Ok(found.is_some())
    }

    /// Loads and verifies the document stored under the key.
    fn load_document(&self, key: &StoreKey) -> Result<Option<Vec<u8>>, SqliteStoreError> {
        let encoded = encode_key(key)?;
        let key_length = self.key_length_column()?;
        let row = {
            let mut guard = self
                .connection
                .lock()
                .map_err(|_| SqliteStoreError::Db("mutex poisoned".to_string()))?;
            let tx = guard.transaction().map_err(|err| db_error(&err))?;
            let metadata = tx
                .query_row(
                    "SELECT length(document), document_hash, hash_algorithm FROM documents WHERE \
                     key_length = ?1 AND store_key = ?2",
                    params![key_length, encoded],
                    |row| {
                        let length: i64 = row.get(0)?;
                        let hash: String = row.get(1)?;
                        let algorithm: String = row.get(2)?;
                        Ok((length, hash, algorithm))
                    },
                )
                .optional()
                .map_err(|err| db_error(&err))?;
            let row = if let Some((length, hash, algorithm)) = metadata {
                let length = usize::try_from(length).map_err(|_| {
                    SqliteStoreError::Invalid(format!("negative document length for key {key}"))
                })?;
                if length > MAX_DOCUMENT_BYTES {
                    return Err(SqliteStoreError::TooLarge {
                        max_bytes: MAX_DOCUMENT_BYTES,
                        actual_bytes: length,
                    });
                }
                let bytes: Vec<u8> = tx
                    .query_row(
                        "SELECT document FROM documents WHERE key_length = ?1 AND store_key = ?2",
                        params![key_length, encoded],
                        |row| row.get(0),
                    )
                    .map_err(|err| db_error(&err))?;
                Some((bytes, hash, algorithm))
            } else {
                None
            };
            tx.commit().map_err(|err| db_error(&err))?;
            drop(guard);
            row
        };
        let Some((bytes, hash_value, hash_algorithm)) = row else {
            return Ok(None);
        };
        let algorithm = parse_hash_algorithm(&hash_algorithm)?;
        if hash_bytes(algorithm, &bytes).value != hash_value {
            return Err(SqliteStoreError::Corrupt(format!("hash mismatch for key {key}")));
        }
        Ok(Some(bytes))
    }

    /// Writes a document under the key, replacing any previous row.
    fn save_document(&self, key: &StoreKey, value: &[u8]) -> Result<(), SqliteStoreError> {
        if value.len() > MAX_DOCUMENT_BYTES {
            return Err(SqliteStoreError::TooLarge {
                max_bytes: MAX_DOCUMENT_BYTES,
                actual_bytes: value.len(),
            });
        }
        let encoded = encode_key(key)?;
        let key_length = self.key_length_column()?;
        let digest = hash_bytes(DEFAULT_HASH_ALGORITHM, value);
        let saved_at = unix_millis();
        let mut guard =
            self.connection.lock().map_err(|_| SqliteStoreError::Db("mutex poisoned".to_string()))?;
        let tx = guard.transaction().map_err(|err| db_error(&err))?;
        tx.execute(
            "INSERT INTO documents (key_length, store_key, document, document_hash, \
             hash_algorithm, saved_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6) ON CONFLICT(key_length, \
             store_key) DO UPDATE SET document = excluded.document, document_hash = \
             excluded.document_hash, hash_algorithm = excluded.hash_algorithm, saved_at = \
             excluded.saved_at",
            params![
                key_length,
                encoded,
                value,
                digest.value,
                digest.algorithm.label(),
                saved_at
            ],
        )
        .map_err(|err| db_error(&err))?;
        tx.commit().map_err(|err| db_error(&err))?;
        drop(guard);
        Ok(())
    }

    /// Lists every key stored for this key length.
    fn list_documents(&self) -> Result<Vec<StoreKey>, SqliteStoreError> {
        let key_length = self.key_length_column()?;
        let guard =
            self.connection.lock().map_err(|_| SqliteStoreError::Db("mutex poisoned".to_string()))?;
        let mut statement = guard
            .prepare("SELECT store_key FROM documents WHERE key_length = ?1")
            .map_err(|err| db_error(&err))?;
        let encoded: Vec<String> = statement
            .query_map(params![key_length], |row| row.get(0))
            .map_err(|err| db_error(&err))?
            .collect::<Result<_, _>>()
            .map_err(|err| db_error(&err))?;
        drop(statement);
        drop(guard);
        let mut keys = encoded
            .iter()
            .map(|value| decode_key(value, self.key_length))
            .collect::<Result<Vec<_>, _>>()?;
        keys.sort();
        Ok(keys)
    }
}

impl TupleStoreBackend for SqliteTupleStoreBackend {
    fn key_length(&self) -> usize {
        self.key_length
    }

    fn has(&self, key: &StoreKey) -> Result<bool, StoreError> {
        check_key_length(key, self.key_length)?;
        self.has_document(key).map_err(StoreError::from)
    }

    fn get(&self, key: &StoreKey) -> Result<Option<Vec<u8>>, StoreError> {
        check_key_length(key, self.key_length)?;
        self.load_document(key).map_err(StoreError::from)
    }

    fn set(&self, key: &StoreKey, value: &[u8]) -> Result<(), StoreError> {
        check_key_length(key, self.key_length)?;
        self.save_document(key, value).map_err(StoreError::from)
    }

    fn list_keys(&self) -> Result<Vec<StoreKey>, StoreError> {
        self.list_documents().map_err(StoreError::from)
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Encodes a tuple key as a JSON array string.
fn encode_key(key: &StoreKey) -> Result<String, SqliteStoreError> {
    serde_json::to_string(key.components()).map_err(|err| SqliteStoreError::Invalid(err.to_string()))
}

/// Decodes a stored key and checks its component count.
fn decode_key(value: &str, key_length: usize) -> Result<StoreKey, SqliteStoreError> {
    let components: Vec<String> = serde_json::from_str(value)
        .map_err(|err| SqliteStoreError::Corrupt(format!("invalid stored key {value}: {err}")))?;
    if components.len() != key_length {
        return Err(SqliteStoreError::Corrupt(format!(
            "stored key {value} does not have {key_length} components"
        )));
    }
    Ok(StoreKey::new(components))
}

/// Ensures the parent directory for the store exists.
fn ensure_parent_dir(path: &Path) -> Result<(), SqliteStoreError> {
    let Some(parent) = path.parent() else {
        return Err(SqliteStoreError::Io("store path missing parent directory".to_string()));
    };
    std::fs::create_dir_all(parent).map_err(|err| SqliteStoreError::Io(err.to_string()))
}

/// Validates store paths for safety limits.
fn validate_store_path(path: &Path) -> Result<(), SqliteStoreError> {
    let path_string = path.display().to_string();
    if path_string.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(SqliteStoreError::Invalid("store path exceeds length limit".to_string()));
    }
    for component in path.components() {
        let name = component.as_os_str().to_string_lossy();
        if name.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(SqliteStoreError::Invalid(
                "store path contains an overlong component".to_string(),
            ));
        }
    }
    if path.is_dir() {
        return Err(SqliteStoreError::Invalid(
            "store path must be a file, not a directory".to_string(),
        ));
    }
    Ok(())
}

/// Opens an `SQLite` connection with secure defaults.
fn open_connection(config: &SqliteStoreConfig) -> Result<Connection, SqliteStoreError> {
    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_CREATE
        | OpenFlags::SQLITE_OPEN_FULL_MUTEX;
    let connection =
        Connection::open_with_flags(&config.path, flags).map_err(|err| db_error(&err))?;
    apply_pragmas(&connection, config)?;
    Ok(connection)
}

/// Applies `SQLite` pragmas required for durability.
fn apply_pragmas(
    connection: &Connection,
    config: &SqliteStoreConfig,
) -> Result<(), SqliteStoreError> {
    connection
        .execute_batch(&format!("PRAGMA journal_mode = {};", config.journal_mode.pragma_value()))
        .map_err(|err| db_error(&err))?;
    connection
        .execute_batch(&format!("PRAGMA synchronous = {};", config.sync_mode.pragma_value()))
        .map_err(|err| db_error(&err))?;
    connection
        .busy_timeout(std::time::Duration::from_millis(config.busy_timeout_ms))
        .map_err(|err| db_error(&err))?;
    Ok(())
}

/// Initializes the `SQLite` schema or validates the existing version.
fn initialize_schema(connection: &mut Connection) -> Result<(), SqliteStoreError> {
    let tx = connection.transaction().map_err(|err| db_error(&err))?;
    tx.execute_batch("CREATE TABLE IF NOT EXISTS store_meta (version INTEGER NOT NULL);")
        .map_err(|err| db_error(&err))?;
    let version: Option<i64> = tx
        .query_row("SELECT version FROM store_meta LIMIT 1", params![], |row| row.get(0))
        .optional()
        .map_err(|err| db_error(&err))?;
    match version {
        None => {
            tx.execute("INSERT INTO store_meta (version) VALUES (?1)", params![SCHEMA_VERSION])
                .map_err(|err| db_error(&err))?;
            tx.execute_batch(
                "CREATE TABLE IF NOT EXISTS documents (
                    key_length INTEGER NOT NULL,
                    store_key TEXT NOT NULL,
                    document BLOB NOT NULL,
                    document_hash TEXT NOT NULL,
                    hash_algorithm TEXT NOT NULL,
                    saved_at INTEGER NOT NULL,
                    PRIMARY KEY (key_length, store_key)
                );",
            )
            .map_err(|err| db_error(&err))?;
        }
        Some(value) if value == SCHEMA_VERSION => {}
        Some(value) => {
            return Err(SqliteStoreError::VersionMismatch(format!(
                "unsupported schema version: {value}"
            )));
        }
    }
    tx.commit().map_err(|err| db_error(&err))?;
    Ok(())
}

/// Returns the current unix epoch in milliseconds.
fn unix_millis() -> i64 {
    let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default();
    i64::try_from(now.as_millis()).unwrap_or(i64::MAX)
}

/// Parses a hash algorithm label.
fn parse_hash_algorithm(label: &str) -> Result<HashAlgorithm, SqliteStoreError> {
    if label == HashAlgorithm::Sha256.label() {
        Ok(HashAlgorithm::Sha256)
    } else {
        Err(SqliteStoreError::Invalid(format!("unsupported hash algorithm: {label}")))
    }
}
