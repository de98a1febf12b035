//! # Estimate Snapshots
//!
//! Named save/load of a calculator's raw inputs and last computed results.
//! Snapshots serialize to `.est` files as human-readable JSON with safety
//! features:
//!
//! - **Atomic saves**: write to .tmp, verify, rename to prevent corruption
//! - **File locking**: prevent concurrent edits on shared drives
//! - **Version validation**: schema compatibility check on load
//!
//! The engine treats `estimate_data` as an opaque bag matching the trade's
//! own input shape. Loads are defensive: every field defaults, so a snapshot
//! that predates a schema change revives as partial input instead of
//! failing (see [`TradeInput::from_snapshot`]).
//!
//! ## Example
//!
//! ```rust,no_run
//! use estimate_core::calculators::{ConcreteInput, TradeInput};
//! use estimate_core::estimates::{save_estimate, load_estimate, EstimateSnapshot};
//! use std::path::Path;
//!
//! let input = TradeInput::Concrete(ConcreteInput::default());
//! let snapshot = EstimateSnapshot::capture("Back Patio", &input, None, None).unwrap();
//!
//! let path = Path::new("back_patio.est");
//! save_estimate(&snapshot, path).unwrap();
//!
//! let loaded = load_estimate(path).unwrap();
//! let revived = loaded.revive().unwrap();
//! assert_eq!(revived.calculator_type(), "concrete");
//! ```

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::calculators::TradeInput;
use crate::errors::{EstimateError, EstimateResult};
use crate::line_items::LineItem;

#[cfg(not(target_arch = "wasm32"))]
pub use self::lock::{FileLock, LockInfo};

/// Current schema version for .est files
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Computed results stored alongside the inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultsData {
    pub results: Vec<LineItem>,
}

/// One named snapshot of a calculator's inputs and (optionally) its last
/// computed line items, optionally scoped to a client.
///
/// ## JSON Example
///
/// ```json
/// {
///   "version": "1.0.0",
///   "calculatorType": "fencing",
///   "estimateName": "Smith Backyard",
///   "estimateData": { "label": "Backyard", "job": { "mode": "custom", "linear_ft": 120.0, "price_per_ft": 22.5 } },
///   "resultsData": { "results": [ { "label": "Custom Fence", "value": 120.0, "unit": "lin ft", "cost": 2700.0 } ] },
///   "clientId": null,
///   "created": "2026-05-02T16:20:00Z",
///   "modified": "2026-05-02T16:20:00Z"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateSnapshot {
    /// Schema version (for migration compatibility)
    #[serde(default = "default_version")]
    pub version: String,

    /// Trade tag, e.g. "concrete" (see [`TradeInput::calculator_type`])
    pub calculator_type: String,

    /// User-assigned snapshot name
    pub estimate_name: String,

    /// The trade input record, stored opaquely
    pub estimate_data: serde_json::Value,

    /// Last computed line items, when the user saved after calculating
    #[serde(default)]
    pub results_data: Option<ResultsData>,

    /// Client scope, when the estimate belongs to a client record
    pub client_id: Option<String>,

    #[serde(default = "Utc::now")]
    pub created: DateTime<Utc>,

    #[serde(default = "Utc::now")]
    pub modified: DateTime<Utc>,
}

fn default_version() -> String {
    SCHEMA_VERSION.to_string()
}

impl EstimateSnapshot {
    /// Capture a snapshot from a live trade input.
    pub fn capture(
        name: impl Into<String>,
        input: &TradeInput,
        results: Option<Vec<LineItem>>,
        client_id: Option<String>,
    ) -> EstimateResult<Self> {
        let estimate_data =
            serde_json::to_value(input).map_err(|e| EstimateError::SerializationError {
                reason: e.to_string(),
            })?;
        let now = Utc::now();
        Ok(EstimateSnapshot {
            version: SCHEMA_VERSION.to_string(),
            calculator_type: input.calculator_type().to_string(),
            estimate_name: name.into(),
            estimate_data,
            results_data: results.map(|results| ResultsData { results }),
            client_id,
            created: now,
            modified: now,
        })
    }

    /// Revive the stored input, defaulting any field the current shape does
    /// not find.
    pub fn revive(&self) -> EstimateResult<TradeInput> {
        TradeInput::from_snapshot(&self.calculator_type, self.estimate_data.clone())
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.modified = Utc::now();
    }
}

/// Save a snapshot with an atomic write: serialize, write `.tmp`, verify by
/// re-reading, then rename over the target.
pub fn save_estimate(snapshot: &EstimateSnapshot, path: &Path) -> EstimateResult<()> {
    let json =
        serde_json::to_string_pretty(snapshot).map_err(|e| EstimateError::SerializationError {
            reason: e.to_string(),
        })?;

    let tmp_path = path.with_extension("est.tmp");
    fs::write(&tmp_path, &json).map_err(|e| {
        EstimateError::file_error("write", tmp_path.display().to_string(), e.to_string())
    })?;

    // Verify the temp file parses before it replaces anything
    let written = fs::read_to_string(&tmp_path).map_err(|e| {
        EstimateError::file_error("verify", tmp_path.display().to_string(), e.to_string())
    })?;
    serde_json::from_str::<EstimateSnapshot>(&written).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        EstimateError::file_error("verify", tmp_path.display().to_string(), e.to_string())
    })?;

    fs::rename(&tmp_path, path).map_err(|e| {
        EstimateError::file_error("rename", path.display().to_string(), e.to_string())
    })?;

    Ok(())
}

/// Load a snapshot, validating the schema version (major must match).
pub fn load_estimate(path: &Path) -> EstimateResult<EstimateSnapshot> {
    let contents = fs::read_to_string(path).map_err(|e| {
        EstimateError::file_error("read", path.display().to_string(), e.to_string())
    })?;

    let snapshot: EstimateSnapshot =
        serde_json::from_str(&contents).map_err(|e| EstimateError::SerializationError {
            reason: e.to_string(),
        })?;

    let file_major = snapshot.version.split('.').next().unwrap_or("");
    let expected_major = SCHEMA_VERSION.split('.').next().unwrap_or("");
    if file_major != expected_major {
        return Err(EstimateError::VersionMismatch {
            file_version: snapshot.version.clone(),
            expected_version: SCHEMA_VERSION.to_string(),
        });
    }

    Ok(snapshot)
}

#[cfg(not(target_arch = "wasm32"))]
mod lock {
    //! Advisory locking for estimate files on shared drives: an OS-level
    //! lock via fs2 plus a `.lock` metadata file for user visibility.

    use std::fs::{self, File, OpenOptions};
    use std::io::{Read, Write};
    use std::path::{Path, PathBuf};

    use chrono::{DateTime, Utc};
    use fs2::FileExt;
    use serde::{Deserialize, Serialize};

    use crate::errors::{EstimateError, EstimateResult};

    /// Lock file metadata stored in `.est.lock` files
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct LockInfo {
        /// User identifier (email or username)
        pub user_id: String,
        /// Machine name where the lock was acquired
        pub machine: String,
        /// Process ID that holds the lock
        pub pid: u32,
        /// When the lock was acquired
        pub locked_at: DateTime<Utc>,
    }

    impl LockInfo {
        pub fn new(user_id: impl Into<String>) -> Self {
            LockInfo {
                user_id: user_id.into(),
                machine: hostname().unwrap_or_else(|| "unknown".to_string()),
                pid: std::process::id(),
                locked_at: Utc::now(),
            }
        }
    }

    fn hostname() -> Option<String> {
        #[cfg(windows)]
        {
            std::env::var("COMPUTERNAME").ok()
        }
        #[cfg(not(windows))]
        {
            std::env::var("HOSTNAME")
                .ok()
                .or_else(|| std::env::var("HOST").ok())
        }
    }

    /// File lock guard that releases the lock when dropped.
    pub struct FileLock {
        estimate_path: PathBuf,
        lock_path: PathBuf,
        /// The underlying file handle (keeps the OS lock)
        _lock_file: File,
        pub info: LockInfo,
    }

    impl FileLock {
        /// Acquire an exclusive lock on an estimate file.
        ///
        /// Returns `Err(EstimateError::FileLocked)` when another live process
        /// holds the lock; a stale lock (holder no longer running on this
        /// machine) is taken over.
        pub fn acquire(path: &Path, user_id: impl Into<String>) -> EstimateResult<Self> {
            let lock_path = lock_path_for(path);
            let info = LockInfo::new(user_id);

            if lock_path.exists() {
                if let Ok(existing) = read_lock_info(&lock_path) {
                    if !is_lock_stale(&existing) {
                        return Err(EstimateError::file_locked(
                            path.display().to_string(),
                            format!("{} ({})", existing.user_id, existing.machine),
                            existing.locked_at.to_rfc3339(),
                        ));
                    }
                }
            }

            let mut lock_file = OpenOptions::new()
                .write(true)
                .read(true)
                .create(true)
                .truncate(true)
                .open(&lock_path)
                .map_err(|e| {
                    EstimateError::file_error(
                        "create lock",
                        lock_path.display().to_string(),
                        e.to_string(),
                    )
                })?;

            lock_file.try_lock_exclusive().map_err(|_| {
                EstimateError::file_locked(
                    path.display().to_string(),
                    "another process".to_string(),
                    "unknown".to_string(),
                )
            })?;

            let lock_json = serde_json::to_string_pretty(&info).map_err(|e| {
                EstimateError::SerializationError {
                    reason: e.to_string(),
                }
            })?;
            lock_file.write_all(lock_json.as_bytes()).map_err(|e| {
                EstimateError::file_error(
                    "write lock",
                    lock_path.display().to_string(),
                    e.to_string(),
                )
            })?;
            lock_file.sync_all().map_err(|e| {
                EstimateError::file_error(
                    "sync lock",
                    lock_path.display().to_string(),
                    e.to_string(),
                )
            })?;

            Ok(FileLock {
                estimate_path: path.to_path_buf(),
                lock_path,
                _lock_file: lock_file,
                info,
            })
        }

        /// Check if a file is locked without acquiring the lock.
        pub fn check(path: &Path) -> Option<LockInfo> {
            let lock_path = lock_path_for(path);
            if lock_path.exists() {
                if let Ok(info) = read_lock_info(&lock_path) {
                    if !is_lock_stale(&info) {
                        return Some(info);
                    }
                }
            }
            None
        }

        pub fn estimate_path(&self) -> &Path {
            &self.estimate_path
        }
    }

    impl Drop for FileLock {
        fn drop(&mut self) {
            let _ = fs::remove_file(&self.lock_path);
            // OS lock is released when _lock_file is dropped
        }
    }

    fn lock_path_for(path: &Path) -> PathBuf {
        let mut lock_path = path.to_path_buf();
        let extension = lock_path
            .extension()
            .map(|e| format!("{}.lock", e.to_string_lossy()))
            .unwrap_or_else(|| "lock".to_string());
        lock_path.set_extension(extension);
        lock_path
    }

    fn read_lock_info(lock_path: &Path) -> EstimateResult<LockInfo> {
        let mut file = File::open(lock_path).map_err(|e| {
            EstimateError::file_error("read lock", lock_path.display().to_string(), e.to_string())
        })?;
        let mut contents = String::new();
        file.read_to_string(&mut contents).map_err(|e| {
            EstimateError::file_error("read lock", lock_path.display().to_string(), e.to_string())
        })?;
        serde_json::from_str(&contents).map_err(|e| EstimateError::SerializationError {
            reason: e.to_string(),
        })
    }

    /// A lock is stale when its holder was this machine and that process is
    /// gone. Locks from other machines are honored unconditionally.
    fn is_lock_stale(info: &LockInfo) -> bool {
        match hostname() {
            Some(our_machine) if info.machine == our_machine => {
                #[cfg(target_os = "linux")]
                {
                    !Path::new(&format!("/proc/{}", info.pid)).exists()
                }
                #[cfg(not(target_os = "linux"))]
                {
                    false
                }
            }
            _ => false,
        }
    }
}
