#![forbid(unsafe_code)]

//! Preference persistence.
//!
//! The page persists exactly one preference (the theme), but the controller
//! only sees the [`PreferenceStore`] trait so tests can swap the browser's
//! `localStorage` for [`MemoryStore`].
//!
//! # Design Invariants
//!
//! 1. **Graceful degradation**: store failures never panic; operations return `Result`.
//! 2. **String values**: values are stored verbatim; parsing is the caller's job.
//! 3. **Missing entry**: `get` returns `Ok(None)`, never an error.

use std::collections::HashMap;
use std::fmt;

/// Errors that can occur while reading or writing preferences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Backend is not available (storage disabled, private mode, no window).
    Unavailable(String),
    /// Backend refused the write (quota exceeded, security error).
    Rejected { key: String, reason: String },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Unavailable(msg) => write!(f, "storage unavailable: {msg}"),
            StoreError::Rejected { key, reason } => {
                write!(f, "storage rejected write to {key:?}: {reason}")
            }
        }
    }
}

impl std::error::Error for StoreError {}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Key/value preference backend.
pub trait PreferenceStore {
    /// Human-readable name for logging.
    fn name(&self) -> &str;

    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    fn set(&mut self, key: &str, value: &str) -> StoreResult<()>;

    fn remove(&mut self, key: &str) -> StoreResult<()>;

    /// Check if the backend is available and functional.
    fn is_available(&self) -> bool {
        true
    }
}

/// In-memory store for tests and hosts without persistent storage.
///
/// Values survive for as long as the store value lives, so handing the same
/// store to a fresh controller simulates a page reload.
#[derive(Default, Clone)]
pub struct MemoryStore {
    data: HashMap<String, String>,
    read_only: bool,
    disabled: bool,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with entries.
    #[must_use]
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            data: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            read_only: false,
            disabled: false,
        }
    }

    /// A store whose writes are always rejected (e.g. quota exhausted).
    #[must_use]
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    /// A store that reports itself unavailable (e.g. storage disabled by the
    /// browser); every operation fails.
    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    fn check_enabled(&self) -> StoreResult<()> {
        if self.disabled {
            return Err(StoreError::Unavailable("store is disabled".into()));
        }
        Ok(())
    }
}

impl PreferenceStore for MemoryStore {
    fn name(&self) -> &str {
        "MemoryStore"
    }

    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        self.check_enabled()?;
        Ok(self.data.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> StoreResult<()> {
        self.check_enabled()?;
        if self.read_only {
            return Err(StoreError::Rejected {
                key: key.to_string(),
                reason: "store is read-only".into(),
            });
        }
        self.data.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> StoreResult<()> {
        self.check_enabled()?;
        if self.read_only {
            return Err(StoreError::Rejected {
                key: key.to_string(),
                reason: "store is read-only".into(),
            });
        }
        self.data.remove(key);
        Ok(())
    }

    fn is_available(&self) -> bool {
        !self.disabled
    }
}

impl fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryStore")
            .field("entries", &self.data.len())
            .field("read_only", &self.read_only)
            .field("disabled", &self.disabled)
            .finish()
    }
}
