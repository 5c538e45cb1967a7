//! Token persistence.
//!
//! A signed-in session survives between invocations by keeping the bearer
//! token in a small JSON file under the user's home directory.
//!
//! Storage location: `~/.quire/token.json`

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{AuthError, Token};

/// Default filename for the stored token
const TOKEN_FILE: &str = "token.json";

/// Where a signed-in session keeps its token between runs.
pub trait TokenStore: Send + Sync {
    /// Load the stored token, if any.
    fn load(&self) -> Result<Option<Token>, AuthError>;

    /// Persist a token, replacing any previous one.
    fn save(&self, token: &Token) -> Result<(), AuthError>;

    /// Forget the stored token. Clearing an empty store is not an error.
    fn clear(&self) -> Result<(), AuthError>;
}

// ============================================================================
// FileTokenStore
// ============================================================================

/// Token file format
#[derive(Debug, Serialize, Deserialize)]
struct StoredToken {
    token: Token,
    saved_at: DateTime<Utc>,
}

/// JSON-file backed token store.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    file_path: PathBuf,
}

impl FileTokenStore {
    /// Create storage at the default location (`~/.quire/token.json`).
    pub fn new() -> Result<Self, AuthError> {
        let dir = quire_core::util::paths::home_data_dir("quire")
            .ok_or_else(|| AuthError::Storage("could not determine home directory".into()))?;
        Ok(Self::with_path(dir.join(TOKEN_FILE)))
    }

    /// Create storage with a custom file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: path.into(),
        }
    }

    /// The storage file path.
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// When the stored token was written, if there is one.
    pub fn saved_at(&self) -> Result<Option<DateTime<Utc>>, AuthError> {
        Ok(self.read()?.map(|s| s.saved_at))
    }

    fn read(&self) -> Result<Option<StoredToken>, AuthError> {
        if !self.file_path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.file_path)?;
        let stored: StoredToken = serde_json::from_str(&content)?;
        Ok(Some(stored))
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<Token>, AuthError> {
        Ok(self.read()?.map(|s| s.token))
    }

    fn save(&self, token: &Token) -> Result<(), AuthError> {
        if let Some(parent) = self.file_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let stored = StoredToken {
            token: token.clone(),
            saved_at: Utc::now(),
        };
        let content = serde_json::to_string_pretty(&stored)?;
        fs::write(&self.file_path, content)?;

        // User-only permissions (Unix)
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.file_path, fs::Permissions::from_mode(0o600))?;
        }

        log::debug!("Token saved to {}", self.file_path.display());
        Ok(())
    }

    fn clear(&self) -> Result<(), AuthError> {
        match fs::remove_file(&self.file_path) {
            Ok(()) => {
                log::debug!("Token removed from {}", self.file_path.display());
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

// ============================================================================
// MemoryTokenStore
// ============================================================================

/// In-process token store; nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<Token>>,
}

impl MemoryTokenStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds `token`.
    pub fn with_token(token: Token) -> Self {
        Self {
            token: Mutex::new(Some(token)),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<Token>, AuthError> {
        let guard = self
            .token
            .lock()
            .map_err(|_| AuthError::Storage("token lock poisoned".into()))?;
        Ok(guard.clone())
    }

    fn save(&self, token: &Token) -> Result<(), AuthError> {
        let mut guard = self
            .token
            .lock()
            .map_err(|_| AuthError::Storage("token lock poisoned".into()))?;
        *guard = Some(token.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), AuthError> {
        let mut guard = self
            .token
            .lock()
            .map_err(|_| AuthError::Storage("token lock poisoned".into()))?;
        *guard = None;
        Ok(())
    }
}
