use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

/// Name of the persisted key holding the bearer token
pub const TOKEN_KEY: &str = "token";

/// Opaque bearer token. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SessionStoreError {
    #[error("credential storage error: {0}")]
    Io(#[from] std::io::Error),
    #[error("refusing to store an empty token")]
    EmptyToken,
}

/// Process-local home of the credential.
///
/// The token lives under the `token` key (a file of that name in the
/// state directory) and is mirrored in memory. Every `save` or `clear`
/// starts a new generation; work begun under an older generation must
/// not be applied.
#[derive(Debug)]
pub struct SessionStore {
    path: Option<PathBuf>,
    credential: RwLock<Option<Credential>>,
    generation: AtomicU64,
}

impl SessionStore {
    /// Store backed by `<dir>/token`
    pub fn new(dir: &Path) -> Self {
        Self {
            path: Some(dir.join(TOKEN_KEY)),
            credential: RwLock::new(None),
            generation: AtomicU64::new(0),
        }
    }

    /// Store that never touches disk
    pub fn in_memory() -> Self {
        Self {
            path: None,
            credential: RwLock::new(None),
            generation: AtomicU64::new(0),
        }
    }

    /// Read the persisted token into memory. A missing or blank key
    /// means signed out.
    pub fn load(&self) -> Result<Option<Credential>, SessionStoreError> {
        let loaded = match &self.path {
            Some(path) => match fs::read_to_string(path) {
                Ok(raw) if !raw.trim().is_empty() => Some(Credential::new(raw.trim())),
                Ok(_) => None,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
                Err(e) => return Err(e.into()),
            },
            None => self.credential.read().clone(),
        };
        *self.credential.write() = loaded.clone();
        Ok(loaded)
    }

    pub fn save(&self, token: &str) -> Result<Credential, SessionStoreError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(SessionStoreError::EmptyToken);
        }
        if let Some(path) = &self.path {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, token)?;
            restrict_permissions(path)?;
        }
        let credential = Credential::new(token);
        *self.credential.write() = Some(credential.clone());
        self.generation.fetch_add(1, Ordering::SeqCst);
        tracing::info!("credential stored");
        Ok(credential)
    }

    pub fn clear(&self) -> Result<(), SessionStoreError> {
        *self.credential.write() = None;
        self.generation.fetch_add(1, Ordering::SeqCst);
        if let Some(path) = &self.path {
            match fs::remove_file(path) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        tracing::info!("credential cleared");
        Ok(())
    }

    pub fn credential(&self) -> Option<Credential> {
        self.credential.read().clone()
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.generation() == generation
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> std::io::Result<()> {
    Ok(())
}
