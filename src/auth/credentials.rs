//! Credential Store
//! Mission: Map usernames to password digests, loaded once from a JSON file

use crate::auth::models::CredentialRecord;
use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Read-only snapshot of credential records
#[derive(Debug, Default)]
pub struct CredentialStore {
    records: Vec<CredentialRecord>,
}

impl CredentialStore {
    /// Load credentials from a JSON array of `{username, password_hash}`.
    ///
    /// A missing file yields an empty store. A file that exists but does not
    /// parse is an error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            warn!(path = %path.display(), "Credentials file not found, no user can log in");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read credentials file {}", path.display()))?;
        let records: Vec<CredentialRecord> = serde_json::from_str(&contents)
            .with_context(|| format!("Invalid credentials file {}", path.display()))?;

        info!(path = %path.display(), users = records.len(), "Loaded credentials");
        Ok(Self::from_records(records))
    }

    pub fn from_records(records: Vec<CredentialRecord>) -> Self {
        Self { records }
    }

    /// Password digest stored for `username`, if any
    pub fn lookup(&self, username: &str) -> Option<&str> {
        self.records
            .iter()
            .find(|r| r.username == username)
            .map(|r| r.password_hash.as_str())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Hex-encoded SHA-256 digest of a password
pub fn hash_password(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}
