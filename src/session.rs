// src/session.rs
//! Bearer-token session kept in a small JSON state file. One token at a
//! time; logging in overwrites whatever session was there before.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::api::ApiClient;
use crate::error::ApiError;
use crate::types::UserProfile;

#[derive(Debug, Serialize, Deserialize)]
struct SessionFile {
    token: String,
    saved_at: DateTime<Utc>,
}

pub struct SessionStore {
    token_path: PathBuf,
}

impl SessionStore {
    pub fn new(token_path: PathBuf) -> Self {
        Self { token_path }
    }

    pub fn token_path(&self) -> &Path {
        &self.token_path
    }

    /// Presence of the session file decides the authenticated state.
    pub fn is_authenticated(&self) -> bool {
        self.token_path.exists()
    }

    /// Stored token, if any. A missing file or an empty token means no
    /// session.
    pub fn token(&self) -> Result<Option<String>> {
        Ok(self.read()?.map(|session| session.token).filter(|t| !t.is_empty()))
    }

    /// When the current session was stored.
    pub fn saved_at(&self) -> Result<Option<DateTime<Utc>>> {
        Ok(self.read()?.map(|session| session.saved_at))
    }

    /// Store a token, replacing any existing session.
    pub fn login(&self, token: &str) -> Result<()> {
        let token = token.trim();
        if token.is_empty() {
            anyhow::bail!("Refusing to store an empty token");
        }

        if let Some(parent) = self.token_path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create state directory: {}", parent.display())
            })?;
        }

        let session = SessionFile {
            token: token.to_string(),
            saved_at: Utc::now(),
        };
        let body = serde_json::to_string_pretty(&session)
            .context("Failed to serialize session")?;
        std::fs::write(&self.token_path, body).with_context(|| {
            format!("Failed to write session file: {}", self.token_path.display())
        })?;

        info!("Stored session token at {}", self.token_path.display());
        Ok(())
    }

    /// Drop the stored token. Returns whether a session existed.
    pub fn logout(&self) -> Result<bool> {
        if !self.token_path.exists() {
            return Ok(false);
        }
        std::fs::remove_file(&self.token_path).with_context(|| {
            format!("Failed to remove session file: {}", self.token_path.display())
        })?;
        info!("Cleared session token");
        Ok(true)
    }

    /// Fetch the profile behind the stored session. `Ok(None)` means no
    /// session is stored. Any fetch failure, whatever the cause, invalidates
    /// the session: the token is cleared and the caller sees
    /// [`ApiError::SessionExpired`], so the next run starts logged out.
    pub async fn profile(&self, client: &ApiClient) -> Result<Option<UserProfile>> {
        let token = match self.token()? {
            Some(token) => token,
            None => return Ok(None),
        };

        match client.fetch_profile(&token).await {
            Ok(profile) => Ok(Some(profile)),
            Err(err) => {
                warn!("Profile fetch failed ({err}), dropping the stored session");
                self.logout()?;
                Err(ApiError::SessionExpired.into())
            }
        }
    }

    fn read(&self) -> Result<Option<SessionFile>> {
        if !self.token_path.exists() {
            return Ok(None);
        }
        let raw = std::fs::read_to_string(&self.token_path).with_context(|| {
            format!("Failed to read session file: {}", self.token_path.display())
        })?;
        let session = serde_json::from_str(&raw).with_context(|| {
            format!("Failed to parse session file: {}", self.token_path.display())
        })?;
        Ok(Some(session))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn store_in(dir: &tempfile::TempDir) -> SessionStore {
        SessionStore::new(dir.path().join("state").join("session.json"))
    }

    #[test]
    fn test_token_absent_without_login() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        assert_eq!(store.token().unwrap(), None);
        assert!(!store.is_authenticated());
    }

    #[test]
    fn test_login_stores_trimmed_token_with_timestamp() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);

        store.login("  abc123\n").unwrap();
        assert!(store.is_authenticated());
        assert_eq!(store.token().unwrap().as_deref(), Some("abc123"));
        assert!(store.saved_at().unwrap().is_some());

        // a second login replaces the first
        store.login("next-token").unwrap();
        assert_eq!(store.token().unwrap().as_deref(), Some("next-token"));
    }

    #[test]
    fn test_empty_token_is_rejected() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        assert!(store.login("   ").is_err());
        assert!(!store.is_authenticated());
    }

    #[test]
    fn test_logout_reports_whether_session_existed() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);

        assert!(!store.logout().unwrap());
        store.login("abc123").unwrap();
        assert!(store.logout().unwrap());
        assert!(!store.is_authenticated());
        assert_eq!(store.token().unwrap(), None);
    }

    #[tokio::test]
    async fn test_profile_without_session_is_none() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        let client = ApiClient::new("http://127.0.0.1:0/api/v1".to_string()).unwrap();

        assert!(store.profile(&client).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_any_profile_failure_clears_session() {
        let dir = tempdir().unwrap();
        let store = store_in(&dir);
        store.login("abc123").unwrap();

        // port 0 is unroutable, so the fetch fails at the transport
        let client = ApiClient::new("http://127.0.0.1:0/api/v1".to_string()).unwrap();
        let err = store.profile(&client).await.unwrap_err();

        assert!(matches!(
            err.downcast_ref::<ApiError>(),
            Some(ApiError::SessionExpired)
        ));
        assert!(!store.is_authenticated());
    }
}
