use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::database::models::AdminProfile;

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8000";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub url: String,
    pub updated_at: DateTime<Utc>,
}

/// Local login state. Written by `auth login`, removed by `auth logout` or any 401.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub server: String,
    pub token: String,
    pub admin: AdminProfile,
    pub logged_in_at: DateTime<Utc>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_SERVER_URL.to_string(),
            updated_at: Utc::now(),
        }
    }
}

/// Files under the CLI configuration directory
#[derive(Debug, Clone)]
pub struct ConfigStore {
    dir: PathBuf,
}

impl ConfigStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `STAFFDIR_CLI_CONFIG_DIR`, else `$HOME/.config/staffdir`
    pub fn from_env() -> anyhow::Result<Self> {
        let dir = if let Ok(custom_dir) = std::env::var("STAFFDIR_CLI_CONFIG_DIR") {
            PathBuf::from(custom_dir)
        } else {
            let home = std::env::var("HOME")
                .map_err(|_| anyhow::anyhow!("HOME environment variable not set"))?;
            PathBuf::from(home).join(".config").join("staffdir")
        };
        Ok(Self::new(dir))
    }

    fn ensure_dir(&self) -> anyhow::Result<()> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir)?;
        }
        Ok(())
    }

    fn server_file(&self) -> PathBuf {
        self.dir.join("server.json")
    }

    fn session_file(&self) -> PathBuf {
        self.dir.join("session.json")
    }

    pub fn load_server_config(&self) -> anyhow::Result<ServerConfig> {
        let server_file = self.server_file();

        if !server_file.exists() {
            return Ok(ServerConfig::default());
        }

        let content = fs::read_to_string(server_file)?;
        let config: ServerConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    pub fn save_server_config(&self, config: &ServerConfig) -> anyhow::Result<()> {
        self.ensure_dir()?;
        let content = serde_json::to_string_pretty(config)?;
        fs::write(self.server_file(), content)?;
        Ok(())
    }

    pub fn load_session(&self) -> anyhow::Result<Option<Session>> {
        let session_file = self.session_file();

        if !session_file.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(session_file)?;
        let session: Session = serde_json::from_str(&content)?;
        Ok(Some(session))
    }

    pub fn save_session(&self, session: &Session) -> anyhow::Result<()> {
        self.ensure_dir()?;
        let content = serde_json::to_string_pretty(session)?;
        fs::write(self.session_file(), content)?;
        Ok(())
    }

    /// Remove the stored session. Missing file is fine.
    pub fn clear_session(&self) -> anyhow::Result<()> {
        match fs::remove_file(self.session_file()) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn session() -> Session {
        Session {
            server: DEFAULT_SERVER_URL.to_string(),
            token: "abc".to_string(),
            admin: AdminProfile {
                id: Uuid::now_v7(),
                name: "Administrator".into(),
                username: "admin".into(),
                phone: "081234567890".into(),
                email: "admin@aksamedia.com".into(),
            },
            logged_in_at: Utc::now(),
        }
    }

    #[test]
    fn session_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::new(dir.path().join("nested"));

        assert!(store.load_session().unwrap().is_none());
        let saved = session();
        store.save_session(&saved).unwrap();
        assert_eq!(store.load_session().unwrap(), Some(saved));

        store.clear_session().unwrap();
        assert!(store.load_session().unwrap().is_none());
        store.clear_session().unwrap();
    }

    #[test]
    fn server_defaults_to_localhost() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::new(dir.path());
        assert_eq!(store.load_server_config().unwrap().url, DEFAULT_SERVER_URL);

        let config = ServerConfig {
            url: "http://example.test:9000".into(),
            updated_at: Utc::now(),
        };
        store.save_server_config(&config).unwrap();
        assert_eq!(store.load_server_config().unwrap().url, "http://example.test:9000");
    }
}
