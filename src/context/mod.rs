//! Durable local contexts for local mode.
//!
//! When no relay backend is reachable, the data client fabricates a default
//! caller identity and application context and persists both under fixed
//! keys in a local context directory. A value already present on disk always
//! wins over the synthesized default; defaults are written only when the key
//! is absent, so a populated context is never silently reset.

use std::fs;
use std::path::PathBuf;

use serde::{de::DeserializeOwned, Deserialize, Serialize};

pub const USER_CONTEXT_KEY: &str = "user_context";
pub const APP_CONTEXT_KEY: &str = "app_context";

/// Token the default local identity presents to the store.
pub const LOCAL_ID_TOKEN: &str = "local-dev-token";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserContext {
    pub user_id: String,
    pub org_hkey: String,
    pub user_role: String,
    pub org_role: String,
    pub application_id: String,
    pub id_token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppContext {
    pub doc_id: String,
    pub org_hkey: String,
    pub application_url_prefix: String,
}

impl Default for UserContext {
    fn default() -> Self {
        Self {
            user_id: "0513467084".to_string(),
            org_hkey: "org.123.456".to_string(),
            user_role: "admin".to_string(),
            org_role: "owner".to_string(),
            application_id: "docrelay".to_string(),
            id_token: LOCAL_ID_TOKEN.to_string(),
        }
    }
}

impl Default for AppContext {
    fn default() -> Self {
        Self {
            doc_id: "docrelay".to_string(),
            org_hkey: "org.123.456".to_string(),
            application_url_prefix: "docrelay".to_string(),
        }
    }
}

/// File-backed key-value storage: one JSON document per key.
#[derive(Debug, Clone)]
pub struct ContextStore {
    dir: PathBuf,
}

impl ContextStore {
    /// Open the default context directory: `DOCRELAY_CONTEXT_DIR` when set,
    /// otherwise `~/.config/docrelay/contexts`.
    pub fn open() -> anyhow::Result<Self> {
        let dir = if let Ok(custom_dir) = std::env::var("DOCRELAY_CONTEXT_DIR") {
            PathBuf::from(custom_dir)
        } else {
            let home = std::env::var("HOME")
                .map_err(|_| anyhow::anyhow!("HOME environment variable not set"))?;
            PathBuf::from(home)
                .join(".config")
                .join("docrelay")
                .join("contexts")
        };
        Self::open_at(dir)
    }

    pub fn open_at(dir: PathBuf) -> anyhow::Result<Self> {
        if !dir.exists() {
            fs::create_dir_all(&dir)?;
        }
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    /// Read the value stored under `key`, if any.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> anyhow::Result<Option<T>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(value)?;
        fs::write(self.path_for(key), content)?;
        Ok(())
    }

    /// Return the persisted value for `key`, writing and returning `default`
    /// only when nothing is stored yet.
    pub fn load_or_init<T>(&self, key: &str, default: T) -> anyhow::Result<T>
    where
        T: Serialize + DeserializeOwned,
    {
        if let Some(existing) = self.get(key)? {
            return Ok(existing);
        }
        self.set(key, &default)?;
        Ok(default)
    }

    /// Load the local user context, synthesizing the default on first use.
    pub fn user_context(&self) -> anyhow::Result<UserContext> {
        self.load_or_init(USER_CONTEXT_KEY, UserContext::default())
    }

    /// Load the local application context, synthesizing the default on first use.
    pub fn app_context(&self) -> anyhow::Result<AppContext> {
        self.load_or_init(APP_CONTEXT_KEY, AppContext::default())
    }
}
