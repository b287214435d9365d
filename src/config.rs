// Configuration for hubgate.
// Loads the TOML config file, applies HUBGATE_* environment overrides and fills defaults.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;

use crate::cache::paths;
use crate::error::{GateError, Result};

/// Default GitHub API endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.github.com/";

/// Default cache TTL in seconds.
pub const DEFAULT_CACHE_TTL: u64 = 500;

/// Default location of the config file.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/hubgate.toml";

/// Access level required of repository collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionLevel {
    Read,
    Write,
    Admin,
}

impl PermissionLevel {
    /// Key of this level in the GitHub collaborator `permissions` map.
    pub fn api_key(&self) -> &'static str {
        match self {
            PermissionLevel::Read => "pull",
            PermissionLevel::Write => "push",
            PermissionLevel::Admin => "admin",
        }
    }
}

impl FromStr for PermissionLevel {
    type Err = GateError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "read" => Ok(PermissionLevel::Read),
            "write" => Ok(PermissionLevel::Write),
            "admin" => Ok(PermissionLevel::Admin),
            other => Err(GateError::Configuration(format!(
                "unknown permission: {:?} (expected read, write or admin)",
                other
            ))),
        }
    }
}

/// Resolver configuration.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Config {
    /// API base URL, always ending in `/` once finalized.
    pub endpoint: String,
    /// Service credential used for every cached request.
    pub token: String,
    pub organization: String,
    pub team: String,
    /// Repository owner, defaults to the organization.
    pub owner: String,
    /// When set, collaborators of `owner/repository` are the member set.
    pub repository: String,
    /// Raw permission level, validated when the member set is resolved.
    pub permission: String,
    /// Cache TTL in seconds. Zero disables caching.
    #[serde(rename = "Cache")]
    pub cache_ttl: u64,
    pub cache_dir: Option<PathBuf>,
    /// Emit diagnostic logs.
    pub syslog: bool,
    /// Local accounts that accept the keys of every member.
    pub shared_users: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            token: String::new(),
            organization: String::new(),
            team: String::new(),
            owner: String::new(),
            repository: String::new(),
            permission: String::new(),
            cache_ttl: DEFAULT_CACHE_TTL,
            cache_dir: None,
            syslog: false,
            shared_users: Vec::new(),
        }
    }
}

impl Config {
    /// Load from a file, apply environment overrides and defaults, then validate.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            GateError::Configuration(format!("config not readable: {}: {}", path.display(), e))
        })?;
        let mut config = Self::parse(&contents)?;
        config.apply_env(|key| std::env::var(key).ok());
        config.finalize();
        config.validate()?;
        Ok(config)
    }

    /// Parse TOML text without touching the environment or filling defaults.
    pub fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| GateError::Configuration(e.to_string()))
    }

    /// Override fields from `HUBGATE_*` variables as reported by `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let fields: [(&str, &mut String); 7] = [
            ("HUBGATE_TOKEN", &mut self.token),
            ("HUBGATE_ENDPOINT", &mut self.endpoint),
            ("HUBGATE_ORGANIZATION", &mut self.organization),
            ("HUBGATE_TEAM", &mut self.team),
            ("HUBGATE_OWNER", &mut self.owner),
            ("HUBGATE_REPOSITORY", &mut self.repository),
            ("HUBGATE_PERMISSION", &mut self.permission),
        ];
        for (key, field) in fields {
            if let Some(value) = lookup(key) {
                *field = value;
            }
        }
    }

    /// Fill defaults that depend on other fields.
    pub fn finalize(&mut self) {
        if self.endpoint.is_empty() {
            self.endpoint = DEFAULT_ENDPOINT.to_string();
        } else {
            self.endpoint = normalize_endpoint(&self.endpoint);
        }

        if self.owner.is_empty() && !self.organization.is_empty() {
            self.owner = self.organization.clone();
        }

        if !self.repository.is_empty() && self.permission.is_empty() {
            self.permission = "write".to_string();
        }

        if self.cache_dir.is_none() {
            self.cache_dir = Some(paths::default_cache_dir());
        }
    }

    /// Check that a member source is configured.
    pub fn validate(&self) -> Result<()> {
        if self.token.is_empty() {
            return Err(GateError::Configuration("Token is required".to_string()));
        }
        if self.uses_repository() {
            if self.owner.is_empty() {
                return Err(GateError::Configuration(
                    "Repository requires Owner or Organization".to_string(),
                ));
            }
        } else if self.organization.is_empty() || self.team.is_empty() {
            return Err(GateError::Configuration(
                "either Repository or Organization and Team must be set".to_string(),
            ));
        }
        Ok(())
    }

    /// Repository collaborators take precedence over team members.
    pub fn uses_repository(&self) -> bool {
        !self.repository.is_empty()
    }

    /// Parsed permission level. Fails on anything but read, write or admin.
    pub fn permission_level(&self) -> Result<PermissionLevel> {
        self.permission.parse()
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.cache_dir.clone().unwrap_or_else(paths::default_cache_dir)
    }

    pub fn is_shared_user(&self, login: &str) -> bool {
        self.shared_users.iter().any(|u| u == login)
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("endpoint", &self.endpoint)
            .field("token", &mask_token(&self.token))
            .field("organization", &self.organization)
            .field("team", &self.team)
            .field("owner", &self.owner)
            .field("repository", &self.repository)
            .field("permission", &self.permission)
            .field("cache_ttl", &self.cache_ttl)
            .field("cache_dir", &self.cache_dir)
            .field("syslog", &self.syslog)
            .field("shared_users", &self.shared_users)
            .finish()
    }
}

/// Ensure the endpoint ends with a slash so paths can be appended directly.
pub fn normalize_endpoint(endpoint: &str) -> String {
    if endpoint.ends_with('/') {
        endpoint.to_string()
    } else {
        format!("{}/", endpoint)
    }
}

/// Keep the first five characters of a token and redact the rest.
pub fn mask_token(token: &str) -> String {
    let visible: String = token.chars().take(5).collect();
    format!("{} ************ REDACTED ************", visible)
}
