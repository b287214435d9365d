// GitHub API response types.
// Defines structs for deserializing team, member, collaborator and key listings.

use serde::Deserialize;

use crate::config::PermissionLevel;

/// Team within an organization.
#[derive(Debug, Clone, Deserialize)]
pub struct Team {
    pub id: u64,
    pub name: String,
}

/// Team member or repository collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Member {
    pub id: u64,
    pub login: String,
    /// Present on collaborator listings only.
    #[serde(default)]
    pub permissions: Option<Permissions>,
}

impl Member {
    /// Whether this collaborator holds `level` on the repository.
    /// Members without a permission map (team listings) never match.
    pub fn has_permission(&self, level: PermissionLevel) -> bool {
        self.permissions
            .as_ref()
            .is_some_and(|perms| perms.allows(level))
    }
}

/// Collaborator permission map.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Permissions {
    pub admin: bool,
    pub maintain: bool,
    pub push: bool,
    pub triage: bool,
    pub pull: bool,
}

impl Permissions {
    /// Look up a flag by its API name.
    pub fn get(&self, key: &str) -> bool {
        match key {
            "admin" => self.admin,
            "maintain" => self.maintain,
            "push" => self.push,
            "triage" => self.triage,
            "pull" => self.pull,
            _ => false,
        }
    }

    /// Whether the flag for `level` is set.
    pub fn allows(&self, level: PermissionLevel) -> bool {
        self.get(level.api_key())
    }
}

/// Public SSH key of a user.
#[derive(Debug, Clone, Deserialize)]
pub struct PublicKey {
    pub key: String,
}

/// The authenticated account behind a token.
#[derive(Debug, Clone, Deserialize)]
pub struct Account {
    pub id: u64,
    pub login: String,
}
