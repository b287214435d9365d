// Member set resolution.
// Lists team members, or repository collaborators filtered by the configured permission.

use crate::cache::CachedRequester;
use crate::config::{Config, PermissionLevel};
use crate::error::Result;
use crate::github::Member;
use crate::github::endpoints;

use super::team::TeamResolver;

/// Resolves the accounts allowed on this host.
///
/// A configured repository takes precedence over a team.
pub struct MembershipResolver<'a> {
    requester: &'a CachedRequester,
    config: &'a Config,
}

impl<'a> MembershipResolver<'a> {
    pub fn new(requester: &'a CachedRequester, config: &'a Config) -> Self {
        Self { requester, config }
    }

    /// Authorized accounts in listing order.
    pub fn resolve(&self) -> Result<Vec<Member>> {
        if self.config.uses_repository() {
            self.repository_collaborators()
        } else {
            self.team_members()
        }
    }

    /// Members of the configured team. Membership alone authorizes.
    pub fn team_members(&self) -> Result<Vec<Member>> {
        let team_id = TeamResolver::new(self.requester)
            .resolve(&self.config.organization, &self.config.team)?;
        self.members_of_team(team_id)
    }

    pub fn members_of_team(&self, team_id: u64) -> Result<Vec<Member>> {
        let url = endpoints::team_members(self.requester.endpoint(), team_id);
        self.requester.get_json(&url)
    }

    /// Collaborators of the configured repository holding the configured permission.
    pub fn repository_collaborators(&self) -> Result<Vec<Member>> {
        // Checked before any request so a bad level fails the same way every time.
        let level = self.config.permission_level()?;

        let url = endpoints::repo_collaborators(
            self.requester.endpoint(),
            &self.config.owner,
            &self.config.repository,
        );
        let collaborators: Vec<Member> = self.requester.get_json(&url)?;
        Ok(filter_authorized(collaborators, level))
    }
}

/// Keep collaborators whose permission map grants `level`, preserving order.
pub fn filter_authorized(collaborators: Vec<Member>, level: PermissionLevel) -> Vec<Member> {
    collaborators
        .into_iter()
        .filter(|c| c.has_permission(level))
        .collect()
}

/// Find a member by exact login.
pub fn find_by_login<'m>(members: &'m [Member], login: &str) -> Option<&'m Member> {
    members.iter().find(|m| m.login == login)
}

/// Find a member by GitHub account id.
pub fn find_by_id(members: &[Member], id: u64) -> Option<&Member> {
    members.iter().find(|m| m.id == id)
}
