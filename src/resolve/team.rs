// Team name resolution.
// Finds a team id among the first page of an organization's teams.

use crate::cache::CachedRequester;
use crate::error::{GateError, Result};
use crate::github::Team;
use crate::github::endpoints;

/// Resolves `org` + team name to the team's numeric id.
pub struct TeamResolver<'a> {
    requester: &'a CachedRequester,
}

impl<'a> TeamResolver<'a> {
    pub fn new(requester: &'a CachedRequester) -> Self {
        Self { requester }
    }

    /// Id of the first team named exactly `team` in `org`.
    pub fn resolve(&self, org: &str, team: &str) -> Result<u64> {
        let url = endpoints::org_teams(self.requester.endpoint(), org);
        let teams: Vec<Team> = self.requester.get_json(&url)?;

        find_team_id(&teams, team)
            .ok_or_else(|| GateError::NotFound(format!("{}/{}", org, team)))
    }
}

/// Case-sensitive name match; the first of several same-named teams wins.
pub fn find_team_id(teams: &[Team], name: &str) -> Option<u64> {
    teams.iter().find(|t| t.name == name).map(|t| t.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{MockTransport, test_config, test_requester};
    use tempfile::TempDir;

    fn teams(json: &str) -> Vec<Team> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_find_team_id() {
        let list = teams(r#"[{"name":"core","id":5},{"name":"ops","id":9}]"#);
        assert_eq!(find_team_id(&list, "ops"), Some(9));
        assert_eq!(find_team_id(&list, "eng"), None);
        assert_eq!(find_team_id(&list, "Ops"), None);
        assert_eq!(find_team_id(&[], "ops"), None);
    }

    #[test]
    fn test_first_duplicate_wins() {
        let list = teams(r#"[{"name":"ops","id":3},{"name":"ops","id":4}]"#);
        assert_eq!(find_team_id(&list, "ops"), Some(3));
    }

    fn requester(dir: &std::path::Path, mock: &MockTransport) -> CachedRequester {
        test_requester(&test_config(dir), mock)
    }

    #[test]
    fn test_resolve_via_api() {
        let temp_dir = TempDir::new().unwrap();
        let mock = MockTransport::new();
        mock.respond(
            "orgs/acme/teams",
            200,
            r#"[{"name":"core","id":5},{"name":"ops","id":9}]"#,
        );
        let requester = requester(temp_dir.path(), &mock);
        let resolver = TeamResolver::new(&requester);

        assert_eq!(resolver.resolve("acme", "ops").unwrap(), 9);
        let err = resolver.resolve("acme", "eng").unwrap_err();
        assert!(matches!(err, GateError::NotFound(_)));
    }

    #[test]
    fn test_resolve_empty_list() {
        let temp_dir = TempDir::new().unwrap();
        let mock = MockTransport::new();
        mock.respond("orgs/acme/teams", 200, "[]");
        let requester = requester(temp_dir.path(), &mock);

        let err = TeamResolver::new(&requester)
            .resolve("acme", "ops")
            .unwrap_err();
        assert!(matches!(err, GateError::NotFound(_)));
    }

    #[test]
    fn test_resolve_upstream_failure() {
        let temp_dir = TempDir::new().unwrap();
        let mock = MockTransport::new();
        mock.respond("orgs/acme/teams", 403, r#"{"message":"Forbidden"}"#);
        let requester = requester(temp_dir.path(), &mock);

        let err = TeamResolver::new(&requester)
            .resolve("acme", "ops")
            .unwrap_err();
        assert!(matches!(err, GateError::RemoteStatus { status: 403, .. }));
    }

    #[test]
    fn test_resolve_malformed_listing() {
        let temp_dir = TempDir::new().unwrap();
        let mock = MockTransport::new();
        mock.respond("orgs/acme/teams", 200, r#"{"message":"moved"}"#);
        let requester = requester(temp_dir.path(), &mock);

        let err = TeamResolver::new(&requester)
            .resolve("acme", "ops")
            .unwrap_err();
        assert!(matches!(err, GateError::MalformedPayload { .. }));
    }
}
