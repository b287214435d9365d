// GitHub API endpoint URLs.
// Builds the request URLs for teams, members, collaborators, keys and the token owner.

/// Page size for every listing. Only the first page is consulted.
pub const PER_PAGE: u32 = 100;

fn segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// Teams of an organization.
pub fn org_teams(endpoint: &str, org: &str) -> String {
    format!("{}orgs/{}/teams?per_page={}", endpoint, segment(org), PER_PAGE)
}

/// Members of a team, by team id.
pub fn team_members(endpoint: &str, team_id: u64) -> String {
    format!("{}teams/{}/members?per_page={}", endpoint, team_id, PER_PAGE)
}

/// Collaborators of a repository, with their permission maps.
pub fn repo_collaborators(endpoint: &str, owner: &str, repo: &str) -> String {
    format!(
        "{}repos/{}/{}/collaborators?per_page={}",
        endpoint,
        segment(owner),
        segment(repo),
        PER_PAGE
    )
}

/// Public keys of a user.
pub fn user_keys(endpoint: &str, login: &str) -> String {
    format!("{}users/{}/keys?per_page={}", endpoint, segment(login), PER_PAGE)
}

/// The account the request's token belongs to.
pub fn authenticated_user(endpoint: &str) -> String {
    format!("{}user", endpoint)
}
