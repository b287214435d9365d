// Token authentication.
// Checks a user-supplied token against the live authenticated-user endpoint.

use tracing::{info, warn};

use crate::github::endpoints;
use crate::github::{Account, GitHubClient};

/// Outcome of an authentication check. Reasons for refusal are only logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Authorized,
    Unauthorized,
}

impl Verdict {
    pub fn is_authorized(&self) -> bool {
        matches!(self, Verdict::Authorized)
    }
}

/// Verifies that a token belongs to a given login. Never cached.
pub struct AuthenticationChecker<'a> {
    client: &'a GitHubClient,
}

impl<'a> AuthenticationChecker<'a> {
    pub fn new(client: &'a GitHubClient) -> Self {
        Self { client }
    }

    pub fn verify(&self, username: &str, token: &str) -> Verdict {
        let logger = self.client.logger();
        if token.is_empty() {
            logger.scope(|| warn!(username, "empty token"));
            return Verdict::Unauthorized;
        }

        let url = endpoints::authenticated_user(self.client.endpoint());
        let response = match self.client.fetch(&url, Some(token)) {
            Ok(response) => response,
            Err(e) => {
                logger.scope(|| warn!(username, error = %e, "authentication request failed"));
                return Verdict::Unauthorized;
            }
        };

        if !response.is_ok() {
            logger.scope(|| warn!(username, status = response.status, "token rejected"));
            return Verdict::Unauthorized;
        }

        match serde_json::from_slice::<Account>(&response.body) {
            Ok(account) if account.login == username => {
                logger.scope(|| info!(username, "authenticated"));
                Verdict::Authorized
            }
            Ok(account) => {
                logger.scope(|| warn!(username, token_owner = %account.login, "login mismatch"));
                Verdict::Unauthorized
            }
            Err(e) => {
                logger.scope(|| warn!(username, error = %e, "unreadable user payload"));
                Verdict::Unauthorized
            }
        }
    }
}
