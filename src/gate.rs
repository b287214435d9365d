// Resolver facade.
// Wires the cache, client and resolvers from one config and answers host lookups.

use tracing::info;

use crate::cache::{CacheStore, CachedRequester};
use crate::config::{Config, mask_token};
use crate::error::Result;
use crate::github::{GitHubClient, Member, Transport};
use crate::log::Logger;
use crate::resolve::membership::{find_by_id, find_by_login};
use crate::resolve::{
    AuthenticationChecker, KeyAggregator, MembershipResolver, TeamResolver, Verdict,
};

/// Entry point for callers that need membership, keys or authentication answers.
///
/// Any error means the subject must be treated as unknown and unauthorized.
pub struct Gate {
    config: Config,
    requester: CachedRequester,
}

impl Gate {
    /// Build a gate over HTTP without logging.
    pub fn new(config: Config) -> Result<Self> {
        Self::with_logger(config, Logger::noop())
    }

    pub fn with_logger(config: Config, logger: Logger) -> Result<Self> {
        config.validate()?;
        let client = GitHubClient::new(&config, logger)?;
        Ok(Self::assemble(config, client))
    }

    pub fn with_transport(
        config: Config,
        transport: Box<dyn Transport>,
        logger: Logger,
    ) -> Result<Self> {
        config.validate()?;
        let client = GitHubClient::with_transport(transport, &config, logger);
        Ok(Self::assemble(config, client))
    }

    fn assemble(config: Config, client: GitHubClient) -> Self {
        client.logger().scope(|| {
            info!(
                endpoint = %config.endpoint,
                token = %mask_token(&config.token),
                organization = %config.organization,
                team = %config.team,
                owner = %config.owner,
                repository = %config.repository,
                permission = %config.permission,
                cache_ttl = config.cache_ttl,
                "config"
            )
        });
        let store = CacheStore::new(config.cache_dir());
        let requester = CachedRequester::new(client, store, config.cache_ttl);
        Self { config, requester }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Id of the configured team.
    pub fn team_id(&self) -> Result<u64> {
        TeamResolver::new(&self.requester).resolve(&self.config.organization, &self.config.team)
    }

    /// Every authorized account, in listing order.
    pub fn members(&self) -> Result<Vec<Member>> {
        MembershipResolver::new(&self.requester, &self.config).resolve()
    }

    pub fn member_by_login(&self, login: &str) -> Result<Option<Member>> {
        Ok(find_by_login(&self.members()?, login).cloned())
    }

    pub fn member_by_id(&self, id: u64) -> Result<Option<Member>> {
        Ok(find_by_id(&self.members()?, id).cloned())
    }

    /// Keys of every authorized account, one per line.
    pub fn authorized_keys(&self) -> Result<String> {
        let members = self.members()?;
        KeyAggregator::new(&self.requester).keys_for(&members)
    }

    /// Keys of one account, one per line, whether or not it is authorized.
    pub fn user_keys(&self, login: &str) -> Result<String> {
        let keys = KeyAggregator::new(&self.requester).user_keys(login)?;
        Ok(keys.into_iter().map(|k| k + "\n").collect())
    }

    /// Keys that may log in as local account `login`.
    ///
    /// Shared accounts accept every member's keys, members accept their own,
    /// anyone else gets an empty answer.
    pub fn keys_for(&self, login: &str) -> Result<String> {
        let members = self.members()?;
        let aggregator = KeyAggregator::new(&self.requester);

        if self.config.is_shared_user(login) {
            return aggregator.keys_for(&members);
        }

        match find_by_login(&members, login) {
            Some(member) => aggregator.keys_for(std::slice::from_ref(member)),
            None => Ok(String::new()),
        }
    }

    /// Check that `token` belongs to `username`. Always a live request.
    pub fn authenticate(&self, username: &str, token: &str) -> Verdict {
        AuthenticationChecker::new(self.requester.client()).verify(username, token)
    }
}
