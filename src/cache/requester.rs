// Cached GET requests.
// Serves fresh entries from disk, refreshes expired ones and falls back to stale data on failure.

use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::{info, warn};

use crate::error::Result;
use crate::github::{GitHubClient, RemoteResponse, ResponseSource};
use crate::log::Logger;

use super::store::{CacheEntry, CacheStore};

/// GitHub client fronted by the response cache.
///
/// A fresh hit never touches the network. A miss or an expired entry costs
/// exactly one request; when refreshing an expired entry fails, the stale
/// body is returned instead of the error.
pub struct CachedRequester {
    client: GitHubClient,
    store: CacheStore,
    ttl: Duration,
}

impl CachedRequester {
    /// `ttl_secs` of zero disables caching entirely.
    pub fn new(client: GitHubClient, store: CacheStore, ttl_secs: u64) -> Self {
        Self {
            client,
            store,
            ttl: Duration::from_secs(ttl_secs),
        }
    }

    pub fn client(&self) -> &GitHubClient {
        &self.client
    }

    pub fn store(&self) -> &CacheStore {
        &self.store
    }

    pub fn endpoint(&self) -> &str {
        self.client.endpoint()
    }

    pub fn logger(&self) -> &Logger {
        self.client.logger()
    }

    pub fn caching_enabled(&self) -> bool {
        !self.ttl.is_zero()
    }

    /// GET `url` with the service token, through the cache.
    pub fn get(&self, url: &str) -> Result<RemoteResponse> {
        if !self.caching_enabled() {
            return self.client.fetch(url, None);
        }

        let Some(entry) = self.load_quietly(url) else {
            let response = self.client.fetch(url, None)?;
            if response.is_ok() {
                self.store_quietly(url, &response.body);
            }
            return Ok(response);
        };

        if entry.is_valid(self.ttl) {
            self.logger()
                .scope(|| info!(url, age_secs = entry.age_secs, "use cache"));
            return Ok(RemoteResponse::cached(entry.body, ResponseSource::Cache));
        }

        match self.client.fetch(url, None) {
            Ok(response) if response.is_ok() => {
                self.store_quietly(url, &response.body);
                Ok(response)
            }
            Ok(response) => {
                self.logger().scope(|| {
                    warn!(url, status = response.status, "refresh rejected, serving stale cache")
                });
                Ok(RemoteResponse::cached(entry.body, ResponseSource::StaleCache))
            }
            Err(e) if e.is_fetch_failure() => {
                self.logger()
                    .scope(|| warn!(url, error = %e, "refresh failed, serving stale cache"));
                Ok(RemoteResponse::cached(entry.body, ResponseSource::StaleCache))
            }
            Err(e) => Err(e),
        }
    }

    /// GET `url` through the cache and decode a 200 body.
    pub fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        self.get(url)?.json(url)
    }

    /// An unreadable entry is treated as a miss.
    fn load_quietly(&self, url: &str) -> Option<CacheEntry> {
        match self.store.get(url, self.client.token()) {
            Ok(entry) => entry,
            Err(e) => {
                self.logger().scope(|| {
                    warn!(
                        url,
                        cache_dir = %self.store.root().display(),
                        error = %e,
                        "cache read failed"
                    )
                });
                None
            }
        }
    }

    /// A failed write only costs the next call a network round trip.
    fn store_quietly(&self, url: &str, body: &[u8]) {
        if let Err(e) = self.store.put(url, self.client.token(), body) {
            self.logger().scope(|| {
                warn!(
                    url,
                    cache_dir = %self.store.root().display(),
                    error = %e,
                    "cache write failed"
                )
            });
        }
    }
}
