// Public key aggregation.
// Collects the SSH keys of a member set into one newline-delimited text.

use tracing::warn;

use crate::cache::CachedRequester;
use crate::error::Result;
use crate::github::endpoints;
use crate::github::{Member, PublicKey};

/// Fetches and concatenates member keys.
pub struct KeyAggregator<'a> {
    requester: &'a CachedRequester,
}

impl<'a> KeyAggregator<'a> {
    pub fn new(requester: &'a CachedRequester) -> Self {
        Self { requester }
    }

    /// Keys of one account, in the order GitHub lists them.
    pub fn user_keys(&self, login: &str) -> Result<Vec<String>> {
        let url = endpoints::user_keys(self.requester.endpoint(), login);
        let keys: Vec<PublicKey> = self.requester.get_json(&url)?;
        Ok(keys.into_iter().map(|k| k.key).collect())
    }

    /// One key per line for every member, following member order.
    ///
    /// A member whose keys cannot be fetched is skipped; the rest still count.
    /// An empty result means no authorized keys.
    pub fn keys_for(&self, members: &[Member]) -> Result<String> {
        let mut out = String::new();

        for member in members {
            let keys = match self.user_keys(&member.login) {
                Ok(keys) => keys,
                Err(e) if e.is_fetch_failure() => {
                    self.requester.logger().scope(|| {
                        warn!(login = %member.login, error = %e, "skipping member keys")
                    });
                    continue;
                }
                Err(e) => return Err(e),
            };

            for key in keys {
                out.push_str(&key);
                out.push('\n');
            }
        }

        Ok(out)
    }
}
