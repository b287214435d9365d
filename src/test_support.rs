// Test doubles for the transport seam.
// A scripted in-memory transport that records every request it sees.

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use crate::cache::{CacheStore, CachedRequester};
use crate::config::Config;
use crate::error::{GateError, Result};
use crate::github::{GitHubClient, RemoteResponse, Transport};
use crate::log::Logger;

#[derive(Clone)]
enum Reply {
    Status(u16, String),
    Fail,
}

#[derive(Default)]
struct MockState {
    routes: Vec<(String, Reply)>,
    requests: Vec<(String, String)>,
}

/// Transport answering from a table of URL fragments.
///
/// Clones share state, so a test can keep one handle and give the other to a client.
#[derive(Clone, Default)]
pub struct MockTransport {
    state: Rc<RefCell<MockState>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer URLs containing `pattern`, replacing any earlier answer for it.
    pub fn respond(&self, pattern: &str, status: u16, body: &str) {
        self.route(pattern, Reply::Status(status, body.to_string()));
    }

    /// Fail URLs containing `pattern` with a transport error.
    pub fn fail(&self, pattern: &str) {
        self.route(pattern, Reply::Fail);
    }

    fn route(&self, pattern: &str, reply: Reply) {
        let mut state = self.state.borrow_mut();
        state.routes.retain(|(p, _)| p != pattern);
        state.routes.push((pattern.to_string(), reply));
    }

    /// Number of requests made so far.
    pub fn calls(&self) -> usize {
        self.state.borrow().requests.len()
    }

    /// Every (url, token) pair requested, in order.
    pub fn requests(&self) -> Vec<(String, String)> {
        self.state.borrow().requests.clone()
    }
}

impl Transport for MockTransport {
    fn get(&self, url: &str, token: &str) -> Result<RemoteResponse> {
        let mut state = self.state.borrow_mut();
        state.requests.push((url.to_string(), token.to_string()));

        let reply = state
            .routes
            .iter()
            .find(|(pattern, _)| url.contains(pattern.as_str()))
            .map(|(_, reply)| reply.clone());

        match reply {
            Some(Reply::Status(status, body)) => {
                Ok(RemoteResponse::new(status, body.into_bytes()))
            }
            Some(Reply::Fail) => {
                Err(GateError::Transport(format!("connection refused: {}", url)))
            }
            None => Err(GateError::Transport(format!("no mock response for GET {}", url))),
        }
    }
}

/// Team-based config with caching into `cache_dir`.
pub fn test_config(cache_dir: &Path) -> Config {
    let mut config = Config {
        token: "ghp_testtoken0123".to_string(),
        organization: "acme".to_string(),
        team: "ops".to_string(),
        cache_ttl: 300,
        cache_dir: Some(cache_dir.to_path_buf()),
        ..Config::default()
    };
    config.finalize();
    config
}

/// Cached requester over `mock` for `config`.
pub fn test_requester(config: &Config, mock: &MockTransport) -> CachedRequester {
    let client = GitHubClient::with_transport(Box::new(mock.clone()), config, Logger::noop());
    CachedRequester::new(client, CacheStore::new(config.cache_dir()), config.cache_ttl)
}
