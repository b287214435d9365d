// hubgate: GitHub organization, team and repository membership as host identity.
// Resolves who may log in, with which keys, and verifies their tokens.

pub mod cache;
pub mod config;
pub mod error;
pub mod gate;
pub mod github;
pub mod log;
pub mod resolve;

#[cfg(test)]
mod test_support;

pub use config::{Config, PermissionLevel};
pub use error::{GateError, Result};
pub use gate::Gate;
pub use log::Logger;
pub use resolve::Verdict;
