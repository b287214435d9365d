// Resolution module.
// Turns cached API responses into team ids, member sets, key lists and auth verdicts.

pub mod auth;
pub mod keys;
pub mod membership;
pub mod team;

pub use auth::{AuthenticationChecker, Verdict};
pub use keys::KeyAggregator;
pub use membership::MembershipResolver;
pub use team::TeamResolver;
