// Cache module for on-disk response caching.
// Stores GitHub API responses so repeated lookups skip the network within the TTL.

pub mod paths;
pub mod requester;
pub mod store;

pub use requester::CachedRequester;
pub use store::{CacheEntry, CacheStore};
