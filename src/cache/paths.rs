// Cache path utilities.
// Derives the on-disk file for a (request URL, credential) pair.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;

/// Cache root used when no home directory is available (system services).
pub const SYSTEM_CACHE_DIR: &str = "/var/cache/hubgate";

/// Number of credential characters mixed into a cache key.
pub const TOKEN_PREFIX_LEN: usize = 6;

/// Per-user cache directory (~/.cache/hubgate on Linux), or the system one.
pub fn default_cache_dir() -> PathBuf {
    ProjectDirs::from("", "", "hubgate")
        .map(|dirs| dirs.cache_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(SYSTEM_CACHE_DIR))
}

/// Cache key for a request: the escaped URL joined to a short credential prefix.
///
/// Distinct credentials get distinct entries without the full secret ending up
/// in a filename. Six characters is not a security boundary; anyone who can
/// list the cache directory learns the token prefix.
pub fn cache_key(url: &str, token: &str) -> String {
    let prefix: String = token.chars().take(TOKEN_PREFIX_LEN).collect();
    format!("{}-{}", urlencoding::encode(url), sanitize_name(&prefix))
}

/// Path of the cache file for a request.
pub fn cache_path(root: &Path, url: &str, token: &str) -> PathBuf {
    root.join(cache_key(url, token))
}

/// Sanitize a name for use in filesystem paths.
/// Replaces problematic characters with underscores.
fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0' => '_',
            _ => c,
        })
        .collect()
}
