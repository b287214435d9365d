// Cache store for raw API responses.
// One file per request; the file modification time is the only freshness signal.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::error::Result;

use super::paths;

/// A cached response body and how long ago it was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    /// Exact bytes as received from the API.
    pub body: Vec<u8>,
    /// Whole seconds since the entry was last written.
    pub age_secs: u64,
}

impl CacheEntry {
    /// Check if this entry is older than the TTL.
    pub fn is_expired(&self, ttl: Duration) -> bool {
        self.age_secs > ttl.as_secs()
    }

    /// Check if this entry may still be served.
    pub fn is_valid(&self, ttl: Duration) -> bool {
        !self.is_expired(ttl)
    }
}

/// File-per-key response cache rooted at a directory.
///
/// No locking: two processes refreshing the same key both fetch and both
/// write. Writes replace the whole file, so the last writer wins and readers
/// never observe a partial body.
#[derive(Debug, Clone)]
pub struct CacheStore {
    root: PathBuf,
}

impl CacheStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the entry for a request.
    pub fn path_for(&self, url: &str, token: &str) -> PathBuf {
        paths::cache_path(&self.root, url, token)
    }

    /// Read the entry for a request, `None` if it was never written.
    pub fn get(&self, url: &str, token: &str) -> Result<Option<CacheEntry>> {
        let path = self.path_for(url, token);

        let modified = match fs::metadata(&path) {
            Ok(meta) => meta.modified()?,
            Err(e)
                if matches!(
                    e.kind(),
                    io::ErrorKind::NotFound | io::ErrorKind::NotADirectory
                ) =>
            {
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };
        let body = fs::read(&path)?;

        Ok(Some(CacheEntry {
            body,
            age_secs: age_secs(modified.into()),
        }))
    }

    /// Replace the entry for a request with `body`.
    pub fn put(&self, url: &str, token: &str, body: &[u8]) -> Result<()> {
        let path = self.path_for(url, token);
        write_atomic(&path, body)
    }
}

/// Whole seconds between `modified` and now. Timestamps in the future count as zero.
fn age_secs(modified: DateTime<Utc>) -> u64 {
    Utc::now()
        .signed_duration_since(modified)
        .to_std()
        .unwrap_or(Duration::ZERO)
        .as_secs()
}

fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    // Write via temp file; the per-process suffix keeps concurrent writers apart.
    let mut temp_name = path.as_os_str().to_owned();
    temp_name.push(format!(".tmp.{}", std::process::id()));
    let temp_path = PathBuf::from(temp_name);

    let mut file = fs::File::create(&temp_path)?;
    file.write_all(data)?;
    file.sync_all()?;
    fs::rename(&temp_path, path)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::SystemTime;
    use tempfile::TempDir;

    const URL: &str = "https://api.github.com/orgs/acme/teams?per_page=100";
    const TOKEN: &str = "ghp_0123456789";

    #[test]
    fn test_put_and_get_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let store = CacheStore::new(temp_dir.path());

        let body = br#"[{"name":"core","id":5}]"#;
        store.put(URL, TOKEN, body).unwrap();

        let entry = store.get(URL, TOKEN).unwrap().unwrap();
        assert_eq!(entry.body, body.to_vec());
        assert_eq!(entry.age_secs, 0);
    }

    #[test]
    fn test_get_absent() {
        let temp_dir = TempDir::new().unwrap();
        let store = CacheStore::new(temp_dir.path());
        assert!(store.get(URL, TOKEN).unwrap().is_none());
    }

    #[test]
    fn test_put_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let store = CacheStore::new(temp_dir.path());

        store.put(URL, TOKEN, b"first").unwrap();
        store.put(URL, TOKEN, b"second").unwrap();

        let entry = store.get(URL, TOKEN).unwrap().unwrap();
        assert_eq!(entry.body, b"second".to_vec());
        // No temp files left behind.
        assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_credentials_do_not_collide() {
        let temp_dir = TempDir::new().unwrap();
        let store = CacheStore::new(temp_dir.path());

        store.put(URL, "aaaaaa-token", b"a").unwrap();
        store.put(URL, "bbbbbb-token", b"b").unwrap();

        assert_eq!(store.get(URL, "aaaaaa-token").unwrap().unwrap().body, b"a");
        assert_eq!(store.get(URL, "bbbbbb-token").unwrap().unwrap().body, b"b");
    }

    #[test]
    fn test_creates_missing_root() {
        let temp_dir = TempDir::new().unwrap();
        let store = CacheStore::new(temp_dir.path().join("nested").join("cache"));

        store.put(URL, TOKEN, b"[]").unwrap();
        assert!(store.get(URL, TOKEN).unwrap().is_some());
    }

    #[test]
    fn test_age_from_mtime() {
        let temp_dir = TempDir::new().unwrap();
        let store = CacheStore::new(temp_dir.path());
        store.put(URL, TOKEN, b"[]").unwrap();

        let past = SystemTime::now() - Duration::from_secs(600);
        let file = fs::File::options()
            .write(true)
            .open(store.path_for(URL, TOKEN))
            .unwrap();
        file.set_modified(past).unwrap();

        let entry = store.get(URL, TOKEN).unwrap().unwrap();
        assert!(entry.age_secs >= 600);
        assert!(entry.is_expired(Duration::from_secs(300)));
        assert!(entry.is_valid(Duration::from_secs(3600)));
    }

    #[test]
    fn test_expiry_boundary() {
        let entry = CacheEntry {
            body: Vec::new(),
            age_secs: 300,
        };
        assert!(entry.is_valid(Duration::from_secs(300)));
        assert!(entry.is_expired(Duration::from_secs(299)));
    }

    #[test]
    fn test_unreadable_entry_is_cache_io() {
        let temp_dir = TempDir::new().unwrap();
        let store = CacheStore::new(temp_dir.path());
        fs::create_dir_all(store.path_for(URL, TOKEN)).unwrap();

        let err = store.get(URL, TOKEN).unwrap_err();
        assert!(matches!(err, crate::error::GateError::CacheIo(_)));
    }

    #[test]
    fn test_unwritable_root_is_cache_io() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("file");
        fs::write(&blocker, b"not a directory").unwrap();

        let store = CacheStore::new(&blocker);
        let err = store.put(URL, TOKEN, b"[]").unwrap_err();
        assert!(matches!(err, crate::error::GateError::CacheIo(_)));
    }
}
