// On-disk cache of raw provider responses

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::LapchartError;

const PROVIDER_SUBDIR: &str = "openf1";

/// Stores provider response bodies as JSON files, one file per endpoint and query.
///
/// Entries never expire. Deleting the cache directory is the only way to force a refetch.
#[derive(Clone, Debug)]
pub struct ResponseCache {
    root: PathBuf,
}

impl ResponseCache {
    /// Create a cache rooted in `cache_dir`, creating the provider subdirectory if needed
    pub fn new(cache_dir: &Path) -> Result<Self, LapchartError> {
        let root = cache_dir.join(PROVIDER_SUBDIR);
        if !root.exists() {
            fs::create_dir_all(&root).map_err(|e| LapchartError::CacheIO {
                path: format!("{:?}", root),
                source: e,
            })?;
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File path used for the response of `endpoint` called with `query`
    pub fn path_for(&self, endpoint: &str, query: &[(&str, String)]) -> PathBuf {
        let mut key = endpoint.to_string();
        for (name, value) in query {
            key.push('_');
            key.push_str(name);
            key.push('_');
            key.push_str(value);
        }
        self.root.join(format!("{}.json", Self::normalize_key(&key)))
    }

    /// Normalize a cache key for consistent file naming
    fn normalize_key(key: &str) -> String {
        key.to_lowercase()
            .chars()
            .map(|c| if c.is_alphanumeric() { c } else { '_' })
            .collect()
    }

    pub fn load(&self, endpoint: &str, query: &[(&str, String)]) -> Option<String> {
        let path = self.path_for(endpoint, query);
        if !path.exists() {
            return None;
        }
        match fs::read_to_string(&path) {
            Ok(body) => {
                debug!("Serving {} from cache file {:?}", endpoint, path);
                Some(body)
            }
            Err(e) => {
                debug!("Could not read cache file {:?}: {}", path, e);
                None
            }
        }
    }

    pub fn store(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
        body: &str,
    ) -> Result<(), LapchartError> {
        let path = self.path_for(endpoint, query);
        // write aside and rename so a partial write never becomes an entry
        let staging = path.with_extension("json.tmp");
        fs::write(&staging, body).map_err(|e| LapchartError::CacheIO {
            path: format!("{:?}", staging),
            source: e,
        })?;
        fs::rename(&staging, &path).map_err(|e| {
            let _ = fs::remove_file(&staging);
            LapchartError::CacheIO {
                path: format!("{:?}", path),
                source: e,
            }
        })
    }

    pub fn remove(&self, endpoint: &str, query: &[(&str, String)]) {
        let path = self.path_for(endpoint, query);
        if let Err(e) = fs::remove_file(&path) {
            warn!("Could not remove cache file {:?}: {}", path, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_cache_creates_provider_directory() {
        let temp_dir = TempDir::new().unwrap();
        let cache = ResponseCache::new(temp_dir.path()).unwrap();
        assert!(cache.root().is_dir());
        assert!(cache.root().ends_with("openf1"));
    }

    #[test]
    fn test_path_is_normalized() {
        let temp_dir = TempDir::new().unwrap();
        let cache = ResponseCache::new(temp_dir.path()).unwrap();
        let path = cache.path_for(
            "sessions",
            &[
                ("year", "2024".to_string()),
                ("session_name", "Practice 1".to_string()),
            ],
        );
        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "sessions_year_2024_session_name_practice_1.json"
        );
    }

    #[test]
    fn test_store_then_load() {
        let temp_dir = TempDir::new().unwrap();
        let cache = ResponseCache::new(temp_dir.path()).unwrap();
        let query = [("session_key", "9590".to_string())];

        assert!(cache.load("laps", &query).is_none());
        cache.store("laps", &query, "[]").unwrap();
        assert_eq!(cache.load("laps", &query).as_deref(), Some("[]"));
        // other queries are separate entries
        assert!(cache.load("laps", &[("session_key", "1".to_string())]).is_none());
    }

    #[test]
    fn test_store_leaves_no_staging_file() {
        let temp_dir = TempDir::new().unwrap();
        let cache = ResponseCache::new(temp_dir.path()).unwrap();
        let query = [("year", "2024".to_string())];

        cache.store("meetings", &query, "[]").unwrap();
        cache.store("meetings", &query, "[{}]").unwrap();

        let files: Vec<_> = fs::read_dir(cache.root())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(files, vec!["meetings_year_2024.json"]);
        assert_eq!(cache.load("meetings", &query).as_deref(), Some("[{}]"));
    }

    #[test]
    fn test_remove_entry() {
        let temp_dir = TempDir::new().unwrap();
        let cache = ResponseCache::new(temp_dir.path()).unwrap();
        let query = [("session_key", "9590".to_string())];

        cache.store("drivers", &query, "[]").unwrap();
        cache.remove("drivers", &query);
        assert!(cache.load("drivers", &query).is_none());
        // removing a missing entry is harmless
        cache.remove("drivers", &query);
    }
}
