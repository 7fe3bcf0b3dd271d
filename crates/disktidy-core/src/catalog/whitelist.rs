/// Protected-path whitelist.
///
/// Paths are compared case-insensitively. The table is owned by whoever
/// builds the [`Catalog`](super::Catalog) and is shared behind one mutex, so
/// it can be managed (protect/unprotect) while lookups are running.
use crate::error::ConfigError;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// On-disk whitelist format.
#[derive(Debug, Default, Serialize, Deserialize)]
struct WhitelistFile {
    #[serde(default)]
    protected: Vec<PathBuf>,
}

#[derive(Debug, Default)]
pub struct Whitelist {
    paths: Mutex<HashSet<String>>,
}

impl Whitelist {
    /// An empty whitelist: nothing is protected.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_paths<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let set = paths.into_iter().map(|p| normalise(p.as_ref())).collect();
        Self {
            paths: Mutex::new(set),
        }
    }

    /// Load a whitelist from a JSON file of the form `{"protected": [...]}`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        let file: WhitelistFile = serde_json::from_str(&text)?;
        debug!("Loaded {} protected path(s) from {:?}", file.protected.len(), path);
        Ok(Self::from_paths(file.protected))
    }

    /// Write the whitelist as JSON, sorted for stable diffs.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let file = WhitelistFile {
            protected: self.paths().into_iter().map(PathBuf::from).collect(),
        };
        fs::write(path, serde_json::to_string_pretty(&file)?)?;
        Ok(())
    }

    /// Protect `path`. Returns `false` if it was already protected.
    pub fn protect(&self, path: &Path) -> bool {
        self.paths.lock().insert(normalise(path))
    }

    /// Remove protection from `path`. Returns `false` if it was not protected.
    pub fn unprotect(&self, path: &Path) -> bool {
        self.paths.lock().remove(&normalise(path))
    }

    pub fn is_protected(&self, path: &Path) -> bool {
        self.paths.lock().contains(&normalise(path))
    }

    /// Protected paths (lower-cased), sorted.
    pub fn paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self.paths.lock().iter().cloned().collect();
        paths.sort_unstable();
        paths
    }

    pub fn len(&self) -> usize {
        self.paths.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.lock().is_empty()
    }
}

/// Lower-cased path string without trailing separators (roots are kept as-is).
fn normalise(path: &Path) -> String {
    let lower = path.to_string_lossy().to_lowercase();
    let trimmed = lower.trim_end_matches(['/', '\\']);
    if trimmed.is_empty() {
        lower
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_case_insensitive_match() {
        let wl = Whitelist::from_paths(["C:\\Users\\Me\\AppData\\Local\\Temp"]);
        assert!(wl.is_protected(Path::new("c:\\users\\me\\appdata\\local\\temp")));
        assert!(wl.is_protected(Path::new("C:\\USERS\\ME\\APPDATA\\LOCAL\\TEMP\\")));
        assert!(!wl.is_protected(Path::new("C:\\Users\\Me\\AppData\\Local")));
    }

    #[test]
    fn test_protect_and_unprotect() {
        let wl = Whitelist::new();
        assert!(wl.is_empty());
        assert!(wl.protect(Path::new("/var/Cache")));
        assert!(!wl.protect(Path::new("/VAR/cache")));
        assert_eq!(wl.len(), 1);
        assert!(wl.unprotect(Path::new("/var/cache")));
        assert!(!wl.unprotect(Path::new("/var/cache")));
        assert!(wl.is_empty());
    }

    #[test]
    fn test_root_path_is_kept() {
        let wl = Whitelist::from_paths(["/"]);
        assert_eq!(wl.paths(), vec!["/".to_string()]);
    }

    #[test]
    fn test_save_then_load() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("whitelist.json");
        let wl = Whitelist::from_paths(["/b/Two", "/a/one"]);
        wl.save(&file).unwrap();

        let loaded = Whitelist::load(&file).unwrap();
        assert_eq!(loaded.paths(), vec!["/a/one".to_string(), "/b/two".to_string()]);
    }

    #[test]
    fn test_load_rejects_bad_json() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("bad.json");
        fs::write(&file, "{ not json").unwrap();
        assert!(matches!(Whitelist::load(&file), Err(ConfigError::Json(_))));
    }
}
