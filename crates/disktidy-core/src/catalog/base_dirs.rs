/// Named base directories that catalog templates are resolved against.
///
/// A missing or empty base directory is not an error: every template rooted
/// at it simply resolves to nothing.
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Logical base-directory names, each backed by an environment variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BaseDir {
    Temp,
    Tmp,
    LocalAppData,
    AppData,
    ProgramData,
    UserProfile,
    SystemRoot,
    WinDir,
}

impl BaseDir {
    pub const ALL: [BaseDir; 8] = [
        BaseDir::Temp,
        BaseDir::Tmp,
        BaseDir::LocalAppData,
        BaseDir::AppData,
        BaseDir::ProgramData,
        BaseDir::UserProfile,
        BaseDir::SystemRoot,
        BaseDir::WinDir,
    ];

    /// Environment variable that supplies this directory.
    pub fn env_var(self) -> &'static str {
        match self {
            BaseDir::Temp => "TEMP",
            BaseDir::Tmp => "TMP",
            BaseDir::LocalAppData => "LOCALAPPDATA",
            BaseDir::AppData => "APPDATA",
            BaseDir::ProgramData => "PROGRAMDATA",
            BaseDir::UserProfile => "USERPROFILE",
            BaseDir::SystemRoot => "SYSTEMROOT",
            BaseDir::WinDir => "WINDIR",
        }
    }
}

/// Mapping from logical name to absolute path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseDirs {
    dirs: HashMap<BaseDir, PathBuf>,
}

impl BaseDirs {
    /// An empty mapping; every template resolves to nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read every [`BaseDir`] from the process environment.
    pub fn from_env() -> Self {
        BaseDir::ALL
            .into_iter()
            .filter_map(|dir| std::env::var_os(dir.env_var()).map(|v| (dir, PathBuf::from(v))))
            .collect()
    }

    /// Builder-style insert.
    pub fn with(mut self, dir: BaseDir, path: impl Into<PathBuf>) -> Self {
        self.set(dir, path);
        self
    }

    pub fn set(&mut self, dir: BaseDir, path: impl Into<PathBuf>) {
        self.dirs.insert(dir, path.into());
    }

    /// The configured path, or `None` when unset or empty.
    pub fn get(&self, dir: BaseDir) -> Option<&Path> {
        self.dirs
            .get(&dir)
            .map(PathBuf::as_path)
            .filter(|p| !p.as_os_str().is_empty())
    }
}

impl FromIterator<(BaseDir, PathBuf)> for BaseDirs {
    fn from_iter<I: IntoIterator<Item = (BaseDir, PathBuf)>>(iter: I) -> Self {
        Self {
            dirs: iter.into_iter().collect(),
        }
    }
}
