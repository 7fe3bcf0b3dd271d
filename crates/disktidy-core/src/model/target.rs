/// Cleanup targets: named, categorised locations considered for remediation.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

/// The fixed set of target categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    TemporaryFiles,
    Cache,
    Logs,
    Browser,
    WindowsUpdate,
    RecycleBin,
    Thumbnails,
    Prefetch,
    Downloads,
    Registry,
}

impl Category {
    /// Every category, in catalog order.
    pub const ALL: [Category; 10] = [
        Category::TemporaryFiles,
        Category::Cache,
        Category::Logs,
        Category::Browser,
        Category::WindowsUpdate,
        Category::RecycleBin,
        Category::Thumbnails,
        Category::Prefetch,
        Category::Downloads,
        Category::Registry,
    ];

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Category::TemporaryFiles => "Temporary Files",
            Category::Cache => "Cache Files",
            Category::Logs => "Log Files",
            Category::Browser => "Browser Data",
            Category::WindowsUpdate => "Windows Update",
            Category::RecycleBin => "Recycle Bin",
            Category::Thumbnails => "Thumbnails",
            Category::Prefetch => "Prefetch",
            Category::Downloads => "Downloads",
            Category::Registry => "Registry",
        }
    }

    /// Short key accepted on the command line.
    pub fn key(self) -> &'static str {
        match self {
            Category::TemporaryFiles => "temp",
            Category::Cache => "cache",
            Category::Logs => "logs",
            Category::Browser => "browser",
            Category::WindowsUpdate => "updates",
            Category::RecycleBin => "recycle",
            Category::Thumbnails => "thumbnails",
            Category::Prefetch => "prefetch",
            Category::Downloads => "downloads",
            Category::Registry => "registry",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("unknown category '{0}'")]
pub struct ParseCategoryError(pub String);

impl FromStr for Category {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| c.key() == wanted)
            .ok_or_else(|| ParseCategoryError(s.to_string()))
    }
}

/// One maintenance location, sized at discovery time.
#[derive(Debug, Clone, Serialize)]
pub struct Target {
    pub name: String,
    pub path: PathBuf,
    pub description: String,
    pub category: Category,
    /// Full-subtree bytes, unfiltered.
    pub size: u64,
    /// Full-subtree file count, unfiltered.
    pub item_count: u64,
    /// Whitelisted; never deleted.
    pub protected: bool,
}

impl Target {
    /// Create an unsized, unprotected target.
    pub fn new(
        name: impl Into<String>,
        path: impl Into<PathBuf>,
        description: impl Into<String>,
        category: Category,
    ) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            description: description.into(),
            category,
            size: 0,
            item_count: 0,
            protected: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_keys_round_trip() {
        for category in Category::ALL {
            assert_eq!(category.key().parse::<Category>(), Ok(category));
        }
    }

    #[test]
    fn test_category_parse_is_case_insensitive() {
        assert_eq!(" Temp ".parse::<Category>(), Ok(Category::TemporaryFiles));
        assert_eq!("UPDATES".parse::<Category>(), Ok(Category::WindowsUpdate));
    }

    #[test]
    fn test_unknown_category() {
        let err = "junk".parse::<Category>().unwrap_err();
        assert_eq!(err, ParseCategoryError("junk".to_string()));
        assert_eq!(err.to_string(), "unknown category 'junk'");
    }
}
