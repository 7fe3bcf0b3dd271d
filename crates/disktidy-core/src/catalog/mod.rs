/// Catalog of well-known maintenance locations.
///
/// The catalog is a fixed, data-driven table of [`TargetTemplate`]s. Each
/// discovery call resolves the templates against the caller's [`BaseDirs`],
/// sizes every resolved location with a flat scan, marks whitelisted paths as
/// protected, and drops anything empty.
pub mod base_dirs;
pub mod whitelist;

pub use base_dirs::{BaseDir, BaseDirs};
pub use whitelist::Whitelist;

use crate::model::{Category, Target};
use crate::scanner::scan_size;
use rayon::prelude::*;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// A catalog entry before resolution: a base directory plus path segments.
#[derive(Debug, Clone, Copy)]
pub struct TargetTemplate {
    pub name: &'static str,
    pub base: BaseDir,
    /// Segments joined onto the base; empty means the base itself.
    pub segments: &'static [&'static str],
    pub description: &'static str,
    pub category: Category,
}

impl TargetTemplate {
    /// Resolve against `dirs`; `None` if the base directory is unset.
    pub fn resolve(&self, dirs: &BaseDirs) -> Option<Target> {
        let Some(base) = dirs.get(self.base) else {
            debug!("Catalog: {} skipped, {} is unset", self.name, self.base.env_var());
            return None;
        };
        let path: PathBuf = self.segments.iter().fold(base.to_path_buf(), |p, s| p.join(s));
        Some(Target::new(self.name, path, self.description, self.category))
    }
}

const fn template(
    name: &'static str,
    base: BaseDir,
    segments: &'static [&'static str],
    description: &'static str,
    category: Category,
) -> TargetTemplate {
    TargetTemplate {
        name,
        base,
        segments,
        description,
        category,
    }
}

/// The built-in catalog, in discovery order.
pub const BUILTIN_TEMPLATES: &[TargetTemplate] = &[
    // Temporary files
    template("Windows Temp", BaseDir::WinDir, &["Temp"], "System temporary files", Category::TemporaryFiles),
    template("User Temp", BaseDir::Temp, &[], "User temporary files", Category::TemporaryFiles),
    template("Local Temp", BaseDir::Tmp, &[], "Local temporary storage", Category::TemporaryFiles),
    // Caches
    template("Application Cache", BaseDir::LocalAppData, &["cache"], "Application cache files", Category::Cache),
    template("Icon Cache", BaseDir::LocalAppData, &["IconCache.db"], "Windows icon cache", Category::Thumbnails),
    template(
        "Thumbnail Cache",
        BaseDir::LocalAppData,
        &["Microsoft", "Windows", "Explorer"],
        "Windows thumbnail cache",
        Category::Thumbnails,
    ),
    template("Prefetch", BaseDir::WinDir, &["Prefetch"], "Windows prefetch files", Category::Prefetch),
    // Browsers
    template(
        "Chrome Cache",
        BaseDir::LocalAppData,
        &["Google", "Chrome", "User Data", "Default", "Cache"],
        "Google Chrome cache",
        Category::Browser,
    ),
    template(
        "Edge Cache",
        BaseDir::LocalAppData,
        &["Microsoft", "Edge", "User Data", "Default", "Cache"],
        "Microsoft Edge cache",
        Category::Browser,
    ),
    template(
        "Firefox Cache",
        BaseDir::LocalAppData,
        &["Mozilla", "Firefox", "Profiles"],
        "Mozilla Firefox cache",
        Category::Browser,
    ),
    template(
        "Brave Cache",
        BaseDir::LocalAppData,
        &["BraveSoftware", "Brave-Browser", "User Data", "Default", "Cache"],
        "Brave browser cache",
        Category::Browser,
    ),
    // Windows Update
    template(
        "Windows Update Cache",
        BaseDir::WinDir,
        &["SoftwareDistribution", "Download"],
        "Windows Update downloaded files",
        Category::WindowsUpdate,
    ),
    template(
        "Delivery Optimization",
        BaseDir::WinDir,
        &[
            "ServiceProfiles",
            "NetworkService",
            "AppData",
            "Local",
            "Microsoft",
            "Windows",
            "DeliveryOptimization",
            "Cache",
        ],
        "Windows Update delivery optimization",
        Category::WindowsUpdate,
    ),
    // Logs
    template("Windows Logs", BaseDir::WinDir, &["Logs"], "Windows system logs", Category::Logs),
    template("CBS Logs", BaseDir::WinDir, &["Logs", "CBS"], "Component-Based Servicing logs", Category::Logs),
    template("Panther Logs", BaseDir::WinDir, &["Panther"], "Windows installation logs", Category::Logs),
    // Other
    template("Recycle Bin", BaseDir::SystemRoot, &["$Recycle.Bin"], "Recycle bin contents", Category::RecycleBin),
    template(
        "Windows Error Reporting",
        BaseDir::ProgramData,
        &["Microsoft", "Windows", "WER"],
        "Windows error reports",
        Category::Logs,
    ),
];

/// Resolves and sizes cleanup targets.
pub struct Catalog {
    base_dirs: BaseDirs,
    whitelist: Arc<Whitelist>,
    templates: Vec<TargetTemplate>,
}

impl Catalog {
    /// A catalog over [`BUILTIN_TEMPLATES`].
    pub fn new(base_dirs: BaseDirs, whitelist: Arc<Whitelist>) -> Self {
        Self::with_templates(base_dirs, whitelist, BUILTIN_TEMPLATES.to_vec())
    }

    /// A catalog over a caller-supplied template table.
    pub fn with_templates(
        base_dirs: BaseDirs,
        whitelist: Arc<Whitelist>,
        templates: Vec<TargetTemplate>,
    ) -> Self {
        Self {
            base_dirs,
            whitelist,
            templates,
        }
    }

    /// Discover non-empty targets whose category is in `filter`.
    ///
    /// An empty filter selects every category. Results keep catalog order.
    pub fn discover(&self, filter: &[Category]) -> Vec<Target> {
        let start = Instant::now();

        let resolved: Vec<Target> = self
            .templates
            .iter()
            .filter(|t| filter.is_empty() || filter.contains(&t.category))
            .filter_map(|t| t.resolve(&self.base_dirs))
            .collect();

        let targets: Vec<Target> = resolved
            .into_par_iter()
            .map(|mut target| {
                let totals = scan_size(&target.path);
                target.size = totals.size;
                target.item_count = totals.file_count;
                target.protected = self.whitelist.is_protected(&target.path);
                target
            })
            .filter(|target| target.size > 0)
            .collect();

        info!(
            "Discovered {} non-empty target(s), {} bytes total, in {:?}",
            targets.len(),
            targets.iter().map(|t| t.size).sum::<u64>(),
            start.elapsed()
        );
        targets
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_builtin_covers_expected_locations() {
        assert_eq!(BUILTIN_TEMPLATES.len(), 18);
        let dirs = BaseDirs::new().with(BaseDir::WinDir, "/win");
        let update = BUILTIN_TEMPLATES
            .iter()
            .find(|t| t.name == "Windows Update Cache")
            .and_then(|t| t.resolve(&dirs))
            .unwrap();
        assert_eq!(update.path, Path::new("/win/SoftwareDistribution/Download"));
        assert_eq!(update.category, Category::WindowsUpdate);
    }

    #[test]
    fn test_unset_base_resolves_to_nothing() {
        let dirs = BaseDirs::new();
        assert!(BUILTIN_TEMPLATES.iter().all(|t| t.resolve(&dirs).is_none()));
    }

    #[test]
    fn test_custom_template_table() {
        let tmp = tempfile::TempDir::new().unwrap();
        std::fs::create_dir(tmp.path().join("logs")).unwrap();
        std::fs::write(tmp.path().join("logs").join("app.log"), b"0123456789").unwrap();

        let templates = vec![
            template("App Logs", BaseDir::AppData, &["logs"], "Application logs", Category::Logs),
            template("Missing", BaseDir::AppData, &["absent"], "Never present", Category::Logs),
        ];
        let whitelist = Arc::new(Whitelist::from_paths([tmp.path().join("logs")]));
        let catalog = Catalog::with_templates(
            BaseDirs::new().with(BaseDir::AppData, tmp.path()),
            whitelist,
            templates,
        );

        let targets = catalog.discover(&[]);
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].name, "App Logs");
        assert_eq!(targets[0].size, 10);
        assert!(targets[0].protected);
    }

    #[test]
    fn test_empty_segments_use_base() {
        let dirs = BaseDirs::new().with(BaseDir::Temp, "/tmp/user");
        let user_temp = BUILTIN_TEMPLATES
            .iter()
            .find(|t| t.name == "User Temp")
            .and_then(|t| t.resolve(&dirs))
            .unwrap();
        assert_eq!(user_temp.path, Path::new("/tmp/user"));
    }
}
