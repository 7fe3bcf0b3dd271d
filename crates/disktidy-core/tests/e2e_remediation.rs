/// End-to-end catalog and remediation tests.
///
/// A fake set of base directories is laid out under a temp dir so the
/// built-in catalog resolves to real, disposable locations.
use disktidy_core::catalog::{BaseDir, BaseDirs, Catalog, Whitelist};
use disktidy_core::model::{Category, Target};
use disktidy_core::remediate::{
    progress_channel, remediate, RemediationProgress, Remediator, RetryPolicy, Strategy,
};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

// ── Helpers ──────────────────────────────────────────────────────────────────

struct Fixture {
    _tmp: TempDir,
    dirs: BaseDirs,
    windir: PathBuf,
    local: PathBuf,
    temp: PathBuf,
}

/// ```text
/// tmp/
///   Windows/Temp/a.tmp            (100)
///   Windows/Logs/setup.log        (50)
///   Windows/Logs/CBS/cbs.log      (25)
///   Windows/Prefetch/             (empty, dropped)
///   Local/cache/x.bin             (10)
///   Local/IconCache.db            (7)
///   UserTemp/t1, t2               (5 + 5)
/// ```
fn fixture() -> Fixture {
    let tmp = TempDir::new().unwrap();
    let windir = tmp.path().join("Windows");
    let local = tmp.path().join("Local");
    let temp = tmp.path().join("UserTemp");

    fs::create_dir_all(windir.join("Temp")).unwrap();
    fs::create_dir_all(windir.join("Logs").join("CBS")).unwrap();
    fs::create_dir_all(windir.join("Prefetch")).unwrap();
    fs::create_dir_all(local.join("cache")).unwrap();
    fs::create_dir_all(&temp).unwrap();

    fs::write(windir.join("Temp").join("a.tmp"), vec![0u8; 100]).unwrap();
    fs::write(windir.join("Logs").join("setup.log"), vec![0u8; 50]).unwrap();
    fs::write(windir.join("Logs").join("CBS").join("cbs.log"), vec![0u8; 25]).unwrap();
    fs::write(local.join("cache").join("x.bin"), vec![0u8; 10]).unwrap();
    fs::write(local.join("IconCache.db"), vec![0u8; 7]).unwrap();
    fs::write(temp.join("t1"), vec![0u8; 5]).unwrap();
    fs::write(temp.join("t2"), vec![0u8; 5]).unwrap();

    let dirs = BaseDirs::new()
        .with(BaseDir::WinDir, &windir)
        .with(BaseDir::LocalAppData, &local)
        .with(BaseDir::Temp, &temp);

    Fixture {
        _tmp: tmp,
        dirs,
        windir,
        local,
        temp,
    }
}

fn names(targets: &[Target]) -> Vec<&str> {
    targets.iter().map(|t| t.name.as_str()).collect()
}

fn find<'a>(targets: &'a [Target], name: &str) -> &'a Target {
    targets.iter().find(|t| t.name == name).unwrap()
}

// ── Discovery ────────────────────────────────────────────────────────────────

#[test]
fn discover_all_drops_empty_and_unset() {
    let fx = fixture();
    let catalog = Catalog::new(fx.dirs.clone(), Arc::new(Whitelist::new()));
    let targets = catalog.discover(&[]);

    assert_eq!(
        names(&targets),
        vec![
            "Windows Temp",
            "User Temp",
            "Application Cache",
            "Icon Cache",
            "Windows Logs",
            "CBS Logs",
        ]
    );
    assert_eq!(find(&targets, "Windows Temp").size, 100);
    // Windows Logs is unfiltered and includes the nested CBS folder.
    assert_eq!(find(&targets, "Windows Logs").size, 75);
    assert_eq!(find(&targets, "Windows Logs").item_count, 2);
    assert_eq!(find(&targets, "User Temp").item_count, 2);
    assert!(targets.iter().all(|t| !t.protected));
}

#[test]
fn discover_with_category_filter() {
    let fx = fixture();
    let catalog = Catalog::new(fx.dirs.clone(), Arc::new(Whitelist::new()));

    let logs = catalog.discover(&[Category::Logs]);
    assert_eq!(names(&logs), vec!["Windows Logs", "CBS Logs"]);

    let thumbs_and_temp = catalog.discover(&[Category::Thumbnails, Category::TemporaryFiles]);
    assert_eq!(
        names(&thumbs_and_temp),
        vec!["Windows Temp", "User Temp", "Icon Cache"]
    );

    assert!(catalog.discover(&[Category::Registry]).is_empty());
}

#[test]
fn whitelist_marks_protected_case_insensitively() {
    let fx = fixture();
    let shouted = PathBuf::from(fx.temp.to_string_lossy().to_uppercase());
    let whitelist = Arc::new(Whitelist::from_paths([shouted]));
    let catalog = Catalog::new(fx.dirs.clone(), whitelist);

    let targets = catalog.discover(&[Category::TemporaryFiles]);
    assert!(find(&targets, "User Temp").protected);
    assert!(!find(&targets, "Windows Temp").protected);
}

// ── Remediation ──────────────────────────────────────────────────────────────

#[test]
fn dry_run_changes_nothing() {
    let fx = fixture();
    let catalog = Catalog::new(fx.dirs.clone(), Arc::new(Whitelist::new()));
    let targets = catalog.discover(&[]);
    let expected: u64 = targets.iter().map(|t| t.size).sum();

    let summary = remediate(&targets, true);
    assert_eq!(summary.success_count, targets.len());
    assert_eq!(summary.failure_count, 0);
    assert_eq!(summary.total_space_freed, expected);
    for target in &targets {
        assert!(target.path.exists(), "{:?} was touched", target.path);
    }
    assert!(fx.windir.join("Temp").join("a.tmp").exists());
}

#[test]
fn real_run_deletes_and_skips_protected() {
    let fx = fixture();
    let whitelist = Arc::new(Whitelist::new());
    whitelist.protect(&fx.local.join("IconCache.db"));
    let catalog = Catalog::new(fx.dirs.clone(), whitelist);
    let targets = catalog.discover(&[Category::TemporaryFiles, Category::Thumbnails]);

    let summary = Remediator::new(false)
        .with_retry_policy(RetryPolicy::immediate(3))
        .run(&targets);

    assert_eq!(summary.total_targets, 3);
    assert_eq!(summary.success_count, 2);
    assert_eq!(summary.total_space_freed, 110);
    assert_eq!(summary.total_files_removed, 3);
    assert!(summary.results.iter().all(|o| !o.target.protected));
    assert!(!fx.windir.join("Temp").exists());
    assert!(!fx.temp.exists());
    assert!(fx.local.join("IconCache.db").exists());
}

#[test]
fn deleting_twice_is_idempotent() {
    let fx = fixture();
    let catalog = Catalog::new(fx.dirs.clone(), Arc::new(Whitelist::new()));
    let targets = catalog.discover(&[Category::Cache]);
    assert_eq!(targets.len(), 1);

    let first = remediate(&targets, false);
    assert_eq!(first.success_count, 1);
    // The snapshot still says 10 bytes; the path is gone, which counts as done.
    let second = remediate(&targets, false);
    assert_eq!(second.success_count, 1);
    assert_eq!(second.failure_count, 0);
}

#[cfg(unix)]
#[test]
fn failure_is_isolated_to_one_target() {
    let fx = fixture();
    let blocker = fx.windir.join("Temp").join("a.tmp");
    // A path through a regular file can never be removed.
    let mut broken = Target::new("Broken", blocker.join("child"), "unremovable", Category::Cache);
    broken.size = 999;
    broken.item_count = 9;
    let mut good = Target::new("Good", fx.local.join("cache"), "removable", Category::Cache);
    good.size = 10;
    good.item_count = 1;

    let summary = Remediator::new(false)
        .with_retry_policy(RetryPolicy::immediate(3))
        .run(&[broken, good]);

    assert_eq!(summary.failure_count, 1);
    assert_eq!(summary.success_count, 1);
    let failed = &summary.results[0];
    assert!(!failed.success);
    assert_eq!(failed.space_freed, 0);
    assert_eq!(failed.files_removed, 0);
    assert!(failed.error.is_some());
    assert_eq!(summary.total_space_freed, 10);
    assert!(!fx.local.join("cache").exists());
}

#[test]
fn best_effort_keeps_target_directory() {
    let fx = fixture();
    let mut target = Target::new("Logs", fx.windir.join("Logs"), "logs", Category::Logs);
    target.size = 75;
    target.item_count = 2;

    let summary = Remediator::new(false)
        .with_strategy(Strategy::BestEffort)
        .with_retry_policy(RetryPolicy::immediate(1))
        .run(&[target]);

    assert_eq!(summary.total_space_freed, 75);
    assert_eq!(summary.total_files_removed, 2);
    assert_eq!(summary.total_files_skipped, 0);
    assert!(fx.windir.join("Logs").is_dir());
    assert!(!fx.windir.join("Logs").join("CBS").exists());
}

#[test]
fn progress_reports_each_target_in_order() {
    let fx = fixture();
    let catalog = Catalog::new(fx.dirs.clone(), Arc::new(Whitelist::new()));
    let targets = catalog.discover(&[Category::Logs]);
    let (tx, rx) = progress_channel();

    let summary = Remediator::new(true).with_progress(tx).run(&targets);
    let messages: Vec<RemediationProgress> = rx.try_iter().collect();

    assert_eq!(
        messages.first(),
        Some(&RemediationProgress::Started {
            total: 2,
            dry_run: true
        })
    );
    let processing: Vec<&str> = messages
        .iter()
        .filter_map(|m| match m {
            RemediationProgress::Processing { name, .. } => Some(name.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(processing, vec!["Windows Logs", "CBS Logs"]);
    assert!(matches!(
        messages.last(),
        Some(RemediationProgress::Complete { success_count: 2, .. })
    ));
    assert_eq!(summary.results.len(), 2);
}

#[test]
fn missing_base_directory_is_not_an_error() {
    let catalog = Catalog::new(BaseDirs::new(), Arc::new(Whitelist::new()));
    assert!(catalog.discover(&[]).is_empty());
    let summary = remediate(&[], false);
    assert_eq!(summary.total_targets, 0);
    assert_eq!(summary.success_count, 0);
}
