/// Flat subtree size scanning.
///
/// Every entry that cannot be stat'd or listed (permission denied, a race
/// with a concurrent delete, transient I/O errors) is skipped and contributes
/// nothing. The scan itself never fails and never modifies anything.
use crate::model::LARGE_FILE_THRESHOLD;
use crate::scanner::is_dangling_link;
use std::fs;
use std::path::Path;
use tracing::trace;

/// Byte and file totals for one subtree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SizeTotals {
    pub size: u64,
    /// Files only; directories are not counted.
    pub file_count: u64,
    /// Files above [`LARGE_FILE_THRESHOLD`].
    pub large_file_count: u64,
}

impl SizeTotals {
    fn add_file(&mut self, len: u64) {
        self.size += len;
        self.file_count += 1;
        if len > LARGE_FILE_THRESHOLD {
            self.large_file_count += 1;
        }
    }
}

/// Total size and file count of everything under `path`, hidden entries included.
pub fn scan_size(path: &Path) -> SizeTotals {
    scan_size_with(path, false)
}

/// Like [`scan_size`], optionally skipping dot-named entries (and, for
/// directories, everything beneath them).
pub fn scan_size_with(path: &Path, skip_hidden: bool) -> SizeTotals {
    let mut totals = SizeTotals::default();

    let root_meta = match fs::symlink_metadata(path) {
        Ok(meta) => meta,
        Err(err) => {
            trace!("Size scan: skipping unreadable root {:?}: {}", path, err);
            return totals;
        }
    };
    if !root_meta.is_dir() {
        totals.add_file(root_meta.len());
        return totals;
    }

    // Serial: this runs inside survey workers, which already hold the pool.
    let walker = jwalk::WalkDir::new(path)
        .skip_hidden(skip_hidden)
        .follow_links(false)
        .parallelism(jwalk::Parallelism::Serial);

    for entry_result in walker {
        let entry = match entry_result {
            Ok(e) => e,
            Err(err) => {
                trace!("Size scan: skipping entry: {}", err);
                continue;
            }
        };
        if entry.file_type().is_dir() {
            continue;
        }
        if entry.file_type().is_symlink() && is_dangling_link(&entry.path()) {
            trace!("Size scan: skipping dangling symlink {:?}", entry.path());
            continue;
        }
        match entry.metadata() {
            Ok(meta) => totals.add_file(meta.len()),
            Err(err) => trace!("Size scan: skipping {:?}: {}", entry.path(), err),
        }
    }

    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_bytes(path: &Path, n: usize) {
        let mut f = fs::File::create(path).unwrap();
        f.write_all(&vec![0u8; n]).unwrap();
    }

    #[test]
    fn test_scan_nested_tree() {
        let tmp = TempDir::new().unwrap();
        let nested = tmp.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();
        write_bytes(&tmp.path().join("top.bin"), 10);
        write_bytes(&nested.join("deep.bin"), 32);

        let totals = scan_size(tmp.path());
        assert_eq!(totals, SizeTotals { size: 42, file_count: 2, large_file_count: 0 });
    }

    #[test]
    fn test_scan_single_file() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("only.txt");
        write_bytes(&file, 7);
        assert_eq!(scan_size(&file), SizeTotals { size: 7, file_count: 1, large_file_count: 0 });
    }

    #[test]
    fn test_scan_missing_path_is_empty() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(scan_size(&tmp.path().join("nope")), SizeTotals::default());
    }

    #[test]
    fn test_scan_counts_hidden_unless_skipped() {
        let tmp = TempDir::new().unwrap();
        let hidden_dir = tmp.path().join(".cache");
        fs::create_dir_all(&hidden_dir).unwrap();
        write_bytes(&hidden_dir.join("blob"), 100);
        write_bytes(&tmp.path().join(".dotfile"), 5);
        write_bytes(&tmp.path().join("visible"), 1);

        assert_eq!(scan_size(tmp.path()).size, 106);
        assert_eq!(
            scan_size_with(tmp.path(), true),
            SizeTotals { size: 1, file_count: 1, large_file_count: 0 }
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_subdirectory_is_skipped() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().unwrap();
        let locked = tmp.path().join("locked");
        fs::create_dir(&locked).unwrap();
        write_bytes(&locked.join("inner"), 50);
        write_bytes(&tmp.path().join("visible"), 3);
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // Privileged users can list it anyway.
        if fs::read_dir(&locked).is_ok() {
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let totals = scan_size(tmp.path());
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        assert_eq!(totals, SizeTotals { size: 3, file_count: 1, large_file_count: 0 });
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_symlink_adds_nothing() {
        let tmp = TempDir::new().unwrap();
        write_bytes(&tmp.path().join("real"), 4);
        std::os::unix::fs::symlink(tmp.path().join("gone"), tmp.path().join("stale")).unwrap();
        assert_eq!(scan_size(tmp.path()).file_count, 1);
        assert_eq!(scan_size(tmp.path()).size, 4);
    }

    #[test]
    fn test_empty_directories_add_nothing() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("x").join("y")).unwrap();
        assert_eq!(scan_size(tmp.path()), SizeTotals::default());
    }
}
