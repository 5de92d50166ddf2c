use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Writes `bytes` to `path` through a temporary sibling and a rename.
///
/// Readers see either the previous file or the complete new one. The
/// temporary file is removed when any step fails.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let temp_path = temp_sibling(path);

    let file = std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&temp_path)?;

    if let Err(e) = persist(file, bytes, &temp_path, path) {
        let _ = std::fs::remove_file(&temp_path);
        tracing::warn!(path = %path.display(), error = %e, "Atomic write failed");
        return Err(e);
    }
    Ok(())
}

fn persist(mut file: File, bytes: &[u8], temp_path: &Path, path: &Path) -> std::io::Result<()> {
    file.write_all(bytes)?;
    file.sync_all()?;
    drop(file);
    std::fs::rename(temp_path, path)
}

/// `feed.xml` -> `feed.xml.tmp.<nanos>` in the same directory, so the
/// rename never crosses filesystems.
fn temp_sibling(path: &Path) -> PathBuf {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(format!(".tmp.{suffix:016x}"));
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_replaces_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("feed.xml");
        std::fs::write(&path, "old").unwrap();

        write_atomic(&path, b"new").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new");

        let leftovers: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(Result::ok)
            .filter(|e| e.file_name().to_string_lossy().contains(".tmp."))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_missing_directory_fails_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("feed.xml");
        assert!(write_atomic(&path, b"x").is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_temp_sibling_stays_in_directory() {
        let temp = temp_sibling(Path::new("/srv/www/feed.xml"));
        assert_eq!(temp.parent(), Some(Path::new("/srv/www")));
        assert!(temp.to_string_lossy().starts_with("/srv/www/feed.xml.tmp."));
    }
}
