//! # Filesystem Helpers
//!
//! Additive, overwriting file operations. Nothing here deletes content except
//! [`replace_tree`], which is only used for the pre-generated TLS copy.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{MspError, MspResult};

fn io_err(operation: &'static str, path: &Path) -> impl FnOnce(std::io::Error) -> MspError {
    let path = path.to_path_buf();
    move |source| MspError::Io {
        operation,
        path,
        source,
    }
}

/// `mkdir -p`.
pub fn ensure_dir(dir: &Path) -> MspResult<()> {
    fs::create_dir_all(dir).map_err(io_err("create directory", dir))
}

/// Copy `file` into directory `dest_dir`, keeping its file name.
pub fn copy_into(file: &Path, dest_dir: &Path) -> MspResult<PathBuf> {
    let name = file.file_name().ok_or_else(|| MspError::Io {
        operation: "copy",
        path: file.to_path_buf(),
        source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "path has no file name"),
    })?;
    let target = dest_dir.join(name);
    fs::copy(file, &target).map_err(io_err("copy", file))?;
    Ok(target)
}

/// Copy every entry of `src` into `dest`, recursing into subdirectories.
///
/// Existing files in `dest` are overwritten, other content is kept. A missing
/// `src` copies nothing.
pub fn copy_dir_contents(src: &Path, dest: &Path) -> MspResult<()> {
    if !src.is_dir() {
        return Ok(());
    }
    ensure_dir(dest)?;
    let entries = fs::read_dir(src).map_err(io_err("read directory", src))?;
    for entry in entries {
        let entry = entry.map_err(io_err("read directory", src))?;
        let path = entry.path();
        let target = dest.join(entry.file_name());
        if path.is_dir() {
            copy_dir_contents(&path, &target)?;
        } else {
            fs::copy(&path, &target).map_err(io_err("copy", &path))?;
        }
    }
    Ok(())
}

/// Replace `dest` with a recursive copy of `src`.
pub fn replace_tree(src: &Path, dest: &Path) -> MspResult<()> {
    if dest.exists() {
        fs::remove_dir_all(dest).map_err(io_err("remove directory", dest))?;
    }
    copy_dir_contents(src, dest)
}

/// Rename `from` to `to`.
pub fn rename(from: &Path, to: &Path) -> MspResult<()> {
    fs::rename(from, to).map_err(io_err("rename", from))
}

/// File names directly inside `dir`, sorted. Missing directory yields none.
#[cfg(test)]
pub(crate) fn list_file_names(dir: &Path) -> MspResult<Vec<String>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut names = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err("read directory", dir))? {
        let entry = entry.map_err(io_err("read directory", dir))?;
        if entry.path().is_file() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copy_dir_contents_is_additive() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src");
        let dest = dir.path().join("dest");
        ensure_dir(&src.join("nested")).unwrap();
        fs::write(src.join("a.pem"), "A").unwrap();
        fs::write(src.join("nested/b.pem"), "B").unwrap();
        ensure_dir(&dest).unwrap();
        fs::write(dest.join("keep.pem"), "K").unwrap();
        fs::write(dest.join("a.pem"), "old").unwrap();

        copy_dir_contents(&src, &dest).unwrap();

        assert_eq!(fs::read_to_string(dest.join("a.pem")).unwrap(), "A");
        assert_eq!(fs::read_to_string(dest.join("nested/b.pem")).unwrap(), "B");
        assert_eq!(fs::read_to_string(dest.join("keep.pem")).unwrap(), "K");
        assert_eq!(list_file_names(&dest).unwrap(), vec!["a.pem", "keep.pem"]);
    }

    #[test]
    fn copy_from_missing_dir_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        copy_dir_contents(&dir.path().join("absent"), &dir.path().join("dest")).unwrap();
        assert!(!dir.path().join("dest").exists());
    }

    #[test]
    fn replace_tree_drops_stale_files() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("ca");
        let dest = dir.path().join("tlsca");
        ensure_dir(&src).unwrap();
        ensure_dir(&dest).unwrap();
        fs::write(src.join("x"), "new").unwrap();
        fs::write(dest.join("stale"), "old").unwrap();

        replace_tree(&src, &dest).unwrap();

        assert_eq!(list_file_names(&dest).unwrap(), vec!["x"]);
    }

    #[test]
    fn copy_into_keeps_name() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("ca.org1-cert.pem");
        fs::write(&file, "C").unwrap();
        let out = dir.path().join("out");
        ensure_dir(&out).unwrap();
        let target = copy_into(&file, &out).unwrap();
        assert_eq!(target, out.join("ca.org1-cert.pem"));
        assert_eq!(fs::read_to_string(target).unwrap(), "C");
    }

    #[test]
    fn copy_into_missing_source_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = copy_into(&dir.path().join("nope.pem"), dir.path()).unwrap_err();
        assert!(matches!(err, MspError::Io { operation: "copy", .. }));
    }
}
