//! Output path helpers.

use std::path::{Path, PathBuf};

use crate::conf::C_FILE_NAME_REPORT_DEFAULT;

/// Return `path` if nothing exists there, else the first free `"<stem> (i)<ext>"` sibling.
///
/// Probing is not atomic: a file created between the check and the write is
/// not detected.
pub fn ensure_unique_path<P: AsRef<Path>>(path: P) -> PathBuf {
    let path = path.as_ref();
    if !path.exists() {
        return path.to_path_buf();
    }

    let c_stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let c_suffix = path
        .extension()
        .map(|s| format!(".{}", s.to_string_lossy()))
        .unwrap_or_default();
    let path_dir = path.parent().unwrap_or(Path::new(""));

    let mut n_idx: usize = 1;
    loop {
        let path_candidate = path_dir.join(format!("{c_stem} ({n_idx}){c_suffix}"));
        if !path_candidate.exists() {
            return path_candidate;
        }
        n_idx += 1;
    }
}

fn derive_parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(path_parent) if !path_parent.as_os_str().is_empty() => path_parent.to_path_buf(),
        _ => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}

/// Default report path next to `source`, made unique.
pub fn build_default_output_path<P: AsRef<Path>>(source: P) -> PathBuf {
    ensure_unique_path(derive_parent_dir(source.as_ref()).join(C_FILE_NAME_REPORT_DEFAULT))
}
