//! Resolution of the on-disk content directory.

use std::env;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// Cached location of the content directory holding item records, trade
/// configuration, and friends.
static DATA_ROOT: LazyLock<PathBuf> = LazyLock::new(detect_data_root);

/// Construct a path under the resolved content root.
pub fn data_path(relative: impl AsRef<Path>) -> PathBuf {
    DATA_ROOT.join(relative)
}

/// The resolved content root itself.
pub fn data_root() -> PathBuf {
    DATA_ROOT.clone()
}

/// Locate the content directory. The `HOARD_DATA` environment variable wins
/// when set; otherwise the usual workspace and install layouts are probed.
fn detect_data_root() -> PathBuf {
    if let Ok(root) = env::var("HOARD_DATA") {
        return PathBuf::from(root);
    }

    let mut candidates = vec![PathBuf::from("hoard_engine/data"), PathBuf::from("data")];

    if let Ok(exe_path) = env::current_exe()
        && let Some(dir) = exe_path.parent()
    {
        candidates.push(dir.join("hoard_engine/data"));
        candidates.push(dir.join("data"));
        if let Some(parent) = dir.parent() {
            candidates.push(parent.join("hoard_engine/data"));
            candidates.push(parent.join("data"));
        }
    }

    candidates
        .into_iter()
        .find(|candidate| candidate.is_dir())
        .unwrap_or_else(|| PathBuf::from("hoard_engine/data"))
}
