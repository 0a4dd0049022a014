//! Pull request template lookup

use crate::error::Result;
use std::fs;
use std::path::{Path, PathBuf};

const TEMPLATE_NAME: &str = "pull_request_template";

/// Find and read the pull request template under `work_tree`
///
/// Looks in `.github/`, the root and `docs/`, in that order. The file name
/// is matched case-insensitively, with any extension.
pub fn find_template(work_tree: &Path) -> Result<Option<String>> {
    let dirs = [
        work_tree.join(".github"),
        work_tree.to_path_buf(),
        work_tree.join("docs"),
    ];

    for dir in &dirs {
        if let Some(path) = find_in_dir(dir)? {
            let content = fs::read_to_string(path)?;
            return Ok(Some(content.trim_end().to_string()));
        }
    }

    Ok(None)
}

fn find_in_dir(dir: &Path) -> Result<Option<PathBuf>> {
    if !dir.is_dir() {
        return Ok(None);
    }

    let mut matches: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && is_template_name(path))
        .collect();
    matches.sort();

    Ok(matches.into_iter().next())
}

fn is_template_name(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .and_then(|n| n.split('.').next())
        .is_some_and(|stem| stem.eq_ignore_ascii_case(TEMPLATE_NAME))
}
