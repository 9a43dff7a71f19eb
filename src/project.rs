//! Locating the project a given app entry belongs to.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

pub const PACKAGE_JSON: &str = "package.json";

/// The few package.json fields we read.
#[derive(Debug, Default, Deserialize)]
pub struct PackageJson {
    pub name: Option<String>,
    pub homepage: Option<String>,
}

/// Nearest ancestor of `app_path` holding a package.json.
///
/// Falls back to the app entry's own directory.
pub fn find_project_root(app_path: &Path) -> PathBuf {
    let start = if app_path.is_dir() {
        app_path
    } else {
        app_path.parent().unwrap_or(app_path)
    };

    match start.ancestors().find(|dir| dir.join(PACKAGE_JSON).is_file()) {
        Some(root) => root.to_path_buf(),
        None => {
            tracing::warn!(
                app_path = %app_path.display(),
                "no package.json found above the app entry; scanning its directory instead"
            );
            start.to_path_buf()
        }
    }
}

/// Read `root/package.json`. Missing or malformed files read as empty.
pub fn read_package_json(root: &Path) -> PackageJson {
    let path = root.join(PACKAGE_JSON);
    let Ok(content) = fs::read_to_string(&path) else {
        return PackageJson::default();
    };
    match serde_json::from_str::<PackageJson>(&content) {
        Ok(package) => package,
        Err(err) => {
            tracing::warn!(file = %path.display(), error = %err, "ignoring unreadable package.json");
            PackageJson::default()
        }
    }
}

/// The `homepage` field, if it is an absolute http(s) URL.
pub fn read_homepage(root: &Path) -> Option<String> {
    read_package_json(root)
        .homepage
        .map(|url| url.trim().to_string())
        .filter(|url| url.starts_with("http://") || url.starts_with("https://"))
}
