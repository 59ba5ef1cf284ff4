#![cfg(test)]

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use tempfile::TempDir;

use crate::constants::{DEPENDENCY_DIR, MANIFEST_FILE_NAME};

pub const TEST_MANIFEST: &str = r#"{
  "name": "app",
  "_moduleAliases": {
    "@local/lib": "../shared/lib",
    "lib": "../shared/lib",
    "util": "../shared/util.js"
  }
}
"#;

const TEST_FILES: [&str; 4] = [
    "app/node_modules/installed/index.js",
    "shared/lib/index.js",
    "shared/util.js",
    "shared/README.md",
];

/// Writes `contents` as the manifest of `project`.
pub fn write_manifest<P: AsRef<Path>>(project: P, contents: &str) -> anyhow::Result<()> {
    let manifest_path = project.as_ref().join(MANIFEST_FILE_NAME);
    fs::write(&manifest_path, contents)
        .with_context(|| format!("failed to write test manifest '{}'", manifest_path.display()))
}

/// Creates a new temporary project for use in tests. Every call creates a _new_ temporary
/// directory with the same structure, returned with the canonical path of `app`:
///
/// ```text
/// <tempdir>
/// ├── app
/// │   ├── node_modules
/// │   │   └── installed
/// │   │       └── index.js
/// │   └── package.json
/// └── shared
///     ├── lib
///     │   └── index.js
///     ├── README.md
///     └── util.js
/// ```
pub fn make_tmp_project() -> anyhow::Result<(TempDir, PathBuf)> {
    let temp_dir = tempfile::tempdir().context("failed to create tempdir")?;
    let root = dunce::canonicalize(temp_dir.path()).context("failed to canonicalize tempdir")?;
    for file in &TEST_FILES {
        let full_path = root.join(file);
        let parent = full_path.parent().unwrap();
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create test dir '{parent:?}'"))?;
        // use file path as file contents
        fs::write(&full_path, full_path.to_string_lossy().as_bytes())
            .with_context(|| format!("failed to create test file '{full_path:?}'"))?;
    }

    let project = root.join("app");
    write_manifest(&project, TEST_MANIFEST)?;

    Ok((temp_dir, project))
}

/// Lists every path under the dependency directory of `project`, relative to it and without
/// following symlinks, in name order.
pub fn list_dependencies<P: AsRef<Path>>(project: P) -> anyhow::Result<Vec<PathBuf>> {
    let dependency_root = project.as_ref().join(DEPENDENCY_DIR);
    walkdir::WalkDir::new(&dependency_root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .map(|entry| -> anyhow::Result<PathBuf> {
            let entry = entry.context("failed to walk dependency dir")?;
            Ok(entry.path().strip_prefix(&dependency_root)?.to_path_buf())
        })
        .collect()
}
