use std::{fs, path::PathBuf};

use tempfile::TempDir;

/// Creates a project at `<tempdir>/app` whose manifest aliases `lib` to `<tempdir>/shared/lib`
/// and `util` to `<tempdir>/shared/util.js`. Returns the tempdir guard and the project path.
pub fn init_project() -> (TempDir, PathBuf) {
    let tmp = tempfile::tempdir().expect("tempdir");
    let root = dunce::canonicalize(tmp.path()).expect("canonical tempdir");
    let project = root.join("app");

    fs::create_dir_all(project.join("node_modules/installed")).expect("create node_modules");
    fs::write(project.join("node_modules/installed/index.js"), "// installed\n")
        .expect("write installed package");
    fs::create_dir_all(root.join("shared/lib")).expect("create shared lib");
    fs::write(root.join("shared/lib/index.js"), "module.exports = 1;\n").expect("write lib");
    fs::write(root.join("shared/util.js"), "module.exports = 2;\n").expect("write util");
    fs::write(
        project.join("package.json"),
        r#"{
  "name": "app",
  "_moduleAliases": {
    "installed": "../shared/lib",
    "lib": "../shared/lib",
    "util": "../shared/util.js"
  }
}
"#,
    )
    .expect("write manifest");

    (tmp, project)
}
