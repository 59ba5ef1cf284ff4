use std::sync::LazyLock;

use const_format::formatc;
use regex::Regex;

/// Lazy wrapper around [`directories_next::BaseDirs::new`]. `None` if no home directory could be
/// located, which only affects how paths are printed.
pub static BASE_DIRS: LazyLock<Option<directories_next::BaseDirs>> =
    LazyLock::new(directories_next::BaseDirs::new);

/// Directory the package manager installs dependencies into, relative to the project root.
pub const DEPENDENCY_DIR: &str = "node_modules";

/// File name of a package manifest, both the project's and the generated proxy manifests.
pub const MANIFEST_FILE_NAME: &str = "package.json";

/// Field of the project manifest that holds the alias map.
pub const ALIASES_FIELD: &str = "_moduleAliases";

/// Prefix of every marker file in the dependency directory.
pub const MARKER_PREFIX: &str = ".link-module-alias-";

/// Extra help text for the CLI.
pub const AFTER_HELP: &str = formatc!(
    "Aliases are read from the `{}` field of ./{}. Created entries are tracked with `{}/{}<alias>` markers.",
    ALIASES_FIELD,
    MANIFEST_FILE_NAME,
    DEPENDENCY_DIR,
    MARKER_PREFIX
);

/// Matches marker file names, capturing the encoded alias.
pub static MARKER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("^{}(.+)$", regex::escape(MARKER_PREFIX))).unwrap()
});

/// Targets matching this are linked through a proxy package instead of a symlink.
pub static SCRIPT_TARGET_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.(js|cjs|mjs)$").unwrap());
