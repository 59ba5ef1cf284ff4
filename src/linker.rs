use std::{
    fmt::{self, Display},
    fs,
    path::{Path, PathBuf},
};

use colored::Colorize;
use pathdiff::diff_paths;
use rayon::prelude::*;

use crate::{
    constants::{DEPENDENCY_DIR, MARKER_PREFIX, MARKER_REGEX, SCRIPT_TARGET_REGEX},
    error::LinkError,
    package::{AliasMap, ProxyManifest, is_valid_alias},
    utils::{
        ignore_not_found, lstat, os_remove_symlink, os_symlink_dir, relative_slash_path,
        replace_home_with_tilde,
    },
};

/// What [`Linker::link`] created for an alias.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkKind {
    /// Nothing. The alias path is foreign or the target is invalid.
    None,
    /// A symlink to the target directory.
    Symlink,
    /// A generated package whose `main` points at the target script.
    Proxy,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LinkResult {
    pub alias: String,
    pub kind: LinkKind,
    pub target: String,
}

/// Single-line summary of a [`Linker::link`] run.
pub struct Summary<'a>(pub &'a [LinkResult]);

impl Display for LinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LinkKind::None => "none",
            LinkKind::Symlink => "symlink",
            LinkKind::Proxy => "proxy",
        };

        write!(f, "{s}")
    }
}

impl Display for LinkResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self {
            alias,
            kind,
            target,
        } = self;
        match kind {
            LinkKind::None => write!(
                f,
                "{} -> {} ({kind})",
                alias.yellow(),
                target.bright_red()
            ),
            LinkKind::Symlink => write!(f, "{} -> {}", alias.bright_green(), target.green()),
            LinkKind::Proxy => write!(f, "{} -> {} ({kind})", alias.cyan(), target.green()),
        }
    }
}

impl Display for Summary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "No module aliases to link");
        }

        write!(f, "Module aliases: ")?;
        for (i, result) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{result}")?;
        }
        Ok(())
    }
}

impl LinkResult {
    fn new(alias: &str, kind: LinkKind, target: &str) -> Self {
        Self {
            alias: alias.to_string(),
            kind,
            target: target.to_string(),
        }
    }
}

/// Marker file name for `alias`. Scoped aliases have their `/` encoded so the marker sits directly
/// in the dependency directory.
pub fn marker_file_name(alias: &str) -> String {
    format!("{MARKER_PREFIX}{}", alias.replace('/', "%2F"))
}

/// Inverse of [`marker_file_name`]. `None` if `file_name` is not a marker.
pub fn alias_from_marker(file_name: &str) -> Option<String> {
    MARKER_REGEX
        .captures(file_name)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().replace("%2F", "/"))
}

/// Returns `true` if `target` is linked through a proxy package instead of a symlink.
pub fn is_script_target(target: &str) -> bool {
    SCRIPT_TARGET_REGEX.is_match(target)
}

/// Creates and removes alias entries in a project's dependency directory. An entry is only ever
/// removed or replaced if its marker file exists.
#[derive(Clone, Debug)]
pub struct Linker {
    project_root: PathBuf,
    dependency_root: PathBuf,
}

impl Linker {
    /// Make a [`Linker`] for the project at `project_root`, which should be absolute.
    pub fn new<P: Into<PathBuf>>(project_root: P) -> Self {
        let project_root = project_root.into();
        let dependency_root = project_root.join(DEPENDENCY_DIR);
        Self {
            project_root,
            dependency_root,
        }
    }

    pub fn dependency_root(&self) -> &Path {
        &self.dependency_root
    }

    fn alias_path(&self, alias: &str) -> PathBuf {
        self.dependency_root.join(alias)
    }

    fn marker_path(&self, alias: &str) -> PathBuf {
        self.dependency_root.join(marker_file_name(alias))
    }

    /// Resolves `target` against the project root and cleans it.
    fn resolve_target(&self, target: &str) -> PathBuf {
        path_clean::clean(self.project_root.join(target))
    }

    /// Link every alias in `aliases`. Aliases are processed in parallel; the returned results
    /// are in alias order.
    ///
    /// # Errors
    ///
    /// The first filesystem error from any alias. Foreign entries and invalid targets are not
    /// errors, they are reported as [`LinkKind::None`].
    pub fn link(&self, aliases: &AliasMap) -> Result<Vec<LinkResult>, LinkError> {
        println!("Setting up module aliases");

        aliases
            .iter()
            .collect::<Vec<_>>()
            .into_par_iter()
            .map(|(alias, target)| self.link_alias(alias, target))
            .collect()
    }

    fn link_alias(&self, alias: &str, target: &str) -> Result<LinkResult, LinkError> {
        let alias_path = self.alias_path(alias);
        let marker_path = self.marker_path(alias);

        let entry_exists = lstat(&alias_path)
            .map_err(LinkError::io(alias, "inspect", &alias_path))?
            .is_some();
        let marker_exists = lstat(&marker_path)
            .map_err(LinkError::io(alias, "inspect", &marker_path))?
            .is_some();

        if entry_exists && !marker_exists {
            eprintln!(
                "{}: module {} already exists and wasn't created by us, skipping",
                "warn".yellow(),
                alias.bold()
            );
            return Ok(LinkResult::new(alias, LinkKind::None, target));
        }

        self.unlink(alias)?;

        let kind = if is_script_target(target) {
            self.create_proxy(alias, target)?
        } else {
            self.create_symlink(alias, target)?
        };

        if kind != LinkKind::None {
            fs::write(&marker_path, "").map_err(LinkError::io(alias, "write", &marker_path))?;
        }

        Ok(LinkResult::new(alias, kind, target))
    }

    fn create_proxy(&self, alias: &str, target: &str) -> Result<LinkKind, LinkError> {
        println!("Target {target} is a script, creating proxy package for {alias}");

        let alias_path = self.alias_path(alias);
        let target_path = self.resolve_target(target);
        let main = relative_slash_path(&target_path, &alias_path).ok_or_else(|| {
            LinkError::RelativePath {
                path: target_path.clone(),
                base: alias_path.clone(),
            }
        })?;

        fs::create_dir_all(&alias_path).map_err(LinkError::io(alias, "create", &alias_path))?;
        ProxyManifest::new(alias, main)
            .write_to(&alias_path)
            .map_err(|source| LinkError::ProxyManifest {
                alias: alias.to_string(),
                source,
            })?;

        Ok(LinkKind::Proxy)
    }

    fn create_symlink(&self, alias: &str, target: &str) -> Result<LinkKind, LinkError> {
        let alias_path = self.alias_path(alias);
        let target_path = self.resolve_target(target);

        // follows symlinks; the target itself may be a link to a directory
        match fs::metadata(&target_path) {
            Ok(metadata) if metadata.is_dir() => {}
            Ok(_) => {
                eprintln!(
                    "{}: target {} is not a directory, skipping {}",
                    "warn".yellow(),
                    replace_home_with_tilde(&target_path),
                    alias.bold()
                );
                return Ok(LinkKind::None);
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                eprintln!(
                    "{}: target {} does not exist, skipping {}",
                    "warn".yellow(),
                    replace_home_with_tilde(&target_path),
                    alias.bold()
                );
                return Ok(LinkKind::None);
            }
            Err(err) => return Err(LinkError::io(alias, "inspect", &target_path)(err)),
        }

        println!("Target {target} is a directory, creating symlink for {alias}");

        let link_parent = alias_path
            .parent()
            .unwrap_or(self.dependency_root.as_path());
        let relative_target = diff_paths(&target_path, link_parent).ok_or_else(|| {
            LinkError::RelativePath {
                path: target_path.clone(),
                base: link_parent.to_path_buf(),
            }
        })?;

        fs::create_dir_all(link_parent).map_err(LinkError::io(alias, "create", link_parent))?;
        os_symlink_dir(&relative_target, &alias_path)
            .map_err(LinkError::io(alias, "symlink", &alias_path))?;

        Ok(LinkKind::Symlink)
    }

    /// Remove the entry for `alias` and its marker. Does **not** check for the marker first; see
    /// [`Linker::unlink_all`] for that. Missing paths are ignored.
    ///
    /// # Errors
    ///
    /// [`LinkError::InvalidAlias`] if `alias` could resolve outside its own entry in the
    /// dependency directory, otherwise any filesystem error other than a missing path.
    pub fn unlink(&self, alias: &str) -> Result<String, LinkError> {
        if !is_valid_alias(alias) {
            return Err(LinkError::InvalidAlias(alias.to_string()));
        }

        let alias_path = self.alias_path(alias);
        let marker_path = self.marker_path(alias);

        let metadata = lstat(&alias_path).map_err(LinkError::io(alias, "inspect", &alias_path))?;
        let removal = match metadata {
            Some(m) if m.file_type().is_symlink() => os_remove_symlink(&alias_path),
            Some(m) if m.is_dir() => fs::remove_dir_all(&alias_path),
            Some(_) => fs::remove_file(&alias_path),
            None => Ok(()),
        };
        ignore_not_found(removal).map_err(LinkError::io(alias, "remove", &alias_path))?;
        ignore_not_found(fs::remove_file(&marker_path))
            .map_err(LinkError::io(alias, "remove", &marker_path))?;

        Ok(alias.to_string())
    }

    /// Unlink every alias that has a marker in the dependency directory. The alias map is not
    /// consulted. Markers naming an invalid alias are skipped with a warning. Scope directories
    /// left empty afterwards are removed, including ones that were already empty before linking.
    ///
    /// # Errors
    ///
    /// An error is returned if the dependency directory cannot be read or any alias fails to
    /// unlink.
    pub fn unlink_all(&self) -> Result<Vec<String>, LinkError> {
        if lstat(&self.dependency_root)
            .map_err(|source| LinkError::DependencyRoot {
                path: self.dependency_root.clone(),
                source,
            })?
            .is_none()
        {
            return Ok(Vec::new());
        }

        let mut aliases = Vec::new();
        for entry in walkdir::WalkDir::new(&self.dependency_root)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry?;
            let Some(alias) = entry.file_name().to_str().and_then(alias_from_marker) else {
                continue;
            };
            if is_valid_alias(&alias) {
                aliases.push(alias);
            } else {
                eprintln!(
                    "{}: ignoring marker {} for invalid alias {alias:?}",
                    "warn".yellow(),
                    replace_home_with_tilde(entry.path())
                );
            }
        }

        let unlinked = aliases
            .into_par_iter()
            .map(|alias| self.unlink(&alias))
            .collect::<Result<Vec<_>, _>>()?;

        // only after every alias is gone, so a sibling in the same scope can't race this
        for alias in &unlinked {
            if let Some((scope, _)) = alias.split_once('/') {
                self.remove_empty_scope(alias, scope)?;
            }
        }

        Ok(unlinked)
    }

    fn remove_empty_scope(&self, alias: &str, scope: &str) -> Result<(), LinkError> {
        let scope_path = self.dependency_root.join(scope);
        let is_empty = match fs::read_dir(&scope_path) {
            Ok(mut entries) => entries.next().is_none(),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => false,
            Err(err) => return Err(LinkError::io(alias, "read", &scope_path)(err)),
        };

        if is_empty {
            ignore_not_found(fs::remove_dir(&scope_path))
                .map_err(LinkError::io(alias, "remove", &scope_path))?;
        }

        Ok(())
    }
}
