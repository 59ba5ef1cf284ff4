use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::constants::{ALIASES_FIELD, MANIFEST_FILE_NAME};

pub mod error;

/// Returns `true` if `name` can be used as an alias under the dependency directory: either
/// `name` or `@scope/name`, where neither part starts with `.` or `_` and nothing could escape
/// the dependency directory or collide with marker encoding.
pub fn is_valid_alias(name: &str) -> bool {
    fn is_valid_part(part: &str) -> bool {
        !part.is_empty()
            && !part.starts_with(['.', '_'])
            && !part
                .chars()
                .any(|c| c.is_whitespace() || matches!(c, '/' | '\\' | '%' | ':'))
    }

    match name.strip_prefix('@') {
        Some(scoped) => scoped
            .split_once('/')
            .is_some_and(|(scope, pkg)| is_valid_part(scope) && is_valid_part(pkg)),
        None => is_valid_part(name),
    }
}

/// Mapping of alias name to target, iterated in name order. Targets are relative to the project
/// root unless absolute.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct AliasMap(BTreeMap<String, String>);

impl AliasMap {
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn get(&self, alias: &str) -> Option<&str> {
        self.0.get(alias).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for AliasMap {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// The parts of a project's `package.json` this tool cares about.
#[derive(Debug, Deserialize)]
struct RawManifest {
    // must match `constants::ALIASES_FIELD`; serde needs a literal
    #[serde(rename = "_moduleAliases", default)]
    module_aliases: Option<AliasMap>,
}

/// A project manifest with its alias map.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProjectManifest {
    /// Directory containing the manifest.
    pub root: PathBuf,
    pub aliases: AliasMap,
}

impl TryFrom<PathBuf> for ProjectManifest {
    type Error = error::ConfigRead;

    /// Read and validate the manifest at `value`.
    fn try_from(value: PathBuf) -> Result<Self, Self::Error> {
        let manifest_path = value;

        if !manifest_path
            .try_exists()
            .map_err(|err| error::ConfigRead::Io {
                source: err,
                path: manifest_path.clone(),
            })?
        {
            return Err(error::ConfigRead::FileNotFound(manifest_path));
        }

        let manifest_str =
            fs::read_to_string(&manifest_path).map_err(|err| error::ConfigRead::Io {
                source: err,
                path: manifest_path.clone(),
            })?;
        let raw: RawManifest = serde_json::from_str(&manifest_str)?;

        let Some(aliases) = raw.module_aliases else {
            return Err(error::ConfigRead::MissingAliases {
                path: manifest_path,
                field: ALIASES_FIELD,
            });
        };

        if let Some((bad, _)) = aliases.iter().find(|(alias, _)| !is_valid_alias(alias)) {
            return Err(error::ConfigRead::InvalidAlias(bad.to_string()));
        }

        let root = manifest_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        Ok(Self { root, aliases })
    }
}

impl ProjectManifest {
    /// Read the manifest of the project rooted at `project`.
    ///
    /// # Errors
    ///
    /// An error will be returned if the manifest does not exist, cannot be read, contains
    /// malformed JSON, has no alias map, or names an invalid alias.
    pub fn try_from_project<P: AsRef<Path>>(project: P) -> Result<Self, error::ConfigRead> {
        Self::try_from(project.as_ref().join(MANIFEST_FILE_NAME))
    }
}

/// Manifest written into a proxy directory, redirecting the package to a single script.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct ProxyManifest {
    pub name: String,
    pub main: String,
}

impl ProxyManifest {
    pub fn new<N: Into<String>, M: Into<String>>(name: N, main: M) -> Self {
        Self {
            name: name.into(),
            main: main.into(),
        }
    }

    /// Write this manifest into the directory `dir`. Truncates any existing manifest.
    ///
    /// # Errors
    ///
    /// An error will be returned if serialization fails or the file cannot be written.
    pub fn write_to<P: AsRef<Path>>(&self, dir: P) -> Result<(), error::ConfigWrite> {
        let manifest_path = dir.as_ref().join(MANIFEST_FILE_NAME);
        let mut manifest_str = serde_json::to_string_pretty(self)?;
        manifest_str.push('\n');
        fs::write(&manifest_path, manifest_str).map_err(|err| error::ConfigWrite::Io {
            source: err,
            path: manifest_path,
        })?;
        Ok(())
    }
}
