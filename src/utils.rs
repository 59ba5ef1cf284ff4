use std::{
    fs, io,
    path::{Path, PathBuf},
};

use pathdiff::diff_paths;

use crate::constants::BASE_DIRS;

/// If the [`Path`] reference begins with the users home directory, it is replaced with a `~`.
/// Meant for printing.
///
/// # Arguments
///
/// - `p` - Path reference
pub fn replace_home_with_tilde<P: AsRef<Path>>(p: P) -> String {
    let path = p.as_ref();
    match BASE_DIRS
        .as_ref()
        .and_then(|dirs| path.strip_prefix(dirs.home_dir()).ok())
    {
        Some(tail) => PathBuf::from("~").join(tail),
        None => path.to_path_buf(),
    }
    .to_string_lossy()
    .to_string()
}

/**
Create a new symbolic (soft) link to a directory using OS-specific functions.

# Arguments

- `original` - Directory the link points to. May be relative to the parent of `link`.
- `link` - Link path.

# Errors

See the following for error descriptions:

- Unix: [`std::os::unix::fs::symlink`]
- Windows: [`std::os::windows::fs::symlink_dir`]
*/
pub fn os_symlink_dir<P, Q>(original: P, link: Q) -> io::Result<()>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let original = original.as_ref();
    let link = link.as_ref();
    // [`std::fs::soft_link`] works fine, but is weird on Windows. The documentation recommends
    // using OS-specific libraries to make intent explicit.
    #[cfg(unix)]
    {
        std::os::unix::fs::symlink(original, link)
    }

    #[cfg(windows)]
    {
        std::os::windows::fs::symlink_dir(original, link)
    }

    #[cfg(not(any(windows, unix)))]
    {
        unimplemented!()
    }
}

/// Remove a symbolic link without touching what it points to.
///
/// # Errors
///
/// Whatever [`fs::remove_file`] (or [`fs::remove_dir`] for Windows directory links) returns.
pub fn os_remove_symlink<P: AsRef<Path>>(link: P) -> io::Result<()> {
    let link = link.as_ref();

    // directory symlinks are directories as far as Windows is concerned
    #[cfg(windows)]
    {
        fs::remove_dir(link).or_else(|_| fs::remove_file(link))
    }

    #[cfg(not(windows))]
    {
        fs::remove_file(link)
    }
}

/// [`fs::symlink_metadata`], except a missing path is `Ok(None)`.
///
/// # Errors
///
/// Any error other than [`io::ErrorKind::NotFound`].
pub fn lstat<P: AsRef<Path>>(p: P) -> io::Result<Option<fs::Metadata>> {
    match fs::symlink_metadata(p) {
        Ok(metadata) => Ok(Some(metadata)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err),
    }
}

/// Treat [`io::ErrorKind::NotFound`] as success.
pub fn ignore_not_found(res: io::Result<()>) -> io::Result<()> {
    match res {
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}

/// Returns `path` relative to `base`, joined with `/` regardless of platform. Both paths should be
/// absolute; `None` if no relative path exists.
///
/// # Arguments
///
/// - `path` - Path to make relative.
/// - `base` - Directory the result is relative to.
pub fn relative_slash_path<P, B>(path: P, base: B) -> Option<String>
where
    P: AsRef<Path>,
    B: AsRef<Path>,
{
    let relative = diff_paths(path, base)?;
    let parts = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>();
    Some(parts.join("/"))
}
