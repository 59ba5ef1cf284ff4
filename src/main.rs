#![warn(clippy::all, clippy::pedantic)]

use std::path::Path;

use anyhow::Context;
use clap::Parser;
use link_module_alias::cli::{AliasCommand, ColorOverride, LinkModuleAliasCli};
use link_module_alias::linker::{Linker, Summary};
use link_module_alias::package::ProjectManifest;
use link_module_alias::utils::replace_home_with_tilde;

/// Link every alias in the project manifest.
///
/// # Arguments
///
/// - `project` - Project root directory.
fn link(project: &Path) -> anyhow::Result<()> {
    let manifest = ProjectManifest::try_from_project(project).with_context(|| {
        format!(
            "failed to read module aliases of {}",
            replace_home_with_tilde(project)
        )
    })?;

    #[cfg(debug_assertions)]
    println!("{manifest:#?}");

    let linker = Linker::new(&manifest.root);
    let results = linker.link(&manifest.aliases)?;

    println!("{}", Summary(&results));

    Ok(())
}

/// Unlink every alias with a marker, whether or not it is still configured.
///
/// # Arguments
///
/// - `project` - Project root directory.
fn unlink(project: &Path) -> anyhow::Result<()> {
    let linker = Linker::new(project);
    let unlinked = linker.unlink_all()?;

    println!("Unlinked module aliases: {}", unlinked.join(" "));

    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = LinkModuleAliasCli::parse();

    #[cfg(debug_assertions)]
    println!("cli={cli:#?}");

    let LinkModuleAliasCli {
        command,
        color_override,
        project,
    } = cli;

    match color_override {
        ColorOverride::Always => colored::control::set_override(true),
        ColorOverride::Auto => colored::control::unset_override(),
        ColorOverride::Never => colored::control::set_override(false),
    }

    let project = match project {
        Some(project) => project,
        None => std::env::current_dir()
            .and_then(dunce::canonicalize)
            .context("failed to locate current directory")?,
    };

    match command {
        None => link(&project),
        Some(AliasCommand::Unlink) => unlink(&project).with_context(|| {
            format!(
                "failed to unlink module aliases in {}",
                replace_home_with_tilde(&project)
            )
        }),
    }
}
