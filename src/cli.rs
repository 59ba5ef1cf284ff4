use std::{
    fmt::{self, Display},
    path::PathBuf,
};

use anyhow::Context;
use clap::{
    Parser, Subcommand, ValueEnum, ValueHint,
    builder::{Styles, styling::AnsiColor},
};

use crate::constants::AFTER_HELP;

/// Get the color styles for the CLI help menu.
fn __cli_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Yellow.on_default())
        .usage(AnsiColor::Yellow.on_default())
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Green.on_default())
}

/// Parses a `&str` slice as a canonical [`PathBuf`].
///
/// # Arguments
///
/// - `s` - `&str` slice.
fn cli_parse_pathbuf(s: &str) -> Result<PathBuf, String> {
    dunce::canonicalize(s)
        .with_context(|| format!("failed to canonicalize {s}"))
        .map_err(|err| format!("{err:#}"))
}

/// Override the color setting. Default is [`ColorOverride::Auto`].
#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum ColorOverride {
    /// Always display color (i.e. force it).
    Always,
    /// Automatically determine if color should be used or not.
    Auto,
    /// Never display color.
    Never,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Subcommand)]
pub enum AliasCommand {
    /// Remove every alias this tool created, found through their marker files.
    Unlink,
}

/// Link module aliases from package.json into node_modules. Run with no subcommand to link.
#[derive(Clone, Debug, Parser)]
#[command(about, long_about = None, styles = __cli_styles(), version, after_help = AFTER_HELP)]
pub struct LinkModuleAliasCli {
    #[command(subcommand)]
    pub command: Option<AliasCommand>,

    /// When to show color.
    #[arg(long = "color", global = true, default_value_t = ColorOverride::default(), value_name = "WHEN")]
    pub color_override: ColorOverride,
    /// Project directory containing package.json and node_modules. [default: .]
    #[arg(short = 'C', long, global = true, value_parser = cli_parse_pathbuf, value_hint = ValueHint::DirPath)]
    pub project: Option<PathBuf>,
}

impl Default for ColorOverride {
    fn default() -> Self {
        Self::Auto
    }
}

impl Display for ColorOverride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ColorOverride::Always => "always",
            ColorOverride::Auto => "auto",
            ColorOverride::Never => "never",
        };

        write!(f, "{s}")
    }
}
