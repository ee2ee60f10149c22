//! CLI command parsing.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::output::{Field, Format};

/// git-version - print the git identity a binary was built from.
#[derive(Parser)]
#[command(name = "git-version")]
#[command(about = "Print the git identity this binary was built from")]
#[command(version)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase logging verbosity.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the identity embedded at build time (default).
    Show {
        /// Output format (defaults to the configured format).
        #[arg(short, long, value_enum)]
        format: Option<Format>,

        /// Print a single field's value.
        #[arg(long, value_enum, conflicts_with = "format")]
        field: Option<Field>,
    },

    /// Probe a working tree now, as the build script would.
    Probe {
        /// Working tree to probe.
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,

        /// Output format (defaults to the configured format).
        #[arg(short, long, value_enum)]
        format: Option<Format>,

        /// Build configuration label to report.
        #[arg(short, long)]
        profile: Option<String>,
    },

    /// Check that this binary was built from the working tree.
    Verify {
        /// Working tree to compare against.
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,
    },

    /// Manage configuration.
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the current configuration.
    Show,

    /// Show the configuration file path.
    Path,
}
