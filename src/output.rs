//! Rendering of build identities for humans and scripts.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::build_info::BuildIdentity;
use crate::error::Result;
use crate::generator::KEYS;

/// Output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// Aligned `label: value` lines.
    #[default]
    Text,
    /// Pretty-printed JSON object.
    Json,
    /// Shell-quoted `GIT_VERSION_*=value` assignments.
    Env,
}

/// A single identity field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Field {
    Branch,
    Commit,
    Short,
    Tags,
    Config,
    Dirty,
}

impl Field {
    /// Every field, in record order.
    pub const ALL: [Self; 6] = [
        Self::Branch,
        Self::Commit,
        Self::Short,
        Self::Tags,
        Self::Config,
        Self::Dirty,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Branch => "branch",
            Self::Commit => "commit",
            Self::Short => "short",
            Self::Tags => "tags",
            Self::Config => "config",
            Self::Dirty => "dirty",
        }
    }

    /// The field's value in `identity`; `dirty` renders as `true`/`false`.
    #[must_use]
    pub fn value(self, identity: &BuildIdentity<'_>) -> String {
        match self {
            Self::Branch => identity.branch.to_string(),
            Self::Commit => identity.commit_id.to_string(),
            Self::Short => identity.short_commit_id.to_string(),
            Self::Tags => identity.tags.to_string(),
            Self::Config => identity.build_config.to_string(),
            Self::Dirty => identity.is_dirty.to_string(),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Render `identity` in `format`, newline-terminated.
pub fn render(identity: &BuildIdentity<'_>, format: Format) -> Result<String> {
    match format {
        Format::Text => Ok(render_text(identity)),
        Format::Json => {
            let mut json = serde_json::to_string_pretty(identity)?;
            json.push('\n');
            Ok(json)
        }
        Format::Env => Ok(render_env(identity)),
    }
}

fn render_text(identity: &BuildIdentity<'_>) -> String {
    Field::ALL
        .into_iter()
        .map(|field| (field.as_str(), field.value(identity)))
        .chain(std::iter::once(("describe", identity.describe())))
        .map(|(label, value)| {
            let label = format!("{label}:");
            format!("{label:<9} {value}\n")
        })
        .collect()
}

fn render_env(identity: &BuildIdentity<'_>) -> String {
    KEYS.iter()
        .zip(Field::ALL)
        .map(|(key, field)| format!("{key}={}\n", shell_quote(&field.value(identity))))
        .collect()
}

/// Single-quote `value` for POSIX shells.
fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}
