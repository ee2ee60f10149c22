//! Build identity captured at compile time.
//!
//! The build script probes git and exports six `GIT_VERSION_*` variables to
//! the compiler. They land here as `&'static str` constants, so the record
//! is complete before `main` runs and never changes afterwards.

use std::fmt;

use serde::Serialize;

use crate::generator::Generated;

/// Package version from Cargo.toml.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Branch checked out at build time (`HEAD` when detached).
pub const BRANCH: &str = env!("GIT_VERSION_BRANCH");

/// Full commit id.
pub const COMMIT_ID: &str = env!("GIT_VERSION_SHA1");

/// Abbreviated commit id.
pub const SHORT_COMMIT_ID: &str = env!("GIT_VERSION_SHORT_SHA1");

/// `git describe --tags` output, empty when no tag is reachable.
pub const TAGS: &str = env!("GIT_VERSION_TAGS");

/// Build configuration label (cargo profile unless overridden).
pub const BUILD_CONFIG: &str = env!("GIT_VERSION_CONFIG");

/// Whether the working tree had uncommitted changes.
pub const IS_DIRTY: bool = flag(env!("GIT_VERSION_DIRTY"));

static CURRENT: BuildIdentity<'static> = BuildIdentity::new(
    BRANCH,
    COMMIT_ID,
    SHORT_COMMIT_ID,
    TAGS,
    BUILD_CONFIG,
    IS_DIRTY,
);

/// The identity of the running binary.
#[must_use]
pub fn current() -> &'static BuildIdentity<'static> {
    &CURRENT
}

// The build script always writes `true` or `false`.
const fn flag(value: &str) -> bool {
    matches!(value.as_bytes(), b"true")
}

/// Version-control facts describing the source a binary was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildIdentity<'a> {
    pub branch: &'a str,
    pub commit_id: &'a str,
    pub short_commit_id: &'a str,
    pub tags: &'a str,
    pub build_config: &'a str,
    pub is_dirty: bool,
}

impl<'a> BuildIdentity<'a> {
    #[must_use]
    pub const fn new(
        branch: &'a str,
        commit_id: &'a str,
        short_commit_id: &'a str,
        tags: &'a str,
        build_config: &'a str,
        is_dirty: bool,
    ) -> Self {
        Self {
            branch,
            commit_id,
            short_commit_id,
            tags,
            build_config,
            is_dirty,
        }
    }

    /// Full version string including hash and dirty indicator.
    ///
    /// Format: `0.1.0 (abc1234)` or `0.1.0 (abc1234*)` if dirty.
    #[must_use]
    pub fn version_string(&self) -> String {
        self.version_string_with_marker("*")
    }

    /// [`Self::version_string`] with a custom dirty marker.
    #[must_use]
    pub fn version_string_with_marker(&self, marker: &str) -> String {
        format!("{VERSION} ({}{})", self.short_commit_id, self.dirty_marker(marker))
    }

    /// Short version for display in constrained spaces.
    ///
    /// Format: `build abc1234` or `build abc1234*` if dirty.
    #[must_use]
    pub fn short_version(&self) -> String {
        format!("build {}{}", self.short_commit_id, self.dirty_marker("*"))
    }

    /// Describe the revision the way `git describe --dirty` would.
    ///
    /// Uses the tag description when one exists, the short id otherwise.
    #[must_use]
    pub fn describe(&self) -> String {
        let base = if self.tags.is_empty() {
            self.short_commit_id
        } else {
            self.tags
        };

        if self.is_dirty {
            format!("{base}-dirty")
        } else {
            base.to_string()
        }
    }

    const fn dirty_marker<'m>(&self, marker: &'m str) -> &'m str {
        if self.is_dirty { marker } else { "" }
    }
}

impl fmt::Display for BuildIdentity<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}@{}{}",
            self.branch,
            self.short_commit_id,
            self.dirty_marker("*")
        )?;
        if !self.tags.is_empty() {
            write!(f, " ({})", self.tags)?;
        }
        write!(f, " [{}]", self.build_config)
    }
}

impl<'a> From<&'a Generated> for BuildIdentity<'a> {
    fn from(generated: &'a Generated) -> Self {
        Self::new(
            &generated.branch,
            &generated.sha1,
            &generated.short_sha1,
            &generated.tags,
            &generated.config,
            generated.dirty,
        )
    }
}
