//! Runtime probing and drift detection against a working tree.

use std::fmt;
use std::path::Path;

use crate::build_info::BuildIdentity;
use crate::error::{Error, Result};
use crate::generator::{Generated, GitCommand};
use crate::output::Field;

/// A field whose embedded value differs from the working tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Drift {
    pub field: Field,
    pub embedded: String,
    pub probed: String,
}

impl fmt::Display for Drift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: built from '{}', tree has '{}'",
            self.field, self.embedded, self.probed
        )
    }
}

/// Probe the tree at `dir` with the given git program.
///
/// Build overrides (`GIT_VERSION_*`) are not applied; the result describes
/// the tree as git sees it.
pub fn probe_tree(git: &str, dir: &Path, config: &str) -> Generated {
    tracing::debug!(git, dir = %dir.display(), "probing working tree");
    let generated = Generated::probe(&GitCommand::new(git, dir), config);
    tracing::info!(
        branch = %generated.branch,
        commit = %generated.short_sha1,
        dirty = generated.dirty,
        "probed working tree"
    );
    generated
}

/// Fields that differ between `embedded` and `probed`, in record order.
///
/// The build configuration is skipped: a tree has no profile of its own.
#[must_use]
pub fn compare(embedded: &BuildIdentity<'_>, probed: &BuildIdentity<'_>) -> Vec<Drift> {
    Field::ALL
        .into_iter()
        .filter(|field| *field != Field::Config)
        .filter_map(|field| {
            let embedded = field.value(embedded);
            let probed = field.value(probed);
            (embedded != probed).then_some(Drift {
                field,
                embedded,
                probed,
            })
        })
        .collect()
}

/// Fail with [`Error::Drift`] unless `embedded` matches `probed`.
pub fn check(embedded: &BuildIdentity<'_>, probed: &BuildIdentity<'_>) -> Result<()> {
    let drift = compare(embedded, probed);
    if drift.is_empty() {
        return Ok(());
    }

    for d in &drift {
        tracing::warn!(
            field = %d.field,
            embedded = %d.embedded,
            probed = %d.probed,
            "build identity drift"
        );
    }
    Err(Error::Drift(drift))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BUILT: BuildIdentity<'static> =
        BuildIdentity::new("main", "abc123def456", "abc123d", "v1.2.0", "release", false);

    #[test]
    fn identical_identities_have_no_drift() {
        assert!(compare(&BUILT, &BUILT).is_empty());
        assert!(check(&BUILT, &BUILT).is_ok());
    }

    #[test]
    fn build_config_is_not_compared() {
        let tree = BuildIdentity {
            build_config: "debug",
            ..BUILT
        };
        assert!(compare(&BUILT, &tree).is_empty());
    }

    #[test]
    fn new_commit_reports_each_changed_field() {
        let tree = BuildIdentity {
            commit_id: "fedcba987654",
            short_commit_id: "fedcba9",
            is_dirty: true,
            ..BUILT
        };
        let drift = compare(&BUILT, &tree);
        let fields: Vec<_> = drift.iter().map(|d| d.field).collect();
        assert_eq!(fields, [Field::Commit, Field::Short, Field::Dirty]);
        assert_eq!(drift[2].embedded, "false");
        assert_eq!(drift[2].probed, "true");
    }

    #[test]
    fn check_error_lists_drift() {
        let tree = BuildIdentity {
            branch: "feature",
            ..BUILT
        };
        let err = check(&BUILT, &tree).unwrap_err();
        assert!(matches!(&err, Error::Drift(drift) if drift.len() == 1));
        assert_eq!(
            err.to_string(),
            "build identity does not match working tree: branch: built from 'main', tree has 'feature'"
        );
    }

    #[test]
    fn probe_outside_a_repository_yields_sentinels() {
        let dir = tempfile::tempdir().unwrap();
        let generated = probe_tree("git", dir.path(), "debug");
        assert_eq!(generated.sha1, crate::generator::UNKNOWN);
        assert_eq!(generated.tags, "");
        assert!(!generated.dirty);
    }
}
