//! Integration tests for the embedded build identity.

use std::thread;

use git_version::build_info::{
    self, BRANCH, BUILD_CONFIG, BuildIdentity, COMMIT_ID, IS_DIRTY, SHORT_COMMIT_ID, TAGS,
};
use git_version::generator::UNKNOWN;

#[test]
fn repeated_reads_are_identical() {
    let first = *build_info::current();
    for _ in 0..100 {
        assert_eq!(*build_info::current(), first);
    }
    assert_eq!(first.branch, BRANCH);
    assert_eq!(first.is_dirty, IS_DIRTY);
}

#[test]
fn concurrent_readers_see_complete_record() {
    let expected = BuildIdentity::new(
        BRANCH,
        COMMIT_ID,
        SHORT_COMMIT_ID,
        TAGS,
        BUILD_CONFIG,
        IS_DIRTY,
    );

    thread::scope(|scope| {
        let readers: Vec<_> = (0..16)
            .map(|_| scope.spawn(|| (0..1_000).map(|_| *build_info::current()).collect::<Vec<_>>()))
            .collect();

        for reader in readers {
            let seen = reader.join().unwrap();
            assert!(seen.iter().all(|identity| *identity == expected));
        }
    });
}

#[test]
fn text_fields_are_single_line() {
    let identity = build_info::current();
    for text in [
        identity.branch,
        identity.commit_id,
        identity.short_commit_id,
        identity.tags,
        identity.build_config,
    ] {
        assert!(!text.contains('\n'));
    }
}

#[test]
fn short_id_abbreviates_full_id_when_known() {
    let identity = build_info::current();
    if identity.commit_id == UNKNOWN || identity.commit_id.is_empty() {
        return;
    }
    if identity.short_commit_id.is_empty() {
        return;
    }
    assert!(identity.commit_id.starts_with(identity.short_commit_id));
}

#[test]
fn version_string_reflects_dirty_flag() {
    let identity = build_info::current();
    assert!(identity.version_string().starts_with(build_info::VERSION));
    assert_eq!(identity.version_string().ends_with("*)"), IS_DIRTY);
}
