//! Computes the build identity of a git working tree.
//!
//! This file is compiled twice: by `build.rs`, which turns the result into
//! `cargo:rustc-env` directives, and as part of the library, where `probe`
//! and `verify` run it against a live tree. It depends on `std` only.

use std::path::{Path, PathBuf};
use std::process::Command;

/// Sentinel for text fields git could not provide.
pub const UNKNOWN: &str = "unknown";

/// Length of a short commit id derived from a full one.
pub const SHORT_LEN: usize = 7;

pub const BRANCH_KEY: &str = "GIT_VERSION_BRANCH";
pub const SHA1_KEY: &str = "GIT_VERSION_SHA1";
pub const SHORT_SHA1_KEY: &str = "GIT_VERSION_SHORT_SHA1";
pub const TAGS_KEY: &str = "GIT_VERSION_TAGS";
pub const CONFIG_KEY: &str = "GIT_VERSION_CONFIG";
pub const DIRTY_KEY: &str = "GIT_VERSION_DIRTY";

/// Environment variable naming the git program.
pub const GIT_PROGRAM_KEY: &str = "GIT";

/// Every variable the generator emits, in field order.
pub const KEYS: [&str; 6] = [
    BRANCH_KEY,
    SHA1_KEY,
    SHORT_SHA1_KEY,
    TAGS_KEY,
    CONFIG_KEY,
    DIRTY_KEY,
];

/// Lists tracked changes without refreshing (and so rewriting) the index.
const STATUS_ARGS: [&str; 4] = [
    "--no-optional-locks",
    "status",
    "--porcelain",
    "--untracked-files=no",
];

/// Package inputs watched alongside the repository state.
const PACKAGE_INPUTS: [&str; 3] = ["src", "build.rs", "Cargo.toml"];

/// Git-internal paths whose changes move `HEAD`, the index, or a tag.
const GIT_PATHS: [&str; 4] = ["HEAD", "index", "packed-refs", "refs"];

/// Something that can answer git queries.
pub trait GitSource {
    /// Run git with `args`, returning trimmed stdout on success.
    ///
    /// Any failure (program missing, not a repository, non-zero exit,
    /// non-UTF-8 output) is `None`.
    fn run(&self, args: &[&str]) -> Option<String>;
}

/// Runs a git executable inside a directory.
#[derive(Debug, Clone)]
pub struct GitCommand {
    program: String,
    dir: PathBuf,
}

impl GitCommand {
    #[must_use]
    pub fn new(program: impl Into<String>, dir: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            dir: dir.into(),
        }
    }

    /// Run the program named by `GIT` (default `git`) inside `dir`.
    #[must_use]
    pub fn from_environment(dir: &Path) -> Self {
        let program = std::env::var(GIT_PROGRAM_KEY).unwrap_or_else(|_| "git".to_string());
        Self::new(program, dir)
    }
}

impl GitSource for GitCommand {
    fn run(&self, args: &[&str]) -> Option<String> {
        Command::new(&self.program)
            .args(args)
            .current_dir(&self.dir)
            .output()
            .ok()
            .filter(|o| o.status.success())
            .and_then(|o| String::from_utf8(o.stdout).ok())
            .map(|s| s.trim().to_string())
    }
}

/// Identity values computed for one working tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generated {
    pub branch: String,
    pub sha1: String,
    pub short_sha1: String,
    pub tags: String,
    pub config: String,
    pub dirty: bool,
}

impl Generated {
    /// Query `source` for every field, substituting sentinels for anything
    /// it cannot answer.
    ///
    /// `config` is the build configuration label (cargo's `PROFILE` in the
    /// build script). Untracked files do not make the tree dirty.
    #[must_use]
    pub fn probe(source: &impl GitSource, config: &str) -> Self {
        let sha1 = non_empty(source, &["rev-parse", "HEAD"]);
        let short_sha1 = non_empty(source, &["rev-parse", "--short", "HEAD"])
            .or_else(|| sha1.as_deref().map(abbreviate));

        Self {
            branch: non_empty(source, &["rev-parse", "--abbrev-ref", "HEAD"])
                .unwrap_or_else(|| UNKNOWN.to_string()),
            sha1: sha1.unwrap_or_else(|| UNKNOWN.to_string()),
            short_sha1: short_sha1.unwrap_or_else(|| UNKNOWN.to_string()),
            tags: source.run(&["describe", "--tags"]).unwrap_or_default(),
            config: (if config.is_empty() { UNKNOWN } else { config }).to_string(),
            dirty: source
                .run(&STATUS_ARGS)
                .is_some_and(|s| !s.is_empty()),
        }
    }

    /// Replace probed values with overrides found through `lookup`.
    ///
    /// An empty text override is kept as an empty field. The dirty override
    /// only applies when it parses as a flag.
    #[must_use]
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let text_fields = [
            (BRANCH_KEY, &mut self.branch),
            (SHA1_KEY, &mut self.sha1),
            (SHORT_SHA1_KEY, &mut self.short_sha1),
            (TAGS_KEY, &mut self.tags),
            (CONFIG_KEY, &mut self.config),
        ];
        for (key, field) in text_fields {
            if let Some(value) = lookup(key) {
                *field = value;
            }
        }

        if let Some(dirty) = lookup(DIRTY_KEY).as_deref().and_then(parse_flag) {
            self.dirty = dirty;
        }

        self
    }

    /// `(variable, value)` pairs in field order, dirty as `true`/`false`.
    #[must_use]
    pub fn entries(&self) -> [(&'static str, &str); 6] {
        [
            (BRANCH_KEY, self.branch.as_str()),
            (SHA1_KEY, self.sha1.as_str()),
            (SHORT_SHA1_KEY, self.short_sha1.as_str()),
            (TAGS_KEY, self.tags.as_str()),
            (CONFIG_KEY, self.config.as_str()),
            (DIRTY_KEY, if self.dirty { "true" } else { "false" }),
        ]
    }

    /// `cargo:rustc-env` lines exposing every field to the compiler.
    ///
    /// A value spanning several lines is cut to its first line, with a
    /// `cargo:warning` saying so.
    #[must_use]
    pub fn cargo_directives(&self) -> Vec<String> {
        let mut directives = Vec::with_capacity(KEYS.len());
        for (key, value) in self.entries() {
            let first = single_line(value);
            directives.push(format!("cargo:rustc-env={key}={first}"));
            if first.len() != value.len() {
                directives.push(format!(
                    "cargo:warning={key} spans several lines; only `{first}` is embedded"
                ));
            }
        }
        directives
    }
}

/// `cargo:rerun-if-*` lines for a package rooted at `root`.
///
/// Besides the override variables this watches the package inputs, the git
/// directory as git itself resolves it (a parent `.git`, a worktree or a
/// submodule all work), the ref `HEAD` points to, and every tracked file so
/// that an unstaged edit recomputes the dirty flag. Only existing paths are
/// listed; a missing path would make cargo rerun the script on every build.
#[must_use]
pub fn rerun_directives(source: &impl GitSource, root: &Path) -> Vec<String> {
    let env = KEYS
        .iter()
        .chain(std::iter::once(&GIT_PROGRAM_KEY))
        .map(|key| format!("cargo:rerun-if-env-changed={key}"));

    let mut paths: Vec<PathBuf> = PACKAGE_INPUTS.iter().map(|p| root.join(p)).collect();
    paths.extend(watched_git_paths(source, root));
    paths.retain(|path| path.exists());
    paths.dedup();

    let paths = paths
        .into_iter()
        .filter_map(|path| path.to_str().map(ToString::to_string))
        .filter(|path| !path.contains('\n'))
        .map(|path| format!("cargo:rerun-if-changed={path}"));

    env.chain(paths).collect()
}

fn watched_git_paths(source: &impl GitSource, root: &Path) -> Vec<PathBuf> {
    let git_path = |name: &str| {
        non_empty(source, &["rev-parse", "--git-path", name]).map(|p| root.join(p))
    };

    let mut paths: Vec<PathBuf> = GIT_PATHS.into_iter().filter_map(git_path).collect();

    if let Some(head_ref) = non_empty(source, &["symbolic-ref", "-q", "HEAD"]) {
        paths.extend(git_path(head_ref.as_str()));
    }

    if let Some(toplevel) = non_empty(source, &["rev-parse", "--show-toplevel"]) {
        let toplevel = PathBuf::from(toplevel);
        let tracked = source
            .run(&["ls-files", "-z", "--full-name", "--", ":/"])
            .unwrap_or_default();
        paths.extend(
            tracked
                .split('\0')
                .filter(|file| !file.is_empty())
                .map(|file| toplevel.join(file)),
        );
    }

    paths
}

/// Parse a boolean flag as written in CI environments.
#[must_use]
pub fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

/// First `SHORT_LEN` characters of a commit id.
#[must_use]
pub fn abbreviate(sha1: &str) -> String {
    sha1.chars().take(SHORT_LEN).collect()
}

fn non_empty(source: &impl GitSource, args: &[&str]) -> Option<String> {
    source.run(args).filter(|s| !s.is_empty())
}

fn single_line(value: &str) -> &str {
    value.lines().next().unwrap_or_default()
}
