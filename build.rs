//! Build script capturing the git identity of the source tree.

use std::path::PathBuf;

#[allow(dead_code)]
#[path = "src/generator.rs"]
mod generator;

use generator::{Generated, GitCommand};

fn main() {
    let root = std::env::var_os("CARGO_MANIFEST_DIR").map_or_else(PathBuf::new, PathBuf::from);
    let profile = std::env::var("PROFILE").unwrap_or_default();
    let git = GitCommand::from_environment(&root);

    for directive in generator::rerun_directives(&git, &root) {
        println!("{directive}");
    }

    let generated = Generated::probe(&git, &profile).with_overrides(|key| std::env::var(key).ok());
    for directive in generated.cargo_directives() {
        println!("{directive}");
    }
}
