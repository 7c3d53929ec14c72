//! Build script for lean-releases.
//!
//! Records the git commit the binary was built from so `--version` can show it.

use std::process::Command;

fn main() {
    let commit = git_output(&["rev-parse", "--short", "HEAD"]).unwrap_or_else(|| "unknown".into());
    println!("cargo:rustc-env=LEAN_RELEASES_GIT_COMMIT={commit}");

    if let Some(workspace_root) = git_output(&["rev-parse", "--show-toplevel"]) {
        println!("cargo:rerun-if-changed={workspace_root}/.git/HEAD");
    }
}

/// Runs `git` with the given arguments and returns its trimmed stdout.
///
/// Returns `None` when git is missing, fails, or prints nothing.
fn git_output(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!text.is_empty()).then_some(text)
}
