use std::path::Path;
use std::process::Command;

const SHA_ENV: &str = "TASKRANK_BUILD_SHA";

/// Stamp the binary with a build id: a packager-supplied value wins, then
/// `git describe` of the workspace, then "unknown".
fn main() {
    println!("cargo:rerun-if-env-changed={SHA_ENV}");

    let workspace = Path::new(env!("CARGO_MANIFEST_DIR")).join("..");
    let git_head = workspace.join(".git").join("HEAD");
    if git_head.exists() {
        println!("cargo:rerun-if-changed={}", git_head.display());
    }

    let build_id = std::env::var(SHA_ENV)
        .ok()
        .filter(|s| !s.trim().is_empty())
        .or_else(|| git_describe(&workspace))
        .unwrap_or_else(|| "unknown".to_string());

    println!("cargo:rustc-env={SHA_ENV}={build_id}");
}

fn git_describe(dir: &Path) -> Option<String> {
    let out = Command::new("git")
        .arg("-C")
        .arg(dir)
        .args(["describe", "--always", "--dirty", "--abbrev=8"])
        .output()
        .ok()?;
    if !out.status.success() {
        return None;
    }
    let id = String::from_utf8(out.stdout).ok()?.trim().to_string();
    (!id.is_empty()).then_some(id)
}
