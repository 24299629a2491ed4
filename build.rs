//! Build script that embeds the commit this tool was built from.
//!
//! Sets `VERSION_HARVEST_COMMIT` to the short SHA of HEAD, or `unknown`
//! when the sources are not in a git checkout.

fn main() {
    let commit = short_sha(".").unwrap_or_else(|| "unknown".to_string());

    println!("cargo:rustc-env=VERSION_HARVEST_COMMIT={}", commit);
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs");
}

fn short_sha(repo_path: &str) -> Option<String> {
    let repo = gix::discover(repo_path).ok()?;
    let head = repo.head().ok()?;
    let commit_id = head.id()?;
    let short = commit_id.shorten().ok()?;
    Some(short.to_string())
}
