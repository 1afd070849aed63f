use std::process::Command;

use chrono::Utc;

fn main() {
    println!("cargo:rerun-if-changed=../../.git/HEAD");
    println!("cargo:rerun-if-changed=../../.git/refs/");

    let version = env!("CARGO_PKG_VERSION");
    let stamped = match git(&["rev-parse", "--short", "HEAD"]) {
        Some(hash) if !tagged_as_release(version) => {
            let built = Utc::now().format("%Y%m%d%H%M");
            format!("{version}+{hash}.{built}")
        }
        _ => version.to_owned(),
    };

    println!("cargo:rustc-env=CLOUD_DEV_VERSION={stamped}");
}

fn git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    Some(String::from_utf8(output.stdout).ok()?.trim().to_owned())
}

/// HEAD carries `v{version}` or `cloud-dev@v{version}`.
fn tagged_as_release(version: &str) -> bool {
    let plain = format!("v{version}");
    let scoped = format!("cloud-dev@v{version}");
    git(&["tag", "--points-at", "HEAD"]).is_some_and(|tags| {
        tags.lines()
            .map(str::trim)
            .any(|tag| tag == plain || tag == scoped)
    })
}
