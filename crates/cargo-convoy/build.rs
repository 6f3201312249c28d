use std::process::Command;

use chrono::Utc;

// Embeds a build identifier so `cargo convoy --version` can tell a
// development build from a packaged release.
fn main() {
    println!("cargo:rerun-if-changed=../../.git/HEAD");

    let version = env!("CARGO_PKG_VERSION");
    let identifier = match git_short_hash() {
        Some(hash) => {
            let date = Utc::now().format("%Y%m%d");
            format!("{version}+{hash}.{date}")
        }
        None => version.to_owned(),
    };

    println!("cargo:rustc-env=CARGO_CONVOY_VERSION={identifier}");
}

fn git_short_hash() -> Option<String> {
    let output = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()?;

    if !output.status.success() {
        return None;
    }

    String::from_utf8(output.stdout)
        .ok()
        .map(|s| s.trim().to_owned())
}
