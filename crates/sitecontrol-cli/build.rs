//! Build script for sitecontrol-cli.
//!
//! Stamps the binary with the git revision and build date for `--version`.

fn main() {
    let git_hash = std::process::Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "unknown".to_string());
    println!("cargo:rustc-env=SITECONTROL_GIT_HASH={}", git_hash);

    let build_date = chrono::Utc::now().format("%d.%m.%Y").to_string();
    println!("cargo:rustc-env=SITECONTROL_BUILD_DATE={}", build_date);

    println!("cargo:rerun-if-changed=../../.git/HEAD");
}
