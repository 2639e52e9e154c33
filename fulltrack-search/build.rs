//! Build script for fulltrack-search
//!
//! Captures build identification for the startup banner:
//! - Git commit hash (short form)
//! - Build timestamp
//! - Build profile (debug/release)
//!
//! Reruns only when HEAD moves or this script changes, not on every
//! source edit.

use std::process::Command;

fn main() {
    let git_hash = Command::new("git")
        .args(["rev-parse", "--short=8", "HEAD"])
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    // ISO 8601 with local offset, e.g. 2025-10-26T14:30:45-05:00
    let build_timestamp = chrono::Local::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, false);

    let profile = std::env::var("PROFILE").unwrap_or_else(|_| "unknown".to_string());

    // Workspace root holds .git; refresh the hash on checkout or commit
    println!("cargo:rerun-if-changed=../.git/HEAD");
    println!("cargo:rerun-if-changed=../.git/refs/heads");
    println!("cargo:rerun-if-changed=build.rs");

    println!("cargo:rustc-env=GIT_HASH={}", git_hash);
    println!("cargo:rustc-env=BUILD_TIMESTAMP={}", build_timestamp);
    println!("cargo:rustc-env=BUILD_PROFILE={}", profile);
}
