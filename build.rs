//! Stamps the binary with the build date and commit it logs at startup.
//!
//! `SHORTENER_BUILD_DATE` and `SHORTENER_BUILD_COMMIT` take precedence, so
//! packagers can pin both; otherwise the date is the current Unix time and the
//! commit comes from `git`.

use std::env;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

fn main() {
    println!("cargo:rerun-if-env-changed=SHORTENER_BUILD_DATE");
    println!("cargo:rerun-if-env-changed=SHORTENER_BUILD_COMMIT");
    println!("cargo:rerun-if-changed=.git/HEAD");

    let date = env::var("SHORTENER_BUILD_DATE").ok().unwrap_or_else(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs().to_string())
            .unwrap_or_default()
    });
    let commit = env::var("SHORTENER_BUILD_COMMIT")
        .ok()
        .or_else(head_commit)
        .unwrap_or_default();

    // Empty values are left unset so the binary reports "N/A"
    if !date.is_empty() {
        println!("cargo:rustc-env=BUILD_DATE={}", date);
    }
    if !commit.is_empty() {
        println!("cargo:rustc-env=BUILD_COMMIT={}", commit);
    }
}

fn head_commit() -> Option<String> {
    let output = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()
        .filter(|output| output.status.success())?;
    String::from_utf8(output.stdout)
        .ok()
        .map(|hash| hash.trim().to_string())
}
