//! Build script embedding the source revision into `--version` output

use std::process::Command;

fn main() {
    // Packaged builds without a checkout can pass the revision in directly
    println!("cargo:rerun-if-env-changed=GIT_HASH");
    let git_hash = std::env::var("GIT_HASH").ok().filter(|h| !h.is_empty()).unwrap_or_else(|| {
        match Command::new("git").args(["rev-parse", "--short", "HEAD"]).output() {
            Ok(output) if output.status.success() => {
                String::from_utf8_lossy(&output.stdout).trim().to_string()
            }
            _ => String::from("unknown"),
        }
    });

    println!("cargo:rustc-env=GIT_HASH={}", git_hash);
    println!("cargo:rerun-if-changed=.git/HEAD");
}
