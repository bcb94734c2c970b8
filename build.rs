use std::process::Command;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Stamp the short git hash when available (empty in tarball/Docker builds)
    let build_version = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .map(|o| String::from_utf8_lossy(&o.stdout).trim().to_string())
        .unwrap_or_default();

    println!("cargo:rustc-env=BUILD_VERSION={}", build_version);
}
