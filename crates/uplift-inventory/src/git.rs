use std::path::Path;
use std::process::{Command, Stdio};

use anyhow::{Context, Result};

pub(crate) fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

pub(crate) fn run_git_pull(checkout: &Path, package_name: &str) -> Result<()> {
    let output = Command::new("git")
        .arg("-C")
        .arg(checkout)
        .args(["pull", "--ff-only"])
        .output()
        .with_context(|| {
            format!("vc-sync-failed: package '{package_name}' failed launching git pull")
        })?;
    if !output.status.success() {
        anyhow::bail!(
            "vc-sync-failed: package '{}' git pull failed: {}",
            package_name,
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }
    Ok(())
}
