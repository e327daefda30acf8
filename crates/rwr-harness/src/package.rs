//! Test package staging
//!
//! Materializes the temporary package directory the server loads from:
//! a copy of the fixed package config plus the rendered startup script.
//! The directory lives under the server's `media/packages` and belongs to
//! the running harness alone; teardown deletes it best-effort.

use rwr_harness_core::{HarnessError, Result, ServerConfig, TestPackage};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Substitute the run parameters into the startup script template
pub fn render_script(template: &str, pkg: &TestPackage) -> String {
    template
        .replace("{name}", &pkg.name)
        .replace("{port}", &pkg.port.to_string())
        .replace("{register}", &pkg.register)
}

/// Stage the test package directory and return its path
///
/// Directory creation is idempotent; the config copy and the rendered
/// script always overwrite whatever a previous run left behind.
pub async fn stage(config: &ServerConfig, pkg: &TestPackage) -> Result<PathBuf> {
    let pkg_dir = pkg.package_dir(config);
    fs::create_dir_all(&pkg_dir).await.map_err(|e| {
        HarnessError::Staging(format!("failed to create {}: {}", pkg_dir.display(), e))
    })?;

    // copy in the latest package config
    let config_name = config.package_config.file_name().ok_or_else(|| {
        HarnessError::Staging(format!(
            "package config path {} has no filename",
            config.package_config.display()
        ))
    })?;
    fs::copy(&config.package_config, pkg_dir.join(config_name))
        .await
        .map_err(|e| {
            HarnessError::Staging(format!(
                "failed to copy {}: {}",
                config.package_config.display(),
                e
            ))
        })?;

    let scripts_dir = pkg_dir.join("scripts");
    fs::create_dir_all(&scripts_dir).await.map_err(|e| {
        HarnessError::Staging(format!("failed to create {}: {}", scripts_dir.display(), e))
    })?;

    let template = fs::read_to_string(&config.script_template)
        .await
        .map_err(|e| {
            HarnessError::Staging(format!(
                "failed to read {}: {}",
                config.script_template.display(),
                e
            ))
        })?;
    let script_path = scripts_dir.join(&config.script_name);
    fs::write(&script_path, render_script(&template, pkg))
        .await
        .map_err(|e| {
            HarnessError::Staging(format!("failed to write {}: {}", script_path.display(), e))
        })?;

    info!("Staged test package at {}", pkg_dir.display());
    Ok(pkg_dir)
}

/// Delete the staged package directory, ignoring errors
pub async fn cleanup(pkg_dir: &Path) {
    if let Err(e) = fs::remove_dir_all(pkg_dir).await {
        debug!("Package cleanup skipped: {}", e);
    }
}
