//! Data-store collaborator: a live connectivity probe.

use std::path::Path;
use std::process::Command;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};

use crate::core::types::DbCredentials;
use crate::io::process::run_with_timeout;

const PROBE_TIMEOUT: Duration = Duration::from_secs(30);
const PROBE_OUTPUT_LIMIT_BYTES: usize = 16_384;

/// Connectivity check against the configured data store.
pub trait DatabaseProbe {
    fn connect(&self, root: &Path, credentials: &DbCredentials) -> Result<()>;
}

/// Probe using the `mysql` client. The password travels via `MYSQL_PWD` so
/// it never shows up in the process list.
pub struct MysqlCli;

impl DatabaseProbe for MysqlCli {
    fn connect(&self, root: &Path, credentials: &DbCredentials) -> Result<()> {
        let mut cmd = Command::new("mysql");
        cmd.arg(format!("--host={}", credentials.host))
            .arg(format!("--user={}", credentials.user))
            .arg(&credentials.name)
            .args(["-e", "SELECT 1"])
            .env("MYSQL_PWD", &credentials.password)
            .current_dir(root);

        let output = run_with_timeout(cmd, PROBE_TIMEOUT, PROBE_OUTPUT_LIMIT_BYTES)
            .context("run mysql probe")?;
        if !output.success() {
            return Err(anyhow!("database connection failed: {}", output.combined()));
        }
        Ok(())
    }
}
