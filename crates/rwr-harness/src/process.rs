//! Server process management
//!
//! Launches the RWR server executable with piped console streams and owns
//! the child handle until teardown.

use rwr_harness_core::{HarnessError, Result, ServerConfig};
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tracing::{debug, info};

/// A running RWR server owned by the harness
#[derive(Debug)]
pub struct ServerProcess {
    child: Child,
}

impl ServerProcess {
    /// Launch the server executable from its installation root
    ///
    /// stdin and stdout are piped to the harness. The server writes some
    /// diagnostics to stderr; those lines are relayed to the harness stderr
    /// by a background task so the console driver owns stdout alone.
    pub fn spawn(config: &ServerConfig) -> Result<Self> {
        info!("Launching {}", config.server_exe.display());
        let mut child = Command::new(&config.server_exe)
            .current_dir(&config.server_root)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                HarnessError::Launch(format!(
                    "failed to start {}: {}",
                    config.server_exe.display(),
                    e
                ))
            })?;

        if let Some(stderr) = child.stderr.take() {
            tokio::spawn(async move {
                let mut lines = BufReader::new(stderr).lines();
                let mut sink = tokio::io::stderr();
                while let Ok(Some(line)) = lines.next_line().await {
                    let _ = sink.write_all(line.as_bytes()).await;
                    let _ = sink.write_all(b"\n").await;
                    let _ = sink.flush().await;
                }
                debug!("Server stderr closed");
            });
        }

        Ok(Self { child })
    }

    /// Take the piped console streams; valid exactly once
    pub fn take_console(&mut self) -> Result<(BufReader<ChildStdout>, ChildStdin)> {
        let stdout = self
            .child
            .stdout
            .take()
            .ok_or_else(|| HarnessError::Launch("server stdout already taken".to_string()))?;
        let stdin = self
            .child
            .stdin
            .take()
            .ok_or_else(|| HarnessError::Launch("server stdin already taken".to_string()))?;

        Ok((BufReader::new(stdout), stdin))
    }

    /// Forcibly terminate the server, swallowing errors
    pub async fn kill(&mut self) {
        if let Err(e) = self.child.kill().await {
            debug!("Server kill failed: {}", e);
        }
    }
}
