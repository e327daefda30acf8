//! rwr-test-server: run an RWR server with a staged marshalrwr test package
//!
//! Stages a temporary package under the server's `media/packages` directory,
//! boots the server, starts the package script over the console, then relays
//! console output until Ctrl-C. The interrupt path kills the server and
//! deletes the staged package.

use anyhow::{Context, Result, bail};
use rwr_harness::driver::ConsoleDriver;
use rwr_harness::{package, process::ServerProcess};
use rwr_harness_core::console::start_script_command;
use rwr_harness_core::{ServerConfig, TestPackage};
use tokio::io::{AsyncBufRead, AsyncWrite};
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Parse command line arguments
    let args: Vec<String> = std::env::args().collect();
    let [name, port, register] = &args[1..] else {
        bail!("usage: rwr-test-server <name> <port> <register>");
    };
    let port: u16 = port
        .parse()
        .with_context(|| format!("invalid port '{}'", port))?;
    let pkg = TestPackage::new(name.clone(), port, register.clone());

    let config = if cfg!(target_os = "windows") {
        ServerConfig::default()
    } else {
        ServerConfig::linux()
    };

    info!("Running test server '{}' on port {}", pkg.server_name(), pkg.port);

    // set up the test env
    let pkg_dir = package::stage(&config, &pkg).await?;

    info!("Starting RWR server for '{}' package...", pkg.relative_path());
    let mut server = ServerProcess::spawn(&config)?;
    let (console, input) = server.take_console()?;
    let mut driver = ConsoleDriver::new(console, input, tokio::io::stdout());

    let start_command = start_script_command(&config.script_name, &pkg.relative_path());

    let mut interrupted = false;
    let outcome: rwr_harness_core::Result<()> = tokio::select! {
        res = drive(&mut driver, &start_command) => res,
        _ = tokio::signal::ctrl_c() => {
            info!("Ctrl-C detected, shutting down...");
            interrupted = true;
            Ok(())
        }
    };

    if interrupted {
        info!("Killing rwr server!");
        server.kill().await;
        info!("Cleaning up...");
        package::cleanup(&pkg_dir).await;
    }

    Ok(outcome?)
}

/// Boot to a loaded test package, then relay console output indefinitely
async fn drive<R, W, T>(
    driver: &mut ConsoleDriver<R, W, T>,
    start_command: &str,
) -> rwr_harness_core::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
    T: AsyncWrite + Unpin,
{
    driver.run_to_ready(start_command).await?;
    info!("Package script start completed!");
    driver.relay().await
}
