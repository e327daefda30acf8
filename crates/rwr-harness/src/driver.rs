//! Console driver state machine
//!
//! Drives the server over its line-oriented console from boot to a playable,
//! package-loaded state, then relays output until interrupted. The driver is
//! generic over the console streams and the terminal sink so tests can run
//! it against in-memory buffers instead of a live server.

use rwr_harness_core::console::{self, ConsoleLine, Spinner, PROMPT_MARKER};
use rwr_harness_core::{HarnessError, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info};

/// Load cycles per run: one for raw server boot, one for the package script
pub const EXPECTED_LOAD_CYCLES: usize = 2;

/// Where the driver is in the boot-to-relay sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverPhase {
    /// Reading lines until a `Game loaded` sentinel
    AwaitingLoad,
    /// Expecting the bare `>` prompt byte
    PromptCheck,
    /// Forwarding console output indefinitely
    Relaying,
}

/// Line-protocol driver over the server console
pub struct ConsoleDriver<R, W, T> {
    console: R,
    input: W,
    term: T,
    spinner: Spinner,
    phase: DriverPhase,
}

impl<R, W, T> ConsoleDriver<R, W, T>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
    T: AsyncWrite + Unpin,
{
    /// Create a driver over the server console streams and a terminal sink
    pub fn new(console: R, input: W, term: T) -> Self {
        Self {
            console,
            input,
            term,
            spinner: Spinner::new(),
            phase: DriverPhase::AwaitingLoad,
        }
    }

    /// Current phase of the drive sequence
    pub fn phase(&self) -> DriverPhase {
        self.phase
    }

    /// Read one raw console line; end-of-stream is fatal
    async fn read_console_line(&mut self) -> Result<String> {
        let mut line = String::new();
        let bytes = self.console.read_line(&mut line).await.map_err(|e| {
            HarnessError::Console(format!("failed to read server console: {}", e))
        })?;
        if bytes == 0 {
            return Err(HarnessError::Console(
                "server console closed unexpectedly".to_string(),
            ));
        }
        Ok(line)
    }

    async fn print(&mut self, text: &str) -> Result<()> {
        self.term.write_all(text.as_bytes()).await.map_err(|e| {
            HarnessError::Console(format!("failed to write terminal output: {}", e))
        })?;
        self.term
            .flush()
            .await
            .map_err(|e| HarnessError::Console(format!("failed to flush terminal output: {}", e)))
    }

    /// Read console lines until the server reports a finished load cycle
    ///
    /// Progress lines collapse into a spinner glyph overwriting the current
    /// terminal line; everything else is forwarded verbatim.
    pub async fn wait_for_load(&mut self) -> Result<()> {
        self.phase = DriverPhase::AwaitingLoad;
        loop {
            let line = self.read_console_line().await?;
            match console::classify(&line) {
                ConsoleLine::Loading => {
                    let glyph = self.spinner.next_glyph();
                    self.print(&format!("{} Loading...\r", glyph)).await?;
                }
                ConsoleLine::Loaded => {
                    debug!("Load cycle complete");
                    return Ok(());
                }
                ConsoleLine::Output(text) => {
                    self.print(&format!("{}\n", text)).await?;
                }
            }
        }
    }

    /// Consume the single interactive prompt byte the server emits after boot
    pub async fn consume_prompt(&mut self) -> Result<()> {
        self.phase = DriverPhase::PromptCheck;
        let marker = self.console.read_u8().await.map_err(|e| {
            HarnessError::Console(format!("failed to read prompt marker: {}", e))
        })?;
        if marker != PROMPT_MARKER {
            return Err(HarnessError::Protocol(format!(
                "prompt marker read got unexpected '{}'",
                marker as char
            )));
        }
        Ok(())
    }

    /// Send one command line to the server, flushing immediately
    pub async fn send_command(&mut self, command: &str) -> Result<()> {
        self.input.write_all(command.as_bytes()).await.map_err(|e| {
            HarnessError::Console(format!("failed to write server command: {}", e))
        })?;
        self.input
            .write_all(b"\n")
            .await
            .map_err(|e| HarnessError::Console(format!("failed to write newline: {}", e)))?;
        self.input
            .flush()
            .await
            .map_err(|e| HarnessError::Console(format!("failed to flush server stdin: {}", e)))
    }

    /// Drive the server from boot to a loaded test package
    ///
    /// The load wait runs [`EXPECTED_LOAD_CYCLES`] times: the boot cycle ends
    /// at the interactive prompt, where the start-script command is sent, and
    /// the package script then re-triggers the same loading sequence.
    pub async fn run_to_ready(&mut self, start_command: &str) -> Result<()> {
        for cycle in 0..EXPECTED_LOAD_CYCLES {
            self.wait_for_load().await?;
            if cycle == 0 {
                self.consume_prompt().await?;
                info!("Server loaded, sending '{}'...", start_command);
                self.send_command(start_command).await?;
            }
        }
        self.phase = DriverPhase::Relaying;
        Ok(())
    }

    /// Relay console output until the stream ends or the run is interrupted
    pub async fn relay(&mut self) -> Result<()> {
        self.phase = DriverPhase::Relaying;
        loop {
            let line = self.read_console_line().await?;
            let stripped = console::strip_prompt(&line).to_string();
            self.print(&format!("{}\n", stripped)).await?;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::BufReader;
    use tokio_test::io::Builder;

    #[tokio::test]
    async fn test_wait_for_load_spins_and_stops_at_sentinel() {
        let console = BufReader::new(
            Builder::new()
                .read(b">Loading map\n")
                .read(b">Loading more\n")
                .read(b">Game loaded\n")
                .read(b">")
                .build(),
        );
        let mut driver = ConsoleDriver::new(console, Vec::new(), Vec::new());

        driver.wait_for_load().await.unwrap();
        // the wait stops exactly on the sentinel: the prompt byte is still unread
        driver.consume_prompt().await.unwrap();

        let term = String::from_utf8(driver.term.clone()).unwrap();
        assert_eq!(term, "/ Loading...\r- Loading...\r");
        assert!(driver.input.is_empty());
    }

    #[tokio::test]
    async fn test_wait_for_load_forwards_other_lines() {
        let console = BufReader::new(
            Builder::new()
                .read(b">dedicated server starting\n")
                .read(b">Game loaded\n")
                .build(),
        );
        let mut driver = ConsoleDriver::new(console, Vec::new(), Vec::new());

        driver.wait_for_load().await.unwrap();

        assert_eq!(driver.term, b"dedicated server starting\n");
    }

    #[tokio::test]
    async fn test_wait_for_load_eof_is_fatal() {
        let console = BufReader::new(&b">Loading map\n"[..]);
        let mut driver = ConsoleDriver::new(console, Vec::new(), Vec::new());

        let err = driver.wait_for_load().await.unwrap_err();

        assert!(matches!(err, HarnessError::Console(_)));
    }

    #[tokio::test]
    async fn test_unexpected_prompt_byte_aborts_before_command() {
        let console = BufReader::new(Builder::new().read(b">Game loaded\n").read(b"x").build());
        let mut driver = ConsoleDriver::new(console, Vec::new(), Vec::new());

        let err = driver
            .run_to_ready("start_script start_marshalrwr_test.as media/packages/_marshalrwr_foo_test_pkg")
            .await
            .unwrap_err();

        assert!(matches!(err, HarnessError::Protocol(_)));
        // the start command must not reach the server
        assert!(driver.input.is_empty());
    }

    #[tokio::test]
    async fn test_send_command_writes_single_flushed_line() {
        let console = BufReader::new(&b""[..]);
        let mut driver = ConsoleDriver::new(console, Vec::new(), Vec::new());

        driver
            .send_command("start_script start_marshalrwr_test.as media/packages/_marshalrwr_foo_test_pkg")
            .await
            .unwrap();

        assert_eq!(
            driver.input,
            b"start_script start_marshalrwr_test.as media/packages/_marshalrwr_foo_test_pkg\n"
        );
    }

    #[tokio::test]
    async fn test_run_to_ready_covers_both_load_cycles() {
        let console = BufReader::new(
            Builder::new()
                .read(b">Loading map\n")
                .read(b">Game loaded\n")
                .read(b">")
                .read(b">Loading overlay\n")
                .read(b">Game loaded\n")
                .build(),
        );
        let mut driver = ConsoleDriver::new(console, Vec::new(), Vec::new());

        driver
            .run_to_ready("start_script start_marshalrwr_test.as media/packages/_marshalrwr_foo_test_pkg")
            .await
            .unwrap();

        assert_eq!(
            driver.input,
            b"start_script start_marshalrwr_test.as media/packages/_marshalrwr_foo_test_pkg\n"
        );
        assert_eq!(driver.phase(), DriverPhase::Relaying);
    }

    #[tokio::test]
    async fn test_relay_strips_markers_and_errors_at_eof() {
        let console = BufReader::new(&b">all clear\n>>double marker\n"[..]);
        let mut driver = ConsoleDriver::new(console, Vec::new(), Vec::new());

        let err = driver.relay().await.unwrap_err();

        assert!(matches!(err, HarnessError::Console(_)));
        assert_eq!(driver.term, b"all clear\ndouble marker\n");
    }
}
