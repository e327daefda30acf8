//! # rwr-harness
//!
//! Test-server harness for the marshalrwr project.
//!
//! This crate provides:
//! - Test package staging under the server's `media/packages` directory
//! - Server process launch and teardown
//! - The console driver that takes a freshly booted server to a loaded
//!   test package and relays its output

pub mod driver;
pub mod package;
pub mod process;

pub use driver::{ConsoleDriver, DriverPhase, EXPECTED_LOAD_CYCLES};
pub use process::ServerProcess;
