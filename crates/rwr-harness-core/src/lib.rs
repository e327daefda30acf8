//! # rwr-harness-core
//!
//! Core types for the marshalrwr test-server harness.
//!
//! This crate provides the foundational types used by the harness binary:
//! - Server installation and test package configuration
//! - Console line vocabulary (prompt stripping, load markers, spinner)
//! - Error types

pub mod config;
pub mod console;
pub mod error;

pub use config::{ServerConfig, TestPackage};
pub use console::{ConsoleLine, Spinner};
pub use error::{HarnessError, Result};
