//! Utility modules for dagscan
//!
//! - Structured logging setup and configuration

pub mod logging;

pub use logging::{init_logging, parse_level, LoggingConfig};
