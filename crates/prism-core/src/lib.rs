//! Prism Core
//!
//! Logging, profiling and configuration shared by the Prism renderer crates.

pub mod config;
pub mod logging;
pub mod profiling;

pub use config::{Config, ProfilingMode};
