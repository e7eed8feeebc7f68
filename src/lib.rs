//! mackerel-plugin-chocon - chocon HTTP statistics for mackerel-agent.
//!
//! The agent runs the plugin once per interval as a fresh process. Each run
//! fetches chocon's `/.api/http-stats`, turns request counters into
//! per-second rates by diffing against the snapshot saved by the previous
//! run, and prints the values in the agent's plugin format.
//!
//! # Architecture
//!
//! - `collector`: HTTP fetch and flattening of the stats document
//! - `reporter`: rate computation, snapshot persistence, output
//! - `metrics`: the metric catalog
//! - `core`: configuration, errors, domain types
//! - `cli`: command-line interface
//!
//! # Example
//!
//! ```no_run
//! use chocon_plugin::core::Config;
//! use chocon_plugin::Application;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let app = Application::new(Config::default())?;
//!     app.run(&mut std::io::stdout()).await?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod application;
pub mod cli;
pub mod collector;
pub mod core;
pub mod metrics;
pub mod reporter;

// Re-export core types for convenience
pub use crate::application::Application;
pub use crate::core::{Config, Result};
