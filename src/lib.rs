//! # GitHub Repository Analyzer
//!
//! `ghstats` fetches a public GitHub repository's metadata, commit history,
//! contributors, and language breakdown from the REST API, aggregates them
//! into chartable series, and presents the result in an egui window or as a
//! plain-text summary.
//!
//! The pipeline has three stages:
//!
//! - [`github`]: an HTTP client turning API responses into typed records
//! - [`analysis`]: pure aggregation of those records
//! - [`app`] and [`report`]: the window, the text summary, and CSV export
//!
//! ## Example
//!
//! ```no_run
//! use ghstats::{analysis, Config};
//!
//! # async fn run() -> ghstats::Result<()> {
//! let config = Config::default().with_token(std::env::var("GITHUB_TOKEN").ok());
//! let result = analysis::analyze_repo_async("rust-lang/rustlings".to_string(), config, None).await?;
//! println!("{}", ghstats::report::text_summary(&result, 10));
//! # Ok(())
//! # }
//! ```

pub mod analysis;
pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod github;
pub mod logging;
pub mod plotting;
pub mod report;
pub mod types;
pub mod utils;

#[cfg(test)]
mod testing;

// Re-export main types for convenience
pub use app::App as GhStatsApp;
pub use config::Config;
pub use error::{Error, Result};
pub use types::{AnalysisResult, RepositoryRef};
