//! Command-line argument parsing.

use clap::Parser;
use std::path::PathBuf;

/// Analyze a GitHub repository's activity, contributors, and languages.
///
/// Opens a window by default; `--headless` prints the analysis instead.
#[derive(Debug, Parser)]
#[command(name = "ghstats")]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Path to configuration file
    ///
    /// Defaults to ghstats/config.toml in the user configuration directory.
    #[arg(short, long, value_name = "FILE", env = "GHSTATS_CONFIG")]
    pub config: Option<PathBuf>,

    /// GitHub API token, raising the rate limit from 60 to 5000 requests per hour
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Logging level or filter directive, e.g. `debug` or `ghstats=trace`
    #[arg(short, long, env = "GHSTATS_LOG")]
    pub log_level: Option<String>,

    /// Analyze REPO without opening a window and print a summary
    #[arg(long, value_name = "REPO", conflicts_with = "repo")]
    pub headless: Option<String>,

    /// Also write the CSV report into DIR (headless mode)
    #[arg(long, value_name = "DIR", requires = "headless")]
    pub csv: Option<PathBuf>,

    /// Repository to pre-fill in the window (URL or owner/name)
    pub repo: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_command_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_default_args() {
        let args = Args::parse_from(["ghstats"]);
        assert!(args.headless.is_none());
        assert!(args.csv.is_none());
        assert!(args.repo.is_none());
    }

    #[test]
    fn test_positional_repo() {
        let args = Args::parse_from(["ghstats", "rust-lang/rust"]);
        assert_eq!(args.repo.as_deref(), Some("rust-lang/rust"));
    }

    #[test]
    fn test_headless_with_csv() {
        let args = Args::parse_from([
            "ghstats",
            "--headless",
            "https://github.com/rust-lang/rust",
            "--csv",
            "out",
            "--token",
            "abc",
            "--log-level",
            "debug",
        ]);
        assert_eq!(
            args.headless.as_deref(),
            Some("https://github.com/rust-lang/rust")
        );
        assert_eq!(args.csv, Some(PathBuf::from("out")));
        assert_eq!(args.token.as_deref(), Some("abc"));
        assert_eq!(args.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_csv_requires_headless() {
        assert!(Args::try_parse_from(["ghstats", "--csv", "out"]).is_err());
    }

    #[test]
    fn test_config_arg() {
        let args = Args::parse_from(["ghstats", "--config", "/path/to/config.toml"]);
        assert_eq!(args.config, Some(PathBuf::from("/path/to/config.toml")));
    }
}
