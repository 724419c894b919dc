//! GitHub Repository Analyzer
//!
//! Opens a window for analyzing GitHub repositories, or prints the analysis
//! with `--headless`.

use anyhow::Context;
use clap::Parser;
use eframe::egui;
use std::sync::{Arc, Mutex};
use tokio::runtime::Runtime;

use ghstats::app::{describe_error, App, AppWrapper};
use ghstats::cli::Args;
use ghstats::{analysis, logging, report, Config};

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::init(args.log_level.as_deref())?;

    let config = Config::load(args.config.as_deref())
        .context("failed to load configuration")?
        .with_token(args.token);

    let rt = Runtime::new().context("failed to start the tokio runtime")?;

    if let Some(repo) = args.headless {
        let code = rt.block_on(run_headless(repo, config, args.csv));
        std::process::exit(code);
    }

    rt.block_on(async {
        let options = eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_inner_size([1200.0, 800.0])
                .with_min_inner_size([800.0, 600.0])
                .with_title("GitHub Repository Analyzer"),
            ..Default::default()
        };

        let app = Arc::new(Mutex::new(App::new(config, args.repo)));
        eframe::run_native(
            "GitHub Repository Analyzer",
            options,
            Box::new(|_cc| Ok(Box::new(AppWrapper { app }) as Box<dyn eframe::App>)),
        )
        .map_err(|e| anyhow::anyhow!("error running application: {e}"))
    })
}

/// Print the analysis of `repo`, optionally writing the CSV report. Returns the exit code.
async fn run_headless(repo: String, config: Config, csv_dir: Option<std::path::PathBuf>) -> i32 {
    let recent_commits = config.display.recent_commits;
    let result = match analysis::analyze_repo_async(repo, config, None).await {
        Ok(result) => result,
        Err(e) => {
            tracing::debug!(error = ?e, "analysis failed");
            eprintln!("{}", describe_error(&e));
            return 1;
        }
    };

    print!("{}", report::text_summary(&result, recent_commits));

    if let Some(dir) = csv_dir {
        match report::write_csv_report(&result, &dir) {
            Ok(path) => println!("\nReport written to {}", path.display()),
            Err(e) => {
                eprintln!("{}", describe_error(&e));
                return 1;
            }
        }
    }
    0
}
