use eframe::App as EApp;
use egui::TextureHandle;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::plotting::{save_chart_png, ChartKind};
use crate::report::write_csv_report;
use crate::types::{AnalysisResult, AnalysisStage};

/// Result tabs of the central panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Metadata,
    Contributors,
    Activity,
    Languages,
    Statistics,
}

impl Tab {
    pub const ALL: [Tab; 5] = [
        Tab::Metadata,
        Tab::Contributors,
        Tab::Activity,
        Tab::Languages,
        Tab::Statistics,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Tab::Metadata => "Metadata",
            Tab::Contributors => "Contributors",
            Tab::Activity => "Activity",
            Tab::Languages => "Languages",
            Tab::Statistics => "Statistics",
        }
    }
}

/// Turn an error into the message shown to the user.
pub fn describe_error(error: &Error) -> String {
    match error {
        Error::InvalidReference { input, reason } => format!(
            "'{input}' is not a GitHub repository ({reason}). \
             Enter a URL like https://github.com/owner/name or owner/name."
        ),
        Error::RepositoryNotFound(_) => "Repository not found. Please check the URL.".to_string(),
        Error::RateLimited { retry_after } => {
            let mut message =
                "Rate limit exceeded. Add a GitHub token to raise the limit".to_string();
            match retry_after {
                Some(wait) => {
                    let minutes = wait.as_secs().div_ceil(60).max(1);
                    message.push_str(&format!(" or try again in {minutes} min."));
                }
                None => message.push_str(" or try again later."),
            }
            message
        }
        Error::RequestFailed {
            endpoint,
            status: Some(status),
            message,
        } => format!("GitHub returned status {status} while fetching {endpoint}: {message}"),
        Error::RequestFailed {
            endpoint,
            status: None,
            message,
        } => format!("Could not reach GitHub while fetching {endpoint}: {message}"),
        Error::MalformedRecord { .. } => format!("GitHub returned unexpected data: {error}"),
        Error::Config(_) | Error::Toml(_) => format!("Invalid configuration: {error}"),
        Error::Io(_) | Error::Image(_) | Error::Plot(_) => format!("Export failed: {error}"),
    }
}

/// Main application state
#[derive(Clone)]
pub struct App {
    pub config: Config,
    pub repo_input: String,
    pub is_analyzing: bool,
    pub progress: Option<AnalysisStage>,
    pub analysis_result: Option<AnalysisResult>,
    pub error_message: Option<String>,
    /// Outcome of the last export
    pub status_message: Option<String>,
    pub selected_tab: Tab,
    pub chart_textures: HashMap<ChartKind, TextureHandle>,
    pub update_needed: bool,
}

impl App {
    pub fn new(config: Config, repo_input: Option<String>) -> Self {
        Self {
            config,
            repo_input: repo_input.unwrap_or_default(),
            is_analyzing: false,
            progress: None,
            analysis_result: None,
            error_message: None,
            status_message: None,
            selected_tab: Tab::default(),
            chart_textures: HashMap::new(),
            update_needed: false,
        }
    }

    /// Mark a run as started and hand out what the task needs.
    ///
    /// Returns `None` while another run is in flight or when the input is blank.
    pub fn begin_analysis(&mut self) -> Option<(String, Config)> {
        if self.is_analyzing {
            return None;
        }
        let input = self.repo_input.trim();
        if input.is_empty() {
            self.error_message = Some("Please enter a repository URL.".to_string());
            return None;
        }

        let input = input.to_string();
        self.is_analyzing = true;
        self.progress = None;
        self.error_message = None;
        self.status_message = None;
        Some((input, self.config.clone()))
    }

    /// Progress arriving after the run finished is dropped.
    pub fn update_progress(&mut self, stage: AnalysisStage) {
        if self.is_analyzing {
            self.progress = Some(stage);
        }
    }

    pub fn finish_analysis(&mut self, result: Result<AnalysisResult>) {
        self.is_analyzing = false;
        self.progress = None;
        match result {
            Ok(result) => self.update_with_result(result),
            Err(e) => {
                tracing::warn!(error = %e, "analysis failed");
                self.error_message = Some(describe_error(&e));
            }
        }
    }

    /// Update the app state with new analysis results
    pub fn update_with_result(&mut self, result: AnalysisResult) {
        self.analysis_result = Some(result);
        self.error_message = None;
        self.chart_textures.clear();
        self.update_needed = true;
    }

    pub fn format_progress(&self) -> Option<String> {
        self.progress
            .map(|stage| format!("{} ({:.0}%)", stage.label(), stage.fraction() * 100.0))
    }

    pub fn token_status(&self) -> &'static str {
        if self.config.github.has_token() {
            "GitHub token configured (5000 requests/hour)"
        } else {
            "No GitHub token (60 requests/hour)"
        }
    }

    /// Write the CSV report of the current result to the export directory.
    pub fn export_csv(&mut self) {
        let Some(result) = &self.analysis_result else {
            return;
        };
        match write_csv_report(result, &self.config.display.export_dir()) {
            Ok(path) => self.status_message = Some(format!("Report saved to {}", path.display())),
            Err(e) => self.error_message = Some(describe_error(&e)),
        }
    }

    /// Save every chart of the current result as PNG in the export directory.
    pub fn save_charts(&mut self) {
        let Some(result) = &self.analysis_result else {
            return;
        };
        let dir = self.config.display.export_dir();
        let saved: Result<Vec<_>> = ChartKind::ALL
            .iter()
            .map(|kind| save_chart_png(*kind, result, &dir))
            .collect();
        match saved {
            Ok(paths) => {
                self.status_message =
                    Some(format!("Saved {} charts to {}", paths.len(), dir.display()))
            }
            Err(e) => self.error_message = Some(describe_error(&e)),
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new(Config::default(), None)
    }
}

/// Thread-safe wrapper around App for use with eframe
pub struct AppWrapper {
    pub app: Arc<Mutex<App>>,
}

impl EApp for AppWrapper {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if let Ok(mut app) = self.app.lock() {
            super::ui::draw_ui(&mut app, ctx, Arc::clone(&self.app));
        } else {
            tracing::error!("failed to acquire app lock in update");
        }
    }
}
