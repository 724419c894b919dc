use egui::{Button, Color32, ColorImage, Context, Grid, ProgressBar, TextEdit, TextureOptions};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;

use super::{App, Tab};
use crate::analysis::{analyze_repo_async, top_contributors};
use crate::plotting::{render_chart, ChartKind, ChartStyle, ChartTheme};
use crate::report::metadata_rows;
use crate::types::AnalysisResult;

/// Rows in the contributors table
const CONTRIBUTOR_TABLE_ROWS: usize = 15;
const ERROR_COLOR: Color32 = Color32::from_rgb(255, 110, 110);
const WARNING_COLOR: Color32 = Color32::from_rgb(255, 200, 80);

/// Draw the main application UI
pub fn draw_ui(app: &mut App, ctx: &Context, app_arc: Arc<Mutex<App>>) {
    // Render charts once per result
    if app.update_needed {
        refresh_chart_textures(app, ctx);
        app.update_needed = false;
    }

    egui::SidePanel::left("side_panel").show(ctx, |ui| {
        ui.heading("Repository");
        ui.separator();

        ui.label("GitHub repository URL:");
        let input = ui.add(
            TextEdit::singleline(&mut app.repo_input).hint_text("https://github.com/owner/name"),
        );
        let submitted = input.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
        let clicked = ui
            .add_enabled(!app.is_analyzing, Button::new("Analyze"))
            .clicked();
        if (clicked || submitted) && !app.is_analyzing {
            start_analysis(app, ctx, &app_arc);
        }

        ui.separator();
        ui.label(app.token_status());

        if app.analysis_result.is_some() {
            ui.separator();
            ui.heading("Export");
            if ui
                .add_enabled(!app.is_analyzing, Button::new("Download report (CSV)"))
                .clicked()
            {
                app.export_csv();
            }
            if ui
                .add_enabled(!app.is_analyzing, Button::new("Save charts (PNG)"))
                .clicked()
            {
                app.save_charts();
            }
            ui.label(format!(
                "Export directory: {}",
                app.config.display.export_dir().display()
            ));
            if let Some(status) = &app.status_message {
                ui.label(status);
            }
        }
    });

    egui::CentralPanel::default().show(ctx, |ui| {
        ui.heading("GitHub Repository Analyzer");
        ui.separator();

        if app.is_analyzing {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label(
                    app.progress
                        .map(|stage| stage.label())
                        .unwrap_or("Starting analysis..."),
                );
            });
            let fraction = app.progress.map(|stage| stage.fraction()).unwrap_or(0.0);
            ui.add(ProgressBar::new(fraction).show_percentage());
            ui.separator();
        }

        if let Some(error) = &app.error_message {
            ui.colored_label(ERROR_COLOR, error);
            ui.separator();
        }

        if app.analysis_result.is_none() {
            if !app.is_analyzing {
                ui.label("Enter a repository and press Analyze.");
            }
            return;
        }

        ui.horizontal(|ui| {
            for tab in Tab::ALL {
                ui.selectable_value(&mut app.selected_tab, tab, tab.label());
            }
        });
        ui.separator();

        let app = &*app;
        if let Some(result) = &app.analysis_result {
            egui::ScrollArea::vertical().show(ui, |ui| match app.selected_tab {
                Tab::Metadata => draw_metadata(ui, result),
                Tab::Contributors => draw_contributors(ui, app, result),
                Tab::Activity => draw_activity(ui, app, result),
                Tab::Languages => draw_languages(ui, app, result),
                Tab::Statistics => draw_statistics(ui, result),
            });
        }
    });

    if app.is_analyzing {
        ctx.request_repaint_after(Duration::from_millis(100));
    }
}

/// Spawn the analysis and a task forwarding its progress into the app.
fn start_analysis(app: &mut App, ctx: &Context, app_arc: &Arc<Mutex<App>>) {
    let Some((input, config)) = app.begin_analysis() else {
        return;
    };
    let (tx, mut rx) = mpsc::channel(8);

    let progress_app = Arc::clone(app_arc);
    let progress_ctx = ctx.clone();
    tokio::spawn(async move {
        while let Some(stage) = rx.recv().await {
            if let Ok(mut app) = progress_app.lock() {
                app.update_progress(stage);
            }
            progress_ctx.request_repaint();
        }
    });

    let result_app = Arc::clone(app_arc);
    let result_ctx = ctx.clone();
    tokio::spawn(async move {
        let result = analyze_repo_async(input, config, Some(tx)).await;
        match result_app.lock() {
            Ok(mut app) => app.finish_analysis(result),
            Err(_) => tracing::error!("failed to acquire app lock after analysis"),
        }
        result_ctx.request_repaint();
    });
}

fn refresh_chart_textures(app: &mut App, ctx: &Context) {
    app.chart_textures.clear();
    let Some(result) = &app.analysis_result else {
        return;
    };

    let theme = ChartTheme::default();
    let style = ChartStyle::default();
    let (width, height) = style.size;
    for kind in ChartKind::ALL {
        match render_chart(kind, result, &theme, &style) {
            Ok(pixels) => {
                let image = ColorImage::from_rgb([width as usize, height as usize], &pixels);
                let texture = ctx.load_texture(kind.file_stem(), image, TextureOptions::LINEAR);
                app.chart_textures.insert(kind, texture);
            }
            Err(e) => tracing::error!(chart = kind.title(), error = %e, "failed to render chart"),
        }
    }
}

fn draw_chart(ui: &mut egui::Ui, app: &App, kind: ChartKind) {
    match app.chart_textures.get(&kind) {
        Some(texture) => {
            ui.add(egui::Image::new(texture).max_width(ui.available_width()));
        }
        None => {
            ui.label(format!("{} is unavailable.", kind.title()));
        }
    }
}

fn draw_metadata(ui: &mut egui::Ui, result: &AnalysisResult) {
    ui.heading(&result.metadata.full_name);
    Grid::new("metadata_grid").striped(true).show(ui, |ui| {
        for (label, value) in metadata_rows(result) {
            ui.strong(label);
            ui.label(value);
            ui.end_row();
        }
    });
    ui.label(format!("Analysis took {:.2}s", result.elapsed_time));
}

fn draw_contributors(ui: &mut egui::Ui, app: &App, result: &AnalysisResult) {
    draw_chart(ui, app, ChartKind::TopContributors);
    ui.separator();

    let ranked = top_contributors(&result.contributors, CONTRIBUTOR_TABLE_ROWS);
    if ranked.is_empty() {
        ui.label("No contributors reported.");
        return;
    }
    Grid::new("contributors_grid").striped(true).show(ui, |ui| {
        ui.strong("#");
        ui.strong("Login");
        ui.strong("Contributions");
        ui.strong("Type");
        ui.end_row();
        for (rank, contributor) in ranked.iter().enumerate() {
            ui.label((rank + 1).to_string());
            ui.label(&contributor.login);
            ui.label(contributor.contributions.to_string());
            ui.label(&contributor.kind);
            ui.end_row();
        }
    });
}

fn draw_activity(ui: &mut egui::Ui, app: &App, result: &AnalysisResult) {
    if result.commits_truncated {
        ui.colored_label(
            WARNING_COLOR,
            format!(
                "Only the {} most recent commits were fetched.",
                result.commits.len()
            ),
        );
    }
    draw_chart(ui, app, ChartKind::DailyCommits);
    if result.weekly_activity_derived {
        ui.label(
            "GitHub's weekly statistics are still being computed; \
             weekly charts use the fetched commits.",
        );
    }
    draw_chart(ui, app, ChartKind::WeeklyActivity);
    draw_chart(ui, app, ChartKind::WeeklyDistribution);
    draw_chart(ui, app, ChartKind::RecentTrend);

    ui.separator();
    ui.heading("Recent commits");
    if result.commits.is_empty() {
        ui.label("No commits.");
        return;
    }
    Grid::new("commits_grid").striped(true).show(ui, |ui| {
        for commit in result.commits.iter().take(app.config.display.recent_commits) {
            ui.monospace(commit.short_sha());
            ui.label(commit.timestamp.format("%Y-%m-%d %H:%M").to_string());
            ui.label(&commit.author);
            ui.label(commit.summary());
            ui.end_row();
        }
    });
}

fn draw_languages(ui: &mut egui::Ui, app: &App, result: &AnalysisResult) {
    draw_chart(ui, app, ChartKind::Languages);
    ui.separator();

    if result.language_percentages.is_empty() {
        ui.label("No language data.");
        return;
    }
    let mut languages: Vec<_> = result.language_percentages.iter().collect();
    languages.sort_by(|a, b| b.1.total_cmp(a.1).then_with(|| a.0.cmp(b.0)));
    Grid::new("languages_grid").striped(true).show(ui, |ui| {
        ui.strong("Language");
        ui.strong("Share");
        ui.strong("Bytes");
        ui.end_row();
        for (language, percent) in languages {
            ui.label(language);
            ui.label(format!("{percent:.1}%"));
            ui.label(
                result
                    .languages
                    .get(language)
                    .copied()
                    .unwrap_or_default()
                    .to_string(),
            );
            ui.end_row();
        }
    });
}

fn draw_statistics(ui: &mut egui::Ui, result: &AnalysisResult) {
    let Some(stats) = &result.statistics else {
        ui.label("No weekly activity to summarize.");
        return;
    };
    Grid::new("statistics_grid").striped(true).show(ui, |ui| {
        let rows = [
            ("Total Commits", stats.total_commits.to_string()),
            ("Average Weekly Commits", format!("{:.2}", stats.average_weekly)),
            ("Median Weekly Commits", format!("{:.1}", stats.median_weekly)),
            ("Highest Weekly Commits", stats.highest_weekly.to_string()),
            ("Lowest Weekly Commits", stats.lowest_weekly.to_string()),
            ("Commit Std Dev", format!("{:.2}", stats.std_dev)),
            ("Recent Activity Trend", stats.trend.to_string()),
        ];
        for (label, value) in rows {
            ui.strong(label);
            ui.label(value);
            ui.end_row();
        }
    });
    if result.weekly_activity_derived {
        ui.label("Weekly figures were derived from the fetched commits.");
    }
}
