use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::error::Error;
use std::path::{Path, PathBuf};

use super::styles::{ChartStyle, ChartTheme};
use crate::analysis::metrics::{self, RECENT_WEEKS};
use crate::types::AnalysisResult;
use crate::utils::aggregate_data;

pub type PlotError = Box<dyn Error + Send + Sync>;

/// Upper bound on points drawn for the daily series
const MAX_DAILY_POINTS: usize = 365;
const HISTOGRAM_BINS: usize = 10;
const MAX_X_LABELS: usize = 12;

/// The charts shown in the UI and saved as PNG.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartKind {
    DailyCommits,
    WeeklyActivity,
    WeeklyDistribution,
    RecentTrend,
    TopContributors,
    Languages,
}

impl ChartKind {
    pub const ALL: [ChartKind; 6] = [
        ChartKind::DailyCommits,
        ChartKind::WeeklyActivity,
        ChartKind::WeeklyDistribution,
        ChartKind::RecentTrend,
        ChartKind::TopContributors,
        ChartKind::Languages,
    ];

    pub fn title(self) -> &'static str {
        match self {
            ChartKind::DailyCommits => "Commits per Day",
            ChartKind::WeeklyActivity => "Weekly Commit Activity",
            ChartKind::WeeklyDistribution => "Distribution of Weekly Commits",
            ChartKind::RecentTrend => "Recent Commit Trend",
            ChartKind::TopContributors => "Top Contributors",
            ChartKind::Languages => "Language Distribution",
        }
    }

    fn y_desc(self) -> &'static str {
        match self {
            ChartKind::DailyCommits | ChartKind::WeeklyActivity | ChartKind::RecentTrend => {
                "Commits"
            }
            ChartKind::WeeklyDistribution => "Weeks",
            ChartKind::TopContributors => "Contributions",
            ChartKind::Languages => "Percent",
        }
    }

    /// Used in file names of saved charts.
    pub fn file_stem(self) -> &'static str {
        match self {
            ChartKind::DailyCommits => "daily_commits",
            ChartKind::WeeklyActivity => "weekly_activity",
            ChartKind::WeeklyDistribution => "weekly_distribution",
            ChartKind::RecentTrend => "recent_trend",
            ChartKind::TopContributors => "top_contributors",
            ChartKind::Languages => "languages",
        }
    }

    fn is_bar(self) -> bool {
        matches!(
            self,
            ChartKind::WeeklyDistribution | ChartKind::TopContributors | ChartKind::Languages
        )
    }
}

/// Labelled values ready to plot, one label per value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Series {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl FromIterator<(String, f64)> for Series {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        let (labels, values) = iter.into_iter().unzip();
        Series { labels, values }
    }
}

/// Extract the series a chart draws from an analysis result.
pub fn chart_series(kind: ChartKind, result: &AnalysisResult) -> Series {
    match kind {
        ChartKind::DailyCommits => aggregate_data(&result.commits_by_day, MAX_DAILY_POINTS)
            .into_iter()
            .map(|(date, count)| (date.format("%Y-%m-%d").to_string(), count as f64))
            .collect(),
        ChartKind::WeeklyActivity => result
            .weekly_activity
            .iter()
            .map(|w| (w.week_start.format("%Y-%m-%d").to_string(), f64::from(w.total)))
            .collect(),
        ChartKind::WeeklyDistribution => {
            metrics::weekly_histogram(&result.weekly_activity, HISTOGRAM_BINS)
                .into_iter()
                .map(|bin| (format!("{:.0}-{:.0}", bin.start, bin.end), bin.count as f64))
                .collect()
        }
        ChartKind::RecentTrend => metrics::recent_weeks(&result.weekly_activity, RECENT_WEEKS)
            .iter()
            .map(|w| (w.week_start.format("%m-%d").to_string(), f64::from(w.total)))
            .collect(),
        ChartKind::TopContributors => result
            .top_contributors
            .iter()
            .map(|c| (c.login.clone(), c.contributions as f64))
            .collect(),
        ChartKind::Languages => {
            let mut languages: Vec<(String, f64)> = result
                .language_percentages
                .iter()
                .map(|(name, percent)| (name.clone(), *percent))
                .collect();
            languages.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
            languages.into_iter().collect()
        }
    }
}

/// Render a chart into a packed RGB buffer of `style.size`.
pub fn render_chart(
    kind: ChartKind,
    result: &AnalysisResult,
    theme: &ChartTheme,
    style: &ChartStyle,
) -> Result<Vec<u8>, PlotError> {
    let (width, height) = style.size;
    let mut buffer = vec![0u8; width as usize * height as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, style.size).into_drawing_area();
        draw_chart(&root, kind, &chart_series(kind, result), theme, style)?;
        root.present()?;
    }
    Ok(buffer)
}

/// Render a chart with the light theme and write it to `dir` as PNG.
pub fn save_chart_png(
    kind: ChartKind,
    result: &AnalysisResult,
    dir: &Path,
) -> crate::Result<PathBuf> {
    let style = ChartStyle::default();
    let (width, height) = style.size;
    let pixels = render_chart(kind, result, &ChartTheme::light(), &style)
        .map_err(|e| crate::Error::Plot(e.to_string()))?;
    let image = image::RgbImage::from_raw(width, height, pixels).ok_or_else(|| {
        crate::Error::Plot("pixel buffer does not match chart size".to_string())
    })?;

    std::fs::create_dir_all(dir)?;
    let path = dir.join(format!(
        "{}_{}_{}.png",
        result.repository.owner(),
        result.repository.name(),
        kind.file_stem()
    ));
    image.save(&path)?;
    tracing::info!(path = %path.display(), chart = kind.title(), "saved chart");
    Ok(path)
}

fn draw_chart(
    root: &DrawingArea<BitMapBackend, Shift>,
    kind: ChartKind,
    series: &Series,
    theme: &ChartTheme,
    style: &ChartStyle,
) -> Result<(), PlotError> {
    root.fill(&theme.background_color)?;
    if series.values.is_empty() {
        return draw_no_data(root, kind, theme, style);
    }

    let count = series.values.len();
    let peak = series.values.iter().copied().fold(0.0, f64::max);
    let y_max = match kind {
        // Single busy days would flatten the rest of the history
        ChartKind::DailyCommits => calculate_adaptive_range(&series.values).1,
        _ => peak * 1.1,
    }
    .max(1.0);
    let x_range = if kind.is_bar() {
        -0.5..(count as f64 - 0.5)
    } else {
        0.0..(count.saturating_sub(1).max(1) as f64)
    };

    let mut chart = ChartBuilder::on(root)
        .caption(
            kind.title(),
            ("sans-serif", style.title_font_size)
                .into_font()
                .color(&theme.text_color),
        )
        .margin(style.margin)
        .set_all_label_area_size(style.label_area_size)
        .build_cartesian_2d(x_range, 0f64..y_max)?;

    let labels = &series.labels;
    let x_label_formatter = |x: &f64| label_at(labels, *x);
    let y_label_formatter = |y: &f64| format_count(*y);

    chart
        .configure_mesh()
        .light_line_style(TRANSPARENT)
        .bold_line_style(theme.grid_color)
        .axis_style(theme.axis_color)
        .y_desc(kind.y_desc())
        .label_style(
            ("sans-serif", style.font_size)
                .into_font()
                .color(&theme.text_color),
        )
        .x_labels(count.min(MAX_X_LABELS))
        .x_label_formatter(&x_label_formatter)
        .y_label_formatter(&y_label_formatter)
        .draw()?;

    if kind.is_bar() {
        let bar_color = theme.series_color;
        chart.draw_series(series.values.iter().enumerate().map(|(i, value)| {
            let x = i as f64;
            Rectangle::new([(x - 0.4, 0.0), (x + 0.4, *value)], bar_color.filled())
        }))?;
        return Ok(());
    }

    let points: Vec<(f64, f64)> = series
        .values
        .iter()
        .enumerate()
        .map(|(i, value)| (i as f64, *value))
        .collect();
    chart.draw_series(LineSeries::new(
        points.iter().copied(),
        theme.series_color.stroke_width(style.line_width),
    ))?;

    if kind == ChartKind::RecentTrend {
        let marker_color = theme.highlight_color;
        chart.draw_series(
            points
                .iter()
                .map(|point| Circle::new(*point, 4, marker_color.filled())),
        )?;
    }

    Ok(())
}

fn draw_no_data(
    root: &DrawingArea<BitMapBackend, Shift>,
    kind: ChartKind,
    theme: &ChartTheme,
    style: &ChartStyle,
) -> Result<(), PlotError> {
    let (width, height) = root.dim_in_pixel();
    let text_style = ("sans-serif", style.title_font_size)
        .into_font()
        .color(&theme.text_color)
        .pos(Pos::new(HPos::Center, VPos::Center));
    root.draw(&Text::new(
        format!("{}: no data", kind.title()),
        ((width / 2) as i32, (height / 2) as i32),
        text_style,
    ))?;
    Ok(())
}

/// Label for an x tick; ticks between two values stay blank.
pub(super) fn label_at(labels: &[String], x: f64) -> String {
    let index = x.round();
    if (x - index).abs() > 0.01 || index < 0.0 {
        return String::new();
    }
    labels.get(index as usize).cloned().unwrap_or_default()
}

/// Use K/M formatting for large numbers
pub(super) fn format_count(y: f64) -> String {
    if y.abs() >= 1_000_000.0 {
        format!("{:.1}M", y / 1_000_000.0)
    } else if y.abs() >= 1_000.0 {
        format!("{:.1}K", y / 1_000.0)
    } else {
        format!("{:.0}", y)
    }
}

/// Y-axis range that keeps extreme outliers from dominating the scale.
pub fn calculate_adaptive_range(values: &[f64]) -> (f64, f64) {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    if sorted.is_empty() {
        return (0.0, 1.0);
    }

    // Values beyond the 95th percentile count as outliers
    let p95_idx = (((sorted.len() - 1) as f64 * 0.95) as usize).min(sorted.len() - 1);
    let normal_max = sorted[p95_idx];
    let absolute_max = sorted[sorted.len() - 1];

    let display_max = if absolute_max > normal_max * 2.0 {
        normal_max * 1.2
    } else {
        absolute_max * 1.1
    };

    (0.0, display_max)
}
