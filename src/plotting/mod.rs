//! Chart rendering with plotters, shared by the UI and PNG export.

mod chart;
mod styles;


pub use chart::{
    calculate_adaptive_range, chart_series, render_chart, save_chart_png, ChartKind, PlotError,
    Series,
};
pub use styles::{ChartStyle, ChartTheme};
