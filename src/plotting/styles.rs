use plotters::style::RGBAColor;

/// Chart theme configuration
#[derive(Debug, Clone, Copy)]
pub struct ChartTheme {
    pub background_color: RGBAColor,
    pub text_color: RGBAColor,
    pub grid_color: RGBAColor,
    pub axis_color: RGBAColor,
    /// Lines and bars of the main series
    pub series_color: RGBAColor,
    /// Markers and the most recent point of a series
    pub highlight_color: RGBAColor,
}

impl Default for ChartTheme {
    fn default() -> Self {
        Self {
            background_color: RGBAColor(0, 0, 0, 0.94),
            text_color: RGBAColor(255, 255, 255, 0.8),
            grid_color: RGBAColor(255, 255, 255, 0.15),
            axis_color: RGBAColor(255, 255, 255, 0.8),
            series_color: RGBAColor(135, 206, 250, 0.9),
            highlight_color: RGBAColor(255, 165, 0, 0.9),
        }
    }
}

impl ChartTheme {
    /// Dark text on white, for charts saved to disk.
    pub fn light() -> Self {
        Self {
            background_color: RGBAColor(255, 255, 255, 1.0),
            text_color: RGBAColor(30, 30, 30, 0.9),
            grid_color: RGBAColor(0, 0, 0, 0.1),
            axis_color: RGBAColor(30, 30, 30, 0.9),
            series_color: RGBAColor(31, 119, 180, 0.9),
            highlight_color: RGBAColor(214, 39, 40, 0.9),
        }
    }
}

/// Chart style configuration
#[derive(Debug, Clone, Copy)]
pub struct ChartStyle {
    pub line_width: u32,
    pub font_size: u32,
    pub title_font_size: u32,
    pub margin: u32,
    pub label_area_size: u32,
    /// Rendered size in pixels
    pub size: (u32, u32),
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            line_width: 2,
            font_size: 15,
            title_font_size: 24,
            margin: 10,
            label_area_size: 50,
            size: (800, 400),
        }
    }
}
