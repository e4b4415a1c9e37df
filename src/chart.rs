// src/chart.rs

//! Chart rendering: bar, pie, line and scatter series rasterized onto a
//! fixed-resolution canvas with vector text overlays.

use crate::canvas::{ArtifactImage, Canvas, MarkAlign, TextMark};
use crate::color::Color;
use crate::error::ArtifactError;
use crate::scheme::ColorPalette;
use itertools::Itertools;

/// Width of the placed chart box on the page, in points.
pub const CHART_WIDTH_PT: f32 = 450.0;
pub const CHART_HEIGHT_PT: f32 = 270.0;

// 300 DPI-equivalent raster for the placed box above.
const PX_W: u32 = 1800;
const PX_H: u32 = 1080;

// Plot area inside the canvas, in pixels.
const PLOT_LEFT: f32 = 220.0;
const PLOT_RIGHT: f32 = 1740.0;
const PLOT_TOP: f32 = 170.0;
const PLOT_BOTTOM: f32 = 940.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Bar,
    Pie,
    Line,
    Scatter,
}

impl ChartKind {
    pub fn parse(s: &str) -> Option<ChartKind> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bar" => Some(ChartKind::Bar),
            "pie" => Some(ChartKind::Pie),
            "line" => Some(ChartKind::Line),
            "scatter" => Some(ChartKind::Scatter),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ChartKind::Bar => "bar",
            ChartKind::Pie => "pie",
            ChartKind::Line => "line",
            ChartKind::Scatter => "scatter",
        }
    }

    pub fn default_title(&self) -> &'static str {
        match self {
            ChartKind::Bar => "Bar Chart",
            ChartKind::Pie => "Pie Chart",
            ChartKind::Line => "Line Chart",
            ChartKind::Scatter => "Scatter Plot",
        }
    }

    fn default_x_label(&self) -> &'static str {
        match self {
            ChartKind::Bar | ChartKind::Pie => "Categories",
            ChartKind::Line | ChartKind::Scatter => "X Axis",
        }
    }

    fn default_y_label(&self) -> &'static str {
        match self {
            ChartKind::Bar | ChartKind::Pie => "Values",
            ChartKind::Line | ChartKind::Scatter => "Y Axis",
        }
    }
}

/// Chart types exposed to the presentation layer. Scatter stays renderable
/// for programmatic callers but is not advertised.
pub fn chart_types() -> &'static [&'static str] {
    &["bar", "pie", "line"]
}

/// Caller-supplied chart inputs, before the kind is known to be renderable.
#[derive(Debug, Clone, Default)]
pub struct ChartParams {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub title: Option<String>,
    pub x_label: Option<String>,
    pub y_label: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
}

impl ChartSpec {
    /// Build a spec, truncating labels and values to the shorter sequence and
    /// filling unset captions with the per-kind defaults.
    pub fn new(
        kind: ChartKind,
        mut labels: Vec<String>,
        mut values: Vec<f64>,
        title: Option<String>,
        x_label: Option<String>,
        y_label: Option<String>,
    ) -> Self {
        let n = labels.len().min(values.len());
        labels.truncate(n);
        values.truncate(n);
        Self {
            kind,
            labels,
            values,
            title: title.unwrap_or_else(|| kind.default_title().to_string()),
            x_label: x_label.unwrap_or_else(|| kind.default_x_label().to_string()),
            y_label: y_label.unwrap_or_else(|| kind.default_y_label().to_string()),
        }
    }

    pub fn from_params(kind: ChartKind, params: ChartParams) -> Self {
        Self::new(
            kind,
            params.labels,
            params.values,
            params.title,
            params.x_label,
            params.y_label,
        )
    }
}

/// Round up to the next "nice" axis maximum (1/2/2.5/5 times a power of ten).
fn nice_ceil(v: f64) -> f64 {
    if v <= 0.0 {
        return 1.0;
    }
    let mag = 10f64.powf(v.log10().floor());
    let norm = v / mag;
    let nice = if norm <= 1.0 {
        1.0
    } else if norm <= 2.0 {
        2.0
    } else if norm <= 2.5 {
        2.5
    } else if norm <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * mag
}

fn fmt_tick(v: f64, scale_max: f64) -> String {
    if scale_max >= 10.0 {
        format!("{:.0}", v)
    } else {
        format!("{:.1}", v)
    }
}

/// Render a chart spec into an embeddable raster.
///
/// The canvas is created and dropped inside this call; nothing is shared
/// between renders.
pub fn render_chart(spec: &ChartSpec, palette: &ColorPalette) -> Result<ArtifactImage, ArtifactError> {
    if spec.labels.is_empty() || spec.values.is_empty() {
        return Err(ArtifactError::EmptySeries);
    }

    let mut canvas = Canvas::new(PX_W, PX_H, Color::WHITE);
    draw_title(&mut canvas, &spec.title, palette);

    match spec.kind {
        ChartKind::Bar => draw_bar(&mut canvas, spec, palette),
        ChartKind::Pie => draw_pie(&mut canvas, spec, palette)?,
        ChartKind::Line => draw_points(&mut canvas, spec, palette, true),
        ChartKind::Scatter => draw_points(&mut canvas, spec, palette, false),
    }

    Ok(canvas.finish())
}

fn draw_title(canvas: &mut Canvas, title: &str, palette: &ColorPalette) {
    canvas.text(TextMark {
        x: (PLOT_LEFT + PLOT_RIGHT) / 2.0,
        y: 90.0,
        text: title.to_string(),
        size: 14.0,
        color: palette.text,
        bold: true,
        align: MarkAlign::Center,
        rotated: false,
    });
}

fn draw_axes(canvas: &mut Canvas, spec: &ChartSpec, palette: &ColorPalette, scale_max: f64) {
    // frame: left and bottom axis lines
    canvas.draw_line(PLOT_LEFT, PLOT_TOP, PLOT_LEFT, PLOT_BOTTOM, 3.0, palette.text);
    canvas.draw_line(PLOT_LEFT, PLOT_BOTTOM, PLOT_RIGHT, PLOT_BOTTOM, 3.0, palette.text);

    // five ticks from zero to the scale maximum
    for i in 0..=4 {
        let frac = i as f32 / 4.0;
        let y = PLOT_BOTTOM - frac * (PLOT_BOTTOM - PLOT_TOP);
        let value = scale_max * f64::from(frac);
        canvas.text(TextMark {
            x: PLOT_LEFT - 18.0,
            y: y + 3.0,
            text: fmt_tick(value, scale_max),
            size: 8.0,
            color: palette.text,
            bold: false,
            align: MarkAlign::Right,
            rotated: false,
        });
    }

    canvas.text(TextMark {
        x: (PLOT_LEFT + PLOT_RIGHT) / 2.0,
        y: 1045.0,
        text: spec.x_label.clone(),
        size: 11.0,
        color: palette.text,
        bold: false,
        align: MarkAlign::Center,
        rotated: false,
    });
    canvas.text(TextMark {
        x: 60.0,
        y: (PLOT_TOP + PLOT_BOTTOM) / 2.0,
        text: spec.y_label.clone(),
        size: 11.0,
        color: palette.text,
        bold: false,
        align: MarkAlign::Center,
        rotated: true,
    });
}

fn draw_bar(canvas: &mut Canvas, spec: &ChartSpec, palette: &ColorPalette) {
    let max = spec.values.iter().cloned().fold(0.0_f64, f64::max);
    let scale_max = nice_ceil(max);
    let series = palette.series();

    // dashed horizontal gridlines behind the bars
    for i in 1..=4 {
        let y = PLOT_BOTTOM - (i as f32 / 4.0) * (PLOT_BOTTOM - PLOT_TOP);
        canvas.draw_dashed_hline(PLOT_LEFT, PLOT_RIGHT, y, 2.0, palette.border);
    }

    let n = spec.labels.len();
    let slot = (PLOT_RIGHT - PLOT_LEFT) / n as f32;
    let bar_w = slot * 0.6;

    for (i, (label, value)) in spec.labels.iter().zip(&spec.values).enumerate() {
        let color = series[i % series.len()];
        let h = ((value.max(0.0) / scale_max) as f32) * (PLOT_BOTTOM - PLOT_TOP);
        let x = PLOT_LEFT + i as f32 * slot + (slot - bar_w) / 2.0;
        let top = PLOT_BOTTOM - h;
        canvas.fill_rect(x, top, bar_w, h, color);

        let center = x + bar_w / 2.0;
        canvas.text(TextMark {
            x: center,
            y: top - 12.0,
            text: format!("{:.1}", value),
            size: 8.0,
            color: palette.text,
            bold: true,
            align: MarkAlign::Center,
            rotated: false,
        });
        canvas.text(TextMark {
            x: center,
            y: PLOT_BOTTOM + 36.0,
            text: label.clone(),
            size: 8.0,
            color: palette.text,
            bold: false,
            align: MarkAlign::Center,
            rotated: false,
        });
    }

    draw_axes(canvas, spec, palette, scale_max);
}

fn draw_pie(canvas: &mut Canvas, spec: &ChartSpec, palette: &ColorPalette) -> Result<(), ArtifactError> {
    let total: f64 = spec.values.iter().map(|v| v.max(0.0)).sum();
    if total <= 0.0 {
        return Err(ArtifactError::EmptySeries);
    }

    let series = palette.series();
    let (cx, cy, r) = (900.0_f32, 590.0_f32, 330.0_f32);
    // matplotlib convention: start at 90 degrees, sweep counter-clockwise
    let mut start = 90.0_f32;

    for (i, (label, value)) in spec.labels.iter().zip(&spec.values).enumerate() {
        let share = value.max(0.0) / total;
        let sweep = (share * 360.0) as f32;
        canvas.fill_wedge(cx, cy, r, start, sweep, series[i % series.len()]);

        let mid = (start + sweep / 2.0).to_radians();
        let (cos, sin) = (mid.cos(), mid.sin());

        canvas.text(TextMark {
            x: cx + cos * r * 0.6,
            y: cy - sin * r * 0.6 + 3.0,
            text: format!("{:.1}%", share * 100.0),
            size: 9.0,
            color: Color::WHITE,
            bold: true,
            align: MarkAlign::Center,
            rotated: false,
        });

        let align = if cos >= 0.3 {
            MarkAlign::Left
        } else if cos <= -0.3 {
            MarkAlign::Right
        } else {
            MarkAlign::Center
        };
        canvas.text(TextMark {
            x: cx + cos * r * 1.18,
            y: cy - sin * r * 1.18 + 3.0,
            text: label.clone(),
            size: 9.0,
            color: palette.text,
            bold: false,
            align,
            rotated: false,
        });

        start += sweep;
    }
    Ok(())
}

fn draw_points(canvas: &mut Canvas, spec: &ChartSpec, palette: &ColorPalette, connect: bool) {
    let max = spec.values.iter().cloned().fold(0.0_f64, f64::max);
    let scale_max = nice_ceil(max);

    // light gridlines across the plot
    for i in 1..=4 {
        let y = PLOT_BOTTOM - (i as f32 / 4.0) * (PLOT_BOTTOM - PLOT_TOP);
        canvas.draw_line(PLOT_LEFT, y, PLOT_RIGHT, y, 2.0, palette.border);
    }

    let n = spec.labels.len();
    let slot = (PLOT_RIGHT - PLOT_LEFT) / n as f32;
    let points: Vec<(f32, f32)> = spec
        .values
        .iter()
        .enumerate()
        .map(|(i, value)| {
            let x = PLOT_LEFT + (i as f32 + 0.5) * slot;
            let y = PLOT_BOTTOM - ((value.max(0.0) / scale_max) as f32) * (PLOT_BOTTOM - PLOT_TOP);
            (x, y)
        })
        .collect();

    if connect {
        for ((x0, y0), (x1, y1)) in points.iter().tuple_windows() {
            canvas.draw_line(*x0, *y0, *x1, *y1, 6.0, palette.primary);
        }
    }
    let marker_r = if connect { 14.0 } else { 20.0 };
    for (x, y) in &points {
        canvas.fill_circle(*x, *y, marker_r, palette.primary);
    }

    for (i, label) in spec.labels.iter().enumerate() {
        canvas.text(TextMark {
            x: PLOT_LEFT + (i as f32 + 0.5) * slot,
            y: PLOT_BOTTOM + 36.0,
            text: label.clone(),
            size: 8.0,
            color: palette.text,
            bold: false,
            align: MarkAlign::Center,
            rotated: false,
        });
    }

    draw_axes(canvas, spec, palette, scale_max);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheme::resolve_scheme;

    fn spec(kind: ChartKind, labels: &[&str], values: &[f64]) -> ChartSpec {
        ChartSpec::new(
            kind,
            labels.iter().map(|s| s.to_string()).collect(),
            values.to_vec(),
            None,
            None,
            None,
        )
    }

    #[test]
    fn parse_known_kinds() {
        assert_eq!(ChartKind::parse("bar"), Some(ChartKind::Bar));
        assert_eq!(ChartKind::parse(" PIE "), Some(ChartKind::Pie));
        assert_eq!(ChartKind::parse("histogram"), None);
    }

    #[test]
    fn exposed_chart_types_omit_scatter() {
        assert_eq!(chart_types(), &["bar", "pie", "line"]);
    }

    #[test]
    fn spec_truncates_to_shorter_sequence() {
        let s = spec(ChartKind::Bar, &["a", "b", "c"], &[1.0, 2.0]);
        assert_eq!(s.labels.len(), 2);
        assert_eq!(s.values, vec![1.0, 2.0]);
    }

    #[test]
    fn spec_defaults_title_by_kind() {
        let s = spec(ChartKind::Scatter, &["a"], &[1.0]);
        assert_eq!(s.title, "Scatter Plot");
        assert_eq!(s.x_label, "X Axis");
    }

    #[test]
    fn empty_series_is_rejected() {
        let palette = resolve_scheme("professional").unwrap();
        let s = spec(ChartKind::Bar, &[], &[]);
        assert!(matches!(render_chart(&s, palette), Err(ArtifactError::EmptySeries)));
    }

    #[test]
    fn bar_chart_renders_with_value_labels() {
        let palette = resolve_scheme("professional").unwrap();
        let s = spec(ChartKind::Bar, &["Q1", "Q2"], &[10.0, 0.0]);
        let img = render_chart(&s, palette).unwrap();
        assert_eq!(img.width, 1800);
        assert_eq!(img.height, 1080);
        assert_eq!(img.rgb.len(), 1800 * 1080 * 3);
        let texts: Vec<&str> = img.marks.iter().map(|m| m.text.as_str()).collect();
        assert!(texts.contains(&"Bar Chart"));
        assert!(texts.contains(&"10.0"));
        assert!(texts.contains(&"Q1"));
    }

    #[test]
    fn pie_chart_labels_percentages() {
        let palette = resolve_scheme("modern").unwrap();
        let s = spec(ChartKind::Pie, &["a", "b"], &[1.0, 3.0]);
        let img = render_chart(&s, palette).unwrap();
        let texts: Vec<&str> = img.marks.iter().map(|m| m.text.as_str()).collect();
        assert!(texts.contains(&"25.0%"));
        assert!(texts.contains(&"75.0%"));
    }

    #[test]
    fn pie_with_all_zero_values_is_rejected() {
        let palette = resolve_scheme("modern").unwrap();
        let s = spec(ChartKind::Pie, &["a", "b"], &[0.0, 0.0]);
        assert!(matches!(render_chart(&s, palette), Err(ArtifactError::EmptySeries)));
    }

    #[test]
    fn line_chart_has_axis_captions() {
        let palette = resolve_scheme("professional").unwrap();
        let s = spec(ChartKind::Line, &["Jan", "Feb", "Mar"], &[1.0, 2.0, 3.0]);
        let img = render_chart(&s, palette).unwrap();
        let texts: Vec<&str> = img.marks.iter().map(|m| m.text.as_str()).collect();
        assert!(texts.contains(&"X Axis"));
        assert!(texts.contains(&"Y Axis"));
        assert!(img.marks.iter().any(|m| m.rotated));
    }

    #[test]
    fn nice_ceil_picks_round_maxima() {
        assert_eq!(nice_ceil(7.3), 10.0);
        assert_eq!(nice_ceil(23.0), 25.0);
        assert_eq!(nice_ceil(0.0), 1.0);
        assert_eq!(nice_ceil(100.0), 100.0);
        assert_eq!(nice_ceil(3.9), 5.0);
    }
}
