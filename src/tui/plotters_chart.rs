//! Plotters-powered chart widget for Ratatui.
//!
//! Why Plotters instead of Ratatui's built-in `Chart` widget?
//! - nicer axis + mesh rendering
//! - less manual work for ticks/labels
//! - one widget serves both the trend lines and the prediction scatter
//!
//! We render Plotters output into the Ratatui buffer using `plotters-ratatui-backend`.

use plotters::prelude::*;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

/// One colored series. Lines are drawn per segment, so gaps stay open.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub segments: Vec<Vec<(f64, f64)>>,
    pub color: RGBColor,
}

impl ChartSeries {
    /// A series made of a single unbroken segment.
    pub fn solid(points: Vec<(f64, f64)>, color: RGBColor) -> Self {
        Self {
            segments: vec![points],
            color,
        }
    }
}

/// A lightweight, render-only chart description.
///
/// All series and bounds are computed outside the render call, which keeps
/// `render()` focused on drawing.
pub struct ProductionChart<'a> {
    /// Drawn as connected lines.
    pub lines: &'a [ChartSeries],
    /// Drawn as single dots, on top of the lines.
    pub dots: &'a [ChartSeries],
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
    pub x_label: &'a str,
    pub y_label: &'a str,
    /// Category names for integer x positions (years); numeric labels when `None`.
    pub x_categories: Option<&'a [String]>,
    pub fmt_y: fn(f64) -> String,
}

impl ProductionChart<'_> {
    fn x_tick(&self, v: f64) -> String {
        match self.x_categories {
            Some(names) => category_label(names, v),
            None => format!("{v:.0}"),
        }
    }
}

/// Label of the category at integer position `v` (empty between categories).
pub fn category_label(names: &[String], v: f64) -> String {
    let idx = v.round();
    if (v - idx).abs() > 1e-6 || idx < 0.0 {
        return String::new();
    }
    names.get(idx as usize).cloned().unwrap_or_default()
}

impl Widget for ProductionChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // When the available area is too small, Plotters may fail to build a chart.
        // In that case, we render a small hint rather than panicking.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let [x0, x1] = self.x_bounds;
        let [y0, y1] = self.y_bounds;
        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite()) || x1 <= x0 || y1 <= y0 {
            return;
        }

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                // Terminal cells are low-res, so keep label areas compact.
                .set_label_area_size(LabelAreaPosition::Left, 6)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            // Mesh lines are disabled; axes + labels are enough at terminal resolution.
            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_desc(self.x_label)
                .y_desc(self.y_label)
                .x_labels(5)
                .y_labels(5)
                .x_label_formatter(&|v| self.x_tick(*v))
                .y_label_formatter(&|v| (self.fmt_y)(*v))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            for series in self.lines {
                for segment in &series.segments {
                    chart.draw_series(LineSeries::new(segment.iter().copied(), &series.color))?;
                }
            }

            // `Circle` markers are avoided: the backend maps pixel radii to canvas
            // units and produces huge circles. A colored `Pixel` renders as a dot.
            for series in self.dots {
                chart.draw_series(
                    series
                        .segments
                        .iter()
                        .flatten()
                        .map(|&(x, y)| Pixel::new((x, y), series.color)),
                )?;
            }

            Ok(())
        });

        widget.render(area, buf);
    }
}
