//! Plotters-powered sales chart widget for Ratatui.
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

/// A lightweight, render-only chart description.
///
/// All series and bounds are computed outside the render call so `render()`
/// only draws.
pub struct SalesPlottersChart<'a> {
    /// Smoothed retail sales, `(record index, value)`.
    pub retail: &'a [(f64, f64)],
    /// Smoothed wholesale sales, `(record index, value)`.
    pub wholesale: &'a [(f64, f64)],
    /// X bounds (record index).
    pub x_bounds: [f64; 2],
    /// Y bounds (currency).
    pub y_bounds: [f64; 2],
}

impl<'a> Widget for SalesPlottersChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // When the available area is too small, Plotters may fail to build a chart.
        // In that case, we render a small hint rather than panicking.
        if area.width < 20 || area.height < 6 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let x0 = self.x_bounds[0];
        let x1 = self.x_bounds[1];
        let y0 = self.y_bounds[0];
        let y1 = self.y_bounds[1];

        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite()) || x1 <= x0 || y1 <= y0 {
            return;
        }

        let widget = widget_fn(move |root| {
            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            // No mesh and no y axis: the dashboard chart shows shape, the
            // table shows values.
            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .disable_y_axis()
                .x_labels(0)
                .axis_style(&RGBColor(0x9c, 0xa3, 0xaf))
                .draw()?;

            let retail_color = RGBColor(0x56, 0xaf, 0xf7);
            let wholesale_color = RGBColor(0x9b, 0xa6, 0xbf);

            // Wholesale first so retail stays on top where they cross.
            chart.draw_series(LineSeries::new(self.wholesale.iter().copied(), &wholesale_color))?;
            chart.draw_series(LineSeries::new(self.retail.iter().copied(), &retail_color))?;

            Ok(())
        });

        widget.render(area, buf);
    }
}
