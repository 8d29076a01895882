// LineChartRenderer - geometry -> draw commands
//
// The renderer never touches a backend directly. It emits DrawCommands into a
// ChartSurface; the TUI paints them on a ratatui canvas, tests record them.

use super::geometry::{compute_geometry, format_axis_value, ChartGeometry, Point, Viewport, DEFAULT_MARGIN};
use super::series::MonthlySeries;
use crate::error::ChartError;
use crate::theme::{Rgb, Section, ThemeStyles};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartPalette {
    pub axis: Rgb,
    pub grid: Rgb,
    pub line: Rgb,
    pub marker: Rgb,
    pub peak: Rgb,
    pub text: Rgb,
}

impl ChartPalette {
    pub fn from_theme(styles: &ThemeStyles) -> Self {
        let content = styles.section(Section::Content);
        ChartPalette {
            axis: content.foreground,
            grid: content.border,
            line: content.accent,
            marker: content.accent,
            peak: Rgb(0xdc, 0x35, 0x45),
            text: content.foreground,
        }
    }
}

/// Everything the renderer needs besides the data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartOptions {
    pub margin: f64,
    pub palette: ChartPalette,
    pub marker_radius: f64,
    pub peak_marker_radius: f64,
    pub peak_label_offset: f64,
    pub month_label_offset: f64,
    pub axis_label_offset: f64,
    pub placeholder: String,
}

impl ChartOptions {
    pub fn new(palette: ChartPalette) -> Self {
        ChartOptions {
            margin: DEFAULT_MARGIN,
            palette,
            marker_radius: 4.0,
            peak_marker_radius: 8.0,
            peak_label_offset: 18.0,
            month_label_offset: 20.0,
            axis_label_offset: 10.0,
            placeholder: "Select a merchant and generate the report to see the 12-month trend"
                .to_string(),
        }
    }

    pub fn with_margin(mut self, margin: f64) -> Result<Self, ChartError> {
        if !margin.is_finite() || margin < 0.0 {
            return Err(ChartError::InvalidMargin(margin));
        }
        self.margin = margin;
        Ok(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DrawCommand {
    Clear,
    Line {
        from: Point,
        to: Point,
        color: Rgb,
    },
    Circle {
        center: Point,
        radius: f64,
        color: Rgb,
        filled: bool,
    },
    Text {
        at: Point,
        text: String,
        color: Rgb,
        anchor: TextAnchor,
    },
}

pub trait ChartSurface {
    fn draw(&mut self, command: DrawCommand);
}

impl ChartSurface for Vec<DrawCommand> {
    fn draw(&mut self, command: DrawCommand) {
        self.push(command);
    }
}

pub struct LineChartRenderer {
    options: ChartOptions,
}

impl LineChartRenderer {
    pub fn new(options: ChartOptions) -> Self {
        LineChartRenderer { options }
    }

    pub fn options(&self) -> &ChartOptions {
        &self.options
    }

    /// Redraw the whole surface. Returns the geometry used, `None` when the
    /// series was empty and only the placeholder was drawn.
    pub fn render<S: ChartSurface>(
        &self,
        series: &MonthlySeries,
        viewport: Viewport,
        surface: &mut S,
    ) -> Option<ChartGeometry> {
        surface.draw(DrawCommand::Clear);

        let geometry = match compute_geometry(series, viewport, self.options.margin) {
            Some(geometry) => geometry,
            None => {
                log::debug!("empty series, drawing placeholder");
                surface.draw(DrawCommand::Text {
                    at: viewport.center(),
                    text: self.options.placeholder.clone(),
                    color: self.options.palette.text,
                    anchor: TextAnchor::Middle,
                });
                return None;
            }
        };

        self.draw_axes(&geometry, surface);
        self.draw_gridlines(&geometry, surface);
        self.draw_polyline(&geometry, surface);
        self.draw_markers(&geometry, surface);
        self.draw_peak(&geometry, surface);
        self.draw_month_labels(&geometry, surface);

        Some(geometry)
    }

    fn draw_axes<S: ChartSurface>(&self, geometry: &ChartGeometry, surface: &mut S) {
        let rect = geometry.chart_rect;
        let origin = Point {
            x: rect.left,
            y: rect.bottom(),
        };
        surface.draw(DrawCommand::Line {
            from: origin,
            to: Point {
                x: rect.left,
                y: rect.top,
            },
            color: self.options.palette.axis,
        });
        surface.draw(DrawCommand::Line {
            from: origin,
            to: Point {
                x: rect.right(),
                y: rect.bottom(),
            },
            color: self.options.palette.axis,
        });
    }

    fn draw_gridlines<S: ChartSurface>(&self, geometry: &ChartGeometry, surface: &mut S) {
        let rect = geometry.chart_rect;
        for gridline in &geometry.gridlines {
            surface.draw(DrawCommand::Line {
                from: Point {
                    x: rect.left,
                    y: gridline.y,
                },
                to: Point {
                    x: rect.right(),
                    y: gridline.y,
                },
                color: self.options.palette.grid,
            });
            surface.draw(DrawCommand::Text {
                at: Point {
                    x: rect.left - self.options.axis_label_offset,
                    y: gridline.y,
                },
                text: format_axis_value(gridline.value),
                color: self.options.palette.text,
                anchor: TextAnchor::End,
            });
        }
    }

    fn draw_polyline<S: ChartSurface>(&self, geometry: &ChartGeometry, surface: &mut S) {
        for pair in geometry.points.windows(2) {
            surface.draw(DrawCommand::Line {
                from: pair[0].position,
                to: pair[1].position,
                color: self.options.palette.line,
            });
        }
    }

    fn draw_markers<S: ChartSurface>(&self, geometry: &ChartGeometry, surface: &mut S) {
        for point in &geometry.points {
            surface.draw(DrawCommand::Circle {
                center: point.position,
                radius: self.options.marker_radius,
                color: self.options.palette.marker,
                filled: true,
            });
        }
    }

    fn draw_peak<S: ChartSurface>(&self, geometry: &ChartGeometry, surface: &mut S) {
        let peak = geometry.peak;
        surface.draw(DrawCommand::Circle {
            center: peak.position,
            radius: self.options.peak_marker_radius,
            color: self.options.palette.peak,
            filled: true,
        });
        surface.draw(DrawCommand::Text {
            at: Point {
                x: peak.position.x,
                y: peak.position.y - self.options.peak_label_offset,
            },
            text: format!("Peak: {}", peak.value),
            color: self.options.palette.peak,
            anchor: TextAnchor::Middle,
        });
    }

    fn draw_month_labels<S: ChartSurface>(&self, geometry: &ChartGeometry, surface: &mut S) {
        let y = geometry.chart_rect.bottom() + self.options.month_label_offset;
        for point in &geometry.points {
            surface.draw(DrawCommand::Text {
                at: Point {
                    x: point.position.x,
                    y,
                },
                text: point.label.clone(),
                color: self.options.palette.text,
                anchor: TextAnchor::Middle,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::{styles_for, ThemeKind};

    fn renderer() -> LineChartRenderer {
        let palette = ChartPalette::from_theme(styles_for(ThemeKind::Dark));
        LineChartRenderer::new(ChartOptions::new(palette))
    }

    fn viewport() -> Viewport {
        Viewport::new(800.0, 400.0).unwrap()
    }

    #[test]
    fn test_empty_series_draws_placeholder_only() {
        let mut surface: Vec<DrawCommand> = Vec::new();
        let geometry = renderer().render(&MonthlySeries::empty(), viewport(), &mut surface);

        assert!(geometry.is_none());
        assert_eq!(surface.len(), 2);
        assert_eq!(surface[0], DrawCommand::Clear);
        match &surface[1] {
            DrawCommand::Text { at, anchor, .. } => {
                assert_eq!(*at, Point { x: 400.0, y: 200.0 });
                assert_eq!(*anchor, TextAnchor::Middle);
            }
            other => panic!("expected placeholder text, got {:?}", other),
        }
    }

    #[test]
    fn test_command_counts_for_full_year() {
        let series = MonthlySeries::calendar([10, 20, 30, 40, 50, 60, 70, 80, 90, 100, 110, 120]);
        let mut surface: Vec<DrawCommand> = Vec::new();
        renderer().render(&series, viewport(), &mut surface);

        let lines = surface.iter().filter(|c| matches!(c, DrawCommand::Line { .. })).count();
        let circles = surface.iter().filter(|c| matches!(c, DrawCommand::Circle { .. })).count();
        let texts = surface.iter().filter(|c| matches!(c, DrawCommand::Text { .. })).count();

        // 2 axes + 6 gridlines + 11 segments
        assert_eq!(lines, 19);
        // 12 markers + peak
        assert_eq!(circles, 13);
        // 6 gridline labels + peak label + 12 month labels
        assert_eq!(texts, 19);
    }

    #[test]
    fn test_peak_marker_is_enlarged_and_labeled() {
        let series = MonthlySeries::calendar([1, 2, 3, 9, 5, 6, 7, 8, 9, 1, 1, 1]);
        let mut surface: Vec<DrawCommand> = Vec::new();
        let geometry = renderer().render(&series, viewport(), &mut surface).unwrap();
        assert_eq!(geometry.peak.index, 3);

        let options = renderer().options().clone();
        let peak_circle = surface.iter().find(|c| {
            matches!(c, DrawCommand::Circle { radius, .. } if *radius == options.peak_marker_radius)
        });
        match peak_circle {
            Some(DrawCommand::Circle { center, color, .. }) => {
                assert_eq!(*center, geometry.points[3].position);
                assert_eq!(*color, options.palette.peak);
            }
            _ => panic!("peak marker missing"),
        }

        assert!(surface.iter().any(|c| matches!(
            c,
            DrawCommand::Text { text, .. } if text == "Peak: 9"
        )));
    }

    #[test]
    fn test_invalid_margin_rejected() {
        let palette = ChartPalette::from_theme(styles_for(ThemeKind::Light));
        assert!(ChartOptions::new(palette).with_margin(-1.0).is_err());
        assert!(ChartOptions::new(palette).with_margin(f64::NAN).is_err());
        assert_eq!(ChartOptions::new(palette).with_margin(20.0).unwrap().margin, 20.0);
    }
}
