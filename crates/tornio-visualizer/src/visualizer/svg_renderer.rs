//! SVG path renderer
//!
//! Accumulates drawn segments as SVG path data, one path per draw style,
//! with world Y flipped to SVG Y. Consecutive segments that share an
//! endpoint are joined into a single subpath.

use std::fmt::Write;
use tornio_core::constants::{PLOT_MAX_X, PLOT_MAX_Y, PLOT_MIN_X, PLOT_MIN_Y};
use tornio_core::Point2D;
use tracing::{debug, trace};

use super::renderer::{DrawStyle, Renderer};

/// Grid spacing of the exported document (mm)
const GRID_STEP_MM: f64 = 5.0;

/// Path data for each draw style
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SvgPaths {
    pub rapid: String,
    pub feed: String,
    pub highlight: String,
}

impl SvgPaths {
    pub fn is_empty(&self) -> bool {
        self.rapid.is_empty() && self.feed.is_empty() && self.highlight.is_empty()
    }
}

/// Renderer that records the toolpath as SVG path strings
#[derive(Debug, Clone, Default)]
pub struct SvgPathRenderer {
    paths: SvgPaths,
    last_rapid: Option<Point2D>,
    last_feed: Option<Point2D>,
    last_highlight: Option<Point2D>,
    marker: Option<Point2D>,
    highlighted: Option<usize>,
    segment_count: usize,
    /// Drawing discarded by the most recent `clear`
    retained: Option<SvgPaths>,
}

impl SvgPathRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Path data drawn since the last `clear`
    pub fn paths(&self) -> &SvgPaths {
        &self.paths
    }

    /// The last non-empty drawing removed by `clear`
    ///
    /// The engine clears the canvas when a program completes; this keeps the
    /// finished toolpath available for export.
    pub fn retained(&self) -> Option<&SvgPaths> {
        self.retained.as_ref()
    }

    /// Current drawing, or the retained one when nothing is drawn
    pub fn latest(&self) -> &SvgPaths {
        match &self.retained {
            Some(retained) if self.paths.is_empty() => retained,
            _ => &self.paths,
        }
    }

    pub fn marker(&self) -> Option<Point2D> {
        self.marker
    }

    /// Index of the highlighted instruction
    pub fn highlighted(&self) -> Option<usize> {
        self.highlighted
    }

    /// Segments drawn since the last `clear`
    pub fn segment_count(&self) -> usize {
        self.segment_count
    }

    /// Standalone SVG document of the latest drawing
    pub fn to_svg_document(&self) -> String {
        render_document(self.latest(), self.marker)
    }
}

impl Renderer for SvgPathRenderer {
    fn clear(&mut self) {
        if !self.paths.is_empty() {
            debug!("Clearing SVG drawing with {} segments", self.segment_count);
            self.retained = Some(std::mem::take(&mut self.paths));
        }
        self.last_rapid = None;
        self.last_feed = None;
        self.last_highlight = None;
        self.marker = None;
        self.highlighted = None;
        self.segment_count = 0;
    }

    fn draw_segment(&mut self, from: Point2D, to: Point2D, style: DrawStyle) {
        let (path, last) = match style {
            DrawStyle::Rapid => (&mut self.paths.rapid, &mut self.last_rapid),
            DrawStyle::Feed => (&mut self.paths.feed, &mut self.last_feed),
            DrawStyle::Highlight => (&mut self.paths.highlight, &mut self.last_highlight),
        };

        if *last != Some(from) {
            let _ = write!(path, "M {:.2} {:.2} ", from.x, -from.y);
        }
        let _ = write!(path, "L {:.2} {:.2} ", to.x, -to.y);
        *last = Some(to);
        self.segment_count += 1;
        trace!("SVG {} segment {} -> {}", style, from, to);
    }

    fn set_marker(&mut self, position: Point2D) {
        self.marker = Some(position);
    }

    fn highlight_instruction(&mut self, index: usize) {
        self.highlighted = Some(index);
    }

    fn unhighlight_instruction(&mut self, index: usize) {
        if self.highlighted == Some(index) {
            self.highlighted = None;
        }
    }
}

/// Grid over the fixed plot extents, in SVG coordinates
fn grid_path() -> String {
    let mut path = String::new();

    let mut x = PLOT_MIN_X;
    while x <= PLOT_MAX_X {
        let _ = write!(
            path,
            "M {:.2} {:.2} L {:.2} {:.2} ",
            x, -PLOT_MAX_Y, x, -PLOT_MIN_Y
        );
        x += GRID_STEP_MM;
    }

    let mut y = PLOT_MIN_Y;
    while y <= PLOT_MAX_Y {
        let _ = write!(
            path,
            "M {:.2} {:.2} L {:.2} {:.2} ",
            PLOT_MIN_X, -y, PLOT_MAX_X, -y
        );
        y += GRID_STEP_MM;
    }

    path
}

fn render_document(paths: &SvgPaths, marker: Option<Point2D>) -> String {
    let width = PLOT_MAX_X - PLOT_MIN_X;
    let height = PLOT_MAX_Y - PLOT_MIN_Y;

    let mut svg = String::with_capacity(
        512 + paths.rapid.len() + paths.feed.len() + paths.highlight.len(),
    );
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="{:.2} {:.2} {:.2} {:.2}">"#,
        PLOT_MIN_X, -PLOT_MAX_Y, width, height
    );
    let _ = writeln!(
        svg,
        r##"  <path d="{}" stroke="#dddddd" stroke-width="0.05" fill="none"/>"##,
        grid_path().trim_end()
    );

    for (data, colour, dash) in [
        (&paths.rapid, "#e67e22", r#" stroke-dasharray="0.5 0.5""#),
        (&paths.feed, "#2c3e50", ""),
        (&paths.highlight, "#c0392b", ""),
    ] {
        if !data.is_empty() {
            let _ = writeln!(
                svg,
                r#"  <path d="{}" stroke="{}" stroke-width="0.2" fill="none"{}/>"#,
                data.trim_end(),
                colour,
                dash
            );
        }
    }

    if let Some(marker) = marker {
        let _ = writeln!(
            svg,
            r##"  <circle cx="{:.2}" cy="{:.2}" r="0.4" fill="#27ae60"/>"##,
            marker.x, -marker.y
        );
    }

    svg.push_str("</svg>\n");
    svg
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segments_flip_y_and_join() {
        let mut renderer = SvgPathRenderer::new();
        renderer.draw_segment(
            Point2D::new(30.0, -10.0),
            Point2D::new(20.0, -2.5),
            DrawStyle::Feed,
        );
        renderer.draw_segment(
            Point2D::new(20.0, -2.5),
            Point2D::new(10.0, 5.0),
            DrawStyle::Feed,
        );

        assert_eq!(
            renderer.paths().feed,
            "M 30.00 10.00 L 20.00 2.50 L 10.00 -5.00 "
        );
        assert!(renderer.paths().rapid.is_empty());
        assert_eq!(renderer.segment_count(), 2);
    }

    #[test]
    fn test_styles_go_to_separate_paths() {
        let mut renderer = SvgPathRenderer::new();
        renderer.draw_segment(Point2D::new(0.0, 2.0), Point2D::new(1.0, 2.0), DrawStyle::Rapid);
        renderer.draw_segment(Point2D::new(1.0, 2.0), Point2D::new(2.0, 2.0), DrawStyle::Feed);

        assert_eq!(renderer.paths().rapid, "M 0.00 -2.00 L 1.00 -2.00 ");
        assert_eq!(renderer.paths().feed, "M 1.00 -2.00 L 2.00 -2.00 ");
    }

    #[test]
    fn test_clear_retains_last_drawing() {
        let mut renderer = SvgPathRenderer::new();
        renderer.draw_segment(Point2D::new(0.0, 1.0), Point2D::new(2.0, 1.0), DrawStyle::Feed);
        renderer.set_marker(Point2D::new(2.0, 1.0));
        renderer.clear();

        assert!(renderer.paths().is_empty());
        assert_eq!(renderer.marker(), None);
        assert_eq!(renderer.latest().feed, "M 0.00 -1.00 L 2.00 -1.00 ");

        // Clearing an empty canvas keeps the earlier drawing
        renderer.clear();
        assert!(renderer.retained().is_some());
    }

    #[test]
    fn test_highlight_tracking() {
        let mut renderer = SvgPathRenderer::new();
        renderer.highlight_instruction(3);
        renderer.unhighlight_instruction(2);
        assert_eq!(renderer.highlighted(), Some(3));
        renderer.unhighlight_instruction(3);
        assert_eq!(renderer.highlighted(), None);
    }

    #[test]
    fn test_document_contains_paths_and_marker() {
        let mut renderer = SvgPathRenderer::new();
        renderer.draw_segment(Point2D::new(30.0, -10.0), Point2D::new(10.0, 5.0), DrawStyle::Feed);
        renderer.set_marker(Point2D::new(10.0, 5.0));

        let svg = renderer.to_svg_document();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(r#"viewBox="0.00 -20.00 35.00 40.00""#));
        assert!(svg.contains("M 30.00 10.00 L 10.00 -5.00"));
        assert!(svg.contains(r#"cx="10.00" cy="-5.00""#));
        assert!(svg.trim_end().ends_with("</svg>"));
    }
}
