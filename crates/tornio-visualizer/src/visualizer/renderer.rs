//! Renderer interface consumed by the simulation engine

use serde::{Deserialize, Serialize};
use std::fmt;
use tornio_core::Point2D;

/// Line style hint for a drawn segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrawStyle {
    /// Rapid positioning move
    Rapid,
    /// Feed move
    Feed,
    /// Emphasised segment
    Highlight,
}

impl fmt::Display for DrawStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rapid => write!(f, "rapid"),
            Self::Feed => write!(f, "feed"),
            Self::Highlight => write!(f, "highlight"),
        }
    }
}

/// Drawing surface for the simulated toolpath
///
/// Implementations own whatever canvas they draw on; the engine only issues
/// these calls and never reads anything back.
pub trait Renderer {
    /// Remove every drawn segment and the marker
    fn clear(&mut self);

    /// Draw a straight segment
    fn draw_segment(&mut self, from: Point2D, to: Point2D, style: DrawStyle);

    /// Move the tool marker
    fn set_marker(&mut self, position: Point2D);

    /// Highlight the instruction at `index` in the program listing
    fn highlight_instruction(&mut self, index: usize);

    /// Remove the highlight from the instruction at `index`
    fn unhighlight_instruction(&mut self, index: usize);
}

impl<R: Renderer + ?Sized> Renderer for &mut R {
    fn clear(&mut self) {
        (**self).clear();
    }

    fn draw_segment(&mut self, from: Point2D, to: Point2D, style: DrawStyle) {
        (**self).draw_segment(from, to, style);
    }

    fn set_marker(&mut self, position: Point2D) {
        (**self).set_marker(position);
    }

    fn highlight_instruction(&mut self, index: usize) {
        (**self).highlight_instruction(index);
    }

    fn unhighlight_instruction(&mut self, index: usize) {
        (**self).unhighlight_instruction(index);
    }
}

/// "Show piece" view: reflects every point across the X axis
///
/// A lathe profile traced on one side of the spindle axis is shown mirrored
/// on the other; wrapping the real renderer keeps the engine unaware of it.
#[derive(Debug, Clone, Default)]
pub struct MirroredRenderer<R> {
    inner: R,
}

impl<R: Renderer> MirroredRenderer<R> {
    /// Wrap a renderer
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    /// Borrow the wrapped renderer
    pub fn inner(&self) -> &R {
        &self.inner
    }

    /// Unwrap the renderer
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Renderer> Renderer for MirroredRenderer<R> {
    fn clear(&mut self) {
        self.inner.clear();
    }

    fn draw_segment(&mut self, from: Point2D, to: Point2D, style: DrawStyle) {
        self.inner
            .draw_segment(from.mirrored_y(), to.mirrored_y(), style);
    }

    fn set_marker(&mut self, position: Point2D) {
        self.inner.set_marker(position.mirrored_y());
    }

    fn highlight_instruction(&mut self, index: usize) {
        self.inner.highlight_instruction(index);
    }

    fn unhighlight_instruction(&mut self, index: usize) {
        self.inner.unhighlight_instruction(index);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Capture {
        segments: Vec<(Point2D, Point2D, DrawStyle)>,
        marker: Option<Point2D>,
        highlighted: Vec<usize>,
    }

    impl Renderer for Capture {
        fn clear(&mut self) {
            self.segments.clear();
        }
        fn draw_segment(&mut self, from: Point2D, to: Point2D, style: DrawStyle) {
            self.segments.push((from, to, style));
        }
        fn set_marker(&mut self, position: Point2D) {
            self.marker = Some(position);
        }
        fn highlight_instruction(&mut self, index: usize) {
            self.highlighted.push(index);
        }
        fn unhighlight_instruction(&mut self, index: usize) {
            self.highlighted.retain(|i| *i != index);
        }
    }

    #[test]
    fn test_mirrored_renderer_reflects_y() {
        let mut mirrored = MirroredRenderer::new(Capture::default());
        mirrored.draw_segment(
            Point2D::new(30.0, -10.0),
            Point2D::new(10.0, 5.0),
            DrawStyle::Feed,
        );
        mirrored.set_marker(Point2D::new(10.0, 5.0));
        mirrored.highlight_instruction(2);

        let inner = mirrored.into_inner();
        assert_eq!(
            inner.segments,
            vec![(
                Point2D::new(30.0, 10.0),
                Point2D::new(10.0, -5.0),
                DrawStyle::Feed
            )]
        );
        assert_eq!(inner.marker, Some(Point2D::new(10.0, -5.0)));
        assert_eq!(inner.highlighted, vec![2]);
    }

    #[test]
    fn test_draw_style_display() {
        assert_eq!(DrawStyle::Rapid.to_string(), "rapid");
        assert_eq!(DrawStyle::Feed.to_string(), "feed");
        assert_eq!(DrawStyle::Highlight.to_string(), "highlight");
    }
}
