//! Rendering seam.
//!
//! Pixel rendering lives outside this crate; the mirror only tells a
//! [`Renderer`] what to paint.

use sketchroom_shared::protocol::Point;

use crate::mirror::MirroredStroke;

/// Paints strokes onto some surface.
pub trait Renderer {
    /// Wipe the whole surface.
    fn clear_surface(&mut self);

    /// Paint a whole stroke (bulk load, repaint, redo).
    fn draw_stroke(&mut self, stroke: &MirroredStroke);

    /// Paint only the newest segment of a stroke.
    fn draw_segment(&mut self, stroke: &MirroredStroke, from: Point, to: Point);
}

/// Renderer for the terminal client: records paint calls in the log.
#[derive(Debug, Default)]
pub struct TracingRenderer {
    painted_segments: usize,
}

impl TracingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Segments painted since the last full repaint.
    pub fn painted_segments(&self) -> usize {
        self.painted_segments
    }
}

impl Renderer for TracingRenderer {
    fn clear_surface(&mut self) {
        self.painted_segments = 0;
        tracing::debug!("render: clear surface");
    }

    fn draw_stroke(&mut self, stroke: &MirroredStroke) {
        self.painted_segments += stroke.points.len().saturating_sub(1);
        tracing::debug!(
            "render: stroke {} ({:?}, {}, width {}) with {} points",
            stroke.id,
            stroke.tool,
            stroke.color,
            stroke.line_width,
            stroke.points.len()
        );
    }

    fn draw_segment(&mut self, stroke: &MirroredStroke, from: Point, to: Point) {
        self.painted_segments += 1;
        tracing::trace!(
            "render: segment of {} ({}, {}) -> ({}, {})",
            stroke.id,
            from.x,
            from.y,
            to.x,
            to.y
        );
    }
}
