use crate::geometry::Point;
use dial_theme::Color;
use std::ops::{Deref, DerefMut};

/// The drawing surface gauges stroke onto.
///
/// Follows cairo's model: arcs append to a pending path (joined to the
/// current point by a straight segment), and [`stroke`](Canvas::stroke)
/// paints it with the current width and colour and clears it.  Angles are
/// radians, 0 at +x, increasing clockwise on screen.
pub trait Canvas {
    /// Append an arc swept with increasing angle from `start` to `end`.
    fn arc(&mut self, center: Point, radius: f64, start: f64, end: f64);

    /// Append an arc swept with decreasing angle from `start` to `end`.
    fn arc_negative(&mut self, center: Point, radius: f64, start: f64, end: f64);

    /// Close the current sub-path back to its first point.
    fn close_path(&mut self);

    fn line_width(&self) -> f64;

    fn set_line_width(&mut self, width: f64);

    fn set_color(&mut self, color: Color);

    /// Paint the pending path and clear it.
    fn stroke(&mut self);
}

/// Restores the canvas stroke width captured at construction when dropped.
pub struct LineWidthGuard<'a, C: Canvas + ?Sized> {
    canvas: &'a mut C,
    saved:  f64,
}

impl<'a, C: Canvas + ?Sized> LineWidthGuard<'a, C> {
    pub fn new(canvas: &'a mut C) -> Self {
        let saved = canvas.line_width();
        Self { canvas, saved }
    }
}

impl<C: Canvas + ?Sized> Deref for LineWidthGuard<'_, C> {
    type Target = C;

    fn deref(&self) -> &C {
        self.canvas
    }
}

impl<C: Canvas + ?Sized> DerefMut for LineWidthGuard<'_, C> {
    fn deref_mut(&mut self) -> &mut C {
        self.canvas
    }
}

impl<C: Canvas + ?Sized> Drop for LineWidthGuard<'_, C> {
    fn drop(&mut self) {
        self.canvas.set_line_width(self.saved);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::RecordingCanvas;

    #[test]
    fn guard_restores_width_on_drop() {
        let mut canvas = RecordingCanvas::default();
        canvas.set_line_width(25.0);
        {
            let mut guard = LineWidthGuard::new(&mut canvas);
            guard.set_line_width(3.0);
            assert_eq!(guard.line_width(), 3.0);
        }
        assert_eq!(canvas.line_width(), 25.0);
    }

    #[test]
    fn guard_works_through_trait_objects() {
        let mut canvas = RecordingCanvas::default();
        let dynamic: &mut dyn Canvas = &mut canvas;
        {
            let mut guard = LineWidthGuard::new(dynamic);
            guard.set_line_width(9.0);
        }
        assert_eq!(canvas.line_width(), RecordingCanvas::DEFAULT_LINE_WIDTH);
    }
}
