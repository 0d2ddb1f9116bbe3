use crate::canvas::Canvas;
use crate::geometry::Point;
use dial_theme::Color;
use iced::widget::canvas::{path, Frame, Stroke};
use std::f64::consts::TAU;

/// Largest angle covered by one flattened path segment (radians).
const ARC_STEP: f64 = 0.02;

/// End angle as cairo traces it: moved by whole turns until it lies past
/// `start` in the drawing direction (clockwise, or counter-clockwise when
/// `negative`).  Equal angles stay a zero-length arc.
fn normalize(start: f64, end: f64, negative: bool) -> f64 {
    if negative {
        if end > start {
            end - TAU * ((end - start) / TAU).ceil()
        } else {
            end
        }
    } else if end < start {
        end + TAU * ((start - end) / TAU).ceil()
    } else {
        end
    }
}

/// [`Canvas`] over an Iced canvas [`Frame`].
///
/// Arcs are flattened into line segments so that, as in cairo, each arc
/// continues the current sub-path and `close_path` closes the whole outline.
pub struct IcedCanvas<'a> {
    frame:      &'a mut Frame,
    pending:    path::Builder,
    open:       bool,
    line_width: f64,
    color:      Color,
}

impl<'a> IcedCanvas<'a> {
    pub fn new(frame: &'a mut Frame) -> Self {
        Self {
            frame,
            pending:    path::Builder::new(),
            open:       false,
            line_width: 2.0,
            color:      Color::TEAL,
        }
    }

    fn trace(&mut self, center: Point, radius: f64, start: f64, end: f64) {
        let steps = ((end - start).abs() / ARC_STEP).ceil().max(1.0) as usize;
        for k in 0..=steps {
            let angle = start + (end - start) * k as f64 / steps as f64;
            let p = center.polar(radius, angle);
            let p = iced::Point::new(p.x as f32, p.y as f32);
            if self.open {
                self.pending.line_to(p);
            } else {
                self.pending.move_to(p);
                self.open = true;
            }
        }
    }
}

impl Canvas for IcedCanvas<'_> {
    fn arc(&mut self, center: Point, radius: f64, start: f64, end: f64) {
        self.trace(center, radius, start, normalize(start, end, false));
    }

    fn arc_negative(&mut self, center: Point, radius: f64, start: f64, end: f64) {
        self.trace(center, radius, start, normalize(start, end, true));
    }

    fn close_path(&mut self) {
        self.pending.close();
        self.open = false;
    }

    fn line_width(&self) -> f64 {
        self.line_width
    }

    fn set_line_width(&mut self, width: f64) {
        self.line_width = width;
    }

    fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    fn stroke(&mut self) {
        let path = std::mem::replace(&mut self.pending, path::Builder::new()).build();
        self.open = false;
        if self.line_width <= 0.0 {
            return;
        }
        self.frame.stroke(
            &path,
            Stroke::default()
                .with_width(self.line_width as f32)
                .with_color(self.color.to_iced()),
        );
    }
}
