use crate::canvas::Canvas;
use crate::geometry::Point;
use dial_theme::Color;

/// One recorded canvas call.  Angles are kept in radians, as received.
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    Arc { center: Point, radius: f64, start: f64, end: f64 },
    ArcNegative { center: Point, radius: f64, start: f64, end: f64 },
    ClosePath,
    SetLineWidth(f64),
    SetColor(Color),
    /// A stroke, with the width it was painted at.
    Stroke { width: f64 },
}

/// A [`Canvas`] that records every call instead of painting.
#[derive(Debug, Clone)]
pub struct RecordingCanvas {
    pub ops:    Vec<Op>,
    line_width: f64,
}

impl RecordingCanvas {
    /// Same default as cairo.
    pub const DEFAULT_LINE_WIDTH: f64 = 2.0;

    /// Widths of every stroke, in order.
    pub fn stroke_widths(&self) -> Vec<f64> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                Op::Stroke { width } => Some(*width),
                _ => None,
            })
            .collect()
    }

    /// Every arc (either direction), in order.
    pub fn arcs(&self) -> Vec<&Op> {
        self.ops
            .iter()
            .filter(|op| matches!(op, Op::Arc { .. } | Op::ArcNegative { .. }))
            .collect()
    }
}

impl Default for RecordingCanvas {
    fn default() -> Self {
        Self {
            ops:        Vec::new(),
            line_width: Self::DEFAULT_LINE_WIDTH,
        }
    }
}

impl Canvas for RecordingCanvas {
    fn arc(&mut self, center: Point, radius: f64, start: f64, end: f64) {
        self.ops.push(Op::Arc { center, radius, start, end });
    }

    fn arc_negative(&mut self, center: Point, radius: f64, start: f64, end: f64) {
        self.ops.push(Op::ArcNegative { center, radius, start, end });
    }

    fn close_path(&mut self) {
        self.ops.push(Op::ClosePath);
    }

    fn line_width(&self) -> f64 {
        self.line_width
    }

    fn set_line_width(&mut self, width: f64) {
        self.line_width = width;
        self.ops.push(Op::SetLineWidth(width));
    }

    fn set_color(&mut self, color: Color) {
        self.ops.push(Op::SetColor(color));
    }

    fn stroke(&mut self) {
        self.ops.push(Op::Stroke { width: self.line_width });
    }
}
