use crate::canvas::{Canvas, LineWidthGuard};
use crate::geometry::{radians, Point};
use dial_core::{Result, ValueSource};

/// A single arc whose sweep is proportional to a percentage.
///
/// `sweep` is signed degrees: positive sweeps clockwise from `start`,
/// negative counter-clockwise.  No history is kept.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PercentArc {
    pub center: Point,
    pub radius: f64,
    pub start:  f64,
    pub sweep:  f64,
}

impl PercentArc {
    pub fn new(center: Point, radius: f64, start: f64, sweep: f64) -> Self {
        Self { center, radius, start, sweep }
    }

    /// End angle (degrees) for `percent`; values above 100 overshoot.
    pub fn end_angle(&self, percent: f64) -> f64 {
        self.start + self.sweep * percent.max(0.0) / 100.0
    }

    /// Stroke the arc for `percent` with the canvas's current width and colour.
    pub fn draw<C: Canvas + ?Sized>(&self, canvas: &mut C, percent: f64) {
        let start = radians(self.start);
        let end = radians(self.end_angle(percent));
        if self.sweep >= 0.0 {
            canvas.arc(self.center, self.radius, start, end);
        } else {
            canvas.arc_negative(self.center, self.radius, start, end);
        }
        canvas.stroke();
    }

    /// Pull one value from `source` and draw it.
    pub fn draw_from<C, V>(&self, canvas: &mut C, source: &V) -> Result<f64>
    where
        C: Canvas + ?Sized,
        V: ValueSource + ?Sized,
    {
        let percent = source.produce()?;
        self.draw(canvas, percent);
        Ok(percent)
    }
}

/// Two-band battery gauge.
///
/// A thick band marks capacity lost to wear (from `full / design` to the
/// end of the track); a thinner band shows the charge within what is left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatteryArc {
    pub track:        PercentArc,
    pub wear_width:   f64,
    pub charge_width: f64,
}

impl BatteryArc {
    /// `health` is `full / design` and `charge` is `current / full`, both in percent.
    pub fn draw<C: Canvas + ?Sized>(&self, canvas: &mut C, health: f64, charge: f64) {
        let mut canvas = LineWidthGuard::new(canvas);
        let health_end = self.track.end_angle(health);
        let track_end = self.track.end_angle(100.0);

        canvas.set_line_width(self.wear_width);
        canvas.arc(self.track.center, self.track.radius, radians(health_end), radians(track_end));
        canvas.stroke();

        let usable = PercentArc {
            sweep: health_end - self.track.start,
            ..self.track
        };
        canvas.set_line_width(self.charge_width);
        usable.draw(&mut *canvas, charge);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::{Op, RecordingCanvas};

    fn end_degrees(op: &Op) -> f64 {
        match op {
            Op::Arc { end, .. } | Op::ArcNegative { end, .. } => end.to_degrees(),
            other => panic!("not an arc: {other:?}"),
        }
    }

    #[test]
    fn clockwise_quarter() {
        let cpu = PercentArc::new(Point::new(0.0, 600.0), 150.0, 270.0, 90.0);
        let mut canvas = RecordingCanvas::default();
        cpu.draw(&mut canvas, 50.0);

        assert!(matches!(canvas.ops[0], Op::Arc { .. }));
        assert!((end_degrees(&canvas.ops[0]) - 315.0).abs() < 1e-9);
        assert_eq!(canvas.ops[1], Op::Stroke { width: RecordingCanvas::DEFAULT_LINE_WIDTH });
    }

    #[test]
    fn counter_clockwise_half() {
        let temp = PercentArc::new(Point::default(), 80.0, 360.0, -180.0);
        let mut canvas = RecordingCanvas::default();
        temp.draw(&mut canvas, 40.0);

        assert!(matches!(canvas.ops[0], Op::ArcNegative { .. }));
        assert!((end_degrees(&canvas.ops[0]) - 288.0).abs() < 1e-9);
    }

    #[test]
    fn negative_percent_draws_nothing_visible() {
        let arc = PercentArc::new(Point::default(), 10.0, 180.0, 180.0);
        assert_eq!(arc.end_angle(-20.0), 180.0);
        assert_eq!(arc.end_angle(150.0), 450.0);
    }

    #[test]
    fn draw_from_propagates_failures() {
        let arc = PercentArc::new(Point::default(), 10.0, 0.0, 90.0);
        let mut canvas = RecordingCanvas::default();
        let broken = || -> Result<f64> { Err(dial_core::DialError::Config("no battery".into())) };
        assert!(arc.draw_from(&mut canvas, &broken).is_err());
        assert!(canvas.ops.is_empty());
    }

    #[test]
    fn battery_bands() {
        let battery = BatteryArc {
            track:        PercentArc::new(Point::default(), 80.0, 180.0, 180.0),
            wear_width:   35.0,
            charge_width: 25.0,
        };
        let mut canvas = RecordingCanvas::default();
        canvas.set_line_width(10.0);
        canvas.ops.clear();

        // 80 % health, 50 % charge.
        battery.draw(&mut canvas, 80.0, 50.0);
        let arcs = canvas.arcs();
        let (wear, charge) = (arcs[0], arcs[1]);

        match wear {
            Op::Arc { start, end, .. } => {
                assert!((start.to_degrees() - 324.0).abs() < 1e-9);
                assert!((end.to_degrees() - 360.0).abs() < 1e-9);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!((end_degrees(charge) - 252.0).abs() < 1e-9);
        assert_eq!(canvas.stroke_widths(), vec![35.0, 25.0]);
        assert_eq!(canvas.line_width(), 10.0);
    }
}
