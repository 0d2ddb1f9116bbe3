/// A point on the canvas, in logical pixels (y grows downwards).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// The point `radius` away from `self` at `angle` radians
    /// (0 = +x, increasing clockwise on screen).
    pub fn polar(self, radius: f64, angle: f64) -> Self {
        Self {
            x: self.x + radius * angle.cos(),
            y: self.y + radius * angle.sin(),
        }
    }
}

/// Degrees → radians.
#[inline]
pub fn radians(degrees: f64) -> f64 {
    degrees.to_radians()
}

/// Angular extent of a graph running from `start` to `end`, in degrees.
///
/// When `end` is not past `start` the graph wraps through 0°/360°.
pub fn sweep(start: f64, end: f64) -> f64 {
    if end > start {
        end - start
    } else {
        360.0 - start + end
    }
}

/// Angle (degrees) of slot `i` out of `slots` along a graph from `start`
/// to `end`.
///
/// Ascending order puts slot 0 at `start`; `negative` mirrors the order so
/// slot 0 sits at the far end and later slots walk back towards `start`.
/// Both orders share one scale for increasing and wrap-around spans.
pub fn slot_angle(i: usize, slots: usize, start: f64, end: f64, negative: bool) -> f64 {
    if slots == 0 {
        return start;
    }
    let step = if negative { slots.saturating_sub(i) } else { i };
    start + step as f64 / slots as f64 * sweep(start, end)
}
