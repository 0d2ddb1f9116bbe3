//! Radial history graphs.
//!
//! Each draw pulls one value from a [`ValueSource`], appends it to the
//! graph's named history and strokes one 1°-wide segment per retained sample
//! along an arc.  A segment's thickness is the sample's share of the graph's
//! ceiling, growing outward from the inner edge of the track.
//!
//! The history keeps one sample per degree of the arc, so its capacity is
//! recomputed from the arc's span on every draw: the same graph drawn over a
//! narrower arc immediately forgets its oldest samples.

use crate::canvas::{Canvas, LineWidthGuard};
use crate::geometry::{radians, slot_angle, Point};
use dial_core::{Result, ValueSource};
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, PoisonError};
use tracing::debug;

/// Where and how a history graph is drawn.  Angles are degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcSpec {
    pub center:   Point,
    /// Radius of the track's centre line.
    pub radius:   f64,
    /// Full thickness of the track.
    pub width:    f64,
    pub start:    f64,
    pub end:      f64,
    /// Newest sample at the `start` edge (default) instead of the oldest.
    pub flip:     bool,
    /// Lay samples out from the far end back towards `start`.
    pub negative: bool,
    /// Fixed normalisation ceiling; `None` scales to the largest value seen.
    pub hard_max: Option<f64>,
    /// Outline the full track before drawing samples.
    pub border:   bool,
}

impl ArcSpec {
    pub fn new(center: Point, radius: f64, width: f64, start: f64, end: f64) -> Self {
        Self {
            center,
            radius,
            width,
            start,
            end,
            flip: true,
            negative: false,
            hard_max: None,
            border: true,
        }
    }

    #[must_use]
    pub fn flip(mut self, flip: bool) -> Self {
        self.flip = flip;
        self
    }

    #[must_use]
    pub fn negative(mut self, negative: bool) -> Self {
        self.negative = negative;
        self
    }

    #[must_use]
    pub fn hard_max(mut self, max: f64) -> Self {
        self.hard_max = Some(max);
        self
    }

    #[must_use]
    pub fn border(mut self, border: bool) -> Self {
        self.border = border;
        self
    }

    pub fn half_width(&self) -> f64 {
        self.width / 2.0
    }

    /// Samples retained: one per whole degree of `|start − end|`.
    pub fn capacity(&self) -> usize {
        (self.start - self.end).abs() as usize
    }
}

/// One graph's retained samples plus the largest value it has ever seen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GraphHistory {
    samples:  VecDeque<f64>,
    capacity: usize,
    peak:     f64,
}

impl GraphHistory {
    fn push(&mut self, value: f64) {
        self.samples.push_back(value);
        // A zero reading counts as 1 so an idle graph never divides by zero.
        let scaled = if value == 0.0 { 1.0 } else { value };
        self.peak = self.peak.max(scaled);
    }

    fn trim(&mut self, capacity: usize) {
        self.capacity = capacity;
        let excess = self.samples.len().saturating_sub(capacity);
        self.samples.drain(..excess);
    }

    /// `hard_max` when given and positive, otherwise the running peak.
    ///
    /// The peak never decreases, so one spike compresses the scale until a
    /// bigger one arrives.
    pub fn ceiling(&self, hard_max: Option<f64>) -> f64 {
        match hard_max {
            Some(max) if max > 0.0 => max,
            _ if self.peak > 0.0 => self.peak,
            _ => 1.0,
        }
    }

    /// Oldest first.
    pub fn samples(&self) -> impl DoubleEndedIterator<Item = f64> + '_ {
        self.samples.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Capacity applied by the most recent draw.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// What a single draw did, for callers that want to inspect it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GraphFrame {
    pub ceiling:  f64,
    pub capacity: usize,
    pub retained: usize,
}

/// Named history graphs, drawn by name so several coexist on one canvas.
#[derive(Debug, Default)]
pub struct RadialGraph {
    histories: Mutex<HashMap<String, GraphHistory>>,
}

impl RadialGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one value from `source` to graph `name` and draw it.
    ///
    /// A failing source propagates unchanged and leaves both the history
    /// and the canvas untouched.  The canvas stroke width is restored on
    /// return.
    pub fn draw<C, V>(&self, name: &str, canvas: &mut C, spec: &ArcSpec, source: &V) -> Result<GraphFrame>
    where
        C: Canvas + ?Sized,
        V: ValueSource + ?Sized,
    {
        let value = source.produce()?;

        let mut histories = self.histories.lock().unwrap_or_else(PoisonError::into_inner);
        let history = histories.entry(name.to_owned()).or_insert_with(|| {
            debug!(graph = name, "starting history");
            GraphHistory::default()
        });
        history.push(value);

        let mut canvas = LineWidthGuard::new(canvas);
        if spec.border {
            draw_border(&mut *canvas, spec);
        }

        let ceiling = history.ceiling(spec.hard_max);
        let capacity = spec.capacity();
        if capacity != history.capacity() {
            debug!(graph = name, from = history.capacity(), to = capacity, "history capacity changed");
        }
        history.trim(capacity);

        let ordered: Vec<f64> = if spec.flip {
            history.samples().rev().collect()
        } else {
            history.samples().collect()
        };

        let half = spec.half_width();
        for (i, sample) in ordered.into_iter().enumerate() {
            let offset = sample / ceiling * half;
            let slot = slot_angle(i, capacity, spec.start, spec.end, spec.negative);
            let radius = spec.radius - half + offset;

            canvas.set_line_width(offset * 2.0);
            if spec.negative {
                canvas.arc_negative(spec.center, radius, radians(slot), radians(slot - 1.0));
            } else {
                canvas.arc(spec.center, radius, radians(slot - 1.0), radians(slot));
            }
            canvas.stroke();
        }

        Ok(GraphFrame {
            ceiling,
            capacity,
            retained: history.len(),
        })
    }

    /// Copy of graph `name`'s history, if it has been drawn.
    pub fn history(&self, name: &str) -> Option<GraphHistory> {
        self.histories
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }
}

/// Thin outline around the whole track.
fn draw_border<C: Canvas + ?Sized>(canvas: &mut C, spec: &ArcSpec) {
    let half = spec.half_width();
    canvas.set_line_width(1.0);
    canvas.arc(spec.center, spec.radius + half, radians(spec.start), radians(spec.end));
    canvas.arc_negative(spec.center, spec.radius - half, radians(spec.end), radians(spec.start));
    canvas.close_path();
    canvas.stroke();
}
