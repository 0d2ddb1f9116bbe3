//! Drawing for the overlay's radial gauges.
//!
//! Everything draws through the [`Canvas`] trait, so gauges are tested
//! against a [`RecordingCanvas`] and painted through an [`IcedCanvas`].

pub mod canvas;
pub mod gauge;
pub mod geometry;
pub mod graph;
pub mod iced_canvas;
pub mod recording;

pub use canvas::{Canvas, LineWidthGuard};
pub use gauge::{BatteryArc, PercentArc};
pub use geometry::{radians, slot_angle, Point};
pub use graph::{ArcSpec, GraphFrame, GraphHistory, RadialGraph};
pub use iced_canvas::IcedCanvas;
pub use recording::{Op, RecordingCanvas};
