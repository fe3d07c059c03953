//! Fan curve model.
//!
//! Parses breakpoint strings and serializes them into firmware fan tables.

mod fan_curve;

pub use fan_curve::{CURVE_PAYLOAD_LENGTH, CurvePoint, FanCurve, MAX_CURVE_POINTS, UNUSED_SLOT};
