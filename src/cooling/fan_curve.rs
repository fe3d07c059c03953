//! Fan curve tables for the ATK ACPI fan-curve command.
//!
//! A curve is written as a comma-separated list of `<temp>c:<percent>%`
//! breakpoints, e.g. `39c:0%,49c:0%,59c:10%`. The firmware expects a
//! fixed 16-byte table, so at most 8 breakpoints are accepted.

use std::fmt;
use std::str::FromStr;

use crate::error::{Result, ThermalError};

// =============================================================================
// Constants
// =============================================================================

/// Maximum number of breakpoints in a fan-curve table.
pub const MAX_CURVE_POINTS: usize = 8;

/// Length of the serialized fan-curve table in bytes.
pub const CURVE_PAYLOAD_LENGTH: usize = 2 * MAX_CURVE_POINTS;

/// Filler byte for table slots with no breakpoint.
pub const UNUSED_SLOT: u8 = 0xFF;

/// Maximum fan speed percentage.
pub const MAX_PERCENT: u8 = 100;

// =============================================================================
// Curve Point
// =============================================================================

/// A single (temperature, fan speed) breakpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurvePoint {
    /// Temperature in Celsius.
    pub temp_c: u8,
    /// Fan speed percentage (0-100).
    pub percent: u8,
}

impl CurvePoint {
    /// Parse one `<temp>c:<percent>%` entry.
    fn parse(entry: &str) -> Result<Self> {
        let invalid = |reason| ThermalError::InvalidCurveEntry {
            entry: entry.to_string(),
            reason,
        };

        let (temp, percent) = entry.split_once(':').ok_or_else(|| invalid("missing ':'"))?;
        let temp = temp
            .strip_suffix('c')
            .ok_or_else(|| invalid("temperature must end with 'c'"))?;
        let percent = percent
            .strip_suffix('%')
            .ok_or_else(|| invalid("percentage must end with '%'"))?;

        let temp_c =
            parse_byte(temp).ok_or_else(|| invalid("temperature is not an integer 0-255"))?;
        let percent =
            parse_byte(percent).ok_or_else(|| invalid("percentage is not an integer 0-100"))?;
        if percent > MAX_PERCENT {
            return Err(invalid("percentage is not an integer 0-100"));
        }

        Ok(Self { temp_c, percent })
    }
}

impl fmt::Display for CurvePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}c:{}%", self.temp_c, self.percent)
    }
}

/// Plain unsigned decimal only: no sign, no whitespace.
fn parse_byte(s: &str) -> Option<u8> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

// =============================================================================
// Fan Curve
// =============================================================================

/// Parsed fan curve, breakpoints kept in input order.
///
/// # Example
///
/// ```
/// use rog_thermal::cooling::FanCurve;
///
/// let curve = FanCurve::parse("39c:0%,79c:31%,109c:56%").unwrap();
/// assert_eq!(curve.len(), 3);
///
/// let bytes = curve.to_bytes();
/// assert_eq!(&bytes[..6], &[39, 0, 79, 31, 109, 56]);
/// assert!(bytes[6..].iter().all(|&b| b == 0xFF));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FanCurve {
    points: Vec<CurvePoint>,
}

impl FanCurve {
    /// Parse a curve string of 1 to 8 comma-separated breakpoints.
    ///
    /// # Errors
    /// - `EmptyCurve` for an empty string
    /// - `TooManyPoints` for more than 8 entries
    /// - `InvalidCurveEntry` naming the first malformed entry
    pub fn parse(input: &str) -> Result<Self> {
        if input.is_empty() {
            return Err(ThermalError::EmptyCurve);
        }

        let entries: Vec<&str> = input.split(',').collect();
        if entries.len() > MAX_CURVE_POINTS {
            return Err(ThermalError::TooManyPoints {
                count: entries.len(),
                max: MAX_CURVE_POINTS,
            });
        }

        let points = entries
            .into_iter()
            .map(CurvePoint::parse)
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { points })
    }

    /// Breakpoints in the order they were given.
    pub fn points(&self) -> &[CurvePoint] {
        &self.points
    }

    /// Number of breakpoints.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Serialize to the 16-byte firmware table.
    ///
    /// Each breakpoint takes two bytes (temperature, percentage). Slots past
    /// the last breakpoint are filled with [`UNUSED_SLOT`].
    pub fn to_bytes(&self) -> [u8; CURVE_PAYLOAD_LENGTH] {
        let mut buf = [UNUSED_SLOT; CURVE_PAYLOAD_LENGTH];
        for (slot, point) in buf.chunks_exact_mut(2).zip(&self.points) {
            slot[0] = point.temp_c;
            slot[1] = point.percent;
        }
        buf
    }
}

impl FromStr for FanCurve {
    type Err = ThermalError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for FanCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, point) in self.points.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", point)?;
        }
        Ok(())
    }
}
