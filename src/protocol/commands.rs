//! ATK ACPI command definitions and builders.
//!
//! Both commands go through the `DEVS` (device set) method of the ATK ACPI
//! interface. Buffer layout, all integers little-endian:
//!
//! ```text
//! offset  size  field
//! 0       4     method tag, ASCII "DEVS"
//! 4       4     argument length (device id + value)
//! 8       4     device id
//! 12      n     value (u32 throttle plan, or 16-byte fan-curve table)
//! ```
//!
//! Layout follows the atrofac project: https://github.com/cronosun/atrofac

use std::str::FromStr;

use byteorder::{ByteOrder, LittleEndian};
use serde::{Deserialize, Serialize};

use crate::cooling::CURVE_PAYLOAD_LENGTH;
use crate::error::ThermalError;

// =============================================================================
// Constants
// =============================================================================

/// IOCTL control code of the ATK ACPI interface.
pub const CONTROL_CODE: u32 = 2237452;

/// ACPI method tag for "set device".
pub const METHOD_DEVS: [u8; 4] = *b"DEVS";

/// Length of the method tag plus argument length field.
const HEADER_LENGTH: usize = 8;

/// Offset of the device id field.
pub const DEVICE_ID_OFFSET: usize = 8;

/// Offset of the value field.
pub const VALUE_OFFSET: usize = 12;

/// Throttle plan command buffer length.
pub const THROTTLE_COMMAND_LENGTH: usize = 16;

/// Fan-curve command buffer length.
pub const FAN_CURVE_COMMAND_LENGTH: usize = VALUE_OFFSET + CURVE_PAYLOAD_LENGTH;

/// Device id for the throttle plan setting.
pub const THROTTLE_PLAN_DEVICE_ID: u32 = 0x0012_0075;

/// High half of the fan-curve device id; the low byte selects the fan.
pub const FAN_CURVE_DEVICE_ID_BASE: u32 = 0x0011_0000;

/// Throttle plan command with the plan value left at zero.
pub const THROTTLE_PLAN_TEMPLATE: [u8; THROTTLE_COMMAND_LENGTH] = [
    0x44, 0x45, 0x56, 0x53, 0x08, 0x00, 0x00, 0x00, //
    0x75, 0x00, 0x12, 0x00, 0x00, 0x00, 0x00, 0x00,
];

/// Fan-curve command with the device selector and table unset (0xFF).
pub const FAN_CURVE_TEMPLATE: [u8; FAN_CURVE_COMMAND_LENGTH] = [
    0x44, 0x45, 0x56, 0x53, 0x14, 0x00, 0x00, 0x00, //
    0xFF, 0x00, 0x11, 0x00, 0xFF, 0xFF, 0xFF, 0xFF, //
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, //
    0xFF, 0xFF, 0xFF, 0xFF,
];

// =============================================================================
// Throttle Plan
// =============================================================================

/// Firmware throttle plan (CPU/GPU power limits).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThrottlePlan {
    Performance,
    Turbo,
    Silent,
}

impl ThrottlePlan {
    /// Value written to the throttle plan device.
    pub const fn code(&self) -> u8 {
        match self {
            ThrottlePlan::Performance => 0x00,
            ThrottlePlan::Turbo => 0x01,
            ThrottlePlan::Silent => 0x02,
        }
    }
}

impl FromStr for ThrottlePlan {
    type Err = ThermalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "performance" => Ok(ThrottlePlan::Performance),
            "turbo" => Ok(ThrottlePlan::Turbo),
            "silent" => Ok(ThrottlePlan::Silent),
            _ => Err(ThermalError::UnknownThrottlePlan(s.to_string())),
        }
    }
}

impl std::fmt::Display for ThrottlePlan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ThrottlePlan::Performance => write!(f, "Performance"),
            ThrottlePlan::Turbo => write!(f, "Turbo"),
            ThrottlePlan::Silent => write!(f, "Silent"),
        }
    }
}

// =============================================================================
// Fan Devices
// =============================================================================

/// Fan with a programmable curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FanDevice {
    Cpu,
    Gpu,
}

impl FanDevice {
    /// Device selector byte (low byte of the device id).
    pub const fn selector(&self) -> u8 {
        match self {
            FanDevice::Cpu => 0x24,
            FanDevice::Gpu => 0x25,
        }
    }

    /// Full ACPI device id.
    pub const fn device_id(&self) -> u32 {
        FAN_CURVE_DEVICE_ID_BASE | self.selector() as u32
    }
}

impl std::fmt::Display for FanDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FanDevice::Cpu => write!(f, "CPU"),
            FanDevice::Gpu => write!(f, "GPU"),
        }
    }
}

// =============================================================================
// Command Records
// =============================================================================

/// `DEVS` call setting the throttle plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThrottleCommand {
    pub plan: ThrottlePlan,
}

impl ThrottleCommand {
    pub fn to_bytes(&self) -> [u8; THROTTLE_COMMAND_LENGTH] {
        let mut buf = [0u8; THROTTLE_COMMAND_LENGTH];
        write_header(&mut buf, THROTTLE_PLAN_DEVICE_ID);
        LittleEndian::write_u32(&mut buf[VALUE_OFFSET..], self.plan.code() as u32);
        buf
    }
}

/// `DEVS` call loading a fan-curve table into one fan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FanCurveCommand {
    pub device: FanDevice,
    pub curve: [u8; CURVE_PAYLOAD_LENGTH],
}

impl FanCurveCommand {
    pub fn to_bytes(&self) -> [u8; FAN_CURVE_COMMAND_LENGTH] {
        let mut buf = [0u8; FAN_CURVE_COMMAND_LENGTH];
        write_header(&mut buf, self.device.device_id());
        buf[VALUE_OFFSET..].copy_from_slice(&self.curve);
        buf
    }
}

/// Write method tag, argument length and device id.
fn write_header(buf: &mut [u8], device_id: u32) {
    let arg_length = (buf.len() - HEADER_LENGTH) as u32;
    buf[..4].copy_from_slice(&METHOD_DEVS);
    LittleEndian::write_u32(&mut buf[4..HEADER_LENGTH], arg_length);
    LittleEndian::write_u32(&mut buf[DEVICE_ID_OFFSET..VALUE_OFFSET], device_id);
}

// =============================================================================
// Command Builders
// =============================================================================

/// Build a throttle plan command.
///
/// # Returns
/// A 16-byte buffer: the fixed template with byte 12 set to the plan code.
pub fn build_throttle_cmd(plan: ThrottlePlan) -> [u8; THROTTLE_COMMAND_LENGTH] {
    ThrottleCommand { plan }.to_bytes()
}

/// Build a fan-curve command.
///
/// # Arguments
/// * `device` - Fan to program (CPU or GPU)
/// * `curve` - 16-byte table from [`FanCurve::to_bytes`](crate::cooling::FanCurve::to_bytes)
///
/// # Returns
/// A 28-byte buffer: byte 8 is the device selector, bytes 12..28 the table.
pub fn build_fan_curve_cmd(
    device: FanDevice,
    curve: &[u8; CURVE_PAYLOAD_LENGTH],
) -> [u8; FAN_CURVE_COMMAND_LENGTH] {
    FanCurveCommand {
        device,
        curve: *curve,
    }
    .to_bytes()
}
