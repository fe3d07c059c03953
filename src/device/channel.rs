//! Transport to the platform control interface.
//!
//! The driver handle itself (e.g. `\\.\ATKACPI` opened with
//! [`CONTROL_CODE`](crate::protocol::CONTROL_CODE)) lives outside this crate;
//! anything that can push a buffer and hand back the response implements
//! [`ControlChannel`].

use std::io;

/// Blocking write channel to the ACPI control interface.
///
/// Implementations are addressed once, at construction, by a numeric
/// control code. Each `write` blocks until the device answers or fails.
pub trait ControlChannel {
    /// Control code this channel was opened with.
    fn control_code(&self) -> u32;

    /// Send a command buffer and return the raw response.
    fn write(&mut self, input: &[u8]) -> io::Result<Vec<u8>>;
}

impl<T: ControlChannel + ?Sized> ControlChannel for Box<T> {
    fn control_code(&self) -> u32 {
        (**self).control_code()
    }

    fn write(&mut self, input: &[u8]) -> io::Result<Vec<u8>> {
        (**self).write(input)
    }
}

impl<T: ControlChannel + ?Sized> ControlChannel for &mut T {
    fn control_code(&self) -> u32 {
        (**self).control_code()
    }

    fn write(&mut self, input: &[u8]) -> io::Result<Vec<u8>> {
        (**self).write(input)
    }
}
