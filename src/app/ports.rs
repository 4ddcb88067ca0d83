//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ tasks / alarm coordinator / dispatcher
//! ```
//!
//! Driven adapters (GPIO/ADC, serial console, event sinks) implement these
//! traits. The domain core only sees the traits, so host tests swap in
//! in-memory fakes for the ESP-IDF adapters.

use core::time::Duration;

use crate::error::{ConsoleError, HardwareFault};
use crate::pins::Pin;

use super::events::AppEvent;

/// Maximum console line length (bytes, excluding the terminator).
pub const LINE_CAPACITY: usize = 128;

/// One complete console line, terminator stripped.
pub type Line = heapless::String<LINE_CAPACITY>;

// ───────────────────────────────────────────────────────────────
// Hardware port (driven adapter: GPIO / ADC primitives)
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinDirection {
    Input,
    Output,
}

/// Raw pin primitives.
///
/// Shared by every task, so all methods take `&self`; implementations do
/// their own synchronisation. Every operation may fail with a
/// [`HardwareFault`] naming the pin.
pub trait HardwarePort: Send + Sync {
    fn configure(&self, pin: Pin, direction: PinDirection) -> Result<(), HardwareFault>;

    /// 12-bit one-shot conversion. Well-behaved adapters return `0..=4095`.
    fn read_analog(&self, pin: Pin) -> Result<u16, HardwareFault>;

    fn read_digital(&self, pin: Pin) -> Result<bool, HardwareFault>;

    fn write_digital(&self, pin: Pin, level: bool) -> Result<(), HardwareFault>;
}

// ───────────────────────────────────────────────────────────────
// Console port (driven adapter: serial line transport)
// ───────────────────────────────────────────────────────────────

/// Line-oriented operator console.
pub trait ConsolePort {
    /// Number of complete lines queued and not yet read.
    fn lines_available(&self) -> usize;

    /// Wait at most `timeout` for a line. `Ok(None)` means the wait timed out.
    fn read_line(&mut self, timeout: Duration) -> Result<Option<Line>, ConsoleError>;

    fn write_str(&mut self, text: &str) -> Result<(), ConsoleError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`]s through this port.
/// Adapters decide where they go (serial log, test recorder, ...).
pub trait EventSink {
    fn emit(&mut self, event: &AppEvent);
}
