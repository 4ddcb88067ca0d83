//! Unified error types for the BattMon firmware.
//!
//! Every subsystem has its own small `Copy` enum; all of them convert into
//! the top-level [`Error`] so the binary edge can funnel them through
//! `anyhow`. None of these conditions is fatal to a running task: monitors
//! treat a [`HardwareFault`] as "no breach this cycle", the alarm coordinator
//! treats it as "stay active", and the console reports command errors back to
//! the operator.

use core::fmt;

use crate::pins::Pin;

/// Largest raw value an ADC sample or injected debug value may take.
pub const RAW_MAX: u16 = 4095;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A hardware primitive (ADC, GPIO) failed.
    Hardware(HardwareFault),
    /// An operator-supplied value failed range validation.
    Validation(ValidationError),
    /// A console command could not be executed.
    Command(CommandError),
    /// The console transport failed.
    Console(ConsoleError),
    /// Configuration is invalid.
    Config(ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hardware(e) => write!(f, "hardware: {e}"),
            Self::Validation(e) => write!(f, "validation: {e}"),
            Self::Command(e) => write!(f, "command: {e}"),
            Self::Console(e) => write!(f, "console: {e}"),
            Self::Config(e) => write!(f, "config: {e}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Hardware faults
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HardwareFault {
    /// ADC conversion failed or the pin has no ADC channel.
    AdcReadFailed(Pin),
    /// GPIO level could not be read.
    GpioReadFailed(Pin),
    /// GPIO level could not be driven.
    GpioWriteFailed(Pin),
    /// Pin direction could not be configured.
    ConfigureFailed(Pin),
    /// The primitive returned a value outside `0..=4095`.
    OutOfRange(Pin),
}

impl fmt::Display for HardwareFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AdcReadFailed(pin) => write!(f, "ADC read failed on GPIO{pin}"),
            Self::GpioReadFailed(pin) => write!(f, "GPIO read failed on GPIO{pin}"),
            Self::GpioWriteFailed(pin) => write!(f, "GPIO write failed on GPIO{pin}"),
            Self::ConfigureFailed(pin) => write!(f, "pin configure failed on GPIO{pin}"),
            Self::OutOfRange(pin) => write!(f, "reading out of range on GPIO{pin}"),
        }
    }
}

impl std::error::Error for HardwareFault {}

impl From<HardwareFault> for Error {
    fn from(e: HardwareFault) -> Self {
        Self::Hardware(e)
    }
}

// ---------------------------------------------------------------------------
// Validation errors
// ---------------------------------------------------------------------------

/// Rejected debug value. The stored value is left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    Negative(i32),
    AboveMax(i32),
}

impl ValidationError {
    /// Check that `value` fits the 12-bit raw range.
    pub fn check_raw(value: i32) -> core::result::Result<u16, Self> {
        if value < 0 {
            Err(Self::Negative(value))
        } else if value > i32::from(RAW_MAX) {
            Err(Self::AboveMax(value))
        } else {
            Ok(value as u16)
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Negative(v) => write!(f, "value {v} must not be negative"),
            Self::AboveMax(v) => write!(f, "value {v} must not exceed {RAW_MAX}"),
        }
    }
}

impl std::error::Error for ValidationError {}

impl From<ValidationError> for Error {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

// ---------------------------------------------------------------------------
// Command errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandError {
    /// No entry in the command table for this key.
    Unknown,
    /// Arguments did not match the command's syntax; carries the usage line.
    Usage(&'static str),
    /// `:set_debug` flag letter not one of `b`, `t`, `l`.
    UnknownFlag(char),
    /// The value parsed but failed range validation.
    Invalid(ValidationError),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown => write!(f, "unknown command (try :help)"),
            Self::Usage(usage) => write!(f, "usage: {usage}"),
            Self::UnknownFlag(c) => write!(f, "unknown flag '{c}', use b, t or l"),
            Self::Invalid(e) => write!(f, "invalid value: {e}"),
        }
    }
}

impl std::error::Error for CommandError {}

impl From<ValidationError> for CommandError {
    fn from(e: ValidationError) -> Self {
        Self::Invalid(e)
    }
}

impl From<CommandError> for Error {
    fn from(e: CommandError) -> Self {
        Self::Command(e)
    }
}

// ---------------------------------------------------------------------------
// Console errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleError {
    /// The input side has been closed (reader thread gone, stdin EOF).
    Closed,
    /// Writing a reply failed.
    WriteFailed,
}

impl fmt::Display for ConsoleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Closed => write!(f, "input closed"),
            Self::WriteFailed => write!(f, "write failed"),
        }
    }
}

impl std::error::Error for ConsoleError {}

impl From<ConsoleError> for Error {
    fn from(e: ConsoleError) -> Self {
        Self::Console(e)
    }
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// The supplied document could not be parsed.
    Corrupted,
    /// A field failed range validation; names the field.
    ValidationFailed(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(field) => write!(f, "validation failed: {field}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
