//! Operator console commands.
//!
//! A line is `:<key> [args...]`. The key is looked up by exact match in the
//! static [`COMMAND_TABLE`]; the arguments are then parsed into a tagged
//! [`Command`] that the dispatcher executes against the system context.

use crate::error::{CommandError, ValidationError};

use super::context::SensorId;

/// Recognised command keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKey {
    SetBattery,
    SetTemp,
    SetDebug,
    Read,
    Help,
}

/// Static key table. Keys are unique; lookup is exact.
pub const COMMAND_TABLE: &[(&str, CommandKey)] = &[
    (":set_battery", CommandKey::SetBattery),
    (":set_temp", CommandKey::SetTemp),
    (":set_debug", CommandKey::SetDebug),
    (":read", CommandKey::Read),
    (":help", CommandKey::Help),
];

pub fn lookup(key: &str) -> Option<CommandKey> {
    COMMAND_TABLE
        .iter()
        .find(|(name, _)| *name == key)
        .map(|&(_, k)| k)
}

impl CommandKey {
    pub const fn usage(self) -> &'static str {
        match self {
            Self::SetBattery => ":set_battery <0..4095>",
            Self::SetTemp => ":set_temp <0..4095>",
            Self::SetDebug => ":set_debug <0|1> | :set_debug <b|t|l> <0|1>",
            Self::Read => ":read",
            Self::Help => ":help",
        }
    }

    pub const fn summary(self) -> &'static str {
        match self {
            Self::SetBattery => "inject battery raw value",
            Self::SetTemp => "inject temperature raw value",
            Self::SetDebug => "battery+temperature overrides, or one flag (b/t/l)",
            Self::Read => "status report",
            Self::Help => "this text",
        }
    }
}

/// Single debug switch addressed by `:set_debug <flag> <0|1>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebugFlag {
    Sensor(SensorId),
    Logs,
}

impl DebugFlag {
    fn from_letter(c: char) -> Option<Self> {
        match c {
            'b' => Some(Self::Sensor(SensorId::Battery)),
            't' => Some(Self::Sensor(SensorId::Temperature)),
            'l' => Some(Self::Logs),
            _ => None,
        }
    }
}

/// Parsed, validated command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Store a debug raw value (already range-checked).
    Inject { sensor: SensorId, raw: u16 },
    /// Battery and temperature overrides together.
    SetDebugAll(bool),
    SetDebugFlag { flag: DebugFlag, enabled: bool },
    Read,
    Help,
}

impl Command {
    /// Parse the arguments following `key`.
    pub fn parse(key: CommandKey, args: &str) -> Result<Self, CommandError> {
        let mut it = args.split_whitespace();
        let usage = CommandError::Usage(key.usage());

        let cmd = match key {
            CommandKey::SetBattery | CommandKey::SetTemp => {
                let sensor = if key == CommandKey::SetBattery {
                    SensorId::Battery
                } else {
                    SensorId::Temperature
                };
                let value: i32 = it.next().ok_or(usage)?.parse().map_err(|_| usage)?;
                let raw = ValidationError::check_raw(value)?;
                Self::Inject { sensor, raw }
            }
            CommandKey::SetDebug => {
                let first = it.next().ok_or(usage)?;
                match it.next() {
                    None => Self::SetDebugAll(parse_switch(first).ok_or(usage)?),
                    Some(second) => {
                        let mut chars = first.chars();
                        let letter = match (chars.next(), chars.next()) {
                            (Some(c), None) => c,
                            _ => return Err(usage),
                        };
                        let flag =
                            DebugFlag::from_letter(letter).ok_or(CommandError::UnknownFlag(letter))?;
                        let enabled = parse_switch(second).ok_or(usage)?;
                        Self::SetDebugFlag { flag, enabled }
                    }
                }
            }
            CommandKey::Read => Self::Read,
            CommandKey::Help => Self::Help,
        };

        if it.next().is_some() {
            return Err(usage);
        }
        Ok(cmd)
    }

    /// Split a trimmed `:key args` line, look up the key and parse.
    pub fn parse_line(line: &str) -> Result<(CommandKey, Self), CommandError> {
        let (key, args) = line.split_once(' ').unwrap_or((line, ""));
        let key = lookup(key).ok_or(CommandError::Unknown)?;
        Ok((key, Self::parse(key, args)?))
    }
}

fn parse_switch(s: &str) -> Option<bool> {
    match s {
        "0" => Some(false),
        "1" => Some(true),
        _ => None,
    }
}
