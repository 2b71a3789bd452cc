//! Typed interpretation of the general, network and QEMU options.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Build mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Release,
    Debug,
}

/// Kernel log level passed to the build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// QEMU network backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetDev {
    User,
    Tap,
    Bridge,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Release => "release",
            Mode::Debug => "debug",
        }
    }
}

impl FromStr for Mode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "release" => Ok(Mode::Release),
            "debug" => Ok(Mode::Debug),
            _ => Err(invalid("MODE", s, "\"release\" or \"debug\"")),
        }
    }
}

impl LogLevel {
    const ALL: [LogLevel; 6] = [
        LogLevel::Off,
        LogLevel::Error,
        LogLevel::Warn,
        LogLevel::Info,
        LogLevel::Debug,
        LogLevel::Trace,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Off => "off",
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        LogLevel::ALL
            .into_iter()
            .find(|l| l.as_str() == s)
            .ok_or_else(|| invalid("LOG", s, "one of off, error, warn, info, debug, trace"))
    }
}

impl NetDev {
    pub fn as_str(self) -> &'static str {
        match self {
            NetDev::User => "user",
            NetDev::Tap => "tap",
            NetDev::Bridge => "bridge",
        }
    }
}

impl FromStr for NetDev {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "user" => Ok(NetDev::User),
            "tap" => Ok(NetDev::Tap),
            "bridge" => Ok(NetDev::Bridge),
            _ => Err(invalid("NET_DEV", s, "one of user, tap, bridge")),
        }
    }
}

macro_rules! display_as_str {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        })*
    };
}

display_as_str!(Mode, LogLevel, NetDev);

/// Interpret a `y`/`n` style toggle.
pub fn parse_toggle(name: &'static str, value: &str) -> Result<bool> {
    match value {
        "y" | "yes" | "1" | "true" => Ok(true),
        "n" | "no" | "0" | "false" | "" => Ok(false),
        _ => Err(invalid(name, value, "\"y\" or \"n\"")),
    }
}

/// Parse the CPU count, which must be a positive integer.
pub fn parse_smp(value: &str) -> Result<u32> {
    match value.parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(invalid("SMP", value, "a positive integer")),
    }
}

/// Parse the verbosity level. Empty means quiet.
pub fn parse_verbosity(value: &str) -> Result<u8> {
    if value.is_empty() {
        return Ok(0);
    }
    value
        .parse::<u8>()
        .map_err(|_| invalid("V", value, "empty or a small integer"))
}

/// Split a feature list on commas and whitespace.
pub fn split_features(value: &str) -> Vec<String> {
    value
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn invalid(name: &'static str, value: &str, accepted: &str) -> ConfigError {
    ConfigError::InvalidOption {
        name,
        value: value.to_string(),
        accepted: accepted.to_string(),
    }
}
