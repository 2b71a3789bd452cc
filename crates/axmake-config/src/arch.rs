//! Supported architectures and their default platform table.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Target CPU architecture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Arch {
    #[serde(rename = "x86_64")]
    X86_64,
    #[serde(rename = "riscv64")]
    RiscV64,
    #[serde(rename = "aarch64")]
    AArch64,
}

/// Device bus used by the emulated machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bus {
    Pci,
    Mmio,
}

/// Row of the per-architecture defaults table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArchDefaults {
    /// Platform used when none is given.
    pub platform_name: &'static str,
    /// Compiler target triple.
    pub target_triple: &'static str,
    /// Bus forced by the architecture, if any.
    pub bus: Option<Bus>,
    /// Whether hardware acceleration is wanted (subject to host support).
    pub accel: bool,
}

impl Arch {
    /// All supported architectures.
    pub const ALL: [Arch; 3] = [Arch::X86_64, Arch::RiscV64, Arch::AArch64];

    /// Canonical name, as used in `ARCH`.
    pub fn as_str(self) -> &'static str {
        match self {
            Arch::X86_64 => "x86_64",
            Arch::RiscV64 => "riscv64",
            Arch::AArch64 => "aarch64",
        }
    }

    /// Default platform, target triple, bus and acceleration for this arch.
    pub fn defaults(self) -> ArchDefaults {
        match self {
            Arch::X86_64 => ArchDefaults {
                platform_name: "x86_64-qemu-q35",
                target_triple: "x86_64-unknown-none",
                bus: Some(Bus::Pci),
                accel: true,
            },
            Arch::RiscV64 => ArchDefaults {
                platform_name: "riscv64-qemu-virt",
                target_triple: "riscv64gc-unknown-none-elf",
                bus: None,
                accel: false,
            },
            Arch::AArch64 => ArchDefaults {
                platform_name: "aarch64-qemu-virt",
                target_triple: "aarch64-unknown-none-softfloat",
                bus: None,
                accel: false,
            },
        }
    }

    /// Architecture encoded as the prefix of a platform identifier
    /// (`riscv64-qemu-virt` -> `riscv64`).
    pub fn platform_prefix(platform: &str) -> &str {
        platform.split('-').next().unwrap_or(platform)
    }

    fn accepted() -> Vec<String> {
        Arch::ALL.iter().map(|a| a.as_str().to_string()).collect()
    }
}

impl FromStr for Arch {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Arch::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| ConfigError::InvalidArch {
                value: s.to_string(),
                accepted: Arch::accepted(),
            })
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Bus {
    pub fn as_str(self) -> &'static str {
        match self {
            Bus::Pci => "pci",
            Bus::Mmio => "mmio",
        }
    }
}

impl FromStr for Bus {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pci" => Ok(Bus::Pci),
            "mmio" => Ok(Bus::Mmio),
            _ => Err(ConfigError::InvalidOption {
                name: "BUS",
                value: s.to_string(),
                accepted: "\"pci\" or \"mmio\"".into(),
            }),
        }
    }
}

impl fmt::Display for Bus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
