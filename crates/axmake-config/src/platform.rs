//! Platform identifiers, platform definition files and the resolved
//! [`PlatformSpec`].
//!
//! Built-in platforms are the definition files found in `<root>/platforms/`;
//! their identifier is the file name without extension. A custom platform is
//! any other TOML file carrying top-level `platform` and `arch` keys.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::arch::{Arch, Bus};
use crate::error::{ConfigError, Result};

/// Directory, relative to the workspace root, holding built-in platforms.
pub const PLATFORMS_DIR: &str = "platforms";

/// Fully resolved target platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlatformSpec {
    /// Target architecture.
    pub arch: Arch,
    /// Platform identifier. Empty when resolution was skipped for unit tests.
    pub platform_name: String,
    /// Compiler target triple.
    pub target_triple: String,
    /// Device bus.
    pub bus: Bus,
    /// Whether hardware acceleration is enabled.
    pub accel: bool,
}

/// The keys of a platform definition file that matter for resolution.
///
/// Every other key and table in the file is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PlatformFile {
    /// Platform identifier.
    #[serde(default)]
    pub platform: Option<String>,
    /// Architecture name.
    #[serde(default)]
    pub arch: Option<String>,
}

impl PlatformFile {
    /// Load a platform definition from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content).map_err(|source| ConfigError::PlatformFile {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse a platform definition from a TOML string.
    pub fn parse(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

/// A platform chosen through `PLATFORM`, before cross-checking with `ARCH`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplicitPlatform {
    /// Resolved platform identifier.
    pub name: String,
    /// Architecture the platform implies.
    pub arch: Arch,
    /// Definition file, for custom platforms.
    pub file: Option<PathBuf>,
}

/// List the built-in platform identifiers under `root`, sorted.
///
/// A missing platforms directory yields an empty list.
pub fn builtin_platforms(root: &Path) -> Result<Vec<String>> {
    let dir = root.join(PLATFORMS_DIR);
    let entries = match fs::read_dir(&dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::debug!("no platforms directory at {}", dir.display());
            return Ok(Vec::new());
        }
        Err(e) => return Err(e.into()),
    };

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let file_name = entry.file_name();
        let name = identifier_of(Path::new(&file_name));
        if !name.is_empty() {
            names.push(name);
        }
    }
    names.sort();
    names.dedup();
    Ok(names)
}

/// Resolve an explicit `PLATFORM` value against the built-in set, then
/// against the filesystem.
pub fn resolve_explicit(value: &str, root: &Path) -> Result<ExplicitPlatform> {
    let builtin = builtin_platforms(root)?;

    if builtin.iter().any(|b| b == value) {
        let arch = Arch::platform_prefix(value).parse()?;
        log::debug!("using built-in platform {value}");
        return Ok(ExplicitPlatform {
            name: value.to_string(),
            arch,
            file: None,
        });
    }

    let path = root.join(value);
    if path.is_file() {
        let def = PlatformFile::load(&path)?;
        let name = def.platform.unwrap_or_else(|| identifier_of(&path));
        let arch: Arch = match def.arch {
            Some(arch) => arch.parse()?,
            None => Arch::platform_prefix(&name).parse()?,
        };
        let prefix = Arch::platform_prefix(&name);
        if prefix != arch.as_str() {
            return Err(ConfigError::IncompatiblePlatformArch {
                arch: arch.to_string(),
                platform: value.to_string(),
                platform_arch: prefix.to_string(),
            });
        }
        log::debug!("using custom platform {name} from {}", path.display());
        return Ok(ExplicitPlatform {
            name,
            arch,
            file: Some(path),
        });
    }

    Err(ConfigError::InvalidPlatform {
        value: value.to_string(),
        builtin,
    })
}

/// File name up to the first `.`.
fn identifier_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy())
        .and_then(|n| n.split('.').next().map(str::to_string))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn workspace_with(platforms: &[&str]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let pdir = dir.path().join(PLATFORMS_DIR);
        fs::create_dir(&pdir).unwrap();
        for p in platforms {
            fs::write(pdir.join(format!("{p}.toml")), "").unwrap();
        }
        dir
    }

    #[test]
    fn lists_builtins_without_extension() {
        let dir = workspace_with(&["x86_64-qemu-q35", "riscv64-qemu-virt"]);
        fs::create_dir(dir.path().join(PLATFORMS_DIR).join("nested")).unwrap();
        let names = builtin_platforms(dir.path()).unwrap();
        assert_eq!(names, vec!["riscv64-qemu-virt", "x86_64-qemu-q35"]);
    }

    #[test]
    fn missing_platforms_dir_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(builtin_platforms(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn builtin_implies_prefix_arch() {
        let dir = workspace_with(&["aarch64-raspi4"]);
        let p = resolve_explicit("aarch64-raspi4", dir.path()).unwrap();
        assert_eq!(p.name, "aarch64-raspi4");
        assert_eq!(p.arch, Arch::AArch64);
        assert!(p.file.is_none());
    }

    #[test]
    fn custom_file_reads_both_keys() {
        let dir = workspace_with(&[]);
        let content = r#"
# Architecture identifier.
arch = "riscv64"
# Platform identifier.
platform = "riscv64-custom-board"

[kernel]
phys-memory-base = 0x8000_0000
"#;
        fs::write(dir.path().join("board.toml"), content).unwrap();
        let p = resolve_explicit("board.toml", dir.path()).unwrap();
        assert_eq!(p.name, "riscv64-custom-board");
        assert_eq!(p.arch, Arch::RiscV64);
        assert_eq!(p.file.as_deref(), Some(dir.path().join("board.toml").as_path()));
    }

    #[test]
    fn custom_file_tolerates_missing_keys() {
        let dir = workspace_with(&[]);
        fs::write(dir.path().join("aarch64-myboard.toml"), "[devices]\nmmio = []\n").unwrap();
        let p = resolve_explicit("aarch64-myboard.toml", dir.path()).unwrap();
        assert_eq!(p.name, "aarch64-myboard");
        assert_eq!(p.arch, Arch::AArch64);
    }

    #[test]
    fn custom_file_arch_must_match_name() {
        let dir = workspace_with(&[]);
        fs::write(
            dir.path().join("board.toml"),
            "platform = \"riscv64-qemu-virt\"\narch = \"aarch64\"\n",
        )
        .unwrap();
        match resolve_explicit("board.toml", dir.path()) {
            Err(ConfigError::IncompatiblePlatformArch {
                arch,
                platform,
                platform_arch,
            }) => {
                assert_eq!(arch, "aarch64");
                assert_eq!(platform, "board.toml");
                assert_eq!(platform_arch, "riscv64");
            }
            other => panic!("expected IncompatiblePlatformArch, got {other:?}"),
        }
    }

    #[test]
    fn custom_file_with_unknown_arch() {
        let dir = workspace_with(&[]);
        fs::write(dir.path().join("odd.toml"), "arch = \"sparc\"\n").unwrap();
        assert!(matches!(
            resolve_explicit("odd.toml", dir.path()),
            Err(ConfigError::InvalidArch { .. })
        ));
    }

    #[test]
    fn malformed_file_reports_path() {
        let dir = workspace_with(&[]);
        fs::write(dir.path().join("bad.toml"), "arch = \n").unwrap();
        assert!(matches!(
            resolve_explicit("bad.toml", dir.path()),
            Err(ConfigError::PlatformFile { .. })
        ));
    }

    #[test]
    fn unknown_platform_lists_builtins() {
        let dir = workspace_with(&["x86_64-qemu-q35"]);
        match resolve_explicit("pc-98", dir.path()) {
            Err(ConfigError::InvalidPlatform { value, builtin }) => {
                assert_eq!(value, "pc-98");
                assert_eq!(builtin, vec!["x86_64-qemu-q35"]);
            }
            other => panic!("expected InvalidPlatform, got {other:?}"),
        }
    }
}
