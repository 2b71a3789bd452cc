//! Configuration resolution.
//!
//! Turns [`RawParameters`] into a single immutable [`ResolvedConfig`]. The
//! steps run in a fixed order and the first failure aborts resolution:
//!
//! 1. application path and kind
//! 2. architecture and platform (unit tests, explicit `PLATFORM`, or `ARCH` table)
//! 3. target triple, bus and acceleration
//! 4. toolchain names
//! 5. output paths

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::arch::{Arch, Bus};
use crate::error::{ConfigError, Result};
use crate::host::HostProbe;
use crate::options::{
    parse_smp, parse_toggle, parse_verbosity, split_features, LogLevel, Mode, NetDev,
};
use crate::params::{Param, RawParameters};
use crate::platform::{self, PlatformSpec};
use crate::toolchain::Toolchain;

/// Commands that run host-side and need no target platform.
pub const UNIT_TEST_COMMANDS: [&str; 2] = ["unittest", "unittest_no_fail_fast"];

/// Directory, relative to the workspace root, holding linker scripts.
pub const LINKER_SCRIPT_DIR: &str = "modules/axhal";

/// Manifest whose presence marks a Rust application.
pub const RUST_MANIFEST: &str = "Cargo.toml";

/// Whether `command` is one of the host-side unit test commands.
pub fn is_unit_test_command(command: &str) -> bool {
    UNIT_TEST_COMMANDS.contains(&command)
}

/// Implementation language of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AppKind {
    /// Has a `Cargo.toml`.
    Rust,
    /// No manifest; built with the C rules.
    C,
}

impl AppKind {
    /// Value of `APP_TYPE` for the build makefile.
    pub fn as_str(self) -> &'static str {
        match self {
            AppKind::Rust => "rust",
            AppKind::C => "c",
        }
    }
}

/// The application being built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppDescriptor {
    /// Path as supplied, relative to the workspace root unless absolute.
    pub path: PathBuf,
    pub kind: AppKind,
}

impl AppDescriptor {
    /// Detect the application kind at `path`.
    pub fn detect(root: &Path, path: &Path) -> Result<Self> {
        let location = root.join(path);
        if !location.exists() {
            return Err(ConfigError::InvalidAppPath {
                path: path.to_path_buf(),
            });
        }
        let kind = if location.join(RUST_MANIFEST).is_file() {
            AppKind::Rust
        } else {
            AppKind::C
        };
        Ok(Self {
            path: path.to_path_buf(),
            kind,
        })
    }

    /// Base name of the application directory.
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.to_string_lossy().into_owned())
    }
}

/// Guest network settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetworkOptions {
    pub ip: String,
    pub gateway: String,
    pub backend: NetDev,
}

/// Emulator device and tracing toggles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QemuOptions {
    pub blk: bool,
    pub net: bool,
    pub graphic: bool,
    pub disk_img: PathBuf,
    pub qemu_log: bool,
    pub net_dump: bool,
}

/// Paths derived from the application and platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputPaths {
    pub out_dir: PathBuf,
    pub ld_script: PathBuf,
    pub out_elf: PathBuf,
    pub out_bin: PathBuf,
}

/// A complete, validated build configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedConfig {
    /// Workspace root; external commands run here.
    pub root: PathBuf,
    pub app: AppDescriptor,
    pub platform: PlatformSpec,
    pub smp: u32,
    pub mode: Mode,
    pub log: LogLevel,
    pub verbose: u8,
    pub features: Vec<String>,
    pub app_features: Vec<String>,
    pub network: NetworkOptions,
    pub qemu: QemuOptions,
    pub paths: OutputPaths,
    pub toolchain: Toolchain,
}

impl ResolvedConfig {
    /// Variables exported to every external build step.
    pub fn build_env(&self) -> BTreeMap<&'static str, String> {
        BTreeMap::from([
            ("AX_ARCH", self.platform.arch.to_string()),
            ("AX_PLATFORM", self.platform.platform_name.clone()),
            ("AX_SMP", self.smp.to_string()),
            ("AX_MODE", self.mode.to_string()),
            ("AX_LOG", self.log.to_string()),
            ("AX_TARGET", self.platform.target_triple.clone()),
            ("AX_IP", self.network.ip.clone()),
            ("AX_GW", self.network.gateway.clone()),
        ])
    }

    /// Resolve a path from the configuration against the workspace root.
    pub fn in_root(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }
}

/// Resolves raw parameters for one workspace.
pub struct Resolver<'h> {
    root: PathBuf,
    host: &'h dyn HostProbe,
}

impl<'h> Resolver<'h> {
    pub fn new(root: impl Into<PathBuf>, host: &'h dyn HostProbe) -> Self {
        Self {
            root: root.into(),
            host,
        }
    }

    /// Resolve `params` for the given command name.
    pub fn resolve(&self, params: &RawParameters, command: &str) -> Result<ResolvedConfig> {
        let app = AppDescriptor::detect(&self.root, Path::new(params.get(Param::App)))?;
        log::debug!("application {} is {}", app.path.display(), app.kind.as_str());

        let (arch, platform_name) = self.resolve_arch_platform(params, command)?;

        let defaults = arch.defaults();
        let requested_bus: Bus = params.get(Param::Bus).parse()?;
        let bus = defaults.bus.unwrap_or(requested_bus);
        let accel = defaults.accel && !self.host.is_wsl();

        let platform = PlatformSpec {
            arch,
            platform_name,
            target_triple: defaults.target_triple.to_string(),
            bus,
            accel,
        };
        log::info!(
            "resolved arch={} platform={} target={} bus={} accel={}",
            platform.arch,
            platform.platform_name,
            platform.target_triple,
            platform.bus,
            platform.accel
        );

        let paths = self.output_paths(&app, &platform.platform_name);

        Ok(ResolvedConfig {
            root: self.root.clone(),
            smp: parse_smp(params.get(Param::Smp))?,
            mode: params.get(Param::Mode).parse()?,
            log: params.get(Param::Log).parse()?,
            verbose: parse_verbosity(params.get(Param::Verbose))?,
            features: split_features(params.get(Param::Features)),
            app_features: split_features(params.get(Param::AppFeatures)),
            network: NetworkOptions {
                ip: params.get(Param::Ip).to_string(),
                gateway: params.get(Param::Gw).to_string(),
                backend: params.get(Param::NetDev).parse()?,
            },
            qemu: QemuOptions {
                blk: toggle(params, Param::Blk)?,
                net: toggle(params, Param::Net)?,
                graphic: toggle(params, Param::Graphic)?,
                disk_img: PathBuf::from(params.get(Param::DiskImg)),
                qemu_log: toggle(params, Param::QemuLog)?,
                net_dump: toggle(params, Param::NetDump)?,
            },
            toolchain: Toolchain::for_arch(arch),
            paths,
            platform,
            app,
        })
    }

    fn resolve_arch_platform(&self, params: &RawParameters, command: &str) -> Result<(Arch, String)> {
        if is_unit_test_command(command) {
            log::debug!("{command} runs on the host, skipping platform resolution");
            let arch = params.get(Param::Arch).parse()?;
            return Ok((arch, String::new()));
        }

        if params.is_explicit(Param::Platform) {
            let requested = params.get(Param::Platform);
            let explicit = platform::resolve_explicit(requested, &self.root)?;
            let arch_param = params.get(Param::Arch);
            if params.is_explicit(Param::Arch) && arch_param != explicit.arch.as_str() {
                return Err(ConfigError::IncompatiblePlatformArch {
                    arch: arch_param.to_string(),
                    platform: requested.to_string(),
                    platform_arch: explicit.arch.to_string(),
                });
            }
            return Ok((explicit.arch, explicit.name));
        }

        let arch: Arch = params.get(Param::Arch).parse()?;
        Ok((arch, arch.defaults().platform_name.to_string()))
    }

    fn output_paths(&self, app: &AppDescriptor, platform_name: &str) -> OutputPaths {
        let out_dir = app.path.clone();
        let stem = format!("{}_{platform_name}", app.name());
        OutputPaths {
            ld_script: self
                .root
                .join(LINKER_SCRIPT_DIR)
                .join(format!("linker_{platform_name}.lds")),
            out_elf: out_dir.join(format!("{stem}.elf")),
            out_bin: out_dir.join(format!("{stem}.bin")),
            out_dir,
        }
    }
}

fn toggle(params: &RawParameters, param: Param) -> Result<bool> {
    parse_toggle(param.name(), params.get(param))
}
