//! `config` and `platforms`: report the resolved configuration.

use std::fmt;

use anyhow::{Context, Result};
use axmake_config::{builtin_platforms, Arch, ResolvedConfig};

/// Output format for `--print-config`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ConfigFormat {
    Human,
    Json,
    Toml,
    /// Shell `export` lines for the build environment, suitable for `eval`.
    Env,
}

/// Render the configuration in `format`.
pub fn render(cfg: &ResolvedConfig, format: ConfigFormat) -> Result<String> {
    match format {
        ConfigFormat::Human => Ok(HumanReport(cfg).to_string()),
        ConfigFormat::Json => {
            serde_json::to_string_pretty(cfg).context("serializing configuration to JSON")
        }
        ConfigFormat::Toml => toml::to_string(cfg).context("serializing configuration to TOML"),
        ConfigFormat::Env => Ok(Exports(cfg).to_string()),
    }
}

/// `export` lines for the build environment.
struct Exports<'a>(&'a ResolvedConfig);

impl fmt::Display for Exports<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, value) in self.0.build_env() {
            writeln!(f, "export {key}=\"{value}\"")?;
        }
        Ok(())
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "y"
    } else {
        "n"
    }
}

/// Sectioned, human-readable report.
struct HumanReport<'a>(&'a ResolvedConfig);

impl HumanReport<'_> {
    fn platform(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let platform = &self.0.platform;
        let name = if platform.platform_name.is_empty() {
            "(none)"
        } else {
            platform.platform_name.as_str()
        };
        writeln!(f, "--- Platform ---")?;
        writeln!(f, "  Arch:     {}", platform.arch)?;
        writeln!(f, "  Platform: {name}")?;
        writeln!(f, "  Target:   {}", platform.target_triple)?;
        writeln!(f, "  Bus:      {}", platform.bus)?;
        writeln!(f, "  Accel:    {}", yes_no(platform.accel))
    }

    fn build(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cfg = self.0;
        writeln!(f, "--- Build ---")?;
        writeln!(f, "  SMP:          {}", cfg.smp)?;
        writeln!(f, "  Mode:         {}", cfg.mode)?;
        writeln!(f, "  Log:          {}", cfg.log)?;
        writeln!(f, "  Features:     {}", cfg.features.join(","))?;
        writeln!(f, "  App features: {}", cfg.app_features.join(","))
    }

    fn emulator(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cfg = self.0;
        writeln!(f, "--- Emulator ---")?;
        writeln!(
            f,
            "  Devices:  blk={} net={} graphic={}",
            yes_no(cfg.qemu.blk),
            yes_no(cfg.qemu.net),
            yes_no(cfg.qemu.graphic)
        )?;
        writeln!(f, "  Disk:     {}", cfg.qemu.disk_img.display())?;
        writeln!(
            f,
            "  Network:  {} ip={} gw={}",
            cfg.network.backend, cfg.network.ip, cfg.network.gateway
        )
    }

    fn toolchain(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tc = &self.0.toolchain;
        writeln!(f, "--- Toolchain ---")?;
        writeln!(f, "  Prefix:  {}", tc.cross_compile)?;
        writeln!(f, "  LD:      {}", tc.ld)?;
        writeln!(f, "  OBJDUMP: {}", tc.objdump)?;
        writeln!(f, "  OBJCOPY: {}", tc.objcopy)?;
        writeln!(f, "  GDB:     {}", tc.gdb)
    }

    fn outputs(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let paths = &self.0.paths;
        writeln!(f, "--- Outputs ---")?;
        writeln!(f, "  Linker script: {}", paths.ld_script.display())?;
        writeln!(f, "  ELF:           {}", paths.out_elf.display())?;
        writeln!(f, "  Binary:        {}", paths.out_bin.display())
    }
}

impl fmt::Display for HumanReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cfg = self.0;
        writeln!(f, "=== Build configuration ===")?;
        writeln!(f, "Root: {}", cfg.root.display())?;
        writeln!(f, "App:  {} ({})", cfg.app.path.display(), cfg.app.kind.as_str())?;
        writeln!(f)?;
        self.platform(f)?;
        writeln!(f)?;
        self.build(f)?;
        writeln!(f)?;
        self.emulator(f)?;
        writeln!(f)?;
        self.toolchain(f)?;
        writeln!(f)?;
        self.outputs(f)
    }
}

/// Built-in platform listing, marking each arch's default.
struct PlatformList(Vec<String>);

impl fmt::Display for PlatformList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Built-in platforms:")?;
        writeln!(f)?;
        if self.0.is_empty() {
            writeln!(f, "  (none)")?;
        }
        for name in &self.0 {
            let arch = Arch::platform_prefix(name);
            let default = arch
                .parse::<Arch>()
                .map(|a| a.defaults().platform_name == name.as_str())
                .unwrap_or(false);
            let marker = if default { " (default)" } else { "" };
            writeln!(f, "  {name:<25} {arch}{marker}")?;
        }
        Ok(())
    }
}

/// List the built-in platforms of the workspace.
pub fn platforms(cfg: &ResolvedConfig) -> Result<String> {
    let names = builtin_platforms(&cfg.root)
        .with_context(|| format!("listing platforms in {}", cfg.root.display()))?;
    Ok(PlatformList(names).to_string())
}
