//! Resolution scenarios over a scratch workspace.

use std::fs;
use std::path::Path;

use axmake_config::{
    AppKind, Arch, Bus, ConfigError, FixedHost, RawParameters, ResolvedConfig, Resolver,
};

const BUILTIN: [&str; 3] = ["x86_64-qemu-q35", "riscv64-qemu-virt", "aarch64-qemu-virt"];

fn workspace() -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("tempdir");
    let root = dir.path();
    fs::create_dir_all(root.join("apps/helloworld")).unwrap();
    fs::create_dir_all(root.join("platforms")).unwrap();
    for name in BUILTIN {
        let body = format!(
            "arch = \"{}\"\nplatform = \"{name}\"\n",
            name.split('-').next().unwrap()
        );
        fs::write(root.join("platforms").join(format!("{name}.toml")), body).unwrap();
    }
    dir
}

fn resolve(root: &Path, pairs: &[(&str, &str)], command: &str) -> Result<ResolvedConfig, ConfigError> {
    let host = FixedHost::new("6.8.0-generic");
    let params = RawParameters::from_pairs(pairs.iter().copied());
    Resolver::new(root, &host).resolve(&params, command)
}

#[test]
fn arch_table_without_platform() {
    let dir = workspace();
    let expected = [
        ("x86_64", "x86_64-qemu-q35", "x86_64-unknown-none"),
        ("riscv64", "riscv64-qemu-virt", "riscv64gc-unknown-none-elf"),
        ("aarch64", "aarch64-qemu-virt", "aarch64-unknown-none-softfloat"),
    ];
    for (arch, platform, triple) in expected {
        // Unrelated parameters must not change the table lookup.
        for extra in [("SMP", "8"), ("LOG", "trace"), ("NET", "y")] {
            let cfg = resolve(dir.path(), &[("ARCH", arch), extra], "build").unwrap();
            assert_eq!(cfg.platform.arch.as_str(), arch);
            assert_eq!(cfg.platform.platform_name, platform);
            assert_eq!(cfg.platform.target_triple, triple);
        }
    }
    let cfg = resolve(dir.path(), &[("ARCH", "x86_64")], "build").unwrap();
    assert_eq!(cfg.platform.bus, Bus::Pci);
    let cfg = resolve(dir.path(), &[("ARCH", "riscv64")], "build").unwrap();
    assert_eq!(cfg.platform.bus, Bus::Mmio);
}

#[test]
fn every_mismatched_pair_is_incompatible() {
    let dir = workspace();
    for arch in Arch::ALL {
        for platform in BUILTIN {
            let result = resolve(
                dir.path(),
                &[("ARCH", arch.as_str()), ("PLATFORM", platform)],
                "build",
            );
            if platform.starts_with(arch.as_str()) {
                assert!(result.is_ok(), "{arch} + {platform} should resolve");
            } else {
                assert!(
                    matches!(result, Err(ConfigError::IncompatiblePlatformArch { .. })),
                    "{arch} + {platform} should be incompatible, got {result:?}"
                );
            }
        }
    }
}

#[test]
fn unknown_platform_fails_for_any_arch() {
    let dir = workspace();
    for arch in ["x86_64", "riscv64", "aarch64", "mips"] {
        let result = resolve(dir.path(), &[("ARCH", arch), ("PLATFORM", "sun4m-board")], "build");
        assert!(
            matches!(result, Err(ConfigError::InvalidPlatform { .. })),
            "ARCH={arch} got {result:?}"
        );
    }
}

#[test]
fn unknown_arch_fails() {
    let dir = workspace();
    let result = resolve(dir.path(), &[("ARCH", "mips")], "build");
    assert!(matches!(result, Err(ConfigError::InvalidArch { .. })));
}

#[test]
fn resolution_is_idempotent() {
    let dir = workspace();
    let pairs = [("ARCH", "aarch64"), ("SMP", "4"), ("FEATURES", "fs,net")];
    let first = resolve(dir.path(), &pairs, "build").unwrap();
    let second = resolve(dir.path(), &pairs, "build").unwrap();
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn managed_app_with_all_defaults() {
    let dir = workspace();
    fs::write(
        dir.path().join("apps/helloworld/Cargo.toml"),
        "[package]\nname = \"helloworld\"\n",
    )
    .unwrap();
    let cfg = resolve(dir.path(), &[], "build").unwrap();
    assert_eq!(cfg.app.kind, AppKind::Rust);
    assert_eq!(cfg.platform.platform_name, "x86_64-qemu-q35");
    assert_eq!(cfg.platform.target_triple, "x86_64-unknown-none");
    assert_eq!(cfg.platform.bus, Bus::Pci);
}

#[test]
fn platform_alone_selects_arch() {
    let dir = workspace();
    let cfg = resolve(dir.path(), &[("PLATFORM", "riscv64-qemu-virt")], "build").unwrap();
    assert_eq!(cfg.platform.arch, Arch::RiscV64);
    assert_eq!(cfg.platform.target_triple, "riscv64gc-unknown-none-elf");
    assert_eq!(cfg.toolchain.cross_compile, "riscv64-linux-musl-");
}

#[test]
fn aarch64_with_x86_platform() {
    let dir = workspace();
    let result = resolve(
        dir.path(),
        &[("ARCH", "aarch64"), ("PLATFORM", "x86_64-qemu-q35")],
        "build",
    );
    match result {
        Err(ConfigError::IncompatiblePlatformArch {
            arch,
            platform,
            platform_arch,
        }) => {
            assert_eq!(arch, "aarch64");
            assert_eq!(platform, "x86_64-qemu-q35");
            assert_eq!(platform_arch, "x86_64");
        }
        other => panic!("expected IncompatiblePlatformArch, got {other:?}"),
    }
}

#[test]
fn custom_platform_file_keeps_its_name() {
    let dir = workspace();
    fs::write(
        dir.path().join("my-board.toml"),
        "platform = \"aarch64-my-board\"\narch = \"aarch64\"\n\n[kernel]\nsmp = 4\n",
    )
    .unwrap();
    let cfg = resolve(dir.path(), &[("PLATFORM", "my-board.toml")], "build").unwrap();
    assert_eq!(cfg.platform.arch, Arch::AArch64);
    assert_eq!(cfg.platform.platform_name, "aarch64-my-board");
    assert_eq!(
        cfg.paths.out_bin,
        Path::new("apps/helloworld/helloworld_aarch64-my-board.bin")
    );
}

#[test]
fn custom_platform_file_arch_follows_its_name() {
    let dir = workspace();
    fs::write(
        dir.path().join("board.toml"),
        "platform = \"riscv64-qemu-virt\"\narch = \"aarch64\"\n",
    )
    .unwrap();
    let result = resolve(dir.path(), &[("PLATFORM", "board.toml")], "build");
    assert!(
        matches!(result, Err(ConfigError::IncompatiblePlatformArch { .. })),
        "got {result:?}"
    );

    // Every resolved platform carries its arch as the identifier prefix.
    for name in BUILTIN {
        let cfg = resolve(dir.path(), &[("PLATFORM", name)], "build").unwrap();
        assert_eq!(
            Arch::platform_prefix(&cfg.platform.platform_name),
            cfg.platform.arch.as_str()
        );
    }
}
