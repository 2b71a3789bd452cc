//! Build target implementations.
//!
//! Each target turns a [`ResolvedConfig`](axmake_config::ResolvedConfig) into
//! an [`Action`](crate::dispatch::Action); none of them run anything directly.

pub mod build;
pub mod clean;
pub mod config;
pub mod disk;
pub mod lint;

/// A scratch workspace with the default application and the built-in
/// platforms, resolved with `pairs` for `build`.
#[cfg(test)]
pub(crate) fn fixture(pairs: &[(&str, &str)]) -> (tempfile::TempDir, axmake_config::ResolvedConfig) {
    fixture_for(pairs, "build")
}

#[cfg(test)]
pub(crate) fn fixture_for(
    pairs: &[(&str, &str)],
    command: &str,
) -> (tempfile::TempDir, axmake_config::ResolvedConfig) {
    use axmake_config::{FixedHost, RawParameters, Resolver};

    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("apps/helloworld")).unwrap();
    std::fs::create_dir_all(dir.path().join("platforms")).unwrap();
    for name in ["x86_64-qemu-q35", "riscv64-qemu-virt", "aarch64-qemu-virt"] {
        std::fs::write(dir.path().join(format!("platforms/{name}.toml")), "").unwrap();
    }
    let host = FixedHost::new("6.8.0-generic");
    let params = RawParameters::from_pairs(pairs.iter().copied());
    let cfg = Resolver::new(dir.path(), &host)
        .resolve(&params, command)
        .unwrap();
    (dir, cfg)
}
