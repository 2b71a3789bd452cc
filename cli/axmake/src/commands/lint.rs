//! Lint, documentation and formatting targets.

use axmake_config::ResolvedConfig;

use crate::exec::{Invocation, UTILS_MK};

/// C sources formatted by `fmt_c`.
const LIBC_DIR: &str = "ulib/axlibc";

/// Run clippy for the application's architecture.
pub fn clippy(cfg: &ResolvedConfig) -> Invocation {
    // Resolution always yields an architecture, so ARCH is always forwarded.
    Invocation::make(UTILS_MK)
        .var("OUT_DIR", &cfg.paths.out_dir)
        .var("APP", &cfg.app.path)
        .arg(format!("ARCH={}", cfg.platform.arch))
        .arg("cargo_clippy")
}

pub fn doc() -> Invocation {
    Invocation::make(UTILS_MK).arg("doc")
}

/// Build docs and fail on missing documentation.
pub fn doc_check_missing() -> Invocation {
    Invocation::make(UTILS_MK).arg("doc_check_missing")
}

/// Format all Rust sources in the workspace.
pub fn fmt() -> Invocation {
    Invocation::new("cargo").args(["fmt", "--all"])
}

/// Format the C library sources in place.
pub fn fmt_c() -> Invocation {
    Invocation::shell(format!(
        "find {LIBC_DIR} \\( -iname '*.c' -o -iname '*.h' \\) -print0 \
         | xargs -0 -r clang-format --style=file -i"
    ))
}
