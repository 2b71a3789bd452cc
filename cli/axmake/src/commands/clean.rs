//! `clean` and `clean_c`: remove build artifacts.

use axmake_config::ResolvedConfig;

use crate::dispatch::Action;
use crate::exec::{Invocation, UTILS_MK};

/// Clean the Rust and C build trees, then drop the final images.
pub fn clean(cfg: &ResolvedConfig) -> Action {
    Action::RunThenRemove {
        invocation: Invocation::make(UTILS_MK)
            .var("OUT_DIR", &cfg.paths.out_dir)
            .args(["clean", "clean_c"]),
        files: vec![cfg.paths.out_bin.clone(), cfg.paths.out_elf.clone()],
    }
}

pub fn clean_c() -> Invocation {
    Invocation::make(UTILS_MK).arg("clean_c")
}
