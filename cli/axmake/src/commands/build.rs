//! `build` and `disasm`.

use axmake_config::ResolvedConfig;

use crate::exec::{Invocation, BUILD_MK};

/// Compile the application into its raw binary.
pub fn build(cfg: &ResolvedConfig) -> Invocation {
    Invocation::make(BUILD_MK)
        .var("OUT_DIR", &cfg.paths.out_dir)
        .var("OUT_BIN", &cfg.paths.out_bin)
        .arg(format!("APP_TYPE={}", cfg.app.kind.as_str()))
}

/// Disassemble the output ELF into a pager.
pub fn disasm(cfg: &ResolvedConfig) -> Invocation {
    Invocation::shell(format!(
        "{} {} | less",
        cfg.toolchain.objdump,
        cfg.paths.out_elf.display()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fixture;

    #[test]
    fn build_passes_outputs_and_app_type() {
        let (_dir, cfg) = fixture(&[("A", "apps/helloworld")]);
        let inv = build(&cfg);
        assert_eq!(inv.program, "make");
        assert_eq!(
            inv.args,
            vec![
                "-f",
                "scripts/make/build.mk",
                "OUT_DIR=apps/helloworld",
                "OUT_BIN=apps/helloworld/helloworld_x86_64-qemu-q35.bin",
                "APP_TYPE=c",
            ]
        );
    }

    #[test]
    fn disasm_pipes_objdump_into_less() {
        let (_dir, cfg) = fixture(&[("ARCH", "riscv64")]);
        let inv = disasm(&cfg);
        assert_eq!(inv.program, "sh");
        assert_eq!(
            inv.args[1],
            "rust-objdump -d --print-imm-hex --x86-asm-syntax=intel \
             apps/helloworld/helloworld_riscv64-qemu-virt.elf | less"
        );
    }
}
