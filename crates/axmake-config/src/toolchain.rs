//! Cross toolchain and binutils naming.

use serde::Serialize;

use crate::arch::Arch;

/// Tool names for one architecture.
///
/// `cc`, `ar` and `ranlib` are derived from the cross prefix; the LLVM tools
/// come from the Rust toolchain and are not prefixed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toolchain {
    /// Cross-compile prefix, e.g. `riscv64-linux-musl-`.
    pub cross_compile: String,
    pub cc: String,
    pub ar: String,
    pub ranlib: String,
    pub ld: String,
    pub objdump: String,
    pub objcopy: String,
    pub gdb: String,
}

impl Toolchain {
    pub fn for_arch(arch: Arch) -> Self {
        let cross_compile = format!("{arch}-linux-musl-");
        Self {
            cc: format!("{cross_compile}gcc"),
            ar: format!("{cross_compile}ar"),
            ranlib: format!("{cross_compile}ranlib"),
            ld: "rust-lld -flavor gnu".to_string(),
            objdump: "rust-objdump -d --print-imm-hex --x86-asm-syntax=intel".to_string(),
            objcopy: format!("rust-objcopy --binary-architecture={arch}"),
            gdb: "gdb-multiarch".to_string(),
            cross_compile,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_drives_c_tools() {
        let tc = Toolchain::for_arch(Arch::RiscV64);
        assert_eq!(tc.cross_compile, "riscv64-linux-musl-");
        assert_eq!(tc.cc, "riscv64-linux-musl-gcc");
        assert_eq!(tc.ar, "riscv64-linux-musl-ar");
        assert_eq!(tc.ranlib, "riscv64-linux-musl-ranlib");
    }

    #[test]
    fn llvm_tools_are_not_prefixed() {
        let tc = Toolchain::for_arch(Arch::AArch64);
        assert_eq!(tc.ld, "rust-lld -flavor gnu");
        assert!(tc.objdump.starts_with("rust-objdump "));
        assert_eq!(tc.objcopy, "rust-objcopy --binary-architecture=aarch64");
    }
}
