//! Host environment queries.
//!
//! Acceleration support depends on the machine running the build, so the
//! query sits behind [`HostProbe`] and can be replaced in tests.

use std::fs;

/// Marker that WSL kernels put in their release string.
const WSL_MARKER: &str = "-microsoft";

/// Source of host facts used during resolution.
pub trait HostProbe {
    /// The host kernel identification string (e.g. `uname -r`).
    fn kernel_release(&self) -> String;

    /// Whether the host is a Windows-subsystem-for-Linux environment.
    fn is_wsl(&self) -> bool {
        self.kernel_release().to_lowercase().contains(WSL_MARKER)
    }
}

/// The real host, read through procfs.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemHost;

impl HostProbe for SystemHost {
    fn kernel_release(&self) -> String {
        match fs::read_to_string("/proc/sys/kernel/osrelease") {
            Ok(release) => release.trim().to_string(),
            Err(e) => {
                log::debug!("cannot read host kernel release: {e}");
                String::new()
            }
        }
    }
}

/// A host with a fixed kernel release string.
#[derive(Debug, Clone, Default)]
pub struct FixedHost {
    pub release: String,
}

impl FixedHost {
    pub fn new(release: impl Into<String>) -> Self {
        Self {
            release: release.into(),
        }
    }
}

impl HostProbe for FixedHost {
    fn kernel_release(&self) -> String {
        self.release.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_wsl_release() {
        assert!(FixedHost::new("5.15.133.1-microsoft-standard-WSL2").is_wsl());
        assert!(FixedHost::new("4.4.0-19041-Microsoft").is_wsl());
    }

    #[test]
    fn plain_linux_is_not_wsl() {
        assert!(!FixedHost::new("6.8.0-45-generic").is_wsl());
        assert!(!FixedHost::default().is_wsl());
    }
}
