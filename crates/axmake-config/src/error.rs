//! Error types for configuration resolution.

use std::path::PathBuf;

/// Errors that can occur while resolving a build configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The application path does not exist.
    #[error("application path \"{}\" is not valid", path.display())]
    InvalidAppPath {
        /// The path as supplied by the caller.
        path: PathBuf,
    },

    /// The architecture is outside the supported set.
    #[error("\"ARCH={value}\" is not supported, must be one of {}", quote_list(accepted))]
    InvalidArch {
        /// The offending value.
        value: String,
        /// Supported architecture names.
        accepted: Vec<String>,
    },

    /// The platform is neither a built-in identifier nor an existing file.
    #[error(
        "\"PLATFORM={value}\" must be one of {} or a valid path to a platform file",
        quote_list(builtin)
    )]
    InvalidPlatform {
        /// The offending value.
        value: String,
        /// Built-in platform identifiers found in the platforms directory.
        builtin: Vec<String>,
    },

    /// An explicit architecture disagrees with the platform's architecture.
    #[error("\"ARCH={arch}\" is not compatible with \"PLATFORM={platform}\" (platform arch is {platform_arch})")]
    IncompatiblePlatformArch {
        /// The explicitly supplied architecture.
        arch: String,
        /// The explicitly supplied platform.
        platform: String,
        /// The architecture implied by the platform.
        platform_arch: String,
    },

    /// Any other option holds a value outside its accepted set.
    #[error("\"{name}={value}\" is not valid, expected {accepted}")]
    InvalidOption {
        /// Option name.
        name: &'static str,
        /// The offending value.
        value: String,
        /// Human-readable description of accepted values.
        accepted: String,
    },

    /// A platform definition file could not be parsed.
    #[error("cannot parse platform file {}: {source}", path.display())]
    PlatformFile {
        /// The platform file.
        path: PathBuf,
        /// Underlying TOML error.
        source: toml::de::Error,
    },

    /// I/O error while probing the filesystem.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn quote_list(items: &[String]) -> String {
    let quoted: Vec<String> = items.iter().map(|s| format!("\"{s}\"")).collect();
    format!("[{}]", quoted.join(", "))
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_arch_lists_accepted_values() {
        let err = ConfigError::InvalidArch {
            value: "mips".into(),
            accepted: vec!["x86_64".into(), "riscv64".into()],
        };
        assert_eq!(
            err.to_string(),
            "\"ARCH=mips\" is not supported, must be one of [\"x86_64\", \"riscv64\"]"
        );
    }

    #[test]
    fn incompatible_names_both_sides() {
        let err = ConfigError::IncompatiblePlatformArch {
            arch: "aarch64".into(),
            platform: "x86_64-qemu-q35".into(),
            platform_arch: "x86_64".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("ARCH=aarch64"));
        assert!(msg.contains("PLATFORM=x86_64-qemu-q35"));
    }
}
