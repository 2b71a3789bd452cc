//! Build configuration for axmake.
//!
//! Loads build options from the environment and resolves them into one
//! immutable [`ResolvedConfig`]:
//! - **Parameters:** every recognized option with its default ([`params`])
//! - **Platform:** architecture, platform identifier, target triple ([`arch`], [`platform`])
//! - **Derived values:** toolchain names, output paths, exported environment ([`resolve`])

pub mod arch;
pub mod error;
pub mod host;
pub mod options;
pub mod params;
pub mod platform;
pub mod resolve;
pub mod toolchain;

pub use arch::{Arch, Bus};
pub use error::{ConfigError, Result};
pub use host::{FixedHost, HostProbe, SystemHost};
pub use options::{LogLevel, Mode, NetDev};
pub use params::{Param, RawParameters};
pub use platform::{builtin_platforms, PlatformFile, PlatformSpec};
pub use resolve::{
    is_unit_test_command, AppDescriptor, AppKind, NetworkOptions, OutputPaths, QemuOptions,
    ResolvedConfig, Resolver,
};
pub use toolchain::Toolchain;
