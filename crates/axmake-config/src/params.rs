//! Raw parameter loading from the process environment.
//!
//! Every recognized option has a documented default, so loading never fails.
//! Values are kept as strings here; interpretation happens in [`crate::resolve`].

use std::collections::{BTreeMap, BTreeSet};
use std::ffi::OsString;

/// A recognized build option, named after its environment variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Param {
    Arch,
    Platform,
    Smp,
    Mode,
    Log,
    Verbose,
    App,
    Features,
    AppFeatures,
    Blk,
    Net,
    Graphic,
    Bus,
    DiskImg,
    QemuLog,
    NetDump,
    NetDev,
    Ip,
    Gw,
    Target,
}

impl Param {
    /// All recognized options, in declaration order.
    pub const ALL: [Param; 20] = [
        Param::Arch,
        Param::Platform,
        Param::Smp,
        Param::Mode,
        Param::Log,
        Param::Verbose,
        Param::App,
        Param::Features,
        Param::AppFeatures,
        Param::Blk,
        Param::Net,
        Param::Graphic,
        Param::Bus,
        Param::DiskImg,
        Param::QemuLog,
        Param::NetDump,
        Param::NetDev,
        Param::Ip,
        Param::Gw,
        Param::Target,
    ];

    /// Environment variable name.
    pub fn name(self) -> &'static str {
        match self {
            Param::Arch => "ARCH",
            Param::Platform => "PLATFORM",
            Param::Smp => "SMP",
            Param::Mode => "MODE",
            Param::Log => "LOG",
            Param::Verbose => "V",
            Param::App => "A",
            Param::Features => "FEATURES",
            Param::AppFeatures => "APP_FEATURES",
            Param::Blk => "BLK",
            Param::Net => "NET",
            Param::Graphic => "GRAPHIC",
            Param::Bus => "BUS",
            Param::DiskImg => "DISK_IMG",
            Param::QemuLog => "QEMU_LOG",
            Param::NetDump => "NET_DUMP",
            Param::NetDev => "NET_DEV",
            Param::Ip => "IP",
            Param::Gw => "GW",
            Param::Target => "TARGET",
        }
    }

    /// Value used when the variable is not set.
    pub fn default_value(self) -> &'static str {
        match self {
            Param::Arch => "x86_64",
            Param::Smp => "1",
            Param::Mode => "release",
            Param::Log => "warn",
            Param::App => "apps/helloworld",
            Param::Blk | Param::Net | Param::Graphic | Param::QemuLog | Param::NetDump => "n",
            Param::Bus => "mmio",
            Param::DiskImg => "disk.img",
            Param::NetDev => "user",
            Param::Ip => "10.0.2.15",
            Param::Gw => "10.0.2.2",
            Param::Platform
            | Param::Verbose
            | Param::Features
            | Param::AppFeatures
            | Param::Target => "",
        }
    }

    /// Look up an option by its environment variable name.
    pub fn from_name(name: &str) -> Option<Param> {
        Param::ALL.into_iter().find(|p| p.name() == name)
    }
}

/// The loaded, unvalidated option values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawParameters {
    values: BTreeMap<Param, String>,
    explicit: BTreeSet<Param>,
}

impl RawParameters {
    /// Load every recognized option from the process environment.
    ///
    /// A value that is not valid UTF-8 is reported and treated as unset.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| decode_env(name, std::env::var_os(name)))
    }

    /// Load every recognized option through `lookup`, falling back to defaults.
    pub fn from_lookup<F>(mut lookup: F) -> Self
    where
        F: FnMut(&str) -> Option<String>,
    {
        let mut values = BTreeMap::new();
        let mut explicit = BTreeSet::new();
        for param in Param::ALL {
            match lookup(param.name()) {
                Some(value) => {
                    values.insert(param, value);
                    explicit.insert(param);
                }
                None => {
                    values.insert(param, param.default_value().to_string());
                }
            }
        }
        Self { values, explicit }
    }

    /// Load from explicit `(name, value)` pairs. Unrecognized names are ignored.
    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let map: BTreeMap<&str, &str> = pairs.into_iter().collect();
        Self::from_lookup(|name| map.get(name).map(|v| v.to_string()))
    }

    /// The value of `param`, or its default.
    pub fn get(&self, param: Param) -> &str {
        self.values
            .get(&param)
            .map(String::as_str)
            .unwrap_or_else(|| param.default_value())
    }

    /// Whether `param` was set by the caller rather than defaulted.
    ///
    /// An empty value counts as not supplied.
    pub fn is_explicit(&self, param: Param) -> bool {
        self.explicit.contains(&param) && !self.get(param).is_empty()
    }

    /// Iterate over all options and their values.
    pub fn iter(&self) -> impl Iterator<Item = (Param, &str)> {
        self.values.iter().map(|(p, v)| (*p, v.as_str()))
    }
}

fn decode_env(name: &str, raw: Option<OsString>) -> Option<String> {
    match raw?.into_string() {
        Ok(value) => Some(value),
        Err(raw) => {
            log::warn!(
                "ignoring {name}={}: not valid UTF-8, using default {:?}",
                raw.to_string_lossy(),
                Param::from_name(name).map(Param::default_value).unwrap_or("")
            );
            None
        }
    }
}

impl Default for RawParameters {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}
