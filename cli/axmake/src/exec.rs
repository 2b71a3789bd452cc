//! External invocations and the runners that carry them out.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::process::{Command, ExitStatus};

use anyhow::{Context, Result};

/// Makefiles driving the external build, relative to the workspace root.
pub const BUILD_MK: &str = "scripts/make/build.mk";
pub const UTILS_MK: &str = "scripts/make/utils.mk";

/// One external program call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    /// Variables set on top of the inherited environment.
    pub env: BTreeMap<&'static str, String>,
}

impl Invocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: BTreeMap::new(),
        }
    }

    /// `make -f <makefile>`.
    pub fn make(makefile: &str) -> Self {
        Self::new("make").args(["-f", makefile])
    }

    /// A shell pipeline run through `sh -c`.
    pub fn shell(line: impl Into<String>) -> Self {
        Self::new("sh").args(["-c".to_string(), line.into()])
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Add a `NAME=path` make variable.
    pub fn var(self, name: &str, path: &Path) -> Self {
        self.arg(format!("{name}={}", path.display()))
    }

    pub fn envs(mut self, env: BTreeMap<&'static str, String>) -> Self {
        self.env.extend(env);
        self
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, value) in &self.env {
            write!(f, "{key}={} ", quote(value))?;
        }
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {}", quote(arg))?;
        }
        Ok(())
    }
}

fn quote(s: &str) -> String {
    if !s.is_empty() && !s.contains(|c: char| c.is_whitespace() || c == '\'' || c == '"' || c == '|') {
        s.to_string()
    } else {
        format!("'{}'", s.replace('\'', r"'\''"))
    }
}

/// Executes invocations and the file removals that follow `clean`.
pub trait Runner {
    /// Run `invocation` in `cwd`, blocking until it exits, and return its exit code.
    fn run(&mut self, invocation: &Invocation, cwd: &Path) -> Result<i32>;

    /// Remove a build output. A missing file is already clean.
    fn remove_file(&mut self, path: &Path) -> Result<()>;
}

/// Spawns real processes with inherited stdio.
#[derive(Debug, Default)]
pub struct ProcessRunner;

impl Runner for ProcessRunner {
    fn run(&mut self, invocation: &Invocation, cwd: &Path) -> Result<i32> {
        log::info!("running: {invocation}");
        let status = Command::new(&invocation.program)
            .args(&invocation.args)
            .envs(&invocation.env)
            .current_dir(cwd)
            .status()
            .with_context(|| format!("spawning {}", invocation.program))?;
        let code = exit_code(status);
        if code != 0 {
            log::debug!("{} exited with {code}", invocation.program);
        }
        Ok(code)
    }

    fn remove_file(&mut self, path: &Path) -> Result<()> {
        if path.exists() {
            fs::remove_file(path).with_context(|| format!("removing {}", path.display()))?;
            println!("Removed {}", path.display());
        } else {
            println!("Already clean: {} does not exist", path.display());
        }
        Ok(())
    }
}

/// Prints what would run and touches nothing.
#[derive(Debug, Default)]
pub struct DryRun;

impl Runner for DryRun {
    fn run(&mut self, invocation: &Invocation, cwd: &Path) -> Result<i32> {
        println!("(cd {} && {invocation})", cwd.display());
        Ok(0)
    }

    fn remove_file(&mut self, path: &Path) -> Result<()> {
        println!("rm -f {}", path.display());
        Ok(())
    }
}

/// Map a child's status to our exit code; signals become `128 + signo`.
pub fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    1
}

/// Records calls instead of executing them.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct Recorder {
    pub runs: Vec<(Invocation, std::path::PathBuf)>,
    pub removed: Vec<std::path::PathBuf>,
    /// Exit code returned for every run.
    pub code: i32,
}

#[cfg(test)]
impl Runner for Recorder {
    fn run(&mut self, invocation: &Invocation, cwd: &Path) -> Result<i32> {
        self.runs.push((invocation.clone(), cwd.to_path_buf()));
        Ok(self.code)
    }

    fn remove_file(&mut self, path: &Path) -> Result<()> {
        self.removed.push(path.to_path_buf());
        Ok(())
    }
}
