//! Command dispatch.
//!
//! A command name maps to a [`Target`], which plans an [`Action`] from the
//! resolved configuration. Planning is pure; [`execute`] is the only place
//! that hands work to a [`Runner`].

use std::path::PathBuf;

use anyhow::Result;
use axmake_config::ResolvedConfig;

use crate::commands::{build, clean, config, disk, lint, test};
use crate::exec::{Invocation, Runner};

/// Printed for any command name that is not a [`Target`].
pub const INVALID_TARGET: &str = "Please provide a valid target.";

/// Every command the dispatcher understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Build,
    Disasm,
    Clippy,
    Doc,
    DocCheckMissing,
    Fmt,
    FmtC,
    Test,
    UnitTest,
    UnitTestNoFailFast,
    DiskImg,
    Clean,
    CleanC,
    Config,
    Platforms,
}

impl Target {
    pub const ALL: [Target; 15] = [
        Target::Build,
        Target::Disasm,
        Target::Clippy,
        Target::Doc,
        Target::DocCheckMissing,
        Target::Fmt,
        Target::FmtC,
        Target::Test,
        Target::UnitTest,
        Target::UnitTestNoFailFast,
        Target::DiskImg,
        Target::Clean,
        Target::CleanC,
        Target::Config,
        Target::Platforms,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Target::Build => "build",
            Target::Disasm => "disasm",
            Target::Clippy => "clippy",
            Target::Doc => "doc",
            Target::DocCheckMissing => "doc_check_missing",
            Target::Fmt => "fmt",
            Target::FmtC => "fmt_c",
            Target::Test => "test",
            Target::UnitTest => "unittest",
            Target::UnitTestNoFailFast => "unittest_no_fail_fast",
            Target::DiskImg => "disk_img",
            Target::Clean => "clean",
            Target::CleanC => "clean_c",
            Target::Config => "config",
            Target::Platforms => "platforms",
        }
    }

    pub fn from_name(name: &str) -> Option<Target> {
        Target::ALL.into_iter().find(|t| t.name() == name)
    }

    /// Decide what this target does for `cfg`.
    pub fn plan(self, cfg: &ResolvedConfig) -> Result<Action> {
        let action = match self {
            Target::Build => Action::Run(build::build(cfg)),
            Target::Disasm => Action::Run(build::disasm(cfg)),
            Target::Clippy => Action::Run(lint::clippy(cfg)),
            Target::Doc => Action::Run(lint::doc()),
            Target::DocCheckMissing => Action::Run(lint::doc_check_missing()),
            Target::Fmt => Action::Run(lint::fmt()),
            Target::FmtC => Action::Run(lint::fmt_c()),
            Target::Test => Action::Run(test::test(cfg)),
            Target::UnitTest => Action::Run(test::unittest(cfg, true)),
            Target::UnitTestNoFailFast => Action::Run(test::unittest(cfg, false)),
            Target::DiskImg => disk::plan(cfg),
            Target::Clean => clean::clean(cfg),
            Target::CleanC => Action::Run(clean::clean_c()),
            Target::Config => {
                Action::Report(config::render(cfg, config::ConfigFormat::Human)?)
            }
            Target::Platforms => Action::Report(config::platforms(cfg)?),
        };
        Ok(action)
    }
}

/// What a target does once planned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Run one external command.
    Run(Invocation),
    /// Run, and on success remove build outputs (relative to the root).
    RunThenRemove {
        invocation: Invocation,
        files: Vec<PathBuf>,
    },
    /// Nothing to do; tell the user why.
    Skip { warning: String },
    /// Print text without running anything.
    Report(String),
}

/// Run the command called `name` and return the exit code for the process.
pub fn dispatch(name: &str, cfg: &ResolvedConfig, runner: &mut dyn Runner) -> Result<i32> {
    let Some(target) = Target::from_name(name) else {
        log::debug!("unknown target {name:?}");
        println!("{INVALID_TARGET}");
        return Ok(0);
    };
    log::debug!("dispatching {}", target.name());
    execute(target.plan(cfg)?, cfg, runner)
}

/// Carry out a planned action.
pub fn execute(action: Action, cfg: &ResolvedConfig, runner: &mut dyn Runner) -> Result<i32> {
    match action {
        Action::Run(invocation) => runner.run(&invocation.envs(cfg.build_env()), &cfg.root),
        Action::RunThenRemove { invocation, files } => {
            let code = runner.run(&invocation.envs(cfg.build_env()), &cfg.root)?;
            if code != 0 {
                return Ok(code);
            }
            for file in &files {
                runner.remove_file(&cfg.in_root(file))?;
            }
            Ok(0)
        }
        Action::Skip { warning } => {
            eprintln!("warning: {warning}");
            Ok(0)
        }
        Action::Report(text) => {
            print!("{text}");
            Ok(0)
        }
    }
}
