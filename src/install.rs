//! Slither tool chain provisioning.
//!
//! The tool is installed into a throwaway Python venv under the runner temp
//! area. The venv's `bin/` directory is returned as an explicit search path
//! for later steps instead of being exported into this process.
use crate::error::{ActionError, ActionResult};
use crate::exec::{CommandRunner, CommandSpec};
use crate::runner_log::LogGroup;
use crate::scratch::create_scratch_dir;
use regex::Regex;
use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

pub const SLITHER_PACKAGE: &str = "slither-analyzer";
const SLITHER_ARCHIVE_BASE: &str = "https://github.com/crytic/slither/archive";
const AUXILIARY_PACKAGES: [&str; 2] = ["openai", "solc-select"];

/// Which slither-analyzer build to install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlitherVersion {
    /// Newest published release.
    Latest,
    /// Exact `X.Y.Z` release.
    Release(String),
    /// Any other git reference (branch, tag, commit), installed from source.
    Revision(String),
}

impl SlitherVersion {
    pub fn parse(raw: &str) -> Self {
        if raw == "latest" {
            return Self::Latest;
        }
        let release = Regex::new(r"^\d+\.\d+\.\d+$").expect("regex for release versions");
        if release.is_match(raw) {
            Self::Release(raw.to_string())
        } else {
            Self::Revision(raw.to_string())
        }
    }

    /// pip requirement specifier for this version.
    pub fn requirement(&self) -> String {
        match self {
            Self::Latest => SLITHER_PACKAGE.to_string(),
            Self::Release(version) => format!("{SLITHER_PACKAGE}=={version}"),
            Self::Revision(reference) => {
                format!("{SLITHER_PACKAGE} @ {SLITHER_ARCHIVE_BASE}/{reference}.tar.gz")
            }
        }
    }
}

/// Solidity compiler selection. `Autodetect` leaves the choice to slither.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolcVersion {
    Autodetect,
    Pinned(String),
}

impl SolcVersion {
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "" | "none" => Self::Autodetect,
            version => Self::Pinned(version.to_string()),
        }
    }
}

/// An installed venv and the search path that resolves its executables first.
#[derive(Debug, Clone)]
pub struct Toolchain {
    pub root: PathBuf,
    pub bin_dir: PathBuf,
    pub search_path: OsString,
}

impl Toolchain {
    fn new(root: PathBuf) -> ActionResult<Self> {
        let bin_dir = root.join("bin");
        let inherited = env::var_os("PATH").unwrap_or_default();
        let search_path = env::join_paths(
            std::iter::once(bin_dir.clone()).chain(env::split_paths(&inherited)),
        )?;
        Ok(Self {
            root,
            bin_dir,
            search_path,
        })
    }
}

/// Create a venv, install slither plus helpers, and optionally select solc.
pub fn install(
    runner: &dyn CommandRunner,
    scratch_root: Option<&Path>,
    slither: &SlitherVersion,
    solc: &SolcVersion,
) -> ActionResult<Toolchain> {
    let _group = LogGroup::start("Install Slither");
    let venv = create_scratch_dir(scratch_root)?;
    let venv_arg = venv.to_string_lossy().to_string();

    let created =
        runner.run(&CommandSpec::new("python3").args(["-m", "venv", venv_arg.as_str()]))?;
    if !created.success() {
        return Err(ActionError::EnvironmentCreation { code: created.code });
    }

    let toolchain = Toolchain::new(venv)?;
    tracing::debug!(
        venv = %toolchain.root.display(),
        bin = %toolchain.bin_dir.display(),
        requirement = %slither.requirement(),
        "installing slither"
    );

    let installed = runner.run(
        &CommandSpec::new("pip3")
            .args(["install", "--quiet", slither.requirement().as_str()])
            .args(AUXILIARY_PACKAGES)
            .search_path(Some(&toolchain.search_path)),
    )?;
    if !installed.success() {
        return Err(ActionError::Install {
            code: installed.code,
            detail: installed.failure_detail(),
        });
    }

    match solc {
        SolcVersion::Autodetect => {
            tracing::debug!("no solc version requested; slither will pick one");
        }
        SolcVersion::Pinned(version) => {
            let selected = runner.run(
                &CommandSpec::new("solc-select")
                    .args(["use", version.as_str(), "--always-install"])
                    .search_path(Some(&toolchain.search_path)),
            )?;
            if !selected.success() {
                return Err(ActionError::CompilerSelect {
                    version: version.clone(),
                    code: selected.code,
                });
            }
        }
    }

    Ok(toolchain)
}
