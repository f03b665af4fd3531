//! These structs provide the CLI interface for the budgety CLI.

use crate::store::IdPolicy;
use clap::{Parser, Subcommand};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// budgety: keep a running budget of incomes and expenses.
///
/// Enter incomes and expenses and budgety keeps the totals, the money left over and the share of
/// income each expense takes. Nothing is saved between sessions; the only file budgety keeps is
/// its configuration.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the budgety home directory and write its configuration file.
    Init(InitArgs),
    /// Start a budgeting session.
    ///
    /// Commands are read one per line, from --script or else from stdin:
    ///
    ///   add <income|expense> <value> <description>
    ///   delete <income|expense>-<id>
    ///   show
    ///   help
    ///   quit
    ///
    /// Lines that are blank or start with '#' are skipped.
    Run(RunArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where the budgety configuration is held. Defaults to ~/budgety
    #[arg(long, env = "BUDGETY_HOME", default_value_t = default_budgety_home())]
    budgety_home: DisplayPath,
}

impl Common {
    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn budgety_home(&self) -> &DisplayPath {
        &self.budgety_home
    }
}

/// (Not shown): Args for the `budgety init` command.
#[derive(Debug, Parser, Clone)]
pub struct InitArgs {
    /// How entry ids are assigned. `last-plus-one` hands out one more than the last entry's id, so
    /// deleting the newest entry frees its id. `monotonic` never hands out an id twice.
    #[arg(long, value_enum, default_value_t = IdPolicy::LastPlusOne)]
    id_policy: IdPolicy,

    /// The currency symbol printed in front of every value.
    #[arg(long, default_value = crate::model::DEFAULT_SYMBOL)]
    currency_symbol: String,
}

impl InitArgs {
    pub fn id_policy(&self) -> IdPolicy {
        self.id_policy
    }

    pub fn currency_symbol(&self) -> &str {
        &self.currency_symbol
    }
}

/// (Not shown): Args for the `budgety run` command.
#[derive(Debug, Parser, Clone)]
pub struct RunArgs {
    /// Read commands from this file instead of stdin.
    #[arg(long)]
    script: Option<PathBuf>,

    /// Have `show` print JSON instead of the formatted page.
    #[arg(long)]
    json: bool,
}

impl RunArgs {
    pub fn new(script: Option<PathBuf>, json: bool) -> Self {
        Self { script, json }
    }

    pub fn script(&self) -> Option<&Path> {
        self.script.as_deref()
    }

    pub fn json(&self) -> bool {
        self.json
    }
}

fn default_budgety_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("budgety"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --budgety-home or BUDGETY_HOME instead of relying on the \
                default budgety home directory.",
            );
            PathBuf::from("budgety")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn path(&self) -> &Path {
        &self.0
    }
}
