use std::path::PathBuf;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct CLI {
    /// Configuration file. Defaults to `config.toml` in the user config directory
    #[clap(long, global = true)]
    pub(crate) config: Option<PathBuf>,
    /// Diagnostic output on stderr
    #[clap(long, value_enum, default_value_t = LogLevel::None, global = true)]
    pub(crate) log_level: LogLevel,
    /// Disable colored output
    #[clap(long, global = true)]
    pub(crate) no_color: bool,
    #[command(subcommand)]
    pub(crate) command: DhubCommand,
}

#[derive(Debug, Subcommand, Clone, PartialEq)]
pub enum DhubCommand {
    /// Lists all libraries, or the versions of one library
    #[clap(visible_alias = "ls")]
    List {
        /// Library whose versions are listed
        library: Option<String>,
        /// Only versions starting with this prefix, e.g. `5` or `3.8`
        version: Option<String>,
        /// Include pre-release versions
        #[clap(long)]
        pre_release: bool,
        /// Show the image tags of every distribution
        #[clap(short, long)]
        verbose: bool,
        /// Print JSON instead of a table
        #[clap(long)]
        json: bool,
    },
    /// Lists libraries whose name starts with a prefix
    Search {
        prefix: String,
        /// Print JSON instead of a table
        #[clap(long)]
        json: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    None,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}
