use std::path::PathBuf;

use clap::Parser;

pub mod global;
pub mod overrides;
pub mod root_commands;

pub use global::{GlobalFlags, OutputFormat};
pub use overrides::ConfigOverrides;
pub use root_commands::{BatchArgs, Commands, ConvertArgs};

/// Top-level CLI parser for the `cssnest` binary.
#[derive(Debug, Parser)]
#[command(
    name = "cssnest",
    version,
    about = "Convert flat CSS into nested SCSS with BEM grouping and variables"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Report format: text, json
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Explicit configuration file, layered above `.cssnest.toml`
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: ConfigOverrides,
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            quiet: self.quiet,
            verbose: self.verbose,
            config: self.config.clone(),
        }
    }
}
