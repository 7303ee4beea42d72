use nest_config::NestConfig;

use crate::cli::{Commands, GlobalFlags};

pub mod batch;
pub mod convert;

/// Route a parsed command to its handler.
pub fn dispatch(command: &Commands, config: &NestConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::Convert(args) => convert::handle(args, config, flags),
        Commands::Batch(args) => batch::handle(args, config, flags),
    }
}
