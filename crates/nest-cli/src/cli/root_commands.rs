use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Convert one CSS file to SCSS.
    Convert(ConvertArgs),
    /// Convert every `.css` file under a directory.
    Batch(BatchArgs),
}

#[derive(Clone, Debug, Args)]
pub struct ConvertArgs {
    /// CSS file to convert.
    pub input: PathBuf,

    /// Write SCSS here instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Clone, Debug, Args)]
pub struct BatchArgs {
    /// Directory containing CSS files.
    pub dir: PathBuf,

    /// Mirror results under this directory instead of writing `.scss` siblings.
    #[arg(short, long = "out-dir")]
    pub out_dir: Option<PathBuf>,

    /// Descend into subdirectories.
    #[arg(short, long)]
    pub recursive: bool,
}
