use clap::Parser;

mod bootstrap;
mod cli;
mod commands;
mod output;
mod progress;
mod ui;

fn main() {
    if let Err(error) = run() {
        eprintln!("cssnest error: {error:#}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    let flags = cli.global_flags();
    init_tracing(&flags)?;
    ui::init(&flags);

    let config = bootstrap::load_config(&flags, &cli.overrides)?;
    commands::dispatch(&cli.command, &config, &flags)
}

const fn default_log_level(flags: &cli::GlobalFlags) -> &'static str {
    if flags.quiet {
        "error"
    } else if flags.verbose {
        "debug"
    } else {
        "warn"
    }
}

fn init_tracing(flags: &cli::GlobalFlags) -> anyhow::Result<()> {
    let level = default_log_level(flags);

    let filter = tracing_subscriber::EnvFilter::try_from_env("CSSNEST_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use pretty_assertions::assert_eq;

    use super::{cli::Cli, default_log_level};

    fn level_for(args: &[&str]) -> &'static str {
        let cli = Cli::try_parse_from(args).expect("cli should parse");
        default_log_level(&cli.global_flags())
    }

    #[test]
    fn log_level_follows_global_flags() {
        assert_eq!(level_for(&["cssnest", "convert", "a.css"]), "warn");
        assert_eq!(level_for(&["cssnest", "convert", "a.css", "--verbose"]), "debug");
        assert_eq!(level_for(&["cssnest", "-q", "-v", "convert", "a.css"]), "error");
    }
}
