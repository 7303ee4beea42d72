use std::fmt;
use std::path::Path;

use anyhow::{Context, bail};
use nest_config::NestConfig;
use nest_engine::{ConversionStats, Converter};
use serde::Serialize;

use crate::cli::{ConvertArgs, GlobalFlags};
use crate::output::output;

#[derive(Debug, Serialize)]
struct ConvertReport {
    input: String,
    output: String,
    stats: ConversionStats,
}

impl fmt::Display for ConvertReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Converted {} -> {} ({} rules, {} merged, {} variables)",
            self.input, self.output, self.stats.rules, self.stats.merged, self.stats.variables
        )
    }
}

/// Handle `cssnest convert`.
///
/// Without `--output` the SCSS goes to stdout and nothing else is printed.
pub fn handle(args: &ConvertArgs, config: &NestConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let source = read_stylesheet(&args.input)?;
    let conversion = Converter::new(config)
        .convert(&source)
        .with_context(|| format!("failed to convert {}", args.input.display()))?;

    let Some(out_path) = &args.output else {
        print!("{}", conversion.output);
        return Ok(());
    };

    std::fs::write(out_path, &conversion.output)
        .with_context(|| format!("failed to write {}", out_path.display()))?;

    if !flags.quiet {
        output(
            &ConvertReport {
                input: args.input.display().to_string(),
                output: out_path.display().to_string(),
                stats: conversion.stats,
            },
            flags.format,
        )?;
    }
    Ok(())
}

pub(crate) fn read_stylesheet(path: &Path) -> anyhow::Result<String> {
    if !path.is_file() {
        bail!("input file '{}' does not exist", path.display());
    }
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::OutputFormat;
    use pretty_assertions::assert_eq;

    fn flags() -> GlobalFlags {
        GlobalFlags {
            format: OutputFormat::Text,
            quiet: true,
            verbose: false,
            config: None,
        }
    }

    #[test]
    fn writes_scss_next_to_request() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("site.css");
        let out = dir.path().join("site.scss");
        std::fs::write(&input, ".card { color: red; }\n.card__title { margin: 0; }").unwrap();

        let args = ConvertArgs {
            input,
            output: Some(out.clone()),
        };
        handle(&args, &NestConfig::default(), &flags()).unwrap();

        assert_eq!(
            std::fs::read_to_string(out).unwrap(),
            ".card {\n  color: red;\n\n  &__title {\n    margin: 0;\n  }\n}\n"
        );
    }

    #[test]
    fn missing_input_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let args = ConvertArgs {
            input: dir.path().join("nope.css"),
            output: None,
        };
        let err = handle(&args, &NestConfig::default(), &flags()).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn parse_error_carries_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("broken.css");
        std::fs::write(&input, ".a { color: red;").unwrap();
        let args = ConvertArgs {
            input,
            output: None,
        };
        let err = handle(&args, &NestConfig::default(), &flags()).unwrap_err();
        assert!(format!("{err:#}").contains("broken.css"));
    }
}
