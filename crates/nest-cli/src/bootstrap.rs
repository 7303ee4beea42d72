use anyhow::Context;
use nest_config::NestConfig;

use crate::cli::{ConfigOverrides, GlobalFlags};

/// Load layered configuration, apply command-line overrides and validate.
pub fn load_config(flags: &GlobalFlags, overrides: &ConfigOverrides) -> anyhow::Result<NestConfig> {
    let mut config = match &flags.config {
        Some(path) => NestConfig::load_from(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => NestConfig::load().context("failed to load cssnest configuration")?,
    };
    overrides.apply(&mut config);
    config.validate().context("invalid cssnest configuration")?;

    tracing::debug!(
        indent_size = config.format.indent_size,
        bem = config.nesting.enable_bem,
        variables = config.variables.enabled,
        "configuration loaded"
    );
    Ok(config)
}
