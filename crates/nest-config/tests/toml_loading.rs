//! Integration tests for TOML configuration loading.
//!
//! Uses figment::Jail for safe, sandboxed file and env var manipulation.

use figment::{
    Figment, Jail,
    providers::{Format, Serialized, Toml},
};
use nest_config::{IndentType, NestConfig};
use pretty_assertions::assert_eq;

#[test]
fn loads_format_section_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[format]
indent_size = 4
indent_type = "tabs"
preserve_comments = false
sort_properties = true
"#,
        )?;

        let config: NestConfig = Figment::from(Serialized::defaults(NestConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.format.indent_size, 4);
        assert_eq!(config.format.indent_type, IndentType::Tabs);
        assert!(!config.format.preserve_comments);
        assert!(config.format.sort_properties);
        Ok(())
    });
}

#[test]
fn partial_sections_keep_defaults() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[variables]
min_occurrences = 3
extract_others = false
"#,
        )?;

        let config: NestConfig = Figment::from(Serialized::defaults(NestConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.variables.min_occurrences, 3);
        assert!(!config.variables.extract_others);
        assert!(config.variables.extract_colors);
        assert_eq!(config.variables.prefix, "$");
        assert!(config.nesting.enable_bem);
        Ok(())
    });
}

#[test]
fn project_file_is_picked_up_by_load() {
    Jail::expect_with(|jail| {
        jail.create_file(
            ".cssnest.toml",
            r"
[nesting]
enable_bem = false
max_nesting_depth = 2

[optimize]
enable_media_query_grouping = false
",
        )?;

        let config = NestConfig::load().expect("config loads");
        assert!(!config.nesting.enable_bem);
        assert_eq!(config.nesting.max_nesting_depth, 2);
        assert!(!config.optimize.enable_media_query_grouping);
        assert!(config.optimize.enable_duplicate_detection);
        Ok(())
    });
}

#[test]
fn explicit_file_overrides_project_file() {
    Jail::expect_with(|jail| {
        jail.create_file(".cssnest.toml", "[variables]\nprefix = \"$proj-\"\n")?;
        jail.create_file("custom.toml", "[variables]\nprefix = \"$custom-\"\n")?;

        let config =
            NestConfig::load_from(std::path::Path::new("custom.toml")).expect("config loads");
        assert_eq!(config.variables.prefix, "$custom-");
        Ok(())
    });
}

#[test]
fn invalid_indent_type_is_rejected() {
    Jail::expect_with(|jail| {
        jail.create_file("config.toml", "[format]\nindent_type = \"zigzag\"\n")?;

        let result: Result<NestConfig, _> =
            Figment::from(Serialized::defaults(NestConfig::default()))
                .merge(Toml::file("config.toml"))
                .extract();
        assert!(result.is_err());
        Ok(())
    });
}
