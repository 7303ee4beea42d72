use clap::Args;
use nest_config::{IndentType, NestConfig};

/// Command-line switches layered over the loaded configuration.
///
/// Every flag is optional; an absent flag keeps the configured value.
#[derive(Clone, Debug, Default, Args)]
pub struct ConfigOverrides {
    /// Spaces per indent level.
    #[arg(long, global = true, value_name = "N")]
    pub indent_size: Option<usize>,

    /// Indent with tabs.
    #[arg(long, global = true)]
    pub tabs: bool,

    /// Drop comments from the output.
    #[arg(long, global = true)]
    pub no_comments: bool,

    /// Sort declarations and nested rules.
    #[arg(long, global = true)]
    pub sort_properties: bool,

    /// Disable BEM-aware nesting.
    #[arg(long, global = true)]
    pub no_bem: bool,

    /// Disable prefix-based smart nesting.
    #[arg(long, global = true)]
    pub no_smart_nesting: bool,

    /// Deepest nesting level before selectors are folded.
    #[arg(long, global = true, value_name = "DEPTH")]
    pub max_depth: Option<usize>,

    /// Keep rules with identical declarations separate.
    #[arg(long, global = true)]
    pub no_dedup: bool,

    /// Keep media blocks where they appear instead of grouping them.
    #[arg(long, global = true)]
    pub no_media_grouping: bool,

    /// Disable variable extraction.
    #[arg(long, global = true)]
    pub no_variables: bool,

    /// Variable name prefix.
    #[arg(long, global = true, value_name = "PREFIX", allow_hyphen_values = true)]
    pub prefix: Option<String>,

    /// Occurrences needed before a value becomes a variable.
    #[arg(long, global = true, value_name = "N")]
    pub min_occurrences: Option<usize>,

    /// Do not extract color variables.
    #[arg(long, global = true)]
    pub no_colors: bool,

    /// Do not extract size variables.
    #[arg(long, global = true)]
    pub no_sizes: bool,

    /// Do not extract font variables.
    #[arg(long, global = true)]
    pub no_fonts: bool,

    /// Do not extract other variables.
    #[arg(long, global = true)]
    pub no_others: bool,
}

impl ConfigOverrides {
    pub fn apply(&self, config: &mut NestConfig) {
        if let Some(size) = self.indent_size {
            config.format.indent_size = size;
        }
        if self.tabs {
            config.format.indent_type = IndentType::Tabs;
        }
        if self.no_comments {
            config.format.preserve_comments = false;
        }
        if self.sort_properties {
            config.format.sort_properties = true;
        }

        if self.no_bem {
            config.nesting.enable_bem = false;
        }
        if self.no_smart_nesting {
            config.nesting.enable_smart_nesting = false;
        }
        if let Some(depth) = self.max_depth {
            config.nesting.max_nesting_depth = depth;
        }

        if self.no_dedup {
            config.optimize.enable_duplicate_detection = false;
        }
        if self.no_media_grouping {
            config.optimize.enable_media_query_grouping = false;
        }

        let variables = &mut config.variables;
        if self.no_variables {
            variables.enabled = false;
        }
        if let Some(prefix) = &self.prefix {
            variables.prefix.clone_from(prefix);
        }
        if let Some(min) = self.min_occurrences {
            variables.min_occurrences = min;
        }
        variables.extract_colors &= !self.no_colors;
        variables.extract_sizes &= !self.no_sizes;
        variables.extract_fonts &= !self.no_fonts;
        variables.extract_others &= !self.no_others;
    }
}
