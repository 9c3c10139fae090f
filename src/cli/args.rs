// src/cli/args.rs

use anyhow::Result;
use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;

use crate::config::Settings;
use crate::filter::ConstraintSet;
use crate::load::JurisdictionLayout;
use crate::render::{NullPolicy, OptionStrategy};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Csv,
    Json,
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "shardfilter",
    version,
    about = "Load sharded JSON records and filter them like the published table does",
    long_about = "Loads shard_01.json .. shard_50.json plus unique_values.json and jur_dict.json \
from a base URL or a local directory, applies the given filters and prints the matching rows.\n\n\
Examples:\n  shardfilter https://example.org/data/ -f Division=\"Division II\" -f Total_fsi='>=100'\n  \
shardfilter ./data --prefix bird_github --format csv --columns Key,organization_name,Total_fsi"
)]
pub struct CliArgs {
    #[arg(value_name = "SOURCE", help = "Base URL or directory holding the data files.")]
    pub source: String,

    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        help = "YAML settings file; flags override it."
    )]
    pub config: Option<PathBuf>,

    #[arg(long = "shards", value_name = "N", help = "Number of shard files to request.")]
    pub shards: Option<usize>,

    #[arg(long = "prefix", value_name = "PREFIX", help = "Shard file name prefix.")]
    pub prefix: Option<String>,

    #[arg(
        short = 'f',
        long = "filter",
        value_name = "FIELD=VALUE",
        action = ArgAction::Append,
        help = "Constrain a field (repeatable). Total_fsi accepts <, <=, >, >=, =."
    )]
    pub filters: Vec<String>,

    #[arg(
        long = "columns",
        value_name = "NAMES",
        value_delimiter = ',',
        help = "Comma-separated column order; default renders every field."
    )]
    pub columns: Vec<String>,

    #[arg(long = "options", value_name = "lookup|derived", help = "Where dropdown options come from.")]
    pub options: Option<OptionStrategy>,

    #[arg(long = "nulls", value_name = "placeholder|exclude", help = "How null option values are shown.")]
    pub nulls: Option<NullPolicy>,

    #[arg(long = "jur-layout", value_name = "lists|keys", help = "Shape of jur_dict.json.")]
    pub jur_layout: Option<JurisdictionLayout>,

    #[arg(long = "format", value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    #[arg(long = "show-options", help = "Also print the dropdown option lists.")]
    pub show_options: bool,

    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, help = "Increase log verbosity.")]
    pub verbose: u8,
}

impl CliArgs {
    /// Settings from `--config` (or defaults) with flag overrides applied.
    pub fn settings(&self) -> Result<Settings> {
        let mut settings = match &self.config {
            Some(path) => Settings::from_yaml_file(path)?,
            None => Settings::default(),
        };
        if let Some(n) = self.shards {
            settings.shard_count = n;
        }
        if let Some(prefix) = &self.prefix {
            settings.shard_prefix = prefix.clone();
        }
        if !self.columns.is_empty() {
            settings.columns = Some(self.columns.clone());
        }
        if let Some(strategy) = self.options {
            settings.option_strategy = strategy;
        }
        if let Some(policy) = self.nulls {
            settings.null_policy = policy;
        }
        if let Some(layout) = self.jur_layout {
            settings.jurisdiction_layout = layout;
        }
        settings.validate()?;
        Ok(settings)
    }

    pub fn constraints(&self) -> Result<ConstraintSet> {
        self.filters
            .iter()
            .map(|f| ConstraintSet::parse_assignment(f))
            .collect()
    }

    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "info",
            1 => "info,shardfilter=debug",
            _ => "debug,shardfilter=trace",
        }
    }
}
