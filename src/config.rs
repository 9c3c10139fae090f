// src/config.rs

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

use crate::load::{JurisdictionLayout, LookupFiles, ShardNaming};
use crate::render::{ColumnLayout, NullPolicy, OptionStrategy};

/// Number of shard files the published data set is split into.
pub const DEFAULT_SHARD_COUNT: usize = 50;

/// Everything that shapes a load and a render. Every field has a default,
/// so a YAML file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub shard_count: usize,
    pub shard_prefix: String,
    pub shard_width: usize,
    pub shard_extension: String,
    pub unique_values_file: String,
    pub jurisdiction_file: String,
    pub option_strategy: OptionStrategy,
    pub null_policy: NullPolicy,
    pub jurisdiction_layout: JurisdictionLayout,
    /// Fixed column order; unset renders whatever the records carry.
    pub columns: Option<Vec<String>>,
}

impl Default for Settings {
    fn default() -> Self {
        let naming = ShardNaming::default();
        let files = LookupFiles::default();
        Self {
            shard_count: DEFAULT_SHARD_COUNT,
            shard_prefix: naming.prefix,
            shard_width: naming.width,
            shard_extension: naming.extension,
            unique_values_file: files.unique_values,
            jurisdiction_file: files.jurisdictions,
            option_strategy: OptionStrategy::default(),
            null_policy: NullPolicy::default(),
            jurisdiction_layout: JurisdictionLayout::default(),
            columns: None,
        }
    }
}

impl Settings {
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let settings: Settings = serde_yaml::from_str(text).context("parsing settings YAML")?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_yaml_str(&text).with_context(|| format!("in config {}", path.display()))
    }

    pub fn validate(&self) -> Result<()> {
        if self.shard_extension.is_empty() {
            bail!("shard_extension must not be empty");
        }
        if self.unique_values_file.is_empty() || self.jurisdiction_file.is_empty() {
            bail!("lookup file names must not be empty");
        }
        if let Some(columns) = &self.columns {
            if columns.iter().any(|c| c.is_empty()) {
                bail!("columns must not contain empty names");
            }
        }
        Ok(())
    }

    pub fn naming(&self) -> ShardNaming {
        ShardNaming {
            prefix: self.shard_prefix.clone(),
            width: self.shard_width,
            extension: self.shard_extension.clone(),
        }
    }

    pub fn lookup_files(&self) -> LookupFiles {
        LookupFiles {
            unique_values: self.unique_values_file.clone(),
            jurisdictions: self.jurisdiction_file.clone(),
        }
    }

    pub fn layout(&self) -> ColumnLayout {
        match &self.columns {
            Some(columns) if !columns.is_empty() => ColumnLayout::Fixed(columns.clone()),
            _ => ColumnLayout::Dynamic,
        }
    }
}
