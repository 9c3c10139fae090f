// src/session.rs

use anyhow::Result;
use tracing::{debug, info};

use crate::config::Settings;
use crate::fetch::Source;
use crate::filter::{ConstraintSet, Filter};
use crate::load::{load_all, load_lookups, LoadReport, LookupTables};
use crate::record::Collection;
use crate::render::{dropdowns, render_rows, Dropdowns, RenderedRows};

/// The presentation side: supplies the current constraints and receives
/// the rendered output. The engine never reaches past this trait.
pub trait Presenter {
    fn constraints(&self) -> ConstraintSet;
    fn render(&mut self, rows: &RenderedRows, options: &Dropdowns) -> Result<()>;
}

/// Everything one load produced. Immutable once built.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub records: Collection,
    pub lookups: LookupTables,
    pub report: LoadReport,
    pub options: Dropdowns,
}

/// Holds the settings and, once loaded, the dataset. Until a load finishes,
/// refreshing does nothing.
#[derive(Debug, Clone)]
pub struct Session {
    settings: Settings,
    dataset: Option<Dataset>,
}

impl Session {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            dataset: None,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        self.dataset.as_ref()
    }

    pub fn is_loaded(&self) -> bool {
        self.dataset.is_some()
    }

    /// Load shards, then lookups, and build the option lists. Replaces any
    /// previously loaded dataset.
    pub async fn load<S: Source>(&mut self, source: &S) -> &Dataset {
        let settings = &self.settings;
        let (records, report) = load_all(source, &settings.naming(), settings.shard_count).await;
        let lookups = load_lookups(source, &settings.lookup_files()).await;
        let options = dropdowns(
            &records,
            &lookups,
            settings.option_strategy,
            settings.jurisdiction_layout,
            settings.null_policy,
        );
        info!(
            records = records.len(),
            dropdowns = options.len(),
            strategy = ?settings.option_strategy,
            "dataset ready"
        );
        self.dataset.insert(Dataset {
            records,
            lookups,
            report,
            options,
        })
    }

    /// Filter with the presenter's constraints and hand it the result.
    /// Returns `Ok(false)` without calling the presenter if nothing is loaded.
    pub fn refresh<P: Presenter>(&self, presenter: &mut P) -> Result<bool> {
        let Some(dataset) = &self.dataset else {
            debug!("refresh before load; ignoring");
            return Ok(false);
        };
        let constraints = presenter.constraints();
        let filtered =
            Filter::with_null_policy(&constraints, self.settings.null_policy).apply(&dataset.records);
        debug!(
            matched = filtered.len(),
            total = dataset.records.len(),
            "filtered"
        );
        let rows = render_rows(&filtered, &self.settings.layout());
        presenter.render(&rows, &dataset.options)?;
        Ok(true)
    }
}
