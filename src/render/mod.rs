// src/render/mod.rs

use serde::Serialize;
use std::collections::HashSet;

use crate::record::Record;

pub mod dropdown;

pub use dropdown::{
    build_dropdown_options, dropdowns, DropdownOption, Dropdowns, NullPolicy, OptionStrategy,
};

/// Which columns a rendered row carries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ColumnLayout {
    /// Exactly these record keys, in this order.
    Fixed(Vec<String>),
    /// Whatever fields the records carry, in first-appearance order.
    #[default]
    Dynamic,
}

/// Display-ready rows: one string per cell, aligned to `columns`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RenderedRows {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RenderedRows {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn dynamic_columns(records: &[&Record]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut columns = Vec::new();
    for name in records.iter().flat_map(|r| r.names()) {
        if seen.insert(name) {
            columns.push(name.to_string());
        }
    }
    columns
}

/// Shape filtered records into cells. Missing fields and nulls become `""`.
pub fn render_rows(filtered: &[&Record], layout: &ColumnLayout) -> RenderedRows {
    let columns = match layout {
        ColumnLayout::Fixed(columns) => columns.clone(),
        ColumnLayout::Dynamic => dynamic_columns(filtered),
    };
    let rows = filtered
        .iter()
        .map(|record| columns.iter().map(|c| record.text(c)).collect())
        .collect();
    RenderedRows { columns, rows }
}
