// src/cli/presenter.rs

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::{Map, Value};
use std::{collections::BTreeMap, io::Write};

use super::args::OutputFormat;
use crate::filter::ConstraintSet;
use crate::render::{DropdownOption, Dropdowns, RenderedRows};
use crate::session::Presenter;

/// Writes rendered rows to a terminal (or any writer) in the chosen format.
pub struct TerminalPresenter<W: Write> {
    constraints: ConstraintSet,
    format: OutputFormat,
    show_options: bool,
    out: W,
}

#[derive(Serialize)]
struct JsonView<'a> {
    columns: &'a [String],
    rows: Vec<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<BTreeMap<String, &'a [DropdownOption]>>,
}

impl<W: Write> TerminalPresenter<W> {
    pub fn new(constraints: ConstraintSet, format: OutputFormat, show_options: bool, out: W) -> Self {
        Self {
            constraints,
            format,
            show_options,
            out,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_table(&mut self, rows: &RenderedRows, options: &Dropdowns) -> Result<()> {
        let mut widths: Vec<usize> = rows.columns.iter().map(|c| c.chars().count()).collect();
        for row in &rows.rows {
            for (w, cell) in widths.iter_mut().zip(row) {
                *w = (*w).max(cell.chars().count());
            }
        }

        if !rows.columns.is_empty() {
            let header: Vec<&str> = rows.columns.iter().map(String::as_str).collect();
            write_padded(&mut self.out, &header, &widths)?;
            let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
            let rule: Vec<&str> = rule.iter().map(String::as_str).collect();
            write_padded(&mut self.out, &rule, &widths)?;
            for row in &rows.rows {
                let cells: Vec<&str> = row.iter().map(String::as_str).collect();
                write_padded(&mut self.out, &cells, &widths)?;
            }
        }
        writeln!(self.out, "({} rows)", rows.len())?;

        if self.show_options {
            writeln!(self.out)?;
            for (field, opts) in options {
                let labels: Vec<&str> = opts.iter().map(|o| o.label.as_str()).collect();
                writeln!(self.out, "{}: {}", field, labels.join(" | "))?;
            }
        }
        Ok(())
    }

    fn write_csv(&mut self, rows: &RenderedRows) -> Result<()> {
        if rows.columns.is_empty() {
            return Ok(());
        }
        let mut wtr = csv::Writer::from_writer(&mut self.out);
        wtr.write_record(&rows.columns).context("writing CSV header")?;
        for row in &rows.rows {
            wtr.write_record(row).context("writing CSV row")?;
        }
        wtr.flush().context("flushing CSV output")?;
        Ok(())
    }

    fn write_json(&mut self, rows: &RenderedRows, options: &Dropdowns) -> Result<()> {
        let objects = rows
            .rows
            .iter()
            .map(|row| {
                rows.columns
                    .iter()
                    .cloned()
                    .zip(row.iter().cloned().map(Value::String))
                    .collect::<Map<String, Value>>()
            })
            .collect();
        let view = JsonView {
            columns: &rows.columns,
            rows: objects,
            options: self.show_options.then(|| {
                options
                    .iter()
                    .map(|(field, opts)| (field.to_string(), opts.as_slice()))
                    .collect()
            }),
        };
        serde_json::to_writer_pretty(&mut self.out, &view).context("writing JSON output")?;
        writeln!(self.out)?;
        Ok(())
    }
}

fn write_padded<W: Write>(out: &mut W, cells: &[&str], widths: &[usize]) -> Result<()> {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, w)| format!("{:<width$}", cell, width = *w))
        .collect::<Vec<_>>()
        .join("  ");
    writeln!(out, "{}", line.trim_end())?;
    Ok(())
}

impl<W: Write> Presenter for TerminalPresenter<W> {
    fn constraints(&self) -> ConstraintSet {
        self.constraints.clone()
    }

    fn render(&mut self, rows: &RenderedRows, options: &Dropdowns) -> Result<()> {
        match self.format {
            OutputFormat::Table => self.write_table(rows, options)?,
            OutputFormat::Csv => self.write_csv(rows)?,
            OutputFormat::Json => self.write_json(rows, options)?,
        }
        self.out.flush().context("flushing output")?;
        Ok(())
    }
}
