// src/lib.rs

pub mod cli;
pub mod config;
pub mod fetch;
pub mod filter;
pub mod load;
pub mod record;
pub mod render;
pub mod session;

pub use config::Settings;
pub use fetch::{DataSource, DirSource, HttpSource, Source};
pub use filter::{evaluate, filter_collection, ConstraintSet};
pub use load::{load_all, load_lookups, LoadReport, LookupTables, ShardNaming};
pub use record::{Collection, Field, FieldKind, Record, Scalar};
pub use render::{build_dropdown_options, dropdowns, render_rows, ColumnLayout, RenderedRows};
pub use session::{Dataset, Presenter, Session};
