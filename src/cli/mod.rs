// src/cli/mod.rs

pub mod args;
pub mod presenter;

pub use args::{CliArgs, OutputFormat};
pub use presenter::TerminalPresenter;
