// src/fetch/mod.rs

use anyhow::Result;
use std::future::Future;

pub mod dir;
pub mod http;

pub use dir::DirSource;
pub use http::HttpSource;

/// Anything that can hand back a named resource as text.
///
/// Shards and lookup tables are addressed by bare file name; the source
/// decides where that name lives.
pub trait Source {
    fn fetch(&self, name: &str) -> impl Future<Output = Result<String>> + Send;
}

/// Either an HTTP base URL or a local directory, picked from a location string.
#[derive(Debug, Clone)]
pub enum DataSource {
    Http(HttpSource),
    Dir(DirSource),
}

impl DataSource {
    /// `http://` and `https://` locations go over the network, anything else
    /// is treated as a directory path.
    pub fn open(location: &str) -> Result<Self> {
        let lower = location.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Ok(DataSource::Http(HttpSource::new(location)?))
        } else {
            Ok(DataSource::Dir(DirSource::new(location)))
        }
    }
}

impl Source for DataSource {
    async fn fetch(&self, name: &str) -> Result<String> {
        match self {
            DataSource::Http(src) => src.fetch(name).await,
            DataSource::Dir(src) => src.fetch(name).await,
        }
    }
}
