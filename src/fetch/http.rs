// src/fetch/http.rs

use anyhow::{bail, Context, Result};
use reqwest::Client;
use tracing::debug;
use url::Url;

use super::Source;

/// Fetches resources relative to a base URL.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    base: Url,
}

impl HttpSource {
    pub fn new(base: &str) -> Result<Self> {
        Self::with_client(Client::new(), base)
    }

    pub fn with_client(client: Client, base: &str) -> Result<Self> {
        let mut base = Url::parse(base).with_context(|| format!("parsing base URL {}", base))?;
        if base.cannot_be_a_base() {
            bail!("{} cannot be used as a base URL", base);
        }
        // without the trailing slash `join` would replace the last segment
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self { client, base })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    pub fn url_for(&self, name: &str) -> Result<Url> {
        self.base
            .join(name)
            .with_context(|| format!("joining {} onto {}", name, self.base))
    }
}

impl Source for HttpSource {
    async fn fetch(&self, name: &str) -> Result<String> {
        let url = self.url_for(name)?;
        debug!(%url, "GET");
        let resp = self
            .client
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("GET {} failed", url))?;
        let status = resp.status();
        if !status.is_success() {
            bail!("GET {}: HTTP {}", url, status);
        }
        resp.text()
            .await
            .with_context(|| format!("reading body from {}", url))
    }
}
