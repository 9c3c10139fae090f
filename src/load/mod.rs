// src/load/mod.rs

use anyhow::{Context, Result};
use tracing::{debug, error, info, instrument, warn};

use crate::fetch::Source;
use crate::record::{Collection, Record};

pub mod lookups;

pub use lookups::{load_lookups, JurisdictionLayout, LookupFiles, LookupTables};

/// How shard files are named: `<prefix><index zero-padded to width>.<extension>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShardNaming {
    pub prefix: String,
    pub width: usize,
    pub extension: String,
}

impl Default for ShardNaming {
    fn default() -> Self {
        Self {
            prefix: "shard_".to_string(),
            width: 2,
            extension: "json".to_string(),
        }
    }
}

impl ShardNaming {
    pub fn name(&self, index: usize) -> String {
        format!(
            "{}{:0width$}.{}",
            self.prefix,
            index,
            self.extension,
            width = self.width
        )
    }
}

/// Why a shard contributed nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    Fetch(String),
    Parse(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedShard {
    pub name: String,
    pub reason: SkipReason,
}

/// What happened during a load, shard by shard.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub loaded: Vec<String>,
    pub skipped: Vec<SkippedShard>,
    pub records: usize,
}

/// Parse one shard body: a JSON array of flat objects.
pub fn parse_shard(body: &str) -> Result<Vec<Record>> {
    serde_json::from_str(body).context("shard is not an array of flat records")
}

/// Fetch shards `1..=shard_count` one after another and merge what parses.
///
/// A shard that fails to fetch or parse is logged and skipped; nothing is
/// retried and nothing already merged is rolled back.
#[instrument(level = "info", skip(source, naming))]
pub async fn load_all<S: Source>(
    source: &S,
    naming: &ShardNaming,
    shard_count: usize,
) -> (Collection, LoadReport) {
    let mut records = Vec::new();
    let mut report = LoadReport::default();

    for index in 1..=shard_count {
        let name = naming.name(index);
        debug!(shard = %name, "fetching");

        let body = match source.fetch(&name).await {
            Ok(body) => body,
            Err(e) => {
                warn!(shard = %name, error = %e, "skipping shard: fetch failed");
                report.skipped.push(SkippedShard {
                    name,
                    reason: SkipReason::Fetch(format!("{:#}", e)),
                });
                continue;
            }
        };

        match parse_shard(&body) {
            Ok(parsed) => {
                debug!(shard = %name, records = parsed.len(), "parsed");
                records.extend(parsed);
                report.loaded.push(name);
            }
            Err(e) => {
                let reason = format!("{:#}", e);
                error!(shard = %name, error = %reason, "skipping shard: parse failed");
                report.skipped.push(SkippedShard {
                    name,
                    reason: SkipReason::Parse(reason),
                });
            }
        }
    }

    report.records = records.len();
    info!(
        loaded = report.loaded.len(),
        skipped = report.skipped.len(),
        records = report.records,
        "shards loaded"
    );
    (Collection::from(records), report)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use anyhow::anyhow;
    use std::collections::HashMap;
    use tracing_subscriber::{EnvFilter, FmtSubscriber};

    pub(crate) fn init_test_logging() {
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new("info,shardfilter=debug")),
            )
            .with_test_writer()
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    }

    /// In-memory source: a missing name answers like a 404.
    #[derive(Default)]
    pub(crate) struct FakeSource {
        pub(crate) files: HashMap<String, Result<String, u16>>,
    }

    impl FakeSource {
        pub(crate) fn put(&mut self, name: &str, body: &str) {
            self.files.insert(name.to_string(), Ok(body.to_string()));
        }

        pub(crate) fn fail(&mut self, name: &str, status: u16) {
            self.files.insert(name.to_string(), Err(status));
        }
    }

    impl Source for FakeSource {
        async fn fetch(&self, name: &str) -> anyhow::Result<String> {
            match self.files.get(name) {
                Some(Ok(body)) => Ok(body.clone()),
                Some(Err(status)) => Err(anyhow!("GET {}: HTTP {}", name, status)),
                None => Err(anyhow!("GET {}: HTTP 404", name)),
            }
        }
    }

    fn shard_body(index: usize) -> String {
        format!(
            r#"[{{"Key": "K{i}-a", "Division": "D{i}"}}, {{"Key": "K{i}-b", "Division": "D{i}"}}]"#,
            i = index
        )
    }

    #[test]
    fn test_shard_names() {
        let naming = ShardNaming::default();
        assert_eq!(naming.name(1), "shard_01.json");
        assert_eq!(naming.name(50), "shard_50.json");

        let legacy = ShardNaming {
            prefix: "bird_github".to_string(),
            ..ShardNaming::default()
        };
        assert_eq!(legacy.name(7), "bird_github07.json");
    }

    #[tokio::test]
    async fn test_failed_shard_is_skipped_in_order() {
        init_test_logging();
        let naming = ShardNaming::default();
        let mut source = FakeSource::default();
        for i in 1..=50 {
            if i == 7 {
                source.fail(&naming.name(i), 404);
            } else {
                source.put(&naming.name(i), &shard_body(i));
            }
        }

        let (collection, report) = load_all(&source, &naming, 50).await;

        assert_eq!(collection.len(), 98);
        assert_eq!(report.records, 98);
        assert_eq!(report.loaded.len(), 49);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].name, "shard_07.json");
        assert!(matches!(report.skipped[0].reason, SkipReason::Fetch(_)));

        let expected: Vec<String> = (1..=50)
            .filter(|i| *i != 7)
            .flat_map(|i| [format!("K{}-a", i), format!("K{}-b", i)])
            .collect();
        let keys: Vec<String> = collection.iter().map(|r| r.text("Key")).collect();
        assert_eq!(keys, expected);
    }

    #[tokio::test]
    async fn test_unparseable_shard_is_skipped() {
        init_test_logging();
        let naming = ShardNaming::default();
        let mut source = FakeSource::default();
        source.put("shard_01.json", &shard_body(1));
        source.put("shard_02.json", "[{\"Key\": ");
        source.put("shard_03.json", r#"[{"Key": "x", "nested": {"a": 1}}]"#);
        source.put("shard_04.json", &shard_body(4));

        let (collection, report) = load_all(&source, &naming, 4).await;

        assert_eq!(collection.len(), 4);
        assert_eq!(report.loaded, vec!["shard_01.json", "shard_04.json"]);
        assert_eq!(report.skipped.len(), 2);
        assert!(report
            .skipped
            .iter()
            .all(|s| matches!(s.reason, SkipReason::Parse(_))));
    }

    #[tokio::test]
    async fn test_zero_shards_is_empty() {
        let source = FakeSource::default();
        let (collection, report) = load_all(&source, &ShardNaming::default(), 0).await;
        assert!(collection.is_empty());
        assert_eq!(report, LoadReport::default());
    }

    #[test]
    fn test_parse_shard_accepts_empty_array() {
        assert!(parse_shard("[]").unwrap().is_empty());
        assert!(parse_shard(r#"{"Key": "a"}"#).is_err());
    }
}
