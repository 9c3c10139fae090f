use anyhow::{Context, Result};
use clap::Parser;
use shardfilter::{
    cli::{CliArgs, TerminalPresenter},
    DataSource, Session,
};
use std::io;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();

    // ─── 1) init logging ─────────────────────────────────────────────
    // stdout carries the rendered rows, so logs go to stderr
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(args.log_filter()));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(io::stderr)
        .init();

    std::panic::set_hook(Box::new(|info| {
        eprintln!("panic: {:?}", info);
    }));

    // ─── 2) configure ────────────────────────────────────────────────
    let settings = args.settings().context("loading settings")?;
    let constraints = args.constraints().context("parsing filters")?;
    let source = DataSource::open(&args.source)
        .with_context(|| format!("opening source {}", args.source))?;
    info!(source = %args.source, shards = settings.shard_count, "startup");

    // ─── 3) load shards + lookups ────────────────────────────────────
    let mut session = Session::new(settings);
    let dataset = session.load(&source).await;
    if dataset.records.is_empty() {
        warn!("no records loaded; every shard failed or was empty");
    }

    // ─── 4) filter + render ──────────────────────────────────────────
    let stdout = io::stdout();
    let mut presenter = TerminalPresenter::new(constraints, args.format, args.show_options, stdout.lock());
    session.refresh(&mut presenter).context("rendering output")?;

    Ok(())
}
