//! stakeidx - aggregate every account's stake into one record per address.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use color_eyre::Result;
use color_eyre::eyre::{WrapErr, eyre};
use stakeidx_chain::{
    AccountsProcessor, HttpRestClient, IndexPayload, SnapshotAccountsGetter, resolve_index_name,
};
use stakeidx_core::Denomination;
use stakeidx_core::config::{self, AppConfig};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// stakeidx - merge the four stake sources and compute per-account totals.
#[derive(Parser, Debug)]
#[command(name = "stakeidx")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Config file (defaults to the platform config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Node/proxy REST API URL used for the network status query
    #[arg(long = "api-url")]
    api_url: Option<String>,

    /// Directory with legacy.json, validators.json, delegators.json and lkmex.json
    #[arg(short, long = "snapshot-dir")]
    snapshot_dir: Option<PathBuf>,

    /// Index name prefix; the current epoch is appended
    #[arg(long = "index-name")]
    index_name: Option<String>,

    /// Decimals the approximate totals are scaled down by
    #[arg(short, long)]
    denomination: Option<u8>,

    /// REST request timeout in seconds
    #[arg(long = "timeout")]
    timeout_secs: Option<u64>,

    /// Only resolve and print the index name
    #[arg(long)]
    index_only: bool,

    /// Write the result here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Save the effective configuration before running
    #[arg(long)]
    save_config: bool,
}

impl Args {
    /// Applies command-line overrides on top of the loaded configuration.
    fn apply(&self, mut config: AppConfig) -> AppConfig {
        if let Some(url) = &self.api_url {
            config.api_url = url.clone();
        }
        if let Some(dir) = &self.snapshot_dir {
            config.snapshot_dir = Some(dir.clone());
        }
        if let Some(name) = &self.index_name {
            config.base_index_name = name.clone();
        }
        if let Some(decimals) = self.denomination {
            config.denomination = Denomination::new(decimals);
        }
        if let Some(secs) = self.timeout_secs {
            config.request_timeout_secs = Some(secs);
        }
        config
    }
}

fn load_app_config(path: Option<&Path>) -> Result<AppConfig> {
    match path {
        Some(path) => config::load_config_from(path)
            .wrap_err_with(|| format!("Failed to load config from {}", path.display())),
        None => match config::load_config() {
            Ok(config) => Ok(config),
            Err(config::ConfigError::Other(reason)) => {
                tracing::warn!("{}, using default configuration", reason);
                Ok(AppConfig::default())
            }
            Err(e) => Err(e).wrap_err("Failed to load config"),
        },
    }
}

fn build_rest_client(config: &AppConfig) -> Result<HttpRestClient> {
    let mut builder = reqwest::Client::builder();
    if let Some(secs) = config.request_timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    let client = builder.build().wrap_err("Failed to build HTTP client")?;
    Ok(HttpRestClient::with_client(config.api_url.clone(), client))
}

fn write_output(output: Option<&Path>, content: &str) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, content)
                .wrap_err_with(|| format!("Failed to write {}", path.display()))?;
            tracing::info!("Wrote {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(content.as_bytes())?;
            stdout.write_all(b"\n")?;
        }
    }
    Ok(())
}

fn render_payload(payload: &IndexPayload) -> Result<String> {
    serde_json::to_string_pretty(payload).wrap_err("Failed to serialize accounts")
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    color_eyre::install()?;

    // Logs go to stderr so stdout stays clean for the JSON output
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive("stakeidx=info".parse()?)
        .add_directive("stakeidx_chain=info".parse()?)
        .add_directive("stakeidx_core=info".parse()?);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let app_config = args.apply(load_app_config(args.config.as_deref())?);
    app_config.validate()?;

    if args.save_config {
        match &args.config {
            Some(path) => config::save_config_to(&app_config, path)?,
            None => config::save_config(&app_config)?,
        }
        tracing::info!("Saved configuration");
    }

    let rest_client = build_rest_client(&app_config)?;
    tracing::info!("Using REST API at {}", rest_client.base_url());

    if args.index_only {
        let index = resolve_index_name(&rest_client, &app_config.base_index_name).await?;
        return write_output(args.output.as_deref(), &index);
    }

    let snapshot_dir = app_config
        .snapshot_dir
        .clone()
        .ok_or_else(|| eyre!("No snapshot directory configured (use --snapshot-dir)"))?;

    let processor = AccountsProcessor::new(
        rest_client,
        SnapshotAccountsGetter::new(snapshot_dir),
        app_config.base_index_name.clone(),
    )
    .with_denomination(app_config.denomination);

    let payload = processor.prepare_index().await?;
    write_output(args.output.as_deref(), &render_payload(&payload)?)
}
