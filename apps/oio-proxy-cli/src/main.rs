//! oio-proxy - diagnostic command line for the OpenIO SDS proxy.
//!
//! Each subcommand runs one proxy operation and writes the response body to
//! stdout. Logs go to stderr.
//!
//! # Usage
//!
//! ```text
//! OIO_PROXY_HOSTS=OPENIO=127.0.0.1:6000 oio-proxy show OPENIO/acct/photos/cat.jpg
//! oio-proxy list OPENIO/acct/photos --prefix 2024/ --max 100
//! ```
//!
//! Identifiers are written `NS/ACCOUNT/REFERENCE[/PATH]`. An empty namespace
//! (`/ACCOUNT/REFERENCE`) is replaced by `OIO_NS`.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `OIO_PROXY_HOSTS` | *(unset)* | `NS=host:port` pairs separated by `,` or `;` |
//! | `OIO_NS` | *(unset)* | Default namespace |
//! | `OIO_PROXY` | *(unset)* | Proxy host for the default namespace |
//! | `OIO_USER_AGENT` | `oio-proxy-client/<version>` | `User-Agent` header |
//! | `OIO_PROXY_TIMEOUT_MS` | `30000` | Timeout of one exchange |
//! | `LOG_LEVEL` | `info` | Log level filter |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use bytes::Bytes;
use clap::{Parser, Subcommand};
use oio_core::{OioUrl, SdsConfig};
use oio_proxy::{ContainerListInput, ContentCreateInput, HttpTransport, ProxyClient, Transport};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "oio-proxy", version, about, long_about = None, propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the chunk list of a content.
    Show {
        /// Content identifier.
        url: OioUrl,
    },
    /// Delete a content.
    #[command(alias = "rm")]
    Delete {
        /// Content identifier.
        url: OioUrl,
    },
    /// Point a content name at an existing content id.
    Link {
        /// Content identifier.
        url: OioUrl,
        /// Id of the existing content.
        id: String,
    },
    /// Reserve chunks for a new content.
    Prepare {
        /// Content identifier.
        url: OioUrl,
        /// Content size, in bytes.
        size: u64,
        /// Create the container if it does not exist.
        #[arg(long)]
        autocreate: bool,
    },
    /// Commit a content from a chunk list file.
    Create {
        /// Content identifier.
        url: OioUrl,
        /// Content size, in bytes.
        size: u64,
        /// JSON chunk list, as returned by `prepare`.
        chunks_file: PathBuf,
        /// Explicit content id.
        #[arg(long)]
        id: Option<String>,
    },
    /// List the contents of a container.
    #[command(alias = "ls")]
    List {
        /// Container identifier.
        url: OioUrl,
        /// Only list names starting with this prefix.
        #[arg(long)]
        prefix: Option<String>,
        /// Start after this name.
        #[arg(long)]
        marker: Option<String>,
        /// Stop before this name.
        #[arg(long)]
        end: Option<String>,
        /// Maximum number of entries.
        #[arg(long)]
        max: Option<u32>,
        /// Group names up to this character.
        #[arg(long)]
        delimiter: Option<char>,
    },
}

/// Initialize the tracing subscriber.
///
/// Uses `RUST_LOG` if set, otherwise falls back to the `LOG_LEVEL` config value.
fn init_tracing(log_level: &str) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(true)
        .init();

    Ok(())
}

/// Fill an empty namespace with the configured default one.
fn resolve_namespace(url: OioUrl, config: &SdsConfig) -> Result<OioUrl> {
    if url.namespace().is_some() {
        return Ok(url);
    }
    let Some(ns) = config.default_namespace.as_deref() else {
        return Ok(url);
    };
    let resolved = OioUrl::new(
        ns,
        url.account().unwrap_or_default(),
        url.reference().unwrap_or_default(),
    )?
    .with_path(url.path().unwrap_or_default())?;
    Ok(resolved)
}

/// Render the effective configuration for the startup trace.
fn config_json(config: &SdsConfig) -> Result<String> {
    serde_json::to_string(config).context("failed to serialize configuration")
}

fn run<T: Transport>(
    client: &ProxyClient<T>,
    config: &SdsConfig,
    cmd: Command,
    out: &mut impl Write,
) -> Result<()> {
    match cmd {
        Command::Show { url } => {
            let url = resolve_namespace(url, config)?;
            let body = client
                .content_show(&url)
                .with_context(|| format!("failed to show {url}"))?;
            out.write_all(&body)?;
        }
        Command::Delete { url } => {
            let url = resolve_namespace(url, config)?;
            client
                .content_delete(&url)
                .with_context(|| format!("failed to delete {url}"))?;
            writeln!(out, "deleted {url}")?;
        }
        Command::Link { url, id } => {
            let url = resolve_namespace(url, config)?;
            client
                .content_link(&url, &id)
                .with_context(|| format!("failed to link {url} to {id}"))?;
            writeln!(out, "linked {url} to {id}")?;
        }
        Command::Prepare {
            url,
            size,
            autocreate,
        } => {
            let url = resolve_namespace(url, config)?;
            let prepared = client
                .content_prepare(&url, size, autocreate)
                .with_context(|| format!("failed to prepare {url}"))?;
            let field = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".to_owned());
            writeln!(out, "chunk-size: {}", field(&prepared.chunk_size))?;
            writeln!(out, "version: {}", field(&prepared.version))?;
            writeln!(out, "content-id: {}", field(&prepared.content_id))?;
            out.write_all(&prepared.body)?;
        }
        Command::Create {
            url,
            size,
            chunks_file,
            id,
        } => {
            let url = resolve_namespace(url, config)?;
            let chunks = std::fs::read(&chunks_file)
                .with_context(|| format!("failed to read {}", chunks_file.display()))?;
            let input = ContentCreateInput {
                size,
                chunks: Bytes::from(chunks),
                content_id: id,
            };
            let body = client
                .content_create(&url, &input)
                .with_context(|| format!("failed to create {url}"))?;
            out.write_all(&body)?;
        }
        Command::List {
            url,
            prefix,
            marker,
            end,
            max,
            delimiter,
        } => {
            let url = resolve_namespace(url, config)?;
            let input = ContainerListInput {
                prefix,
                marker,
                end_marker: end,
                max: max.unwrap_or_default(),
                delimiter,
            };
            let body = client
                .container_list(&url, &input)
                .with_context(|| format!("failed to list {url}"))?;
            out.write_all(&body)?;
        }
    }
    out.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Arc::new(SdsConfig::from_env());
    init_tracing(&config.log_level)?;
    debug!(config = %config_json(&config)?, "loaded configuration");

    let transport =
        HttpTransport::from_config(&config).context("failed to build HTTP transport")?;
    let client = ProxyClient::from_config(transport, Arc::clone(&config));

    run(&client, &config, cli.cmd, &mut io::stdout().lock())
}
