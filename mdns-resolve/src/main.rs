mod config;

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use anyhow::{Context, Result};
use mdns_resolver::{Builder, MdnsBuilder, Resolver, Target};
use shared::types::ResolverState;
use crate::config::{Config, OutputFormat};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("mdns_resolve=info,mdns_resolver=info"))
        )
        .init();

    let mut args = std::env::args().skip(1);
    let target = args
        .next()
        .context("Usage: mdns-resolve <mdns://service/instance.domain> [config.toml]")?;

    let config = match args.next() {
        Some(path) => {
            let config = Config::load(&path)
                .with_context(|| format!("Failed to load config from {}", path))?;
            tracing::info!("Loaded config from {}", path);
            config
        }
        None => Config::default(),
    };

    let target = Target::parse(&target)
        .with_context(|| format!("Invalid target {}", target))?;

    let builder = MdnsBuilder::new(config.resolver.clone());
    if target.scheme != builder.scheme() {
        anyhow::bail!("Unsupported scheme {:?}, expected {:?}", target.scheme, builder.scheme());
    }

    let (state_tx, state_rx) = watch::channel(ResolverState::default());
    let mut resolver = builder
        .build(&target, Arc::new(state_tx))
        .with_context(|| format!("Failed to start resolver for {}", target))?;

    tracing::info!("Resolving {}", target);

    // Create cancellation token for graceful shutdown
    let cancel = CancellationToken::new();

    let printer_cancel = cancel.clone();
    let output = config.client.output;
    let printer_handle = tokio::spawn(async move {
        if let Err(e) = print_updates(state_rx, output, printer_cancel).await {
            tracing::error!("Printer error: {}", e);
        }
    });

    let refresh = config.client.refresh_interval_secs.map(Duration::from_secs);
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            result = &mut shutdown => {
                result.context("Failed to listen for ctrl-c")?;
                break;
            }
            _ = wait_refresh(refresh) => {
                tracing::debug!("Requesting re-resolution of {}", target);
                resolver.resolve_now();
            }
        }
    }

    tracing::info!("Shutdown signal received");

    cancel.cancel();
    resolver.close().await;
    if let Err(e) = printer_handle.await {
        tracing::error!("Printer task failed: {}", e);
    }

    tracing::info!("Shutdown complete");
    Ok(())
}

async fn wait_refresh(interval: Option<Duration>) {
    match interval {
        Some(interval) => tokio::time::sleep(interval).await,
        None => std::future::pending().await,
    }
}

async fn print_updates(
    mut rx: watch::Receiver<ResolverState>,
    output: OutputFormat,
    cancel: CancellationToken,
) -> Result<()> {
    loop {
        tokio::select! {
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = rx.borrow_and_update().clone();
                match output {
                    OutputFormat::Text => println!("{}", state.addrs().join(", ")),
                    OutputFormat::Json => println!(
                        "{}",
                        serde_json::to_string(&state).context("Failed to serialize update")?
                    ),
                }
            }
            _ = cancel.cancelled() => break,
        }
    }

    Ok(())
}
