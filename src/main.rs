use std::io::Read;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use xai_proxy::{app, cli, config, proxy, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "xai_proxy=debug,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = config::load()?;
    let args = cli::Cli::parse();

    let result = match args.command {
        Some(cli::Commands::Serve { port, upstream }) => {
            let mut cfg = cfg;
            if let Some(port) = port {
                cfg.port = port;
            }
            if let Some(upstream) = upstream {
                cfg = cfg.with_upstream(upstream.trim_end_matches('/'));
                cfg.validate()?;
            }
            run_server(cfg).await
        }
        Some(cli::Commands::Filter { file }) => handle_filter_command(&cfg, file),
        None => run_server(cfg).await,
    };

    if let Err(ref e) = result {
        eprintln!("Error: {:?}", e);
    }
    result
}

async fn run_server(cfg: config::Config) -> anyhow::Result<()> {
    if !cfg.passthrough_cors {
        tracing::info!(
            "Generic /v1/* responses are relayed without CORS headers \
             (set XAI_PROXY_PASSTHROUGH_CORS=true to add Access-Control-Allow-Origin)"
        );
    }

    let port = cfg.port;
    let upstream = cfg.upstream_url.clone();
    let state = Arc::new(AppState::new(cfg)?);
    let app = app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!(%upstream, "xai-proxy listening on {}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!("failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutting down");
}

fn handle_filter_command(
    cfg: &config::Config,
    file: Option<std::path::PathBuf>,
) -> anyhow::Result<()> {
    let raw = match file {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read stdin")?;
            buf
        }
    };

    let body: serde_json::Value = serde_json::from_str(&raw).context("body is not valid JSON")?;
    let result = proxy::filter::filter_params(&body, cfg.image_params.as_slice());
    for key in &result.dropped {
        eprintln!("dropped: {}", key);
    }
    println!(
        "{}",
        serde_json::to_string_pretty(&serde_json::Value::Object(result.body))?
    );
    Ok(())
}
