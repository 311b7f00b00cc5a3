mod args;

use std::process::ExitCode;

use anyhow::{Context as _, Result};
use args::Args;
use clap::Parser as _;
use nature_remo_exporter::{
    config::Config, metrics::MetricsRegistry, nature_remo::DeviceClient, refresh::RefreshEngine,
    server::MetricsServer,
};
use tokio::sync::oneshot;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt as _, util::SubscriberInitExt as _};

#[tokio::main]
async fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            // --help and --version land here too.
            return if e.use_stderr() {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    init_tracing();

    if let Err(e) = run(args).await {
        eprintln!("{e:#}");
        return ExitCode::from(1);
    }

    ExitCode::from(0)
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nature_remo_exporter=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn run(args: Args) -> Result<()> {
    let config = Config::load(&args.config)
        .with_context(|| format!("failed to load configuration: {:?}", args.config))?;

    let registry = MetricsRegistry::new().context("failed to register gauges")?;

    let client = DeviceClient::from_config(&config.nature_remo)
        .context("failed to build Nature Remo client")?;

    let listener = MetricsServer::bind(&config.promhttp.listen_address)
        .await
        .context("failed to start metrics server")?;

    info!(
        base_url = %config.nature_remo.base_url,
        listen_address = %config.promhttp.listen_address,
        "starting nature-remo-exporter {}",
        env!("CARGO_PKG_VERSION")
    );

    let (stop_refresh, refresh_stopped) = oneshot::channel();
    let refresh = tokio::spawn(RefreshEngine::new(client, registry.clone()).run(refresh_stopped));

    MetricsServer::new(registry)
        .serve(listener, shutdown_signal())
        .await
        .context("metrics server stopped")?;

    let _ = stop_refresh.send(());
    refresh.await.context("refresh loop terminated abnormally")?;

    info!("shut down");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("failed to listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("failed to listen for SIGTERM: {e}");
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

    info!("shutdown signal received");
}
