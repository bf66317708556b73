use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use notes_gateway::config::LoggingConfig;
use notes_gateway::{GatewayConfig, NotesGatewayModule};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const ENV_PREFIX: &str = "NOTES_GATEWAY__";

#[derive(Parser, Debug)]
#[command(name = "notes-gateway-server", version, about = "Notes API gateway")]
struct Cli {
    /// YAML configuration file; `NOTES_GATEWAY__*` variables override it.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the effective configuration as JSON and exit.
    #[arg(long)]
    print_config: bool,

    /// Log at debug level, ignoring `RUST_LOG` and `logging.level`.
    #[arg(short, long)]
    verbose: bool,
}

fn load_config(path: Option<&Path>, env_prefix: &str) -> anyhow::Result<GatewayConfig> {
    let mut figment = Figment::from(Serialized::defaults(GatewayConfig::default()));
    if let Some(path) = path {
        anyhow::ensure!(
            path.is_file(),
            "config file {} does not exist",
            path.display()
        );
        figment = figment.merge(Yaml::file(path));
    }
    let cfg: GatewayConfig = figment
        .merge(Env::prefixed(env_prefix).split("__"))
        .extract()
        .context("invalid configuration")?;
    cfg.validate()?;
    Ok(cfg)
}

fn init_logging(cfg: &LoggingConfig, verbose: bool) -> anyhow::Result<()> {
    let filter = if verbose {
        EnvFilter::try_new("debug")?
    } else {
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&cfg.level))?
    };

    let registry = tracing_subscriber::registry().with(filter);
    if cfg.json {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()?;
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init()?;
    }
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl-C");
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
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    info!("shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = load_config(cli.config.as_deref(), ENV_PREFIX)?;

    if cli.print_config {
        println!("{}", serde_json::to_string_pretty(&cfg)?);
        return Ok(());
    }

    init_logging(&cfg.logging, cli.verbose)?;

    let module = NotesGatewayModule::new(&cfg)?;
    let ip: IpAddr = cfg
        .listen
        .bind_ip
        .parse()
        .with_context(|| format!("invalid listen.bind_ip '{}'", cfg.listen.bind_ip))?;
    let addr = SocketAddr::new(ip, cfg.listen.port);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "notes gateway listening");

    axum::serve(listener, module.router())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("notes gateway stopped");
    Ok(())
}
