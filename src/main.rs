use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::process::ExitCode;
use tracing::info;
use voice_bridge::{create_router, AppState, CallInitiator, CallOutcome, Config};

#[derive(Parser)]
#[command(name = "voice-bridge", about = "Bridge phone calls to a streaming speech endpoint")]
struct Cli {
    /// Config file (extension optional)
    #[arg(long, global = true, default_value = "config/voice-bridge")]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Place one outbound call
    Call {
        /// Destination number (defaults to numbers.destination)
        #[arg(long)]
        to: Option<String>,

        /// Streaming endpoint host; discovered from the tunnel agent when omitted
        #[arg(long)]
        host: Option<String>,
    },

    /// Run the webhook server
    Serve {
        #[arg(long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let cfg = Config::load(&cli.config).with_context(|| format!("Failed to load config {}", cli.config))?;

    match cli.command {
        Command::Call { to, host } => call(cfg, to, host).await,
        Command::Serve { port } => serve(cfg, port).await,
    }
}

async fn call(cfg: Config, to: Option<String>, host: Option<String>) -> Result<ExitCode> {
    let destination = to
        .or_else(|| cfg.numbers.destination.clone())
        .context("No destination: pass --to or set numbers.destination")?;

    let initiator = CallInitiator::new(cfg);
    let outcome = initiator
        .place_call(&destination, host)
        .await
        .context("Failed to place call")?;

    match outcome {
        CallOutcome::Created(_) => Ok(ExitCode::SUCCESS),
        // place_call has already logged the provider's body
        CallOutcome::Rejected { .. } => Ok(ExitCode::FAILURE),
    }
}

async fn serve(cfg: Config, port: Option<u16>) -> Result<ExitCode> {
    let addr = format!("{}:{}", cfg.service.http.bind, port.unwrap_or(cfg.service.http.port));

    info!("{}", "=".repeat(60));
    info!("Voice webhook server");
    info!("Phone: {}", cfg.numbers.service);
    info!("Connector: {}", cfg.streaming.host.as_deref().unwrap_or("<not configured>"));
    info!("{}", "=".repeat(60));

    let app = create_router(AppState::new(cfg));
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("HTTP server listening on {}", addr);
    axum::serve(listener, app).await.context("HTTP server failed")?;

    Ok(ExitCode::SUCCESS)
}
