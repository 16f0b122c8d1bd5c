use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use secrecy::{ExposeSecret, SecretString};
use tracing_subscriber::EnvFilter;

use splitbot_gateway::agent::{Conversational, OpenAiChat};
use splitbot_gateway::api::ApiServer;
use splitbot_gateway::channels::TelegramChannel;
use splitbot_gateway::config::webhook_url_for;
use splitbot_gateway::ocr::MistralOcr;
use splitbot_gateway::{Config, Pipeline};

/// Split Bot - Telegram receipt reader
#[derive(Parser)]
#[command(name = "splitbot", version, about)]
struct Cli {
    /// Port to listen on (overrides `PORT` and the config file)
    #[arg(long)]
    port: Option<u16>,

    /// Path to the TOML config file
    #[arg(short, long, env = "SPLITBOT_CONFIG")]
    config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the webhook (default)
    Serve,
    /// Register the Telegram webhook and exit
    SetWebhook {
        /// Public base URL; defaults to `BACKEND_URL`
        url: Option<String>,
    },
    /// Remove the Telegram webhook and exit
    DeleteWebhook,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "info,splitbot_gateway=info",
        1 => "info,splitbot_gateway=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    tracing::debug!(?config, "loaded configuration");

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(&config).await,
        Command::SetWebhook { url } => set_webhook(&config, url.as_deref()).await,
        Command::DeleteWebhook => {
            telegram(&config)?.delete_webhook().await?;
            Ok(())
        }
    }
}

fn telegram(config: &Config) -> anyhow::Result<TelegramChannel> {
    Ok(TelegramChannel::new(config.telegram_token()?, &config.telegram)?)
}

fn webhook_secret(config: &Config) -> Option<&str> {
    config
        .telegram
        .webhook_secret
        .as_ref()
        .map(|s| s.expose_secret())
}

async fn set_webhook(config: &Config, base: Option<&str>) -> anyhow::Result<()> {
    let url = match base {
        Some(base) => webhook_url_for(base)?,
        None => config
            .telegram
            .webhook_url()?
            .ok_or_else(|| anyhow::anyhow!("no URL given and BACKEND_URL is not set"))?,
    };

    telegram(config)?
        .set_webhook(url.as_str(), webhook_secret(config))
        .await?;
    Ok(())
}

async fn serve(config: &Config) -> anyhow::Result<()> {
    let telegram = Arc::new(telegram(config)?);
    let ocr = Arc::new(MistralOcr::new(config.ocr_api_key()?, &config.ocr)?);

    let agent: Option<Arc<dyn Conversational>> = if config.agent.is_active() {
        let chat = OpenAiChat::from_config(&config.agent)?;
        tracing::info!(model = %config.agent.model, "conversational agent enabled");
        Some(Arc::new(chat))
    } else {
        tracing::info!("conversational agent disabled, echoing plain text");
        None
    };

    // A previously registered webhook stays in effect if this fails
    if let Some(url) = config.telegram.webhook_url()? {
        if let Err(e) = telegram
            .set_webhook(url.as_str(), webhook_secret(config))
            .await
        {
            tracing::warn!(error = %e, "failed to register Telegram webhook");
        }
    } else {
        tracing::info!("BACKEND_URL not set, skipping webhook registration");
    }

    if config.telegram.webhook_secret.is_none() {
        tracing::warn!("TELEGRAM_WEBHOOK_SECRET not set, webhook requests are not authenticated");
    }

    let pipeline = Arc::new(Pipeline::new(telegram, ocr, agent));

    tracing::info!(
        host = %config.server.host,
        port = config.server.port,
        ocr_model = %config.ocr.model,
        "starting splitbot gateway"
    );

    let secret = webhook_secret(config).map(|s| SecretString::from(s.to_string()));
    ApiServer::new(pipeline, secret, &config.server).run().await?;

    Ok(())
}
