mod api;
mod commands;
mod console;
mod gateway;
mod i18n;

use clap::{Parser, Subcommand};
use convoy_channels::{
    media::GraphMediaSource, voice::VoicePipeline, whatsapp::WhatsAppChannel,
    whisper::WhisperTranscriber,
};
use convoy_core::{
    config::{self, Config},
    message::InboundMessage,
    shellexpand,
    traits::{Channel, ConversationStore, Transcriber},
};
use convoy_memory::{AuditLogger, Store};
use convoy_providers::{HttpAccountDirectory, HttpActionHandler, HttpIntentClassifier};
use gateway::Gateway;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Processed message ids older than this are forgotten at startup.
const DEDUP_RETENTION_DAYS: u32 = 7;

#[derive(Parser)]
#[command(
    name = "convoy",
    version,
    about = "Convoy — conversational back office for transport businesses"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file.
    #[arg(short, long, default_value = "config.toml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the WhatsApp webhook.
    Start,
    /// Show configuration and store health.
    Status,
    /// Clear the dialogue state of one identity (history is kept).
    Reset {
        /// Channel identity, e.g. the WhatsApp number.
        identity: String,
    },
    /// Run one message through the pipeline and print the replies.
    Ask {
        /// Identity to speak as.
        #[arg(long, default_value = "console")]
        identity: String,
        /// The message to send.
        #[arg(trailing_var_arg = true)]
        message: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load(&cli.config)?;
    let _guard = init_tracing(&cfg)?;

    match cli.command {
        Commands::Start => {
            let wa = match cfg.channel.whatsapp {
                Some(ref wa) if wa.enabled => wa.clone(),
                _ => anyhow::bail!(
                    "WhatsApp is not enabled. Set [channel.whatsapp] enabled = true in {}.",
                    cli.config
                ),
            };
            if wa.access_token.is_empty() || wa.phone_number_id.is_empty() {
                anyhow::bail!(
                    "WhatsApp is enabled but access_token or phone_number_id is empty. \
                     Set them in config.toml or CONVOY_WHATSAPP_TOKEN."
                );
            }
            if cfg.api.verify_token.is_empty() {
                warn!("api.verify_token is empty; webhook subscription will be refused");
            }

            let store = Store::new(&cfg.memory).await?;
            match store.prune_processed(DEDUP_RETENTION_DAYS).await {
                Ok(n) if n > 0 => info!("pruned {n} processed message ids"),
                Ok(_) => {}
                Err(e) => warn!("pruning processed message ids failed: {e}"),
            }

            let source = Arc::new(GraphMediaSource::new(&wa));
            let transcriber = if wa.whisper_api_key.is_empty() {
                warn!("whisper_api_key is empty; voice notes will be declined");
                None
            } else {
                Some(Arc::new(WhisperTranscriber::new(
                    &wa.whisper_api_key,
                    &wa.whisper_base_url,
                    wa.media.timeout_secs,
                )) as Arc<dyn Transcriber>)
            };
            let voice = VoicePipeline::new(source, transcriber, &wa.media);
            let channel: Arc<dyn Channel> = Arc::new(WhatsAppChannel::new(wa));

            let gateway = build_gateway(&cfg, store, channel).with_voice(Arc::new(voice));

            println!("Convoy — serving webhook on {}:{}", cfg.api.host, cfg.api.port);
            api::serve(cfg.api.clone(), Arc::new(gateway)).await?;
        }
        Commands::Status => {
            println!("Convoy — Status Check\n");
            println!("Config: {}", cli.config);
            println!("Database: {}", cfg.memory.db_path);
            println!();

            let whatsapp = match cfg.channel.whatsapp {
                Some(ref wa) if wa.enabled && !wa.access_token.is_empty() => "configured",
                Some(ref wa) if wa.enabled => "enabled but missing access_token",
                Some(_) => "disabled",
                None => "not configured",
            };
            println!("  whatsapp: {whatsapp}");
            println!("  classifier: {}", configured(&cfg.classifier.endpoint));
            println!("  actions: {}", configured(&cfg.actions.base_url));
            println!(
                "  auth: {}",
                if cfg.auth.enabled { "enforced" } else { "open" }
            );
            println!("  languages: {}", i18n::SUPPORTED_LANGUAGES.join(", "));
            println!();

            let store = Store::new(&cfg.memory).await?;
            println!("  conversations: {}", store.count_conversations().await?);
            println!("  db size: {} bytes", store.db_size().await?);
            let audit = AuditLogger::new(store.pool().clone());
            for (status, count) in audit.status_counts().await? {
                println!("  audited {status}: {count}");
            }
        }
        Commands::Reset { identity } => {
            let store = Store::new(&cfg.memory).await?;
            if store.reset(&identity).await? {
                println!("Reset conversation state for {identity}.");
            } else {
                anyhow::bail!("no conversation found for {identity}");
            }
        }
        Commands::Ask { identity, message } => {
            if message.is_empty() {
                anyhow::bail!("no message provided. Usage: convoy ask [--identity <id>] <message>");
            }

            let text = message.join(" ");
            let store = Store::new(&cfg.memory).await?;
            let gateway = build_gateway(&cfg, store, Arc::new(console::ConsoleChannel));
            let outcome = gateway
                .handle(InboundMessage::text(&identity, &text))
                .await;
            info!("ask finished as {}", outcome.branch());
        }
    }

    Ok(())
}

/// Wire the store and the HTTP collaborators into a gateway.
fn build_gateway(cfg: &Config, store: Store, channel: Arc<dyn Channel>) -> Gateway {
    if cfg.classifier.endpoint.is_empty() {
        warn!("classifier.endpoint is empty; every message will be out of scope");
    }
    let audit = AuditLogger::new(store.pool().clone());
    Gateway::new(
        Arc::new(store),
        channel,
        Arc::new(HttpIntentClassifier::from_config(&cfg.classifier)),
        Arc::new(HttpActionHandler::from_config(&cfg.actions)),
        Arc::new(HttpAccountDirectory::from_config(&cfg.actions)),
        cfg.auth.clone(),
        cfg.dialogue.clone(),
        cfg.classifier.min_confidence,
    )
    .with_audit(audit)
}

fn configured(value: &str) -> &'static str {
    if value.is_empty() {
        "not configured"
    } else {
        "configured"
    }
}

/// Log to stderr and to a daily file under `{data_dir}/logs`.
fn init_tracing(cfg: &Config) -> anyhow::Result<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cfg.convoy.log_level));

    let log_dir = PathBuf::from(shellexpand(&cfg.convoy.data_dir)).join("logs");
    std::fs::create_dir_all(&log_dir)?;
    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::daily(&log_dir, "convoy.log"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(fmt::layer().with_ansi(false).with_writer(writer))
        .init();
    Ok(guard)
}
