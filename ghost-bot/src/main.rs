use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use twilight_gateway::{ConfigBuilder, EventTypeFlags, Intents, Shard, ShardId, StreamExt as _};
use twilight_http::Client;
use twilight_model::gateway::{
    event::Event,
    payload::outgoing::update_presence::UpdatePresencePayload,
    presence::{ActivityType, MinimalActivity, Status},
};

use rustls::crypto::ring::default_provider;

use ghost_commands::events::{on_member_join, on_ready};
use ghost_commands::{handle_interaction, handle_message};
use ghost_core::{Config, Context, EventForwarder};
use ghost_store::MemoryWarningStore;

const PRESENCE: &str = "Tending the LUMI Realm";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("failed to install rustls ring provider"))?;

    // Load the .env file
    dotenvy::dotenv().ok();

    let config = Arc::new(Config::from_env()?);
    info!(?config, "configuration loaded");

    // Create a single shared HTTP Client
    let http = Arc::new(Client::new(config.token.clone()));
    let bot_user = http.current_user().await?.model().await?;
    let forwarder = EventForwarder::new(config.webhook_url.clone())?;
    let ctx = Context::new(
        Arc::clone(&http),
        bot_user.id,
        Arc::clone(&config),
        Arc::new(MemoryWarningStore::new()),
        forwarder,
    );

    // Members intent is needed for the welcomer
    let intents = Intents::GUILDS
        | Intents::GUILD_MESSAGES
        | Intents::MESSAGE_CONTENT
        | Intents::GUILD_MEMBERS;

    let presence = UpdatePresencePayload::new(
        vec![
            MinimalActivity {
                kind: ActivityType::Playing,
                name: PRESENCE.to_owned(),
                url: None,
            }
            .into(),
        ],
        false,
        None,
        Status::Online,
    )?;
    let shard_config = ConfigBuilder::new(config.token.clone(), intents)
        .presence(presence)
        .build();
    let mut shard = Shard::with_config(ShardId::ONE, shard_config);

    info!(bot = %bot_user.name, "Ghost_Bot is connecting...");

    let wanted = EventTypeFlags::READY
        | EventTypeFlags::MESSAGE_CREATE
        | EventTypeFlags::INTERACTION_CREATE
        | EventTypeFlags::MEMBER_ADD;

    while let Some(item) = shard.next_event(wanted).await {
        let event = match item {
            Ok(event) => event,
            Err(source) => {
                error!(?source, "gateway event stream error");
                continue;
            }
        };

        // Each event runs on its own task so one failure never stalls the loop
        let ctx = ctx.clone();
        match event {
            Event::Ready(ready) => {
                tokio::spawn(async move {
                    if let Err(source) = on_ready(ctx, ready).await {
                        error!(?source, "ready handler failed");
                    }
                });
            }
            Event::MessageCreate(msg) => {
                tokio::spawn(async move {
                    if let Err(source) = handle_message(ctx, msg).await {
                        error!(?source, "message handler failed");
                    }
                });
            }
            Event::InteractionCreate(interaction) => {
                tokio::spawn(async move {
                    if let Err(source) = handle_interaction(ctx, interaction).await {
                        error!(?source, "interaction handler failed");
                    }
                });
            }
            Event::MemberAdd(member) => {
                tokio::spawn(async move {
                    if let Err(source) = on_member_join(ctx, member).await {
                        error!(?source, "member join handler failed");
                    }
                });
            }
            _ => {} // Ignore unused events
        }
    }

    Ok(())
}
