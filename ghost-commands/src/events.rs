//! Gateway lifecycle handlers that are not commands.

use serde_json::json;
use tracing::{debug, info};
use twilight_model::{
    gateway::payload::incoming::{MemberAdd, Ready},
    id::{
        Id,
        marker::{GuildMarker, UserMarker},
    },
};

use ghost_core::{Context, LifecycleEvent};

pub fn welcome_message(user_id: Id<UserMarker>) -> String {
    format!("👻 Welcome to the LUMI Realm, <@{user_id}>! The Orb glows a little brighter.")
}

/// The welcome channel only greets joins to its own guild.
pub fn welcomes_guild(
    channel_guild_id: Option<Id<GuildMarker>>,
    joined_guild_id: Id<GuildMarker>,
) -> bool {
    channel_guild_id == Some(joined_guild_id)
}

pub async fn on_ready(ctx: Context, ready: Ready) -> anyhow::Result<()> {
    info!(
        user = %ready.user.name,
        guilds = ready.guilds.len(),
        webhook = ctx.forwarder.is_enabled(),
        "Ghost_Bot online"
    );

    ctx.forwarder.forward(
        LifecycleEvent::BotReady,
        json!({
            "user_id": ready.user.id.to_string(),
            "name": ready.user.name,
            "guilds": ready.guilds.len(),
        }),
    );

    Ok(())
}

/// Greet a new member in the welcome channel and forward the join.
pub async fn on_member_join(ctx: Context, event: Box<MemberAdd>) -> anyhow::Result<()> {
    let user = &event.member.user;

    info!(guild_id = event.guild_id.get(), user_id = user.id.get(), "member joined");

    ctx.forwarder.forward(
        LifecycleEvent::MemberJoin,
        json!({
            "guild_id": event.guild_id.to_string(),
            "user_id": user.id.to_string(),
            "name": user.name,
        }),
    );

    let Some(channel_id) = ctx.config.welcome_channel_id else {
        return Ok(());
    };

    let channel = ctx.http.channel(channel_id).await?.model().await?;
    if !welcomes_guild(channel.guild_id, event.guild_id) {
        debug!(
            guild_id = event.guild_id.get(),
            channel_id = channel_id.get(),
            "welcome channel belongs to another guild"
        );
        return Ok(());
    }

    ctx.http
        .create_message(channel_id)
        .content(&welcome_message(user.id))
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::future::Future;

    use super::*;

    #[test]
    fn welcome_mentions_the_member() {
        let message = welcome_message(Id::new(1234));
        assert!(message.contains("<@1234>"));
    }

    #[test]
    fn joins_elsewhere_are_not_welcomed() {
        assert!(welcomes_guild(Some(Id::new(1)), Id::new(1)));
        assert!(!welcomes_guild(Some(Id::new(2)), Id::new(1)));
        assert!(!welcomes_guild(None, Id::new(1)));
    }

    fn accepts_gateway_ready<F, Fut>(_handler: F)
    where
        F: Fn(Context, Ready) -> Fut,
        Fut: Future<Output = anyhow::Result<()>>,
    {
    }

    #[test]
    fn ready_handler_takes_the_gateway_payload_by_value() {
        accepts_gateway_ready(on_ready);
    }
}
