use std::sync::Arc;

use serde_json::json;
use tokio::time::{Duration, sleep};
use tracing::{info, warn};
use twilight_http::Client;
use twilight_model::{
    channel::message::{AllowedMentions, component::Component},
    guild::Permissions,
    id::{
        Id,
        marker::{ChannelMarker, GuildMarker, MessageMarker},
    },
};

use crate::moderation::embeds::usage_message;
use crate::{Command, CommandFuture, CommandMeta, Invocation};
use ghost_core::{Context, LifecycleEvent};
use ghost_store::{BoundMenu, RoleMenuRegistry};
use ghost_utils::roles::{
    BoundRole, RoleEntry, RoleMenuError, RoleRequest, build_role_menu, filter_manageable,
    highest_rank, resolve_roles, role_menu_custom_id,
};
use ghost_utils::time::now_unix_secs;

pub const META: CommandMeta = CommandMeta {
    name: "rolesetup",
    desc: "Post a self-service role menu.",
    category: "moderation",
    usage: "!rolesetup <@role ...> | <name1 | name2 | ...>",
    required: Permissions::MANAGE_ROLES,
    guild_only: true,
};

pub const COMMAND: Command = Command {
    meta: META,
    handler: handle,
};

fn handle(ctx: Context, invocation: Invocation) -> CommandFuture {
    Box::pin(run(ctx, invocation))
}

/// Pick the requested roles the bot can manage.
pub async fn manageable_roles(
    ctx: &Context,
    guild_id: Id<GuildMarker>,
    request: &RoleRequest,
) -> anyhow::Result<Vec<RoleEntry>> {
    let http = &ctx.http;
    let roles = http.roles(guild_id).await?.model().await?;
    let catalog: Vec<RoleEntry> = roles.iter().map(RoleEntry::from).collect();

    let bot_member = http
        .guild_member(guild_id, ctx.bot_user_id)
        .await?
        .model()
        .await?;
    let self_rank = highest_rank(&catalog, &bot_member.roles);

    let resolved = resolve_roles(request, &catalog, guild_id.cast());
    Ok(filter_manageable(resolved, self_rank))
}

pub fn menu_intro(roles: &[BoundRole]) -> String {
    let names: Vec<String> = roles.iter().map(|role| format!("<@&{}>", role.id.get())).collect();
    format!(
        "✨ **Choose your roles**\nPick any of the roles below. Deselect a role to drop it.\n{}",
        names.join(" ")
    )
}

/// Build and post a role menu from mentions or `|`-separated role names.
pub async fn run(ctx: Context, invocation: Invocation) -> anyhow::Result<()> {
    let http = &ctx.http;
    let Invocation { msg, args } = invocation;
    let Some(guild_id) = msg.guild_id else {
        return Ok(());
    };

    let request = RoleRequest::parse(args.raw.as_deref().unwrap_or_default());
    if request.is_empty() {
        let usage = usage_message(META.usage);
        http.create_message(msg.channel_id).content(&usage).await?;
        return Ok(());
    }

    let roles = manageable_roles(&ctx, guild_id, &request).await?;
    let bound: Vec<BoundRole> = roles.iter().map(BoundRole::from).collect();
    let custom_id = role_menu_custom_id(msg.id.get());

    let components = match build_role_menu(&custom_id, &bound) {
        Ok(components) => components,
        Err(RoleMenuError::NoRoles) => {
            let out = format!(
                "No roles I can manage were found. They must exist and sit below my highest role.\n{}",
                usage_message(META.usage)
            );
            http.create_message(msg.channel_id).content(&out).await?;
            return Ok(());
        }
        Err(RoleMenuError::TooManyRoles { count, max }) => {
            let out = format!("A role menu holds at most {max} roles; you asked for {count}.");
            http.create_message(msg.channel_id).content(&out).await?;
            return Ok(());
        }
    };

    let no_pings = AllowedMentions::default();
    let posted = http
        .create_message(msg.channel_id)
        .content(&menu_intro(&bound))
        .allowed_mentions(Some(&no_pings))
        .components(&components)
        .await?
        .model()
        .await?;

    let expiry = ctx.config.role_menu_expiry;
    let expires_at = expiry.map(|ttl| now_unix_secs().saturating_add(ttl.as_secs()));
    ctx.menus
        .register(
            custom_id.clone(),
            BoundMenu {
                roles: bound.clone(),
                expires_at,
            },
        )
        .await;

    if let Some(ttl) = expiry {
        schedule_menu_expiry(
            Arc::clone(&ctx.http),
            Arc::clone(&ctx.menus),
            posted.channel_id,
            posted.id,
            ttl,
        );
    }

    info!(
        guild_id = guild_id.get(),
        custom_id = %custom_id,
        roles = bound.len(),
        "role menu created"
    );
    ctx.forwarder.forward(
        LifecycleEvent::RoleMenuCreated,
        json!({
            "guild_id": guild_id.to_string(),
            "channel_id": msg.channel_id.to_string(),
            "roles": bound.iter().map(|role| role.name.clone()).collect::<Vec<_>>(),
        }),
    );

    Ok(())
}

/// One second past the ttl, so the registry sees the menu as strictly expired.
fn strip_delay(ttl: Duration) -> Duration {
    ttl.saturating_add(Duration::from_secs(1))
}

/// Strip the menu from its message once it expires.
fn schedule_menu_expiry(
    http: Arc<Client>,
    menus: Arc<RoleMenuRegistry>,
    channel_id: Id<ChannelMarker>,
    message_id: Id<MessageMarker>,
    ttl: Duration,
) {
    tokio::spawn(async move {
        sleep(strip_delay(ttl)).await;

        let empty_components: [Component; 0] = [];
        if let Err(source) = http
            .update_message(channel_id, message_id)
            .components(Some(&empty_components))
            .await
        {
            warn!(?source, message_id = message_id.get(), "failed to strip expired role menu");
        }

        menus.prune_expired(now_unix_secs()).await;
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intro_mentions_each_bound_role() {
        let roles = vec![
            BoundRole {
                id: Id::new(10),
                name: "Artist".to_owned(),
            },
            BoundRole {
                id: Id::new(11),
                name: "Coder".to_owned(),
            },
        ];

        assert!(menu_intro(&roles).ends_with("<@&10> <@&11>"));
    }

    #[test]
    fn strip_delay_never_overflows() {
        assert_eq!(strip_delay(Duration::from_secs(60)), Duration::from_secs(61));
        assert_eq!(strip_delay(Duration::MAX), Duration::MAX);
    }
}
