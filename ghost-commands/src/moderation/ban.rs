use tracing::error;
use twilight_http::request::AuditLogReason as _;
use twilight_model::guild::Permissions;

use crate::moderation::embeds::{
    fetch_target_profile, forward_moderation_action, moderation_action_embed,
    moderation_failed_message, moderation_self_action_message, usage_message,
};
use crate::{Command, CommandFuture, CommandMeta, Invocation};
use ghost_core::Context;
use ghost_utils::parse::parse_target_user_id;

pub const META: CommandMeta = CommandMeta {
    name: "ban",
    desc: "Ban a member from the server.",
    category: "moderation",
    usage: "!ban <member> [reason]",
    required: Permissions::BAN_MEMBERS,
    guild_only: true,
};

pub const COMMAND: Command = Command {
    meta: META,
    handler: handle,
};

fn handle(ctx: Context, invocation: Invocation) -> CommandFuture {
    Box::pin(run(ctx, invocation))
}

/// Ban a target member after input validation.
pub async fn run(ctx: Context, invocation: Invocation) -> anyhow::Result<()> {
    let http = &ctx.http;
    let Invocation { msg, args } = invocation;
    let Some(guild_id) = msg.guild_id else {
        return Ok(());
    };

    let Some(target_user_id) = args.arg1.as_deref().and_then(parse_target_user_id) else {
        let usage = usage_message(META.usage);
        http.create_message(msg.channel_id).content(&usage).await?;
        return Ok(());
    };

    if target_user_id == msg.author.id {
        let out = moderation_self_action_message("ban");
        http.create_message(msg.channel_id).content(&out).await?;
        return Ok(());
    }

    let reason = args.tail.as_deref();
    let mut request = http.create_ban(guild_id, target_user_id);
    if let Some(reason) = reason {
        request = request.reason(reason);
    }

    if let Err(source) = request.await {
        error!(?source, "ban request failed");
        let out = moderation_failed_message("ban");
        http.create_message(msg.channel_id).content(&out).await?;
        return Ok(());
    }

    forward_moderation_action(&ctx, guild_id, "ban", msg.author.id, Some(target_user_id), reason);

    let target_profile = fetch_target_profile(http, target_user_id).await;
    let embed = moderation_action_embed(&target_profile, target_user_id, "banned", reason, None)?;
    http.create_message(msg.channel_id).embeds(&[embed]).await?;

    Ok(())
}
