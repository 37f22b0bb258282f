use twilight_model::guild::Permissions;

use crate::moderation::embeds::{
    NO_REASON, fetch_target_profile, forward_moderation_action, moderation_action_embed,
    usage_message,
};
use crate::{Command, CommandFuture, CommandMeta, Invocation};
use ghost_core::Context;
use ghost_store::MemberKey;
use ghost_utils::parse::parse_target_user_id;

pub const META: CommandMeta = CommandMeta {
    name: "warn",
    desc: "Issue a warning to a member.",
    category: "moderation",
    usage: "!warn <member> [reason]",
    required: Permissions::MODERATE_MEMBERS,
    guild_only: true,
};

pub const COMMAND: Command = Command {
    meta: META,
    handler: handle,
};

fn handle(ctx: Context, invocation: Invocation) -> CommandFuture {
    Box::pin(run(ctx, invocation))
}

/// Record a warning for a target member and report it back to the channel.
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

    let reason = args.tail.as_deref().unwrap_or(NO_REASON);
    let member = MemberKey {
        guild_id,
        user_id: target_user_id,
    };
    let warning = ctx.warnings.record(member, msg.author.id, reason).await;
    let action = format!("warned #{}", warning.warn_number);

    forward_moderation_action(
        &ctx,
        guild_id,
        "warn",
        msg.author.id,
        Some(target_user_id),
        Some(reason),
    );

    let target_profile = fetch_target_profile(http, target_user_id).await;
    let embed =
        moderation_action_embed(&target_profile, target_user_id, &action, Some(reason), None)?;
    http.create_message(msg.channel_id).embeds(&[embed]).await?;

    Ok(())
}
