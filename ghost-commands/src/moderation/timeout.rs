use tracing::error;
use twilight_http::request::AuditLogReason as _;
use twilight_model::{guild::Permissions, util::Timestamp};

use crate::moderation::embeds::{
    fetch_target_profile, forward_moderation_action, moderation_action_embed,
    moderation_failed_message, moderation_self_action_message, usage_message,
};
use crate::{Command, CommandFuture, CommandMeta, Invocation};
use ghost_core::Context;
use ghost_utils::parse::{parse_positive, parse_target_user_id};
use ghost_utils::time::now_unix_secs;

pub const META: CommandMeta = CommandMeta {
    name: "timeout",
    desc: "Time a member out for a number of minutes.",
    category: "moderation",
    usage: "!timeout <member> <minutes> [reason]",
    required: Permissions::MODERATE_MEMBERS,
    guild_only: true,
};

pub const COMMAND: Command = Command {
    meta: META,
    handler: handle,
};

/// Platform limit for communication timeouts (28 days).
pub const MAX_TIMEOUT_MINUTES: u64 = 28 * 24 * 60;

fn handle(ctx: Context, invocation: Invocation) -> CommandFuture {
    Box::pin(run(ctx, invocation))
}

/// Split `<minutes> [reason]`, rejecting durations outside 1..=28 days.
pub fn parse_minutes_and_reason(tail: Option<&str>) -> Option<(u64, Option<&str>)> {
    let mut parts = tail?.splitn(2, char::is_whitespace);
    let minutes = parse_positive(parts.next()?).filter(|m| *m <= MAX_TIMEOUT_MINUTES)?;
    let reason = parts
        .next()
        .map(str::trim)
        .filter(|value| !value.is_empty());

    Some((minutes, reason))
}

/// Apply a temporary communication timeout to a target member.
pub async fn run(ctx: Context, invocation: Invocation) -> anyhow::Result<()> {
    let http = &ctx.http;
    let Invocation { msg, args } = invocation;
    let Some(guild_id) = msg.guild_id else {
        return Ok(());
    };

    let target = args.arg1.as_deref().and_then(parse_target_user_id);
    let duration = parse_minutes_and_reason(args.tail.as_deref());
    let (Some(target_user_id), Some((minutes, reason))) = (target, duration) else {
        let usage = format!(
            "{} (minutes 1-{MAX_TIMEOUT_MINUTES})",
            usage_message(META.usage)
        );
        http.create_message(msg.channel_id).content(&usage).await?;
        return Ok(());
    };

    if target_user_id == msg.author.id {
        let out = moderation_self_action_message("timeout");
        http.create_message(msg.channel_id).content(&out).await?;
        return Ok(());
    }

    let expires_at_secs = now_unix_secs().saturating_add(minutes.saturating_mul(60));
    let Ok(expires_at) = Timestamp::from_secs(expires_at_secs as i64) else {
        http.create_message(msg.channel_id)
            .content("Unable to compute timeout expiration timestamp.")
            .await?;
        return Ok(());
    };

    let mut request = http
        .update_guild_member(guild_id, target_user_id)
        .communication_disabled_until(Some(expires_at));
    if let Some(reason) = reason {
        request = request.reason(reason);
    }

    if let Err(source) = request.await {
        error!(?source, "timeout request failed");
        let out = moderation_failed_message("timeout");
        http.create_message(msg.channel_id).content(&out).await?;
        return Ok(());
    }

    forward_moderation_action(
        &ctx,
        guild_id,
        "timeout",
        msg.author.id,
        Some(target_user_id),
        reason,
    );

    let duration_label = format!("{minutes} minute(s)");
    let target_profile = fetch_target_profile(http, target_user_id).await;
    let embed = moderation_action_embed(
        &target_profile,
        target_user_id,
        "timed out",
        reason,
        Some(&duration_label),
    )?;
    http.create_message(msg.channel_id).embeds(&[embed]).await?;

    Ok(())
}
