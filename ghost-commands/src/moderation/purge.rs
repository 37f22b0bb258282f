use tokio::time::{Duration, sleep};
use tracing::{error, warn};
use twilight_model::{
    guild::Permissions,
    id::{
        Id,
        marker::{ChannelMarker, MessageMarker},
    },
};

use crate::moderation::embeds::{forward_moderation_action, usage_message};
use crate::{Command, CommandFuture, CommandMeta, Invocation};
use ghost_core::Context;
use ghost_utils::parse::parse_positive;

pub const META: CommandMeta = CommandMeta {
    name: "purge",
    desc: "Delete the latest messages in this channel.",
    category: "moderation",
    usage: "!purge <count>",
    required: Permissions::MANAGE_MESSAGES,
    guild_only: true,
};

pub const COMMAND: Command = Command {
    meta: META,
    handler: handle,
};

/// Most messages one purge removes, not counting the command itself.
pub const MAX_PURGE: u16 = 200;
/// Platform cap for both history pages and bulk deletes.
const PAGE_SIZE: u16 = 100;
const CONFIRMATION_TTL_SECS: u64 = 3;

fn handle(ctx: Context, invocation: Invocation) -> CommandFuture {
    Box::pin(run(ctx, invocation))
}

/// Clamp a requested purge size to `1..=MAX_PURGE`.
pub fn clamp_purge_amount(requested: u64) -> u16 {
    requested.clamp(1, u64::from(MAX_PURGE)) as u16
}

/// Delete a bounded number of recent channel messages.
pub async fn run(ctx: Context, invocation: Invocation) -> anyhow::Result<()> {
    let http = &ctx.http;
    let Invocation { msg, args } = invocation;
    let Some(guild_id) = msg.guild_id else {
        return Ok(());
    };

    let Some(requested) = args.arg1.as_deref().and_then(parse_positive) else {
        let usage = format!("{} (count must be at least 1)", usage_message(META.usage));
        http.create_message(msg.channel_id).content(&usage).await?;
        return Ok(());
    };

    let amount = clamp_purge_amount(requested);
    // The command message goes too.
    let ids = collect_recent_ids(&ctx, msg.channel_id, amount + 1).await?;

    if ids.is_empty() {
        http.create_message(msg.channel_id)
            .content("No messages found to delete.")
            .await?;
        return Ok(());
    }

    let deleted = delete_ids(&ctx, msg.channel_id, &ids).await;
    if deleted == 0 {
        http.create_message(msg.channel_id)
            .content("I couldn't delete messages. I likely need the 'Manage Messages' permission.")
            .await?;
        return Ok(());
    }

    let purged = if ids.contains(&msg.id) {
        deleted.saturating_sub(1)
    } else {
        deleted
    };
    let reason = format!("purged {purged} message(s)");
    forward_moderation_action(&ctx, guild_id, "purge", msg.author.id, None, Some(&reason));

    let confirmation = format!("🧹 Purged {purged} message(s).");
    let confirmation_message = http
        .create_message(msg.channel_id)
        .content(&confirmation)
        .await?
        .model()
        .await?;

    sleep(Duration::from_secs(CONFIRMATION_TTL_SECS)).await;
    if let Err(source) = http
        .delete_message(msg.channel_id, confirmation_message.id)
        .await
    {
        warn!(
            ?source,
            message_id = confirmation_message.id.get(),
            "failed to delete purge confirmation"
        );
    }

    Ok(())
}

/// Page backwards through channel history until `wanted` ids are collected.
async fn collect_recent_ids(
    ctx: &Context,
    channel_id: Id<ChannelMarker>,
    wanted: u16,
) -> anyhow::Result<Vec<Id<MessageMarker>>> {
    let http = &ctx.http;
    let mut ids: Vec<Id<MessageMarker>> = Vec::with_capacity(usize::from(wanted));
    let mut before: Option<Id<MessageMarker>> = None;

    while ids.len() < usize::from(wanted) {
        let limit = (wanted - ids.len() as u16).min(PAGE_SIZE);
        let response = match before {
            Some(before_id) => {
                http.channel_messages(channel_id)
                    .before(before_id)
                    .limit(limit)
                    .await?
            }
            None => http.channel_messages(channel_id).limit(limit).await?,
        };
        let messages = response.model().await?;

        let page_len = messages.len();
        before = messages.last().map(|message| message.id);
        ids.extend(messages.into_iter().map(|message| message.id));

        if page_len < usize::from(limit) {
            break;
        }
    }

    Ok(ids)
}

/// Bulk-delete in chunks, falling back to single deletes. Returns the count removed.
async fn delete_ids(ctx: &Context, channel_id: Id<ChannelMarker>, ids: &[Id<MessageMarker>]) -> u64 {
    let http = &ctx.http;
    let mut deleted = 0_u64;
    let mut single_delete_ids: Vec<Id<MessageMarker>> = Vec::new();

    for chunk in ids.chunks(usize::from(PAGE_SIZE)) {
        if chunk.len() < 2 {
            single_delete_ids.extend_from_slice(chunk);
            continue;
        }

        match http.delete_messages(channel_id, chunk).await {
            Ok(_) => deleted = deleted.saturating_add(chunk.len() as u64),
            Err(source) => {
                warn!(
                    ?source,
                    channel_id = channel_id.get(),
                    count = chunk.len(),
                    "bulk delete failed, falling back to single delete"
                );
                single_delete_ids.extend_from_slice(chunk);
            }
        }
    }

    for message_id in single_delete_ids {
        match http.delete_message(channel_id, message_id).await {
            Ok(_) => deleted = deleted.saturating_add(1),
            Err(source) => error!(?source, message_id = message_id.get(), "delete failed"),
        }
    }

    deleted
}
