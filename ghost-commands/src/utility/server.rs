use twilight_model::guild::Permissions;
use twilight_util::snowflake::Snowflake as _;

use crate::{Command, CommandFuture, CommandMeta, Invocation};
use ghost_core::Context;
use ghost_utils::embed::build_field_embed;

pub const META: CommandMeta = CommandMeta {
    name: "server",
    desc: "Show information about this server.",
    category: "utility",
    usage: "!server",
    required: Permissions::empty(),
    guild_only: true,
};

pub const COMMAND: Command = Command {
    meta: META,
    handler: handle,
};

fn handle(ctx: Context, invocation: Invocation) -> CommandFuture {
    Box::pin(run(ctx, invocation))
}

/// Summarise the current guild in an embed.
pub async fn run(ctx: Context, invocation: Invocation) -> anyhow::Result<()> {
    let http = &ctx.http;
    let msg = invocation.msg;
    let Some(guild_id) = msg.guild_id else {
        return Ok(());
    };

    let guild = http.guild(guild_id).with_counts(true).await?.model().await?;

    let members = guild
        .approximate_member_count
        .or(guild.member_count)
        .map_or_else(|| "unknown".to_owned(), |count| count.to_string());
    let created_secs = guild_id.timestamp() / 1_000;

    let fields = [
        ("Owner", format!("<@{}>", guild.owner_id.get())),
        ("Members", members),
        ("Roles", guild.roles.len().to_string()),
        ("Created", format!("<t:{created_secs}:D>")),
    ];
    let footer = format!("ID: {}", guild_id.get());
    let embed = build_field_embed(&guild.name, &fields, Some(&footer))?;

    http.create_message(msg.channel_id).embeds(&[embed]).await?;

    Ok(())
}
