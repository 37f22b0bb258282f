use twilight_model::guild::Permissions;

use crate::{Command, CommandFuture, CommandMeta, Invocation};
use ghost_core::Context;

pub const META: CommandMeta = CommandMeta {
    name: "dream",
    desc: "Drift into the dream portal.",
    category: "fun",
    usage: "!dream",
    required: Permissions::empty(),
    guild_only: false,
};

pub const COMMAND: Command = Command {
    meta: META,
    handler: handle,
};

fn handle(ctx: Context, invocation: Invocation) -> CommandFuture {
    Box::pin(run(ctx, invocation))
}

pub async fn run(ctx: Context, invocation: Invocation) -> anyhow::Result<()> {
    ctx.http
        .create_message(invocation.msg.channel_id)
        .content("💤 You drift into the dream portal. Whispers of creation surround you.")
        .await?;

    Ok(())
}
