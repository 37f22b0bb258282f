use twilight_model::guild::Permissions;

use crate::{Command, CommandFuture, CommandMeta, Invocation};
use ghost_core::Context;

pub const META: CommandMeta = CommandMeta {
    name: "feed",
    desc: "Feed the Orb.",
    category: "fun",
    usage: "!feed",
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
        .content("✨ You feed the Orb. Faint pulses of light ripple through the LUMI realm...")
        .await?;

    Ok(())
}
