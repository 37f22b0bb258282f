use twilight_model::guild::Permissions;

use crate::{Command, CommandFuture, CommandMeta, Invocation};
use ghost_core::Context;

pub const META: CommandMeta = CommandMeta {
    name: "ping",
    desc: "Check whether the ghost is awake.",
    category: "utility",
    usage: "!ping",
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

/// Send a simple connectivity response.
pub async fn run(ctx: Context, invocation: Invocation) -> anyhow::Result<()> {
    ctx.http
        .create_message(invocation.msg.channel_id)
        .content("👻 Boo! Ghost_Bot is awake and listening across the LUMI network.")
        .await?;

    Ok(())
}
