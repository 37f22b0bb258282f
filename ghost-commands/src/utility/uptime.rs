use twilight_model::guild::Permissions;

use crate::{Command, CommandFuture, CommandMeta, Invocation};
use ghost_core::Context;
use ghost_utils::time::format_uptime;

pub const META: CommandMeta = CommandMeta {
    name: "uptime",
    desc: "Show how long the ghost has been haunting.",
    category: "utility",
    usage: "!uptime",
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
    let out = format!(
        "🕯️ Haunting for {}.",
        format_uptime(ctx.started_at.elapsed())
    );
    ctx.http
        .create_message(invocation.msg.channel_id)
        .content(&out)
        .await?;

    Ok(())
}
