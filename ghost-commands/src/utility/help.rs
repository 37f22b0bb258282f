use twilight_model::guild::Permissions;

use crate::{COMMANDS, Command, CommandFuture, CommandMeta, Invocation};
use ghost_core::Context;
use ghost_utils::embed::build_embed;

pub const META: CommandMeta = CommandMeta {
    name: "help",
    desc: "List every command.",
    category: "utility",
    usage: "!help",
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
    let embed = build_embed("Ghost_Bot commands", grouped_help_description(COMMANDS))?;
    ctx.http
        .create_message(invocation.msg.channel_id)
        .embeds(&[embed])
        .await?;

    Ok(())
}

/// Render commands grouped by category, categories sorted, commands in registry order.
pub fn grouped_help_description(commands: &[Command]) -> String {
    let mut categories: Vec<&str> = commands.iter().map(|c| c.meta.category).collect();
    categories.sort_unstable();
    categories.dedup();

    categories
        .into_iter()
        .map(|category| {
            let lines: Vec<String> = commands
                .iter()
                .filter(|command| command.meta.category == category)
                .map(|command| format!("`{}` {}", command.meta.usage, command.meta.desc))
                .collect();
            format!("**{}**\n{}", category, lines.join("\n"))
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
