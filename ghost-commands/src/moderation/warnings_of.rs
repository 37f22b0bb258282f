use twilight_model::guild::Permissions;

use crate::moderation::embeds::{fetch_target_profile, usage_message, warnings_overview_embed};
use crate::{Command, CommandFuture, CommandMeta, Invocation};
use ghost_core::Context;
use ghost_store::MemberKey;
use ghost_utils::parse::parse_target_user_id;

pub const META: CommandMeta = CommandMeta {
    name: "warnings_of",
    desc: "Show every warning a member has received.",
    category: "moderation",
    usage: "!warnings_of <member>",
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

    let entries = ctx
        .warnings
        .list(MemberKey {
            guild_id,
            user_id: target_user_id,
        })
        .await;
    let target_profile = fetch_target_profile(http, target_user_id).await;
    let embed = warnings_overview_embed(&target_profile, &entries)?;

    http.create_message(msg.channel_id).embeds(&[embed]).await?;

    Ok(())
}
