pub mod events;
pub mod moderation;
pub mod roles;
pub mod utility;

use std::{future::Future, pin::Pin};

use tracing::{debug, error};
use twilight_model::{
    application::interaction::InteractionData,
    gateway::payload::incoming::{InteractionCreate, MessageCreate},
    guild::Permissions,
};

use ghost_core::Context;
use ghost_utils::COMMAND_PREFIX;
use ghost_utils::permissions::has_member_permission;
use ghost_utils::roles::ROLE_MENU_PREFIX;

use crate::moderation::embeds::{guild_only_message, permission_denied_message};

// Global command meta data
pub struct CommandMeta {
    pub name: &'static str,
    pub desc: &'static str,
    pub category: &'static str,
    pub usage: &'static str,
    /// Permission the invoking member must hold; empty means anyone.
    pub required: Permissions,
    pub guild_only: bool,
}

/// Arguments following the command name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CommandArgs {
    /// First whitespace-separated token.
    pub arg1: Option<String>,
    /// Everything after `arg1`, trimmed.
    pub tail: Option<String>,
    /// The whole argument text, trimmed.
    pub raw: Option<String>,
}

/// A parsed prefix command ready to dispatch.
pub struct Invocation {
    pub msg: Box<MessageCreate>,
    pub args: CommandArgs,
}

pub type CommandFuture = Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send>>;
pub type CommandHandler = fn(Context, Invocation) -> CommandFuture;

/// One registry entry: metadata, permission predicate and handler.
pub struct Command {
    pub meta: CommandMeta,
    pub handler: CommandHandler,
}

pub static COMMANDS: &[Command] = &[
    utility::ping::COMMAND,
    utility::feed::COMMAND,
    utility::dream::COMMAND,
    utility::uptime::COMMAND,
    utility::server::COMMAND,
    utility::help::COMMAND,
    moderation::purge::COMMAND,
    moderation::kick::COMMAND,
    moderation::ban::COMMAND,
    moderation::timeout::COMMAND,
    moderation::warn::COMMAND,
    moderation::warnings_of::COMMAND,
    roles::setup::COMMAND,
    // Add new commands here
];

/// Look up a registry entry by its (lowercase) name.
pub fn find_command(name: &str) -> Option<&'static Command> {
    COMMANDS.iter().find(|command| command.meta.name == name)
}

/// Split prefixed message content into a lowercase command name and its arguments.
///
/// Returns `None` when the content is not a prefix command.
pub fn parse_command(content: &str) -> Option<(String, CommandArgs)> {
    let content = content.trim().strip_prefix(COMMAND_PREFIX)?.trim();

    let mut command_and_rest = content.splitn(2, char::is_whitespace);
    let cmd = command_and_rest
        .next()
        .filter(|name| !name.is_empty())?
        .to_ascii_lowercase();
    let raw = command_and_rest
        .next()
        .map(str::trim)
        .filter(|value| !value.is_empty());

    let (arg1, tail) = match raw {
        Some(value) => {
            let mut args = value.splitn(2, char::is_whitespace);
            let first = args
                .next()
                .filter(|arg| !arg.is_empty())
                .map(ToOwned::to_owned);
            let tail = args
                .next()
                .map(str::trim)
                .filter(|remaining| !remaining.is_empty())
                .map(ToOwned::to_owned);

            (first, tail)
        }
        None => (None, None),
    };

    Some((
        cmd,
        CommandArgs {
            arg1,
            tail,
            raw: raw.map(ToOwned::to_owned),
        },
    ))
}

/// Dispatch one message through the command registry.
pub async fn handle_message(ctx: Context, msg: Box<MessageCreate>) -> anyhow::Result<()> {
    if msg.author.bot {
        return Ok(());
    }

    let Some((name, args)) = parse_command(&msg.content) else {
        return Ok(());
    };

    let Some(command) = find_command(&name) else {
        return Ok(());
    };

    let http = &ctx.http;
    if command.meta.guild_only || !command.meta.required.is_empty() {
        let Some(guild_id) = msg.guild_id else {
            http.create_message(msg.channel_id)
                .content(guild_only_message())
                .await?;
            return Ok(());
        };

        if !has_member_permission(http, guild_id, msg.author.id, command.meta.required).await? {
            debug!(command = command.meta.name, user_id = msg.author.id.get(), "permission denied");
            http.create_message(msg.channel_id)
                .content(permission_denied_message())
                .await?;
            return Ok(());
        }
    }

    let command_name = command.meta.name;
    if let Err(source) = (command.handler)(ctx.clone(), Invocation { msg, args }).await {
        error!(?source, command = command_name, "command failed");
    }

    Ok(())
}

/// Route component interactions to their handlers.
pub async fn handle_interaction(
    ctx: Context,
    interaction: Box<InteractionCreate>,
) -> anyhow::Result<()> {
    let custom_id = match interaction.data.as_ref() {
        Some(InteractionData::MessageComponent(data)) => data.custom_id.clone(),
        _ => return Ok(()),
    };

    if custom_id.starts_with(ROLE_MENU_PREFIX) {
        roles::selection::handle_interaction(ctx, interaction).await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_prefixed_content_is_ignored() {
        assert_eq!(parse_command("hello"), None);
        assert_eq!(parse_command("!"), None);
        assert_eq!(parse_command("!   "), None);
    }

    #[test]
    fn splits_name_first_argument_and_tail() {
        let (name, args) = parse_command("  !WARN <@42>   being   rude ").expect("command");
        assert_eq!(name, "warn");
        assert_eq!(args.arg1.as_deref(), Some("<@42>"));
        assert_eq!(args.tail.as_deref(), Some("being   rude"));
        assert_eq!(args.raw.as_deref(), Some("<@42>   being   rude"));
    }

    #[test]
    fn bare_command_has_no_arguments() {
        let (name, args) = parse_command("!ping").expect("command");
        assert_eq!(name, "ping");
        assert_eq!(args, CommandArgs::default());
    }

    #[test]
    fn registry_names_are_unique_and_lowercase() {
        let mut names: Vec<&str> = COMMANDS.iter().map(|command| command.meta.name).collect();
        assert!(names.iter().all(|name| *name == name.to_ascii_lowercase()));
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), COMMANDS.len());
    }

    #[test]
    fn command_surface_is_registered() {
        for name in [
            "ping", "feed", "dream", "uptime", "server", "purge", "kick", "ban", "timeout",
            "warn", "warnings_of", "rolesetup",
        ] {
            assert!(find_command(name).is_some(), "missing {name}");
        }
    }

    #[test]
    fn moderation_commands_require_permissions() {
        let required = |name: &str| find_command(name).map(|command| command.meta.required);
        assert_eq!(required("purge"), Some(Permissions::MANAGE_MESSAGES));
        assert_eq!(required("kick"), Some(Permissions::KICK_MEMBERS));
        assert_eq!(required("ban"), Some(Permissions::BAN_MEMBERS));
        assert_eq!(required("timeout"), Some(Permissions::MODERATE_MEMBERS));
        assert_eq!(required("rolesetup"), Some(Permissions::MANAGE_ROLES));
        assert_eq!(required("ping"), Some(Permissions::empty()));
    }
}
