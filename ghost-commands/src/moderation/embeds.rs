use serde_json::json;
use twilight_http::Client;
use twilight_model::{
    channel::message::embed::Embed,
    id::{
        Id,
        marker::{GuildMarker, UserMarker},
    },
};
use twilight_util::builder::embed::{EmbedAuthorBuilder, EmbedBuilder, ImageSource};

use ghost_core::{Context, LifecycleEvent};
use ghost_store::WarningEntry;
use ghost_utils::embed::{DEFAULT_EMBED_COLOR, clip_user_text};

/// Display data for the member a moderation action targets.
#[derive(Clone, Debug)]
pub struct TargetProfile {
    pub display_name: String,
    pub avatar_url: Option<String>,
}

impl TargetProfile {
    fn fallback(user_id: Id<UserMarker>) -> Self {
        Self {
            display_name: format!("User {}", user_id.get()),
            avatar_url: None,
        }
    }
}

/// Resolve a moderation target profile for display in embeds.
pub async fn fetch_target_profile(http: &Client, user_id: Id<UserMarker>) -> TargetProfile {
    let user = match http.user(user_id).await {
        Ok(response) => match response.model().await {
            Ok(model) => model,
            Err(_) => return TargetProfile::fallback(user_id),
        },
        Err(_) => return TargetProfile::fallback(user_id),
    };

    let display_name = user.global_name.unwrap_or(user.name);
    let avatar_url = Some(match user.avatar {
        Some(avatar) => format!(
            "https://cdn.discordapp.com/avatars/{}/{}.png?size=128",
            user_id.get(),
            avatar
        ),
        None => {
            let default_avatar_index = (user_id.get() >> 22) % 6;
            format!("https://cdn.discordapp.com/embed/avatars/{default_avatar_index}.png")
        }
    });

    TargetProfile {
        display_name,
        avatar_url,
    }
}

fn titled(
    builder: EmbedBuilder,
    profile: &TargetProfile,
    title: String,
) -> anyhow::Result<EmbedBuilder> {
    let builder = match profile.avatar_url.as_deref() {
        Some(url) => {
            let icon = ImageSource::url(url.to_owned())?;
            builder.author(EmbedAuthorBuilder::new(title).icon_url(icon).build())
        }
        None => builder.title(title),
    };

    Ok(builder)
}

/// Longest reason shown in an action-result embed.
const ACTION_REASON_CHARS: usize = 1_024;
/// Longest reason shown per line of a warning list.
const LISTED_REASON_CHARS: usize = 300;

/// Build a moderation action-result embed.
pub fn moderation_action_embed(
    target_profile: &TargetProfile,
    target_user_id: Id<UserMarker>,
    action_past_tense: &str,
    reason: Option<&str>,
    duration: Option<&str>,
) -> anyhow::Result<Embed> {
    let reason = clip_user_text(reason.unwrap_or(NO_REASON), ACTION_REASON_CHARS);

    let mut description = format!("Target: <@{}>\nReason: {}", target_user_id.get(), reason);
    if let Some(duration) = duration {
        description.push_str(&format!("\nDuration: {duration}"));
    }

    let builder = EmbedBuilder::new()
        .color(DEFAULT_EMBED_COLOR)
        .description(description);
    let title = format!(
        "{} has been {}",
        target_profile.display_name, action_past_tense
    );

    Ok(titled(builder, target_profile, title)?.validate()?.build())
}

/// Room left in an embed description for warning lines.
const WARNINGS_DESCRIPTION_BUDGET: usize = 3_900;

/// Render a member's warning history, numbered from 1 in issue order.
///
/// When the history outgrows one embed the oldest lines are omitted.
pub fn warnings_description(entries: &[WarningEntry]) -> String {
    if entries.is_empty() {
        return "No warnings on record.".to_owned();
    }

    let lines: Vec<String> = entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            format!(
                "#{idx} • <t:{ts}:F> • by <@{mod_id}>\nReason: {reason}",
                idx = index + 1,
                ts = entry.warned_at,
                mod_id = entry.moderator_id.get(),
                reason = clip_user_text(&entry.reason, LISTED_REASON_CHARS)
            )
        })
        .collect();

    let mut used = 0_usize;
    let mut first_shown = lines.len();
    for line in lines.iter().rev() {
        if used + line.len() + 2 > WARNINGS_DESCRIPTION_BUDGET && first_shown < lines.len() {
            break;
        }
        used += line.len() + 2;
        first_shown -= 1;
    }

    let mut description = format!("Total warnings: **{}**\n\n", entries.len());
    if first_shown > 0 {
        description.push_str(&format!("_{first_shown} older warning(s) omitted_\n\n"));
    }
    description.push_str(&lines[first_shown..].join("\n\n"));

    description
}

pub fn warnings_overview_embed(
    target_profile: &TargetProfile,
    entries: &[WarningEntry],
) -> anyhow::Result<Embed> {
    let builder = EmbedBuilder::new()
        .color(DEFAULT_EMBED_COLOR)
        .description(warnings_description(entries));
    let title = format!("Warnings for {}", target_profile.display_name);

    Ok(titled(builder, target_profile, title)?.validate()?.build())
}

/// Forward a completed moderation action to the lifecycle webhook.
pub fn forward_moderation_action(
    ctx: &Context,
    guild_id: Id<GuildMarker>,
    action: &str,
    moderator_id: Id<UserMarker>,
    target_user_id: Option<Id<UserMarker>>,
    reason: Option<&str>,
) {
    ctx.forwarder.forward(
        LifecycleEvent::ModerationAction,
        json!({
            "action": action,
            "guild_id": guild_id.to_string(),
            "moderator_id": moderator_id.to_string(),
            "target_id": target_user_id.map(|id| id.to_string()),
            "reason": reason,
        }),
    );
}

pub const NO_REASON: &str = "No reason provided";

pub fn usage_message(usage: &str) -> String {
    format!("Usage: `{usage}`")
}

pub fn guild_only_message() -> &'static str {
    "This command only works in servers."
}

pub fn permission_denied_message() -> &'static str {
    "You are not permitted to use this command."
}

pub fn moderation_self_action_message(action: &str) -> String {
    format!("You can't {action} yourself.")
}

pub fn moderation_failed_message(action: &str) -> String {
    format!("I couldn't {action} that user. Check role hierarchy and permissions.")
}
