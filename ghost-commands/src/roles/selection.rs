use std::future::Future;

use tracing::{error, info};
use twilight_http::{Client, request::AuditLogReason as _};
use twilight_model::{
    application::interaction::InteractionData,
    gateway::payload::incoming::InteractionCreate,
    id::{
        Id,
        marker::{GuildMarker, RoleMarker, UserMarker},
    },
};

use crate::moderation::embeds::guild_only_message;
use ghost_core::Context;
use ghost_store::{BoundMenu, MenuLookup};
use ghost_utils::interaction::{
    defer_component_update, followup_ephemeral_message, respond_ephemeral_message,
    update_deferred_components,
};
use ghost_utils::roles::{
    BoundRole, RoleDelta, bound_roles_from_components, build_role_menu, parse_selection,
    reconcile,
};
use ghost_utils::time::now_unix_secs;

const ROLE_MENU_AUDIT_REASON: &str = "Self-service role menu";
const EXPIRED_MESSAGE: &str = "This role menu has expired. Ask a moderator for a new one.";
const UNKNOWN_MENU_MESSAGE: &str = "This role menu is no longer available.";
const UPDATE_FAILED_MESSAGE: &str =
    "I couldn't update your roles. A moderator may need to move my role higher.";

enum BoundLookup {
    Roles(Vec<BoundRole>),
    Expired,
    Missing,
}

/// Summarise an applied delta for the submitting member.
pub fn selection_summary(delta: &RoleDelta) -> String {
    if delta.is_empty() {
        return "Your roles are already up to date.".to_owned();
    }

    let names = |roles: &[BoundRole]| {
        roles
            .iter()
            .map(|role| role.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    };

    let mut lines = Vec::with_capacity(2);
    if !delta.to_add.is_empty() {
        lines.push(format!("Added: {}", names(&delta.to_add)));
    }
    if !delta.to_remove.is_empty() {
        lines.push(format!("Removed: {}", names(&delta.to_remove)));
    }

    lines.join("\n")
}

/// Find the roles bound to a control, recovering them from the message when the
/// registry has no record of it.
async fn bound_roles(ctx: &Context, interaction: &InteractionCreate, custom_id: &str) -> BoundLookup {
    let now = now_unix_secs();
    match ctx.menus.lookup(custom_id, now).await {
        MenuLookup::Active(menu) => return BoundLookup::Roles(menu.roles),
        MenuLookup::Expired => return BoundLookup::Expired,
        MenuLookup::Unknown => {}
    }

    let Some(message) = interaction.message.as_ref() else {
        return BoundLookup::Missing;
    };
    let Some(roles) = bound_roles_from_components(&message.components, custom_id) else {
        return BoundLookup::Missing;
    };

    let created_at = u64::try_from(message.timestamp.as_secs()).unwrap_or(0);
    let expires_at = ctx
        .config
        .role_menu_expiry
        .map(|ttl| created_at.saturating_add(ttl.as_secs()));
    let menu = BoundMenu {
        roles: roles.clone(),
        expires_at,
    };

    if menu.is_expired(now) {
        return BoundLookup::Expired;
    }

    ctx.menus.register(custom_id, menu).await;
    BoundLookup::Roles(roles)
}

/// Member role lists to send, in order: the grant batch, then the revoke batch.
///
/// An empty delta plans no update at all.
pub fn planned_updates(held: &[Id<RoleMarker>], delta: &RoleDelta) -> Vec<Vec<Id<RoleMarker>>> {
    let mut plan = Vec::with_capacity(2);
    let mut current = held.to_vec();

    if !delta.to_add.is_empty() {
        current = delta.granted(&current);
        plan.push(current.clone());
    }
    if !delta.to_remove.is_empty() {
        plan.push(delta.revoked(&current));
    }

    plan
}

/// Send each planned batch, stopping at the first failure.
///
/// Batches are independent: a failed revoke does not undo a grant.
async fn apply_updates<F, Fut>(plan: Vec<Vec<Id<RoleMarker>>>, mut update: F) -> anyhow::Result<()>
where
    F: FnMut(Vec<Id<RoleMarker>>) -> Fut,
    Fut: Future<Output = anyhow::Result<()>>,
{
    for roles in plan {
        update(roles).await?;
    }

    Ok(())
}

async fn apply_delta(
    http: &Client,
    guild_id: Id<GuildMarker>,
    user_id: Id<UserMarker>,
    held: &[Id<RoleMarker>],
    delta: &RoleDelta,
) -> anyhow::Result<()> {
    apply_updates(planned_updates(held, delta), |roles| async move {
        http.update_guild_member(guild_id, user_id)
            .roles(&roles)
            .reason(ROLE_MENU_AUDIT_REASON)
            .await?;
        Ok(())
    })
    .await
}

/// Reconcile a member's role-menu submission.
pub async fn handle_interaction(
    ctx: Context,
    interaction: Box<InteractionCreate>,
) -> anyhow::Result<()> {
    let http = &ctx.http;
    let Some(InteractionData::MessageComponent(data)) = interaction.data.as_ref() else {
        return Ok(());
    };
    let custom_id = data.custom_id.as_str();

    let (Some(guild_id), Some(member), Some(user_id)) = (
        interaction.guild_id,
        interaction.member.as_ref(),
        interaction.author_id(),
    ) else {
        respond_ephemeral_message(http, &interaction, guild_only_message()).await?;
        return Ok(());
    };

    let roles = match bound_roles(&ctx, &interaction, custom_id).await {
        BoundLookup::Roles(roles) => roles,
        BoundLookup::Expired => {
            respond_ephemeral_message(http, &interaction, EXPIRED_MESSAGE).await?;
            return Ok(());
        }
        BoundLookup::Missing => {
            respond_ephemeral_message(http, &interaction, UNKNOWN_MENU_MESSAGE).await?;
            return Ok(());
        }
    };

    let selection = parse_selection(&data.values);
    let delta = reconcile(&roles, &member.roles, &selection);

    // Member updates can sit behind a rate limit; acknowledge first.
    defer_component_update(http, &interaction).await?;

    if let Err(source) = apply_delta(http, guild_id, user_id, &member.roles, &delta).await {
        error!(
            ?source,
            guild_id = guild_id.get(),
            user_id = user_id.get(),
            "role menu update failed"
        );
        followup_ephemeral_message(http, &interaction, UPDATE_FAILED_MESSAGE).await?;
        return Ok(());
    }

    info!(
        guild_id = guild_id.get(),
        user_id = user_id.get(),
        added = delta.to_add.len(),
        removed = delta.to_remove.len(),
        "role menu applied"
    );

    let components = build_role_menu(custom_id, &roles)?;
    update_deferred_components(http, &interaction, &components).await?;
    followup_ephemeral_message(http, &interaction, &selection_summary(&delta)).await?;

    Ok(())
}
