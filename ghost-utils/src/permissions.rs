use twilight_http::Client;
use twilight_model::{
    guild::Permissions,
    id::{
        Id,
        marker::{GuildMarker, RoleMarker, UserMarker},
    },
};

/// Fold the permissions granted by `@everyone` plus every held role.
pub fn permissions_from_roles(
    guild_id: Id<GuildMarker>,
    roles: impl IntoIterator<Item = (Id<RoleMarker>, Permissions)>,
    held: &[Id<RoleMarker>],
) -> Permissions {
    roles
        .into_iter()
        .filter(|(id, _)| *id == guild_id.cast() || held.contains(id))
        .fold(Permissions::empty(), |acc, (_, permissions)| acc | permissions)
}

/// Whether a resolved permission set satisfies a requirement.
///
/// `ADMINISTRATOR` implies every permission; an empty requirement always passes.
pub fn satisfies(perms: Permissions, required: Permissions) -> bool {
    perms.contains(Permissions::ADMINISTRATOR) || perms.contains(required)
}

/// Resolve a guild member's effective guild-level permissions.
///
/// The guild owner is treated as an administrator.
pub async fn resolve_member_permissions(
    http: &Client,
    guild_id: Id<GuildMarker>,
    user_id: Id<UserMarker>,
) -> anyhow::Result<Permissions> {
    let guild = http.guild(guild_id).await?.model().await?;
    if guild.owner_id == user_id {
        return Ok(Permissions::ADMINISTRATOR);
    }

    let member = http.guild_member(guild_id, user_id).await?.model().await?;

    let roles = guild.roles.iter().map(|role| (role.id, role.permissions));

    Ok(permissions_from_roles(guild_id, roles, &member.roles))
}

/// Check whether a member has a required permission (or administrator).
pub async fn has_member_permission(
    http: &Client,
    guild_id: Id<GuildMarker>,
    user_id: Id<UserMarker>,
    required: Permissions,
) -> anyhow::Result<bool> {
    if required.is_empty() {
        return Ok(true);
    }

    let perms = resolve_member_permissions(http, guild_id, user_id).await?;

    Ok(satisfies(perms, required))
}
