//! Self-role menu logic: which roles may be offered, how the menu is rendered,
//! and how a submitted selection turns into role grants and revokes.

use twilight_model::{
    guild::Role,
    id::{Id, marker::RoleMarker},
};

pub mod filter;
pub mod menu;
pub mod reconcile;

pub use filter::{RoleRequest, filter_manageable, highest_rank, resolve_roles};
pub use menu::{
    MAX_OPTIONS, ROLE_MENU_PREFIX, RoleMenuError, bound_roles_from_components, build_role_menu,
    role_menu_custom_id,
};
pub use reconcile::{RoleDelta, parse_selection, reconcile};

/// A guild role as seen by the role filter.
///
/// `rank` is the platform role position; higher ranks carry more authority.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoleEntry {
    pub id: Id<RoleMarker>,
    pub name: String,
    pub rank: i64,
}

impl From<&Role> for RoleEntry {
    fn from(role: &Role) -> Self {
        Self {
            id: role.id,
            name: role.name.clone(),
            rank: role.position,
        }
    }
}

/// A role bound to a rendered menu.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoundRole {
    pub id: Id<RoleMarker>,
    pub name: String,
}

impl From<&RoleEntry> for BoundRole {
    fn from(entry: &RoleEntry) -> Self {
        Self {
            id: entry.id,
            name: entry.name.clone(),
        }
    }
}
