use twilight_model::id::{Id, marker::RoleMarker};

use super::RoleEntry;
use crate::parse::parse_role_mentions;

/// Separator between role names in `rolesetup` arguments.
pub const ROLE_NAME_DELIMITER: char = '|';

/// Roles requested by a moderator, either by mention or by name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RoleRequest {
    Mentions(Vec<Id<RoleMarker>>),
    Names(Vec<String>),
}

impl RoleRequest {
    /// Interpret raw argument text.
    ///
    /// Any role mention switches to mention mode and the remaining text is ignored.
    pub fn parse(raw: &str) -> Self {
        let mentions = parse_role_mentions(raw);
        if !mentions.is_empty() {
            return Self::Mentions(mentions);
        }

        let names = raw
            .split(ROLE_NAME_DELIMITER)
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(ToOwned::to_owned)
            .collect();

        Self::Names(names)
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Mentions(ids) => ids.is_empty(),
            Self::Names(names) => names.is_empty(),
        }
    }
}

/// Resolve a request against the guild catalog, in request order.
///
/// Unknown ids and names are dropped, names match exactly and the first catalog
/// entry wins. `everyone` is never resolved and duplicates collapse.
pub fn resolve_roles(
    request: &RoleRequest,
    catalog: &[RoleEntry],
    everyone: Id<RoleMarker>,
) -> Vec<RoleEntry> {
    let found: Vec<&RoleEntry> = match request {
        RoleRequest::Mentions(ids) => ids
            .iter()
            .filter_map(|id| catalog.iter().find(|role| role.id == *id))
            .collect(),
        RoleRequest::Names(names) => names
            .iter()
            .filter_map(|name| catalog.iter().find(|role| role.name == *name))
            .collect(),
    };

    let mut resolved: Vec<RoleEntry> = Vec::with_capacity(found.len());
    for role in found {
        if role.id != everyone && !resolved.iter().any(|kept| kept.id == role.id) {
            resolved.push(role.clone());
        }
    }

    resolved
}

/// Keep only roles ranked strictly below `self_rank`, preserving order.
pub fn filter_manageable(requested: Vec<RoleEntry>, self_rank: i64) -> Vec<RoleEntry> {
    requested
        .into_iter()
        .filter(|role| role.rank < self_rank)
        .collect()
}

/// Highest rank among the held roles, or zero when none are held.
pub fn highest_rank(catalog: &[RoleEntry], held: &[Id<RoleMarker>]) -> i64 {
    catalog
        .iter()
        .filter(|role| held.contains(&role.id))
        .map(|role| role.rank)
        .max()
        .unwrap_or(0)
}
