use thiserror::Error;
use twilight_model::{
    channel::message::component::{
        ActionRow, Component, SelectMenu, SelectMenuOption, SelectMenuType,
    },
    id::Id,
};

use super::BoundRole;

/// Platform cap on options in one select menu.
pub const MAX_OPTIONS: usize = 25;

/// Custom-id prefix shared by every role menu.
pub const ROLE_MENU_PREFIX: &str = "rolemenu:";

const PLACEHOLDER: &str = "Choose your roles";

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RoleMenuError {
    #[error("a role menu needs at least one role")]
    NoRoles,
    #[error("a role menu holds at most {max} roles, got {count}")]
    TooManyRoles { count: usize, max: usize },
}

/// Build the custom id of a role menu from a unique token.
pub fn role_menu_custom_id(token: u64) -> String {
    format!("{ROLE_MENU_PREFIX}{token}")
}

/// Render a multi-select control bound to `roles`.
///
/// Members may pick anything from none to every bound role.
pub fn build_role_menu(
    custom_id: &str,
    roles: &[BoundRole],
) -> Result<Vec<Component>, RoleMenuError> {
    if roles.is_empty() {
        return Err(RoleMenuError::NoRoles);
    }

    if roles.len() > MAX_OPTIONS {
        return Err(RoleMenuError::TooManyRoles {
            count: roles.len(),
            max: MAX_OPTIONS,
        });
    }

    let options = roles
        .iter()
        .map(|role| SelectMenuOption {
            default: false,
            description: None,
            emoji: None,
            label: role.name.clone(),
            value: role.id.get().to_string(),
        })
        .collect();

    let menu = SelectMenu {
        id: None,
        channel_types: None,
        custom_id: custom_id.to_owned(),
        default_values: None,
        disabled: false,
        kind: SelectMenuType::Text,
        max_values: Some(roles.len() as u8),
        min_values: Some(0),
        options: Some(options),
        placeholder: Some(PLACEHOLDER.to_owned()),
        required: None,
    };

    Ok(vec![Component::ActionRow(ActionRow {
        id: None,
        components: vec![Component::SelectMenu(menu)],
    })])
}

/// Recover the bound role set from a rendered role menu.
///
/// Used when the menu registry no longer knows the control, e.g. after a restart.
pub fn bound_roles_from_components(
    components: &[Component],
    custom_id: &str,
) -> Option<Vec<BoundRole>> {
    let menu = components.iter().find_map(|component| match component {
        Component::ActionRow(row) => row.components.iter().find_map(|nested| match nested {
            Component::SelectMenu(menu) if menu.custom_id == custom_id => Some(menu),
            _ => None,
        }),
        Component::SelectMenu(menu) if menu.custom_id == custom_id => Some(menu),
        _ => None,
    })?;

    let roles: Vec<BoundRole> = menu
        .options
        .as_deref()?
        .iter()
        .filter_map(|option| {
            let id = option.value.parse::<u64>().ok().and_then(Id::new_checked)?;
            Some(BoundRole {
                id,
                name: option.label.clone(),
            })
        })
        .collect();

    (!roles.is_empty()).then_some(roles)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bound(count: usize) -> Vec<BoundRole> {
        (1..=count as u64)
            .map(|id| BoundRole {
                id: Id::new(id),
                name: format!("role-{id}"),
            })
            .collect()
    }

    fn select_menu(components: &[Component]) -> &SelectMenu {
        let Some(Component::ActionRow(row)) = components.first() else {
            panic!("expected an action row");
        };
        let Some(Component::SelectMenu(menu)) = row.components.first() else {
            panic!("expected a select menu");
        };
        menu
    }

    #[test]
    fn single_role_is_enough() {
        let components = build_role_menu("rolemenu:1", &bound(1)).expect("menu");
        let menu = select_menu(&components);
        assert_eq!(menu.min_values, Some(0));
        assert_eq!(menu.max_values, Some(1));
        assert_eq!(menu.options.as_ref().map(Vec::len), Some(1));
    }

    #[test]
    fn cap_is_inclusive() {
        let components = build_role_menu("rolemenu:1", &bound(MAX_OPTIONS)).expect("menu");
        let menu = select_menu(&components);
        assert_eq!(menu.max_values, Some(MAX_OPTIONS as u8));
    }

    #[test]
    fn over_cap_is_rejected() {
        assert_eq!(
            build_role_menu("rolemenu:1", &bound(MAX_OPTIONS + 1)),
            Err(RoleMenuError::TooManyRoles {
                count: MAX_OPTIONS + 1,
                max: MAX_OPTIONS
            })
        );
    }

    #[test]
    fn empty_set_is_rejected() {
        assert_eq!(
            build_role_menu("rolemenu:1", &[]),
            Err(RoleMenuError::NoRoles)
        );
    }

    #[test]
    fn options_carry_role_ids_in_order() {
        let components = build_role_menu("rolemenu:9", &bound(3)).expect("menu");
        let menu = select_menu(&components);
        let values: Vec<&str> = menu
            .options
            .iter()
            .flatten()
            .map(|option| option.value.as_str())
            .collect();
        assert_eq!(menu.custom_id, "rolemenu:9");
        assert_eq!(values, vec!["1", "2", "3"]);
    }

    #[test]
    fn bound_roles_are_recovered_from_rendered_menu() {
        let roles = bound(4);
        let components = build_role_menu("rolemenu:7", &roles).expect("menu");

        assert_eq!(
            bound_roles_from_components(&components, "rolemenu:7"),
            Some(roles)
        );
        assert_eq!(bound_roles_from_components(&components, "rolemenu:8"), None);
    }

    #[test]
    fn custom_id_uses_prefix() {
        assert_eq!(role_menu_custom_id(42), "rolemenu:42");
        assert!(role_menu_custom_id(42).starts_with(ROLE_MENU_PREFIX));
    }
}
