use std::collections::HashSet;

use twilight_model::id::{Id, marker::RoleMarker};

use super::BoundRole;

/// Roles to grant and revoke for one menu submission.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RoleDelta {
    pub to_add: Vec<BoundRole>,
    pub to_remove: Vec<BoundRole>,
}

impl RoleDelta {
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }

    /// Role list after granting `to_add` on top of `held`.
    pub fn granted(&self, held: &[Id<RoleMarker>]) -> Vec<Id<RoleMarker>> {
        let mut roles = held.to_vec();
        for role in &self.to_add {
            if !roles.contains(&role.id) {
                roles.push(role.id);
            }
        }
        roles
    }

    /// Role list after revoking `to_remove` from `held`.
    pub fn revoked(&self, held: &[Id<RoleMarker>]) -> Vec<Id<RoleMarker>> {
        held.iter()
            .copied()
            .filter(|id| !self.to_remove.iter().any(|role| role.id == *id))
            .collect()
    }
}

/// Diff a submitted selection against the member's holdings.
///
/// Only roles in `bound` are ever considered; everything else the member holds,
/// and anything selected outside the bound set, is left alone.
pub fn reconcile(
    bound: &[BoundRole],
    held: &[Id<RoleMarker>],
    selection: &[Id<RoleMarker>],
) -> RoleDelta {
    let held: HashSet<Id<RoleMarker>> = held.iter().copied().collect();
    let selection: HashSet<Id<RoleMarker>> = selection.iter().copied().collect();

    let mut delta = RoleDelta::default();
    for role in bound {
        match (selection.contains(&role.id), held.contains(&role.id)) {
            (true, false) => delta.to_add.push(role.clone()),
            (false, true) => delta.to_remove.push(role.clone()),
            _ => {}
        }
    }

    delta
}

/// Parse select-menu values into role ids, skipping anything malformed.
pub fn parse_selection(values: &[String]) -> Vec<Id<RoleMarker>> {
    values
        .iter()
        .filter_map(|value| value.parse::<u64>().ok().and_then(Id::new_checked))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn role(id: u64, name: &str) -> BoundRole {
        BoundRole {
            id: Id::new(id),
            name: name.to_owned(),
        }
    }

    fn ids(raw: &[u64]) -> Vec<Id<RoleMarker>> {
        raw.iter().copied().map(Id::new).collect()
    }

    #[test]
    fn swapping_one_role_for_another() {
        let bound = vec![role(1, "Artist"), role(2, "Coder")];
        let delta = reconcile(&bound, &ids(&[1]), &ids(&[2]));

        assert_eq!(delta.to_add, vec![role(2, "Coder")]);
        assert_eq!(delta.to_remove, vec![role(1, "Artist")]);
    }

    #[test]
    fn roles_outside_the_menu_are_untouched() {
        let bound = vec![role(1, "Artist"), role(2, "Coder")];
        let delta = reconcile(&bound, &ids(&[1, 50]), &ids(&[60]));

        assert!(delta.to_add.is_empty());
        assert_eq!(delta.to_remove, vec![role(1, "Artist")]);
        assert!(delta.revoked(&ids(&[1, 50])).contains(&Id::new(50)));
    }

    #[test]
    fn empty_selection_clears_menu_roles() {
        let bound = vec![role(1, "Artist"), role(2, "Coder")];
        let delta = reconcile(&bound, &ids(&[1, 2]), &[]);

        assert!(delta.to_add.is_empty());
        assert_eq!(delta.to_remove.len(), 2);
    }

    #[test]
    fn matches_set_formula_and_is_disjoint() {
        let bound: Vec<BoundRole> = (1..=6).map(|id| role(id, "r")).collect();
        let holdings = [vec![], ids(&[1, 2]), ids(&[2, 4, 6, 9]), ids(&[1, 2, 3, 4, 5, 6])];
        let selections = [vec![], ids(&[2]), ids(&[1, 3, 5, 7]), ids(&[1, 2, 3, 4, 5, 6])];

        for held in &holdings {
            for selection in &selections {
                let delta = reconcile(&bound, held, selection);

                let expected_add: Vec<Id<RoleMarker>> = bound
                    .iter()
                    .map(|role| role.id)
                    .filter(|id| selection.contains(id) && !held.contains(id))
                    .collect();
                let expected_remove: Vec<Id<RoleMarker>> = bound
                    .iter()
                    .map(|role| role.id)
                    .filter(|id| !selection.contains(id) && held.contains(id))
                    .collect();

                let added: Vec<Id<RoleMarker>> = delta.to_add.iter().map(|r| r.id).collect();
                let removed: Vec<Id<RoleMarker>> = delta.to_remove.iter().map(|r| r.id).collect();
                assert_eq!(added, expected_add);
                assert_eq!(removed, expected_remove);
                assert!(added.iter().all(|id| !removed.contains(id)));
            }
        }
    }

    #[test]
    fn applying_then_resubmitting_is_a_no_op() {
        let bound = vec![role(1, "Artist"), role(2, "Coder"), role(3, "Writer")];
        let held = ids(&[1, 40]);
        let selection = ids(&[2, 3]);

        let delta = reconcile(&bound, &held, &selection);
        let after = delta.revoked(&delta.granted(&held));

        assert_eq!(after, ids(&[40, 2, 3]));
        assert!(reconcile(&bound, &after, &selection).is_empty());
    }

    #[test]
    fn selection_values_skip_garbage() {
        let values = vec!["12".to_owned(), "abc".to_owned(), "0".to_owned()];
        assert_eq!(parse_selection(&values), ids(&[12]));
    }
}
