use std::collections::HashMap;

use tokio::sync::RwLock;

use ghost_utils::roles::BoundRole;

/// Roles bound to one rendered role menu.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoundMenu {
    pub roles: Vec<BoundRole>,
    /// Unix seconds after which submissions are refused; `None` never expires.
    pub expires_at: Option<u64>,
}

impl BoundMenu {
    pub fn is_expired(&self, now: u64) -> bool {
        self.expires_at.is_some_and(|expires_at| now > expires_at)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MenuLookup {
    Active(BoundMenu),
    Expired,
    Unknown,
}

/// Maps role menu control ids to their bound role sets.
#[derive(Default)]
pub struct RoleMenuRegistry {
    menus: RwLock<HashMap<String, BoundMenu>>,
}

impl RoleMenuRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a menu until it expires.
    ///
    /// Menus without an expiry are not kept; their roles are read back from the
    /// message itself, so deleted messages never leave entries behind.
    pub async fn register(&self, custom_id: impl Into<String>, menu: BoundMenu) {
        if menu.expires_at.is_none() {
            return;
        }
        self.menus.write().await.insert(custom_id.into(), menu);
    }

    /// Look up a control. Expired controls are dropped on first sight.
    pub async fn lookup(&self, custom_id: &str, now: u64) -> MenuLookup {
        let menu = self.menus.read().await.get(custom_id).cloned();

        match menu {
            Some(menu) if menu.is_expired(now) => {
                self.menus.write().await.remove(custom_id);
                MenuLookup::Expired
            }
            Some(menu) => MenuLookup::Active(menu),
            None => MenuLookup::Unknown,
        }
    }

    /// Drop every expired control and return how many were removed.
    pub async fn prune_expired(&self, now: u64) -> usize {
        let mut menus = self.menus.write().await;
        let before = menus.len();
        menus.retain(|_, menu| !menu.is_expired(now));
        before - menus.len()
    }
}

#[cfg(test)]
mod tests {
    use twilight_model::id::Id;

    use super::*;

    fn menu(expires_at: Option<u64>) -> BoundMenu {
        BoundMenu {
            roles: vec![BoundRole {
                id: Id::new(5),
                name: "Artist".to_owned(),
            }],
            expires_at,
        }
    }

    #[tokio::test]
    async fn registered_menu_is_found() {
        let registry = RoleMenuRegistry::new();
        registry.register("rolemenu:1", menu(Some(100))).await;

        assert_eq!(
            registry.lookup("rolemenu:1", 50).await,
            MenuLookup::Active(menu(Some(100)))
        );
        assert_eq!(registry.lookup("rolemenu:2", 0).await, MenuLookup::Unknown);
    }

    #[tokio::test]
    async fn never_expiring_menus_are_not_retained() {
        let registry = RoleMenuRegistry::new();
        for n in 0..50 {
            registry.register(format!("rolemenu:{n}"), menu(None)).await;
        }

        assert_eq!(registry.prune_expired(u64::MAX).await, 0);
        for n in 0..50 {
            assert_eq!(
                registry.lookup(&format!("rolemenu:{n}"), 0).await,
                MenuLookup::Unknown
            );
        }
    }

    #[tokio::test]
    async fn expired_menu_is_refused_then_forgotten() {
        let registry = RoleMenuRegistry::new();
        registry.register("rolemenu:1", menu(Some(100))).await;

        assert_eq!(
            registry.lookup("rolemenu:1", 100).await,
            MenuLookup::Active(menu(Some(100)))
        );
        assert_eq!(registry.lookup("rolemenu:1", 101).await, MenuLookup::Expired);
        assert_eq!(registry.lookup("rolemenu:1", 101).await, MenuLookup::Unknown);
    }

    #[tokio::test]
    async fn prune_keeps_live_menus() {
        let registry = RoleMenuRegistry::new();
        registry.register("rolemenu:1", menu(Some(10))).await;
        registry.register("rolemenu:2", menu(Some(1_000))).await;

        assert_eq!(registry.prune_expired(500).await, 1);
        assert_eq!(registry.lookup("rolemenu:1", 500).await, MenuLookup::Unknown);
        assert!(matches!(
            registry.lookup("rolemenu:2", 500).await,
            MenuLookup::Active(_)
        ));
    }
}
