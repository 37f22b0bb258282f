use std::sync::Arc;
use std::time::Instant;

use twilight_http::Client;
use twilight_model::id::{Id, marker::UserMarker};

use ghost_store::{RoleMenuRegistry, WarningStore};

/// Environment-driven startup configuration.
pub mod config;
/// Best-effort lifecycle event forwarding.
pub mod webhook;

pub use config::{Config, ConfigError};
pub use webhook::{EventForwarder, LifecycleEvent};

/// Shared application context passed into command handlers.
///
/// Cheap to clone because it only stores reference-counted shared state.
#[derive(Clone)]
pub struct Context {
    pub http: Arc<Client>,
    pub bot_user_id: Id<UserMarker>,
    pub config: Arc<Config>,
    pub warnings: Arc<dyn WarningStore>,
    pub menus: Arc<RoleMenuRegistry>,
    pub forwarder: EventForwarder,
    pub started_at: Instant,
}

impl Context {
    /// Create a new application context; uptime is measured from here.
    pub fn new(
        http: Arc<Client>,
        bot_user_id: Id<UserMarker>,
        config: Arc<Config>,
        warnings: Arc<dyn WarningStore>,
        forwarder: EventForwarder,
    ) -> Self {
        Self {
            http,
            bot_user_id,
            config,
            warnings,
            menus: Arc::new(RoleMenuRegistry::new()),
            forwarder,
            started_at: Instant::now(),
        }
    }
}
