use std::{env, fmt, time::Duration};

use thiserror::Error;
use tracing::warn;
use twilight_model::id::{Id, marker::ChannelMarker};

use ghost_utils::parse::{parse_channel_id, parse_positive};

const TOKEN_VAR: &str = "TOKEN";
const WEBHOOK_VAR: &str = "LUMI_WEBHOOK";
const WELCOME_CHANNEL_VAR: &str = "WELCOME_CHANNEL_ID";
const ROLE_MENU_EXPIRY_VAR: &str = "ROLE_MENU_EXPIRY_MINS";

/// Longest accepted role menu lifetime: one year.
pub const MAX_ROLE_MENU_EXPIRY_MINS: u64 = 525_600;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("TOKEN is not set")]
    MissingToken,
}

#[derive(Clone)]
pub struct Config {
    pub token: String,
    pub webhook_url: Option<String>,
    pub welcome_channel_id: Option<Id<ChannelMarker>>,
    /// How long a role menu accepts submissions; `None` keeps it open forever.
    pub role_menu_expiry: Option<Duration>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("token", &"<redacted>")
            .field("webhook_url", &self.webhook_url.as_ref().map(|_| "<set>"))
            .field("welcome_channel_id", &self.welcome_channel_id)
            .field("role_menu_expiry", &self.role_menu_expiry)
            .finish()
    }
}

impl Config {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    ///
    /// Blank values count as unset. Unparseable optional values are ignored with a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };

        let token = read(TOKEN_VAR).ok_or(ConfigError::MissingToken)?;
        let webhook_url = read(WEBHOOK_VAR);

        let welcome_channel_id = read(WELCOME_CHANNEL_VAR).and_then(|raw| {
            let parsed = parse_channel_id(&raw);
            if parsed.is_none() {
                warn!(value = %raw, "ignoring non-numeric WELCOME_CHANNEL_ID");
            }
            parsed
        });

        let role_menu_expiry = read(ROLE_MENU_EXPIRY_VAR).and_then(|raw| {
            let parsed = parse_positive(&raw);
            if parsed.is_none() {
                warn!(value = %raw, "ignoring invalid ROLE_MENU_EXPIRY_MINS");
            }
            parsed.map(|minutes| {
                if minutes > MAX_ROLE_MENU_EXPIRY_MINS {
                    warn!(minutes, max = MAX_ROLE_MENU_EXPIRY_MINS, "clamping ROLE_MENU_EXPIRY_MINS");
                }
                Duration::from_secs(minutes.min(MAX_ROLE_MENU_EXPIRY_MINS) * 60)
            })
        });

        Ok(Self {
            token,
            webhook_url,
            welcome_channel_id,
            role_menu_expiry,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn token_is_required() {
        assert_eq!(config(&[]).err(), Some(ConfigError::MissingToken));
        assert_eq!(config(&[("TOKEN", "   ")]).err(), Some(ConfigError::MissingToken));
    }

    #[test]
    fn optional_values_default_to_none() {
        let config = config(&[("TOKEN", "abc")]).expect("config");
        assert_eq!(config.token, "abc");
        assert_eq!(config.webhook_url, None);
        assert_eq!(config.welcome_channel_id, None);
        assert_eq!(config.role_menu_expiry, None);
    }

    #[test]
    fn non_numeric_welcome_channel_is_ignored() {
        let config = config(&[("TOKEN", "abc"), ("WELCOME_CHANNEL_ID", "general")])
            .expect("config");
        assert_eq!(config.welcome_channel_id, None);
    }

    #[test]
    fn all_values_are_read() {
        let config = config(&[
            ("TOKEN", "abc"),
            ("LUMI_WEBHOOK", "https://example.invalid/hook"),
            ("WELCOME_CHANNEL_ID", "1234"),
            ("ROLE_MENU_EXPIRY_MINS", "30"),
        ])
        .expect("config");

        assert_eq!(
            config.webhook_url.as_deref(),
            Some("https://example.invalid/hook")
        );
        assert_eq!(config.welcome_channel_id, Some(Id::new(1234)));
        assert_eq!(config.role_menu_expiry, Some(Duration::from_secs(1_800)));
    }

    #[test]
    fn huge_menu_expiry_is_clamped() {
        let max = u64::MAX.to_string();
        let config = config(&[("TOKEN", "abc"), ("ROLE_MENU_EXPIRY_MINS", &max)]).expect("config");
        assert_eq!(
            config.role_menu_expiry,
            Some(Duration::from_secs(MAX_ROLE_MENU_EXPIRY_MINS * 60))
        );
    }

    #[test]
    fn debug_output_hides_the_token() {
        let config = config(&[("TOKEN", "super-secret")]).expect("config");
        assert!(!format!("{config:?}").contains("super-secret"));
    }
}
