use twilight_model::id::{
    Id,
    marker::{ChannelMarker, RoleMarker, UserMarker},
};

/// Parse a target user from a raw argument (`<@id>`, `<@!id>`, or raw ID).
pub fn parse_target_user_id(raw: &str) -> Option<Id<UserMarker>> {
    let trimmed = raw.trim();

    let numeric = if trimmed.starts_with("<@") && trimmed.ends_with('>') {
        let without_wrappers = trimmed.strip_prefix("<@")?.strip_suffix('>')?;
        without_wrappers
            .strip_prefix('!')
            .unwrap_or(without_wrappers)
    } else {
        trimmed
    };

    let id = numeric.parse::<u64>().ok()?;

    Id::new_checked(id)
}

/// Collect role mentions (`<@&id>`) from free text in the order they appear.
///
/// Repeated mentions of the same role are reported once.
pub fn parse_role_mentions(raw: &str) -> Vec<Id<RoleMarker>> {
    let mut ids: Vec<Id<RoleMarker>> = Vec::new();
    let mut rest = raw;

    while let Some(start) = rest.find("<@&") {
        let after = &rest[start + 3..];
        let parsed = after.find('>').and_then(|end| {
            let id = after[..end].parse::<u64>().ok().and_then(Id::new_checked)?;
            Some((id, end))
        });

        match parsed {
            Some((id, end)) => {
                if !ids.contains(&id) {
                    ids.push(id);
                }
                rest = &after[end + 1..];
            }
            None => rest = after,
        }
    }

    ids
}

/// Parse an optional channel id from configuration text.
///
/// Non-numeric and zero values yield `None`.
pub fn parse_channel_id(raw: &str) -> Option<Id<ChannelMarker>> {
    raw.trim().parse::<u64>().ok().and_then(Id::new_checked)
}

/// Parse a strictly positive integer argument.
pub fn parse_positive(raw: &str) -> Option<u64> {
    raw.trim().parse::<u64>().ok().filter(|value| *value > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_user_accepts_mentions_and_raw_ids() {
        assert_eq!(parse_target_user_id("<@42>"), Some(Id::new(42)));
        assert_eq!(parse_target_user_id("<@!42>"), Some(Id::new(42)));
        assert_eq!(parse_target_user_id(" 42 "), Some(Id::new(42)));
    }

    #[test]
    fn target_user_rejects_garbage_and_zero() {
        assert_eq!(parse_target_user_id("someone"), None);
        assert_eq!(parse_target_user_id("<@&42>"), None);
        assert_eq!(parse_target_user_id("0"), None);
    }

    #[test]
    fn role_mentions_keep_order_and_skip_repeats() {
        let ids = parse_role_mentions("<@&3> text <@&1> <@&3><@&2>");
        assert_eq!(ids, vec![Id::new(3), Id::new(1), Id::new(2)]);
    }

    #[test]
    fn role_mentions_ignore_user_mentions_and_broken_tokens() {
        let ids = parse_role_mentions("<@5> <@&oops <@&7>");
        assert_eq!(ids, vec![Id::new(7)]);
        assert!(parse_role_mentions("Artist | Coder").is_empty());
    }

    #[test]
    fn channel_id_ignores_non_numeric_values() {
        assert_eq!(parse_channel_id("123"), Some(Id::new(123)));
        assert_eq!(parse_channel_id("general"), None);
        assert_eq!(parse_channel_id("0"), None);
    }

    #[test]
    fn positive_rejects_zero_and_negative() {
        assert_eq!(parse_positive("15"), Some(15));
        assert_eq!(parse_positive("0"), None);
        assert_eq!(parse_positive("-3"), None);
    }
}
