use twilight_model::channel::message::embed::Embed;
use twilight_util::builder::embed::{EmbedBuilder, EmbedFieldBuilder, EmbedFooterBuilder};

/// Default embed color used across the bot UI.
pub const DEFAULT_EMBED_COLOR: u32 = 0x8E_7C_C3;

/// Build a plain embed with the shared styling.
pub fn build_embed(title: &str, description: impl Into<String>) -> anyhow::Result<Embed> {
    let embed = EmbedBuilder::new()
        .title(title)
        .color(DEFAULT_EMBED_COLOR)
        .description(description)
        .validate()?
        .build();

    Ok(embed)
}

/// Build an embed made of inline fields with an optional footer.
pub fn build_field_embed(
    title: &str,
    fields: &[(&str, String)],
    footer: Option<&str>,
) -> anyhow::Result<Embed> {
    let mut builder = EmbedBuilder::new().title(title).color(DEFAULT_EMBED_COLOR);

    for (name, value) in fields {
        builder = builder.field(EmbedFieldBuilder::new(*name, value.as_str()).inline().build());
    }

    if let Some(text) = footer.filter(|text| !text.is_empty()) {
        builder = builder.footer(EmbedFooterBuilder::new(text).build());
    }

    Ok(builder.validate()?.build())
}

/// Sanitize user-supplied text and cut it to at most `max_chars` characters.
///
/// Length is counted in chars after sanitizing, the way embed limits are measured.
pub fn clip_user_text(text: &str, max_chars: usize) -> String {
    let sanitized = sanitize_mentions(text);
    if sanitized.chars().count() <= max_chars {
        return sanitized;
    }

    let mut clipped: String = sanitized.chars().take(max_chars.saturating_sub(1)).collect();
    clipped.push('…');
    clipped
}

/// Neutralise mentions in user-supplied text before echoing it.
pub fn sanitize_mentions(text: &str) -> String {
    text.replace('@', "@\u{200B}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clipping_counts_sanitized_chars() {
        let clipped = clip_user_text(&"@".repeat(1_500), 100);
        assert_eq!(clipped.chars().count(), 100);
        assert!(clipped.ends_with('…'));
        assert_eq!(clip_user_text("short @here", 100), "short @\u{200B}here");
    }

    #[test]
    fn field_embed_keeps_field_order() {
        let embed = build_field_embed(
            "Server",
            &[("Members", "12".to_owned()), ("Roles", "4".to_owned())],
            Some("footer"),
        )
        .expect("valid embed");

        let names: Vec<&str> = embed.fields.iter().map(|field| field.name.as_str()).collect();
        assert_eq!(names, vec!["Members", "Roles"]);
        assert_eq!(embed.color, Some(DEFAULT_EMBED_COLOR));
        assert_eq!(embed.footer.map(|footer| footer.text), Some("footer".to_owned()));
    }

    #[test]
    fn mentions_are_broken_up() {
        assert_eq!(sanitize_mentions("@everyone"), "@\u{200B}everyone");
    }
}
