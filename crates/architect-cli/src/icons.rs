/// Glyph for unknown icon names.
pub const FALLBACK_GLYPH: &str = "?";

/// Terminal stand-ins for the site's icon names.
pub fn glyph(name: &str) -> &'static str {
    match name {
        "arrow-right" => "→",
        "arrow-up-right" => "↗",
        "bot" => "◆",
        "check-circle" => "✔",
        "chevron-down" => "⌄",
        "mail" => "✉",
        "map-pin" => "⌖",
        "message-square" => "▤",
        "phone" => "☎",
        "plus" => "+",
        "send" => "➤",
        "user" => "›",
        "x" => "✖",
        _ => FALLBACK_GLYPH,
    }
}
