pub const MAX_PLAYER_NAME_LENGTH: usize = 20;
pub const MAX_SESSION_NAME_LENGTH: usize = 64;

pub fn sanitize_player_name(name: &str, fallback: &str) -> String {
    let cleaned = name
        .split_whitespace()
        .map(|word| word.chars().filter(|ch| !ch.is_control()).collect::<String>())
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    if cleaned.is_empty() {
        return fallback.to_string();
    }
    cleaned.chars().take(MAX_PLAYER_NAME_LENGTH).collect()
}

/// Session names end up in URLs and logs, so only `[A-Za-z0-9_-]` survives.
pub fn sanitize_session_name(value: &str, fallback: &str) -> String {
    let cleaned: String = value
        .chars()
        .filter(|ch| ch.is_ascii_alphanumeric() || *ch == '-' || *ch == '_')
        .take(MAX_SESSION_NAME_LENGTH)
        .collect();
    if cleaned.is_empty() {
        return fallback.to_string();
    }
    cleaned
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn player_names_collapse_whitespace_and_drop_controls() {
        assert_eq!(sanitize_player_name("  Big \t Snake\u{7}  ", "Player"), "Big Snake");
        assert_eq!(sanitize_player_name(" \n ", "Player"), "Player");
        assert_eq!(
            sanitize_player_name("abcdefghijklmnopqrstuvwxyz", "Player"),
            "abcdefghijklmnopqrst"
        );
    }

    #[test]
    fn session_names_keep_url_safe_characters() {
        assert_eq!(sanitize_session_name("lobby #1/../x", "main"), "lobby1x");
        assert_eq!(sanitize_session_name("???", "main"), "main");
        assert_eq!(sanitize_session_name(&"a".repeat(100), "main").len(), 64);
    }
}
