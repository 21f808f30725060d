use serde_json::{Map, Value};

/// First value that is non-empty after trimming, trimmed. Empty if none.
pub fn first_non_empty<'a>(values: &[&'a str]) -> &'a str {
    values
        .iter()
        .map(|v| v.trim())
        .find(|v| !v.is_empty())
        .unwrap_or("")
}

/// A trimmed, non-empty string stored under `key`. Non-string values are ignored.
pub fn string_from_map<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    match map.get(key) {
        Some(Value::String(s)) => Some(s.trim()).filter(|s| !s.is_empty()),
        _ => None,
    }
}

/// `Some(trimmed)` for a value that carries text, `None` for absent or blank.
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn first_non_empty_skips_blanks() {
        assert_eq!(first_non_empty(&["", "  ", " created_refund "]), "created_refund");
        assert_eq!(first_non_empty(&["", " "]), "");
        assert_eq!(first_non_empty(&[]), "");
    }

    #[test]
    fn string_from_map_only_accepts_strings() {
        let map = json!({"a": " x ", "b": 42, "c": "   ", "d": null});
        let map = map.as_object().unwrap();
        assert_eq!(string_from_map(map, "a"), Some("x"));
        assert_eq!(string_from_map(map, "b"), None);
        assert_eq!(string_from_map(map, "c"), None);
        assert_eq!(string_from_map(map, "d"), None);
        assert_eq!(string_from_map(map, "missing"), None);
    }
}
