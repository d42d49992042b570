// src/utils/helpers.rs

use worker::Url;

/// Get a single query parameter from a request URL
pub fn query_param(url: &Url, name: &str) -> Option<String> {
    url.query_pairs()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.into_owned())
}

/// Split a comma-separated query value into trimmed, non-empty items
pub fn parse_comma_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Generate a new row id
pub fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_comma_list() {
        assert_eq!(
            parse_comma_list("today, last7Days ,,total"),
            vec!["today", "last7Days", "total"]
        );
        assert!(parse_comma_list("").is_empty());
    }
}
