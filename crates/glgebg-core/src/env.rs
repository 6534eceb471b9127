//! `GLGE_*` environment lookups
//!
//! Unset or unparsable variables fall back to the caller's default.

use std::str::FromStr;

/// Variable parsed as `T`, or `default`
#[inline]
pub fn env_get<T: FromStr>(key: &str, default: T) -> T {
    env_get_opt(key).unwrap_or(default)
}

#[inline]
pub fn env_get_opt<T: FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

/// `Some(true)` for 1/true/yes/on (any case), `Some(false)` for any other
/// value, `None` when unset
#[inline]
pub fn env_flag(key: &str) -> Option<bool> {
    std::env::var(key)
        .ok()
        .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
}

#[inline]
pub fn env_get_bool(key: &str, default: bool) -> bool {
    env_flag(key).unwrap_or(default)
}

#[inline]
pub fn env_get_str(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_uses_default() {
        assert_eq!(env_get("__GLGE_TEST_UNSET__", 42usize), 42);
        assert!(env_get_bool("__GLGE_TEST_UNSET__", true));
        assert_eq!(env_flag("__GLGE_TEST_UNSET__"), None);
        assert_eq!(env_get_str("__GLGE_TEST_UNSET__", "/proc"), "/proc");
    }

    #[test]
    fn test_parse_and_fallback() {
        std::env::set_var("__GLGE_TEST_NUM__", " 64 ");
        assert_eq!(env_get("__GLGE_TEST_NUM__", 0usize), 64);

        std::env::set_var("__GLGE_TEST_NUM__", "many");
        assert_eq!(env_get("__GLGE_TEST_NUM__", 8usize), 8);
        assert_eq!(env_get_opt::<usize>("__GLGE_TEST_NUM__"), None);
        std::env::remove_var("__GLGE_TEST_NUM__");
    }

    #[test]
    fn test_flag_values() {
        for (raw, expected) in [("1", true), ("On", true), ("YES", true), ("0", false), ("nope", false)] {
            std::env::set_var("__GLGE_TEST_FLAG__", raw);
            assert_eq!(env_flag("__GLGE_TEST_FLAG__"), Some(expected), "value {:?}", raw);
        }
        std::env::remove_var("__GLGE_TEST_FLAG__");
    }
}
