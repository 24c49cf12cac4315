//! Utility helpers: path resolution and string manipulation.

use std::path::PathBuf;

/// Get the Mailbrief data directory (e.g. `~/.mailbrief/`).
pub fn get_data_path() -> PathBuf {
    home_dir().unwrap_or_else(|| PathBuf::from(".")).join(".mailbrief")
}

/// First `max_chars` characters of `s`, without any marker. Unicode-safe.
pub fn take_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Expand `~` to the home directory in a path string.
pub fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = home_dir() {
            return home.join(rest);
        }
    }
    if path == "~" {
        if let Some(home) = home_dir() {
            return home;
        }
    }
    PathBuf::from(path)
}

fn home_dir() -> Option<PathBuf> {
    dirs_next::home_dir()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_chars_short() {
        assert_eq!(take_chars("hello", 10), "hello");
    }

    #[test]
    fn test_take_chars_exact() {
        assert_eq!(take_chars("hello", 5), "hello");
    }

    #[test]
    fn test_take_chars_cuts_without_marker() {
        assert_eq!(take_chars("hello world", 5), "hello");
    }

    #[test]
    fn test_take_chars_unicode() {
        assert_eq!(take_chars("こんにちは世界", 2), "こん");
    }

    #[test]
    fn test_expand_home_tilde() {
        let expanded = expand_home("~/test/path");
        assert!(!expanded.starts_with("~"));
        assert!(expanded.to_str().unwrap().ends_with("test/path"));
    }

    #[test]
    fn test_expand_home_absolute() {
        assert_eq!(expand_home("/absolute/path"), PathBuf::from("/absolute/path"));
    }

    #[test]
    fn test_data_path_ends_with_mailbrief() {
        assert!(get_data_path().ends_with(".mailbrief"));
    }
}
