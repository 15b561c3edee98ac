//! Unit tests for SourcePosition and SourceMap

use core_types::{SourceMap, SourcePosition};

#[cfg(test)]
mod source_position_tests {
    use super::*;

    #[test]
    fn test_source_position_equality() {
        let a = SourcePosition::new("main", 4, 2);
        let b = SourcePosition::new("main", 4, 2);
        let c = SourcePosition::new("other", 4, 2);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_source_position_clone_shares_origin() {
        let a = SourcePosition::new("main", 0, 0);
        let b = a.clone();
        assert_eq!(a.origin, b.origin);
    }
}

#[cfg(test)]
mod source_map_tests {
    use super::*;

    fn map() -> SourceMap {
        let mut map = SourceMap::new();
        map.insert("main", "first line\nsecond line\nthird");
        map
    }

    #[test]
    fn test_source_map_starts_empty() {
        let map = SourceMap::new();
        assert!(map.is_empty());
        assert_eq!(map.len(), 0);
    }

    #[test]
    fn test_source_map_insert_and_get() {
        let map = map();
        assert_eq!(map.len(), 1);
        assert!(map.get("main").unwrap().starts_with("first"));
        assert!(map.get("nope").is_none());
    }

    #[test]
    fn test_source_map_replace() {
        let mut map = map();
        map.insert("main", "replaced");
        assert_eq!(map.get("main"), Some("replaced"));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_line_number_first_line() {
        let map = map();
        assert_eq!(map.line_number(&SourcePosition::new("main", 0, 1)), Some(1));
        assert_eq!(map.line_number(&SourcePosition::new("main", 9, 1)), Some(1));
    }

    #[test]
    fn test_line_number_later_lines() {
        let map = map();
        // "first line\n" is 11 characters
        assert_eq!(map.line_number(&SourcePosition::new("main", 11, 1)), Some(2));
        assert_eq!(map.line_number(&SourcePosition::new("main", 24, 1)), Some(3));
    }

    #[test]
    fn test_snippet_last_line_without_newline() {
        let map = map();
        let snippet = map.snippet(&SourcePosition::new("main", 25, 1)).unwrap();
        assert_eq!(snippet, "  3 | third");
    }

    #[test]
    fn test_snippet_counts_characters_not_bytes() {
        let mut map = SourceMap::new();
        map.insert("u", "'é'\nx");
        let snippet = map.snippet(&SourcePosition::new("u", 4, 1)).unwrap();
        assert_eq!(snippet, "  2 | x");
    }
}
