//! Domain Services
//!
//! Pure matching logic for the probe filter. All inputs are expected to be
//! lowercased by the caller; matching here is byte-exact.

/// Whether a path falls under a blocked path entry
///
/// A path is blocked iff it equals the entry, or continues it across a
/// path boundary (`/`) or a dot (`.`). A longer route that merely shares
/// the prefix is NOT blocked: `/admin` blocks `/admin/x` and `/admin.bak`
/// but not `/administration`.
pub fn path_is_blocked(path: &str, blocked: &str) -> bool {
    if path == blocked {
        return true;
    }
    let Some(rest) = path.strip_prefix(blocked) else {
        return false;
    };
    rest.starts_with('/') || rest.starts_with('.')
}

/// The final dot-extension of the path's last segment, if any
pub fn extension_of(path: &str) -> Option<&str> {
    let segment = path.rsplit('/').next().unwrap_or(path);
    match segment.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => Some(ext),
        _ => None,
    }
}

/// Lowercased `key=value` pairs of a raw query string
///
/// Pairs without a value are kept as bare keys so patterns can still
/// match them.
pub fn query_pairs_lowercased(query: &str) -> Vec<String> {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| pair.to_lowercase())
        .collect()
}

/// Whether any needle occurs inside the haystack
pub fn contains_any<'a>(haystack: &str, needles: &'a [String]) -> Option<&'a str> {
    needles
        .iter()
        .find(|needle| haystack.contains(needle.as_str()))
        .map(|needle| needle.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_boundary_rule() {
        assert!(path_is_blocked("/admin", "/admin"));
        assert!(path_is_blocked("/admin/users", "/admin"));
        assert!(path_is_blocked("/admin.bak", "/admin"));

        // Shares the prefix but crosses no boundary: must survive.
        assert!(!path_is_blocked("/administration", "/admin"));
        assert!(!path_is_blocked("/administrator/login", "/admin"));
        assert!(!path_is_blocked("/public/admin", "/admin"));
    }

    #[test]
    fn test_path_boundary_rule_nested_entry() {
        assert!(path_is_blocked("/wp-admin/install.php", "/wp-admin"));
        assert!(path_is_blocked("/wp-admin", "/wp-admin"));
        assert!(!path_is_blocked("/wp-administrators", "/wp-admin"));
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("/index.php"), Some("php"));
        assert_eq!(extension_of("/a/b/setup.cgi"), Some("cgi"));
        assert_eq!(extension_of("/archive.tar.gz"), Some("gz"));
        assert_eq!(extension_of("/plain"), None);
        assert_eq!(extension_of("/dotted.dir/plain"), None);
        assert_eq!(extension_of("/.env"), None);
        assert_eq!(extension_of("/trailing."), None);
    }

    #[test]
    fn test_query_pairs_lowercased() {
        assert_eq!(
            query_pairs_lowercased("Name=Alice&Q=DROP+Table"),
            vec!["name=alice".to_string(), "q=drop+table".to_string()]
        );
        assert_eq!(query_pairs_lowercased("bare"), vec!["bare".to_string()]);
        assert!(query_pairs_lowercased("").is_empty());
    }

    #[test]
    fn test_contains_any() {
        let needles = vec!["../".to_string(), "<script".to_string()];
        assert_eq!(contains_any("file=../../etc/passwd", &needles), Some("../"));
        assert_eq!(contains_any("q=hello", &needles), None);
    }
}
