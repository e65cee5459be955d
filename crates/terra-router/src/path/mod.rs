//! Pathname checks and cleanup applied before route matching

use std::borrow::Cow;

/// Whether `path` is already canonical: rooted at `/`, free of empty
/// segments and backslashes, and without a trailing slash unless it is `/`
///
/// # Examples
///
/// ```
/// use terra_router::path::is_valid_path;
///
/// assert!(is_valid_path("/"));
/// assert!(is_valid_path("/workspaces/ns/ws"));
///
/// assert!(!is_valid_path(""));
/// assert!(!is_valid_path("workspaces"));
/// assert!(!is_valid_path("/workspaces/"));
/// assert!(!is_valid_path("/workspaces//ns"));
/// ```
pub fn is_valid_path(path: &str) -> bool {
    if !path.starts_with('/') {
        return false;
    }

    if path.contains("//") || path.contains('\\') {
        return false;
    }

    path == "/" || !path.ends_with('/')
}

/// Rewrites `path` into canonical form, borrowing when nothing changes
///
/// Backslashes become `/`, empty segments are dropped and a leading `/` is
/// added, so `workspaces//ns\ws/` becomes `/workspaces/ns/ws`.
///
/// # Examples
///
/// ```
/// use terra_router::path::normalize_path;
/// use std::borrow::Cow;
///
/// assert!(matches!(normalize_path("/billing"), Cow::Borrowed("/billing")));
/// assert_eq!(normalize_path("workspaces//ns/ws/"), "/workspaces/ns/ws");
/// assert_eq!(normalize_path(""), "/");
/// ```
pub fn normalize_path(path: &str) -> Cow<'_, str> {
    if is_valid_path(path) {
        return Cow::Borrowed(path);
    }

    let normalized = path
        .replace('\\', "/")
        .split('/')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("/");

    if normalized.is_empty() {
        Cow::Borrowed("/")
    } else {
        Cow::Owned(format!("/{}", normalized))
    }
}

/// Converts a hash fragment into a pathname
///
/// Accepts `#workspaces/ns`, `#/workspaces/ns`, or a bare `workspaces/ns`.
/// Any `?query` suffix is left in place.
///
/// # Examples
///
/// ```
/// use terra_router::path::strip_hash;
///
/// assert_eq!(strip_hash("#workspaces/ns/ws"), "/workspaces/ns/ws");
/// assert_eq!(strip_hash("#/billing"), "/billing");
/// assert_eq!(strip_hash("#"), "/");
/// ```
pub fn strip_hash(href: &str) -> String {
    let fragment = href.strip_prefix('#').unwrap_or(href);
    format!("/{}", fragment.trim_start_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_path() {
        assert!(is_valid_path("/"));
        assert!(is_valid_path("/profile"));
        assert!(is_valid_path("/workspaces/ns/ws/data"));

        assert!(!is_valid_path(""));
        assert!(!is_valid_path("profile"));
        assert!(!is_valid_path("/profile/"));
        assert!(!is_valid_path("/a//b"));
        assert!(!is_valid_path("/a\\b"));
    }

    #[test]
    fn test_normalize_path_valid_is_borrowed() {
        assert!(matches!(normalize_path("/profile"), Cow::Borrowed("/profile")));
        assert!(matches!(normalize_path("/"), Cow::Borrowed("/")));
    }

    #[test]
    fn test_normalize_path_fixes_mistakes() {
        assert_eq!(normalize_path("/profile/"), "/profile");
        assert_eq!(normalize_path("/a///b//c"), "/a/b/c");
        assert_eq!(normalize_path("\\a\\b"), "/a/b");
        assert_eq!(normalize_path("a/b"), "/a/b");
        assert_eq!(normalize_path("///"), "/");
    }

    #[test]
    fn test_strip_hash() {
        assert_eq!(strip_hash("#workspaces"), "/workspaces");
        assert_eq!(strip_hash("#//workspaces"), "/workspaces");
        assert_eq!(strip_hash("workspaces?tab=data"), "/workspaces?tab=data");
        assert_eq!(strip_hash(""), "/");
    }
}
