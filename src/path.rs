/*!
 * Helpers for `/`-separated logical paths used by file maps
 */

/// Join already-sanitized segments with `/`
pub fn join_path_parts<S: AsRef<str>>(parts: &[S]) -> String {
    parts
        .iter()
        .map(|p| p.as_ref())
        .collect::<Vec<_>>()
        .join("/")
}

/// Trim every segment, drop the empty ones and join the rest with `/`
pub fn path_parts_to_path<S: AsRef<str>>(parts: &[S]) -> String {
    join_path_parts(&sanitize_path_parts(parts))
}

/// Split a path into trimmed, non-empty segments
///
/// Leading and trailing whitespace and slashes are ignored, so `" /a/ b//c/ "`
/// becomes `["a", "b", "c"]`.
pub fn path_to_path_parts(path: &str) -> Vec<String> {
    path.trim()
        .trim_matches('/')
        .split('/')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Trim every segment and drop the empty ones
pub fn sanitize_path_parts<S: AsRef<str>>(parts: &[S]) -> Vec<String> {
    parts
        .iter()
        .map(|p| p.as_ref().trim())
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Extension of a file name without the dot, if it has one
///
/// Dot-files such as `.gitignore` have no extension.
pub fn get_extension(name: &str) -> Option<&str> {
    match name.rfind('.') {
        Some(0) | None => None,
        Some(pos) if pos + 1 < name.len() => Some(&name[pos + 1..]),
        Some(_) => None,
    }
}

/// Remove `.{extension}` from the end of a name when present
pub fn strip_extension<'a>(name: &'a str, extension: &str) -> &'a str {
    name.strip_suffix(extension)
        .and_then(|rest| rest.strip_suffix('.'))
        .filter(|rest| !rest.is_empty())
        .unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_to_path_parts() {
        assert_eq!(path_to_path_parts(" /a/ b//c/ "), vec!["a", "b", "c"]);
        assert_eq!(path_to_path_parts("a"), vec!["a"]);
        assert!(path_to_path_parts("  /  ").is_empty());
    }

    #[test]
    fn test_path_parts_to_path() {
        assert_eq!(path_parts_to_path(&[" a ", "", "b"]), "a/b");
        assert_eq!(path_parts_to_path::<&str>(&[]), "");
        assert_eq!(join_path_parts(&["a", "b", "c"]), "a/b/c");
    }

    #[test]
    fn test_sanitize_path_parts() {
        assert_eq!(sanitize_path_parts(&["  ", "x", " y"]), vec!["x", "y"]);
    }

    #[test]
    fn test_extension_helpers() {
        assert_eq!(get_extension("guide.md"), Some("md"));
        assert_eq!(get_extension("archive.tar.gz"), Some("gz"));
        assert_eq!(get_extension(".gitignore"), None);
        assert_eq!(get_extension("README"), None);
        assert_eq!(get_extension("trailing."), None);

        assert_eq!(strip_extension("guide.md", "md"), "guide");
        assert_eq!(strip_extension("guide.mdx", "md"), "guide.mdx");
        assert_eq!(strip_extension("md", "md"), "md");
        assert_eq!(strip_extension(".md", "md"), ".md");
    }
}
