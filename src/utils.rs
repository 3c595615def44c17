/*!
 * Utility functions for filemap
 */

use glob_match::glob_match;
use once_cell::sync::Lazy;

/// Whether an entry named `name` is excluded by `patterns` or the default list
pub fn should_ignore(name: &str, patterns: &[String]) -> bool {
    if patterns.iter().any(|pattern| glob_match(pattern, name)) {
        return true;
    }
    DEFAULT_IGNORE
        .iter()
        .any(|&pattern| pattern == name || glob_match(pattern, name))
}

/// Whether a file named `name` passes the include patterns; empty includes all
pub fn should_include(name: &str, patterns: &[String]) -> bool {
    patterns.is_empty() || patterns.iter().any(|pattern| glob_match(pattern, name))
}

/// Format a number with human-readable units
pub fn format_number(num: usize) -> String {
    if num >= 1_000_000 {
        format!("{:.1}M", num as f64 / 1_000_000.0)
    } else if num >= 1_000 {
        format!("{:.1}K", num as f64 / 1_000.0)
    } else {
        num.to_string()
    }
}

/// Default patterns to ignore
pub static DEFAULT_IGNORE: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        // Version Control
        ".git",
        ".svn",
        ".hg",
        ".bzr",
        // OS Files
        ".DS_Store",
        "Thumbs.db",
        "desktop.ini",
        // Dependencies
        "node_modules",
        "bower_components",
        ".pnpm-store",
        ".yarn",
        // Build & Dist
        "target",
        "dist",
        ".next",
        ".nuxt",
        ".output",
        ".turbo",
        "_site",
        ".docusaurus",
        // Caches & Temp
        "__pycache__",
        ".pytest_cache",
        ".cache",
        ".sass-cache",
        ".eslintcache",
        // IDEs & Editors
        ".idea",
        ".vscode",
        "*.swp",
        "*.swo",
        "*~",
    ]
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ignores() {
        assert!(should_ignore(".git", &[]));
        assert!(should_ignore("node_modules", &[]));
        assert!(should_ignore("notes.md.swp", &[]));
        assert!(!should_ignore("docs", &[]));
    }

    #[test]
    fn test_custom_patterns() {
        let ignore = vec!["draft*".to_string()];
        assert!(should_ignore("drafts", &ignore));
        assert!(!should_ignore("guide", &ignore));

        let include = vec!["*.md".to_string(), "index".to_string()];
        assert!(should_include("a.md", &include));
        assert!(should_include("index", &include));
        assert!(!should_include("a.txt", &include));
        assert!(should_include("anything", &[]));
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1_500), "1.5K");
        assert_eq!(format_number(2_000_000), "2.0M");
    }
}
