//! `{{ key }}` placeholder substitution.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};

#[allow(clippy::expect_used)]
static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}\}").expect("valid regex")
});

/// Replace every `{{ key }}` with its value. Unknown keys become empty.
#[must_use]
pub fn substitute(template: &str, values: &BTreeMap<&str, String>) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures<'_>| {
            let key = &caps[1];
            values.get(key).cloned().unwrap_or_else(|| {
                tracing::debug!(key, "no value for placeholder");
                String::new()
            })
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values() -> BTreeMap<&'static str, String> {
        BTreeMap::from([
            ("doctitle", "Main Title".to_string()),
            ("docyear", "2001".to_string()),
        ])
    }

    #[test]
    fn test_substitute() {
        assert_eq!(
            substitute("<title>{{ doctitle }}</title> &#169; {{docyear}}", &values()),
            "<title>Main Title</title> &#169; 2001"
        );
    }

    #[test]
    fn test_unknown_key_is_empty() {
        assert_eq!(substitute("[{{ nope }}]", &values()), "[]");
    }

    #[test]
    fn test_non_placeholders_untouched() {
        assert_eq!(substitute("{ x } {{ }}", &values()), "{ x } {{ }}");
    }
}
