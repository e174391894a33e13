//! Assistant content normalization for math-aware markdown rendering.
//!
//! The backend's model tends to emit LaTeX inline math as `\( … \)` and to
//! write modular arithmetic in plain parentheses. The markdown renderer only
//! understands `$ … $`, so both forms are rewritten here. This is a narrow
//! pair of regex rewrites, not an expression parser: nested parentheses are
//! only handled at the innermost level.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static INLINE_MATH_DELIMITER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\[()]").expect("inline math delimiter pattern is valid"));

static FLAT_MOD_GROUP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\(([^()]*\bmod\b[^()]*)\)").expect("mod group pattern is valid")
});

/// Rewrites assistant text so inline math reaches the renderer as `$ … $`.
///
/// 1. Every `\(` and `\)` becomes `$`; the content between is untouched.
/// 2. Every innermost `( … )` span containing the word `mod` becomes
///    `$ … $` with the inner expression kept verbatim.
///
/// Only ever applied to assistant-authored text.
pub fn normalize_assistant_content(content: &str) -> String {
    let delimited = INLINE_MATH_DELIMITER.replace_all(content, "$$");
    FLAT_MOD_GROUP
        .replace_all(&delimited, |caps: &Captures<'_>| format!("${}$", &caps[1]))
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_math_delimiters() {
        assert_eq!(normalize_assistant_content("\\(x+1\\)"), "$x+1$");
        assert_eq!(
            normalize_assistant_content("Area is \\(\\pi r^2\\) and \\(2r\\)."),
            "Area is $\\pi r^2$ and $2r$."
        );
    }

    #[test]
    fn test_mod_group() {
        assert_eq!(normalize_assistant_content("(5 mod 3)"), "$5 mod 3$");
        assert_eq!(
            normalize_assistant_content("so a ≡ b (mod n) holds"),
            "so a ≡ b $mod n$ holds"
        );
    }

    #[test]
    fn test_plain_text_is_untouched() {
        assert_eq!(normalize_assistant_content("42"), "42");
        assert_eq!(
            normalize_assistant_content("Refunds are processed within 5 days."),
            "Refunds are processed within 5 days."
        );
        assert_eq!(normalize_assistant_content("(see above)"), "(see above)");
    }

    #[test]
    fn test_mod_must_be_a_whole_word() {
        assert_eq!(normalize_assistant_content("(x modulo y)"), "(x modulo y)");
        assert_eq!(normalize_assistant_content("(a model)"), "(a model)");
    }

    #[test]
    fn test_only_innermost_group_is_rewritten() {
        assert_eq!(
            normalize_assistant_content("(a (b mod c))"),
            "(a $b mod c$)"
        );
        assert_eq!(
            normalize_assistant_content("(1) and (7 mod 2)"),
            "(1) and $7 mod 2$"
        );
    }

    #[test]
    fn test_delimiters_are_replaced_before_mod_scan() {
        // Once `\(`/`\)` are gone there is no group left to rewrite
        assert_eq!(normalize_assistant_content("\\(7 mod 2\\)"), "$7 mod 2$");
    }
}
