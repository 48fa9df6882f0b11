//! Control name validation and generation.
//!
//! Control names are the persisted keys of a block's controls and must match
//! `^[a-z][a-z0-9_]*$`. These functions never fail: input that cannot start a
//! valid name collapses to an empty string and is caught by save validation.

/// Sanitize raw input into a control name.
///
/// The input is lowercased. If its first character is not `a`–`z` the result
/// is empty. Otherwise every character outside `[a-z0-9_]` becomes `_`. In
/// `strict` mode trailing underscores are stripped as well, which is what the
/// name field applies once it loses focus.
pub fn validate_control_name(raw: &str, strict: bool) -> String {
    let lowered = raw.to_lowercase();

    match lowered.chars().next() {
        Some(c) if c.is_ascii_lowercase() => {}
        _ => return String::new(),
    }

    let name: String = lowered
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if strict {
        name.trim_end_matches('_').to_string()
    } else {
        name
    }
}

/// Derive a control name from a label.
///
/// Everything before the first ASCII letter is dropped and the remainder is
/// sanitized in strict mode. Labels without any letter produce an empty name.
pub fn generate_control_name(label: &str) -> String {
    match label.find(|c: char| c.is_ascii_alphabetic()) {
        Some(start) => validate_control_name(&label[start..], true),
        None => String::new(),
    }
}

/// Check whether `name` already matches `^[a-z][a-z0-9_]*$`.
pub fn is_valid_control_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_lowercase() => {
            chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_validate_lowercases_and_replaces() {
        assert_eq!(validate_control_name("Hero Title", false), "hero_title");
        assert_eq!(validate_control_name("a-b.c", false), "a_b_c");
        assert_eq!(validate_control_name("snake_case_9", false), "snake_case_9");
    }

    #[test]
    fn test_validate_rejects_bad_first_character() {
        assert_eq!(validate_control_name("9lives", false), "");
        assert_eq!(validate_control_name("_private", true), "");
        assert_eq!(validate_control_name(" title", false), "");
        assert_eq!(validate_control_name("", true), "");
    }

    #[test]
    fn test_strict_strips_trailing_underscores() {
        assert_eq!(validate_control_name("title  ", false), "title__");
        assert_eq!(validate_control_name("title  ", true), "title");
        assert_eq!(validate_control_name("a!!!", true), "a");
    }

    #[test]
    fn test_generate_skips_leading_noise() {
        assert_eq!(generate_control_name("  1. Hero Image!"), "hero_image");
        assert_eq!(generate_control_name("Button Text"), "button_text");
        assert_eq!(generate_control_name("#42 Columns"), "columns");
    }

    #[test]
    fn test_generate_without_letters_is_empty() {
        assert_eq!(generate_control_name("123 - 456"), "");
        assert_eq!(generate_control_name(""), "");
    }

    #[test]
    fn test_is_valid_control_name() {
        assert!(is_valid_control_name("title"));
        assert!(is_valid_control_name("a1_b2"));
        assert!(!is_valid_control_name(""));
        assert!(!is_valid_control_name("1a"));
        assert!(!is_valid_control_name("Title"));
        assert!(!is_valid_control_name("has space"));
    }

    fn arb_valid_name() -> impl Strategy<Value = String> {
        "[a-z][a-z0-9_]{0,16}"
    }

    proptest! {
        #[test]
        fn validate_is_idempotent_on_valid_names(name in arb_valid_name()) {
            prop_assert_eq!(validate_control_name(&name, false), name.clone());
            let stripped = name.trim_end_matches('_').to_string();
            prop_assert_eq!(validate_control_name(&stripped, true), stripped);
        }

        #[test]
        fn validate_output_is_stable(raw in ".{0,24}", strict in any::<bool>()) {
            let once = validate_control_name(&raw, strict);
            prop_assert_eq!(validate_control_name(&once, strict), once.clone());
            prop_assert!(once.is_empty() || is_valid_control_name(&once));
        }

        #[test]
        fn generated_names_are_canonical(
            prefix in "[^a-zA-Z]{0,6}",
            letter in "[a-zA-Z]",
            rest in ".{0,20}",
        ) {
            let label = format!("{prefix}{letter}{rest}");
            let name = generate_control_name(&label);
            prop_assert!(is_valid_control_name(&name), "{:?} -> {:?}", label, name);
            prop_assert!(!name.ends_with('_'));
        }
    }
}
