//! Identifier case conversion
//!
//! Bidirectional conversion between snake_case and CamelCase, used wherever
//! an entity name becomes a file name, variable name, or class name.
//!
//! Both functions are pure and total over non-empty identifiers. They are
//! inverses for identifiers they themselves produce: for any lowercase ASCII
//! words joined by single underscores, `camel_to_snake(snake_to_camel(s)) == s`.
//! They are not inverses for arbitrary external input — consecutive uppercase
//! letters collapse information ("UserID" becomes "user_i_d", not "user_id").

// ============================================================================
// Conversions
// ============================================================================

/// Convert a snake_case identifier to CamelCase.
///
/// Joins underscore-delimited words, capitalizing each word's first character:
/// `"blog_post"` → `"BlogPost"`.
pub fn snake_to_camel(s: &str) -> String {
    s.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(first) => first.to_uppercase().chain(chars).collect(),
            }
        })
        .collect()
}

/// Convert a CamelCase identifier to snake_case.
///
/// Inserts an underscore before every uppercase character that is not the
/// first character of the string, then lowercases everything:
/// `"BlogPost"` → `"blog_post"`.
pub fn camel_to_snake(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 4);

    for (i, c) in s.chars().enumerate() {
        if c.is_uppercase() {
            if i != 0 {
                result.push('_');
            }
            result.extend(c.to_lowercase());
        } else {
            result.push(c);
        }
    }

    result
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snake_to_camel() {
        assert_eq!(snake_to_camel("user"), "User");
        assert_eq!(snake_to_camel("blog_post"), "BlogPost");
        assert_eq!(snake_to_camel("order_line_item"), "OrderLineItem");
    }

    #[test]
    fn test_camel_to_snake() {
        assert_eq!(camel_to_snake("User"), "user");
        assert_eq!(camel_to_snake("BlogPost"), "blog_post");
        assert_eq!(camel_to_snake("already_snake"), "already_snake");
    }

    #[test]
    fn test_consecutive_uppercase_not_collapsed() {
        // Acronyms are split per character; this is the documented behavior,
        // not a bug.
        assert_eq!(camel_to_snake("UserID"), "user_i_d");
    }

    #[test]
    fn test_round_trip_law() {
        // For lowercase ASCII words joined by single underscores, converting
        // to CamelCase and back yields the original identifier.
        for ident in [
            "user",
            "role",
            "blog_post",
            "order_line_item",
            "a_b_c",
            "inventory",
        ] {
            assert_eq!(camel_to_snake(&snake_to_camel(ident)), ident);
        }
    }
}
