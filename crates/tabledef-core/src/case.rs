//! Identifier case conversion.
//!
//! Table descriptions use host-language naming (`TeamMembersTable`,
//! `stripeCustomerId`); storage identifiers are snake_case with the fixed
//! `Table` suffix stripped.

/// Converts a camelCase or PascalCase identifier to snake_case.
#[must_use]
pub fn snake_case(ident: &str) -> String {
    let chars: Vec<char> = ident.chars().collect();
    let mut out = String::with_capacity(ident.len() + 4);

    for (i, &ch) in chars.iter().enumerate() {
        if ch.is_ascii_uppercase() {
            let prev = if i > 0 { Some(chars[i - 1]) } else { None };
            let next = chars.get(i + 1).copied();
            // A word starts at lower→upper transitions and at the last
            // capital of an acronym run ("HTTPServer" → "http_server").
            let starts_word = prev.is_some_and(|p| {
                p.is_ascii_lowercase()
                    || p.is_ascii_digit()
                    || (p.is_ascii_uppercase() && next.is_some_and(|n| n.is_ascii_lowercase()))
            });
            if starts_word {
                out.push('_');
            }
            out.push(ch.to_ascii_lowercase());
        } else if ch == '-' || ch == ' ' {
            out.push('_');
        } else {
            out.push(ch);
        }
    }

    out
}

/// Derives a storage table name from a description identifier: the fixed
/// `Table` suffix is stripped, the remainder snake_cased.
#[must_use]
pub fn table_name_from_ident(ident: &str) -> String {
    let without_suffix = ident.strip_suffix("Table").unwrap_or(ident);
    snake_case(without_suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snake_case() {
        assert_eq!(snake_case("Users"), "users");
        assert_eq!(snake_case("TeamMembers"), "team_members");
        assert_eq!(snake_case("stripeCustomerId"), "stripe_customer_id");
        assert_eq!(snake_case("ActivityLog"), "activity_log");
        assert_eq!(snake_case("HTTPServer"), "http_server");
        assert_eq!(snake_case("already_snake"), "already_snake");
    }

    #[test]
    fn test_table_name_from_ident() {
        assert_eq!(table_name_from_ident("UsersTable"), "users");
        assert_eq!(table_name_from_ident("TeamMembersTable"), "team_members");
        assert_eq!(table_name_from_ident("Invitations"), "invitations");
    }
}
