//! Entity name to table identifier conversion.

/// Trailing substrings that take `es` rather than `s` when pluralized.
const SIBILANT_SUFFIXES: [&str; 6] = ["ss", "sh", "ch", "s", "x", "z"];

/// Converts an entity name to a table identifier.
///
/// The name is split at uppercase letters, lower-cased and joined with `_`
/// (`UserPayment` becomes `user_payment`). With `pluralize`, `es` is appended
/// to names ending in `s`, `ss`, `sh`, `ch`, `x` or `z`, and `s` to anything
/// else.
///
/// Already snake_case input is returned unchanged when `pluralize` is false.
#[must_use]
pub fn to_table_identifier(entity_name: &str, pluralize: bool) -> String {
    let snake = to_snake_case(entity_name);
    if pluralize {
        pluralize_identifier(&snake)
    } else {
        snake
    }
}

/// Splits at uppercase boundaries and joins the lower-cased words with `_`.
#[must_use]
pub fn to_snake_case(name: &str) -> String {
    let mut result = String::with_capacity(name.len() + 4);
    for c in name.chars() {
        if c.is_uppercase() {
            if !result.is_empty() && !result.ends_with('_') {
                result.push('_');
            }
            result.extend(c.to_lowercase());
        } else {
            result.push(c);
        }
    }
    result
}

/// Appends the plural suffix chosen by the identifier's trailing characters.
#[must_use]
pub fn pluralize_identifier(name: &str) -> String {
    if SIBILANT_SUFFIXES.iter().any(|suffix| name.ends_with(suffix)) {
        format!("{name}es")
    } else {
        format!("{name}s")
    }
}
