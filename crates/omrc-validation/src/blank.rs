//! Whitespace as browsers see it in form values

/// Whitespace per `\s` and `String.prototype.trim`, which also count the
/// byte order mark (U+FEFF) that `char::is_whitespace` does not.
pub fn is_form_space(c: char) -> bool {
    c.is_whitespace() || c == '\u{FEFF}'
}

/// True when `value` is empty after trimming form whitespace.
pub fn is_blank(value: &str) -> bool {
    value.chars().all(is_form_space)
}
