/// Turn arbitrary label text into a valid bare identifier.
///
/// Letters and digits pass through, `_` and `-` normalize to `_`, everything
/// else is dropped. A leading digit gets an underscore prefix. Empty input,
/// or input that filters down to nothing, becomes "Unnamed".
pub fn sanitize(s: &str) -> String {
    if s.trim().is_empty() {
        return "Unnamed".to_string();
    }

    let mut out = String::with_capacity(s.len());
    if s.chars().next().is_some_and(char::is_numeric) {
        out.push('_');
    }

    for c in s.chars() {
        if c.is_alphanumeric() {
            out.push(c);
        } else if c == '_' || c == '-' {
            out.push('_');
        }
        // other characters are dropped with no substitution
    }

    if out.is_empty() {
        return "Unnamed".to_string();
    }
    out
}
