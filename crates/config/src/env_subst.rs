/// Replace `${ENV_VAR}` placeholders in config string values.
///
/// Unresolvable variables are left as-is.
#[must_use]
pub fn substitute_env(input: &str) -> String {
    substitute_env_with(input, |name| std::env::var(name).ok())
}

/// Placeholder expansion against a caller-supplied lookup, so tests never
/// touch the process environment.
fn substitute_env_with(input: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(open) = rest.find("${") {
        out.push_str(&rest[..open]);
        let after_open = &rest[open + 2..];

        let Some(close) = after_open.find('}') else {
            // No closing brace anywhere ahead: emit the tail verbatim.
            out.push_str(&rest[open..]);
            return out;
        };

        let name = &after_open[..close];
        match lookup(name).filter(|_| !name.is_empty()) {
            Some(value) => out.push_str(&value),
            // Unknown or empty-name placeholder stays literal.
            None => out.push_str(&rest[open..open + 2 + close + 1]),
        }
        rest = &after_open[close + 1..];
    }

    out.push_str(rest);
    out
}
