//! Shell-style `$VAR` expansion for SQL templates.

/// Replace `${name}` and `$name` references in `input` using `lookup`.
///
/// Names are runs of ASCII alphanumerics and `_`. The single characters
/// `*#$@!?-` and digits are names on their own, so `$1` and `$$` are looked up
/// as `"1"` and `"$"`. A `$` that is not followed by a name is kept as is, and
/// a malformed brace reference (`${}` or an unterminated `${`) is dropped.
///
/// ```
/// let out = testkit_db::expand("CREATE SCHEMA ${schema};", |name| {
///     (name == "schema").then(|| "tenant_1".to_string())
/// });
/// assert_eq!(out, "CREATE SCHEMA tenant_1;");
/// ```
pub fn expand<F>(input: &str, mut lookup: F) -> String
where
    F: FnMut(&str) -> Option<String>,
{
    let bytes = input.as_bytes();
    let mut out = String::with_capacity(input.len());
    let mut copied_to = 0;
    let mut j = 0;

    while j < bytes.len() {
        if bytes[j] == b'$' && j + 1 < bytes.len() {
            out.push_str(&input[copied_to..j]);

            let (name, width) = shell_name(&input[j + 1..]);
            match name {
                Some(name) => out.push_str(&lookup(name).unwrap_or_default()),
                // Bare `$`, keep it
                None if width == 0 => out.push('$'),
                // Bad syntax, swallow it
                None => {}
            }

            j += width;
            copied_to = j + 1;
        }
        j += 1;
    }

    out.push_str(&input[copied_to..]);
    out
}

/// Parse the reference following a `$`, returning the name (if any) and how
/// many bytes it spans.
fn shell_name(s: &str) -> (Option<&str>, usize) {
    let bytes = s.as_bytes();

    if bytes[0] == b'{' {
        if bytes.len() > 2 && is_special(bytes[1]) && bytes[2] == b'}' {
            return (Some(&s[1..2]), 3);
        }
        return match bytes.iter().skip(1).position(|&b| b == b'}') {
            Some(0) => (None, 2),
            Some(pos) => (Some(&s[1..pos + 1]), pos + 2),
            None => (None, 1),
        };
    }

    if is_special(bytes[0]) {
        return (Some(&s[..1]), 1);
    }

    let len = bytes.iter().take_while(|&&b| is_name_byte(b)).count();
    if len == 0 { (None, 0) } else { (Some(&s[..len]), len) }
}

fn is_special(b: u8) -> bool {
    matches!(b, b'*' | b'#' | b'$' | b'@' | b'!' | b'?' | b'-') || b.is_ascii_digit()
}

fn is_name_byte(b: u8) -> bool {
    b == b'_' || b.is_ascii_alphanumeric()
}

#[cfg(test)]
#[path = "expand_tests.rs"]
mod tests;
