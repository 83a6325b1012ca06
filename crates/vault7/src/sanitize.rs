//! File-name safe identifiers

/// Map an identifier to a token safe to use as a file stem.
///
/// ASCII letters, digits, `_`, `-` and `.` pass through; every other byte
/// becomes `_`. Works bytewise, so the byte length of the result always
/// equals the byte length of the input.
pub fn sanitize(name: &str) -> String {
    name.bytes()
        .map(|b| {
            if is_allowed(b) {
                b as char
            } else {
                '_'
            }
        })
        .collect()
}

fn is_allowed(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'_' | b'-' | b'.')
}
