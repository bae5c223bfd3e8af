//! String Escape Decoding
//!
//! Literal text arrives with C-style escape sequences spelled out
//! (`\n`, `\t`, ...). Decoding happens once, when a `Value` node is
//! lowered.

/// Decodes the escape sequences in `input`.
///
/// Unknown escapes are not fatal: the backslash is dropped, the following
/// character is kept literally, and a diagnostic is logged. A lone
/// trailing backslash is dropped the same way.
pub fn unescape(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut chars = input.chars();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            result.push(ch);
            continue;
        }

        match chars.next() {
            Some('\\') => result.push('\\'),
            Some('\'') => result.push('\''),
            Some('"') => result.push('"'),
            Some('0') => result.push('\0'),
            Some('a') => result.push('\x07'),
            Some('b') => result.push('\x08'),
            Some('f') => result.push('\x0c'),
            Some('n') => result.push('\n'),
            Some('r') => result.push('\r'),
            Some('t') => result.push('\t'),
            Some('v') => result.push('\x0b'),
            Some(other) => {
                log::warn!("unknown escape sequence: \\{}", other);
                result.push(other);
            }
            None => log::warn!("trailing backslash in literal"),
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::unescape;

    #[test]
    fn plain_text_is_unchanged() {
        assert_eq!(unescape("hello world"), "hello world");
        assert_eq!(unescape(""), "");
    }

    #[test]
    fn known_sequences_decode() {
        assert_eq!(unescape(r"a\nb"), "a\nb");
        assert_eq!(unescape(r"\t\r\n"), "\t\r\n");
        assert_eq!(unescape(r#"\"quoted\""#), "\"quoted\"");
        assert_eq!(unescape(r"\\"), "\\");
        assert_eq!(unescape(r"\0"), "\0");
        assert_eq!(unescape(r"\a\b\f\v"), "\x07\x08\x0c\x0b");
    }

    #[test]
    fn unknown_escape_drops_backslash() {
        assert_eq!(unescape(r"\q"), "q");
        assert_eq!(unescape(r"a\qb"), "aqb");
    }

    #[test]
    fn trailing_backslash_is_dropped() {
        assert_eq!(unescape("ab\\"), "ab");
    }

    #[test]
    fn decoding_is_idempotent_on_decoded_text() {
        let once = unescape(r"line\n");
        assert_eq!(unescape(&once), once);
    }
}
