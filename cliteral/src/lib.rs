// Escaping follows the C11 string-literal grammar (6.4.4.4 / 6.4.5), limited to plain `"..."` bodies.
use errors::UnescapeError;
pub mod errors;

/// Escapes `raw` so it can be placed between the double quotes of a C string literal.
///
/// Only backslash, carriage return, line feed and double quote are rewritten. Every other
/// character, including non-ASCII ones, is copied through unchanged.
///
/// # Example
/// ```
/// assert_eq!(cliteral::escape("a\"b\\c\n"), "a\\\"b\\\\c\\n");
/// ```
pub fn escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());

    for ch in raw.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            '\r' => escaped.push_str("\\r"),
            '\n' => escaped.push_str("\\n"),
            '"' => escaped.push_str("\\\""),
            other => escaped.push(other),
        }
    }

    escaped
}

/// Parses the body of a C string literal (the text between the quotes) into the bytes it denotes.
///
/// Source characters are taken as UTF-8. Simple escapes, octal escapes of up to three digits
/// and hexadecimal escapes are understood. A hexadecimal escape consumes every hex digit that
/// follows it, the same way a C compiler does.
///
/// # Example
/// ```
/// let bytes = cliteral::unescape(r#"x\x41\101\"\n"#).unwrap();
///
/// assert_eq!(bytes, b"xAA\"\n");
/// ```
pub fn unescape(literal: &str) -> Result<Vec<u8>, UnescapeError> {
    let mut bytes = Vec::with_capacity(literal.len());
    let mut chars = literal.char_indices().peekable();

    while let Some((offset, ch)) = chars.next() {
        match ch {
            '\\' => {
                let Some((_, code)) = chars.next() else {
                    return Err(UnescapeError::TrailingBackslash { offset });
                };

                let byte = match code {
                    '\\' => b'\\',
                    '"' => b'"',
                    '\'' => b'\'',
                    '?' => b'?',
                    'a' => 0x07,
                    'b' => 0x08,
                    'f' => 0x0c,
                    'n' => b'\n',
                    'r' => b'\r',
                    't' => b'\t',
                    'v' => 0x0b,
                    '0'..='7' => {
                        let mut value = code.to_digit(8).unwrap_or_default();

                        // at most three octal digits belong to one escape
                        for _ in 0..2 {
                            match chars.peek().and_then(|(_, next)| next.to_digit(8)) {
                                Some(digit) => {
                                    value = value * 8 + digit;
                                    chars.next();
                                }
                                None => break,
                            }
                        }

                        to_byte(offset, value)?
                    }
                    'x' => {
                        let mut value: u32 = 0;
                        let mut digits = 0;

                        while let Some(digit) = chars.peek().and_then(|(_, next)| next.to_digit(16))
                        {
                            value = value.saturating_mul(16).saturating_add(digit);
                            digits += 1;
                            chars.next();
                        }

                        if digits == 0 {
                            return Err(UnescapeError::MissingHexDigits { offset });
                        }

                        to_byte(offset, value)?
                    }
                    escape => return Err(UnescapeError::UnknownEscape { offset, escape }),
                };

                bytes.push(byte);
            }
            '"' => return Err(UnescapeError::UnescapedQuote { offset }),
            '\n' | '\r' => return Err(UnescapeError::LineBreak { offset }),
            other => {
                let mut buffer = [0; 4];
                bytes.extend_from_slice(other.encode_utf8(&mut buffer).as_bytes());
            }
        }
    }

    Ok(bytes)
}

fn to_byte(offset: usize, value: u32) -> Result<u8, UnescapeError> {
    u8::try_from(value).map_err(|_| UnescapeError::OutOfRange { offset, value })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_leaves_plain_paths_alone() {
        assert_eq!(escape("/sub/b.bin"), "/sub/b.bin");
        assert_eq!(escape(""), "");
        assert_eq!(escape("/ünï/cödé"), "/ünï/cödé");
    }

    #[test]
    fn test_escape_special_characters() {
        assert_eq!(escape("\\"), "\\\\");
        assert_eq!(escape("\r\n"), "\\r\\n");
        assert_eq!(escape("say \"hi\""), "say \\\"hi\\\"");
        // tabs are printable enough for a C literal and stay raw
        assert_eq!(escape("a\tb"), "a\tb");
    }

    #[test]
    fn test_unescape_simple_and_numeric_escapes() {
        assert_eq!(unescape(r"\a\b\f\v\t\?\'").unwrap(), b"\x07\x08\x0c\x0b\t?'");
        assert_eq!(unescape(r"\0").unwrap(), b"\0");
        assert_eq!(unescape(r"\1234").unwrap(), b"S4");
        assert_eq!(unescape(r"\x7e\x00").unwrap(), b"~\0");
        assert_eq!(unescape(r"\x004").unwrap(), b"\x04");
    }

    #[test]
    fn test_unescape_utf8_passthrough() {
        assert_eq!(unescape("/döc").unwrap(), "/döc".as_bytes());
    }

    #[test]
    fn test_unescape_rejects_malformed_literals() {
        assert_eq!(
            unescape("abc\\"),
            Err(UnescapeError::TrailingBackslash { offset: 3 })
        );
        assert_eq!(
            unescape(r"a\q"),
            Err(UnescapeError::UnknownEscape {
                offset: 1,
                escape: 'q'
            })
        );
        assert_eq!(
            unescape(r"\xg"),
            Err(UnescapeError::MissingHexDigits { offset: 0 })
        );
        assert_eq!(
            unescape(r"\x100"),
            Err(UnescapeError::OutOfRange {
                offset: 0,
                value: 0x100
            })
        );
        assert_eq!(
            unescape(r"\777"),
            Err(UnescapeError::OutOfRange {
                offset: 0,
                value: 0o777
            })
        );
        assert_eq!(
            unescape("a\"b"),
            Err(UnescapeError::UnescapedQuote { offset: 1 })
        );
        assert_eq!(
            unescape("a\nb"),
            Err(UnescapeError::LineBreak { offset: 1 })
        );
    }

    #[test]
    fn test_escape_round_trip() {
        let samples = [
            "",
            "/plain/path.txt",
            "/back\\slash",
            "/\"quoted\"",
            "/line\nbreak\r\n",
            "/trailing\\",
            "/\\\"\\n",
            "/ünïcödé/файл",
        ];

        for sample in samples {
            let escaped = escape(sample);

            assert!(!escaped.contains('\n'), "raw newline left in {escaped:?}");
            assert_eq!(unescape(&escaped).unwrap(), sample.as_bytes(), "{sample:?}");
        }
    }
}
