use std::fmt::Write;

/// Returns `true` if `name` can be used as a C identifier (function or constant name).
pub fn is_c_identifier(name: &str) -> bool {
    lazy_static::lazy_static! {
        static ref C_IDENTIFIER_REGEX: regex::Regex =
            regex::Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("a valid regex pattern");
    }

    C_IDENTIFIER_REGEX.is_match(name)
}

/// Reserved words of C11 and C23, none of which can name a function.
const C_KEYWORDS: &[&str] = &[
    "alignas", "alignof", "auto", "bool", "break", "case", "char", "const", "constexpr",
    "continue", "default", "do", "double", "else", "enum", "extern", "false", "float", "for",
    "goto", "if", "inline", "int", "long", "nullptr", "register", "restrict", "return", "short",
    "signed", "sizeof", "static", "static_assert", "struct", "switch", "thread_local", "true",
    "typedef", "typeof", "typeof_unqual", "union", "unsigned", "void", "volatile", "while",
    "_Alignas", "_Alignof", "_Atomic", "_BitInt", "_Bool", "_Complex", "_Decimal128",
    "_Decimal32", "_Decimal64", "_Generic", "_Imaginary", "_Noreturn", "_Static_assert",
    "_Thread_local",
];

pub fn is_c_keyword(name: &str) -> bool {
    C_KEYWORDS.contains(&name)
}

/// Returns `true` if `name` is one of the identifiers generated for blobs with `prefix`,
/// i.e. `<prefix>_<n>` or `<prefix>_<n>_len`.
pub fn is_blob_identifier(name: &str, prefix: &str) -> bool {
    let pattern = format!(r"^{}_[0-9]+(_len)?$", regex::escape(prefix));

    regex::Regex::new(&pattern)
        .map(|regex| regex.is_match(name))
        .unwrap_or(false)
}

/// Formats `data` as the body of a C byte-array initializer, e.g. `0x68,0x69,`.
pub fn format_bytes(data: &[u8]) -> String {
    let mut formatted = String::with_capacity(data.len() * 5);

    for byte in data {
        // writing into a String cannot fail
        let _ = write!(formatted, "0x{:02x},", byte);
    }

    formatted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_c_identifier() {
        assert!(is_c_identifier("ramfs_init"));
        assert!(is_c_identifier("_start"));
        assert!(is_c_identifier("filerom2"));

        assert!(!is_c_identifier(""));
        assert!(!is_c_identifier("2fast"));
        assert!(!is_c_identifier("init-ramfs"));
        assert!(!is_c_identifier("init ramfs"));
        assert!(!is_c_identifier("init();"));
    }

    #[test]
    fn test_is_c_keyword() {
        assert!(is_c_keyword("int"));
        assert!(is_c_keyword("void"));
        assert!(is_c_keyword("_Bool"));
        assert!(!is_c_keyword("ramfs_init"));
        assert!(!is_c_keyword("Int"));
    }

    #[test]
    fn test_is_blob_identifier() {
        assert!(is_blob_identifier("filerom_0", "filerom"));
        assert!(is_blob_identifier("filerom_12_len", "filerom"));
        assert!(!is_blob_identifier("filerom", "filerom"));
        assert!(!is_blob_identifier("filerom_x", "filerom"));
        assert!(!is_blob_identifier("filerom_0_size", "filerom"));
        assert!(!is_blob_identifier("filerom_0", "initrd"));
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(b"hi"), "0x68,0x69,");
        assert_eq!(format_bytes(&[0x00, 0xff, 0x0a]), "0x00,0xff,0x0a,");
        assert_eq!(format_bytes(&[]), "");
    }
}
