#[derive(Debug, Eq, PartialEq)]
pub enum UnescapeError {
    TrailingBackslash { offset: usize },
    UnknownEscape { offset: usize, escape: char },
    MissingHexDigits { offset: usize },
    OutOfRange { offset: usize, value: u32 },
    UnescapedQuote { offset: usize },
    LineBreak { offset: usize },
}

impl std::error::Error for UnescapeError {}

impl std::fmt::Display for UnescapeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            UnescapeError::TrailingBackslash { offset } => {
                write!(f, "literal ends in a lone backslash at byte {offset}")
            }
            UnescapeError::UnknownEscape { offset, escape } => {
                write!(f, "unknown escape sequence `\\{escape}` at byte {offset}")
            }
            UnescapeError::MissingHexDigits { offset } => {
                write!(f, "`\\x` without hex digits at byte {offset}")
            }
            UnescapeError::OutOfRange { offset, value } => {
                write!(
                    f,
                    "escape at byte {offset} denotes {value:#x}, which does not fit in a byte"
                )
            }
            UnescapeError::UnescapedQuote { offset } => {
                write!(f, "unescaped double quote at byte {offset}")
            }
            UnescapeError::LineBreak { offset } => {
                write!(f, "raw line break at byte {offset}")
            }
        }
    }
}
