//! Character classification and normalization.
//!
//! The driver decides per character whether it can take part in a
//! dictionary run: CJK ideographs, ASCII letters, digits and a small fixed
//! connector set all qualify (`is_cc`). Everything else splits the input.
//! All predicates are pure range tests and allocate nothing.

use once_cell::sync::Lazy;
use regex::Regex;

/// Groups decimal numbers and alphanumeric runs inside non-CJK spans.
pub static RE_SKIP: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+\.\d+|[a-zA-Z0-9]+)").unwrap());

/// CJK unified ideographs, basic block only.
pub fn is_chinese(ch: char) -> bool {
    ('\u{4E00}'..='\u{9FA5}').contains(&ch)
}

/// ASCII letter.
pub fn is_english(ch: char) -> bool {
    ch.is_ascii_alphabetic()
}

/// ASCII digit.
pub fn is_digit(ch: char) -> bool {
    ch.is_ascii_digit()
}

/// One of the connector characters that may glue alphanumeric tokens.
pub fn is_connector(ch: char) -> bool {
    matches!(ch, '+' | '#' | '&' | '.' | '_' | '-')
}

/// True for characters that accumulate into a segmentation run.
pub fn is_cc(ch: char) -> bool {
    is_chinese(ch) || is_english(ch) || is_digit(ch) || is_connector(ch)
}

/// Normalize one character: ideographic space to ASCII space, full-width
/// printable forms to their half-width counterparts, and upper-case ASCII
/// to lower-case. The folds chain, so a full-width letter lands on its
/// lower-case half-width form and the function is idempotent.
pub fn regularize(ch: char) -> char {
    let ch = match ch {
        '\u{3000}' => ' ',
        '\u{FF01}'..='\u{FF5E}' => {
            // the block is a mirror of ASCII 0x21..0x7E
            char::from_u32(ch as u32 - 0xFEE0).unwrap_or(ch)
        }
        _ => ch,
    };
    if ch.is_ascii_uppercase() {
        ch.to_ascii_lowercase()
    } else {
        ch
    }
}
