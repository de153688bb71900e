//! Printable-character heuristics for telling recovered text from noise.

use serde::Serialize;

/// Ratio at or above which text counts as readable.
pub const DEFAULT_READABLE_THRESHOLD: f64 = 0.5;

/// Share of printable characters in a piece of text.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct PrintableAnalysis {
    pub total_chars:     usize,
    pub printable_chars: usize,
    pub ratio:           f64,
    pub is_readable:     bool,
}

/// Analyzes `text` with the default threshold.
pub fn analyze(text: &str) -> PrintableAnalysis { analyze_with_threshold(text, DEFAULT_READABLE_THRESHOLD) }

/// Analyzes `text`; it is readable when the printable ratio reaches `threshold`.
///
/// Empty text has a ratio of zero and is never readable.
pub fn analyze_with_threshold(text: &str, threshold: f64) -> PrintableAnalysis {
    let (total_chars, printable_chars) = text.chars().fold((0usize, 0usize), |(total, printable), c| {
        (total + 1, printable + usize::from(is_printable(c)))
    });
    #[allow(clippy::cast_precision_loss, reason = "character counts stay far below 2^52")]
    let ratio = if total_chars == 0 {
        0.0
    }
    else {
        printable_chars as f64 / total_chars as f64
    };
    PrintableAnalysis {
        total_chars,
        printable_chars,
        ratio,
        is_readable: total_chars > 0 && ratio >= threshold,
    }
}

/// True for characters a human would expect in pasted text, across the
/// common Latin, Greek, Cyrillic and CJK scripts, symbols and emoji.
/// The replacement character U+FFFD is excluded so lossy views of binary
/// noise score low.
pub const fn is_printable(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n' | '\r'
            | ' ' ..= '~'
            // Latin-1 supplement, Latin extended A and B
            | '\u{00A0}' ..= '\u{024F}'
            // Greek, Cyrillic
            | '\u{0370}' ..= '\u{04FF}'
            // General punctuation
            | '\u{2000}' ..= '\u{206F}'
            // Currency, letterlike, arrows, math operators
            | '\u{20A0}' ..= '\u{20CF}'
            | '\u{2100}' ..= '\u{22FF}'
            // Box drawing, block elements, geometric shapes, misc symbols, dingbats
            | '\u{2500}' ..= '\u{27BF}'
            // CJK symbols and punctuation, Hiragana, Katakana
            | '\u{3000}' ..= '\u{30FF}'
            // CJK unified ideographs
            | '\u{4E00}' ..= '\u{9FFF}'
            // Hangul syllables
            | '\u{AC00}' ..= '\u{D7AF}'
            // Halfwidth and fullwidth forms
            | '\u{FF00}' ..= '\u{FFEF}'
            // Pictographic emoji
            | '\u{1F300}' ..= '\u{1FAFF}'
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_ascii_is_readable() {
        let analysis = analyze("Hello, World!");
        assert_eq!(analysis.total_chars, 13);
        assert_eq!(analysis.printable_chars, 13);
        assert!((analysis.ratio - 1.0).abs() < f64::EPSILON);
        assert!(analysis.is_readable);
    }

    #[test]
    fn test_empty_text_is_not_readable() {
        let analysis = analyze("");
        assert_eq!(analysis.total_chars, 0);
        assert!(analysis.ratio.abs() < f64::EPSILON);
        assert!(!analysis.is_readable);
    }

    #[test]
    fn test_lossy_binary_is_not_readable() {
        let noise = String::from_utf8_lossy(&[0xff, 0xfe, 0x01, 0x02, 0x80, 0x9f, 0x00, 0xc3]).into_owned();
        let analysis = analyze(&noise);
        assert!(!analysis.is_readable, "ratio was {}", analysis.ratio);
    }

    #[test]
    fn test_multilingual_text_is_readable() {
        for text in ["こんにちは世界", "Привет, мир", "안녕하세요", "Καλημέρα", "café → 10 €", "👋🌍"] {
            assert!(analyze(text).is_readable, "{} should be readable", text);
        }
    }

    #[test]
    fn test_replacement_char_is_not_printable() {
        assert!(!is_printable('\u{FFFD}'));
        assert!(!is_printable('\u{0007}'));
        assert!(is_printable('\t'));
    }

    #[test]
    fn test_threshold_boundary() {
        // two printable of four
        let text = "ab\u{0001}\u{0002}";
        assert!(analyze_with_threshold(text, 0.5).is_readable);
        assert!(!analyze_with_threshold(text, 0.51).is_readable);
    }
}
