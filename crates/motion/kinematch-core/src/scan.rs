//! Lexical primitives over an in-memory recording buffer.
//!
//! All routines operate on the byte buffer through a single cursor and are
//! pure with respect to everything else. Failures surface as `None`/`false`
//! (or a `ParseError` from the `expect_*` wrappers). The `Option` return is
//! the success flag; there are no sentinel values to confuse with parsed data.

use crate::error::ParseError;
use crate::skeleton::ChannelKind;

/// Window radius for error context around the failing cursor position.
const CONTEXT_RADIUS: usize = 15;

/// Fractional digits consumed by `read_float` before the tail is ignored.
const MAX_FRACTION_DIGITS: usize = 128;

/// Case/whitespace fold for literal matching: ASCII lowercase letters map to
/// uppercase, tab/CR/LF map to space, everything else maps to itself.
const fn build_fold_table() -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut i = 0;
    while i < 256 {
        let b = i as u8;
        table[i] = if b >= b'a' && b <= b'z' {
            b - b'a' + b'A'
        } else if b == b'\t' || b == b'\n' || b == b'\r' {
            b' '
        } else {
            b
        };
        i += 1;
    }
    table
}

const FOLD: [u8; 256] = build_fold_table();

/// Fold a single byte through the scanner's case/whitespace table.
#[inline]
pub fn fold(b: u8) -> u8 {
    FOLD[b as usize]
}

/// Cursor over an immutable text buffer.
#[derive(Debug)]
pub struct Scanner<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            buf: text.as_bytes(),
            pos: 0,
        }
    }

    /// Current absolute byte offset.
    #[inline]
    pub fn offset(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.pos >= self.buf.len()
    }

    /// Return the byte at the cursor without consuming it.
    #[inline]
    pub fn peek(&self) -> Option<char> {
        self.buf.get(self.pos).map(|b| *b as char)
    }

    /// Case-insensitive literal match (tab/CR/LF in the input fold to space).
    /// Consumes the literal on success; the cursor is restored on failure.
    pub fn match_literal(&mut self, text: &str) -> bool {
        let start = self.pos;
        for &expected in text.as_bytes() {
            match self.buf.get(self.pos) {
                Some(&b) if expected == b || expected == fold(b) => self.pos += 1,
                _ => {
                    self.pos = start;
                    return false;
                }
            }
        }
        true
    }

    /// Consume up to (not including) the next line terminator and return the
    /// trimmed text. `None` if the trimmed result is empty.
    pub fn read_line_trimmed(&mut self) -> Option<String> {
        let start = self.pos;
        while self
            .buf
            .get(self.pos)
            .is_some_and(|&b| b != b'\n' && b != b'\r')
        {
            self.pos += 1;
        }
        let text = String::from_utf8_lossy(&self.buf[start..self.pos])
            .trim()
            .to_string();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }

    /// Parse one channel token: an axis letter (`x`/`y`/`z`) followed by
    /// `position` or `rotation`, case-insensitive.
    ///
    /// Quirk kept for fixture compatibility: the axis letter and the `p`/`r`
    /// letter stay consumed when the tail literal fails (the tail match itself
    /// restores its own progress). Callers treat the failure as fatal, so the
    /// resting cursor only shapes the diagnostic.
    pub fn read_channel_token(&mut self) -> Option<ChannelKind> {
        let axis = match self.peek()? {
            'x' | 'X' => 0,
            'y' | 'Y' => 1,
            'z' | 'Z' => 2,
            _ => return None,
        };
        self.pos += 1;
        match self.peek()? {
            'p' | 'P' => {
                self.pos += 1;
                if self.match_literal("osition") {
                    ChannelKind::from_index(axis)
                } else {
                    None
                }
            }
            'r' | 'R' => {
                self.pos += 1;
                if self.match_literal("otation") {
                    ChannelKind::from_index(axis + 3)
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    /// Parse an integer: optional sign, one or more ASCII digits. `None` when
    /// no digit was consumed.
    pub fn read_int(&mut self) -> Option<i64> {
        let negate = match self.buf.get(self.pos) {
            Some(b'-') => {
                self.pos += 1;
                true
            }
            Some(b'+') => {
                self.pos += 1;
                false
            }
            _ => false,
        };

        let mut value: i64 = 0;
        let mut digit_found = false;
        while let Some(&b) = self.buf.get(self.pos) {
            if !b.is_ascii_digit() {
                break;
            }
            value = value * 10 + i64::from(b - b'0');
            digit_found = true;
            self.pos += 1;
        }

        if !digit_found {
            return None;
        }
        Some(if negate { -value } else { value })
    }

    /// Parse a float: optional sign, integer digits, optional `.` or `,`
    /// decimal point, fractional digits. No exponent notation. `None` when no
    /// digit was consumed on either side of the point.
    pub fn read_float(&mut self) -> Option<f64> {
        let negate = match self.buf.get(self.pos) {
            Some(b'-') => {
                self.pos += 1;
                true
            }
            Some(b'+') => {
                self.pos += 1;
                false
            }
            _ => false,
        };

        let mut value: f64 = 0.0;
        let mut digit_found = false;
        while let Some(&b) = self.buf.get(self.pos) {
            if !b.is_ascii_digit() {
                break;
            }
            value = value * 10.0 + f64::from(b - b'0');
            digit_found = true;
            self.pos += 1;
        }

        if matches!(self.buf.get(self.pos), Some(b'.') | Some(b',')) {
            self.pos += 1;
            let mut factor = 0.1;
            let mut consumed = 0;
            while let Some(&b) = self.buf.get(self.pos) {
                if !b.is_ascii_digit() || consumed >= MAX_FRACTION_DIGITS {
                    break;
                }
                value += factor * f64::from(b - b'0');
                factor *= 0.1;
                digit_found = true;
                consumed += 1;
                self.pos += 1;
            }
        }

        if !digit_found {
            return None;
        }
        Some(if negate { -value } else { value })
    }

    /// Consume spaces, tabs, and line terminators.
    pub fn skip_whitespace(&mut self) {
        while self
            .buf
            .get(self.pos)
            .is_some_and(|&b| b == b' ' || b == b'\t' || b == b'\n' || b == b'\r')
        {
            self.pos += 1;
        }
    }

    /// Consume spaces and tabs only.
    pub fn skip_inline_whitespace(&mut self) {
        while self
            .buf
            .get(self.pos)
            .is_some_and(|&b| b == b' ' || b == b'\t')
        {
            self.pos += 1;
        }
    }

    /// Consume optional in-line whitespace followed by at least one line
    /// terminator (any run of `\n`/`\r` counts as one newline).
    pub fn expect_newline(&mut self) -> Result<(), ParseError> {
        self.skip_inline_whitespace();
        let mut found = false;
        while self
            .buf
            .get(self.pos)
            .is_some_and(|&b| b == b'\n' || b == b'\r')
        {
            found = true;
            self.pos += 1;
        }
        if found {
            Ok(())
        } else {
            Err(self.error("newline"))
        }
    }

    /// `match_literal` that raises a parse error on mismatch.
    pub fn expect_literal(&mut self, text: &str) -> Result<(), ParseError> {
        if self.match_literal(text) {
            Ok(())
        } else {
            Err(self.error(text))
        }
    }

    /// Build a parse error at the current cursor with a bounded context
    /// window. `>>> <<<` markers bracket the failing position.
    pub fn error(&self, expected: &str) -> ParseError {
        let lo = self.pos.saturating_sub(CONTEXT_RADIUS);
        let hi = (self.pos + CONTEXT_RADIUS).min(self.buf.len());
        let mut context = String::with_capacity(hi - lo + 8);
        for i in lo..hi {
            if i + 1 == self.pos {
                context.push_str(">>>");
            }
            context.push(self.buf[i] as char);
            if i == self.pos + 1 {
                context.push_str("<<<");
            }
        }
        ParseError::Syntax {
            offset: self.pos,
            expected: expected.to_string(),
            context,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_match_folds_case_and_whitespace() {
        let mut s = Scanner::new("hierarchy");
        assert!(s.match_literal("HIERARCHY"));
        assert!(s.is_at_end());

        // Tabs and newlines in the input fold to the space in the literal.
        let mut s = Scanner::new("FRAME\tTIME:");
        assert!(s.match_literal("FRAME TIME:"));

        let mut s = Scanner::new("End\nSite");
        assert!(s.match_literal("End Site"));
    }

    #[test]
    fn literal_match_restores_cursor_on_failure() {
        let mut s = Scanner::new("MOTOR");
        assert!(!s.match_literal("MOTION"));
        assert_eq!(s.offset(), 0);
        assert!(s.match_literal("MOTOR"));
    }

    #[test]
    fn read_int_sign_and_failure() {
        let mut s = Scanner::new("+42");
        assert_eq!(s.read_int(), Some(42));

        let mut s = Scanner::new("-17 ");
        assert_eq!(s.read_int(), Some(-17));

        // Sign alone is not a number.
        let mut s = Scanner::new("-x");
        assert_eq!(s.read_int(), None);
    }

    /// it should signal read_float failure through the return value, not a
    /// NaN payload
    #[test]
    fn read_float_failure_is_none() {
        let mut s = Scanner::new("abc");
        assert_eq!(s.read_float(), None);
        assert_eq!(s.offset(), 0);
    }

    #[test]
    fn read_float_forms() {
        let mut s = Scanner::new("3.25");
        assert_eq!(s.read_float(), Some(3.25));

        // Comma decimal point.
        let mut s = Scanner::new("-0,5");
        assert_eq!(s.read_float(), Some(-0.5));

        // Leading point with fractional digits only.
        let mut s = Scanner::new(".75");
        assert_eq!(s.read_float(), Some(0.75));

        // No exponent notation: stops at 'e'.
        let mut s = Scanner::new("1e3");
        assert_eq!(s.read_float(), Some(1.0));
        assert_eq!(s.peek(), Some('e'));
    }

    #[test]
    fn channel_tokens() {
        let mut s = Scanner::new("Xposition");
        assert_eq!(s.read_channel_token(), Some(ChannelKind::PosX));

        let mut s = Scanner::new("zrotation");
        assert_eq!(s.read_channel_token(), Some(ChannelKind::RotZ));

        let mut s = Scanner::new("Yrotation Xposition");
        assert_eq!(s.read_channel_token(), Some(ChannelKind::RotY));
    }

    /// it should keep the axis and p/r letters consumed when the tail literal
    /// fails
    #[test]
    fn channel_token_tail_failure_quirk() {
        let mut s = Scanner::new("Xpositon");
        assert_eq!(s.read_channel_token(), None);
        assert_eq!(s.offset(), 2);

        let mut s = Scanner::new("Qposition");
        assert_eq!(s.read_channel_token(), None);
        assert_eq!(s.offset(), 0);
    }

    #[test]
    fn line_capture_trims_and_rejects_empty() {
        let mut s = Scanner::new("  Hips  \nnext");
        assert_eq!(s.read_line_trimmed().as_deref(), Some("Hips"));
        assert_eq!(s.peek(), Some('\n'));

        let mut s = Scanner::new("   \r\n");
        assert_eq!(s.read_line_trimmed(), None);
    }

    #[test]
    fn newline_expectation() {
        let mut s = Scanner::new("  \t\r\nrest");
        assert!(s.expect_newline().is_ok());
        assert_eq!(s.peek(), Some('r'));

        let mut s = Scanner::new("  abc");
        assert!(s.expect_newline().is_err());
    }

    #[test]
    fn error_context_brackets_cursor() {
        let mut s = Scanner::new("HIERARCHY\nROOT Hips");
        s.skip_whitespace();
        s.pos = 10; // at 'R' of ROOT
        let err = s.error("JOINT");
        match err {
            ParseError::Syntax {
                offset,
                expected,
                context,
            } => {
                assert_eq!(offset, 10);
                assert_eq!(expected, "JOINT");
                assert!(context.contains(">>>"));
                assert!(context.contains("<<<"));
            }
        }
    }
}
