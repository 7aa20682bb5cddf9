//! Scan position over UTF-16 code units, plus the character classes
//! the scanners share.

use std::borrow::Cow;
use std::ops::Range;

use crate::token::Position;

pub const fn is_whitespace(unit: u16) -> bool {
    matches!(unit, 0x09 | 0x0B | 0x0C | 0x20)
}

pub const fn is_line_terminator(unit: u16) -> bool {
    matches!(unit, 0x0A | 0x0D)
}

pub const fn is_dec_digit(unit: u16) -> bool {
    matches!(unit, 0x30..=0x39)
}

pub const fn is_hex_digit(unit: u16) -> bool {
    matches!(unit, 0x30..=0x39 | 0x41..=0x46 | 0x61..=0x66)
}

/// Value of a hex digit; callers check [`is_hex_digit`] first.
#[allow(clippy::cast_possible_truncation)]
pub const fn hex_value(unit: u16) -> u8 {
    let unit = unit as u8;
    match unit {
        0x30..=0x39 => unit - 0x30,
        0x41..=0x46 => unit - 0x41 + 10,
        _ => unit - 0x61 + 10,
    }
}

pub const fn is_identifier_start(unit: u16, extended: bool) -> bool {
    matches!(unit, 0x41..=0x5A | 0x61..=0x7A | 0x5F) || (extended && unit >= 0x80)
}

pub const fn is_identifier_part(unit: u16, extended: bool) -> bool {
    is_identifier_start(unit, extended) || is_dec_digit(unit)
}

/// The ASCII byte for `unit`, if it is one.
#[allow(clippy::cast_possible_truncation)]
pub const fn ascii(unit: u16) -> Option<u8> {
    if unit < 0x80 { Some(unit as u8) } else { None }
}

/// Owns the input and tracks where scanning is.
pub struct Cursor<'a> {
    units: Cow<'a, [u16]>,
    pub index: usize,
    pub line: usize,
    pub line_start: usize,
}

impl<'a> Cursor<'a> {
    pub const fn new(units: Cow<'a, [u16]>) -> Self {
        Self {
            units,
            index: 0,
            line: 1,
            line_start: 0,
        }
    }

    pub fn units(&self) -> &[u16] {
        &self.units
    }

    pub const fn position(&self) -> Position {
        Position {
            line: self.line,
            line_start: self.line_start,
            offset: self.index,
        }
    }

    pub fn peek(&self) -> Option<u16> {
        self.units.get(self.index).copied()
    }

    pub fn peek_at(&self, offset: usize) -> Option<u16> {
        self.units.get(self.index + offset).copied()
    }

    /// ASCII byte `offset` units ahead; `None` at EOF or for non-ASCII.
    pub fn byte_at(&self, offset: usize) -> Option<u8> {
        self.peek_at(offset).and_then(ascii)
    }

    pub fn is_at(&self, offset: usize, byte: u8) -> bool {
        self.byte_at(offset) == Some(byte)
    }

    pub const fn advance(&mut self, n: usize) {
        self.index += n;
    }

    /// Advances by up to `n` units without passing the end of input.
    pub fn advance_clamped(&mut self, n: usize) {
        self.index = (self.index + n).min(self.units.len());
    }

    pub fn advance_while(&mut self, pred: impl Fn(u16) -> bool) {
        while self.peek().is_some_and(&pred) {
            self.index += 1;
        }
    }

    /// Consumes one end-of-line sequence if the cursor is on one.
    ///
    /// `\n\r` and `\r\n` count as a single line break.
    pub fn consume_eol(&mut self) -> bool {
        let Some(unit) = self.peek() else {
            return false;
        };
        if !is_line_terminator(unit) {
            return false;
        }
        if self
            .peek_at(1)
            .is_some_and(|next| is_line_terminator(next) && next != unit)
        {
            self.index += 1;
        }
        self.index += 1;
        self.line += 1;
        self.line_start = self.index;
        true
    }

    /// Skips whitespace and line breaks.
    pub fn skip_whitespace(&mut self) {
        while let Some(unit) = self.peek() {
            if is_whitespace(unit) {
                self.index += 1;
            } else if !self.consume_eol() {
                break;
            }
        }
    }

    /// Moves to the next line terminator (or EOF) without consuming it.
    pub fn skip_to_eol(&mut self) {
        self.advance_while(|unit| !is_line_terminator(unit));
    }

    /// Width of the code point starting at the cursor: 2 for a
    /// surrogate pair, otherwise 1 (0 at EOF).
    pub fn char_width(&self) -> usize {
        match (self.peek(), self.peek_at(1)) {
            (Some(0xD800..=0xDBFF), Some(0xDC00..=0xDFFF)) => 2,
            (Some(_), _) => 1,
            (None, _) => 0,
        }
    }

    pub fn slice(&self, range: Range<usize>) -> &[u16] {
        &self.units[range]
    }

    /// Source text of `range`, with invalid UTF-16 replaced.
    pub fn text(&self, range: Range<usize>) -> String {
        String::from_utf16_lossy(&self.units[range])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cursor(s: &str) -> Cursor<'static> {
        Cursor::new(Cow::Owned(s.encode_utf16().collect()))
    }

    #[test]
    fn classifiers() {
        assert!(is_whitespace(u16::from(b'\t')));
        assert!(is_whitespace(0x0B));
        assert!(!is_whitespace(u16::from(b'\n')));
        assert!(is_hex_digit(u16::from(b'f')));
        assert!(!is_hex_digit(u16::from(b'g')));
        assert_eq!(hex_value(u16::from(b'F')), 15);
        assert_eq!(hex_value(u16::from(b'a')), 10);
        assert!(is_identifier_start(u16::from(b'_'), false));
        assert!(!is_identifier_start(0xE9, false));
        assert!(is_identifier_start(0xE9, true));
        assert!(!is_identifier_start(u16::from(b'1'), true));
        assert!(is_identifier_part(u16::from(b'1'), false));
    }

    #[test]
    fn crlf_and_lfcr_count_once() {
        // `\r\n`, `\n\r`, `\n`.
        let mut c = cursor("\r\n\n\r\nx");
        c.skip_whitespace();
        assert_eq!(c.line, 4);
        assert_eq!(c.index, 5);
        assert_eq!(c.line_start, 5);
        assert_eq!(c.position().column(), 0);
    }

    #[test]
    fn double_newline_counts_twice() {
        let mut c = cursor("\n\nx");
        c.skip_whitespace();
        assert_eq!(c.line, 3);
    }

    #[test]
    fn skip_to_eol_stops_before_terminator() {
        let mut c = cursor("abc\r\ndef");
        c.skip_to_eol();
        assert_eq!(c.index, 3);
        assert_eq!(c.peek(), Some(u16::from(b'\r')));
    }

    #[test]
    fn char_width_sees_surrogate_pairs() {
        let c = cursor("😀");
        assert_eq!(c.char_width(), 2);
        let lone = Cursor::new(Cow::Borrowed(&[0xD800, 0x41]));
        assert_eq!(lone.char_width(), 1);
    }

    #[test]
    fn advance_clamped_stops_at_end() {
        let mut c = cursor("ab");
        c.advance(1);
        c.advance_clamped(5);
        assert_eq!(c.index, 2);
        assert_eq!(c.peek(), None);
    }
}
