//! Quoted strings, escape sequences, and long brackets.

use std::ops::Range;

use super::{LexError, LexErrorKind, Lexer, LongBracket};
use crate::cursor::{ascii, hex_value, is_dec_digit, is_hex_digit, is_line_terminator};
use crate::dialect::Features;
use crate::encoding::{encode_utf8, fixup, fixup_to_vec};
use crate::token::{Position, Token, TokenKind};

impl Lexer<'_> {
    pub(super) fn scan_short_string(&mut self, start: Position) -> Result<Token, LexError> {
        let Some(delimiter) = self.cursor.peek() else {
            return Err(self.error(LexErrorKind::UnfinishedString, start));
        };
        self.cursor.advance(1);

        let mut value = Vec::new();
        let mut literal_start = self.cursor.index;
        loop {
            let Some(unit) = self.cursor.peek() else {
                return Err(self.error(LexErrorKind::UnfinishedString, start));
            };
            if unit == delimiter {
                break;
            }
            if is_line_terminator(unit) {
                return Err(self.error(LexErrorKind::UnfinishedString, start));
            }
            if unit == u16::from(b'\\') {
                fixup(
                    self.cursor.slice(literal_start..self.cursor.index),
                    &mut value,
                );
                self.read_escape(&mut value)?;
                literal_start = self.cursor.index;
            } else {
                self.cursor.advance(1);
            }
        }
        fixup(
            self.cursor.slice(literal_start..self.cursor.index),
            &mut value,
        );
        self.cursor.advance(1);

        Ok(self.string_token(value, start))
    }

    pub(super) fn scan_long_string(&mut self, start: Position) -> Result<Token, LexError> {
        let Some(body) = self.read_long_bracket(LongBracket::String)? else {
            // Cover `[` and the `=` run in the error.
            self.cursor.advance(1);
            self.cursor.advance_while(|unit| unit == u16::from(b'='));
            return Err(self.error(LexErrorKind::InvalidDelimiter, start));
        };
        let value = fixup_to_vec(self.cursor.slice(body));
        Ok(self.string_token(value, start))
    }

    fn string_token(&self, value: Vec<u8>, start: Position) -> Token {
        Token {
            kind: TokenKind::StringLiteral(value.into()),
            span: self.span_from(start),
            end: Some(self.cursor.position()),
        }
    }

    /// Reads `[`, `level` equal signs and `[`, then everything up to the
    /// matching `]=*]`. Returns the body range, or `None` without
    /// moving if the cursor is not on an opening long bracket.
    pub(super) fn read_long_bracket(
        &mut self,
        mode: LongBracket,
    ) -> Result<Option<Range<usize>>, LexError> {
        let open = self.cursor.position();
        let mut level = 0;
        while self.cursor.is_at(1 + level, b'=') {
            level += 1;
        }
        if !self.cursor.is_at(1 + level, b'[') {
            return Ok(None);
        }
        self.cursor.advance(level + 2);
        // A line break right after the opening bracket is not content.
        self.cursor.consume_eol();

        let body_start = self.cursor.index;
        loop {
            if self.cursor.consume_eol() {
                continue;
            }
            if self.cursor.peek().is_none() {
                let kind = match mode {
                    LongBracket::String => LexErrorKind::UnfinishedLongString,
                    LongBracket::Comment => LexErrorKind::UnfinishedLongComment,
                };
                return Err(self.error(kind, open));
            }
            if self.cursor.is_at(0, b']') && self.closes_long_bracket(level) {
                let body = body_start..self.cursor.index;
                self.cursor.advance(level + 2);
                return Ok(Some(body));
            }
            self.cursor.advance(1);
        }
    }

    fn closes_long_bracket(&self, level: usize) -> bool {
        (1..=level).all(|i| self.cursor.is_at(i, b'=')) && self.cursor.is_at(level + 1, b']')
    }

    /// Decodes the escape sequence at the cursor (on the backslash)
    /// into `out`.
    ///
    /// Checks run in a fixed order; the feature-gated ones fall
    /// through to the strict check and then to the literal character
    /// when their feature is off.
    fn read_escape(&mut self, out: &mut Vec<u8>) -> Result<(), LexError> {
        let escape = self.cursor.position();
        self.cursor.advance(1);

        // A trailing backslash; the caller reports the unfinished string.
        let Some(unit) = self.cursor.peek() else {
            return Ok(());
        };

        let control = match ascii(unit) {
            Some(b'a') => Some(0x07),
            Some(b'b') => Some(0x08),
            Some(b'f') => Some(0x0C),
            Some(b'n') => Some(b'\n'),
            Some(b'r') => Some(b'\r'),
            Some(b't') => Some(b'\t'),
            Some(b'v') => Some(0x0B),
            _ => None,
        };
        if let Some(byte) = control {
            self.cursor.advance(1);
            out.push(byte);
            return Ok(());
        }

        if is_line_terminator(unit) {
            self.cursor.consume_eol();
            out.push(b'\n');
            return Ok(());
        }

        if is_dec_digit(unit) {
            return self.read_decimal_escape(escape, out);
        }

        let features = self.dialect.features();
        match ascii(unit) {
            Some(b'z') if features.contains(Features::SKIP_WHITESPACE_ESCAPE) => {
                self.cursor.advance(1);
                self.cursor.skip_whitespace();
                return Ok(());
            }
            Some(b'x') if features.contains(Features::HEX_ESCAPES) => {
                return self.read_hex_escape(escape, out);
            }
            Some(b'u') if features.contains(Features::UNICODE_ESCAPES) => {
                return self.read_codepoint_escape(escape, out);
            }
            Some(b'\\' | b'"' | b'\'') => {}
            _ if features.contains(Features::STRICT_ESCAPES) => {
                self.cursor.advance(self.cursor.char_width());
                return Err(self.error(LexErrorKind::InvalidEscape, escape));
            }
            _ => {}
        }

        let width = self.cursor.char_width();
        fixup(
            self.cursor
                .slice(self.cursor.index..self.cursor.index + width),
            out,
        );
        self.cursor.advance(width);
        Ok(())
    }

    /// `\d`, `\dd` or `\ddd`.
    fn read_decimal_escape(&mut self, escape: Position, out: &mut Vec<u8>) -> Result<(), LexError> {
        let mut value = 0_u32;
        for _ in 0..3 {
            let Some(unit) = self.cursor.peek().filter(|&u| is_dec_digit(u)) else {
                break;
            };
            value = value * 10 + u32::from(unit - u16::from(b'0'));
            self.cursor.advance(1);
        }
        let byte = u8::try_from(value)
            .map_err(|_| self.error(LexErrorKind::DecimalEscapeTooLarge, escape))?;
        out.push(byte);
        Ok(())
    }

    /// `\xXX`, exactly two hex digits.
    fn read_hex_escape(&mut self, escape: Position, out: &mut Vec<u8>) -> Result<(), LexError> {
        let digits = (self.cursor.peek_at(1), self.cursor.peek_at(2));
        let (Some(high), Some(low)) = digits else {
            self.cursor.advance_clamped(3);
            return Err(self.error(LexErrorKind::HexDigitExpected, escape));
        };
        if !is_hex_digit(high) || !is_hex_digit(low) {
            let bad = if is_hex_digit(high) { 3 } else { 2 };
            self.cursor.advance(bad);
            return Err(self.error(LexErrorKind::HexDigitExpected, escape));
        }
        self.cursor.advance(3);
        out.push((hex_value(high) << 4) | hex_value(low));
        Ok(())
    }

    /// `\u{XXX}`: up to six significant hex digits, encoded as UTF-8.
    fn read_codepoint_escape(
        &mut self,
        escape: Position,
        out: &mut Vec<u8>,
    ) -> Result<(), LexError> {
        self.cursor.advance(1);
        if !self.cursor.is_at(0, b'{') {
            self.cursor.advance_clamped(1);
            let kind = LexErrorKind::MissingInEscape { expected: '{' };
            return Err(self.error(kind, escape));
        }
        self.cursor.advance(1);

        if !self.cursor.peek().is_some_and(is_hex_digit) {
            self.cursor.advance_clamped(1);
            return Err(self.error(LexErrorKind::HexDigitExpected, escape));
        }
        self.cursor.advance_while(|unit| unit == u16::from(b'0'));

        let mut codepoint = 0_u32;
        let mut significant = 0;
        while let Some(unit) = self.cursor.peek().filter(|&u| is_hex_digit(u)) {
            self.cursor.advance(1);
            significant += 1;
            if significant > 6 {
                return Err(self.error(LexErrorKind::TooLargeCodepoint, escape));
            }
            codepoint = codepoint * 16 + u32::from(hex_value(unit));
        }

        match self.cursor.byte_at(0) {
            Some(b'}') => self.cursor.advance(1),
            Some(b'"' | b'\'') => {
                let kind = LexErrorKind::MissingInEscape { expected: '}' };
                return Err(self.error(kind, escape));
            }
            _ => {
                self.cursor.advance_clamped(1);
                return Err(self.error(LexErrorKind::HexDigitExpected, escape));
            }
        }

        if codepoint > 0x10_FFFF {
            return Err(self.error(LexErrorKind::TooLargeCodepoint, escape));
        }
        encode_utf8(codepoint, out);
        Ok(())
    }
}
