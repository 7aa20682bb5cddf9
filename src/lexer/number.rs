//! Decimal and hexadecimal numerals.

use super::{LexError, LexErrorKind, Lexer};
use crate::cursor::{hex_value, is_dec_digit, is_hex_digit};
use crate::token::{Position, Token, TokenKind};

impl Lexer<'_> {
    pub(super) fn scan_number(&mut self, start: Position) -> Result<Token, LexError> {
        let hex = self.cursor.is_at(0, b'0') && matches!(self.cursor.byte_at(1), Some(b'x' | b'X'));
        let value = if hex {
            self.read_hex_number(start)?
        } else {
            self.read_decimal_number(start)?
        };
        Ok(self.token(TokenKind::NumericLiteral(value), start))
    }

    fn read_decimal_number(&mut self, start: Position) -> Result<f64, LexError> {
        self.cursor.advance_while(is_dec_digit);
        if self.cursor.is_at(0, b'.') {
            self.cursor.advance(1);
            self.cursor.advance_while(is_dec_digit);
        }
        if matches!(self.cursor.byte_at(0), Some(b'e' | b'E')) {
            self.cursor.advance(1);
            if matches!(self.cursor.byte_at(0), Some(b'+' | b'-')) {
                self.cursor.advance(1);
            }
            if !self.cursor.peek().is_some_and(is_dec_digit) {
                return Err(self.error(LexErrorKind::MalformedNumber, start));
            }
            self.cursor.advance_while(is_dec_digit);
        }

        // Everything consumed above is ASCII.
        self.cursor
            .text(start.offset..self.cursor.index)
            .parse::<f64>()
            .map_err(|_| self.error(LexErrorKind::MalformedNumber, start))
    }

    /// `(digits + fraction) * 2^exponent`, all accumulated in `f64`
    /// so that long numerals and huge exponents saturate instead of
    /// overflowing.
    fn read_hex_number(&mut self, start: Position) -> Result<f64, LexError> {
        self.cursor.advance(2);

        let (digits, digit_count) = self.read_hex_digits();
        if digit_count == 0 && !self.cursor.is_at(0, b'.') {
            return Err(self.error(LexErrorKind::MalformedNumber, start));
        }

        let mut fraction = 0.0;
        if self.cursor.is_at(0, b'.') {
            self.cursor.advance(1);
            let (value, count) = self.read_hex_digits();
            if digit_count == 0 && count == 0 {
                return Err(self.error(LexErrorKind::MalformedNumber, start));
            }
            if count > 0 {
                let scale = 16f64.powi(i32::try_from(count).unwrap_or(i32::MAX));
                fraction = value / scale;
            }
        }

        let binary_exponent = if matches!(self.cursor.byte_at(0), Some(b'p' | b'P')) {
            self.cursor.advance(1);
            let mut sign = 1.0;
            if let Some(byte @ (b'+' | b'-')) = self.cursor.byte_at(0) {
                if byte == b'-' {
                    sign = -1.0;
                }
                self.cursor.advance(1);
            }
            if !self.cursor.peek().is_some_and(is_dec_digit) {
                return Err(self.error(LexErrorKind::MalformedNumber, start));
            }
            let mut exponent = 0.0_f64;
            while let Some(unit) = self.cursor.peek().filter(|&u| is_dec_digit(u)) {
                exponent = exponent.mul_add(10.0, f64::from(unit - u16::from(b'0')));
                self.cursor.advance(1);
            }
            (sign * exponent).exp2()
        } else {
            1.0
        };

        Ok((digits + fraction) * binary_exponent)
    }

    /// Consumes a run of hex digits, returning its value and length.
    fn read_hex_digits(&mut self) -> (f64, usize) {
        let mut value = 0.0_f64;
        let mut count = 0;
        while let Some(unit) = self.cursor.peek().filter(|&u| is_hex_digit(u)) {
            value = value.mul_add(16.0, f64::from(hex_value(unit)));
            count += 1;
            self.cursor.advance(1);
        }
        (value, count)
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use crate::lexer::{LexErrorKind, tokenize};
    use crate::token::TokenKind;

    fn number(input: &str) -> f64 {
        let tokens = tokenize(input).expect("should tokenize");
        assert_eq!(tokens.len(), 1, "{input}");
        match tokens[0].kind {
            TokenKind::NumericLiteral(n) => n,
            ref other => panic!("expected number, got {other:?}"),
        }
    }

    #[test]
    fn decimal_forms() {
        assert_eq!(number("42"), 42.0);
        assert_eq!(number("3.14e2"), 314.0);
        assert_eq!(number(".5"), 0.5);
        assert_eq!(number("5."), 5.0);
        assert_eq!(number("1E-2"), 0.01);
        assert_eq!(number("2e+3"), 2000.0);
    }

    #[test]
    fn hex_forms() {
        assert_eq!(number("0xff"), 255.0);
        assert_eq!(number("0X1p4"), 16.0);
        assert_eq!(number("0x.8p0"), 0.5);
        assert_eq!(number("0x1.8p1"), 3.0);
        assert_eq!(number("0xA.P-1"), 5.0);
        assert_eq!(number("0x1p-1"), 0.5);
    }

    #[test]
    fn hex_exponent_saturates() {
        assert_eq!(number("0x1p99999"), f64::INFINITY);
        assert_eq!(number("0x1p-99999"), 0.0);
    }

    #[test]
    fn malformed() {
        for input in ["1e", "1e+", "0x", "0x.", "0x.p1", "0x1p", "0x1p-"] {
            let err = tokenize(input).unwrap_err();
            assert_eq!(err.kind, LexErrorKind::MalformedNumber, "{input}");
            assert_eq!(err.span.range.start, 0, "{input}");
        }
    }
}
