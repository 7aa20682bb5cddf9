use std::borrow::Cow;
use std::fmt;
use std::iter::FusedIterator;
use std::ops::Range;

use crate::cursor::{Cursor, ascii, is_identifier_part, is_identifier_start};
use crate::dialect::{Dialect, Features, Options};
use crate::encoding::fixup_to_vec;
use crate::token::{Comment, Position, Punct, Span, Token, TokenKind};

mod number;
mod string;

/// Classifies a lexer error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LexErrorKind {
    /// Character that cannot start any token.
    UnexpectedSymbol,
    /// Quoted string cut off by a line break or the end of input.
    UnfinishedString,
    /// Long-bracket string without its closing bracket.
    UnfinishedLongString,
    /// Long-bracket comment without its closing bracket.
    UnfinishedLongComment,
    /// `[=` not followed by more `=` and then `[`.
    InvalidDelimiter,
    /// Numeral missing required digits.
    MalformedNumber,
    /// `\ddd` above 255.
    DecimalEscapeTooLarge,
    /// Missing or invalid digit in `\x` or `\u{...}`.
    HexDigitExpected,
    /// Missing brace in a `\u{...}` escape.
    MissingInEscape { expected: char },
    /// `\u{...}` with more than six significant digits or above `0x10FFFF`.
    TooLargeCodepoint,
    /// Unknown escape under a strict dialect.
    InvalidEscape,
}

impl LexErrorKind {
    /// The character whose absence caused the error, if any.
    #[must_use]
    pub const fn expected(self) -> Option<char> {
        match self {
            Self::MissingInEscape { expected } => Some(expected),
            Self::InvalidDelimiter => Some('['),
            _ => None,
        }
    }
}

impl fmt::Display for LexErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedSymbol => write!(f, "unexpected symbol"),
            Self::UnfinishedString => write!(f, "unfinished string"),
            Self::UnfinishedLongString => write!(f, "unfinished long string"),
            Self::UnfinishedLongComment => write!(f, "unfinished long comment"),
            Self::InvalidDelimiter => write!(f, "invalid long string delimiter, expected '['"),
            Self::MalformedNumber => write!(f, "malformed number"),
            Self::DecimalEscapeTooLarge => write!(f, "decimal escape too large"),
            Self::HexDigitExpected => write!(f, "hexadecimal digit expected"),
            Self::MissingInEscape { expected } => {
                write!(f, "missing '{expected}' in escape sequence")
            }
            Self::TooLargeCodepoint => write!(f, "UTF-8 value too large"),
            Self::InvalidEscape => write!(f, "invalid escape sequence"),
        }
    }
}

/// Error produced during lexing.
///
/// `span` starts where the offending construct starts: the string
/// for unfinished strings, the backslash for bad escapes, the opening
/// bracket for unfinished long strings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(
    "{}{kind} near '{near}' at line {}, column {}",
    chunk_prefix(.chunk.as_deref()),
    .span.line,
    .span.column() + 1
)]
pub struct LexError {
    pub kind: LexErrorKind,
    pub span: Span,
    /// Source text of `span`, or `<eof>` when the input ran out.
    pub near: String,
    /// Chunk name from [`Options::chunk_name`].
    pub chunk: Option<String>,
}

fn chunk_prefix(chunk: Option<&str>) -> String {
    chunk.map(|name| format!("{name}: ")).unwrap_or_default()
}

/// Tokens and comments collected from one input.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Lexed {
    pub tokens: Vec<Token>,
    pub comments: Vec<Comment>,
}

/// Tokenize a Lua source string with the default options (Lua 5.1).
///
/// # Errors
///
/// Returns the first `LexError` encountered.
pub fn tokenize(input: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(input, &Options::default()).collect()
}

/// Tokenize a Lua source string, collecting comments if requested.
///
/// # Errors
///
/// Returns the first `LexError` encountered.
pub fn tokenize_with(input: &str, options: &Options) -> Result<Lexed, LexError> {
    let mut lexer = Lexer::new(input, options);
    let tokens = lexer.by_ref().collect::<Result<Vec<_>, _>>()?;
    Ok(Lexed {
        tokens,
        comments: lexer.take_comments(),
    })
}

/// Pull-based Lua lexer.
///
/// Offsets, ranges and columns count UTF-16 code units. Iteration
/// stops for good after the end of input or the first error.
pub struct Lexer<'a> {
    cursor: Cursor<'a>,
    dialect: Dialect,
    extended_identifiers: bool,
    capture_comments: bool,
    chunk: Option<String>,
    comments: Vec<Comment>,
    done: bool,
}

impl<'a> Lexer<'a> {
    /// Lexes `input`, which is first re-encoded as UTF-16.
    #[must_use]
    pub fn new(input: &str, options: &Options) -> Self {
        Self::with_units(Cow::Owned(input.encode_utf16().collect()), options)
    }

    /// Lexes a borrowed buffer of UTF-16 code units. Unpaired
    /// surrogates are accepted.
    #[must_use]
    pub fn from_utf16(units: &'a [u16], options: &Options) -> Self {
        Self::with_units(Cow::Borrowed(units), options)
    }

    fn with_units(units: Cow<'a, [u16]>, options: &Options) -> Self {
        let dialect = Dialect::from_options(options);
        tracing::debug!(
            version = %dialect.version(),
            features = ?dialect.features(),
            units = units.len(),
            "starting lexer session"
        );
        let mut cursor = Cursor::new(units);
        if options.ignore_shebang && cursor.is_at(0, b'#') && cursor.is_at(1, b'!') {
            cursor.skip_to_eol();
        }
        Self {
            cursor,
            dialect,
            extended_identifiers: options.extended_identifiers,
            capture_comments: options.comments,
            chunk: options.chunk_name.clone(),
            comments: Vec::new(),
            done: false,
        }
    }

    #[must_use]
    pub const fn dialect(&self) -> &Dialect {
        &self.dialect
    }

    /// Comments captured so far.
    #[must_use]
    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    pub fn take_comments(&mut self) -> Vec<Comment> {
        std::mem::take(&mut self.comments)
    }

    /// The code units being lexed.
    #[must_use]
    pub fn source(&self) -> &[u16] {
        self.cursor.units()
    }

    /// Source text of `range`, e.g. a token's span.
    ///
    /// # Panics
    ///
    /// Panics if `range` is out of bounds.
    #[must_use]
    pub fn source_text(&self, range: Range<usize>) -> String {
        self.cursor.text(range)
    }

    /// Current cursor position.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.cursor.position()
    }

    /// Scans the next token. `Ok(None)` marks the end of the stream,
    /// both after the last token and after an error was returned.
    ///
    /// # Errors
    ///
    /// Returns a `LexError` for malformed input; the session is over
    /// after that.
    pub fn next_token(&mut self) -> Result<Option<Token>, LexError> {
        if self.done {
            return Ok(None);
        }
        let result = self.scan();
        match &result {
            Ok(Some(_)) => {}
            Ok(None) => self.done = true,
            Err(err) => {
                tracing::debug!(
                    kind = ?err.kind,
                    line = err.span.line,
                    column = err.span.column(),
                    "lexer session failed"
                );
                self.done = true;
            }
        }
        result
    }

    fn scan(&mut self) -> Result<Option<Token>, LexError> {
        self.skip_trivia()?;

        let start = self.cursor.position();
        let Some(unit) = self.cursor.peek() else {
            return Ok(None);
        };

        if is_identifier_start(unit, self.extended_identifiers) {
            return Ok(Some(self.scan_identifier(start)));
        }

        let next = self.cursor.byte_at(1);
        let bitwise = self.dialect.has(Features::BITWISE_OPERATORS);

        let punct = match ascii(unit) {
            Some(b'\'' | b'"') => return self.scan_short_string(start).map(Some),
            Some(b'0'..=b'9') => return self.scan_number(start).map(Some),
            Some(b'.') => match next {
                Some(b'0'..=b'9') => return self.scan_number(start).map(Some),
                Some(b'.') if self.cursor.is_at(2, b'.') => {
                    self.cursor.advance(3);
                    return Ok(Some(self.token(TokenKind::VarargLiteral, start)));
                }
                Some(b'.') => Some(Punct::Concat),
                _ => Some(Punct::Dot),
            },
            Some(b'[') => match next {
                Some(b'[' | b'=') => return self.scan_long_string(start).map(Some),
                _ => Some(Punct::LBracket),
            },
            Some(b'=') => match next {
                Some(b'=') => Some(Punct::Eq),
                Some(b'>') => Some(Punct::FatArrow),
                _ => Some(Punct::Assign),
            },
            Some(b'>') => match next {
                Some(b'>') if bitwise => Some(Punct::ShiftRight),
                Some(b'=') => Some(Punct::GreaterEq),
                _ => Some(Punct::Greater),
            },
            Some(b'<') => match next {
                Some(b'<') if bitwise => Some(Punct::ShiftLeft),
                Some(b'=') => Some(Punct::LessEq),
                _ => Some(Punct::Less),
            },
            Some(b'~') => match next {
                Some(b'=') => Some(Punct::NotEq),
                _ if bitwise => Some(Punct::Tilde),
                _ => None,
            },
            Some(b':') => match next {
                Some(b':') if self.dialect.has(Features::LABELS) => Some(Punct::DoubleColon),
                _ => Some(Punct::Colon),
            },
            Some(b'/') => match next {
                Some(b'/') if self.dialect.has(Features::INTEGER_DIVISION) => {
                    Some(Punct::DoubleSlash)
                }
                _ => Some(Punct::Slash),
            },
            Some(b'&') if bitwise => Some(Punct::Ampersand),
            Some(byte) => Punct::unconditional(byte),
            None => None,
        };

        if let Some(punct) = punct {
            self.cursor.advance(punct.width());
            return Ok(Some(self.token(TokenKind::Punctuator(punct), start)));
        }

        self.cursor.advance(1);
        Err(self.error(LexErrorKind::UnexpectedSymbol, start))
    }

    /// Skips whitespace, line breaks and comments.
    fn skip_trivia(&mut self) -> Result<(), LexError> {
        self.cursor.skip_whitespace();
        while self.cursor.is_at(0, b'-') && self.cursor.is_at(1, b'-') {
            self.scan_comment()?;
            self.cursor.skip_whitespace();
        }
        Ok(())
    }

    fn scan_comment(&mut self) -> Result<(), LexError> {
        let start = self.cursor.position();
        self.cursor.advance(2);

        let long = if self.cursor.is_at(0, b'[') {
            self.read_long_bracket(LongBracket::Comment)?
        } else {
            None
        };
        let body = long.unwrap_or_else(|| {
            let body_start = self.cursor.index;
            self.cursor.skip_to_eol();
            body_start..self.cursor.index
        });

        if self.capture_comments {
            let end = self.cursor.position();
            self.comments.push(Comment {
                value: fixup_to_vec(self.cursor.slice(body)).into(),
                raw: self.cursor.text(start.offset..end.offset),
                start,
                end,
            });
        }
        Ok(())
    }

    fn scan_identifier(&mut self, start: Position) -> Token {
        let extended = self.extended_identifiers;
        self.cursor
            .advance_while(|unit| is_identifier_part(unit, extended));

        let word = fixup_to_vec(self.cursor.slice(start.offset..self.cursor.index));
        let kind = self.dialect.keywords().lookup(&word).map_or_else(
            || match word.as_slice() {
                b"true" => TokenKind::BooleanLiteral(true),
                b"false" => TokenKind::BooleanLiteral(false),
                b"nil" => TokenKind::NilLiteral,
                _ => TokenKind::Identifier(word.into()),
            },
            TokenKind::Keyword,
        );
        self.token(kind, start)
    }

    /// Token from `start` up to the cursor.
    const fn token(&self, kind: TokenKind, start: Position) -> Token {
        Token {
            kind,
            span: self.span_from(start),
            end: None,
        }
    }

    const fn span_from(&self, start: Position) -> Span {
        Span {
            line: start.line,
            line_start: start.line_start,
            range: start.offset..self.cursor.index,
        }
    }

    /// Error covering `start` up to the cursor.
    fn error(&self, kind: LexErrorKind, start: Position) -> LexError {
        let span = self.span_from(start);
        let near = match kind {
            LexErrorKind::UnfinishedLongString | LexErrorKind::UnfinishedLongComment => {
                "<eof>".to_string()
            }
            _ => self.cursor.text(span.range.clone()),
        };
        LexError {
            kind,
            span,
            near,
            chunk: self.chunk.clone(),
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token().transpose()
    }
}

impl FusedIterator for Lexer<'_> {}

/// What a long bracket is being read for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LongBracket {
    String,
    Comment,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::Keyword;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input)
            .expect("should tokenize")
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn local_assignment() {
        assert_eq!(
            kinds("local x = 1"),
            vec![
                TokenKind::Keyword(Keyword::Local),
                TokenKind::Identifier("x".into()),
                TokenKind::Punctuator(Punct::Assign),
                TokenKind::NumericLiteral(1.0),
            ]
        );
    }

    #[test]
    fn dots() {
        assert_eq!(
            kinds("a.b .. c ... .5"),
            vec![
                TokenKind::Identifier("a".into()),
                TokenKind::Punctuator(Punct::Dot),
                TokenKind::Identifier("b".into()),
                TokenKind::Punctuator(Punct::Concat),
                TokenKind::Identifier("c".into()),
                TokenKind::VarargLiteral,
                TokenKind::NumericLiteral(0.5),
            ]
        );
    }

    #[test]
    fn literals() {
        assert_eq!(
            kinds("true false nil"),
            vec![
                TokenKind::BooleanLiteral(true),
                TokenKind::BooleanLiteral(false),
                TokenKind::NilLiteral,
            ]
        );
    }

    #[test]
    fn unexpected_symbol_is_single_unit() {
        let err = tokenize("x = @y").unwrap_err();
        assert_eq!(err.kind, LexErrorKind::UnexpectedSymbol);
        assert_eq!(err.span.range, 4..5);
        assert_eq!(err.near, "@");
    }

    #[test]
    fn stream_ends_after_error() {
        let mut lexer = Lexer::new("a $ b", &Options::default());
        assert!(matches!(lexer.next(), Some(Ok(_))));
        assert!(matches!(lexer.next(), Some(Err(_))));
        assert!(lexer.next().is_none());
        assert!(lexer.next().is_none());
        assert_eq!(lexer.next_token(), Ok(None));
    }

    #[test]
    fn error_display() {
        let err = tokenize("\n  $").unwrap_err();
        assert_eq!(
            err.to_string(),
            "unexpected symbol near '$' at line 2, column 3"
        );
        let options = Options::new().chunk_name("init.lua");
        let err = tokenize_with("'abc", &options).unwrap_err();
        assert_eq!(
            err.to_string(),
            "init.lua: unfinished string near ''abc' at line 1, column 1"
        );
    }

    #[test]
    fn span_tracking() {
        let tokens = tokenize("a\n  bb").expect("should tokenize");
        assert_eq!(tokens[0].span.line, 1);
        assert_eq!(tokens[0].span.column(), 0);
        assert_eq!(tokens[1].span.line, 2);
        assert_eq!(tokens[1].span.line_start, 2);
        assert_eq!(tokens[1].span.column(), 2);
        assert_eq!(tokens[1].span.range, 4..6);
    }

    #[test]
    fn shebang_is_skipped() {
        let tokens = tokenize("#!/usr/bin/lua\nreturn").expect("should tokenize");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].span.line, 2);
    }

    #[test]
    fn empty_input() {
        assert!(kinds("").is_empty());
        assert!(kinds("  \n\t -- only a comment").is_empty());
    }
}
