use std::fmt;
use std::ops::Range;

/// Line-aware location of a single code unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    /// 1-based line number.
    pub line: usize,
    /// Offset of the first code unit of `line`.
    pub line_start: usize,
    /// Code-unit offset into the input.
    pub offset: usize,
}

impl Position {
    /// 0-based column, in code units.
    #[must_use]
    pub const fn column(&self) -> usize {
        self.offset - self.line_start
    }
}

/// Source location of a token or error.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Span {
    /// Line on which the lexeme starts.
    pub line: usize,
    /// Offset of the first code unit of `line`.
    pub line_start: usize,
    /// Half-open code-unit range of the lexeme.
    pub range: Range<usize>,
}

impl Span {
    /// 0-based column of the first code unit.
    #[must_use]
    pub const fn column(&self) -> usize {
        self.range.start - self.line_start
    }
}

/// A Lua string: an opaque sequence of bytes.
///
/// Decoded identifiers, string literals and comments are stored as
/// bytes because Lua strings are not required to be valid UTF-8
/// (`"\255"` is a perfectly good one-byte string).
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct LuaString(Vec<u8>);

impl LuaString {
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    /// The contents as `&str` when they happen to be valid UTF-8.
    #[must_use]
    pub fn to_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.0).ok()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u8>> for LuaString {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&str> for LuaString {
    fn from(text: &str) -> Self {
        Self(text.as_bytes().to_vec())
    }
}

impl AsRef<[u8]> for LuaString {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl PartialEq<str> for LuaString {
    fn eq(&self, other: &str) -> bool {
        self.0 == other.as_bytes()
    }
}

impl PartialEq<&str> for LuaString {
    fn eq(&self, other: &&str) -> bool {
        self.0 == other.as_bytes()
    }
}

impl PartialEq<[u8]> for LuaString {
    fn eq(&self, other: &[u8]) -> bool {
        self.0 == other
    }
}

impl fmt::Debug for LuaString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", self.0.escape_ascii())
    }
}

impl fmt::Display for LuaString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.0))
    }
}

/// Reserved words. Which of these are live depends on the dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Keyword {
    And,
    Break,
    Do,
    Else,
    Elseif,
    End,
    For,
    Function,
    If,
    In,
    Local,
    Not,
    Or,
    Repeat,
    Return,
    Then,
    Until,
    While,
    /// Only with labels enabled and contextual `goto` disabled.
    Goto,
    /// Opt-in `const` declarations.
    Const,
    /// Opt-in type declarations.
    Declare,
}

impl Keyword {
    pub const ALL: [Self; 21] = [
        Self::And,
        Self::Break,
        Self::Do,
        Self::Else,
        Self::Elseif,
        Self::End,
        Self::For,
        Self::Function,
        Self::If,
        Self::In,
        Self::Local,
        Self::Not,
        Self::Or,
        Self::Repeat,
        Self::Return,
        Self::Then,
        Self::Until,
        Self::While,
        Self::Goto,
        Self::Const,
        Self::Declare,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::And => "and",
            Self::Break => "break",
            Self::Do => "do",
            Self::Else => "else",
            Self::Elseif => "elseif",
            Self::End => "end",
            Self::For => "for",
            Self::Function => "function",
            Self::If => "if",
            Self::In => "in",
            Self::Local => "local",
            Self::Not => "not",
            Self::Or => "or",
            Self::Repeat => "repeat",
            Self::Return => "return",
            Self::Then => "then",
            Self::Until => "until",
            Self::While => "while",
            Self::Goto => "goto",
            Self::Const => "const",
            Self::Declare => "declare",
        }
    }

    /// Whether every dialect reserves this keyword.
    #[must_use]
    pub const fn is_base(self) -> bool {
        !matches!(self, Self::Goto | Self::Const | Self::Declare)
    }

    /// Looks up a word regardless of dialect.
    #[must_use]
    pub fn from_bytes(word: &[u8]) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kw| kw.as_str().as_bytes() == word)
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Punctuators and operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Punct {
    Plus,
    Minus,
    Star,
    Slash,
    /// `//`
    DoubleSlash,
    Percent,
    Caret,
    Hash,
    Ampersand,
    Tilde,
    Pipe,
    /// `<<`
    ShiftLeft,
    /// `>>`
    ShiftRight,
    /// `==`
    Eq,
    /// `~=`
    NotEq,
    /// `<=`
    LessEq,
    /// `>=`
    GreaterEq,
    Less,
    Greater,
    /// `=`
    Assign,
    /// `=>`
    FatArrow,
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    /// `::`
    DoubleColon,
    Semicolon,
    Colon,
    Comma,
    Dot,
    /// `..`
    Concat,
}

impl Punct {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Star => "*",
            Self::Slash => "/",
            Self::DoubleSlash => "//",
            Self::Percent => "%",
            Self::Caret => "^",
            Self::Hash => "#",
            Self::Ampersand => "&",
            Self::Tilde => "~",
            Self::Pipe => "|",
            Self::ShiftLeft => "<<",
            Self::ShiftRight => ">>",
            Self::Eq => "==",
            Self::NotEq => "~=",
            Self::LessEq => "<=",
            Self::GreaterEq => ">=",
            Self::Less => "<",
            Self::Greater => ">",
            Self::Assign => "=",
            Self::FatArrow => "=>",
            Self::LParen => "(",
            Self::RParen => ")",
            Self::LBrace => "{",
            Self::RBrace => "}",
            Self::LBracket => "[",
            Self::RBracket => "]",
            Self::DoubleColon => "::",
            Self::Semicolon => ";",
            Self::Colon => ":",
            Self::Comma => ",",
            Self::Dot => ".",
            Self::Concat => "..",
        }
    }

    /// Number of code units the punctuator occupies.
    #[must_use]
    pub const fn width(self) -> usize {
        self.as_str().len()
    }

    /// Single-character punctuators that are valid in every dialect
    /// and never start a longer lexeme.
    pub(crate) const fn unconditional(byte: u8) -> Option<Self> {
        Some(match byte {
            b'*' => Self::Star,
            b'^' => Self::Caret,
            b'%' => Self::Percent,
            b',' => Self::Comma,
            b'{' => Self::LBrace,
            b'}' => Self::RBrace,
            b']' => Self::RBracket,
            b'(' => Self::LParen,
            b')' => Self::RParen,
            b';' => Self::Semicolon,
            b'#' => Self::Hash,
            b'-' => Self::Minus,
            b'+' => Self::Plus,
            b'|' => Self::Pipe,
            _ => return None,
        })
    }
}

impl fmt::Display for Punct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Token kinds produced by the lexer, with their decoded values.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// Quoted or long-bracket string, escapes decoded.
    StringLiteral(LuaString),
    /// Reserved word of the active dialect.
    Keyword(Keyword),
    /// Name that is not a keyword, boolean or `nil`.
    Identifier(LuaString),
    /// Decimal or hexadecimal numeral.
    NumericLiteral(f64),
    /// Operator or delimiter.
    Punctuator(Punct),
    /// `true` or `false`.
    BooleanLiteral(bool),
    /// `nil`.
    NilLiteral,
    /// `...`
    VarargLiteral,
}

impl TokenKind {
    /// Short name of the kind, without its value.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::StringLiteral(_) => "string",
            Self::Keyword(_) => "keyword",
            Self::Identifier(_) => "identifier",
            Self::NumericLiteral(_) => "number",
            Self::Punctuator(_) => "punctuator",
            Self::BooleanLiteral(_) => "boolean",
            Self::NilLiteral => "nil",
            Self::VarargLiteral => "vararg",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StringLiteral(s) => write!(f, "string {s:?}"),
            Self::Keyword(kw) => write!(f, "keyword '{kw}'"),
            Self::Identifier(name) => write!(f, "identifier '{name}'"),
            Self::NumericLiteral(n) => write!(f, "number {n}"),
            Self::Punctuator(p) => write!(f, "punctuator '{p}'"),
            Self::BooleanLiteral(b) => write!(f, "boolean {b}"),
            Self::NilLiteral => f.write_str("nil"),
            Self::VarargLiteral => f.write_str("'...'"),
        }
    }
}

/// A single token with its kind, value, and source location.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    /// Cursor position just past the closing delimiter. Only string
    /// tokens carry it, since only they can span several lines.
    pub end: Option<Position>,
}

impl Token {
    /// Line on which the token ends.
    #[must_use]
    pub fn last_line(&self) -> usize {
        self.end.map_or(self.span.line, |end| end.line)
    }

    /// Line start of the line on which the token ends.
    #[must_use]
    pub fn last_line_start(&self) -> usize {
        self.end.map_or(self.span.line_start, |end| end.line_start)
    }
}

/// A captured comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    /// Comment body without `--` or long brackets.
    pub value: LuaString,
    /// Comment as written, decoded lossily: an unpaired surrogate
    /// becomes U+FFFD here but keeps its bytes in `value`. Use
    /// [`Comment::range`] to get at the exact code units.
    pub raw: String,
    pub start: Position,
    pub end: Position,
}

impl Comment {
    #[must_use]
    pub const fn range(&self) -> Range<usize> {
        self.start.offset..self.end.offset
    }
}
