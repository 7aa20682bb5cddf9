//! Lua lexer for the 5.1, 5.2, 5.3 and `LuaJIT` dialects.
//!
//! Turns Lua source text into a stream of typed tokens with exact
//! source ranges, for consumption by a parser. Each dialect enables
//! its own set of lexical features (labels, hex and unicode escapes,
//! bitwise operators, integer division, `\z`, contextual `goto`),
//! and the keyword set follows from those features.
//!
//! Offsets count UTF-16 code units. Decoded strings and identifiers
//! are byte strings ([`LuaString`]): non-ASCII source text becomes the
//! UTF-8 bytes it would have in a Lua source file.
//!
//! # Quick start
//!
//! ```
//! use lualex::{Keyword, TokenKind, tokenize};
//!
//! let tokens = tokenize("local s = [[hi]]").unwrap();
//! assert_eq!(tokens[0].kind, TokenKind::Keyword(Keyword::Local));
//! assert_eq!(tokens[3].kind, TokenKind::StringLiteral("hi".into()));
//! assert_eq!(tokens[3].span.range, 10..16);
//! ```
//!
//! ## Choosing a dialect
//!
//! ```
//! use lualex::{Features, Keyword, Lexer, LuaVersion, Options, TokenKind};
//!
//! let options = Options::new()
//!     .lua_version(LuaVersion::Lua53)
//!     .enable(Features::CONST)
//!     .comments(true);
//! let mut lexer = Lexer::new("const x = a // 2 -- halve", &options);
//! let kinds: Vec<_> = lexer.by_ref().map(|t| t.unwrap().kind).collect();
//! assert_eq!(kinds[0], TokenKind::Keyword(Keyword::Const));
//! assert_eq!(lexer.comments()[0].value, " halve");
//! ```

// Allow noisy pedantic lints that don't add value for
// a library crate.
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

mod cursor;
pub mod dialect;
pub mod encoding;
pub mod lexer;
pub mod token;

pub use dialect::{
    Dialect, FeatureOverrides, Features, KeywordSet, LuaVersion, Options, UnknownVersion,
};
pub use lexer::{LexError, LexErrorKind, Lexed, Lexer, tokenize, tokenize_with};
pub use token::{Comment, Keyword, LuaString, Position, Punct, Span, Token, TokenKind};
