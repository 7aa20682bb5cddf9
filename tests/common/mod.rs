#![allow(dead_code)]

use lualex::{LexError, Lexer, LuaVersion, Options, Token, TokenKind};

pub fn options(version: LuaVersion) -> Options {
    Options::new().lua_version(version)
}

pub fn lex(input: &str, options: &Options) -> Result<Vec<Token>, LexError> {
    Lexer::new(input, options).collect()
}

pub fn kinds_in(version: LuaVersion, input: &str) -> Vec<TokenKind> {
    lex(input, &options(version))
        .unwrap_or_else(|e| panic!("failed to tokenize {input:?}: {e}"))
        .into_iter()
        .map(|t| t.kind)
        .collect()
}

pub fn error_in(version: LuaVersion, input: &str) -> LexError {
    match lex(input, &options(version)) {
        Ok(tokens) => panic!("expected an error for {input:?}, got {tokens:?}"),
        Err(e) => e,
    }
}

/// The single string literal in `input`, as bytes.
pub fn string_in(version: LuaVersion, input: &str) -> Vec<u8> {
    match kinds_in(version, input).as_slice() {
        [TokenKind::StringLiteral(s)] => s.as_bytes().to_vec(),
        other => panic!("expected one string literal in {input:?}, got {other:?}"),
    }
}

/// Source text of a token's range.
pub fn lexeme(input: &str, token: &Token) -> String {
    let units: Vec<u16> = input.encode_utf16().collect();
    String::from_utf16_lossy(&units[token.span.range.clone()])
}
